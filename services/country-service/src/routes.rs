use axum::middleware;
use axum::routing::get;
use axum::Router;

use waybill_http::trace_requests;

use crate::handlers;
use crate::service::CountryService;

pub fn router(service: CountryService) -> Router {
    Router::new()
        .route(
            "/countries",
            get(handlers::list_countries).post(handlers::create_country),
        )
        .route(
            "/countries/{id}",
            get(handlers::get_country)
                .put(handlers::update_country)
                .delete(handlers::delete_country),
        )
        .route("/countries/code/{code}", get(handlers::get_country_by_code))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(trace_requests))
        .with_state(service)
}
