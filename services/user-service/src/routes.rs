use axum::middleware;
use axum::routing::get;
use axum::Router;

use waybill_http::trace_requests;

use crate::handlers;
use crate::service::UserService;

pub fn router(service: UserService) -> Router {
    Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(trace_requests))
        .with_state(service)
}
