use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use uuid::Uuid;

use waybill_api::message::MessageCode;
use waybill_api::response;
use waybill_data::PageRequest;
use waybill_http::{ApiError, Json};

use crate::model::{CreateCountry, UpdateCountry};
use crate::service::CountryService;

pub async fn create_country(
    State(service): State<CountryService>,
    Json(input): Json<CreateCountry>,
) -> Result<impl IntoResponse, ApiError> {
    let country = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        axum::Json(response::success(
            Some(country),
            Some(MessageCode::Created),
            &[("resource", "Country")],
        )),
    ))
}

pub async fn list_countries(
    State(service): State<CountryService>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let countries = service.list(&page).await?;
    Ok(axum::Json(response::success_paginated(
        countries,
        Some(MessageCode::ListFetched),
        &[("resource", "Country")],
    )))
}

pub async fn get_country(
    State(service): State<CountryService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let country = service.get(id).await?;
    Ok(axum::Json(response::success(
        Some(country),
        Some(MessageCode::Fetched),
        &[("resource", "Country")],
    )))
}

pub async fn get_country_by_code(
    State(service): State<CountryService>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let country = service.get_by_code(&code).await?;
    Ok(axum::Json(response::success(
        Some(country),
        Some(MessageCode::Fetched),
        &[("resource", "Country")],
    )))
}

pub async fn update_country(
    State(service): State<CountryService>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCountry>,
) -> Result<impl IntoResponse, ApiError> {
    let country = service.update(id, input).await?;
    Ok(axum::Json(response::success(
        Some(country),
        Some(MessageCode::Updated),
        &[("resource", "Country")],
    )))
}

pub async fn delete_country(
    State(service): State<CountryService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    service.delete(id).await?;
    Ok(axum::Json(response::success_message(
        MessageCode::Deleted,
        &[("resource", "Country")],
    )))
}

pub async fn health() -> impl IntoResponse {
    axum::Json(response::success(Some(json!({"status": "ok"})), None, &[]))
}
