use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use uuid::Uuid;

use waybill_api::message::MessageCode;
use waybill_api::response;
use waybill_data::PageRequest;
use waybill_http::{ApiError, Json};

use crate::model::{CreateUser, UpdateUser};
use crate::service::UserService;

pub async fn create_user(
    State(service): State<UserService>,
    Json(input): Json<CreateUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        axum::Json(response::success(
            Some(user),
            Some(MessageCode::Created),
            &[("resource", "User")],
        )),
    ))
}

pub async fn list_users(
    State(service): State<UserService>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let users = service.list(&page).await?;
    Ok(axum::Json(response::success_paginated(
        users,
        Some(MessageCode::ListFetched),
        &[("resource", "User")],
    )))
}

pub async fn get_user(
    State(service): State<UserService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = service.get(id).await?;
    Ok(axum::Json(response::success(
        Some(user),
        Some(MessageCode::Fetched),
        &[("resource", "User")],
    )))
}

pub async fn update_user(
    State(service): State<UserService>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = service.update(id, input).await?;
    Ok(axum::Json(response::success(
        Some(user),
        Some(MessageCode::Updated),
        &[("resource", "User")],
    )))
}

pub async fn delete_user(
    State(service): State<UserService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    service.delete(id).await?;
    Ok(axum::Json(response::success_message(
        MessageCode::Deleted,
        &[("resource", "User")],
    )))
}

pub async fn health() -> impl IntoResponse {
    axum::Json(response::success(Some(json!({"status": "ok"})), None, &[]))
}
