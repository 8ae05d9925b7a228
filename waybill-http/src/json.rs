use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// JSON body extractor whose rejection is an [`ApiError`] envelope instead
/// of axum's plain-text rejection.
///
/// Malformed bodies come back as `BAD_REQUEST`, schema mismatches as
/// `VALIDATION_FAILED`, oversized bodies as a raw 413, all before the
/// handler body ever runs.
///
/// # Example
///
/// ```ignore
/// async fn create(State(service): State<CountryService>, Json(input): Json<CreateCountry>) { ... }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::from(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
