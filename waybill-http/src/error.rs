use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use waybill_api::message::MessageCode;
use waybill_api::response::{self, ErrorBody};
use waybill_data::DataError;

static INCLUDE_STACKS: AtomicBool = AtomicBool::new(false);

/// Opt in to `stack` fields on error envelopes, process-wide.
///
/// Services call this once at startup; it must stay off in production so
/// internals never reach clients.
pub fn include_stacks(enabled: bool) {
    INCLUDE_STACKS.store(enabled, Ordering::Relaxed);
}

fn stacks_enabled() -> bool {
    INCLUDE_STACKS.load(Ordering::Relaxed)
}

/// Classification of an [`ApiError`], each with a fixed default status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    pub const fn default_status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn for_status(status: StatusCode) -> ErrorKind {
        match status.as_u16() {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            422 => ErrorKind::Validation,
            s if s >= 500 => ErrorKind::Internal,
            _ => ErrorKind::BadRequest,
        }
    }
}

/// The one error type handlers and services return.
///
/// An `ApiError` carries either a semantic message code (preferred; status
/// and message resolve through the catalog) or a raw message at a declared
/// status. `operational` marks expected business-rule failures; anything
/// else renders as `INTERNAL_ERROR` with no detail, so unexpected failures
/// can never leak internals to clients.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    status: StatusCode,
    code: Option<MessageCode>,
    params: Vec<(String, String)>,
    message: Option<String>,
    operational: bool,
    stack: Option<String>,
}

impl ApiError {
    /// Build from a semantic code; status and message come from the catalog.
    pub fn from_code(code: MessageCode, params: &[(&str, &str)]) -> Self {
        let status = StatusCode::from_u16(code.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            kind: ErrorKind::for_status(status),
            status,
            code: Some(code),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            message: None,
            operational: true,
            stack: None,
        }
    }

    /// Build from a raw message at the kind's fixed status.
    pub fn from_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: kind.default_status(),
            code: None,
            params: Vec::new(),
            message: Some(message.into()),
            operational: true,
            stack: None,
        }
    }

    /// Build from a raw message at an arbitrary status, for statuses the
    /// taxonomy has no kind for (e.g. 413).
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::for_status(status),
            status,
            code: None,
            params: Vec::new(),
            message: Some(message.into()),
            operational: true,
            stack: None,
        }
    }

    /// An unexpected failure. The detail is logged but never rendered.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            params: Vec::new(),
            message: Some(detail.into()),
            operational: false,
            stack: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::from_message(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::from_message(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::from_message(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_message(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::from_message(ErrorKind::Conflict, message)
    }

    /// Fold a validation report into a `VALIDATION_FAILED` error carrying
    /// the field-level reasons.
    pub fn from_validation(report: &garde::Report) -> Self {
        let mut reasons = Vec::new();
        for (path, error) in report.iter() {
            let path = path.to_string();
            let field = if path.is_empty() { "value".to_string() } else { path };
            reasons.push(format!("{field}: {}", error.message()));
        }
        Self::from_code(MessageCode::ValidationFailed, &[("reason", &reasons.join("; "))])
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message_code(&self) -> Option<MessageCode> {
        self.code
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// The status the client sees. Non-operational errors always surface
    /// as 500 regardless of any status the error carries.
    pub fn status(&self) -> StatusCode {
        if self.operational {
            self.status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Render the error envelope.
    pub fn to_body(&self) -> ErrorBody {
        let stack = if stacks_enabled() {
            self.stack.clone()
        } else {
            None
        };
        if !self.operational {
            return response::error(MessageCode::InternalError, &[], stack);
        }
        match (self.code, &self.message) {
            (Some(code), _) => {
                let params: Vec<(&str, &str)> = self
                    .params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                response::error(code, &params, stack)
            }
            (None, Some(message)) => {
                response::error_raw(message.clone(), self.status.as_u16(), stack)
            }
            (None, None) => response::error_raw(
                self.status.canonical_reason().unwrap_or("Error"),
                self.status.as_u16(),
                stack,
            ),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, &self.message) {
            (Some(code), _) => {
                let params: Vec<(&str, &str)> = self
                    .params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                let resolved = waybill_api::message::resolve(code, &params);
                write!(f, "{code}: {}", resolved.message)
            }
            (None, Some(message)) => f.write_str(message),
            (None, None) => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, axum::Json(self.to_body())).into_response()
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(message) => ApiError::from_message(ErrorKind::NotFound, message),
            DataError::UniqueViolation { field, .. } => {
                let field = field.as_deref().unwrap_or("value").to_string();
                ApiError::from_code(
                    MessageCode::DuplicateEntry,
                    &[("resource", "Resource"), ("field", &field)],
                )
            }
            DataError::Database(err) => ApiError::internal(err.to_string()),
            DataError::Other(message) => ApiError::internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::from_code(
                MessageCode::ValidationFailed,
                &[("reason", &err.body_text())],
            ),
            JsonRejection::JsonSyntaxError(_) => ApiError::from_code(
                MessageCode::BadRequest,
                &[("reason", "malformed JSON body")],
            ),
            JsonRejection::MissingJsonContentType(_) => ApiError::from_code(
                MessageCode::BadRequest,
                &[("reason", "expected application/json content type")],
            ),
            JsonRejection::BytesRejection(_) => ApiError::with_status(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body too large or unreadable",
            ),
            other => ApiError::from_code(MessageCode::BadRequest, &[("reason", &other.body_text())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_resolves_status() {
        let err = ApiError::from_code(MessageCode::NotFound, &[("resource", "Country")]);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let body = err.to_body();
        assert_eq!(body.message_code.as_deref(), Some("NOT_FOUND"));
        assert_eq!(body.error, "Country not found");
        assert_eq!(body.status_code, 404);
    }

    #[test]
    fn test_raw_message_keeps_declared_status() {
        let err = ApiError::conflict("order already shipped");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        let body = err.to_body();
        assert!(body.message_code.is_none());
        assert_eq!(body.error, "order already shipped");
        assert_eq!(body.status_code, 409);
    }

    #[test]
    fn test_non_operational_never_leaks() {
        let err = ApiError::internal("SELECT failed: connection refused to 10.0.0.3");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_body();
        assert_eq!(body.message_code.as_deref(), Some("INTERNAL_ERROR"));
        assert_eq!(body.error, "An unexpected error occurred");
        assert!(body.stack.is_none());
    }

    #[test]
    fn test_unique_violation_translation() {
        let err = ApiError::from(DataError::UniqueViolation {
            constraint: Some("countries_code_key".into()),
            field: Some("code".into()),
            message: "duplicate key value".into(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message_code(), Some(MessageCode::DuplicateEntry));
        let body = err.to_body();
        assert_eq!(body.error, "Resource with this code already exists");
    }

    #[test]
    fn test_database_error_is_masked() {
        let err = ApiError::from(DataError::Other("broken pipe".into()));
        assert!(!err.is_operational());
        assert_eq!(err.to_body().error, "An unexpected error occurred");
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = ApiError::with_status(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
        assert_eq!(err.status().as_u16(), 413);
        let body = err.to_body();
        assert!(body.message_code.is_none());
        assert_eq!(body.status_code, 413);
    }
}
