//! JSON response envelopes.
//!
//! Every payload leaving a Waybill service is one of the two shapes built
//! here. The builders are pure functions of their inputs apart from the
//! wall-clock timestamp.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use waybill_data::Paginated;

use crate::message::{resolve, MessageCode};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Omitted from the JSON entirely when absent, never `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_code: Option<String>,
    pub error: String,
    pub status_code: u16,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Build a success envelope.
///
/// # Example
///
/// ```ignore
/// success(Some(user), Some(MessageCode::Created), &[("resource", "User")]);
/// // → { "success": true, "messageCode": "CREATED",
/// //     "message": "User created successfully", "data": {...}, "timestamp": "..." }
/// ```
pub fn success<T: Serialize>(
    data: Option<T>,
    code: Option<MessageCode>,
    params: &[(&str, &str)],
) -> SuccessBody<T> {
    let resolved = code.map(|code| resolve(code, params));
    SuccessBody {
        success: true,
        message_code: resolved.as_ref().map(|r| r.message_code.clone()),
        message: resolved.map(|r| r.message),
        data,
        timestamp: timestamp(),
    }
}

/// Build a data-less success envelope (delete confirmations and the like).
pub fn success_message(code: MessageCode, params: &[(&str, &str)]) -> SuccessBody<()> {
    success(None, Some(code), params)
}

/// Build a paginated success envelope.
pub fn success_paginated<T: Serialize>(
    page: Paginated<T>,
    code: Option<MessageCode>,
    params: &[(&str, &str)],
) -> SuccessBody<Paginated<T>> {
    success(Some(page), code, params)
}

/// Build an error envelope from a message code.
pub fn error(code: MessageCode, params: &[(&str, &str)], stack: Option<String>) -> ErrorBody {
    let resolved = resolve(code, params);
    ErrorBody {
        success: false,
        message_code: Some(resolved.message_code),
        error: resolved.message,
        status_code: resolved.status,
        timestamp: timestamp(),
        stack,
    }
}

/// Build an error envelope from a raw message string, for errors with no
/// semantic code. Prefer [`error`] whenever a code exists.
pub fn error_raw(message: impl Into<String>, status_code: u16, stack: Option<String>) -> ErrorBody {
    ErrorBody {
        success: false,
        message_code: None,
        error: message.into(),
        status_code,
        timestamp: timestamp(),
        stack,
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use waybill_data::PageRequest;

    #[test]
    fn test_success_with_code() {
        let body = success(Some(json!({"id": 1})), Some(MessageCode::Created), &[("resource", "User")]);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["messageCode"], json!("CREATED"));
        assert_eq!(value["message"], json!("User created successfully"));
        assert_eq!(value["data"], json!({"id": 1}));
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn test_success_omits_absent_keys() {
        let body = success::<Value>(None, None, &[]);
        let value = serde_json::to_value(&body).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("data"));
        assert!(!object.contains_key("messageCode"));
        assert!(!object.contains_key("message"));
        assert_eq!(object["success"], json!(true));
    }

    #[test]
    fn test_error_envelope() {
        let body = error(MessageCode::NotFound, &[("resource", "Country")], None);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["messageCode"], json!("NOT_FOUND"));
        assert_eq!(value["error"], json!("Country not found"));
        assert_eq!(value["statusCode"], json!(404));
        assert!(value.as_object().unwrap().get("stack").is_none());
    }

    #[test]
    fn test_error_raw() {
        let body = error_raw("request entity too large", 413, None);
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.as_object().unwrap().get("messageCode").is_none());
        assert_eq!(value["statusCode"], json!(413));
        assert_eq!(value["error"], json!("request entity too large"));
    }

    #[test]
    fn test_paginated_envelope() {
        let page = Paginated::new(vec![json!({"code": "US"})], &PageRequest::default(), 1);
        let body = success_paginated(page, Some(MessageCode::ListFetched), &[("resource", "Country")]);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["data"]["items"][0]["code"], json!("US"));
        assert_eq!(value["data"]["meta"]["totalPages"], json!(1));
        assert_eq!(value["message"], json!("Country list fetched successfully"));
    }
}
