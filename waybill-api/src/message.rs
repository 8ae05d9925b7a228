//! Centralized message codes for all API responses.
//!
//! Handlers and services use these codes instead of writing raw strings;
//! the catalog below is the single source of truth for HTTP status
//! selection. New codes are added here, nowhere else.

/// A stable identifier for a class of outcome. Each code resolves to
/// exactly one HTTP status and one message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCode {
    // ── Success: generic CRUD ──────────────────────────────────
    Created,
    Updated,
    Deleted,
    Fetched,
    ListFetched,

    // ── Error: validation / client ─────────────────────────────
    BadRequest,
    ValidationFailed,
    FieldRequired,
    InvalidInput,

    // ── Error: authentication & authorization ──────────────────
    Unauthorized,
    Forbidden,
    InvalidCredentials,
    TokenExpired,

    // ── Error: resource ────────────────────────────────────────
    NotFound,
    Conflict,
    DuplicateEntry,
    DuplicateEmail,

    // ── Error: server ──────────────────────────────────────────
    InternalError,
    ServiceUnavailable,
}

impl MessageCode {
    pub const ALL: &'static [MessageCode] = &[
        MessageCode::Created,
        MessageCode::Updated,
        MessageCode::Deleted,
        MessageCode::Fetched,
        MessageCode::ListFetched,
        MessageCode::BadRequest,
        MessageCode::ValidationFailed,
        MessageCode::FieldRequired,
        MessageCode::InvalidInput,
        MessageCode::Unauthorized,
        MessageCode::Forbidden,
        MessageCode::InvalidCredentials,
        MessageCode::TokenExpired,
        MessageCode::NotFound,
        MessageCode::Conflict,
        MessageCode::DuplicateEntry,
        MessageCode::DuplicateEmail,
        MessageCode::InternalError,
        MessageCode::ServiceUnavailable,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MessageCode::Created => "CREATED",
            MessageCode::Updated => "UPDATED",
            MessageCode::Deleted => "DELETED",
            MessageCode::Fetched => "FETCHED",
            MessageCode::ListFetched => "LIST_FETCHED",
            MessageCode::BadRequest => "BAD_REQUEST",
            MessageCode::ValidationFailed => "VALIDATION_FAILED",
            MessageCode::FieldRequired => "FIELD_REQUIRED",
            MessageCode::InvalidInput => "INVALID_INPUT",
            MessageCode::Unauthorized => "UNAUTHORIZED",
            MessageCode::Forbidden => "FORBIDDEN",
            MessageCode::InvalidCredentials => "INVALID_CREDENTIALS",
            MessageCode::TokenExpired => "TOKEN_EXPIRED",
            MessageCode::NotFound => "NOT_FOUND",
            MessageCode::Conflict => "CONFLICT",
            MessageCode::DuplicateEntry => "DUPLICATE_ENTRY",
            MessageCode::DuplicateEmail => "DUPLICATE_EMAIL",
            MessageCode::InternalError => "INTERNAL_ERROR",
            MessageCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn parse(code: &str) -> Option<MessageCode> {
        MessageCode::ALL.iter().copied().find(|c| c.as_str() == code)
    }

    /// The HTTP status this code resolves to.
    pub const fn status(self) -> u16 {
        match self {
            MessageCode::Created => 201,
            MessageCode::Updated
            | MessageCode::Deleted
            | MessageCode::Fetched
            | MessageCode::ListFetched => 200,
            MessageCode::BadRequest => 400,
            MessageCode::ValidationFailed
            | MessageCode::FieldRequired
            | MessageCode::InvalidInput => 422,
            MessageCode::Unauthorized
            | MessageCode::InvalidCredentials
            | MessageCode::TokenExpired => 401,
            MessageCode::Forbidden => 403,
            MessageCode::NotFound => 404,
            MessageCode::Conflict | MessageCode::DuplicateEntry | MessageCode::DuplicateEmail => {
                409
            }
            MessageCode::InternalError => 500,
            MessageCode::ServiceUnavailable => 503,
        }
    }

    /// The message template, with `{placeholder}` tokens substituted at
    /// resolution time.
    pub const fn template(self) -> &'static str {
        match self {
            MessageCode::Created => "{resource} created successfully",
            MessageCode::Updated => "{resource} updated successfully",
            MessageCode::Deleted => "{resource} deleted successfully",
            MessageCode::Fetched => "{resource} fetched successfully",
            MessageCode::ListFetched => "{resource} list fetched successfully",
            MessageCode::BadRequest => "Bad request: {reason}",
            MessageCode::ValidationFailed => "Validation failed: {reason}",
            MessageCode::FieldRequired => "{field} is required",
            MessageCode::InvalidInput => "Invalid input: {reason}",
            MessageCode::Unauthorized => "Authentication required",
            MessageCode::Forbidden => "You do not have permission to perform this action",
            MessageCode::InvalidCredentials => "Invalid credentials",
            MessageCode::TokenExpired => "Token has expired",
            MessageCode::NotFound => "{resource} not found",
            MessageCode::Conflict => "{resource} already exists",
            MessageCode::DuplicateEntry => "{resource} with this {field} already exists",
            MessageCode::DuplicateEmail => "Email {email} is already in use",
            MessageCode::InternalError => "An unexpected error occurred",
            MessageCode::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }
}

impl std::fmt::Display for MessageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message code resolved against the catalog: the code itself, its HTTP
/// status, and the interpolated human message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub message_code: String,
    pub status: u16,
    pub message: String,
}

/// Resolve a [`MessageCode`] into its HTTP status and interpolated message.
///
/// Each `(key, value)` pair replaces every literal `{key}` token in the
/// template; unmatched tokens are left as-is.
///
/// # Example
///
/// ```ignore
/// let resolved = resolve(MessageCode::Created, &[("resource", "User")]);
/// assert_eq!(resolved.status, 201);
/// assert_eq!(resolved.message, "User created successfully");
/// ```
pub fn resolve(code: MessageCode, params: &[(&str, &str)]) -> ResolvedMessage {
    ResolvedMessage {
        message_code: code.as_str().to_string(),
        status: code.status(),
        message: render_template(code.template(), params),
    }
}

/// Resolve a code by name. Unknown codes degrade to a 500 with an
/// `Unknown message code` message; resolution never fails.
pub fn resolve_code(code: &str, params: &[(&str, &str)]) -> ResolvedMessage {
    match MessageCode::parse(code) {
        Some(known) => resolve(known, params),
        None => ResolvedMessage {
            message_code: code.to_string(),
            status: 500,
            message: format!("Unknown message code: {code}"),
        },
    }
}

fn render_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut message = template.to_string();
    for (key, value) in params {
        message = message.replace(&format!("{{{key}}}"), value);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_created() {
        let resolved = resolve(MessageCode::Created, &[("resource", "User")]);
        assert_eq!(resolved.message_code, "CREATED");
        assert_eq!(resolved.status, 201);
        assert_eq!(resolved.message, "User created successfully");
    }

    #[test]
    fn test_resolve_duplicate_email() {
        let resolved = resolve(MessageCode::DuplicateEmail, &[("email", "a@b.com")]);
        assert_eq!(resolved.status, 409);
        assert_eq!(resolved.message, "Email a@b.com is already in use");
    }

    #[test]
    fn test_unknown_code_never_fails() {
        let resolved = resolve_code("NO_SUCH_CODE", &[]);
        assert_eq!(resolved.status, 500);
        assert_eq!(resolved.message, "Unknown message code: NO_SUCH_CODE");
        assert_eq!(resolved.message_code, "NO_SUCH_CODE");
    }

    #[test]
    fn test_missing_params_leave_tokens() {
        let resolved = resolve(MessageCode::DuplicateEntry, &[("resource", "Country")]);
        assert_eq!(
            resolved.message,
            "Country with this {field} already exists"
        );
    }

    #[test]
    fn test_every_code_resolves() {
        for code in MessageCode::ALL {
            let resolved = resolve(*code, &[]);
            assert!(resolved.status >= 200 && resolved.status < 600);
            assert!(!resolved.message.is_empty());
            assert_eq!(MessageCode::parse(code.as_str()), Some(*code));
        }
    }
}
