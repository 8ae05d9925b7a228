use crate::query::QueryError;

/// Errors that can occur in the data layer.
///
/// The variants form a closed set of recognizable shapes: backend crates
/// classify driver errors into exactly one of them at the storage boundary,
/// and the HTTP layer translates from them without ever re-inspecting
/// driver internals.
#[derive(Debug)]
pub enum DataError {
    /// A row that was required to exist does not. Routine absence
    /// (`find_by_id` on an unknown id) is `Ok(None)`, not this.
    NotFound(String),
    /// A uniqueness guarantee was violated, either by the database
    /// constraint itself or by a guarded write's conflict check.
    UniqueViolation {
        constraint: Option<String>,
        field: Option<String>,
        message: String,
    },
    /// Any other driver-level failure, carried unmodified.
    Database(Box<dyn std::error::Error + Send + Sync>),
    Other(String),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates to wrap driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::UniqueViolation { field, message, .. } => match field {
                Some(field) => write!(f, "Unique violation on {field}: {message}"),
                None => write!(f, "Unique violation: {message}"),
            },
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::Other(msg) => write!(f, "Data error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<QueryError> for DataError {
    fn from(err: QueryError) -> Self {
        DataError::Other(err.to_string())
    }
}
