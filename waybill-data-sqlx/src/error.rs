use sqlx::postgres::PgDatabaseError;
use waybill_data::DataError;

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Extension trait classifying `sqlx::Error` into the closed
/// [`DataError`] shape set.
///
/// Classification happens exactly once, here at the storage boundary:
///
/// - `RowNotFound` → [`DataError::NotFound`]
/// - unique-constraint violations → [`DataError::UniqueViolation`], with
///   the offending column parsed out of the driver's detail text
/// - everything else → [`DataError::Database`], carried unmodified
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        match &self {
            sqlx::Error::RowNotFound => DataError::NotFound("row not found".into()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                DataError::UniqueViolation {
                    constraint: db.constraint().map(str::to_string),
                    field: db
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(PgDatabaseError::detail)
                        .and_then(field_from_detail),
                    message: db.message().to_string(),
                }
            }
            _ => DataError::database(self),
        }
    }
}

/// Convenience alias for data-layer results using `DataError`.
pub type SqlxResult<T> = Result<T, DataError>;

/// Pull the first column name out of a Postgres unique-violation detail,
/// e.g. `Key (code)=(US) already exists.` → `code`.
fn field_from_detail(detail: &str) -> Option<String> {
    let rest = detail.strip_prefix("Key (")?;
    let columns = rest.split(')').next()?;
    Some(columns.split(',').next()?.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_detail() {
        assert_eq!(
            field_from_detail("Key (code)=(US) already exists."),
            Some("code".to_string())
        );
        assert_eq!(
            field_from_detail("Key (tenant_id, usr_em)=(t1, a@b.com) already exists."),
            Some("tenant_id".to_string())
        );
        assert_eq!(field_from_detail("something else entirely"), None);
    }

    #[test]
    fn test_row_not_found_classification() {
        let err = sqlx::Error::RowNotFound.into_data_error();
        assert!(matches!(err, DataError::NotFound(_)));
    }
}
