use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// A value that can be bound into a SQL statement.
///
/// The closed set keeps the data layer honest about what it sends to the
/// driver: every criteria or input value is decomposed into one of these
/// variants before binding, never spliced into SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Decompose a JSON value into a bindable value.
    ///
    /// Arrays and objects are carried as their JSON text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Int(i),
                None => SqlValue::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => SqlValue::Text(s),
            other => SqlValue::Text(other.to_string()),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => SqlValue::Null,
        }
    }
}

/// Equality filters keyed by *entity field name*.
///
/// Repositories translate each key through the entity's [`crate::ColumnMap`]
/// before it can influence a query; keys with no mapping are silently
/// dropped rather than rejected, so arbitrary client-supplied keys cannot
/// name columns.
///
/// # Example
///
/// ```ignore
/// let criteria = Criteria::new()
///     .with("email", "a@b.com")
///     .with("isActive", true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    entries: Vec<(String, SqlValue)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.entries.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(String, SqlValue)] {
        &self.entries
    }

    /// The first filtered field name, if any. Used to surface which field
    /// caused a conflict in guarded writes.
    pub fn first_field(&self) -> Option<&str> {
        self.entries.first().map(|(f, _)| f.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        assert_eq!(SqlValue::from_json(json!(null)), SqlValue::Null);
        assert_eq!(SqlValue::from_json(json!(true)), SqlValue::Bool(true));
        assert_eq!(SqlValue::from_json(json!(42)), SqlValue::Int(42));
        assert_eq!(SqlValue::from_json(json!(1.5)), SqlValue::Float(1.5));
        assert_eq!(
            SqlValue::from_json(json!("US")),
            SqlValue::Text("US".into())
        );
    }

    #[test]
    fn test_builder() {
        let criteria = Criteria::new().with("email", "a@b.com").with("isActive", true);
        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria.first_field(), Some("email"));
        assert_eq!(
            criteria.entries()[1],
            ("isActive".to_string(), SqlValue::Bool(true))
        );
    }
}
