use std::borrow::Cow;

use serde_json::{Map, Value};

/// Translation table between entity field names (camelCase) and storage
/// column names (snake_case).
///
/// Lookups come in two flavours:
///
/// - [`ColumnMap::get`] / [`ColumnMap::field_for_column`] are *strict*:
///   they only answer for explicitly mapped names. Repositories use these
///   to gate filter and sort keys, so a key that is not in the map can
///   never reach the SQL text.
/// - [`ColumnMap::column_for`] / [`ColumnMap::field_for`] fall back to the
///   naming convention (`createdAt ↔ created_at`) and therefore never fail.
///
/// # Example
///
/// ```ignore
/// static COUNTRY_COLUMNS: ColumnMap = ColumnMap::new(&[
///     ("id", "id"),
///     ("code", "code"),
///     ("isActive", "is_active"),
///     ("createdAt", "created_at"),
/// ]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    entries: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Strict lookup: the storage column for an explicitly mapped field.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
    }

    /// Strict reverse lookup: the entity field for an explicitly mapped column.
    pub fn field_for_column(&self, column: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == column)
            .map(|(f, _)| *f)
    }

    /// The storage column for a field, falling back to the snake_case
    /// convention when the field is not mapped.
    pub fn column_for(&self, field: &str) -> Cow<'static, str> {
        match self.get(field) {
            Some(column) => Cow::Borrowed(column),
            None => Cow::Owned(to_snake_case(field)),
        }
    }

    /// The entity field for a column, falling back to the camelCase
    /// convention when the column is not mapped.
    pub fn field_for(&self, column: &str) -> Cow<'static, str> {
        match self.field_for_column(column) {
            Some(field) => Cow::Borrowed(field),
            None => Cow::Owned(to_camel_case(column)),
        }
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}

/// Convert a camelCase identifier to snake_case.
///
/// Runs of uppercase letters count as a single word boundary, so acronyms
/// stay intact: `myURL → my_url`, `myURLPath → my_url_path`.
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let after_lower = i > 0 && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let run_ends = i > 0
                && chars[i - 1].is_ascii_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if after_lower || run_ends {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a snake_case identifier to camelCase.
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for c in input.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Translate a storage row into an entity-shaped object (camelCase keys).
pub fn to_entity(row: &Map<String, Value>, map: &ColumnMap) -> Map<String, Value> {
    let mut entity = Map::with_capacity(row.len());
    for (column, value) in row {
        entity.insert(map.field_for(column).into_owned(), value.clone());
    }
    entity
}

/// Translate an entity-shaped object into a storage row (column keys).
pub fn to_row(entity: &Map<String, Value>, map: &ColumnMap) -> Map<String, Value> {
    let mut row = Map::with_capacity(entity.len());
    for (field, value) in entity {
        row.insert(map.column_for(field).into_owned(), value.clone());
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static MAP: ColumnMap = ColumnMap::new(&[
        ("id", "id"),
        ("name", "usr_nm"),
        ("email", "usr_em"),
        ("isActive", "is_active"),
        ("createdAt", "created_at"),
    ]);

    #[test]
    fn test_strict_lookup() {
        assert_eq!(MAP.get("name"), Some("usr_nm"));
        assert_eq!(MAP.get("unknown"), None);
        assert_eq!(MAP.field_for_column("usr_em"), Some("email"));
    }

    #[test]
    fn test_convention_fallback() {
        assert_eq!(MAP.column_for("modifiedAt"), "modified_at");
        assert_eq!(MAP.field_for("tenant_id"), "tenantId");
        // Explicit mapping wins over the convention.
        assert_eq!(MAP.column_for("name"), "usr_nm");
    }

    #[test]
    fn test_snake_case_acronym_runs() {
        assert_eq!(to_snake_case("createdAt"), "created_at");
        assert_eq!(to_snake_case("myURL"), "my_url");
        assert_eq!(to_snake_case("myURLPath"), "my_url_path");
        assert_eq!(to_snake_case("id"), "id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_camel_case("tenant_id"), "tenantId");
        assert_eq!(to_camel_case("code"), "code");
    }

    #[test]
    fn test_row_entity_round_trip() {
        let row = json!({
            "id": "9a1f",
            "usr_nm": "Alice",
            "usr_em": "a@b.com",
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
        });
        let row = row.as_object().unwrap();

        let entity = to_entity(row, &MAP);
        assert_eq!(entity["name"], json!("Alice"));
        assert_eq!(entity["isActive"], json!(true));

        // Every key of the row is present in the map, so the translation
        // is reversible.
        let back = to_row(&entity, &MAP);
        assert_eq!(&back, row);
    }
}
