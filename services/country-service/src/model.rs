use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waybill_data::{ColumnMap, Entity};
use waybill_data_sqlx::PgRepository;

static COUNTRY_COLUMNS: ColumnMap = ColumnMap::new(&[
    ("id", "id"),
    ("code", "code"),
    ("name", "name"),
    ("isActive", "is_active"),
    ("createdAt", "created_at"),
    ("modifiedAt", "modified_at"),
    ("createdBy", "created_by"),
    ("modifiedBy", "modified_by"),
    ("tenantId", "tenant_id"),
]);

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub tenant_id: Option<Uuid>,
}

impl Entity for Country {
    type Id = Uuid;

    fn table_name() -> &'static str {
        "countries"
    }

    fn column_map() -> &'static ColumnMap {
        &COUNTRY_COLUMNS
    }

    fn writable_fields() -> &'static [&'static str] {
        &["code", "name"]
    }

    fn id(&self) -> &Uuid {
        &self.id
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCountry {
    /// ISO 3166 alpha-2 or alpha-3.
    #[garde(length(min = 2, max = 3))]
    pub code: String,
    #[garde(length(min = 1, max = 120))]
    pub name: String,
}

/// Absent fields are skipped during serialization, so a body with no
/// writable field reaches the repository as an empty record and behaves
/// as a plain read.
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCountry {
    #[garde(length(min = 2, max = 3))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[garde(length(min = 1, max = 120))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub type CountryRepository = PgRepository<Country, CreateCountry, UpdateCountry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_serializes_to_empty_object() {
        let input = UpdateCountry {
            code: None,
            name: None,
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_column_map_covers_every_field() {
        for field in [
            "id",
            "code",
            "name",
            "isActive",
            "createdAt",
            "modifiedAt",
            "createdBy",
            "modifiedBy",
            "tenantId",
        ] {
            assert!(
                Country::column_map().contains_field(field),
                "missing column mapping for {field}"
            );
        }
    }

    #[test]
    fn test_validation_bounds() {
        let bad = CreateCountry {
            code: "TOOLONG".into(),
            name: String::new(),
        };
        assert!(bad.validate().is_err());

        let ok = CreateCountry {
            code: "US".into(),
            name: "United States".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
