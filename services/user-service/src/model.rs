use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waybill_data::{ColumnMap, Entity};
use waybill_data_sqlx::PgRepository;

// The users table predates the snake_case convention; name and e-mail
// live in abbreviated columns, mapped explicitly.
static USER_COLUMNS: ColumnMap = ColumnMap::new(&[
    ("id", "id"),
    ("name", "usr_nm"),
    ("email", "usr_em"),
    ("isActive", "is_active"),
    ("createdAt", "created_at"),
    ("modifiedAt", "modified_at"),
    ("createdBy", "created_by"),
    ("modifiedBy", "modified_by"),
    ("tenantId", "tenant_id"),
]);

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[sqlx(rename = "usr_nm")]
    pub name: String,
    #[sqlx(rename = "usr_em")]
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub tenant_id: Option<Uuid>,
}

impl Entity for User {
    type Id = Uuid;

    fn table_name() -> &'static str {
        "users"
    }

    fn column_map() -> &'static ColumnMap {
        &USER_COLUMNS
    }

    fn writable_fields() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn id(&self) -> &Uuid {
        &self.id
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[garde(length(min = 1, max = 120))]
    pub name: String,
    #[garde(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[garde(length(min = 1, max = 120))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[garde(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub type UserRepository = PgRepository<User, CreateUser, UpdateUser>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_overrides_win() {
        let map = User::column_map();
        assert_eq!(map.get("name"), Some("usr_nm"));
        assert_eq!(map.get("email"), Some("usr_em"));
        assert_eq!(map.field_for("usr_em"), "email");
        // Unmapped names still degrade to the convention.
        assert_eq!(map.column_for("lastLogin"), "last_login");
    }

    #[test]
    fn test_email_validation() {
        let bad = CreateUser {
            name: "Alice".into(),
            email: "not-an-email".into(),
        };
        assert!(bad.validate().is_err());

        let ok = CreateUser {
            name: "Alice".into(),
            email: "a@b.com".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
