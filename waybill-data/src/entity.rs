use crate::column_map::ColumnMap;

/// Trait describing a persisted domain record: its table, its column map,
/// and which fields clients are allowed to write.
///
/// Every entity row carries `id`, `is_active`, `created_at` and
/// `modified_at`; those are server-managed and must never appear in
/// [`Entity::writable_fields`].
///
/// # Example
///
/// ```ignore
/// static COUNTRY_COLUMNS: ColumnMap = ColumnMap::new(&[
///     ("id", "id"),
///     ("code", "code"),
///     ("name", "name"),
///     ("isActive", "is_active"),
///     ("createdAt", "created_at"),
///     ("modifiedAt", "modified_at"),
/// ]);
///
/// impl Entity for Country {
///     type Id = Uuid;
///     fn table_name() -> &'static str { "countries" }
///     fn column_map() -> &'static ColumnMap { &COUNTRY_COLUMNS }
///     fn writable_fields() -> &'static [&'static str] { &["code", "name"] }
///     fn id(&self) -> &Uuid { &self.id }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    type Id: Send + Sync + 'static;

    fn table_name() -> &'static str;

    fn id_column() -> &'static str {
        "id"
    }

    fn column_map() -> &'static ColumnMap;

    /// Fields clients may set through create/update inputs. Anything not
    /// listed here is ignored when mapping an input to a row.
    fn writable_fields() -> &'static [&'static str];

    /// Entity field used for ordering when a list request names no sort
    /// field, or names one the column map does not know.
    fn default_sort_field() -> &'static str {
        "createdAt"
    }

    /// Whether `delete` deactivates the row (`is_active = FALSE`) instead
    /// of removing it. Listing only returns active rows for such entities.
    fn soft_delete() -> bool {
        true
    }

    fn id(&self) -> &Self::Id;
}
