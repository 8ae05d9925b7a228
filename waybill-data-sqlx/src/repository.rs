use std::marker::PhantomData;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};

use waybill_data::{
    Criteria, DataError, Entity, PageRequest, Paginated, QueryBuilder, Repository, SqlValue,
};

use crate::error::SqlxErrorExt;

/// Generic Postgres repository, one instance per entity type.
///
/// `C` and `U` are the create and update input shapes. Any `Serialize`
/// type works: the input is decomposed into field/value pairs, gated by
/// [`Entity::writable_fields`], and mapped through the entity's column map
/// before binding. Server-managed columns (`id`, `created_at`,
/// `is_active`) come from database defaults and can never be set by an
/// input.
///
/// # Example
///
/// ```ignore
/// pub type CountryRepository = PgRepository<Country, CreateCountry, UpdateCountry>;
///
/// let repo = CountryRepository::new(pool.clone());
/// let country = repo.save(&input).await?;
/// ```
pub struct PgRepository<T, C, U> {
    pool: PgPool,
    _marker: PhantomData<fn() -> (T, C, U)>,
}

impl<T, C, U> PgRepository<T, C, U> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<T, C, U> Clone for PgRepository<T, C, U> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, C, U> PgRepository<T, C, U>
where
    T: Entity + for<'r> FromRow<'r, PgRow>,
    T::Id: sqlx::Type<Postgres> + for<'q> sqlx::Encode<'q, Postgres> + Clone,
    C: Serialize + Send + Sync,
    U: Serialize + Send + Sync,
{
    /// Insert `input` unless a row matching `conflict` already exists.
    ///
    /// The existence check and the insert run in a single transaction, so
    /// the check cannot race the write. A conflicting row yields
    /// [`DataError::UniqueViolation`] and the transaction rolls back.
    pub async fn save_guarded(&self, input: &C, conflict: &Criteria) -> Result<T, DataError> {
        let record = writable_record::<T>(input)?;
        let (exists_sql, exists_params) = criteria_builder::<T>(conflict).build_exists()?;
        let (insert_sql, insert_params) =
            QueryBuilder::new(T::table_name()).build_insert(&record)?;

        let mut tx = self.pool.begin().await.map_err(|e| e.into_data_error())?;
        let (found,): (bool,) = bind_all(sqlx::query_as(&exists_sql), &exists_params)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| e.into_data_error())?;
        if found {
            return Err(conflict_violation::<T>(conflict));
        }
        let entity: T = bind_all(sqlx::query_as(&insert_sql), &insert_params)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| e.into_data_error())?;
        tx.commit().await.map_err(|e| e.into_data_error())?;
        Ok(entity)
    }

    /// Update row `id` unless a *different* row matching `conflict`
    /// exists, atomically. An empty input degrades to `find_by_id`.
    pub async fn update_guarded(
        &self,
        id: &T::Id,
        input: &U,
        conflict: &Criteria,
    ) -> Result<Option<T>, DataError>
    where
        T::Id: Into<SqlValue>,
    {
        let mut record = writable_record::<T>(input)?;
        if record.is_empty() {
            return self.find_by_id(id).await;
        }
        record.push(modified_stamp::<T>());

        let id_value: SqlValue = id.clone().into();
        let (exists_sql, exists_params) = criteria_builder::<T>(conflict)
            .where_not_eq(T::id_column(), id_value)
            .build_exists()?;
        let (update_sql, update_params) =
            QueryBuilder::new(T::table_name()).build_update(&record, T::id_column())?;

        let mut tx = self.pool.begin().await.map_err(|e| e.into_data_error())?;
        let (found,): (bool,) = bind_all(sqlx::query_as(&exists_sql), &exists_params)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| e.into_data_error())?;
        if found {
            return Err(conflict_violation::<T>(conflict));
        }
        let entity: Option<T> = bind_all(sqlx::query_as(&update_sql), &update_params)
            .bind(id.clone())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| e.into_data_error())?;
        tx.commit().await.map_err(|e| e.into_data_error())?;
        Ok(entity)
    }

    async fn fetch_page(
        &self,
        builder: QueryBuilder,
        page: &PageRequest,
    ) -> Result<Paginated<T>, DataError> {
        let (count_sql, count_params) = builder.build_count()?;
        let (total,): (i64,) = bind_all(sqlx::query_as(&count_sql), &count_params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;

        let (sql, params) = builder
            .order_by(
                resolve_sort::<T>(page.sort_by.as_deref()),
                page.sort_order.is_ascending(),
            )
            .limit(page.clamped_limit())
            .offset(page.offset())
            .build_select("*")?;
        let items: Vec<T> = bind_all(sqlx::query_as(&sql), &params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;

        Ok(Paginated::new(items, page, total as u64))
    }
}

impl<T, C, U> Repository<T, C, U> for PgRepository<T, C, U>
where
    T: Entity + for<'r> FromRow<'r, PgRow>,
    T::Id: sqlx::Type<Postgres> + for<'q> sqlx::Encode<'q, Postgres> + Clone,
    C: Serialize + Send + Sync,
    U: Serialize + Send + Sync,
{
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1",
            T::table_name(),
            T::id_column()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id.clone())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| e.into_data_error())
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Paginated<T>, DataError> {
        let mut builder = QueryBuilder::new(T::table_name());
        if T::soft_delete() {
            builder = builder.where_eq(active_column::<T>(), true);
        }
        self.fetch_page(builder, page).await
    }

    async fn find_one(&self, criteria: &Criteria) -> Result<Option<T>, DataError> {
        let (sql, params) = criteria_builder::<T>(criteria).limit(1).build_select("*")?;
        bind_all(sqlx::query_as::<_, T>(&sql), &params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| e.into_data_error())
    }

    async fn find_many(
        &self,
        criteria: &Criteria,
        page: &PageRequest,
    ) -> Result<Paginated<T>, DataError> {
        self.fetch_page(criteria_builder::<T>(criteria), page).await
    }

    async fn save(&self, input: &C) -> Result<T, DataError> {
        let record = writable_record::<T>(input)?;
        let (sql, params) = QueryBuilder::new(T::table_name()).build_insert(&record)?;
        bind_all(sqlx::query_as::<_, T>(&sql), &params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.into_data_error())
    }

    async fn update(&self, id: &T::Id, input: &U) -> Result<Option<T>, DataError> {
        let mut record = writable_record::<T>(input)?;
        if record.is_empty() {
            // No writable field present: behave as a plain read, without
            // touching modified_at.
            return self.find_by_id(id).await;
        }
        record.push(modified_stamp::<T>());
        let (sql, params) = QueryBuilder::new(T::table_name()).build_update(&record, T::id_column())?;
        bind_all(sqlx::query_as::<_, T>(&sql), &params)
            .bind(id.clone())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| e.into_data_error())
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, DataError> {
        let result = if T::soft_delete() {
            let active = active_column::<T>();
            let sql = format!(
                "UPDATE {} SET {active} = FALSE, {} = $1 WHERE {} = $2 AND {active} = TRUE",
                T::table_name(),
                T::column_map().column_for("modifiedAt"),
                T::id_column(),
            );
            sqlx::query(&sql)
                .bind(Utc::now())
                .bind(id.clone())
                .execute(&self.pool)
                .await
        } else {
            let sql = format!(
                "DELETE FROM {} WHERE {} = $1",
                T::table_name(),
                T::id_column()
            );
            sqlx::query(&sql).bind(id.clone()).execute(&self.pool).await
        };
        result
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| e.into_data_error())
    }

    async fn count(&self, criteria: &Criteria) -> Result<u64, DataError> {
        let (sql, params) = criteria_builder::<T>(criteria).build_count()?;
        let (total,): (i64,) = bind_all(sqlx::query_as(&sql), &params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(total as u64)
    }

    async fn exists(&self, criteria: &Criteria) -> Result<bool, DataError> {
        let (sql, params) = criteria_builder::<T>(criteria).build_exists()?;
        let (found,): (bool,) = bind_all(sqlx::query_as(&sql), &params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(found)
    }
}

/// Bind every value onto the query, by variant. Values never reach the
/// SQL text itself.
fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in params {
        query = match value {
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Uuid(v) => query.bind(*v),
            SqlValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

/// Start a builder with `criteria` applied. Keys the column map does not
/// know are dropped here, silently; nothing client-supplied can name a
/// column.
fn criteria_builder<T: Entity>(criteria: &Criteria) -> QueryBuilder {
    let mut builder = QueryBuilder::new(T::table_name());
    for (field, value) in criteria.entries() {
        if let Some(column) = T::column_map().get(field) {
            builder = builder.where_eq(column, value.clone());
        }
    }
    builder
}

/// Decompose a create/update input into column/value pairs, keeping only
/// fields declared writable for the entity.
fn writable_record<T: Entity>(input: &impl Serialize) -> Result<Vec<(String, SqlValue)>, DataError> {
    let value = serde_json::to_value(input)
        .map_err(|e| DataError::Other(format!("input serialization failed: {e}")))?;
    let Value::Object(map) = value else {
        return Err(DataError::Other(
            "create/update input must serialize to an object".into(),
        ));
    };
    let mut record = Vec::with_capacity(map.len());
    for field in T::writable_fields() {
        if let Some(v) = map.get(*field) {
            let column = T::column_map().column_for(field).into_owned();
            record.push((column, SqlValue::from_json(v.clone())));
        }
    }
    Ok(record)
}

/// Resolve a requested sort field to a safe column, falling back to the
/// entity's default sort field when the request names an unmapped field.
fn resolve_sort<T: Entity>(sort_by: Option<&str>) -> String {
    sort_by
        .and_then(|field| T::column_map().get(field))
        .map(str::to_string)
        .unwrap_or_else(|| {
            T::column_map()
                .column_for(T::default_sort_field())
                .into_owned()
        })
}

fn active_column<T: Entity>() -> String {
    T::column_map().column_for("isActive").into_owned()
}

fn modified_stamp<T: Entity>() -> (String, SqlValue) {
    (
        T::column_map().column_for("modifiedAt").into_owned(),
        SqlValue::Timestamp(Utc::now()),
    )
}

fn conflict_violation<T: Entity>(conflict: &Criteria) -> DataError {
    DataError::UniqueViolation {
        constraint: None,
        field: conflict.first_field().map(str::to_string),
        message: format!("conflicting row already exists in {}", T::table_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use waybill_data::ColumnMap;

    static TEST_COLUMNS: ColumnMap = ColumnMap::new(&[
        ("id", "id"),
        ("code", "code"),
        ("name", "name"),
        ("isActive", "is_active"),
        ("createdAt", "created_at"),
        ("modifiedAt", "modified_at"),
    ]);

    #[derive(sqlx::FromRow)]
    struct Sample {
        id: Uuid,
    }

    impl Entity for Sample {
        type Id = Uuid;

        fn table_name() -> &'static str {
            "samples"
        }

        fn column_map() -> &'static ColumnMap {
            &TEST_COLUMNS
        }

        fn writable_fields() -> &'static [&'static str] {
            &["code", "name"]
        }

        fn id(&self) -> &Uuid {
            &self.id
        }
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SampleInput {
        code: String,
        name: String,
        // Not writable: must be ignored by the record mapping.
        is_active: bool,
    }

    #[test]
    fn test_writable_record_gates_fields() {
        let input = SampleInput {
            code: "US".into(),
            name: "United States".into(),
            is_active: false,
        };
        let record = writable_record::<Sample>(&input).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record[0], ("code".to_string(), SqlValue::Text("US".into())));
        assert_eq!(
            record[1],
            ("name".to_string(), SqlValue::Text("United States".into()))
        );
    }

    #[test]
    fn test_criteria_drops_unmapped_keys() {
        let criteria = Criteria::new()
            .with("code", "US")
            .with("evil; DROP TABLE samples", "x")
            .with("unknownField", 1i64);
        let (sql, params) = criteria_builder::<Sample>(&criteria)
            .build_select("*")
            .unwrap();
        assert_eq!(sql, "SELECT * FROM samples WHERE code = $1");
        assert_eq!(params, vec![SqlValue::Text("US".into())]);
    }

    #[test]
    fn test_resolve_sort_fallback() {
        assert_eq!(resolve_sort::<Sample>(Some("name")), "name");
        assert_eq!(resolve_sort::<Sample>(Some("nonexistent")), "created_at");
        assert_eq!(resolve_sort::<Sample>(None), "created_at");
    }
}
