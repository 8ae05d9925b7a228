use crate::criteria::SqlValue;

/// A builder for the small family of SQL statements the repositories need.
///
/// All values travel as `$n` bind parameters; all identifiers are validated
/// against a conservative pattern before they can appear in the statement
/// text. Column names are expected to come out of a
/// [`crate::ColumnMap`], so validation here is a second gate, not the
/// primary one.
///
/// # Example
///
/// ```ignore
/// let (sql, params) = QueryBuilder::new("users")
///     .where_eq("usr_em", "a@b.com")
///     .order_by("created_at", true)
///     .limit(10)
///     .build_select("*")?;
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    conditions: Vec<(String, Op, SqlValue)>,
    order: Vec<(String, bool)>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Eq,
    NotEq,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::NotEq => "!=",
        }
    }
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.conditions.push((column.into(), Op::Eq, value.into()));
        self
    }

    pub fn where_not_eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.conditions.push((column.into(), Op::NotEq, value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push((column.into(), ascending));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// Build a SELECT statement returning `(sql, bind_values)`.
    ///
    /// The `columns` parameter determines which columns to select
    /// (e.g. `"*"` or `"id, name"`).
    pub fn build_select(&self, columns: &str) -> Result<(String, Vec<SqlValue>), QueryError> {
        check_identifier(&self.table, false, "table")?;
        for part in columns.split(',') {
            check_identifier(part.trim(), true, "column")?;
        }
        let mut sql = format!("SELECT {columns} FROM {}", self.table);
        let params = self.append_where(&mut sql)?;
        self.append_order(&mut sql)?;
        self.append_limit_offset(&mut sql);
        Ok((sql, params))
    }

    /// Build a COUNT statement returning `(sql, bind_values)`.
    pub fn build_count(&self) -> Result<(String, Vec<SqlValue>), QueryError> {
        check_identifier(&self.table, false, "table")?;
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let params = self.append_where(&mut sql)?;
        Ok((sql, params))
    }

    /// Build an EXISTS probe returning `(sql, bind_values)`.
    pub fn build_exists(&self) -> Result<(String, Vec<SqlValue>), QueryError> {
        check_identifier(&self.table, false, "table")?;
        let mut inner = format!("SELECT 1 FROM {}", self.table);
        let params = self.append_where(&mut inner)?;
        Ok((format!("SELECT EXISTS ({inner})"), params))
    }

    /// Build an INSERT of the given column/value pairs, returning the full
    /// inserted row. An empty record inserts database-side defaults only.
    pub fn build_insert(
        &self,
        record: &[(String, SqlValue)],
    ) -> Result<(String, Vec<SqlValue>), QueryError> {
        check_identifier(&self.table, false, "table")?;
        if record.is_empty() {
            return Ok((
                format!("INSERT INTO {} DEFAULT VALUES RETURNING *", self.table),
                Vec::new(),
            ));
        }
        let mut columns = Vec::with_capacity(record.len());
        let mut placeholders = Vec::with_capacity(record.len());
        let mut params = Vec::with_capacity(record.len());
        for (i, (column, value)) in record.iter().enumerate() {
            check_identifier(column, false, "column")?;
            columns.push(column.as_str());
            placeholders.push(format!("${}", i + 1));
            params.push(value.clone());
        }
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            self.table,
            columns.join(", "),
            placeholders.join(", "),
        );
        Ok((sql, params))
    }

    /// Build an UPDATE of the given column/value pairs for a single row,
    /// returning the updated row.
    ///
    /// The id bind parameter is `$n+1`, after the SET values; the caller
    /// binds it last.
    pub fn build_update(
        &self,
        record: &[(String, SqlValue)],
        id_column: &str,
    ) -> Result<(String, Vec<SqlValue>), QueryError> {
        check_identifier(&self.table, false, "table")?;
        check_identifier(id_column, false, "column")?;
        let mut sets = Vec::with_capacity(record.len());
        let mut params = Vec::with_capacity(record.len());
        for (i, (column, value)) in record.iter().enumerate() {
            check_identifier(column, false, "column")?;
            sets.push(format!("{column} = ${}", i + 1));
            params.push(value.clone());
        }
        let sql = format!(
            "UPDATE {} SET {} WHERE {id_column} = ${} RETURNING *",
            self.table,
            sets.join(", "),
            record.len() + 1,
        );
        Ok((sql, params))
    }

    fn append_where(&self, sql: &mut String) -> Result<Vec<SqlValue>, QueryError> {
        let mut params = Vec::with_capacity(self.conditions.len());
        for (i, (column, op, value)) in self.conditions.iter().enumerate() {
            check_identifier(column, false, "column")?;
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!("{column} {} ${}", op.symbol(), i + 1));
            params.push(value.clone());
        }
        Ok(params)
    }

    fn append_order(&self, sql: &mut String) -> Result<(), QueryError> {
        if self.order.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(self.order.len());
        for (column, ascending) in &self.order {
            check_identifier(column, false, "column")?;
            clauses.push(format!(
                "{column} {}",
                if *ascending { "ASC" } else { "DESC" }
            ));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn append_limit_offset(&self, sql: &mut String) {
        if let Some(limit) = self.limit_val {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset_val {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }
}

#[derive(Debug, Clone)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

fn check_identifier(ident: &str, allow_star: bool, kind: &'static str) -> Result<(), QueryError> {
    if is_valid_identifier(ident, allow_star) {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier {
            kind,
            ident: ident.to_string(),
        })
    }
}

fn is_valid_identifier(ident: &str, allow_star: bool) -> bool {
    if allow_star && ident == "*" {
        return true;
    }
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        let (sql, params) = QueryBuilder::new("users").build_select("*").unwrap();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_where_eq_placeholders() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("usr_em", "a@b.com")
            .where_eq("is_active", true)
            .build_select("*")
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE usr_em = $1 AND is_active = $2"
        );
        assert_eq!(
            params,
            vec![SqlValue::Text("a@b.com".into()), SqlValue::Bool(true)]
        );
    }

    #[test]
    fn test_order_limit_offset() {
        let (sql, _) = QueryBuilder::new("countries")
            .where_eq("is_active", true)
            .order_by("created_at", false)
            .limit(20)
            .offset(40)
            .build_select("*")
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM countries WHERE is_active = $1 ORDER BY created_at DESC LIMIT 20 OFFSET 40"
        );
    }

    #[test]
    fn test_count_and_exists() {
        let (count, _) = QueryBuilder::new("users")
            .where_eq("is_active", true)
            .build_count()
            .unwrap();
        assert_eq!(count, "SELECT COUNT(*) FROM users WHERE is_active = $1");

        let (exists, _) = QueryBuilder::new("users")
            .where_eq("usr_em", "a@b.com")
            .build_exists()
            .unwrap();
        assert_eq!(
            exists,
            "SELECT EXISTS (SELECT 1 FROM users WHERE usr_em = $1)"
        );
    }

    #[test]
    fn test_insert() {
        let record = vec![
            ("code".to_string(), SqlValue::Text("US".into())),
            ("name".to_string(), SqlValue::Text("United States".into())),
        ];
        let (sql, params) = QueryBuilder::new("countries").build_insert(&record).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO countries (code, name) VALUES ($1, $2) RETURNING *"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insert_defaults_only() {
        let (sql, params) = QueryBuilder::new("countries").build_insert(&[]).unwrap();
        assert_eq!(sql, "INSERT INTO countries DEFAULT VALUES RETURNING *");
        assert!(params.is_empty());
    }

    #[test]
    fn test_update() {
        let record = vec![("name".to_string(), SqlValue::Text("Canada".into()))];
        let (sql, params) = QueryBuilder::new("countries")
            .build_update(&record, "id")
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE countries SET name = $1 WHERE id = $2 RETURNING *"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_where_not_eq() {
        let (sql, _) = QueryBuilder::new("countries")
            .where_eq("code", "US")
            .where_not_eq("id", "9a1f")
            .build_exists()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT EXISTS (SELECT 1 FROM countries WHERE code = $1 AND id != $2)"
        );
    }

    #[test]
    fn test_invalid_identifier() {
        let err = QueryBuilder::new("users;drop").build_select("*").unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { .. }));

        let err = QueryBuilder::new("users")
            .where_eq("email = '' OR 1=1 --", "x")
            .build_select("*")
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { .. }));
    }
}
