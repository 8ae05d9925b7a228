pub mod column_map;
pub mod criteria;
pub mod entity;
pub mod error;
pub mod page;
pub mod query;
pub mod repository;

pub use column_map::{to_camel_case, to_entity, to_row, to_snake_case, ColumnMap};
pub use criteria::{Criteria, SqlValue};
pub use entity::Entity;
pub use error::DataError;
pub use page::{PageRequest, Paginated, SortOrder, DEFAULT_LIMIT, MAX_LIMIT};
pub use query::{QueryBuilder, QueryError};
pub use repository::Repository;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        ColumnMap, Criteria, DataError, Entity, PageRequest, Paginated, QueryBuilder, Repository,
        SortOrder, SqlValue,
    };
}
