//! SQLx/Postgres backend for the Waybill data layer.
//!
//! This crate provides the driver-specific half of the data access layer.
//! It depends on [`waybill_data`] for the abstract contracts and adds the
//! generic repository implementation and the error bridging needed to talk
//! to a real database.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PgRepository`] | Generic repository over a `PgPool`, one per entity |
//! | [`SqlxErrorExt`] | Extension trait classifying `sqlx::Error` into `DataError` |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Quick start
//!
//! ```ignore
//! use waybill_data_sqlx::PgRepository;
//!
//! pub type CountryRepository = PgRepository<Country, CreateCountry, UpdateCountry>;
//!
//! let repo = CountryRepository::new(pool.clone());
//! let page = repo.find_all(&PageRequest::default()).await?;
//! ```
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Use the [`SqlxErrorExt`] trait instead:
//!
//! ```ignore
//! use waybill_data_sqlx::SqlxErrorExt;
//!
//! let row = sqlx::query_as("SELECT ...")
//!     .fetch_one(&pool)
//!     .await
//!     .map_err(|e| e.into_data_error())?;
//! ```

pub mod error;
pub mod repository;

pub use error::{SqlxErrorExt, SqlxResult};
pub use repository::PgRepository;

/// Re-exports of the most commonly used types from both `waybill-data` and
/// this crate.
pub mod prelude {
    pub use crate::{PgRepository, SqlxErrorExt};
    pub use waybill_data::prelude::*;
}
