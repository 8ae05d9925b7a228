use std::future::Future;

use crate::criteria::Criteria;
use crate::entity::Entity;
use crate::error::DataError;
use crate::page::{PageRequest, Paginated};

/// Generic async repository contract over a single logical table,
/// parameterized by the entity, create-input and update-input shapes.
///
/// Uses RPITIT (return-position `impl Trait` in traits), so no
/// `async-trait` dependency is needed.
///
/// Semantics shared by all implementations:
///
/// - Criteria keys are entity field names; keys the entity's column map
///   does not know are silently dropped.
/// - `save` persists only [`Entity::writable_fields`]; server-managed
///   columns come from database defaults.
/// - `update` with no writable field present behaves as `find_by_id` and
///   does not touch `modified_at`; otherwise it stamps `modified_at`.
/// - Unknown ids resolve to `Ok(None)` / `Ok(false)`, never an error.
pub trait Repository<T, C, U>: Send + Sync
where
    T: Entity,
    C: Send + Sync,
    U: Send + Sync,
{
    fn find_by_id(&self, id: &T::Id) -> impl Future<Output = Result<Option<T>, DataError>> + Send;

    fn find_all(
        &self,
        page: &PageRequest,
    ) -> impl Future<Output = Result<Paginated<T>, DataError>> + Send;

    fn find_one(
        &self,
        criteria: &Criteria,
    ) -> impl Future<Output = Result<Option<T>, DataError>> + Send;

    fn find_many(
        &self,
        criteria: &Criteria,
        page: &PageRequest,
    ) -> impl Future<Output = Result<Paginated<T>, DataError>> + Send;

    fn save(&self, input: &C) -> impl Future<Output = Result<T, DataError>> + Send;

    fn update(
        &self,
        id: &T::Id,
        input: &U,
    ) -> impl Future<Output = Result<Option<T>, DataError>> + Send;

    /// Returns `true` iff a row existed and was removed or deactivated.
    fn delete(&self, id: &T::Id) -> impl Future<Output = Result<bool, DataError>> + Send;

    fn count(&self, criteria: &Criteria) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn exists(&self, criteria: &Criteria) -> impl Future<Output = Result<bool, DataError>> + Send;
}
