//! Persistence backends for categories.
//!
//! The cascade engine and the service only talk to [`CategoryStore`]; each
//! method is a single round-trip to the backing store and there is no
//! transaction spanning several calls.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryChanges, NewCategory};

pub use memory::InMemoryCategoryStore;
pub use postgres::PgCategoryStore;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Every category, ordered by creation time
    async fn find_all(&self) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;

    /// Direct children of `parent_id`, ordered by creation time
    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Category>>;

    async fn insert(&self, category: NewCategory) -> Result<Category>;

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<Option<Category>>;

    /// Apply the same changes to every id in one batched write.
    /// Returns the number of rows touched.
    async fn bulk_update(&self, ids: &[Uuid], changes: CategoryChanges) -> Result<u64>;

    /// Returns false when no row matched
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;
}
