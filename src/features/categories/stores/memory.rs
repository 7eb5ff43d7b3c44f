use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CategoryStore;
use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryChanges, NewCategory};

/// Number of store calls issued, per kind of operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(dead_code)]
pub struct OperationCounts {
    pub reads: usize,
    pub writes: usize,
    pub bulk_updates: usize,
    pub deletes: usize,
}

/// Process-local category store.
///
/// Records are kept in insertion order, which doubles as the creation-time
/// ordering the PostgreSQL backend returns.
#[derive(Default)]
pub struct InMemoryCategoryStore {
    categories: RwLock<Vec<Category>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    bulk_updates: AtomicUsize,
    deletes: AtomicUsize,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, kept in the given order
    #[allow(dead_code)]
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            categories: RwLock::new(categories),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn operation_counts(&self) -> OperationCounts {
        OperationCounts {
            reads: self.reads.load(Ordering::SeqCst),
            writes: self.writes.load(Ordering::SeqCst),
            bulk_updates: self.bulk_updates.load(Ordering::SeqCst),
            deletes: self.deletes.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_all(&self) -> Result<Vec<Category>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.categories.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Category>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn insert(&self, category: NewCategory) -> Result<Category> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let record = Category {
            id: Uuid::now_v7(),
            parent_id: category.parent_id,
            name: category.name,
            status: category.status,
            created_at: now,
            updated_at: now,
        };

        self.categories.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<Option<Category>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut categories = self.categories.write().await;

        Ok(categories.iter_mut().find(|c| c.id == id).map(|category| {
            changes.apply_to(category);
            category.updated_at = Utc::now();
            category.clone()
        }))
    }

    async fn bulk_update(&self, ids: &[Uuid], changes: CategoryChanges) -> Result<u64> {
        self.bulk_updates.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let mut touched = 0;

        for category in self
            .categories
            .write()
            .await
            .iter_mut()
            .filter(|c| ids.contains(&c.id))
        {
            changes.apply_to(category);
            category.updated_at = now;
            touched += 1;
        }

        Ok(touched)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() < before)
    }
}
