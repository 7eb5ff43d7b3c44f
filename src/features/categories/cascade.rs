//! Store-backed mutations that ripple through the category hierarchy.
//!
//! Both routines trust that the category they are given exists; the caller
//! checks that first. Each step is its own store call and nothing is rolled
//! back, so an error part way through leaves the earlier steps applied.

use std::collections::HashSet;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{CategoryChanges, CategoryStatus};
use crate::features::categories::stores::CategoryStore;

/// Set `status` on every descendant of `category_id`.
///
/// Walks the hierarchy depth-first, re-reading the direct children of each
/// node from the store and updating each sibling group with a single bulk
/// write. The status of `category_id` itself is left to the caller.
pub async fn cascade_status(
    store: &dyn CategoryStore,
    category_id: Uuid,
    status: CategoryStatus,
) -> Result<()> {
    let mut visited = HashSet::from([category_id]);
    let mut pending = vec![category_id];

    while let Some(parent_id) = pending.pop() {
        let children: Vec<Uuid> = store
            .find_children(parent_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .filter(|id| visited.insert(*id))
            .collect();

        if children.is_empty() {
            continue;
        }

        store
            .bulk_update(&children, CategoryChanges::status(status))
            .await?;

        pending.extend(children.into_iter().rev());
    }

    Ok(())
}

/// Delete `category_id`, promoting its direct children to its former parent.
///
/// Grandchildren keep pointing at their own parents. Children of a deleted
/// root become roots.
pub async fn delete_and_reparent(store: &dyn CategoryStore, category_id: Uuid) -> Result<()> {
    // Must be read before the delete, it is the children's new parent
    let grandparent_id = store
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", category_id)))?
        .parent_id;

    let children: Vec<Uuid> = store
        .find_children(category_id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    if !children.is_empty() {
        store
            .bulk_update(&children, CategoryChanges::parent(grandparent_id))
            .await?;
    }

    store.delete_by_id(category_id).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::features::categories::models::{Category, NewCategory};
    use crate::features::categories::stores::InMemoryCategoryStore;
    use crate::shared::test_helpers::named_category;

    async fn status_of(store: &InMemoryCategoryStore, id: Uuid) -> CategoryStatus {
        store.find_by_id(id).await.unwrap().unwrap().status
    }

    async fn parent_of(store: &InMemoryCategoryStore, id: Uuid) -> Option<Uuid> {
        store.find_by_id(id).await.unwrap().unwrap().parent_id
    }

    #[tokio::test]
    async fn test_cascade_reaches_every_descendant() {
        let root = named_category("Root", None);
        let mid = named_category("Mid", Some(root.id));
        let leaf = named_category("Leaf", Some(mid.id));
        let store =
            InMemoryCategoryStore::with_categories(vec![root.clone(), mid.clone(), leaf.clone()]);

        cascade_status(&store, root.id, CategoryStatus::Inactive)
            .await
            .unwrap();

        assert_eq!(status_of(&store, mid.id).await, CategoryStatus::Inactive);
        assert_eq!(status_of(&store, leaf.id).await, CategoryStatus::Inactive);
        assert_eq!(status_of(&store, root.id).await, CategoryStatus::Active);
    }

    #[tokio::test]
    async fn test_cascade_leaves_sibling_subtrees_alone() {
        let root = named_category("Root", None);
        let target = named_category("Target", Some(root.id));
        let target_child = named_category("TargetChild", Some(target.id));
        let sibling = named_category("Sibling", Some(root.id));
        let sibling_child = named_category("SiblingChild", Some(sibling.id));
        let store = InMemoryCategoryStore::with_categories(vec![
            root.clone(),
            target.clone(),
            target_child.clone(),
            sibling.clone(),
            sibling_child.clone(),
        ]);

        cascade_status(&store, target.id, CategoryStatus::Inactive)
            .await
            .unwrap();

        assert_eq!(
            status_of(&store, target_child.id).await,
            CategoryStatus::Inactive
        );
        assert_eq!(status_of(&store, target.id).await, CategoryStatus::Active);
        assert_eq!(status_of(&store, root.id).await, CategoryStatus::Active);
        assert_eq!(status_of(&store, sibling.id).await, CategoryStatus::Active);
        assert_eq!(
            status_of(&store, sibling_child.id).await,
            CategoryStatus::Active
        );
    }

    #[tokio::test]
    async fn test_cascade_issues_one_bulk_update_per_sibling_group() {
        let root = named_category("Root", None);
        let a = named_category("A", Some(root.id));
        let b = named_category("B", Some(root.id));
        let a1 = named_category("A1", Some(a.id));
        let a2 = named_category("A2", Some(a.id));
        let store = InMemoryCategoryStore::with_categories(vec![root.clone(), a, b, a1, a2]);

        cascade_status(&store, root.id, CategoryStatus::Inactive)
            .await
            .unwrap();

        // {A, B} and {A1, A2}; B, A1 and A2 are leaves
        assert_eq!(store.operation_counts().bulk_updates, 2);
    }

    #[tokio::test]
    async fn test_cascade_on_leaf_writes_nothing() {
        let leaf = named_category("Leaf", None);
        let store = InMemoryCategoryStore::with_categories(vec![leaf.clone()]);

        cascade_status(&store, leaf.id, CategoryStatus::Inactive)
            .await
            .unwrap();

        let counts = store.operation_counts();
        assert_eq!(counts.reads, 1);
        assert_eq!(counts.bulk_updates, 0);
        assert_eq!(counts.deletes, 0);
    }

    #[tokio::test]
    async fn test_cascade_terminates_on_cycle() {
        let mut a = named_category("A", None);
        let b = named_category("B", Some(a.id));
        let c = named_category("C", Some(b.id));
        a.parent_id = Some(c.id);
        let store = InMemoryCategoryStore::with_categories(vec![a.clone(), b.clone(), c.clone()]);

        cascade_status(&store, a.id, CategoryStatus::Inactive)
            .await
            .unwrap();

        assert_eq!(status_of(&store, b.id).await, CategoryStatus::Inactive);
        assert_eq!(status_of(&store, c.id).await, CategoryStatus::Inactive);
        assert_eq!(status_of(&store, a.id).await, CategoryStatus::Active);
    }

    #[tokio::test]
    async fn test_cascade_can_reactivate() {
        let mut root = named_category("Root", None);
        root.status = CategoryStatus::Inactive;
        let mut child = named_category("Child", Some(root.id));
        child.status = CategoryStatus::Inactive;
        let store = InMemoryCategoryStore::with_categories(vec![root.clone(), child.clone()]);

        cascade_status(&store, root.id, CategoryStatus::Active)
            .await
            .unwrap();

        assert_eq!(status_of(&store, child.id).await, CategoryStatus::Active);
    }

    #[tokio::test]
    async fn test_delete_mid_tree_promotes_children_to_grandparent() {
        let grandparent = named_category("Grandparent", None);
        let parent = named_category("Parent", Some(grandparent.id));
        let child1 = named_category("Child1", Some(parent.id));
        let child2 = named_category("Child2", Some(parent.id));
        let grandchild = named_category("Grandchild", Some(child1.id));
        let store = InMemoryCategoryStore::with_categories(vec![
            grandparent.clone(),
            parent.clone(),
            child1.clone(),
            child2.clone(),
            grandchild.clone(),
        ]);

        delete_and_reparent(&store, parent.id).await.unwrap();

        assert_eq!(parent_of(&store, child1.id).await, Some(grandparent.id));
        assert_eq!(parent_of(&store, child2.id).await, Some(grandparent.id));
        assert_eq!(parent_of(&store, grandchild.id).await, Some(child1.id));
        assert!(store.find_by_id(parent.id).await.unwrap().is_none());
        assert!(store
            .find_all()
            .await
            .unwrap()
            .iter()
            .all(|c| c.parent_id != Some(parent.id)));
        assert_eq!(store.operation_counts().bulk_updates, 1);
    }

    #[tokio::test]
    async fn test_delete_root_turns_children_into_roots() {
        let root = named_category("Root", None);
        let child = named_category("Child", Some(root.id));
        let store = InMemoryCategoryStore::with_categories(vec![root.clone(), child.clone()]);

        delete_and_reparent(&store, root.id).await.unwrap();

        assert_eq!(parent_of(&store, child.id).await, None);
        assert!(store.find_by_id(root.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_leaf_skips_bulk_update() {
        let root = named_category("Root", None);
        let leaf = named_category("Leaf", Some(root.id));
        let store = InMemoryCategoryStore::with_categories(vec![root.clone(), leaf.clone()]);

        delete_and_reparent(&store, leaf.id).await.unwrap();

        let counts = store.operation_counts();
        assert_eq!(counts.bulk_updates, 0);
        assert_eq!(counts.deletes, 1);
        assert_eq!(store.find_all().await.unwrap(), vec![root]);
    }

    #[tokio::test]
    async fn test_delete_missing_category_writes_nothing() {
        let store = InMemoryCategoryStore::new();

        let result = delete_and_reparent(&store, Uuid::now_v7()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.operation_counts().deletes, 0);
    }

    /// Store that fails once a given number of child lookups have succeeded
    struct FailingStore {
        inner: InMemoryCategoryStore,
        child_reads_before_failure: usize,
        child_reads: AtomicUsize,
        fail_deletes: bool,
    }

    impl FailingStore {
        fn new(inner: InMemoryCategoryStore) -> Self {
            Self {
                inner,
                child_reads_before_failure: usize::MAX,
                child_reads: AtomicUsize::new(0),
                fail_deletes: false,
            }
        }
    }

    #[async_trait]
    impl CategoryStore for FailingStore {
        async fn find_all(&self) -> Result<Vec<Category>> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
            self.inner.find_by_id(id).await
        }

        async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Category>> {
            if self.child_reads.fetch_add(1, Ordering::SeqCst) >= self.child_reads_before_failure {
                return Err(AppError::Internal("store unavailable".to_string()));
            }
            self.inner.find_children(parent_id).await
        }

        async fn insert(&self, category: NewCategory) -> Result<Category> {
            self.inner.insert(category).await
        }

        async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<Option<Category>> {
            self.inner.update(id, changes).await
        }

        async fn bulk_update(&self, ids: &[Uuid], changes: CategoryChanges) -> Result<u64> {
            self.inner.bulk_update(ids, changes).await
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
            if self.fail_deletes {
                return Err(AppError::Internal("store unavailable".to_string()));
            }
            self.inner.delete_by_id(id).await
        }
    }

    #[tokio::test]
    async fn test_cascade_failure_keeps_completed_levels() {
        let root = named_category("Root", None);
        let mid = named_category("Mid", Some(root.id));
        let leaf = named_category("Leaf", Some(mid.id));
        let mut store = FailingStore::new(InMemoryCategoryStore::with_categories(vec![
            root.clone(),
            mid.clone(),
            leaf.clone(),
        ]));
        store.child_reads_before_failure = 1;

        let result = cascade_status(&store, root.id, CategoryStatus::Inactive).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(
            status_of(&store.inner, mid.id).await,
            CategoryStatus::Inactive
        );
        assert_eq!(status_of(&store.inner, leaf.id).await, CategoryStatus::Active);
    }

    #[tokio::test]
    async fn test_delete_failure_after_reparent_is_retryable() {
        let grandparent = named_category("Grandparent", None);
        let parent = named_category("Parent", Some(grandparent.id));
        let child = named_category("Child", Some(parent.id));
        let mut store = FailingStore::new(InMemoryCategoryStore::with_categories(vec![
            grandparent.clone(),
            parent.clone(),
            child.clone(),
        ]));
        store.fail_deletes = true;

        assert!(delete_and_reparent(&store, parent.id).await.is_err());
        assert_eq!(parent_of(&store.inner, child.id).await, Some(grandparent.id));
        assert!(store.find_by_id(parent.id).await.unwrap().is_some());

        store.fail_deletes = false;
        delete_and_reparent(&store, parent.id).await.unwrap();

        assert!(store.find_by_id(parent.id).await.unwrap().is_none());
        assert_eq!(parent_of(&store.inner, child.id).await, Some(grandparent.id));
    }
}
