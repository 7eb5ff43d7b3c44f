use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::CategoryStore;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryChanges, NewCategory};

const CATEGORY_COLUMNS: &str = "id, parent_id, name, status, created_at, updated_at";

/// PostgreSQL-backed category store
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append `SET ...` assignments for the requested changes.
fn push_assignments(builder: &mut QueryBuilder<'_, Postgres>, changes: &CategoryChanges) {
    builder.push("UPDATE categories SET updated_at = NOW()");

    if let Some(ref name) = changes.name {
        builder.push(", name = ").push_bind(name.clone());
    }
    if let Some(status) = changes.status {
        builder.push(", status = ").push_bind(status);
    }
    if let Some(parent_id) = changes.parent_id {
        builder.push(", parent_id = ").push_bind(parent_id);
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_all(&self) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories ORDER BY created_at, id",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories WHERE parent_id = $1 ORDER BY created_at, id",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list children of category {}: {:?}", parent_id, e);
                AppError::Database(e)
            })
    }

    async fn insert(&self, category: NewCategory) -> Result<Category> {
        let query = format!(
            r#"
            INSERT INTO categories (id, parent_id, name, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(Uuid::now_v7())
            .bind(category.parent_id)
            .bind(&category.name)
            .bind(category.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert category: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<Option<Category>> {
        let mut builder = QueryBuilder::new("");
        push_assignments(&mut builder, &changes);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(CATEGORY_COLUMNS);

        builder
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update category {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn bulk_update(&self, ids: &[Uuid], changes: CategoryChanges) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new("");
        push_assignments(&mut builder, &changes);
        builder.push(" WHERE id = ANY(").push_bind(ids.to_vec()).push(")");

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to bulk update {} categories: {:?}", ids.len(), e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
