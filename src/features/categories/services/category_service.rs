use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::cascade;
use crate::features::categories::dtos::{
    CategoryDescendantsDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
    UpdateCategoryDto,
};
use crate::features::categories::models::{Category, CategoryChanges, CategoryStatus, NewCategory};
use crate::features::categories::stores::CategoryStore;
use crate::features::categories::tree;

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// List all categories (flat list)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.store.find_all().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// List all categories as tree structure
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.store.find_all().await?;
        Ok(tree::build_tree(&categories))
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        self.require(id).await.map(Into::into)
    }

    /// Ids of every descendant of a category
    pub async fn descendants(&self, id: Uuid) -> Result<CategoryDescendantsDto> {
        let categories = self.store.find_all().await?;
        if !categories.iter().any(|c| c.id == id) {
            return Err(not_found(id));
        }

        Ok(CategoryDescendantsDto {
            id,
            descendant_ids: tree::descendant_ids(id, &categories),
        })
    }

    /// Create a category under an existing parent (or as a root)
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        if let Some(parent_id) = dto.parent_id {
            if self.store.find_by_id(parent_id).await?.is_none() {
                return Err(AppError::BadRequest(format!(
                    "Parent category {} does not exist",
                    parent_id
                )));
            }
        }

        let category = self
            .store
            .insert(NewCategory {
                name: dto.name.trim().to_string(),
                parent_id: dto.parent_id,
                status: dto.status,
            })
            .await?;

        tracing::info!(
            "Category created: id={}, parent_id={:?}",
            category.id,
            category.parent_id
        );

        Ok(category.into())
    }

    /// Update name and/or status.
    ///
    /// Deactivating a category deactivates all of its descendants as well.
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        self.require(id).await?;

        let changes = CategoryChanges {
            name: dto.name.map(|n| n.trim().to_string()),
            status: dto.status,
            parent_id: None,
        };
        if changes.is_empty() {
            return Err(AppError::BadRequest(
                "At least one of name or status must be provided".to_string(),
            ));
        }

        let category = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        if dto.status == Some(CategoryStatus::Inactive) {
            cascade::cascade_status(self.store.as_ref(), id, CategoryStatus::Inactive).await?;
            tracing::info!("Category {} deactivated along with its descendants", id);
        }

        Ok(category.into())
    }

    /// Delete a category, attaching its children to its former parent
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let category = self.require(id).await?;

        cascade::delete_and_reparent(self.store.as_ref(), id).await?;

        tracing::info!(
            "Category {} deleted, children moved to {:?}",
            id,
            category.parent_id
        );

        Ok(())
    }

    async fn require(&self, id: Uuid) -> Result<Category> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category with id {} not found", id))
}
