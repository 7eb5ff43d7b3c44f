use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryStatus};
use crate::shared::validation::NON_BLANK_REGEX;

/// Request DTO for creating a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NON_BLANK_REGEX, message = "name must not be blank")
    )]
    pub name: String,

    /// Parent category; omit to create a root
    pub parent_id: Option<Uuid>,

    /// Defaults to `active`
    #[serde(default)]
    pub status: CategoryStatus,
}

/// Request DTO for updating a category.
///
/// Setting `status` to `inactive` also deactivates every descendant.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NON_BLANK_REGEX, message = "name must not be blank")
    )]
    pub name: Option<String>,

    pub status: Option<CategoryStatus>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub status: CategoryStatus,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Node for `category` with no children attached yet
    pub fn leaf(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            status: category.status,
            children: Vec::new(),
        }
    }
}

/// Response DTO for descendant listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDescendantsDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Depth-first, each category before its own descendants
    pub descendant_ids: Vec<Uuid>,
}
