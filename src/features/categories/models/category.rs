use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Category status enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "category_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryStatus::Active => write!(f, "active"),
            CategoryStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Database model for category
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a category about to be inserted
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub status: CategoryStatus,
}

/// Partial update applied to one or many categories.
///
/// `parent_id` is doubly optional: `None` leaves the parent alone,
/// `Some(None)` detaches the category into a root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub status: Option<CategoryStatus>,
    pub parent_id: Option<Option<Uuid>>,
}

impl CategoryChanges {
    pub fn status(status: CategoryStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn parent(parent_id: Option<Uuid>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.parent_id.is_none()
    }

    /// Apply the changes to an in-memory record
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(ref name) = self.name {
            category.name = name.clone();
        }
        if let Some(status) = self.status {
            category.status = status;
        }
        if let Some(parent_id) = self.parent_id {
            category.parent_id = parent_id;
        }
    }
}
