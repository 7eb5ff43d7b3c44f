use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::categories::dtos::{
    CategoryDescendantsDto, CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing categories
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// List all categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "Flat list of categories, or a forest of CategoryTreeDto when tree=true", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let (value, total) = if query.tree {
        let tree = service.list_tree().await?;
        let total = tree.len();
        (to_value(tree)?, total)
    } else {
        let categories = service.list().await?;
        let total = categories.len();
        (to_value(categories)?, total)
    };

    Ok(Json(ApiResponse::success(
        Some(value),
        None,
        Some(Meta {
            total: total as i64,
        }),
    )))
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// List the ids of every descendant of a category
#[utoipa::path(
    get,
    path = "/api/categories/{id}/descendants",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Descendant ids, depth-first", body = ApiResponse<CategoryDescendantsDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category_descendants(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryDescendantsDto>>> {
    let descendants = service.descendants(id).await?;
    Ok(Json(ApiResponse::success(Some(descendants), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error or unknown parent")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category),
            Some("Category created".to_string()),
            None,
        )),
    ))
}

/// Update a category's name and/or status
///
/// Setting the status to `inactive` deactivates every descendant too.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(category),
        Some("Category updated".to_string()),
        None,
    )))
}

/// Delete a category
///
/// Its direct children are moved under its former parent.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted".to_string()),
        None,
    )))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize categories: {}", e)))
}
