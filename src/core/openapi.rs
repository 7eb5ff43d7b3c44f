use utoipa::{Modify, OpenApi};

use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::get_category_descendants,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_models::CategoryStatus,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryDescendantsDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::CategoryDescendantsDto>,
        )
    ),
    tags(
        (name = "categories", description = "Hierarchical categories"),
    ),
    info(
        title = "Kategori API",
        version = "0.1.0",
        description = "Hierarchical category management API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
