mod category_dto;

pub use category_dto::{
    CategoryDescendantsDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
    UpdateCategoryDto,
};
