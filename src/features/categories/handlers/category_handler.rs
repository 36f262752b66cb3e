use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::categories::dtos::{
    CategoryPathDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::CategoryId;
use crate::features::categories::services::CategoryService;

/// List all categories
///
/// Flat list ordered by name, id breaking ties.
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryResponseDto>),
        (status = 500, description = "Store failure")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    let categories = service.list().await?;
    Ok(Json(categories))
}

/// Category forest as nested nodes
#[utoipa::path(
    get,
    path = "/categories/tree",
    responses(
        (status = 200, description = "Category tree, roots first", body = Vec<CategoryTreeDto>),
    ),
    tag = "categories"
)]
pub async fn get_category_tree(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryTreeDto>>> {
    let tree = service.list_tree().await?;
    Ok(Json(tree))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponseDto),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<Json<CategoryResponseDto>> {
    let category = service.get(id).await?;
    Ok(Json(category))
}

/// Breadcrumb of a category
#[utoipa::path(
    get,
    path = "/categories/{id}/path",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Ancestor chain of the category", body = CategoryPathDto),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category_path(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<Json<CategoryPathDto>> {
    let path = service.get_path(id).await?;
    Ok(Json(path))
}

/// Direct subcategories of a category
#[utoipa::path(
    get,
    path = "/categories/{id}/children",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Direct children, ordered by name", body = Vec<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn list_category_children(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    let children = service.list_children(id).await?;
    Ok(Json(children))
}

/// All categories below a category
#[utoipa::path(
    get,
    path = "/categories/{id}/descendants",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Descendants, breadth-first", body = Vec<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn list_category_descendants(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    let descendants = service.list_descendants(id).await?;
    Ok(Json(descendants))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryResponseDto),
        (status = 400, description = "Empty name or unknown parent")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<CategoryResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category
///
/// Omitted `parentId`/`description` keep their stored values; `null` clears them.
/// An unknown id is reported before any problem with the name.
#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponseDto),
        (status = 400, description = "Empty name, self-parent, cycle or unknown parent"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<CategoryResponseDto>> {
    let category = service.update(id, dto).await?;
    Ok(Json(category))
}

/// Delete a category without subcategories
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Category still has subcategories"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
