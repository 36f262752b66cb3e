use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        categories_handlers::list_categories,
        categories_handlers::get_category_tree,
        categories_handlers::get_category,
        categories_handlers::get_category_path,
        categories_handlers::list_category_children,
        categories_handlers::list_category_descendants,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
    ),
    components(
        schemas(
            ApiResponse<String>,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryPathDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
        )
    ),
    tags(
        (name = "categories", description = "Hierarchical categories (public)"),
    ),
    info(
        title = "Category Tree API",
        version = "0.1.0",
        description = "API documentation for the category tree service",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_category_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/categories",
            "/categories/tree",
            "/categories/{id}",
            "/categories/{id}/path",
            "/categories/{id}/children",
            "/categories/{id}/descendants",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Shop".to_string(),
            version: "2.0.0".to_string(),
            description: "Shop categories".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Shop");
        assert_eq!(doc.info.version, "2.0.0");
        assert_eq!(doc.info.description.as_deref(), Some("Shop categories"));
    }
}
