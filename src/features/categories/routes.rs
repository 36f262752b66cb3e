use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        // static segment must be registered alongside the {id} route
        .route("/categories/tree", get(handlers::get_category_tree))
        .route(
            "/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route("/categories/{id}/path", get(handlers::get_category_path))
        .route(
            "/categories/{id}/children",
            get(handlers::list_category_children),
        )
        .route(
            "/categories/{id}/descendants",
            get(handlers::list_category_descendants),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::{json, Value};

    use crate::features::categories::dtos::{
        CategoryPathDto, CategoryResponseDto, CategoryTreeDto,
    };
    use crate::features::categories::models::Category;
    use crate::features::categories::store::{CategoryStore, MemoryCategoryStore};

    fn server_with(store: Arc<dyn CategoryStore>) -> TestServer {
        let service = Arc::new(CategoryService::new(store));
        TestServer::new(routes(service)).unwrap()
    }

    fn server() -> TestServer {
        server_with(Arc::new(MemoryCategoryStore::new()))
    }

    async fn create(server: &TestServer, body: Value) -> CategoryResponseDto {
        let response = server.post("/categories").json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<CategoryResponseDto>()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let server = server();
        let food = create(&server, json!({"name": "Food", "description": "All food"})).await;
        assert_eq!(food.parent_id, None);
        assert_eq!(food.description.as_deref(), Some("All food"));

        let response = server.get(&format!("/categories/{}", food.id)).await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "id": food.id,
            "name": "Food",
            "description": "All food",
            "parentId": null
        }));
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let server = server();
        let response = server.get("/categories/42").await;
        response.assert_status_not_found();

        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_invalid_id_is_400() {
        server()
            .get("/categories/abc")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_blank_name_is_400() {
        let server = server();
        server
            .post("/categories")
            .json(&json!({"name": "   "}))
            .await
            .assert_status_bad_request();

        server
            .post("/categories")
            .json(&json!({"description": "no name"}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_with_missing_parent_is_400() {
        let server = server();
        let response = server
            .post("/categories")
            .json(&json!({"name": "Orphan", "parentId": 9999}))
            .await;
        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["message"], json!("Parent category 9999 does not exist"));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let server = server();
        create(&server, json!({"name": "Zucchini"})).await;
        create(&server, json!({"name": "Apples"})).await;
        create(&server, json!({"name": "Mangoes"})).await;

        let names: Vec<String> = server
            .get("/categories")
            .await
            .json::<Vec<CategoryResponseDto>>()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Apples", "Mangoes", "Zucchini"]);
    }

    #[tokio::test]
    async fn test_update_into_own_child_is_cycle() {
        let server = server();
        let a = create(&server, json!({"name": "A"})).await;
        let b = create(&server, json!({"name": "B", "parentId": a.id})).await;

        let response = server
            .put(&format!("/categories/{}", a.id))
            .json(&json!({"name": "A", "parentId": b.id}))
            .await;
        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(
            body["message"],
            json!("Cannot set a descendant category as parent (circular reference)")
        );

        server
            .put(&format!("/categories/{}", a.id))
            .json(&json!({"name": "A", "parentId": a.id}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        server()
            .put("/categories/77")
            .json(&json!({"name": "Ghost"}))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_update_missing_with_blank_name_is_404() {
        server()
            .put("/categories/77")
            .json(&json!({"name": "  "}))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_update_existing_with_blank_name_is_400() {
        let server = server();
        let a = create(&server, json!({"name": "A"})).await;

        let response = server
            .put(&format!("/categories/{}", a.id))
            .json(&json!({"name": "  "}))
            .await;
        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Category name is required")
        );
    }

    #[tokio::test]
    async fn test_name_length_measured_after_trim() {
        let server = server();
        let max = "x".repeat(255);

        let created = create(&server, json!({"name": format!("{}  ", max)})).await;
        assert_eq!(created.name, max);

        let updated = server
            .put(&format!("/categories/{}", created.id))
            .json(&json!({"name": format!("  {}", max)}))
            .await
            .json::<CategoryResponseDto>();
        assert_eq!(updated.name, max);

        server
            .post("/categories")
            .json(&json!({"name": format!("{}x", max)}))
            .await
            .assert_status_bad_request();
        server
            .put(&format!("/categories/{}", created.id))
            .json(&json!({"name": format!("{}x", max)}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_update_partial_and_clear_parent() {
        let server = server();
        let a = create(&server, json!({"name": "A"})).await;
        let b = create(
            &server,
            json!({"name": "B", "parentId": a.id, "description": "keep me"}),
        )
        .await;

        let renamed = server
            .put(&format!("/categories/{}", b.id))
            .json(&json!({"name": "  Bee  "}))
            .await
            .json::<CategoryResponseDto>();
        assert_eq!(renamed.name, "Bee");
        assert_eq!(renamed.parent_id, Some(a.id));
        assert_eq!(renamed.description.as_deref(), Some("keep me"));

        let moved = server
            .put(&format!("/categories/{}", b.id))
            .json(&json!({"name": "Bee", "parentId": null}))
            .await
            .json::<CategoryResponseDto>();
        assert_eq!(moved.parent_id, None);
    }

    #[tokio::test]
    async fn test_delete_scenarios() {
        let server = server();
        let a = create(&server, json!({"name": "A"})).await;
        server
            .delete(&format!("/categories/{}", a.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/categories/{}", a.id))
            .await
            .assert_status_not_found();

        let a = create(&server, json!({"name": "A"})).await;
        let b = create(&server, json!({"name": "B", "parentId": a.id})).await;
        let response = server.delete(&format!("/categories/{}", a.id)).await;
        response.assert_status_bad_request();
        let message = response.json::<Value>()["message"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        assert!(message.contains("subcategories"));

        server
            .delete(&format!("/categories/{}", b.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/categories/{}", a.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_path_endpoint() {
        let server = server();
        let a = create(&server, json!({"name": "A"})).await;
        let b = create(&server, json!({"name": "B", "parentId": a.id})).await;
        let c = create(&server, json!({"name": "C", "parentId": b.id})).await;

        let path = server
            .get(&format!("/categories/{}/path", c.id))
            .await
            .json::<CategoryPathDto>();
        assert_eq!(path.ancestors, vec!["A", "B"]);
        assert_eq!(path.path, "A / B");
        assert!(!path.has_children);

        let root = server
            .get(&format!("/categories/{}/path", a.id))
            .await
            .json::<CategoryPathDto>();
        assert!(root.ancestors.is_empty());
        assert!(root.has_children);

        server
            .get("/categories/999/path")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_tree_children_descendants() {
        let server = server();
        let food = create(&server, json!({"name": "Food"})).await;
        let fruits = create(&server, json!({"name": "Fruits", "parentId": food.id})).await;
        create(&server, json!({"name": "Dairy", "parentId": food.id})).await;
        create(&server, json!({"name": "Apples", "parentId": fruits.id})).await;
        create(&server, json!({"name": "Electronics"})).await;

        let tree = server
            .get("/categories/tree")
            .await
            .json::<Vec<CategoryTreeDto>>();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].name, "Food");
        assert_eq!(tree[1].children.len(), 2);

        let children = server
            .get(&format!("/categories/{}/children", food.id))
            .await
            .json::<Vec<CategoryResponseDto>>();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dairy", "Fruits"]);

        let descendants = server
            .get(&format!("/categories/{}/descendants", food.id))
            .await
            .json::<Vec<CategoryResponseDto>>();
        assert_eq!(descendants.len(), 3);
    }

    #[tokio::test]
    async fn test_corrupted_chain_is_500() {
        let now = Utc::now();
        let row = |id, name: &str, parent_id| Category {
            id,
            parent_id,
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        let store = MemoryCategoryStore::with_rows(vec![
            row(1, "A", Some(2)),
            row(2, "B", Some(1)),
            row(3, "C", None),
        ]);
        let server = server_with(Arc::new(store));

        server
            .put("/categories/3")
            .json(&json!({"name": "C", "parentId": 1}))
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        // Reads still terminate on the loop
        server
            .get("/categories/1/path")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        server()
            .post("/categories")
            .content_type("application/json")
            .text("{not json")
            .await
            .assert_status_bad_request();
    }
}
