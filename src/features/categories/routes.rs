use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/categories/{id}/descendants",
            get(handlers::get_category_descendants),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::categories::models::Category;
    use crate::features::categories::stores::InMemoryCategoryStore;
    use crate::shared::test_helpers::named_category;

    fn server_with(categories: Vec<Category>) -> TestServer {
        let store = Arc::new(InMemoryCategoryStore::with_categories(categories));
        let service = Arc::new(CategoryService::new(store));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_list_tree_returns_nested_json() {
        let a = named_category("A", None);
        let b = named_category("B", Some(a.id));
        let server = server_with(vec![a.clone(), b.clone()]);

        let response = server
            .get("/api/categories")
            .add_query_param("tree", true)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["meta"]["total"], json!(1));
        assert_eq!(
            body["data"],
            json!([{
                "_id": a.id,
                "name": "A",
                "status": "active",
                "children": [{
                    "_id": b.id,
                    "name": "B",
                    "status": "active",
                    "children": [],
                }],
            }])
        );
    }

    #[tokio::test]
    async fn test_list_flat_by_default() {
        let a = named_category("A", None);
        let b = named_category("B", Some(a.id));
        let server = server_with(vec![a, b]);

        let response = server.get("/api/categories").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], json!(2));
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let server = server_with(vec![]);

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "Books" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let id = body["data"]["_id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["status"], json!("active"));

        let response = server.get(&format!("/api/categories/{}", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], json!("Books"));
    }

    #[tokio::test]
    async fn test_create_with_blank_name_is_rejected() {
        let server = server_with(vec![]);

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "   " }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_unknown_category_is_404() {
        let server = server_with(vec![]);
        let id = uuid::Uuid::now_v7();

        server
            .get(&format!("/api/categories/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/api/categories/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .put(&format!("/api/categories/{}", id))
            .json(&json!({ "status": "inactive" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deactivate_cascades_over_http() {
        let root = named_category("Root", None);
        let child = named_category("Child", Some(root.id));
        let server = server_with(vec![root.clone(), child.clone()]);

        server
            .put(&format!("/api/categories/{}", root.id))
            .json(&json!({ "status": "inactive" }))
            .await
            .assert_status_ok();

        let response = server.get(&format!("/api/categories/{}", child.id)).await;
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], json!("inactive"));
    }

    #[tokio::test]
    async fn test_delete_reparents_over_http() {
        let grandparent = named_category("Grandparent", None);
        let parent = named_category("Parent", Some(grandparent.id));
        let child = named_category("Child", Some(parent.id));
        let server = server_with(vec![grandparent.clone(), parent.clone(), child.clone()]);

        server
            .delete(&format!("/api/categories/{}", parent.id))
            .await
            .assert_status_ok();

        let response = server.get(&format!("/api/categories/{}", child.id)).await;
        let body: Value = response.json();
        assert_eq!(body["data"]["parent_id"], json!(grandparent.id));

        let response = server
            .get(&format!("/api/categories/{}/descendants", grandparent.id))
            .await;
        let body: Value = response.json();
        assert_eq!(body["data"]["descendant_ids"], json!([child.id]));
    }
}
