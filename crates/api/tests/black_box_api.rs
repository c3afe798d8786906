use std::path::Path;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use stockroom_api::app::{self, services};
use stockroom_infra::JsonFileStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(data_file: &Path) -> Self {
        // Same router as prod, backed by a temp file, bound to an ephemeral port.
        let store = JsonFileStore::open(data_file).expect("failed to open store");
        let services = services::with_store(Arc::new(store)).expect("failed to load store");
        let app = app::build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_item(client: &reqwest::Client, srv: &TestServer, body: Value) -> Value {
    let res = client.post(srv.url("/items")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["data"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(&dir.path().join("inventory.json")).await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn widget_lifecycle_create_adjust_reject() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(&dir.path().join("inventory.json")).await;
    let client = reqwest::Client::new();

    // Create
    let item = create_item(
        &client,
        &srv,
        json!({ "name": "Widget", "sku": "W-1", "location": "A1", "quantity": 10 }),
    )
    .await;
    assert_eq!(item["quantity"], 10);
    assert!(item["reorder_level"].is_null());
    let id = item["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 16);

    let res = client.get(srv.url("/movements")).send().await.unwrap();
    let movements: Value = res.json().await.unwrap();
    assert_eq!(movements["data"].as_array().unwrap().len(), 1);
    assert_eq!(movements["data"][0]["type"], "initial");
    assert_eq!(movements["data"][0]["quantity_change"], 10);

    // Adjust
    let res = client
        .post(srv.url(&format!("/items/{id}/adjust")))
        .json(&json!({ "delta": -3, "reason": "Dispatch test" }))
        .send()
        .await
        .unwrap();
    if res.status() != StatusCode::OK {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        panic!("expected 200 OK from adjust, got {status} body={body}");
    }
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["item"]["quantity"], 7);
    assert_eq!(body["data"]["movement"]["type"], "outbound");
    assert_eq!(body["data"]["movement"]["quantity_change"], -3);
    assert_eq!(body["data"]["movement"]["note"], "Dispatch test");

    // Overdraw is rejected and leaves stock alone
    let res = client
        .post(srv.url(&format!("/items/{id}/adjust")))
        .json(&json!({ "delta": -100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"]["delta"].is_string());

    let res = client.get(srv.url(&format!("/items/{id}"))).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["quantity"], 7);

    let res = client
        .get(srv.url(&format!("/items/{id}/movements")))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(&dir.path().join("inventory.json")).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/items"))
        .json(&json!({ "name": "", "quantity": -5, "reorder_level": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    let details = body["details"].as_object().unwrap();
    for field in ["name", "sku", "location", "quantity", "reorder_level"] {
        assert!(details.contains_key(field), "missing {field} in {details:?}");
    }

    let res = client.get(srv.url("/items")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(&dir.path().join("inventory.json")).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/items"))
        .header("content-type", "application/json")
        .body("{ nope")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid JSON payload");

    let item = create_item(
        &client,
        &srv,
        json!({ "name": "Bolt", "sku": "B-1", "location": "C3", "quantity": 1 }),
    )
    .await;
    let res = client
        .post(srv.url(&format!("/items/{}/adjust", item["id"].as_str().unwrap())))
        .json(&json!({ "delta": "lots" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_is_partial_and_rejects_quantity() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(&dir.path().join("inventory.json")).await;
    let client = reqwest::Client::new();

    let item = create_item(
        &client,
        &srv,
        json!({ "name": "Widget", "sku": "W-1", "location": "A1", "quantity": 4, "reorder_level": 2 }),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    let res = client
        .patch(srv.url(&format!("/items/{id}")))
        .json(&json!({ "quantity": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert!(body["details"]["quantity"].is_string());

    let res = client
        .put(srv.url(&format!("/items/{id}")))
        .json(&json!({ "location": "B9", "reorder_level": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["location"], "B9");
    assert_eq!(body["data"]["quantity"], 4);
    assert!(body["data"]["reorder_level"].is_null());
}

#[tokio::test]
async fn unknown_items_routes_and_methods() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(&dir.path().join("inventory.json")).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/items/0011223344556677")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(srv.url("/items/0011223344556677/adjust"))
        .json(&json!({ "delta": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.url("/warehouses")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Not found");

    let res = client.delete(srv.url("/movements")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn listings_are_sorted_and_low_stock_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(&dir.path().join("inventory.json")).await;
    let client = reqwest::Client::new();

    for (sku, qty, level) in [("C-3", 1, json!(5)), ("A-1", 9, json!(2)), ("B-2", 0, Value::Null)] {
        create_item(
            &client,
            &srv,
            json!({ "name": sku, "sku": sku, "location": "A1", "quantity": qty, "reorder_level": level }),
        )
        .await;
    }

    let res = client.get(srv.url("/items")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    let skus: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["sku"].as_str().unwrap())
        .collect();
    assert_eq!(skus, vec!["A-1", "B-2", "C-3"]);

    let res = client.get(srv.url("/reports/low-stock")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    let low = body["data"].as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["sku"], "C-3");
}

#[tokio::test]
async fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");
    let client = reqwest::Client::new();

    let (items, movements) = {
        let srv = TestServer::spawn(&path).await;
        let item = create_item(
            &client,
            &srv,
            json!({ "name": "Widget", "sku": "W-1", "location": "A1", "quantity": 10 }),
        )
        .await;
        let res = client
            .post(srv.url(&format!("/items/{}/adjust", item["id"].as_str().unwrap())))
            .json(&json!({ "delta": 5 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let items: Value = client.get(srv.url("/items")).send().await.unwrap().json().await.unwrap();
        let movements: Value = client.get(srv.url("/movements")).send().await.unwrap().json().await.unwrap();
        (items, movements)
    };

    let srv = TestServer::spawn(&path).await;
    let reloaded_items: Value = client.get(srv.url("/items")).send().await.unwrap().json().await.unwrap();
    let reloaded_movements: Value = client.get(srv.url("/movements")).send().await.unwrap().json().await.unwrap();

    assert_eq!(reloaded_items, items);
    assert_eq!(reloaded_movements, movements);
    assert_eq!(movements["data"][0]["note"], "Restock");
}
