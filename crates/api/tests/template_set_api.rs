//! Integration tests for the template set endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;

#[tokio::test]
async fn starts_empty() {
    let response = get(common::build_test_app(), "/api/v1/template-set").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["revision"], 0);
    assert_eq!(json["data"]["templates"], json!([]));
}

#[tokio::test]
async fn add_then_select_then_prune() {
    let app = common::build_test_app();

    let response = post_json(
        app.clone(),
        "/api/v1/template-set/actions",
        json!({ "action": "add", "payload": "databases" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["revision"], 1);
    let id = json["data"]["templates"][0]["id"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/template-set/actions",
        json!({ "action": "select_value", "payload": { "id": id, "value": "_internal" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.clone(),
        "/api/v1/template-set/actions",
        json!({ "action": "prune_unselected" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app, "/api/v1/template-set").await).await;
    assert_eq!(json["data"]["revision"], 3);
    assert_eq!(json["data"]["templates"][0]["values"][0]["value"], "_internal");
}

#[tokio::test]
async fn removing_unknown_template_is_404() {
    let response = post_json(
        common::build_test_app(),
        "/api/v1/template-set/actions",
        json!({ "action": "remove", "payload": "00000000-0000-0000-0000-000000000000" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn duplicate_meta_query_is_conflict() {
    let app = common::build_test_app();
    let add = json!({ "action": "add", "payload": "influxql" });

    let first = post_json(app.clone(), "/api/v1/template-set/actions", add.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/api/v1/template-set/actions", add).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}
