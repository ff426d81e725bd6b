use fieldsync_remote::{HttpRemoteStore, RemoteConfig, RemoteError, RemoteStore};
use fieldsync_types::FilterSet;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fields(value: serde_json::Value) -> fieldsync_types::Fields {
    value.as_object().expect("object literal").clone()
}

fn store_for(server: &MockServer) -> HttpRemoteStore {
    HttpRemoteStore::new(RemoteConfig {
        base_url: server.uri(),
        api_key: "anon-key".to_string(),
        timeout_secs: 5,
    })
}

#[tokio::test]
async fn insert_returns_store_assigned_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/volunteers"))
        .and(header("apikey", "anon-key"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([{"id": 17, "name": "Ada"}])),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let row = store
        .insert("volunteers", &fields(json!({"name": "Ada"})))
        .await
        .unwrap();

    assert_eq!(row.id().as_deref(), Some("17"));
    assert_eq!(row.get("name"), Some(&json!("Ada")));
}

#[tokio::test]
async fn select_sends_equality_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/surveys"))
        .and(query_param("select", "*"))
        .and(query_param("status", "eq.active"))
        .and(query_param("quality_score", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "S1", "status": "active", "quality_score": 5},
            {"id": "S2", "status": "active", "quality_score": 5},
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let filters = FilterSet::new().eq("status", "active").eq("quality_score", 5);
    let rows = store.select("surveys", &filters).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id().as_deref(), Some("S1"));
    assert_eq!(rows[1].id().as_deref(), Some("S2"));
}

#[tokio::test]
async fn select_with_no_matches_returns_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/surveys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let rows = store.select("surveys", &FilterSet::new()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn update_patches_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/surveys"))
        .and(query_param("id", "eq.S1"))
        .and(body_json(json!({"quality_score": 5})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "S1", "quality_score": 5}])),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let row = store
        .update("surveys", "S1", &fields(json!({"quality_score": 5})))
        .await
        .unwrap();
    assert_eq!(row.get("quality_score"), Some(&json!(5)));
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/surveys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store
        .update("surveys", "S404", &fields(json!({"quality_score": 5})))
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::NotFound(_)));
}

#[tokio::test]
async fn delete_issues_filtered_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/donors"))
        .and(query_param("id", "eq.D7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.delete("donors", "D7").await.unwrap();
}

#[tokio::test]
async fn rejection_carries_status_and_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/volunteers"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string("permission denied for table volunteers"),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store
        .insert("volunteers", &fields(json!({"name": "Ada"})))
        .await
        .unwrap_err();

    match err {
        RemoteError::Rejected { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "permission denied for table volunteers");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn object_upload_and_download() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/reports/2026/august.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "reports/2026/august.pdf"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/object/reports/2026/august.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pdf-bytes".to_vec()))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .upload_object("reports", "2026/august.pdf", b"pdf-bytes".to_vec())
        .await
        .unwrap();
    let content = store.download_object("reports", "2026/august.pdf").await.unwrap();
    assert_eq!(content, b"pdf-bytes");
}
