#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use altzone_api::types::{Created, QueryUpdate};
use altzone_api::{ApiClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn query_json(id: &str, product: &str, date: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "product_name": product,
        "product_brand": "Acme",
        "product_image": "https://img.example/p.png",
        "query_title": format!("Alternative to {product}?"),
        "boycotting_reason": "Too pricey",
        "user_email": "owner@example.com",
        "user_name": "Owner",
        "user_image": "https://img.example/u.png",
        "current_date": date,
        "recommendationCount": 2
    })
}

// ── Query tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_all_queries() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/allqueries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            query_json("q1", "iPhone 12", "2024-06-01T10:00:00Z"),
            query_json("q2", "Android Tablet", "2024-06-02T10:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let queries = client.list_all_queries().await.unwrap();

    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].id, "q1");
    assert_eq!(queries[1].product_name, "Android Tablet");
    assert_eq!(queries[0].recommendation_count, 2);
}

#[tokio::test]
async fn test_list_user_queries_sends_email_param() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/queries"))
        .and(query_param("user_email", "owner@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let queries = client.list_user_queries("owner@example.com").await.unwrap();
    assert!(queries.is_empty());
}

#[tokio::test]
async fn test_get_query_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/queries/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Query not found" })))
        .mount(&server)
        .await;

    let result = client.get_query("missing").await;

    match result {
        Err(ref e @ Error::NotFound { ref path }) => {
            assert!(e.is_not_found());
            assert_eq!(path, "/api/queries/missing");
        }
        other => panic!("expected NotFound error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_query_sends_mutable_fields() {
    let (server, client) = setup().await;

    let update = QueryUpdate {
        query_title: "Better title".into(),
        product_name: "iPhone 12".into(),
        product_brand: "Apple".into(),
        product_image: "https://img.example/p.png".into(),
        boycotting_reason: "Repairability".into(),
    };

    Mock::given(method("PUT"))
        .and(path("/api/queries/q1"))
        .and(body_json(json!({
            "query_title": "Better title",
            "product_name": "iPhone 12",
            "product_brand": "Apple",
            "product_image": "https://img.example/p.png",
            "boycotting_reason": "Repairability"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "modifiedCount": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    client.update_query("q1", &update).await.unwrap();
}

#[tokio::test]
async fn test_counter_endpoints() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/queries/q1/increment-recommendations"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/queries/q1/decrement-recommendations"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.increment_recommendations("q1").await.unwrap();
    client.decrement_recommendations("q1").await.unwrap();
}

#[tokio::test]
async fn test_delete_query_keeps_id_inside_queries() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/queries/..%2Fallqueries"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/allqueries"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.delete_query("../allqueries").await;
    assert!(matches!(result, Err(Error::NotFound { .. })), "got: {result:?}");

    let result = client.delete_query("..").await;
    assert!(matches!(result, Err(Error::InvalidPathSegment(_))), "got: {result:?}");
}

// ── Recommendation tests ────────────────────────────────────────────

#[tokio::test]
async fn test_recommendations_for_user_encodes_email() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/recommendations-for-user/jo%23hn+x@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let recs = client
        .list_recommendations_for_user("jo#hn+x@example.com")
        .await
        .unwrap();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn test_list_query_recommendations() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/recommendations"))
        .and(query_param("queryId", "q1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "r1",
            "queryId": "q1",
            "queryTitle": "Alternative to iPhone 12?",
            "productName": "iPhone 12",
            "recommendation_title": "Go Pixel",
            "recommended_product_name": "Pixel 8",
            "recommended_product_image": "https://img.example/pixel.png",
            "recommendation_reason": "Cheaper",
            "recommenderEmail": "fan@example.com",
            "recommenderName": "Fan",
            "current_date": "2024-06-03T10:00:00Z"
        }])))
        .mount(&server)
        .await;

    let recs = client.list_query_recommendations("q1").await.unwrap();

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].query_id, "q1");
    assert_eq!(recs[0].recommender_name.as_deref(), Some("Fan"));
    assert!(recs[0].user_email.is_none());
}

#[tokio::test]
async fn test_list_queries_by_ids_joins_ids() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/recommendations/by-query-ids"))
        .and(query_param("queryIds", "q1,q2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list_queries_by_ids(&["q1", "q2"]).await.unwrap();
}

#[tokio::test]
async fn test_create_recommendation_acknowledged() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "acknowledged": true, "insertedId": "r9" })),
        )
        .mount(&server)
        .await;

    let body = altzone_api::types::NewRecommendation {
        query_id: "q1".into(),
        query_title: "t".into(),
        product_name: "p".into(),
        user_email: "owner@example.com".into(),
        user_name: None,
        recommendation_title: "r".into(),
        recommended_product_name: "n".into(),
        recommended_product_image: "i".into(),
        recommendation_reason: "why".into(),
        recommender_email: "fan@example.com".into(),
        recommender_name: "Fan".into(),
        current_date: "2024-06-03T10:00:00Z".parse().unwrap(),
    };

    let created = client.create_recommendation(&body).await.unwrap();
    assert!(matches!(created, Created::Acknowledged { ref inserted_id } if inserted_id == "r9"));
}

// ── Error / transport tests ─────────────────────────────────────────

#[tokio::test]
async fn test_server_error_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/recommendations/r1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let result = client.delete_recommendation("r1").await;

    match result {
        Err(ref e @ Error::Api { ref status, ref message }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "db down");
            assert!(e.is_transient());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.delete_query("q1").await;
    assert!(
        matches!(result, Err(Error::Unauthorized { .. })),
        "expected Unauthorized error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_bad_payload_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/recent-queries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_recent_queries().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_bearer("tok-123".to_string().into());
    let client = ApiClient::new(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/allqueries"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list_all_queries().await.unwrap();
}

#[tokio::test]
async fn test_timeout_reports_configured_limit() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout: Duration::from_secs(1),
        ..TransportConfig::default()
    };
    let client = ApiClient::new(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/allqueries"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client.list_all_queries().await;
    match result {
        Err(e @ Error::Timeout { timeout_secs: 1 }) => {
            assert_eq!(e.to_string(), "Request timed out after 1s");
        }
        other => panic!("expected Timeout error, got: {other:?}"),
    }
}
