// Wire types for the AlternativeZone REST API.
//
// Field names follow the backend verbatim: documents are keyed by a
// MongoDB-style `_id`, query fields are snake_case except the counter,
// and recommendation foreign keys are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Queries ─────────────────────────────────────────────────────────

/// A product query as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_name: String,
    #[serde(default)]
    pub product_brand: String,
    #[serde(default)]
    pub product_image: String,
    #[serde(default)]
    pub query_title: String,
    #[serde(default)]
    pub boycotting_reason: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_image: Option<String>,
    pub current_date: DateTime<Utc>,
    /// Signed on the wire: an over-eager decrement can push it below zero.
    #[serde(rename = "recommendationCount", default)]
    pub recommendation_count: i64,
}

/// Body of `POST /queries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuery {
    pub query_title: String,
    pub product_name: String,
    pub product_brand: String,
    pub product_image: String,
    pub boycotting_reason: String,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    pub current_date: DateTime<Utc>,
    #[serde(rename = "recommendationCount")]
    pub recommendation_count: i64,
}

/// Body of `PUT /queries/{id}`: the mutable fields only, never the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUpdate {
    pub query_title: String,
    pub product_name: String,
    pub product_brand: String,
    pub product_image: String,
    pub boycotting_reason: String,
}

// ── Recommendations ─────────────────────────────────────────────────

/// A recommendation as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "queryId")]
    pub query_id: String,
    #[serde(rename = "queryTitle", default)]
    pub query_title: String,
    #[serde(rename = "productName", default)]
    pub product_name: String,
    #[serde(rename = "userEmail", default)]
    pub user_email: Option<String>,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub recommendation_title: String,
    #[serde(default)]
    pub recommended_product_name: String,
    #[serde(default)]
    pub recommended_product_image: String,
    #[serde(default)]
    pub recommendation_reason: String,
    #[serde(rename = "recommenderEmail", default)]
    pub recommender_email: String,
    #[serde(rename = "recommenderName", default)]
    pub recommender_name: Option<String>,
    pub current_date: DateTime<Utc>,
}

/// Body of `POST /recommendations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecommendation {
    #[serde(rename = "queryId")]
    pub query_id: String,
    #[serde(rename = "queryTitle")]
    pub query_title: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "userName", skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub recommendation_title: String,
    pub recommended_product_name: String,
    pub recommended_product_image: String,
    pub recommendation_reason: String,
    #[serde(rename = "recommenderEmail")]
    pub recommender_email: String,
    #[serde(rename = "recommenderName")]
    pub recommender_name: String,
    pub current_date: DateTime<Utc>,
}

// ── Create acknowledgement ──────────────────────────────────────────

/// Response to a `POST`: some deployments echo the stored document,
/// others return the driver's `{ acknowledged, insertedId }` receipt.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Created<T> {
    Record(T),
    Acknowledged {
        #[serde(rename = "insertedId")]
        inserted_id: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_record_defaults_missing_counter_to_zero() {
        let record: QueryRecord = serde_json::from_value(json!({
            "_id": "665f1c",
            "product_name": "iPhone 12",
            "current_date": "2024-06-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.recommendation_count, 0);
        assert!(record.user_image.is_none());
    }

    #[test]
    fn query_update_never_serializes_an_id() {
        let body = serde_json::to_value(QueryUpdate::default()).unwrap();
        assert!(body.get("_id").is_none());
        assert_eq!(body.as_object().unwrap().len(), 5);
    }

    #[test]
    fn new_recommendation_uses_backend_field_names() {
        let rec = NewRecommendation {
            query_id: "q1".into(),
            query_title: "Ditch it".into(),
            product_name: "Cola".into(),
            user_email: "owner@example.com".into(),
            user_name: None,
            recommendation_title: "Try this".into(),
            recommended_product_name: "Fizz".into(),
            recommended_product_image: "https://img/fizz.png".into(),
            recommendation_reason: "Local".into(),
            recommender_email: "me@example.com".into(),
            recommender_name: "Me".into(),
            current_date: "2024-06-01T10:00:00Z".parse().unwrap(),
        };
        let body = serde_json::to_value(rec).unwrap();
        assert_eq!(body["queryId"], "q1");
        assert_eq!(body["recommenderEmail"], "me@example.com");
        assert!(body.get("userName").is_none());
    }

    #[test]
    fn created_accepts_insert_acknowledgement() {
        let created: Created<QueryRecord> =
            serde_json::from_value(json!({ "acknowledged": true, "insertedId": "abc" })).unwrap();
        assert!(matches!(created, Created::Acknowledged { inserted_id } if inserted_id == "abc"));
    }
}
