// ── API-to-domain type conversions ──
//
// Bridges raw `altzone_api::types` records into canonical
// `altzone_core::model` types and builds request bodies from drafts.
// A create may answer with either the stored document or a bare
// `insertedId` receipt; both resolve to the same domain value.

use altzone_api::types::{
    Created, NewQuery, NewRecommendation, QueryRecord, QueryUpdate, RecommendationRecord,
};

use crate::model::{EntityId, Query, QueryDraft, Recommendation};

// ── Helpers ────────────────────────────────────────────────────────

/// Clamp the wire counter into the domain range. The server never
/// floors its `$inc -1`, so negative values do occur.
fn clamp_count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Queries ────────────────────────────────────────────────────────

impl From<QueryRecord> for Query {
    fn from(r: QueryRecord) -> Self {
        Self {
            id: EntityId::from(r.id),
            query_title: r.query_title,
            product_name: r.product_name,
            product_brand: r.product_brand,
            product_image: r.product_image,
            boycotting_reason: r.boycotting_reason,
            user_email: r.user_email,
            user_name: non_empty(r.user_name),
            user_image: non_empty(r.user_image),
            current_date: r.current_date,
            recommendation_count: clamp_count(r.recommendation_count),
        }
    }
}

impl From<&QueryDraft> for QueryUpdate {
    fn from(d: &QueryDraft) -> Self {
        Self {
            query_title: d.query_title.clone(),
            product_name: d.product_name.clone(),
            product_brand: d.product_brand.clone(),
            product_image: d.product_image.clone(),
            boycotting_reason: d.boycotting_reason.clone(),
        }
    }
}

/// Resolve the answer to `POST /queries` into the stored query.
pub fn query_from_created(created: Created<QueryRecord>, sent: &NewQuery) -> Query {
    match created {
        Created::Record(record) => record.into(),
        Created::Acknowledged { inserted_id } => Query {
            id: EntityId::from(inserted_id),
            query_title: sent.query_title.clone(),
            product_name: sent.product_name.clone(),
            product_brand: sent.product_brand.clone(),
            product_image: sent.product_image.clone(),
            boycotting_reason: sent.boycotting_reason.clone(),
            user_email: sent.user_email.clone(),
            user_name: sent.user_name.clone(),
            user_image: sent.user_image.clone(),
            current_date: sent.current_date,
            recommendation_count: clamp_count(sent.recommendation_count),
        },
    }
}

// ── Recommendations ────────────────────────────────────────────────

impl From<RecommendationRecord> for Recommendation {
    fn from(r: RecommendationRecord) -> Self {
        Self {
            id: EntityId::from(r.id),
            query_id: EntityId::from(r.query_id),
            query_title: r.query_title,
            product_name: r.product_name,
            user_email: non_empty(r.user_email),
            user_name: non_empty(r.user_name),
            recommendation_title: r.recommendation_title,
            recommended_product_name: r.recommended_product_name,
            recommended_product_image: r.recommended_product_image,
            recommendation_reason: r.recommendation_reason,
            recommender_email: r.recommender_email,
            recommender_name: non_empty(r.recommender_name),
            current_date: r.current_date,
        }
    }
}

/// Resolve the answer to `POST /recommendations` into the stored record.
pub fn recommendation_from_created(
    created: Created<RecommendationRecord>,
    sent: &NewRecommendation,
) -> Recommendation {
    match created {
        Created::Record(record) => record.into(),
        Created::Acknowledged { inserted_id } => Recommendation {
            id: EntityId::from(inserted_id),
            query_id: EntityId::from(sent.query_id.as_str()),
            query_title: sent.query_title.clone(),
            product_name: sent.product_name.clone(),
            user_email: non_empty(Some(sent.user_email.clone())),
            user_name: sent.user_name.clone(),
            recommendation_title: sent.recommendation_title.clone(),
            recommended_product_name: sent.recommended_product_name.clone(),
            recommended_product_image: sent.recommended_product_image.clone(),
            recommendation_reason: sent.recommendation_reason.clone(),
            recommender_email: sent.recommender_email.clone(),
            recommender_name: non_empty(Some(sent.recommender_name.clone())),
            current_date: sent.current_date,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn record(count: i64) -> QueryRecord {
        QueryRecord {
            id: "q1".into(),
            product_name: "iPhone 12".into(),
            product_brand: "Apple".into(),
            product_image: "https://img/1.png".into(),
            query_title: "Looking for a phone".into(),
            boycotting_reason: "Price".into(),
            user_email: "owner@example.com".into(),
            user_name: Some(String::new()),
            user_image: None,
            current_date: Utc::now(),
            recommendation_count: count,
        }
    }

    #[test]
    fn negative_wire_count_clamps_to_zero() {
        let q: Query = record(-2).into();
        assert_eq!(q.recommendation_count, 0);
        assert_eq!(q.user_name, None);
    }

    #[test]
    fn acknowledged_create_uses_sent_payload() {
        let sent = NewQuery {
            query_title: "t".into(),
            product_name: "p".into(),
            product_brand: "b".into(),
            product_image: "i".into(),
            boycotting_reason: "r".into(),
            user_email: "me@example.com".into(),
            user_name: Some("Me".into()),
            user_image: None,
            current_date: Utc::now(),
            recommendation_count: 0,
        };
        let q = query_from_created(
            Created::Acknowledged {
                inserted_id: "new-id".into(),
            },
            &sent,
        );
        assert_eq!(q.id.as_str(), "new-id");
        assert_eq!(q.user_email, "me@example.com");
        assert_eq!(q.recommendation_count, 0);
    }

    #[test]
    fn draft_to_update_carries_mutable_fields_only() {
        let q: Query = record(3).into();
        let update = QueryUpdate::from(&QueryDraft::from(&q));
        assert_eq!(update.product_name, "iPhone 12");
        assert_eq!(update.query_title, "Looking for a phone");
    }
}
