// ── Recommendation domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::query::require_non_empty;
use crate::error::CoreError;

/// An alternative product suggested against a [`Query`](super::Query).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: EntityId,
    pub query_id: EntityId,
    /// Copied from the parent query when the recommendation is written.
    pub query_title: String,
    pub product_name: String,
    /// Owner of the parent query, stamped at creation.
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub recommendation_title: String,
    pub recommended_product_name: String,
    pub recommended_product_image: String,
    pub recommendation_reason: String,
    pub recommender_email: String,
    pub recommender_name: Option<String>,
    pub current_date: DateTime<Utc>,
}

impl Recommendation {
    pub fn recommender_display(&self) -> &str {
        self.recommender_name.as_deref().unwrap_or("Unknown User")
    }
}

/// The add-recommendation form buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationDraft {
    pub recommendation_title: String,
    pub recommended_product_name: String,
    pub recommended_product_image: String,
    pub recommendation_reason: String,
}

impl RecommendationDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty(&[
            ("recommendation_title", &self.recommendation_title),
            ("recommended_product_name", &self.recommended_product_name),
            ("recommended_product_image", &self.recommended_product_image),
            ("recommendation_reason", &self.recommendation_reason),
        ])
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
