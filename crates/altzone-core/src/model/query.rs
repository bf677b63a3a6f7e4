// ── Query domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use crate::error::CoreError;

/// A user's request for alternatives to a named product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: EntityId,
    pub query_title: String,
    pub product_name: String,
    pub product_brand: String,
    pub product_image: String,
    pub boycotting_reason: String,
    pub user_email: String,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
    pub current_date: DateTime<Utc>,
    /// Denormalized count of live recommendations. Only ever moved by
    /// the increment/decrement side effects of recommendation writes.
    pub recommendation_count: u32,
}

impl Query {
    /// Overwrite the mutable fields with an edit buffer.
    pub fn apply_draft(&mut self, draft: &QueryDraft) {
        self.query_title.clone_from(&draft.query_title);
        self.product_name.clone_from(&draft.product_name);
        self.product_brand.clone_from(&draft.product_brand);
        self.product_image.clone_from(&draft.product_image);
        self.boycotting_reason.clone_from(&draft.boycotting_reason);
    }

    /// Shift the local counter by `delta`, saturating at zero.
    pub fn adjust_recommendation_count(&mut self, delta: i32) {
        self.recommendation_count = self.recommendation_count.saturating_add_signed(delta);
    }
}

/// Buffer for the user-editable fields of a query.
///
/// Backs both the add-query form and the edit prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDraft {
    pub query_title: String,
    pub product_name: String,
    pub product_brand: String,
    pub product_image: String,
    pub boycotting_reason: String,
}

impl QueryDraft {
    /// Every field is required.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("query_title", &self.query_title),
            ("product_name", &self.product_name),
            ("product_brand", &self.product_brand),
            ("product_image", &self.product_image),
            ("boycotting_reason", &self.boycotting_reason),
        ];
        require_non_empty(&fields)
    }
}

impl From<&Query> for QueryDraft {
    fn from(q: &Query) -> Self {
        Self {
            query_title: q.query_title.clone(),
            product_name: q.product_name.clone(),
            product_brand: q.product_brand.clone(),
            product_image: q.product_image.clone(),
            boycotting_reason: q.boycotting_reason.clone(),
        }
    }
}

pub(crate) fn require_non_empty(fields: &[(&str, &String)]) -> Result<(), CoreError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation {
            message: format!("required fields are empty: {}", missing.join(", ")),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn draft_validation_names_missing_fields() {
        let draft = QueryDraft {
            query_title: "Alternatives?".into(),
            product_name: "  ".into(),
            ..QueryDraft::default()
        };
        let err = draft.validate().unwrap_err();
        let CoreError::Validation { message } = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("product_name"));
        assert!(message.contains("boycotting_reason"));
        assert!(!message.contains("query_title"));
    }

    #[test]
    fn counter_saturates_at_zero() {
        let mut q = Query {
            id: EntityId::from("q1"),
            query_title: String::new(),
            product_name: String::new(),
            product_brand: String::new(),
            product_image: String::new(),
            boycotting_reason: String::new(),
            user_email: String::new(),
            user_name: None,
            user_image: None,
            current_date: Utc::now(),
            recommendation_count: 1,
        };
        q.adjust_recommendation_count(-3);
        assert_eq!(q.recommendation_count, 0);
        q.adjust_recommendation_count(2);
        assert_eq!(q.recommendation_count, 2);
    }
}
