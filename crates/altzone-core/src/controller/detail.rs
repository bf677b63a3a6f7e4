// ── Query detail controller ──
//
// Loads one query together with its recommendations and appends new
// recommendations. The parent query is essential: if it cannot be
// loaded the whole view fails. The recommendation list is supplementary:
// a failure there leaves it empty and only queues a warning.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use altzone_api::ApiClient;
use altzone_api::types::NewRecommendation;

use super::until_cancelled;
use crate::convert::recommendation_from_created;
use crate::error::CoreError;
use crate::model::{EntityId, Query, Recommendation, RecommendationDraft};
use crate::notice::{Notice, Notices};
use crate::reconcile::CounterLedger;
use crate::session::Session;

/// State of the parent query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    #[default]
    Idle,
    Loading,
    Ready(Query),
    /// The server has no query with this id.
    NotFound,
    Failed(String),
}

/// How an added recommendation landed on the parent's counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Record created and counter incremented.
    Counted,
    /// Record created but the increment failed; the query is now in the
    /// ledger and its local counter was left unchanged.
    CountDirty,
}

pub struct QueryDetail {
    api: ApiClient,
    session: Session,
    query_id: EntityId,
    state: DetailState,
    recommendations: Vec<Recommendation>,
    draft: RecommendationDraft,
    ledger: CounterLedger,
    notices: Notices,
    cancel: CancellationToken,
}

impl QueryDetail {
    pub fn new(api: ApiClient, session: Session, query_id: EntityId) -> Self {
        Self {
            api,
            session,
            query_id,
            state: DetailState::Idle,
            recommendations: Vec::new(),
            draft: RecommendationDraft::default(),
            ledger: CounterLedger::new(),
            notices: Notices::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Fetch the query and its recommendations concurrently.
    ///
    /// Returns an error only when the parent query could not be loaded.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        self.state = DetailState::Loading;
        let id = self.query_id.as_str();

        let (parent, children) = tokio::join!(
            until_cancelled(&self.cancel, self.api.get_query(id)),
            until_cancelled(&self.cancel, self.api.list_query_recommendations(id)),
        );

        if matches!(parent, Err(CoreError::Cancelled)) {
            debug!(query = %self.query_id, "detail load discarded, view closed");
            self.state = DetailState::Idle;
            return Err(CoreError::Cancelled);
        }

        match children {
            Ok(records) => {
                self.recommendations = records.into_iter().map(Recommendation::from).collect();
            }
            Err(e) => {
                warn!(query = %self.query_id, error = %e, "failed to load recommendations");
                self.recommendations.clear();
                self.notices
                    .push(Notice::warning(format!("Could not load recommendations: {e}")));
            }
        }

        match parent {
            Ok(record) => {
                self.state = DetailState::Ready(record.into());
                debug!(
                    query = %self.query_id,
                    recommendations = self.recommendations.len(),
                    "detail loaded"
                );
                Ok(())
            }
            Err(CoreError::NotFound { .. }) => {
                self.state = DetailState::NotFound;
                Err(CoreError::not_found("query", &self.query_id))
            }
            Err(e) => {
                self.state = DetailState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    // ── Add recommendation ───────────────────────────────────────────

    pub fn draft(&self) -> &RecommendationDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut RecommendationDraft {
        &mut self.draft
    }

    /// Create a recommendation from the draft, then bump the parent's
    /// counter.
    ///
    /// Without a session this fails with `Unauthorized` before any
    /// network call. The two writes are not atomic: when the increment
    /// fails after a successful create, the new record is still appended,
    /// the local counter is left alone and the query is marked dirty in
    /// the ledger for [`reconcile_counters`](Self::reconcile_counters).
    pub async fn add_recommendation(&mut self) -> Result<AddOutcome, CoreError> {
        let result = self.commit_recommendation().await;
        match &result {
            Ok(AddOutcome::Counted) => {
                self.notices.push(Notice::success("Recommendation added"));
            }
            Ok(AddOutcome::CountDirty) => self.notices.push(Notice::warning(
                "Recommendation added, but the recommendation count could not be updated",
            )),
            Err(CoreError::Cancelled) => {}
            Err(e) => self
                .notices
                .push(Notice::error(format!("Failed to add recommendation: {e}"))),
        }
        result
    }

    async fn commit_recommendation(&mut self) -> Result<AddOutcome, CoreError> {
        let user = self.session.require_user("add a recommendation")?;
        let DetailState::Ready(query) = &self.state else {
            return Err(CoreError::not_found("query", &self.query_id));
        };
        self.draft.validate()?;

        let body = NewRecommendation {
            query_id: query.id.to_string(),
            query_title: query.query_title.clone(),
            product_name: query.product_name.clone(),
            user_email: query.user_email.clone(),
            user_name: query.user_name.clone(),
            recommendation_title: self.draft.recommendation_title.clone(),
            recommended_product_name: self.draft.recommended_product_name.clone(),
            recommended_product_image: self.draft.recommended_product_image.clone(),
            recommendation_reason: self.draft.recommendation_reason.clone(),
            recommender_email: user.email.clone(),
            recommender_name: user.name().to_owned(),
            current_date: Utc::now(),
        };

        let created = until_cancelled(&self.cancel, self.api.create_recommendation(&body)).await?;
        let recommendation = recommendation_from_created(created, &body);
        info!(
            query = %self.query_id,
            recommendation = %recommendation.id,
            "recommendation created"
        );
        self.recommendations.push(recommendation);
        self.draft.clear();

        let bumped = until_cancelled(
            &self.cancel,
            self.api.increment_recommendations(self.query_id.as_str()),
        )
        .await;

        match bumped {
            Ok(()) => {
                if let DetailState::Ready(query) = &mut self.state {
                    query.adjust_recommendation_count(1);
                }
                Ok(AddOutcome::Counted)
            }
            Err(e) => {
                warn!(query = %self.query_id, error = %e, "increment failed after create");
                self.ledger.mark(&self.query_id, 1);
                Ok(AddOutcome::CountDirty)
            }
        }
    }

    /// Replay pending counter corrections. Returns the delta that landed
    /// on this query; its local counter moves by the same amount.
    pub async fn reconcile_counters(&mut self) -> i32 {
        let applied = self.ledger.flush(&self.api).await;
        let delta = applied.get(&self.query_id).copied().unwrap_or(0);
        if delta != 0 {
            if let DetailState::Ready(query) = &mut self.state {
                query.adjust_recommendation_count(delta);
            }
            info!(query = %self.query_id, delta, "recommendation count reconciled");
        }
        delta
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn query_id(&self) -> &EntityId {
        &self.query_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn query(&self) -> Option<&Query> {
        match &self.state {
            DetailState::Ready(query) => Some(query),
            _ => None,
        }
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn ledger(&self) -> &CounterLedger {
        &self.ledger
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for QueryDetail {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
