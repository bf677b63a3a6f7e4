// ── "Recommendations for me" controller ──
//
// Two dependent reads: the user's recommendations, then the queries they
// point at (one batched call). The second read is skipped when the first
// returns nothing.

use std::collections::BTreeSet;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use altzone_api::ApiClient;

use super::{LoadState, until_cancelled};
use crate::error::CoreError;
use crate::model::{Query, Recommendation};
use crate::notice::{Notice, Notices};
use crate::session::Session;

pub struct RecommendationsForMe {
    api: ApiClient,
    email: String,
    recommendations: Vec<Recommendation>,
    queries: Vec<Query>,
    load_state: LoadState,
    notices: Notices,
    cancel: CancellationToken,
}

impl RecommendationsForMe {
    pub fn new(api: ApiClient, session: &Session) -> Result<Self, CoreError> {
        let user = session.require_user("view recommendations for you")?;
        Ok(Self {
            api,
            email: user.email,
            recommendations: Vec::new(),
            queries: Vec::new(),
            load_state: LoadState::Idle,
            notices: Notices::default(),
            cancel: CancellationToken::new(),
        })
    }

    pub async fn load(&mut self) {
        self.load_state = LoadState::Loading;

        let fetched = until_cancelled(
            &self.cancel,
            self.api.list_recommendations_for_user(&self.email),
        )
        .await;
        let records = match fetched {
            Ok(records) => records,
            Err(CoreError::Cancelled) => {
                self.load_state = LoadState::Idle;
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to load recommendations for user");
                self.recommendations.clear();
                self.queries.clear();
                self.load_state = LoadState::Failed(e.to_string());
                self.notices
                    .push(Notice::warning(format!("Could not load recommendations: {e}")));
                return;
            }
        };
        self.recommendations = records.into_iter().map(Recommendation::from).collect();

        let ids: BTreeSet<&str> = self
            .recommendations
            .iter()
            .map(|r| r.query_id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            self.queries.clear();
            self.load_state = LoadState::Loaded;
            return;
        }

        let ids: Vec<&str> = ids.into_iter().collect();
        let related = until_cancelled(&self.cancel, self.api.list_queries_by_ids(&ids)).await;
        match related {
            Ok(records) => {
                self.queries = records.into_iter().map(Query::from).collect();
                debug!(
                    recommendations = self.recommendations.len(),
                    queries = self.queries.len(),
                    "recommendations for me loaded"
                );
            }
            Err(CoreError::Cancelled) => {
                self.load_state = LoadState::Idle;
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to load related queries");
                self.queries.clear();
                self.notices
                    .push(Notice::warning(format!("Could not load related queries: {e}")));
            }
        }
        self.load_state = LoadState::Loaded;
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// The loaded query a recommendation points at, if any.
    pub fn query_for(&self, recommendation: &Recommendation) -> Option<&Query> {
        self.queries.iter().find(|q| q.id == recommendation.query_id)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for RecommendationsForMe {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
