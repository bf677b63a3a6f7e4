// ── "My recommendations" controller ──
//
// Lists recommendations for the signed-in user and deletes them. A
// delete is the add flow in reverse: remove the record, then decrement
// the parent query's counter, with the same ledger fallback.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use altzone_api::ApiClient;

use super::{LoadState, until_cancelled};
use crate::error::CoreError;
use crate::model::{EntityId, Recommendation};
use crate::notice::{Notice, Notices};
use crate::prompt::PromptState;
use crate::reconcile::CounterLedger;
use crate::session::Session;
use crate::view::{Page, ViewParams, derive_view};

/// How a deleted recommendation landed on its parent's counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Counted,
    /// The decrement failed; the parent is in the ledger.
    CountDirty,
    /// The record carried no parent id, so no counter was touched.
    NoParent,
}

pub struct MyRecommendations {
    api: ApiClient,
    session: Session,
    email: String,
    items: Vec<Recommendation>,
    params: ViewParams,
    prompt: PromptState<Recommendation, ()>,
    ledger: CounterLedger,
    load_state: LoadState,
    notices: Notices,
    cancel: CancellationToken,
}

impl MyRecommendations {
    pub fn new(api: ApiClient, session: Session) -> Result<Self, CoreError> {
        let user = session.require_user("view your recommendations")?;
        Ok(Self {
            api,
            session,
            email: user.email,
            items: Vec::new(),
            params: ViewParams::default(),
            prompt: PromptState::Closed,
            ledger: CounterLedger::new(),
            load_state: LoadState::Idle,
            notices: Notices::default(),
            cancel: CancellationToken::new(),
        })
    }

    pub async fn load(&mut self) {
        self.load_state = LoadState::Loading;
        let fetched =
            until_cancelled(&self.cancel, self.api.list_my_recommendations(&self.email)).await;

        match fetched {
            Ok(records) => {
                self.items = records.into_iter().map(Recommendation::from).collect();
                self.load_state = LoadState::Loaded;
                debug!(count = self.items.len(), "my recommendations loaded");
            }
            Err(CoreError::Cancelled) => self.load_state = LoadState::Idle,
            Err(e) => {
                warn!(error = %e, "failed to load my recommendations");
                self.items.clear();
                self.load_state = LoadState::Failed(e.to_string());
                self.notices
                    .push(Notice::warning(format!("Could not load recommendations: {e}")));
            }
        }
    }

    /// Newest first, paged like the query lists.
    pub fn page(&self) -> Page<&Recommendation> {
        derive_view(&self.items, &self.params)
    }

    pub fn go_to_page(&mut self, page_number: usize) {
        self.params.page_number = page_number;
        self.params.page_number = self.page().page_number;
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Open the delete confirmation. `Ok(false)` when `id` is already gone.
    pub fn request_delete(&mut self, id: &EntityId) -> Result<bool, CoreError> {
        let Some(target) = self.items.iter().find(|r| r.id == *id).cloned() else {
            debug!(recommendation = %id, "delete requested for an absent recommendation");
            self.notices.push(Notice::info(format!(
                "Recommendation {id} is already gone; nothing to delete"
            )));
            return Ok(false);
        };
        self.prompt.open_delete(target)?;
        Ok(true)
    }

    /// Delete the confirmed recommendation, then decrement its query.
    pub async fn confirm_delete(&mut self) -> Result<DeleteOutcome, CoreError> {
        let target = match self.prompt.take() {
            PromptState::ConfirmingDelete(target) => target,
            other => {
                self.prompt = other;
                return Err(CoreError::NoPrompt);
            }
        };

        let result = self.commit_delete(&target).await;
        match &result {
            Ok(DeleteOutcome::CountDirty) => self.notices.push(Notice::warning(
                "Recommendation deleted, but the recommendation count could not be updated",
            )),
            Ok(_) => self.notices.push(Notice::success("Recommendation deleted")),
            Err(CoreError::Cancelled) => {}
            Err(e) => self
                .notices
                .push(Notice::error(format!("Failed to delete recommendation: {e}"))),
        }
        result
    }

    async fn commit_delete(
        &mut self,
        target: &Recommendation,
    ) -> Result<DeleteOutcome, CoreError> {
        self.session.require_user("delete a recommendation")?;
        until_cancelled(
            &self.cancel,
            self.api.delete_recommendation(target.id.as_str()),
        )
        .await?;
        self.apply_deleted(&target.id);
        info!(recommendation = %target.id, "recommendation deleted");

        if target.query_id.as_str().is_empty() {
            error!(recommendation = %target.id, "deleted recommendation has no query id");
            return Ok(DeleteOutcome::NoParent);
        }

        let dropped = until_cancelled(
            &self.cancel,
            self.api.decrement_recommendations(target.query_id.as_str()),
        )
        .await;
        match dropped {
            Ok(()) => Ok(DeleteOutcome::Counted),
            Err(e) => {
                warn!(query = %target.query_id, error = %e, "decrement failed after delete");
                self.ledger.mark(&target.query_id, -1);
                Ok(DeleteOutcome::CountDirty)
            }
        }
    }

    /// Drop `id` locally. Returns `false` if it was already gone.
    pub fn apply_deleted(&mut self, id: &EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|r| r.id != *id);
        let removed = self.items.len() != before;
        if removed {
            self.params.page_number = self.page().page_number;
        }
        removed
    }

    pub fn cancel_prompt(&mut self) -> bool {
        self.prompt.take().is_open()
    }

    /// Replay pending decrements. Returns how many queries still owe one.
    pub async fn reconcile_counters(&mut self) -> usize {
        let applied = self.ledger.flush(&self.api).await;
        for (query, delta) in &applied {
            info!(query = %query, delta, "recommendation count reconciled");
        }
        self.ledger.iter().count()
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn items(&self) -> &[Recommendation] {
        &self.items
    }

    pub fn prompt(&self) -> &PromptState<Recommendation, ()> {
        &self.prompt
    }

    pub fn ledger(&self) -> &CounterLedger {
        &self.ledger
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

impl Drop for MyRecommendations {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
