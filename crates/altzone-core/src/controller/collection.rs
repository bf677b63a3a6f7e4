// ── Query list controller ──
//
// Backs the all-queries, recent-queries and my-queries screens: fetch
// once, derive pages locally, and reconcile deletes and edits from the
// request payload instead of refetching.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use altzone_api::ApiClient;
use altzone_api::types::QueryUpdate;

use super::{LoadState, until_cancelled};
use crate::error::CoreError;
use crate::model::{EntityId, Query, QueryDraft};
use crate::notice::{Notice, Notices};
use crate::prompt::PromptState;
use crate::session::Session;
use crate::view::{Layout, Page, ViewParams, clamp_page, derive_view, total_pages};

/// Which remote list a [`QueryCollection`] shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// `GET /allqueries`
    All,
    /// `GET /recent-queries`, shown on the home screen.
    Recent,
    /// `GET /queries?user_email=`
    Owned(String),
}

pub struct QueryCollection {
    api: ApiClient,
    session: Session,
    source: QuerySource,
    items: Vec<Query>,
    layout: Layout,
    params: ViewParams,
    prompt: PromptState<Query, QueryDraft>,
    load_state: LoadState,
    notices: Notices,
    cancel: CancellationToken,
}

impl QueryCollection {
    pub fn new(api: ApiClient, session: Session, source: QuerySource) -> Self {
        let layout = Layout::default();
        Self {
            api,
            session,
            source,
            items: Vec::new(),
            layout,
            params: ViewParams::with_layout(layout),
            prompt: PromptState::Closed,
            load_state: LoadState::Idle,
            notices: Notices::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// The signed-in user's own queries.
    pub fn owned(api: ApiClient, session: Session) -> Result<Self, CoreError> {
        let user = session.require_user("view your queries")?;
        Ok(Self::new(api, session, QuerySource::Owned(user.email)))
    }

    // ── Load ─────────────────────────────────────────────────────────

    /// Fetch the source list. A failure leaves the list empty, records
    /// `LoadState::Failed` and queues a warning.
    pub async fn load(&mut self) {
        self.load_state = LoadState::Loading;

        let fetched = match &self.source {
            QuerySource::All => until_cancelled(&self.cancel, self.api.list_all_queries()).await,
            QuerySource::Recent => {
                until_cancelled(&self.cancel, self.api.list_recent_queries()).await
            }
            QuerySource::Owned(email) => {
                until_cancelled(&self.cancel, self.api.list_user_queries(email)).await
            }
        };

        match fetched {
            Ok(records) => {
                self.items = records.into_iter().map(Query::from).collect();
                self.load_state = LoadState::Loaded;
                debug!(source = ?self.source, count = self.items.len(), "queries loaded");
                self.clamp_page_number();
            }
            Err(CoreError::Cancelled) => {
                debug!("query load discarded, view closed");
                self.load_state = LoadState::Idle;
            }
            Err(e) => {
                warn!(source = ?self.source, error = %e, "failed to load queries");
                self.items.clear();
                self.load_state = LoadState::Failed(e.to_string());
                self.notices
                    .push(Notice::warning(format!("Could not load queries: {e}")));
            }
        }
    }

    // ── Derived view ─────────────────────────────────────────────────

    pub fn page(&self) -> Page<&Query> {
        derive_view(&self.items, &self.params)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.params.search_text = text.into();
        self.params.page_number = 1;
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.params.page_size = layout.page_size();
        self.params.page_number = 1;
    }

    /// Select a page. Out-of-range requests land on the nearest page.
    pub fn go_to_page(&mut self, page_number: usize) {
        self.params.page_number = clamp_page(page_number, self.total_pages());
    }

    pub fn total_pages(&self) -> usize {
        self.page().total_pages
    }

    fn clamp_page_number(&mut self) {
        let filtered = self.page().filtered_count;
        let total = total_pages(filtered, self.params.page_size.max(1));
        self.params.page_number = clamp_page(self.params.page_number, total);
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Open the delete confirmation for `id`.
    ///
    /// Returns `Ok(false)` without opening anything when `id` is not in the
    /// list, so deleting an already deleted query is a no-op.
    pub fn request_delete(&mut self, id: &EntityId) -> Result<bool, CoreError> {
        let Some(target) = self.get(id).cloned() else {
            debug!(query = %id, "delete requested for a query not in the list");
            self.notices
                .push(Notice::info(format!("Query {id} is already gone; nothing to delete")));
            return Ok(false);
        };
        self.prompt.open_delete(target)?;
        Ok(true)
    }

    /// Delete the item held by the open confirmation. The prompt is
    /// closed whatever the outcome.
    pub async fn confirm_delete(&mut self) -> Result<EntityId, CoreError> {
        let target = match self.prompt.take() {
            PromptState::ConfirmingDelete(target) => target,
            other => {
                self.prompt = other;
                return Err(CoreError::NoPrompt);
            }
        };

        let result = self.commit_delete(&target).await;
        match &result {
            Ok(_) => {
                info!(query = %target.id, "query deleted");
                self.notices.push(Notice::success("Query deleted"));
            }
            Err(CoreError::Cancelled) => {}
            Err(e) => self
                .notices
                .push(Notice::error(format!("Failed to delete query: {e}"))),
        }
        result
    }

    async fn commit_delete(&mut self, target: &Query) -> Result<EntityId, CoreError> {
        self.session.require_user("delete a query")?;
        until_cancelled(&self.cancel, self.api.delete_query(target.id.as_str())).await?;
        self.apply_deleted(&target.id);
        Ok(target.id.clone())
    }

    /// Drop `id` from the local list. Returns `false` if it was already gone.
    pub fn apply_deleted(&mut self, id: &EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|q| q.id != *id);
        let removed = self.items.len() != before;
        if removed {
            self.clamp_page_number();
        }
        removed
    }

    // ── Edit ─────────────────────────────────────────────────────────

    pub fn request_edit(&mut self, id: &EntityId) -> Result<(), CoreError> {
        let target = self.find(id)?.clone();
        let buffer = QueryDraft::from(&target);
        self.prompt.open_edit(target, buffer)
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut QueryDraft> {
        self.prompt.buffer_mut()
    }

    /// Send the edit buffer and merge it into the local item.
    ///
    /// A buffer that fails validation keeps the prompt open; any other
    /// outcome closes it.
    pub async fn submit_edit(&mut self) -> Result<EntityId, CoreError> {
        let (target, buffer) = match self.prompt.take() {
            PromptState::Editing { target, buffer } => (target, buffer),
            other => {
                self.prompt = other;
                return Err(CoreError::NoPrompt);
            }
        };

        if let Err(e) = buffer.validate() {
            self.prompt = PromptState::Editing { target, buffer };
            return Err(e);
        }

        let result = self.commit_edit(&target.id, &buffer).await;
        match &result {
            Ok(_) => {
                info!(query = %target.id, "query updated");
                self.notices.push(Notice::success("Query updated"));
            }
            Err(CoreError::Cancelled) => {}
            Err(e) => self
                .notices
                .push(Notice::error(format!("Failed to update query: {e}"))),
        }
        result
    }

    async fn commit_edit(
        &mut self,
        id: &EntityId,
        buffer: &QueryDraft,
    ) -> Result<EntityId, CoreError> {
        self.session.require_user("edit a query")?;
        let update = QueryUpdate::from(buffer);
        until_cancelled(&self.cancel, self.api.update_query(id.as_str(), &update)).await?;
        if let Some(item) = self.items.iter_mut().find(|q| q.id == *id) {
            item.apply_draft(buffer);
        }
        Ok(id.clone())
    }

    /// Close whatever prompt is open without a remote call.
    pub fn cancel_prompt(&mut self) -> bool {
        self.prompt.take().is_open()
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn items(&self) -> &[Query] {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&Query> {
        self.items.iter().find(|q| q.id == *id)
    }

    pub fn source(&self) -> &QuerySource {
        &self.source
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn prompt(&self) -> &PromptState<Query, QueryDraft> {
        &self.prompt
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    /// Token that discards in-flight results when cancelled.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn find(&self, id: &EntityId) -> Result<&Query, CoreError> {
        self.get(id).ok_or_else(|| CoreError::not_found("query", id))
    }
}

impl Drop for QueryCollection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
