// ── View controllers ──
//
// One controller per screen. Each owns its fetched state, the UI state
// that feeds `derive_view`, at most one open prompt, a notice queue and
// a cancellation token. Remote results arriving after the token fires
// are dropped instead of being written into a discarded view.

mod collection;
mod compose;
mod detail;
mod my_recommendations;
mod recommendations_for_me;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;

pub use collection::{QueryCollection, QuerySource};
pub use compose::submit_query;
pub use detail::{AddOutcome, DetailState, QueryDetail};
pub use my_recommendations::{DeleteOutcome, MyRecommendations};
pub use recommendations_for_me::RecommendationsForMe;

/// Progress of a list fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The fetch failed; the list was left empty.
    Failed(String),
}

/// Await `fut` unless `cancel` fires first.
pub(crate) async fn until_cancelled<T, F>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, altzone_api::Error>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CoreError::Cancelled),
        result = fut => result.map_err(CoreError::from),
    }
}
