//! List state and mutation reconciliation for AlternativeZone clients.
//!
//! This crate sits between `altzone-api` and a renderer (the `altzone`
//! CLI today). It owns the domain model and every piece of client-side
//! logic a screen needs:
//!
//! - **Controllers** ([`controller`]): one per screen.
//!   [`QueryCollection`] loads a query list and drives search, layout,
//!   paging, edits and deletes; [`QueryDetail`] loads a query plus its
//!   recommendations and appends new ones; [`MyRecommendations`] and
//!   [`RecommendationsForMe`] cover the per-user recommendation screens.
//!   Mutations reconcile local state from the request payload instead of
//!   refetching.
//!
//! - **[`derive_view`]**: the pure filter / sort / paginate pipeline every
//!   list renders from, parameterised by [`ViewParams`] and [`Layout`].
//!
//! - **[`PromptState`]**: the single open delete confirmation or edit
//!   buffer of a controller.
//!
//! - **[`Session`]** / **[`IdentityProvider`]**: read-only access to the
//!   signed-in user, and the [`route`] guard that keeps signed-out users
//!   away from protected screens.
//!
//! - **[`CounterLedger`]**: records queries whose `recommendation_count`
//!   missed an increment or decrement so the drift can be replayed later.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod notice;
pub mod prompt;
pub mod reconcile;
pub mod route;
pub mod session;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use controller::{
    AddOutcome, DeleteOutcome, DetailState, LoadState, MyRecommendations, QueryCollection,
    QueryDetail, QuerySource, RecommendationsForMe, submit_query,
};
pub use error::CoreError;
pub use notice::{Notice, NoticeLevel};
pub use prompt::PromptState;
pub use reconcile::CounterLedger;
pub use route::{Navigation, Route, guard};
pub use session::{IdentityProvider, Session, StaticIdentity};
pub use view::{Layout, Listed, Page, ViewParams, derive_view};

pub use model::{EntityId, Query, QueryDraft, Recommendation, RecommendationDraft, SessionUser};

pub use altzone_api::ApiClient;
