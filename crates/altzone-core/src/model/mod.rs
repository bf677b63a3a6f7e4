// ── Domain model ──
//
// Canonical types consumed by the controllers and the CLI. Wire shapes
// live in `altzone_api::types`; `crate::convert` bridges the two.

pub mod entity_id;
pub mod query;
pub mod recommendation;

pub use entity_id::EntityId;
pub use query::{Query, QueryDraft};
pub use recommendation::{Recommendation, RecommendationDraft};

pub use altzone_api::SessionUser;
