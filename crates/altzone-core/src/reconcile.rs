// ── Counter reconciliation ──
//
// Recommendation writes are two calls: the document write, then a
// counter nudge on the parent query. When the nudge fails the parent is
// recorded here as "count-dirty" with the delta it is still owed, and a
// later `flush` replays the missing nudges one unit at a time.

use std::collections::BTreeMap;

use tracing::{debug, error, warn};

use altzone_api::ApiClient;

use crate::model::EntityId;

/// Pending counter corrections, keyed by query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterLedger {
    pending: BTreeMap<EntityId, i32>,
}

impl CounterLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `query_id` is owed `delta` more counter units.
    pub fn mark(&mut self, query_id: &EntityId, delta: i32) {
        if delta == 0 {
            return;
        }
        let entry = self.pending.entry(query_id.clone()).or_insert(0);
        *entry += delta;
        if *entry == 0 {
            self.pending.remove(query_id);
        }
        warn!(query = %query_id, delta, "recommendation count marked dirty");
    }

    pub fn pending(&self, query_id: &EntityId) -> i32 {
        self.pending.get(query_id).copied().unwrap_or(0)
    }

    pub fn is_dirty(&self, query_id: &EntityId) -> bool {
        self.pending.contains_key(query_id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, i32)> {
        self.pending.iter().map(|(id, delta)| (id, *delta))
    }

    /// Replay every pending delta against the server.
    ///
    /// Units are sent one call at a time and removed from the ledger as
    /// they succeed. The first failure for a query stops that query's
    /// replay and leaves the remainder pending, unless the server says the
    /// query is gone, in which case its entry is dropped. Returns the delta that
    /// actually landed per query.
    pub async fn flush(&mut self, api: &ApiClient) -> BTreeMap<EntityId, i32> {
        let mut applied = BTreeMap::new();
        let ids: Vec<EntityId> = self.pending.keys().cloned().collect();

        for id in ids {
            let owed = self.pending(&id);
            let step = owed.signum();
            let mut landed = 0;
            let mut gone = false;

            for _ in 0..owed.unsigned_abs() {
                let result = if step > 0 {
                    api.increment_recommendations(id.as_str()).await
                } else {
                    api.decrement_recommendations(id.as_str()).await
                };
                match result {
                    Ok(()) => landed += step,
                    Err(e) if e.is_not_found() => {
                        warn!(query = %id, "query no longer exists, dropping pending count");
                        gone = true;
                        break;
                    }
                    Err(e) => {
                        if e.is_transient() {
                            warn!(query = %id, error = %e, "counter replay failed");
                        } else {
                            error!(query = %id, error = %e, "counter replay rejected");
                        }
                        break;
                    }
                }
            }

            let remaining = owed - landed;
            if remaining == 0 || gone {
                self.pending.remove(&id);
            } else {
                self.pending.insert(id.clone(), remaining);
            }
            if landed != 0 {
                debug!(query = %id, landed, remaining, "counter replayed");
                applied.insert(id, landed);
            }
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_marks_cancel_out() {
        let mut ledger = CounterLedger::new();
        let id = EntityId::from("q1");
        ledger.mark(&id, 1);
        ledger.mark(&id, 1);
        assert_eq!(ledger.pending(&id), 2);
        ledger.mark(&id, -2);
        assert!(!ledger.is_dirty(&id));
        assert!(ledger.is_empty());
    }

    #[test]
    fn zero_mark_is_ignored() {
        let mut ledger = CounterLedger::new();
        ledger.mark(&EntityId::from("q1"), 0);
        assert!(ledger.is_empty());
    }
}
