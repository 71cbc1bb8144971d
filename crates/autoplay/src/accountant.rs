use crate::{ItemDelta, RunSummary};
use ghostrider_core::SessionState;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Tracks what a run consumed and produced.
#[derive(Debug, Clone)]
pub struct SessionAccountant {
    start_turns: u32,
    start_adventures: i64,
    start_items: BTreeMap<String, u32>,
    actions: u32,
}

impl SessionAccountant {
    pub fn begin(state: &SessionState) -> Self {
        Self {
            start_turns: state.counters.turns_played,
            start_adventures: state.counters.adventures,
            start_items: state.items.clone(),
            actions: 0,
        }
    }

    pub fn record_action(&mut self) {
        self.actions += 1;
    }

    pub fn actions(&self) -> u32 {
        self.actions
    }

    /// Item deltas, largest gains first, zero changes dropped.
    pub fn item_deltas(&self, state: &SessionState) -> Vec<ItemDelta> {
        let names: BTreeSet<&String> = self.start_items.keys().chain(state.items.keys()).collect();
        let mut deltas: Vec<ItemDelta> = names
            .into_iter()
            .filter_map(|item| {
                let before = i64::from(self.start_items.get(item).copied().unwrap_or(0));
                let after = i64::from(state.item_amount(item));
                (after != before).then(|| ItemDelta {
                    item: item.clone(),
                    quantity: after - before,
                })
            })
            .collect();
        deltas.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.item.cmp(&b.item)));
        deltas
    }

    pub fn summary(&self, state: &SessionState, elapsed: Duration) -> RunSummary {
        RunSummary {
            actions: self.actions,
            turns_used: state.counters.turns_played.saturating_sub(self.start_turns),
            adventures_delta: state.counters.adventures - self.start_adventures,
            items: self.item_deltas(state),
            wall_time_ms: elapsed.as_millis() as u64,
        }
    }
}
