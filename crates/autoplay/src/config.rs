use ghostrider_core::SessionCounters;
use serde::{Deserialize, Serialize};

pub const ABORT_PROPERTY: &str = "_ghostrider_abort";
pub const COMBAT_LOST_PROPERTY: &str = "_lastCombatLost";

/// How long a run keeps going.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnBudget {
    /// Play until adventures run out.
    #[default]
    Unlimited,
    /// Play this many turns from the start of the run.
    Turns(u32),
    /// Stop once adventures drop to this many.
    KeepAdventures(u32),
}

impl TurnBudget {
    /// Positive counts are turns to play; zero or negative counts are adventures to keep.
    pub fn from_count(count: i64) -> Self {
        if count > 0 {
            Self::Turns(u32::try_from(count).unwrap_or(u32::MAX))
        } else {
            Self::KeepAdventures(u32::try_from(-count).unwrap_or(u32::MAX))
        }
    }

    pub fn stop_reason(&self, start_turns: u32, counters: &SessionCounters) -> Option<StopReason> {
        if counters.adventures <= 0 {
            return Some(StopReason::ResourceExhausted);
        }
        match *self {
            Self::Unlimited => None,
            Self::Turns(turns) => {
                let played = counters.turns_played.saturating_sub(start_turns);
                (played >= turns).then_some(StopReason::Completed)
            }
            Self::KeepAdventures(keep) => {
                (counters.adventures <= i64::from(keep)).then_some(StopReason::Completed)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    Completed,
    ResourceExhausted,
}

#[derive(Debug, Clone)]
pub struct RestorePolicy {
    pub hp_fraction: f64,
    pub hp_floor: i64,
    pub hp_ceiling: i64,
    pub mp_target: i64,
}

impl Default for RestorePolicy {
    fn default() -> Self {
        Self {
            hp_fraction: 0.4,
            hp_floor: 200,
            hp_ceiling: 2000,
            mp_target: 150,
        }
    }
}

impl RestorePolicy {
    pub fn hp_target(&self, max_hp: i64) -> i64 {
        let scaled = (self.hp_fraction * max_hp as f64) as i64;
        let low = self.hp_floor.min(self.hp_ceiling);
        let high = self.hp_floor.max(self.hp_ceiling);
        scaled.clamp(low, high)
    }

    pub fn mp_target(&self, max_mp: i64) -> i64 {
        self.mp_target.min(max_mp)
    }
}

#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub turns: TurnBudget,
    /// Familiar used for contested tasks; the session's current one when unset.
    pub familiar: Option<String>,
    /// Properties remembered at start and put back at teardown.
    pub restore_properties: Vec<String>,
    pub max_cycles: u32,
    pub restore: RestorePolicy,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            turns: TurnBudget::Unlimited,
            familiar: None,
            restore_properties: vec!["flag_aabosses".to_string()],
            max_cycles: 5000,
            restore: RestorePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_target_scales_between_the_bounds() {
        let policy = RestorePolicy::default();
        assert_eq!(policy.hp_target(100), 200);
        assert_eq!(policy.hp_target(1000), 400);
        assert_eq!(policy.hp_target(10_000), 2000);
    }

    #[test]
    fn swapped_hp_bounds_are_reordered() {
        let policy = RestorePolicy {
            hp_floor: 900,
            hp_ceiling: 300,
            ..RestorePolicy::default()
        };
        assert_eq!(policy.hp_target(100), 300);
        assert_eq!(policy.hp_target(1500), 600);
        assert_eq!(policy.hp_target(10_000), 900);
    }
}
