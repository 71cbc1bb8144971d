use crate::Slot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sobriety {
    Sober,
    Drunk,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Hp,
    Mp,
}

/// Polled resource counters of the session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCounters {
    pub turns_played: u32,
    pub adventures: i64,
    #[serde(default)]
    pub inebriety: u32,
    #[serde(default = "default_inebriety_limit")]
    pub inebriety_limit: u32,
    #[serde(default)]
    pub fullness: u32,
    #[serde(default = "default_fullness_limit")]
    pub fullness_limit: u32,
    pub hp: i64,
    pub max_hp: i64,
    #[serde(default)]
    pub mp: i64,
    #[serde(default)]
    pub max_mp: i64,
}

fn default_inebriety_limit() -> u32 {
    14
}

fn default_fullness_limit() -> u32 {
    15
}

impl SessionCounters {
    pub fn is_drunk(&self) -> bool {
        self.inebriety > self.inebriety_limit
    }

    pub fn sobriety(&self) -> Sobriety {
        if self.is_drunk() {
            Sobriety::Drunk
        } else {
            Sobriety::Sober
        }
    }

    pub fn resource(&self, resource: Resource) -> (i64, i64) {
        match resource {
            Resource::Hp => (self.hp, self.max_hp),
            Resource::Mp => (self.mp, self.max_mp),
        }
    }
}

/// Snapshot of the external session. Refreshed by the environment only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub counters: SessionCounters,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub familiar: Option<String>,
    #[serde(default)]
    pub familiars: BTreeSet<String>,
    #[serde(default)]
    pub items: BTreeMap<String, u32>,
    #[serde(default)]
    pub equipped: BTreeMap<Slot, String>,
    /// Active effects with remaining turns.
    #[serde(default)]
    pub effects: BTreeMap<String, u32>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub song: Option<String>,
}

impl SessionState {
    /// Copies in inventory. Worn copies live in `equipped`.
    pub fn item_amount(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Held in inventory or currently worn.
    pub fn have_item(&self, item: &str) -> bool {
        self.item_amount(item) > 0 || self.have_equipped(item)
    }

    pub fn have_effect(&self, effect: &str) -> bool {
        self.effects.get(effect).is_some_and(|turns| *turns > 0)
    }

    pub fn have_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    pub fn have_familiar(&self, familiar: &str) -> bool {
        self.familiars.contains(familiar)
    }

    pub fn have_equipped(&self, item: &str) -> bool {
        self.equipped.values().any(|worn| worn == item)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Missing or unparseable properties read as zero.
    pub fn property_int(&self, key: &str) -> i64 {
        self.property(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn property_bool(&self, key: &str) -> bool {
        matches!(self.property(key), Some("true"))
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<String>) {
        self.properties.insert(key.to_string(), value.into());
    }
}
