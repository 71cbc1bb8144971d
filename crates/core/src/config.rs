use crate::{Modifiers, Slot, SlotKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    #[serde(default)]
    pub slot: Option<SlotKind>,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Items sharing a fold group can be folded into one another.
    #[serde(default)]
    pub fold_group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectDef {
    pub id: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Familiar whose weight converts to value at a fixed action rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StasisRule {
    pub familiar: String,
    pub base_rate: f64,
    pub meat_per_lb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemQuantity {
    pub item: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiderDrops {
    Meat { value: f64 },
    /// Uniform pick among the listed items.
    Items { items: Vec<String> },
    /// Weighted pick, value is the quantity-weighted average.
    Weighted { items: Vec<ItemQuantity> },
    Nothing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DropLimit {
    pub property: String,
    pub max: i64,
}

/// A familiar that can ride in a carrier slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiderDef {
    pub familiar: String,
    pub probability: f64,
    pub drops: RiderDrops,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub drop_limit: Option<DropLimit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeprechaunRule {
    pub familiar: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionItem {
    pub familiar: String,
    pub item: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldTool {
    pub item: String,
    pub rate_bonus: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamiliarRules {
    #[serde(default)]
    pub stasis: Vec<StasisRule>,
    /// Familiars whose weight compounds into extra adventures.
    #[serde(default)]
    pub accumulation: Vec<String>,
    #[serde(default)]
    pub riders: Vec<RiderDef>,
    #[serde(default)]
    pub leprechauns: Vec<LeprechaunRule>,
    /// Any active effect from this list adds a full action to the rate.
    #[serde(default)]
    pub action_rate_effects: Vec<String>,
    #[serde(default)]
    pub fold_tool: Option<FoldTool>,
    #[serde(default)]
    pub companion_items: Vec<CompanionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BonusRule {
    Flat {
        item: String,
        value: f64,
    },
    /// Share of the tradeable consumable drop pool.
    ConsumableDrops {
        item: String,
        share: f64,
    },
    /// Flower drops that decay with every drop until a daily cap.
    DecayingDrops {
        item: String,
        drops: Vec<String>,
        counter: String,
        cap: i64,
        base_rate: f64,
        decay: f64,
        floor: f64,
    },
    /// Sweat that converts into liver space while below the booze threshold.
    Sweat {
        item: String,
        sweat: String,
        uses: String,
        per_use: i64,
        max_uses: i64,
        drinks: Vec<String>,
        martini: String,
    },
    PropertyContains {
        item: String,
        property: String,
        needle: String,
        value: f64,
    },
    /// Rakes yield leaves while the leaf source is owned.
    Rake {
        items: Vec<String>,
        requires: String,
        leaf: String,
        multiplier: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantsgivingRule {
    pub item: String,
    pub count: String,
    pub fullness: String,
    pub thresholds: Vec<i64>,
    pub food: String,
    pub seasoning: String,
    pub spork: String,
    pub spork_used: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrier {
    pub item: String,
    pub slot: Slot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightSource {
    pub id: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerRules {
    pub base_adventure_value: f64,
    pub accessory_slots: usize,
    /// Linear approximation of the value of extra weight for accumulating familiars.
    pub weight_per_value: f64,
    pub base_familiar_weight: f64,
    pub weight_ceiling: f64,
    pub carriers: Vec<Carrier>,
    #[serde(default)]
    pub weight_skills: Vec<WeightSource>,
    #[serde(default)]
    pub weight_familiars: Vec<WeightSource>,
    #[serde(default)]
    pub meat_song: Option<String>,
    #[serde(default)]
    pub digitize_target: Option<String>,
    /// Back item worn in every sober fight while a paranormal ghost is due.
    #[serde(default)]
    pub ghost_pack: Option<String>,
}

impl Default for OptimizerRules {
    fn default() -> Self {
        Self {
            base_adventure_value: 500.0,
            accessory_slots: 3,
            weight_per_value: 0.00123839009288,
            base_familiar_weight: 20.0,
            weight_ceiling: 1000.0,
            carriers: Vec::new(),
            weight_skills: Vec::new(),
            weight_familiars: Vec::new(),
            meat_song: None,
            digitize_target: None,
            ghost_pack: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueEntry {
    pub item: String,
    pub price: f64,
    #[serde(default = "default_true")]
    pub tradeable: bool,
    #[serde(default)]
    pub consumable: bool,
    #[serde(default)]
    pub adventures: Option<f64>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueConfig {
    pub entries: Vec<ValueEntry>,
    #[serde(default)]
    pub overrides: Vec<ItemQuantity>,
    #[serde(default)]
    pub value_of_adventure: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub effects: Vec<EffectDef>,
    pub familiars: FamiliarRules,
    pub bonuses: Vec<BonusRule>,
    #[serde(default)]
    pub pantsgiving: Option<PantsgivingRule>,
    pub rules: OptimizerRules,
    pub values: ValueConfig,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("item {0} has no slot")]
    Unwearable(String),
    #[error("carrier {item} must sit in a {expected:?} slot")]
    CarrierSlot { item: String, expected: SlotKind },
    #[error("stasis rule for {0} has a rate outside [0, 1]")]
    StasisRate(String),
}

impl GameConfig {
    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn effect(&self, id: &str) -> Option<&EffectDef> {
        self.effects.iter().find(|effect| effect.id == id)
    }

    pub fn item_modifiers(&self, id: &str) -> Modifiers {
        self.item(id).map(|item| item.modifiers).unwrap_or_default()
    }

    pub fn item_slot(&self, id: &str) -> Option<SlotKind> {
        self.item(id).and_then(|item| item.slot)
    }

    pub fn stasis_rule(&self, familiar: &str) -> Option<&StasisRule> {
        self.familiars
            .stasis
            .iter()
            .find(|rule| rule.familiar == familiar)
    }

    pub fn is_accumulation_familiar(&self, familiar: &str) -> bool {
        self.familiars
            .accumulation
            .iter()
            .any(|name| name == familiar)
    }

    pub fn fold_group<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        let Some(group) = self.item(id).and_then(|item| item.fold_group.as_deref()) else {
            return vec![id];
        };
        self.items
            .iter()
            .filter(|item| item.fold_group.as_deref() == Some(group))
            .map(|item| item.id.as_str())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for carrier in &self.rules.carriers {
            let Some(kind) = self.item_slot(&carrier.item) else {
                return Err(ConfigError::Unwearable(carrier.item.clone()));
            };
            if kind != carrier.slot.kind() {
                return Err(ConfigError::CarrierSlot {
                    item: carrier.item.clone(),
                    expected: carrier.slot.kind(),
                });
            }
        }
        for rule in &self.familiars.stasis {
            if !(0.0..=1.0).contains(&rule.base_rate) {
                return Err(ConfigError::StasisRate(rule.familiar.clone()));
            }
        }
        Ok(())
    }
}
