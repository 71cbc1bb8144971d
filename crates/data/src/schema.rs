use serde::{Deserialize, Serialize};

pub use ghostrider_core::{
    BonusRule, Carrier, EffectDef, FamiliarRules, GameConfig, ItemDef, ItemQuantity,
    OptimizerRules, PantsgivingRule, RiderDef, RiderDrops, StasisRule, ValueConfig, ValueEntry,
};

/// On-disk layout of `bonuses.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BonusFile {
    pub bonuses: Vec<BonusRule>,
    #[serde(default)]
    pub pantsgiving: Option<PantsgivingRule>,
}
