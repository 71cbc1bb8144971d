use crate::schema::{
    BonusFile, EffectDef, FamiliarRules, GameConfig, ItemDef, OptimizerRules, ValueConfig,
};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const ITEMS_FILE: &str = "items.json";
pub const EFFECTS_FILE: &str = "effects.json";
pub const FAMILIARS_FILE: &str = "familiars.json";
pub const BONUSES_FILE: &str = "bonuses.json";
pub const RULES_FILE: &str = "rules.json";
pub const VALUES_FILE: &str = "values.json";

const BUILTIN_ITEMS: &str = include_str!("../assets/items.json");
const BUILTIN_EFFECTS: &str = include_str!("../assets/effects.json");
const BUILTIN_FAMILIARS: &str = include_str!("../assets/familiars.json");
const BUILTIN_BONUSES: &str = include_str!("../assets/bonuses.json");
const BUILTIN_RULES: &str = include_str!("../assets/rules.json");
const BUILTIN_VALUES: &str = include_str!("../assets/values.json");

/// Reads every section from `dir`. `effects.json` is optional.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let items: Vec<ItemDef> = load_json(dir.join(ITEMS_FILE))?;
    let effects_path = dir.join(EFFECTS_FILE);
    let effects: Vec<EffectDef> = if effects_path.exists() {
        load_json(effects_path)?
    } else {
        Vec::new()
    };
    let familiars: FamiliarRules = load_json(dir.join(FAMILIARS_FILE))?;
    let bonuses: BonusFile = load_json(dir.join(BONUSES_FILE))?;
    let rules: OptimizerRules = load_json(dir.join(RULES_FILE))?;
    let values: ValueConfig = load_json(dir.join(VALUES_FILE))?;
    assemble(items, effects, familiars, bonuses, rules, values)
        .with_context(|| format!("validate {}", dir.display()))
}

/// The asset set shipped with the crate.
pub fn builtin_game_config() -> anyhow::Result<GameConfig> {
    let items = parse_json(ITEMS_FILE, BUILTIN_ITEMS)?;
    let effects = parse_json(EFFECTS_FILE, BUILTIN_EFFECTS)?;
    let familiars = parse_json(FAMILIARS_FILE, BUILTIN_FAMILIARS)?;
    let bonuses = parse_json(BONUSES_FILE, BUILTIN_BONUSES)?;
    let rules = parse_json(RULES_FILE, BUILTIN_RULES)?;
    let values = parse_json(VALUES_FILE, BUILTIN_VALUES)?;
    assemble(items, effects, familiars, bonuses, rules, values).context("validate builtin assets")
}

fn assemble(
    items: Vec<ItemDef>,
    effects: Vec<EffectDef>,
    familiars: FamiliarRules,
    bonuses: BonusFile,
    rules: OptimizerRules,
    values: ValueConfig,
) -> anyhow::Result<GameConfig> {
    let config = GameConfig {
        items,
        effects,
        familiars,
        bonuses: bonuses.bonuses,
        pantsgiving: bonuses.pantsgiving,
        rules,
        values,
    };
    config.validate()?;
    Ok(config)
}

pub fn load_json<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<T> {
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn parse_json<T: DeserializeOwned>(name: &str, raw: &str) -> anyhow::Result<T> {
    serde_json::from_str(raw).with_context(|| format!("parse builtin {name}"))
}
