use ghostrider_core::{BonusRule, Slot, SlotKind, ValueCatalog};
use ghostrider_data::{builtin_game_config, load_game_config};
use std::fs;
use std::path::PathBuf;

#[test]
fn builtin_assets_parse_and_validate() {
    let config = builtin_game_config().expect("builtin config");
    assert_eq!(config.rules.base_adventure_value, 500.0);
    assert_eq!(config.rules.accessory_slots, 3);
    assert_eq!(config.rules.weight_per_value, 0.00123839009288);
    assert_eq!(config.rules.carriers[0].item, "Buddy Bjorn");
    assert_eq!(config.rules.carriers[0].slot, Slot::Back);
    assert!(config.pantsgiving.is_some());
}

#[test]
fn stasis_table_keeps_its_constants() {
    let config = builtin_game_config().expect("builtin config");
    let cocoabo = config.stasis_rule("Cocoabo").expect("cocoabo");
    assert!((cocoabo.base_rate - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(cocoabo.meat_per_lb, 13.2);
    let npzr = config.stasis_rule("Ninja Pirate Zombie Robot").expect("npzr");
    assert_eq!(npzr.base_rate, 0.5);
    assert_eq!(npzr.meat_per_lb, 14.52);
    assert!(config.is_accumulation_familiar("Temporal Riftlet"));
    assert!(config.is_accumulation_familiar("Reagnimated Gnome"));
    assert!(!config.is_accumulation_familiar("Cocoabo"));
}

#[test]
fn bonus_rules_cover_every_rule_kind() {
    let config = builtin_game_config().expect("builtin config");
    let has = |pred: fn(&BonusRule) -> bool| config.bonuses.iter().any(pred);
    assert!(has(|rule| matches!(rule, BonusRule::Flat { .. })));
    assert!(has(|rule| matches!(rule, BonusRule::ConsumableDrops { .. })));
    assert!(has(|rule| matches!(rule, BonusRule::DecayingDrops { .. })));
    assert!(has(|rule| matches!(rule, BonusRule::Sweat { .. })));
    assert!(has(|rule| matches!(rule, BonusRule::PropertyContains { .. })));
    assert!(has(|rule| matches!(rule, BonusRule::Rake { .. })));
}

#[test]
fn fold_group_lists_every_member() {
    let config = builtin_game_config().expect("builtin config");
    let mut group = config.fold_group("Loathing Legion helicopter");
    group.sort_unstable();
    assert_eq!(group, vec!["Loathing Legion helicopter", "Loathing Legion knife"]);
    assert_eq!(config.fold_group("rake"), vec!["rake"]);
    assert_eq!(config.item_slot("hand in glove"), Some(SlotKind::Accessory));
}

#[test]
fn value_overrides_come_from_assets() {
    let config = builtin_game_config().expect("builtin config");
    let catalog = ValueCatalog::from_config(&config.values);
    assert_eq!(catalog.value("fake hand"), 50_000.0);
    assert_eq!(catalog.price("fake hand"), 900.0);
    assert_eq!(catalog.value_of_adventure(), 5000.0);
}

#[test]
fn directory_loading_matches_builtin() {
    let dir = std::env::temp_dir().join(format!("ghostrider-data-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    for name in [
        "items.json",
        "familiars.json",
        "bonuses.json",
        "rules.json",
        "values.json",
    ] {
        fs::copy(assets.join(name), dir.join(name)).expect("copy asset");
    }
    let loaded = load_game_config(&dir).expect("load from dir");
    let builtin = builtin_game_config().expect("builtin config");
    assert_eq!(loaded.items.len(), builtin.items.len());
    assert!(loaded.effects.is_empty());
    assert_eq!(loaded.bonuses, builtin.bonuses);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_section_reports_the_path() {
    let dir = std::env::temp_dir().join(format!("ghostrider-empty-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let err = load_game_config(&dir).expect_err("missing files");
    assert!(format!("{err:#}").contains("items.json"));
    fs::remove_dir_all(&dir).ok();
}
