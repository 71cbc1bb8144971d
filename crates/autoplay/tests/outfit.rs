use ghostrider_autoplay::{
    accumulation_value, AutoplayError, EquipmentRequest, Optimizer, RiderMode,
};
use ghostrider_core::{GameConfig, SessionState, Slot, Stat, ValueCatalog};
use ghostrider_data::builtin_game_config;
use std::rc::Rc;

fn config() -> GameConfig {
    builtin_game_config().expect("builtin config")
}

fn state(familiar: &str) -> SessionState {
    let mut state = SessionState::default();
    state.counters.turns_played = 50;
    state.counters.adventures = 100;
    state.counters.inebriety_limit = 14;
    state.counters.max_hp = 1000;
    state.counters.hp = 1000;
    state.familiar = Some(familiar.to_string());
    state.familiars.insert(familiar.to_string());
    state
}

fn give(state: &mut SessionState, items: &[&str]) {
    for item in items {
        state.items.insert(item.to_string(), 1);
    }
}

fn weight_target(loadout: &ghostrider_autoplay::Loadout) -> Option<f64> {
    loadout
        .modifiers
        .iter()
        .find(|target| target.stat == Stat::FamiliarWeight)
        .map(|target| target.weight)
}

fn dress(config: GameConfig, state: &SessionState, familiar: &str) -> ghostrider_autoplay::Loadout {
    let mut values = ValueCatalog::from_config(&config.values);
    let mut optimizer = Optimizer::new(config);
    optimizer
        .combat_loadout(&EquipmentRequest::new().familiar(familiar), state, &mut values)
        .expect("combat loadout")
}

#[test]
fn stasis_weight_value_ignores_current_weight() {
    let bare = state("Cocoabo");
    let mut heavy = state("Cocoabo");
    give(&mut heavy, &["Brimstone Bracelet", "hand in glove", "astral pet sweater"]);
    heavy.skills.insert("Amphibian Sympathy".to_string());

    let light = dress(config(), &bare, "Cocoabo");
    let loaded = dress(config(), &heavy, "Cocoabo");
    assert_eq!(weight_target(&light), Some(4.4));
    assert_eq!(weight_target(&loaded), Some(4.4));
    assert_eq!(loaded.slots.get(&Slot::Familiar).map(String::as_str), Some("astral pet sweater"));
}

#[test]
fn action_rate_effect_caps_the_stasis_rate() {
    let mut boosted = state("Cocoabo");
    boosted.effects.insert("Shortly Stacked".to_string(), 200);
    let loadout = dress(config(), &boosted, "Cocoabo");
    assert_eq!(weight_target(&loadout), Some(13.2));
}

#[test]
fn fold_tool_is_worn_when_any_fold_member_is_owned() {
    let mut owner = state("Cocoabo");
    give(&mut owner, &["Loathing Legion knife"]);
    let loadout = dress(config(), &owner, "Cocoabo");
    assert!(loadout.wears("Loathing Legion helicopter"));
    let expected = ((1.0 / 3.0 + 0.25) * 13.2 * 1000.0_f64).round() / 1000.0;
    assert_eq!(weight_target(&loadout), Some(expected));
}

#[test]
fn accumulating_familiar_values_weight_linearly() {
    let loadout = dress(config(), &state("Temporal Riftlet"), "Temporal Riftlet");
    assert_eq!(weight_target(&loadout), Some(0.62));
    assert!(loadout.expected_value.is_some());
}

#[test]
fn accumulation_curve_grows_with_weight_until_the_ceiling() {
    let low = accumulation_value(500.0, 10.0, 20.0, 1000.0).expect("below ceiling");
    let high = accumulation_value(500.0, 200.0, 20.0, 1000.0).expect("below ceiling");
    assert!(high > low);
    assert!(accumulation_value(500.0, 990.0, 20.0, 1000.0).is_none());
}

#[test]
fn flat_familiar_gets_a_drop_target_and_no_weight_value() {
    let loadout = dress(config(), &state("Hobo Monkey"), "Hobo Monkey");
    assert_eq!(weight_target(&loadout), None);
    assert!(loadout
        .modifiers
        .iter()
        .any(|target| target.stat == Stat::ItemDrop && target.weight == 0.01));
}

#[test]
fn meat_song_switches_flat_familiars_to_meat() {
    let mut singer = state("Hobo Monkey");
    singer.song = Some("Total Eclipse of Your Meat".to_string());
    let loadout = dress(config(), &singer, "Hobo Monkey");
    assert!(loadout
        .modifiers
        .iter()
        .any(|target| target.stat == Stat::MeatDrop && target.weight == 0.25));
}

#[test]
fn missing_familiar_cannot_be_dressed() {
    let config = config();
    let mut values = ValueCatalog::from_config(&config.values);
    let mut optimizer = Optimizer::new(config);
    let err = optimizer
        .combat_loadout(&EquipmentRequest::new(), &state("Cocoabo"), &mut values)
        .expect_err("no familiar");
    assert!(matches!(err, AutoplayError::CannotEquip(_)));
}

#[test]
fn forced_item_must_be_available() {
    let optimizer = Optimizer::new(config());
    let request = EquipmentRequest::new().familiar("Cocoabo").item("June cleaver");
    let err = optimizer
        .forced_loadout(&request, &state("Cocoabo"))
        .expect_err("cleaver not owned");
    assert!(matches!(err, AutoplayError::CannotEquip(message) if message.contains("June cleaver")));

    let unowned = EquipmentRequest::new().familiar("Leprechaun");
    assert!(optimizer.forced_loadout(&unowned, &state("Cocoabo")).is_err());
}

#[test]
fn worn_item_counts_as_available() {
    let optimizer = Optimizer::new(config());
    let mut wearing = state("Cocoabo");
    wearing.equipped.insert(Slot::Weapon, "June cleaver".to_string());
    let request = EquipmentRequest::new().familiar("Cocoabo").item("June cleaver");
    let loadout = optimizer.forced_loadout(&request, &wearing).expect("worn cleaver");
    assert_eq!(loadout.slots.get(&Slot::Weapon).map(String::as_str), Some("June cleaver"));
}

#[test]
fn forced_items_take_their_slots() {
    let optimizer = Optimizer::new(config());
    let mut owner = state("Cocoabo");
    give(&mut owner, &["June cleaver", "designer sweatpants"]);
    let request = EquipmentRequest::new().items(["June cleaver", "designer sweatpants"]);
    let loadout = optimizer.forced_loadout(&request, &owner).expect("forced");
    assert_eq!(loadout.slot_of("June cleaver"), Some(Slot::Weapon));
    assert_eq!(loadout.slot_of("designer sweatpants"), Some(Slot::Pants));
    assert!(loadout.familiar.is_none());
}

#[test]
fn accessories_go_to_the_highest_scores() {
    let mut owner = state("Cocoabo");
    give(
        &mut owner,
        &[
            "lucky gold ring",
            "Mr. Cheeng's spectacles",
            "Mr. Screege's spectacles",
            "Brimstone Bracelet",
        ],
    );
    let loadout = dress(config(), &owner, "Cocoabo");
    let worn: Vec<&str> = Slot::ACCESSORIES
        .iter()
        .filter_map(|slot| loadout.slots.get(slot).map(String::as_str))
        .collect();
    assert_eq!(
        worn,
        vec!["lucky gold ring", "Mr. Cheeng's spectacles", "Mr. Screege's spectacles"]
    );
    assert!(!loadout.wears("Brimstone Bracelet"));
}

#[test]
fn rider_is_computed_once_per_mode() {
    let mut owner = state("Cocoabo");
    owner.familiars.insert("Leprechaun".to_string());
    owner.familiars.insert("Warbear Drone".to_string());
    let config = config();
    let values = ValueCatalog::from_config(&config.values);
    let mut optimizer = Optimizer::new(config);
    let mode = RiderMode::new(4.4, 0.0);

    let first = optimizer.ensure_rider(mode, &owner, &values, Some("Cocoabo")).expect("rider");
    let second = optimizer.ensure_rider(mode, &owner, &values, Some("Cocoabo")).expect("rider");
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(optimizer.cached_riders(), 1);

    optimizer
        .ensure_rider(RiderMode::new(0.0, 0.0), &owner, &values, Some("Cocoabo"))
        .expect("rider");
    assert_eq!(optimizer.cached_riders(), 2);
    optimizer.reset();
    assert_eq!(optimizer.cached_riders(), 0);
}

#[test]
fn excluded_familiar_is_part_of_the_rider_key() {
    let mut owner = state("Cocoabo");
    owner.familiars.insert("Leprechaun".to_string());
    owner.familiars.insert("Warbear Drone".to_string());
    let config = config();
    let values = ValueCatalog::from_config(&config.values);
    let mut optimizer = Optimizer::new(config);
    let mode = RiderMode::new(0.0, 0.0);

    let without_drone = optimizer
        .ensure_rider(mode, &owner, &values, Some("Warbear Drone"))
        .expect("rider");
    let without_leprechaun = optimizer
        .ensure_rider(mode, &owner, &values, Some("Leprechaun"))
        .expect("rider");
    assert_eq!(without_drone.familiar, "Leprechaun");
    assert_eq!(without_leprechaun.familiar, "Warbear Drone");
    assert_eq!(optimizer.cached_riders(), 2);
}

#[test]
fn capped_rider_drops_are_worth_nothing() {
    let mut owner = state("Cocoabo");
    owner.familiars.insert("Garbage Fire".to_string());
    owner.set_property("_garbageFireDropsCrown", "3");
    let config = config();
    let values = ValueCatalog::from_config(&config.values);
    let mut optimizer = Optimizer::new(config);
    let rider = optimizer
        .ensure_rider(RiderMode::new(0.0, 0.0), &owner, &values, None)
        .expect("rider");
    assert_eq!(rider.familiar, "Garbage Fire");
    assert_eq!(rider.value, 0.0);
}

#[test]
fn no_rider_owned_is_an_error_only_with_a_carrier() {
    let config = config();
    let mut values = ValueCatalog::from_config(&config.values);
    let mut optimizer = Optimizer::new(config);
    let request = EquipmentRequest::new().familiar("Cocoabo");

    let bare = state("Cocoabo");
    let loadout = optimizer.combat_loadout(&request, &bare, &mut values).expect("no carrier");
    assert!(loadout.rider.is_none());

    let mut carrier = state("Cocoabo");
    give(&mut carrier, &["Buddy Bjorn"]);
    let err = optimizer
        .combat_loadout(&request, &carrier, &mut values)
        .expect_err("carrier without riders");
    assert!(matches!(err, AutoplayError::CannotEquip(_)));
}

#[test]
fn carrier_holds_the_picked_rider() {
    let mut owner = state("Cocoabo");
    owner.familiars.insert("Leprechaun".to_string());
    give(&mut owner, &["Buddy Bjorn"]);
    let loadout = dress(config(), &owner, "Cocoabo");
    let rider = loadout.rider.as_ref().expect("mounted");
    assert_eq!(rider.carrier, "Buddy Bjorn");
    assert_eq!(rider.slot, Slot::Back);
    assert_eq!(rider.rider.familiar, "Leprechaun");
    assert_eq!(loadout.slots.get(&Slot::Back).map(String::as_str), Some("Buddy Bjorn"));
}

#[test]
fn ghost_pack_is_worn_when_a_ghost_is_due() {
    let mut owner = state("Cocoabo");
    give(&mut owner, &["protonic accelerator pack"]);
    owner.set_property("questPAGhost", "unstarted");
    owner.set_property("nextParanormalActivity", "40");
    let loadout = dress(config(), &owner, "Cocoabo");
    assert_eq!(
        loadout.slots.get(&Slot::Back).map(String::as_str),
        Some("protonic accelerator pack")
    );
}

#[test]
fn digitized_target_switches_to_the_best_leprechaun() {
    let mut owner = state("Cocoabo");
    owner.familiars.insert("Leprechaun".to_string());
    owner.familiars.insert("Hobo Monkey".to_string());
    owner.set_property("_sourceTerminalDigitizeMonster", "Knob Goblin Embezzler");
    let config = config();
    let mut values = ValueCatalog::from_config(&config.values);
    let mut optimizer = Optimizer::new(config);
    let loadout = optimizer
        .digitize_loadout(&EquipmentRequest::new().familiar("Cocoabo"), &owner, &mut values)
        .expect("digitize loadout");
    assert_eq!(loadout.familiar.as_deref(), Some("Hobo Monkey"));
    assert!(loadout
        .modifiers
        .iter()
        .any(|target| target.stat == Stat::MeatDrop && target.weight == 10.0));

    owner.set_property("_sourceTerminalDigitizeMonster", "Witchess Knight");
    let fallback = optimizer
        .digitize_loadout(&EquipmentRequest::new().familiar("Cocoabo"), &owner, &mut values)
        .expect("combat loadout");
    assert_eq!(fallback.familiar.as_deref(), Some("Cocoabo"));
}
