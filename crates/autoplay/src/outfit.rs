//! Equipment valuation: picks a loadout that maximizes expected value per action.

mod bonuses;
mod curves;
mod rider;
mod slots;

pub use bonuses::{easy_bonuses, pantsgiving_bonus};
pub use curves::*;
pub use rider::*;
pub use slots::{fill_open_slots, item_score};

use crate::AutoplayError;
use ghostrider_core::{
    GameConfig, ModifierTarget, SessionState, Slot, SlotKind, Stat, ValueCatalog, WriteOnceCache,
};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use tracing::debug;

/// Hard constraints a task puts on its loadout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentRequest {
    pub familiar: Option<String>,
    pub items: Vec<String>,
    pub modifiers: Vec<ModifierTarget>,
}

impl EquipmentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn familiar(mut self, familiar: &str) -> Self {
        self.familiar = Some(familiar.to_string());
        self
    }

    pub fn item(mut self, item: &str) -> Self {
        self.items.push(item.to_string());
        self
    }

    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountedRider {
    pub carrier: String,
    pub slot: Slot,
    pub rider: Rc<RiderChoice>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loadout {
    pub familiar: Option<String>,
    pub slots: BTreeMap<Slot, String>,
    pub rider: Option<MountedRider>,
    pub modifiers: Vec<ModifierTarget>,
    pub bonuses: BTreeMap<String, f64>,
    /// Advisory estimate of value per action; `None` when the curve is undefined.
    pub expected_value: Option<f64>,
}

impl Loadout {
    pub fn wears(&self, item: &str) -> bool {
        self.slots.values().any(|worn| worn == item)
    }

    pub fn slot_of(&self, item: &str) -> Option<Slot> {
        self.slots
            .iter()
            .find(|(_, worn)| *worn == item)
            .map(|(slot, _)| *slot)
    }

    /// Put an item in the first free slot of its kind.
    pub fn equip(&mut self, config: &GameConfig, item: &str) -> Option<Slot> {
        if let Some(slot) = self.slot_of(item) {
            return Some(slot);
        }
        let kind = config.item_slot(item)?;
        if kind == SlotKind::Familiar && self.familiar.is_none() {
            return None;
        }
        let slot = kind
            .slots()
            .iter()
            .copied()
            .find(|slot| !self.slots.contains_key(slot))?;
        self.slots.insert(slot, item.to_string());
        Some(slot)
    }

    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.slots.values().map(String::as_str)
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(familiar) = &self.familiar {
            parts.push(format!("familiar={familiar}"));
        }
        for (slot, item) in &self.slots {
            parts.push(format!("{}={item}", slot.label()));
        }
        if let Some(mounted) = &self.rider {
            parts.push(format!("rider={}", mounted.rider.familiar));
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Memo {
    BaseAdventureValue,
    OutfitWeight,
    EffectWeight,
}

/// Builds loadouts. Lazily derived quantities live here for one run and are
/// dropped by `reset`.
pub struct Optimizer {
    config: GameConfig,
    scorer: Box<dyn RiderScore>,
    riders: WriteOnceCache<String, Rc<RiderChoice>>,
    memo: WriteOnceCache<Memo, f64>,
}

impl Optimizer {
    pub fn new(config: GameConfig) -> Self {
        Self::with_scorer(config, Box::new(LinearRiderScore))
    }

    pub fn with_scorer(config: GameConfig, scorer: Box<dyn RiderScore>) -> Self {
        Self {
            config,
            scorer,
            riders: WriteOnceCache::new(),
            memo: WriteOnceCache::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.riders.reset();
        self.memo.reset();
    }

    pub fn cached_riders(&self) -> usize {
        self.riders.len()
    }

    /// Only the familiar and forced items; no valuation.
    pub fn forced_loadout(
        &self,
        request: &EquipmentRequest,
        state: &SessionState,
    ) -> Result<Loadout, AutoplayError> {
        let mut loadout = Loadout::default();
        if let Some(familiar) = &request.familiar {
            if !state.have_familiar(familiar) {
                return Err(AutoplayError::CannotEquip(format!(
                    "familiar {familiar} is not owned"
                )));
            }
            loadout.familiar = Some(familiar.clone());
        }
        for item in &request.items {
            if !state.have_item(item) {
                return Err(AutoplayError::CannotEquip(format!("{item} is not available")));
            }
            if loadout.equip(&self.config, item).is_none() {
                return Err(AutoplayError::CannotEquip(format!("no free slot for {item}")));
            }
        }
        loadout.modifiers = request.modifiers.clone();
        Ok(loadout)
    }

    pub fn combat_loadout(
        &mut self,
        request: &EquipmentRequest,
        state: &SessionState,
        values: &mut ValueCatalog,
    ) -> Result<Loadout, AutoplayError> {
        let familiar = request.familiar.clone().ok_or_else(|| {
            AutoplayError::CannotEquip(
                "about to go adventuring without a familiar, and that feels deeply wrong".to_string(),
            )
        })?;
        let mut loadout = self.forced_loadout(request, state)?;

        for companion in &self.config.familiars.companion_items {
            if companion.familiar == familiar && state.have_item(&companion.item) {
                loadout.equip(&self.config, &companion.item);
            }
        }
        if let Some(pack) = &self.config.rules.ghost_pack {
            if ghost_due(state) && state.have_item(pack) {
                loadout.equip(&self.config, pack);
            }
        }

        let base_value = self.base_adventure_value();
        let rate_bonus = action_rate_bonus(&self.config, state);
        let weight_value = match Regime::of(&self.config, &familiar) {
            Regime::Accumulation => {
                accumulation_weight_value(self.config.rules.weight_per_value, base_value)
            }
            Regime::Stasis(rule) => {
                let mut rate = rule.base_rate + rate_bonus;
                if let Some(tool) = &self.config.familiars.fold_tool {
                    let foldable = self
                        .config
                        .fold_group(&tool.item)
                        .iter()
                        .any(|member| state.have_item(member));
                    if rate < 1.0 && foldable {
                        loadout.equip(&self.config, &tool.item);
                    }
                    if loadout.wears(&tool.item) {
                        rate += tool.rate_bonus;
                    }
                }
                stasis_weight_value(rule, rate)
            }
            Regime::Flat => {
                let meat_song = self.config.rules.meat_song.is_some()
                    && state.song == self.config.rules.meat_song;
                loadout.modifiers.push(if meat_song {
                    ModifierTarget::new(Stat::MeatDrop, 0.25)
                } else {
                    ModifierTarget::new(Stat::ItemDrop, 0.01)
                });
                0.0
            }
        };
        if weight_value != 0.0 {
            loadout
                .modifiers
                .push(ModifierTarget::new(Stat::FamiliarWeight, round_to(weight_value, 3)));
        }

        self.mount_rider(&mut loadout, RiderMode::new(weight_value, 0.0), &familiar, state, values)?;
        loadout.bonuses = self.full_bonuses(&familiar, state, values)?;
        fill_open_slots(&self.config, state, &mut loadout);
        loadout.expected_value =
            self.adventure_value(&familiar, &loadout.slots, loadout.rider.is_some(), state, values)?;
        debug!(
            familiar = %familiar,
            weight_value,
            expected_value = ?loadout.expected_value,
            "combat loadout: {}",
            loadout.summary()
        );
        Ok(loadout)
    }

    /// Loadout for the digitized wanderer. Meat-focused when the digitized monster is
    /// the configured meat target, otherwise the ordinary combat loadout.
    pub fn digitize_loadout(
        &mut self,
        request: &EquipmentRequest,
        state: &SessionState,
        values: &mut ValueCatalog,
    ) -> Result<Loadout, AutoplayError> {
        let target = self.config.rules.digitize_target.as_deref();
        if target.is_none() || state.property("_sourceTerminalDigitizeMonster") != target {
            return self.combat_loadout(request, state, values);
        }
        let mut best: Option<(String, f64)> = None;
        for rule in &self.config.familiars.leprechauns {
            if !state.have_familiar(&rule.familiar) {
                continue;
            }
            if best.as_ref().map_or(true, |(_, top)| rule.multiplier > *top) {
                best = Some((rule.familiar.clone(), rule.multiplier));
            }
        }
        let Some((familiar, multiplier)) = best else {
            return self.combat_loadout(request, state, values);
        };

        let meat_song = self.config.rules.meat_song.is_some() && state.song == self.config.rules.meat_song;
        let base_meat = 1000.0 + if meat_song { 25.0 } else { 0.0 };
        let coefficient = base_meat / 100.0 * (2.0 * multiplier + multiplier.sqrt());
        let mut loadout = Loadout {
            familiar: Some(familiar.clone()),
            modifiers: vec![
                ModifierTarget::new(Stat::MeatDrop, base_meat / 100.0),
                ModifierTarget::new(Stat::ItemDrop, 0.72),
            ],
            ..Loadout::default()
        };
        self.mount_rider(
            &mut loadout,
            RiderMode::new(coefficient, base_meat / 100.0),
            &familiar,
            state,
            values,
        )?;
        let combat_familiar = request.familiar.clone().unwrap_or_else(|| familiar.clone());
        loadout.bonuses = self.full_bonuses(&combat_familiar, state, values)?;
        fill_open_slots(&self.config, state, &mut loadout);
        loadout.expected_value =
            self.adventure_value(&familiar, &loadout.slots, loadout.rider.is_some(), state, values)?;
        debug!(familiar = %familiar, multiplier, "digitize loadout: {}", loadout.summary());
        Ok(loadout)
    }

    /// Rider for a mode and excluded familiar, computed once per key for the whole run.
    pub fn ensure_rider(
        &mut self,
        mode: RiderMode,
        state: &SessionState,
        values: &ValueCatalog,
        exclude: Option<&str>,
    ) -> Result<Rc<RiderChoice>, AutoplayError> {
        let key = match exclude {
            Some(familiar) => format!("{};without:{familiar}", mode.key()),
            None => mode.key(),
        };
        if let Some(choice) = self.riders.get(&key) {
            return Ok(Rc::clone(choice));
        }
        let choice = pick_rider(&self.config, self.scorer.as_ref(), &mode, state, values, exclude)
            .ok_or_else(|| {
                AutoplayError::CannotEquip(format!("failed to make a sensible rider decision for {key}"))
            })?;
        debug!(key = %key, rider = %choice.familiar, value = choice.value, "picked rider");
        let stored = self.riders.insert(key, Rc::new(choice))?;
        Ok(Rc::clone(stored))
    }

    fn mount_rider(
        &mut self,
        loadout: &mut Loadout,
        mode: RiderMode,
        familiar: &str,
        state: &SessionState,
        values: &ValueCatalog,
    ) -> Result<(), AutoplayError> {
        let carrier = self
            .config
            .rules
            .carriers
            .iter()
            .find(|carrier| state.have_item(&carrier.item) && !loadout.slots.contains_key(&carrier.slot))
            .cloned();
        let Some(carrier) = carrier else {
            return Ok(());
        };
        let rider = self.ensure_rider(mode, state, values, Some(familiar))?;
        loadout.slots.insert(carrier.slot, carrier.item.clone());
        loadout.rider = Some(MountedRider {
            carrier: carrier.item,
            slot: carrier.slot,
            rider,
        });
        Ok(())
    }

    /// Easy bonuses plus the pantsgiving bonus, which depends on the value of an adventure
    /// in the current outfit.
    pub fn full_bonuses(
        &mut self,
        familiar: &str,
        state: &SessionState,
        values: &mut ValueCatalog,
    ) -> Result<BTreeMap<String, f64>, AutoplayError> {
        let mut bonuses = easy_bonuses(&self.config, state, values);
        let Some(rule) = self.config.pantsgiving.clone() else {
            return Ok(bonuses);
        };
        if !state.have_item(&rule.item) {
            return Ok(bonuses);
        }
        let carrier_worn = self
            .config
            .rules
            .carriers
            .iter()
            .any(|carrier| state.have_equipped(&carrier.item));
        let current = self.adventure_value(familiar, &state.equipped, carrier_worn, state, values)?;
        if let Some(value) = current {
            if let Some((item, bonus)) = pantsgiving_bonus(&rule, state, values, value) {
                bonuses.insert(item, bonus);
            }
        }
        Ok(bonuses)
    }

    /// Expected value of one action with `worn` equipped and `familiar` out.
    pub fn adventure_value(
        &mut self,
        familiar: &str,
        worn: &BTreeMap<Slot, String>,
        carrier_worn: bool,
        state: &SessionState,
        values: &mut ValueCatalog,
    ) -> Result<Option<f64>, AutoplayError> {
        let bonuses = easy_bonuses(&self.config, state, values);
        let worn_bonus: f64 = worn.values().filter_map(|item| bonuses.get(item)).sum();
        let rider_value = if carrier_worn {
            self.ensure_rider(RiderMode::new(0.0, 0.0), state, values, Some(familiar))?
                .value
        } else {
            0.0
        };
        let item_and_meat = worn_bonus + self.base_adventure_value() + rider_value;
        let outfit_weight = self.outfit_weight(state, values);
        let effect_weight = self.effect_weight(state);
        let rate_bonus = action_rate_bonus(&self.config, state);
        let rules = &self.config.rules;
        Ok(match Regime::of(&self.config, familiar) {
            Regime::Stasis(rule) => Some(stasis_adventure_value(
                item_and_meat,
                rules.base_familiar_weight + outfit_weight + effect_weight,
                rule,
                rule.base_rate + rate_bonus,
            )),
            Regime::Accumulation => accumulation_value(
                item_and_meat,
                outfit_weight + effect_weight,
                rules.base_familiar_weight,
                rules.weight_ceiling,
            ),
            Regime::Flat => Some(item_and_meat),
        })
    }

    pub fn base_adventure_value(&mut self) -> f64 {
        let base = self.config.rules.base_adventure_value;
        *self.memo.get_or_insert_with(Memo::BaseAdventureValue, || base)
    }

    /// Familiar weight reachable from owned gear in the slots the valuation leaves open.
    pub fn outfit_weight(&mut self, state: &SessionState, values: &mut ValueCatalog) -> f64 {
        let config = &self.config;
        *self
            .memo
            .get_or_insert_with(Memo::OutfitWeight, || estimated_outfit_weight(config, state, values))
    }

    /// Weight from effects that outlast the remaining adventures.
    pub fn effect_weight(&mut self, state: &SessionState) -> f64 {
        let config = &self.config;
        *self.memo.get_or_insert_with(Memo::EffectWeight, || {
            state
                .effects
                .iter()
                .filter(|(_, turns)| i64::from(**turns) >= state.counters.adventures)
                .filter_map(|(effect, _)| config.effect(effect))
                .map(|effect| effect.modifiers.familiar_weight)
                .sum()
        })
    }
}

fn ghost_due(state: &SessionState) -> bool {
    state.property("questPAGhost") == Some("unstarted")
        && state.property_int("nextParanormalActivity") <= i64::from(state.counters.turns_played)
        && !state.counters.is_drunk()
}

fn estimated_outfit_weight(config: &GameConfig, state: &SessionState, values: &mut ValueCatalog) -> f64 {
    let bonuses = easy_bonuses(config, state, values);
    let bonus_kinds: BTreeSet<SlotKind> = bonuses
        .keys()
        .filter_map(|item| config.item_slot(item))
        .collect();
    let bonus_accessories = bonuses
        .keys()
        .filter(|item| config.item_slot(item) == Some(SlotKind::Accessory))
        .count();
    let free_accessories = config
        .rules
        .accessory_slots
        .saturating_sub(bonus_accessories.min(config.rules.accessory_slots));

    let carrier_slots: BTreeSet<SlotKind> = config
        .rules
        .carriers
        .iter()
        .filter(|carrier| state.have_item(&carrier.item))
        .map(|carrier| carrier.slot.kind())
        .collect();
    let open = [SlotKind::Shirt, SlotKind::Weapon, SlotKind::OffHand, SlotKind::Back, SlotKind::Pants]
        .into_iter()
        .filter(|kind| match kind {
            SlotKind::Back => !carrier_slots.contains(kind),
            SlotKind::Pants => !bonus_kinds.contains(kind),
            _ => true,
        });

    let weight_of = |item: &str| config.item_modifiers(item).familiar_weight;
    let owned = || state.items.iter().filter(|(_, amount)| **amount > 0).map(|(item, _)| item.as_str());
    let slot_weight: f64 = open
        .map(|kind| {
            owned()
                .filter(|item| config.item_slot(item) == Some(kind))
                .map(weight_of)
                .fold(0.0, f64::max)
        })
        .sum();
    let mut accessory_weights: Vec<f64> = owned()
        .filter(|item| config.item_slot(item) == Some(SlotKind::Accessory))
        .map(weight_of)
        .collect();
    accessory_weights.sort_by(|a, b| b.total_cmp(a));
    let accessory_weight: f64 = accessory_weights.into_iter().take(free_accessories).sum();

    let familiar_weight: f64 = config
        .rules
        .weight_familiars
        .iter()
        .filter(|source| state.have_familiar(&source.id))
        .map(|source| source.weight)
        .sum();
    let skill_weight: f64 = config
        .rules
        .weight_skills
        .iter()
        .filter(|source| state.have_skill(&source.id))
        .map(|source| source.weight)
        .sum();
    slot_weight + accessory_weight + familiar_weight + skill_weight
}
