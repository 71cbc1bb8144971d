use ghostrider_core::{BonusRule, GameConfig, PantsgivingRule, SessionState, ValueCatalog};
use std::collections::BTreeMap;

/// Turns assumed when the pantsgiving counter is past its last threshold.
const PANTSGIVING_FALLBACK_TURNS: i64 = 50_000;

/// Per-item bonus value of owned items whose worth does not depend on the outfit.
pub fn easy_bonuses(
    config: &GameConfig,
    state: &SessionState,
    values: &mut ValueCatalog,
) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    for rule in &config.bonuses {
        match rule {
            BonusRule::Flat { item, value } => {
                if state.have_item(item) {
                    out.insert(item.clone(), *value);
                }
            }
            BonusRule::ConsumableDrops { item, share } => {
                if state.have_item(item) {
                    out.insert(item.clone(), share * values.consumable_pool_value());
                }
            }
            BonusRule::DecayingDrops {
                item,
                drops,
                counter,
                cap,
                base_rate,
                decay,
                floor,
            } => {
                let count = state.property_int(counter);
                if state.have_item(item) && count < *cap {
                    let rate = (base_rate - count as f64 * decay).max(*floor);
                    out.insert(item.clone(), values.average_value(drops) * rate);
                }
            }
            BonusRule::Sweat {
                item,
                sweat,
                uses,
                per_use,
                max_uses,
                drinks,
                martini,
            } => {
                if !state.have_item(item) {
                    continue;
                }
                let wanted = per_use * (max_uses - state.property_int(uses));
                if state.property_int(sweat) >= wanted {
                    continue;
                }
                let adventure = values.value_of_adventure();
                let cheapest = drinks.iter().fold(None::<&String>, |best, drink| match best {
                    Some(current) if values.price(current) <= values.price(drink) => Some(current),
                    _ => Some(drink),
                });
                let drink_value = cheapest.map_or(0.0, |drink| {
                    (values.adventures(drink) * adventure - values.price(drink)) / 3.0
                });
                let martini_value = (values.adventures(martini) + 2.0) * adventure - values.price(martini);
                let per_point = drink_value.max(martini_value) * 2.0 / *per_use as f64;
                out.insert(item.clone(), per_point);
            }
            BonusRule::PropertyContains {
                item,
                property,
                needle,
                value,
            } => {
                let matched = state
                    .property(property)
                    .is_some_and(|text| text.contains(needle.as_str()));
                if state.have_item(item) && matched {
                    out.insert(item.clone(), *value);
                }
            }
            BonusRule::Rake {
                items,
                requires,
                leaf,
                multiplier,
            } => {
                if !state.have_item(requires) {
                    continue;
                }
                for rake in items.iter().filter(|rake| state.have_item(rake)) {
                    out.insert(rake.clone(), values.value(leaf) * multiplier);
                }
            }
        }
    }
    out
}

/// Value of the next pantsgiving fullness, spread over the turns it takes to earn it.
pub fn pantsgiving_bonus(
    rule: &PantsgivingRule,
    state: &SessionState,
    values: &ValueCatalog,
    adventure_value: f64,
) -> Option<(String, f64)> {
    if !state.have_item(&rule.item) {
        return None;
    }
    let counters = state.counters;
    let count = state.property_int(&rule.count);
    let index = if counters.fullness >= counters.fullness_limit {
        usize::try_from(state.property_int(&rule.fullness)).ok()
    } else {
        rule.thresholds.iter().position(|threshold| count < *threshold)
    };
    let turns = index
        .and_then(|index| rule.thresholds.get(index).copied())
        .unwrap_or(PANTSGIVING_FALLBACK_TURNS);
    if turns - count > counters.adventures {
        return None;
    }
    let spork_used = state.property_bool(&rule.spork_used);
    let extra = if spork_used { 3.0 } else { 0.0 };
    let spork_cost = if spork_used { values.price(&rule.spork) } else { 0.0 };
    let fullness_value = adventure_value * (values.adventures(&rule.food) + 1.0 + extra)
        - values.price(&rule.food)
        - values.price(&rule.seasoning)
        - spork_cost;
    Some((rule.item.clone(), fullness_value / (turns as f64 * 0.9)))
}
