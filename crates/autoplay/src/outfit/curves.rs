use ghostrider_core::{GameConfig, SessionState, StasisRule, Stat};

/// How a familiar turns weight into value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Regime<'a> {
    Stasis(&'a StasisRule),
    Accumulation,
    Flat,
}

impl<'a> Regime<'a> {
    pub fn of(config: &'a GameConfig, familiar: &str) -> Self {
        if let Some(rule) = config.stasis_rule(familiar) {
            Self::Stasis(rule)
        } else if config.is_accumulation_familiar(familiar) {
            Self::Accumulation
        } else {
            Self::Flat
        }
    }
}

/// Extra familiar actions per turn from worn gear and active effects.
pub fn action_rate_bonus(config: &GameConfig, state: &SessionState) -> f64 {
    let worn: f64 = state
        .equipped
        .values()
        .map(|item| config.item_modifiers(item).get(Stat::FamiliarActionBonus))
        .sum();
    let effects: f64 = state
        .effects
        .keys()
        .filter(|effect| state.have_effect(effect))
        .filter_map(|effect| config.effect(effect))
        .map(|effect| effect.modifiers.get(Stat::FamiliarActionBonus))
        .sum();
    let boosted = config
        .familiars
        .action_rate_effects
        .iter()
        .any(|effect| state.have_effect(effect));
    (worn + effects) / 100.0 + if boosted { 1.0 } else { 0.0 }
}

/// Meat per pound of weight for a stasis familiar acting at `rate`.
pub fn stasis_weight_value(rule: &StasisRule, rate: f64) -> f64 {
    rate.clamp(0.0, 1.0) * rule.meat_per_lb
}

/// Expected value per action of a stasis familiar at a given total weight.
pub fn stasis_adventure_value(item_and_meat: f64, weight: f64, rule: &StasisRule, rate: f64) -> f64 {
    item_and_meat + weight * stasis_weight_value(rule, rate)
}

/// Compounding value of extra adventures from an accumulating familiar.
/// `None` once the bonus weight reaches the ceiling.
pub fn accumulation_value(
    item_and_meat: f64,
    bonus_weight: f64,
    base_weight: f64,
    ceiling: f64,
) -> Option<f64> {
    let remaining = ceiling - bonus_weight - base_weight;
    (remaining > 0.0).then(|| item_and_meat * ceiling / remaining)
}

/// Linear weight value used while dressing an accumulating familiar.
pub fn accumulation_weight_value(weight_per_value: f64, base_adventure_value: f64) -> f64 {
    round_to(weight_per_value * base_adventure_value, 2)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_keeps_requested_places() {
        assert_eq!(round_to(0.619195046, 2), 0.62);
        assert_eq!(round_to(4.4004, 3), 4.4);
    }

    #[test]
    fn accumulation_guard_triggers_at_the_ceiling() {
        assert_eq!(accumulation_value(100.0, 980.0, 20.0, 1000.0), None);
        assert_eq!(accumulation_value(100.0, 0.0, 20.0, 1000.0), Some(100.0 * 1000.0 / 980.0));
    }
}
