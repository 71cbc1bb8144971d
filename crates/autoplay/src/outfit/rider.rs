use ghostrider_core::{GameConfig, RiderDef, RiderDrops, SessionState, ValueCatalog};

/// What the optimizer currently values in a rider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderMode {
    pub weight_value: f64,
    pub meat_value: f64,
}

impl RiderMode {
    pub fn new(weight_value: f64, meat_value: f64) -> Self {
        Self {
            weight_value,
            meat_value,
        }
    }

    pub fn key(&self) -> String {
        format!("weight:{:.3};meat:{}", self.weight_value, self.meat_value)
    }
}

/// A familiar picked to ride in a carrier slot, with its expected value per action.
#[derive(Debug, Clone, PartialEq)]
pub struct RiderChoice {
    pub familiar: String,
    pub value: f64,
}

pub trait RiderScore {
    fn score(&self, rider: &RiderDef, mode: &RiderMode, state: &SessionState, values: &ValueCatalog) -> f64;
}

/// Drop value plus the linear worth of the rider's passive modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRiderScore;

impl RiderScore for LinearRiderScore {
    fn score(&self, rider: &RiderDef, mode: &RiderMode, state: &SessionState, values: &ValueCatalog) -> f64 {
        let capped = rider
            .drop_limit
            .as_ref()
            .is_some_and(|limit| state.property_int(&limit.property) >= limit.max);
        let drops = if capped {
            0.0
        } else {
            rider.probability * drop_value(&rider.drops, values)
        };
        drops
            + mode.weight_value * rider.modifiers.familiar_weight
            + mode.meat_value * rider.modifiers.meat_drop
    }
}

pub fn drop_value(drops: &RiderDrops, values: &ValueCatalog) -> f64 {
    match drops {
        RiderDrops::Meat { value } => *value,
        RiderDrops::Items { items } => values.average_value(items),
        RiderDrops::Weighted { items } => values.weighted_value(items),
        RiderDrops::Nothing => 0.0,
    }
}

/// Best owned rider for the mode, skipping `exclude`. Ties go to the earlier definition.
pub fn pick_rider(
    config: &GameConfig,
    scorer: &dyn RiderScore,
    mode: &RiderMode,
    state: &SessionState,
    values: &ValueCatalog,
    exclude: Option<&str>,
) -> Option<RiderChoice> {
    let mut best: Option<RiderChoice> = None;
    for rider in &config.familiars.riders {
        if !state.have_familiar(&rider.familiar) || exclude == Some(rider.familiar.as_str()) {
            continue;
        }
        let value = scorer.score(rider, mode, state, values);
        if best.as_ref().map_or(true, |current| value > current.value) {
            best = Some(RiderChoice {
                familiar: rider.familiar.clone(),
                value,
            });
        }
    }
    best
}
