use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seeded source for simulated encounter outcomes.
#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True with the given probability; values outside [0, 1] are clamped.
    pub fn roll(&mut self, probability: f64) -> bool {
        let probability = probability.clamp(0.0, 1.0);
        if probability <= 0.0 {
            return false;
        }
        self.rng.gen_bool(probability)
    }
}
