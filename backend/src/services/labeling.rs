//! Synthetic vacancy labels for retraining.
//!
//! The source feature table has no occupancy ground truth. Labels are drawn
//! from a hand-tuned probability that favours vacancy at night, at weekends
//! and in the off-peak hour bins. A model trained on them learns this
//! heuristic, not real occupancy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::features::VacancyFeatures;

pub const DEFAULT_SEED: u64 = 42;

const BASE_PROBABILITY: f64 = 0.4;
const OFF_PEAK_HOUR_BONUS: f64 = 0.3;
const WEEKEND_BONUS: f64 = 0.15;
const OFF_PEAK_BIN_BONUS: f64 = 0.2;

/// Probability that a slot is vacant under the heuristic, clamped to [0, 1].
pub fn vacancy_probability(features: &VacancyFeatures) -> f64 {
    let [hour, _day, weekend, bin] = features.to_array();

    let mut p = BASE_PROBABILITY;
    if hour < 6 || hour > 22 {
        p += OFF_PEAK_HOUR_BONUS;
    }
    if weekend == 1 {
        p += WEEKEND_BONUS;
    }
    if bin == 0 || bin == 5 {
        p += OFF_PEAK_BIN_BONUS;
    }
    p.clamp(0.0, 1.0)
}

/// Seeded Bernoulli draws from [`vacancy_probability`].
pub struct SyntheticVacancyLabeler {
    rng: StdRng,
}

impl SyntheticVacancyLabeler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn label(&mut self, features: &VacancyFeatures) -> u8 {
        u8::from(self.rng.gen_bool(vacancy_probability(features)))
    }
}

impl Default for SyntheticVacancyLabeler {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
