// Centralized configuration for model parameters

use serde::{Deserialize, Serialize};

// ====================
// Acid-base Parameters
// ====================
/// Physiological pH used for both compartments unless overridden.
pub const PHYSIOLOGICAL_PH: f64 = 7.4;
/// Lowest pH accepted by the CLI sweep (inflamed tissue sits near 6.5).
pub const SWEEP_PH_MIN: f64 = 4.0;
/// Highest pH accepted by the CLI sweep.
pub const SWEEP_PH_MAX: f64 = 10.0;
/// Most rows a single pH sweep may produce.
pub const SWEEP_MAX_POINTS: usize = 10_000;

// ====================
// Particle Populations
// ====================
pub const EXTRACELLULAR_TOTAL: u32 = 1000;
/// Intracellular population as a fraction of the extracellular one.
pub const INTRACELLULAR_FRACTION: f64 = 0.25;
/// Representative particles drawn per compartment scatter.
pub const DISPLAY_PARTICLES: u32 = 20;
/// Max base particles crossing the membrane at once.
pub const MAX_IN_TRANSIT: u32 = 3;
/// Intracellular base particles converted back to RNH+ in stage 4.
pub const REIONIZED_COUNT: u32 = 2;

// ====================
// Dose Parameters
// ====================
/// Volume of one dental cartridge (tubete), in mL.
pub const CARTRIDGE_VOLUME_ML: f64 = 1.8;
/// Weight ceiling applied before any per-kg multiplication.
pub const MAX_DOSING_WEIGHT_KG: f64 = 80.0;

// ====================
// Layout (unit square, y up)
// ====================
pub const MEMBRANE_Y: f32 = 0.5;
pub const MEMBRANE_HALF_THICKNESS: f32 = 0.02;
/// Extracellular RNH+ region: x range, y range.
pub const EXTRA_IONIZED_REGION: ([f32; 2], [f32; 2]) = ([0.1, 0.3], [0.6, 0.9]);
/// Extracellular RN region.
pub const EXTRA_BASE_REGION: ([f32; 2], [f32; 2]) = ([0.7, 0.9], [0.6, 0.9]);
/// Random-walk clip box for extracellular RNH+.
pub const EXTRA_IONIZED_BOUNDS: ([f32; 2], [f32; 2]) = ([0.05, 0.35], [0.55, 0.95]);
/// Random-walk clip box for extracellular RN.
pub const EXTRA_BASE_BOUNDS: ([f32; 2], [f32; 2]) = ([0.65, 0.95], [0.55, 0.95]);
/// Random-walk clip box for everything intracellular.
pub const INTRA_BOUNDS: ([f32; 2], [f32; 2]) = ([0.05, 0.95], [0.05, 0.45]);
/// Height at which particles land after crossing.
pub const INTRA_ARRIVAL_Y: f32 = 0.2;
pub const CHANNEL_POS: [f32; 2] = [0.4, 0.2];
pub const CHANNEL_HALF_SIZE: f32 = 0.05;
/// Radius around the channel inside which RNH+ is drawn in.
pub const CHANNEL_CAPTURE_RADIUS: f32 = 0.1;

// ====================
// Random Walk (decorative only)
// ====================
pub const JITTER_SIGMA: f32 = 0.01;
pub const CROSSING_START_PROBABILITY: f64 = 0.02;
pub const CROSSING_PROGRESS_PER_FRAME: f32 = 0.05;
/// Chance a particle finishing its crossing shows up as RNH+.
pub const ARRIVAL_IONIZED_PROBABILITY: f64 = 0.3;
pub const CHANNEL_PULL: f32 = 0.1;
pub const CROSSING_START_Y: f32 = 0.9;
pub const CROSSING_DROP: f32 = 0.5;

/// How the intracellular particle total is derived from the extracellular one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntracellularPolicy {
    /// `floor(extracellular_total * fraction)`
    FixedFraction { fraction: f64 },
    /// Intracellular total equals the extracellular RN count.
    MatchExtracellularBase,
}

impl Default for IntracellularPolicy {
    fn default() -> Self {
        IntracellularPolicy::FixedFraction {
            fraction: INTRACELLULAR_FRACTION,
        }
    }
}

/// Runtime model parameters. Built once and passed by reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub extracellular_ph: f64,
    pub intracellular_ph: f64,
    pub extracellular_total: u32,
    pub intracellular_policy: IntracellularPolicy,
    pub display_particles: u32,
    pub max_in_transit: u32,
    pub reionized_count: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            extracellular_ph: PHYSIOLOGICAL_PH,
            intracellular_ph: PHYSIOLOGICAL_PH,
            extracellular_total: EXTRACELLULAR_TOTAL,
            intracellular_policy: IntracellularPolicy::default(),
            display_particles: DISPLAY_PARTICLES,
            max_in_transit: MAX_IN_TRANSIT,
            reionized_count: REIONIZED_COUNT,
        }
    }
}

impl ModelConfig {
    /// Intracellular total for a given extracellular base count.
    pub fn intracellular_total(&self, extracellular_base: u32) -> u32 {
        match self.intracellular_policy {
            IntracellularPolicy::FixedFraction { fraction } => {
                let fraction = if fraction.is_finite() { fraction.max(0.0) } else { 0.0 };
                (self.extracellular_total as f64 * fraction).floor() as u32
            }
            IntracellularPolicy::MatchExtracellularBase => extracellular_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_policy_gives_quarter_population() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.intracellular_total(240), 250);
    }

    #[test]
    fn match_policy_uses_extracellular_base() {
        let cfg = ModelConfig {
            intracellular_policy: IntracellularPolicy::MatchExtracellularBase,
            ..ModelConfig::default()
        };
        assert_eq!(cfg.intracellular_total(240), 240);
    }

    #[test]
    fn negative_fraction_collapses_to_zero() {
        let cfg = ModelConfig {
            intracellular_policy: IntracellularPolicy::FixedFraction { fraction: -1.0 },
            ..ModelConfig::default()
        };
        assert_eq!(cfg.intracellular_total(10), 0);
    }
}
