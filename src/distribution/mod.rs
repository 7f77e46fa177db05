// distribution/mod.rs
// Splits a particle population into RN / RNH+ counts per compartment

use serde::{Deserialize, Serialize};

use crate::anesthetic::AnestheticProfile;
use crate::config::ModelConfig;
use crate::ionization::IonizationResult;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Compartment {
    Extracellular,
    Intracellular,
}

impl Compartment {
    pub fn label(&self) -> &'static str {
        match self {
            Compartment::Extracellular => "Extracelular",
            Compartment::Intracellular => "Intracelular",
        }
    }
}

/// `(base, ionized)` counts for `total` particles at `base_percent`.
///
/// `base = floor(total * base_percent / 100)`; whatever the floor drops goes to
/// the ionized count, so the pair always sums to `total`. Percentages outside
/// [0, 100] are clamped and NaN counts as 0.
pub fn compartment_distribution(base_percent: f64, total: u32) -> (u32, u32) {
    let p = if base_percent.is_nan() { 0.0 } else { base_percent.clamp(0.0, 100.0) };
    let base = ((total as f64 * p / 100.0).floor() as u32).min(total);
    (base, total - base)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompartmentDistribution {
    pub compartment: Compartment,
    pub ph: f64,
    pub total_particles: u32,
    pub base_percent: f64,
    pub base_count: u32,
    pub ionized_count: u32,
}

impl CompartmentDistribution {
    pub fn new(compartment: Compartment, ionization: &IonizationResult, total: u32) -> Self {
        let (base_count, ionized_count) = compartment_distribution(ionization.base_percent, total);
        Self {
            compartment,
            ph: ionization.ph,
            total_particles: total,
            base_percent: ionization.base_percent,
            base_count,
            ionized_count,
        }
    }

    pub fn ionized_percent(&self) -> f64 {
        100.0 - self.base_percent
    }
}

/// Both compartments at equilibrium for one drug under one config.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSnapshot {
    pub extracellular: CompartmentDistribution,
    pub intracellular: CompartmentDistribution,
}

impl EquilibriumSnapshot {
    pub fn compute(profile: &AnestheticProfile, config: &ModelConfig) -> Self {
        let extra_ion = IonizationResult::new(profile.pka, config.extracellular_ph);
        let extracellular = CompartmentDistribution::new(
            Compartment::Extracellular,
            &extra_ion,
            config.extracellular_total,
        );

        let intra_total = config.intracellular_total(extracellular.base_count);
        let intra_ion = IonizationResult::new(profile.pka, config.intracellular_ph);
        let intracellular = CompartmentDistribution::new(Compartment::Intracellular, &intra_ion, intra_total);

        log::debug!(
            "{}: extra RN {} / RNH+ {}, intra RN {} / RNH+ {}",
            profile.name,
            extracellular.base_count,
            extracellular.ionized_count,
            intracellular.base_count,
            intracellular.ionized_count
        );

        Self { extracellular, intracellular }
    }

    pub fn get(&self, compartment: Compartment) -> &CompartmentDistribution {
        match compartment {
            Compartment::Extracellular => &self.extracellular,
            Compartment::Intracellular => &self.intracellular,
        }
    }
}
