//! Henderson-Hasselbalch ionization model.
//!
//! A local anesthetic is a weak base: the uncharged base (RN) crosses the
//! nerve sheath, the protonated form (RNH⁺) blocks the sodium channel. The
//! share of each at a given pH follows
//!
//! ```text
//! % RN = 100 / (1 + 10^(pKa - pH))
//! ```
//!
//! # Example
//! ```
//! use anesthetic_sim::ionization::base_percent;
//!
//! // pKa == pH: half of the drug is in base form
//! assert_eq!(base_percent(7.4, 7.4), 50.0);
//!
//! // Higher pKa → less base at physiological pH
//! assert!(base_percent(8.1, 7.4) < base_percent(7.7, 7.4));
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::anesthetic::{AnestheticClass, AnestheticProfile, OnsetRange};
use crate::config::SWEEP_MAX_POINTS;
use crate::profile_scope;

/// Plain-text form of the equation shown next to the results.
pub const HENDERSON_HASSELBALCH: &str = "% base livre (RN) = 1 / (1 + 10^(pKa - pH)) x 100";

/// Percent of the drug in base (RN) form.
///
/// Total on finite input. NaN or infinite arguments are not checked and
/// propagate through the arithmetic.
pub fn base_percent(pka: f64, ph: f64) -> f64 {
    100.0 / (1.0 + 10f64.powf(pka - ph))
}

/// Ionization state at one pH. `ionized_percent` is always
/// `100 - base_percent`, never computed independently.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IonizationResult {
    pub pka: f64,
    pub ph: f64,
    pub base_percent: f64,
    pub ionized_percent: f64,
}

impl IonizationResult {
    pub fn new(pka: f64, ph: f64) -> Self {
        let base = base_percent(pka, ph);
        Self {
            pka,
            ph,
            base_percent: base,
            ionized_percent: 100.0 - base,
        }
    }

    /// Base fraction in [0, 1].
    pub fn base_fraction(&self) -> f64 {
        self.base_percent / 100.0
    }
}

/// Shorthand for [`IonizationResult::new`].
pub fn ionize(pka: f64, ph: f64) -> IonizationResult {
    IonizationResult::new(pka, ph)
}

/// Evaluate one drug across `[ph_min, ph_max]` in increments of `step`,
/// in ascending pH order. Returns an empty vector for a non-finite bound,
/// a non-positive step, `ph_min > ph_max`, or more than
/// [`SWEEP_MAX_POINTS`] rows.
pub fn sweep(pka: f64, ph_min: f64, ph_max: f64, step: f64) -> Vec<IonizationResult> {
    profile_scope!("ionization_sweep");
    if !(ph_min.is_finite() && ph_max.is_finite() && step.is_finite()) || step <= 0.0 || ph_min > ph_max {
        log::warn!(
            "Rejecting pH sweep [{}, {}] step {}",
            ph_min, ph_max, step
        );
        return Vec::new();
    }
    // Small slack so the upper bound survives accumulated rounding.
    let steps = ((ph_max - ph_min) / step + 1e-9).floor();
    if !(steps < SWEEP_MAX_POINTS as f64) {
        log::warn!(
            "Rejecting pH sweep [{}, {}] step {}: more than {} points",
            ph_min, ph_max, step, SWEEP_MAX_POINTS
        );
        return Vec::new();
    }
    let n = steps as usize + 1;
    (0..n)
        .into_par_iter()
        .map(|i| IonizationResult::new(pka, ph_min + i as f64 * step))
        .collect()
}

/// Everything the side panel shows for one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnestheticReport {
    pub name: String,
    pub class: AnestheticClass,
    pub onset: OnsetRange,
    pub ionization: IonizationResult,
    pub tabulated_base_percent: f64,
    /// computed minus tabulated, in percentage points
    pub tabulated_discrepancy: f64,
}

impl AnestheticReport {
    pub fn new(profile: &AnestheticProfile, ph: f64) -> Self {
        let ionization = IonizationResult::new(profile.pka, ph);
        let discrepancy = ionization.base_percent - profile.tabulated_base_percent;
        log::debug!(
            "{}: pKa {} pH {} -> {:.2}% RN (table {}%)",
            profile.name, profile.pka, ph, ionization.base_percent, profile.tabulated_base_percent
        );
        Self {
            name: profile.name.clone(),
            class: profile.class,
            onset: profile.onset,
            ionization,
            tabulated_base_percent: profile.tabulated_base_percent,
            tabulated_discrepancy: discrepancy,
        }
    }
}

#[cfg(test)]
mod tests;
