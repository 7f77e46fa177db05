// anesthetic/types.rs
// AnestheticProfile, chemical class and onset range

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RegistryError;
use crate::utils::normalize_key;

/// Linkage between the aromatic ring and the amine group.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum AnestheticClass {
    Ester,
    Amide,
    /// Amide linkage with an ester side chain (articaine-like).
    AmideEster,
}

impl AnestheticClass {
    pub fn label(&self) -> &'static str {
        match self {
            AnestheticClass::Ester => "Éster",
            AnestheticClass::Amide => "Amida",
            AnestheticClass::AmideEster => "Amida/Éster",
        }
    }
}

impl fmt::Display for AnestheticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnestheticClass {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "ester" => Ok(AnestheticClass::Ester),
            "amide" | "amida" => Ok(AnestheticClass::Amide),
            "amide/ester" | "amida/ester" => Ok(AnestheticClass::AmideEster),
            _ => Err(RegistryError::UnknownClass(s.to_string())),
        }
    }
}

/// Onset of action in minutes. `Unknown` covers the "-" entries of topical agents.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum OnsetRange {
    Minutes { min: f64, max: f64 },
    Unknown,
}

impl fmt::Display for OnsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnsetRange::Minutes { min, max } => write!(f, "{}-{} min", min, max),
            OnsetRange::Unknown => f.write_str("-"),
        }
    }
}

impl FromStr for OnsetRange {
    type Err = RegistryError;

    /// Accepts "2-4", "14 - 18", a single "5", or "-" / "" for unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() || t == "-" {
            return Ok(OnsetRange::Unknown);
        }
        let bad = || RegistryError::InvalidOnset(s.to_string());
        let (lo, hi) = match t.split_once('-') {
            Some((lo, hi)) => (lo.trim(), hi.trim()),
            None => (t, t),
        };
        let min: f64 = lo.parse().map_err(|_| bad())?;
        let max: f64 = hi.parse().map_err(|_| bad())?;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || max < min {
            return Err(bad());
        }
        Ok(OnsetRange::Minutes { min, max })
    }
}

/// Physicochemical profile of one local anesthetic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnestheticProfile {
    pub name: String,
    pub class: AnestheticClass,
    pub pka: f64,
    /// Literature % base at pH 7.4. Kept as published, not recomputed.
    pub tabulated_base_percent: f64,
    pub onset: OnsetRange,
}

impl AnestheticProfile {
    pub fn new(
        name: &str,
        class: AnestheticClass,
        pka: f64,
        tabulated_base_percent: f64,
        onset: OnsetRange,
    ) -> Self {
        Self {
            name: name.to_string(),
            class,
            pka,
            tabulated_base_percent,
            onset,
        }
    }

    /// Registry key for this profile.
    pub fn key(&self) -> String {
        normalize_key(&self.name)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidProfile {
                name: self.name.clone(),
                reason: "empty name".to_string(),
            });
        }
        if !self.pka.is_finite() {
            return Err(RegistryError::InvalidProfile {
                name: self.name.clone(),
                reason: format!("pKa must be finite, got {}", self.pka),
            });
        }
        if !(0.0..=100.0).contains(&self.tabulated_base_percent) {
            return Err(RegistryError::InvalidProfile {
                name: self.name.clone(),
                reason: format!(
                    "tabulated base percent must be within 0-100, got {}",
                    self.tabulated_base_percent
                ),
            });
        }
        Ok(())
    }
}
