//! Dose-limit calculator
//!
//! This module provides:
//! - Closed enums for salts, vasoconstrictors and ASA classes, parsed from labels
//! - Read-only dose and cartridge-ceiling tables
//! - The maximum-dose computation and its clinical notes

pub mod calculator;
pub mod notes;
pub mod tables;

pub use calculator::{compute_max_dose, compute_max_dose_by_label, DoseRequest, DoseResult};
pub use tables::{ActiveIngredient, AsaClass, CartridgeCeiling, DoseTables, DrugSalt, SaltLimits, Vasoconstrictor};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DoseError {
    #[error("Unknown salt or concentration: {salt} {}", .concentration.as_deref().unwrap_or(""))]
    UnknownSaltOrConcentration {
        salt: String,
        concentration: Option<String>,
    },
    #[error("Unknown vasoconstrictor: {0}")]
    UnknownVasoconstrictor(String),
    #[error("Unknown ASA class: {0}")]
    UnknownAsaClass(String),
    #[error("An ASA class is required when {0} is used")]
    AsaClassRequired(Vasoconstrictor),
    #[error("Weight must be a finite, non-negative number of kg, got {0}")]
    InvalidWeight(f64),
    #[error("Dose table misconfigured: {0}")]
    Misconfigured(String),
}

#[cfg(test)]
mod tests;
