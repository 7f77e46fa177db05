// dose/calculator.rs
// Maximum safe dose and cartridge count for one patient

use serde::{Deserialize, Serialize};

use super::notes::{drug_note, vasoconstrictor_note};
use super::tables::{AsaClass, DoseTables, DrugSalt, Vasoconstrictor};
use super::DoseError;
use crate::config::{CARTRIDGE_VOLUME_ML, MAX_DOSING_WEIGHT_KG};
use crate::profile_scope;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoseRequest {
    pub salt: DrugSalt,
    pub concentration: String,
    pub weight_kg: f64,
    pub vasoconstrictor: Option<Vasoconstrictor>,
    pub asa_class: Option<AsaClass>,
}

impl DoseRequest {
    pub fn new(salt: DrugSalt, concentration: &str, weight_kg: f64) -> Self {
        Self {
            salt,
            concentration: concentration.to_string(),
            weight_kg,
            vasoconstrictor: None,
            asa_class: None,
        }
    }

    pub fn with_vasoconstrictor(mut self, vaso: Vasoconstrictor, asa: AsaClass) -> Self {
        self.vasoconstrictor = Some(vaso);
        self.asa_class = Some(asa);
        self
    }

    /// Parse user-facing labels into a typed request.
    pub fn from_labels(
        salt: &str,
        concentration: &str,
        weight_kg: f64,
        vasoconstrictor: Option<&str>,
        asa_class: Option<&str>,
    ) -> Result<Self, DoseError> {
        let salt: DrugSalt = salt.parse()?;
        let vasoconstrictor = vasoconstrictor.map(str::parse::<Vasoconstrictor>).transpose()?;
        let asa_class = asa_class.map(str::parse::<AsaClass>).transpose()?;
        Ok(Self {
            salt,
            concentration: concentration.to_string(),
            weight_kg,
            vasoconstrictor,
            asa_class,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoseResult {
    pub salt: DrugSalt,
    pub concentration: String,
    /// Weight actually used, after the 80 kg ceiling.
    pub effective_weight_kg: f64,
    pub max_dose_mg: f64,
    pub volume_ml: f64,
    /// Cartridges allowed by the anesthetic dose alone.
    pub dose_limited_cartridges: u32,
    /// Vasoconstrictor ceiling for the ASA class, if any.
    pub vasoconstrictor_ceiling: Option<u32>,
    pub max_cartridges: u32,
    pub drug_note: String,
    pub vasoconstrictor_note: String,
}

/// Compute the maximum dose for `request` against `tables`.
///
/// ```text
/// weight     = min(weight_kg, 80)
/// max_dose   = min(mg_per_kg * weight, absolute_max)
/// volume     = max_dose / mg_per_ml
/// cartridges = min(floor(volume / 1.8), vasoconstrictor ceiling)
/// ```
pub fn compute_max_dose(tables: &DoseTables, request: &DoseRequest) -> Result<DoseResult, DoseError> {
    profile_scope!("compute_max_dose");
    // No lower floor: 0 kg is a valid zero-dose request.
    if !request.weight_kg.is_finite() || request.weight_kg < 0.0 {
        return Err(DoseError::InvalidWeight(request.weight_kg));
    }

    let unknown = || DoseError::UnknownSaltOrConcentration {
        salt: request.salt.to_string(),
        concentration: Some(request.concentration.clone()),
    };
    let limits = tables.limits(request.salt).ok_or_else(unknown)?;
    let mg_per_ml = limits.mg_per_ml(&request.concentration).ok_or_else(unknown)?;
    if !(mg_per_ml.is_finite() && mg_per_ml > 0.0) {
        return Err(DoseError::Misconfigured(format!(
            "{} {}: mg/mL must be positive, got {}",
            request.salt, request.concentration, mg_per_ml
        )));
    }

    let weight = request.weight_kg.min(MAX_DOSING_WEIGHT_KG);
    if weight < request.weight_kg {
        log::warn!(
            "Weight {} kg above dosing ceiling, using {} kg",
            request.weight_kg, MAX_DOSING_WEIGHT_KG
        );
    }

    let by_weight = limits.mg_per_kg * weight;
    let max_dose_mg = match limits.absolute_max_mg {
        Some(cap) => by_weight.min(cap),
        None => by_weight,
    };
    let volume_ml = max_dose_mg / mg_per_ml;
    let dose_limited_cartridges = (volume_ml / CARTRIDGE_VOLUME_ML).floor() as u32;

    let vasoconstrictor_ceiling = match (request.vasoconstrictor, request.asa_class) {
        (Some(vaso), Some(asa)) => match tables.ceiling(vaso) {
            Some(c) => c.for_class(asa),
            None => {
                return Err(DoseError::Misconfigured(format!(
                    "no cartridge ceiling row for {}",
                    vaso
                )))
            }
        },
        (Some(vaso), None) => return Err(DoseError::AsaClassRequired(vaso)),
        (None, Some(asa)) => {
            log::debug!("{} given without a vasoconstrictor; no ceiling applies", asa);
            None
        }
        (None, None) => None,
    };
    let max_cartridges = match vasoconstrictor_ceiling {
        Some(ceiling) => dose_limited_cartridges.min(ceiling),
        None => dose_limited_cartridges,
    };

    log::debug!(
        "{} {} @ {} kg: {:.1} mg, {:.2} mL, {} cartridge(s) (dose {}, ceiling {:?})",
        request.salt,
        request.concentration,
        weight,
        max_dose_mg,
        volume_ml,
        max_cartridges,
        dose_limited_cartridges,
        vasoconstrictor_ceiling
    );

    Ok(DoseResult {
        salt: request.salt,
        concentration: request.concentration.clone(),
        effective_weight_kg: weight,
        max_dose_mg,
        volume_ml,
        dose_limited_cartridges,
        vasoconstrictor_ceiling,
        max_cartridges,
        drug_note: drug_note(request.salt).to_string(),
        vasoconstrictor_note: vasoconstrictor_note(request.vasoconstrictor).to_string(),
    })
}

/// String boundary for [`compute_max_dose`]: labels are parsed into enums
/// first, so a misspelled salt fails here instead of matching nothing.
pub fn compute_max_dose_by_label(
    tables: &DoseTables,
    salt: &str,
    concentration: &str,
    weight_kg: f64,
    vasoconstrictor: Option<&str>,
    asa_class: Option<&str>,
) -> Result<DoseResult, DoseError> {
    let request = DoseRequest::from_labels(salt, concentration, weight_kg, vasoconstrictor, asa_class)?;
    compute_max_dose(tables, &request)
}
