// dose/tables.rs
// Salts, vasoconstrictors, ASA classes and the read-only dosing tables

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::DoseError;
use crate::utils::normalize_key;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum DrugSalt {
    Lidocaina,
    Mepivacaina,
    Prilocaina,
    Articaina,
    Bupivacaina,
}

impl DrugSalt {
    pub const ALL: [DrugSalt; 5] = [
        DrugSalt::Lidocaina,
        DrugSalt::Mepivacaina,
        DrugSalt::Prilocaina,
        DrugSalt::Articaina,
        DrugSalt::Bupivacaina,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DrugSalt::Lidocaina => "lidocaina",
            DrugSalt::Mepivacaina => "mepivacaina",
            DrugSalt::Prilocaina => "prilocaina",
            DrugSalt::Articaina => "articaina",
            DrugSalt::Bupivacaina => "bupivacaina",
        }
    }
}

impl fmt::Display for DrugSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DrugSalt {
    type Err = DoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        DrugSalt::ALL
            .iter()
            .copied()
            .find(|salt| salt.label() == key)
            .ok_or_else(|| DoseError::UnknownSaltOrConcentration {
                salt: s.to_string(),
                concentration: None,
            })
    }
}

/// Active ingredient of a vasoconstrictor; drives the clinical note.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum ActiveIngredient {
    Epinephrine,
    Norepinephrine,
    Phenylephrine,
    Felypressin,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Vasoconstrictor {
    Epinephrine1To50000,
    Epinephrine1To100000,
    Epinephrine1To200000,
    Norepinephrine1To30000,
    Phenylephrine1To2500,
    /// 0.03 IU/mL
    Felypressin,
}

impl Vasoconstrictor {
    pub const ALL: [Vasoconstrictor; 6] = [
        Vasoconstrictor::Epinephrine1To50000,
        Vasoconstrictor::Epinephrine1To100000,
        Vasoconstrictor::Epinephrine1To200000,
        Vasoconstrictor::Norepinephrine1To30000,
        Vasoconstrictor::Phenylephrine1To2500,
        Vasoconstrictor::Felypressin,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Vasoconstrictor::Epinephrine1To50000 => "1:50000 epinefrina",
            Vasoconstrictor::Epinephrine1To100000 => "1:100000 epinefrina",
            Vasoconstrictor::Epinephrine1To200000 => "1:200000 epinefrina",
            Vasoconstrictor::Norepinephrine1To30000 => "1:30000 norepinefrina",
            Vasoconstrictor::Phenylephrine1To2500 => "1:2500 fenilefrina",
            Vasoconstrictor::Felypressin => "0.03 UI/mL felipressina",
        }
    }

    pub fn ingredient(&self) -> ActiveIngredient {
        use Vasoconstrictor::*;
        match self {
            Epinephrine1To50000 | Epinephrine1To100000 | Epinephrine1To200000 => ActiveIngredient::Epinephrine,
            Norepinephrine1To30000 => ActiveIngredient::Norepinephrine,
            Phenylephrine1To2500 => ActiveIngredient::Phenylephrine,
            Felypressin => ActiveIngredient::Felypressin,
        }
    }
}

impl fmt::Display for Vasoconstrictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Vasoconstrictor {
    type Err = DoseError;

    /// Matches the full label, case and accent insensitive. "1:100.000"
    /// thousands separators are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = normalize_key(s);
        let key = match folded.split_once(' ') {
            Some((ratio, rest)) if ratio.starts_with("1:") => format!("{} {}", ratio.replace('.', ""), rest),
            _ => folded.clone(),
        };
        Vasoconstrictor::ALL
            .iter()
            .copied()
            .find(|v| normalize_key(v.label()) == key)
            .ok_or_else(|| DoseError::UnknownVasoconstrictor(s.to_string()))
    }
}

/// ASA physical status, grouped the way the ceilings are tabulated.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum AsaClass {
    /// ASA I/II: healthy or mild systemic disease.
    IOrII,
    /// ASA III/IV: severe systemic disease.
    IIIOrIV,
}

impl AsaClass {
    pub fn label(&self) -> &'static str {
        match self {
            AsaClass::IOrII => "ASA I/II",
            AsaClass::IIIOrIV => "ASA III/IV",
        }
    }
}

impl fmt::Display for AsaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AsaClass {
    type Err = DoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = normalize_key(s);
        let key = folded.strip_prefix("asa").unwrap_or(&folded).trim();
        match key {
            "i/ii" | "i" | "ii" | "1/2" | "1" | "2" => Ok(AsaClass::IOrII),
            "iii/iv" | "iii" | "iv" | "3/4" | "3" | "4" => Ok(AsaClass::IIIOrIV),
            _ => Err(DoseError::UnknownAsaClass(s.to_string())),
        }
    }
}

/// Dosing limits for one salt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaltLimits {
    pub mg_per_kg: f64,
    /// `None` means no absolute cap.
    pub absolute_max_mg: Option<f64>,
    /// Concentration label ("2%") to mg/mL.
    pub concentrations: Vec<(String, f64)>,
}

impl SaltLimits {
    pub fn mg_per_ml(&self, concentration: &str) -> Option<f64> {
        let key = concentration_key(concentration);
        self.concentrations
            .iter()
            .find(|(label, _)| concentration_key(label) == key)
            .map(|(_, mg)| *mg)
    }
}

/// "0,5 %" and "0.5%" are the same key.
fn concentration_key(label: &str) -> String {
    normalize_key(label)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Cartridge ceilings for one vasoconstrictor. `None` means unlimited.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartridgeCeiling {
    pub asa_i_ii: Option<u32>,
    pub asa_iii_iv: Option<u32>,
}

impl CartridgeCeiling {
    pub fn for_class(&self, asa: AsaClass) -> Option<u32> {
        match asa {
            AsaClass::IOrII => self.asa_i_ii,
            AsaClass::IIIOrIV => self.asa_iii_iv,
        }
    }
}

/// Read-only dose and vasoconstrictor tables.
#[derive(Clone, Debug, PartialEq)]
pub struct DoseTables {
    salts: HashMap<DrugSalt, SaltLimits>,
    ceilings: HashMap<Vasoconstrictor, CartridgeCeiling>,
}

static BUILTIN: Lazy<DoseTables> = Lazy::new(|| {
    use DrugSalt::*;
    use Vasoconstrictor::*;
    let limits = |mg_per_kg: f64, max: f64, conc: &[(&str, f64)]| SaltLimits {
        mg_per_kg,
        absolute_max_mg: Some(max),
        concentrations: conc.iter().map(|(l, mg)| (l.to_string(), *mg)).collect(),
    };
    let ceiling = |a: Option<u32>, b: Option<u32>| CartridgeCeiling {
        asa_i_ii: a,
        asa_iii_iv: b,
    };

    let mut salts = HashMap::new();
    salts.insert(Lidocaina, limits(7.0, 500.0, &[("2%", 20.0)]));
    salts.insert(Mepivacaina, limits(6.6, 400.0, &[("2%", 20.0), ("3%", 30.0)]));
    salts.insert(Prilocaina, limits(8.0, 500.0, &[("3%", 30.0), ("4%", 40.0)]));
    salts.insert(Articaina, limits(7.0, 500.0, &[("4%", 40.0)]));
    salts.insert(Bupivacaina, limits(2.0, 90.0, &[("0.5%", 5.0)]));

    // Epinephrine: 0.2 mg healthy / 0.04 mg cardiac. Norepinephrine: 0.34 / 0.14 mg.
    // Phenylephrine: 4 / 1.6 mg. Each divided by the content of one 1.8 mL cartridge.
    let mut ceilings = HashMap::new();
    ceilings.insert(Epinephrine1To50000, ceiling(Some(5), Some(1)));
    ceilings.insert(Epinephrine1To100000, ceiling(Some(11), Some(2)));
    ceilings.insert(Epinephrine1To200000, ceiling(Some(22), Some(4)));
    ceilings.insert(Norepinephrine1To30000, ceiling(Some(5), Some(2)));
    ceilings.insert(Phenylephrine1To2500, ceiling(Some(5), Some(2)));
    ceilings.insert(Felypressin, ceiling(None, Some(5)));

    DoseTables { salts, ceilings }
});

impl DoseTables {
    pub fn builtin() -> &'static DoseTables {
        &BUILTIN
    }

    /// Build custom tables, rejecting entries that would divide by zero or
    /// yield negative doses.
    pub fn new(
        salts: HashMap<DrugSalt, SaltLimits>,
        ceilings: HashMap<Vasoconstrictor, CartridgeCeiling>,
    ) -> Result<Self, DoseError> {
        let tables = DoseTables { salts, ceilings };
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<(), DoseError> {
        for (salt, limits) in &self.salts {
            if !(limits.mg_per_kg.is_finite() && limits.mg_per_kg >= 0.0) {
                return Err(DoseError::Misconfigured(format!(
                    "{}: mg/kg must be finite and non-negative, got {}",
                    salt, limits.mg_per_kg
                )));
            }
            if let Some(max) = limits.absolute_max_mg {
                if !(max >= 0.0) {
                    return Err(DoseError::Misconfigured(format!(
                        "{}: absolute maximum must be non-negative, got {}",
                        salt, max
                    )));
                }
            }
            for (label, mg_per_ml) in &limits.concentrations {
                if !(mg_per_ml.is_finite() && *mg_per_ml > 0.0) {
                    return Err(DoseError::Misconfigured(format!(
                        "{} {}: mg/mL must be positive, got {}",
                        salt, label, mg_per_ml
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn limits(&self, salt: DrugSalt) -> Option<&SaltLimits> {
        self.salts.get(&salt)
    }

    pub fn ceiling(&self, vaso: Vasoconstrictor) -> Option<&CartridgeCeiling> {
        self.ceilings.get(&vaso)
    }

    /// Concentration labels a salt supports, in table order.
    pub fn concentrations(&self, salt: DrugSalt) -> Vec<&str> {
        self.salts
            .get(&salt)
            .map(|l| l.concentrations.iter().map(|(c, _)| c.as_str()).collect())
            .unwrap_or_default()
    }
}
