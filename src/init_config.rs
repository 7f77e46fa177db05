// init_config.rs
// Handles loading and parsing the optional model configuration from anesthetic_sim.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::anesthetic::{AnestheticProfile, AnestheticRegistry, RegistryError};
use crate::config::{IntracellularPolicy, ModelConfig};

pub const DEFAULT_CONFIG_FILE: &str = "anesthetic_sim.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid model setting: {0}")]
    InvalidModel(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InitConfig {
    #[serde(default)]
    pub model: Option<ModelSection>,
    #[serde(default)]
    pub anesthetics: Vec<AnestheticEntry>,
}

/// Every field optional; omitted ones keep the [`ModelConfig`] default.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ModelSection {
    pub extracellular_ph: Option<f64>,
    pub intracellular_ph: Option<f64>,
    pub extracellular_total: Option<u32>,
    /// "fixed_fraction" or "match_extracellular_base"
    pub intracellular_policy: Option<String>,
    pub intracellular_fraction: Option<f64>,
    pub display_particles: Option<u32>,
    pub max_in_transit: Option<u32>,
    pub reionized_count: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnestheticEntry {
    pub name: String,
    pub class: String,
    pub pka: f64,
    pub base_percent: f64,
    /// "2-4", "14-18", "-"
    #[serde(default)]
    pub onset: Option<String>,
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `anesthetic_sim.toml` from the working directory, or fall back to
    /// an empty config when the file does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_from_file(DEFAULT_CONFIG_FILE)
        } else {
            log::debug!("{} not found, using built-in defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn model_config(&self) -> Result<ModelConfig, ConfigError> {
        let mut cfg = ModelConfig::default();
        let Some(section) = &self.model else {
            return Ok(cfg);
        };

        for (name, ph) in [
            ("extracellular_ph", section.extracellular_ph),
            ("intracellular_ph", section.intracellular_ph),
        ] {
            if let Some(ph) = ph {
                if !(0.0..=14.0).contains(&ph) {
                    return Err(ConfigError::InvalidModel(format!("{} must be within 0-14, got {}", name, ph)));
                }
            }
        }
        if let Some(ph) = section.extracellular_ph {
            cfg.extracellular_ph = ph;
        }
        if let Some(ph) = section.intracellular_ph {
            cfg.intracellular_ph = ph;
        }
        if let Some(n) = section.extracellular_total {
            cfg.extracellular_total = n;
        }
        if let Some(n) = section.display_particles {
            cfg.display_particles = n;
        }
        if let Some(n) = section.max_in_transit {
            cfg.max_in_transit = n;
        }
        if let Some(n) = section.reionized_count {
            cfg.reionized_count = n;
        }

        cfg.intracellular_policy = match section.intracellular_policy.as_deref() {
            None | Some("fixed_fraction") => {
                let fraction = section
                    .intracellular_fraction
                    .unwrap_or(crate::config::INTRACELLULAR_FRACTION);
                if !(fraction.is_finite() && fraction >= 0.0) {
                    return Err(ConfigError::InvalidModel(format!(
                        "intracellular_fraction must be non-negative, got {}",
                        fraction
                    )));
                }
                IntracellularPolicy::FixedFraction { fraction }
            }
            Some("match_extracellular_base") => {
                if section.intracellular_fraction.is_some() {
                    log::warn!("intracellular_fraction ignored under match_extracellular_base");
                }
                IntracellularPolicy::MatchExtracellularBase
            }
            Some(other) => {
                return Err(ConfigError::InvalidModel(format!(
                    "Unknown intracellular_policy: {}",
                    other
                )))
            }
        };
        Ok(cfg)
    }

    /// Built-in registry extended with the `[[anesthetics]]` entries.
    pub fn registry(&self) -> Result<AnestheticRegistry, ConfigError> {
        let extra = self
            .anesthetics
            .iter()
            .map(AnestheticEntry::to_profile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AnestheticRegistry::builtin().extended(extra)?)
    }
}

impl AnestheticEntry {
    pub fn to_profile(&self) -> Result<AnestheticProfile, RegistryError> {
        let onset = self.onset.as_deref().unwrap_or("-").parse()?;
        Ok(AnestheticProfile::new(
            &self.name,
            self.class.parse()?,
            self.pka,
            self.base_percent,
            onset,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[model]
extracellular_ph = 6.9
intracellular_policy = "match_extracellular_base"
display_particles = 40

[[anesthetics]]
name = "Tetracaína"
class = "Éster"
pka = 8.5
base_percent = 7
onset = "10-15"
"#;

    #[test]
    fn parses_model_and_extra_agents() {
        let init = InitConfig::from_toml(SAMPLE).unwrap();
        let cfg = init.model_config().unwrap();
        assert_eq!(cfg.extracellular_ph, 6.9);
        assert_eq!(cfg.intracellular_ph, crate::config::PHYSIOLOGICAL_PH);
        assert_eq!(cfg.display_particles, 40);
        assert_eq!(cfg.intracellular_policy, IntracellularPolicy::MatchExtracellularBase);

        let reg = init.registry().unwrap();
        assert_eq!(reg.len(), 8);
        assert_eq!(reg.get("tetracaina").unwrap().pka, 8.5);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let init = InitConfig::from_toml("").unwrap();
        assert_eq!(init.model_config().unwrap(), ModelConfig::default());
        assert_eq!(init.registry().unwrap().len(), 7);
    }

    #[test]
    fn rejects_bad_values() {
        let init = InitConfig::from_toml("[model]\nextracellular_ph = 15.0\n").unwrap();
        assert!(matches!(init.model_config(), Err(ConfigError::InvalidModel(_))));

        let init = InitConfig::from_toml("[model]\nintracellular_policy = \"half\"\n").unwrap();
        assert!(matches!(init.model_config(), Err(ConfigError::InvalidModel(_))));

        let init = InitConfig::from_toml(
            "[[anesthetics]]\nname = \"X\"\nclass = \"lipid\"\npka = 8.0\nbase_percent = 10.0\n",
        )
        .unwrap();
        assert!(matches!(init.registry(), Err(ConfigError::Registry(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(InitConfig::from_toml("[model"), Err(ConfigError::Parse(_))));
    }
}
