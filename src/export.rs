use crate::profile_scope;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::anesthetic::AnestheticProfile;
use crate::config::ModelConfig;
use crate::distribution::EquilibriumSnapshot;
use crate::ionization::AnestheticReport;
use crate::stage::{MechanismStage, StageDescription, StageNarrator};

/// Everything a renderer needs for one (agent, stage) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub report: AnestheticReport,
    pub equilibrium: EquilibriumSnapshot,
    pub stage: StageDescription,
    /// RGBA per molecular form, keyed by label ("RN", "RNH⁺")
    #[serde(default)]
    pub palette: Vec<(String, [u8; 4])>,
}

impl RenderSnapshot {
    pub fn new(profile: &AnestheticProfile, stage: MechanismStage, config: &ModelConfig) -> Self {
        let stage = StageNarrator::new(config).describe(profile, stage);
        let palette = [crate::stage::MolecularForm::Base, crate::stage::MolecularForm::Ionized]
            .iter()
            .map(|f| (f.label().to_string(), f.rgba()))
            .collect();
        Self {
            report: AnestheticReport::new(profile, config.extracellular_ph),
            equilibrium: stage.equilibrium,
            stage,
            palette,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Write pretty JSON to `path` through a temporary file, then rename over it.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        profile_scope!("write_snapshot");
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = path.with_extension({
            let mut os = path.extension().map(|e| e.to_os_string()).unwrap_or_default();
            os.push(".tmp");
            os
        });
        {
            let file = std::fs::File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, path)?;
        log::info!("Snapshot for {} ({}) written to {}", self.report.name, self.stage.stage.title(), path.display());
        Ok(())
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        profile_scope!("read_snapshot");
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
