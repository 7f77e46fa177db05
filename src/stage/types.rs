// stage/types.rs
// Stage enum, molecular forms and the visual elements handed to the renderer

use palette::Srgba;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::convert::TryFrom;
use ultraviolet::Vec2;

use super::StageError;
use crate::distribution::{Compartment, EquilibriumSnapshot};

/// The five mechanism stages, strictly ordered.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub enum MechanismStage {
    InitialDistribution = 1,
    MembraneCrossing = 2,
    IntracellularArrival = 3,
    Reionization = 4,
    ChannelBlockade = 5,
}

impl MechanismStage {
    pub const ALL: [MechanismStage; 5] = [
        MechanismStage::InitialDistribution,
        MechanismStage::MembraneCrossing,
        MechanismStage::IntracellularArrival,
        MechanismStage::Reionization,
        MechanismStage::ChannelBlockade,
    ];

    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Any integer, clamped into 1..=5.
    pub fn clamped(index: i64) -> Self {
        Self::ALL[(index.clamp(1, 5) - 1) as usize]
    }

    pub fn title(&self) -> &'static str {
        match self {
            MechanismStage::InitialDistribution => "Distribuição inicial",
            MechanismStage::MembraneCrossing => "Travessia da membrana",
            MechanismStage::IntracellularArrival => "Chegada ao meio intracelular",
            MechanismStage::Reionization => "Reequilíbrio intracelular",
            MechanismStage::ChannelBlockade => "Bloqueio do canal de sódio",
        }
    }
}

impl TryFrom<u8> for MechanismStage {
    type Error = StageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=5 => Ok(Self::ALL[value as usize - 1]),
            _ => Err(StageError::OutOfRange(value)),
        }
    }
}

/// RN (uncharged base) or RNH⁺ (protonated).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum MolecularForm {
    Base,
    Ionized,
}

impl MolecularForm {
    pub fn label(&self) -> &'static str {
        match self {
            MolecularForm::Base => "RN",
            MolecularForm::Ionized => "RNH⁺",
        }
    }

    /// Scatter color: blue for RN, red for RNH⁺, both at 70 % opacity.
    pub fn color(&self) -> Srgba<u8> {
        match self {
            MolecularForm::Base => Srgba::new(0, 0, 255, 178),
            MolecularForm::Ionized => Srgba::new(255, 0, 0, 178),
        }
    }

    pub fn rgba(&self) -> [u8; 4] {
        let (r, g, b, a) = self.color().into_components();
        [r, g, b, a]
    }
}

/// Where a particle sits in the diagram.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Site {
    Extracellular,
    Intracellular,
    /// Bound inside the sodium channel pore.
    ChannelSite,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub form: MolecularForm,
    pub site: Site,
    pub pos: Vec2,
    /// Particle this one was derived from (crossing, re-ionization, binding).
    pub origin: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VisualElement {
    Membrane { y: f32, half_thickness: f32 },
    SodiumChannel { pos: Vec2, half_size: f32 },
    CountLabel {
        compartment: Compartment,
        form: MolecularForm,
        count: u32,
        percent: f64,
        pos: Vec2,
    },
    Particle(Particle),
    /// RN particle `particle_id` drawn inside the membrane at `pos`.
    Transit { particle_id: u32, pos: Vec2 },
    Arrow { from: Vec2, to: Vec2 },
    ChannelBlock { pos: Vec2, bound: SmallVec<[u32; 3]> },
    Caption { stage: MechanismStage, text: String },
}

/// Everything needed to draw one stage. Elements accumulate: stage N carries
/// every element of stages 1..N unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageDescription {
    pub anesthetic: String,
    pub stage: MechanismStage,
    pub equilibrium: EquilibriumSnapshot,
    pub elements: Vec<VisualElement>,
}

impl StageDescription {
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.elements.iter().filter_map(|e| match e {
            VisualElement::Particle(p) => Some(p),
            _ => None,
        })
    }

    pub fn count(&self, form: MolecularForm, site: Site) -> usize {
        self.particles().filter(|p| p.form == form && p.site == site).count()
    }

    pub fn in_transit(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, VisualElement::Transit { .. }))
            .count()
    }

    pub fn channel_blocked(&self) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, VisualElement::ChannelBlock { .. }))
    }

    pub fn captions(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                VisualElement::Caption { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when every element of `earlier` also appears here.
    pub fn contains_all(&self, earlier: &StageDescription) -> bool {
        earlier.elements.iter().all(|e| self.elements.contains(e))
    }
}
