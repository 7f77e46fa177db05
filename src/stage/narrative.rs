// stage/narrative.rs
// Deterministic, cumulative layout of the five mechanism stages

use smallvec::SmallVec;
use ultraviolet::Vec2;

use super::types::*;
use crate::anesthetic::AnestheticProfile;
use crate::config::{self, ModelConfig};
use crate::distribution::{compartment_distribution, Compartment, EquilibriumSnapshot};
use crate::profile_scope;
use crate::utils::grid_positions;

/// Builds [`StageDescription`]s for one model configuration.
///
/// Every stage is rebuilt from scratch and layouts use fixed grids, so the same
/// `(profile, stage)` pair always yields the same description, and stage N
/// contains stage N-1 verbatim. Counts that a stage wants but the drug cannot
/// supply (e.g. procaine has no RN particle among 20 at pH 7.4) are clamped.
pub struct StageNarrator<'a> {
    config: &'a ModelConfig,
}

/// Intermediate ids handed from one stage builder to the next.
struct Cursor {
    next_id: u32,
    extra_base: Vec<Particle>,
    crossed: Vec<Particle>,
    reionized: Vec<Particle>,
}

impl Cursor {
    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl<'a> StageNarrator<'a> {
    pub fn new(config: &'a ModelConfig) -> Self {
        Self { config }
    }

    pub fn describe(&self, profile: &AnestheticProfile, stage: MechanismStage) -> StageDescription {
        profile_scope!("stage_describe");
        let equilibrium = EquilibriumSnapshot::compute(profile, self.config);
        let mut elements = Vec::new();
        let mut cursor = Cursor {
            next_id: 0,
            extra_base: Vec::new(),
            crossed: Vec::new(),
            reionized: Vec::new(),
        };

        for s in MechanismStage::ALL.iter().copied().filter(|s| *s <= stage) {
            match s {
                MechanismStage::InitialDistribution => {
                    self.initial_distribution(&equilibrium, &mut cursor, &mut elements)
                }
                MechanismStage::MembraneCrossing => self.membrane_crossing(&mut cursor, &mut elements),
                MechanismStage::IntracellularArrival => self.intracellular_arrival(&mut cursor, &mut elements),
                MechanismStage::Reionization => self.reionization(&equilibrium, &mut cursor, &mut elements),
                MechanismStage::ChannelBlockade => self.channel_blockade(&mut cursor, &mut elements),
            }
            elements.push(VisualElement::Caption {
                stage: s,
                text: caption(s, profile, &equilibrium),
            });
        }

        StageDescription {
            anesthetic: profile.name.clone(),
            stage,
            equilibrium,
            elements,
        }
    }

    fn initial_distribution(
        &self,
        eq: &EquilibriumSnapshot,
        cursor: &mut Cursor,
        elements: &mut Vec<VisualElement>,
    ) {
        let extra = &eq.extracellular;
        elements.push(VisualElement::Membrane {
            y: config::MEMBRANE_Y,
            half_thickness: config::MEMBRANE_HALF_THICKNESS,
        });
        elements.push(VisualElement::SodiumChannel {
            pos: Vec2::from(config::CHANNEL_POS),
            half_size: config::CHANNEL_HALF_SIZE,
        });
        elements.push(VisualElement::CountLabel {
            compartment: Compartment::Extracellular,
            form: MolecularForm::Ionized,
            count: extra.ionized_count,
            percent: extra.ionized_percent(),
            pos: Vec2::new(0.2, 0.75),
        });
        elements.push(VisualElement::CountLabel {
            compartment: Compartment::Extracellular,
            form: MolecularForm::Base,
            count: extra.base_count,
            percent: extra.base_percent,
            pos: Vec2::new(0.8, 0.75),
        });

        let (n_base, n_ionized) = compartment_distribution(extra.base_percent, self.config.display_particles);
        for pos in grid_positions(n_ionized as usize, config::EXTRA_IONIZED_REGION) {
            let p = Particle {
                id: cursor.take_id(),
                form: MolecularForm::Ionized,
                site: Site::Extracellular,
                pos: Vec2::from(pos),
                origin: None,
            };
            elements.push(VisualElement::Particle(p));
        }
        for pos in grid_positions(n_base as usize, config::EXTRA_BASE_REGION) {
            let p = Particle {
                id: cursor.take_id(),
                form: MolecularForm::Base,
                site: Site::Extracellular,
                pos: Vec2::from(pos),
                origin: None,
            };
            cursor.extra_base.push(p);
            elements.push(VisualElement::Particle(p));
        }
    }

    fn membrane_crossing(&self, cursor: &mut Cursor, elements: &mut Vec<VisualElement>) {
        let k = (self.config.max_in_transit as usize).min(cursor.extra_base.len());
        if k < self.config.max_in_transit as usize {
            log::debug!(
                "Only {} RN particle(s) available to cross, wanted {}",
                k, self.config.max_in_transit
            );
        }
        elements.push(VisualElement::Arrow {
            from: Vec2::new(0.5, 0.7),
            to: Vec2::new(0.5, 0.6),
        });
        for p in &cursor.extra_base[..k] {
            elements.push(VisualElement::Transit {
                particle_id: p.id,
                pos: Vec2::new(p.pos.x, config::MEMBRANE_Y),
            });
        }
        cursor.extra_base.truncate(k);
    }

    fn intracellular_arrival(&self, cursor: &mut Cursor, elements: &mut Vec<VisualElement>) {
        elements.push(VisualElement::Arrow {
            from: Vec2::new(0.5, 0.4),
            to: Vec2::new(0.5, 0.3),
        });
        let sources: Vec<Particle> = cursor.extra_base.clone();
        for src in sources {
            let p = Particle {
                id: cursor.take_id(),
                form: MolecularForm::Base,
                site: Site::Intracellular,
                pos: Vec2::new(src.pos.x, config::INTRA_ARRIVAL_Y),
                origin: Some(src.id),
            };
            cursor.crossed.push(p);
            elements.push(VisualElement::Particle(p));
        }
    }

    fn reionization(&self, eq: &EquilibriumSnapshot, cursor: &mut Cursor, elements: &mut Vec<VisualElement>) {
        let intra = &eq.intracellular;
        elements.push(VisualElement::CountLabel {
            compartment: Compartment::Intracellular,
            form: MolecularForm::Ionized,
            count: intra.ionized_count,
            percent: intra.ionized_percent(),
            pos: Vec2::new(0.2, 0.15),
        });
        elements.push(VisualElement::CountLabel {
            compartment: Compartment::Intracellular,
            form: MolecularForm::Base,
            count: intra.base_count,
            percent: intra.base_percent,
            pos: Vec2::new(0.8, 0.15),
        });

        let m = (self.config.reionized_count as usize).min(cursor.crossed.len());
        let sources: Vec<Particle> = cursor.crossed[..m].to_vec();
        for src in sources {
            let p = Particle {
                id: cursor.take_id(),
                form: MolecularForm::Ionized,
                site: Site::Intracellular,
                pos: Vec2::new(src.pos.x, config::INTRA_ARRIVAL_Y - 0.08),
                origin: Some(src.id),
            };
            cursor.reionized.push(p);
            elements.push(VisualElement::Particle(p));
        }
    }

    fn channel_blockade(&self, cursor: &mut Cursor, elements: &mut Vec<VisualElement>) {
        let channel = Vec2::from(config::CHANNEL_POS);
        let n = cursor.reionized.len();
        let mut bound: SmallVec<[u32; 3]> = SmallVec::new();
        let sources: Vec<Particle> = cursor.reionized.clone();
        for (j, src) in sources.into_iter().enumerate() {
            let offset = (j as f32 - (n as f32 - 1.0) / 2.0) * 0.03;
            let p = Particle {
                id: cursor.take_id(),
                form: MolecularForm::Ionized,
                site: Site::ChannelSite,
                pos: Vec2::new(channel.x + offset, channel.y),
                origin: Some(src.id),
            };
            bound.push(p.id);
            elements.push(VisualElement::Particle(p));
        }
        if bound.is_empty() {
            log::debug!("No RNH+ reached the channel; leaving it unblocked");
        } else {
            elements.push(VisualElement::ChannelBlock { pos: channel, bound });
        }
    }
}

fn caption(stage: MechanismStage, profile: &AnestheticProfile, eq: &EquilibriumSnapshot) -> String {
    let extra = &eq.extracellular;
    match stage {
        MechanismStage::InitialDistribution => format!(
            "Equilíbrio extracelular (pH {:.1}): {} com pKa {} está {:.1}% como RN e {:.1}% como RNH⁺",
            extra.ph,
            profile.name,
            profile.pka,
            extra.base_percent,
            extra.ionized_percent()
        ),
        MechanismStage::MembraneCrossing => {
            "Apenas a forma não-ionizada (RN) atravessa a bainha do nervo".to_string()
        }
        MechanismStage::IntracellularArrival => {
            "A base (RN) alcança o meio intracelular".to_string()
        }
        MechanismStage::Reionization => format!(
            "Reequilíbrio intracelular (pH {:.1}): parte do RN volta a RNH⁺",
            eq.intracellular.ph
        ),
        MechanismStage::ChannelBlockade => {
            "RNH⁺ se liga ao canal de Na⁺ e bloqueia a condução nervosa".to_string()
        }
    }
}

/// Stage description under the default [`ModelConfig`]. Out-of-range indices
/// are clamped into 1..=5.
pub fn mechanism_stage(profile: &AnestheticProfile, stage_index: u8) -> StageDescription {
    let config = ModelConfig::default();
    StageNarrator::new(&config).describe(profile, MechanismStage::clamped(stage_index as i64))
}
