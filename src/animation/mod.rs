// animation/mod.rs
// Free-running random walk layered over the stage layout. Decorative only:
// particle counts always come from the stage narrative, never from here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use ultraviolet::Vec2;

use crate::config;
use crate::stage::{MolecularForm, Site, StageDescription, VisualElement};

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum AnimationError {
    #[error("Jitter sigma must be finite and non-negative, got {0}")]
    InvalidSigma(f32),
}

fn normal(sigma: f32) -> Result<Normal<f32>, AnimationError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(AnimationError::InvalidSigma(sigma));
    }
    Normal::new(0.0, sigma).map_err(|_| AnimationError::InvalidSigma(sigma))
}

fn clip(pos: Vec2, bounds: ([f32; 2], [f32; 2])) -> Vec2 {
    let ([x0, x1], [y0, y1]) = bounds;
    Vec2::new(pos.x.clamp(x0, x1), pos.y.clamp(y0, y1))
}

fn nudge<R: Rng + ?Sized>(pos: Vec2, rng: &mut R, noise: &Normal<f32>) -> Vec2 {
    pos + Vec2::new(noise.sample(rng), noise.sample(rng))
}

/// Copy of `description` with every particle shifted by Gaussian noise,
/// kept inside the unit square. Element count and order are unchanged.
pub fn jitter<R: Rng + ?Sized>(
    description: &StageDescription,
    rng: &mut R,
    sigma: f32,
) -> Result<StageDescription, AnimationError> {
    let noise = normal(sigma)?;
    let mut out = description.clone();
    for element in &mut out.elements {
        if let VisualElement::Particle(p) = element {
            p.pos = clip(nudge(p.pos, rng, &noise), ([0.0, 1.0], [0.0, 1.0]));
        }
    }
    Ok(out)
}

/// Positions of every visible particle at one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkFrame {
    pub frame: u64,
    pub extracellular_ionized: Vec<Vec2>,
    pub extracellular_base: Vec<Vec2>,
    pub crossing: Vec<Vec2>,
    pub intracellular_base: Vec<Vec2>,
    pub intracellular_ionized: Vec<Vec2>,
}

/// Random-walk animation seeded from a stage-1 layout.
///
/// Each frame: RNH⁺ and RN wander inside their extracellular boxes, an RN
/// particle starts crossing with 2 % probability while fewer than three are
/// crossing, crossings advance 5 % per frame and land intracellularly as RNH⁺
/// 30 % of the time, and intracellular RNH⁺ close to the channel drifts into it.
pub struct RandomWalk {
    rng: StdRng,
    noise: Normal<f32>,
    frame: u64,
    extra_ionized: Vec<Vec2>,
    /// `None` once the particle has crossed.
    extra_base: Vec<Option<Vec2>>,
    crossing: SmallVec<[(usize, f32); 3]>,
    intra_base: Vec<Vec2>,
    intra_ionized: Vec<Vec2>,
}

impl RandomWalk {
    /// Start from the extracellular particles of `description`. `seed` makes
    /// the run reproducible; `None` seeds from the OS.
    pub fn new(description: &StageDescription, seed: Option<u64>) -> Result<Self, AnimationError> {
        Self::with_sigma(description, seed, config::JITTER_SIGMA)
    }

    pub fn with_sigma(
        description: &StageDescription,
        seed: Option<u64>,
        sigma: f32,
    ) -> Result<Self, AnimationError> {
        let noise = normal(sigma)?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let extra = |form: MolecularForm| {
            description
                .particles()
                .filter(move |p| p.site == Site::Extracellular && p.form == form)
                .map(|p| p.pos)
        };
        Ok(Self {
            rng,
            noise,
            frame: 0,
            extra_ionized: extra(MolecularForm::Ionized).collect(),
            extra_base: extra(MolecularForm::Base).map(Some).collect(),
            crossing: SmallVec::new(),
            intra_base: Vec::new(),
            intra_ionized: Vec::new(),
        })
    }

    pub fn step(&mut self) {
        let Self {
            rng,
            noise,
            extra_ionized,
            extra_base,
            crossing,
            intra_base,
            intra_ionized,
            ..
        } = self;

        for pos in extra_ionized.iter_mut() {
            *pos = clip(nudge(*pos, rng, noise), config::EXTRA_IONIZED_BOUNDS);
        }

        for i in 0..extra_base.len() {
            if crossing.iter().any(|&(idx, _)| idx == i) {
                continue;
            }
            if let Some(pos) = extra_base[i] {
                extra_base[i] = Some(clip(nudge(pos, rng, noise), config::EXTRA_BASE_BOUNDS));
                if crossing.len() < config::MAX_IN_TRANSIT as usize
                    && rng.random_bool(config::CROSSING_START_PROBABILITY)
                {
                    crossing.push((i, 0.0));
                }
            }
        }

        let mut still_crossing: SmallVec<[(usize, f32); 3]> = SmallVec::new();
        for &(idx, progress) in crossing.iter() {
            let progress = progress + config::CROSSING_PROGRESS_PER_FRAME;
            let Some(pos) = extra_base[idx] else { continue };
            if progress < 1.0 {
                extra_base[idx] = Some(Vec2::new(pos.x, config::CROSSING_START_Y - progress * config::CROSSING_DROP));
                still_crossing.push((idx, progress));
            } else {
                let landed = Vec2::new(pos.x, config::INTRA_ARRIVAL_Y);
                if rng.random_bool(config::ARRIVAL_IONIZED_PROBABILITY) {
                    intra_ionized.push(landed);
                } else {
                    intra_base.push(landed);
                }
                extra_base[idx] = None;
            }
        }
        *crossing = still_crossing;

        for pos in intra_base.iter_mut() {
            *pos = clip(nudge(*pos, rng, noise), config::INTRA_BOUNDS);
        }
        let channel = Vec2::from(config::CHANNEL_POS);
        for pos in intra_ionized.iter_mut() {
            let mut p = clip(nudge(*pos, rng, noise), config::INTRA_BOUNDS);
            if (p - channel).mag() < config::CHANNEL_CAPTURE_RADIUS {
                p += (channel - p) * config::CHANNEL_PULL;
            }
            *pos = p;
        }

        self.frame += 1;
    }

    pub fn frame(&self) -> WalkFrame {
        let crossing_ids: SmallVec<[usize; 3]> = self.crossing.iter().map(|&(i, _)| i).collect();
        let mut extracellular_base = Vec::new();
        let mut crossing = Vec::new();
        for (i, pos) in self.extra_base.iter().enumerate() {
            if let Some(pos) = pos {
                if crossing_ids.contains(&i) {
                    crossing.push(*pos);
                } else {
                    extracellular_base.push(*pos);
                }
            }
        }
        WalkFrame {
            frame: self.frame,
            extracellular_ionized: self.extra_ionized.clone(),
            extracellular_base,
            crossing,
            intracellular_base: self.intra_base.clone(),
            intracellular_ionized: self.intra_ionized.clone(),
        }
    }

    /// Advance `frames` steps, collecting each frame after it is computed.
    pub fn run(&mut self, frames: usize) -> Vec<WalkFrame> {
        (0..frames)
            .map(|_| {
                self.step();
                self.frame()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
