//! Particle and collision records
//!
//! Particles are created once by the orchestrator from a fully computed
//! trajectory and are immutable afterward. A collision's `result_particle_id`
//! is the one field filled in late, once the product particle's id is known.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::trajectory::Keyframe;

/// Chemical species of a particle. Reactants are NO2; each scheduled
/// collision merges two of them into one N2O4 product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParticleKind {
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "N2O4")]
    N2o4,
}

impl ParticleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleKind::No2 => "NO2",
            ParticleKind::N2o4 => "N2O4",
        }
    }
}

/// A particle with its full precomputed trajectory.
///
/// Invariants: `keyframes` is non-empty and ascending in time, the first
/// keyframe sits at `start_time` and the last at `end_time` when present.
/// `collision_id` is set iff the particle either vanishes into a collision
/// (a reactant) or was created by one (a product).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub kind: ParticleKind,
    pub keyframes: Vec<Keyframe>,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub collision_id: Option<u32>,
    /// Velocity used while deriving the trajectory (incoming velocity for
    /// reactants, outgoing for products and standalones).
    pub velocity: DVec2,
}

impl Particle {
    /// Whether the particle exists at `time`.
    pub fn is_active_at(&self, time: f64) -> bool {
        if time < self.start_time {
            return false;
        }
        match self.end_time {
            Some(end) => time <= end,
            None => true,
        }
    }

    /// Interpolated position at `time`, or `None` outside the particle's
    /// lifespan. Linear interpolation between the two bracketing keyframes.
    pub fn position_at(&self, time: f64) -> Option<DVec2> {
        if self.keyframes.is_empty() || !self.is_active_at(time) {
            return None;
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.time <= time && time <= b.time {
                if b.time == a.time {
                    return Some(a.pos());
                }
                let t = (time - a.time) / (b.time - a.time);
                return Some(a.pos().lerp(b.pos(), t));
            }
        }

        // Single-keyframe trajectory, or time landing exactly on the tail
        let last = self.keyframes.last().unwrap();
        if (time - last.time).abs() < 1e-6 {
            return Some(last.pos());
        }
        None
    }

    /// Number of wall bounces along the trajectory (interior keyframes).
    pub fn num_bounces(&self) -> usize {
        self.keyframes.len().saturating_sub(2)
    }
}

/// A scheduled meeting of exactly two NO2 reactants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collision {
    pub id: u32,
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub particle1_id: u32,
    pub particle2_id: u32,
    /// Id of the N2O4 product; unset until the orchestrator assigns it.
    pub result_particle_id: Option<u32>,
}

impl Collision {
    pub fn point(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}
