//! Run parameters and validation
//!
//! A [`SimConfig`] is a plain serde-friendly record of everything a run needs.
//! Validation happens up front, before any scheduling or trajectory work, so a
//! rejected configuration never produces partial results.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Parameters for a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Container width in pixels
    pub container_width: f64,
    /// Container height in pixels
    pub container_height: f64,
    /// Number of NO2 particles present at t = 0
    pub num_particles: u32,
    /// Number of collisions to schedule (each consumes two NO2 particles)
    pub num_collisions: u32,
    /// Speed shared by every particle, pixels per second
    pub particle_speed: f64,
    /// Total animation duration in seconds
    pub animation_duration: f64,
    /// Minimum distance of collision points from the walls, pixels
    pub collision_margin: f64,
    /// Seed for reproducible runs; `None` seeds from entropy
    pub random_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            container_width: CONTAINER_WIDTH,
            container_height: CONTAINER_HEIGHT,
            num_particles: NUM_PARTICLES,
            num_collisions: NUM_COLLISIONS,
            particle_speed: PARTICLE_SPEED,
            animation_duration: ANIMATION_DURATION,
            collision_margin: COLLISION_MARGIN,
            random_seed: None,
        }
    }
}

impl SimConfig {
    /// Check every configuration invariant.
    ///
    /// Geometry first: dimensions, speed and duration must be positive, and
    /// the collision margin must leave a non-empty interior to place collision
    /// points in. Then the particle budget: two reactants per collision.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.container_width <= 0.0 || self.container_height <= 0.0 {
            return Err(SimError::InvalidGeometry(format!(
                "container must have positive dimensions, got {}x{}",
                self.container_width, self.container_height
            )));
        }
        if self.particle_speed <= 0.0 {
            return Err(SimError::InvalidGeometry(format!(
                "particle speed must be positive, got {}",
                self.particle_speed
            )));
        }
        if self.animation_duration <= 0.0 {
            return Err(SimError::InvalidGeometry(format!(
                "animation duration must be positive, got {}",
                self.animation_duration
            )));
        }
        let half_min = self.container_width.min(self.container_height) / 2.0;
        if self.collision_margin < 0.0 || self.collision_margin >= half_min {
            return Err(SimError::InvalidGeometry(format!(
                "collision margin {} must be in [0, {}) for a {}x{} container",
                self.collision_margin, half_min, self.container_width, self.container_height
            )));
        }
        if self.num_particles < 1 {
            return Err(SimError::InvalidGeometry(
                "at least one particle is required".to_string(),
            ));
        }
        // Division instead of `num_collisions * 2`, which could wrap
        if self.num_collisions > self.num_particles / 2 {
            return Err(SimError::InsufficientParticles {
                requested: self.num_collisions,
                available: self.num_particles,
            });
        }
        Ok(())
    }
}
