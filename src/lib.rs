//! Dimerize - precomputed particle keyframes for animation
//!
//! Given a rectangular container, a particle count and a target number of
//! pairwise collisions, the engine produces a chronological keyframe list per
//! particle. Linear interpolation between keyframes reproduces constant-speed
//! motion with specular wall bounces; scheduled pairs of NO2 particles meet at
//! chosen points/times and react into N2O4.
//!
//! Core modules:
//! - `sim`: Deterministic engine (bounce kernel, trajectories, scheduling)
//! - `config`: Run parameters and validation
//! - `export`: JSON / CSV flattening of results for downstream renderers
//!
//! Nothing here is stepped live: trajectories are computed analytically, and
//! collisions are scheduled rather than detected.

pub mod config;
pub mod error;
pub mod export;
pub mod sim;

pub use config::SimConfig;
pub use error::SimError;
pub use sim::engine::{Simulation, SimulationResult};

/// Engine constants
pub mod consts {
    /// Wall-impact times at or below this are ignored so a particle that just
    /// bounced does not immediately re-trigger the same wall.
    pub const WALL_EPSILON: f64 = 1e-10;

    /// Fraction of the animation duration reserved at each end before the
    /// first and after the last collision.
    pub const TIME_MARGIN_FRACTION: f64 = 0.1;

    /// Half-width of the jitter applied to the second reactant's approach
    /// angle (radians). Reactants arrive roughly, not exactly, head-on.
    pub const APPROACH_JITTER: f64 = std::f64::consts::PI / 3.0;

    /// Distance from the walls at which standalone particles may spawn.
    pub const SPAWN_MARGIN: f64 = 10.0;

    /// Default container dimensions (pixels)
    pub const CONTAINER_WIDTH: f64 = 300.0;
    pub const CONTAINER_HEIGHT: f64 = 300.0;

    /// Default particle counts
    pub const NUM_PARTICLES: u32 = 15;
    pub const NUM_COLLISIONS: u32 = 6;

    /// Default motion settings
    pub const PARTICLE_SPEED: f64 = 80.0;
    pub const ANIMATION_DURATION: f64 = 8.0;

    /// Default minimum distance of collision points from the walls (pixels)
    pub const COLLISION_MARGIN: f64 = 20.0;
}
