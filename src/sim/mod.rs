//! Deterministic simulation engine
//!
//! All trajectory and scheduling logic lives here. This module must be pure
//! and deterministic:
//! - Analytic trajectories only (no stepped integration)
//! - Seeded RNG only, threaded explicitly per run
//! - Stable particle ordering (by kind, then id)
//! - No I/O or rendering dependencies

pub mod bounce;
pub mod engine;
pub mod particle;
pub mod schedule;
pub mod trajectory;

pub use bounce::{Wall, reflect, time_to_wall};
pub use engine::{Simulation, SimulationResult};
pub use particle::{Collision, Particle, ParticleKind};
pub use schedule::{CollisionSchedule, schedule_collisions};
pub use trajectory::{Keyframe, backward_trajectory, forward_trajectory};
