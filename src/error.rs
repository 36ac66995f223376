//! Error types for the simulation engine.
//!
//! Invalid configuration is rejected before any computation begins; a failed
//! run leaves no partial state behind. Degenerate velocities (zero magnitude,
//! or two reactant velocities cancelling) are recovered internally by
//! resampling a random direction and never surface here.

use std::fmt;

/// Errors that can occur when configuring or scheduling a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// More collisions requested than the particle pool can feed.
    /// Each collision consumes exactly two reactants.
    InsufficientParticles { requested: u32, available: u32 },
    /// Container dimensions or margins that make collision placement
    /// impossible.
    InvalidGeometry(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InsufficientParticles {
                requested,
                available,
            } => write!(
                f,
                "Cannot have {} collisions with only {} particles. Need at least {}.",
                requested,
                available,
                requested * 2
            ),
            SimError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}
