//! Wall bounce kernel
//!
//! Exact linear time-to-impact against the four container walls, plus
//! specular reflection. Everything downstream (forward and backward
//! trajectories) is built on these two functions.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::WALL_EPSILON;

/// A container wall. The container spans `[0, width] x [0, height]` with the
/// bottom wall at `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Bottom,
    Top,
}

/// Time until a particle at `pos` moving with `vel` hits a wall.
///
/// Only walls the particle is moving toward are candidates; the smallest
/// strictly positive time wins. Times at or below [`WALL_EPSILON`] are
/// discarded so a particle sitting on a wall it just left does not re-trigger
/// it. Returns `None` for a stationary particle (no wall is ever reached).
///
/// At an exact corner hit two candidate times coincide; the fixed candidate
/// order (left, right, bottom, top) decides the tie. That order is arbitrary
/// but kept stable for reproducible output.
pub fn time_to_wall(pos: DVec2, vel: DVec2, width: f64, height: f64) -> Option<(f64, Wall)> {
    let mut nearest: Option<(f64, Wall)> = None;

    let mut consider = |t: f64, wall: Wall| {
        if t > WALL_EPSILON && nearest.map_or(true, |(best, _)| t < best) {
            nearest = Some((t, wall));
        }
    };

    if vel.x < 0.0 {
        consider(-pos.x / vel.x, Wall::Left);
    }
    if vel.x > 0.0 {
        consider((width - pos.x) / vel.x, Wall::Right);
    }
    if vel.y < 0.0 {
        consider(-pos.y / vel.y, Wall::Bottom);
    }
    if vel.y > 0.0 {
        consider((height - pos.y) / vel.y, Wall::Top);
    }

    nearest
}

/// Specular reflection off a wall: vertical walls negate `vx`, horizontal
/// walls negate `vy`. Speed magnitude is preserved by construction.
#[inline]
pub fn reflect(vel: DVec2, wall: Wall) -> DVec2 {
    match wall {
        Wall::Left | Wall::Right => DVec2::new(-vel.x, vel.y),
        Wall::Bottom | Wall::Top => DVec2::new(vel.x, -vel.y),
    }
}
