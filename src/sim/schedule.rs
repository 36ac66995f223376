//! Collision scheduling
//!
//! Picks collision times (evenly spread across the inner 80% of the
//! animation, midpoint rule for a single collision), collision points
//! (uniform, kept off the walls by the collision margin) and which particles
//! feed each collision (a uniform shuffle of the id range, consumed in
//! consecutive pairs).

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::TIME_MARGIN_FRACTION;
use crate::error::SimError;

use super::particle::Collision;

/// Output of the scheduler: collisions sorted ascending by time, plus the
/// partition of the id range into colliding and non-colliding particles.
#[derive(Debug, Clone)]
pub struct CollisionSchedule {
    pub collisions: Vec<Collision>,
    /// Ids consumed by collisions, in assignment order: ids `2k` and `2k+1`
    /// of this list feed collision `k`.
    pub colliding_particle_ids: Vec<u32>,
    pub non_colliding_particle_ids: Vec<u32>,
}

/// Schedule `num_collisions` collisions across the animation.
///
/// Re-checks the particle budget and the margin geometry even though
/// `SimConfig::validate` already did; the scheduler must hold its own
/// contract when called directly.
pub fn schedule_collisions(
    num_particles: u32,
    num_collisions: u32,
    animation_duration: f64,
    container_width: f64,
    container_height: f64,
    collision_margin: f64,
    rng: &mut impl Rng,
) -> Result<CollisionSchedule, SimError> {
    // Division instead of `num_collisions * 2`, which could wrap
    if num_collisions > num_particles / 2 {
        return Err(SimError::InsufficientParticles {
            requested: num_collisions,
            available: num_particles,
        });
    }
    if collision_margin < 0.0
        || collision_margin * 2.0 > container_width
        || collision_margin * 2.0 > container_height
    {
        return Err(SimError::InvalidGeometry(format!(
            "collision margin {} leaves no interior in a {}x{} container",
            collision_margin, container_width, container_height
        )));
    }
    let particles_needed = num_collisions * 2;

    // Keep a margin at each end of the timeline for visual clarity
    let time_margin = animation_duration * TIME_MARGIN_FRACTION;
    let collision_times: Vec<f64> = if num_collisions == 1 {
        vec![animation_duration / 2.0]
    } else {
        let available = animation_duration - 2.0 * time_margin;
        let step = available / (num_collisions as f64 - 1.0).max(1.0);
        (0..num_collisions)
            .map(|i| time_margin + i as f64 * step)
            .collect()
    };

    // Uniform shuffle of the id range; the head feeds the collisions pairwise
    let mut particle_ids: Vec<u32> = (1..=num_particles).collect();
    particle_ids.shuffle(rng);

    let colliding_ids = particle_ids[..particles_needed as usize].to_vec();
    let non_colliding_ids = particle_ids[particles_needed as usize..].to_vec();

    let collisions = collision_times
        .iter()
        .enumerate()
        .map(|(i, &time)| Collision {
            id: i as u32 + 1,
            time,
            x: rng.random_range(collision_margin..=container_width - collision_margin),
            y: rng.random_range(collision_margin..=container_height - collision_margin),
            particle1_id: colliding_ids[i * 2],
            particle2_id: colliding_ids[i * 2 + 1],
            result_particle_id: None,
        })
        .collect();

    Ok(CollisionSchedule {
        collisions,
        colliding_particle_ids: colliding_ids,
        non_colliding_particle_ids: non_colliding_ids,
    })
}
