//! Simulation orchestrator
//!
//! Composes scheduling and trajectory generation into a complete run:
//! backward trajectories for each collision's two reactants, a forward
//! trajectory for the merged product, forward trajectories for standalone
//! particles, then id assignment and result assembly.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f64::consts::{PI, TAU};

use crate::config::SimConfig;
use crate::consts::{APPROACH_JITTER, SPAWN_MARGIN};
use crate::error::SimError;

use super::particle::{Collision, Particle, ParticleKind};
use super::schedule::schedule_collisions;
use super::trajectory::{
    average_velocity, backward_trajectory, forward_trajectory, random_velocity,
};

/// Everything a run produces. Read-only once returned; owned by the caller,
/// never shared between runs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimulationResult {
    /// All particles, sorted by `(kind, id)` - reactants first
    pub particles: Vec<Particle>,
    /// All collisions, sorted ascending by time
    pub collisions: Vec<Collision>,
    pub animation_duration: f64,
    pub container_width: f64,
    pub container_height: f64,
}

impl SimulationResult {
    pub fn particle_by_id(&self, id: u32) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn no2_particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(|p| p.kind == ParticleKind::No2)
    }

    pub fn n2o4_particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(|p| p.kind == ParticleKind::N2o4)
    }

    pub fn active_particles_at(&self, time: f64) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(move |p| p.is_active_at(time))
    }
}

/// A validated, ready-to-run simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
}

impl Simulation {
    /// Validate the configuration and build a runner. No partial state is
    /// created on failure.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run the simulation and derive every particle's full trajectory.
    ///
    /// The RNG is constructed here, once per run, from the configured seed or
    /// from entropy. It is local to this call: concurrent runs never share
    /// generator state, so a fixed seed always reproduces the same result.
    pub fn run(&self) -> Result<SimulationResult, SimError> {
        let cfg = &self.config;
        let seed = cfg.random_seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        log::debug!("running simulation with seed {}", seed);

        let schedule = schedule_collisions(
            cfg.num_particles,
            cfg.num_collisions,
            cfg.animation_duration,
            cfg.container_width,
            cfg.container_height,
            cfg.collision_margin,
            &mut rng,
        )?;

        let mut particles: Vec<Particle> = Vec::new();
        let mut collisions: Vec<Collision> = Vec::new();

        // Products are numbered after the original reactant range, in
        // schedule order: collision k yields particle num_particles + k.
        let mut next_product_id = cfg.num_particles + 1;

        for mut collision in schedule.collisions {
            let (p1, p2, product) =
                self.derive_collision_particles(&collision, next_product_id, &mut rng);
            collision.result_particle_id = Some(next_product_id);
            next_product_id += 1;

            particles.extend([p1, p2, product]);
            collisions.push(collision);
        }

        for &id in &schedule.non_colliding_particle_ids {
            particles.push(self.derive_standalone_particle(id, &mut rng));
        }

        particles.sort_by_key(|p| (p.kind, p.id));
        collisions.sort_by(|a, b| a.time.total_cmp(&b.time));

        log::info!(
            "simulation complete: {} particles, {} collisions",
            particles.len(),
            collisions.len()
        );

        Ok(SimulationResult {
            particles,
            collisions,
            animation_duration: cfg.animation_duration,
            container_width: cfg.container_width,
            container_height: cfg.container_height,
        })
    }

    /// Derive both reactants' pre-collision paths (backward from the meeting
    /// point) and the product's post-collision path (forward to the end).
    fn derive_collision_particles(
        &self,
        collision: &Collision,
        product_id: u32,
        rng: &mut impl Rng,
    ) -> (Particle, Particle, Particle) {
        let cfg = &self.config;
        let speed = cfg.particle_speed;

        // Incoming directions: roughly opposite, with jitter so the approach
        // is never perfectly head-on.
        let angle1 = rng.random_range(0.0..TAU);
        let angle2 = angle1 + PI + rng.random_range(-APPROACH_JITTER..APPROACH_JITTER);
        let v1 = DVec2::new(speed * angle1.cos(), speed * angle1.sin());
        let v2 = DVec2::new(speed * angle2.cos(), speed * angle2.sin());

        let p1 = self.derive_reactant(collision, collision.particle1_id, v1, rng);
        let p2 = self.derive_reactant(collision, collision.particle2_id, v2, rng);

        // The product leaves with the normalized average of the incoming
        // velocities; a cancelling pair gets a fresh random direction.
        let product_vel = average_velocity(v1, v2, speed, rng);
        let product = Particle {
            id: product_id,
            kind: ParticleKind::N2o4,
            keyframes: forward_trajectory(
                collision.point(),
                product_vel,
                collision.time,
                cfg.animation_duration,
                cfg.container_width,
                cfg.container_height,
                speed,
                rng,
            ),
            start_time: collision.time,
            end_time: Some(cfg.animation_duration),
            collision_id: Some(collision.id),
            velocity: product_vel,
        };

        (p1, p2, product)
    }

    /// One reactant's pre-collision path, traced backward from the meeting
    /// point to t = 0.
    fn derive_reactant(
        &self,
        collision: &Collision,
        id: u32,
        vel: DVec2,
        rng: &mut impl Rng,
    ) -> Particle {
        let cfg = &self.config;
        Particle {
            id,
            kind: ParticleKind::No2,
            keyframes: backward_trajectory(
                collision.point(),
                vel,
                collision.time,
                0.0,
                cfg.container_width,
                cfg.container_height,
                cfg.particle_speed,
                rng,
            ),
            start_time: 0.0,
            end_time: Some(collision.time),
            collision_id: Some(collision.id),
            velocity: vel,
        }
    }

    /// A particle that never collides: random spawn point away from the
    /// walls, random direction, full-duration path.
    fn derive_standalone_particle(&self, id: u32, rng: &mut impl Rng) -> Particle {
        let cfg = &self.config;
        // A container smaller than twice the spawn margin would invert the
        // sample range; shrink the margin to fit.
        let margin = SPAWN_MARGIN
            .min(cfg.container_width / 2.0)
            .min(cfg.container_height / 2.0);
        let start = DVec2::new(
            rng.random_range(margin..=cfg.container_width - margin),
            rng.random_range(margin..=cfg.container_height - margin),
        );
        let vel = random_velocity(cfg.particle_speed, rng);

        Particle {
            id,
            kind: ParticleKind::No2,
            keyframes: forward_trajectory(
                start,
                vel,
                0.0,
                cfg.animation_duration,
                cfg.container_width,
                cfg.container_height,
                cfg.particle_speed,
                rng,
            ),
            start_time: 0.0,
            end_time: Some(cfg.animation_duration),
            collision_id: None,
            velocity: vel,
        }
    }
}
