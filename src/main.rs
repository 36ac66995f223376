//! Dimerize entry point
//!
//! Runs the simulation from CLI parameters and writes the CSV/JSON outputs
//! consumed by animation tooling.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use dimerize::export::{export_csv, print_keyframes_preview, result_to_json};
use dimerize::{SimConfig, Simulation};

#[derive(Parser, Debug)]
#[command(
    name = "dimerize",
    about = "Pre-calculate particle trajectories with evenly-spaced collisions for animation"
)]
struct Args {
    /// Number of NO2 particles
    #[arg(short = 'p', long = "particles")]
    particles: Option<u32>,

    /// Number of collisions (each consumes two NO2 particles)
    #[arg(short = 'c', long = "collisions")]
    collisions: Option<u32>,

    /// Animation duration in seconds
    #[arg(short = 'd', long = "duration")]
    duration: Option<f64>,

    /// Particle speed in px/sec
    #[arg(short = 's', long = "speed")]
    speed: Option<f64>,

    /// Container width in px
    #[arg(short = 'W', long = "width")]
    width: Option<f64>,

    /// Container height in px
    #[arg(short = 'H', long = "height")]
    height: Option<f64>,

    /// Random seed for reproducibility (omit for a random run)
    #[arg(long)]
    seed: Option<u64>,

    /// Output path for the keyframes CSV
    #[arg(short = 'o', long = "output", default_value = "particle_keyframes.csv")]
    output: PathBuf,

    /// Skip CSV export
    #[arg(long)]
    no_csv: bool,

    /// Print the JSON tree to stdout
    #[arg(long)]
    json: bool,

    /// Print a detailed keyframe preview
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let defaults = SimConfig::default();
    let config = SimConfig {
        container_width: args.width.unwrap_or(defaults.container_width),
        container_height: args.height.unwrap_or(defaults.container_height),
        num_particles: args.particles.unwrap_or(defaults.num_particles),
        num_collisions: args.collisions.unwrap_or(defaults.num_collisions),
        particle_speed: args.speed.unwrap_or(defaults.particle_speed),
        animation_duration: args.duration.unwrap_or(defaults.animation_duration),
        collision_margin: defaults.collision_margin,
        random_seed: args.seed,
    };

    log::info!(
        "container {}x{} px, {} particles, {} collisions, {}s at {} px/s, seed {:?}",
        config.container_width,
        config.container_height,
        config.num_particles,
        config.num_collisions,
        config.animation_duration,
        config.particle_speed,
        config.random_seed
    );

    let result = Simulation::new(config)?.run()?;

    println!(
        "Simulation complete: {} particles ({} NO2, {} N2O4), {} collisions",
        result.particles.len(),
        result.no2_particles().count(),
        result.n2o4_particles().count(),
        result.collisions.len()
    );
    for c in &result.collisions {
        println!(
            "  t={:.2}s: NO2 #{} + NO2 #{} -> N2O4 #{} at ({:.1}, {:.1})",
            c.time,
            c.particle1_id,
            c.particle2_id,
            c.result_particle_id.unwrap_or(0),
            c.x,
            c.y
        );
    }

    if !args.no_csv {
        export_csv(
            &result,
            &args.output,
            Path::new("collisions.csv"),
            Path::new("particle_summary.csv"),
        )?;
    }

    if args.verbose {
        print_keyframes_preview(&result, 5);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result_to_json(&result))?);
    }

    Ok(())
}
