//! Result flattening for downstream consumers
//!
//! Two read-only views over a [`SimulationResult`]: a JSON tree of rounded
//! numeric fields for network transport, and row-oriented CSV tables (one row
//! per keyframe, per collision, per particle summary) for animation tooling.
//! No physics happens here.

use serde_json::{Value, json};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::sim::engine::SimulationResult;

/// Round to 2 decimal places (positions).
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round to 4 decimal places (times).
fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Flatten a result into the JSON tree served to animation clients.
///
/// Positions are rounded to 2 decimals and times to 4; a particle without an
/// explicit end time reports the animation end.
pub fn result_to_json(result: &SimulationResult) -> Value {
    let particles: Vec<Value> = result
        .particles
        .iter()
        .map(|p| {
            let keyframes: Vec<Value> = p
                .keyframes
                .iter()
                .map(|kf| {
                    json!({
                        "x": round2(kf.x),
                        "y": round2(kf.y),
                        "time": round4(kf.time),
                    })
                })
                .collect();
            json!({
                "id": p.id,
                "type": p.kind.as_str(),
                "start_time": round4(p.start_time),
                "end_time": round4(p.end_time.unwrap_or(result.animation_duration)),
                "collision_id": p.collision_id,
                "keyframes": keyframes,
            })
        })
        .collect();

    let collisions: Vec<Value> = result
        .collisions
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "time": round4(c.time),
                "x": round2(c.x),
                "y": round2(c.y),
                "particle1_id": c.particle1_id,
                "particle2_id": c.particle2_id,
                "result_particle_id": c.result_particle_id,
            })
        })
        .collect();

    json!({
        "success": true,
        "params": {
            "container_width": result.container_width,
            "container_height": result.container_height,
            "animation_duration": result.animation_duration,
        },
        "particles": particles,
        "collisions": collisions,
        "summary": {
            "total_particles": result.particles.len(),
            "no2_count": result.no2_particles().count(),
            "n2o4_count": result.n2o4_particles().count(),
            "collision_count": result.collisions.len(),
        },
    })
}

/// Write the keyframe table: one row per keyframe, sorted by particle kind,
/// particle id, then keyframe index.
pub fn write_keyframes_csv<W: Write>(result: &SimulationResult, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "particle_id,particle_type,keyframe_idx,x,y,time_sec,duration_to_next,is_start,is_end,collision_id"
    )?;
    for p in &result.particles {
        for (i, kf) in p.keyframes.iter().enumerate() {
            let duration_to_next = match p.keyframes.get(i + 1) {
                Some(next) => next.time - kf.time,
                None => 0.0,
            };
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{}",
                p.id,
                p.kind.as_str(),
                i,
                round2(kf.x),
                round2(kf.y),
                round4(kf.time),
                round4(duration_to_next),
                i == 0,
                i == p.keyframes.len() - 1,
                p.collision_id.map_or(String::new(), |c| c.to_string()),
            )?;
        }
    }
    Ok(())
}

/// Write the collision table: one row per collision event.
pub fn write_collisions_csv<W: Write>(result: &SimulationResult, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "collision_id,time_sec,x,y,no2_particle_1,no2_particle_2,n2o4_particle"
    )?;
    for c in &result.collisions {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            c.id,
            round4(c.time),
            round2(c.x),
            round2(c.y),
            c.particle1_id,
            c.particle2_id,
            c.result_particle_id
                .map_or(String::new(), |r| r.to_string()),
        )?;
    }
    Ok(())
}

/// Write the particle summary table: one row per particle with its endpoints
/// and bounce count.
pub fn write_summary_csv<W: Write>(result: &SimulationResult, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "particle_id,particle_type,start_time,end_time,start_x,start_y,end_x,end_y,num_keyframes,num_bounces,collision_id"
    )?;
    for p in &result.particles {
        let first = p.keyframes.first();
        let last = p.keyframes.last();
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            p.id,
            p.kind.as_str(),
            round4(p.start_time),
            p.end_time.map_or(String::new(), |t| round4(t).to_string()),
            first.map_or(String::new(), |kf| round2(kf.x).to_string()),
            first.map_or(String::new(), |kf| round2(kf.y).to_string()),
            last.map_or(String::new(), |kf| round2(kf.x).to_string()),
            last.map_or(String::new(), |kf| round2(kf.y).to_string()),
            p.keyframes.len(),
            p.num_bounces(),
            p.collision_id.map_or(String::new(), |c| c.to_string()),
        )?;
    }
    Ok(())
}

/// Write all three CSV tables to files next to each other.
pub fn export_csv(
    result: &SimulationResult,
    keyframes_path: &Path,
    collisions_path: &Path,
    summary_path: &Path,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(keyframes_path)?);
    write_keyframes_csv(result, &mut out)?;
    out.flush()?;
    log::info!("exported keyframes to {}", keyframes_path.display());

    let mut out = BufWriter::new(File::create(collisions_path)?);
    write_collisions_csv(result, &mut out)?;
    out.flush()?;
    log::info!("exported collisions to {}", collisions_path.display());

    let mut out = BufWriter::new(File::create(summary_path)?);
    write_summary_csv(result, &mut out)?;
    out.flush()?;
    log::info!("exported summary to {}", summary_path.display());

    Ok(())
}

/// Print a short keyframe preview for the first few particles.
pub fn print_keyframes_preview(result: &SimulationResult, max_particles: usize) {
    println!("{:=<60}", "");
    println!("KEYFRAMES PREVIEW");
    println!("{:=<60}", "");

    for p in result.particles.iter().take(max_particles) {
        println!("\n{} particle {}", p.kind.as_str(), p.id);
        match p.end_time {
            Some(end) => println!("  active: {:.2}s - {:.2}s", p.start_time, end),
            None => println!("  active from: {:.2}s", p.start_time),
        }
        println!("  keyframes ({}):", p.keyframes.len());
        for (i, kf) in p.keyframes.iter().take(5).enumerate() {
            println!("    [{}] t={:.3}s: ({:.1}, {:.1})", i, kf.time, kf.x, kf.y);
        }
        if p.keyframes.len() > 5 {
            println!("    ... and {} more keyframes", p.keyframes.len() - 5);
        }
    }
    if result.particles.len() > max_particles {
        println!(
            "\n... and {} more particles",
            result.particles.len() - max_particles
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::engine::Simulation;

    fn result() -> SimulationResult {
        Simulation::new(SimConfig {
            container_width: 100.0,
            container_height: 100.0,
            num_particles: 4,
            num_collisions: 1,
            particle_speed: 10.0,
            animation_duration: 4.0,
            collision_margin: 5.0,
            random_seed: Some(42),
        })
        .unwrap()
        .run()
        .unwrap()
    }

    #[test]
    fn test_json_tree_shape_and_counts() {
        let json = result_to_json(&result());
        assert_eq!(json["success"], true);
        assert_eq!(json["summary"]["total_particles"], 5);
        assert_eq!(json["summary"]["no2_count"], 4);
        assert_eq!(json["summary"]["n2o4_count"], 1);
        assert_eq!(json["summary"]["collision_count"], 1);
        assert_eq!(json["particles"].as_array().unwrap().len(), 5);
        assert_eq!(json["params"]["container_width"], 100.0);
    }

    #[test]
    fn test_json_rounds_positions_and_times() {
        let json = result_to_json(&result());
        for p in json["particles"].as_array().unwrap() {
            for kf in p["keyframes"].as_array().unwrap() {
                let x = kf["x"].as_f64().unwrap();
                let t = kf["time"].as_f64().unwrap();
                assert!((x * 100.0 - (x * 100.0).round()).abs() < 1e-9);
                assert!((t * 10_000.0 - (t * 10_000.0).round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_keyframes_csv_has_row_per_keyframe() {
        let result = result();
        let mut buf = Vec::new();
        write_keyframes_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let expected_rows: usize = result.particles.iter().map(|p| p.keyframes.len()).sum();
        assert_eq!(text.lines().count(), expected_rows + 1);
        assert!(text.starts_with("particle_id,particle_type,keyframe_idx"));
    }

    #[test]
    fn test_collisions_csv_row_per_collision() {
        let result = result();
        let mut buf = Vec::new();
        write_collisions_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        // Product id 5 appears in the n2o4_particle column
        assert!(text.lines().nth(1).unwrap().ends_with(",5"));
    }

    #[test]
    fn test_summary_csv_row_per_particle() {
        let result = result();
        let mut buf = Vec::new();
        write_summary_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), result.particles.len() + 1);
    }

    #[test]
    fn test_standalone_particles_have_empty_collision_column() {
        let result = result();
        let mut buf = Vec::new();
        write_summary_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let standalone_rows = text
            .lines()
            .skip(1)
            .filter(|l| l.ends_with(','))
            .count();
        // Two of the four NO2 particles never collide
        assert_eq!(standalone_rows, 2);
    }
}
