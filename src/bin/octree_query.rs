//! Octree query tool — builds a point octree from a JSON file and runs a sphere query.
//!
//! Usage: cargo run --release --bin octree_query -- [OPTIONS]
//!
//! Options:
//!   --points <FILE>      JSON array of [x, y, z] points (required)
//!   --config <FILE>      JSON octree config ({"max_depth": .., "min_points_per_leaf": ..})
//!   --max-depth <N>      Override max depth (default: 10)
//!   --min-points <N>     Override points per leaf threshold (default: 20)
//!   --center <X,Y,Z>     Query center (default: 0,0,0)
//!   --radius <R>         Query radius; omit to only build
//!   --stats              Print tree statistics
//!
//! Matches are printed to stdout as a JSON array of [x, y, z].

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use glam::Vec3;

use point_octree::core::logging;
use point_octree::{Error, OctreeConfig, Result, SpatialOctree};

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let points_path = parse_str_arg(&args, "--points")
        .map(PathBuf::from)
        .ok_or_else(|| Error::InvalidArgument("--points <FILE> is required".to_string()))?;

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => OctreeConfig::load_sync(&PathBuf::from(path))?,
        None => OctreeConfig::default(),
    };
    apply_overrides(&mut config, &args)?;

    let center = match parse_str_arg(&args, "--center") {
        Some(s) => parse_vec3(&s)?,
        None => Vec3::ZERO,
    };
    let radius = parse_f32_arg(&args, "--radius")?;
    let show_stats = args.iter().any(|a| a == "--stats");

    let points = load_points(&points_path)?;
    log::info!("Loaded {} points from {}", points.len(), points_path.display());

    let start = Instant::now();
    let tree = SpatialOctree::from_points(&points, &config)?;
    log::info!("Built octree in {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);

    if show_stats {
        let stats = serde_json::to_string_pretty(&tree.stats())
            .map_err(|e| Error::Config(e.to_string()))?;
        eprintln!("{}", stats);
    }

    if let Some(radius) = radius {
        let start = Instant::now();
        let found = tree.query_within_sphere(center, radius)?;
        log::info!(
            "Found {} points within {} of {:?} in {:.3}ms",
            found.len(),
            radius,
            center,
            start.elapsed().as_secs_f64() * 1000.0,
        );
        let json = serde_json::to_string(&found)
            .map_err(|e| Error::Config(e.to_string()))?;
        println!("{}", json);
    }

    Ok(())
}

/// Apply `--max-depth` / `--min-points` on top of a loaded config
fn apply_overrides(config: &mut OctreeConfig, args: &[String]) -> Result<()> {
    if let Some(depth) = parse_i64_arg(args, "--max-depth")? {
        config.max_depth = u32::try_from(depth)
            .map_err(|_| Error::InvalidArgument(format!("--max-depth must be >= 0, got {}", depth)))?;
    }
    if let Some(min_points) = parse_i64_arg(args, "--min-points")? {
        config.min_points_per_leaf = u32::try_from(min_points)
            .map_err(|_| Error::InvalidArgument(format!("--min-points must be >= 1, got {}", min_points)))?;
    }
    config.validate()
}

fn load_points(path: &std::path::Path) -> Result<Vec<Vec3>> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

fn parse_vec3(s: &str) -> Result<Vec3> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(Error::InvalidArgument(format!("expected X,Y,Z, got '{}'", s)));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("bad coordinate '{}'", part)))?;
    }
    Ok(Vec3::from_array(xyz))
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_f32_arg(args: &[String], flag: &str) -> Result<Option<f32>> {
    parse_str_arg(args, flag)
        .map(|s| {
            s.parse()
                .map_err(|_| Error::InvalidArgument(format!("{} expects a number, got '{}'", flag, s)))
        })
        .transpose()
}

fn parse_i64_arg(args: &[String], flag: &str) -> Result<Option<i64>> {
    parse_str_arg(args, flag)
        .map(|s| {
            s.parse()
                .map_err(|_| Error::InvalidArgument(format!("{} expects an integer, got '{}'", flag, s)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("octree_query")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert_eq!(parse_vec3(" 0 , 0 , 1e2 ").unwrap(), Vec3::new(0.0, 0.0, 100.0));
    }

    #[test]
    fn test_parse_vec3_rejects_bad_input() {
        assert!(matches!(parse_vec3("1,2"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_vec3("1,2,3,4"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_vec3("1,abc,3"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_vec3(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_parse_number_args() {
        let a = args(&["--radius", "2.5", "--max-depth", "7"]);
        assert_eq!(parse_f32_arg(&a, "--radius").unwrap(), Some(2.5));
        assert_eq!(parse_i64_arg(&a, "--max-depth").unwrap(), Some(7));
        assert_eq!(parse_f32_arg(&a, "--missing").unwrap(), None);

        let bad = args(&["--radius", "wide", "--max-depth", "1.5"]);
        assert!(parse_f32_arg(&bad, "--radius").is_err());
        assert!(parse_i64_arg(&bad, "--max-depth").is_err());

        // Flag present without a value
        assert_eq!(parse_str_arg(&args(&["--radius"]), "--radius"), None);
    }

    #[test]
    fn test_overrides() {
        let mut config = OctreeConfig::default();
        apply_overrides(&mut config, &args(&["--max-depth", "3", "--min-points", "2"])).unwrap();
        assert_eq!(config, OctreeConfig::new(3, 2));

        let mut untouched = OctreeConfig::new(5, 8);
        apply_overrides(&mut untouched, &args(&[])).unwrap();
        assert_eq!(untouched, OctreeConfig::new(5, 8));
    }

    #[test]
    fn test_overrides_reject_negative_and_zero() {
        let mut config = OctreeConfig::default();
        assert!(matches!(
            apply_overrides(&mut config, &args(&["--max-depth", "-1"])),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            apply_overrides(&mut config, &args(&["--min-points", "-4"])),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            apply_overrides(&mut OctreeConfig::default(), &args(&["--min-points", "0"])),
            Err(Error::InvalidArgument(_))
        ));
    }
}
