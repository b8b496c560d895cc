//! Build parameters for [`SpatialOctree`](super::SpatialOctree).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Default subdivision limit
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Default leaf capacity
pub const DEFAULT_MIN_POINTS_PER_LEAF: u32 = 20;

/// Octree build parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Deepest level a node may reach. 0 puts every point in the root leaf.
    pub max_depth: u32,
    /// A node holding this many points or fewer is not subdivided. Must be >= 1.
    pub min_points_per_leaf: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_points_per_leaf: DEFAULT_MIN_POINTS_PER_LEAF,
        }
    }
}

impl OctreeConfig {
    pub fn new(max_depth: u32, min_points_per_leaf: u32) -> Self {
        Self { max_depth, min_points_per_leaf }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_points_per_leaf < 1 {
            return Err(Error::invalid(format!(
                "min_points_per_leaf must be at least 1, got {}",
                self.min_points_per_leaf
            )));
        }
        Ok(())
    }

    /// Parse and validate a config from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = OctreeConfig::default();
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.min_points_per_leaf, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_leaf_size_rejected() {
        let err = OctreeConfig::new(4, 0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_from_json_partial() {
        let config = OctreeConfig::from_json(r#"{ "max_depth": 3 }"#).unwrap();
        assert_eq!(config, OctreeConfig::new(3, DEFAULT_MIN_POINTS_PER_LEAF));
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(OctreeConfig::from_json("not json"), Err(Error::Config(_))));
        assert!(matches!(
            OctreeConfig::from_json(r#"{ "min_points_per_leaf": 0 }"#),
            Err(Error::InvalidArgument(_))
        ));
        // Negative depth cannot be represented
        assert!(matches!(
            OctreeConfig::from_json(r#"{ "max_depth": -1 }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("octree.json");
        let config = OctreeConfig::new(6, 2);
        config.save_sync(&path).unwrap();
        assert_eq!(OctreeConfig::load_sync(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OctreeConfig::load_sync(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
