//! Core type aliases and re-exports

pub use glam::Vec3;

/// A point in 3D space. Points are plain `Copy` values.
pub type Point3 = Vec3;

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
