//! point-octree - hierarchical octree over 3D points with radius queries

pub mod core;
pub mod math;
pub mod octree;

pub use crate::core::{Error, Point3, Result, Vec3};
pub use crate::math::{Aabb, Sphere};
pub use crate::octree::{OctreeConfig, OctreeStats, SpatialOctree};
