//! Point octree: bulk construction and radius queries over 3D points.
//!
//! The tree copies its input into owned storage, so it stays valid after the
//! caller's buffer is gone. Nodes live in a flat arena addressed by `u32`
//! index; leaves refer to contiguous runs of a single index list.
//!
//! ```
//! use point_octree::{SpatialOctree, Vec3};
//!
//! let mut tree = SpatialOctree::new();
//! tree.build(&[Vec3::ZERO, Vec3::ONE, Vec3::splat(5.0)], 4, 1).unwrap();
//! let near = tree.query_within_sphere(Vec3::ZERO, 2.0).unwrap();
//! assert_eq!(near.len(), 2);
//! ```

pub mod config;
pub mod node;
pub mod builder;
pub mod tree;

pub use config::OctreeConfig;
pub use node::{OctreeNode, NO_CHILD};
pub use builder::{OctreeBuilder, OctreeLayout};
pub use tree::{SpatialOctree, OctreeStats};
