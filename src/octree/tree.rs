//! Point octree container: build, radius queries, release

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::builder::{OctreeBuilder, OctreeLayout};
use super::config::OctreeConfig;
use super::node::OctreeNode;
use crate::core::{Error, Result};
use crate::math::{Aabb, Sphere};

/// Summary of a built tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctreeStats {
    pub point_count: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    /// Deepest node actually created
    pub depth: u32,
    /// Largest number of points held by a single leaf
    pub max_leaf_points: u32,
}

/// Hierarchical octree over a copied set of 3D points.
///
/// Created empty; [`build`](Self::build) partitions a point set (replacing any
/// previous one), queries are read-only, [`release`](Self::release) returns the
/// tree to its initial empty state.
#[derive(Debug, Clone, Default)]
pub struct SpatialOctree {
    /// Copy of the caller's points, in input order
    points: Vec<Vec3>,
    /// Node arena, root at index 0 (empty when nothing is built)
    nodes: Vec<OctreeNode>,
    /// Permutation of point indices grouped by leaf
    indices: Vec<u32>,
}

impl SpatialOctree {
    /// Create an empty, unbuilt tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and build in one step
    pub fn from_points(points: &[Vec3], config: &OctreeConfig) -> Result<Self> {
        let mut tree = Self::new();
        tree.build_with_config(points, config)?;
        Ok(tree)
    }

    /// Partition `points` into a fresh hierarchy.
    ///
    /// Any previous hierarchy is released first. On error the tree is left
    /// empty, as if never built.
    pub fn build(&mut self, points: &[Vec3], max_depth: u32, min_points_per_leaf: u32) -> Result<()> {
        self.build_with_config(points, &OctreeConfig::new(max_depth, min_points_per_leaf))
    }

    pub fn build_with_config(&mut self, points: &[Vec3], config: &OctreeConfig) -> Result<()> {
        self.release();
        config.validate()?;

        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::invalid(format!("point {} is not finite: {:?}", i, points[i])));
        }

        let mut owned = Vec::new();
        owned.try_reserve_exact(points.len())?;
        owned.extend_from_slice(points);

        let OctreeLayout { nodes, indices } = OctreeBuilder::new(&owned, *config).build()?;

        self.points = owned;
        self.nodes = nodes;
        self.indices = indices;

        log::debug!(
            "Built octree: {} points, {} nodes, {} leaves (max_depth={}, min_points_per_leaf={})",
            self.points.len(),
            self.nodes.len(),
            self.leaf_count(),
            config.max_depth,
            config.min_points_per_leaf,
        );
        Ok(())
    }

    /// Drop the node graph and the copied points. No-op on an empty tree.
    pub fn release(&mut self) {
        self.points = Vec::new();
        self.nodes = Vec::new();
        self.indices = Vec::new();
    }

    /// All stored points within `radius` of `center` (boundary inclusive).
    ///
    /// Order follows leaf traversal (octants 0-7, depth first) with input order
    /// kept inside each leaf; it is stable for an unmodified tree.
    pub fn query_within_sphere(&self, center: Vec3, radius: f32) -> Result<Vec<Vec3>> {
        let mut out = Vec::new();
        self.query_within_sphere_into(center, radius, &mut out)?;
        Ok(out)
    }

    /// Like [`query_within_sphere`](Self::query_within_sphere), but clears and
    /// refills `out` so a buffer can be reused across queries.
    pub fn query_within_sphere_into(&self, center: Vec3, radius: f32, out: &mut Vec<Vec3>) -> Result<()> {
        out.clear();
        let sphere = Self::checked_sphere(center, radius)?;
        let visited = self.visit_matches(&sphere, |i| out.push(self.points[i as usize]));
        log::trace!(
            "Sphere query {:?} r={} -> {} points ({} of {} nodes visited)",
            center,
            radius,
            out.len(),
            visited,
            self.nodes.len(),
        );
        Ok(())
    }

    /// Input indices of the points within `radius` of `center`
    pub fn query_indices_within_sphere(&self, center: Vec3, radius: f32) -> Result<Vec<u32>> {
        let sphere = Self::checked_sphere(center, radius)?;
        let mut out = Vec::new();
        self.visit_matches(&sphere, |i| out.push(i));
        Ok(out)
    }

    /// Run independent sphere queries in parallel. Results are in input order.
    ///
    /// Fails if any sphere has an invalid radius.
    pub fn query_batch(&self, spheres: &[Sphere]) -> Result<Vec<Vec<Vec3>>> {
        spheres
            .par_iter()
            .map(|s| self.query_within_sphere(s.center, s.radius))
            .collect()
    }

    fn checked_sphere(center: Vec3, radius: f32) -> Result<Sphere> {
        let sphere = Sphere::new(center, radius);
        if !sphere.is_valid() {
            return Err(Error::invalid(format!("radius must be >= 0, got {}", radius)));
        }
        Ok(sphere)
    }

    /// Call `emit` with the input index of every point inside `sphere`.
    /// Returns the number of nodes whose box the sphere reached.
    fn visit_matches(&self, sphere: &Sphere, mut emit: impl FnMut(u32)) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        self.visit_node(0, sphere, &mut emit)
    }

    fn visit_node(&self, node_idx: u32, sphere: &Sphere, emit: &mut impl FnMut(u32)) -> usize {
        let node = &self.nodes[node_idx as usize];

        // Prune subtrees whose box the sphere cannot reach
        if !sphere.intersects_aabb(&node.bounds) {
            return 0;
        }

        if node.is_leaf() {
            for &i in &self.indices[node.point_range()] {
                if sphere.contains_point(self.points[i as usize]) {
                    emit(i);
                }
            }
            return 1;
        }

        let mut visited = 1;
        for (_, child) in node.iter_children() {
            visited += self.visit_node(child, sphere, emit);
        }
        visited
    }

    /// True when no points are stored (unbuilt, released, or built from nothing)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of stored points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Stored points in input order
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Tight bounds of the stored points (the root box)
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|root| root.bounds)
    }

    pub fn root(&self) -> Option<&OctreeNode> {
        self.nodes.first()
    }

    /// Get a node by arena index
    pub fn node(&self, index: u32) -> Option<&OctreeNode> {
        self.nodes.get(index as usize)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Leaves paired with the input indices they hold
    pub fn leaves(&self) -> impl Iterator<Item = (&OctreeNode, &[u32])> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| (n, &self.indices[n.point_range()]))
    }

    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats {
            point_count: self.points.len(),
            node_count: self.nodes.len(),
            ..Default::default()
        };
        for (leaf, _) in self.leaves() {
            stats.leaf_count += 1;
            stats.depth = stats.depth.max(leaf.depth);
            stats.max_leaf_points = stats.max_leaf_points.max(leaf.point_count);
        }
        stats
    }
}
