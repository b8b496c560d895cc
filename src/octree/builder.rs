//! Octree construction from a point buffer

use glam::Vec3;

use super::config::OctreeConfig;
use super::node::{OctreeNode, NO_CHILD};
use crate::core::{Error, Result};
use crate::math::Aabb;

/// Node arena and index permutation produced by [`OctreeBuilder`].
///
/// `indices` is a permutation of `0..points.len()`; each node refers to a
/// contiguous slice of it.
#[derive(Debug, Clone, Default)]
pub struct OctreeLayout {
    /// All nodes (root is at index 0 when non-empty)
    pub nodes: Vec<OctreeNode>,
    /// Point indices, grouped by leaf
    pub indices: Vec<u32>,
}

/// Builder for partitioning a point set into an octree arena
pub struct OctreeBuilder<'a> {
    points: &'a [Vec3],
    config: OctreeConfig,
    nodes: Vec<OctreeNode>,
    indices: Vec<u32>,
    /// Partition scratch: destination buffer and per-entry octant codes
    scratch: Vec<u32>,
    octants: Vec<u8>,
}

impl<'a> OctreeBuilder<'a> {
    pub fn new(points: &'a [Vec3], config: OctreeConfig) -> Self {
        Self {
            points,
            config,
            nodes: Vec::new(),
            indices: Vec::new(),
            scratch: Vec::new(),
            octants: Vec::new(),
        }
    }

    /// Partition the points. An empty point set yields an empty layout (no root).
    pub fn build(mut self) -> Result<OctreeLayout> {
        self.config.validate()?;

        let Some(bounds) = Aabb::from_points(self.points) else {
            return Ok(OctreeLayout::default());
        };

        let count = u32::try_from(self.points.len()).map_err(|_| {
            Error::invalid(format!("too many points: {}", self.points.len()))
        })?;
        let len = count as usize;

        self.indices.try_reserve_exact(len)?;
        self.indices.extend(0..count);
        self.scratch.try_reserve_exact(len)?;
        self.scratch.resize(len, 0);
        self.octants.try_reserve_exact(len)?;
        self.octants.resize(len, 0);

        self.build_node(bounds, 0, 0, count)?;

        Ok(OctreeLayout {
            nodes: self.nodes,
            indices: self.indices,
        })
    }

    /// Recursively build the node covering `indices[offset..offset + count]`.
    /// Returns its arena index.
    fn build_node(&mut self, bounds: Aabb, depth: u32, offset: u32, count: u32) -> Result<u32> {
        self.nodes.try_reserve(1)?;
        let node_index = next_node_index(self.nodes.len())?;
        self.nodes.push(OctreeNode::leaf(bounds, depth, offset, count));

        if count <= self.config.min_points_per_leaf
            || depth >= self.config.max_depth
            || !bounds.is_splittable()
        {
            return Ok(node_index);
        }

        let counts = self.partition(&bounds, offset as usize, count as usize);

        // Children occupy consecutive sub-ranges in octant order
        let mut child_offset = offset;
        for octant in 0..8u8 {
            let child_count = counts[octant as usize];
            if child_count == 0 {
                continue;
            }
            let child = self.build_node(
                bounds.child_octant(octant),
                depth + 1,
                child_offset,
                child_count,
            )?;
            self.nodes[node_index as usize].set_child(octant, child);
            child_offset += child_count;
        }

        Ok(node_index)
    }

    /// Stable counting sort of `indices[start..start + len]` by octant.
    /// Returns the number of points per octant.
    fn partition(&mut self, bounds: &Aabb, start: usize, len: usize) -> [u32; 8] {
        let range = start..start + len;
        let mut counts = [0u32; 8];

        for i in range.clone() {
            let octant = bounds.octant_of(self.points[self.indices[i] as usize]);
            self.octants[i] = octant;
            counts[octant as usize] += 1;
        }

        let mut cursor = [0usize; 8];
        let mut running = start;
        for (slot, &n) in cursor.iter_mut().zip(counts.iter()) {
            *slot = running;
            running += n as usize;
        }

        for i in range.clone() {
            let octant = self.octants[i] as usize;
            self.scratch[cursor[octant]] = self.indices[i];
            cursor[octant] += 1;
        }

        self.indices[range.clone()].copy_from_slice(&self.scratch[range]);
        counts
    }
}

/// Arena index for a node pushed onto an arena of `len` nodes.
///
/// Indices must fit in `u32` and stay clear of [`NO_CHILD`].
fn next_node_index(len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|&i| i != NO_CHILD)
        .ok_or_else(|| Error::invalid(format!("node arena full: {} nodes", len)))
}
