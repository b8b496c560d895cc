//! Octree arena node

use crate::math::Aabb;

/// Sentinel stored in a child slot whose octant holds no points.
pub const NO_CHILD: u32 = u32::MAX;

/// A node in the point octree arena.
///
/// Every node covers a contiguous range `point_offset..point_offset + point_count`
/// of the tree's index list. For a leaf that range is its point list; for an
/// internal node it is the concatenation of its children's ranges in octant
/// order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreeNode {
    /// Region covered by this node (one octant of the parent's box)
    pub bounds: Aabb,
    /// Arena index of each octant's child, or [`NO_CHILD`]
    pub children: [u32; 8],
    /// Bit i set = child i present
    pub child_mask: u8,
    /// Distance from the root (root = 0)
    pub depth: u32,
    /// First entry of this node's range in the index list
    pub point_offset: u32,
    /// Number of points under this node
    pub point_count: u32,
}

impl OctreeNode {
    /// Create a childless node. It stays a leaf unless children are attached.
    pub fn leaf(bounds: Aabb, depth: u32, point_offset: u32, point_count: u32) -> Self {
        Self {
            bounds,
            children: [NO_CHILD; 8],
            child_mask: 0,
            depth,
            point_offset,
            point_count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.child_mask == 0
    }

    /// Arena index of the child in octant `index`, if materialised.
    pub fn child(&self, index: u8) -> Option<u32> {
        debug_assert!(index < 8);
        if self.child_mask & (1 << index) != 0 {
            Some(self.children[index as usize])
        } else {
            None
        }
    }

    pub fn set_child(&mut self, index: u8, node_index: u32) {
        debug_assert!(index < 8);
        debug_assert_ne!(node_index, NO_CHILD);
        self.children[index as usize] = node_index;
        self.child_mask |= 1 << index;
    }

    /// Number of materialised children.
    pub fn child_count(&self) -> u32 {
        self.child_mask.count_ones()
    }

    /// Present children as `(octant, arena index)`, in octant order.
    pub fn iter_children(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (0..8u8).filter_map(move |i| self.child(i).map(|c| (i, c)))
    }

    /// Range of this node's entries in the tree's index list.
    pub fn point_range(&self) -> std::ops::Range<usize> {
        let start = self.point_offset as usize;
        start..start + self.point_count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_leaf_has_no_children() {
        let node = OctreeNode::leaf(unit(), 2, 10, 4);
        assert!(node.is_leaf());
        assert_eq!(node.child_count(), 0);
        assert_eq!(node.point_range(), 10..14);
        assert!((0..8).all(|i| node.child(i).is_none()));
    }

    #[test]
    fn test_set_child() {
        let mut node = OctreeNode::leaf(unit(), 0, 0, 8);
        node.set_child(3, 7);
        node.set_child(6, 12);
        assert!(!node.is_leaf());
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.child(3), Some(7));
        assert_eq!(node.child(0), None);
        assert_eq!(node.iter_children().collect::<Vec<_>>(), vec![(3, 7), (6, 12)]);
    }
}
