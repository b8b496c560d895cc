//! Axis-aligned bounding box

use crate::core::types::Vec3;

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tight box around a set of points. `None` when the set is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut aabb = Aabb::new(first, first);
        for &p in iter {
            aabb.expand(p);
        }
        Some(aabb)
    }

    /// Split point of the box on every axis.
    ///
    /// Computed as `min/2 + max/2` so boxes near `f32::MAX` do not overflow.
    pub fn center(&self) -> Vec3 {
        self.min * 0.5 + self.max * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if point is inside AABB (boundary inclusive)
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// True if halving the box shrinks it on at least one axis.
    ///
    /// Fails for boxes of zero extent and for boxes whose extent is already
    /// at `f32` resolution, where the midpoint rounds onto a corner.
    pub fn is_splittable(&self) -> bool {
        let mid = self.center();
        (0..3).any(|axis| self.min[axis] < mid[axis] && mid[axis] < self.max[axis])
    }

    /// Octant (0-7) that owns `p` when this box is split at its center.
    ///
    /// Bit 0 = x, bit 1 = y, bit 2 = z. A coordinate equal to the split plane
    /// goes to the low side, so a degenerate axis always resolves low.
    pub fn octant_of(&self, p: Vec3) -> u8 {
        let mid = self.center();
        (if p.x > mid.x { 1u8 } else { 0 })
            | (if p.y > mid.y { 2 } else { 0 })
            | (if p.z > mid.z { 4 } else { 0 })
    }

    /// Get child octant AABB for octree subdivision
    /// index: 0-7 representing xyz octant (bit 0=x, bit 1=y, bit 2=z)
    ///
    /// Children share the exact split plane with their siblings, so every
    /// point routed by [`Aabb::octant_of`] lies inside its child's box.
    pub fn child_octant(&self, index: u8) -> Aabb {
        let mid = self.center();
        let min = Vec3::new(
            if index & 1 != 0 { mid.x } else { self.min.x },
            if index & 2 != 0 { mid.y } else { self.min.y },
            if index & 4 != 0 { mid.z } else { self.min.z },
        );
        let max = Vec3::new(
            if index & 1 != 0 { self.max.x } else { mid.x },
            if index & 2 != 0 { self.max.y } else { mid.y },
            if index & 4 != 0 { self.max.z } else { mid.z },
        );
        Aabb::new(min, max)
    }

    /// Point of the box nearest to `p` (per-axis clamp)
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.max(self.min).min(self.max)
    }

    /// Squared distance from `p` to the box; zero when `p` is inside
    pub fn distance_squared_to_point(&self, p: Vec3) -> f32 {
        (self.closest_point(p) - p).length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.center(), Vec3::splat(0.5));
        assert_eq!(aabb.size(), Vec3::ONE);
    }

    #[test]
    fn test_from_points() {
        let pts = [
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
        ];
        let aabb = Aabb::from_points(&pts).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 5.0));
        assert!(Aabb::from_points(&[] as &[Vec3]).is_none());
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(aabb.contains_point(Vec3::ONE));
        assert!(!aabb.contains_point(Vec3::splat(2.0)));
    }

    #[test]
    fn test_center_does_not_overflow() {
        let aabb = Aabb::new(Vec3::splat(f32::MAX * 0.75), Vec3::splat(f32::MAX));
        let c = aabb.center();
        assert!(c.is_finite());
        assert!(aabb.contains_point(c));
    }

    #[test]
    fn test_child_octant() {
        let parent = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        let child0 = parent.child_octant(0); // -x, -y, -z
        assert_eq!(child0.min, Vec3::ZERO);
        assert_eq!(child0.max, Vec3::ONE);

        let child5 = parent.child_octant(5); // +x, -y, +z
        assert_eq!(child5.min, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(child5.max, Vec3::new(2.0, 1.0, 2.0));
    }

    #[test]
    fn test_octant_tie_goes_low() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(aabb.octant_of(Vec3::ONE), 0);
        assert_eq!(aabb.octant_of(Vec3::new(1.5, 1.0, 1.0)), 1);
        assert_eq!(aabb.octant_of(Vec3::new(1.0, 1.5, 1.0)), 2);
        assert_eq!(aabb.octant_of(Vec3::new(1.0, 1.0, 1.5)), 4);
        assert_eq!(aabb.octant_of(Vec3::splat(2.0)), 7);
    }

    #[test]
    fn test_octant_point_lies_in_child() {
        let aabb = Aabb::new(Vec3::new(-3.0, 0.1, 7.0), Vec3::new(5.0, 0.7, 9.5));
        let pts = [
            Vec3::new(-3.0, 0.1, 7.0),
            Vec3::new(5.0, 0.7, 9.5),
            aabb.center(),
            Vec3::new(1.0, 0.4, 8.25),
            Vec3::new(4.9, 0.2, 9.0),
        ];
        for p in pts {
            let child = aabb.child_octant(aabb.octant_of(p));
            assert!(child.contains_point(p), "{p:?} not in {child:?}");
        }
    }

    #[test]
    fn test_degenerate_axis_resolves_low() {
        let flat = Aabb::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(2.0, 3.0, 2.0));
        assert_eq!(flat.octant_of(Vec3::new(2.0, 3.0, 2.0)) & 2, 0);
        assert!(flat.is_splittable());

        let point = Aabb::new(Vec3::splat(4.0), Vec3::splat(4.0));
        assert_eq!(point.octant_of(Vec3::splat(4.0)), 0);
        assert!(!point.is_splittable());
    }

    #[test]
    fn test_unsplittable_at_float_resolution() {
        let lo = 1.0f32;
        let hi = f32::from_bits(lo.to_bits() + 1);
        let aabb = Aabb::new(Vec3::splat(lo), Vec3::splat(hi));
        assert!(!aabb.is_splittable());
    }

    #[test]
    fn test_distance_squared_to_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.distance_squared_to_point(Vec3::splat(0.5)), 0.0);
        assert_eq!(aabb.distance_squared_to_point(Vec3::new(3.0, 0.5, 0.5)), 4.0);
        assert_eq!(aabb.distance_squared_to_point(Vec3::new(2.0, 2.0, -1.0)), 3.0);
    }
}
