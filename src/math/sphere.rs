//! Query sphere

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Radius must be a non-negative number (NaN is rejected too)
    pub fn is_valid(&self) -> bool {
        self.radius >= 0.0
    }

    pub fn radius_squared(&self) -> f32 {
        self.radius * self.radius
    }

    /// Euclidean distance test, boundary inclusive. No epsilon.
    pub fn contains_point(&self, p: Vec3) -> bool {
        (p - self.center).length_squared() <= self.radius_squared()
    }

    /// Box-sphere overlap: clamp the center into the box and compare the
    /// squared distance against radius squared.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        aabb.distance_squared_to_point(self.center) <= self.radius_squared()
    }
}
