//! Collider abstraction over the primitive volumes

use crate::foundation::math::Vec3;
use super::primitives::{Axis, Circle, Sphere};

/// Collision volume attached to an entity (world space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// A solid sphere
    Sphere(Sphere),
    /// A thin disk
    Circle(Circle),
}

impl Collider {
    /// Creates a spherical collider
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere(Sphere::new(center, radius))
    }

    /// Creates a disk collider facing along `facing`
    pub fn circle(center: Vec3, radius: f32, facing: Axis) -> Self {
        Self::Circle(Circle::new(center, radius, facing))
    }

    /// World-space center of the volume
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.center,
            Self::Circle(circle) => circle.center,
        }
    }

    /// Move the volume to a new center
    pub fn set_center(&mut self, center: Vec3) {
        match self {
            Self::Sphere(sphere) => sphere.center = center,
            Self::Circle(circle) => circle.center = center,
        }
    }

    /// Radius of the volume
    pub fn radius(&self) -> f32 {
        match self {
            Self::Sphere(sphere) => sphere.radius,
            Self::Circle(circle) => circle.radius,
        }
    }

    /// Test for overlap against another collider of either kind
    pub fn intersects(&self, other: &Collider) -> bool {
        match (self, other) {
            (Self::Sphere(a), Self::Sphere(b)) => a.intersects(b),
            (Self::Sphere(s), Self::Circle(c)) | (Self::Circle(c), Self::Sphere(s)) => c.intersects_sphere(s),
            (Self::Circle(a), Self::Circle(b)) => a.intersects_circle(b),
        }
    }
}

impl From<Sphere> for Collider {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<Circle> for Collider {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_is_symmetric_for_mixed_pairs() {
        let ring = Collider::circle(Vec3::new(0.0, 0.0, 10.0), 4.0, Axis::Z);
        let ship = Collider::sphere(Vec3::new(1.0, 1.0, 10.5), 1.0);
        assert!(ring.intersects(&ship));
        assert!(ship.intersects(&ring));
    }

    #[test]
    fn test_set_center_moves_volume() {
        let mut collider = Collider::sphere(Vec3::zeros(), 1.0);
        let other = Collider::sphere(Vec3::new(10.0, 0.0, 0.0), 1.0);
        assert!(!collider.intersects(&other));

        collider.set_center(Vec3::new(8.5, 0.0, 0.0));
        assert_eq!(collider.center(), Vec3::new(8.5, 0.0, 0.0));
        assert!(collider.intersects(&other));
    }
}
