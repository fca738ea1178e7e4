//! Primitive collision volumes
//!
//! Two shapes cover everything the simulation tests: a solid sphere and a
//! thin circular disk facing along one world axis. Both live in world space;
//! owners move them every update.

use crate::foundation::math::Vec3;

/// World axis a circle faces along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    #[default]
    Z,
}

impl Axis {
    /// Component of `v` along this axis
    pub fn along(self, v: &Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    /// Length of `v` projected onto the plane orthogonal to this axis
    pub fn planar_length(self, v: &Vec3) -> f32 {
        let (a, b) = match self {
            Self::X => (v.y, v.z),
            Self::Y => (v.x, v.z),
            Self::Z => (v.x, v.y),
        };
        a.hypot(b)
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another (touching counts)
    pub fn intersects(&self, other: &Sphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// A thin disk used for rings and ground proximity
///
/// This is not a torus: anything inside the disk's radius counts, including
/// the hole of a ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// The center of the disk in world space
    pub center: Vec3,
    /// Disk radius in the facing plane
    pub radius: f32,
    /// Axis the disk faces along
    pub facing: Axis,
    /// Extra slack allowed along the facing axis
    pub depth_tolerance: f32,
}

impl Circle {
    /// Creates a disk facing along `facing` with no depth tolerance
    pub fn new(center: Vec3, radius: f32, facing: Axis) -> Self {
        Self {
            center,
            radius,
            facing,
            depth_tolerance: 0.0,
        }
    }

    /// Set the depth tolerance (builder pattern)
    pub fn with_depth_tolerance(mut self, tolerance: f32) -> Self {
        self.depth_tolerance = tolerance;
        self
    }

    /// Check if a sphere touches this disk
    ///
    /// The sphere centre must project inside the disk radius, and sit no
    /// further from the disk plane than the sphere radius plus the tolerance.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let offset = sphere.center - self.center;
        self.facing.planar_length(&offset) <= self.radius
            && self.facing.along(&offset).abs() <= sphere.radius + self.depth_tolerance
    }

    /// Check if two disks overlap, measured in this disk's plane
    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let offset = other.center - self.center;
        self.facing.planar_length(&offset) <= self.radius + other.radius
            && self.facing.along(&offset).abs() <= self.depth_tolerance + other.depth_tolerance
    }
}
