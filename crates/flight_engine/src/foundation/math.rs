//! Math utilities and types
//!
//! Provides the vector/matrix aliases used across the engine and the matrix
//! builders the render pipeline and camera rely on. Every angle taken by the
//! builders is in degrees; the helpers convert internally.

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.max(min).min(max)
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Extension trait for Mat4 with single-axis rotations
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis (radians)
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis (radians)
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis (radians)
    fn rotation_z(angle: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }
}

/// Component-wise vector sum
pub fn sum(a: &Vec3, b: &Vec3) -> Vec3 {
    a + b
}

/// Multiply a vector by a scalar
pub fn scale(k: f32, v: &Vec3) -> Vec3 {
    v * k
}

/// Rotation from Euler angles `[rx, ry, rz]` in degrees, applied as Ry · Rx · Rz
pub fn make_rotation(orientation: &Vec3) -> Mat4 {
    Mat4::rotation_y(utils::deg_to_rad(orientation.y))
        * Mat4::rotation_x(utils::deg_to_rad(orientation.x))
        * Mat4::rotation_z(utils::deg_to_rad(orientation.z))
}

/// World matrix = translation · rotation · scale
///
/// Scale is applied first in object space, then the rotation, then the
/// translation to the world position.
pub fn make_world(position: &Vec3, orientation: &Vec3, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position) * make_rotation(orientation) * Mat4::new_nonuniform_scaling(scale)
}

/// View matrix for a camera at `eye` tilted by `elevation` and turned by `angle` (degrees)
pub fn make_view(eye: &Vec3, elevation: f32, angle: f32) -> Mat4 {
    Mat4::rotation_x(utils::deg_to_rad(-elevation))
        * Mat4::rotation_y(utils::deg_to_rad(-angle))
        * Mat4::new_translation(&-eye)
}

/// Perspective projection with OpenGL clip conventions (z mapped to [-1, 1])
pub fn make_perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new_perspective(aspect, utils::deg_to_rad(fov_y), near, far)
}

/// Multiply matrices left to right; an empty slice yields identity
pub fn multiply_all(matrices: &[Mat4]) -> Mat4 {
    matrices.iter().fold(Mat4::identity(), |acc, m| acc * m)
}
