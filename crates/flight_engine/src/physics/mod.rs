//! Physics module for collision detection
//!
//! Proximity only: colliders report overlap and the owning entities decide
//! what happens. There is no rigid-body response and no broad phase.

pub mod collision;
pub mod collision_system;

pub use collision::{Axis, Circle, Collider, Sphere};
pub use collision_system::{CollisionReport, CollisionSystem};
