//! Collision volumes and intersection tests
//!
//! - [`primitives`] - Sphere and thin-disk volumes with their pairwise tests
//! - [`shape`] - The [`Collider`] enum entities carry

pub mod primitives;
pub mod shape;

pub use primitives::{Axis, Circle, Sphere};
pub use shape::Collider;
