//! Entity state shared by every game object
//!
//! An [`Entity`] is the spatial and visual core of an object: where it is,
//! how it is oriented and scaled, what it looks like and what it collides
//! with. Game-specific behaviour wraps an entity in a type implementing
//! [`GameObject`](super::GameObject).

use std::rc::Rc;

use crate::assets::Geometry;
use crate::events::Signal;
use crate::foundation::math::{make_world, Mat4, Vec3};
use crate::physics::Collider;

slotmap::new_key_type! {
    /// Stable handle to an entity stored in the registry
    pub struct EntityId;
}

/// Coarse role of an entity, used to pick collision pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The controlled object
    Player,
    /// Objects that hurt the player
    Hazard,
    /// Objects the player picks up
    Collectible,
    /// Player-fired projectiles
    Projectile,
    /// Scenery tiles
    Terrain,
    /// Anything else drawn but never tested
    Decoration,
}

impl EntityKind {
    /// Every kind, in a fixed order
    pub const ALL: [Self; 6] = [
        Self::Player,
        Self::Hazard,
        Self::Collectible,
        Self::Projectile,
        Self::Terrain,
        Self::Decoration,
    ];
}

/// Uniform or per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Same factor on every axis
    Uniform(f32),
    /// Independent factors per axis
    NonUniform(Vec3),
}

impl Default for Scale {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

impl From<f32> for Scale {
    fn from(factor: f32) -> Self {
        Self::Uniform(factor)
    }
}

impl From<Vec3> for Scale {
    fn from(factors: Vec3) -> Self {
        Self::NonUniform(factors)
    }
}

impl Scale {
    /// Per-axis factors
    pub fn to_vector(self) -> Vec3 {
        match self {
            Self::Uniform(factor) => Vec3::repeat(factor),
            Self::NonUniform(factors) => factors,
        }
    }

    /// Whether all three factors are equal
    pub fn is_uniform(self) -> bool {
        match self {
            Self::Uniform(_) => true,
            Self::NonUniform(v) => v.x == v.y && v.y == v.z,
        }
    }
}

/// Spatial and visual state of a game object
#[derive(Debug)]
pub struct Entity {
    /// Pivot position in world space
    pub position: Vec3,
    /// Scale applied before rotation
    pub scale: Scale,
    /// Euler angles `[rx, ry, rz]` in degrees
    pub orientation: Vec3,
    /// Flat tint bound as the material colour
    pub material_color: Vec3,
    /// Optional collision volume in world space
    pub collider: Option<Collider>,
    geometry: Rc<Geometry>,
    alive: bool,
    destroyed: Signal<EntityId>,
}

impl Entity {
    /// Create an entity at the origin drawing `geometry`
    pub fn new(geometry: Rc<Geometry>) -> Self {
        Self {
            position: Vec3::zeros(),
            scale: Scale::default(),
            orientation: Vec3::zeros(),
            material_color: Vec3::repeat(1.0),
            collider: None,
            geometry,
            alive: true,
            destroyed: Signal::new(),
        }
    }

    /// Set the position (builder pattern)
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the scale (builder pattern)
    pub fn with_scale(mut self, scale: impl Into<Scale>) -> Self {
        self.scale = scale.into();
        self
    }

    /// Set the orientation in degrees (builder pattern)
    pub fn with_orientation(mut self, orientation: Vec3) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the material tint (builder pattern)
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.material_color = color;
        self
    }

    /// Attach a collider (builder pattern)
    pub fn with_collider(mut self, collider: impl Into<Collider>) -> Self {
        self.collider = Some(collider.into());
        self
    }

    /// Shared geometry drawn for this entity
    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }

    /// World matrix = translation · rotation · scale
    pub fn world_matrix(&self) -> Mat4 {
        make_world(&self.position, &self.orientation, &self.scale.to_vector())
    }

    /// Mark the entity for removal at the start of the next pass
    ///
    /// The entity stays stored, drawable and collidable until then.
    pub fn destroy(&mut self) {
        if self.alive {
            self.alive = false;
            log::trace!("Entity at {:?} marked destroyed", self.position);
        }
    }

    /// Whether the entity has not been destroyed
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Move the collider to `position + offset`
    pub fn sync_collider(&mut self, offset: Vec3) {
        let center = self.position + offset;
        if let Some(collider) = self.collider.as_mut() {
            collider.set_center(center);
        }
    }

    /// Run `listener` once when the registry retires this entity
    pub fn on_destroyed<F>(&mut self, listener: F)
    where
        F: FnOnce(&EntityId) + 'static,
    {
        self.destroyed.subscribe(listener);
    }

    pub(crate) fn notify_destroyed(&mut self, id: EntityId) -> bool {
        self.alive = false;
        self.destroyed.fire(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn entity() -> Entity {
        Entity::new(Rc::new(Geometry::default()))
    }

    #[test]
    fn test_world_matrix_places_origin_at_position() {
        let e = entity().with_position(Vec3::new(0.0, 0.0, 5.0)).with_scale(3.0);
        let p = e.world_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(p.coords, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_destroy_is_idempotent_and_deferred() {
        let fired = Rc::new(Cell::new(0));
        let mut e = entity();
        let counter = Rc::clone(&fired);
        e.on_destroyed(move |_| counter.set(counter.get() + 1));

        e.destroy();
        e.destroy();
        assert!(!e.is_alive());
        assert_eq!(fired.get(), 0);

        assert!(e.notify_destroyed(EntityId::default()));
        assert!(!e.notify_destroyed(EntityId::default()));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_sync_collider_applies_offset() {
        let mut e = entity()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_collider(Collider::sphere(Vec3::zeros(), 1.0));
        e.sync_collider(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(e.collider.map(|c| c.center()), Some(Vec3::new(1.0, 2.0, 5.0)));
    }

    #[test]
    fn test_scale_uniformity() {
        assert!(Scale::Uniform(2.0).is_uniform());
        assert!(Scale::NonUniform(Vec3::repeat(2.0)).is_uniform());
        assert!(!Scale::NonUniform(Vec3::new(1.0, 2.0, 1.0)).is_uniform());
        assert_eq!(Scale::from(2.0).to_vector(), Vec3::repeat(2.0));
    }
}
