//! Decorative cube

use flight_engine::assets::Geometry;
use flight_engine::ecs::{Entity, EntityKind, GameObject, Updatable, UpdateContext};
use flight_engine::foundation::math::Vec3;
use std::rc::Rc;

/// Slowly spinning cube with no collider
pub struct Cube {
    entity: Entity,
    spin_deg_per_second: f32,
}

impl Cube {
    /// Create a cube at `position`
    pub fn new(geometry: Rc<Geometry>, position: Vec3) -> Self {
        Self {
            entity: Entity::new(geometry)
                .with_position(position)
                .with_color(Vec3::new(0.8, 0.6, 0.2)),
            spin_deg_per_second: 45.0,
        }
    }
}

impl GameObject for Cube {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Decoration
    }

    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for Cube {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let yaw = &mut self.entity.orientation.y;
        *yaw = (*yaw + self.spin_deg_per_second * ctx.dt) % 360.0;
    }
}
