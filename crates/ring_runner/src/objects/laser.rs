//! Laser bolts fired by the cockpit

use super::MeshInfo;
use crate::config::GameSettings;
use flight_engine::assets::Geometry;
use flight_engine::ecs::{Collidable, Entity, EntityKind, GameObject, Updatable, UpdateContext};
use flight_engine::foundation::math::Vec3;
use flight_engine::physics::Sphere;
use std::rc::Rc;

/// Bolt flying straight down +Z until it hits something or leaves the field
pub struct Laser {
    entity: Entity,
    speed: f32,
    game_speed: f32,
    max_z: f32,
}

impl Laser {
    /// Create a bolt at `origin`
    pub fn new(geometry: Rc<Geometry>, origin: Vec3, settings: &GameSettings) -> Self {
        let info = MeshInfo::from_geometry(&geometry);
        let entity = Entity::new(geometry)
            .with_position(origin)
            .with_color(Vec3::new(1.0, 0.2, 0.2))
            .with_collider(Sphere::new(origin, info.radius));
        Self {
            entity,
            speed: settings.laser_speed,
            game_speed: settings.game_speed,
            max_z: settings.max_z,
        }
    }

    fn in_field(&self) -> bool {
        self.entity.position.z <= self.max_z
    }
}

impl GameObject for Laser {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }
}

impl Updatable for Laser {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.entity.position.z += self.speed * self.game_speed * ctx.dt;
        self.entity.sync_collider(Vec3::zeros());
        if !self.in_field() {
            self.entity.destroy();
        }
    }
}

impl Collidable for Laser {
    fn on_collision(&mut self, other: &dyn GameObject) {
        if other.kind() == EntityKind::Hazard {
            self.entity.destroy();
        }
    }

    fn collision_active(&self) -> bool {
        self.entity.is_alive() && self.in_field()
    }
}
