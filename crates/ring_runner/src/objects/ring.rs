//! Collectible rings

use super::sample;
use crate::assets::RING_TUBE_RADIUS;
use crate::config::GameSettings;
use flight_engine::assets::Geometry;
use flight_engine::ecs::{Collidable, Entity, EntityKind, GameObject, Updatable, UpdateContext};
use flight_engine::foundation::math::Vec3;
use flight_engine::physics::{Axis, Circle};
use rand::Rng;
use std::rc::Rc;

/// How far behind the player a ring may drift before it is dropped
const PASS_MARGIN: f32 = 10.0;

/// Ring approaching the player; flying through it collects it
pub struct Ring {
    entity: Entity,
    speed: f32,
    game_speed: f32,
}

impl Ring {
    /// Create a ring centred at `center`, facing along Z
    pub fn new(geometry: Rc<Geometry>, center: Vec3, scale: f32, speed: f32, game_speed: f32) -> Self {
        let collider = Circle::new(center, scale, Axis::Z).with_depth_tolerance(RING_TUBE_RADIUS * scale);
        Self {
            entity: Entity::new(geometry)
                .with_position(center)
                .with_scale(scale)
                .with_color(Vec3::new(1.0, 0.85, 0.1))
                .with_collider(collider),
            speed,
            game_speed,
        }
    }
}

/// Centres of `count` rings spaced `spacing` apart along +Z around `center`
pub fn course_positions(center: Vec3, count: usize, spacing: f32) -> Vec<Vec3> {
    let half = count as f32 / 2.0;
    (0..count)
        .map(|i| center + Vec3::z() * ((i as f32 - half) * spacing))
        .collect()
}

/// Build one course of rings from the settings
pub fn ring_course<R: Rng + ?Sized>(geometry: &Rc<Geometry>, settings: &GameSettings, rng: &mut R) -> Vec<Ring> {
    course_positions(
        Vec3::from(settings.ring_course_center),
        settings.number_of_rings,
        settings.ring_spacing,
    )
    .into_iter()
    .map(|center| {
        let scale = sample(rng, settings.ring_scale_range);
        let speed = sample(rng, settings.ring_speed_range);
        Ring::new(Rc::clone(geometry), center, scale, speed, settings.game_speed)
    })
    .collect()
}

impl GameObject for Ring {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Collectible
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

impl Updatable for Ring {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.entity.position.z -= self.speed * self.game_speed * ctx.dt;
        self.entity.sync_collider(Vec3::zeros());

        let player_z = ctx.player_position.map_or(0.0, |p| p.z);
        if self.entity.position.z < player_z - PASS_MARGIN {
            self.entity.destroy();
        }
    }
}

impl Collidable for Ring {
    fn on_collision(&mut self, other: &dyn GameObject) {
        if other.kind() == EntityKind::Player {
            log::debug!("Ring collected at {:?}", self.entity.position);
            self.entity.destroy();
        }
    }

    /// A collected ring cannot be collected again later in the same pass
    fn collision_active(&self) -> bool {
        self.entity.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use flight_engine::ecs::Spawner;
    use flight_engine::input::Intent;
    use flight_engine::physics::{Collider, Sphere};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_course_is_centred_on_center() {
        let positions = course_positions(Vec3::new(0.0, 1.0, 4.0), 100, 40.0);
        assert_eq!(positions.len(), 100);
        assert_relative_eq!(positions[0], Vec3::new(0.0, 1.0, 4.0 - 2000.0));
        assert_relative_eq!(positions[50], Vec3::new(0.0, 1.0, 4.0));
        assert_relative_eq!(positions[99].z - positions[98].z, 40.0);
    }

    #[test]
    fn test_ring_course_uses_settings() {
        let settings = GameSettings::default();
        let mut rng = StdRng::seed_from_u64(7);
        let rings = ring_course(&Rc::new(Geometry::default()), &settings, &mut rng);
        assert_eq!(rings.len(), settings.number_of_rings);
        assert!(rings.iter().all(|ring| ring.entity().position.z > 0.0));
    }

    #[test]
    fn test_flying_through_the_middle_hits() {
        let ring = Ring::new(Rc::new(Geometry::default()), Vec3::new(0.0, 1.0, 4.0), 12.0, 20.0, 1.0);
        let collider = ring.entity().collider.unwrap();
        assert!(Collider::from(Sphere::new(Vec3::new(3.0, 1.0, 4.5), 1.0)).intersects(&collider));
        assert!(!Collider::from(Sphere::new(Vec3::new(0.0, 1.0, 10.0), 1.0)).intersects(&collider));
        assert!(!Collider::from(Sphere::new(Vec3::new(20.0, 1.0, 4.0), 1.0)).intersects(&collider));
    }

    struct Pilot(Entity);

    impl GameObject for Pilot {
        fn entity(&self) -> &Entity {
            &self.0
        }

        fn entity_mut(&mut self) -> &mut Entity {
            &mut self.0
        }

        fn kind(&self) -> EntityKind {
            EntityKind::Player
        }
    }

    #[test]
    fn test_collected_ring_leaves_collisions() {
        let mut ring = Ring::new(Rc::new(Geometry::default()), Vec3::zeros(), 12.0, 20.0, 1.0);
        assert!(ring.collision_active());
        ring.on_collision(&Pilot(Entity::new(Rc::new(Geometry::default()))));
        assert!(!ring.entity().is_alive());
        assert!(!ring.collision_active());
    }

    #[test]
    fn test_ring_dropped_once_behind_player() {
        let mut ring = Ring::new(Rc::new(Geometry::default()), Vec3::new(0.0, 0.0, -8.0), 12.0, 20.0, 1.0);
        let mut spawner = Spawner::new();
        let mut ctx = UpdateContext::new(0.1, 1, Intent::empty(), &mut spawner).with_player_position(Some(Vec3::zeros()));
        ring.update(&mut ctx);
        assert!(ring.entity().is_alive());
        ring.update(&mut ctx);
        assert!(!ring.entity().is_alive());
    }
}
