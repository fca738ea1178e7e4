//! Asteroid hazards

use super::{sample, MeshInfo};
use crate::config::GameSettings;
use flight_engine::assets::Geometry;
use flight_engine::ecs::{Collidable, Entity, EntityKind, GameObject, Updatable, UpdateContext};
use flight_engine::foundation::math::Vec3;
use flight_engine::physics::Sphere;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

/// Share of the approach speed spent steering toward the player
const DRIFT_FRACTION: f32 = 0.1;
/// How far behind the player an asteroid travels before it is recycled
const PASS_MARGIN: f32 = 20.0;

/// Rock flying at the player
///
/// Asteroids that slip past the player are recycled to the far end of the
/// field with fresh random parameters. Lasers chip away their health; ramming
/// the player destroys them outright.
pub struct Asteroid {
    entity: Entity,
    settings: Rc<GameSettings>,
    rng: StdRng,
    mesh_radius: f32,
    speed: f32,
    spin: Vec3,
    health: u32,
}

impl Asteroid {
    /// Create an asteroid somewhere in the far half of the field
    pub fn new(geometry: Rc<Geometry>, settings: Rc<GameSettings>, seed: u64) -> Self {
        let info = MeshInfo::from_geometry(&geometry);
        let mut asteroid = Self {
            entity: Entity::new(geometry)
                .with_color(Vec3::new(0.55, 0.5, 0.45))
                .with_collider(Sphere::new(Vec3::zeros(), info.radius)),
            rng: StdRng::seed_from_u64(seed),
            mesh_radius: info.radius,
            speed: 0.0,
            spin: Vec3::zeros(),
            health: settings.asteroid_health,
            settings,
        };
        let max_z = asteroid.settings.max_z;
        asteroid.respawn([max_z * 0.5, max_z]);
        asteroid
    }

    /// Hits left before a laser destroys it
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Current approach speed
    pub fn speed(&self) -> f32 {
        self.speed
    }

    fn respawn(&mut self, depth: [f32; 2]) {
        let settings = Rc::clone(&self.settings);
        let rng = &mut self.rng;
        let position = Vec3::new(
            rng.gen_range(-settings.max_half_x..=settings.max_half_x),
            rng.gen_range(-settings.max_half_y..=settings.max_half_y),
            sample(rng, depth),
        );
        let spin_range = settings.asteroid_rotation_speed_range;
        self.spin = Vec3::new(sample(rng, spin_range), sample(rng, spin_range), sample(rng, spin_range));
        self.speed = sample(rng, settings.asteroid_speed_range);
        let scale = sample(rng, settings.asteroid_scale_range);

        self.health = settings.asteroid_health;
        self.entity.position = position;
        self.entity.scale = scale.into();
        self.entity.collider = Some(Sphere::new(position, self.mesh_radius * scale).into());
    }

    fn drift_toward(&mut self, target: Vec3, distance: f32) {
        let position = &mut self.entity.position;
        for axis in 0..2 {
            let gap = target[axis] - position[axis];
            position[axis] += gap.clamp(-distance, distance);
        }
    }
}

impl GameObject for Asteroid {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hazard
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

impl Updatable for Asteroid {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let step = ctx.dt * self.settings.game_speed;
        let travel = self.speed * step;
        let player = ctx.player_position.unwrap_or_else(Vec3::zeros);

        self.entity.position.z -= travel;
        self.drift_toward(player, travel * DRIFT_FRACTION);
        self.entity.orientation = (self.entity.orientation + self.spin * step).map(|deg| deg % 360.0);
        self.entity.sync_collider(Vec3::zeros());

        if self.entity.position.z < player.z - PASS_MARGIN {
            let max_z = self.settings.max_z;
            self.respawn([max_z * 0.9, max_z]);
            log::trace!("Asteroid recycled to z={:.1}", self.entity.position.z);
        }
    }
}

impl Collidable for Asteroid {
    fn on_collision(&mut self, other: &dyn GameObject) {
        match other.kind() {
            EntityKind::Player => self.entity.destroy(),
            EntityKind::Projectile => {
                self.health = self.health.saturating_sub(1);
                if self.health == 0 {
                    log::debug!("Asteroid shot down at {:?}", self.entity.position);
                    self.entity.destroy();
                }
            }
            _ => {}
        }
    }

    /// A rock destroyed earlier in the pass stops taking hits for the rest of it
    fn collision_active(&self) -> bool {
        self.entity.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_engine::ecs::Spawner;
    use flight_engine::input::Intent;

    struct Marker(Entity, EntityKind);

    impl GameObject for Marker {
        fn entity(&self) -> &Entity {
            &self.0
        }

        fn entity_mut(&mut self) -> &mut Entity {
            &mut self.0
        }

        fn kind(&self) -> EntityKind {
            self.1
        }
    }

    fn asteroid() -> Asteroid {
        Asteroid::new(Rc::new(Geometry::default()), Rc::new(GameSettings::default()), 3)
    }

    #[test]
    fn test_spawns_inside_field() {
        let settings = GameSettings::default();
        for seed in 0..20 {
            let rock = Asteroid::new(Rc::new(Geometry::default()), Rc::new(settings.clone()), seed);
            let p = rock.entity().position;
            assert!(p.x.abs() <= settings.max_half_x && p.y.abs() <= settings.max_half_y);
            assert!((settings.max_z * 0.5..=settings.max_z).contains(&p.z));
            assert!((20.0..=40.0).contains(&rock.speed()));
        }
    }

    #[test]
    fn test_approaches_and_recycles_behind_player() {
        let mut rock = asteroid();
        let start_z = rock.entity().position.z;
        let mut spawner = Spawner::new();
        let mut ctx = UpdateContext::new(1.0, 1, Intent::empty(), &mut spawner).with_player_position(Some(Vec3::zeros()));
        rock.update(&mut ctx);
        assert!(rock.entity().position.z < start_z);

        rock.entity_mut().position.z = -19.0;
        rock.update(&mut ctx);
        assert!(rock.entity().position.z >= 450.0);
        assert!(rock.entity().is_alive());
    }

    #[test]
    fn test_laser_hits_wear_it_down() {
        let mut rock = asteroid();
        let laser = Marker(Entity::new(Rc::new(Geometry::default())), EntityKind::Projectile);
        rock.on_collision(&laser);
        assert_eq!(rock.health(), 1);
        assert!(rock.collision_active());
        rock.on_collision(&laser);
        assert!(!rock.entity().is_alive());
        assert!(!rock.collision_active());
    }

    #[test]
    fn test_ramming_destroys_it() {
        let mut rock = asteroid();
        rock.on_collision(&Marker(Entity::new(Rc::new(Geometry::default())), EntityKind::Player));
        assert!(!rock.entity().is_alive());
    }
}
