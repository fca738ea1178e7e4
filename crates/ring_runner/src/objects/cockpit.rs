//! Player cockpit

use super::{Laser, MeshInfo, SharedStats};
use crate::config::GameSettings;
use flight_engine::assets::Geometry;
use flight_engine::ecs::{Collidable, Entity, EntityKind, GameObject, Updatable, UpdateContext};
use flight_engine::foundation::math::Vec3;
use flight_engine::foundation::time::Countdown;
use flight_engine::input::Intent;
use flight_engine::physics::Sphere;
use std::rc::Rc;

/// How far ahead of the mesh centre the collider sits
const COLLIDER_LEAD: f32 = 2.0;
const SCALE: f32 = 2.0;

/// The player: steers inside the flight box, shoots, and keeps score
pub struct Cockpit {
    entity: Entity,
    settings: Rc<GameSettings>,
    stats: SharedStats,
    laser_geometry: Rc<Geometry>,
    collider_offset: Vec3,
    can_shoot: bool,
    cooldown: Countdown,
    reload: Countdown,
}

impl Cockpit {
    /// Create the cockpit at the origin, facing +Z
    pub fn new(
        geometry: Rc<Geometry>,
        laser_geometry: Rc<Geometry>,
        settings: Rc<GameSettings>,
        stats: SharedStats,
    ) -> Self {
        let info = MeshInfo::from_geometry(&geometry);
        let collider_offset = info.center_of_gravity * SCALE + Vec3::new(0.0, 0.0, COLLIDER_LEAD);
        let entity = Entity::new(geometry)
            .with_scale(SCALE)
            .with_orientation(Vec3::new(0.0, 180.0, 0.0))
            .with_color(Vec3::repeat(0.5))
            .with_collider(Sphere::new(collider_offset, info.radius * SCALE));

        Self {
            cooldown: Countdown::new(settings.laser_cooldown_seconds),
            reload: Countdown::new(settings.laser_reload_seconds),
            can_shoot: true,
            entity,
            settings,
            stats,
            laser_geometry,
            collider_offset,
        }
    }

    /// Shared stats handle
    pub fn stats(&self) -> &SharedStats {
        &self.stats
    }

    /// Whether the cooldown has elapsed
    pub fn can_shoot(&self) -> bool {
        self.can_shoot
    }

    fn advance_timers(&mut self, dt: f32) {
        if self.cooldown.tick(dt) {
            self.can_shoot = true;
        }
        if self.reload.tick(dt) {
            let mut stats = self.stats.borrow_mut();
            stats.lasers = (stats.lasers + 1).min(stats.max_lasers);
            if stats.lasers < stats.max_lasers {
                self.reload.start();
            }
        }
    }

    fn steer(&mut self, intents: Intent, step: f32) {
        let speed = self.settings.cockpit_speed * step;
        let position = &mut self.entity.position;
        position.x = (position.x + intents.horizontal() * speed).clamp(-self.settings.max_half_x, self.settings.max_half_x);
        position.y = (position.y + intents.vertical() * speed).clamp(-self.settings.max_half_y, self.settings.max_half_y);
        self.entity.sync_collider(self.collider_offset);
    }

    /// Fire one laser if the cooldown allows and the magazine is not empty
    ///
    /// The first shot from a full magazine starts the reload chain.
    fn shoot(&mut self, ctx: &mut UpdateContext<'_>) -> bool {
        let mut stats = self.stats.borrow_mut();
        if !self.can_shoot || stats.lasers == 0 {
            return false;
        }
        if stats.lasers == stats.max_lasers {
            self.reload.start();
        }
        stats.lasers -= 1;
        self.can_shoot = false;
        self.cooldown.start();

        let muzzle = self.entity.position + self.collider_offset;
        ctx.spawn(Box::new(Laser::new(Rc::clone(&self.laser_geometry), muzzle, &self.settings)));
        log::debug!("Laser fired, {} left", stats.lasers);
        true
    }
}

impl GameObject for Cockpit {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
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

impl Updatable for Cockpit {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let step = ctx.dt * self.settings.game_speed;
        self.advance_timers(ctx.dt);
        self.steer(ctx.intents, step);

        self.stats
            .borrow_mut()
            .adjust(-self.settings.damage_per_second * step, self.settings.points_per_second * step);

        if ctx.intents.contains(Intent::FIRE) {
            self.shoot(ctx);
        }
    }
}

impl Collidable for Cockpit {
    fn on_collision(&mut self, other: &dyn GameObject) {
        let mut stats = self.stats.borrow_mut();
        match other.kind() {
            EntityKind::Collectible => {
                log::debug!("Cockpit: ring hit");
                stats.adjust(self.settings.ring_restore_health, self.settings.ring_points);
                stats.rings_collected += 1;
            }
            EntityKind::Hazard => {
                log::debug!("Cockpit: asteroid hit");
                stats.adjust(-self.settings.asteroid_damage, -self.settings.asteroid_points);
                stats.asteroid_hits += 1;
            }
            _ => {}
        }
    }

    fn on_ground_collision(&mut self) {
        log::debug!("Cockpit: ground hit");
        self.stats
            .borrow_mut()
            .adjust(-self.settings.terrain_damage, -self.settings.terrain_points);
    }
}
