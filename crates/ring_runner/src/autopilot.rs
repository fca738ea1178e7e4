//! Scripted pilot for windowless runs
//!
//! Produces the same intents a player would hold on the keyboard: steer
//! toward the nearest ring ahead and fire at asteroids lined up in front.

use flight_engine::ecs::{EntityId, EntityKind, EntityRegistry, GameObject};
use flight_engine::input::Intent;
use nalgebra::Vector2;

/// Steering and firing thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    /// Offset from the target below which the pilot stops steering
    pub deadzone: f32,
    /// Depth ahead of the player in which asteroids are shot at
    pub fire_range: f32,
    /// Offset from the player's line of flight that still counts as lined up
    pub aim_radius: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            deadzone: 1.0,
            fire_range: 150.0,
            aim_radius: 6.0,
        }
    }
}

impl Autopilot {
    /// Intents to hold for the next pass
    pub fn intents(&self, registry: &EntityRegistry, player: EntityId) -> Intent {
        let Some(player) = registry.get(player) else {
            return Intent::empty();
        };
        let position = player.entity().position;
        let mut intents = Intent::empty();

        let next_ring = ahead_of(registry, EntityKind::Collectible, position.z)
            .min_by(|a, b| a.entity().position.z.total_cmp(&b.entity().position.z));
        if let Some(ring) = next_ring {
            let target = ring.entity().position;
            let offset = Vector2::new(target.x - position.x, target.y - position.y);
            intents |= steer(offset.x, self.deadzone, Intent::LEFT, Intent::RIGHT);
            intents |= steer(offset.y, self.deadzone, Intent::UP, Intent::DOWN);
        }

        let lined_up = ahead_of(registry, EntityKind::Hazard, position.z).any(|rock| {
            let p = rock.entity().position;
            let offset = Vector2::new(p.x - position.x, p.y - position.y);
            p.z - position.z <= self.fire_range && offset.norm() <= self.aim_radius
        });
        if lined_up {
            intents |= Intent::FIRE;
        }
        intents
    }
}

/// Live objects of `kind` at or beyond depth `z`
fn ahead_of(registry: &EntityRegistry, kind: EntityKind, z: f32) -> impl Iterator<Item = &dyn GameObject> + '_ {
    registry
        .ids_of(kind)
        .into_iter()
        .filter_map(move |id| registry.get(id))
        .filter(move |object| object.entity().is_alive() && object.entity().position.z >= z)
}

/// `positive` moves toward larger values, `negative` toward smaller
fn steer(offset: f32, deadzone: f32, positive: Intent, negative: Intent) -> Intent {
    if offset > deadzone {
        positive
    } else if offset < -deadzone {
        negative
    } else {
        Intent::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_engine::assets::Geometry;
    use flight_engine::ecs::Entity;
    use flight_engine::foundation::math::Vec3;
    use std::rc::Rc;

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

    fn add(registry: &mut EntityRegistry, kind: EntityKind, position: Vec3) -> EntityId {
        let entity = Entity::new(Rc::new(Geometry::default())).with_position(position);
        registry.add(Box::new(Marker(entity, kind)))
    }

    #[test]
    fn test_steers_to_nearest_ring_ahead() {
        let mut registry = EntityRegistry::new();
        let player = add(&mut registry, EntityKind::Player, Vec3::zeros());
        add(&mut registry, EntityKind::Collectible, Vec3::new(-50.0, 50.0, -5.0));
        add(&mut registry, EntityKind::Collectible, Vec3::new(10.0, -10.0, 40.0));
        add(&mut registry, EntityKind::Collectible, Vec3::new(-10.0, 10.0, 80.0));

        let intents = Autopilot::default().intents(&registry, player);
        assert_eq!(intents, Intent::LEFT | Intent::DOWN);
    }

    #[test]
    fn test_fires_at_lined_up_asteroid() {
        let mut registry = EntityRegistry::new();
        let player = add(&mut registry, EntityKind::Player, Vec3::zeros());
        add(&mut registry, EntityKind::Hazard, Vec3::new(3.0, 0.0, 120.0));
        assert!(Autopilot::default().intents(&registry, player).contains(Intent::FIRE));

        let mut registry = EntityRegistry::new();
        let player = add(&mut registry, EntityKind::Player, Vec3::zeros());
        add(&mut registry, EntityKind::Hazard, Vec3::new(30.0, 0.0, 120.0));
        add(&mut registry, EntityKind::Hazard, Vec3::new(0.0, 0.0, 400.0));
        assert_eq!(Autopilot::default().intents(&registry, player), Intent::empty());
    }

    #[test]
    fn test_missing_player_holds_nothing() {
        let mut registry = EntityRegistry::new();
        let player = add(&mut registry, EntityKind::Player, Vec3::zeros());
        registry.remove(player);
        assert_eq!(Autopilot::default().intents(&registry, player), Intent::empty());
    }
}
