//! Per-pass collision detection
//!
//! Runs once per pass after every object has updated and before anything is
//! drawn. There is no broad phase: every relevant pair is tested, in
//! registry order, every pass:
//!
//! 1. the player against each hazard
//! 2. the player against each collectible
//! 3. each active projectile against each hazard
//! 4. the player against the single ground volume
//!
//! When a pair overlaps, the first object's hook runs, then the second's,
//! each receiving the other. Hooks may mark objects destroyed; removal waits
//! for the next pass, so a destroyed object can still be hit later in the
//! same pass unless it reports itself inactive.

use crate::ecs::{EntityId, EntityKind, EntityRegistry, GameObject};

use super::collision::Collider;

/// Pair of objects whose hooks ran this pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    /// Object whose hook ran first
    pub first: EntityId,
    /// Object whose hook ran second
    pub second: EntityId,
}

/// What one detection pass found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Player-hazard overlaps
    pub hazard_hits: usize,
    /// Player-collectible overlaps
    pub collectible_hits: usize,
    /// Projectile-hazard overlaps
    pub projectile_hits: usize,
    /// Player-ground overlaps
    pub ground_hits: usize,
    /// Every dispatched pair, in dispatch order
    pub pairs: Vec<CollisionPair>,
}

impl CollisionReport {
    /// Total overlaps of any class
    pub fn total(&self) -> usize {
        self.hazard_hits + self.collectible_hits + self.projectile_hits + self.ground_hits
    }
}

/// Exhaustive pairwise collision detection
#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    ground: Option<Collider>,
}

impl CollisionSystem {
    /// Create a system with no ground volume
    pub fn new() -> Self {
        Self::default()
    }

    /// Designate the ground volume the player is tested against
    pub fn set_ground(&mut self, ground: Option<Collider>) {
        self.ground = ground;
    }

    /// Current ground volume
    pub fn ground(&self) -> Option<&Collider> {
        self.ground.as_ref()
    }

    /// Test every relevant pair once and run the hooks of those that overlap
    pub fn detect(&self, registry: &mut EntityRegistry, player: Option<EntityId>) -> CollisionReport {
        let mut report = CollisionReport::default();
        let hazards = registry.ids_of(EntityKind::Hazard);

        if let Some(player) = player {
            for &hazard in &hazards {
                if Self::test_pair(registry, player, hazard, &mut report) {
                    report.hazard_hits += 1;
                }
            }
            for collectible in registry.ids_of(EntityKind::Collectible) {
                if Self::test_pair(registry, player, collectible, &mut report) {
                    report.collectible_hits += 1;
                }
            }
        }

        for projectile in registry.ids_of(EntityKind::Projectile) {
            for &hazard in &hazards {
                if Self::test_pair(registry, projectile, hazard, &mut report) {
                    report.projectile_hits += 1;
                }
            }
        }

        if let (Some(player), Some(ground)) = (player, self.ground.as_ref()) {
            if Self::test_ground(registry, player, ground) {
                report.ground_hits += 1;
            }
        }

        if report.total() > 0 {
            log::debug!(
                "Collisions: {} hazard, {} collectible, {} projectile, {} ground",
                report.hazard_hits,
                report.collectible_hits,
                report.projectile_hits,
                report.ground_hits
            );
        }
        report
    }

    fn test_pair(registry: &mut EntityRegistry, a: EntityId, b: EntityId, report: &mut CollisionReport) -> bool {
        let Some((first, second)) = registry.get_pair_mut(a, b) else {
            return false;
        };
        if !participates(&*first) || !participates(&*second) {
            return false;
        }
        let (Some(first_collider), Some(second_collider)) = (first.entity().collider, second.entity().collider) else {
            return false;
        };
        if !first_collider.intersects(&second_collider) {
            return false;
        }

        log::trace!("{:?} {:?} hit {:?} {:?}", first.kind(), a, second.kind(), b);
        if let Some(hooks) = first.as_collidable_mut() {
            hooks.on_collision(&*second);
        }
        if let Some(hooks) = second.as_collidable_mut() {
            hooks.on_collision(&*first);
        }
        report.pairs.push(CollisionPair { first: a, second: b });
        true
    }

    fn test_ground(registry: &mut EntityRegistry, player: EntityId, ground: &Collider) -> bool {
        let Some(object) = registry.get_mut(player) else {
            return false;
        };
        if !participates(&*object) {
            return false;
        }
        let touching = object
            .entity()
            .collider
            .is_some_and(|collider| collider.intersects(ground));
        if touching {
            if let Some(hooks) = object.as_collidable_mut() {
                hooks.on_ground_collision();
            }
        }
        touching
    }
}

fn participates(object: &dyn GameObject) -> bool {
    object.as_collidable().map_or(true, |hooks| hooks.collision_active())
}
