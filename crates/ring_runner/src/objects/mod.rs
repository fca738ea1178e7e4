//! Game objects
//!
//! Each object owns its [`Entity`](flight_engine::ecs::Entity) and opts into
//! updates and collision hooks through the engine's capability traits.

mod asteroid;
mod cockpit;
mod cube;
mod laser;
mod ring;
mod terrain;

pub use asteroid::Asteroid;
pub use cockpit::Cockpit;
pub use cube::Cube;
pub use laser::Laser;
pub use ring::{ring_course, Ring};
pub use terrain::{ground_collider, TerrainTile};

use flight_engine::assets::Geometry;
use flight_engine::foundation::math::Vec3;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

/// Health and score of the player
///
/// Shared between the cockpit and whoever displays it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    /// Health in percent, between 0 and 100
    pub health: f32,
    /// Accumulated points, never negative
    pub points: f32,
    /// Lasers left in the magazine
    pub lasers: u32,
    /// Magazine size
    pub max_lasers: u32,
    /// Rings flown through
    pub rings_collected: u32,
    /// Asteroids rammed
    pub asteroid_hits: u32,
}

/// Stats handle shared with the display
pub type SharedStats = Rc<RefCell<PlayerStats>>;

impl PlayerStats {
    /// Full health, no points and a full magazine
    pub fn new(max_lasers: u32) -> Self {
        Self {
            health: 100.0,
            points: 0.0,
            lasers: max_lasers,
            max_lasers,
            rings_collected: 0,
            asteroid_hits: 0,
        }
    }

    /// Wrap in a shared handle
    pub fn shared(max_lasers: u32) -> SharedStats {
        Rc::new(RefCell::new(Self::new(max_lasers)))
    }

    /// Add `points` and `health`, keeping both in range
    pub fn adjust(&mut self, health: f32, points: f32) {
        self.health = (self.health + health).clamp(0.0, 100.0);
        self.points = (self.points + points).max(0.0);
    }

    /// Whether health ran out
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Whole points, as shown
    pub fn score(&self) -> u64 {
        self.points as u64
    }

    /// Eight-digit zero-padded score
    pub fn score_display(&self) -> String {
        format!("{:08}", self.score())
    }
}

/// Collider placement derived from a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInfo {
    /// Mean vertex position
    pub center_of_gravity: Vec3,
    /// Farthest vertex from the centre of gravity
    pub radius: f32,
}

impl MeshInfo {
    /// Measure `geometry`
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let center_of_gravity = geometry.center_of_gravity();
        Self {
            radius: geometry.bounding_radius(&center_of_gravity),
            center_of_gravity,
        }
    }
}

/// Uniform sample from an inclusive `[low, high]` range; a collapsed range yields `low`
pub fn sample<R: Rng + ?Sized>(rng: &mut R, [low, high]: [f32; 2]) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
