//! Capability traits for game objects
//!
//! Every object stored in the registry implements [`GameObject`]. Objects
//! opt into per-pass updates and collision callbacks by returning themselves
//! from the matching accessor; the defaults opt out.

use super::entity::{Entity, EntityKind};
use crate::foundation::math::Vec3;
use crate::input::Intent;

/// Base access every registered object provides
pub trait GameObject {
    /// Spatial and visual state
    fn entity(&self) -> &Entity;

    /// Mutable spatial and visual state
    fn entity_mut(&mut self) -> &mut Entity;

    /// Role used to pick collision pairs
    fn kind(&self) -> EntityKind;

    /// Per-pass behaviour, if any
    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// Collision callbacks, if any
    fn as_collidable(&self) -> Option<&dyn Collidable> {
        None
    }

    /// Mutable collision callbacks, if any
    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        None
    }
}

/// Objects that advance once per pass
pub trait Updatable {
    /// Advance by one fixed step
    fn update(&mut self, ctx: &mut UpdateContext<'_>);
}

/// Objects that react to overlaps
pub trait Collidable {
    /// Called once per overlapping pair per pass, with the other object
    fn on_collision(&mut self, other: &dyn GameObject);

    /// Called when the object touches the designated ground volume
    fn on_ground_collision(&mut self) {}

    /// Whether the object currently takes part in collision tests
    fn collision_active(&self) -> bool {
        true
    }
}

/// Objects created during a pass, added at the start of the next one
#[derive(Default)]
pub struct Spawner {
    pending: Vec<Box<dyn GameObject>>,
}

impl Spawner {
    /// Create an empty spawner
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an object for insertion
    pub fn spawn(&mut self, object: Box<dyn GameObject>) {
        self.pending.push(object);
    }

    /// Number of queued objects
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every queued object, in spawn order
    pub fn drain(&mut self) -> Vec<Box<dyn GameObject>> {
        std::mem::take(&mut self.pending)
    }
}

impl std::fmt::Debug for Spawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spawner").field("pending", &self.pending.len()).finish()
    }
}

/// Per-pass data handed to every update
pub struct UpdateContext<'a> {
    /// Fixed step length in seconds
    pub dt: f32,
    /// Pass number, starting at 1
    pub frame: u64,
    /// Intents held this pass
    pub intents: Intent,
    /// Player position at the start of the pass, if a player is set
    pub player_position: Option<Vec3>,
    spawner: &'a mut Spawner,
}

impl<'a> UpdateContext<'a> {
    /// Create a context over `spawner`
    pub fn new(dt: f32, frame: u64, intents: Intent, spawner: &'a mut Spawner) -> Self {
        Self {
            dt,
            frame,
            intents,
            player_position: None,
            spawner,
        }
    }

    /// Set the player position (builder pattern)
    pub fn with_player_position(mut self, position: Option<Vec3>) -> Self {
        self.player_position = position;
        self
    }

    /// Queue an object for insertion at the start of the next pass
    pub fn spawn(&mut self, object: Box<dyn GameObject>) {
        self.spawner.spawn(object);
    }
}
