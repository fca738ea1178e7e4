//! Entities, game-object capabilities and the registry that owns them

pub mod entity;
pub mod object;
pub mod registry;

pub use entity::{Entity, EntityId, EntityKind, Scale};
pub use object::{Collidable, GameObject, Spawner, Updatable, UpdateContext};
pub use registry::{EntityList, EntityRegistry};
