//! Entity registry and lifecycle
//!
//! The registry owns every live game object and keeps ordered id lists: one
//! for all objects and one per [`EntityKind`]. Other systems (the renderer's
//! live set, game bookkeeping) can hold their own [`EntityList`] and have it
//! kept in sync through the entity's destruction signal.
//!
//! Destruction is two-phase. An object marks itself destroyed at any point
//! during a pass; [`EntityRegistry::retire_destroyed`] runs at the start of
//! the next pass, fires each destroyed entity's signal (every subscribed list
//! drops the id exactly once) and frees the storage slot. Nothing is removed
//! while a list is being iterated.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use slotmap::SlotMap;

use super::entity::{EntityId, EntityKind};
use super::object::GameObject;

/// Shared, ordered collection of entity ids
///
/// Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct EntityList {
    ids: Rc<RefCell<Vec<EntityId>>>,
}

impl EntityList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id`; a no-op if already present
    pub fn add(&self, id: EntityId) -> bool {
        let mut ids = self.ids.borrow_mut();
        if ids.contains(&id) {
            return false;
        }
        ids.push(id);
        true
    }

    /// Remove `id`, keeping the order of the rest; a no-op if absent
    pub fn remove(&self, id: EntityId) -> bool {
        let mut ids = self.ids.borrow_mut();
        match ids.iter().position(|other| *other == id) {
            Some(index) => {
                ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether `id` is in the list
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.borrow().contains(&id)
    }

    /// Number of ids
    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }

    /// Copy of the ids in order
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.ids.borrow().clone()
    }

    /// Removal callback that holds the list weakly
    ///
    /// The callback does nothing once every strong handle to the list is gone.
    pub fn remover(&self) -> impl FnOnce(&EntityId) + 'static {
        let weak: Weak<RefCell<Vec<EntityId>>> = Rc::downgrade(&self.ids);
        move |id: &EntityId| {
            if let Some(ids) = weak.upgrade() {
                EntityList { ids }.remove(*id);
            }
        }
    }
}

/// Owner of every live game object
pub struct EntityRegistry {
    storage: SlotMap<EntityId, Box<dyn GameObject>>,
    active: EntityList,
    by_kind: HashMap<EntityKind, EntityList>,
    watchers: Vec<EntityList>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        let by_kind = EntityKind::ALL
            .iter()
            .map(|kind| (*kind, EntityList::new()))
            .collect();
        Self {
            storage: SlotMap::with_key(),
            active: EntityList::new(),
            by_kind,
            watchers: Vec::new(),
        }
    }

    /// Store `object` and add it to the ordered, per-kind and watching lists
    pub fn add(&mut self, object: Box<dyn GameObject>) -> EntityId {
        let kind = object.kind();
        let id = self.storage.insert(object);
        let kind_list = self.kind_list(kind);
        self.active.add(id);
        kind_list.add(id);

        if let Some(object) = self.storage.get_mut(id) {
            let entity = object.entity_mut();
            entity.on_destroyed(self.active.remover());
            entity.on_destroyed(kind_list.remover());
            for watcher in &self.watchers {
                if watcher.add(id) {
                    entity.on_destroyed(watcher.remover());
                }
            }
        }
        log::trace!("Added {:?} entity {:?}", kind, id);
        id
    }

    /// Keep `list` in sync with every entity, stored now or added later
    pub fn watch(&mut self, list: &EntityList) {
        for id in self.active.snapshot() {
            self.track(id, list);
        }
        self.watchers.push(list.clone());
    }

    /// Keep `list` in sync with the lifetime of `id`
    ///
    /// Adds the id to the list and removes it when the entity is retired.
    /// Returns false, leaving the list untouched, if `id` is unknown.
    pub fn track(&mut self, id: EntityId, list: &EntityList) -> bool {
        let Some(object) = self.storage.get_mut(id) else {
            return false;
        };
        if list.add(id) {
            object.entity_mut().on_destroyed(list.remover());
        }
        true
    }

    /// Destroy and retire `id` immediately; a no-op if absent
    ///
    /// Must not be called while iterating a list the entity belongs to.
    pub fn remove(&mut self, id: EntityId) -> Option<Box<dyn GameObject>> {
        let mut object = self.storage.remove(id)?;
        object.entity_mut().notify_destroyed(id);
        log::debug!("Removed {:?} entity {:?}", object.kind(), id);
        Some(object)
    }

    /// Retire every destroyed entity; returns how many were retired
    pub fn retire_destroyed(&mut self) -> usize {
        let doomed: Vec<EntityId> = self
            .storage
            .iter()
            .filter(|(_, object)| !object.entity().is_alive())
            .map(|(id, _)| id)
            .collect();

        for id in &doomed {
            self.remove(*id);
        }
        if !doomed.is_empty() {
            log::debug!("Retired {} destroyed entities", doomed.len());
        }
        doomed.len()
    }

    /// Ordered snapshot of every stored id
    pub fn ids(&self) -> Vec<EntityId> {
        self.active.snapshot()
    }

    /// Ordered snapshot of the ids of one kind
    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.by_kind.get(&kind).map(EntityList::snapshot).unwrap_or_default()
    }

    /// Iterate objects in insertion order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &dyn GameObject)> + '_ {
        self.ids()
            .into_iter()
            .filter_map(move |id| self.get(id).map(|object| (id, object)))
    }

    /// Look up an object
    pub fn get(&self, id: EntityId) -> Option<&dyn GameObject> {
        self.storage.get(id).map(|object| &**object)
    }

    /// Look up an object mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn GameObject> {
        match self.storage.get_mut(id) {
            Some(object) => Some(&mut **object),
            None => None,
        }
    }

    /// Borrow two distinct objects mutably at once
    ///
    /// Returns `None` if either id is unknown or both are the same.
    pub fn get_pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut dyn GameObject, &mut dyn GameObject)> {
        let [first, second] = self.storage.get_disjoint_mut([a, b])?;
        Some((&mut **first, &mut **second))
    }

    /// Whether `id` is stored
    pub fn contains(&self, id: EntityId) -> bool {
        self.storage.contains_key(id)
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn kind_list(&mut self, kind: EntityKind) -> EntityList {
        self.by_kind.entry(kind).or_default().clone()
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.storage.len())
            .field("active", &self.active.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Geometry;
    use crate::ecs::Entity;
    use std::cell::Cell;

    struct Prop {
        entity: Entity,
        kind: EntityKind,
    }

    impl GameObject for Prop {
        fn entity(&self) -> &Entity {
            &self.entity
        }

        fn entity_mut(&mut self) -> &mut Entity {
            &mut self.entity
        }

        fn kind(&self) -> EntityKind {
            self.kind
        }
    }

    fn prop(kind: EntityKind) -> Box<dyn GameObject> {
        Box::new(Prop {
            entity: Entity::new(Rc::new(Geometry::default())),
            kind,
        })
    }

    #[test]
    fn test_list_add_twice_and_remove_absent() {
        let mut registry = EntityRegistry::new();
        let id = registry.add(prop(EntityKind::Hazard));
        let list = EntityList::new();

        assert!(list.add(id));
        assert!(!list.add(id));
        assert_eq!(list.len(), 1);

        assert!(list.remove(id));
        assert!(!list.remove(id));
        assert!(list.is_empty());
    }

    #[test]
    fn test_destruction_reaches_every_list_once() {
        let mut registry = EntityRegistry::new();
        let keep = registry.add(prop(EntityKind::Hazard));
        let doomed = registry.add(prop(EntityKind::Hazard));
        let live = EntityList::new();
        registry.track(keep, &live);
        registry.track(doomed, &live);

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        registry
            .get_mut(doomed)
            .unwrap()
            .entity_mut()
            .on_destroyed(move |_| counter.set(counter.get() + 1));

        registry.get_mut(doomed).unwrap().entity_mut().destroy();
        assert!(registry.contains(doomed));
        assert!(live.contains(doomed));

        assert_eq!(registry.retire_destroyed(), 1);
        assert_eq!(registry.retire_destroyed(), 0);
        assert_eq!(calls.get(), 1);
        assert!(!registry.contains(doomed));
        assert_eq!(live.snapshot(), vec![keep]);
        assert_eq!(registry.ids(), vec![keep]);
        assert_eq!(registry.ids_of(EntityKind::Hazard), vec![keep]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut registry = EntityRegistry::new();
        let id = registry.add(prop(EntityKind::Decoration));
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
        assert!(!registry.track(id, &EntityList::new()));
    }

    #[test]
    fn test_order_and_kinds() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(prop(EntityKind::Collectible));
        let b = registry.add(prop(EntityKind::Hazard));
        let c = registry.add(prop(EntityKind::Collectible));

        assert_eq!(registry.ids(), vec![a, b, c]);
        assert_eq!(registry.ids_of(EntityKind::Collectible), vec![a, c]);
        assert!(registry.ids_of(EntityKind::Player).is_empty());
        assert_eq!(registry.entities().map(|(id, _)| id).collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn test_pair_access_rejects_same_id() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(prop(EntityKind::Player));
        let b = registry.add(prop(EntityKind::Hazard));
        assert!(registry.get_pair_mut(a, a).is_none());

        let (first, second) = registry.get_pair_mut(a, b).unwrap();
        assert_eq!(first.kind(), EntityKind::Player);
        assert_eq!(second.kind(), EntityKind::Hazard);
    }

    #[test]
    fn test_watcher_sees_every_addition() {
        let mut registry = EntityRegistry::new();
        let early = registry.add(prop(EntityKind::Terrain));
        let drawn = EntityList::new();
        registry.watch(&drawn);
        let late = registry.add(prop(EntityKind::Hazard));
        assert_eq!(drawn.snapshot(), vec![early, late]);

        registry.get_mut(late).unwrap().entity_mut().destroy();
        registry.retire_destroyed();
        assert_eq!(drawn.snapshot(), vec![early]);
    }

    #[test]
    fn test_dropped_list_is_not_kept_alive() {
        let mut registry = EntityRegistry::new();
        let id = registry.add(prop(EntityKind::Terrain));
        {
            let scratch = EntityList::new();
            registry.track(id, &scratch);
        }
        registry.get_mut(id).unwrap().entity_mut().destroy();
        assert_eq!(registry.retire_destroyed(), 1);
    }
}
