//! Entity pool
//!
//! Dense storage with a liveness flag. Dead entities are only removed at the end of
//! `update`, never in the middle of a pass. Entities that need to create others (enemies
//! firing) hold a [`Spawner`]: a non-owning handle into the manager's spawn queue.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::entity::{Enemy, Entity, EntityKind, UpdateContext};

type SpawnQueue = RefCell<Vec<Entity>>;

/// Non-owning capability to request insertion into an [`EntityManager`]
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    queue: Weak<SpawnQueue>,
}

impl Spawner {
    /// Handle not attached to any manager; spawns are dropped
    pub fn detached() -> Self {
        Self::default()
    }

    /// Queue an entity for insertion. Returns false if the manager is gone.
    pub fn spawn(&self, entity: Entity) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push(entity);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug)]
pub struct EntityManager {
    entities: Vec<Entity>,
    pending: Rc<SpawnQueue>,
    next_id: u32,
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            pending: Rc::new(RefCell::new(Vec::new())),
            next_id: 1,
        }
    }

    /// Handle for entities that spawn others
    pub fn spawner(&self) -> Spawner {
        Spawner {
            queue: Rc::downgrade(&self.pending),
        }
    }

    /// Append an entity; returns its id
    pub fn add(&mut self, mut entity: Entity) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// Update every live entity in insertion order, purge the dead, then take in
    /// whatever was spawned during the pass
    pub fn update(&mut self, ctx: &mut UpdateContext) {
        for entity in self.entities.iter_mut().filter(|e| e.active) {
            entity.update(ctx);
        }
        self.entities.retain(|e| e.active);
        self.absorb_spawned();
    }

    fn absorb_spawned(&mut self) {
        let spawned = std::mem::take(&mut *self.pending.borrow_mut());
        for entity in spawned.into_iter().filter(|e| e.active) {
            self.add(entity);
        }
    }

    /// Drop everything, including queued spawns
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Stored entities in insertion order (may include entities killed this tick)
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Live entities only
    pub fn live(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.active)
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Live enemies with their enemy state
    pub fn enemies(&self) -> impl Iterator<Item = (&Entity, &Enemy)> {
        self.live().filter_map(|e| e.as_enemy().map(|enemy| (e, enemy)))
    }

    /// The live boss, if any
    pub fn boss(&self) -> Option<(&Entity, &Enemy)> {
        self.enemies().find(|(_, enemy)| enemy.is_boss())
    }

    pub fn has_active_boss(&self) -> bool {
        self.boss().is_some()
    }

    /// Live entities matching a kind predicate
    pub fn count_where(&self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        self.live().filter(|e| pred(&e.kind)).count()
    }

    /// Raw access for the collision pass
    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }
}
