//! Entity registry
//!
//! Owns the live enemies, pickups and projectiles. Ids come from one
//! monotonic counter and are never reused within a session. Collections are
//! kept sorted by id so iteration order is stable.
//!
//! Removal never happens while a collection is being traversed: systems
//! collect their destroy decisions into a [`RemovalSet`] and the registry
//! builds the next-tick collections from the current ones in one pass.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use super::state::{Enemy, EntityId, ItemKind, Pickup, Projectile};
use crate::planar;

/// Entity categories tracked by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Enemy,
    Pickup,
    Projectile,
}

/// Destroy decisions gathered during one tick
#[derive(Debug, Clone, Default)]
pub struct RemovalSet {
    ids: BTreeSet<EntityId>,
}

impl RemovalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an entity for removal. Returns false if it was already marked.
    pub fn insert(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Live entity collections
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    enemies: Vec<Enemy>,
    pickups: Vec<Pickup>,
    projectiles: Vec<Projectile>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            pickups: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn spawn_enemy(&mut self, pos: Vec3, hp: u32) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.push(Enemy { id, pos, hp: hp.max(1) });
        id
    }

    pub fn spawn_pickup(&mut self, kind: ItemKind, pos: Vec3) -> EntityId {
        let id = self.next_entity_id();
        self.pickups.push(Pickup { id, kind, pos });
        id
    }

    /// Spawn a projectile. A degenerate direction falls back to straight
    /// down the lane.
    pub fn spawn_projectile(&mut self, pos: Vec3, dir: Vec3) -> EntityId {
        let id = self.next_entity_id();
        let dir = dir.try_normalize().unwrap_or(Vec3::NEG_Z);
        self.projectiles.push(Projectile { id, pos, dir });
        id
    }

    /// Remove a single entity by id. Returns true if something was removed.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let mut removals = RemovalSet::new();
        removals.insert(id);
        let before = self.total();
        self.apply_removals(&removals);
        self.total() != before
    }

    /// Build the next-tick collections without the removed ids
    pub fn apply_removals(&mut self, removals: &RemovalSet) {
        if removals.is_empty() {
            return;
        }
        log::trace!("Removing {} entities", removals.len());
        self.enemies = std::mem::take(&mut self.enemies)
            .into_iter()
            .filter(|e| !removals.contains(e.id))
            .collect();
        self.pickups = std::mem::take(&mut self.pickups)
            .into_iter()
            .filter(|p| !removals.contains(p.id))
            .collect();
        self.projectiles = std::mem::take(&mut self.projectiles)
            .into_iter()
            .filter(|p| !removals.contains(p.id))
            .collect();
    }

    /// Remove every entity. The id counter keeps running.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.pickups.clear();
        self.projectiles.clear();
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Mutable access for movement; ids and membership stay fixed
    pub(crate) fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub(crate) fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.enemies[i])
    }

    pub fn pickup(&self, id: EntityId) -> Option<&Pickup> {
        self.pickups
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.pickups[i])
    }

    /// Reduce an enemy's hp. Returns the hp left, or None if no such enemy.
    pub(crate) fn damage_enemy(&mut self, id: EntityId, amount: u32) -> Option<u32> {
        let idx = self.enemies.binary_search_by_key(&id, |e| e.id).ok()?;
        let enemy = &mut self.enemies[idx];
        enemy.hp = enemy.hp.saturating_sub(amount);
        Some(enemy.hp)
    }

    /// Closest enemy to a ground-plane point (ties go to the lower id)
    pub fn nearest_enemy(&self, point: Vec2) -> Option<EntityId> {
        self.enemies
            .iter()
            .map(|e| (e.id, planar(e.pos).distance_squared(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Enemy => self.enemies.len(),
            EntityKind::Pickup => self.pickups.len(),
            EntityKind::Projectile => self.projectiles.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.enemies.len() + self.pickups.len() + self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
