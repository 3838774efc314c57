//! Collision detection and resolution
//!
//! Runs once per frame after movement, in a fixed order:
//! 1. projectile vs enemy
//! 2. player vs enemy (contact damage)
//! 3. player vs pickup
//!
//! All overlap tests compare squared ground-plane distance against the
//! squared radius; the vertical axis is ignored.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use super::registry::{EntityRegistry, RemovalSet};
use super::state::{EntityId, ItemKind};
use crate::planar;
use crate::tuning::Tuning;

/// True if two ground-plane points are strictly closer than `radius`
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// A projectile striking an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub projectile: EntityId,
    pub enemy: EntityId,
    /// Enemy position at impact
    pub pos: Vec3,
    /// Whether the hit destroyed the enemy
    pub destroyed: bool,
}

/// A pickup touched by the player
#[derive(Debug, Clone, PartialEq)]
pub struct Consumed {
    pub pickup: EntityId,
    pub kind: ItemKind,
    pub pos: Vec3,
}

/// Everything collision resolution decided this tick
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub hits: Vec<Hit>,
    /// Number of enemies touching the player
    pub contacts: u32,
    /// Total contact damage to apply to the player
    pub contact_damage: f32,
    pub consumed: Vec<Consumed>,
    /// Projectiles dropped for flying out of range
    pub expired_projectiles: u32,
}

impl CollisionReport {
    /// Enemies destroyed by projectiles this tick
    pub fn kills(&self) -> usize {
        self.hits.iter().filter(|h| h.destroyed).count()
    }
}

/// Resolve all overlaps for one tick and apply the resulting removals
pub fn run(
    registry: &mut EntityRegistry,
    player_pos: Vec3,
    dt: f32,
    tuning: &Tuning,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let mut removals = RemovalSet::new();
    let player = planar(player_pos);

    resolve_projectiles(registry, player, tuning, &mut removals, &mut report);
    resolve_contacts(registry, player, dt, tuning, &removals, &mut report);
    resolve_pickups(registry, player, tuning, &mut removals, &mut report);

    for hit in &report.hits {
        if let Some(hp) = registry.damage_enemy(hit.enemy, 1) {
            debug_assert_eq!(hp == 0, hit.destroyed);
        }
    }
    registry.apply_removals(&removals);

    if !report.hits.is_empty() || report.contacts > 0 || !report.consumed.is_empty() {
        log::trace!(
            "{} hits ({} kills), {} contacts, {} pickups",
            report.hits.len(),
            report.kills(),
            report.contacts,
            report.consumed.len()
        );
    }
    report
}

/// Each projectile resolves against at most one enemy: the lowest id in
/// range among enemies still alive in this pass.
fn resolve_projectiles(
    registry: &EntityRegistry,
    player: Vec2,
    tuning: &Tuning,
    removals: &mut RemovalSet,
    report: &mut CollisionReport,
) {
    // Hits already pending against each enemy this tick
    let mut pending: BTreeMap<EntityId, u32> = BTreeMap::new();

    for shot in registry.projectiles() {
        let shot_pos = shot.planar();

        // Enemies are sorted by id, so the first match is the smallest id
        let target = registry.enemies().iter().find(|e| {
            let taken = pending.get(&e.id).copied().unwrap_or(0);
            e.hp > taken && within_radius(planar(e.pos), shot_pos, tuning.projectile_hit_radius)
        });

        if let Some(enemy) = target {
            let taken = pending.entry(enemy.id).or_insert(0);
            *taken += 1;
            let destroyed = *taken >= enemy.hp;
            if destroyed {
                removals.insert(enemy.id);
            }
            removals.insert(shot.id);
            report.hits.push(Hit {
                projectile: shot.id,
                enemy: enemy.id,
                pos: enemy.pos,
                destroyed,
            });
        } else if (shot_pos.y - player.y).abs() >= tuning.projectile_max_distance {
            removals.insert(shot.id);
            report.expired_projectiles += 1;
        }
    }
}

/// Every touching enemy deals its own damage; contact does not hurt enemies
fn resolve_contacts(
    registry: &EntityRegistry,
    player: Vec2,
    dt: f32,
    tuning: &Tuning,
    removals: &RemovalSet,
    report: &mut CollisionReport,
) {
    for enemy in registry.enemies() {
        if removals.contains(enemy.id) {
            continue;
        }
        if within_radius(planar(enemy.pos), player, tuning.contact_radius) {
            report.contacts += 1;
            report.contact_damage += tuning.contact_dps * dt;
        }
    }
}

fn resolve_pickups(
    registry: &EntityRegistry,
    player: Vec2,
    tuning: &Tuning,
    removals: &mut RemovalSet,
    report: &mut CollisionReport,
) {
    for pickup in registry.pickups() {
        if within_radius(planar(pickup.pos), player, tuning.pickup_radius) {
            removals.insert(pickup.id);
            report.consumed.push(Consumed {
                pickup: pickup.id,
                kind: pickup.kind,
                pos: pickup.pos,
            });
        }
    }
}
