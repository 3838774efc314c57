//! Spawn controller
//!
//! Runs on the spawn timer. Enemies appear in a narrow cone ahead of the
//! player, capped per stage; pickups roll independently of the cap. The
//! controller keeps no memory beyond the live entity counts.

use glam::Vec3;
use rand::Rng;

use super::registry::{EntityKind, EntityRegistry};
use super::state::{EntityId, ItemKind};
use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

/// What a spawn fire created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnOutcome {
    pub enemy: Option<EntityId>,
    pub pickup: Option<(EntityId, ItemKind)>,
}

/// Pick an enemy spawn point ahead of the player
pub fn enemy_spawn_point(rng: &mut impl Rng, player_pos: Vec3, tuning: &Tuning) -> Vec3 {
    let bearing = tuning.enemy_spawn_bearing;
    let angle = rng.random_range(-bearing..=bearing);
    let dist =
        rng.random_range(tuning.enemy_spawn_min_distance..=tuning.enemy_spawn_max_distance);
    Vec3::new(
        player_pos.x + angle.sin() * dist,
        GROUND_Y,
        player_pos.z - dist,
    )
}

/// Pick a pickup kind and placement ahead of the player
pub fn pickup_spawn(rng: &mut impl Rng, player_pos: Vec3, tuning: &Tuning) -> (ItemKind, Vec3) {
    let kind = ItemKind::ALL[rng.random_range(0..ItemKind::ALL.len())];
    let range = tuning.pickup_lateral_range;
    let x = rng.random_range(-range..=range);
    (
        kind,
        Vec3::new(x, GROUND_Y, player_pos.z - tuning.pickup_spawn_distance),
    )
}

/// Spawn timer fire
pub fn run(
    registry: &mut EntityRegistry,
    rng: &mut impl Rng,
    player_pos: Vec3,
    stage: u32,
    tuning: &Tuning,
) -> SpawnOutcome {
    let mut outcome = SpawnOutcome::default();

    if registry.count(EntityKind::Enemy) < tuning.max_enemies(stage) {
        let pos = enemy_spawn_point(rng, player_pos, tuning);
        let id = registry.spawn_enemy(pos, tuning.enemy_hp);
        log::debug!("Spawned enemy {id} at ({:.1}, {:.1})", pos.x, pos.z);
        outcome.enemy = Some(id);
    }

    if rng.random_bool(tuning.pickup_spawn_chance) {
        let (kind, pos) = pickup_spawn(rng, player_pos, tuning);
        let id = registry.spawn_pickup(kind, pos);
        log::debug!("Spawned {} pickup {id} at ({:.1}, {:.1})", kind.label(), pos.x, pos.z);
        outcome.pickup = Some((id, kind));
    }

    outcome
}
