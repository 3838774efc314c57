//! Kinematic integration for projectiles and enemies.

use glam::Vec3;

use super::registry::EntityRegistry;
use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

/// Advance projectiles along their direction at the fixed shot speed
pub fn move_projectiles(registry: &mut EntityRegistry, dt: f32, tuning: &Tuning) {
    let step = tuning.projectile_speed * dt;
    for shot in registry.projectiles_mut() {
        shot.pos += shot.dir * step;
    }
}

/// Steer every enemy straight at the player on the ground plane
pub fn move_enemies(registry: &mut EntityRegistry, player_pos: Vec3, dt: f32, tuning: &Tuning) {
    let step = tuning.enemy_speed * dt;
    for enemy in registry.enemies_mut() {
        let to_player = Vec3::new(player_pos.x - enemy.pos.x, 0.0, player_pos.z - enemy.pos.z);
        let dir = to_player.normalize_or_zero();
        enemy.pos += dir * step;
        enemy.pos.y = GROUND_Y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_pursues_player() {
        let tuning = Tuning::default();
        let mut registry = EntityRegistry::new();
        let id = registry.spawn_enemy(Vec3::new(0.0, GROUND_Y, -20.0), 1);

        move_enemies(&mut registry, Vec3::ZERO, 1.0, &tuning);
        let enemy = registry.enemy(id).unwrap();
        assert!((enemy.pos.z + 15.0).abs() < 1e-4);
        assert_eq!(enemy.pos.y, GROUND_Y);
    }

    #[test]
    fn test_enemy_on_player_stays_put() {
        let tuning = Tuning::default();
        let mut registry = EntityRegistry::new();
        let id = registry.spawn_enemy(Vec3::new(1.0, GROUND_Y, 1.0), 1);
        move_enemies(&mut registry, Vec3::new(1.0, 0.0, 1.0), 0.5, &tuning);
        let enemy = registry.enemy(id).unwrap();
        assert!(enemy.pos.x.is_finite() && enemy.pos.z.is_finite());
    }

    #[test]
    fn test_projectile_travels_at_fixed_speed() {
        let tuning = Tuning::default();
        let mut registry = EntityRegistry::new();
        registry.spawn_projectile(Vec3::ZERO, Vec3::NEG_Z);
        move_projectiles(&mut registry, 0.1, &tuning);
        assert!((registry.projectiles()[0].pos.z + 12.0).abs() < 1e-4);
    }
}
