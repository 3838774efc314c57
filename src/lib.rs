//! Lane Runner - simulation core for an arcade endless runner
//!
//! Core modules:
//! - `sim`: Simulation (clock, entities, collisions, buffs, stages)
//! - `audio`: Cue-to-voice mapping for the audio presenter
//! - `present`: Renderer / input seams and the autopilot driver
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod present;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta accepted by one tick (seconds).
    /// Longer host stalls are clamped instead of integrated.
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Frame rate the per-frame easing factors were tuned at
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Fixed height of enemies and pickups above the road
    pub const GROUND_Y: f32 = 0.5;

    /// Player defaults
    pub const MAX_HP: f32 = 100.0;
    pub const PLAYER_FORWARD_SPEED: f32 = 18.0;
    pub const PLAYER_BOOSTED_SPEED: f32 = 25.0;
    pub const PLAYER_SIDE_SPEED: f32 = 30.0;
    pub const LANE_HALF_WIDTH: f32 = 10.0;
    pub const AIM_SMOOTHING: f32 = 0.15;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 120.0;
    pub const PROJECTILE_MAX_DISTANCE: f32 = 180.0;
    pub const MUZZLE_FORWARD: f32 = 1.8;
    pub const MUZZLE_SIDE: f32 = 0.6;
    pub const MUZZLE_HEIGHT: f32 = 0.4;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 5.0;
    pub const ENEMY_HP: u32 = 1;

    /// Collision radii
    pub const PROJECTILE_HIT_RADIUS: f32 = 2.2;
    pub const CONTACT_RADIUS: f32 = 2.2;
    pub const PICKUP_RADIUS: f32 = 2.5;
    /// Contact damage per second, per touching enemy
    pub const CONTACT_DPS: f32 = 1.5;

    /// Scoring
    pub const SCORE_PER_KILL: u64 = 100;
    pub const STAGE_CLEAR_BONUS: u64 = 1000;

    /// Distance that completes a stage
    pub const ROAD_LENGTH: f32 = 500.0;

    /// Spawn pacing (milliseconds)
    pub const INITIAL_SPAWN_INTERVAL_MS: u32 = 4000;
    pub const SPAWN_INTERVAL_STEP_MS: u32 = 600;
    pub const MIN_SPAWN_INTERVAL_MS: u32 = 800;
    pub const MAX_ENEMIES_BASE: u32 = 6;
    pub const MAX_ENEMIES_PER_STAGE: u32 = 3;

    /// Spawn placement
    pub const ENEMY_SPAWN_BEARING: f32 = 0.2; // radians, ~11.5 degrees
    pub const ENEMY_SPAWN_MIN_DISTANCE: f32 = 60.0;
    pub const ENEMY_SPAWN_MAX_DISTANCE: f32 = 80.0;
    pub const PICKUP_SPAWN_CHANCE: f64 = 0.7;
    pub const PICKUP_LATERAL_RANGE: f32 = 8.0;
    pub const PICKUP_SPAWN_DISTANCE: f32 = 45.0;

    /// Items
    pub const BUFF_DURATION: f32 = 15.0;
    pub const BUFF_TICK_INTERVAL: f32 = 0.5;
    pub const HEAL_AMOUNT: f32 = 40.0;
    pub const CONSUME_DURATION: f32 = 1.5;
}

/// Normalized angle to [-π, π). Non-finite angles map to 0.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid may round up to TAU itself
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Project a world position onto the ground plane as (x, z)
#[inline]
pub fn planar(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Planar (x, z) direction of a yaw heading.
///
/// Heading 0 points down the lane (-z); positive headings turn toward +x.
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.sin(), -heading.cos())
}

/// Yaw heading of a planar (x, z) direction (inverse of [`heading_to_dir`])
#[inline]
pub fn dir_to_heading(dir: Vec2) -> f32 {
    dir.x.atan2(-dir.y)
}
