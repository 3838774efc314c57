//! Game balance tuning
//!
//! Every number the simulation uses lives here, defaulting to the shipped
//! balance. Hosts can override any subset from a JSON document; missing
//! fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Error raised while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    /// Tuning file could not be read
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    /// Tuning document is not valid JSON for [`Tuning`]
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the simulation cannot run with
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Balance parameters for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub max_hp: f32,
    /// Auto-advance speed (units/s)
    pub forward_speed: f32,
    /// Auto-advance speed while the Speed buff is active
    pub boosted_forward_speed: f32,
    /// Lateral speed at full stick deflection
    pub side_speed: f32,
    /// Player x is clamped to [-lane_half_width, lane_half_width]
    pub lane_half_width: f32,
    /// Fraction of the aim error closed per 60 Hz frame
    pub aim_smoothing: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    /// Longitudinal distance from the player after which a shot is dropped
    pub projectile_max_distance: f32,
    pub muzzle_forward: f32,
    pub muzzle_side: f32,
    pub muzzle_height: f32,

    // === Enemies ===
    pub enemy_speed: f32,
    pub enemy_hp: u32,

    // === Collision ===
    pub projectile_hit_radius: f32,
    pub contact_radius: f32,
    pub pickup_radius: f32,
    pub contact_dps: f32,

    // === Scoring / stages ===
    pub score_per_kill: u64,
    pub stage_clear_bonus: u64,
    pub road_length: f32,

    // === Spawning ===
    pub initial_spawn_interval_ms: u32,
    pub spawn_interval_step_ms: u32,
    pub min_spawn_interval_ms: u32,
    pub max_enemies_base: u32,
    pub max_enemies_per_stage: u32,
    /// Half-angle of the spawn cone ahead of the player (radians)
    pub enemy_spawn_bearing: f32,
    pub enemy_spawn_min_distance: f32,
    pub enemy_spawn_max_distance: f32,
    pub pickup_spawn_chance: f64,
    pub pickup_lateral_range: f32,
    pub pickup_spawn_distance: f32,

    // === Items ===
    pub buff_duration: f32,
    pub buff_tick_interval: f32,
    pub heal_amount: f32,
    pub consume_duration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_hp: MAX_HP,
            forward_speed: PLAYER_FORWARD_SPEED,
            boosted_forward_speed: PLAYER_BOOSTED_SPEED,
            side_speed: PLAYER_SIDE_SPEED,
            lane_half_width: LANE_HALF_WIDTH,
            aim_smoothing: AIM_SMOOTHING,

            projectile_speed: PROJECTILE_SPEED,
            projectile_max_distance: PROJECTILE_MAX_DISTANCE,
            muzzle_forward: MUZZLE_FORWARD,
            muzzle_side: MUZZLE_SIDE,
            muzzle_height: MUZZLE_HEIGHT,

            enemy_speed: ENEMY_SPEED,
            enemy_hp: ENEMY_HP,

            projectile_hit_radius: PROJECTILE_HIT_RADIUS,
            contact_radius: CONTACT_RADIUS,
            pickup_radius: PICKUP_RADIUS,
            contact_dps: CONTACT_DPS,

            score_per_kill: SCORE_PER_KILL,
            stage_clear_bonus: STAGE_CLEAR_BONUS,
            road_length: ROAD_LENGTH,

            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            max_enemies_base: MAX_ENEMIES_BASE,
            max_enemies_per_stage: MAX_ENEMIES_PER_STAGE,
            enemy_spawn_bearing: ENEMY_SPAWN_BEARING,
            enemy_spawn_min_distance: ENEMY_SPAWN_MIN_DISTANCE,
            enemy_spawn_max_distance: ENEMY_SPAWN_MAX_DISTANCE,
            pickup_spawn_chance: PICKUP_SPAWN_CHANCE,
            pickup_lateral_range: PICKUP_LATERAL_RANGE,
            pickup_spawn_distance: PICKUP_SPAWN_DISTANCE,

            buff_duration: BUFF_DURATION,
            buff_tick_interval: BUFF_TICK_INTERVAL,
            heal_amount: HEAL_AMOUNT,
            consume_duration: CONSUME_DURATION,
        }
    }
}

impl Tuning {
    /// Spawn interval for a stage in milliseconds:
    /// `max(min, initial - (stage - 1) * step)`
    pub fn spawn_interval_ms(&self, stage: u32) -> u32 {
        let reduction = stage
            .saturating_sub(1)
            .saturating_mul(self.spawn_interval_step_ms);
        self.initial_spawn_interval_ms
            .saturating_sub(reduction)
            .max(self.min_spawn_interval_ms)
    }

    /// Spawn interval for a stage in seconds
    pub fn spawn_interval_secs(&self, stage: u32) -> f32 {
        self.spawn_interval_ms(stage) as f32 / 1000.0
    }

    /// Live enemy cap for a stage
    pub fn max_enemies(&self, stage: u32) -> usize {
        let extra = stage
            .saturating_sub(1)
            .saturating_mul(self.max_enemies_per_stage);
        self.max_enemies_base.saturating_add(extra) as usize
    }

    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning document from disk
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would stall timers or break geometry
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a non-negative finite number",
                })
            }
        }

        positive("max_hp", self.max_hp)?;
        non_negative("forward_speed", self.forward_speed)?;
        non_negative("boosted_forward_speed", self.boosted_forward_speed)?;
        non_negative("side_speed", self.side_speed)?;
        non_negative("enemy_speed", self.enemy_speed)?;
        non_negative("projectile_speed", self.projectile_speed)?;
        non_negative("contact_dps", self.contact_dps)?;
        non_negative("heal_amount", self.heal_amount)?;
        positive("buff_tick_interval", self.buff_tick_interval)?;
        positive("buff_duration", self.buff_duration)?;
        positive("consume_duration", self.consume_duration)?;
        positive("road_length", self.road_length)?;
        positive("projectile_hit_radius", self.projectile_hit_radius)?;
        positive("contact_radius", self.contact_radius)?;
        positive("pickup_radius", self.pickup_radius)?;
        positive("lane_half_width", self.lane_half_width)?;

        if self.min_spawn_interval_ms == 0 {
            return Err(TuningError::Invalid {
                field: "min_spawn_interval_ms",
                reason: "must be at least 1 ms",
            });
        }
        if self.enemy_hp == 0 {
            return Err(TuningError::Invalid {
                field: "enemy_hp",
                reason: "enemies must spawn alive",
            });
        }
        non_negative("enemy_spawn_bearing", self.enemy_spawn_bearing)?;
        non_negative("pickup_lateral_range", self.pickup_lateral_range)?;
        positive("enemy_spawn_min_distance", self.enemy_spawn_min_distance)?;
        positive("enemy_spawn_max_distance", self.enemy_spawn_max_distance)?;
        if self.enemy_spawn_min_distance > self.enemy_spawn_max_distance {
            return Err(TuningError::Invalid {
                field: "enemy_spawn_min_distance",
                reason: "must not exceed enemy_spawn_max_distance",
            });
        }
        if !(0.0..=1.0).contains(&self.pickup_spawn_chance) {
            return Err(TuningError::Invalid {
                field: "pickup_spawn_chance",
                reason: "must be a probability in [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.aim_smoothing) {
            return Err(TuningError::Invalid {
                field: "aim_smoothing",
                reason: "must be in [0, 1]",
            });
        }
        Ok(())
    }
}
