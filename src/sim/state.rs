//! Game state and core simulation types
//!
//! `GameState` is the HUD-facing state owned by the session; entities live in
//! the [`EntityRegistry`](super::registry::EntityRegistry).

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::buffs::ActiveBuffs;

/// Entity identifier, unique for the lifetime of a session
pub type EntityId = u64;

/// Current phase of gameplay (derived from [`GameState`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Item consumption freeze (player movement halted)
    Consuming,
    /// Run ended, waiting for reset
    GameOver,
}

/// Pickup item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Instant heal, never tracked as a buff
    Heal,
    /// Faster auto-advance
    Speed,
    Shield,
    Power,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Heal,
        ItemKind::Speed,
        ItemKind::Shield,
        ItemKind::Power,
    ];

    /// Instant items apply once and never occupy a buff slot
    pub fn is_instant(self) -> bool {
        self == ItemKind::Heal
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Heal => "HEAL",
            ItemKind::Speed => "SPEED",
            ItemKind::Shield => "SHIELD",
            ItemKind::Power => "POWER",
        }
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec3,
    pub hp: u32,
}

/// A collectible item on the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: ItemKind,
    pub pos: Vec3,
}

/// A player shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec3,
    /// Unit direction of travel
    pub dir: Vec3,
}

impl Projectile {
    /// Position on the ground plane
    pub fn planar(&self) -> Vec2 {
        crate::planar(self.pos)
    }
}

/// HUD-facing game state.
///
/// Invariants: `0 <= hp <= max_hp`, `is_game_over => hp == 0`, `stage >= 1`,
/// and `score` never decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub hp: f32,
    pub max_hp: f32,
    pub score: u64,
    pub stage: u32,
    pub is_game_over: bool,
    /// Item currently being consumed (presentation freeze)
    pub consuming_item: Option<ItemKind>,
    pub active_buffs: ActiveBuffs,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(crate::consts::MAX_HP)
    }
}

impl GameState {
    /// Fresh run state with full health
    pub fn new(max_hp: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            score: 0,
            stage: 1,
            is_game_over: false,
            consuming_item: None,
            active_buffs: ActiveBuffs::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.is_game_over {
            GamePhase::GameOver
        } else if self.consuming_item.is_some() {
            GamePhase::Consuming
        } else {
            GamePhase::Playing
        }
    }

    /// Add points (score only grows)
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Restore health, clamped to `max_hp`
    pub fn heal(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Apply damage. Returns true if this damage ended the run.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.is_game_over || !amount.is_finite() || amount <= 0.0 {
            return false;
        }
        self.hp = (self.hp - amount).max(0.0);
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.is_game_over = true;
            return true;
        }
        false
    }

    /// Clamp a corrupted state back to the nearest valid one.
    ///
    /// Returns true if the correction ended the run (hp was not a valid
    /// non-negative number).
    pub fn enforce_invariants(&mut self) -> bool {
        if !self.max_hp.is_finite() || self.max_hp <= 0.0 {
            log::error!("max_hp {} out of range, restoring default", self.max_hp);
            self.max_hp = crate::consts::MAX_HP;
        }
        if self.stage == 0 {
            log::error!("stage 0 is not valid, restoring stage 1");
            self.stage = 1;
        }
        if self.is_game_over && self.hp != 0.0 {
            log::error!("game over with hp {}, clamping to 0", self.hp);
            self.hp = 0.0;
        }
        if !self.hp.is_finite() || self.hp < 0.0 {
            log::error!("hp {} out of range, forcing game over", self.hp);
            self.hp = 0.0;
            let newly_over = !self.is_game_over;
            self.is_game_over = true;
            return newly_over;
        }
        if self.hp > self.max_hp {
            log::error!("hp {} above max {}, clamping", self.hp, self.max_hp);
            self.hp = self.max_hp;
        }
        false
    }
}
