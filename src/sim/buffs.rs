//! Buff timers
//!
//! Buffs are decayed on their own fixed interval, not per frame. Each fire
//! subtracts one interval from every buff and drops the expired ones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::{GameState, ItemKind};
use crate::tuning::Tuning;

/// Active timed buffs, at most one entry per kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveBuffs {
    remaining: BTreeMap<ItemKind, f32>,
}

impl ActiveBuffs {
    /// Start or restart a buff at the full duration (never stacks).
    /// Instant kinds are ignored.
    pub fn refresh(&mut self, kind: ItemKind, duration: f32) {
        if kind.is_instant() || !duration.is_finite() || duration <= 0.0 {
            return;
        }
        self.remaining.insert(kind, duration);
    }

    /// Subtract `step` seconds from every buff and drop expired ones
    pub fn decay(&mut self, step: f32) {
        self.remaining.retain(|kind, secs| {
            *secs -= step;
            if *secs <= 0.0 {
                log::debug!("Buff {} expired", kind.label());
                false
            } else {
                true
            }
        });
    }

    pub fn contains(&self, kind: ItemKind) -> bool {
        self.remaining.contains_key(&kind)
    }

    /// Seconds left on a buff, if active
    pub fn remaining(&self, kind: ItemKind) -> Option<f32> {
        self.remaining.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, f32)> + '_ {
        self.remaining.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}

/// Apply a consumed item's effect and mark it as being consumed.
///
/// Heal raises hp (clamped) without creating a buff; the other kinds start
/// or refresh their timer.
pub fn apply_item(state: &mut GameState, kind: ItemKind, tuning: &Tuning) {
    if kind.is_instant() {
        state.heal(tuning.heal_amount);
    } else {
        state.active_buffs.refresh(kind, tuning.buff_duration);
    }
    state.consuming_item = Some(kind);
}

/// Buff decay timer fire
pub fn run(state: &mut GameState, tuning: &Tuning) {
    if state.is_game_over {
        return;
    }
    state.active_buffs.decay(tuning.buff_tick_interval);
}
