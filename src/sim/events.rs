//! Events emitted by the simulation for presentation.
//!
//! None of these feed back into the simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::ItemKind;

/// Transient visual effects for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VisualEvent {
    /// Explosion where an enemy was destroyed
    EnemyDestroyedAt { pos: Vec3 },
    /// Burst where a pickup was collected
    PickupConsumedAt { pos: Vec3, kind: ItemKind },
    StageCleared { stage: u32 },
}

/// Discrete sound cues for the audio presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    ShotFired,
    ExplosionOccurred,
    ItemPickedUp,
    StageCleared,
    GameOver,
}

/// Everything one `advance` call produced for the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub visuals: Vec<VisualEvent>,
    pub cues: Vec<AudioCue>,
}

impl FrameReport {
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty() && self.cues.is_empty()
    }

    pub fn push(&mut self, visual: VisualEvent, cue: AudioCue) {
        self.visuals.push(visual);
        self.cues.push(cue);
    }

    pub fn has_cue(&self, cue: AudioCue) -> bool {
        self.cues.contains(&cue)
    }
}
