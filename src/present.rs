//! Presentation seams
//!
//! The simulation never calls into these; hosts read a [`Snapshot`] plus the
//! frame's [`FrameReport`] and forward them. Audio lives in [`crate::audio`].

use crate::sim::{FrameReport, Intent, Snapshot, VisualEvent};
use crate::{dir_to_heading, planar};

/// Produces the player's intent for the next frame
pub trait InputSource {
    fn intent(&mut self, snapshot: &Snapshot) -> Intent;
}

/// Draws a frame
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot, visuals: &[VisualEvent]);
}

/// Feed one frame's output to a renderer and an audio presenter
pub fn present(
    snapshot: &Snapshot,
    report: &FrameReport,
    renderer: &mut impl Renderer,
    audio: &mut impl crate::audio::AudioPresenter,
) {
    renderer.render(snapshot, &report.visuals);
    for &cue in &report.cues {
        audio.play(cue);
    }
}

/// Headless renderer that traces frames through the log facade
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub frames: u64,
    pub effects: u64,
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &Snapshot, visuals: &[VisualEvent]) {
        self.frames += 1;
        for visual in visuals {
            self.effects += 1;
            match visual {
                VisualEvent::EnemyDestroyedAt { pos } => {
                    log::debug!("explosion at ({:.1}, {:.1})", pos.x, pos.z);
                }
                VisualEvent::PickupConsumedAt { pos, kind } => {
                    log::debug!("{} burst at ({:.1}, {:.1})", kind.label(), pos.x, pos.z);
                }
                VisualEvent::StageCleared { stage } => {
                    log::debug!("stage banner: STAGE {stage}");
                }
            }
        }
        log::trace!(
            "hp {:.1}/{:.0} score {} stage {} distance {:.0}/{:.0} enemies {} pickups {} shots {}",
            snapshot.state.hp,
            snapshot.state.max_hp,
            snapshot.state.score,
            snapshot.state.stage,
            snapshot.distance,
            snapshot.road_length,
            snapshot.enemies.len(),
            snapshot.pickups.len(),
            snapshot.projectiles.len()
        );
    }
}

/// Scripted input for demos and soak runs: chases pickups, sidesteps
/// enemies that get close and fires at the nearest enemy ahead.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Minimum seconds between shots
    pub fire_interval: f32,
    /// Enemies closer than this (ahead) trigger a sidestep
    pub danger_distance: f32,
    last_shot: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            fire_interval: 0.25,
            danger_distance: 12.0,
            last_shot: f32::NEG_INFINITY,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for Autopilot {
    fn intent(&mut self, snapshot: &Snapshot) -> Intent {
        let me = planar(snapshot.player.pos);
        // Session time restarts on reset
        if snapshot.time < self.last_shot {
            self.last_shot = f32::NEG_INFINITY;
        }

        let target = snapshot
            .enemies
            .iter()
            .map(|e| planar(e.pos))
            .filter(|p| p.y < me.y)
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));

        let threat = target.filter(|p| p.distance(me) < self.danger_distance);
        let pickup = snapshot
            .pickups
            .iter()
            .map(|p| planar(p.pos))
            .filter(|p| p.y < me.y)
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));

        let move_x = if let Some(enemy) = threat {
            // Step away from whatever is about to reach us
            if enemy.x >= me.x { -1.0 } else { 1.0 }
        } else if let Some(pickup) = pickup {
            ((pickup.x - me.x) * 0.5).clamp(-1.0, 1.0)
        } else {
            (-me.x * 0.1).clamp(-1.0, 1.0)
        };

        let aim_angle = target.map_or(0.0, |enemy| dir_to_heading(enemy - me));

        let shoot = target.is_some() && snapshot.time - self.last_shot >= self.fire_interval;
        if shoot {
            self.last_shot = snapshot.time;
        }

        Intent {
            move_x,
            aim_angle,
            shoot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::sim::{GameSession, ItemKind, SessionConfig};
    use glam::Vec3;

    fn empty_snapshot() -> Snapshot {
        GameSession::default().snapshot()
    }

    #[test]
    fn test_autopilot_idles_without_targets() {
        let mut pilot = Autopilot::new();
        let intent = pilot.intent(&empty_snapshot());
        assert!(!intent.shoot);
        assert_eq!(intent.aim_angle, 0.0);
        assert_eq!(intent.move_x, 0.0);
    }

    #[test]
    fn test_autopilot_aims_and_fires_on_cooldown() {
        let mut pilot = Autopilot::new();
        let mut snapshot = empty_snapshot();
        snapshot.enemies = vec![crate::sim::Enemy {
            id: 1,
            pos: Vec3::new(20.0, 0.5, -20.0),
            hp: 1,
        }];

        let intent = pilot.intent(&snapshot);
        assert!(intent.shoot);
        assert!((intent.aim_angle - std::f32::consts::FRAC_PI_4).abs() < 1e-4);

        snapshot.time = 0.1;
        assert!(!pilot.intent(&snapshot).shoot);
        snapshot.time = 0.3;
        assert!(pilot.intent(&snapshot).shoot);
    }

    #[test]
    fn test_autopilot_ignores_enemies_behind() {
        let mut pilot = Autopilot::new();
        let mut snapshot = empty_snapshot();
        snapshot.enemies = vec![crate::sim::Enemy {
            id: 1,
            pos: Vec3::new(0.0, 0.5, 5.0),
            hp: 1,
        }];
        assert!(!pilot.intent(&snapshot).shoot);
    }

    #[test]
    fn test_autopilot_sidesteps_close_enemy() {
        let mut pilot = Autopilot::new();
        let mut snapshot = empty_snapshot();
        snapshot.enemies = vec![crate::sim::Enemy {
            id: 1,
            pos: Vec3::new(1.0, 0.5, -5.0),
            hp: 1,
        }];
        snapshot.pickups = vec![crate::sim::Pickup {
            id: 2,
            kind: ItemKind::Shield,
            pos: Vec3::new(6.0, 0.5, -20.0),
        }];
        assert_eq!(pilot.intent(&snapshot).move_x, -1.0);

        snapshot.enemies.clear();
        assert_eq!(pilot.intent(&snapshot).move_x, 1.0);
    }

    #[test]
    fn test_present_forwards_report() {
        let mut session = GameSession::new(SessionConfig::default());
        let mut renderer = LogRenderer::default();
        let mut audio = AudioManager::default();
        let report = session.advance(
            &Intent {
                shoot: true,
                ..Default::default()
            },
            1.0 / 60.0,
        );
        present(&session.snapshot(), &report, &mut renderer, &mut audio);
        assert_eq!(renderer.frames, 1);
        assert_eq!(audio.backend().scheduled, 1);
    }
}
