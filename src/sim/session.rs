//! Game session
//!
//! The session owns every piece of simulation state and is the only thing
//! hosts talk to. One [`GameSession::advance`] call per rendered frame:
//!
//! 1. due timer fires (spawn, buff decay, consume end) are dispatched in order
//! 2. if playing: player moves/aims/shoots, projectiles and enemies move,
//!    collisions resolve, stage progression is checked
//! 3. invariants are enforced
//!
//! In game over nothing advances until [`GameSession::reset`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::buffs;
use super::clock::{GameClock, TimerKind};
use super::collision;
use super::events::{AudioCue, FrameReport, VisualEvent};
use super::movement;
use super::player::{Intent, Player};
use super::registry::EntityRegistry;
use super::spawn;
use super::stage;
use super::state::{Enemy, GamePhase, GameState, ItemKind, Pickup, Projectile};
use crate::tuning::Tuning;

/// Configuration for starting a new session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// RNG seed for spawn placement
    pub seed: u64,
    pub tuning: Tuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: Tuning::default(),
        }
    }
}

/// Read-only view of the session handed to renderers and input sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulated seconds since the last reset
    pub time: f32,
    pub phase: GamePhase,
    pub state: GameState,
    pub player: Player,
    /// Distance covered in the current stage
    pub distance: f32,
    pub road_length: f32,
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<Pickup>,
    pub projectiles: Vec<Projectile>,
}

/// The authoritative simulation
pub struct GameSession {
    tuning: Tuning,
    rng: Pcg32,
    clock: GameClock,
    state: GameState,
    player: Player,
    registry: EntityRegistry,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    /// Start a session. Tuning that fails validation is replaced by the
    /// defaults so the tick can never trip over it.
    pub fn new(config: SessionConfig) -> Self {
        let tuning = match config.tuning.validate() {
            Ok(()) => config.tuning,
            Err(e) => {
                log::error!("Rejected session tuning ({e}), falling back to defaults");
                Tuning::default()
            }
        };
        let mut session = Self {
            state: GameState::new(tuning.max_hp),
            tuning,
            rng: Pcg32::seed_from_u64(config.seed),
            clock: GameClock::new(),
            player: Player::new(),
            registry: EntityRegistry::new(),
        };
        session.arm_timers();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Copy of everything a presenter needs for this frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.clock.time(),
            phase: self.state.phase(),
            state: self.state.clone(),
            player: self.player.clone(),
            distance: self.player.distance_traveled(),
            road_length: self.tuning.road_length,
            enemies: self.registry.enemies().to_vec(),
            pickups: self.registry.pickups().to_vec(),
            projectiles: self.registry.projectiles().to_vec(),
        }
    }

    /// Reinitialize every owned piece of state (the only way out of game over)
    pub fn reset(&mut self) {
        self.clock = GameClock::new();
        self.state = GameState::new(self.tuning.max_hp);
        self.player = Player::new();
        self.registry.clear();
        self.arm_timers();
        log::info!("Session reset");
    }

    /// Advance the simulation by one host frame
    pub fn advance(&mut self, intent: &Intent, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        if self.state.is_game_over {
            return report;
        }

        let dt = GameClock::sanitize_dt(dt);
        let intent = intent.sanitized();

        for fire in self.clock.advance(dt) {
            self.dispatch(fire.kind);
        }

        if self.state.phase() == GamePhase::Playing {
            self.frame(&intent, dt, &mut report);
        }

        if self.state.enforce_invariants() {
            self.enter_game_over(&mut report);
        }
        report
    }

    fn arm_timers(&mut self) {
        self.clock.arm(
            TimerKind::Spawn,
            self.tuning.spawn_interval_secs(self.state.stage),
            true,
        );
        self.clock
            .arm(TimerKind::BuffDecay, self.tuning.buff_tick_interval, true);
    }

    /// Handle one timer fire
    fn dispatch(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Spawn => {
                let outcome = spawn::run(
                    &mut self.registry,
                    &mut self.rng,
                    self.player.pos,
                    self.state.stage,
                    &self.tuning,
                );
                if outcome.enemy.is_none() {
                    log::trace!(
                        "Enemy cap {} reached at stage {}",
                        self.tuning.max_enemies(self.state.stage),
                        self.state.stage
                    );
                }
            }
            TimerKind::BuffDecay => buffs::run(&mut self.state, &self.tuning),
            TimerKind::ConsumeEnd => {
                if let Some(item) = self.state.consuming_item.take() {
                    log::debug!("Finished consuming {}", item.label());
                }
            }
        }
    }

    /// Movement, collision and stage progression for one playing frame
    fn frame(&mut self, intent: &Intent, dt: f32, report: &mut FrameReport) {
        self.player.steer(intent.aim_angle, dt, &self.tuning);
        let boosted = self.state.active_buffs.contains(ItemKind::Speed);
        self.player.advance(intent, dt, boosted, &self.tuning);

        if intent.shoot {
            let muzzle = self.player.muzzle(&self.tuning);
            self.registry
                .spawn_projectile(muzzle, self.player.forward());
            report.cues.push(AudioCue::ShotFired);
        }

        movement::move_projectiles(&mut self.registry, dt, &self.tuning);
        movement::move_enemies(&mut self.registry, self.player.pos, dt, &self.tuning);

        let collisions = collision::run(&mut self.registry, self.player.pos, dt, &self.tuning);

        for hit in collisions.hits.iter().filter(|h| h.destroyed) {
            log::debug!("Enemy {} destroyed by projectile {}", hit.enemy, hit.projectile);
            self.state.add_score(self.tuning.score_per_kill);
            report.push(
                VisualEvent::EnemyDestroyedAt { pos: hit.pos },
                AudioCue::ExplosionOccurred,
            );
        }

        // Game over takes precedence over pickups and stage progression
        if self.state.apply_damage(collisions.contact_damage) {
            self.enter_game_over(report);
            return;
        }

        for item in &collisions.consumed {
            log::debug!("Pickup {} collected", item.pickup);
            self.consume(item.kind);
            report.push(
                VisualEvent::PickupConsumedAt {
                    pos: item.pos,
                    kind: item.kind,
                },
                AudioCue::ItemPickedUp,
            );
        }

        if let Some(stage) = stage::run(
            &mut self.state,
            &mut self.player,
            &mut self.registry,
            &self.tuning,
        ) {
            self.clock.arm(
                TimerKind::Spawn,
                self.tuning.spawn_interval_secs(stage),
                true,
            );
            report.push(VisualEvent::StageCleared { stage }, AudioCue::StageCleared);
        }
    }

    /// Apply an item and (re)start the consumption freeze
    fn consume(&mut self, kind: ItemKind) {
        buffs::apply_item(&mut self.state, kind, &self.tuning);
        self.clock
            .arm(TimerKind::ConsumeEnd, self.tuning.consume_duration, false);
        log::debug!("Consuming {} (hp {:.1})", kind.label(), self.state.hp);
    }

    fn enter_game_over(&mut self, report: &mut FrameReport) {
        self.state.hp = 0.0;
        self.state.is_game_over = true;
        self.state.consuming_item = None;
        self.registry.clear();
        self.clock.disarm_all();
        report.cues.push(AudioCue::GameOver);
        log::info!(
            "Game over at stage {} with score {}",
            self.state.stage,
            self.state.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GROUND_Y;
    use crate::sim::registry::EntityKind;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    /// Tuning with spawning effectively off and nothing moving on its own
    fn quiet_tuning() -> Tuning {
        Tuning {
            initial_spawn_interval_ms: 1_000_000_000,
            min_spawn_interval_ms: 1_000_000_000,
            forward_speed: 0.0,
            boosted_forward_speed: 0.0,
            enemy_speed: 0.0,
            ..Tuning::default()
        }
    }

    fn quiet_session() -> GameSession {
        GameSession::new(SessionConfig {
            seed: 1,
            tuning: quiet_tuning(),
        })
    }

    fn run_for(session: &mut GameSession, intent: &Intent, secs: f32) -> Vec<FrameReport> {
        let frames = (secs / DT).round() as usize;
        (0..frames).map(|_| session.advance(intent, DT)).collect()
    }

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::default();
        let state = session.state();
        assert_eq!(state.hp, 100.0);
        assert_eq!(state.max_hp, 100.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.stage, 1);
        assert!(!state.is_game_over);
        assert_eq!(state.consuming_item, None);
        assert!(state.active_buffs.is_empty());
        assert!(session.clock().is_armed(TimerKind::Spawn));
        assert!(session.clock().is_armed(TimerKind::BuffDecay));
        assert_eq!(session.clock().period(TimerKind::Spawn), Some(4.0));
    }

    #[test]
    fn test_contact_for_one_second() {
        let mut session = quiet_session();
        session.registry.spawn_enemy(Vec3::new(1.0, GROUND_Y, 0.0), 1);

        run_for(&mut session, &Intent::default(), 1.0);
        assert!(
            (session.state().hp - 98.5).abs() < 1e-3,
            "hp {}",
            session.state().hp
        );
        assert_eq!(session.registry().count(EntityKind::Enemy), 1);
    }

    #[test]
    fn test_game_over_freezes_until_reset() {
        let mut session = GameSession::new(SessionConfig {
            seed: 1,
            tuning: Tuning {
                contact_dps: 60.0,
                ..quiet_tuning()
            },
        });
        session.registry.spawn_enemy(Vec3::new(0.5, GROUND_Y, 0.0), 1);
        session.registry.spawn_enemy(Vec3::new(-0.5, GROUND_Y, 0.0), 1);

        let reports = run_for(&mut session, &Intent::default(), 2.0);
        let game_over_cues = reports
            .iter()
            .filter(|r| r.has_cue(AudioCue::GameOver))
            .count();
        assert_eq!(game_over_cues, 1);

        assert!(session.state().is_game_over);
        assert_eq!(session.state().hp, 0.0);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(session.registry().is_empty());
        assert!(!session.clock().is_armed(TimerKind::Spawn));
        assert!(!session.clock().is_armed(TimerKind::BuffDecay));

        let frozen = session.snapshot();
        let shoot = Intent {
            move_x: 1.0,
            aim_angle: 0.4,
            shoot: true,
        };
        for _ in 0..120 {
            assert!(session.advance(&shoot, DT).is_empty());
        }
        assert_eq!(session.snapshot(), frozen);

        session.reset();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.state(), &GameState::new(100.0));
        assert!(session.clock().is_armed(TimerKind::Spawn));
    }

    #[test]
    fn test_stage_transition() {
        let mut session = GameSession::default();
        session.registry.spawn_enemy(Vec3::new(5.0, GROUND_Y, -560.0), 1);
        session
            .registry
            .spawn_pickup(ItemKind::Power, Vec3::new(8.0, GROUND_Y, -540.0));
        session.player.pos.z = -499.9;

        let report = session.advance(&Intent::default(), DT);

        assert!(report.has_cue(AudioCue::StageCleared));
        assert!(report
            .visuals
            .contains(&VisualEvent::StageCleared { stage: 2 }));
        assert_eq!(session.state().stage, 2);
        assert_eq!(session.state().score, 1000);
        assert_eq!(session.player().pos.z, 0.0);
        assert!(session.registry().is_empty());
        assert_eq!(session.clock().period(TimerKind::Spawn), Some(3.4));
    }

    #[test]
    fn test_heal_pickup_enters_consuming() {
        let mut session = quiet_session();
        session.state.hp = 50.0;
        session
            .registry
            .spawn_pickup(ItemKind::Heal, Vec3::new(0.0, GROUND_Y, -1.0));

        let report = session.advance(&Intent::default(), DT);
        assert!(report.has_cue(AudioCue::ItemPickedUp));
        assert_eq!(session.state().hp, 90.0);
        assert!(session.state().active_buffs.is_empty());
        assert_eq!(session.phase(), GamePhase::Consuming);
        assert_eq!(session.state().consuming_item, Some(ItemKind::Heal));

        // Movement and shooting are frozen while consuming
        let x_before = session.player().pos.x;
        let push = Intent {
            move_x: 1.0,
            shoot: true,
            ..Default::default()
        };
        let reports = run_for(&mut session, &push, 1.0);
        assert!(reports.iter().all(|r| !r.has_cue(AudioCue::ShotFired)));
        assert_eq!(session.player().pos.x, x_before);

        run_for(&mut session, &Intent::default(), 0.6);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_buff_pickup_and_expiry() {
        let mut session = quiet_session();
        session
            .registry
            .spawn_pickup(ItemKind::Speed, Vec3::new(1.0, GROUND_Y, 0.0));

        session.advance(&Intent::default(), DT);
        assert_eq!(
            session.state().active_buffs.remaining(ItemKind::Speed),
            Some(15.0)
        );

        run_for(&mut session, &Intent::default(), 10.0);
        let left = session
            .state()
            .active_buffs
            .remaining(ItemKind::Speed)
            .unwrap();
        assert!((4.5..=5.5).contains(&left), "left {left}");

        run_for(&mut session, &Intent::default(), 6.0);
        assert!(!session.state().active_buffs.contains(ItemKind::Speed));
    }

    #[test]
    fn test_speed_buff_boosts_advance() {
        let mut session = GameSession::new(SessionConfig {
            seed: 1,
            tuning: Tuning {
                initial_spawn_interval_ms: 1_000_000_000,
                min_spawn_interval_ms: 1_000_000_000,
                ..Tuning::default()
            },
        });
        session.state.active_buffs.refresh(ItemKind::Speed, 15.0);
        session.advance(&Intent::default(), 0.1);
        assert!((session.player().distance_traveled() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_shot_destroys_enemy_and_scores() {
        let mut session = quiet_session();
        let enemy = session
            .registry
            .spawn_enemy(Vec3::new(0.6, GROUND_Y, -30.0), 1);

        let first = session.advance(
            &Intent {
                shoot: true,
                ..Default::default()
            },
            DT,
        );
        assert!(first.has_cue(AudioCue::ShotFired));
        assert_eq!(session.registry().count(EntityKind::Projectile), 1);

        let reports = run_for(&mut session, &Intent::default(), 0.5);
        assert!(reports.iter().any(|r| r.has_cue(AudioCue::ExplosionOccurred)));
        assert!(session.registry().enemy(enemy).is_none());
        assert_eq!(session.registry().count(EntityKind::Projectile), 0);
        assert_eq!(session.state().score, 100);
    }

    #[test]
    fn test_spawns_follow_timer() {
        let mut session = GameSession::new(SessionConfig {
            seed: 9,
            tuning: Tuning {
                pickup_spawn_chance: 0.0,
                forward_speed: 0.0,
                enemy_speed: 0.0,
                ..Tuning::default()
            },
        });
        run_for(&mut session, &Intent::default(), 3.9);
        assert_eq!(session.registry().count(EntityKind::Enemy), 0);
        run_for(&mut session, &Intent::default(), 0.2);
        assert_eq!(session.registry().count(EntityKind::Enemy), 1);
        for enemy in session.registry().enemies() {
            assert!(enemy.pos.z <= -60.0, "enemies appear ahead of the player");
        }
    }

    #[test]
    fn test_invalid_dt_is_harmless() {
        let mut session = GameSession::default();
        let before = session.snapshot();
        session.advance(&Intent::default(), -1.0);
        session.advance(&Intent::default(), f32::NAN);
        let after = session.snapshot();
        assert_eq!(before.player, after.player);
        assert_eq!(before.state, after.state);
    }

    #[test]
    fn test_corrupted_hp_forces_game_over() {
        let mut session = quiet_session();
        session.state.hp = f32::NAN;
        let report = session.advance(&Intent::default(), DT);
        assert!(report.has_cue(AudioCue::GameOver));
        assert!(session.state().is_game_over);
        assert_eq!(session.state().hp, 0.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameSession::new(SessionConfig {
            seed: 77,
            ..Default::default()
        });
        let mut b = GameSession::new(SessionConfig {
            seed: 77,
            ..Default::default()
        });
        let intent = Intent {
            move_x: 0.3,
            aim_angle: 0.1,
            shoot: false,
        };
        for _ in 0..900 {
            a.advance(&intent, DT);
            b.advance(&intent, DT);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_extreme_aim_angles_do_not_stall() {
        let mut session = GameSession::default();
        for aim in [1.0e30, -1.0e30, f32::MAX, f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let intent = Intent {
                aim_angle: aim,
                shoot: true,
                ..Default::default()
            };
            session.advance(&intent, DT);
            let heading = session.player().heading;
            assert!(
                heading.is_finite() && heading.abs() <= std::f32::consts::FRAC_PI_2 + 1e-4,
                "aim {aim} left heading {heading}"
            );
        }
        assert!(session
            .registry()
            .projectiles()
            .iter()
            .all(|p| p.pos.is_finite() && p.dir.is_finite()));
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        for tuning in [
            Tuning {
                pickup_spawn_chance: 1.5,
                ..Tuning::default()
            },
            Tuning {
                enemy_spawn_min_distance: 90.0,
                enemy_spawn_max_distance: 10.0,
                ..Tuning::default()
            },
            Tuning {
                pickup_lateral_range: -3.0,
                ..Tuning::default()
            },
        ] {
            let mut session = GameSession::new(SessionConfig { seed: 3, tuning });
            assert_eq!(session.tuning(), &Tuning::default());
            // Long enough for several spawn fires
            run_for(&mut session, &Intent::default(), 10.0);
            assert!(session.registry().count(EntityKind::Enemy) > 0);
        }
    }

    #[test]
    fn test_timers_keep_running_while_consuming() {
        let mut session = GameSession::new(SessionConfig {
            seed: 5,
            tuning: Tuning {
                initial_spawn_interval_ms: 500,
                min_spawn_interval_ms: 500,
                pickup_spawn_chance: 0.0,
                consume_duration: 10.0,
                ..quiet_tuning()
            },
        });
        session
            .registry
            .spawn_pickup(ItemKind::Shield, Vec3::new(0.0, GROUND_Y, -1.0));
        session.advance(&Intent::default(), DT);
        assert_eq!(session.phase(), GamePhase::Consuming);
        assert_eq!(session.registry().count(EntityKind::Enemy), 0);

        run_for(&mut session, &Intent::default(), 2.0);
        assert_eq!(session.phase(), GamePhase::Consuming);
        let left = session
            .state()
            .active_buffs
            .remaining(ItemKind::Shield)
            .unwrap();
        assert!(left < 14.0, "buff decay paused while consuming: {left}");
        assert!(
            session.registry().count(EntityKind::Enemy) >= 3,
            "spawn timer paused while consuming"
        );
    }

    #[test]
    fn test_second_item_restarts_consume_window() {
        let mut session = quiet_session();
        session
            .registry
            .spawn_pickup(ItemKind::Speed, Vec3::new(0.0, GROUND_Y, -1.0));
        session.advance(&Intent::default(), DT);
        assert_eq!(session.phase(), GamePhase::Consuming);

        run_for(&mut session, &Intent::default(), 1.0);
        assert_eq!(session.phase(), GamePhase::Consuming);
        session.consume(ItemKind::Power);

        // Past the first item's window, inside the second's
        run_for(&mut session, &Intent::default(), 1.0);
        assert_eq!(session.phase(), GamePhase::Consuming);
        assert_eq!(session.state().consuming_item, Some(ItemKind::Power));

        run_for(&mut session, &Intent::default(), 0.6);
        assert_eq!(session.phase(), GamePhase::Playing);
    }
}
