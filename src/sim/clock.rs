//! Game clock and interval timers
//!
//! One clock owns every fixed-interval timer in the session. Frame deltas are
//! fed in by the host; timers accumulate them and report due fires as
//! [`TimerFire`] messages in chronological order, so all mutations run on the
//! caller's thread one at a time.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DT;

/// Smallest period a timer may be armed with (seconds)
const MIN_PERIOD: f32 = 0.001;

/// Timers driven by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Enemy/pickup spawn decision
    Spawn,
    /// Buff decay step
    BuffDecay,
    /// End of the item consumption freeze
    ConsumeEnd,
}

/// A due timer, stamped with the clock time it fell due at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerFire {
    pub kind: TimerKind,
    pub at: f32,
}

#[derive(Debug, Clone)]
struct IntervalTimer {
    kind: TimerKind,
    period: f32,
    elapsed: f32,
    repeat: bool,
    done: bool,
}

/// Simulation clock
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    time: f32,
    frame_dt: f32,
    frames: u64,
    timers: Vec<IntervalTimer>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp a host-supplied frame delta into `[0, MAX_FRAME_DT]`
    pub fn sanitize_dt(dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid frame delta {dt}");
            return 0.0;
        }
        dt.min(MAX_FRAME_DT)
    }

    /// Seconds of simulated time so far
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Delta of the most recent frame
    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    /// Number of frames advanced
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Arm (or re-arm) a timer, restarting its period from now
    pub fn arm(&mut self, kind: TimerKind, period: f32, repeat: bool) {
        let period = if period.is_finite() {
            period.max(MIN_PERIOD)
        } else {
            MIN_PERIOD
        };
        self.disarm(kind);
        self.timers.push(IntervalTimer {
            kind,
            period,
            elapsed: 0.0,
            repeat,
            done: false,
        });
    }

    pub fn disarm(&mut self, kind: TimerKind) {
        self.timers.retain(|t| t.kind != kind);
    }

    /// Cancel every timer (game over / reset)
    pub fn disarm_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    /// Period of an armed timer
    pub fn period(&self, kind: TimerKind) -> Option<f32> {
        self.timers.iter().find(|t| t.kind == kind).map(|t| t.period)
    }

    /// Seconds until an armed timer next fires
    pub fn remaining(&self, kind: TimerKind) -> Option<f32> {
        self.timers
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| (t.period - t.elapsed).max(0.0))
    }

    /// Advance by a (sanitized) frame delta and collect due timer fires
    pub fn advance(&mut self, dt: f32) -> Vec<TimerFire> {
        let dt = Self::sanitize_dt(dt);
        let start = self.time;
        let mut fires = Vec::new();

        for timer in &mut self.timers {
            timer.elapsed += dt;
            while timer.elapsed >= timer.period {
                timer.elapsed -= timer.period;
                fires.push(TimerFire {
                    kind: timer.kind,
                    at: start + dt - timer.elapsed,
                });
                if !timer.repeat {
                    timer.done = true;
                    break;
                }
            }
        }
        self.timers.retain(|t| !t.done);

        // Stable: simultaneous fires keep arming order
        fires.sort_by(|a, b| a.at.total_cmp(&b.at));

        self.time += dt;
        self.frame_dt = dt;
        self.frames += 1;
        fires
    }
}
