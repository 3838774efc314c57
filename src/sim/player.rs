//! Player movement, aiming and shooting

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_FPS;
use crate::tuning::Tuning;
use crate::{heading_to_dir, normalize_angle};

/// Input intent for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Lateral stick in [-1, 1] (negative = left)
    pub move_x: f32,
    /// Desired world-frame yaw (0 = down the lane, positive toward +x)
    pub aim_angle: f32,
    /// Fire one shot this frame
    pub shoot: bool,
}

impl Intent {
    /// Clamp `move_x`, wrap `aim_angle` into [-π, π); non-finite values
    /// become neutral
    pub fn sanitized(&self) -> Self {
        let move_x = if self.move_x.is_finite() {
            self.move_x.clamp(-1.0, 1.0)
        } else {
            log::warn!("Ignoring non-finite move_x {}", self.move_x);
            0.0
        };
        let aim_angle = if self.aim_angle.is_finite() {
            normalize_angle(self.aim_angle)
        } else {
            log::warn!("Ignoring non-finite aim_angle {}", self.aim_angle);
            0.0
        };
        Self {
            move_x,
            aim_angle,
            shoot: self.shoot,
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Current yaw (eases toward the aim angle)
    pub heading: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            heading: 0.0,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance covered in the current stage
    pub fn distance_traveled(&self) -> f32 {
        (-self.pos.z).max(0.0)
    }

    /// Unit facing direction on the ground plane
    pub fn forward(&self) -> Vec3 {
        let dir = heading_to_dir(self.heading);
        Vec3::new(dir.x, 0.0, dir.y)
    }

    /// Unit direction to the player's right
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.heading.cos(), 0.0, self.heading.sin())
    }

    /// World position where shots leave the gun
    pub fn muzzle(&self, tuning: &Tuning) -> Vec3 {
        self.pos
            + self.forward() * tuning.muzzle_forward
            + self.right() * tuning.muzzle_side
            + Vec3::Y * tuning.muzzle_height
    }

    /// Auto-advance plus lateral movement, clamped to the lane
    pub fn advance(&mut self, intent: &Intent, dt: f32, boosted: bool, tuning: &Tuning) {
        let forward_speed = if boosted {
            tuning.boosted_forward_speed
        } else {
            tuning.forward_speed
        };
        self.pos.z -= forward_speed * dt;
        self.pos.x += intent.move_x * tuning.side_speed * dt;
        self.pos.x = self
            .pos
            .x
            .clamp(-tuning.lane_half_width, tuning.lane_half_width);
    }

    /// Ease the heading toward the aim angle, limited to the forward
    /// half-plane. Non-finite aims leave the heading unchanged.
    pub fn steer(&mut self, aim_angle: f32, dt: f32, tuning: &Tuning) {
        if !aim_angle.is_finite() {
            return;
        }
        let limit = std::f32::consts::FRAC_PI_2;
        let target = normalize_angle(aim_angle).clamp(-limit, limit);
        let diff = normalize_angle(target - self.heading);

        // Per-frame factor at the reference rate, compensated for dt
        let keep = (1.0 - tuning.aim_smoothing).powf(dt * REFERENCE_FPS);
        self.heading = normalize_angle(self.heading + diff * (1.0 - keep));
    }

    /// Return to the start of a stage (heading is kept)
    pub fn reset_distance(&mut self) {
        self.pos.z = 0.0;
    }
}
