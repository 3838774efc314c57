//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies
//!
//! Hosts drive it through [`GameSession`] and read results from
//! [`Snapshot`] and [`FrameReport`].

pub mod buffs;
pub mod clock;
pub mod collision;
pub mod events;
pub mod movement;
pub mod player;
pub mod registry;
pub mod session;
pub mod spawn;
pub mod stage;
pub mod state;

pub use buffs::ActiveBuffs;
pub use clock::{GameClock, TimerFire, TimerKind};
pub use collision::{CollisionReport, Consumed, Hit};
pub use events::{AudioCue, FrameReport, VisualEvent};
pub use player::{Intent, Player};
pub use registry::{EntityKind, EntityRegistry, RemovalSet};
pub use session::{GameSession, SessionConfig, Snapshot};
pub use state::{Enemy, EntityId, GamePhase, GameState, ItemKind, Pickup, Projectile};
