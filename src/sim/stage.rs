//! Stage progression
//!
//! A stage is one road length. Finishing it wipes the entity world, moves the
//! player back to the start line and raises the difficulty.

use super::player::Player;
use super::registry::EntityRegistry;
use super::state::GameState;
use crate::tuning::Tuning;

/// True once the player has covered the full road length
pub fn reached_end(player: &Player, tuning: &Tuning) -> bool {
    player.distance_traveled() >= tuning.road_length
}

/// Check for and apply a stage clear. Returns the new stage number if one
/// happened. Never fires once the run is over.
pub fn run(
    state: &mut GameState,
    player: &mut Player,
    registry: &mut EntityRegistry,
    tuning: &Tuning,
) -> Option<u32> {
    if state.is_game_over || !reached_end(player, tuning) {
        return None;
    }

    player.reset_distance();
    state.stage += 1;
    state.add_score(tuning.stage_clear_bonus);
    registry.clear();

    log::info!(
        "Stage {} cleared, entering stage {} (score {})",
        state.stage - 1,
        state.stage,
        state.score
    );
    Some(state.stage)
}
