//! Fixed timestep frame update
//!
//! One call per simulation step. Ordering contract: the session clock is
//! updated before anything consults the game-over flag or the difficulty
//! multiplier, and tap handling plus movement settle before the scheduler
//! reads lane distances.

use glam::Vec2;

use super::spawner::Spawner;
use super::state::{GameEvent, GameState, SceneRequest};
use crate::tuning::Tuning;

/// Input gathered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap positions delivered this frame (screen coordinates)
    pub taps: Vec<Vec2>,
    /// Explicit back-to-title request
    pub back: bool,
}

/// Advance the whole simulation by one fixed timestep
pub fn tick(state: &mut GameState, spawner: &mut Spawner, tuning: &Tuning, input: &TickInput, dt: f32) {
    state.update_clock(dt);

    if input.back {
        state.events.push(GameEvent::SceneChange(SceneRequest::Title));
    }

    for &tap in &input.taps {
        state.tap(tap);
    }

    // Movement halts entirely at game over; cleared trains keep moving
    // like active ones so lane gating stays truthful
    if !state.is_game_over() {
        let multiplier = state.speed_multiplier;
        for train in state.trains.iter_mut() {
            train.advance(dt, tuning.base_speed, multiplier);
        }
    }

    // Off-screen trains are destroyed from either lifecycle state; each
    // destruction is reported to the scheduler exactly once
    let (min_x, max_x) = tuning.despawn_bounds();
    let mut despawned = Vec::new();
    state.trains.retain(|t| {
        if t.pos.x < min_x || t.pos.x > max_x {
            despawned.push((t.id, t.kind));
            false
        } else {
            true
        }
    });
    for (id, kind) in despawned {
        log::debug!("Train {id} ({kind:?}) left the screen");
        spawner.note_despawn(kind);
    }

    spawner.update(state, tuning, dt);
}
