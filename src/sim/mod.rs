//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (owned by the spawner)
//! - No rendering or platform dependencies

pub mod spawner;
pub mod state;
pub mod tick;

pub use spawner::{Lane, Spawner};
pub use state::{
    Direction, GameEvent, GamePhase, GameState, SceneRequest, Train, TrainKind, TrainState,
};
pub use tick::{TickInput, tick};
