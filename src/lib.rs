//! Rail Rush - a lane-based train-tapping arcade minigame
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session clock, trains, spawn scheduler)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Local leaderboard persistence

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Points for tapping a single-character train (CharA or CharB)
    pub const POINTS_SINGLE: u32 = 100;
    /// Points for tapping a Mixed train
    pub const POINTS_MIXED: u32 = 300;
    /// Seconds added to the countdown on a correct tap
    pub const TAP_TIME_BONUS: f32 = 1.0;
    /// Seconds removed from the countdown for tapping a Dummy
    pub const DUMMY_PENALTY: f32 = 5.0;

    /// Speed multiplier gain per difficulty step (+10%)
    pub const DIFFICULTY_STEP_GAIN: f32 = 0.1;
    /// Seconds of play per difficulty step
    pub const DIFFICULTY_STEP_SECS: f32 = 10.0;

    /// Delay between game over and the scene-change request (seconds)
    pub const SCENE_CHANGE_DELAY: f32 = 3.0;

    /// Train hit region half-extents (pixels)
    pub const TRAIN_HIT_HALF_WIDTH: f32 = 160.0;
    pub const TRAIN_HIT_HALF_HEIGHT: f32 = 60.0;
}

/// Format a countdown value for the HUD (one decimal, never below zero)
#[inline]
pub fn format_time(secs: f32) -> String {
    format!("{:.1}", secs.max(0.0))
}
