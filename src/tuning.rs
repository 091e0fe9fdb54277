//! Data-driven game balance
//!
//! All knobs the simulation consumes are gathered here so a session can be
//! tuned from a JSON file without touching code. Values are fixed for the
//! lifetime of a session once loaded.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Balance and layout parameters for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Base train speed in pixels/second (before the difficulty multiplier)
    pub base_speed: f32,
    /// Travel distance a train must cover before its lane reopens (pixels)
    pub standard_gap: f32,
    /// Short reopen distance used when a spawn signals a connected follow-up
    pub connected_gap: f32,
    /// Spawn scheduler poll interval (seconds)
    pub check_interval: f32,
    /// Starting countdown (seconds)
    pub initial_time: f32,
    /// Probability that a spawn signals a connected follow-up.
    /// Currently shipped at 0.0; the machinery stays live so the pair
    /// visual can be re-enabled from data.
    pub chain_chance: f64,
    /// Spawn anchors for rightward-moving trains, one per lane
    pub left_anchors: Vec<Vec2>,
    /// Spawn anchors for leftward-moving trains, one per lane
    pub right_anchors: Vec<Vec2>,
    /// Extra distance past the far anchor before a train despawns (pixels)
    pub despawn_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 1600.0,
            standard_gap: 2160.0,
            connected_gap: 360.0,
            check_interval: 0.1,
            initial_time: 30.0,
            chain_chance: 0.0,
            left_anchors: vec![
                Vec2::new(-200.0, 300.0),
                Vec2::new(-200.0, 600.0),
                Vec2::new(-200.0, 900.0),
            ],
            right_anchors: vec![
                Vec2::new(2120.0, 300.0),
                Vec2::new(2120.0, 600.0),
                Vec2::new(2120.0, 900.0),
            ],
            despawn_margin: 64.0,
        }
    }
}

impl Tuning {
    /// Number of configured lanes (anchor arrays are parallel)
    pub fn lane_count(&self) -> usize {
        self.left_anchors.len().min(self.right_anchors.len())
    }

    /// Horizontal bounds outside which a train is considered off screen
    pub fn despawn_bounds(&self) -> (f32, f32) {
        let min_x = self
            .left_anchors
            .iter()
            .map(|a| a.x)
            .fold(f32::INFINITY, f32::min);
        let max_x = self
            .right_anchors
            .iter()
            .map(|a| a.x)
            .fold(f32::NEG_INFINITY, f32::max);
        (min_x - self.despawn_margin, max_x + self.despawn_margin)
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.as_ref().display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {e}", path.as_ref().display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file, using defaults");
                Self::default()
            }
        }
    }
}
