//! Distance-gated spawn scheduler
//!
//! Polls lane occupancy at a fixed cadence and decides, per lane, whether
//! a new train may appear, what kind it should be, and whether it should
//! chain onto its predecessor. Gating is by travel distance rather than a
//! spawn timer, so spacing stays consistent as the difficulty multiplier
//! speeds trains up: faster trains clear the gap sooner and spawn
//! frequency rises on its own.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Direction, GameState, Train, TrainKind};
use crate::tuning::Tuning;

/// Per-lane scheduler bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lane {
    /// Most recent spawn in this lane. Weak: the arena owns the train and
    /// the id may no longer resolve.
    pub last_spawned: Option<u32>,
    /// Travel distance the last spawn must cover before the lane reopens.
    /// Zero at startup, so every lane begins available.
    pub required_gap: f32,
}

/// The spawn scheduler
///
/// Owns the lane tables and the active-rare flags; trains never touch
/// these directly. All randomness flows through one seeded RNG so a
/// session replays deterministically.
#[derive(Debug, Clone)]
pub struct Spawner {
    lanes: Vec<Lane>,
    a_on_screen: bool,
    b_on_screen: bool,
    accumulator: f32,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(lane_count: usize, seed: u64) -> Self {
        Self {
            lanes: vec![Lane::default(); lane_count],
            a_on_screen: false,
            b_on_screen: false,
            accumulator: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Advance the poll accumulator and run any due polls
    pub fn update(&mut self, state: &mut GameState, tuning: &Tuning, dt: f32) {
        if tuning.check_interval <= 0.0 {
            return;
        }
        self.accumulator += dt;
        while self.accumulator >= tuning.check_interval {
            self.accumulator -= tuning.check_interval;
            self.poll(state, tuning);
        }
    }

    /// One scheduler poll: scan availability, pick a lane and kind, spawn
    fn poll(&mut self, state: &mut GameState, tuning: &Tuning) {
        if state.is_game_over() {
            return;
        }
        if self.lanes.is_empty() || tuning.lane_count() == 0 {
            return;
        }

        let available = self.available_lanes(state, tuning);
        if available.is_empty() {
            return;
        }
        let lane_idx = available[self.rng.random_range(0..available.len())];

        let Some(kind) = self.decide_next_kind() else {
            return;
        };

        let connected = self.rng.random_bool(tuning.chain_chance.clamp(0.0, 1.0));

        self.spawn(state, tuning, lane_idx, kind, connected);
    }

    /// Lanes whose last spawn never happened, is gone, or has cleared its
    /// required gap. Lanes without a configured anchor pair never qualify.
    fn available_lanes(&self, state: &GameState, tuning: &Tuning) -> Vec<usize> {
        self.lanes
            .iter()
            .take(tuning.lane_count())
            .enumerate()
            .filter(|(_, lane)| match lane.last_spawned.and_then(|id| state.train(id)) {
                None => true,
                Some(train) => train.traveled() >= lane.required_gap,
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Weighted kind selection under the rare-uniqueness constraints.
    ///
    /// Dummy appears twice in the pool so it stays the dominant filler;
    /// each rare kind is only a candidate while absent from the screen,
    /// and Mixed only while both slots are free.
    fn decide_next_kind(&mut self) -> Option<TrainKind> {
        let mut candidates = vec![TrainKind::Dummy, TrainKind::Dummy];
        if !self.a_on_screen {
            candidates.push(TrainKind::CharA);
        }
        if !self.b_on_screen {
            candidates.push(TrainKind::CharB);
        }
        if !self.a_on_screen && !self.b_on_screen {
            candidates.push(TrainKind::Mixed);
        }
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.rng.random_range(0..candidates.len())])
    }

    fn spawn(
        &mut self,
        state: &mut GameState,
        tuning: &Tuning,
        lane_idx: usize,
        kind: TrainKind,
        connected: bool,
    ) {
        // Directional continuity: while the previous train is still on
        // screen the newcomer chases it from the same side, so the lane
        // reads as one continuous stream.
        let direction = match self.lanes[lane_idx]
            .last_spawned
            .and_then(|id| state.train(id))
        {
            Some(prev) => prev.direction,
            None => {
                if self.rng.random_bool(0.5) {
                    Direction::Rightward
                } else {
                    Direction::Leftward
                }
            }
        };
        let anchor = match direction {
            Direction::Rightward => tuning.left_anchors[lane_idx],
            Direction::Leftward => tuning.right_anchors[lane_idx],
        };

        let id = state.next_entity_id();
        state.trains.push(Train::new(id, kind, direction, anchor));

        if kind.covers_a() {
            self.a_on_screen = true;
        }
        if kind.covers_b() {
            self.b_on_screen = true;
        }

        let lane = &mut self.lanes[lane_idx];
        lane.last_spawned = Some(id);
        lane.required_gap = if connected {
            tuning.connected_gap
        } else {
            tuning.standard_gap
        };

        log::debug!(
            "Spawned {kind:?} (id {id}) in lane {lane_idx} going {direction:?}, next gap {:.0}",
            lane.required_gap
        );
    }

    /// A train left the screen; free its uniqueness slot(s). Called exactly
    /// once per destroyed train by the frame tick.
    pub fn note_despawn(&mut self, kind: TrainKind) {
        if kind.covers_a() {
            self.a_on_screen = false;
        }
        if kind.covers_b() {
            self.b_on_screen = false;
        }
    }

    /// Rare kinds currently holding a uniqueness slot
    pub fn rare_flags(&self) -> (bool, bool) {
        (self.a_on_screen, self.b_on_screen)
    }
}
