//! Game state and core simulation types
//!
//! Session clock, scoring, and the train arena live here. The spawn
//! scheduler keeps only weak ids into `GameState::trains`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Train categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainKind {
    /// Rare character A (at most one on screen)
    CharA,
    /// Rare character B (at most one on screen)
    CharB,
    /// Both characters on one train (counts as A and B for uniqueness)
    Mixed,
    /// Filler train; tapping it costs time
    Dummy,
}

impl TrainKind {
    /// Points awarded for tapping this kind (0 for Dummy)
    pub fn points(&self) -> u32 {
        match self {
            TrainKind::CharA | TrainKind::CharB => POINTS_SINGLE,
            TrainKind::Mixed => POINTS_MIXED,
            TrainKind::Dummy => 0,
        }
    }

    /// Whether this kind occupies the "A on screen" uniqueness slot
    pub fn covers_a(&self) -> bool {
        matches!(self, TrainKind::CharA | TrainKind::Mixed)
    }

    /// Whether this kind occupies the "B on screen" uniqueness slot
    pub fn covers_b(&self) -> bool {
        matches!(self, TrainKind::CharB | TrainKind::Mixed)
    }
}

/// Travel direction along a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Spawned on the left side, moving right
    Rightward,
    /// Spawned on the right side, moving left
    Leftward,
}

impl Direction {
    /// Unit travel vector
    pub fn as_vec(&self) -> Vec2 {
        match self {
            Direction::Rightward => Vec2::X,
            Direction::Leftward => -Vec2::X,
        }
    }
}

/// Train lifecycle
///
/// Cleared trains keep moving so lane distance gating stays valid; only
/// interaction is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainState {
    Active,
    /// Tapped; no longer interactive, still in motion
    Cleared,
}

/// A train entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id: u32,
    pub kind: TrainKind,
    pub direction: Direction,
    pub pos: Vec2,
    /// Lane spawn point this train was created at; distance gating
    /// measures travel from here
    pub spawn_anchor: Vec2,
    pub state: TrainState,
}

impl Train {
    pub fn new(id: u32, kind: TrainKind, direction: Direction, anchor: Vec2) -> Self {
        Self {
            id,
            kind,
            direction,
            pos: anchor,
            spawn_anchor: anchor,
            state: TrainState::Active,
        }
    }

    /// Advance position one timestep. Runs identically for Active and
    /// Cleared trains.
    pub fn advance(&mut self, dt: f32, base_speed: f32, multiplier: f32) {
        self.pos += self.direction.as_vec() * base_speed * multiplier * dt;
    }

    /// Distance traveled from the spawn anchor along the lane axis
    pub fn traveled(&self) -> f32 {
        (self.pos.x - self.spawn_anchor.x).abs()
    }

    /// Whether a tap at `point` lands on this train's hit region
    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.pos.x).abs() <= TRAIN_HIT_HALF_WIDTH
            && (point.y - self.pos.y).abs() <= TRAIN_HIT_HALF_HEIGHT
    }

    pub fn is_active(&self) -> bool {
        self.state == TrainState::Active
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Countdown running, input live
    Playing,
    /// Countdown hit zero; terminal
    GameOver,
}

/// Scene replacement requested from the scene-lifecycle collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneRequest {
    Title,
}

/// Outward-facing events drained by the presentation layer each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A scoring train was tapped; play the "correct" cue and gray it out
    CorrectTap { id: u32, kind: TrainKind, points: u32 },
    /// A Dummy was tapped; play the "wrong" cue and gray it out
    WrongTap { id: u32 },
    /// Countdown expired
    GameOver { score: u32 },
    /// One-shot request issued 3 seconds after game over (or via Back)
    SceneChange(SceneRequest),
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    /// Countdown seconds; may dip below zero within a frame, clamped on
    /// the next clock update and by `display_time`
    pub time_left: f32,
    /// Accumulated play time (stops at game over)
    pub elapsed: f32,
    /// Difficulty speed multiplier, recomputed from `elapsed`
    pub speed_multiplier: f32,
    /// All on-screen trains, ordered by spawn (ids ascending)
    pub trains: Vec<Train>,
    /// Pending one-shot scene change; keeps counting after game over
    scene_timer: Option<f32>,
    /// Events since the last drain (presentation only, not state)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        log::info!(
            "Session start: seed={seed}, countdown={:.1}s, lanes={}",
            tuning.initial_time,
            tuning.lane_count()
        );
        Self {
            seed,
            phase: GamePhase::Playing,
            score: 0,
            time_left: tuning.initial_time,
            elapsed: 0.0,
            speed_multiplier: 1.0,
            trains: Vec::new(),
            scene_timer: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Liveness lookup for the scheduler's weak lane references
    pub fn train(&self, id: u32) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    /// Countdown value for display: clamped at zero
    pub fn display_time(&self) -> f32 {
        self.time_left.max(0.0)
    }

    /// Advance the session clock one timestep.
    ///
    /// After game over only the pending scene-change timer keeps running;
    /// it is non-cancelable and fires exactly once.
    pub fn update_clock(&mut self, dt: f32) {
        if let Some(t) = &mut self.scene_timer {
            *t -= dt;
            if *t <= 0.0 {
                self.scene_timer = None;
                self.events.push(GameEvent::SceneChange(SceneRequest::Title));
            }
        }

        if self.phase == GamePhase::GameOver {
            return;
        }

        self.time_left -= dt;
        self.elapsed += dt;
        self.speed_multiplier = 1.0 + self.elapsed / DIFFICULTY_STEP_SECS * DIFFICULTY_STEP_GAIN;

        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.enter_game_over();
        }
    }

    fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.scene_timer = Some(SCENE_CHANGE_DELAY);
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("Game over: score={}, survived {:.1}s", self.score, self.elapsed);
    }

    /// Award points and extend the countdown. No-op after game over.
    pub fn add_score(&mut self, amount: u32, time_bonus: f32) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.score += amount;
        self.time_left += time_bonus;
    }

    /// Shorten the countdown. No-op after game over. The value may go
    /// negative here; the next clock update clamps and ends the session.
    pub fn apply_penalty(&mut self, time_penalty: f32) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.time_left -= time_penalty;
    }

    /// Resolve a tap at screen position `point`.
    ///
    /// Ignored after game over and on already-cleared trains. Returns
    /// whether any train consumed the tap.
    pub fn tap(&mut self, point: Vec2) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }

        // Newest train wins when hit regions overlap
        let hit = self
            .trains
            .iter()
            .rposition(|t| t.is_active() && t.contains(point));
        let Some(idx) = hit else {
            return false;
        };

        let (id, kind) = (self.trains[idx].id, self.trains[idx].kind);
        match kind {
            TrainKind::Dummy => {
                self.apply_penalty(DUMMY_PENALTY);
                self.events.push(GameEvent::WrongTap { id });
            }
            _ => {
                let points = kind.points();
                self.add_score(points, TAP_TIME_BONUS);
                self.events.push(GameEvent::CorrectTap { id, kind, points });
            }
        }
        self.trains[idx].state = TrainState::Cleared;
        true
    }

    /// Hand the accumulated events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn state() -> GameState {
        GameState::new(7, &Tuning::default())
    }

    fn spawn(state: &mut GameState, kind: TrainKind) -> u32 {
        let id = state.next_entity_id();
        state
            .trains
            .push(Train::new(id, kind, Direction::Rightward, Vec2::new(-200.0, 300.0)));
        id
    }

    #[test]
    fn test_countdown_expires_to_game_over() {
        let mut state = state();
        assert_eq!(state.time_left, 30.0);

        // 30 seconds of inactivity
        let steps = (30.0 / SIM_DT).ceil() as u32 + 1;
        for _ in 0..steps {
            state.update_clock(SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.display_time(), 0.0);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { score: 0 })));
    }

    #[test]
    fn test_difficulty_ramp() {
        let mut state = state();
        assert_eq!(state.speed_multiplier, 1.0);

        // ~10 seconds of play (taps keep the countdown alive)
        for _ in 0..(10.0 / SIM_DT) as u32 {
            state.add_score(0, SIM_DT);
            state.update_clock(SIM_DT);
        }
        assert!((state.speed_multiplier - 1.1).abs() < 1e-3);
        assert_eq!(state.phase, GamePhase::Playing);

        // Multiplier never decreases
        let before = state.speed_multiplier;
        state.update_clock(SIM_DT);
        assert!(state.speed_multiplier >= before);
    }

    #[test]
    fn test_tap_char_a_scores_once() {
        let mut state = state();
        let id = spawn(&mut state, TrainKind::CharA);
        let point = Vec2::new(-200.0, 300.0);

        assert!(state.tap(point));
        assert_eq!(state.score, 100);
        assert_eq!(state.time_left, 31.0);

        // Repeat tap is an idempotent no-op
        assert!(!state.tap(point));
        assert_eq!(state.score, 100);
        assert_eq!(state.time_left, 31.0);

        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::CorrectTap {
                id,
                kind: TrainKind::CharA,
                points: 100
            }]
        );
    }

    #[test]
    fn test_tap_mixed_scores_triple() {
        let mut state = state();
        spawn(&mut state, TrainKind::Mixed);
        assert!(state.tap(Vec2::new(-200.0, 300.0)));
        assert_eq!(state.score, 300);
    }

    #[test]
    fn test_tap_dummy_penalizes_without_scoring() {
        let mut state = state();
        spawn(&mut state, TrainKind::Dummy);
        assert!(state.tap(Vec2::new(-200.0, 300.0)));
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 25.0);
    }

    #[test]
    fn test_penalty_can_push_countdown_negative() {
        let mut state = state();
        state.time_left = 2.0;
        spawn(&mut state, TrainKind::Dummy);
        state.tap(Vec2::new(-200.0, 300.0));

        assert!(state.time_left < 0.0);
        assert_eq!(state.display_time(), 0.0);

        state.update_clock(SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_left, 0.0);
    }

    #[test]
    fn test_score_frozen_after_game_over() {
        let mut state = state();
        state.time_left = SIM_DT / 2.0;
        state.update_clock(SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.add_score(100, 1.0);
        state.apply_penalty(5.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 0.0);

        spawn(&mut state, TrainKind::CharA);
        assert!(!state.tap(Vec2::new(-200.0, 300.0)));
    }

    #[test]
    fn test_scene_change_fires_once_after_delay() {
        let mut state = state();
        state.time_left = SIM_DT / 2.0;
        state.update_clock(SIM_DT);
        state.drain_events();

        // Just under 3 seconds: nothing yet
        let steps = (3.0 / SIM_DT) as u32 - 1;
        for _ in 0..steps {
            state.update_clock(SIM_DT);
        }
        assert!(state.events.is_empty());

        // Crossing the delay emits the request exactly once
        state.update_clock(SIM_DT);
        state.update_clock(SIM_DT);
        let changes = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::SceneChange(SceneRequest::Title)))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_cleared_train_keeps_moving() {
        let mut state = state();
        spawn(&mut state, TrainKind::Dummy);
        state.tap(Vec2::new(-200.0, 300.0));
        assert_eq!(state.trains[0].state, TrainState::Cleared);

        let before = state.trains[0].pos.x;
        state.trains[0].advance(SIM_DT, 1600.0, 1.0);
        assert!(state.trains[0].pos.x > before);
        assert!(state.trains[0].traveled() > 0.0);
    }

    #[test]
    fn test_newest_train_wins_overlapping_taps() {
        let mut state = state();
        let _older = spawn(&mut state, TrainKind::Dummy);
        let newer = spawn(&mut state, TrainKind::CharA);

        state.tap(Vec2::new(-200.0, 300.0));
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::CorrectTap { id, .. } if id == newer));
    }
}
