//! Rail Rush entry point
//!
//! Headless demo run: drives the fixed-timestep simulation with a simple
//! autoplayer standing in for the input collaborator, and prints the HUD
//! lines a presentation layer would render.

use rail_rush::consts::{MAX_SUBSTEPS, SIM_DT};
use rail_rush::sim::{GameEvent, GameState, Spawner, TickInput, TrainKind, tick};
use rail_rush::{HighScores, Tuning, format_time};

const TUNING_PATH: &str = "tuning.json";
const SCORES_PATH: &str = "rail_rush_scores.json";

/// How often the autoplayer taps (seconds of simulated time)
const AUTOTAP_INTERVAL: f32 = 0.4;

/// Hard cap on simulated time so the demo always terminates
const MAX_DEMO_SECS: f32 = 300.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xDECADE);

    let tuning = Tuning::load_or_default(TUNING_PATH);
    let mut state = GameState::new(seed, &tuning);
    let mut spawner = Spawner::new(tuning.lane_count(), seed);

    let mut sim_time = 0.0f32;
    let mut next_tap = AUTOTAP_INTERVAL;
    let mut next_hud = 1.0f32;
    let mut accumulator = 0.0f32;

    'demo: while sim_time < MAX_DEMO_SECS {
        // Frame pacing mirrors a 60 Hz presentation loop feeding 120 Hz sim
        accumulator += 1.0 / 60.0;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let mut input = TickInput::default();
            if sim_time >= next_tap {
                next_tap += AUTOTAP_INTERVAL;
                // Tap the first scoring train on screen, if any
                if let Some(train) = state
                    .trains
                    .iter()
                    .find(|t| t.is_active() && t.kind != TrainKind::Dummy)
                {
                    input.taps.push(train.pos);
                }
            }

            tick(&mut state, &mut spawner, &tuning, &input, SIM_DT);
            accumulator -= SIM_DT;
            sim_time += SIM_DT;
            substeps += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::CorrectTap { kind, points, .. } => {
                        println!("  * ding! {kind:?} +{points}");
                    }
                    GameEvent::WrongTap { .. } => println!("  * bzzt! dummy tapped"),
                    GameEvent::GameOver { score } => println!("== GAME OVER: {score} =="),
                    GameEvent::SceneChange(scene) => {
                        println!("-> scene change: {scene:?}");
                        break 'demo;
                    }
                }
            }
        }

        if sim_time >= next_hud {
            next_hud += 1.0;
            println!(
                "Score: {}  Time: {}  x{:.2}  trains: {}",
                state.score,
                format_time(state.display_time()),
                state.speed_multiplier,
                state.trains.len()
            );
        }
    }

    let mut scores = HighScores::load(SCORES_PATH);
    if let Some(rank) = scores.add_score(state.score, state.elapsed) {
        println!("New high score! Rank #{rank}");
        scores.save(SCORES_PATH);
    }
}
