//! Skyflap Simulation Demo
//!
//! Plays a headless session with a simple autopilot, then replays the
//! recorded input and checks that the state hashes match.
//!
//! Usage: `skyflap-sim [config.json]`

use std::env;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use skyflap::{
    core::fixed::{from_int, to_int},
    game::{
        events::{GameEvent, GameEventData},
        replay::{replay_run, Replay},
        state::ObstacleRole,
        world::ArcadeWorld,
        display::TextDisplay,
    },
    GameConfig, InputFrame, RunState, Scene, TICK_RATE, VERSION,
};

/// Two minutes at 60 Hz
const DEMO_FRAMES: u32 = 120 * TICK_RATE;

const DEMO_SEED: u64 = 12345;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Skyflap Sim v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = match env::args().nth(1) {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => GameConfig::default(),
    };

    demo_session(config)
}

/// Pick this frame's input from the current state.
///
/// Starts idle runs, restarts ended ones, and flaps whenever the player
/// sinks below the middle of the next gap.
fn autopilot(scene: &Scene<ArcadeWorld, TextDisplay>) -> InputFrame {
    let run = scene.run();
    match run.state() {
        RunState::Idle => return InputFrame::start(),
        RunState::GameOver => return InputFrame::restart(),
        RunState::Active => {}
    }

    let world = run.world();
    let Some(player) = world.body(run.player()) else {
        return InputFrame::new();
    };

    let quarter_gap = from_int(run.config().gap) / 4;
    let reach = from_int(run.config().obstacle_width / 2 + run.config().player_half_width);
    let gap_center = run
        .obstacles()
        .iter()
        .filter(|r| r.role == ObstacleRole::Bottom)
        .filter_map(|r| world.body(r.entity))
        .find(|b| b.position.x + reach > player.position.x)
        .map(|b| b.position.y - quarter_gap)
        .unwrap_or(from_int(run.config().world_height / 2));

    let threshold = gap_center + from_int(15);
    if player.position.y > threshold && player.velocity.y >= 0 {
        InputFrame::start()
    } else {
        InputFrame::new()
    }
}

/// Play, record, then verify by replaying.
fn demo_session(config: GameConfig) -> Result<()> {
    info!("=== Starting Demo Session ===");
    info!("RNG Seed: {}", DEMO_SEED);

    let mut scene = Scene::headless(config.clone(), DEMO_SEED);
    let mut replay = Replay::new(DEMO_SEED, config);

    let mut live_events: Vec<GameEvent> = Vec::new();
    let mut runs = 0;
    let mut best_score = 0;

    info!("Running {} frames...", DEMO_FRAMES);

    for _ in 0..DEMO_FRAMES {
        let input = autopilot(&scene);
        replay.record(input);

        let result = scene.step(input);

        for event in &result.events {
            match &event.data {
                GameEventData::Scored { pair, score } => {
                    debug!("Frame {}: pair {} passed, score {}", result.frame, pair, score);
                }
                GameEventData::GameOver { final_score, .. } => {
                    runs += 1;
                    best_score = best_score.max(*final_score);
                }
                _ => {}
            }
        }
        live_events.extend(result.events);

        // Report every 10 seconds
        if result.frame % (10 * TICK_RATE) == 0 {
            let run = scene.run();
            let height = run
                .world()
                .body(run.player())
                .map(|b| to_int(b.position.y))
                .unwrap_or_default();
            info!(
                "Frame {}: {} (score {}), {} obstacles, player at y={}, {} events so far",
                result.frame,
                run.state().name(),
                run.score(),
                run.obstacles().len(),
                height,
                live_events.len()
            );
        }
    }

    // Print final results
    info!("=== Session Results ===");
    let hash = scene.run().compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Runs finished: {}, best score: {}", runs, best_score);
    info!("Total events: {}", live_events.len());

    // Verify determinism by replaying the recorded input
    info!("=== Verifying Determinism ===");
    let bytes = replay.to_bytes().context("failed to encode replay")?;
    info!(
        "Replay: {} frames, {} input frames stored, {} bytes",
        replay.len(),
        replay.frames.deltas().len(),
        bytes.len()
    );

    let decoded = Replay::from_bytes(&bytes).context("failed to decode replay")?;
    let outcome = replay_run(&decoded);
    info!("Replay State Hash: {}", hex::encode(outcome.final_hash));

    if outcome.final_hash != hash {
        bail!(
            "determinism failure: live {} vs replay {}",
            hex::encode(hash),
            hex::encode(outcome.final_hash)
        );
    }
    if outcome.events != live_events {
        bail!(
            "determinism failure: {} live events vs {} replayed, first divergence at {:?}",
            live_events.len(),
            outcome.events.len(),
            live_events.iter().zip(&outcome.events).position(|(a, b)| a != b)
        );
    }

    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
