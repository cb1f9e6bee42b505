//! Game module - hosts the deterministic run simulation
//!
//! The simulation steps in `FixedUpdate` at the sim tick rate. Everything
//! Bevy draws is a mirror of its state.

use bevy::prelude::*;

use skyflap::game::display::TextDisplay;
use skyflap::game::events::GameEventData;
use skyflap::game::world::ArcadeWorld;
use skyflap::{GameConfig, RunState, Scene};

use crate::Phase;

pub mod components;
pub mod player;
pub mod visuals;

pub use components::*;
pub use player::*;
pub use visuals::*;

/// Env var naming a JSON config file
const CONFIG_ENV: &str = "SKYFLAP_CONFIG";

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Resources
            .insert_resource(SimScene::from_env())
            .init_resource::<PendingInput>()

            // Scenery
            .add_systems(Startup, spawn_scenery)

            // Key edges every rendered frame
            .add_systems(Update, capture_input)

            // Simulation (fixed timestep for determinism)
            .add_systems(FixedUpdate, step_simulation)

            // Mirror sim bodies after any fixed steps this frame
            .add_systems(Update, sync_body_sprites.after(capture_input));
    }
}

// ============================================================================
// RESOURCES
// ============================================================================

/// The running simulation
#[derive(Resource)]
pub struct SimScene(pub Scene<ArcadeWorld, TextDisplay>);

impl SimScene {
    /// Scene from `SKYFLAP_CONFIG` (or defaults) with a fresh random seed
    pub fn from_env() -> Self {
        let config = match std::env::var(CONFIG_ENV) {
            Ok(path) => GameConfig::load(&path).unwrap_or_else(|e| {
                warn!("Ignoring config {}: {}", path, e);
                GameConfig::default()
            }),
            Err(_) => GameConfig::default(),
        };

        let seed = rand::random::<u64>();
        info!("Skyflap run seed: {}", seed);
        Self(Scene::headless(config, seed))
    }
}

// ============================================================================
// SIMULATION
// ============================================================================

/// Advance the sim one frame with the queued key edges
fn step_simulation(
    mut scene: ResMut<SimScene>,
    mut pending: ResMut<PendingInput>,
    phase: Res<State<Phase>>,
    mut next_phase: ResMut<NextState<Phase>>,
) {
    let result = scene.0.step(pending.take());

    for event in &result.events {
        match &event.data {
            GameEventData::RunStarted => info!("Run started"),
            GameEventData::Scored { score, .. } => info!("Score: {}", score),
            GameEventData::GameOver { final_score, landed, bumped } => {
                info!(
                    "Game over! Final score {} (landed: {}, bumped: {})",
                    final_score, landed, bumped
                );
            }
            GameEventData::Restarted => info!("Run restarted"),
            _ => {}
        }
    }

    let current = Phase::from(scene.0.run().state());
    if current != *phase.get() {
        next_phase.set(current);
    }
}

impl From<RunState> for Phase {
    fn from(state: RunState) -> Self {
        match state {
            RunState::Idle => Phase::Idle,
            RunState::Active => Phase::Active,
            RunState::GameOver => Phase::GameOver,
        }
    }
}
