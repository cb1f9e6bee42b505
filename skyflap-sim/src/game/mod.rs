//! Game Logic Module
//!
//! All run simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `config`: Run tunables and config file loading
//! - `state`: Run phase, cause flags, obstacle records
//! - `input`: Key edges, per-frame input, recordings
//! - `events`: Run events for logging and replay verification
//! - `collision`: Axis-aligned box tests
//! - `world`: Physics contract and the built-in arcade world
//! - `display`: Text output contract and an in-memory display
//! - `schedule`: Tick-based periodic timers
//! - `run`: The run state machine
//! - `scene`: Per-frame driver
//! - `replay`: Recorded runs and deterministic re-execution

pub mod config;
pub mod state;
pub mod input;
pub mod events;
pub mod collision;
pub mod world;
pub mod display;
pub mod schedule;
pub mod run;
pub mod scene;
pub mod replay;

// Re-export key types
pub use config::{ConfigError, GameConfig};
pub use state::{CauseFlags, ContactKind, EntityId, ObstacleRecord, ObstacleRole, PairId, RunState, Tint};
pub use input::{InputEvent, InputFrame, InputRecording, RecordingError};
pub use events::{GameEvent, GameEventData};
pub use world::{ArcadeWorld, Body, BodyKind, Contact, ObstacleSpawn, PhysicsWorld};
pub use display::{DisplaySink, MessageStyle, TextDisplay};
pub use schedule::PeriodicTimer;
pub use run::GameRunState;
pub use scene::{FrameResult, Scene};
pub use replay::{replay_run, Replay, ReplayError, ReplayOutcome};
