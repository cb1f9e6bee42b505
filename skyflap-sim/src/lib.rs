//! # Skyflap Simulation
//!
//! Deterministic run simulation for Skyflap, a side-scrolling flap-through-
//! the-gap game. Hosts feed key edges in and render the world and texts out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SKYFLAP SIM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Run logic (deterministic)                 │
//! │  ├── config.rs   - Tunables and config loading               │
//! │  ├── state.rs    - Run phase, causes, obstacle records       │
//! │  ├── input.rs    - Key edges and recordings                  │
//! │  ├── world.rs    - PhysicsWorld trait and ArcadeWorld        │
//! │  ├── display.rs  - DisplaySink trait and TextDisplay         │
//! │  ├── run.rs      - GameRunState (the state machine)          │
//! │  ├── scene.rs    - Per-frame driver and spawn timer          │
//! │  └── replay.rs   - Recorded runs and re-execution            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given the same seed, config and input frames, a run reaches the same
//! state hash on every platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::rng::DeterministicRng;
pub use game::config::{ConfigError, GameConfig};
pub use game::input::{InputEvent, InputFrame};
pub use game::run::GameRunState;
pub use game::scene::{FrameResult, Scene};
pub use game::state::RunState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
