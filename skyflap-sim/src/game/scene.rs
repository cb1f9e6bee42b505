//! Frame Driver
//!
//! `Scene` is the per-frame entry point hosts call. It routes key edges to
//! the run state machine, owns the obstacle spawn timer, steps the world and
//! forwards its contacts, then runs the run's tick.

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::game::config::GameConfig;
use crate::game::display::{DisplaySink, TextDisplay};
use crate::game::events::GameEvent;
use crate::game::input::{InputEvent, InputFrame};
use crate::game::run::GameRunState;
use crate::game::schedule::PeriodicTimer;
use crate::game::state::{PairId, RunState};
use crate::game::world::{ArcadeWorld, PhysicsWorld};

/// Result of one frame.
#[derive(Debug, Default)]
pub struct FrameResult {
    /// Frame number (starts at 1)
    pub frame: u32,
    /// Events generated this frame
    pub events: Vec<GameEvent>,
    /// Pair spawned this frame, if the timer fired
    pub spawned: Option<PairId>,
    /// Whether the run is over after this frame
    pub game_over: bool,
}

/// A run plus the timer that feeds it obstacles.
pub struct Scene<W, D> {
    run: GameRunState<W, D>,
    spawn_timer: PeriodicTimer,
    frame: u32,
}

impl Scene<ArcadeWorld, TextDisplay> {
    /// Scene backed by the built-in world and an in-memory display.
    pub fn headless(config: GameConfig, rng_seed: u64) -> Self {
        let world = ArcadeWorld::new(&config);
        Self::new(GameRunState::new(config, world, TextDisplay::new(), rng_seed))
    }
}

impl<W: PhysicsWorld, D: DisplaySink> Scene<W, D> {
    /// Wrap a run. The spawn timer loops at the configured interval.
    pub fn new(run: GameRunState<W, D>) -> Self {
        let spawn_timer = PeriodicTimer::new(run.config().spawn_interval_ticks(), true);
        Self {
            run,
            spawn_timer,
            frame: 0,
        }
    }

    /// Advance one frame.
    ///
    /// Order: key edges, spawn timer, world step with contacts forwarded,
    /// run tick. The spawn timer keeps counting while the world is paused.
    pub fn step(&mut self, input: InputFrame) -> FrameResult {
        self.frame += 1;

        for event in input.events() {
            self.dispatch(event);
        }

        let spawned = if self.spawn_timer.advance() {
            Some(self.run.on_spawn_tick())
        } else {
            None
        };

        let contacts = self.run.world_mut().step();
        for contact in contacts {
            self.run.on_collision(contact.kind);
        }

        self.run.tick();

        #[cfg(feature = "debug-tracing")]
        trace!(
            "Frame {} hash {}",
            self.frame,
            hex::encode(self.run.compute_hash())
        );

        FrameResult {
            frame: self.frame,
            events: self.run.take_events(),
            spawned,
            game_over: self.run.state() == RunState::GameOver,
        }
    }

    /// Route one key edge by run phase. Returns true if it had an effect.
    ///
    /// The start key starts an idle run and flaps during an active one.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::StartPressed => match self.run.state() {
                RunState::Idle => self.run.on_start_input(),
                RunState::Active => self.run.on_flap_input(),
                RunState::GameOver => false,
            },
            InputEvent::RestartPressed => self.run.on_restart_input(),
        }
    }

    /// The run being driven.
    pub fn run(&self) -> &GameRunState<W, D> {
        &self.run
    }

    /// The run being driven, mutably.
    pub fn run_mut(&mut self) -> &mut GameRunState<W, D> {
        &mut self.run
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Obstacle spawn timer.
    pub fn spawn_timer(&self) -> &PeriodicTimer {
        &self.spawn_timer
    }
}
