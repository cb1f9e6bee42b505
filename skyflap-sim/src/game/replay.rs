//! Replays
//!
//! A replay is everything needed to reproduce a run exactly: the RNG seed,
//! the config and the recorded input frames. Replaying it on a fresh
//! headless scene must reproduce the same final state hash.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::StateHash;
use crate::game::config::{ConfigError, GameConfig};
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, InputRecording, RecordingError};
use crate::game::scene::Scene;
use crate::game::state::RunState;

/// Replay encoding errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Binary encoding failed.
    #[error("failed to encode replay: {0}")]
    Encode(bincode::Error),
    /// Binary decoding failed.
    #[error("failed to decode replay: {0}")]
    Decode(bincode::Error),
    /// JSON encoding or decoding failed.
    #[error("replay json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The embedded config does not validate.
    #[error("replay carries an unusable config: {0}")]
    Config(#[from] ConfigError),
    /// The embedded input recording would skip frames on replay.
    #[error("replay carries a corrupt input recording: {0}")]
    Recording(#[from] RecordingError),
}

/// A recorded run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// RNG seed the run started from
    pub seed: u64,
    /// Tunables the run used
    pub config: GameConfig,
    /// Input, one entry per frame (sparse)
    pub frames: InputRecording,
}

impl Replay {
    /// Empty replay.
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            seed,
            config,
            frames: InputRecording::new(),
        }
    }

    /// Append the next frame's input.
    pub fn record(&mut self, frame: InputFrame) {
        self.frames.push(frame);
    }

    /// Number of frames recorded.
    pub fn len(&self) -> u32 {
        self.frames.frame_count
    }

    /// No frames recorded?
    pub fn is_empty(&self) -> bool {
        self.frames.frame_count == 0
    }

    /// Compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        bincode::serialize(self).map_err(ReplayError::Encode)
    }

    /// Decode the binary form and validate it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        let replay: Replay = bincode::deserialize(bytes).map_err(ReplayError::Decode)?;
        replay.validate()?;
        Ok(replay)
    }

    /// Human-readable form.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode the JSON form and validate it.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let replay: Replay = serde_json::from_str(json)?;
        replay.validate()?;
        Ok(replay)
    }

    fn validate(&self) -> Result<(), ReplayError> {
        self.config.validate()?;
        self.frames.validate()?;
        Ok(())
    }
}

/// What replaying a run produced.
#[derive(Debug)]
pub struct ReplayOutcome {
    /// State hash after the last frame
    pub final_hash: StateHash,
    /// Every event, in frame order
    pub events: Vec<GameEvent>,
    /// Score after the last frame
    pub score: u32,
    /// Phase after the last frame
    pub state: RunState,
}

/// Run a replay on a fresh headless scene.
pub fn replay_run(replay: &Replay) -> ReplayOutcome {
    let mut scene = Scene::headless(replay.config.clone(), replay.seed);
    let mut events = Vec::new();

    for frame in replay.frames.replay_iter() {
        events.extend(scene.step(frame).events);
    }

    let run = scene.run();
    ReplayOutcome {
        final_hash: run.compute_hash(),
        events,
        score: run.score(),
        state: run.state(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Start, then flap every 20 frames, restart whenever the run ends.
    fn scripted(seed: u64, frames: u32) -> Replay {
        let mut replay = Replay::new(seed, GameConfig::default());
        let mut scene = Scene::headless(GameConfig::default(), seed);
        let mut over = false;

        for i in 0..frames {
            let input = if over {
                InputFrame::restart()
            } else if i % 20 == 0 {
                InputFrame::start()
            } else {
                InputFrame::new()
            };
            replay.record(input);
            over = scene.step(input).game_over;
        }
        replay
    }

    #[test]
    fn test_replay_is_deterministic() {
        let replay = scripted(777, 600);

        let first = replay_run(&replay);
        let second = replay_run(&replay);

        assert_eq!(first.final_hash, second.final_hash);
        assert_eq!(first.events, second.events);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = replay_run(&scripted(1, 400));
        let b = replay_run(&scripted(2, 400));
        assert_ne!(a.final_hash, b.final_hash);
    }

    #[test]
    fn test_binary_round_trip_preserves_outcome() {
        let replay = scripted(99, 300);
        let bytes = replay.to_bytes().unwrap();
        let decoded = Replay::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, replay);
        assert_eq!(replay_run(&decoded).final_hash, replay_run(&replay).final_hash);
    }

    #[test]
    fn test_json_round_trip() {
        let replay = scripted(5, 120);
        let json = replay.to_json().unwrap();
        assert_eq!(Replay::from_json(&json).unwrap(), replay);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut replay = Replay::new(1, GameConfig::default());
        replay.config.world_width = 0;
        let bytes = replay.to_bytes().unwrap();

        assert!(matches!(Replay::from_bytes(&bytes), Err(ReplayError::Config(_))));
        assert!(matches!(Replay::from_bytes(&[1, 2, 3]), Err(ReplayError::Decode(_))));
    }

    #[test]
    fn test_corrupt_recording_rejected() {
        let replay = scripted(3, 60);
        let mut value: serde_json::Value = serde_json::from_str(&replay.to_json().unwrap()).unwrap();
        value["frames"]["frame_count"] = serde_json::json!(0);
        let tampered = serde_json::to_string(&value).unwrap();

        assert!(matches!(
            Replay::from_json(&tampered),
            Err(ReplayError::Recording(RecordingError::PastEnd { frame_no: 0, frame_count: 0 }))
        ));

        let mut value: serde_json::Value = serde_json::from_str(&replay.to_json().unwrap()).unwrap();
        value["frames"]["deltas"].as_array_mut().unwrap().reverse();
        let tampered = serde_json::to_string(&value).unwrap();

        assert!(matches!(
            Replay::from_json(&tampered),
            Err(ReplayError::Recording(RecordingError::OutOfOrder { .. }))
        ));
    }
}
