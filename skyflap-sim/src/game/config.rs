//! Run Configuration
//!
//! Tunables for the playfield, the player and the obstacle stream.
//! Values are authored in whole world units (pixels, px/s, px/s², ms)
//! and converted to fixed-point once, at the point of use.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::fixed::{Fixed, from_int};
use crate::core::vec2::FixedVec2;
use crate::TICK_RATE;

/// Largest coordinate magnitude a config may use. Keeps every derived
/// position and velocity well inside the Q16.16 range.
const MAX_COORD: i32 = 16_384;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid JSON for `GameConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a run.
///
/// Missing fields in a JSON file fall back to the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width (px)
    pub world_width: i32,
    /// Playfield height (px)
    pub world_height: i32,
    /// Downward acceleration applied to the player (px/s²)
    pub gravity: i32,

    /// Where the player appears on initialize/restart (px)
    pub spawn_x: i32,
    /// Where the player appears on initialize/restart (px)
    pub spawn_y: i32,
    /// Vertical velocity given on initialize/restart (px/s, negative is up)
    pub spawn_impulse: i32,
    /// Vertical velocity given on start and on every flap (px/s)
    pub flap_impulse: i32,
    /// Fixed on-screen column the player is pinned to every tick (px)
    pub player_column_x: i32,
    /// Player hitbox half-width (px)
    pub player_half_width: i32,
    /// Player hitbox half-height (px)
    pub player_half_height: i32,
    /// Fastest allowed fall (px/s)
    pub descent_cap: i32,
    /// Player angle while falling at the cap (degrees)
    pub diving_angle: i32,
    /// Player angle otherwise (degrees)
    pub climbing_angle: i32,
    /// Tint applied to the player when the run ends (0xRRGGBB)
    pub failure_tint: u32,

    /// Top surface of the ground (px)
    pub ground_y: i32,

    /// Delay between obstacle pairs (ms)
    ///
    /// Spawning runs in every phase. During game over the world is paused,
    /// so pairs spawned then pile up at the right edge until restart.
    pub spawn_interval_ms: u32,
    /// Nominal gap; each member sits a quarter of it from the centre (px)
    pub gap: i32,
    /// Lowest gap centre (px, inclusive)
    pub gap_center_min: i32,
    /// Highest gap centre (px, inclusive)
    pub gap_center_max: i32,
    /// Horizontal obstacle velocity (px/s, must be negative)
    pub obstacle_speed: i32,
    /// Obstacle width (px)
    pub obstacle_width: i32,
    /// Obstacle height (px)
    pub obstacle_height: i32,
    /// Obstacles left of this x are culled (px)
    pub cull_x: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 800,
            world_height: 600,
            gravity: 900,
            spawn_x: 50,
            spawn_y: 50,
            spawn_impulse: -350,
            flap_impulse: -250,
            player_column_x: 200,
            player_half_width: 24,
            player_half_height: 20,
            descent_cap: 400,
            diving_angle: 90,
            climbing_angle: -20,
            failure_tint: 0xFF0000,
            ground_y: 536,
            spawn_interval_ms: 1500,
            gap: 160,
            gap_center_min: 200,
            gap_center_max: 400,
            obstacle_speed: -200,
            obstacle_width: 64,
            obstacle_height: 640,
            cull_x: -50,
        }
    }
}

impl GameConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every field the simulation depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: String) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg))
        }

        if self.world_width <= 0 || self.world_height <= 0 {
            return invalid(format!(
                "world size must be positive, got {}x{}",
                self.world_width, self.world_height
            ));
        }
        let coords = [
            self.world_width, self.world_height, self.gravity,
            self.spawn_x, self.spawn_y, self.spawn_impulse, self.flap_impulse,
            self.descent_cap, self.ground_y, self.gap, self.gap_center_min,
            self.gap_center_max, self.obstacle_speed, self.obstacle_width,
            self.obstacle_height, self.cull_x, self.player_column_x,
            self.player_half_width, self.player_half_height,
        ];
        if coords.iter().any(|v| v.abs() > MAX_COORD) {
            return invalid(format!("values must stay within ±{}", MAX_COORD));
        }
        if self.spawn_interval_ms == 0 {
            return invalid("spawn interval must be non-zero".to_string());
        }
        if self.gap <= 0 {
            return invalid(format!("gap must be positive, got {}", self.gap));
        }
        if self.gap_center_min > self.gap_center_max {
            return invalid(format!(
                "gap centre range is inverted: {}..={}",
                self.gap_center_min, self.gap_center_max
            ));
        }
        if self.obstacle_speed >= 0 {
            return invalid(format!(
                "obstacles must scroll left, got speed {}",
                self.obstacle_speed
            ));
        }
        if self.obstacle_width <= 0 || self.obstacle_height <= 0 {
            return invalid("obstacle size must be positive".to_string());
        }
        if self.player_half_width <= 0 || self.player_half_height <= 0 {
            return invalid("player hitbox must be positive".to_string());
        }
        if self.player_column_x <= 0 || self.player_column_x >= self.world_width {
            return invalid(format!(
                "player column {} is outside the world",
                self.player_column_x
            ));
        }
        if self.ground_y <= 0 || self.ground_y > self.world_height {
            return invalid(format!("ground {} is outside the world", self.ground_y));
        }
        if self.descent_cap <= 0 {
            return invalid("descent cap must be positive".to_string());
        }
        if self.cull_x >= self.world_width {
            return invalid(format!("cull line {} is past the right edge", self.cull_x));
        }
        Ok(())
    }

    /// Spawn interval converted to simulation ticks (never zero).
    pub fn spawn_interval_ticks(&self) -> u32 {
        let ticks = (self.spawn_interval_ms as u64 * TICK_RATE as u64) / 1000;
        ticks.max(1) as u32
    }

    /// Player spawn point.
    pub fn spawn_point(&self) -> FixedVec2 {
        FixedVec2::from_ints(self.spawn_x, self.spawn_y)
    }

    /// Player spawn velocity.
    pub fn spawn_velocity(&self) -> FixedVec2 {
        FixedVec2::new(0, from_int(self.spawn_impulse))
    }

    /// Player column as fixed-point.
    pub fn column_x(&self) -> Fixed {
        from_int(self.player_column_x)
    }

    /// Player hitbox half extents.
    pub fn player_half_extents(&self) -> FixedVec2 {
        FixedVec2::from_ints(self.player_half_width, self.player_half_height)
    }

    /// Obstacle spawn x: the right edge of the playfield.
    pub fn obstacle_spawn_x(&self) -> Fixed {
        from_int(self.world_width)
    }

    /// Obstacle velocity.
    pub fn obstacle_velocity(&self) -> FixedVec2 {
        FixedVec2::new(from_int(self.obstacle_speed), 0)
    }
}
