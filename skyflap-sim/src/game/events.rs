//! Run Events
//!
//! Events generated by the run state machine for logging, hosts and
//! replay verification.

use serde::{Serialize, Deserialize};
use crate::game::state::{ContactKind, PairId};

/// Event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Start press moved the run from idle to active
    RunStarted,

    /// Player received a flap impulse during an active run
    Flapped,

    /// World reported a contact and a cause was latched
    Contact {
        /// What the player touched
        kind: ContactKind,
    },

    /// An obstacle pair entered at the right edge
    ObstacleSpawned {
        /// Pair identifier
        pair: PairId,
        /// Vertical centre of the gap (px)
        gap_center: i32,
    },

    /// Bottom member of a pair crossed the player column
    Scored {
        /// Pair identifier
        pair: PairId,
        /// Score after the increment
        score: u32,
    },

    /// An obstacle left the playfield and was destroyed
    ObstacleCulled {
        /// Pair identifier
        pair: PairId,
    },

    /// The end-of-run transition fired
    GameOver {
        /// Score at the end of the run
        final_score: u32,
        /// Ground contact latched
        landed: bool,
        /// Obstacle contact latched
        bumped: bool,
    },

    /// Restart press returned the run to idle
    Restarted,
}

/// A run event stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Obstacle pair involved, if any
    pub pair: Option<PairId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        let pair = match &data {
            GameEventData::ObstacleSpawned { pair, .. } => Some(*pair),
            GameEventData::Scored { pair, .. } => Some(*pair),
            GameEventData::ObstacleCulled { pair } => Some(*pair),
            _ => None,
        };

        Self {
            tick,
            pair,
            data,
        }
    }

    /// Create run started event.
    pub fn run_started(tick: u32) -> Self {
        Self::new(tick, GameEventData::RunStarted)
    }

    /// Create flap event.
    pub fn flapped(tick: u32) -> Self {
        Self::new(tick, GameEventData::Flapped)
    }

    /// Create contact event.
    pub fn contact(tick: u32, kind: ContactKind) -> Self {
        Self::new(tick, GameEventData::Contact { kind })
    }

    /// Create obstacle spawned event.
    pub fn obstacle_spawned(tick: u32, pair: PairId, gap_center: i32) -> Self {
        Self::new(tick, GameEventData::ObstacleSpawned { pair, gap_center })
    }

    /// Create scored event.
    pub fn scored(tick: u32, pair: PairId, score: u32) -> Self {
        Self::new(tick, GameEventData::Scored { pair, score })
    }

    /// Create obstacle culled event.
    pub fn obstacle_culled(tick: u32, pair: PairId) -> Self {
        Self::new(tick, GameEventData::ObstacleCulled { pair })
    }

    /// Create game over event.
    pub fn game_over(tick: u32, final_score: u32, landed: bool, bumped: bool) -> Self {
        Self::new(
            tick,
            GameEventData::GameOver {
                final_score,
                landed,
                bumped,
            },
        )
    }

    /// Create restarted event.
    pub fn restarted(tick: u32) -> Self {
        Self::new(tick, GameEventData::Restarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_compare_by_content() {
        assert_ne!(GameEvent::run_started(5), GameEvent::restarted(5));
        assert_ne!(GameEvent::run_started(5), GameEvent::game_over(5, 9, true, false));
        assert_ne!(GameEvent::scored(5, 1, 2), GameEvent::scored(5, 1, 3));
        assert_eq!(GameEvent::contact(5, ContactKind::Ground), GameEvent::contact(5, ContactKind::Ground));
    }

    #[test]
    fn test_pair_extracted_from_data() {
        assert_eq!(GameEvent::obstacle_spawned(0, 7, 300).pair, Some(7));
        assert_eq!(GameEvent::run_started(0).pair, None);
    }
}
