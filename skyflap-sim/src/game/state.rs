//! Run State Definitions
//!
//! The typed records the run state machine owns: run phase, latched
//! end-of-run causes, and obstacle bookkeeping. Entity handles are opaque
//! values issued by the physics world.

use serde::{Serialize, Deserialize};

// =============================================================================
// ENTITY HANDLES
// =============================================================================

/// Handle to a body owned by a `PhysicsWorld`.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Identifier shared by the two members of one obstacle pair.
pub type PairId = u32;

/// RGB tint applied to a sprite (0xRRGGBB).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint(pub u32);

impl Tint {
    /// Red, green and blue channels.
    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

// =============================================================================
// RUN STATE
// =============================================================================

/// Current phase of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum RunState {
    /// Waiting for the first start press; the player drifts down its drop arc
    #[default]
    Idle,
    /// Player is flapping through the obstacle stream
    Active,
    /// A cause was latched and the end-of-run transition has fired
    GameOver,
}

impl RunState {
    /// Stable name for logs and events.
    pub fn name(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Active => "active",
            RunState::GameOver => "game_over",
        }
    }

    /// Stable index for hashing.
    pub fn index(self) -> u8 {
        match self {
            RunState::Idle => 0,
            RunState::Active => 1,
            RunState::GameOver => 2,
        }
    }
}

/// What the player touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    /// Player hit the ground
    Ground,
    /// Player hit an obstacle column
    Obstacle,
}

/// Latched end-of-run causes.
///
/// Collisions only set these; the per-frame tick turns them into the
/// game-over transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseFlags {
    /// Player has touched the ground
    pub landed: bool,
    /// Player has touched an obstacle
    pub bumped: bool,
}

impl CauseFlags {
    /// Is any cause latched?
    #[inline]
    pub fn any(&self) -> bool {
        self.landed || self.bumped
    }

    /// Latch the flag matching a contact. Returns true if it was newly set.
    pub fn latch(&mut self, kind: ContactKind) -> bool {
        let flag = match kind {
            ContactKind::Ground => &mut self.landed,
            ContactKind::Obstacle => &mut self.bumped,
        };
        let newly_set = !*flag;
        *flag = true;
        newly_set
    }

    /// Clear both flags.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// OBSTACLES
// =============================================================================

/// Which member of a pair an obstacle is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleRole {
    /// Hangs down from above the gap
    Top,
    /// Rises from below the gap; the member that scores
    Bottom,
}

impl ObstacleRole {
    /// Stable index for hashing.
    pub fn index(self) -> u8 {
        match self {
            ObstacleRole::Top => 0,
            ObstacleRole::Bottom => 1,
        }
    }
}

/// Core-owned record for one obstacle entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    /// Pair this obstacle belongs to
    pub pair: PairId,
    /// Top or bottom member
    pub role: ObstacleRole,
    /// World body backing this obstacle
    pub entity: EntityId,
    /// Has this obstacle already awarded its point?
    pub scored: bool,
}

impl ObstacleRecord {
    /// Create a new, un-scored record.
    pub fn new(pair: PairId, role: ObstacleRole, entity: EntityId) -> Self {
        Self {
            pair,
            role,
            entity,
            scored: false,
        }
    }

    /// Can this obstacle still award a point?
    #[inline]
    pub fn can_score(&self) -> bool {
        self.role == ObstacleRole::Bottom && !self.scored
    }
}
