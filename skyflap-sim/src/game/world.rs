//! Physics World
//!
//! The run state machine never integrates motion itself. It drives a
//! `PhysicsWorld`, which owns every body, applies gravity, resolves
//! collisions and reports contacts.
//!
//! `ArcadeWorld` is the built-in implementation: deterministic,
//! fixed-point, one integration step per tick.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, from_int, per_tick, fixed_clamp};
use crate::core::vec2::FixedVec2;
use crate::game::collision::{Aabb, touches_ground};
use crate::game::config::GameConfig;
use crate::game::state::{ContactKind, EntityId, ObstacleRole, Tint};

// =============================================================================
// CONTRACT
// =============================================================================

/// Everything needed to create one obstacle body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    /// Anchor point: horizontal centre, and the edge facing the gap
    pub position: FixedVec2,
    /// Top members extend up from the anchor, bottom members down
    pub role: ObstacleRole,
    /// Constant velocity
    pub velocity: FixedVec2,
    /// Ignore world gravity
    pub gravity_exempt: bool,
    /// Width and height
    pub size: FixedVec2,
}

/// A contact reported by a world step, tagged by colliding-pair kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// What the player touched
    pub kind: ContactKind,
    /// Obstacle body involved, for obstacle contacts
    pub other: Option<EntityId>,
}

/// Capability surface the run state machine drives.
///
/// Lookups on destroyed or unknown handles return `None`; mutations on them
/// are ignored.
pub trait PhysicsWorld {
    /// Create the player body.
    fn spawn_player(&mut self, position: FixedVec2, velocity: FixedVec2) -> EntityId;

    /// Create one obstacle body.
    fn spawn_obstacle(&mut self, spawn: ObstacleSpawn) -> EntityId;

    /// Remove a body.
    fn destroy(&mut self, id: EntityId);

    /// Current position of a body.
    fn position(&self, id: EntityId) -> Option<FixedVec2>;

    /// Teleport a body.
    fn set_position(&mut self, id: EntityId, position: FixedVec2);

    /// Current velocity of a body.
    fn velocity(&self, id: EntityId) -> Option<FixedVec2>;

    /// Overwrite a body's velocity.
    fn set_velocity(&mut self, id: EntityId, velocity: FixedVec2);

    /// Tint a body's sprite, or clear the tint with `None`.
    fn set_tint(&mut self, id: EntityId, tint: Option<Tint>);

    /// Rotate a body's sprite (degrees, clockwise on screen).
    fn set_angle(&mut self, id: EntityId, degrees: i32);

    /// Freeze all motion and contact reporting.
    fn pause_simulation(&mut self);

    /// Undo `pause_simulation`.
    fn resume_simulation(&mut self);

    /// Is the simulation frozen?
    fn is_paused(&self) -> bool;

    /// Advance one tick and report contacts.
    fn step(&mut self) -> Vec<Contact>;
}

// =============================================================================
// ARCADE WORLD
// =============================================================================

/// Kind of body held by an `ArcadeWorld`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// The controllable sprite
    Player,
    /// One member of an obstacle pair
    Obstacle(ObstacleRole),
}

/// A body in an `ArcadeWorld`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    /// Handle
    pub id: EntityId,
    /// Player or obstacle
    pub kind: BodyKind,
    /// World position (anchor point)
    pub position: FixedVec2,
    /// Velocity (px/s)
    pub velocity: FixedVec2,
    /// Hitbox relative to `position`
    pub shape: Aabb,
    /// Ignore world gravity
    pub gravity_exempt: bool,
    /// Sprite tint
    pub tint: Option<Tint>,
    /// Sprite angle (degrees)
    pub angle: i32,
}

impl Body {
    /// Hitbox in world space.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.shape.offset(self.position)
    }
}

/// Deterministic arcade-style world.
///
/// Semi-implicit Euler integration, the player is kept inside the world
/// bounds and rests on the ground surface, obstacles are immovable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArcadeWorld {
    /// Bodies (BTreeMap for deterministic iteration)
    bodies: BTreeMap<EntityId, Body>,
    /// Next handle to issue
    next_id: u32,
    /// Frozen?
    paused: bool,
    /// Downward acceleration (px/s²)
    gravity: Fixed,
    /// Playfield size
    size: FixedVec2,
    /// Ground surface
    ground_y: Fixed,
    /// Player hitbox half extents
    player_half: FixedVec2,
}

impl ArcadeWorld {
    /// Create an empty world from a run config.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_id: 0,
            paused: false,
            gravity: from_int(config.gravity),
            size: FixedVec2::from_ints(config.world_width, config.world_height),
            ground_y: from_int(config.ground_y),
            player_half: config.player_half_extents(),
        }
    }

    /// All bodies in handle order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values()
    }

    /// Look up a body.
    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Number of live bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// No bodies at all?
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Playfield size.
    pub fn size(&self) -> FixedVec2 {
        self.size
    }

    /// Ground surface.
    pub fn ground_y(&self) -> Fixed {
        self.ground_y
    }

    fn insert(&mut self, kind: BodyKind, position: FixedVec2, velocity: FixedVec2, shape: Aabb, gravity_exempt: bool) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, Body {
            id,
            kind,
            position,
            velocity,
            shape,
            gravity_exempt,
            tint: None,
            angle: 0,
        });
        id
    }

    /// Integrate one body and keep the player inside the world bounds.
    fn integrate(body: &mut Body, gravity_step: Fixed, size: FixedVec2) {
        if !body.gravity_exempt {
            body.velocity.y = body.velocity.y.wrapping_add(gravity_step);
        }

        body.position.x = body.position.x.wrapping_add(per_tick(body.velocity.x));
        body.position.y = body.position.y.wrapping_add(per_tick(body.velocity.y));

        if body.kind != BodyKind::Player {
            return;
        }

        let half = body.shape.max;
        let x = fixed_clamp(body.position.x, half.x, size.x - half.x);
        if x != body.position.x {
            body.position.x = x;
            body.velocity.x = 0;
        }
        let y = fixed_clamp(body.position.y, half.y, size.y - half.y);
        if y != body.position.y {
            body.position.y = y;
            body.velocity.y = 0;
        }
    }
}

impl PhysicsWorld for ArcadeWorld {
    fn spawn_player(&mut self, position: FixedVec2, velocity: FixedVec2) -> EntityId {
        let shape = Aabb::from_center(FixedVec2::ZERO, self.player_half);
        self.insert(BodyKind::Player, position, velocity, shape, false)
    }

    fn spawn_obstacle(&mut self, spawn: ObstacleSpawn) -> EntityId {
        let half_width = spawn.size.x / 2;
        let shape = match spawn.role {
            ObstacleRole::Top => Aabb::new(
                FixedVec2::new(-half_width, -spawn.size.y),
                FixedVec2::new(half_width, 0),
            ),
            ObstacleRole::Bottom => Aabb::new(
                FixedVec2::new(-half_width, 0),
                FixedVec2::new(half_width, spawn.size.y),
            ),
        };
        self.insert(
            BodyKind::Obstacle(spawn.role),
            spawn.position,
            spawn.velocity,
            shape,
            spawn.gravity_exempt,
        )
    }

    fn destroy(&mut self, id: EntityId) {
        self.bodies.remove(&id);
    }

    fn position(&self, id: EntityId) -> Option<FixedVec2> {
        self.bodies.get(&id).map(|b| b.position)
    }

    fn set_position(&mut self, id: EntityId, position: FixedVec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.position = position;
        }
    }

    fn velocity(&self, id: EntityId) -> Option<FixedVec2> {
        self.bodies.get(&id).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, id: EntityId, velocity: FixedVec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.velocity = velocity;
        }
    }

    fn set_tint(&mut self, id: EntityId, tint: Option<Tint>) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.tint = tint;
        }
    }

    fn set_angle(&mut self, id: EntityId, degrees: i32) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.angle = degrees;
        }
    }

    fn pause_simulation(&mut self) {
        self.paused = true;
    }

    fn resume_simulation(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn step(&mut self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        if self.paused {
            return contacts;
        }

        let gravity_step = per_tick(self.gravity);
        let size = self.size;
        for body in self.bodies.values_mut() {
            Self::integrate(body, gravity_step, size);
        }

        let ground_y = self.ground_y;
        let Some(player) = self.bodies.values_mut().find(|b| b.kind == BodyKind::Player) else {
            return contacts;
        };

        // Ground: rest on the surface
        if touches_ground(&player.bounds(), ground_y) {
            player.position.y = ground_y - player.shape.max.y;
            if player.velocity.y > 0 {
                player.velocity.y = 0;
            }
            contacts.push(Contact { kind: ContactKind::Ground, other: None });
        }

        // Obstacles: report the first overlap
        let player_bounds = player.bounds();
        let hit = self
            .bodies
            .values()
            .filter(|b| matches!(b.kind, BodyKind::Obstacle(_)))
            .find(|b| b.bounds().overlaps(&player_bounds))
            .map(|b| b.id);
        if let Some(id) = hit {
            contacts.push(Contact { kind: ContactKind::Obstacle, other: Some(id) });
        }

        contacts
    }
}

// =============================================================================
// TESTS
// =============================================================================
