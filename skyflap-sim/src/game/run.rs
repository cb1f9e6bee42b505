//! Run State Machine
//!
//! `GameRunState` owns the run phase, the latched end-of-run causes, the
//! score and the obstacle records. It drives an injected `PhysicsWorld` and
//! `DisplaySink` but never integrates motion or renders anything itself.
//!
//! Per frame the host calls, in order: input handlers, `on_spawn_tick` when
//! the spawn timer elapses, `on_collision` for each contact the world
//! reported, then `tick`. `Scene` does exactly that.
//!
//! # Determinism
//!
//! Gap centres come from the seeded `DeterministicRng`, obstacle records are
//! kept in spawn order, and all arithmetic is fixed-point.

use tracing::{debug, info, warn};

use crate::core::fixed::{from_int, Fixed};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::config::GameConfig;
use crate::game::display::{game_over_text, DisplaySink, MessageStyle, PROMPT_TEXT};
use crate::game::events::GameEvent;
use crate::game::state::{
    CauseFlags, ContactKind, EntityId, ObstacleRecord, ObstacleRole, PairId, RunState, Tint,
};
use crate::game::world::{ObstacleSpawn, PhysicsWorld};

/// The run state machine.
pub struct GameRunState<W, D> {
    /// Run tunables
    config: GameConfig,
    /// Physics collaborator
    world: W,
    /// Text collaborator
    display: D,
    /// Gap centre source
    rng: DeterministicRng,
    /// Seed the RNG started from
    rng_seed: u64,
    /// Current phase
    state: RunState,
    /// Latched end-of-run causes
    causes: CauseFlags,
    /// Points this run
    score: u32,
    /// Live obstacles in spawn order
    obstacles: Vec<ObstacleRecord>,
    /// Next pair identifier
    next_pair: PairId,
    /// The single player body
    player: EntityId,
    /// Ticks since construction
    tick: u32,
    /// Events not yet drained
    pending_events: Vec<GameEvent>,
}

impl<W: PhysicsWorld, D: DisplaySink> GameRunState<W, D> {
    /// Create a run, spawn the player and initialize.
    pub fn new(config: GameConfig, mut world: W, display: D, rng_seed: u64) -> Self {
        let player = world.spawn_player(config.spawn_point(), config.spawn_velocity());

        let mut run = Self {
            config,
            world,
            display,
            rng: DeterministicRng::new(rng_seed),
            rng_seed,
            state: RunState::Idle,
            causes: CauseFlags::default(),
            score: 0,
            obstacles: Vec::new(),
            next_pair: 0,
            player,
            tick: 0,
            pending_events: Vec::new(),
        };
        run.initialize();
        run
    }

    /// Put the run in its starting configuration.
    ///
    /// Idle, score 0, no obstacles, player at the spawn point with the spawn
    /// impulse, prompt and score text shown.
    pub fn initialize(&mut self) {
        self.reset();
        debug!("Run initialized (seed {})", self.rng_seed);
    }

    /// Start press. Idle only, and only while no cause is latched.
    ///
    /// Returns true if the run started.
    pub fn on_start_input(&mut self) -> bool {
        if self.state != RunState::Idle || self.causes.any() {
            debug!("Start ignored in state {}", self.state.name());
            return false;
        }

        self.state = RunState::Active;
        self.apply_flap_impulse();
        self.push_event(GameEvent::run_started(self.tick));
        info!("Run started at tick {}", self.tick);
        true
    }

    /// Flap press during an active run.
    ///
    /// Returns true if the impulse was applied.
    pub fn on_flap_input(&mut self) -> bool {
        if self.state != RunState::Active || self.causes.any() {
            debug!("Flap ignored in state {}", self.state.name());
            return false;
        }

        self.apply_flap_impulse();
        self.push_event(GameEvent::flapped(self.tick));
        true
    }

    /// Contact reported by the world. Only latches a cause.
    pub fn on_collision(&mut self, kind: ContactKind) {
        if self.causes.latch(kind) {
            debug!("Cause latched: {:?} at tick {}", kind, self.tick);
            self.push_event(GameEvent::contact(self.tick, kind));
        }
    }

    /// Per-frame update. Runs after the world step.
    pub fn tick(&mut self) {
        self.tick += 1;

        // 1. Freeze horizontal drift while idle or failing
        if self.state == RunState::Idle || self.causes.any() {
            if let Some(velocity) = self.world.velocity(self.player) {
                self.world.set_velocity(self.player, velocity.with_x(0));
            }
        }

        // 2. Pin the player to its column
        let column_x = self.config.column_x();
        if let Some(position) = self.world.position(self.player) {
            self.world.set_position(self.player, position.with_x(column_x));
        }

        // 3. Score crossings, then cull
        self.update_obstacles(column_x);

        // 4. Descent cap and sprite angle
        let descent_cap = from_int(self.config.descent_cap);
        if let Some(velocity) = self.world.velocity(self.player) {
            if velocity.y > descent_cap {
                self.world.set_velocity(self.player, velocity.with_y(descent_cap));
                self.world.set_angle(self.player, self.config.diving_angle);
            } else {
                self.world.set_angle(self.player, self.config.climbing_angle);
            }
        }

        // 5. End-of-run transition, once
        if self.causes.any() && self.state != RunState::GameOver {
            self.enter_game_over();
        }

        // 6. Prompt goes away once the run is under way
        if self.state == RunState::Active {
            self.display.hide_message();
        }
    }

    /// Spawn one obstacle pair at the right edge.
    ///
    /// Returns the new pair's identifier.
    pub fn on_spawn_tick(&mut self) -> PairId {
        let center = self
            .rng
            .next_int_range(self.config.gap_center_min, self.config.gap_center_max);
        let pair = self.next_pair;
        self.next_pair += 1;

        let offset = from_int(self.config.gap) / 4;
        let center_y = from_int(center);
        let x = self.config.obstacle_spawn_x();

        for (role, y) in [
            (ObstacleRole::Top, center_y - offset),
            (ObstacleRole::Bottom, center_y + offset),
        ] {
            let entity = self.world.spawn_obstacle(ObstacleSpawn {
                position: FixedVec2::new(x, y),
                role,
                velocity: self.config.obstacle_velocity(),
                gravity_exempt: true,
                size: FixedVec2::from_ints(self.config.obstacle_width, self.config.obstacle_height),
            });
            self.obstacles.push(ObstacleRecord::new(pair, role, entity));
        }

        debug!("Spawned pair {} with gap centre {}", pair, center);
        self.push_event(GameEvent::obstacle_spawned(self.tick, pair, center));
        pair
    }

    /// Restart press. GameOver only.
    ///
    /// Returns true if the run was reset.
    pub fn on_restart_input(&mut self) -> bool {
        if self.state != RunState::GameOver {
            debug!("Restart ignored in state {}", self.state.name());
            return false;
        }

        let final_score = self.score;
        self.reset();
        self.push_event(GameEvent::restarted(self.tick));
        info!("Run restarted (previous score {})", final_score);
        true
    }

    /// Hash of everything that determines the rest of the run.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            hasher.update_u8(self.state.index());
            hasher.update_bool(self.causes.landed);
            hasher.update_bool(self.causes.bumped);
            hasher.update_u32(self.score);
            hasher.update_u32(self.next_pair);
            for word in self.rng.state() {
                hasher.update_u64(word);
            }

            hasher.update_vec2(self.world.position(self.player).unwrap_or_default());
            hasher.update_vec2(self.world.velocity(self.player).unwrap_or_default());
            hasher.update_bool(self.world.is_paused());

            hasher.update_u32(self.obstacles.len() as u32);
            for record in &self.obstacles {
                hasher.update_u32(record.pair);
                hasher.update_u8(record.role.index());
                hasher.update_bool(record.scored);
                hasher.update_vec2(self.world.position(record.entity).unwrap_or_default());
            }
        })
    }

    /// Drain events generated since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Current phase.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Latched causes.
    pub fn causes(&self) -> CauseFlags {
        self.causes
    }

    /// Points this run.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Live obstacle records in spawn order.
    pub fn obstacles(&self) -> &[ObstacleRecord] {
        &self.obstacles
    }

    /// The player body.
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Seed the run was created with.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Run tunables.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Physics collaborator.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Physics collaborator, mutably.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Text collaborator.
    pub fn display(&self) -> &D {
        &self.display
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    fn apply_flap_impulse(&mut self) {
        let impulse: Fixed = from_int(self.config.flap_impulse);
        let velocity = self.world.velocity(self.player).unwrap_or_default();
        self.world.set_velocity(self.player, velocity.with_y(impulse));
    }

    /// Shared by initialize and restart.
    fn reset(&mut self) {
        self.causes.clear();
        self.state = RunState::Idle;
        self.score = 0;
        self.display.set_score_text(0);

        self.world.set_tint(self.player, None);
        self.world.set_position(self.player, self.config.spawn_point());
        self.world.set_velocity(self.player, self.config.spawn_velocity());

        for record in std::mem::take(&mut self.obstacles) {
            self.world.destroy(record.entity);
        }

        self.world.resume_simulation();
        self.display.hide_game_over();
        self.display.show_message(PROMPT_TEXT, MessageStyle::prompt());
    }

    fn update_obstacles(&mut self, column_x: Fixed) {
        let cull_x = from_int(self.config.cull_x);
        let mut kept = Vec::with_capacity(self.obstacles.len());

        for mut record in std::mem::take(&mut self.obstacles) {
            let Some(position) = self.world.position(record.entity) else {
                warn!("Obstacle {:?} of pair {} vanished from the world", record.entity, record.pair);
                continue;
            };

            if !self.causes.any()
                && self.state != RunState::GameOver
                && record.can_score()
                && position.x < column_x
            {
                self.score += 1;
                record.scored = true;
                self.display.set_score_text(self.score);
                debug!("Pair {} scored, score now {}", record.pair, self.score);
                self.push_event(GameEvent::scored(self.tick, record.pair, self.score));
            }

            if position.x < cull_x {
                self.world.destroy(record.entity);
                self.push_event(GameEvent::obstacle_culled(self.tick, record.pair));
                continue;
            }

            kept.push(record);
        }

        self.obstacles = kept;
    }

    fn enter_game_over(&mut self) {
        self.state = RunState::GameOver;
        self.world.pause_simulation();
        self.world.set_tint(self.player, Some(Tint(self.config.failure_tint)));
        self.display.show_game_over(&game_over_text(self.score));

        info!(
            "Game over at tick {}: score {} (landed: {}, bumped: {})",
            self.tick, self.score, self.causes.landed, self.causes.bumped
        );
        self.push_event(GameEvent::game_over(
            self.tick,
            self.score,
            self.causes.landed,
            self.causes.bumped,
        ));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::FIXED_ONE;
    use crate::game::display::TextDisplay;
    use crate::game::events::GameEventData;
    use crate::game::world::ArcadeWorld;

    type Run = GameRunState<ArcadeWorld, TextDisplay>;

    fn new_run() -> Run {
        let config = GameConfig::default();
        let world = ArcadeWorld::new(&config);
        GameRunState::new(config, world, TextDisplay::new(), 12345)
    }

    fn bottom_of(run: &Run, pair: PairId) -> EntityId {
        run.obstacles()
            .iter()
            .find(|r| r.pair == pair && r.role == ObstacleRole::Bottom)
            .map(|r| r.entity)
            .unwrap()
    }

    fn move_x(run: &mut Run, entity: EntityId, x: i32) {
        let position = run.world().body(entity).unwrap().position;
        run.world_mut().set_position(entity, position.with_x(from_int(x)));
    }

    /// Latch a cause, tick into game over, and drain events.
    fn force_game_over(run: &mut Run) {
        run.on_collision(ContactKind::Ground);
        run.tick();
        run.take_events();
    }

    #[test]
    fn test_initialize() {
        let run = new_run();

        assert_eq!(run.state(), RunState::Idle);
        assert_eq!(run.score(), 0);
        assert!(run.obstacles().is_empty());
        assert!(!run.causes().any());

        let player = run.world().body(run.player()).unwrap();
        assert_eq!(player.position, FixedVec2::from_ints(50, 50));
        assert_eq!(player.velocity, FixedVec2::from_ints(0, -350));

        assert_eq!(run.display().score, "Score: 0");
        assert_eq!(run.display().message_text(), Some(PROMPT_TEXT));
        assert!(run.display().game_over.is_none());
    }

    #[test]
    fn test_spawn_creates_unscored_pair() {
        let mut run = new_run();
        let pair = run.on_spawn_tick();

        let records = run.obstacles();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, ObstacleRole::Top);
        assert_eq!(records[1].role, ObstacleRole::Bottom);
        assert!(records.iter().all(|r| r.pair == pair && !r.scored));

        let top = run.world().body(records[0].entity).unwrap();
        let bottom = run.world().body(records[1].entity).unwrap();
        assert_eq!(top.position.x, 800 * FIXED_ONE);
        assert_eq!(bottom.velocity, FixedVec2::from_ints(-200, 0));
        assert!(top.gravity_exempt && bottom.gravity_exempt);

        // Gap members sit gap/4 either side of a centre in [200, 400]
        let gap = bottom.position.y - top.position.y;
        assert_eq!(gap, 80 * FIXED_ONE);
        let center = (top.position.y + bottom.position.y) / 2;
        assert!((200 * FIXED_ONE..=400 * FIXED_ONE).contains(&center));

        let events = run.take_events();
        assert!(matches!(
            events[0].data,
            GameEventData::ObstacleSpawned { pair: p, .. } if p == pair
        ));
    }

    #[test]
    fn test_bottom_crossing_scores_once() {
        let mut run = new_run();
        let pair = run.on_spawn_tick();
        let bottom = bottom_of(&run, pair);

        move_x(&mut run, bottom, 210);
        run.tick();
        assert_eq!(run.score(), 0);

        move_x(&mut run, bottom, 190);
        run.tick();
        assert_eq!(run.score(), 1);
        assert_eq!(run.display().score, "Score: 1");

        // Still left of the column: no second point
        move_x(&mut run, bottom, 150);
        run.tick();
        assert_eq!(run.score(), 1);

        let scored: Vec<_> = run
            .take_events()
            .into_iter()
            .filter(|e| matches!(e.data, GameEventData::Scored { .. }))
            .collect();
        assert_eq!(scored.len(), 1);
    }

    #[test]
    fn test_top_member_never_scores() {
        let mut run = new_run();
        let pair = run.on_spawn_tick();
        let top = run.obstacles().iter().find(|r| r.pair == pair).unwrap().entity;

        move_x(&mut run, top, 100);
        run.tick();
        assert_eq!(run.score(), 0);
    }

    #[test]
    fn test_ground_contact_ends_run() {
        let mut run = new_run();

        run.on_collision(ContactKind::Ground);
        // Latching alone never ends the run
        assert_eq!(run.state(), RunState::Idle);

        run.tick();

        assert_eq!(run.state(), RunState::GameOver);
        assert!(run.world().is_paused());
        assert_eq!(
            run.world().body(run.player()).unwrap().tint,
            Some(Tint(0xFF0000))
        );
        let message = run.display().game_over.as_deref().unwrap();
        assert!(message.contains("Final Score: 0"));
        assert!(message.contains("Press Enter to Restart"));
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut run = new_run();
        run.on_start_input();
        run.on_collision(ContactKind::Obstacle);
        run.on_collision(ContactKind::Ground);

        for _ in 0..5 {
            run.tick();
        }

        let overs = run
            .take_events()
            .into_iter()
            .filter(|e| matches!(e.data, GameEventData::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(run.causes().landed && run.causes().bumped);
    }

    #[test]
    fn test_no_scoring_once_cause_latched() {
        let mut run = new_run();
        let pair = run.on_spawn_tick();
        let bottom = bottom_of(&run, pair);

        run.on_collision(ContactKind::Obstacle);
        move_x(&mut run, bottom, 100);
        run.tick();
        run.tick();

        assert_eq!(run.score(), 0);
        assert_eq!(run.state(), RunState::GameOver);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut run = new_run();
        run.on_start_input();
        for _ in 0..7 {
            let pair = run.on_spawn_tick();
            let bottom = bottom_of(&run, pair);
            move_x(&mut run, bottom, 150);
            run.tick();
        }
        assert_eq!(run.score(), 7);
        force_game_over(&mut run);
        assert!(run.display().game_over.as_deref().unwrap().contains("Final Score: 7"));
        assert_eq!(run.tick_count(), 8);

        assert!(run.on_restart_input());
        // The tick counter keeps running across restarts
        assert_eq!(run.tick_count(), 8);

        assert_eq!(run.score(), 0);
        assert_eq!(run.state(), RunState::Idle);
        assert!(run.obstacles().is_empty());
        assert!(!run.causes().any());
        assert!(!run.world().is_paused());
        // Only the player is left
        assert_eq!(run.world().len(), 1);

        let player = run.world().body(run.player()).unwrap();
        assert_eq!(player.tint, None);
        assert_eq!(player.position, FixedVec2::from_ints(50, 50));
        assert_eq!(player.velocity, FixedVec2::from_ints(0, -350));

        assert_eq!(run.display().score, "Score: 0");
        assert!(run.display().game_over.is_none());
        assert_eq!(run.display().message_text(), Some(PROMPT_TEXT));

        let events = run.take_events();
        assert!(matches!(events.last().unwrap().data, GameEventData::Restarted));
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut run = new_run();

        assert!(run.on_start_input());
        assert_eq!(run.state(), RunState::Active);
        assert_eq!(
            run.world().velocity(run.player()).unwrap().y,
            from_int(-250)
        );

        // Second start press while active is a no-op
        let player = run.player();
        run.world_mut().set_velocity(player, FixedVec2::from_ints(0, 100));
        assert!(!run.on_start_input());
        assert_eq!(run.world().velocity(run.player()).unwrap().y, from_int(100));

        force_game_over(&mut run);
        assert!(!run.on_start_input());
        assert_eq!(run.state(), RunState::GameOver);
    }

    #[test]
    fn test_start_blocked_while_cause_latched() {
        let mut run = new_run();
        run.on_collision(ContactKind::Ground);

        assert!(!run.on_start_input());
        assert_eq!(run.state(), RunState::Idle);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut run = new_run();
        assert!(!run.on_restart_input());

        run.on_start_input();
        let pair = run.on_spawn_tick();
        let bottom = bottom_of(&run, pair);
        move_x(&mut run, bottom, 150);
        run.tick();
        assert_eq!(run.score(), 1);

        assert!(!run.on_restart_input());
        assert_eq!(run.state(), RunState::Active);
        assert_eq!(run.score(), 1);
        assert_eq!(run.obstacles().len(), 2);
    }

    #[test]
    fn test_flap_only_while_active() {
        let mut run = new_run();
        assert!(!run.on_flap_input());

        run.on_start_input();
        let player = run.player();
        run.world_mut().set_velocity(player, FixedVec2::from_ints(0, 300));
        assert!(run.on_flap_input());
        assert_eq!(run.world().velocity(run.player()).unwrap().y, from_int(-250));

        run.on_collision(ContactKind::Obstacle);
        run.world_mut().set_velocity(player, FixedVec2::from_ints(0, 300));
        assert!(!run.on_flap_input());
        assert_eq!(run.world().velocity(run.player()).unwrap().y, from_int(300));
    }

    #[test]
    fn test_prompt_hidden_once_active() {
        let mut run = new_run();
        run.tick();
        assert_eq!(run.display().message_text(), Some(PROMPT_TEXT));

        run.on_start_input();
        // Hidden on the next tick, not by the start press itself
        assert_eq!(run.display().message_text(), Some(PROMPT_TEXT));
        run.tick();
        assert!(run.display().message.is_none());
    }

    #[test]
    fn test_descent_cap_and_angle() {
        let mut run = new_run();
        let player = run.player();

        run.world_mut().set_velocity(player, FixedVec2::from_ints(0, 650));
        run.tick();
        let body = run.world().body(player).unwrap();
        assert_eq!(body.velocity.y, from_int(400));
        assert_eq!(body.angle, 90);

        run.world_mut().set_velocity(player, FixedVec2::from_ints(0, -100));
        run.tick();
        assert_eq!(run.world().body(player).unwrap().angle, -20);
    }

    #[test]
    fn test_player_pinned_to_column() {
        let mut run = new_run();
        let player = run.player();
        run.world_mut().set_velocity(player, FixedVec2::from_ints(120, 0));

        run.tick();

        let body = run.world().body(player).unwrap();
        assert_eq!(body.position.x, from_int(200));
        // Idle: horizontal drift removed
        assert_eq!(body.velocity.x, 0);
    }

    #[test]
    fn test_obstacles_culled_past_left_edge() {
        let mut run = new_run();
        let pair = run.on_spawn_tick();
        let entities: Vec<_> = run.obstacles().iter().map(|r| r.entity).collect();

        // Contacts are not forwarded, so the run never ends
        let mut ticks = 0;
        while !run.obstacles().is_empty() && ticks < 1000 {
            run.world_mut().step();
            run.tick();
            ticks += 1;
        }

        // 850 px at 200 px/s is a little over 255 ticks
        assert!((250..=260).contains(&ticks), "culled after {} ticks", ticks);
        assert!(entities.iter().all(|e| run.world().body(*e).is_none()));
        // The bottom member crossed the column on the way out
        assert_eq!(run.score(), 1);

        let culled = run
            .take_events()
            .into_iter()
            .filter(|e| matches!(e.data, GameEventData::ObstacleCulled { pair: p } if p == pair))
            .count();
        assert_eq!(culled, 2);
    }

    #[test]
    fn test_culled_even_when_unscored() {
        let mut run = new_run();
        let pair = run.on_spawn_tick();
        let bottom = bottom_of(&run, pair);
        run.on_collision(ContactKind::Obstacle);
        run.tick();

        move_x(&mut run, bottom, -60);
        run.tick();

        assert!(run.obstacles().iter().all(|r| r.entity != bottom));
        assert!(run.world().body(bottom).is_none());
        assert_eq!(run.score(), 0);
    }

    #[test]
    fn test_vanished_obstacle_dropped() {
        let mut run = new_run();
        let pair = run.on_spawn_tick();
        let bottom = bottom_of(&run, pair);
        run.world_mut().destroy(bottom);

        run.tick();

        assert_eq!(run.obstacles().len(), 1);
        assert_eq!(run.obstacles()[0].role, ObstacleRole::Top);
    }

    #[test]
    fn test_gap_centres_follow_seed() {
        let mut a = new_run();
        let mut b = new_run();
        for _ in 0..10 {
            a.on_spawn_tick();
            b.on_spawn_tick();
        }
        assert_eq!(a.compute_hash(), b.compute_hash());

        a.tick();
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
