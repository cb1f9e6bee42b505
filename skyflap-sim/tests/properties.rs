//! Property tests over whole sessions driven by arbitrary key input.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skyflap::game::events::GameEventData;
use skyflap::game::replay::{replay_run, Replay};
use skyflap::{GameConfig, InputEvent, InputFrame, RunState, Scene};

fn input_frame() -> impl Strategy<Value = InputFrame> {
    prop_oneof![
        12 => Just(InputFrame::new()),
        3 => Just(InputFrame::start()),
        1 => Just(InputFrame::restart()),
    ]
}

fn session() -> impl Strategy<Value = (u64, Vec<InputFrame>)> {
    (any::<u64>(), prop::collection::vec(input_frame(), 1..900))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn score_moves_only_by_crossings_and_restarts((seed, frames) in session()) {
        let mut scene = Scene::headless(GameConfig::default(), seed);
        let mut scored_pairs = BTreeSet::new();
        let mut over = false;

        for input in frames {
            let before = scene.run().score();
            let result = scene.step(input);
            let after = scene.run().score();

            let mut expected = before;
            for event in &result.events {
                match event.data {
                    GameEventData::Restarted => {
                        expected = 0;
                        over = false;
                    }
                    GameEventData::Scored { pair, score } => {
                        // No points once the run is over
                        prop_assert!(!over);
                        // One point per bottom obstacle, ever
                        prop_assert!(scored_pairs.insert(pair));
                        expected += 1;
                        prop_assert_eq!(score, expected);
                    }
                    GameEventData::GameOver { final_score, .. } => {
                        prop_assert!(!over);
                        prop_assert_eq!(final_score, expected);
                        over = true;
                    }
                    _ => {}
                }
            }
            prop_assert_eq!(after, expected);
            prop_assert_eq!(over, scene.run().state() == RunState::GameOver);
        }
    }

    #[test]
    fn restart_always_resets((seed, frames) in session()) {
        let mut scene = Scene::headless(GameConfig::default(), seed);

        for input in frames {
            if scene.run().state() == RunState::GameOver {
                prop_assert!(scene.dispatch(InputEvent::RestartPressed));
                let run = scene.run();
                prop_assert_eq!(run.state(), RunState::Idle);
                prop_assert_eq!(run.score(), 0);
                prop_assert!(run.obstacles().is_empty());
                prop_assert!(!run.causes().any());
            }
            scene.step(input);
        }
    }

    #[test]
    fn stray_presses_change_nothing((seed, frames) in session()) {
        let mut scene = Scene::headless(GameConfig::default(), seed);

        for input in frames {
            scene.step(input);

            let state = scene.run().state();
            let hash = scene.run().compute_hash();
            if state != RunState::Idle {
                prop_assert!(!scene.run_mut().on_start_input());
            }
            if state != RunState::GameOver {
                prop_assert!(!scene.run_mut().on_restart_input());
            }
            prop_assert_eq!(scene.run().compute_hash(), hash);
            prop_assert_eq!(scene.run().state(), state);
            prop_assert!(scene.run_mut().take_events().is_empty());
        }
    }

    #[test]
    fn gap_centres_stay_in_range((seed, frames) in session()) {
        let config = GameConfig::default();
        let (min, max) = (config.gap_center_min, config.gap_center_max);
        let mut scene = Scene::headless(config, seed);

        for input in frames {
            for event in scene.step(input).events {
                if let GameEventData::ObstacleSpawned { gap_center, .. } = event.data {
                    prop_assert!((min..=max).contains(&gap_center));
                }
            }
        }
    }

    #[test]
    fn replays_reproduce_live_runs((seed, frames) in session()) {
        let mut scene = Scene::headless(GameConfig::default(), seed);
        let mut replay = Replay::new(seed, GameConfig::default());
        let mut events = Vec::new();
        for input in frames {
            replay.record(input);
            events.extend(scene.step(input).events);
        }

        let outcome = replay_run(&replay);
        prop_assert_eq!(outcome.events, events);
        prop_assert_eq!(outcome.final_hash, scene.run().compute_hash());
        prop_assert_eq!(outcome.score, scene.run().score());
        prop_assert_eq!(outcome.state, scene.run().state());
    }
}

#[test]
fn long_sessions_keep_one_player_and_bounded_obstacles() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..8 {
        let mut scene = Scene::headless(GameConfig::default(), rng.gen());
        for _ in 0..5_000 {
            let input = match rng.gen_range(0..20) {
                0..=3 => InputFrame::start(),
                4 => InputFrame::restart(),
                _ => InputFrame::new(),
            };
            scene.step(input);

            let run = scene.run();
            // Player plus at most the pairs that fit on screen
            let bodies = run.world().len();
            assert_eq!(bodies, run.obstacles().len() + 1);
            assert!(run.obstacles().len() <= 2 * 8, "{} obstacles alive", run.obstacles().len());
        }
    }
}
