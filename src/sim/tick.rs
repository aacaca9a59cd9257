//! Per-frame simulation step
//!
//! Advances the game state by one rendered frame. Pure apart from the
//! caller-supplied random source, so it can be driven frame-by-frame in tests.

use super::collision::colliding_obstacles;
use super::state::{GameEvent, GamePhase, GameState, Obstacle, ScreenSize, UniformSource};
use crate::consts::*;

/// Input sampled from the host for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Current screen size
    pub screen: ScreenSize,
    /// Absolute pointer X while the pointer is held down (level-triggered)
    pub pointer_x: Option<f32>,
    /// A fresh click/tap this frame (edge-triggered)
    pub restart: bool,
}

impl TickInput {
    /// No pointer, no click
    pub fn idle(screen: ScreenSize) -> Self {
        Self {
            screen,
            pointer_x: None,
            restart: false,
        }
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut impl UniformSource) {
    match state.phase {
        GamePhase::GameOver => {
            // Frozen until a tap; nothing else is read
            if input.restart {
                state.restart(input.screen.width);
            }
        }
        GamePhase::Playing => {
            state.background.advance(SCROLL_SPEED * dt);

            if let Some(pointer_x) = input.pointer_x {
                state.player.follow_pointer(pointer_x, input.screen.width);
            }

            state.spawn_timer += dt;
            if state.spawn_timer > SPAWN_INTERVAL {
                let (min_x, max_x) = Obstacle::spawn_x_bounds(input.screen.width);
                let x = rng.uniform(min_x, max_x);
                state.spawn_obstacle(x, input.screen.height as f32);
                state.spawn_timer = 0.0;
            }

            for obstacle in &mut state.obstacles {
                obstacle.fall(dt);
            }
            state.obstacles.retain(|o| !o.is_off_screen());

            state.run_time += dt;

            // Scan everything; the phase change only matters to the next frame
            let hits = colliding_obstacles(&state.player, &state.obstacles);
            if !hits.is_empty() {
                state.events.extend(
                    hits.into_iter()
                        .map(|obstacle_id| GameEvent::Collision { obstacle_id }),
                );
                state.phase = GamePhase::GameOver;
                state.events.push(GameEvent::GameOver);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Player, SeededRng};
    use crate::sim::Rect;
    use proptest::prelude::*;

    const SCREEN: ScreenSize = ScreenSize {
        width: 800,
        height: 600,
    };

    /// Always picks the same fraction of the requested range
    struct FixedRng(f32);

    impl UniformSource for FixedRng {
        fn uniform(&mut self, min: f32, max: f32) -> f32 {
            min + self.0 * (max - min)
        }
    }

    fn new_state() -> GameState {
        GameState::new(SCREEN.width, BACKGROUND_TILE_HEIGHT)
    }

    fn spawned(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
            .count()
    }

    #[test]
    fn test_idle_frame_scrolls_background_only() {
        let mut state = new_state();
        let player = state.player;

        tick(&mut state, &TickInput::idle(SCREEN), 0.1, &mut FixedRng(0.5));

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player, player);
        assert!((state.background.offsets[0] - -30.0).abs() < 1e-4);
        assert!((state.background.offsets[1] - 994.0).abs() < 1e-4);
        assert!((state.spawn_timer - 0.1).abs() < 1e-6);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_pointer_moves_player() {
        let mut state = new_state();
        let input = TickInput {
            pointer_x: Some(250.0),
            ..TickInput::idle(SCREEN)
        };

        tick(&mut state, &input, 0.016, &mut FixedRng(0.5));
        assert_eq!(state.player.rect.x(), 212.5);

        let input = TickInput {
            pointer_x: Some(5000.0),
            ..TickInput::idle(SCREEN)
        };
        tick(&mut state, &input, 0.016, &mut FixedRng(0.5));
        assert_eq!(state.player.rect.x(), 625.0);
    }

    #[test]
    fn test_spawn_after_interval() {
        let mut state = new_state();
        let input = TickInput::idle(SCREEN);

        // 0.5 is exact in binary: timer hits 2.0 on the 4th frame, which is
        // not yet past the interval
        for _ in 0..4 {
            tick(&mut state, &input, 0.5, &mut FixedRng(0.0));
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawn_timer, 2.0);

        tick(&mut state, &input, 0.5, &mut FixedRng(0.0));
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_timer, 0.0);

        // Spawned at the top, then fell during the same frame
        let obstacle = state.obstacles[0];
        assert_eq!(obstacle.rect.x(), MARGIN_LEFT);
        assert_eq!(obstacle.rect.y(), 600.0 - OBSTACLE_SPEED * 0.5);
        assert_eq!(obstacle.rect.width(), OBSTACLE_WIDTH);
        assert_eq!(obstacle.rect.height(), OBSTACLE_HEIGHT);
    }

    #[test]
    fn test_spawn_x_spans_margins() {
        let mut state = new_state();
        state.spawn_timer = SPAWN_INTERVAL;
        tick(&mut state, &TickInput::idle(SCREEN), 0.0, &mut FixedRng(1.0));
        // Nothing spawned yet: the timer must exceed the interval
        assert!(state.obstacles.is_empty());

        tick(&mut state, &TickInput::idle(SCREEN), 0.001, &mut FixedRng(1.0));
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].rect.x(), 800.0 - 175.0 - 100.0);
    }

    #[test]
    fn test_obstacles_fall_and_get_pruned() {
        let mut state = new_state();
        state.spawn_obstacle(100.0, 10.0);
        state.spawn_obstacle(400.0, 500.0);
        // Park the player out of the way
        state.player.rect.pos.x = 600.0;

        tick(&mut state, &TickInput::idle(SCREEN), 0.1, &mut FixedRng(0.5));
        assert_eq!(state.obstacles.len(), 2);
        assert!((state.obstacles[0].rect.y() - -20.0).abs() < 1e-4);

        // First obstacle's top edge drops below zero
        tick(&mut state, &TickInput::idle(SCREEN), 0.3, &mut FixedRng(0.5));
        assert_eq!(state.obstacles.len(), 1);
        assert!((state.obstacles[0].rect.y() - 380.0).abs() < 1e-3);
    }

    #[test]
    fn test_collision_triggers_game_over() {
        let mut state = new_state();
        state.player.rect = Rect::new(100.0, 200.0, 75.0, 175.0);
        let id = state.spawn_obstacle(100.0, 200.0);
        state.drain_events();

        tick(&mut state, &TickInput::idle(SCREEN), 0.016, &mut FixedRng(0.5));

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.events,
            vec![
                GameEvent::Collision { obstacle_id: id },
                GameEvent::GameOver
            ]
        );
    }

    #[test]
    fn test_disjoint_obstacle_keeps_playing() {
        let mut state = new_state();
        state.player.rect = Rect::new(100.0, 200.0, 75.0, 175.0);
        state.spawn_obstacle(500.0, 200.0);

        tick(&mut state, &TickInput::idle(SCREEN), 0.016, &mut FixedRng(0.5));

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_every_overlapping_obstacle_is_reported() {
        let mut state = new_state();
        state.player.rect = Rect::new(300.0, 200.0, 75.0, 175.0);
        let a = state.spawn_obstacle(250.0, 250.0);
        let b = state.spawn_obstacle(200.0, 300.0);
        state.drain_events();

        tick(&mut state, &TickInput::idle(SCREEN), 0.0, &mut FixedRng(0.5));

        let hits: Vec<u32> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Collision { obstacle_id } => Some(*obstacle_id),
                _ => None,
            })
            .collect();
        assert_eq!(hits, vec![a, b]);
    }

    #[test]
    fn test_game_over_is_frozen() {
        let mut state = new_state();
        state.spawn_obstacle(300.0, 300.0);
        state.spawn_timer = 1.0;
        state.phase = GamePhase::GameOver;
        let before = state.clone();

        let input = TickInput {
            pointer_x: Some(100.0),
            ..TickInput::idle(SCREEN)
        };
        for _ in 0..10 {
            tick(&mut state, &input, 0.5, &mut FixedRng(0.5));
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.obstacles, before.obstacles);
        assert_eq!(state.spawn_timer, before.spawn_timer);
        assert_eq!(state.background, before.background);
        assert_eq!(state.player, before.player);
    }

    #[test]
    fn test_tap_restarts_from_game_over() {
        let mut state = new_state();
        state.background.advance(77.0);
        for i in 0..5 {
            state.spawn_obstacle(100.0 + i as f32 * 10.0, 300.0);
        }
        state.spawn_timer = 1.25;
        state.player.rect.pos.x = 100.0;
        state.phase = GamePhase::GameOver;
        let background = state.background;

        let input = TickInput {
            restart: true,
            ..TickInput::idle(SCREEN)
        };
        tick(&mut state, &input, 0.5, &mut FixedRng(0.5));

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawn_timer, 0.0);
        assert_eq!(state.player, Player::new(SCREEN.width));
        // No scrolling on the restart frame, and no reset either
        assert_eq!(state.background, background);
    }

    #[test]
    fn test_tap_while_playing_is_ignored() {
        let mut state = new_state();
        state.spawn_obstacle(100.0, 500.0);
        let input = TickInput {
            restart: true,
            ..TickInput::idle(SCREEN)
        };
        tick(&mut state, &input, 0.1, &mut FixedRng(0.5));
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_seeded_run_is_reproducible() {
        let run = |seed| {
            let mut state = new_state();
            let mut rng = SeededRng::new(seed);
            let mut xs = Vec::new();
            for _ in 0..600 {
                tick(&mut state, &TickInput::idle(SCREEN), 1.0 / 60.0, &mut rng);
                for event in state.drain_events() {
                    if let GameEvent::ObstacleSpawned { x, .. } = event {
                        xs.push(x);
                    }
                }
                if state.is_game_over() {
                    break;
                }
            }
            xs
        };
        assert_eq!(run(7), run(7));
    }

    proptest! {
        #[test]
        fn prop_background_twins_stay_one_tile_apart(
            steps in proptest::collection::vec(0.0f32..0.5, 1..400),
        ) {
            let mut state = new_state();
            let h = state.background.tile_height;
            for dt in steps {
                tick(&mut state, &TickInput::idle(SCREEN), dt, &mut FixedRng(0.0));
                let [a, b] = state.background.offsets;
                prop_assert!(((a - b).abs() - h).abs() < 0.5);
                let in_lower = |o: f32| (-h..0.0).contains(&o);
                prop_assert!(!(in_lower(a) && in_lower(b)));
                // Restart the run if an obstacle got us; the background is unaffected
                if state.is_game_over() {
                    state.restart(SCREEN.width);
                }
            }
        }

        #[test]
        fn prop_no_off_screen_obstacle_survives_a_step(
            ys in proptest::collection::vec(-200.0f32..700.0, 0..20),
            dt in 0.0f32..0.5,
        ) {
            let mut state = new_state();
            state.player.rect.pos.x = 625.0;
            for y in ys {
                state.spawn_obstacle(100.0, y);
            }
            tick(&mut state, &TickInput::idle(SCREEN), dt, &mut FixedRng(0.0));
            for obstacle in &state.obstacles {
                prop_assert!(obstacle.rect.top() >= 0.0);
            }
        }

        #[test]
        fn prop_spawn_count_tracks_elapsed_time(
            dt in 0.005f32..0.05,
            frames in 1usize..800,
            width in 450u32..2000,
            height in 300u32..1200,
        ) {
            let screen = ScreenSize::new(width, height);
            let mut state = GameState::new(width, BACKGROUND_TILE_HEIGHT);
            // Player hugs the right margin, obstacles always land on the left
            let input = TickInput {
                pointer_x: Some(width as f32),
                ..TickInput::idle(screen)
            };
            let mut count = 0usize;
            for _ in 0..frames {
                tick(&mut state, &input, dt, &mut FixedRng(0.0));
                let events = state.drain_events();
                count += spawned(&events);
                for event in events {
                    if let GameEvent::ObstacleSpawned { x, .. } = event {
                        prop_assert!(x >= MARGIN_LEFT);
                        prop_assert!(x <= width as f32 - OBSTACLE_WIDTH - MARGIN_RIGHT);
                    }
                }
            }
            prop_assert_eq!(state.phase, GamePhase::Playing);
            let elapsed = dt * frames as f32;
            let expected = (elapsed / SPAWN_INTERVAL).floor() as i64;
            prop_assert!((count as i64 - expected).abs() <= 1);
        }

        #[test]
        fn prop_spawn_x_within_margins(t in 0.0f32..1.0, width in 375u32..3000) {
            let screen = ScreenSize::new(width, 900);
            let mut state = GameState::new(width, BACKGROUND_TILE_HEIGHT);
            state.spawn_timer = SPAWN_INTERVAL;
            tick(&mut state, &TickInput::idle(screen), 0.0001, &mut FixedRng(t));
            prop_assert_eq!(state.obstacles.len(), 1);
            let x = state.obstacles[0].rect.x();
            prop_assert!(x >= 100.0 - 1e-3);
            prop_assert!(x <= width as f32 - 275.0 + 1e-3);
        }

        #[test]
        fn prop_zero_dt_is_idempotent(
            warmup in proptest::collection::vec(0.0f32..0.1, 0..100),
            seed in any::<u64>(),
            repeats in 1usize..20,
        ) {
            let mut state = new_state();
            let mut rng = SeededRng::new(seed);
            let steer = TickInput {
                pointer_x: Some(SCREEN.width as f32),
                ..TickInput::idle(SCREEN)
            };
            for dt in warmup {
                tick(&mut state, &steer, dt, &mut rng);
            }
            prop_assume!(!state.is_game_over());
            state.drain_events();

            let before = serde_json::to_string(&state).unwrap();
            for _ in 0..repeats {
                tick(&mut state, &TickInput::idle(SCREEN), 0.0, &mut rng);
            }
            let after = serde_json::to_string(&state).unwrap();
            prop_assert_eq!(before, after);
            prop_assert!(state.events.is_empty());
        }

        #[test]
        fn prop_pointer_clamp_keeps_player_in_band(
            pointer_x in -5000.0f32..5000.0,
            width in 375u32..3000,
        ) {
            let screen = ScreenSize::new(width, 900);
            let mut state = GameState::new(width, BACKGROUND_TILE_HEIGHT);
            let input = TickInput {
                pointer_x: Some(pointer_x),
                ..TickInput::idle(screen)
            };
            tick(&mut state, &input, 0.0, &mut FixedRng(0.0));
            let x = state.player.rect.x();
            prop_assert!(x >= MARGIN_LEFT);
            prop_assert!(x <= width as f32 - PLAYER_WIDTH - MARGIN_RIGHT);
            // Clamping twice changes nothing
            tick(&mut state, &input, 0.0, &mut FixedRng(0.0));
            prop_assert_eq!(state.player.rect.x(), x);
        }
    }
}
