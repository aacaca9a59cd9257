//! Game state and core simulation types
//!
//! Everything the frame step mutates lives here. The state is plain data and
//! serializable so a run can be dumped for debugging.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::{Rect, clamp_lenient};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Scrolling, spawning and collision checks are live
    #[default]
    Playing,
    /// Run ended, waiting for a tap
    GameOver,
}

/// Screen dimensions in pixels, as reported by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The player-controlled cube
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
}

impl Player {
    /// Player at the default position, horizontally centered
    pub fn new(screen_width: u32) -> Self {
        Self {
            rect: Rect::new(
                Self::default_x(screen_width),
                PLAYER_START_Y,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
        }
    }

    /// Default x for a given screen width
    pub fn default_x(screen_width: u32) -> f32 {
        screen_width as f32 / 2.0 - PLAYER_WIDTH / 2.0
    }

    /// Move back to the default position
    pub fn reset(&mut self, screen_width: u32) {
        self.rect.pos.x = Self::default_x(screen_width);
        self.rect.pos.y = PLAYER_START_Y;
    }

    /// Center the cube on the pointer, then keep it inside the margins
    pub fn follow_pointer(&mut self, pointer_x: f32, screen_width: u32) {
        let (min_x, max_x) = Self::x_bounds(screen_width);
        let x = pointer_x - self.rect.width() / 2.0;
        self.rect.pos.x = clamp_lenient(x, min_x, max_x);
    }

    /// Allowed range for the player's left edge
    pub fn x_bounds(screen_width: u32) -> (f32, f32) {
        (
            MARGIN_LEFT,
            screen_width as f32 - PLAYER_WIDTH - MARGIN_RIGHT,
        )
    }
}

/// A falling block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        }
    }

    /// Fall by `OBSTACLE_SPEED * dt`
    pub fn fall(&mut self, dt: f32) {
        self.rect.pos.y -= OBSTACLE_SPEED * dt;
    }

    /// Entirely below the bottom edge
    pub fn is_off_screen(&self) -> bool {
        self.rect.top() < 0.0
    }

    /// Allowed range for a new obstacle's left edge
    pub fn spawn_x_bounds(screen_width: u32) -> (f32, f32) {
        (
            MARGIN_LEFT,
            screen_width as f32 - OBSTACLE_WIDTH - MARGIN_RIGHT,
        )
    }
}

/// Two stacked copies of the background tile, leapfrogging as they scroll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundScroll {
    /// Bottom edge of each tile copy
    pub offsets: [f32; 2],
    pub tile_height: f32,
}

impl BackgroundScroll {
    pub fn new(tile_height: f32) -> Self {
        Self {
            offsets: [0.0, tile_height],
            tile_height,
        }
    }

    /// Scroll both copies down by `distance`, wrapping a copy to sit on top
    /// of its twin once it has fully left the screen.
    ///
    /// The first copy wraps before the second, so the second sees the first's
    /// updated offset.
    pub fn advance(&mut self, distance: f32) {
        let h = self.tile_height;
        self.offsets[0] -= distance;
        self.offsets[1] -= distance;
        if self.offsets[0] + h <= 0.0 {
            self.offsets[0] = self.offsets[1] + h;
        }
        if self.offsets[1] + h <= 0.0 {
            self.offsets[1] = self.offsets[0] + h;
        }
    }
}

impl Default for BackgroundScroll {
    fn default() -> Self {
        Self::new(BACKGROUND_TILE_HEIGHT)
    }
}

/// Events emitted by a tick, drained by the game loop for logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ObstacleSpawned { id: u32, x: f32 },
    /// One event per overlapping obstacle
    Collision { obstacle_id: u32 },
    GameOver,
    Restarted,
}

/// Source of uniformly distributed floats for spawn placement
pub trait UniformSource {
    /// A value between `min` and `max`. Must not panic when `min > max`.
    fn uniform(&mut self, min: f32, max: f32) -> f32;
}

/// Seeded PCG generator
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl UniformSource for SeededRng {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        // Interpolate rather than sample a range so inverted bounds stay total
        let t: f32 = self.rng.random();
        min + t * (max - min)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Player cube
    pub player: Player,
    /// Active obstacles (order is irrelevant)
    pub obstacles: Vec<Obstacle>,
    /// Seconds accumulated toward the next spawn
    pub spawn_timer: f32,
    /// Scrolling background offsets
    pub background: BackgroundScroll,
    /// Seconds survived in the current run
    pub run_time: f32,
    /// Events from the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh run for the given screen width
    pub fn new(screen_width: u32, tile_height: f32) -> Self {
        Self {
            phase: GamePhase::Playing,
            player: Player::new(screen_width),
            obstacles: Vec::new(),
            spawn_timer: 0.0,
            background: BackgroundScroll::new(tile_height),
            run_time: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an obstacle at the given position
    pub fn spawn_obstacle(&mut self, x: f32, y: f32) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle::new(id, x, y));
        self.events.push(GameEvent::ObstacleSpawned { id, x });
        id
    }

    /// Start a new run. The background keeps scrolling from where it was.
    pub fn restart(&mut self, screen_width: u32) {
        self.phase = GamePhase::Playing;
        self.obstacles.clear();
        self.spawn_timer = 0.0;
        self.player.reset(screen_width);
        self.run_time = 0.0;
        self.events.push(GameEvent::Restarted);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
