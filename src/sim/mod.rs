//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only through the `dt` handed to `tick`
//! - Randomness only through a `UniformSource`
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::colliding_obstacles;
pub use rect::{Rect, clamp_lenient};
pub use state::{
    BackgroundScroll, GameEvent, GamePhase, GameState, Obstacle, Player, ScreenSize, SeededRng,
    UniformSource,
};
pub use tick::{TickInput, tick};
