//! Endless Runner - dodge the falling blocks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scrolling, spawning, collisions, game state)
//! - `game`: Per-frame loop tying the simulation to a host
//! - `host`: Platform abstraction (time, input, randomness, drawing)
//! - `headless`: Recording host for tests and the native autopilot
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Runtime configuration
//! - `ui`: Game-over overlay layout

pub mod game;
pub mod headless;
pub mod host;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::GameLoop;
pub use host::{Color, Host};
pub use settings::{Palette, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Background scroll speed (pixels/s, downward)
    pub const SCROLL_SPEED: f32 = 300.0;
    /// Default height of one background tile
    pub const BACKGROUND_TILE_HEIGHT: f32 = 1024.0;

    /// Player ("cube") dimensions
    pub const PLAYER_WIDTH: f32 = 75.0;
    pub const PLAYER_HEIGHT: f32 = 175.0;
    /// Player spawn height above the bottom edge
    pub const PLAYER_START_Y: f32 = 200.0;

    /// Keep-out margins on both sides of the screen
    pub const MARGIN_LEFT: f32 = 100.0;
    pub const MARGIN_RIGHT: f32 = 100.0;

    /// Obstacle dimensions
    pub const OBSTACLE_WIDTH: f32 = 175.0;
    pub const OBSTACLE_HEIGHT: f32 = 75.0;
    /// Obstacle fall speed (pixels/s)
    pub const OBSTACLE_SPEED: f32 = 300.0;
    /// Seconds between spawns
    pub const SPAWN_INTERVAL: f32 = 2.0;

    /// Game-over overlay box
    pub const OVERLAY_BOX_WIDTH: u32 = 400;
    pub const OVERLAY_BOX_HEIGHT: u32 = 200;

    /// Fallback delta for the first frame (60 Hz)
    pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;
}
