//! Headless host
//!
//! Records draw calls instead of rendering and takes scripted input. Drives
//! unit tests and the native autopilot session.

use serde::Serialize;

use crate::game::GameLoop;
use crate::host::{Color, Host};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Player, Rect, SeededRng, UniformSource};

/// Frames the autopilot waits on the game-over screen before tapping
pub const RESTART_DELAY_FRAMES: u32 = 30;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background { offsets: [f32; 2] },
    Rect { rect: Rect, color: Color },
    Text { line: String, text_box: Rect },
}

/// Host with a fixed timestep and scripted pointer
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    width: u32,
    height: u32,
    dt: f32,
    pointer: Option<f32>,
    clicked: bool,
    rng: SeededRng,
    commands: Vec<DrawCommand>,
}

impl HeadlessHost {
    pub fn new(width: u32, height: u32, dt: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            dt,
            pointer: None,
            clicked: false,
            rng: SeededRng::new(seed),
            commands: Vec::new(),
        }
    }

    /// Start a click/tap at `x` (pointer down plus a click edge)
    pub fn press(&mut self, x: f32) {
        self.pointer = Some(x);
        self.clicked = true;
    }

    /// Keep the pointer down at `x` without a new click
    pub fn hold(&mut self, x: f32) {
        self.pointer = Some(x);
    }

    pub fn release(&mut self) {
        self.pointer = None;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Draw calls since the last call
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Host for HeadlessHost {
    fn elapsed_seconds(&self) -> f32 {
        self.dt
    }

    fn screen_width(&self) -> u32 {
        self.width
    }

    fn screen_height(&self) -> u32 {
        self.height
    }

    fn is_pointer_down(&self) -> bool {
        self.pointer.is_some()
    }

    fn pointer_x(&self) -> f32 {
        self.pointer.unwrap_or_default()
    }

    fn just_clicked(&self) -> bool {
        self.clicked
    }

    fn uniform_random(&mut self, min: f32, max: f32) -> f32 {
        self.rng.uniform(min, max)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn draw_scrolling_background(&mut self, offset1: f32, offset2: f32) {
        self.commands.push(DrawCommand::Background {
            offsets: [offset1, offset2],
        });
    }

    fn draw_centered_text(&mut self, line: &str, text_box: Rect) {
        self.commands.push(DrawCommand::Text {
            line: line.to_string(),
            text_box,
        });
    }

    fn end_frame(&mut self) {
        self.clicked = false;
    }
}

/// Pointer X that steers the player clear of the lowest obstacle still above
/// it, or `None` when nothing is in the way
pub fn autopilot_target(state: &GameState, screen_width: u32) -> Option<f32> {
    let player = state.player.rect;
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.rect.top() > player.y())
        .min_by(|a, b| a.rect.y().total_cmp(&b.rect.y()))?;

    if threat.rect.right() <= player.x() || threat.rect.x() >= player.right() {
        return None;
    }

    let (min_x, max_x) = Player::x_bounds(screen_width);
    let room_left = threat.rect.x() - min_x;
    let room_right = max_x + player.width() - threat.rect.right();
    let target_x = if room_left >= room_right {
        threat.rect.x() - player.width()
    } else {
        threat.rect.right()
    };
    Some(target_x + player.width() / 2.0)
}

/// Totals from an autopilot session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub frames: u32,
    pub spawned: u32,
    pub collisions: u32,
    pub game_overs: u32,
    pub restarts: u32,
    /// Longest run in seconds
    pub best_run: f32,
}

/// Play `frames` frames with the autopilot steering and tapping to restart
pub fn run_autopilot(
    settings: &Settings,
    seed: u64,
    width: u32,
    height: u32,
    dt: f32,
    frames: u32,
) -> SessionSummary {
    let mut game = GameLoop::new(width, settings);
    let mut host = HeadlessHost::new(width, height, settings.clamp_frame_dt(dt), seed);
    let mut summary = SessionSummary::default();
    let mut waited = 0;

    for _ in 0..frames {
        match game.phase() {
            GamePhase::Playing => match autopilot_target(game.state(), width) {
                Some(x) => host.hold(x),
                None => host.release(),
            },
            GamePhase::GameOver => {
                waited += 1;
                if waited >= RESTART_DELAY_FRAMES {
                    host.press(width as f32 / 2.0);
                    waited = 0;
                }
            }
        }

        for event in game.frame(&mut host) {
            match event {
                GameEvent::ObstacleSpawned { .. } => summary.spawned += 1,
                GameEvent::Collision { .. } => summary.collisions += 1,
                GameEvent::GameOver => summary.game_overs += 1,
                GameEvent::Restarted => summary.restarts += 1,
            }
        }
        host.take_commands();
        summary.frames += 1;
    }

    summary.best_run = game.best_run().max(game.state().run_time);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_is_edge_triggered() {
        let mut host = HeadlessHost::new(800, 600, 0.016, 1);
        host.press(10.0);
        assert!(host.just_clicked());
        assert!(host.is_pointer_down());
        host.end_frame();
        assert!(!host.just_clicked());
        assert!(host.is_pointer_down());
        host.release();
        assert!(!host.is_pointer_down());
    }

    #[test]
    fn test_records_draw_calls() {
        let mut host = HeadlessHost::new(800, 600, 0.016, 1);
        host.draw_scrolling_background(0.0, 1024.0);
        host.draw_centered_text("hi", Rect::new(0.0, 0.0, 10.0, 10.0));
        let commands = host.take_commands();
        assert_eq!(commands.len(), 2);
        assert!(host.take_commands().is_empty());
    }

    #[test]
    fn test_autopilot_dodges() {
        let mut state = GameState::new(800, 1024.0);
        // Player spans 362.5..437.5
        assert_eq!(autopilot_target(&state, 800), None);

        // Obstacle on the right half: go left of it
        state.spawn_obstacle(350.0, 500.0);
        let x = autopilot_target(&state, 800).unwrap();
        assert_eq!(x, 350.0 - 75.0 + 37.5);

        // Obstacle on the left: go right of it
        state.obstacles.clear();
        state.spawn_obstacle(150.0, 500.0);
        state.player.rect.pos.x = 200.0;
        let x = autopilot_target(&state, 800).unwrap();
        assert_eq!(x, 325.0 + 37.5);
    }

    #[test]
    fn test_autopilot_ignores_passed_obstacles() {
        let mut state = GameState::new(800, 1024.0);
        state.spawn_obstacle(362.5, 100.0);
        assert_eq!(autopilot_target(&state, 800), None);
    }

    #[test]
    fn test_session_is_deterministic() {
        let settings = Settings::default();
        let a = run_autopilot(&settings, 11, 800, 600, 1.0 / 60.0, 3600);
        let b = run_autopilot(&settings, 11, 800, 600, 1.0 / 60.0, 3600);
        assert_eq!(a, b);
        assert_eq!(a.frames, 3600);
        // One minute of play spawns obstacles
        assert!(a.spawned >= 20);
        assert!(a.restarts <= a.game_overs);
    }
}
