//! Per-frame game loop
//!
//! Samples the host, advances the simulation, reports events to the log and
//! draws the frame back through the host.

use crate::host::Host;
use crate::settings::{Palette, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, ScreenSize, TickInput, UniformSource, tick};
use crate::ui::game_over_overlay;

/// Routes spawn placement through the host's random source
struct HostRandom<'a, H: Host>(&'a mut H);

impl<H: Host> UniformSource for HostRandom<'_, H> {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        self.0.uniform_random(min, max)
    }
}

/// Owns the game state for the whole process lifetime
pub struct GameLoop {
    state: GameState,
    palette: Palette,
    /// Completed runs (game overs) since startup
    runs: u32,
    /// Longest run survived, in seconds
    best_run: f32,
}

impl GameLoop {
    pub fn new(screen_width: u32, settings: &Settings) -> Self {
        Self {
            state: GameState::new(screen_width, settings.background_tile_height),
            palette: settings.palette,
            runs: 0,
            best_run: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn best_run(&self) -> f32 {
        self.best_run
    }

    /// Run one frame: simulate, log, draw.
    ///
    /// The frame is drawn for the phase it started in, so the collision frame
    /// still shows the scene and the restart frame still shows the overlay.
    pub fn frame<H: Host>(&mut self, host: &mut H) -> Vec<GameEvent> {
        let dt = host.elapsed_seconds();
        let input = sample_input(host);
        let phase = self.state.phase;

        tick(&mut self.state, &input, dt, &mut HostRandom(&mut *host));

        let events = self.state.drain_events();
        self.report(&events);
        self.draw(host, phase, input.screen);
        host.end_frame();
        events
    }

    fn report(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::ObstacleSpawned { id, x } => {
                    log::debug!("Spawned obstacle {} at x={:.1}", id, x);
                }
                GameEvent::Collision { obstacle_id } => {
                    log::info!("Collision detected with obstacle {}! Game over.", obstacle_id);
                }
                GameEvent::GameOver => {
                    self.runs += 1;
                    self.best_run = self.best_run.max(self.state.run_time);
                    log::info!(
                        "Run {} ended after {:.1}s (best {:.1}s)",
                        self.runs,
                        self.state.run_time,
                        self.best_run
                    );
                }
                GameEvent::Restarted => log::info!("Restarted"),
            }
        }
    }

    fn draw<H: Host>(&self, host: &mut H, phase: GamePhase, screen: ScreenSize) {
        match phase {
            GamePhase::Playing => {
                let [offset1, offset2] = self.state.background.offsets;
                host.draw_scrolling_background(offset1, offset2);
                host.draw_rect(self.state.player.rect, self.palette.player);
                for obstacle in &self.state.obstacles {
                    host.draw_rect(obstacle.rect, self.palette.obstacle);
                }
            }
            GamePhase::GameOver => {
                for line in game_over_overlay(screen) {
                    host.draw_centered_text(line.text, line.text_box);
                }
            }
        }
    }
}

/// Read this frame's input from the host
fn sample_input<H: Host>(host: &H) -> TickInput {
    TickInput {
        screen: ScreenSize::new(host.screen_width(), host.screen_height()),
        pointer_x: host.is_pointer_down().then(|| host.pointer_x()),
        restart: host.just_clicked(),
    }
}
