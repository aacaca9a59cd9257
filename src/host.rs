//! Platform abstraction layer
//!
//! Everything the game needs from the outside world goes through [`Host`]:
//! - Frame time
//! - Screen size
//! - Pointer/touch input
//! - Randomness
//! - Drawing

use serde::{Deserialize, Serialize};

use crate::sim::Rect;

/// RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const CYAN: Color = Color([0.0, 1.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color([r, g, b, a])
    }

    pub fn to_array(self) -> [f32; 4] {
        self.0
    }
}

/// Services the game loop consumes each frame
pub trait Host {
    /// Seconds since the previous frame
    fn elapsed_seconds(&self) -> f32;

    fn screen_width(&self) -> u32;

    fn screen_height(&self) -> u32;

    /// Pointer or finger currently held down
    fn is_pointer_down(&self) -> bool;

    /// Absolute pointer X in screen pixels (meaningful while down)
    fn pointer_x(&self) -> f32;

    /// True only on the frame a click/tap started
    fn just_clicked(&self) -> bool;

    /// Uniform float between `min` and `max`
    fn uniform_random(&mut self, min: f32, max: f32) -> f32;

    /// Filled rectangle in screen space (origin bottom-left)
    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// Two stacked copies of the background tile at the given bottom offsets
    fn draw_scrolling_background(&mut self, offset1: f32, offset2: f32);

    /// One line of text centered inside `text_box`
    fn draw_centered_text(&mut self, line: &str, text_box: Rect);

    /// Called after the frame is drawn; edge-triggered input resets here
    fn end_frame(&mut self) {}
}
