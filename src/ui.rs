//! Game-over overlay layout
//!
//! Two lines in 400x200 boxes centered horizontally. The headline box is
//! centered on the screen, the prompt box sits 100 px lower.

use crate::consts::{OVERLAY_BOX_HEIGHT, OVERLAY_BOX_WIDTH};
use crate::sim::{Rect, ScreenSize};

pub const GAME_OVER_TEXT: &str = "Game Over!";
pub const RESTART_TEXT: &str = "Tap to Restart";

/// A line of overlay text and the box it is centered in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLine {
    pub text: &'static str,
    pub text_box: Rect,
}

/// Layout of the game-over overlay for a screen size
pub fn game_over_overlay(screen: ScreenSize) -> [OverlayLine; 2] {
    // Integer halves, so odd sizes round down
    let half_w = (screen.width / 2) as f32;
    let half_h = (screen.height / 2) as f32;
    let box_w = OVERLAY_BOX_WIDTH as f32;
    let box_h = OVERLAY_BOX_HEIGHT as f32;
    let box_x = half_w - box_w / 2.0;

    [
        OverlayLine {
            text: GAME_OVER_TEXT,
            text_box: Rect::new(box_x, half_h - box_h / 2.0, box_w, box_h),
        },
        OverlayLine {
            text: RESTART_TEXT,
            text_box: Rect::new(box_x, half_h - box_h, box_w, box_h),
        },
    ]
}
