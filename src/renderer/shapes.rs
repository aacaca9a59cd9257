//! Shape generation for 2D primitives
//!
//! All shapes are produced in screen space (origin bottom-left, y up);
//! the pipeline maps them to NDC.

use super::vertex::Vertex;
use crate::host::Color;
use crate::sim::Rect;

/// Horizontal bands per background tile
pub const TILE_BANDS: u32 = 8;

/// Generate vertices for a filled rectangle (two triangles)
pub fn rect(rect: &Rect, color: Color) -> Vec<Vertex> {
    let (x0, y0) = (rect.x(), rect.y());
    let (x1, y1) = (rect.right(), rect.top());

    vec![
        Vertex::colored(x0, y0, color),
        Vertex::colored(x1, y0, color),
        Vertex::colored(x0, y1, color),
        Vertex::colored(x0, y1, color),
        Vertex::colored(x1, y0, color),
        Vertex::colored(x1, y1, color),
    ]
}

/// Generate vertices for one background tile whose bottom edge sits at
/// `offset`, spanning the full screen width
pub fn background_tile(offset: f32, width: f32, tile_height: f32, tones: [Color; 2]) -> Vec<Vertex> {
    let band_height = tile_height / TILE_BANDS as f32;
    let mut vertices = Vec::with_capacity((TILE_BANDS * 6) as usize);

    for i in 0..TILE_BANDS {
        let band = Rect::new(0.0, offset + i as f32 * band_height, width, band_height);
        vertices.extend(rect(&band, tones[(i % 2) as usize]));
    }

    vertices
}

/// Generate vertices for both copies of the scrolling background
pub fn scrolling_background(
    offsets: [f32; 2],
    width: f32,
    tile_height: f32,
    tones: [Color; 2],
) -> Vec<Vertex> {
    let mut vertices = background_tile(offsets[0], width, tile_height, tones);
    vertices.extend(background_tile(offsets[1], width, tile_height, tones));
    vertices
}
