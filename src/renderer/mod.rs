//! WebGPU rendering module
//!
//! Everything is drawn as colored triangles built on the CPU each frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
