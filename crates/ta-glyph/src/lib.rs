/// Glyph rendering engine for textart.
///
/// Tone adjustment, histogram equalization, region sampling, glyph mapping
/// and text serialization of pixel buffers.

pub mod encode;
pub mod equalize;
pub mod glyph_map;
pub mod pipeline;
pub mod renderer;
pub mod sampler;
pub mod tone;

pub use renderer::{ArtRenderer, render, render_grid, render_preview};
