/// Configuration, types, and shared structures for textart.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the textart workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::{CharsetPreset, GlyphRamp};
pub use color::Color;
pub use config::{AdjustmentConfig, OutputFormat, Preset, RenderConfig, SamplingMethod};
pub use error::CoreError;
pub use frame::{CellBounds, GlyphCell, GlyphGrid, GridSpec, PixelBuffer, Rect};
