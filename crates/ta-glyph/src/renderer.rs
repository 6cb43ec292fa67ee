use rayon::prelude::*;
use ta_core::charset::GlyphRamp;
use ta_core::config::{OutputFormat, RenderConfig, SamplingMethod};
use ta_core::error::CoreError;
use ta_core::frame::{CellBounds, GlyphCell, GlyphGrid, GridSpec, PixelBuffer, Rect};
use ta_core::traits::ProgressSink;

use crate::encode::encode;
use crate::glyph_map::map_to_glyph;
use crate::sampler::sample;

/// Au-delà de ce nombre de cellules, le rendu signale son début et sa fin.
pub const PROGRESS_CELL_THRESHOLD: usize = 1000;

/// Zone source effective : la sélection bornée au buffer si elle est non vide,
/// sinon tout le buffer.
///
/// # Example
/// ```
/// use ta_core::frame::{PixelBuffer, Rect};
/// use ta_glyph::renderer::source_area;
/// let fb = PixelBuffer::new(20, 10);
/// assert_eq!(source_area(&fb, None), Rect::new(0, 0, 20, 10));
/// assert_eq!(source_area(&fb, Some(Rect::new(5, 5, 0, 3))), Rect::new(0, 0, 20, 10));
/// assert_eq!(source_area(&fb, Some(Rect::new(15, 2, 10, 4))), Rect::new(15, 2, 5, 4));
/// ```
#[must_use]
pub fn source_area(buffer: &PixelBuffer, selection: Option<Rect>) -> Rect {
    selection
        .map(|r| r.clamp_to(buffer.width, buffer.height))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| buffer.full_rect())
}

/// Pixel bounds of cell `(col, row)`: both edges floored, so adjacent cells
/// share their seam and no source column or row is skipped.
///
/// # Example
/// ```
/// use ta_core::frame::{CellBounds, GridSpec, Rect};
/// use ta_glyph::renderer::cell_bounds;
/// let grid = GridSpec::new(3, 1).unwrap();
/// let area = Rect::new(0, 0, 10, 4);
/// assert_eq!(cell_bounds(area, grid, 0, 0), CellBounds::new(0, 0, 3, 4));
/// assert_eq!(cell_bounds(area, grid, 2, 0), CellBounds::new(6, 0, 10, 4));
/// ```
#[must_use]
pub fn cell_bounds(area: Rect, grid: GridSpec, col: u32, row: u32) -> CellBounds {
    let cell_w = f64::from(area.width) / f64::from(grid.width);
    let cell_h = f64::from(area.height) / f64::from(grid.height);
    let (x0, y0) = (f64::from(area.x), f64::from(area.y));
    let edge = |origin: f64, size: f64, i: u32| (origin + f64::from(i) * size).floor() as u32;
    CellBounds::new(
        edge(x0, cell_w, col),
        edge(y0, cell_h, row),
        edge(x0, cell_w, col + 1),
        edge(y0, cell_h, row + 1),
    )
}

/// Sample and map every cell of `grid` over the effective source area.
///
/// # Errors
/// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
///
/// # Example
/// ```
/// use ta_core::charset::GlyphRamp;
/// use ta_core::config::SamplingMethod;
/// use ta_core::frame::{GridSpec, PixelBuffer};
/// use ta_glyph::renderer::render_grid;
///
/// let fb = PixelBuffer::filled(8, 8, [255, 255, 255, 255]);
/// let ramp = GlyphRamp::new(" #").unwrap();
/// let spec = GridSpec::new(4, 2).unwrap();
/// let grid = render_grid(&fb, None, spec, SamplingMethod::Average, &ramp).unwrap();
/// assert!(grid.cells.iter().all(|c| c.ch == '#'));
/// ```
pub fn render_grid(
    buffer: &PixelBuffer,
    selection: Option<Rect>,
    grid: GridSpec,
    sampling: SamplingMethod,
    ramp: &GlyphRamp,
) -> Result<GlyphGrid, CoreError> {
    buffer.validate()?;
    let grid = GridSpec::new(grid.width, grid.height)?;
    let area = source_area(buffer, selection);
    let mut out = GlyphGrid::new(grid.width, grid.height);

    out.cells
        .par_chunks_mut(grid.width as usize)
        .enumerate()
        .for_each(|(row, cells)| {
            for (col, cell) in cells.iter_mut().enumerate() {
                let bounds = cell_bounds(area, grid, col as u32, row as u32);
                let color = sample(buffer, bounds, sampling);
                *cell = GlyphCell {
                    ch: map_to_glyph(color, ramp),
                    color,
                };
            }
        });
    Ok(out)
}

/// Render the buffer to text art in `format`.
///
/// Grids above [`PROGRESS_CELL_THRESHOLD`] cells report start and end to
/// `progress` when one is given.
///
/// # Errors
/// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
///
/// # Example
/// ```
/// use ta_core::charset::GlyphRamp;
/// use ta_core::config::{OutputFormat, SamplingMethod};
/// use ta_core::frame::{GridSpec, PixelBuffer};
/// use ta_glyph::renderer::render;
///
/// let fb = PixelBuffer::filled(4, 4, [255, 0, 0, 255]);
/// let ramp = GlyphRamp::new("ab").unwrap();
/// let out = render(&fb, None, GridSpec::new(2, 2).unwrap(), SamplingMethod::Average,
///                  &ramp, OutputFormat::BracketColor, None).unwrap();
/// let row = "[color=#ff0000]a[/color][color=#ff0000]a[/color]";
/// assert_eq!(out, format!("{row}\n{row}"));
/// ```
pub fn render(
    buffer: &PixelBuffer,
    selection: Option<Rect>,
    grid: GridSpec,
    sampling: SamplingMethod,
    ramp: &GlyphRamp,
    format: OutputFormat,
    progress: Option<&dyn ProgressSink>,
) -> Result<String, CoreError> {
    let total = grid.cell_count();
    let report = progress.filter(|_| total > PROGRESS_CELL_THRESHOLD);
    if let Some(sink) = report {
        sink.started(total);
    }
    log::debug!(
        "Rendu {}×{} ({total} cellules, {sampling:?}, {format:?})",
        grid.width,
        grid.height
    );

    let result = render_grid(buffer, selection, grid, sampling, ramp).map(|g| encode(&g, format));

    if let Some(sink) = report {
        sink.finished();
    }
    result
}

/// Aperçu : grille plafonnée à 40×25, toujours en HTML, sans signal de progression.
///
/// # Errors
/// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
pub fn render_preview(
    buffer: &PixelBuffer,
    selection: Option<Rect>,
    grid: GridSpec,
    sampling: SamplingMethod,
    ramp: &GlyphRamp,
) -> Result<String, CoreError> {
    render(
        buffer,
        selection,
        grid.preview(),
        sampling,
        ramp,
        OutputFormat::Html,
        None,
    )
}

/// Renderer configured once from a [`RenderConfig`].
///
/// # Example
/// ```
/// use ta_core::config::RenderConfig;
/// use ta_core::frame::PixelBuffer;
/// use ta_glyph::renderer::ArtRenderer;
///
/// let renderer = ArtRenderer::from_config(&RenderConfig::default()).unwrap();
/// let fb = PixelBuffer::filled(100, 60, [0, 128, 255, 255]);
/// let out = renderer.render(&fb, None, None).unwrap();
/// assert_eq!(out.matches("<br>").count(), 29);
/// ```
#[derive(Clone, Debug)]
pub struct ArtRenderer {
    ramp: GlyphRamp,
    sampling: SamplingMethod,
    format: OutputFormat,
    grid: GridSpec,
}

impl ArtRenderer {
    /// Build from explicit parts.
    #[must_use]
    pub fn new(
        ramp: GlyphRamp,
        sampling: SamplingMethod,
        format: OutputFormat,
        grid: GridSpec,
    ) -> Self {
        Self {
            ramp,
            sampling,
            format,
            grid,
        }
    }

    /// Resolve ramp and grid from a config.
    ///
    /// # Errors
    /// Returns an error for an empty custom ramp or a zero grid dimension.
    pub fn from_config(config: &RenderConfig) -> Result<Self, CoreError> {
        Ok(Self::new(
            config.ramp()?,
            config.sampling,
            config.format,
            config.grid()?,
        ))
    }

    /// Target grid.
    #[must_use]
    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Full render in the configured format.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
    pub fn render(
        &self,
        buffer: &PixelBuffer,
        selection: Option<Rect>,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<String, CoreError> {
        render(
            buffer,
            selection,
            self.grid,
            self.sampling,
            &self.ramp,
            self.format,
            progress,
        )
    }

    /// Capped HTML preview.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
    pub fn preview(
        &self,
        buffer: &PixelBuffer,
        selection: Option<Rect>,
    ) -> Result<String, CoreError> {
        render_preview(buffer, selection, self.grid, self.sampling, &self.ramp)
    }
}
