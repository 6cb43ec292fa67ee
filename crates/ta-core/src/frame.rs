use crate::color::Color;
use crate::error::CoreError;

/// Sélections plus étroites que ce seuil (en pixels) sont ignorées.
pub const MIN_SELECTION_SIZE: u32 = 5;

/// Largeur maximale de la grille en mode aperçu.
pub const PREVIEW_MAX_WIDTH: u32 = 40;

/// Hauteur maximale de la grille en mode aperçu.
pub const PREVIEW_MAX_HEIGHT: u32 = 25;

/// Buffer de pixels source, RGBA row-major, 4 bytes par pixel.
///
/// Mutated in place by the tone and equalization passes, read-only while rendering.
///
/// # Example
/// ```
/// use ta_core::frame::PixelBuffer;
/// let fb = PixelBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelBuffer {
    /// Crée un buffer noir transparent aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; Self::expected_len(width, height)],
            width,
            height,
        }
    }

    /// Wrap raw RGBA bytes, checking that the length matches the dimensions.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferShapeMismatch`] if `data.len() != width * height * 4`.
    ///
    /// # Example
    /// ```
    /// use ta_core::frame::PixelBuffer;
    /// assert!(PixelBuffer::from_raw(vec![0; 16], 2, 2).is_ok());
    /// assert!(PixelBuffer::from_raw(vec![0; 15], 2, 2).is_err());
    /// ```
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> Result<Self, CoreError> {
        let buffer = Self {
            data,
            width,
            height,
        };
        buffer.validate()?;
        Ok(buffer)
    }

    /// Crée un buffer rempli d'une seule couleur RGBA.
    ///
    /// # Example
    /// ```
    /// use ta_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::filled(2, 2, [255, 0, 0, 255]);
    /// assert_eq!(fb.pixel(1, 1), (255, 0, 0, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            data: rgba.repeat(pixels),
            width,
            height,
        }
    }

    /// Byte length implied by the dimensions.
    #[inline]
    #[must_use]
    pub fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    /// Check the `data.len() == width * height * 4` invariant.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferShapeMismatch`] when the invariant is broken.
    pub fn validate(&self) -> Result<(), CoreError> {
        let expected = Self::expected_len(self.width, self.height);
        if self.data.len() == expected {
            Ok(())
        } else {
            Err(CoreError::BufferShapeMismatch {
                expected,
                actual: self.data.len(),
            })
        }
    }

    /// Number of pixels in the buffer.
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Accès au pixel (x, y) → (r, g, b, a). Hors limites → (0, 0, 0, 0).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        if x >= self.width || y >= self.height {
            return (0, 0, 0, 0);
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        match self.data.get(idx..idx + 4) {
            Some(px) => (px[0], px[1], px[2], px[3]),
            None => (0, 0, 0, 0),
        }
    }

    /// RGB color of pixel (x, y), alpha dropped.
    #[inline(always)]
    #[must_use]
    pub fn color(&self, x: u32, y: u32) -> Color {
        let (r, g, b, _) = self.pixel(x, y);
        Color::new(r, g, b)
    }

    /// Rectangle couvrant tout le buffer.
    #[must_use]
    pub fn full_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Axis-aligned rectangle in source-pixel coordinates.
///
/// # Example
/// ```
/// use ta_core::frame::Rect;
/// let r = Rect::new(8, 8, 10, 10).clamp_to(12, 12);
/// assert_eq!(r, Rect::new(8, 8, 4, 4));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Build a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with `[0, width) × [0, height)`.
    #[must_use]
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    /// Build a user selection, constrained to the buffer.
    ///
    /// Returns `None` when the clamped selection is smaller than
    /// [`MIN_SELECTION_SIZE`] on either axis.
    ///
    /// # Example
    /// ```
    /// use ta_core::frame::Rect;
    /// assert!(Rect::selection(Rect::new(0, 0, 4, 40), 100, 100).is_none());
    /// assert_eq!(
    ///     Rect::selection(Rect::new(90, 0, 40, 40), 100, 100),
    ///     Some(Rect::new(90, 0, 10, 40))
    /// );
    /// ```
    #[must_use]
    pub fn selection(raw: Self, buffer_width: u32, buffer_height: u32) -> Option<Self> {
        let rect = raw.clamp_to(buffer_width, buffer_height);
        if rect.width < MIN_SELECTION_SIZE || rect.height < MIN_SELECTION_SIZE {
            None
        } else {
            Some(rect)
        }
    }
}

/// Half-open pixel bounds `[start_x, end_x) × [start_y, end_y)` of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellBounds {
    /// First column (inclusive).
    pub start_x: u32,
    /// First row (inclusive).
    pub start_y: u32,
    /// Last column (exclusive).
    pub end_x: u32,
    /// Last row (exclusive).
    pub end_y: u32,
}

impl CellBounds {
    /// Build bounds from edges.
    #[must_use]
    pub const fn new(start_x: u32, start_y: u32, end_x: u32, end_y: u32) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Restrict to the pixels that exist in a `width × height` buffer.
    #[must_use]
    pub fn intersect(self, width: u32, height: u32) -> Self {
        Self {
            start_x: self.start_x.min(width),
            start_y: self.start_y.min(height),
            end_x: self.end_x.min(width),
            end_y: self.end_y.min(height),
        }
    }

    /// True if no pixel is covered.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end_x <= self.start_x || self.end_y <= self.start_y
    }
}

/// Target character grid dimensions.
///
/// # Example
/// ```
/// use ta_core::frame::GridSpec;
/// let grid = GridSpec::new(80, 24).unwrap();
/// assert_eq!(grid.cell_count(), 1920);
/// assert!(GridSpec::new(0, 24).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl GridSpec {
    /// Build a grid spec; both dimensions must be at least 1.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Dérive la hauteur depuis la largeur en conservant le ratio `aspect` (largeur / hauteur).
    ///
    /// # Errors
    /// Returns an error if `width` is zero or `aspect` is not a positive finite number.
    ///
    /// # Example
    /// ```
    /// use ta_core::frame::GridSpec;
    /// let grid = GridSpec::with_locked_aspect(50, 2.0).unwrap();
    /// assert_eq!(grid.height, 25);
    /// ```
    pub fn with_locked_aspect(width: u32, aspect: f64) -> Result<Self, CoreError> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(CoreError::Config(format!("ratio d'aspect invalide : {aspect}")));
        }
        let height = (f64::from(width) / aspect).round().max(1.0) as u32;
        Self::new(width, height)
    }

    /// Dérive la largeur depuis la hauteur : `width = round(height * aspect)`, au moins 1.
    ///
    /// # Errors
    /// Returns an error if `height` is zero or `aspect` is not a positive finite number.
    ///
    /// # Example
    /// ```
    /// use ta_core::frame::GridSpec;
    /// let grid = GridSpec::with_locked_aspect_height(20, 1.5).unwrap();
    /// assert_eq!((grid.width, grid.height), (30, 20));
    /// ```
    pub fn with_locked_aspect_height(height: u32, aspect: f64) -> Result<Self, CoreError> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(CoreError::Config(format!("ratio d'aspect invalide : {aspect}")));
        }
        let width = (f64::from(height) * aspect).round().max(1.0) as u32;
        Self::new(width, height)
    }

    /// Same grid, capped to the preview limits.
    #[must_use]
    pub fn preview(self) -> Self {
        Self {
            width: self.width.min(PREVIEW_MAX_WIDTH),
            height: self.height.min(PREVIEW_MAX_HEIGHT),
        }
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Single cell in the glyph grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur représentative de la région source.
    pub color: Color,
}

impl Default for GlyphCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: Color::BLACK,
        }
    }
}

/// Grille de sortie. Row-major.
///
/// # Example
/// ```
/// use ta_core::color::Color;
/// use ta_core::frame::{GlyphCell, GlyphGrid};
/// let mut grid = GlyphGrid::new(4, 2);
/// grid.set(3, 1, GlyphCell { ch: '#', color: Color::new(255, 0, 0) });
/// assert_eq!(grid.get(3, 1).ch, '#');
/// assert_eq!(grid.rows().count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<GlyphCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl GlyphGrid {
    /// Crée une grille pré-allouée.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![GlyphCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: GlyphCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &GlyphCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[GlyphCell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_short_buffer() {
        let err = PixelBuffer::from_raw(vec![0; 10], 2, 2).unwrap_err();
        assert_eq!(
            err,
            CoreError::BufferShapeMismatch {
                expected: 16,
                actual: 10
            }
        );
    }

    #[test]
    fn validate_catches_mutation() {
        let mut fb = PixelBuffer::new(3, 3);
        fb.data.pop();
        assert!(fb.validate().is_err());
    }

    #[test]
    fn pixel_out_of_bounds_is_black() {
        let fb = PixelBuffer::filled(2, 2, [9, 9, 9, 255]);
        assert_eq!(fb.pixel(2, 0), (0, 0, 0, 0));
        assert_eq!(fb.pixel(0, 5), (0, 0, 0, 0));
    }

    #[test]
    fn rect_fully_outside_clamps_to_empty() {
        let r = Rect::new(50, 50, 10, 10).clamp_to(20, 20);
        assert!(r.is_empty());
    }

    #[test]
    fn cell_bounds_intersect() {
        let b = CellBounds::new(8, 8, 12, 12).intersect(10, 10);
        assert_eq!(b, CellBounds::new(8, 8, 10, 10));
        assert!(CellBounds::new(3, 0, 3, 5).is_empty());
    }

    #[test]
    fn locked_aspect_never_below_one_row() {
        let grid = GridSpec::with_locked_aspect(1, 10.0).unwrap();
        assert_eq!(grid.height, 1);
        assert!(GridSpec::with_locked_aspect(10, 0.0).is_err());
        assert!(GridSpec::with_locked_aspect(10, f64::NAN).is_err());
    }

    #[test]
    fn locked_aspect_from_height() {
        let grid = GridSpec::with_locked_aspect_height(20, 4.0 / 3.0).unwrap();
        assert_eq!((grid.width, grid.height), (27, 20));
        let grid = GridSpec::with_locked_aspect_height(3, 0.1).unwrap();
        assert_eq!(grid.width, 1);
        assert!(GridSpec::with_locked_aspect_height(0, 1.0).is_err());
        assert!(GridSpec::with_locked_aspect_height(10, -2.0).is_err());
    }

    #[test]
    fn preview_caps_grid() {
        let grid = GridSpec::new(120, 10).unwrap().preview();
        assert_eq!((grid.width, grid.height), (40, 10));
    }
}
