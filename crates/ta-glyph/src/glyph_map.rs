use ta_core::charset::GlyphRamp;
use ta_core::color::Color;

/// Map a color's luminance to a glyph of the ramp.
///
/// A single-glyph ramp always returns that glyph. Otherwise the index is
/// `floor(luminance / 255 * (len - 1))`, so brighter colors never map to a
/// lower index.
///
/// # Example
/// ```
/// use ta_core::charset::GlyphRamp;
/// use ta_core::color::Color;
/// use ta_glyph::glyph_map::map_to_glyph;
///
/// let ramp = GlyphRamp::new(" .:#@").unwrap();
/// assert_eq!(map_to_glyph(Color::BLACK, &ramp), ' ');
/// assert_eq!(map_to_glyph(Color::new(255, 255, 255), &ramp), '@');
/// ```
#[inline(always)]
#[must_use]
pub fn map_to_glyph(color: Color, ramp: &GlyphRamp) -> char {
    if ramp.len() == 1 {
        return ramp.get(0);
    }
    let last = ramp.len() - 1;
    let index = (color.luminance() / 255.0 * last as f64).floor().max(0.0) as usize;
    ramp.get(index.min(last))
}
