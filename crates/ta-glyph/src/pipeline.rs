use ta_core::config::AdjustmentConfig;
use ta_core::error::CoreError;
use ta_core::frame::PixelBuffer;

use crate::{equalize, tone};

/// Prépare le buffer pour le rendu : ajustements tonals, puis égalisation si `auto_enhance`.
///
/// The tone pass always completes before the equalization histogram is read.
///
/// # Errors
/// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
///
/// # Example
/// ```
/// use ta_core::config::AdjustmentConfig;
/// use ta_core::frame::PixelBuffer;
/// use ta_glyph::pipeline::process;
///
/// let mut fb = PixelBuffer::filled(2, 2, [200, 200, 200, 255]);
/// let cfg = AdjustmentConfig { threshold: 128, auto_enhance: true, ..Default::default() };
/// process(&mut fb, &cfg).unwrap();
/// assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
/// ```
pub fn process(buffer: &mut PixelBuffer, adjust: &AdjustmentConfig) -> Result<(), CoreError> {
    tone::adjust(buffer, adjust)?;
    if adjust.auto_enhance {
        equalize::equalize(buffer)?;
    }
    Ok(())
}
