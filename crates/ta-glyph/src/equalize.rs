//! Auto-amélioration par égalisation d'histogramme de luminance.
//!
//! Deux passes strictement ordonnées : l'histogramme complet est construit
//! avant toute réécriture de pixel.

use rayon::prelude::*;
use ta_core::color::{luma, to_channel};
use ta_core::error::CoreError;
use ta_core::frame::PixelBuffer;

/// Luminance arrondie d'un pixel, index de bucket [0, 255].
#[inline(always)]
fn gray_level(px: &[u8]) -> usize {
    luma(f64::from(px[0]), f64::from(px[1]), f64::from(px[2]))
        .round()
        .clamp(0.0, 255.0) as usize
}

/// 256-bucket luminance histogram of the whole buffer.
///
/// # Example
/// ```
/// use ta_core::frame::PixelBuffer;
/// use ta_glyph::equalize::histogram;
/// let fb = PixelBuffer::filled(4, 4, [255, 255, 255, 255]);
/// let h = histogram(&fb);
/// assert_eq!(h[255], 16);
/// ```
#[must_use]
pub fn histogram(buffer: &PixelBuffer) -> [u64; 256] {
    buffer
        .data
        .par_chunks_exact(4)
        .fold(
            || [0u64; 256],
            |mut acc, px| {
                acc[gray_level(px)] += 1;
                acc
            },
        )
        .reduce(
            || [0u64; 256],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        )
}

/// Facteur multiplicatif par niveau de gris, dérivé de la distribution cumulée.
///
/// `factor[g] = round(cdf[g] / n * 255) / max(g, 1)`.
fn equalization_factors(hist: &[u64; 256], pixel_count: u64) -> [f64; 256] {
    let mut factors = [1.0f64; 256];
    let mut cdf = 0u64;
    for (gray, (count, factor)) in hist.iter().zip(factors.iter_mut()).enumerate() {
        cdf += count;
        let new_gray = (cdf as f64 / pixel_count as f64 * 255.0).round();
        *factor = new_gray / gray.max(1) as f64;
    }
    factors
}

/// Equalize the luminance histogram of `buffer`, in place.
///
/// Each pixel's channels are scaled by the ratio between its equalized and
/// original gray level. A buffer whose pixels all share one gray level is
/// left unchanged.
///
/// # Errors
/// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
///
/// # Example
/// ```
/// use ta_core::frame::PixelBuffer;
/// use ta_glyph::equalize::equalize;
/// let mut fb = PixelBuffer::filled(3, 3, [40, 80, 120, 255]);
/// let before = fb.clone();
/// equalize(&mut fb).unwrap();
/// assert_eq!(fb, before);
/// ```
pub fn equalize(buffer: &mut PixelBuffer) -> Result<(), CoreError> {
    buffer.validate()?;
    let pixel_count = buffer.pixel_count() as u64;
    if pixel_count == 0 {
        return Ok(());
    }

    let hist = histogram(buffer);
    let occupied = hist.iter().filter(|&&n| n > 0).count();
    if occupied <= 1 {
        log::debug!("Égalisation ignorée : luminance uniforme");
        return Ok(());
    }

    let factors = equalization_factors(&hist, pixel_count);
    log::debug!(
        "Égalisation {}×{} ({occupied} niveaux occupés)",
        buffer.width,
        buffer.height
    );

    buffer.data.par_chunks_exact_mut(4).for_each(|px| {
        let factor = factors[gray_level(px)];
        px[0] = to_channel(f64::from(px[0]) * factor);
        px[1] = to_channel(f64::from(px[1]) * factor);
        px[2] = to_channel(f64::from(px[2]) * factor);
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone() -> PixelBuffer {
        // Moitié gauche gris 50, moitié droite gris 200.
        let mut fb = PixelBuffer::new(4, 2);
        for (i, px) in fb.data.chunks_exact_mut(4).enumerate() {
            let v = if i % 4 < 2 { 50 } else { 200 };
            px.copy_from_slice(&[v, v, v, 255]);
        }
        fb
    }

    #[test]
    fn histogram_counts_every_pixel() {
        let h = histogram(&two_tone());
        assert_eq!(h.iter().sum::<u64>(), 8);
        assert_eq!(h[50], 4);
        assert_eq!(h[200], 4);
    }

    #[test]
    fn two_levels_spread_to_full_range() {
        let mut fb = two_tone();
        equalize(&mut fb).unwrap();
        // cdf[50] = 4/8 → 128 ; cdf[200] = 8/8 → 255.
        assert_eq!(fb.pixel(0, 0), (128, 128, 128, 255));
        assert_eq!(fb.pixel(3, 1), (255, 255, 255, 255));
    }

    #[test]
    fn single_gray_level_is_left_alone() {
        // Couleurs différentes, même luminance arrondie : un seul bucket occupé.
        let mut fb = PixelBuffer::new(2, 2);
        fb.data.copy_from_slice(&[
            100, 100, 100, 255, 101, 100, 97, 255, 100, 100, 100, 255, 101, 100, 97, 0,
        ]);
        let before = fb.clone();
        equalize(&mut fb).unwrap();
        assert_eq!(fb, before);

        let mut solid = PixelBuffer::filled(5, 3, [29, 111, 98, 255]);
        let before = solid.clone();
        equalize(&mut solid).unwrap();
        assert_eq!(solid, before);
    }

    #[test]
    fn black_pixels_do_not_divide_by_zero() {
        let mut fb = PixelBuffer::new(2, 1);
        fb.data.copy_from_slice(&[0, 0, 0, 255, 255, 255, 255, 255]);
        equalize(&mut fb).unwrap();
        // cdf[0] = 1/2 → 128, facteur 128/1 appliqué à 0 → 0.
        assert_eq!(fb.pixel(0, 0), (0, 0, 0, 255));
        assert_eq!(fb.pixel(1, 0), (255, 255, 255, 255));
    }

    #[test]
    fn empty_buffer_is_noop() {
        let mut fb = PixelBuffer::new(0, 0);
        assert!(equalize(&mut fb).is_ok());
    }

    #[test]
    fn factors_follow_cdf() {
        let mut hist = [0u64; 256];
        hist[10] = 1;
        hist[20] = 3;
        let f = equalization_factors(&hist, 4);
        // round(1/4 * 255) = 64 → 6.4
        assert!((f[10] - 6.4).abs() < 1e-9);
        assert!((f[20] - 255.0 / 20.0).abs() < 1e-9);
    }
}
