//! Ajustements tonals : luminosité → contraste → saturation → seuil.
//!
//! Les canaux restent en double précision entre les étapes et ne sont
//! arrondis qu'au stockage final dans le buffer.

use rayon::prelude::*;
use ta_core::color::{luma, to_channel};
use ta_core::config::AdjustmentConfig;
use ta_core::error::CoreError;
use ta_core::frame::PixelBuffer;

/// Facteur de contraste pré-calculé pour une passe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContrastFactor {
    /// `f * (c - 128) + 128`.
    Finite(f64),
    /// Dénominateur nul ou négatif : sortie noir/blanc selon le signe de `c - 128`.
    Infinite,
}

impl ContrastFactor {
    /// `259 * (contrast + 255) / (255 * (259 - contrast))`, guarded.
    ///
    /// # Example
    /// ```
    /// use ta_glyph::tone::ContrastFactor;
    /// assert_eq!(ContrastFactor::new(0), ContrastFactor::Finite(1.0));
    /// assert_eq!(ContrastFactor::new(259), ContrastFactor::Infinite);
    /// ```
    #[must_use]
    pub fn new(contrast: i32) -> Self {
        let denominator = 259 - i64::from(contrast);
        if denominator <= 0 {
            return Self::Infinite;
        }
        let numerator = 259.0 * (f64::from(contrast) + 255.0);
        Self::Finite(numerator / (255.0 * denominator as f64))
    }

    #[inline(always)]
    fn apply(self, c: f64) -> f64 {
        match self {
            Self::Finite(f) => (f * (c - 128.0) + 128.0).clamp(0.0, 255.0),
            Self::Infinite => {
                if c < 128.0 {
                    0.0
                } else {
                    255.0
                }
            }
        }
    }
}

/// Paramètres dérivés d'un [`AdjustmentConfig`], calculés une fois par passe.
#[derive(Clone, Copy, Debug)]
pub struct ToneParams {
    brightness: f64,
    contrast: ContrastFactor,
    saturation: f64,
    threshold: Option<f64>,
}

impl ToneParams {
    /// Precompute the per-pass factors.
    #[must_use]
    pub fn new(cfg: &AdjustmentConfig) -> Self {
        Self {
            brightness: f64::from(cfg.brightness),
            contrast: ContrastFactor::new(cfg.contrast),
            saturation: (f64::from(cfg.saturation) + 100.0) / 100.0,
            threshold: (cfg.threshold > 0).then_some(f64::from(cfg.threshold)),
        }
    }

    /// Adjust one RGB triple.
    ///
    /// # Example
    /// ```
    /// use ta_core::config::AdjustmentConfig;
    /// use ta_glyph::tone::ToneParams;
    /// let params = ToneParams::new(&AdjustmentConfig { brightness: 20, ..Default::default() });
    /// assert_eq!(params.apply(10, 250, 100), (30, 255, 120));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn apply(&self, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        let shift = |c: u8| (f64::from(c) + self.brightness).clamp(0.0, 255.0);
        let (r, g, b) = (shift(r), shift(g), shift(b));

        let (r, g, b) = (
            self.contrast.apply(r),
            self.contrast.apply(g),
            self.contrast.apply(b),
        );

        let gray = luma(r, g, b);
        let saturate = |c: f64| (gray + self.saturation * (c - gray)).clamp(0.0, 255.0);
        let (r, g, b) = (saturate(r), saturate(g), saturate(b));

        if let Some(threshold) = self.threshold {
            let v = if (r + g + b) / 3.0 < threshold { 0 } else { 255 };
            return (v, v, v);
        }
        (to_channel(r), to_channel(g), to_channel(b))
    }
}

/// Apply the tone adjustments to every pixel of `buffer`, in place.
///
/// Alpha is left untouched. Rows are processed in parallel.
///
/// # Errors
/// Returns [`CoreError::BufferShapeMismatch`] if the buffer is malformed.
///
/// # Example
/// ```
/// use ta_core::config::AdjustmentConfig;
/// use ta_core::frame::PixelBuffer;
/// use ta_glyph::tone::adjust;
///
/// let mut fb = PixelBuffer::filled(2, 2, [100, 100, 100, 255]);
/// adjust(&mut fb, &AdjustmentConfig { threshold: 128, ..Default::default() }).unwrap();
/// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 255));
/// ```
pub fn adjust(buffer: &mut PixelBuffer, cfg: &AdjustmentConfig) -> Result<(), CoreError> {
    buffer.validate()?;
    if cfg.is_identity() || buffer.data.is_empty() {
        return Ok(());
    }
    let params = ToneParams::new(cfg);
    log::debug!(
        "Ajustements {}×{} : luminosité {}, contraste {}, saturation {}, seuil {}",
        buffer.width,
        buffer.height,
        cfg.brightness,
        cfg.contrast,
        cfg.saturation,
        cfg.threshold
    );

    let stride = buffer.width as usize * 4;
    buffer.data.par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let (r, g, b) = params.apply(px[0], px[1], px[2]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(cfg: AdjustmentConfig) -> ToneParams {
        ToneParams::new(&cfg)
    }

    #[test]
    fn zero_config_is_identity_per_pixel() {
        let p = params(AdjustmentConfig::default());
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    assert_eq!(p.apply(r, g, b), (r, g, b));
                }
            }
        }
    }

    #[test]
    fn zero_config_is_identity_on_buffer() {
        let data: Vec<u8> = (0..=255u8).cycle().take(8 * 8 * 4).collect();
        let mut fb = PixelBuffer::from_raw(data.clone(), 8, 8).unwrap();
        adjust(&mut fb, &AdjustmentConfig::default()).unwrap();
        assert_eq!(fb.data, data);
    }

    #[test]
    fn threshold_splits_on_average() {
        let p = params(AdjustmentConfig {
            threshold: 128,
            ..Default::default()
        });
        assert_eq!(p.apply(100, 100, 100), (0, 0, 0));
        assert_eq!(p.apply(200, 200, 200), (255, 255, 255));
        assert_eq!(p.apply(128, 128, 128), (255, 255, 255));
    }

    #[test]
    fn brightness_clamps() {
        let p = params(AdjustmentConfig {
            brightness: -100,
            ..Default::default()
        });
        assert_eq!(p.apply(50, 150, 255), (0, 50, 155));
    }

    #[test]
    fn contrast_spreads_around_midpoint() {
        let p = params(AdjustmentConfig {
            contrast: 100,
            ..Default::default()
        });
        assert!(p.apply(100, 100, 100).0 < 100);
        assert_eq!(p.apply(128, 128, 128).0, 128);
        assert!(p.apply(160, 160, 160).0 > 160);
    }

    #[test]
    fn chain_rounds_only_on_store() {
        // Preset photo : le bleu vaut 10.4999… avant stockage, pas 10.5.
        let p = params(AdjustmentConfig {
            contrast: 10,
            saturation: 5,
            ..Default::default()
        });
        assert_eq!(p.apply(183, 250, 28), (186, 255, 10));
    }

    #[test]
    fn infinite_contrast_is_black_or_white() {
        let p = params(AdjustmentConfig {
            contrast: 300,
            ..Default::default()
        });
        assert_eq!(p.apply(127, 128, 10), (0, 255, 0));
        let p = params(AdjustmentConfig {
            contrast: 259,
            ..Default::default()
        });
        assert_eq!(p.apply(0, 255, 200), (0, 255, 255));
    }

    #[test]
    fn full_desaturation_gives_gray() {
        let p = params(AdjustmentConfig {
            saturation: -100,
            ..Default::default()
        });
        let (r, g, b) = p.apply(255, 0, 0);
        assert_eq!((r, g, b), (76, 76, 76));
    }

    #[test]
    fn alpha_untouched() {
        let mut fb = PixelBuffer::filled(3, 1, [10, 20, 30, 77]);
        adjust(
            &mut fb,
            &AdjustmentConfig {
                brightness: 50,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(fb.pixel(2, 0), (60, 70, 80, 77));
    }

    #[test]
    fn malformed_buffer_rejected() {
        let mut fb = PixelBuffer::new(2, 2);
        fb.data.truncate(5);
        assert!(
            adjust(
                &mut fb,
                &AdjustmentConfig {
                    brightness: 1,
                    ..Default::default()
                }
            )
            .is_err()
        );
    }
}
