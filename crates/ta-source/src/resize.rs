use anyhow::{Context, Result};
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use ta_core::frame::PixelBuffer;

/// Resize `src` into `dst`. Dimensions of `dst` determine output size.
///
/// # Errors
/// Returns an error if either buffer is malformed or the resize operation fails.
///
/// # Example
/// ```
/// use ta_source::resize::resize_into;
/// use ta_core::frame::PixelBuffer;
/// let src = PixelBuffer::new(100, 100);
/// let mut dst = PixelBuffer::new(50, 50);
/// resize_into(&src, &mut dst).unwrap();
/// ```
pub fn resize_into(src: &PixelBuffer, dst: &mut PixelBuffer) -> Result<()> {
    src.validate()?;
    dst.validate()?;
    if src.width == dst.width && src.height == dst.height {
        dst.data.copy_from_slice(&src.data);
        return Ok(());
    }

    let src_image = ImageRef::new(src.width, src.height, &src.data, PixelType::U8x4)
        .context("Dimensions source invalides")?;
    let mut dst_image = Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
        .context("Dimensions destination invalides")?;

    Resizer::new()
        .resize(&src_image, &mut dst_image, Some(&ResizeOptions::new()))
        .context("Redimensionnement échoué")?;

    Ok(())
}

/// Dimensions après ajustement dans `max_width × max_height`, sans agrandissement.
///
/// `scale = min(max_w / w, max_h / h, 1)`, each side truncated, at least 1.
///
/// # Example
/// ```
/// use ta_source::resize::fit_dimensions;
/// assert_eq!(fit_dimensions(1600, 1000, 800, 500), (800, 500));
/// assert_eq!(fit_dimensions(300, 200, 800, 500), (300, 200));
/// assert_eq!(fit_dimensions(1000, 2000, 800, 500), (250, 500));
/// ```
#[must_use]
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let scale = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height))
        .min(1.0);
    let side = |v: u32| ((f64::from(v) * scale) as u32).max(1);
    (side(width), side(height))
}

/// Scale `src` down to fit within `max_width × max_height`, keeping its aspect ratio.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use ta_core::frame::PixelBuffer;
/// use ta_source::resize::fit_within;
/// let src = PixelBuffer::new(1600, 400);
/// let dst = fit_within(&src, 800, 500).unwrap();
/// assert_eq!((dst.width, dst.height), (800, 200));
/// ```
pub fn fit_within(src: &PixelBuffer, max_width: u32, max_height: u32) -> Result<PixelBuffer> {
    let (width, height) = fit_dimensions(src.width, src.height, max_width, max_height);
    if (width, height) == (src.width, src.height) {
        return Ok(src.clone());
    }
    log::debug!(
        "Ajustement {}×{} → {width}×{height}",
        src.width,
        src.height
    );
    let mut dst = PixelBuffer::new(width, height);
    resize_into(src, &mut dst)?;
    Ok(dst)
}
