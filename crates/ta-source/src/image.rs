use std::path::Path;

use anyhow::{Context, Result};
use ta_core::frame::PixelBuffer;

/// Charge une image (PNG, JPEG, BMP, GIF) et la décode en buffer RGBA.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
///
/// # Example
/// ```no_run
/// use ta_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img =
        image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))?;
    let buffer = from_dynamic(img)?;
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        buffer.width,
        buffer.height
    );
    Ok(buffer)
}

/// Decode an in-memory encoded image (format guessed from its header).
///
/// # Errors
/// Returns an error if the bytes are not a supported image.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).context("Format d'image non reconnu")?;
    from_dynamic(img)
}

/// Convert a decoded image to an RGBA [`PixelBuffer`].
///
/// # Errors
/// Returns an error if the decoded image is empty.
pub fn from_dynamic(img: image::DynamicImage) -> Result<PixelBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        anyhow::bail!("Image vide ({width}×{height})");
    }
    Ok(PixelBuffer::from_raw(rgba.into_raw(), width, height)?)
}
