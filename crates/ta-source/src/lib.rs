/// Image sources for textart: decoding files to pixel buffers and fitting them to a canvas.

pub mod image;
pub mod resize;

pub use crate::image::{decode_image, load_image};
pub use crate::resize::{fit_within, resize_into};
