use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// A glyph ramp must hold at least one character.
    #[error("Rampe de glyphes vide : au moins un caractère requis")]
    DegenerateRamp,

    /// Pixel buffer length does not match `width * height * 4`.
    #[error("Buffer incohérent : {expected} octets attendus, {actual} reçus")]
    BufferShapeMismatch {
        /// Length implied by the declared dimensions.
        expected: usize,
        /// Actual length of the data.
        actual: usize,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },
}
