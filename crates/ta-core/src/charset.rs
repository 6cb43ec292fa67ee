use std::str::FromStr;

use serde::Deserialize;

use crate::error::CoreError;

/// Bloc plein : un seul glyphe, la couleur porte toute l'information.
pub const CHARSET_BLOCK: &str = "█";

/// 4 niveaux d'ombrage Unicode.
pub const CHARSET_GRADIENT: &str = "░▒▓█";

/// 11 caractères ASCII, du plus clair au plus dense.
pub const CHARSET_ASCII: &str = ".:;+=xX$&#@";

/// 8 motifs Braille de densité croissante.
pub const CHARSET_BRAILLE: &str = "⠀⠁⠃⠇⠏⠟⠿⡿";

/// Named character set presets.
///
/// # Example
/// ```
/// use ta_core::charset::CharsetPreset;
/// assert_eq!(CharsetPreset::default(), CharsetPreset::Block);
/// assert_eq!(CharsetPreset::Gradient.chars(), Some("░▒▓█"));
/// assert_eq!(CharsetPreset::Custom.chars(), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetPreset {
    /// `█`
    #[default]
    Block,
    /// `░▒▓█`
    Gradient,
    /// `.:;+=xX$&#@`
    Ascii,
    /// `⠀⠁⠃⠇⠏⠟⠿⡿`
    Braille,
    /// User-defined ramp.
    Custom,
}

impl CharsetPreset {
    /// Built-in characters, `None` for [`CharsetPreset::Custom`].
    #[must_use]
    pub const fn chars(self) -> Option<&'static str> {
        match self {
            Self::Block => Some(CHARSET_BLOCK),
            Self::Gradient => Some(CHARSET_GRADIENT),
            Self::Ascii => Some(CHARSET_ASCII),
            Self::Braille => Some(CHARSET_BRAILLE),
            Self::Custom => None,
        }
    }
}

impl FromStr for CharsetPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "block" => Ok(Self::Block),
            "gradient" => Ok(Self::Gradient),
            "ascii" => Ok(Self::Ascii),
            "braille" => Ok(Self::Braille),
            "custom" => Ok(Self::Custom),
            other => Err(CoreError::Config(format!("jeu de caractères inconnu : {other}"))),
        }
    }
}

/// Ordered glyph sequence, index 0 = darkest. Never empty.
///
/// # Example
/// ```
/// use ta_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::new(" .:#@").unwrap();
/// assert_eq!(ramp.len(), 5);
/// assert_eq!(ramp.get(4), '@');
/// assert!(GlyphRamp::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from a string, one glyph per `char`.
    ///
    /// # Errors
    /// Returns [`CoreError::DegenerateRamp`] if `chars` is empty.
    pub fn new(chars: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = chars.chars().collect();
        if glyphs.is_empty() {
            return Err(CoreError::DegenerateRamp);
        }
        Ok(Self { glyphs })
    }

    /// Resolve a preset; `custom` is used only for [`CharsetPreset::Custom`].
    ///
    /// # Errors
    /// Returns [`CoreError::DegenerateRamp`] for an empty custom ramp.
    ///
    /// # Example
    /// ```
    /// use ta_core::charset::{CharsetPreset, GlyphRamp};
    /// let ramp = GlyphRamp::from_preset(CharsetPreset::Custom, "ab").unwrap();
    /// assert_eq!(ramp.len(), 2);
    /// let ramp = GlyphRamp::from_preset(CharsetPreset::Ascii, "ignored").unwrap();
    /// assert_eq!(ramp.len(), 11);
    /// ```
    pub fn from_preset(preset: CharsetPreset, custom: &str) -> Result<Self, CoreError> {
        Self::new(preset.chars().unwrap_or(custom))
    }

    /// Number of glyphs (at least 1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: an empty ramp cannot be built.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`, clamped to the last entry.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// Glyphs, darkest first.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lengths() {
        let len = |p| GlyphRamp::from_preset(p, "").map(|r| r.len());
        assert_eq!(len(CharsetPreset::Block), Ok(1));
        assert_eq!(len(CharsetPreset::Gradient), Ok(4));
        assert_eq!(len(CharsetPreset::Ascii), Ok(11));
        assert_eq!(len(CharsetPreset::Braille), Ok(8));
    }

    #[test]
    fn empty_custom_ramp_fails_fast() {
        assert_eq!(
            GlyphRamp::from_preset(CharsetPreset::Custom, ""),
            Err(CoreError::DegenerateRamp)
        );
    }

    #[test]
    fn preset_parsing() {
        assert_eq!("Braille".parse::<CharsetPreset>(), Ok(CharsetPreset::Braille));
        assert!("emoji".parse::<CharsetPreset>().is_err());
    }

    #[test]
    fn get_clamps_index() {
        let ramp = GlyphRamp::new("ab").unwrap();
        assert_eq!(ramp.get(99), 'b');
    }
}
