use std::fmt;

/// Poids de luminance Rec. 601 (rouge).
pub const LUMA_R: f64 = 0.299;
/// Poids de luminance Rec. 601 (vert).
pub const LUMA_G: f64 = 0.587;
/// Poids de luminance Rec. 601 (bleu).
pub const LUMA_B: f64 = 0.114;

/// Luminance perceptuelle Rec. 601 sur des canaux flottants, résultat dans [0.0, 255.0].
///
/// Double précision : les seuils de la rampe tombent sur des valeurs exactes
/// (`{29, 111, 98}` donne 85.0, soit 1/3 de la plage).
///
/// # Example
/// ```
/// use ta_core::color::luma;
/// assert_eq!(luma(255.0, 255.0, 255.0), 255.0);
/// assert_eq!(luma(0.0, 0.0, 0.0), 0.0);
/// ```
#[inline(always)]
#[must_use]
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Stocke une valeur flottante dans un canal 8 bits : clamp [0, 255] puis arrondi au pair.
#[inline(always)]
#[must_use]
pub fn to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Couleur RGB 8 bits, unité produite par l'échantillonnage d'une cellule.
///
/// # Example
/// ```
/// use ta_core::color::Color;
/// let c = Color::new(255, 0, 0);
/// assert_eq!(c.to_hex(), "#ff0000");
/// assert!((c.luminance() - 76.245).abs() < 0.001);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Sentinelle renvoyée pour les régions vides ou hors limites.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Luminance Rec. 601 dans [0.0, 255.0].
    #[inline(always)]
    #[must_use]
    pub fn luminance(self) -> f64 {
        luma(f64::from(self.r), f64::from(self.g), f64::from(self.b))
    }

    /// Hex notation `#rrggbb`, lowercase.
    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
