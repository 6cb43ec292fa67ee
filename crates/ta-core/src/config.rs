use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::charset::{CharsetPreset, GlyphRamp};
use crate::error::CoreError;
use crate::frame::GridSpec;

/// Réglages tonals appliqués avant le rendu.
///
/// Snapshot immuable consommé par une passe d'ajustement.
///
/// # Example
/// ```
/// use ta_core::config::AdjustmentConfig;
/// let adjust = AdjustmentConfig::default();
/// assert!(adjust.is_identity());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdjustmentConfig {
    /// Offset ajouté à chaque canal [-100, 100].
    pub brightness: i32,
    /// Contraste [-100, 100]. 0 = neutre.
    pub contrast: i32,
    /// Saturation [-100, 100]. -100 = niveaux de gris.
    pub saturation: i32,
    /// Seuil noir/blanc [0, 255]. 0 = désactivé.
    pub threshold: i32,
    /// Égalisation d'histogramme après les ajustements.
    pub auto_enhance: bool,
}

impl AdjustmentConfig {
    /// Clamp all numeric fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.brightness = self.brightness.clamp(-100, 100);
        self.contrast = self.contrast.clamp(-100, 100);
        self.saturation = self.saturation.clamp(-100, 100);
        self.threshold = self.threshold.clamp(0, 255);
    }

    /// True when the tone pass would leave every pixel unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.brightness == 0 && self.contrast == 0 && self.saturation == 0 && self.threshold == 0
    }
}

/// Stratégie de réduction d'une région de pixels à une couleur.
///
/// # Example
/// ```
/// use ta_core::config::SamplingMethod;
/// let m: SamplingMethod = "weighted".parse().unwrap();
/// assert_eq!(m, SamplingMethod::WeightedAverage);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMethod {
    /// Moyenne arithmétique.
    #[default]
    Average,
    /// Pixel central.
    Center,
    /// Couleur quantifiée la plus fréquente.
    Dominant,
    /// Médiane par canal.
    Median,
    /// Moyenne pondérée par la distance au centre.
    #[serde(rename = "weighted", alias = "weightedaverage")]
    WeightedAverage,
}

impl FromStr for SamplingMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "average" => Ok(Self::Average),
            "center" => Ok(Self::Center),
            "dominant" => Ok(Self::Dominant),
            "median" => Ok(Self::Median),
            "weighted" | "weightedaverage" | "weighted-average" => Ok(Self::WeightedAverage),
            other => Err(CoreError::Config(format!(
                "méthode d'échantillonnage inconnue : {other}"
            ))),
        }
    }
}

/// Output encoding.
///
/// # Example
/// ```
/// use ta_core::config::OutputFormat;
/// assert_eq!("bracket".parse::<OutputFormat>().unwrap(), OutputFormat::BracketColor);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<span style="color: #rrggbb">G</span>`, rows joined by `<br>`.
    #[default]
    Html,
    /// `[color=#rrggbb]G[/color]`, rows joined by `\n`.
    #[serde(rename = "bracket", alias = "bracketcolor")]
    BracketColor,
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "bracket" | "bracketcolor" | "bbcode" => Ok(Self::BracketColor),
            other => Err(CoreError::Config(format!("format de sortie inconnu : {other}"))),
        }
    }
}

/// Configuration complète d'un rendu.
///
/// Chargée depuis TOML via [`parse_config`]. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ta_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!((config.grid_width, config.grid_height), (50, 30));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Réglages tonals.
    pub adjust: AdjustmentConfig,
    /// Méthode d'échantillonnage des cellules.
    pub sampling: SamplingMethod,
    /// Jeu de caractères actif.
    pub charset: CharsetPreset,
    /// Caractères du jeu `custom`.
    pub custom_charset: String,
    /// Encodage de sortie.
    pub format: OutputFormat,
    /// Largeur de la grille en caractères.
    pub grid_width: u32,
    /// Hauteur de la grille en caractères.
    pub grid_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            adjust: AdjustmentConfig::default(),
            sampling: SamplingMethod::Average,
            charset: CharsetPreset::Block,
            custom_charset: crate::charset::CHARSET_BLOCK.to_string(),
            format: OutputFormat::Html,
            grid_width: 50,
            grid_height: 30,
        }
    }
}

impl RenderConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.adjust.clamp_all();
        self.grid_width = self.grid_width.max(1);
        self.grid_height = self.grid_height.max(1);
    }

    /// Grid dimensions as a [`GridSpec`].
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if a dimension is zero.
    pub fn grid(&self) -> Result<GridSpec, CoreError> {
        GridSpec::new(self.grid_width, self.grid_height)
    }

    /// Resolve the active glyph ramp.
    ///
    /// # Errors
    /// Returns [`CoreError::DegenerateRamp`] if the custom ramp is selected and empty.
    pub fn ramp(&self) -> Result<GlyphRamp, CoreError> {
        GlyphRamp::from_preset(self.charset, &self.custom_charset)
    }

    /// Overwrite the fields a preset controls.
    pub fn apply_preset(&mut self, preset: Preset) {
        let p = preset.settings();
        self.adjust.brightness = p.brightness;
        self.adjust.contrast = p.contrast;
        self.adjust.saturation = p.saturation;
        self.adjust.threshold = p.threshold;
        self.sampling = p.sampling;
        self.charset = p.charset;
    }
}

/// Réglages prédéfinis pour des usages typiques.
///
/// # Example
/// ```
/// use ta_core::config::{Preset, RenderConfig, SamplingMethod};
/// let mut config = RenderConfig::default();
/// config.apply_preset(Preset::Terminal);
/// assert_eq!(config.sampling, SamplingMethod::Center);
/// assert_eq!(config.adjust.contrast, 30);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Photographie : léger contraste, bloc plein.
    Photo,
    /// Illustration : couleur dominante, dégradé.
    Artwork,
    /// Terminal : désaturé, ASCII.
    Terminal,
    /// Rétro : seuil noir/blanc.
    Retro,
}

/// Values carried by a [`Preset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresetSettings {
    /// Brightness offset.
    pub brightness: i32,
    /// Contrast.
    pub contrast: i32,
    /// Saturation.
    pub saturation: i32,
    /// Threshold (0 = off).
    pub threshold: i32,
    /// Sampling method.
    pub sampling: SamplingMethod,
    /// Character set.
    pub charset: CharsetPreset,
}

impl Preset {
    /// Settings applied by this preset.
    #[must_use]
    pub const fn settings(self) -> PresetSettings {
        match self {
            Self::Photo => PresetSettings {
                brightness: 0,
                contrast: 10,
                saturation: 5,
                threshold: 0,
                sampling: SamplingMethod::Average,
                charset: CharsetPreset::Block,
            },
            Self::Artwork => PresetSettings {
                brightness: 5,
                contrast: 20,
                saturation: 15,
                threshold: 0,
                sampling: SamplingMethod::Dominant,
                charset: CharsetPreset::Gradient,
            },
            Self::Terminal => PresetSettings {
                brightness: 0,
                contrast: 30,
                saturation: -20,
                threshold: 0,
                sampling: SamplingMethod::Center,
                charset: CharsetPreset::Ascii,
            },
            Self::Retro => PresetSettings {
                brightness: -5,
                contrast: 25,
                saturation: -10,
                threshold: 50,
                sampling: SamplingMethod::Dominant,
                charset: CharsetPreset::Block,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "photo" => Ok(Self::Photo),
            "artwork" => Ok(Self::Artwork),
            "terminal" => Ok(Self::Terminal),
            "retro" => Ok(Self::Retro),
            other => Err(CoreError::Config(format!(
                "preset inconnu : {other} (photo, artwork, terminal, retro)"
            ))),
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    preset: Option<Preset>,
    adjust: Option<AdjustSection>,
    render: Option<RenderSection>,
}

/// Adjustment section, all fields optional for partial override.
#[derive(Deserialize)]
struct AdjustSection {
    brightness: Option<i32>,
    contrast: Option<i32>,
    saturation: Option<i32>,
    threshold: Option<i32>,
    auto_enhance: Option<bool>,
}

/// Render section, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    sampling: Option<SamplingMethod>,
    charset: Option<CharsetPreset>,
    custom_charset: Option<String>,
    format: Option<OutputFormat>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse TOML text and merge it over the defaults.
///
/// A top-level `preset` is applied first; explicit section values then win.
///
/// # Errors
/// Returns an error if the TOML is malformed.
///
/// # Example
/// ```
/// use ta_core::config::{parse_config, SamplingMethod};
/// let config = parse_config("[render]\nsampling = \"median\"\nwidth = 80\n").unwrap();
/// assert_eq!(config.sampling, SamplingMethod::Median);
/// assert_eq!(config.grid_width, 80);
/// assert_eq!(config.grid_height, 30);
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = RenderConfig::default();
    if let Some(preset) = file.preset {
        config.apply_preset(preset);
    }

    if let Some(a) = file.adjust {
        if let Some(v) = a.brightness {
            config.adjust.brightness = v;
        }
        if let Some(v) = a.contrast {
            config.adjust.contrast = v;
        }
        if let Some(v) = a.saturation {
            config.adjust.saturation = v;
        }
        if let Some(v) = a.threshold {
            config.adjust.threshold = v;
        }
        if let Some(v) = a.auto_enhance {
            config.adjust.auto_enhance = v;
        }
    }

    if let Some(r) = file.render {
        if let Some(v) = r.sampling {
            config.sampling = v;
        }
        if let Some(v) = r.charset {
            config.charset = v;
        }
        if let Some(v) = r.custom_charset {
            config.custom_charset = v;
        }
        if let Some(v) = r.format {
            config.format = v;
        }
        if let Some(v) = r.width {
            config.grid_width = v;
        }
        if let Some(v) = r.height {
            config.grid_height = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ta_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
    log::debug!("Configuration chargée depuis {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            "[adjust]\nbrightness = 500\ncontrast = -300\nthreshold = 999\n[render]\nwidth = 0\n",
        )
        .unwrap();
        assert_eq!(config.adjust.brightness, 100);
        assert_eq!(config.adjust.contrast, -100);
        assert_eq!(config.adjust.threshold, 255);
        assert_eq!(config.grid_width, 1);
    }

    #[test]
    fn preset_then_override() {
        let config = parse_config("preset = \"retro\"\n[adjust]\nthreshold = 0\n").unwrap();
        assert_eq!(config.adjust.contrast, 25);
        assert_eq!(config.adjust.threshold, 0);
        assert_eq!(config.sampling, SamplingMethod::Dominant);
    }

    #[test]
    fn enum_spellings() {
        let config = parse_config(
            "[render]\nsampling = \"weighted\"\nformat = \"bracket\"\n\
             charset = \"custom\"\ncustom_charset = \" .o@\"\n",
        )
        .unwrap();
        assert_eq!(config.sampling, SamplingMethod::WeightedAverage);
        assert_eq!(config.format, OutputFormat::BracketColor);
        assert_eq!(config.ramp().map(|r| r.len()), Ok(4));
    }

    #[test]
    fn unknown_enum_is_an_error() {
        assert!(parse_config("[render]\nsampling = \"mode\"\n").is_err());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn shipped_default_matches_defaults() {
        let shipped = include_str!("../../../config/default.toml");
        assert_eq!(parse_config(shipped).unwrap(), RenderConfig::default());
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[adjust]\nauto_enhance = true\nsaturation = -40").unwrap();
        let config = load_config(file.path()).unwrap();
        assert!(config.adjust.auto_enhance);
        assert_eq!(config.adjust.saturation, -40);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/definitely/not/here.toml")).is_err());
    }

    #[test]
    fn presets_match_menu() {
        assert_eq!(Preset::Retro.settings().threshold, 50);
        assert_eq!(Preset::Artwork.settings().charset, CharsetPreset::Gradient);
        assert_eq!("PHOTO".parse::<Preset>(), Ok(Preset::Photo));
    }
}
