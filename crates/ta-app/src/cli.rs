use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ta_core::config::RenderConfig;
use ta_core::frame::Rect;

/// textart : convertit une image en grille de glyphes colorés.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Preset : photo, artwork, terminal, retro. Appliqué après --config.
    #[arg(long)]
    pub preset: Option<String>,

    /// Largeur de la grille en caractères.
    #[arg(long)]
    pub width: Option<u32>,

    /// Hauteur de la grille en caractères.
    #[arg(long)]
    pub height: Option<u32>,

    /// Dériver la hauteur depuis la largeur et le ratio de l'image.
    #[arg(long, default_value_t = false)]
    pub lock_aspect: bool,

    /// Échantillonnage : average, center, dominant, median, weighted.
    #[arg(long)]
    pub sampling: Option<String>,

    /// Jeu de caractères : block, gradient, ascii, braille, custom.
    #[arg(long)]
    pub charset: Option<String>,

    /// Caractères du jeu custom, du plus sombre au plus clair.
    #[arg(long)]
    pub custom_chars: Option<String>,

    /// Format de sortie : html, bracket.
    #[arg(long)]
    pub format: Option<String>,

    /// Luminosité [-100, 100].
    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<i32>,

    /// Contraste [-100, 100].
    #[arg(long, allow_hyphen_values = true)]
    pub contrast: Option<i32>,

    /// Saturation [-100, 100].
    #[arg(long, allow_hyphen_values = true)]
    pub saturation: Option<i32>,

    /// Seuil noir/blanc [0, 255], 0 = désactivé.
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<i32>,

    /// Égalisation d'histogramme automatique.
    #[arg(long, default_value_t = false)]
    pub auto_enhance: bool,

    /// Sélection en pixels source : x,y,largeur,hauteur.
    #[arg(long, value_parser = parse_selection)]
    pub selection: Option<Rect>,

    /// Réduire l'image pour tenir dans LxH pixels avant le rendu (ex : 800x500).
    #[arg(long, value_parser = parse_fit)]
    pub fit: Option<(u32, u32)>,

    /// Aperçu HTML plafonné à 40×25.
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    /// Fichier ou dossier de sortie. Défaut : stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply the command-line overrides on top of `config`.
    ///
    /// # Errors
    /// Returns an error for unknown preset, sampling, charset or format names.
    pub fn apply_overrides(&self, config: &mut RenderConfig) -> Result<()> {
        if let Some(ref name) = self.preset {
            config.apply_preset(name.parse()?);
        }
        if let Some(v) = self.width {
            config.grid_width = v;
        }
        if let Some(v) = self.height {
            config.grid_height = v;
        }
        if let Some(ref v) = self.sampling {
            config.sampling = v.parse()?;
        }
        if let Some(ref v) = self.charset {
            config.charset = v.parse()?;
        }
        if let Some(ref v) = self.custom_chars {
            config.custom_charset.clone_from(v);
        }
        if let Some(ref v) = self.format {
            config.format = v.parse()?;
        }
        if let Some(v) = self.brightness {
            config.adjust.brightness = v;
        }
        if let Some(v) = self.contrast {
            config.adjust.contrast = v;
        }
        if let Some(v) = self.saturation {
            config.adjust.saturation = v;
        }
        if let Some(v) = self.threshold {
            config.adjust.threshold = v;
        }
        if self.auto_enhance {
            config.adjust.auto_enhance = true;
        }
        config.clamp_all();
        Ok(())
    }
}

/// Parse `x,y,w,h`.
fn parse_selection(s: &str) -> Result<Rect, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("sélection invalide '{s}' : {e}"))?;
    match parts.as_slice() {
        &[x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err(format!("sélection invalide '{s}' : attendu x,y,largeur,hauteur")),
    }
}

/// Parse `WxH`.
fn parse_fit(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("taille invalide '{s}' : attendu LxH"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("largeur invalide '{w}' : {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("hauteur invalide '{h}' : {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("taille invalide '{s}' : dimensions nulles"));
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use ta_core::charset::CharsetPreset;
    use ta_core::config::{OutputFormat, SamplingMethod};

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["textart", "--image", "in.png"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn selection_and_fit_parse() {
        let c = cli(&["--selection", "10, 20,30,40", "--fit", "800x500"]);
        assert_eq!(c.selection, Some(Rect::new(10, 20, 30, 40)));
        assert_eq!(c.fit, Some((800, 500)));
    }

    #[test]
    fn malformed_selection_rejected() {
        let parse = |flag: &str, value: &str| {
            Cli::try_parse_from(["textart", "--image", "a.png", flag, value])
        };
        assert!(parse("--selection", "1,2,3").is_err());
        assert!(parse("--fit", "0x10").is_err());
    }

    #[test]
    fn overrides_win_over_preset() {
        let c = cli(&[
            "--preset",
            "terminal",
            "--sampling",
            "median",
            "--brightness",
            "-30",
            "--format",
            "bracket",
            "--width",
            "80",
        ]);
        let mut config = RenderConfig::default();
        c.apply_overrides(&mut config).unwrap();
        assert_eq!(config.sampling, SamplingMethod::Median);
        assert_eq!(config.charset, CharsetPreset::Ascii);
        assert_eq!(config.adjust.contrast, 30);
        assert_eq!(config.adjust.brightness, -30);
        assert_eq!(config.format, OutputFormat::BracketColor);
        assert_eq!(config.grid_width, 80);
    }

    #[test]
    fn unknown_names_are_errors() {
        let mut config = RenderConfig::default();
        assert!(cli(&["--preset", "vaporwave"]).apply_overrides(&mut config).is_err());
        assert!(cli(&["--charset", "emoji"]).apply_overrides(&mut config).is_err());
    }

    #[test]
    fn out_of_range_overrides_clamped() {
        let mut config = RenderConfig::default();
        cli(&["--contrast", "500", "--threshold", "-4"])
            .apply_overrides(&mut config)
            .unwrap();
        assert_eq!(config.adjust.contrast, 100);
        assert_eq!(config.adjust.threshold, 0);
    }
}
