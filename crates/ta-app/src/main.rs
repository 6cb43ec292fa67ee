use anyhow::Result;
use clap::Parser;
use ta_core::config::RenderConfig;
use ta_core::frame::{GridSpec, PixelBuffer, Rect};
use ta_core::traits::LogProgress;
use ta_glyph::renderer::ArtRenderer;

pub mod cli;
pub mod output;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;

    // 4. Charger l'image, ajustée au canevas si demandé
    let mut buffer = ta_source::load_image(&cli.image)?;
    if let Some((max_w, max_h)) = cli.fit {
        buffer = ta_source::fit_within(&buffer, max_w, max_h)?;
    }

    // 5. Verrouillage du ratio
    if cli.lock_aspect {
        let aspect = f64::from(buffer.width) / f64::from(buffer.height);
        let from_height = cli.height.is_some() && cli.width.is_none();
        lock_aspect(&mut config, aspect, from_height)?;
    }

    // 6. Ajustements tonals + auto-amélioration
    ta_glyph::pipeline::process(&mut buffer, &config.adjust)?;

    // 7. Rendu
    let text = render(&buffer, &config, cli.selection, cli.preview)?;

    // 8. Sortie
    output::write_output(&text, cli.output.as_deref())?;
    Ok(())
}

/// Resolve config: `--config` if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if cli.config.exists() {
        ta_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RenderConfig::default())
    }
}

/// Derive one grid dimension from the other and the image ratio.
///
/// With `from_height`, the width follows the height; otherwise the height follows the width.
fn lock_aspect(config: &mut RenderConfig, aspect: f64, from_height: bool) -> Result<()> {
    let grid = if from_height {
        GridSpec::with_locked_aspect_height(config.grid_height, aspect)?
    } else {
        GridSpec::with_locked_aspect(config.grid_width, aspect)?
    };
    log::debug!(
        "Ratio verrouillé : {}×{} → {}×{}",
        config.grid_width,
        config.grid_height,
        grid.width,
        grid.height
    );
    config.grid_width = grid.width;
    config.grid_height = grid.height;
    Ok(())
}

/// Render the processed buffer, restricted to the selection when it is large enough.
fn render(
    buffer: &PixelBuffer,
    config: &RenderConfig,
    selection: Option<Rect>,
    preview: bool,
) -> Result<String> {
    let renderer = ArtRenderer::from_config(config)?;
    let selection = selection.and_then(|raw| {
        let rect = Rect::selection(raw, buffer.width, buffer.height);
        if rect.is_none() {
            log::warn!("Sélection {raw:?} trop petite ou hors image, image entière utilisée.");
        }
        rect
    });

    let text = if preview {
        renderer.preview(buffer, selection)?
    } else {
        renderer.render(buffer, selection, Some(&LogProgress))?
    };
    Ok(text)
}
