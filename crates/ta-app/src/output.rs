use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

/// Nom de fichier horodaté utilisé quand la sortie est un dossier.
#[must_use]
pub fn default_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("textart_{millis}.txt")
}

/// Resolve the destination: a directory receives a timestamped file name.
#[must_use]
pub fn resolve_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(default_file_name())
    } else {
        target.to_path_buf()
    }
}

/// Écrit le texte vers `target` (fichier ou dossier) ou vers stdout.
///
/// # Errors
/// Returns an error if the file or stdout cannot be written.
pub fn write_output(text: &str, target: Option<&Path>) -> Result<Option<PathBuf>> {
    match target {
        Some(target) => {
            let path = resolve_path(target);
            std::fs::write(&path, text)
                .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
            log::info!("Texte écrit dans {}", path.display());
            Ok(Some(path))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("Impossible d'écrire sur stdout")?;
            stdout.flush().context("Impossible d'écrire sur stdout")?;
            Ok(None)
        }
    }
}
