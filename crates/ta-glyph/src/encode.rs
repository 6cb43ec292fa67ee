//! Sérialisation d'une grille de glyphes vers les encodages texte.

use std::fmt::Write;

use ta_core::config::OutputFormat;
use ta_core::frame::{GlyphCell, GlyphGrid};

/// Séparateur de lignes du format HTML.
pub const HTML_LINE_BREAK: &str = "<br>";

/// Séparateur de lignes du format à balises.
pub const BRACKET_LINE_BREAK: &str = "\n";

/// Serialize `grid` in `format`. No separator follows the last row.
///
/// Html escapes `&`, `<`, `>` and `"` glyphs, so its bytes differ from a raw
/// glyph dump for ramps containing them (the `ascii` preset has `&`); the
/// rendered page is the same. BracketColor writes glyphs raw.
///
/// # Example
/// ```
/// use ta_core::color::Color;
/// use ta_core::config::OutputFormat;
/// use ta_core::frame::{GlyphCell, GlyphGrid};
/// use ta_glyph::encode::encode;
///
/// let mut grid = GlyphGrid::new(1, 2);
/// grid.set(0, 0, GlyphCell { ch: '#', color: Color::new(255, 0, 0) });
/// grid.set(0, 1, GlyphCell { ch: '.', color: Color::new(0, 0, 255) });
/// assert_eq!(
///     encode(&grid, OutputFormat::BracketColor),
///     "[color=#ff0000]#[/color]\n[color=#0000ff].[/color]"
/// );
/// ```
#[must_use]
pub fn encode(grid: &GlyphGrid, format: OutputFormat) -> String {
    let (cell_len, separator) = match format {
        OutputFormat::Html => (36, HTML_LINE_BREAK),
        OutputFormat::BracketColor => (27, BRACKET_LINE_BREAK),
    };
    let mut out = String::with_capacity(grid.cells.len() * cell_len + grid.height as usize * 4);

    for (row, cells) in grid.rows().enumerate() {
        if row > 0 {
            out.push_str(separator);
        }
        for cell in cells {
            match format {
                OutputFormat::Html => push_html(&mut out, cell),
                OutputFormat::BracketColor => push_bracket(&mut out, cell),
            }
        }
    }
    out
}

fn push_html(out: &mut String, cell: &GlyphCell) {
    let _ = write!(out, "<span style=\"color: {}\">", cell.color);
    match cell.ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        ch => out.push(ch),
    }
    out.push_str("</span>");
}

fn push_bracket(out: &mut String, cell: &GlyphCell) {
    let _ = write!(out, "[color={}]{}[/color]", cell.color, cell.ch);
}
