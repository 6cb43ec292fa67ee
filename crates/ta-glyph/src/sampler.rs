//! Réduction d'une région de pixels à une couleur représentative.
//!
//! Toutes les stratégies sont pures et en lecture seule : elles peuvent être
//! appelées en parallèle sur des cellules différentes. Une région vide ou
//! entièrement hors du buffer produit [`Color::BLACK`].

use ta_core::color::Color;
use ta_core::config::SamplingMethod;
use ta_core::frame::{CellBounds, PixelBuffer};

/// Pas de quantification de l'échantillonnage dominant (16 niveaux par canal).
pub const DOMINANT_STEP: u8 = 16;

/// Sample `bounds` of `buffer` with the chosen strategy.
///
/// # Example
/// ```
/// use ta_core::color::Color;
/// use ta_core::config::SamplingMethod;
/// use ta_core::frame::{CellBounds, PixelBuffer};
/// use ta_glyph::sampler::sample;
///
/// let fb = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
/// let bounds = CellBounds::new(0, 0, 4, 4);
/// assert_eq!(sample(&fb, bounds, SamplingMethod::Median), Color::new(10, 20, 30));
/// ```
#[must_use]
pub fn sample(buffer: &PixelBuffer, bounds: CellBounds, method: SamplingMethod) -> Color {
    match method {
        SamplingMethod::Average => average(buffer, bounds),
        SamplingMethod::Center => center(buffer, bounds),
        SamplingMethod::Dominant => dominant(buffer, bounds),
        SamplingMethod::Median => median(buffer, bounds),
        SamplingMethod::WeightedAverage => weighted_average(buffer, bounds),
    }
}

/// Itère sur les pixels existants de la région, en ordre row-major.
fn pixels(
    buffer: &PixelBuffer,
    bounds: CellBounds,
) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
    let b = bounds.intersect(buffer.width, buffer.height);
    (b.start_y..b.end_y)
        .flat_map(move |y| (b.start_x..b.end_x).map(move |x| (x, y, buffer.color(x, y))))
}

/// Division entière arrondie au plus proche, demi vers le haut.
#[inline]
fn div_round(total: u64, count: u64) -> u8 {
    ((2 * total + count) / (2 * count)) as u8
}

/// Arithmetic mean of each channel.
#[must_use]
pub fn average(buffer: &PixelBuffer, bounds: CellBounds) -> Color {
    let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
    for (_, _, c) in pixels(buffer, bounds) {
        r += u64::from(c.r);
        g += u64::from(c.g);
        b += u64::from(c.b);
        n += 1;
    }
    if n == 0 {
        return Color::BLACK;
    }
    Color::new(div_round(r, n), div_round(g, n), div_round(b, n))
}

/// Pixel at the floored midpoint of the bounds.
#[must_use]
pub fn center(buffer: &PixelBuffer, bounds: CellBounds) -> Color {
    let cx = (u64::from(bounds.start_x) + u64::from(bounds.end_x)) / 2;
    let cy = (u64::from(bounds.start_y) + u64::from(bounds.end_y)) / 2;
    if cx >= u64::from(buffer.width) || cy >= u64::from(buffer.height) {
        return Color::BLACK;
    }
    buffer.color(cx as u32, cy as u32)
}

/// Most frequent color after quantizing each channel to 16 levels.
///
/// Ties go to the bucket seen first in row-major scan order.
#[must_use]
pub fn dominant(buffer: &PixelBuffer, bounds: CellBounds) -> Color {
    const LEVELS: usize = 256 / DOMINANT_STEP as usize;
    let mut counts = vec![0u32; LEVELS * LEVELS * LEVELS];
    let mut first_seen: Vec<u16> = Vec::new();

    for (_, _, c) in pixels(buffer, bounds) {
        let key = (usize::from(c.r / DOMINANT_STEP) * LEVELS + usize::from(c.g / DOMINANT_STEP))
            * LEVELS
            + usize::from(c.b / DOMINANT_STEP);
        if counts[key] == 0 {
            first_seen.push(key as u16);
        }
        counts[key] += 1;
    }

    let mut best: Option<(u16, u32)> = None;
    for &key in &first_seen {
        let count = counts[usize::from(key)];
        if best.is_none_or(|(_, max)| count > max) {
            best = Some((key, count));
        }
    }

    match best {
        Some((key, _)) => {
            let key = usize::from(key);
            let level = |q: usize| (q as u8) * DOMINANT_STEP;
            Color::new(
                level(key / (LEVELS * LEVELS)),
                level((key / LEVELS) % LEVELS),
                level(key % LEVELS),
            )
        }
        None => Color::BLACK,
    }
}

/// Médiane d'un canal ; deux valeurs centrales moyennées (arrondi demi vers le haut).
fn channel_median(values: &mut [u8]) -> u8 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        ((u16::from(values[mid - 1]) + u16::from(values[mid]) + 1) / 2) as u8
    }
}

/// Per-channel median. Channels are independent, so the result may not be
/// a color present in the region.
#[must_use]
pub fn median(buffer: &PixelBuffer, bounds: CellBounds) -> Color {
    let (mut rs, mut gs, mut bs) = (Vec::new(), Vec::new(), Vec::new());
    for (_, _, c) in pixels(buffer, bounds) {
        rs.push(c.r);
        gs.push(c.g);
        bs.push(c.b);
    }
    if rs.is_empty() {
        return Color::BLACK;
    }
    Color::new(
        channel_median(&mut rs),
        channel_median(&mut gs),
        channel_median(&mut bs),
    )
}

/// Mean weighted by `1 - distance / diagonal`, favouring the cell center.
#[must_use]
pub fn weighted_average(buffer: &PixelBuffer, bounds: CellBounds) -> Color {
    let (sx, sy) = (f64::from(bounds.start_x), f64::from(bounds.start_y));
    let (ex, ey) = (f64::from(bounds.end_x), f64::from(bounds.end_y));
    let max_distance = (ex - sx).hypot(ey - sy);
    if max_distance <= 0.0 {
        return Color::BLACK;
    }
    let (cx, cy) = ((sx + ex) / 2.0, (sy + ey) / 2.0);

    let (mut r, mut g, mut b, mut total) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for (x, y, c) in pixels(buffer, bounds) {
        let distance = (f64::from(x) - cx).hypot(f64::from(y) - cy);
        let weight = 1.0 - distance / max_distance;
        r += f64::from(c.r) * weight;
        g += f64::from(c.g) * weight;
        b += f64::from(c.b) * weight;
        total += weight;
    }
    if total <= 0.0 {
        return Color::BLACK;
    }
    let round = |v: f64| (v / total).round().clamp(0.0, 255.0) as u8;
    Color::new(round(r), round(g), round(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SamplingMethod; 5] = [
        SamplingMethod::Average,
        SamplingMethod::Center,
        SamplingMethod::Dominant,
        SamplingMethod::Median,
        SamplingMethod::WeightedAverage,
    ];

    /// Gradient horizontal : r = 10 * x, g = 10 * y, b = 7.
    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut fb = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let i = ((y * w + x) * 4) as usize;
                fb.data[i..i + 4].copy_from_slice(&[(x * 10) as u8, (y * 10) as u8, 7, 255]);
            }
        }
        fb
    }

    #[test]
    fn empty_region_is_black_for_area_strategies() {
        let fb = PixelBuffer::filled(4, 4, [200, 200, 200, 255]);
        let empty = CellBounds::new(2, 2, 2, 4);
        for m in [
            SamplingMethod::Average,
            SamplingMethod::Dominant,
            SamplingMethod::Median,
            SamplingMethod::WeightedAverage,
        ] {
            assert_eq!(sample(&fb, empty, m), Color::BLACK, "{m:?}");
        }
    }

    #[test]
    fn out_of_buffer_region_is_black() {
        let fb = PixelBuffer::filled(4, 4, [200, 200, 200, 255]);
        let outside = CellBounds::new(10, 10, 20, 20);
        for m in ALL {
            assert_eq!(sample(&fb, outside, m), Color::BLACK, "{m:?}");
        }
    }

    #[test]
    fn average_within_channel_range() {
        let fb = gradient(9, 7);
        assert_eq!(average(&fb, CellBounds::new(2, 1, 7, 6)), Color::new(40, 30, 7));

        // Toutes les régions non vides d'un buffer bruité.
        let mut noisy = PixelBuffer::new(7, 5);
        for (i, px) in noisy.data.chunks_exact_mut(4).enumerate() {
            let v = (i as u32).wrapping_mul(2_654_435_761).to_le_bytes();
            px.copy_from_slice(&[v[3], v[2], v[1], 255]);
        }
        for sy in 0..5 {
            for ey in sy + 1..=5 {
                for sx in 0..7 {
                    for ex in sx + 1..=7 {
                        let bounds = CellBounds::new(sx, sy, ex, ey);
                        let c = average(&noisy, bounds);
                        let region: Vec<Color> =
                            pixels(&noisy, bounds).map(|(_, _, p)| p).collect();
                        let channels: [(u8, fn(&Color) -> u8); 3] = [
                            (c.r, |p: &Color| p.r),
                            (c.g, |p: &Color| p.g),
                            (c.b, |p: &Color| p.b),
                        ];
                        for (got, pick) in channels {
                            let lo = region.iter().map(pick).min().unwrap();
                            let hi = region.iter().map(pick).max().unwrap();
                            assert!((lo..=hi).contains(&got), "{bounds:?}: {got} ∉ [{lo}, {hi}]");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn average_rounds_half_up() {
        let mut fb = PixelBuffer::new(2, 1);
        fb.data.copy_from_slice(&[1, 0, 0, 255, 2, 0, 0, 255]);
        assert_eq!(average(&fb, CellBounds::new(0, 0, 2, 1)).r, 2);
    }

    #[test]
    fn center_takes_floored_midpoint() {
        let fb = gradient(10, 10);
        assert_eq!(center(&fb, CellBounds::new(2, 4, 5, 8)), Color::new(30, 60, 7));
        // Région vide mais milieu dans le buffer : le pixel est lu.
        assert_eq!(center(&fb, CellBounds::new(3, 3, 3, 3)), Color::new(30, 30, 7));
    }

    #[test]
    fn dominant_quantizes_and_counts() {
        let mut fb = PixelBuffer::new(3, 1);
        fb.data
            .copy_from_slice(&[250, 17, 0, 255, 20, 20, 20, 255, 245, 30, 15, 255]);
        assert_eq!(
            dominant(&fb, CellBounds::new(0, 0, 3, 1)),
            Color::new(240, 16, 0)
        );
    }

    #[test]
    fn dominant_tie_keeps_first_seen() {
        let mut fb = PixelBuffer::new(2, 1);
        fb.data.copy_from_slice(&[200, 0, 0, 255, 0, 0, 200, 255]);
        assert_eq!(
            dominant(&fb, CellBounds::new(0, 0, 2, 1)),
            Color::new(192, 0, 0)
        );
    }

    #[test]
    fn median_uniform_is_exact() {
        let fb = PixelBuffer::filled(5, 3, [77, 77, 77, 255]);
        assert_eq!(median(&fb, CellBounds::new(0, 0, 5, 3)), Color::new(77, 77, 77));
    }

    #[test]
    fn median_even_count_averages_middles() {
        let mut fb = PixelBuffer::new(4, 1);
        fb.data.copy_from_slice(&[
            1, 9, 0, 255, 4, 8, 0, 255, 3, 7, 0, 255, 100, 6, 0, 255,
        ]);
        // r: 1,3,4,100 → (3+4)/2 = 3.5 → 4 ; g: 6,7,8,9 → 7.5 → 8.
        assert_eq!(median(&fb, CellBounds::new(0, 0, 4, 1)), Color::new(4, 8, 0));
    }

    #[test]
    fn weighted_uniform_is_exact() {
        let fb = PixelBuffer::filled(6, 6, [12, 34, 56, 255]);
        assert_eq!(
            weighted_average(&fb, CellBounds::new(1, 1, 6, 5)),
            Color::new(12, 34, 56)
        );
    }

    #[test]
    fn weighted_favours_center() {
        // 3×1 : bords noirs, centre blanc. Moyenne simple = 85.
        let mut fb = PixelBuffer::new(3, 1);
        fb.data
            .copy_from_slice(&[0, 0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 255]);
        let bounds = CellBounds::new(0, 0, 3, 1);
        assert_eq!(average(&fb, bounds).r, 85);
        assert!(weighted_average(&fb, bounds).r > 85);
    }

    #[test]
    fn every_strategy_agrees_on_uniform_color() {
        // Canaux multiples de 16 : la quantification dominante est exacte.
        let fb = PixelBuffer::filled(8, 8, [64, 128, 192, 255]);
        let bounds = CellBounds::new(0, 0, 8, 8);
        for m in ALL {
            assert_eq!(sample(&fb, bounds, m), Color::new(64, 128, 192), "{m:?}");
        }
    }
}
