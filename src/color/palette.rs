use rand::Rng;
use rand::seq::SliceRandom;

use crate::color::convert::{hls_to_unit, rgb_to_hls, rgb_to_hsv};
use crate::foundation::core::Rgb8;
use crate::foundation::math::trunc_u8;

/// Fallback palette for the diagonal single-image style.
pub const DIAGONAL_SOFT_COLORS: [Rgb8; 6] = [
    Rgb8::new(237, 159, 77),
    Rgb8::new(255, 183, 197),
    Rgb8::new(186, 225, 255),
    Rgb8::new(255, 223, 186),
    Rgb8::new(202, 231, 200),
    Rgb8::new(245, 203, 255),
];

/// Fallback palette for the card-stack single-image style.
pub const CARD_STACK_SOFT_COLORS: [Rgb8; 4] = [
    Rgb8::new(237, 159, 77),
    Rgb8::new(186, 225, 255),
    Rgb8::new(255, 223, 186),
    Rgb8::new(202, 231, 200),
];

/// Scales every channel by `factor`, truncating.
pub fn darken(c: Rgb8, factor: f64) -> Rgb8 {
    Rgb8::new(
        trunc_u8(f64::from(c.r) * factor),
        trunc_u8(f64::from(c.g) * factor),
        trunc_u8(f64::from(c.b) * factor),
    )
}

/// Multiplies every channel by `factor`, guarantees an increase of at least
/// `min_increase`, then caps the result at `max_value`.
pub fn lighten(c: Rgb8, factor: f64, min_increase: u8, max_value: u8) -> Rgb8 {
    let ch = |v: u8| -> u8 {
        let scaled = u32::from(trunc_u8(f64::from(v) * factor));
        let bumped = scaled.max(u32::from(v) + u32::from(min_increase));
        bumped.min(u32::from(max_value)).min(255) as u8
    };
    Rgb8::new(ch(c.r), ch(c.g), ch(c.b))
}

/// Weighted HSV distance: circular hue difference counts five times.
pub fn hsv_distance(a: Rgb8, b: Rgb8) -> f64 {
    let (h1, s1, v1) = rgb_to_hsv(a);
    let (h2, s2, v2) = rgb_to_hsv(b);
    let dh = (h1 - h2).abs();
    dh.min(1.0 - dh) * 5.0 + (s1 - s2).abs() + (v1 - v2).abs()
}

/// HSL lightness in `0.0..=1.0`.
pub fn hsl_lightness(c: Rgb8) -> f64 {
    rgb_to_hls(c).1
}

/// Whether the HSL lightness falls inside `[min_l, max_l]`.
pub fn is_mid_lightness(c: Rgb8, min_l: f64, max_l: f64) -> bool {
    let l = hsl_lightness(c);
    (min_l..=max_l).contains(&l)
}

/// Whether the Rec.601 luma falls inside `[min_lum, max_lum]`.
pub fn is_mid_luminance(c: Rgb8, min_lum: f64, max_lum: f64) -> bool {
    (min_lum..=max_lum).contains(&c.luminance())
}

/// HSL sampling bands for [`random_hsl_color`]. Hue in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HslBands {
    pub hue: (f64, f64),
    pub saturation: (f64, f64),
    pub lightness: (f64, f64),
}

impl Default for HslBands {
    fn default() -> Self {
        Self {
            hue: (0.0, 360.0),
            saturation: (0.5, 1.0),
            lightness: (0.5, 0.8),
        }
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Draws a color uniformly inside the given HSL bands. Channels are truncated, not rounded.
pub fn random_hsl_color<R: Rng + ?Sized>(rng: &mut R, bands: HslBands) -> Rgb8 {
    let h = uniform(rng, (bands.hue.0 / 360.0, bands.hue.1 / 360.0));
    let s = uniform(rng, bands.saturation);
    let l = uniform(rng, bands.lightness);
    let (r, g, b) = hls_to_unit(h, l, s);
    Rgb8::new(trunc_u8(r * 255.0), trunc_u8(g * 255.0), trunc_u8(b * 255.0))
}

/// Where a selected accent color came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSource {
    /// Taken from the candidate list.
    Candidate,
    /// No candidate qualified; drawn from [`HslBands::default`].
    Random,
}

/// Picks the first of up to ten candidates whose HSL lightness is in `[0.3, 0.7]`,
/// falling back to a random HSL color.
pub fn select_suitable_color<R: Rng + ?Sized>(candidates: &[Rgb8], rng: &mut R) -> (Rgb8, ColorSource) {
    for c in candidates.iter().take(10) {
        if is_mid_lightness(*c, 0.3, 0.7) {
            tracing::debug!(color = ?c, "selected candidate color");
            return (*c, ColorSource::Candidate);
        }
        tracing::debug!(color = ?c, "candidate color rejected");
    }
    let c = random_hsl_color(rng, HslBands::default());
    tracing::info!(color = ?c, "no suitable color found, using random color");
    (c, ColorSource::Random)
}

/// Pads `colors` up to `target` with picks from `fallbacks`.
///
/// Each pick maximizes the minimum [`hsv_distance`] to the colors already present; an empty
/// list, or a tie at zero distance, is filled with a random fallback.
pub fn pad_with_fallbacks<R: Rng + ?Sized>(
    colors: &mut Vec<Rgb8>,
    fallbacks: &[Rgb8],
    target: usize,
    rng: &mut R,
) {
    if fallbacks.is_empty() {
        return;
    }
    while colors.len() < target {
        let mut best: Option<(Rgb8, f64)> = None;
        if !colors.is_empty() {
            for &cand in fallbacks {
                let min_dist = colors
                    .iter()
                    .map(|&existing| hsv_distance(cand, existing))
                    .fold(f64::INFINITY, f64::min);
                if min_dist > best.map_or(0.0, |(_, d)| d) {
                    best = Some((cand, min_dist));
                }
            }
        }
        let pick = match best {
            Some((c, _)) => c,
            None => *fallbacks.choose(rng).unwrap_or(&fallbacks[0]),
        };
        colors.push(pick);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/palette.rs"]
mod tests;
