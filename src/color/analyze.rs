use std::collections::HashMap;

use image::RgbaImage;
use image::imageops::FilterType;

use crate::color::convert::{hsv_to_rgb, rgb_to_hsv};
use crate::color::palette::hsv_distance;
use crate::foundation::core::Rgb8;

// Float products of band edges and 255 can land a hair off an integer.
const EDGE_EPS: f64 = 1e-9;

/// Saturation/value band colors are clamped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacaronRange {
    pub saturation: (f64, f64),
    pub value: (f64, f64),
}

impl MacaronRange {
    /// Whether `c` lies inside the band.
    pub fn contains(&self, c: Rgb8) -> bool {
        let (_, s, v) = rgb_to_hsv(c);
        let within = |x: f64, (lo, hi): (f64, f64)| x >= lo - EDGE_EPS && x <= hi + EDGE_EPS;
        within(s, self.saturation) && within(v, self.value)
    }

    /// Clamps saturation and value into the band, keeping hue. Idempotent.
    ///
    /// The max and min channels are chosen as integers inside the band, so the 8-bit result
    /// stays in the band after rounding.
    pub fn adjust(&self, c: Rgb8) -> Rgb8 {
        let (h, s, v) = rgb_to_hsv(c);
        let s = s.clamp(self.saturation.0, self.saturation.1);
        let v = v.clamp(self.value.0, self.value.1);

        let max_lo = (self.value.0 * 255.0 - EDGE_EPS).ceil();
        let max_hi = (self.value.1 * 255.0 + EDGE_EPS).floor();
        let max = (v * 255.0).round().clamp(max_lo, max_hi);

        let min_lo = (max * (1.0 - self.saturation.1) - EDGE_EPS).ceil();
        let min_hi = (max * (1.0 - self.saturation.0) + EDGE_EPS).floor();
        let min = (max * (1.0 - s)).round().clamp(min_lo, min_hi);

        hsv_to_rgb(h, (max - min) / max, max / 255.0)
    }
}

/// Extraction flavor: how candidates are counted, clamped and de-duplicated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtractMode {
    /// Hue-spread extraction used by the diagonal style.
    Vibrant,
    /// Distance-spread extraction used by the card-stack style.
    Macaron,
}

impl ExtractMode {
    fn thumbnail_side(self) -> u32 {
        match self {
            Self::Vibrant => 100,
            Self::Macaron => 150,
        }
    }

    fn candidate_factor(self) -> usize {
        match self {
            Self::Vibrant => 3,
            Self::Macaron => 5,
        }
    }

    pub fn range(self) -> MacaronRange {
        match self {
            Self::Vibrant => MacaronRange {
                saturation: (0.2, 0.7),
                value: (0.55, 0.85),
            },
            Self::Macaron => MacaronRange {
                saturation: (0.3, 0.7),
                value: (0.6, 0.85),
            },
        }
    }
}

/// Whether `c` is none of: near-black, near-white, or gray.
pub fn is_chromatic(c: Rgb8) -> bool {
    const EXTREME: u8 = 20;
    const GRAY_SPREAD: i16 = 10;
    if (c.r < EXTREME && c.g < EXTREME && c.b < EXTREME)
        || (c.r > 255 - EXTREME && c.g > 255 - EXTREME && c.b > 255 - EXTREME)
    {
        return false;
    }
    let (r, g, b) = (i16::from(c.r), i16::from(c.g), i16::from(c.b));
    !((r - g).abs() < GRAY_SPREAD && (g - b).abs() < GRAY_SPREAD && (r - b).abs() < GRAY_SPREAD)
}

fn hue_degrees_apart(a: u32, b: u32) -> u32 {
    let d = a.abs_diff(b);
    d.min(360 - d.min(360))
}

/// Extracts up to `max_colors` distinct, macaron-adjusted dominant colors from an image.
#[derive(Clone, Copy, Debug)]
pub struct ColorAnalyzer {
    mode: ExtractMode,
}

impl ColorAnalyzer {
    pub fn new(mode: ExtractMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExtractMode {
        self.mode
    }

    /// Clamps a color into this analyzer's macaron band.
    pub fn adjust_to_macaron(&self, c: Rgb8) -> Rgb8 {
        self.mode.range().adjust(c)
    }

    /// Returns at most `max_colors` colors, most frequent first.
    ///
    /// An image without chromatic pixels yields an empty list.
    #[tracing::instrument(level = "debug", skip(self, image), fields(mode = ?self.mode))]
    pub fn extract_dominant_colors(&self, image: &RgbaImage, max_colors: usize) -> Vec<Rgb8> {
        if max_colors == 0 || image.width() == 0 || image.height() == 0 {
            return Vec::new();
        }
        let candidates = self.candidates(image, max_colors * self.mode.candidate_factor());
        if candidates.is_empty() {
            tracing::debug!("no chromatic pixels");
            return Vec::new();
        }

        let range = self.mode.range();
        let mut out: Vec<Rgb8> = Vec::with_capacity(max_colors);
        let mut seen_hues: Vec<u32> = Vec::new();
        for color in candidates {
            let adjusted = range.adjust(color);
            let accept = match self.mode {
                ExtractMode::Vibrant => {
                    let hue = (rgb_to_hsv(color).0 * 360.0) as u32;
                    let similar = seen_hues.iter().any(|&seen| hue_degrees_apart(hue, seen) < 15);
                    if !similar && !out.contains(&adjusted) {
                        seen_hues.push(hue);
                        true
                    } else {
                        false
                    }
                }
                ExtractMode::Macaron => out.iter().all(|&existing| hsv_distance(adjusted, existing) >= 0.15),
            };
            if accept {
                out.push(adjusted);
                if out.len() >= max_colors {
                    break;
                }
            }
        }
        tracing::debug!(count = out.len(), "dominant colors extracted");
        out
    }

    /// Most common chromatic thumbnail pixels; ties keep first-seen order.
    fn candidates(&self, image: &RgbaImage, limit: usize) -> Vec<Rgb8> {
        let thumb = thumbnail(image, self.mode.thumbnail_side());
        let chromatic = thumb
            .pixels()
            .map(|px| Rgb8::new(px[0], px[1], px[2]))
            .filter(|&c| is_chromatic(c));
        rank_by_frequency(chromatic, limit)
    }
}

/// The `limit` most frequent colors, ties in first-seen order.
pub(crate) fn rank_by_frequency(colors: impl IntoIterator<Item = Rgb8>, limit: usize) -> Vec<Rgb8> {
    let mut counts: HashMap<Rgb8, (usize, usize)> = HashMap::new();
    for (idx, c) in colors.into_iter().enumerate() {
        counts.entry(c).or_insert((0, idx)).0 += 1;
    }
    let mut ranked: Vec<(Rgb8, usize, usize)> =
        counts.into_iter().map(|(c, (n, first))| (c, n, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(limit).map(|(c, _, _)| c).collect()
}

/// Up to ten most common colors of a poster, sampled on a 100x150 grid.
///
/// Prefers opaque pixels of moderate brightness; falls back to any pixel with alpha above 100.
/// Returns an empty list for a fully transparent poster.
pub fn poster_primary_colors(poster: &RgbaImage) -> Vec<Rgb8> {
    if poster.width() == 0 || poster.height() == 0 {
        return Vec::new();
    }
    let small = image::imageops::resize(poster, 100, 150, FilterType::Lanczos3);
    let moderate: Vec<Rgb8> = small
        .pixels()
        .filter(|px| px[3] >= 200)
        .map(|px| Rgb8::new(px[0], px[1], px[2]))
        .filter(|c| (30.0..=220.0).contains(&c.brightness()))
        .collect();
    if !moderate.is_empty() {
        return rank_by_frequency(moderate, 10);
    }
    let visible = small
        .pixels()
        .filter(|px| px[3] > 100)
        .map(|px| Rgb8::new(px[0], px[1], px[2]));
    rank_by_frequency(visible, 10)
}

/// Downscales so that neither side exceeds `side`, keeping the aspect ratio.
fn thumbnail(image: &RgbaImage, side: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w <= side && h <= side {
        return image.clone();
    }
    let scale = (f64::from(side) / f64::from(w)).min(f64::from(side) / f64::from(h));
    let tw = ((f64::from(w) * scale).round() as u32).clamp(1, side);
    let th = ((f64::from(h) * scale).round() as u32).clamp(1, side);
    image::imageops::resize(image, tw, th, FilterType::Triangle)
}

#[cfg(test)]
#[path = "../../tests/unit/color/analyze.rs"]
mod tests;
