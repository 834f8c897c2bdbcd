use image::{GrayImage, RgbaImage};

use crate::color::palette::darken;
use crate::effects::composite::overlay_at;
use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::CoverResult;
use crate::foundation::math::lerp_u8;
use crate::text::engine::{FontAsset, GlyphMask, TextRenderer};

/// Inclusive offset sequence `start, start + step, ..` up to `end`, applied to both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowSteps {
    pub start: i32,
    pub end: i32,
    pub step: i32,
}

impl ShadowSteps {
    pub const fn new(start: i32, end: i32, step: i32) -> Self {
        Self { start, end, step }
    }

    pub fn offsets(self) -> impl Iterator<Item = i32> {
        let step = self.step.max(1) as usize;
        (self.start..=self.end).step_by(step)
    }
}

/// Stacked drop shadow drawn under text: one copy of the text per offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    pub color: Rgb8,
    pub alpha: u8,
    pub steps: ShadowSteps,
}

impl TextShadow {
    pub fn new(color: Rgb8, steps: ShadowSteps) -> Self {
        Self {
            color,
            alpha: 210,
            steps,
        }
    }

    /// Shadow derived from the fill color (darkened to 70%), offsets `3..=max_offset` by 2.
    pub fn from_fill(fill: Rgba8, max_offset: i32) -> Self {
        Self::new(darken(fill.rgb(), 0.7), ShadowSteps::new(3, max_offset, 2))
    }

    fn rgba(&self) -> Rgba8 {
        self.color.with_alpha(self.alpha)
    }
}

/// Paints `color` into `layer` through `coverage`, mixing all four channels by coverage.
fn stamp(layer: &mut RgbaImage, coverage: &GrayImage, x: i64, y: i64, color: Rgba8) {
    let target = [color.r, color.g, color.b, color.a];
    let (lw, lh) = (i64::from(layer.width()), i64::from(layer.height()));
    for (cx, cy, m) in coverage.enumerate_pixels() {
        if m[0] == 0 {
            continue;
        }
        let (px, py) = (x + i64::from(cx), y + i64::from(cy));
        if px < 0 || py < 0 || px >= lw || py >= lh {
            continue;
        }
        let t = f64::from(m[0]) / 255.0;
        let dst = layer.get_pixel_mut(px as u32, py as u32);
        for c in 0..4 {
            dst[c] = lerp_u8(dst[c], target[c], t);
        }
    }
}

fn draw_mask(
    image: &mut RgbaImage,
    mask: &GlyphMask,
    position: (f32, f32),
    fill: Rgba8,
    shadow: Option<&TextShadow>,
) {
    let offsets: Vec<i32> = shadow.map(|s| s.steps.offsets().collect()).unwrap_or_default();
    let lo = offsets.iter().copied().min().unwrap_or(0).min(0);
    let hi = offsets.iter().copied().max().unwrap_or(0).max(0);
    let span = (hi - lo) as u32;
    let (mw, mh) = mask.coverage.dimensions();
    // Transparent fill color, so anti-aliased edges do not fringe toward black.
    let mut layer = RgbaImage::from_pixel(mw + span, mh + span, image::Rgba([fill.r, fill.g, fill.b, 0]));

    if let Some(s) = shadow {
        for &off in &offsets {
            let at = i64::from(off - lo);
            stamp(&mut layer, &mask.coverage, at, at, s.rgba());
        }
    }
    let origin = i64::from(-lo);
    stamp(&mut layer, &mask.coverage, origin, origin, fill);

    let x = position.0.round() as i64 - i64::from(mask.pad) + i64::from(lo);
    let y = position.1.round() as i64 - i64::from(mask.pad) + i64::from(lo);
    overlay_at(image, &layer, x, y);
}

/// Draws one line of text with its top-left layout corner at `position`.
///
/// Shadow copies are painted first, then the fill, on a private layer that is composited onto
/// `image` once. Empty text is a no-op.
pub fn draw_text(
    renderer: &mut TextRenderer,
    image: &mut RgbaImage,
    text: &str,
    position: (f32, f32),
    font: &FontAsset,
    fill: Rgba8,
    shadow: Option<&TextShadow>,
) -> CoverResult<()> {
    if let Some(mask) = renderer.rasterize(text, font)? {
        draw_mask(image, &mask, position, fill, shadow);
    }
    Ok(())
}

/// Splits `text` on spaces and draws line `i` at `y + i * (font size + line_spacing)`.
///
/// Returns the number of lines drawn.
#[allow(clippy::too_many_arguments)]
pub fn draw_multiline_text(
    renderer: &mut TextRenderer,
    image: &mut RgbaImage,
    text: &str,
    position: (f32, f32),
    font: &FontAsset,
    line_spacing: f32,
    fill: Rgba8,
    shadow: Option<&TextShadow>,
) -> CoverResult<usize> {
    let lines: Vec<&str> = text.split(' ').collect();
    if lines.len() <= 1 {
        draw_text(renderer, image, text, position, font, fill, shadow)?;
        return Ok(1);
    }
    let advance = font.size_px() + line_spacing;
    for (i, line) in lines.iter().enumerate() {
        let y = position.1 + i as f32 * advance;
        draw_text(renderer, image, line, (position.0, y), font, fill, shadow)?;
    }
    Ok(lines.len())
}

#[cfg(test)]
#[path = "../../tests/unit/text/draw.rs"]
mod tests;
