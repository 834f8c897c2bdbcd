//! Single-backdrop covers: the rotated card stack and the diagonal split.

use image::RgbaImage;
use image::imageops;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::color::analyze::{ColorAnalyzer, ExtractMode};
use crate::color::palette::{CARD_STACK_SOFT_COLORS, DIAGONAL_SOFT_COLORS, darken, pad_with_fallbacks};
use crate::compose::CoverText;
use crate::compose::stage::{SingleStage, run_stage};
use crate::effects::blur::gaussian_blur;
use crate::effects::composite::{blend_with_color, fill_through_mask, overlay_at, select_by_mask};
use crate::effects::grain::add_film_grain;
use crate::effects::masks::{DiagonalSplit, diagonal_shadow_mask, diagonal_split_mask};
use crate::effects::shadow::{DropShadow, ShadowPadding};
use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::{CoverError, CoverResult};
use crate::geometry::crop::{crop_to_aspect, crop_to_square, fit_cover, resize_exact};
use crate::geometry::raster::round_corners;
use crate::geometry::rotate::rotate_expand;
use crate::pipeline::request::{CoverFonts, StyleOptions};
use crate::text::draw::{ShadowSteps, TextShadow, draw_text};
use crate::text::engine::TextRenderer;

const TITLE_FILL: Rgba8 = Rgba8::new(255, 255, 255, 216);
const LOCALIZED_SHADOW: ShadowSteps = ShadowSteps::new(3, 11, 2);
const LATIN_SHADOW: ShadowSteps = ShadowSteps::new(2, 6, 1);
const PLACEHOLDER_LOCALIZED: &str = "未配置标题";
const PLACEHOLDER_LATIN: &str = "Not Configured";

/// One card of the stack, listed back to front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardSpec {
    /// Blur sigma applied before tinting; zero leaves the card sharp.
    pub blur: f32,
    /// `(palette index, share of the palette color)`.
    pub tint: Option<(usize, f64)>,
    pub shadow_offset: (i32, i32),
    pub shadow_blur: f32,
    pub shadow_opacity: f64,
    /// Counter-clockwise, in degrees.
    pub angle: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardStackParams {
    pub canvas: (u32, u32),
    pub palette_size: usize,
    pub background_darken: f64,
    pub background_blur: f32,
    pub background_color_weight: f64,
    pub grain: f64,
    /// Card side as a share of the canvas height.
    pub card_scale: f64,
    /// Corner radius is the card side divided by this.
    pub corner_divisor: u32,
    pub cards: [CardSpec; 3],
    pub text_shadow_darken: f64,
}

impl Default for CardStackParams {
    fn default() -> Self {
        Self {
            canvas: (1920, 1080),
            palette_size: 6,
            background_darken: 0.85,
            background_blur: 50.0,
            background_color_weight: 0.8,
            grain: 0.03,
            card_scale: 0.7,
            corner_divisor: 8,
            cards: [
                CardSpec {
                    blur: 16.0,
                    tint: Some((2, 0.6)),
                    shadow_offset: (10, 16),
                    shadow_blur: 18.0,
                    shadow_opacity: 0.7,
                    angle: 36.0,
                },
                CardSpec {
                    blur: 8.0,
                    tint: Some((1, 0.5)),
                    shadow_offset: (12, 18),
                    shadow_blur: 20.0,
                    shadow_opacity: 0.8,
                    angle: 18.0,
                },
                CardSpec {
                    blur: 0.0,
                    tint: None,
                    shadow_offset: (15, 20),
                    shadow_blur: 25.0,
                    shadow_opacity: 0.9,
                    angle: 0.0,
                },
            ],
            text_shadow_darken: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiagonalParams {
    pub canvas: (u32, u32),
    pub split: DiagonalSplit,
    pub max_colors: usize,
    /// Where the foreground's horizontal center lands, as a share of the canvas width.
    pub foreground_center: f64,
    pub shadow_darken: f64,
    pub feather: u32,
    pub background_blur: f32,
    pub background_color_weight: f64,
    pub grain: f64,
}

impl Default for DiagonalParams {
    fn default() -> Self {
        Self {
            canvas: (1280, 720),
            split: DiagonalSplit {
                top: 0.55,
                bottom: 0.40,
            },
            max_colors: 5,
            foreground_center: 0.75,
            shadow_darken: 0.5,
            feather: 30,
            background_blur: 12.0,
            background_color_weight: 0.8,
            grain: 0.05,
        }
    }
}

/// Blurs `img`, mixes it toward `color` and optionally adds grain.
fn tinted_backdrop<R: Rng + ?Sized>(
    img: &RgbaImage,
    blur: f32,
    color: Rgb8,
    color_weight: f64,
    grain: Option<f64>,
    rng: &mut R,
) -> CoverResult<RgbaImage> {
    let blurred = gaussian_blur(img, blur)?;
    let mut out = blend_with_color(&blurred, color, color_weight);
    if let Some(intensity) = grain {
        add_film_grain(&mut out, intensity, rng);
    }
    Ok(out)
}

fn grain_if(options: &StyleOptions, intensity: f64) -> Option<f64> {
    options.grain.then_some(intensity)
}

/// Localized title above the Latin one, both centered on the left quarter of the canvas.
fn draw_single_titles(
    renderer: &mut TextRenderer,
    canvas: &mut RgbaImage,
    fonts: &CoverFonts,
    localized: &str,
    latin: Option<&str>,
    shadow_color: Rgb8,
) -> CoverResult<()> {
    let (w, h) = canvas.dimensions();
    let cx = (f64::from(w) * 0.25).trunc() as i64;
    let cy = i64::from(h / 2);
    let localized_size = (f64::from(h) * 0.17).trunc() as f32;
    let latin_size = (f64::from(h) * 0.07).trunc() as f32;
    let localized_font = fonts.localized.with_size(localized_size)?;
    let latin_font = fonts.latin.with_size(latin_size)?;

    let extent = renderer.measure(localized, &localized_font)?;
    let (lw, lh) = (extent.width.round() as i64, extent.height.round() as i64);
    let x = cx - lw.div_euclid(2);
    let y = cy - lh - (latin_size as i64).div_euclid(2) - 5;
    let shadow = TextShadow::new(shadow_color, LOCALIZED_SHADOW);
    draw_text(
        renderer,
        canvas,
        localized,
        (x as f32, y as f32),
        &localized_font,
        TITLE_FILL,
        Some(&shadow),
    )?;

    if let Some(latin) = latin {
        let extent = renderer.measure(latin, &latin_font)?;
        let lx = cx - (extent.width.round() as i64).div_euclid(2);
        let ly = y + lh + latin_size as i64;
        let shadow = TextShadow::new(shadow_color, LATIN_SHADOW);
        draw_text(
            renderer,
            canvas,
            latin,
            (lx as f32, ly as f32),
            &latin_font,
            TITLE_FILL,
            Some(&shadow),
        )?;
    }
    Ok(())
}

/// Macaron palette of `params.palette_size` colors: extracted, shuffled, then padded with the
/// fallback colors that differ most from what is already there.
fn card_stack_palette<R: Rng + ?Sized>(
    source: &RgbaImage,
    params: &CardStackParams,
    rng: &mut R,
) -> Vec<Rgb8> {
    let analyzer = ColorAnalyzer::new(ExtractMode::Macaron);
    let mut colors = analyzer.extract_dominant_colors(source, params.palette_size);
    if colors.is_empty() {
        tracing::info!("no dominant colors, padding from the soft palette");
    }
    colors.shuffle(rng);
    colors.truncate(params.palette_size);
    pad_with_fallbacks(&mut colors, &CARD_STACK_SOFT_COLORS, params.palette_size.max(3), rng);
    colors
}

fn build_card(
    square: &RgbaImage,
    spec: &CardSpec,
    palette: &[Rgb8],
    corner_radius: f64,
) -> CoverResult<RgbaImage> {
    let mut card = if spec.blur > 0.0 {
        gaussian_blur(square, spec.blur)?
    } else {
        square.clone()
    };
    if let Some((index, weight)) = spec.tint {
        let color = palette
            .get(index)
            .copied()
            .ok_or_else(|| CoverError::validation(format!("card tint index {index} out of range")))?;
        card = blend_with_color(&card, color, weight);
    }
    let card = round_corners(&card, corner_radius)?;

    let (w, h) = card.dimensions();
    let shadow = DropShadow {
        offset: spec.shadow_offset,
        color: Rgba8::new(0, 0, 0, (255.0 * spec.shadow_opacity.clamp(0.0, 1.0)) as u8),
        blur_radius: spec.shadow_blur,
        padding: ShadowPadding::Uniform(w.max(h) / 2),
    };
    let shadowed = shadow.apply(&card)?;
    rotate_expand(&shadowed.image, spec.angle)
}

/// Card-stack cover (`single_1`).
#[tracing::instrument(skip_all, fields(w = source.width(), h = source.height()))]
pub(crate) fn render_card_stack<R: Rng + ?Sized>(
    renderer: &mut TextRenderer,
    source: &RgbaImage,
    text: CoverText<'_>,
    params: &CardStackParams,
    options: &StyleOptions,
    rng: &mut R,
) -> CoverResult<RgbaImage> {
    let (cw, ch) = params.canvas;

    let (background_color, palette) = run_stage(SingleStage::ColorExtract, || {
        let palette = card_stack_palette(source, params, rng);
        let first = palette
            .first()
            .copied()
            .ok_or_else(|| CoverError::render("empty card palette"))?;
        Ok((darken(first, params.background_darken), palette))
    })?;

    let mut canvas = run_stage(SingleStage::BackgroundBuild, || {
        let fitted = fit_cover(source, cw, ch)?;
        tinted_backdrop(
            &fitted,
            params.background_blur,
            background_color,
            params.background_color_weight,
            grain_if(options, params.grain),
            rng,
        )
    })?;

    let cards = run_stage(SingleStage::ForegroundBuild, || {
        let side = ((f64::from(ch) * params.card_scale).trunc() as u32).max(1);
        let square = resize_exact(&crop_to_square(source)?, side, side);
        let radius = f64::from(side / params.corner_divisor.max(1));
        params
            .cards
            .iter()
            .map(|spec| build_card(&square, spec, &palette, radius))
            .collect::<CoverResult<Vec<_>>>()
    })?;

    run_stage(SingleStage::Compose, || {
        let pivot_x = i64::from(cw) - (f64::from(ch) * 0.5).trunc() as i64;
        let pivot_y = (f64::from(ch) * 0.5).trunc() as i64;
        for card in &cards {
            let x = pivot_x - i64::from(card.width() / 2);
            let y = pivot_y - i64::from(card.height() / 2);
            overlay_at(&mut canvas, card, x, y);
        }
        Ok(())
    })?;

    run_stage(SingleStage::TextOverlay, || {
        let (localized, latin) = card_stack_titles(text);
        let shadow = darken(background_color, params.text_shadow_darken);
        draw_single_titles(renderer, &mut canvas, text.fonts, localized, latin, shadow)
    })?;

    Ok(canvas)
}

/// Card stack: the localized line falls back to the library name, the Latin line is optional.
pub(crate) fn card_stack_titles<'a>(text: CoverText<'a>) -> (&'a str, Option<&'a str>) {
    (text.title.localized().unwrap_or(text.library_name), text.title.latin())
}

/// Diagonal: both lines or the placeholder pair.
pub(crate) fn diagonal_titles<'a>(text: CoverText<'a>) -> (&'a str, &'a str) {
    match (text.title.localized(), text.title.latin()) {
        (Some(l), Some(t)) => (l, t),
        _ => {
            tracing::info!(library = text.library_name, "title not configured, using placeholder");
            (PLACEHOLDER_LOCALIZED, PLACEHOLDER_LATIN)
        }
    }
}

/// Scales `img` to the canvas height and crops it so its center sits at `center_share` of the
/// canvas width. The kept strip is right-aligned on a black canvas.
pub(crate) fn place_foreground(
    img: &RgbaImage,
    canvas: (u32, u32),
    center_share: f64,
) -> CoverResult<RgbaImage> {
    let (cw, ch) = canvas;
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(CoverError::input("foreground image is empty"));
    }
    let scaled_w = ((f64::from(w) * f64::from(ch) / f64::from(h)).trunc() as u32).max(1);
    let resized = resize_exact(img, scaled_w, ch);

    let shift = f64::from(cw) * center_share - f64::from(scaled_w) / 2.0;
    let left = (-shift).max(0.0).trunc() as u32;
    let right = ((f64::from(cw) - shift).min(f64::from(scaled_w))).trunc().max(0.0) as u32;

    let mut out = RgbaImage::from_pixel(cw, ch, image::Rgba([0, 0, 0, 255]));
    if right > left {
        let strip = imageops::crop_imm(&resized, left, 0, right - left, ch).to_image();
        let x = i64::from(cw) - i64::from(strip.width());
        imageops::replace(&mut out, &strip, x, 0);
    }
    Ok(out)
}

/// Diagonal-split cover (`single_2`).
#[tracing::instrument(skip_all, fields(w = source.width(), h = source.height()))]
pub(crate) fn render_diagonal<R: Rng + ?Sized>(
    renderer: &mut TextRenderer,
    source: &RgbaImage,
    text: CoverText<'_>,
    params: &DiagonalParams,
    options: &StyleOptions,
    rng: &mut R,
) -> CoverResult<RgbaImage> {
    let (cw, ch) = params.canvas;

    let (mut foreground, background_color) = run_stage(SingleStage::ColorExtract, || {
        let foreground = place_foreground(source, params.canvas, params.foreground_center)?;
        let analyzer = ColorAnalyzer::new(ExtractMode::Vibrant);
        let colors = analyzer.extract_dominant_colors(&foreground, params.max_colors);
        let color = match colors.first() {
            Some(c) => *c,
            None => {
                let c = *DIAGONAL_SOFT_COLORS.choose(rng).unwrap_or(&DIAGONAL_SOFT_COLORS[0]);
                tracing::info!(color = ?c, "no vibrant color found, using soft fallback");
                c
            }
        };
        Ok((foreground, color))
    })?;
    let shadow_color = darken(background_color, params.shadow_darken);

    let background = run_stage(SingleStage::BackgroundBuild, || {
        let cropped = crop_to_aspect(source, 16, 9)?;
        let resized = resize_exact(&cropped, cw, ch);
        tinted_backdrop(
            &resized,
            params.background_blur,
            background_color,
            params.background_color_weight,
            grain_if(options, params.grain),
            rng,
        )
    })?;

    run_stage(SingleStage::ForegroundBuild, || {
        let seam = diagonal_shadow_mask(cw, ch, params.split, params.feather)?;
        fill_through_mask(&mut foreground, shadow_color, &seam)
    })?;

    let mut canvas = run_stage(SingleStage::Compose, || {
        let mask = diagonal_split_mask(cw, ch, params.split)?;
        select_by_mask(&background, &foreground, &mask)
    })?;

    run_stage(SingleStage::TextOverlay, || {
        let (localized, latin) = diagonal_titles(text);
        draw_single_titles(
            renderer,
            &mut canvas,
            text.fonts,
            localized,
            Some(latin),
            shadow_color,
        )
    })?;

    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/single.rs"]
mod tests;
