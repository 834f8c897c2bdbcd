//! Poster wall: nine posters in three rotated columns over a gradient or blurred backdrop.

use image::RgbaImage;
use rand::Rng;

use crate::color::analyze::poster_primary_colors;
use crate::color::palette::{darken, select_suitable_color};
use crate::compose::stage::{MultiStage, run_stage};
use crate::compose::{CoverText, opaque};
use crate::effects::blur::gaussian_blur;
use crate::effects::composite::{blend_with_color, fill_rect, overlay_at};
use crate::effects::gradient::{GradientParams, gradient_background, whiten_towards_right};
use crate::effects::grain::add_film_grain;
use crate::effects::shadow::{DropShadow, ShadowPadding};
use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::math::add_sat_u8;
use crate::geometry::crop::fit_cover;
use crate::geometry::raster::round_corners;
use crate::geometry::rotate::rotate_expand;
use crate::pipeline::request::StyleOptions;
use crate::pipeline::slots::{POSTER_SLOTS, VISUAL_ORDER, arrange_columns};
use crate::text::draw::{ShadowSteps, TextShadow, draw_multiline_text, draw_text};
use crate::text::engine::TextRenderer;

const PRIMARY_FALLBACK: Rgb8 = Rgb8::new(150, 100, 50);
const TITLE_FILL: Rgba8 = Rgba8::new(255, 255, 255, 255);

#[derive(Clone, Debug, PartialEq)]
pub struct PosterWallParams {
    pub canvas: (u32, u32),
    pub cell: (u32, u32),
    /// Vertical gap between posters of a column.
    pub margin: u32,
    pub corner_radius: f64,
    /// Counter-clockwise, in degrees; the wall leans clockwise.
    pub rotation: f64,
    pub start: (i64, i64),
    pub column_spacing: i64,
    pub shadow: DropShadow,
    pub gradient: GradientParams,
    pub blur_radius: f32,
    pub blur_darken: f64,
    pub blur_color_weight: f64,
    pub whiten: f64,
    pub grain: f64,
    pub localized_origin: (f32, f32),
    pub localized_size: f32,
    pub localized_shadow: ShadowSteps,
    pub latin_origin: (f32, f32),
    pub latin_size: f32,
    pub latin_min_size: f32,
    pub latin_line_spacing: f32,
    pub latin_shadow: ShadowSteps,
    pub text_shadow_darken: f64,
    pub accent_origin: (f64, f64),
    pub accent_width: f64,
    pub accent_height: f64,
}

impl Default for PosterWallParams {
    fn default() -> Self {
        Self {
            canvas: (1920, 1080),
            cell: (410, 610),
            margin: 22,
            corner_radius: 46.1,
            rotation: -15.8,
            start: (835, -362),
            column_spacing: 100,
            shadow: DropShadow {
                offset: (20, 20),
                color: Rgba8::new(0, 0, 0, 200),
                blur_radius: 20.0,
                padding: ShadowPadding::Tight,
            },
            gradient: GradientParams::default(),
            blur_radius: 50.0,
            blur_darken: 0.85,
            blur_color_weight: 0.8,
            whiten: 0.7,
            grain: 0.03,
            localized_origin: (73.32, 427.34),
            localized_size: 163.0,
            localized_shadow: ShadowSteps::new(3, 11, 2),
            latin_origin: (124.68, 624.55),
            latin_size: 50.0,
            latin_min_size: 30.0,
            latin_line_spacing: 5.0,
            latin_shadow: ShadowSteps::new(3, 7, 2),
            text_shadow_darken: 0.65,
            accent_origin: (84.38, 620.06),
            accent_width: 21.51,
            accent_height: 55.0,
        }
    }
}

impl PosterWallParams {
    fn column_height(&self) -> u32 {
        3 * self.cell.1 + 2 * self.margin
    }

    /// Extra room to the right of and below a column for the poster shadows.
    fn shadow_extra(&self) -> u32 {
        let r = self.shadow.blur_radius.max(0.0).ceil() as u32;
        self.shadow.offset.0.unsigned_abs().max(self.shadow.offset.1.unsigned_abs()) + 2 * r
    }

    /// Column center before rotation: `(x, y)` on the canvas.
    fn column_center(&self, index: usize) -> (i64, i64) {
        let cell_w = i64::from(self.cell.0);
        let mut x = self.start.0 + index as i64 * self.column_spacing;
        let mut y = self.start.1 + i64::from(self.column_height() / 2);
        match index {
            1 => x += cell_w - 50,
            2 => {
                x += 2 * cell_w - 40;
                y -= 155;
            }
            _ => {}
        }
        (x, y)
    }
}

/// Latin title size: base size for short titles, shrinking with word count and longest word.
pub(crate) fn latin_font_size(text: &str, base: f32, floor: f32) -> f32 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let longest = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
    let count = words.len();
    if longest > 10 || count > 3 {
        let denom = longest.max(count * 3) as f64;
        let size = f64::from(base) * (10.0 / denom).powf(0.8);
        (size as f32).max(floor)
    } else {
        base
    }
}

/// Unreadable lead poster: the fixed fallback. Readable but without usable pixels: random.
fn background_color<R: Rng + ?Sized>(first: Option<&RgbaImage>, rng: &mut R) -> Rgb8 {
    let Some(poster) = first else {
        tracing::warn!(color = ?PRIMARY_FALLBACK, "lead poster unavailable, using fallback color");
        return select_suitable_color(&[PRIMARY_FALLBACK], rng).0;
    };
    let candidates = poster_primary_colors(poster);
    if candidates.is_empty() {
        tracing::info!("lead poster has no opaque pixels, using random color");
    }
    select_suitable_color(&candidates, rng).0
}

fn blurred_background<R: Rng + ?Sized>(
    poster: &RgbaImage,
    color: Rgb8,
    params: &PosterWallParams,
    options: &StyleOptions,
    rng: &mut R,
) -> CoverResult<RgbaImage> {
    let (w, h) = params.canvas;
    let fitted = fit_cover(poster, w, h)?;
    let blurred = gaussian_blur(&fitted, params.blur_radius)?;
    let mut bg = opaque(blend_with_color(
        &blurred,
        darken(color, params.blur_darken),
        params.blur_color_weight,
    ));
    whiten_towards_right(&mut bg, params.whiten);
    if options.grain {
        add_film_grain(&mut bg, params.grain, rng);
    }
    Ok(bg)
}

fn framed_poster(poster: &RgbaImage, params: &PosterWallParams) -> CoverResult<RgbaImage> {
    let fitted = fit_cover(poster, params.cell.0, params.cell.1)?;
    let rounded = round_corners(&fitted, params.corner_radius)?;
    Ok(params.shadow.apply(&rounded)?.image)
}

/// Stacks up to three posters into one transparent column; failed posters leave a gap.
fn build_column(posters: &[Option<&RgbaImage>], params: &PosterWallParams) -> RgbaImage {
    let extra = params.shadow_extra();
    let mut column = RgbaImage::new(params.cell.0 + extra, params.column_height() + extra);
    for (row, poster) in posters.iter().enumerate() {
        let Some(poster) = poster else {
            tracing::warn!(row, "poster missing, leaving its cell empty");
            continue;
        };
        match framed_poster(poster, params) {
            Ok(framed) => {
                let y = row as u32 * (params.cell.1 + params.margin);
                overlay_at(&mut column, &framed, 0, i64::from(y));
            }
            Err(err) => tracing::warn!(row, error = %err, "poster failed, skipping"),
        }
    }
    column
}

/// Centers `column` on a square canvas sized to survive any rotation, then rotates it.
fn rotate_column(column: &RgbaImage, params: &PosterWallParams) -> CoverResult<RgbaImage> {
    let (w, h) = column.dimensions();
    let side = ((f64::from(w).hypot(f64::from(h))) * 1.5) as u32;
    let mut padded = RgbaImage::new(side, side);
    let x = (side - params.cell.0) / 2;
    let y = (side - params.column_height()) / 2;
    overlay_at(&mut padded, column, i64::from(x), i64::from(y));
    rotate_expand(&padded, params.rotation)
}

/// Pixel of `poster` at a random point in the lower-right area, warmed up.
fn accent_color<R: Rng + ?Sized>(poster: Option<&RgbaImage>, rng: &mut R) -> Rgba8 {
    match poster.filter(|p| p.width() > 0 && p.height() > 0) {
        Some(p) => {
            let pick = |len: u32, rng: &mut R| {
                let lo = (f64::from(len) * 0.5) as u32;
                let hi = ((f64::from(len) * 0.8) as u32).clamp(lo, len - 1);
                rng.gen_range(lo..=hi)
            };
            let x = pick(p.width(), rng);
            let y = pick(p.height(), rng);
            let px = p.get_pixel(x, y);
            Rgba8::new(add_sat_u8(px[0], 100), add_sat_u8(px[1], 50), px[2], 255)
        }
        None => Rgba8::new(
            rng.gen_range(50..=200),
            rng.gen_range(50..=200),
            rng.gen_range(50..=200),
            255,
        ),
    }
}

/// Poster-wall cover (`multi_1`).
///
/// `posters` are in slot order `1..=9`; `None` marks a poster that could not be decoded.
#[tracing::instrument(skip_all, fields(blur = options.blur))]
pub(crate) fn render_poster_wall<R: Rng + ?Sized>(
    renderer: &mut TextRenderer,
    posters: &[Option<RgbaImage>],
    text: CoverText<'_>,
    params: &PosterWallParams,
    options: &StyleOptions,
    rng: &mut R,
) -> CoverResult<RgbaImage> {
    if posters.len() != POSTER_SLOTS {
        return Err(CoverError::input(format!(
            "poster wall needs exactly {POSTER_SLOTS} images, got {}",
            posters.len()
        )));
    }
    let first = posters[0].as_ref();

    let color = run_stage(MultiStage::ResolvePrimaryColor, || Ok(background_color(first, rng)))?;

    let mut canvas = run_stage(MultiStage::BuildBackground, || {
        let (w, h) = params.canvas;
        match (options.blur, first) {
            (true, Some(poster)) => blurred_background(poster, color, params, options, rng),
            (true, None) => {
                tracing::warn!("first poster unavailable, using gradient background");
                Ok(gradient_background(w, h, color, &params.gradient))
            }
            (false, _) => Ok(gradient_background(w, h, color, &params.gradient)),
        }
    })?;

    let columns = run_stage(MultiStage::BuildColumns, || {
        let refs: Vec<Option<&RgbaImage>> = posters.iter().map(Option::as_ref).collect();
        let grouped = arrange_columns(refs)?;
        Ok(grouped.map(|posters| build_column(&posters, params)))
    })?;
    // Top poster of the first column.
    let lead = posters[VISUAL_ORDER[0] - 1].as_ref();

    let rotated = run_stage(MultiStage::RotateColumns, || {
        columns
            .iter()
            .map(|column| rotate_column(column, params))
            .collect::<CoverResult<Vec<_>>>()
    })?;

    run_stage(MultiStage::PlaceColumns, || {
        let half_cell = i64::from(params.cell.0 / 2);
        for (index, column) in rotated.iter().enumerate() {
            let (cx, cy) = params.column_center(index);
            let x = cx - i64::from(column.width() / 2) + half_cell;
            let y = cy - i64::from(column.height() / 2);
            overlay_at(&mut canvas, column, x, y);
        }
        Ok(())
    })?;

    run_stage(MultiStage::DrawTitles, || {
        let shadow_color = darken(color, params.text_shadow_darken);
        let localized = text.title.localized().unwrap_or(text.library_name);
        let font = text.fonts.localized.with_size(params.localized_size)?;
        let shadow = TextShadow::new(shadow_color, params.localized_shadow);
        let shadow_ref = options.blur.then_some(&shadow);
        draw_text(
            renderer,
            &mut canvas,
            localized,
            params.localized_origin,
            &font,
            TITLE_FILL,
            shadow_ref,
        )?;

        let Some(latin) = text.title.latin() else {
            return Ok(());
        };
        let size = latin_font_size(latin, params.latin_size, params.latin_min_size).trunc();
        tracing::debug!(size, "latin title size");
        let font = text.fonts.latin.with_size(size)?;
        let shadow = TextShadow::new(shadow_color, params.latin_shadow);
        let lines = draw_multiline_text(
            renderer,
            &mut canvas,
            latin,
            params.latin_origin,
            &font,
            params.latin_line_spacing,
            TITLE_FILL,
            options.blur.then_some(&shadow),
        )?;

        let height =
            params.accent_height + (lines.saturating_sub(1)) as f64 * f64::from(size + params.latin_line_spacing);
        let (ax, ay) = params.accent_origin;
        fill_rect(&mut canvas, ax, ay, params.accent_width, height, accent_color(lead, rng));
        Ok(())
    })?;

    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/multi.rs"]
mod tests;
