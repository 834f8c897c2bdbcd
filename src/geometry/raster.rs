//! Anti-aliased coverage masks rasterized with `vello_cpu`.

use image::{GrayImage, RgbaImage};
use kurbo::{BezPath, PathEl, RoundedRect, Shape};

use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::math::mul_div255_u8;

pub(crate) fn surface_dims(width: u32, height: u32) -> CoverResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CoverError::render(format!("surface width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CoverError::render(format!("surface height {height} exceeds u16")))?;
    if w == 0 || h == 0 {
        return Err(CoverError::render("surface must be non-empty"));
    }
    Ok((w, h))
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Fills `path` in white on a `width x height` surface and returns its coverage.
pub fn path_coverage(width: u32, height: u32, path: &BezPath) -> CoverResult<GrayImage> {
    let (w, h) = surface_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_path(&bezpath_to_cpu(path));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    let alpha: Vec<u8> = pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    GrayImage::from_raw(width, height, alpha)
        .ok_or_else(|| CoverError::render("coverage buffer size mismatch"))
}

/// Coverage of a `width x height` rounded rectangle anchored at the origin.
pub fn rounded_rect_mask(width: u32, height: u32, radius: f64) -> CoverResult<GrayImage> {
    let max_r = f64::from(width.min(height)) / 2.0;
    let r = if radius.is_finite() { radius.clamp(0.0, max_r) } else { 0.0 };
    let rr = RoundedRect::new(0.0, 0.0, f64::from(width), f64::from(height), r);
    let mut path = BezPath::new();
    for el in rr.path_elements(0.1) {
        path.push(el);
    }
    path_coverage(width, height, &path)
}

/// Coverage of a closed polygon.
pub fn polygon_mask(width: u32, height: u32, points: &[(f64, f64)]) -> CoverResult<GrayImage> {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path_coverage(width, height, &path)
}

/// Multiplies the image's alpha by `mask`.
pub fn apply_alpha_mask(img: &mut RgbaImage, mask: &GrayImage) -> CoverResult<()> {
    if img.dimensions() != mask.dimensions() {
        return Err(CoverError::render(format!(
            "mask is {:?}, image is {:?}",
            mask.dimensions(),
            img.dimensions()
        )));
    }
    for (px, m) in img.pixels_mut().zip(mask.pixels()) {
        px[3] = mul_div255_u8(u16::from(px[3]), u16::from(m[0]));
    }
    Ok(())
}

/// Copy of `img` with anti-aliased rounded corners.
pub fn round_corners(img: &RgbaImage, radius: f64) -> CoverResult<RgbaImage> {
    let mask = rounded_rect_mask(img.width(), img.height(), radius)?;
    let mut out = img.clone();
    apply_alpha_mask(&mut out, &mask)?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/raster.rs"]
mod tests;
