use image::{GrayImage, RgbaImage};

use crate::foundation::core::{Rgb8, Rgba8, premultiply_px, unpremultiply_px};
use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::math::{add_sat_u8, lerp_u8, mul_div255_u8, trunc_u8};

pub type PremulRgba8 = [u8; 4];

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Source-over on straight-alpha pixels.
pub fn over_straight(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src.a == 255 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }
    let out = over(premultiply_px(arr(dst)), premultiply_px(arr(src)), 1.0);
    let [r, g, b, a] = unpremultiply_px(out);
    Rgba8::new(r, g, b, a)
}

fn arr(c: Rgba8) -> [u8; 4] {
    [c.r, c.g, c.b, c.a]
}

/// Composites `overlay` over `base` with its top-left corner at `(x, y)`; the overlay is
/// clipped to the base bounds.
pub fn overlay_at(base: &mut RgbaImage, overlay: &RgbaImage, x: i64, y: i64) {
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    let (ow, oh) = (i64::from(overlay.width()), i64::from(overlay.height()));
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + ow).min(bw);
    let y1 = (y + oh).min(bh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    for by in y0..y1 {
        for bx in x0..x1 {
            let src = Rgba8::from(*overlay.get_pixel((bx - x) as u32, (by - y) as u32));
            if src.a == 0 {
                continue;
            }
            let dst = base.get_pixel_mut(bx as u32, by as u32);
            *dst = over_straight(Rgba8::from(*dst), src).to_pixel();
        }
    }
}

/// Same-size source-over of `overlay` onto `base`.
pub fn alpha_composite(base: &mut RgbaImage, overlay: &RgbaImage) -> CoverResult<()> {
    if base.dimensions() != overlay.dimensions() {
        return Err(CoverError::render(format!(
            "alpha_composite size mismatch: {:?} vs {:?}",
            base.dimensions(),
            overlay.dimensions()
        )));
    }
    overlay_at(base, overlay, 0, 0);
    Ok(())
}

/// Mixes every pixel's color toward `color`; `color_weight` is the share of `color`.
/// Alpha is preserved and channels are truncated.
pub fn blend_with_color(img: &RgbaImage, color: Rgb8, color_weight: f64) -> RgbaImage {
    let t = color_weight.clamp(0.0, 1.0);
    let mut out = img.clone();
    let tint = color.channels();
    for px in out.pixels_mut() {
        for c in 0..3 {
            px[c] = trunc_u8(f64::from(px[c]) * (1.0 - t) + f64::from(tint[c]) * t + 1e-9);
        }
    }
    out
}

/// Per-pixel choice between two same-size images: mask 255 selects `a`, 0 selects `b`,
/// intermediate values mix.
pub fn select_by_mask(a: &RgbaImage, b: &RgbaImage, mask: &GrayImage) -> CoverResult<RgbaImage> {
    if a.dimensions() != b.dimensions() || a.dimensions() != mask.dimensions() {
        return Err(CoverError::render("select_by_mask expects equal sizes"));
    }
    let mut out = b.clone();
    for ((o, pa), m) in out.pixels_mut().zip(a.pixels()).zip(mask.pixels()) {
        let t = f64::from(m[0]) / 255.0;
        for c in 0..4 {
            o[c] = lerp_u8(o[c], pa[c], t);
        }
    }
    Ok(out)
}

/// Paints `color` through `mask`, mixing toward it by the mask's coverage.
pub fn fill_through_mask(base: &mut RgbaImage, color: Rgb8, mask: &GrayImage) -> CoverResult<()> {
    if base.dimensions() != mask.dimensions() {
        return Err(CoverError::render("fill_through_mask expects equal sizes"));
    }
    let tint = color.channels();
    for (px, m) in base.pixels_mut().zip(mask.pixels()) {
        if m[0] == 0 {
            continue;
        }
        let t = f64::from(m[0]) / 255.0;
        for c in 0..3 {
            px[c] = lerp_u8(px[c], tint[c], t);
        }
    }
    Ok(())
}

/// Solid axis-aligned rectangle covering `[x, x + w) x [y, y + h)`, clipped to the image.
pub fn fill_rect(img: &mut RgbaImage, x: f64, y: f64, w: f64, h: f64, color: Rgba8) {
    let clamp_x = |v: f64| v.clamp(0.0, f64::from(img.width())) as u32;
    let clamp_y = |v: f64| v.clamp(0.0, f64::from(img.height())) as u32;
    let (x0, x1) = (clamp_x(x.floor()), clamp_x((x + w).ceil()));
    let (y0, y1) = (clamp_y(y.floor()), clamp_y((y + h).ceil()));
    for py in y0..y1 {
        for px in x0..x1 {
            let dst = img.get_pixel_mut(px, py);
            *dst = over_straight(Rgba8::from(*dst), color).to_pixel();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
