use image::RgbaImage;
use kurbo::{Affine, Point, Rect};
use rayon::prelude::*;

use crate::foundation::core::{premultiply_buf, unpremultiply_in_place};
use crate::foundation::error::{CoverError, CoverResult};

/// Canvas size needed to hold a `width x height` image rotated by `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let bbox = Affine::rotate(-degrees.to_radians())
        .transform_rect_bbox(Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));
    let side = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    (side(bbox.width()), side(bbox.height()))
}

/// Rotates counter-clockwise by `degrees` about the image center, expanding the canvas so no
/// content is clipped. Uncovered pixels are transparent.
#[tracing::instrument(level = "trace", skip(img), fields(w = img.width(), h = img.height()))]
pub fn rotate_expand(img: &RgbaImage, degrees: f64) -> CoverResult<RgbaImage> {
    if !degrees.is_finite() {
        return Err(CoverError::validation("rotation angle must be finite"));
    }
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(CoverError::render("cannot rotate an empty image"));
    }
    if degrees.rem_euclid(360.0) == 0.0 {
        return Ok(img.clone());
    }

    let (nw, nh) = rotated_bounds(w, h, degrees);
    let src = premultiply_buf(img.as_raw());
    let to_src = Affine::translate((f64::from(w) / 2.0, f64::from(h) / 2.0))
        * Affine::rotate(degrees.to_radians())
        * Affine::translate((-f64::from(nw) / 2.0, -f64::from(nh) / 2.0));

    let mut out = vec![0u8; (nw as usize) * (nh as usize) * 4];
    out.par_chunks_mut(nw as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let p = to_src * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                px.copy_from_slice(&sample_bilinear(&src, w, h, p.x - 0.5, p.y - 0.5));
            }
        });
    unpremultiply_in_place(&mut out);
    RgbaImage::from_raw(nw, nh, out).ok_or_else(|| CoverError::render("rotation buffer mismatch"))
}

/// Bilinear sample of a premultiplied buffer; outside texels are transparent.
fn sample_bilinear(src: &[u8], w: u32, h: u32, x: f64, y: f64) -> [u8; 4] {
    let (wi, hi) = (i64::from(w), i64::from(h));
    if x <= -1.0 || y <= -1.0 || x >= wi as f64 || y >= hi as f64 {
        return [0; 4];
    }
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let texel = |tx: i64, ty: i64| -> [f64; 4] {
        if tx < 0 || ty < 0 || tx >= wi || ty >= hi {
            return [0.0; 4];
        }
        let i = ((ty * wi + tx) as usize) * 4;
        [
            f64::from(src[i]),
            f64::from(src[i + 1]),
            f64::from(src[i + 2]),
            f64::from(src[i + 3]),
        ]
    };
    let p00 = texel(x0, y0);
    let p10 = texel(x0 + 1, y0);
    let p01 = texel(x0, y0 + 1);
    let p11 = texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - fx) + p10[c] * fx;
        let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/rotate.rs"]
mod tests;
