use image::RgbaImage;
use rayon::prelude::*;

use crate::color::palette::{darken, lighten};
use crate::foundation::core::Rgb8;
use crate::foundation::math::lerp_u8;

/// Tunables of the left-to-right background gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientParams {
    /// Factor applied to the base color for the left edge.
    pub darken: f64,
    pub lighten_factor: f64,
    pub min_increase: u8,
    pub max_value: u8,
    /// Shape of the blend ramp; below 1 the right color takes over early.
    pub exponent: f64,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self {
            darken: 0.65,
            lighten_factor: 1.9,
            min_increase: 80,
            max_value: 230,
            exponent: 0.7,
        }
    }
}

/// Opaque horizontal gradient from a darkened `base` on the left to a lightened one on the
/// right.
pub fn gradient_background(width: u32, height: u32, base: Rgb8, params: &GradientParams) -> RgbaImage {
    let left = darken(base, params.darken);
    let right = lighten(left, params.lighten_factor, params.min_increase, params.max_value);
    let ramp: Vec<[u8; 4]> = (0..width)
        .map(|x| {
            let m = (255.0 * (f64::from(x) / f64::from(width.max(1))).powf(params.exponent)).trunc();
            let t = m / 255.0;
            [
                lerp_u8(left.r, right.r, t),
                lerp_u8(left.g, right.g, t),
                lerp_u8(left.b, right.b, t),
                255,
            ]
        })
        .collect();

    let mut buf = vec![0u8; width as usize * height as usize * 4];
    if width > 0 {
        buf.par_chunks_mut(width as usize * 4).for_each(|row| {
            for (px, c) in row.chunks_exact_mut(4).zip(&ramp) {
                px.copy_from_slice(c);
            }
        });
    }
    RgbaImage::from_raw(width, height, buf).unwrap_or_else(|| RgbaImage::new(width, height))
}

/// Overlays white whose alpha grows linearly from 0 on the left to `strength * 255` on the
/// right.
pub fn whiten_towards_right(img: &mut RgbaImage, strength: f64) {
    let max_alpha = (255.0 * strength.clamp(0.0, 1.0)).trunc();
    let width = f64::from(img.width().max(1));
    for (x, _, px) in img.enumerate_pixels_mut() {
        let alpha = ((f64::from(x) / width) * max_alpha).trunc();
        if alpha <= 0.0 {
            continue;
        }
        let t = alpha / 255.0;
        for c in 0..3 {
            px[c] = lerp_u8(px[c], 255, t);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
