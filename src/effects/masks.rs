use image::{GrayImage, Luma};

use crate::effects::blur::gaussian_blur_gray;
use crate::foundation::error::{CoverError, CoverResult};
use crate::geometry::raster::polygon_mask;

/// A slanted split line, given as fractions of the canvas width where it meets the top and
/// bottom edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagonalSplit {
    pub top: f64,
    pub bottom: f64,
}

impl DiagonalSplit {
    fn columns(self, width: u32) -> (f64, f64) {
        let w = f64::from(width);
        ((w * self.top).trunc(), (w * self.bottom).trunc())
    }

    fn validate(self) -> CoverResult<()> {
        let ok = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if ok(self.top) && ok(self.bottom) {
            Ok(())
        } else {
            Err(CoverError::validation("diagonal split fractions must lie in [0, 1]"))
        }
    }
}

/// Binary mask: 255 left of the split line, 0 right of it.
pub fn diagonal_split_mask(width: u32, height: u32, split: DiagonalSplit) -> CoverResult<GrayImage> {
    split.validate()?;
    if width == 0 || height == 0 {
        return Err(CoverError::render("mask must be non-empty"));
    }
    let (top_x, bottom_x) = split.columns(width);
    let h = f64::from(height);
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let t = (f64::from(y) + 0.5) / h;
        let boundary = top_x + (bottom_x - top_x) * t;
        if f64::from(x) + 0.5 >= boundary {
            Luma([0])
        } else {
            Luma([255])
        }
    }))
}

/// Soft band hugging the right side of the split line, used to cast the background's shadow
/// onto the foreground.
pub fn diagonal_shadow_mask(
    width: u32,
    height: u32,
    split: DiagonalSplit,
    feather: u32,
) -> CoverResult<GrayImage> {
    split.validate()?;
    let (top_x, bottom_x) = split.columns(width);
    let band = f64::from(feather / 3);
    let h = f64::from(height);
    let band_mask = polygon_mask(
        width,
        height,
        &[
            (top_x - 5.0, 0.0),
            (top_x - 5.0 + band, 0.0),
            (bottom_x - 5.0 + band, h),
            (bottom_x - 5.0, h),
        ],
    )?;
    gaussian_blur_gray(&band_mask, (feather / 3) as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/masks.rs"]
mod tests;
