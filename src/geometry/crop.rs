use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::error::{CoverError, CoverResult};

/// Largest centered crop of `img` with aspect ratio `ratio_w : ratio_h`.
pub fn crop_to_aspect(img: &RgbaImage, ratio_w: u32, ratio_h: u32) -> CoverResult<RgbaImage> {
    if ratio_w == 0 || ratio_h == 0 {
        return Err(CoverError::validation("aspect ratio terms must be > 0"));
    }
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(CoverError::input("cannot crop an empty image"));
    }
    let target = f64::from(ratio_w) / f64::from(ratio_h);
    let current = f64::from(w) / f64::from(h);
    let (x, y, cw, ch) = if current > target {
        let new_w = ((f64::from(h) * target) as u32).clamp(1, w);
        ((w - new_w) / 2, 0, new_w, h)
    } else {
        let new_h = ((f64::from(w) / target) as u32).clamp(1, h);
        (0, (h - new_h) / 2, w, new_h)
    };
    Ok(imageops::crop_imm(img, x, y, cw, ch).to_image())
}

/// Centered square crop on the shorter side.
pub fn crop_to_square(img: &RgbaImage) -> CoverResult<RgbaImage> {
    crop_to_aspect(img, 1, 1)
}

/// Crops to the target aspect, then resizes to exactly `width x height`.
pub fn fit_cover(img: &RgbaImage, width: u32, height: u32) -> CoverResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(CoverError::validation("fit target must be non-empty"));
    }
    let cropped = crop_to_aspect(img, width, height)?;
    Ok(resize_exact(&cropped, width, height))
}

/// Lanczos resize; a no-op when the size already matches.
pub fn resize_exact(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, FilterType::Lanczos3)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/crop.rs"]
mod tests;
