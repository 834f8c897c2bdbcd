use image::RgbaImage;

use crate::effects::blur::gaussian_blur;
use crate::effects::composite::overlay_at;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::math::mul_div255_u8;

/// How much transparent margin surrounds the foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowPadding {
    /// Just enough for the blur radius plus the offset, on the sides it extends to.
    Tight,
    /// The same margin on every side, widened if it cannot hold the blurred shadow.
    Uniform(u32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropShadow {
    pub offset: (i32, i32),
    pub color: Rgba8,
    pub blur_radius: f32,
    pub padding: ShadowPadding,
}

/// A foreground with its shadow, plus where the unshifted foreground sits inside it.
#[derive(Clone, Debug)]
pub struct Shadowed {
    pub image: RgbaImage,
    pub origin: (u32, u32),
}

impl DropShadow {
    fn margins(&self) -> [u32; 4] {
        let r = self.blur_radius.max(0.0).ceil() as u32;
        let (dx, dy) = self.offset;
        match self.padding {
            ShadowPadding::Tight => [
                r + (-dx).max(0) as u32,
                r + (-dy).max(0) as u32,
                r + dx.max(0) as u32,
                r + dy.max(0) as u32,
            ],
            ShadowPadding::Uniform(p) => {
                let p = p.max(r + dx.unsigned_abs().max(dy.unsigned_abs()));
                [p; 4]
            }
        }
    }

    /// Paints a blurred silhouette of `fg` at the offset, then `fg` itself on top.
    pub fn apply(&self, fg: &RgbaImage) -> CoverResult<Shadowed> {
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(CoverError::validation("shadow blur radius must be finite and >= 0"));
        }
        let (w, h) = fg.dimensions();
        let [left, top, right, bottom] = self.margins();
        let cw = w + left + right;
        let ch = h + top + bottom;

        let mut silhouette = RgbaImage::new(cw, ch);
        let sx = i64::from(left) + i64::from(self.offset.0);
        let sy = i64::from(top) + i64::from(self.offset.1);
        let shade = self.color;
        for (x, y, px) in fg.enumerate_pixels() {
            if px[3] == 0 {
                continue;
            }
            let a = mul_div255_u8(u16::from(px[3]), u16::from(shade.a));
            let tx = (sx + i64::from(x)) as u32;
            let ty = (sy + i64::from(y)) as u32;
            silhouette.put_pixel(tx, ty, image::Rgba([shade.r, shade.g, shade.b, a]));
        }

        let mut image = gaussian_blur(&silhouette, self.blur_radius)?;
        overlay_at(&mut image, fg, i64::from(left), i64::from(top));
        Ok(Shadowed {
            image,
            origin: (left, top),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
