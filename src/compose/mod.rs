//! Cover composers: the two single-backdrop styles and the poster wall.

pub(crate) mod multi;
pub(crate) mod single;
pub(crate) mod stage;

use image::RgbaImage;

use crate::pipeline::request::{CoverFonts, Title};

/// Text inputs shared by every composer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CoverText<'a> {
    pub(crate) title: &'a Title,
    pub(crate) library_name: &'a str,
    pub(crate) fonts: &'a CoverFonts,
}

/// Drops the alpha channel: every pixel becomes fully opaque with its color unchanged.
pub(crate) fn opaque(mut img: RgbaImage) -> RgbaImage {
    for px in img.pixels_mut() {
        px[3] = 255;
    }
    img
}
