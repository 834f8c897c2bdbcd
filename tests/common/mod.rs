#![allow(dead_code)]

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

pub const FONT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/fonts/DejaVuSansMono.ttf");

const FONT: &[u8] = include_bytes!("../data/fonts/DejaVuSansMono.ttf");

pub fn fonts() -> mediacover::CoverFonts {
    let font = mediacover::FontAsset::from_bytes(FONT.to_vec(), 48.0).unwrap();
    mediacover::CoverFonts {
        localized: font.clone(),
        latin: font,
    }
}

pub fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .write_to(&mut out, format)
            .unwrap(),
        _ => img.write_to(&mut out, format).unwrap(),
    }
    out.into_inner()
}

pub fn poster(seed: u8, w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([
            seed.wrapping_mul(27),
            (x * 255 / w.max(1)) as u8,
            (y * 255 / h.max(1)) as u8,
            255,
        ])
    })
}
