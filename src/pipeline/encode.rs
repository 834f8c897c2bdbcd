use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CoverError, CoverResult};

pub const JPEG_QUALITY: u8 = 95;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverFormat {
    Jpeg,
    Png,
}

impl CoverFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// A finished cover, ready to upload or write out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedCover {
    pub format: CoverFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Encodes `canvas`. JPEG drops the alpha channel; PNG keeps it.
pub(crate) fn encode(canvas: RgbaImage, format: CoverFormat) -> CoverResult<EncodedCover> {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(CoverError::encode("canvas is empty"));
    }
    let mut bytes = Vec::new();
    match format {
        CoverFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8());
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
            rgb.write_with_encoder(encoder)?;
        }
        CoverFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
            DynamicImage::ImageRgba8(canvas).write_with_encoder(encoder)?;
        }
    }
    tracing::debug!(?format, width, height, len = bytes.len(), "encoded cover");
    Ok(EncodedCover {
        format,
        width,
        height,
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/encode.rs"]
mod tests;
