use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

use crate::foundation::core::{premultiply_buf, unpremultiply_in_place};
use crate::foundation::error::{CoverError, CoverResult};

/// Above this sigma the exact kernel is replaced by three box passes.
const BOX_SIGMA_THRESHOLD: f32 = 4.0;

/// Gaussian blur of a straight-alpha image with standard deviation `radius`.
///
/// Blurring happens in premultiplied space so transparent texels do not bleed color.
#[tracing::instrument(level = "trace", skip(img), fields(w = img.width(), h = img.height()))]
pub fn gaussian_blur(img: &RgbaImage, radius: f32) -> CoverResult<RgbaImage> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(CoverError::validation("blur radius must be finite and >= 0"));
    }
    let (w, h) = img.dimensions();
    if radius == 0.0 || w == 0 || h == 0 {
        return Ok(img.clone());
    }
    let premul = premultiply_buf(img.as_raw());
    let mut out = blur_channels(&premul, w, h, 4, radius)?;
    unpremultiply_in_place(&mut out);
    RgbaImage::from_raw(w, h, out).ok_or_else(|| CoverError::render("blur buffer mismatch"))
}

/// Gaussian blur of a single-channel mask.
pub fn gaussian_blur_gray(mask: &GrayImage, radius: f32) -> CoverResult<GrayImage> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(CoverError::validation("blur radius must be finite and >= 0"));
    }
    let (w, h) = mask.dimensions();
    if radius == 0.0 || w == 0 || h == 0 {
        return Ok(mask.clone());
    }
    let out = blur_channels(mask.as_raw(), w, h, 1, radius)?;
    GrayImage::from_raw(w, h, out).ok_or_else(|| CoverError::render("blur buffer mismatch"))
}

/// Blurs an interleaved 8-bit buffer with `channels` channels per pixel.
pub(crate) fn blur_channels(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    sigma: f32,
) -> CoverResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| CoverError::render("blur buffer size overflow"))?;
    if src.len() != expected_len || channels == 0 {
        return Err(CoverError::render(
            "blur expects src matching width*height*channels",
        ));
    }
    if sigma <= 0.0 {
        return Ok(src.to_vec());
    }

    let (w, h) = (width as usize, height as usize);
    if sigma > BOX_SIGMA_THRESHOLD {
        let sizes = box_sizes(sigma);
        let mut buf = src.to_vec();
        let mut tmp = vec![0u8; expected_len];
        for &size in &sizes {
            box_rows(&buf, &mut tmp, w, channels, size / 2);
            std::mem::swap(&mut buf, &mut tmp);
        }
        let mut cols = transpose(&buf, w, h, channels);
        let mut tmp = vec![0u8; expected_len];
        for &size in &sizes {
            box_rows(&cols, &mut tmp, h, channels, size / 2);
            std::mem::swap(&mut cols, &mut tmp);
        }
        return Ok(transpose(&cols, h, w, channels));
    }

    let radius = (sigma * 3.0).ceil() as u32;
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    kernel_rows(src, &mut tmp, w, channels, &kernel);
    let cols = transpose(&tmp, w, h, channels);
    let mut out_cols = vec![0u8; expected_len];
    kernel_rows(&cols, &mut out_cols, h, channels, &kernel);
    Ok(transpose(&out_cols, h, w, channels))
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CoverResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CoverError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(CoverError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Box widths whose three-pass convolution approximates a gaussian of `sigma`.
fn box_sizes(sigma: f32) -> [usize; 3] {
    let sigma = f64::from(sigma);
    let n = 3.0;
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m_ideal = (12.0 * sigma * sigma - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round() as i64;
    let mut out = [0usize; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = if (i as i64) < m { wl as usize } else { wu as usize };
    }
    out
}

fn kernel_rows(src: &[u8], dst: &mut [u8], width: usize, channels: usize, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let last = width as i64 - 1;
    let stride = width * channels;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(out, row)| {
            let mut acc = vec![0u64; channels];
            for x in 0..width as i64 {
                acc.iter_mut().for_each(|a| *a = 0);
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i64 - radius).clamp(0, last) as usize;
                    let idx = sx * channels;
                    for c in 0..channels {
                        acc[c] += u64::from(kw) * u64::from(row[idx + c]);
                    }
                }
                let o = x as usize * channels;
                for c in 0..channels {
                    out[o + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn box_rows(src: &[u8], dst: &mut [u8], width: usize, channels: usize, radius: usize) {
    let stride = width * channels;
    let size = (2 * radius + 1) as u32;
    let last = width as i64 - 1;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(out, row)| {
            let at = |x: i64, c: usize| u32::from(row[(x.clamp(0, last) as usize) * channels + c]);
            for c in 0..channels {
                let r = radius as i64;
                let mut sum: u32 = (-r..=r).map(|x| at(x, c)).sum();
                for x in 0..width as i64 {
                    out[x as usize * channels + c] = ((sum + size / 2) / size).min(255) as u8;
                    sum += at(x + r + 1, c);
                    sum -= at(x - r, c);
                }
            }
        });
}

fn transpose(src: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(height * channels)
        .enumerate()
        .for_each(|(x, col)| {
            for y in 0..height {
                let s = (y * width + x) * channels;
                col[y * channels..(y + 1) * channels].copy_from_slice(&src[s..s + channels]);
            }
        });
    out
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
