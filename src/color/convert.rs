//! HSV / HLS conversions on unit floats, matching the usual hexcone formulas.

use crate::foundation::core::Rgb8;

fn hue_of(r: f64, g: f64, b: f64, maxc: f64, rangec: f64) -> f64 {
    let rc = (maxc - r) / rangec;
    let gc = (maxc - g) / rangec;
    let bc = (maxc - b) / rangec;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    (h / 6.0).rem_euclid(1.0)
}

/// `(h, s, v)`, all in `0.0..=1.0`.
pub fn rgb_to_hsv(c: Rgb8) -> (f64, f64, f64) {
    let [r, g, b] = c.to_unit();
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    if maxc == minc {
        return (0.0, 0.0, maxc);
    }
    let rangec = maxc - minc;
    (hue_of(r, g, b, maxc, rangec), rangec / maxc, maxc)
}

/// Inverse of [`rgb_to_hsv`]; channels are rounded to the nearest integer.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb8 {
    let (r, g, b) = hsv_to_unit(h, s, v);
    unit_to_rgb(r, g, b)
}

fn hsv_to_unit(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h6 = h.rem_euclid(1.0) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// `(h, l, s)`, all in `0.0..=1.0`.
pub fn rgb_to_hls(c: Rgb8) -> (f64, f64, f64) {
    let [r, g, b] = c.to_unit();
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let sumc = maxc + minc;
    let l = sumc / 2.0;
    if maxc == minc {
        return (0.0, l, 0.0);
    }
    let rangec = maxc - minc;
    let s = if l <= 0.5 {
        rangec / sumc
    } else {
        rangec / (2.0 - sumc)
    };
    (hue_of(r, g, b, maxc, rangec), l, s)
}

/// Inverse of [`rgb_to_hls`]; channels are rounded to the nearest integer.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> Rgb8 {
    let (r, g, b) = hls_to_unit(h, l, s);
    unit_to_rgb(r, g, b)
}

/// [`hls_to_rgb`] before quantization.
pub(crate) fn hls_to_unit(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hls_channel(m1, m2, h + 1.0 / 3.0),
        hls_channel(m1, m2, h),
        hls_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hls_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

fn unit_to_rgb(r: f64, g: f64, b: f64) -> Rgb8 {
    let q = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb8::new(q(r), q(g), q(b))
}

#[cfg(test)]
#[path = "../../tests/unit/color/convert.rs"]
mod tests;
