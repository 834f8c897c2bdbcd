use super::*;

#[test]
fn hsv_of_primaries() {
    assert_eq!(rgb_to_hsv(Rgb8::new(255, 0, 0)), (0.0, 1.0, 1.0));
    let (h, s, v) = rgb_to_hsv(Rgb8::new(0, 255, 0));
    assert!((h - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!((s, v), (1.0, 1.0));
    assert_eq!(rgb_to_hsv(Rgb8::new(51, 51, 51)), (0.0, 0.0, 0.2));
}

#[test]
fn hsv_roundtrip_is_exact_on_a_grid() {
    for r in (0..=255u16).step_by(15) {
        for g in (0..=255u16).step_by(17) {
            for b in (0..=255u16).step_by(51) {
                let c = Rgb8::new(r as u8, g as u8, b as u8);
                let (h, s, v) = rgb_to_hsv(c);
                assert_eq!(hsv_to_rgb(h, s, v), c);
            }
        }
    }
}

#[test]
fn hls_roundtrip_is_exact_on_a_grid() {
    for r in (0..=255u16).step_by(15) {
        for g in (0..=255u16).step_by(51) {
            for b in (0..=255u16).step_by(17) {
                let c = Rgb8::new(r as u8, g as u8, b as u8);
                let (h, l, s) = rgb_to_hls(c);
                assert_eq!(hls_to_rgb(h, l, s), c);
            }
        }
    }
}

#[test]
fn hls_lightness_of_gray_and_white() {
    assert_eq!(rgb_to_hls(Rgb8::WHITE).1, 1.0);
    assert_eq!(rgb_to_hls(Rgb8::BLACK).1, 0.0);
    let (_, l, s) = rgb_to_hls(Rgb8::new(255, 0, 0));
    assert!((l - 0.5).abs() < 1e-9);
    assert!((s - 1.0).abs() < 1e-9);
}
