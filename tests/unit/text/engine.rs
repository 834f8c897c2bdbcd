use super::*;
use crate::test_support::test_font;

#[test]
fn font_asset_rejects_bad_input() {
    assert!(FontAsset::from_bytes(Vec::new(), 12.0).is_err());
    assert!(FontAsset::from_bytes(vec![1, 2, 3], 0.0).is_err());
    assert!(FontAsset::from_bytes(vec![1, 2, 3], f32::NAN).is_err());
    let font = FontAsset::from_bytes(vec![1, 2, 3], 12.0).unwrap();
    assert!(font.with_size(-1.0).is_err());
    assert!(FontAsset::load("/definitely/not/here.ttf", 12.0).is_err());
}

#[test]
fn font_identity_follows_bytes_not_size() {
    let a = FontAsset::from_bytes(vec![1, 2, 3], 12.0).unwrap();
    let b = a.with_size(40.0).unwrap();
    let c = FontAsset::from_bytes(vec![1, 2, 4], 12.0).unwrap();
    assert_eq!(a.id(), b.id());
    assert_ne!(a.id(), c.id());
    assert_eq!(b.size_px(), 40.0);
}

#[test]
fn empty_text_measures_zero_without_touching_the_font() {
    let mut renderer = TextRenderer::new();
    let font = FontAsset::from_bytes(vec![0; 8], 12.0).unwrap();
    assert_eq!(renderer.measure("", &font).unwrap(), TextExtent::default());
    assert!(renderer.rasterize("", &font).unwrap().is_none());
}

#[test]
fn garbage_font_bytes_are_a_text_error() {
    let mut renderer = TextRenderer::new();
    let font = FontAsset::from_bytes(vec![0; 64], 12.0).unwrap();
    let err = renderer.measure("abc", &font).unwrap_err();
    assert_eq!(err.reason(), crate::FailureReason::Text);
}

#[test]
fn measure_scales_with_size_and_length() {
    let bytes = test_font();
    let mut renderer = TextRenderer::new();
    let small = FontAsset::from_bytes(bytes, 20.0).unwrap();
    let big = small.with_size(40.0).unwrap();

    let a = renderer.measure("Movies", &small).unwrap();
    let b = renderer.measure("Movies", &big).unwrap();
    let c = renderer.measure("Movies and Shows", &small).unwrap();
    assert!(a.width > 0.0 && a.height > 0.0);
    assert!(b.width > a.width * 1.8 && b.width < a.width * 2.2);
    assert!(c.width > a.width);
}

#[test]
fn rasterized_glyphs_have_ink() {
    let bytes = test_font();
    let mut renderer = TextRenderer::new();
    let font = FontAsset::from_bytes(bytes, 32.0).unwrap();
    let mask = renderer.rasterize("Hi", &font).unwrap().unwrap();
    assert!(mask.coverage.pixels().any(|p| p[0] == 255));
    // Padding rows stay clear.
    assert!((0..mask.coverage.width()).all(|x| mask.coverage.get_pixel(x, 0)[0] == 0));
}
