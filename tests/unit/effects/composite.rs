use super::*;

#[test]
fn over_opaque_source_replaces_destination() {
    assert_eq!(over([10, 20, 30, 255], [1, 2, 3, 255], 1.0), [1, 2, 3, 255]);
}

#[test]
fn over_zero_opacity_keeps_destination() {
    assert_eq!(over([10, 20, 30, 255], [1, 2, 3, 255], 0.0), [10, 20, 30, 255]);
}

#[test]
fn straight_over_half_alpha_mixes() {
    let out = over_straight(Rgba8::new(0, 0, 0, 255), Rgba8::new(255, 255, 255, 128));
    assert_eq!(out.a, 255);
    assert!(out.r.abs_diff(128) <= 1);
}

#[test]
fn overlay_at_clips_negative_offsets() {
    let mut base = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
    let overlay = RgbaImage::from_pixel(3, 3, image::Rgba([255, 0, 0, 255]));
    overlay_at(&mut base, &overlay, -2, -2);
    assert_eq!(base.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(base.get_pixel(1, 1).0, [0, 0, 0, 255]);
    overlay_at(&mut base, &overlay, 10, 10);
    assert_eq!(base.get_pixel(3, 3).0, [0, 0, 0, 255]);
}

#[test]
fn alpha_composite_rejects_size_mismatch() {
    let mut base = RgbaImage::new(4, 4);
    assert!(alpha_composite(&mut base, &RgbaImage::new(3, 4)).is_err());
}

#[test]
fn blend_weights_follow_color_share() {
    let img = RgbaImage::from_pixel(2, 2, image::Rgba([100, 100, 100, 255]));
    let out = blend_with_color(&img, Rgb8::new(200, 0, 100), 0.8);
    assert_eq!(out.get_pixel(0, 0).0, [180, 20, 100, 255]);
}

#[test]
fn select_by_mask_picks_a_where_mask_is_full() {
    let a = RgbaImage::from_pixel(2, 1, image::Rgba([255, 255, 255, 255]));
    let b = RgbaImage::from_pixel(2, 1, image::Rgba([0, 0, 0, 255]));
    let mask = GrayImage::from_raw(2, 1, vec![255, 0]).unwrap();
    let out = select_by_mask(&a, &b, &mask).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 255]);
}

#[test]
fn fill_through_mask_tints_only_masked_pixels() {
    let mut img = RgbaImage::from_pixel(2, 1, image::Rgba([200, 200, 200, 255]));
    let mask = GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
    fill_through_mask(&mut img, Rgb8::new(10, 20, 30), &mask).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [200, 200, 200, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 255]);
}

#[test]
fn fill_rect_covers_fractional_bounds() {
    let mut img = RgbaImage::new(10, 10);
    fill_rect(&mut img, 2.4, 3.0, 1.2, 2.0, Rgba8::new(9, 9, 9, 255));
    assert_eq!(img.get_pixel(2, 3).0, [9, 9, 9, 255]);
    assert_eq!(img.get_pixel(3, 4).0, [9, 9, 9, 255]);
    assert_eq!(img.get_pixel(4, 3)[3], 0);
    assert_eq!(img.get_pixel(2, 5)[3], 0);
}
