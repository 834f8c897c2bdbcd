use super::*;

#[test]
fn rounded_mask_clears_corners_and_keeps_center() {
    let mask = rounded_rect_mask(100, 80, 20.0).unwrap();
    assert_eq!(mask.dimensions(), (100, 80));
    assert_eq!(mask.get_pixel(0, 0)[0], 0);
    assert_eq!(mask.get_pixel(99, 79)[0], 0);
    assert_eq!(mask.get_pixel(50, 40)[0], 255);
    assert_eq!(mask.get_pixel(50, 0)[0], 255);
}

#[test]
fn polygon_mask_fills_inside_only() {
    let mask = polygon_mask(40, 40, &[(0.0, 0.0), (40.0, 0.0), (0.0, 40.0)]).unwrap();
    assert_eq!(mask.get_pixel(2, 2)[0], 255);
    assert_eq!(mask.get_pixel(37, 37)[0], 0);
}

#[test]
fn empty_or_oversized_surfaces_are_rejected() {
    assert!(rounded_rect_mask(0, 10, 2.0).is_err());
    assert!(surface_dims(70_000, 10).is_err());
}

#[test]
fn round_corners_makes_corners_transparent() {
    let img = RgbaImage::from_pixel(60, 60, image::Rgba([10, 20, 30, 255]));
    let out = round_corners(&img, 15.0).unwrap();
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(30, 30).0, [10, 20, 30, 255]);
}

#[test]
fn alpha_mask_size_mismatch_is_an_error() {
    let mut img = RgbaImage::new(4, 4);
    let mask = GrayImage::new(3, 4);
    assert!(apply_alpha_mask(&mut img, &mask).is_err());
}
