use super::*;

fn opaque_bbox(img: &RgbaImage) -> (u32, u32) {
    let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
    for (x, y, px) in img.enumerate_pixels() {
        if px[3] > 127 {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
    }
    (x1 - x0 + 1, y1 - y0 + 1)
}

#[test]
fn zero_rotation_is_identity() {
    let img = RgbaImage::from_pixel(7, 3, image::Rgba([1, 2, 3, 255]));
    assert_eq!(rotate_expand(&img, 0.0).unwrap(), img);
    assert_eq!(rotate_expand(&img, 360.0).unwrap(), img);
}

#[test]
fn quarter_turn_swaps_dimensions() {
    assert_eq!(rotated_bounds(40, 20, 90.0), (20, 40));
    assert_eq!(rotated_bounds(40, 20, 180.0), (40, 20));
}

#[test]
fn positive_angles_turn_counter_clockwise() {
    let mut img = RgbaImage::new(20, 20);
    for y in 8..12 {
        for x in 16..20 {
            img.put_pixel(x, y, image::Rgba([255, 0, 0, 255]));
        }
    }
    let out = rotate_expand(&img, 90.0).unwrap();
    assert_eq!(out.dimensions(), (20, 20));
    // A marker on the right edge ends up on the top edge.
    assert_eq!(out.get_pixel(10, 1)[3], 255);
    assert_eq!(out.get_pixel(18, 10)[3], 0);
}

#[test]
fn rotation_round_trip_restores_content_size() {
    let img = RgbaImage::from_pixel(40, 20, image::Rgba([0, 128, 255, 255]));
    let there = rotate_expand(&img, 30.0).unwrap();
    assert!(there.width() > 40 && there.height() > 20);
    let back = rotate_expand(&there, -30.0).unwrap();
    let (bw, bh) = opaque_bbox(&back);
    assert!(bw.abs_diff(40) <= 2, "width {bw}");
    assert!(bh.abs_diff(20) <= 2, "height {bh}");
}

#[test]
fn invalid_inputs_are_rejected() {
    let img = RgbaImage::new(4, 4);
    assert!(rotate_expand(&img, f64::NAN).is_err());
    assert!(rotate_expand(&RgbaImage::new(0, 4), 10.0).is_err());
}
