use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let img = RgbaImage::from_raw(1, 2, vec![1u8, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(gaussian_blur(&img, 0.0).unwrap(), img);
}

#[test]
fn blur_constant_image_is_identity() {
    let img = RgbaImage::from_pixel(9, 7, image::Rgba([10, 20, 30, 255]));
    assert_eq!(gaussian_blur(&img, 2.0).unwrap(), img);
    assert_eq!(gaussian_blur(&img, 50.0).unwrap(), img);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(2 * w + 2) as usize] = 255;

    let out = blur_channels(&src, w, h, 1, 0.8).unwrap();

    assert!(out.iter().filter(|&&v| v != 0).count() > 1);
    let sum: u32 = out.iter().map(|&v| u32::from(v)).sum();
    assert!((sum as i32 - 255).abs() <= 8);
}

#[test]
fn box_path_keeps_mass_and_smooths_edges() {
    let mut mask = GrayImage::new(64, 16);
    for y in 0..16 {
        for x in 32..64 {
            mask.put_pixel(x, y, image::Luma([255]));
        }
    }
    let out = gaussian_blur_gray(&mask, 8.0).unwrap();
    let row: Vec<u8> = (0..64).map(|x| out.get_pixel(x, 8)[0]).collect();
    assert!(row.windows(2).all(|p| p[0] <= p[1]), "{row:?}");
    assert!(row[0] < 10);
    assert!(row[63] > 245);
    assert!(row[31] > 64 && row[31] < 192);
}

#[test]
fn box_sizes_are_odd_and_near_sigma() {
    for sigma in [5.0f32, 12.0, 50.0] {
        let sizes = box_sizes(sigma);
        assert!(sizes.iter().all(|s| s % 2 == 1));
        let var: f64 = sizes.iter().map(|&s| ((s * s) as f64 - 1.0) / 12.0).sum();
        assert!((var.sqrt() - f64::from(sigma)).abs() < 1.0);
    }
}

#[test]
fn transparent_pixels_do_not_bleed_color() {
    let mut img = RgbaImage::new(8, 8);
    for y in 0..8 {
        for x in 0..4 {
            img.put_pixel(x, y, image::Rgba([255, 0, 0, 255]));
        }
        for x in 4..8 {
            img.put_pixel(x, y, image::Rgba([0, 255, 0, 0]));
        }
    }
    let out = gaussian_blur(&img, 1.5).unwrap();
    let edge = out.get_pixel(4, 4);
    assert!(edge[3] > 0 && edge[3] < 255);
    assert!(edge[1] < 8, "green leaked: {edge:?}");
    assert!(edge[0] > 240);
}

#[test]
fn negative_or_nan_radius_is_rejected() {
    let img = RgbaImage::new(2, 2);
    assert!(gaussian_blur(&img, -1.0).is_err());
    assert!(gaussian_blur(&img, f32::NAN).is_err());
}
