use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn zero_intensity_is_identity() {
    let mut img = RgbaImage::from_pixel(8, 8, image::Rgba([100, 110, 120, 200]));
    let before = img.clone();
    add_film_grain(&mut img, 0.0, &mut StdRng::seed_from_u64(1));
    assert_eq!(img, before);
}

#[test]
fn grain_touches_color_but_never_alpha() {
    let mut img = RgbaImage::from_pixel(32, 32, image::Rgba([128, 128, 128, 77]));
    add_film_grain(&mut img, 0.05, &mut StdRng::seed_from_u64(7));
    assert!(img.pixels().all(|p| p[3] == 77));
    assert!(img.pixels().any(|p| p[0] != 128));
}

#[test]
fn same_seed_same_grain() {
    let base = RgbaImage::from_pixel(16, 16, image::Rgba([90, 60, 30, 255]));
    let mut a = base.clone();
    let mut b = base.clone();
    add_film_grain(&mut a, 0.03, &mut StdRng::seed_from_u64(42));
    add_film_grain(&mut b, 0.03, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn noise_statistics_match_intensity() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut normal = NormalSampler::new();
    let n = 20_000;
    let samples: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    let mean = samples.iter().sum::<f64>() / n as f64;
    let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n as f64;
    assert!(mean.abs() < 0.05, "mean {mean}");
    assert!((var.sqrt() - 1.0).abs() < 0.05, "sd {}", var.sqrt());
}
