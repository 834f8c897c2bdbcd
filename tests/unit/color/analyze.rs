use super::*;

fn solid(w: u32, h: u32, c: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([c[0], c[1], c[2], 255]))
}

#[test]
fn gray_image_yields_no_colors() {
    let img = solid(64, 48, [128, 128, 128]);
    for mode in [ExtractMode::Vibrant, ExtractMode::Macaron] {
        assert!(ColorAnalyzer::new(mode).extract_dominant_colors(&img, 5).is_empty());
    }
}

#[test]
fn near_black_and_white_are_not_chromatic() {
    assert!(!is_chromatic(Rgb8::new(5, 10, 19)));
    assert!(!is_chromatic(Rgb8::new(240, 250, 236)));
    assert!(!is_chromatic(Rgb8::new(100, 105, 109)));
    assert!(is_chromatic(Rgb8::new(200, 40, 40)));
}

#[test]
fn extraction_respects_max_and_band() {
    let mut img = RgbaImage::new(120, 40);
    let stripes = [[220u8, 30, 30], [30, 200, 40], [30, 60, 220], [230, 200, 20]];
    for (x, _, px) in img.enumerate_pixels_mut() {
        let c = stripes[(x / 30) as usize];
        *px = image::Rgba([c[0], c[1], c[2], 255]);
    }
    for mode in [ExtractMode::Vibrant, ExtractMode::Macaron] {
        let analyzer = ColorAnalyzer::new(mode);
        let colors = analyzer.extract_dominant_colors(&img, 3);
        assert!(!colors.is_empty());
        assert!(colors.len() <= 3);
        for c in &colors {
            assert!(mode.range().contains(*c), "{c:?} outside band for {mode:?}");
        }
    }
}

#[test]
fn vibrant_skips_similar_hues() {
    let mut img = RgbaImage::new(60, 20);
    for (x, _, px) in img.enumerate_pixels_mut() {
        *px = if x < 30 {
            image::Rgba([200, 40, 40, 255])
        } else {
            image::Rgba([205, 50, 45, 255])
        };
    }
    let colors = ColorAnalyzer::new(ExtractMode::Vibrant).extract_dominant_colors(&img, 5);
    assert_eq!(colors.len(), 1);
}

fn assert_in_band(range: &MacaronRange, from: Rgb8, c: Rgb8) {
    const EPS: f64 = 1e-9;
    let (_, s, v) = rgb_to_hsv(c);
    assert!(
        s >= range.saturation.0 - EPS && s <= range.saturation.1 + EPS,
        "{from:?} -> {c:?}: saturation {s} outside {:?}",
        range.saturation
    );
    assert!(
        v >= range.value.0 - EPS && v <= range.value.1 + EPS,
        "{from:?} -> {c:?}: value {v} outside {:?}",
        range.value
    );
}

#[test]
fn macaron_adjust_is_idempotent_and_in_band() {
    for mode in [ExtractMode::Vibrant, ExtractMode::Macaron] {
        let range = mode.range();
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(17) {
                    let c = Rgb8::new(r as u8, g as u8, b as u8);
                    let once = range.adjust(c);
                    assert_eq!(range.adjust(once), once, "{c:?}");
                    assert_in_band(&range, c, once);
                }
            }
        }
    }
}

#[test]
fn thumbnail_keeps_aspect_within_box() {
    let img = solid(300, 150, [10, 200, 30]);
    let t = thumbnail(&img, 100);
    assert_eq!(t.dimensions(), (100, 50));
    let small = solid(20, 10, [10, 200, 30]);
    assert_eq!(thumbnail(&small, 100).dimensions(), (20, 10));
}

#[test]
fn frequency_ties_keep_first_seen_order() {
    let a = Rgb8::new(1, 0, 0);
    let b = Rgb8::new(2, 0, 0);
    let c = Rgb8::new(3, 0, 0);
    let ranked = rank_by_frequency([b, a, c, a, b, c, c], 2);
    assert_eq!(ranked, vec![c, b]);
}

#[test]
fn poster_primary_colors_skip_extremes() {
    let poster = RgbaImage::from_fn(50, 60, |x, _| {
        if x < 35 {
            image::Rgba([250, 250, 250, 255])
        } else {
            image::Rgba([120, 80, 60, 255])
        }
    });
    let colors = poster_primary_colors(&poster);
    assert!(!colors.is_empty());
    assert!(colors.iter().all(|c| (30.0..=220.0).contains(&c.brightness())));
}

#[test]
fn poster_primary_colors_fall_back_to_any_visible_pixel() {
    let poster = RgbaImage::from_pixel(20, 30, image::Rgba([5, 5, 5, 255]));
    assert_eq!(poster_primary_colors(&poster), vec![Rgb8::new(5, 5, 5)]);
    let clear = RgbaImage::new(20, 30);
    assert!(poster_primary_colors(&clear).is_empty());
}

#[test]
fn analyzer_adjusts_into_its_own_band() {
    let analyzer = ColorAnalyzer::new(ExtractMode::Macaron);
    let vivid = Rgb8::new(255, 0, 0);
    let soft = analyzer.adjust_to_macaron(vivid);
    assert_ne!(soft, vivid);
    assert_eq!(soft, ExtractMode::Macaron.range().adjust(vivid));
    assert_eq!(analyzer.adjust_to_macaron(soft), soft);
}

#[test]
fn colors_just_outside_the_band_are_still_clamped() {
    let range = ExtractMode::Vibrant.range();
    // v = 219/255 = 0.8588, above the 0.85 ceiling.
    let c = Rgb8::new(219, 100, 100);
    let adjusted = range.adjust(c);
    assert_ne!(adjusted, c);
    assert_eq!(adjusted, Rgb8::new(216, 99, 99));
    assert_in_band(&range, c, adjusted);
    assert!(!range.contains(c));
    assert!(range.contains(adjusted));
}

#[test]
fn adjust_stays_in_band_over_the_full_grid() {
    for mode in [ExtractMode::Vibrant, ExtractMode::Macaron] {
        let range = mode.range();
        for r in (0..=255u16).step_by(3) {
            for g in (0..=255u16).step_by(5) {
                for b in (0..=255u16).step_by(7) {
                    let c = Rgb8::new(r as u8, g as u8, b as u8);
                    let once = range.adjust(c);
                    assert_in_band(&range, c, once);
                    assert_eq!(range.adjust(once), once, "{c:?}");
                }
            }
        }
    }
}
