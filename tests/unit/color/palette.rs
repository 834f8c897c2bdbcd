use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn darken_truncates_and_never_brightens() {
    assert_eq!(darken(Rgb8::new(100, 101, 255), 0.85), Rgb8::new(85, 85, 216));
    for v in [0u8, 1, 37, 128, 254, 255] {
        let c = Rgb8::new(v, v / 2, 255 - v);
        let d = darken(c, 0.65);
        assert!(d.r <= c.r && d.g <= c.g && d.b <= c.b);
    }
}

#[test]
fn lighten_guarantees_minimum_increase_below_the_cap() {
    let out = lighten(Rgb8::new(10, 100, 200), 1.9, 80, 230);
    // 10 -> max(19, 90) = 90; 100 -> max(190, 180) = 190; 200 -> min(255, 230)
    assert_eq!(out, Rgb8::new(90, 190, 230));

    for v in (0..=255u16).step_by(5) {
        let c = Rgb8::new(v as u8, v as u8, v as u8);
        let l = lighten(c, 1.9, 80, 230);
        assert!(l.r <= 230);
        assert!(u16::from(l.r) >= (v + 80).min(230));
    }
}

#[test]
fn hsv_distance_wraps_hue() {
    let red = Rgb8::new(255, 0, 0);
    let magenta_red = Rgb8::new(255, 0, 10);
    assert!(hsv_distance(red, magenta_red) < 0.2);
    assert_eq!(hsv_distance(red, red), 0.0);
    assert!(hsv_distance(red, Rgb8::new(0, 255, 255)) > 2.0);
}

#[test]
fn lightness_predicates() {
    assert!(is_mid_lightness(Rgb8::new(200, 100, 50), 0.3, 0.7));
    assert!(!is_mid_lightness(Rgb8::new(250, 250, 240), 0.3, 0.7));
    assert!(is_mid_luminance(Rgb8::new(128, 128, 128), 80.0, 200.0));
    assert!(!is_mid_luminance(Rgb8::BLACK, 80.0, 200.0));
}

#[test]
fn random_hsl_color_respects_lightness_band() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let c = random_hsl_color(&mut rng, HslBands::default());
        let l = hsl_lightness(c);
        assert!((0.49..=0.81).contains(&l), "lightness {l} for {c:?}");
    }
}

#[test]
fn select_suitable_prefers_first_mid_lightness_candidate() {
    let mut rng = StdRng::seed_from_u64(1);
    let candidates = [Rgb8::new(250, 250, 250), Rgb8::new(180, 90, 40), Rgb8::new(40, 90, 180)];
    let (c, source) = select_suitable_color(&candidates, &mut rng);
    assert_eq!(c, Rgb8::new(180, 90, 40));
    assert_eq!(source, ColorSource::Candidate);
}

#[test]
fn select_suitable_falls_back_to_random() {
    let mut rng = StdRng::seed_from_u64(1);
    let (_, source) = select_suitable_color(&[Rgb8::WHITE, Rgb8::BLACK], &mut rng);
    assert_eq!(source, ColorSource::Random);
    let (_, source) = select_suitable_color(&[], &mut rng);
    assert_eq!(source, ColorSource::Random);
}

#[test]
fn padding_fills_to_target_from_fallbacks() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut colors = Vec::new();
    pad_with_fallbacks(&mut colors, &CARD_STACK_SOFT_COLORS, 6, &mut rng);
    assert_eq!(colors.len(), 6);
    assert!(colors.iter().all(|c| CARD_STACK_SOFT_COLORS.contains(c)));
}

#[test]
fn padding_picks_the_most_distant_fallback() {
    let mut rng = StdRng::seed_from_u64(9);
    let apricot = CARD_STACK_SOFT_COLORS[0];
    let mut colors = vec![apricot];
    pad_with_fallbacks(&mut colors, &CARD_STACK_SOFT_COLORS, 2, &mut rng);
    let expected = CARD_STACK_SOFT_COLORS
        .iter()
        .copied()
        .max_by(|a, b| {
            hsv_distance(*a, apricot)
                .partial_cmp(&hsv_distance(*b, apricot))
                .unwrap()
        })
        .unwrap();
    assert_eq!(colors[1], expected);
}

#[test]
fn random_hsl_color_truncates_channels() {
    // l = 0.7, s = 0.5 puts the max channel at 216.75.
    let bands = HslBands {
        hue: (0.0, 0.0),
        saturation: (0.5, 0.5),
        lightness: (0.7, 0.7),
    };
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(random_hsl_color(&mut rng, bands), Rgb8::new(216, 140, 140));
}
