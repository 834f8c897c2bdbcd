use super::*;

const SPLIT: DiagonalSplit = DiagonalSplit {
    top: 0.55,
    bottom: 0.4,
};

#[test]
fn split_mask_is_binary_and_sided() {
    let mask = diagonal_split_mask(1280, 720, SPLIT).unwrap();
    assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == 255));
    assert_eq!(mask.get_pixel(0, 0)[0], 255);
    assert_eq!(mask.get_pixel(1279, 0)[0], 0);
    assert_eq!(mask.get_pixel(0, 719)[0], 255);
    assert_eq!(mask.get_pixel(1279, 719)[0], 0);
}

#[test]
fn split_line_follows_the_slant() {
    let mask = diagonal_split_mask(1280, 720, SPLIT).unwrap();
    let top_x = (1280.0f64 * 0.55) as u32;
    let bottom_x = (1280.0f64 * 0.4) as u32;
    assert_eq!(mask.get_pixel(top_x - 2, 0)[0], 255);
    assert_eq!(mask.get_pixel(top_x + 1, 0)[0], 0);
    assert_eq!(mask.get_pixel(bottom_x - 2, 719)[0], 255);
    assert_eq!(mask.get_pixel(bottom_x + 1, 719)[0], 0);
}

#[test]
fn shadow_band_peaks_near_the_line() {
    let mask = diagonal_shadow_mask(1280, 720, SPLIT, 30).unwrap();
    // At mid height the 10px band spans x = 603..613 before blurring.
    let row: Vec<u8> = (0..1280).map(|x| mask.get_pixel(x, 360)[0]).collect();
    let peak = row.iter().enumerate().max_by_key(|(_, v)| **v).map(|(x, _)| x).unwrap();
    assert!((600..=616).contains(&peak), "peak at {peak}");
    assert!(row[608] > 60);
    assert_eq!(row[0], 0);
    assert_eq!(row[1279], 0);
    assert!(mask.get_pixel(704, 0)[0] > 0);
}

#[test]
fn out_of_range_split_is_rejected() {
    let bad = DiagonalSplit {
        top: 1.5,
        bottom: 0.4,
    };
    assert!(diagonal_split_mask(10, 10, bad).is_err());
    assert!(diagonal_shadow_mask(10, 10, bad, 30).is_err());
}
