use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::foundation::error::FailureReason;

#[test]
fn takes_first_nine_sorted() {
    let mut rng = StdRng::seed_from_u64(1);
    let sources: Vec<String> = (0..12).rev().map(|i| format!("img{i:02}.png")).collect();
    let slots = prepare_poster_slots(&sources, &mut rng).unwrap();
    assert_eq!(slots.len(), 9);
    assert_eq!(slots[0], "img00.png");
    assert_eq!(slots[8], "img08.png");
}

#[test]
fn pads_short_sets_with_repeats() {
    let mut rng = StdRng::seed_from_u64(7);
    let sources = vec!["b", "a", "c"];
    let slots = prepare_poster_slots(&sources, &mut rng).unwrap();
    assert_eq!(slots.len(), 9);
    assert_eq!(&slots[..3], &["a", "b", "c"]);
    assert!(slots[3..].iter().all(|s| sources.contains(s)));
}

#[test]
fn empty_source_set_is_input_error() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = prepare_poster_slots::<u8, _>(&[], &mut rng).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Input);
}

#[test]
fn columns_follow_visual_order() {
    let cols = arrange_columns((1..=9).collect::<Vec<u32>>()).unwrap();
    assert_eq!(cols[0], vec![3, 1, 5]);
    assert_eq!(cols[1], vec![4, 2, 6]);
    assert_eq!(cols[2], vec![9, 8, 7]);
}

#[test]
fn columns_need_exactly_nine() {
    let err = arrange_columns(vec![1u8; 8]).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Input);
    assert!(arrange_columns(vec![1u8; 10]).is_err());
}

#[test]
fn slot_and_source_names() {
    assert!(is_slot_file_name("1.jpg"));
    assert!(is_slot_file_name("9.JPG"));
    assert!(!is_slot_file_name("10.jpg"));
    assert!(!is_slot_file_name("0.jpg"));
    assert!(!is_slot_file_name("1.png"));

    assert!(is_source_image_name("poster.webp"));
    assert!(is_source_image_name("1.png"));
    assert!(!is_source_image_name("1.jpg"));
    assert!(!is_source_image_name("notes.txt"));
}
