use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(CoverError::input("x").to_string().contains("input error:"));
    assert!(CoverError::render("x").to_string().contains("render error:"));
    assert!(CoverError::text("x").to_string().contains("text error:"));
    assert!(CoverError::encode("x").to_string().contains("encode error:"));
    assert!(
        CoverError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CoverError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.reason(), FailureReason::Other);
}

#[test]
fn stage_wrapper_keeps_reason_and_innermost_stage() {
    let inner = CoverError::stage("build_columns", CoverError::input("no posters"));
    let outer = CoverError::stage("compose", inner);
    assert_eq!(outer.reason(), FailureReason::Input);
    assert_eq!(outer.stage_name(), Some("build_columns"));
    assert!(outer.to_string().contains("build_columns"));
    assert!(outer.to_string().contains("no posters"));
}

#[test]
fn reason_display_is_lowercase() {
    assert_eq!(FailureReason::Encode.to_string(), "encode");
    assert_eq!(FailureReason::Validation.to_string(), "validation");
}

#[test]
fn image_decode_errors_map_to_input() {
    let err = image::load_from_memory(b"definitely not an image").unwrap_err();
    let err = CoverError::from(err);
    assert_eq!(err.reason(), FailureReason::Input);
}
