use super::*;
use crate::foundation::error::FailureReason;

#[test]
fn resolves_exact_library_name() {
    let map = TitleMap::from_json(r#"{"电影": ["电影", "Movies"], "Anime": ["动漫", "Anime", "extra"]}"#)
        .unwrap();
    assert_eq!(map.len(), 2);
    let t = map.resolve("电影");
    assert_eq!(t.localized(), Some("电影"));
    assert_eq!(t.latin(), Some("Movies"));
    assert_eq!(map.resolve("Anime").latin(), Some("Anime"));
}

#[test]
fn missing_library_resolves_to_empty_title() {
    let map = TitleMap::from_json(r#"{"Movies": ["电影", "Movies"]}"#).unwrap();
    let t = map.resolve("movies");
    assert_eq!(t, Title::default());
}

#[test]
fn short_entry_is_rejected() {
    let err = TitleMap::from_json(r#"{"Movies": ["电影"]}"#).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Validation);
    assert!(err.to_string().contains("Movies"));
}

#[test]
fn non_list_entry_is_rejected() {
    let err = TitleMap::from_json(r#"{"Movies": "电影"}"#).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Validation);
}

#[test]
fn serializes_back_to_pairs() {
    let mut map = TitleMap::default();
    map.insert("TV", "剧集", "TV Shows");
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"TV":["剧集","TV Shows"]}"#);
}
