use std::fs;
use std::path::Path;
use urlgrab::storage::{output_path, prepare_destination, sanitize_filename};

// ===========================================================================================
// sanitize_filename Tests
// ===========================================================================================

#[test]
fn test_sanitize_never_contains_separator() {
    let urls = [
        "https://example.com/a",
        "http://example.com/a/b/c/",
        "example.com//double//slash",
        "ftp://files.example.com/pub/archive.tar.gz",
        "/",
        "https://example.com/search?q=a/b&page=2",
        "https://пример.рф/путь/к/странице",
    ];
    for url in urls {
        let name = sanitize_filename(url);
        assert!(!name.contains('/'), "{} produced {}", url, name);
        assert!(!name.is_empty());
    }
}

#[test]
fn test_sanitize_is_deterministic() {
    let url = "https://example.com/a/b?c=d";
    let first = sanitize_filename(url);
    for _ in 0..100 {
        assert_eq!(sanitize_filename(url), first);
    }
}

#[test]
fn test_sanitize_drops_scheme() {
    assert_eq!(sanitize_filename("https://example.com/a"), "example.com_a");
    assert_eq!(sanitize_filename("http://example.com/a"), "example.com_a");
}

#[test]
fn test_sanitize_keeps_other_characters() {
    assert_eq!(
        sanitize_filename("https://example.com/a?b=c&d=e"),
        "example.com_a?b=c&d=e"
    );
    assert_eq!(
        sanitize_filename("http://127.0.0.1:8080/x"),
        "127.0.0.1:8080_x"
    );
}

#[test]
fn test_sanitize_collisions_are_not_resolved() {
    // Known limitation: the mapping is not injective.
    assert_eq!(
        sanitize_filename("https://example.com/a_b"),
        sanitize_filename("http://example.com/a/b")
    );
}

#[test]
fn test_output_path_appends_html() {
    let path = output_path(Path::new("/tmp/out"), "https://example.com/a");
    assert_eq!(path, Path::new("/tmp/out/example.com_a.html"));
}

// ===========================================================================================
// prepare_destination Tests
// ===========================================================================================

#[test]
fn test_prepare_destination_creates_parents() {
    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("a").join("b").join("c");

    let created = prepare_destination(&target).expect("should create nested directories");

    assert_eq!(created, target);
    assert!(target.is_dir());
}

#[test]
fn test_prepare_destination_keeps_existing_content() {
    let tmp = tempfile::tempdir().unwrap();
    let existing = tmp.path().join("unrelated.txt");
    fs::write(&existing, "keep me").unwrap();

    prepare_destination(tmp.path()).expect("existing directory is fine");
    prepare_destination(tmp.path()).expect("and idempotent");

    assert_eq!(fs::read_to_string(existing).unwrap(), "keep me");
}

#[test]
fn test_prepare_destination_rejects_file() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let result = prepare_destination(tmp.path());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not a directory"));
}
