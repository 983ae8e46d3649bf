mod common;

use common::{create_test_dir, list_names, read_file, write_file, FakeSource};
use eeprom_sync::{fetch_entry, FetchError};

#[tokio::test]
async fn test_fetch_entry_creates_file() {
    let temp_dir = create_test_dir();
    let dir = temp_dir.path();

    let source = FakeSource::new().with_file("recovery.bin", b"recovery image");
    let entry = source.entry("recovery.bin");

    let path = fetch_entry(&source, &entry, dir)
        .await
        .expect("Should fetch");

    assert_eq!(path, dir.join("recovery.bin"));
    assert_eq!(read_file(dir, "recovery.bin").await, b"recovery image");
    assert_eq!(list_names(dir), vec!["recovery.bin"]);
}

#[tokio::test]
async fn test_fetch_entry_replaces_existing_file() {
    let temp_dir = create_test_dir();
    let dir = temp_dir.path();
    write_file(dir, "pieeprom.bin", b"a much longer previous image").await;

    let source = FakeSource::new().with_file("pieeprom.bin", b"short");
    let entry = source.entry("pieeprom.bin");

    fetch_entry(&source, &entry, dir)
        .await
        .expect("Should fetch");

    assert_eq!(read_file(dir, "pieeprom.bin").await, b"short");
    assert_eq!(list_names(dir), vec!["pieeprom.bin"]);
}

#[tokio::test]
async fn test_fetch_entry_rejects_hash_mismatch() {
    let temp_dir = create_test_dir();
    let dir = temp_dir.path();
    write_file(dir, "pieeprom.bin", b"previous").await;

    let source = FakeSource::new().with_file("pieeprom.bin", b"served bytes");
    let mut entry = source.entry("pieeprom.bin");
    entry.sha = "0000000000000000000000000000000000000000".to_string();

    let result = fetch_entry(&source, &entry, dir).await;

    assert!(matches!(result, Err(FetchError::HashMismatch { .. })));
    assert_eq!(read_file(dir, "pieeprom.bin").await, b"previous");
    assert_eq!(list_names(dir), vec!["pieeprom.bin"]);
}

#[tokio::test]
async fn test_fetch_entry_rejects_short_download() {
    let temp_dir = create_test_dir();
    let dir = temp_dir.path();

    let source = FakeSource::new()
        .with_file("vl805.bin", b"0123456789")
        .truncating("vl805.bin");
    let entry = source.entry("vl805.bin");

    let result = fetch_entry(&source, &entry, dir).await;

    assert!(matches!(
        result,
        Err(FetchError::SizeMismatch {
            expected: 10,
            actual: 5
        })
    ));
    assert!(list_names(dir).is_empty());
}

#[tokio::test]
async fn test_fetch_entry_rejects_path_traversal() {
    let temp_dir = create_test_dir();
    let dir = temp_dir.path().join("firmware");
    tokio::fs::create_dir(&dir).await.unwrap();

    let source = FakeSource::new().with_file("escape.bin", b"payload");
    let mut entry = source.entry("escape.bin");
    entry.name = "../escape.bin".to_string();

    let result = fetch_entry(&source, &entry, &dir).await;

    assert!(matches!(result, Err(FetchError::InvalidName(_))));
    assert!(source.downloads().is_empty());
    assert_eq!(list_names(temp_dir.path()), vec!["firmware"]);
}
