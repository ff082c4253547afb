//! Filesystem backend behavior against a real temporary directory.

use midibox_db::{Error, FilesystemBackend, StorageBackend};
use tempfile::TempDir;

#[tokio::test]
async fn test_write_then_read_returns_same_bytes() {
    let dir = TempDir::new().unwrap();
    let backend = FilesystemBackend::new(dir.path());

    let data = b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60".to_vec();
    backend.write("song1.mid", &data).await.unwrap();

    assert!(backend.exists("song1.mid").await.unwrap());
    assert_eq!(backend.read("song1.mid").await.unwrap(), data);
    assert!(dir.path().join("song1.mid").is_file());
}

#[tokio::test]
async fn test_second_write_overwrites_first() {
    let dir = TempDir::new().unwrap();
    let backend = FilesystemBackend::new(dir.path());

    backend.write("dup.mid", b"first").await.unwrap();
    backend.write("dup.mid", b"second upload").await.unwrap();

    assert_eq!(backend.read("dup.mid").await.unwrap(), b"second upload");
}

#[tokio::test]
async fn test_write_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let backend = FilesystemBackend::new(dir.path());

    backend.write("a.mid", b"a").await.unwrap();
    backend.write("b.mid", b"b").await.unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.mid".to_string(), "b.mid".to_string()]);
}

#[tokio::test]
async fn test_failed_rename_removes_temp_file() {
    let dir = TempDir::new().unwrap();
    let backend = FilesystemBackend::new(dir.path());

    // A directory squatting on the target name makes the final rename fail.
    std::fs::create_dir(dir.path().join("x.mid")).unwrap();

    let result = backend.write("x.mid", b"MThd").await;
    assert!(matches!(result, Err(Error::Io(_))));

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["x.mid".to_string()]);
    assert!(dir.path().join("x.mid").is_dir());
}

#[tokio::test]
async fn test_missing_file_does_not_exist() {
    let dir = TempDir::new().unwrap();
    let backend = FilesystemBackend::new(dir.path());

    assert!(!backend.exists("nothing.mid").await.unwrap());
    assert!(matches!(
        backend.read("nothing.mid").await,
        Err(Error::Io(_))
    ));
}

#[tokio::test]
async fn test_traversal_names_never_touch_disk() {
    let outer = TempDir::new().unwrap();
    let content = outer.path().join("uploads");
    let backend = FilesystemBackend::new(&content);
    backend.ensure_dir().await.unwrap();

    let result = backend.write("../escaped.mid", b"evil").await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(!outer.path().join("escaped.mid").exists());
}

#[tokio::test]
async fn test_ensure_dir_creates_nested_directory() {
    let outer = TempDir::new().unwrap();
    let content = outer.path().join("var").join("uploads");
    let backend = FilesystemBackend::new(&content);

    backend.ensure_dir().await.unwrap();
    assert!(content.is_dir());

    // Idempotent
    backend.ensure_dir().await.unwrap();
    assert!(backend.validate().await.is_ok());
    assert!(!content.join(".health-check").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_written_files_are_not_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let backend = FilesystemBackend::new(dir.path());
    backend.write("perm.mid", b"x").await.unwrap();

    let mode = std::fs::metadata(dir.path().join("perm.mid"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o644);
}
