use super::*;

use std::fs;
use std::path::PathBuf;

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("autolog-writer-{}-{}.log", tag, std::process::id()))
}

#[test]
fn test_plain_file_write() {
    let path = temp_path("plain");
    let name = path.to_str().unwrap();

    let writer = RotatingLogWriter::new(name, false).unwrap();
    assert_eq!(writer.name().as_deref(), Some(name));
    (&writer).write_all(b"hello\n").unwrap();
    (&writer).write_all(b"world\n").unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "hello\nworld\n");
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_pattern_expansion() {
    let dir = std::env::temp_dir();
    let pattern = format!("{}/autolog-writer-pattern-{}-%Y.log", dir.display(), std::process::id());

    let writer = RotatingLogWriter::new(&pattern, true).unwrap();
    let name = writer.name().unwrap();
    assert!(!name.contains('%'), "{name:?}");
    assert!(name.contains(&chrono::Local::now().format("%Y").to_string()), "{name:?}");
    writer.close().unwrap();

    fs::remove_file(&name).unwrap();
}

#[test]
fn test_rotate_reopens_file() {
    let path = temp_path("rotate");
    let name = path.to_str().unwrap();

    let writer = RotatingLogWriter::new(name, false).unwrap();
    (&writer).write_all(b"before\n").unwrap();

    // same name, so rotation swaps the handle in place and keeps appending
    writer.rotate().unwrap();
    (&writer).write_all(b"after\n").unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "before\nafter\n");
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_write_after_close_fails() {
    let path = temp_path("closed");
    let name = path.to_str().unwrap();

    let writer = RotatingLogWriter::new(name, false).unwrap();
    writer.close().unwrap();

    assert!(writer.name().is_none());
    assert!((&writer).write(b"x").is_err());
    assert!((&writer).flush().is_err());
    assert!(writer.close().is_err());
    assert!(writer.rotate().is_err());

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_open_failure_is_reported() {
    let err = RotatingLogWriter::new("/nonexistent-dir/autolog.log", false).unwrap_err();
    assert!(err.to_string().contains("autolog.log"), "{err}");
}
