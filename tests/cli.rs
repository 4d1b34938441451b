use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A CLI utility to create BitTorrent metainfo files",
        ));
}

#[test]
fn test_version() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seedkit 0.3.1"));
}

#[test]
fn test_create_basic() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_file = temp_dir.path().join("test.txt");
    fs::write(&source_file, "random data").unwrap();
    let output_file = temp_dir.path().join("test.torrent");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg(&source_file)
        .arg("--output")
        .arg(&output_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished"));

    assert!(output_file.exists());
    let raw = fs::read(&output_file).unwrap();
    assert_eq!(raw.first(), Some(&b'd'));
}

#[test]
fn test_default_output_name() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_file = temp_dir.path().join("thing.txt");
    fs::write(&source_file, "default output").unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.current_dir(temp_dir.path())
        .arg(&source_file)
        .assert()
        .success();

    assert!(temp_dir.path().join("thing.torrent").exists());
}

#[test]
fn test_metadata_flags() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_file = temp_dir.path().join("flags.txt");
    fs::write(&source_file, "flagged data").unwrap();
    let output_file = temp_dir.path().join("flags.torrent");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg(&source_file)
        .arg("-o")
        .arg(&output_file)
        .arg("-p")
        .arg("--md5")
        .arg("-c")
        .arg("hello there")
        .arg("-a")
        .arg("http://tracker.example/announce")
        .assert()
        .success();

    let text = String::from_utf8_lossy(&fs::read(&output_file).unwrap()).into_owned();
    assert!(text.contains("7:privatei1e"));
    assert!(text.contains("6:md5sum"));
    assert!(text.contains("11:hello there"));
    assert!(text.contains("tracker.example/announce"));
}

#[test]
fn test_missing_source() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg("non_existent_file.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid source"));
}

#[test]
fn test_empty_source() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_file = temp_dir.path().join("empty.txt");
    fs::write(&source_file, "").unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg(&source_file).assert().failure();
}

#[test]
fn test_piece_size_out_of_range() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_file = temp_dir.path().join("test.txt");
    fs::write(&source_file, "data").unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg(&source_file).arg("-l").arg("30").assert().failure();
}

#[test]
fn test_batch_creates_one_torrent_per_entry() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_dir = temp_dir.path().join("drop");
    fs::create_dir(&source_dir).unwrap();
    for name in ["one.bin", "two.bin", "three.bin"] {
        fs::write(source_dir.join(name), format!("data for {}", name)).unwrap();
    }
    let out_dir = temp_dir.path().join("torrents");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg(&source_dir)
        .arg("--batch")
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished"));

    assert!(out_dir.join("one.bin.torrent").exists());
    assert!(out_dir.join("two.bin.torrent").exists());
    assert!(out_dir.join("three.bin.torrent").exists());
}

#[test]
fn test_batch_requires_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_file = temp_dir.path().join("test.txt");
    fs::write(&source_file, "not a directory").unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg(&source_file)
        .arg("--batch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch mode needs a directory"));
}

#[test]
fn test_batch_failing_entry_fails_the_run() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_dir = temp_dir.path().join("drop");
    fs::create_dir(&source_dir).unwrap();
    fs::write(source_dir.join("a.bin"), "fine").unwrap();
    fs::write(source_dir.join("b.bin"), "").unwrap();
    let out_dir = temp_dir.path().join("torrents");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seedkit"));
    cmd.arg(&source_dir)
        .arg("--batch")
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .failure();
}
