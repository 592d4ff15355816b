use std::fs;
use std::io::Write;

use tempfile::TempDir;
use vajra::commands::logs::LogFollower;
use vajra::core::RotatingFile;

#[test]
fn test_follower_survives_rotation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vajra.log");

    let mut writer = RotatingFile::open(&path, 30, 3).unwrap();
    let mut follower = LogFollower::from_end(&path).unwrap();

    writer.write_all(b"line one\n").unwrap();
    assert_eq!(follower.poll().unwrap(), vec!["line one\n".to_string()]);

    writer.write_all(b"line two is longer\n").unwrap();
    assert_eq!(
        follower.poll().unwrap(),
        vec!["line two is longer\n".to_string()]
    );

    // Pushes past 30 bytes, so the file is rotated first
    writer.write_all(b"line three\n").unwrap();
    assert_eq!(follower.poll().unwrap(), vec!["line three\n".to_string()]);

    assert_eq!(
        fs::read_to_string(writer.backup_path(1)).unwrap(),
        "line one\nline two is longer\n"
    );
}

#[test]
fn test_follower_ignores_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vajra.log");
    fs::write(&path, "old | INFO | Vajra started\n").unwrap();

    let mut follower = LogFollower::from_end(&path).unwrap();
    assert!(follower.poll().unwrap().is_empty());
}
