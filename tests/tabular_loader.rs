use raysonic::tabular::{read_csv, LoadError};
use std::fs;
use tempfile::tempdir;

#[test]
fn pitch_table_with_fixed_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pitch.csv");
    fs::write(&path, "Time,Pitch\n1.0,466.1\n2.0,oops\n3.0\n4.0,500.0\n").unwrap();
    let rows = read_csv(&path, Some(&["time", "pitch"]), true).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["time"], 1.0);
    assert_eq!(rows[1]["pitch"], 500.0);
}

#[test]
fn header_mismatch_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "time,energy,altitude\n1,2,3\n").unwrap();
    let err = read_csv(&path, Some(&["time", "pitch"]), true).unwrap_err();
    assert!(matches!(err, LoadError::HeaderMismatch { expected: 2, found: 3 }));
}

#[test]
fn missing_and_empty_files() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("none.csv");
    assert!(matches!(read_csv(&missing, None, false), Err(LoadError::NotFound(p)) if p == missing));

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "").unwrap();
    assert!(read_csv(&empty, None, true).unwrap().is_empty());
}
