//! Verbose tabular loader for comma-separated numeric files.
//!
//! Unlike the event-log reader, this loader requires a header row, checks
//! every row against the header's column count and reports what it skips.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// One parsed row, keyed by column name.
pub type Row = BTreeMap<String, f64>;

/// Failure to load a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("provided headers do not match the number of columns: expected {expected}, found {found}")]
    HeaderMismatch { expected: usize, found: usize },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load `path` as a table of floats.
///
/// The first row is the header. When `headers` is given it replaces the
/// file's header names and must have the same number of columns. Rows
/// with the wrong field count or a non-numeric field are skipped, and
/// reported when `verbose` is set.
pub fn read_csv(path: &Path, headers: Option<&[&str]>, verbose: bool) -> Result<Vec<Row>, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    parse_csv(&text, headers, verbose)
}

/// Parse table text; see [`read_csv`].
pub fn parse_csv(text: &str, headers: Option<&[&str]>, verbose: bool) -> Result<Vec<Row>, LoadError> {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return Ok(Vec::new());
    };
    let file_header = split_row(first);
    let columns: Vec<String> = match headers {
        Some(given) => {
            if given.len() != file_header.len() {
                return Err(LoadError::HeaderMismatch {
                    expected: given.len(),
                    found: file_header.len(),
                });
            }
            given.iter().map(|h| h.to_string()).collect()
        }
        None => file_header.iter().map(|h| h.to_string()).collect(),
    };

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_row(line);
        if fields.len() != columns.len() {
            if verbose {
                warn!(
                    "skipping row {:?}: expected {} values, got {}",
                    fields,
                    columns.len(),
                    fields.len()
                );
            }
            continue;
        }
        let parsed: Result<Row, _> = columns
            .iter()
            .zip(&fields)
            .map(|(name, field)| field.parse::<f64>().map(|v| (name.clone(), v)))
            .collect();
        match parsed {
            Ok(row) => rows.push(row),
            Err(e) => {
                if verbose {
                    warn!("skipping row {:?}: {}", fields, e);
                }
            }
        }
    }
    Ok(rows)
}

fn split_row(line: &str) -> Vec<&str> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split(',').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_rows() {
        let rows = parse_csv("time,energy\n1.0,2.5\n2.0,3.5\n", None, false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["energy"], 3.5);
    }

    #[test]
    fn provided_headers_replace_file_header() {
        let rows = parse_csv("a,b\n1,2\n", Some(&["time", "pitch"]), false).unwrap();
        assert_eq!(rows[0]["pitch"], 2.0);
    }

    #[test]
    fn header_count_must_match() {
        let err = parse_csv("a,b,c\n1,2,3\n", Some(&["time", "pitch"]), false).unwrap_err();
        assert!(matches!(err, LoadError::HeaderMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn bad_rows_skipped_but_parse_continues() {
        let rows = parse_csv("t,e\n1,2\n1,2,3\nx,4\n\n5,6\n", None, true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["t"], 5.0);
    }

    #[test]
    fn empty_input() {
        assert!(parse_csv("", None, true).unwrap().is_empty());
    }

    #[test]
    fn missing_file() {
        let err = read_csv(Path::new("/nonexistent/raysonic.csv"), None, true).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
