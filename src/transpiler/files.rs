//! Source and output file handling
//!
//! The pipeline itself never touches the filesystem. These helpers cover the
//! edges: reading the source once, deriving where the output goes and writing it
//! with delete-then-append semantics.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Extension of h_sharp sources.
pub const SOURCE_EXTENSION: &str = "hss";
/// Extension of generated htvm files.
pub const TARGET_EXTENSION: &str = "htvm";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot remove previous output {}: {source}", .path.display())]
    Delete { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Read a whole source file as text.
pub fn read_source(path: &Path) -> Result<String, FileError> {
    fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Output path for `source`: its extension replaced with `target_extension`.
pub fn output_path_for(source: &Path, source_extension: &str, target_extension: &str) -> PathBuf {
    let matches = source
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == source_extension);
    if !matches {
        warn!(
            path = %source.display(),
            expected = source_extension,
            "source file does not have the expected extension"
        );
    }
    source.with_extension(target_extension)
}

/// Replace `path` with `code`, trimmed.
///
/// An existing file is deleted first and the new one is created in append mode,
/// so the result never contains leftovers from a previous run.
pub fn write_output(path: &Path, code: &str) -> Result<(), FileError> {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed previous output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(FileError::Delete {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let write_err = |source| FileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(code.trim().as_bytes()).map_err(write_err)?;
    Ok(())
}

/// Help text shown when no source file is given.
pub fn usage_message(program: &str, source_extension: &str) -> String {
    if cfg!(windows) {
        format!("Usage:\n{program} your_file.{source_extension}")
    } else {
        format!("Usage:\n./{program} your_file.{source_extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_replaces_extension() {
        let out = output_path_for(Path::new("dir/prog.hss"), SOURCE_EXTENSION, TARGET_EXTENSION);
        assert_eq!(out, PathBuf::from("dir/prog.htvm"));
    }

    #[test]
    fn test_output_path_for_other_extension() {
        let out = output_path_for(Path::new("prog.txt"), SOURCE_EXTENSION, TARGET_EXTENSION);
        assert_eq!(out, PathBuf::from("prog.htvm"));
    }

    #[test]
    fn test_write_output_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.htvm");
        fs::write(&path, "old contents that are longer").unwrap();

        write_output(&path, "\nnew\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_output_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.htvm");
        write_output(&path, "x := 1").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x := 1");
    }

    #[test]
    fn test_read_missing_source_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.hss");
        let err = read_source(&path).unwrap_err();
        assert!(err.to_string().contains("missing.hss"));
    }

    #[test]
    fn test_usage_message_mentions_extension() {
        let usage = usage_message("h_sharp", "hss");
        assert!(usage.starts_with("Usage:\n"));
        assert!(usage.ends_with("h_sharp your_file.hss"));
    }
}
