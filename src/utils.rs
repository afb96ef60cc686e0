//! Utility functions for cross-platform path handling and path lists

use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Render a path with forward slashes regardless of host separator
///
/// Used for every path printed or serialized, so output is identical on all
/// platforms.
pub fn path_to_slash(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

/// Read one path per line, skipping blank lines and trimming whitespace
/// (including the `\r` of CRLF input).
pub fn read_path_list(reader: impl BufRead) -> std::io::Result<Vec<PathBuf>> {
  let mut paths = Vec::new();
  for line in reader.lines() {
    let line = line?;
    let trimmed = line.trim();
    if !trimmed.is_empty() {
      paths.push(PathBuf::from(trimmed));
    }
  }
  Ok(paths)
}
