//! Filesystem path → Go import path
//!
//! Every place that turns a directory into an import path goes through
//! [`import_path_for_dir`]; the scanner and the resolver must agree on the key.

use std::path::{Component, Path, PathBuf};

const SOURCE_SUFFIX: &str = ".go";
const TEST_SUFFIX: &str = "_test.go";

/// Import path of a directory given relative to the project root.
///
/// Returns `None` for paths that escape the project (`..`, absolute).
pub fn import_path_for_dir(module_path: &str, rel_dir: &Path) -> Option<String> {
  let mut import_path = module_path.to_string();

  for component in rel_dir.components() {
    match component {
      Component::CurDir => {}
      Component::Normal(segment) => {
        let segment = segment.to_str()?;
        // Backslash-separated input on unix arrives as a single component
        for part in segment.split('\\').filter(|p| !p.is_empty()) {
          import_path.push('/');
          import_path.push_str(part);
        }
      }
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
    }
  }

  Some(import_path)
}

/// Directory that owns a project-relative file.
pub fn owning_dir(rel_file: &Path) -> &Path {
  rel_file.parent().unwrap_or(Path::new(""))
}

/// Project-relative form of a changed path; `None` when it lies outside `root`.
pub fn normalize_changed_path(root: &Path, path: &Path) -> Option<PathBuf> {
  let relative = if path.is_absolute() {
    path.strip_prefix(root).ok()?.to_path_buf()
  } else {
    path.to_path_buf()
  };

  let mut normalized = PathBuf::new();
  for component in relative.components() {
    match component {
      Component::CurDir => {}
      Component::Normal(segment) => {
        let segment = segment.to_str()?;
        for part in segment.split('\\').filter(|p| !p.is_empty() && *p != ".") {
          normalized.push(part);
        }
      }
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
    }
  }

  if normalized.as_os_str().is_empty() {
    None
  } else {
    Some(normalized)
  }
}

/// Only non-test Go sources can move a package's build.
pub fn is_analyzable_source(path: &Path) -> bool {
  let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
    return false;
  };
  name.ends_with(SOURCE_SUFFIX) && !name.ends_with(TEST_SUFFIX)
}

pub fn is_test_file(name: &str) -> bool {
  name.ends_with(TEST_SUFFIX)
}

pub fn is_source_file(name: &str) -> bool {
  name.ends_with(SOURCE_SUFFIX)
}

/// Final segment of an import path; the name an entry point is reported under.
pub fn entry_name(import_path: &str) -> &str {
  import_path.rsplit('/').next().unwrap_or(import_path)
}

/// True when `import` refers to a package inside `module_path`.
pub fn is_intra_module(module_path: &str, import: &str) -> bool {
  import == module_path
    || import
      .strip_prefix(module_path)
      .is_some_and(|rest| rest.starts_with('/'))
}
