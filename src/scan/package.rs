//! Per-directory aggregation of compilation units into a package

use super::unit::CompilationUnit;
use crate::core::error::{AffectedError, AffectedResult};
use indexmap::IndexSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Declared name of a deployable entry-point package.
pub const ENTRY_POINT_NAME: &str = "main";

/// One Go package: the eligible files of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
  /// Directory on disk
  pub path: PathBuf,
  /// Module path + directory relative to the project root
  pub import_path: String,
  /// Name from the package clause
  pub name: String,
  /// Deduplicated imports in first-seen order
  pub imports: Vec<String>,
  /// Packages in subdirectories (containment, not dependency)
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<Package>,
}

impl Package {
  pub fn is_entry_point(&self) -> bool {
    self.name == ENTRY_POINT_NAME
  }

  /// Depth-first iterator over this package and all descendants.
  pub fn iter(&self) -> impl Iterator<Item = &Package> {
    let mut stack = vec![self];
    std::iter::from_fn(move || {
      let next = stack.pop()?;
      stack.extend(next.children.iter().rev());
      Some(next)
    })
  }
}

/// Options that affect how individual files are read.
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
  pub honor_build_constraints: bool,
}

impl Default for AggregateOptions {
  fn default() -> Self {
    Self {
      honor_build_constraints: true,
    }
  }
}

/// Merge the eligible files of one directory into a package.
///
/// Returns `Ok(None)` when every file is excluded (or there are none). The
/// first non-excluded file fixes the package name; any later disagreement is
/// a [`AffectedError::PackageConflict`].
pub fn aggregate(
  dir: &Path,
  import_path: String,
  files: &[PathBuf],
  options: AggregateOptions,
) -> AffectedResult<Option<Package>> {
  let mut name: Option<String> = None;
  let mut imports: IndexSet<String> = IndexSet::new();

  for file in files {
    let unit = CompilationUnit::parse_file(file)?;
    if unit.excluded && options.honor_build_constraints {
      tracing::debug!(file = %file.display(), "skipping build-constrained file");
      continue;
    }

    match &name {
      Some(expected) if *expected != unit.package_name => {
        return Err(AffectedError::PackageConflict {
          file: file.clone(),
          expected: expected.clone(),
          found: unit.package_name,
        });
      }
      Some(_) => {}
      None => name = Some(unit.package_name),
    }

    imports.extend(unit.imports);
  }

  Ok(name.map(|name| Package {
    path: dir.to_path_buf(),
    import_path,
    name,
    imports: imports.into_iter().collect(),
    children: Vec::new(),
  }))
}
