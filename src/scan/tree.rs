//! Recursive project walk producing the package forest
//!
//! Subdirectories are built in parallel on a bounded rayon pool. A directory
//! only aggregates its own files after every subdirectory has finished, so a
//! package's `children` are complete when it is created. The first error
//! aborts the walk; no partial tree ever escapes.

use super::package::{AggregateOptions, Package, aggregate};
use crate::core::config::ScanConfig;
use crate::core::error::{AffectedError, AffectedResult};
use crate::graph::import_path::{import_path_for_dir, is_source_file, is_test_file};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The scanned project: a synthetic root named after the module, whose
/// children are the top-level packages.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectTree {
  pub root_dir: PathBuf,
  pub module_path: String,
  pub root: Package,
}

impl ProjectTree {
  /// Every real package, depth-first, excluding the synthetic root.
  pub fn packages(&self) -> impl Iterator<Item = &Package> {
    self.root.children.iter().flat_map(Package::iter)
  }

  pub fn package_count(&self) -> usize {
    self.packages().count()
  }
}

/// Walks a project directory into a [`ProjectTree`].
#[derive(Debug, Clone)]
pub struct TreeBuilder {
  root_dir: PathBuf,
  module_path: String,
  scan: ScanConfig,
  options: AggregateOptions,
  jobs: usize,
}

impl TreeBuilder {
  pub fn new(root_dir: impl Into<PathBuf>, module_path: impl Into<String>, scan: &ScanConfig) -> Self {
    Self {
      root_dir: root_dir.into(),
      module_path: module_path.into(),
      scan: scan.clone(),
      options: AggregateOptions {
        honor_build_constraints: scan.honor_build_constraints,
      },
      jobs: scan.worker_count(),
    }
  }

  /// Override the worker count from the config.
  pub fn jobs(mut self, jobs: usize) -> Self {
    self.jobs = jobs.max(1);
    self
  }

  pub fn build(&self) -> AffectedResult<ProjectTree> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build()?;
    let children = pool.install(|| self.build_dir(&self.root_dir))?;

    let tree = ProjectTree {
      root_dir: self.root_dir.clone(),
      module_path: self.module_path.clone(),
      root: Package {
        path: self.root_dir.clone(),
        import_path: self.module_path.clone(),
        name: self.module_path.clone(),
        imports: Vec::new(),
        children,
      },
    };

    tracing::info!(
      root = %self.root_dir.display(),
      module = %self.module_path,
      packages = tree.package_count(),
      "project scanned"
    );
    Ok(tree)
  }

  /// Packages rooted at `dir`: a single package owning the sub-packages, or,
  /// when `dir` has no package of its own, the sub-packages themselves.
  fn build_dir(&self, dir: &Path) -> AffectedResult<Vec<Package>> {
    let (subdirs, files) = self.list_dir(dir)?;

    let nested: Vec<Vec<Package>> = subdirs
      .par_iter()
      .map(|sub| self.build_dir(sub))
      .collect::<AffectedResult<_>>()?;
    let children: Vec<Package> = nested.into_iter().flatten().collect();

    if files.is_empty() {
      return Ok(children);
    }

    let rel_dir = dir.strip_prefix(&self.root_dir).unwrap_or(Path::new(""));
    let import_path = import_path_for_dir(&self.module_path, rel_dir).ok_or_else(|| {
      AffectedError::message(format!("Cannot derive import path for {}", dir.display()))
    })?;

    match aggregate(dir, import_path, &files, self.options)? {
      Some(mut package) => {
        tracing::debug!(
          import_path = %package.import_path,
          name = %package.name,
          imports = package.imports.len(),
          "package aggregated"
        );
        package.children = children;
        Ok(vec![package])
      }
      None => Ok(children),
    }
  }

  /// Eligible subdirectories and source files of `dir`, sorted by name.
  fn list_dir(&self, dir: &Path) -> AffectedResult<(Vec<PathBuf>, Vec<PathBuf>)> {
    let read_error = |source| AffectedError::DirectoryRead {
      path: dir.to_path_buf(),
      source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
      let entry = entry.map_err(read_error)?;
      let file_type = entry.file_type().map_err(read_error)?;
      entries.push((entry.file_name(), entry.path(), file_type));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut subdirs = Vec::new();
    let mut files = Vec::new();

    for (name, path, file_type) in entries {
      let Some(name) = name.to_str() else {
        tracing::warn!(path = %path.display(), "skipping non-UTF-8 entry");
        continue;
      };
      if name.starts_with('.') || is_test_file(name) {
        continue;
      }

      if file_type.is_dir() {
        if !self.scan.is_ignored_dir(name) {
          subdirs.push(path);
        }
      } else if file_type.is_file() && is_source_file(name) {
        files.push(path);
      } else if file_type.is_symlink() && is_source_file(name) {
        // File links are followed; directory links are not
        match fs::metadata(&path) {
          Ok(meta) if meta.is_file() => files.push(path),
          Ok(_) => tracing::debug!(path = %path.display(), "skipping symlink to non-file"),
          Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping dangling symlink"),
        }
      }
    }

    Ok((subdirs, files))
  }
}
