//! Unified project context - build once, pass everywhere
//!
//! # Architecture
//!
//! ```text
//! main.rs:
//!   ProjectContext::build() -> &ProjectContext
//!   |
//!   v
//! commands/affected.rs, packages.rs, graph.rs:
//!   fn run(ctx: &ProjectContext, ..)
//! ```
//!
//! Construction is all-or-nothing: manifest, config, full scan and graph
//! index either all succeed or the command never runs.

use crate::core::config::AffectedConfig;
use crate::core::error::AffectedResult;
use crate::core::manifest::ModuleManifest;
use crate::graph::PackageGraph;
use crate::scan::{ProjectTree, TreeBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs about one Go module.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory (holds go.mod)
  pub root: PathBuf,

  /// Module path from go.mod
  pub module_path: String,

  /// Configuration (affected.toml or defaults)
  pub config: Arc<AffectedConfig>,

  /// Package forest
  pub tree: Arc<ProjectTree>,

  /// Import graph indexed from the tree
  pub graph: Arc<PackageGraph>,
}

/// Knobs the CLI can override on top of affected.toml.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
  pub jobs: Option<usize>,
}

impl ProjectContext {
  /// Load go.mod and config, scan the tree, index the graph.
  pub fn build(root: &Path, options: BuildOptions) -> AffectedResult<Self> {
    let manifest = ModuleManifest::load(root)?;
    let config = AffectedConfig::load(root)?;

    let mut builder = TreeBuilder::new(root, manifest.module_path.clone(), &config.scan);
    if let Some(jobs) = options.jobs {
      builder = builder.jobs(jobs);
    }
    let tree = builder.build()?;
    let graph = PackageGraph::build(&tree);

    Ok(Self {
      root: root.to_path_buf(),
      module_path: manifest.module_path,
      config: Arc::new(config),
      tree: Arc::new(tree),
      graph: Arc::new(graph),
    })
  }

  /// Get project root as Path reference (convenience)
  pub fn project_root(&self) -> &Path {
    &self.root
  }
}
