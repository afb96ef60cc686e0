//! Affected entry-point analysis
//!
//! Given a set of changed files, determine:
//! - Which package owns each file (its import path)
//! - Which entry-point packages reach that package through imports
//!
//! Algorithm:
//! 1. Filter to non-test `.go` files, normalize, dedup
//! 2. Owning import path = module path + file's directory
//! 3. BFS over reverse import edges from that node; entry points are
//!    recorded and not expanded further
//! 4. Union across files, report names sorted

use super::import_path::{entry_name, import_path_for_dir, is_analyzable_source, normalize_changed_path, owning_dir};
use super::package_graph::PackageGraph;
use crate::utils::path_to_slash;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::path::Path;

/// An entry point reached by at least one changed file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct EntryPoint {
  pub name: String,
  pub import_path: String,
}

/// Complete affected analysis.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AffectedAnalysis {
  /// Files as supplied
  pub changed_files: Vec<String>,

  /// Files that passed the source filter, project-relative, deduplicated
  pub considered: Vec<String>,

  /// Owning import paths of considered files that exist in the graph
  pub packages: BTreeSet<String>,

  /// Entry points keyed by import path
  pub entry_points: BTreeMap<String, EntryPoint>,
}

impl AffectedAnalysis {
  pub fn is_empty(&self) -> bool {
    self.entry_points.is_empty()
  }

  /// Deduplicated, sorted entry-point names.
  pub fn names(&self) -> Vec<String> {
    let names: BTreeSet<&str> = self.entry_points.values().map(|e| e.name.as_str()).collect();
    names.into_iter().map(str::to_string).collect()
  }
}

/// Analyze which entry points are affected by file changes.
///
/// `root` is the project root; changed paths may be relative to it or
/// absolute beneath it. Unknown directories contribute nothing.
pub fn analyze(graph: &PackageGraph, root: &Path, changed_files: &[impl AsRef<Path>]) -> AffectedAnalysis {
  let mut analysis = AffectedAnalysis {
    changed_files: changed_files.iter().map(|p| p.as_ref().display().to_string()).collect(),
    ..Default::default()
  };

  let mut seen = HashSet::new();
  for file in changed_files {
    let file = file.as_ref();
    if !is_analyzable_source(file) {
      tracing::trace!(file = %file.display(), "not an analyzable source");
      continue;
    }
    let Some(relative) = normalize_changed_path(root, file) else {
      tracing::debug!(file = %file.display(), "outside project root");
      continue;
    };
    if !seen.insert(relative.clone()) {
      continue;
    }
    analysis.considered.push(path_to_slash(&relative));

    let Some(owner) = import_path_for_dir(graph.module_path(), owning_dir(&relative)) else {
      continue;
    };

    if !graph.contains(&owner) {
      tracing::debug!(file = %relative.display(), owner = %owner, "no package owns file");
      continue;
    }
    analysis.packages.insert(owner.clone());

    for sink in dependent_entry_points(graph, &owner) {
      analysis.entry_points.entry(sink.clone()).or_insert_with(|| EntryPoint {
        name: entry_name(&sink).to_string(),
        import_path: sink,
      });
    }
  }

  tracing::info!(
    considered = analysis.considered.len(),
    entry_points = analysis.entry_points.len(),
    "affected analysis complete"
  );
  analysis
}

/// Entry points whose import closure contains `import_path`, sorted.
///
/// Breadth-first over incoming edges with a visited set, so cycles among
/// library packages terminate. An entry point is a sink: it is recorded and
/// its own importers are not explored.
pub fn dependent_entry_points(graph: &PackageGraph, import_path: &str) -> Vec<String> {
  let Some(start) = graph.index_of(import_path) else {
    return Vec::new();
  };
  let inner = graph.inner();

  let mut found = BTreeSet::new();
  let mut visited = HashSet::from([start]);
  let mut queue = VecDeque::from([start]);

  while let Some(idx) = queue.pop_front() {
    let node = &inner[idx];
    if node.is_entry_point() {
      found.insert(node.import_path.clone());
      continue;
    }

    for importer in inner.neighbors_directed(idx, Direction::Incoming) {
      if visited.insert(importer) {
        queue.push_back(importer);
      }
    }
  }

  found.into_iter().collect()
}
