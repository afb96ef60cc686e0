//! Import graph over the scanned packages, built with petgraph
//!
//! ## Graph Structure
//!
//! - **Directed Graph**: `A → B` means "A imports B"
//! - **Nodes**: scanned packages, plus placeholders for intra-module imports
//!   that name no scanned directory (deleted or ignored packages)
//! - **Index**: import path → node
//! - **Sinks**: entry-point (`package main`) nodes
//!
//! The package forest records directory containment; this graph records
//! imports. They share nodes and nothing else.

use super::import_path::{entry_name, is_intra_module};
use crate::scan::ProjectTree;
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// A node in the import graph.
#[derive(Debug, Clone)]
pub struct PackageNode {
  pub import_path: String,
  /// Declared package name; `None` for placeholders
  pub name: Option<String>,
  /// Directory on disk; `None` for placeholders
  pub dir: Option<PathBuf>,
}

impl PackageNode {
  pub fn is_entry_point(&self) -> bool {
    self.name.as_deref() == Some(crate::scan::ENTRY_POINT_NAME)
  }

  pub fn is_placeholder(&self) -> bool {
    self.name.is_none()
  }

  /// Name an entry point is reported under.
  #[allow(dead_code)]
  pub fn entry_name(&self) -> &str {
    entry_name(&self.import_path)
  }
}

/// Indexed import graph. Immutable once built.
#[derive(Debug)]
pub struct PackageGraph {
  module_path: String,
  graph: DiGraph<PackageNode, ()>,
  index: HashMap<String, NodeIndex>,
  sinks: BTreeSet<String>,
}

impl PackageGraph {
  /// Index every package of the tree and add one edge per intra-module import.
  pub fn build(tree: &ProjectTree) -> Self {
    let mut graph = DiGraph::new();
    let mut index = HashMap::new();
    let mut sinks = BTreeSet::new();

    for package in tree.packages() {
      let idx = graph.add_node(PackageNode {
        import_path: package.import_path.clone(),
        name: Some(package.name.clone()),
        dir: Some(package.path.clone()),
      });
      index.insert(package.import_path.clone(), idx);
      if package.is_entry_point() {
        sinks.insert(package.import_path.clone());
      }
    }

    let mut placeholders = 0usize;
    for package in tree.packages() {
      let from = index[&package.import_path];
      for import in &package.imports {
        if !is_intra_module(&tree.module_path, import) {
          continue;
        }
        let to = *index.entry(import.clone()).or_insert_with(|| {
          placeholders += 1;
          graph.add_node(PackageNode {
            import_path: import.clone(),
            name: None,
            dir: None,
          })
        });
        graph.update_edge(from, to, ());
      }
    }

    tracing::debug!(
      nodes = graph.node_count(),
      edges = graph.edge_count(),
      entry_points = sinks.len(),
      placeholders,
      "import graph indexed"
    );

    Self {
      module_path: tree.module_path.clone(),
      graph,
      index,
      sinks,
    }
  }

  pub fn module_path(&self) -> &str {
    &self.module_path
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  pub fn contains(&self, import_path: &str) -> bool {
    self.index.contains_key(import_path)
  }

  #[allow(dead_code)]
  pub fn node(&self, import_path: &str) -> Option<&PackageNode> {
    self.index.get(import_path).map(|idx| &self.graph[*idx])
  }

  /// Import paths of all entry-point packages, sorted.
  pub fn sinks(&self) -> impl Iterator<Item = &str> {
    self.sinks.iter().map(String::as_str)
  }

  /// Packages that import `import_path` directly, sorted.
  #[allow(dead_code)]
  pub fn direct_importers(&self, import_path: &str) -> Vec<&str> {
    self.neighbors(import_path, Direction::Incoming)
  }

  /// Intra-module packages `import_path` imports directly, sorted.
  #[allow(dead_code)]
  pub fn direct_imports(&self, import_path: &str) -> Vec<&str> {
    self.neighbors(import_path, Direction::Outgoing)
  }

  fn neighbors(&self, import_path: &str, direction: Direction) -> Vec<&str> {
    let Some(idx) = self.index.get(import_path) else {
      return Vec::new();
    };
    let mut out: Vec<&str> = self
      .graph
      .neighbors_directed(*idx, direction)
      .map(|n| self.graph[n].import_path.as_str())
      .collect();
    out.sort_unstable();
    out.dedup();
    out
  }

  /// Import cycles (Tarjan SCC): components with more than one package, plus
  /// packages that import themselves. Each cycle and the list are sorted.
  pub fn find_cycles(&self) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = algo::tarjan_scc(&self.graph)
      .into_iter()
      .filter(|component| component.len() > 1 || self.graph.contains_edge(component[0], component[0]))
      .map(|component| {
        let mut members: Vec<String> = component
          .into_iter()
          .map(|idx| self.graph[idx].import_path.clone())
          .collect();
        members.sort();
        members
      })
      .collect();
    cycles.sort();
    cycles
  }

  /// Export to Graphviz DOT; entry points are drawn as filled boxes.
  pub fn to_dot(&self) -> String {
    use petgraph::dot::{Config, Dot};

    let dot = Dot::with_attr_getters(
      &self.graph,
      &[Config::EdgeNoLabel, Config::NodeNoLabel],
      &|_, _| String::new(),
      &|_, (_idx, node)| {
        let tooltip = node
          .dir
          .as_ref()
          .map(|dir| format!(" tooltip=\"{}\"", dir.display()))
          .unwrap_or_default();
        if node.is_entry_point() {
          format!(
            "label=\"{}\" shape=box style=filled fillcolor=lightblue{}",
            node.import_path, tooltip
          )
        } else if node.is_placeholder() {
          format!("label=\"{}\" shape=ellipse style=dashed", node.import_path)
        } else {
          format!("label=\"{}\" shape=ellipse{}", node.import_path, tooltip)
        }
      },
    );

    format!("{:?}", dot)
  }

  /// Raw graph access for traversals in this module tree.
  pub(super) fn inner(&self) -> &DiGraph<PackageNode, ()> {
    &self.graph
  }

  pub(super) fn index_of(&self, import_path: &str) -> Option<NodeIndex> {
    self.index.get(import_path).copied()
  }
}
