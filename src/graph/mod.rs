//! Import-graph analysis over a scanned project
//!
//! Built on petgraph. The package forest from `scan` is indexed once into a
//! [`PackageGraph`]; affected queries are reverse traversals over that index.

pub mod affected;
pub mod import_path;
pub mod package_graph;

pub use affected::AffectedAnalysis;
pub use package_graph::PackageGraph;
