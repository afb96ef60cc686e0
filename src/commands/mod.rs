//! CLI commands for go-affected
//!
//! - **affected**: entry points affected by a set of changed files
//! - **packages**: print the scanned package forest
//! - **graph**: import-graph inspection (DOT export, cycle detection)
//!
//! All commands accept `&ProjectContext` so the project is scanned once.

pub mod affected;
pub mod graph;
pub mod packages;

pub use affected::{ChangeSource, run_affected};
pub use graph::{GraphView, run_graph};
pub use packages::run_packages;

use crate::core::error::{AffectedError, AffectedResult};

/// Output format shared by all commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl OutputFormat {
  pub fn parse(s: &str) -> AffectedResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" => Ok(Self::NamesOnly),
      _ => Err(AffectedError::message(format!(
        "Unknown format '{}'. Valid formats: text, json, names",
        s
      ))),
    }
  }
}
