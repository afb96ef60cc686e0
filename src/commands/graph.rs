//! `go-affected graph` - Inspect the import graph
//!
//! Default output is a summary; `--dot` exports Graphviz, `--cycles` lists
//! import cycles (fatal under `--strict`).

use super::OutputFormat;
use crate::core::context::ProjectContext;
use crate::core::error::{AffectedError, AffectedResult};
use crate::graph::PackageGraph;
use std::fmt::Write as _;

/// What the graph command prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphView {
  Summary,
  Dot,
  Cycles { strict: bool },
}

pub fn run_graph(ctx: &ProjectContext, view: GraphView, format: OutputFormat) -> AffectedResult<()> {
  match view {
    GraphView::Summary => print!("{}", render_summary(&ctx.graph, format)?),
    GraphView::Dot => println!("{}", ctx.graph.to_dot()),
    GraphView::Cycles { strict } => {
      let cycles = ctx.graph.find_cycles();
      print!("{}", render_cycles(&cycles, format)?);
      if strict && !cycles.is_empty() {
        return Err(AffectedError::Cycles { count: cycles.len() });
      }
      if !cycles.is_empty() {
        tracing::warn!(count = cycles.len(), "import cycles present");
      }
    }
  }
  Ok(())
}

fn render_summary(graph: &PackageGraph, format: OutputFormat) -> AffectedResult<String> {
  let sinks: Vec<&str> = graph.sinks().collect();
  match format {
    OutputFormat::Json => {
      let output = serde_json::json!({
        "module": graph.module_path(),
        "nodes": graph.node_count(),
        "edges": graph.edge_count(),
        "entry_points": sinks,
      });
      Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
    }
    OutputFormat::NamesOnly => Ok(sinks.iter().map(|s| format!("{}\n", s)).collect()),
    OutputFormat::Text => {
      let mut out = String::new();
      let _ = writeln!(out, "Module: {}", graph.module_path());
      let _ = writeln!(out, "Packages: {}", graph.node_count());
      let _ = writeln!(out, "Import edges: {}", graph.edge_count());
      let _ = writeln!(out, "Entry points: {}", sinks.len());
      for sink in sinks {
        let _ = writeln!(out, "  🎯 {}", sink);
      }
      Ok(out)
    }
  }
}

fn render_cycles(cycles: &[Vec<String>], format: OutputFormat) -> AffectedResult<String> {
  match format {
    OutputFormat::Json => Ok(format!(
      "{}\n",
      serde_json::to_string_pretty(&serde_json::json!({ "cycles": cycles }))?
    )),
    OutputFormat::NamesOnly => Ok(cycles.iter().map(|c| format!("{}\n", c.join(" "))).collect()),
    OutputFormat::Text => {
      if cycles.is_empty() {
        return Ok("No import cycles detected\n".to_string());
      }
      let mut out = String::new();
      let _ = writeln!(out, "Found {} import cycle(s)", cycles.len());
      for (i, cycle) in cycles.iter().enumerate() {
        let _ = writeln!(out, "  Cycle {}: {}", i + 1, cycle.join(" → "));
      }
      Ok(out)
    }
  }
}
