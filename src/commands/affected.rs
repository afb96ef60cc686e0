//! `go-affected affected` - Show which entry points are affected by changes
//!
//! Changed files come from the command line, piped stdin, or git. The
//! project is already scanned and indexed in the context; this command only
//! resolves files to entry points and prints them.

use super::OutputFormat;
use crate::core::context::ProjectContext;
use crate::core::error::AffectedResult;
use crate::core::vcs::SystemGit;
use crate::graph::AffectedAnalysis;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Where the changed-file list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
  /// Explicit paths (arguments or stdin)
  Files(Vec<PathBuf>),
  /// `git diff <base>...HEAD`
  Since(String),
  /// `git diff <from>..<to>`
  Range { from: String, to: String },
}

/// Run the affected command
pub fn run_affected(ctx: &ProjectContext, source: ChangeSource, format: OutputFormat) -> AffectedResult<()> {
  let changed_files = resolve_changed_files(ctx, source)?;
  let analysis = crate::graph::affected::analyze(&ctx.graph, ctx.project_root(), &changed_files);
  if analysis.is_empty() {
    tracing::info!(files = changed_files.len(), "no entry points affected");
  }

  print!("{}", render(&analysis, format)?);
  Ok(())
}

fn resolve_changed_files(ctx: &ProjectContext, source: ChangeSource) -> AffectedResult<Vec<PathBuf>> {
  match source {
    ChangeSource::Files(files) => Ok(files),
    ChangeSource::Since(base) => SystemGit::open(ctx.project_root())?.changed_files_since(&base),
    ChangeSource::Range { from, to } => SystemGit::open(ctx.project_root())?.changed_files_between(&from, &to),
  }
}

/// Render analysis results in the requested format
pub fn render(analysis: &AffectedAnalysis, format: OutputFormat) -> AffectedResult<String> {
  match format {
    OutputFormat::Text => Ok(render_text(analysis)),
    OutputFormat::Json => render_json(analysis),
    OutputFormat::NamesOnly => Ok(render_names(analysis)),
  }
}

fn render_text(analysis: &AffectedAnalysis) -> String {
  let mut out = String::new();
  let names = analysis.names();

  let _ = writeln!(out, "Affected Analysis");
  let _ = writeln!(out, "=================");
  let _ = writeln!(out);

  let _ = writeln!(
    out,
    "Changed files: {} ({} Go sources)",
    analysis.changed_files.len(),
    analysis.considered.len()
  );
  if !analysis.considered.is_empty() && analysis.considered.len() <= 20 {
    for file in &analysis.considered {
      let _ = writeln!(out, "  {}", file);
    }
  }
  let _ = writeln!(out);

  let _ = writeln!(out, "Changed packages: {}", analysis.packages.len());
  for package in &analysis.packages {
    let _ = writeln!(out, "  📦 {}", package);
  }
  let _ = writeln!(out);

  let _ = writeln!(out, "Affected entry points: {}", analysis.entry_points.len());
  for entry in analysis.entry_points.values() {
    let _ = writeln!(out, "  🎯 {} ({})", entry.name, entry.import_path);
  }
  let _ = writeln!(out);

  let _ = writeln!(out, "Affected services: {}", names.join(","));
  out
}

fn render_json(analysis: &AffectedAnalysis) -> AffectedResult<String> {
  use serde_json::json;

  let output = json!({
      "changed_files": analysis.changed_files,
      "considered": analysis.considered,
      "packages": analysis.packages,
      "entry_points": analysis.entry_points.values().collect::<Vec<_>>(),
      "names": analysis.names(),
  });

  Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
}

fn render_names(analysis: &AffectedAnalysis) -> String {
  analysis.names().into_iter().map(|name| name + "\n").collect()
}
