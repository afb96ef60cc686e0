//! `go-affected packages` - Print the scanned package forest

use super::OutputFormat;
use crate::core::context::ProjectContext;
use crate::core::error::AffectedResult;
use crate::scan::{Package, ProjectTree};
use std::fmt::Write as _;

pub fn run_packages(ctx: &ProjectContext, format: OutputFormat) -> AffectedResult<()> {
  print!("{}", render(&ctx.tree, format)?);
  Ok(())
}

pub fn render(tree: &ProjectTree, format: OutputFormat) -> AffectedResult<String> {
  match format {
    OutputFormat::Text => {
      let mut out = String::new();
      let _ = writeln!(out, "{} ({} packages)", tree.module_path, tree.package_count());
      for package in &tree.root.children {
        write_package(&mut out, package, 1);
      }
      Ok(out)
    }
    OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(tree)?)),
    OutputFormat::NamesOnly => Ok(tree.packages().map(|p| format!("{}\n", p.import_path)).collect()),
  }
}

fn write_package(out: &mut String, package: &Package, depth: usize) {
  let indent = "  ".repeat(depth);
  let marker = if package.is_entry_point() { " 🎯" } else { "" };
  let _ = writeln!(out, "{}{} [{}]{}", indent, package.import_path, package.name, marker);
  if !package.imports.is_empty() {
    let _ = writeln!(out, "{}  imports: {}", indent, package.imports.join(", "));
  }
  for child in &package.children {
    write_package(out, child, depth + 1);
  }
}
