//! Single-file extraction: package clause, imports, build-constraint marker
//!
//! Files are parsed with the tree-sitter Go grammar. A tree with any ERROR or
//! MISSING node is rejected outright; the analyzer never guesses at imports
//! from a file it could not fully parse.

use crate::core::error::{AffectedError, AffectedResult};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tree_sitter::{Node, Parser, Tree};

static BUILD_CONSTRAINT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^//(go:build\s+.*|\s*\+build\s+.*)\s*$").expect("valid regex"));

/// One parsed `.go` file. Lives only for the duration of its directory's aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
  pub path: PathBuf,
  pub package_name: String,
  /// Unquoted import paths in source order (may repeat)
  pub imports: Vec<String>,
  /// Carries a build constraint and is dropped from aggregation
  pub excluded: bool,
}

impl CompilationUnit {
  pub fn parse_file(path: &Path) -> AffectedResult<Self> {
    let source = fs::read_to_string(path).map_err(|e| AffectedError::Parse {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;
    Self::parse_source(path, &source)
  }

  pub fn parse_source(path: &Path, source: &str) -> AffectedResult<Self> {
    let tree = parse_tree(path, source)?;
    let root = tree.root_node();

    if root.has_error() {
      let reason = first_error(root)
        .map(|node| {
          let pos = node.start_position();
          format!("syntax error at {}:{}", pos.row + 1, pos.column + 1)
        })
        .unwrap_or_else(|| "syntax error".to_string());
      return Err(AffectedError::Parse {
        path: path.to_path_buf(),
        reason,
      });
    }

    let bytes = source.as_bytes();
    let mut package_name = None;
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
      match child.kind() {
        "package_clause" => package_name = package_identifier(child, bytes),
        "import_declaration" => collect_imports(child, bytes, &mut imports),
        _ => {}
      }
    }

    let package_name = package_name.ok_or_else(|| AffectedError::Parse {
      path: path.to_path_buf(),
      reason: "missing package clause".to_string(),
    })?;

    Ok(Self {
      path: path.to_path_buf(),
      package_name,
      imports,
      excluded: has_build_constraint(root, bytes),
    })
  }
}

fn parse_tree(path: &Path, source: &str) -> AffectedResult<Tree> {
  let mut parser = Parser::new();
  parser
    .set_language(&tree_sitter_go::LANGUAGE.into())
    .map_err(|e| AffectedError::message(format!("Failed to load Go grammar: {}", e)))?;

  parser.parse(source, None).ok_or_else(|| AffectedError::Parse {
    path: path.to_path_buf(),
    reason: "parser produced no tree".to_string(),
  })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
  if node.is_error() || node.is_missing() {
    return Some(node);
  }
  let mut cursor = node.walk();
  node.children(&mut cursor).filter(|c| c.has_error()).find_map(first_error)
}

fn package_identifier(clause: Node<'_>, source: &[u8]) -> Option<String> {
  let mut cursor = clause.walk();
  clause
    .children(&mut cursor)
    .find(|c| c.kind() == "package_identifier")
    .and_then(|c| c.utf8_text(source).ok())
    .map(str::to_string)
}

fn collect_imports(decl: Node<'_>, source: &[u8], imports: &mut Vec<String>) {
  let mut cursor = decl.walk();
  for child in decl.children(&mut cursor) {
    match child.kind() {
      "import_spec" => push_spec(child, source, imports),
      "import_spec_list" => {
        let mut spec_cursor = child.walk();
        for spec in child.children(&mut spec_cursor) {
          if spec.kind() == "import_spec" {
            push_spec(spec, source, imports);
          }
        }
      }
      _ => {}
    }
  }
}

fn push_spec(spec: Node<'_>, source: &[u8], imports: &mut Vec<String>) {
  if let Some(path) = spec.child_by_field_name("path")
    && let Ok(text) = path.utf8_text(source)
  {
    imports.push(unquote(text).to_string());
  }
}

/// Strip the delimiters of an interpreted ("...") or raw (`...`) string literal.
fn unquote(literal: &str) -> &str {
  literal.trim_matches(|c| c == '"' || c == '`')
}

/// Any `//go:build` or `// +build` line comment anywhere in the file.
fn has_build_constraint(root: Node<'_>, source: &[u8]) -> bool {
  let mut stack = vec![root];
  while let Some(node) = stack.pop() {
    if node.kind() == "comment" {
      if let Ok(text) = node.utf8_text(source)
        && BUILD_CONSTRAINT.is_match(text.trim_end())
      {
        return true;
      }
      continue;
    }
    let mut cursor = node.walk();
    stack.extend(node.children(&mut cursor));
  }
  false
}
