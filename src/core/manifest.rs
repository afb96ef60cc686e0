//! go.mod module declaration lookup

use crate::core::error::{AffectedError, AffectedResult};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const MANIFEST_FILE: &str = "go.mod";

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*//").expect("valid regex"));

// Quoted form is legal in go.mod; a trailing `// comment` is not part of the path.
static MODULE_LINE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"^\s*module\s+(?:"([^"]+)"|([^\s"/][^\s]*?))\s*(?://.*)?$"#).expect("valid regex"));

/// The module a project root declares in its go.mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleManifest {
  pub root: PathBuf,
  pub module_path: String,
}

impl ModuleManifest {
  /// Read `<root>/go.mod` and extract its module path.
  pub fn load(root: &Path) -> AffectedResult<Self> {
    let manifest = root.join(MANIFEST_FILE);
    let content = fs::read_to_string(&manifest).map_err(|e| AffectedError::ManifestMissing {
      root: root.to_path_buf(),
      reason: e.to_string(),
    })?;

    let module_path = parse_module_path(&content).ok_or_else(|| AffectedError::ManifestMissing {
      root: root.to_path_buf(),
      reason: "no `module` declaration".to_string(),
    })?;

    Ok(Self {
      root: root.to_path_buf(),
      module_path,
    })
  }
}

/// First non-comment `module <path>` line wins.
pub fn parse_module_path(content: &str) -> Option<String> {
  content
    .lines()
    .filter(|line| !COMMENT_LINE.is_match(line))
    .find_map(|line| {
      let caps = MODULE_LINE.captures(line)?;
      caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
    })
    .filter(|path| !path.is_empty())
}

/// Walk upward from `start` to the first directory holding a go.mod.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
  start.ancestors().find(|dir| dir.join(MANIFEST_FILE).is_file()).map(Path::to_path_buf)
}
