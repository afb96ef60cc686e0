use crate::core::error::{AffectedError, AffectedResult, ConfigError, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for go-affected
/// Searched in order: affected.toml, .affected.toml, .config/affected.toml
///
/// # Example
///
/// ```toml
/// [scan]
/// ignore_dirs = ["testdata", "third_party"]
/// jobs = 8
/// honor_build_constraints = true
///
/// [output]
/// format = "names"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffectedConfig {
  #[serde(default)]
  pub scan: ScanConfig,
  #[serde(default)]
  pub output: OutputConfig,
}

/// Controls which directories are walked and how files are parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
  /// Directory names skipped at any depth (default: ["testdata"])
  #[serde(default = "default_ignore_dirs")]
  pub ignore_dirs: Vec<String>,

  /// Worker threads for the directory walk (default: available parallelism)
  #[serde(default)]
  pub jobs: Option<usize>,

  /// Drop files carrying `//go:build` or `// +build` lines (default: true)
  #[serde(default = "default_true")]
  pub honor_build_constraints: bool,
}

fn default_ignore_dirs() -> Vec<String> {
  vec!["testdata".to_string()]
}

fn default_true() -> bool {
  true
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self {
      ignore_dirs: default_ignore_dirs(),
      jobs: None,
      honor_build_constraints: true,
    }
  }
}

impl ScanConfig {
  /// Resolved worker count; never zero.
  pub fn worker_count(&self) -> usize {
    self
      .jobs
      .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4))
      .max(1)
  }

  pub fn is_ignored_dir(&self, name: &str) -> bool {
    self.ignore_dirs.iter().any(|d| d == name)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
  /// Default output format: text, json or names
  #[serde(default = "default_format")]
  pub format: String,
}

fn default_format() -> String {
  "text".to_string()
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      format: default_format(),
    }
  }
}

pub const VALID_FORMATS: &[&str] = &["text", "json", "names", "names-only"];

impl AffectedConfig {
  /// Find config file in search order: affected.toml, .affected.toml, .config/affected.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("affected.toml"),
      path.join(".affected.toml"),
      path.join(".config").join("affected.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load config from the project root, falling back to defaults when no file exists
  pub fn load(path: &Path) -> AffectedResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    Ok(config)
  }

  pub fn parse(content: &str) -> AffectedResult<Self> {
    let config: AffectedConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> AffectedResult<()> {
    if self.scan.jobs == Some(0) {
      return Err(AffectedError::Config(ConfigError::InvalidValue {
        field: "scan.jobs".to_string(),
        value: "0".to_string(),
        expected: "a positive integer".to_string(),
      }));
    }

    if !VALID_FORMATS.contains(&self.output.format.as_str()) {
      return Err(AffectedError::Config(ConfigError::InvalidValue {
        field: "output.format".to_string(),
        value: self.output.format.clone(),
        expected: VALID_FORMATS.join(", "),
      }));
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_defaults_when_missing() {
    let dir = TempDir::new().unwrap();
    let config = AffectedConfig::load(dir.path()).unwrap();
    assert_eq!(config.scan.ignore_dirs, vec!["testdata".to_string()]);
    assert!(config.scan.honor_build_constraints);
    assert_eq!(config.output.format, "text");
  }

  #[test]
  fn test_parse_partial() {
    let config = AffectedConfig::parse("[scan]\njobs = 3\n").unwrap();
    assert_eq!(config.scan.worker_count(), 3);
    assert!(config.scan.is_ignored_dir("testdata"));
    assert_eq!(config.output.format, "text");
  }

  #[test]
  fn test_zero_jobs_rejected() {
    let err = AffectedConfig::parse("[scan]\njobs = 0\n").unwrap_err();
    assert!(matches!(err, AffectedError::Config(_)));
  }

  #[test]
  fn test_unknown_format_rejected() {
    assert!(AffectedConfig::parse("[output]\nformat = \"xml\"\n").is_err());
  }

  #[test]
  fn test_hidden_config_location() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".config")).unwrap();
    fs::write(
      dir.path().join(".config/affected.toml"),
      "[scan]\nignore_dirs = [\"vendor\"]\nhonor_build_constraints = false\n",
    )
    .unwrap();

    let config = AffectedConfig::load(dir.path()).unwrap();
    assert!(config.scan.is_ignored_dir("vendor"));
    assert!(!config.scan.is_ignored_dir("testdata"));
    assert!(!config.scan.honor_build_constraints);
  }
}
