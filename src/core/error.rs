//! Error types for go-affected with contextual messages and exit codes
//!
//! Every failure during the scan aborts the whole analysis: a dependency graph
//! built from a partially parsed tree would report the wrong targets, so no
//! error here is ever downgraded to a warning.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for go-affected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing go.mod, bad sources)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (import cycles under `--strict`)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for go-affected
#[derive(Debug)]
pub enum AffectedError {
  /// go.mod is absent or has no `module` line
  ManifestMissing { root: PathBuf, reason: String },

  /// A directory could not be listed
  DirectoryRead { path: PathBuf, source: io::Error },

  /// A Go file is not syntactically valid
  Parse { path: PathBuf, reason: String },

  /// Two files in one directory declare different packages
  PackageConflict {
    file: PathBuf,
    expected: String,
    found: String,
  },

  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Import cycles found while validating the graph
  Cycles { count: usize },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl AffectedError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    AffectedError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    AffectedError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      AffectedError::Message { message, context, help } => AffectedError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      AffectedError::Io(err) => AffectedError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      AffectedError::ManifestMissing { .. } => ExitCode::User,
      AffectedError::DirectoryRead { .. } => ExitCode::System,
      AffectedError::Parse { .. } => ExitCode::User,
      AffectedError::PackageConflict { .. } => ExitCode::User,
      AffectedError::Config(_) => ExitCode::User,
      AffectedError::Git(_) => ExitCode::System,
      AffectedError::Cycles { .. } => ExitCode::Validation,
      AffectedError::Io(_) => ExitCode::System,
      AffectedError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      AffectedError::ManifestMissing { .. } => {
        Some("Run from a Go module root or pass --root <dir> pointing at the directory holding go.mod.".to_string())
      }
      AffectedError::Parse { .. } => Some("Fix the syntax error (or exclude the file with a build constraint).".to_string()),
      AffectedError::PackageConflict { .. } => {
        Some("All non-test files in one directory must declare the same package.".to_string())
      }
      AffectedError::Config(e) => e.help_message(),
      AffectedError::Git(e) => e.help_message(),
      AffectedError::Cycles { .. } => Some("Run `go-affected graph --cycles` to list them.".to_string()),
      AffectedError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for AffectedError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AffectedError::ManifestMissing { root, reason } => {
        write!(f, "No module declaration found in {}: {}", root.join("go.mod").display(), reason)
      }
      AffectedError::DirectoryRead { path, source } => {
        write!(f, "Failed to read directory {}: {}", path.display(), source)
      }
      AffectedError::Parse { path, reason } => write!(f, "Failed to parse {}: {}", path.display(), reason),
      AffectedError::PackageConflict { file, expected, found } => write!(
        f,
        "Package name mismatch in {}: expected '{}', found '{}'",
        file.display(),
        expected,
        found
      ),
      AffectedError::Config(e) => write!(f, "{}", e),
      AffectedError::Git(e) => write!(f, "{}", e),
      AffectedError::Cycles { count } => write!(f, "Found {} import cycle(s)", count),
      AffectedError::Io(e) => write!(f, "I/O error: {}", e),
      AffectedError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for AffectedError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      AffectedError::DirectoryRead { source, .. } => Some(source),
      AffectedError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for AffectedError {
  fn from(err: io::Error) -> Self {
    AffectedError::Io(err)
  }
}

impl From<String> for AffectedError {
  fn from(msg: String) -> Self {
    AffectedError::message(msg)
  }
}

impl From<&str> for AffectedError {
  fn from(msg: &str) -> Self {
    AffectedError::message(msg)
  }
}

impl From<toml_edit::de::Error> for AffectedError {
  fn from(err: toml_edit::de::Error) -> Self {
    AffectedError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for AffectedError {
  fn from(err: serde_json::Error) -> Self {
    AffectedError::message(format!("JSON error: {}", err))
  }
}

impl From<rayon::ThreadPoolBuildError> for AffectedError {
  fn from(err: rayon::ThreadPoolBuildError) -> Self {
    AffectedError::message(format!("Failed to start scan workers: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field holds a value outside its allowed range
  InvalidValue { field: String, value: String, expected: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidValue { field, .. } => Some(format!("Fix `{}` in affected.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidValue { field, value, expected } => {
        write!(f, "Invalid value '{}' for {}: expected {}", value, field, expected)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } if stderr.contains("unknown revision") => {
        Some("Fetch the base ref first (e.g. `git fetch origin main`).".to_string())
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Pass changed files explicitly when {} is not inside a git checkout.",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for go-affected
pub type AffectedResult<T> = Result<T, AffectedError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> AffectedResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> AffectedResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<AffectedError>,
{
  fn context(self, ctx: impl Into<String>) -> AffectedResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> AffectedResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &AffectedError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

impl From<anyhow::Error> for AffectedError {
  fn from(err: anyhow::Error) -> Self {
    AffectedError::message(err.to_string())
  }
}
