//! System git backend for changed-file discovery
//!
//! Shells out to the `git` binary with an isolated environment. Only the
//! diff plumbing the analyzer needs lives here.

use crate::core::error::{AffectedError, AffectedResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
#[derive(Debug, Clone)]
pub struct SystemGit {
  /// Directory git is run from
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  pub fn open(path: &Path) -> AffectedResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(AffectedError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(AffectedError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Files changed on HEAD since it diverged from `base` (`base...HEAD`).
  pub fn changed_files_since(&self, base: &str) -> AffectedResult<Vec<PathBuf>> {
    self.diff_names(&format!("{}...HEAD", base))
  }

  /// Files changed between two refs (`from..to`).
  pub fn changed_files_between(&self, from: &str, to: &str) -> AffectedResult<Vec<PathBuf>> {
    self.diff_names(&format!("{}..{}", from, to))
  }

  /// Absolute paths (under the work tree) named by `git diff --name-only <range>`.
  fn diff_names(&self, range: &str) -> AffectedResult<Vec<PathBuf>> {
    let output = self
      .git_cmd()
      .args(["diff", "--name-only", "--no-renames", range])
      .output()
      .context("Failed to run git diff")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(AffectedError::Git(GitError::CommandFailed {
        command: format!("git diff --name-only {}", range),
        stderr: stderr.to_string(),
      }));
    }

    let files: Vec<PathBuf> = parse_name_only(&String::from_utf8_lossy(&output.stdout))
      .map(|rel| self.work_tree.join(rel))
      .collect();
    tracing::debug!(range, files = files.len(), "git diff resolved");

    Ok(files)
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

fn parse_name_only(stdout: &str) -> impl Iterator<Item = &str> {
  stdout.lines().map(str::trim).filter(|line| !line.is_empty())
}
