//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A throwaway Go module on disk
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create a project with a go.mod declaring `module`
  pub fn new(module: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(path.join("go.mod"), format!("module {}\n\ngo 1.22\n", module))?;

    Ok(Self { _root: root, path })
  }

  /// Create a project laid out like a small service repo:
  /// two commands sharing `lib`, plus a standalone one.
  pub fn services() -> Result<Self> {
    let project = Self::new("svc")?;
    project.add_package("lib", "lib", &["fmt"])?;
    project.add_package("cmd/api", "main", &["svc/lib"])?;
    project.add_package("cmd/worker", "main", &["svc/lib", "os"])?;
    project.add_package("cmd/cron", "main", &[])?;
    Ok(project)
  }

  /// Write `<dir>/<last segment>.go` declaring `package` with the given imports
  pub fn add_package(&self, dir: &str, package: &str, imports: &[&str]) -> Result<PathBuf> {
    let file_name = dir.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or("root");
    let file = format!("{}/{}.go", dir, file_name);
    self.write_file(&file, &go_source(package, imports))?;
    Ok(self.path.join(file))
  }

  /// Write a file relative to the project root, creating parent directories
  pub fn write_file(&self, relative: &str, content: &str) -> Result<()> {
    let path = self.path.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Initialize a git repository and commit everything
  pub fn init_git(&self) -> Result<()> {
    git(&self.path, &["init", "--initial-branch=main"])?;
    git(&self.path, &["config", "user.name", "Test User"])?;
    git(&self.path, &["config", "user.email", "test@example.com"])?;
    self.commit("Initial project setup")?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    self.head()
  }

  /// SHA of the current commit
  pub fn head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Render a Go source file
pub fn go_source(package: &str, imports: &[&str]) -> String {
  let mut src = format!("package {}\n\n", package);
  if !imports.is_empty() {
    src.push_str("import (\n");
    for import in imports {
      src.push_str(&format!("\t\"{}\"\n", import));
    }
    src.push_str(")\n\n");
  }
  if package == "main" {
    src.push_str("func main() {}\n");
  } else {
    src.push_str("func Hello() string { return \"hello\" }\n");
  }
  src
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

fn command(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_go-affected"));
  cmd.current_dir(cwd).args(args).env_remove("RUST_LOG");
  cmd
}

/// Run go-affected, failing on a non-zero exit status
pub fn run_go_affected(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_go_affected_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "go-affected command failed: go-affected {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run go-affected and return the output whatever the exit status
pub fn run_go_affected_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  command(cwd, args)
    .stdin(Stdio::null())
    .output()
    .context("Failed to run go-affected")
}

/// Run go-affected with `input` piped to stdin
pub fn run_go_affected_stdin(cwd: &Path, args: &[&str], input: &str) -> Result<Output> {
  let mut child = command(cwd, args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to spawn go-affected")?;

  child
    .stdin
    .take()
    .context("stdin not captured")?
    .write_all(input.as_bytes())?;

  let output = child.wait_with_output()?;
  if !output.status.success() {
    anyhow::bail!(
      "go-affected command failed: go-affected {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}
