//! Integration tests for `go-affected affected`

use crate::helpers::{TestProject, git, go_source, run_go_affected, run_go_affected_raw, run_go_affected_stdin, stdout};
use anyhow::Result;

#[test]
fn test_affected_shared_library() -> Result<()> {
  let project = TestProject::services()?;

  let output = run_go_affected(&project.path, &["affected", "--format", "names", "lib/lib.go"])?;

  assert_eq!(stdout(&output), "api\nworker\n");
  Ok(())
}

#[test]
fn test_affected_transitive_chain() -> Result<()> {
  let project = TestProject::new("svc")?;
  project.add_package("lib", "lib", &[])?;
  project.add_package("worker", "worker", &["svc/lib"])?;
  project.add_package("cmd/worker", "main", &["svc/worker"])?;
  project.add_package("cmd/api", "main", &["svc/lib"])?;

  let output = run_go_affected(&project.path, &["affected", "--format", "names", "worker/worker.go"])?;
  assert_eq!(stdout(&output), "worker\n");

  let output = run_go_affected(&project.path, &["affected", "--format", "names", "lib/lib.go"])?;
  assert_eq!(stdout(&output), "api\nworker\n");
  Ok(())
}

#[test]
fn test_affected_text_summary() -> Result<()> {
  let project = TestProject::services()?;

  let output = run_go_affected(&project.path, &["affected", "cmd/cron/cron.go", "README.md"])?;
  let text = stdout(&output);

  assert!(text.contains("Changed files: 2 (1 Go sources)"), "{}", text);
  assert!(text.trim_end().ends_with("Affected services: cron"), "{}", text);
  Ok(())
}

#[test]
fn test_affected_ignores_tests_and_non_go() -> Result<()> {
  let project = TestProject::services()?;
  project.write_file("lib/lib_test.go", "package lib\n")?;

  let output = run_go_affected(
    &project.path,
    &["affected", "--format", "names", "lib/lib_test.go", "lib/README.md", "go.sum"],
  )?;

  assert_eq!(stdout(&output), "");
  Ok(())
}

#[test]
fn test_affected_reads_stdin() -> Result<()> {
  let project = TestProject::services()?;

  let output = run_go_affected_stdin(
    &project.path,
    &["affected", "--format", "names"],
    "cmd/api/api.go\n\n./cmd/worker/worker.go\n",
  )?;

  assert_eq!(stdout(&output), "api\nworker\n");
  Ok(())
}

#[test]
fn test_affected_json() -> Result<()> {
  let project = TestProject::services()?;

  let output = run_go_affected(&project.path, &["affected", "--format", "json", "lib/lib.go"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["names"], serde_json::json!(["api", "worker"]));
  assert_eq!(json["packages"], serde_json::json!(["svc/lib"]));
  assert_eq!(json["entry_points"][0]["import_path"], "svc/cmd/api");
  Ok(())
}

#[test]
fn test_affected_from_subdirectory_finds_root() -> Result<()> {
  let project = TestProject::services()?;

  let output = run_go_affected(&project.path.join("cmd"), &["affected", "--format", "names", "lib/lib.go"])?;

  assert_eq!(stdout(&output), "api\nworker\n");
  Ok(())
}

#[test]
fn test_affected_build_constrained_file_is_skipped() -> Result<()> {
  let project = TestProject::services()?;
  // Excluded files may carry a different package name without conflict
  project.write_file("lib/lib_linux.go", "//go:build linux\n\npackage other\n")?;

  let output = run_go_affected(&project.path, &["affected", "--format", "names", "lib/lib.go"])?;

  assert_eq!(stdout(&output), "api\nworker\n");
  Ok(())
}

#[test]
fn test_affected_parse_error_fails() -> Result<()> {
  let project = TestProject::services()?;
  project.write_file("lib/broken.go", "package lib\n\nfunc {\n")?;

  let output = run_go_affected_raw(&project.path, &["affected", "lib/lib.go"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("broken.go"), "{}", stderr);
  Ok(())
}

#[test]
fn test_affected_package_conflict_fails() -> Result<()> {
  let project = TestProject::services()?;
  project.write_file("lib/zz.go", &go_source("other", &[]))?;

  let output = run_go_affected_raw(&project.path, &["affected", "lib/lib.go"])?;

  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_affected_missing_manifest_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("main.go"), go_source("main", &[]))?;

  let output = run_go_affected_raw(dir.path(), &["affected", "--root", ".", "main.go"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("go.mod"), "{}", stderr);
  Ok(())
}

#[test]
fn test_affected_since_git_ref() -> Result<()> {
  let project = TestProject::services()?;
  project.init_git()?;
  git(&project.path, &["branch", "base"])?;

  project.write_file("cmd/cron/cron.go", &go_source("main", &["svc/lib"]))?;
  project.commit("Cron uses lib")?;

  let output = run_go_affected(&project.path, &["affected", "--since", "base", "--format", "names"])?;

  assert_eq!(stdout(&output), "cron\n");
  Ok(())
}

#[test]
fn test_affected_ref_range() -> Result<()> {
  let project = TestProject::services()?;
  project.init_git()?;
  let first = project.head()?;

  project.write_file("lib/extra.go", &go_source("lib", &[]))?;
  let second = project.commit("Grow lib")?;

  let output = run_go_affected(
    &project.path,
    &["affected", "--from", &first, "--to", &second, "--format", "names"],
  )?;

  assert_eq!(stdout(&output), "api\nworker\n");
  Ok(())
}

#[test]
fn test_affected_since_unknown_ref_fails() -> Result<()> {
  let project = TestProject::services()?;
  project.init_git()?;

  let output = run_go_affected_raw(&project.path, &["affected", "--since", "does-not-exist"])?;

  assert!(!output.status.success());
  Ok(())
}
