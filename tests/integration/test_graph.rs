//! Integration tests for `go-affected graph`

use crate::helpers::{TestProject, run_go_affected, run_go_affected_raw, stdout};
use anyhow::Result;

fn cyclic_project() -> Result<TestProject> {
  let project = TestProject::new("svc")?;
  project.add_package("a", "a", &["svc/b"])?;
  project.add_package("b", "b", &["svc/a"])?;
  project.add_package("cmd/app", "main", &["svc/a"])?;
  Ok(project)
}

#[test]
fn test_graph_summary() -> Result<()> {
  let project = TestProject::services()?;

  let output = run_go_affected(&project.path, &["graph"])?;
  let text = stdout(&output);

  assert!(text.contains("Module: svc"), "{}", text);
  assert!(text.contains("Import edges: 2"), "{}", text);
  assert!(text.contains("Entry points: 3"), "{}", text);
  Ok(())
}

#[test]
fn test_graph_dot() -> Result<()> {
  let project = TestProject::services()?;

  let output = run_go_affected(&project.path, &["graph", "--dot"])?;
  let dot = stdout(&output);

  assert!(dot.starts_with("digraph"), "{}", dot);
  assert!(dot.contains("svc/lib"), "{}", dot);
  Ok(())
}

#[test]
fn test_graph_cycles_reported() -> Result<()> {
  let project = cyclic_project()?;

  let output = run_go_affected(&project.path, &["graph", "--cycles"])?;

  assert!(stdout(&output).contains("Found 1 import cycle(s)"));
  Ok(())
}

#[test]
fn test_graph_cycles_strict_fails() -> Result<()> {
  let project = cyclic_project()?;

  let output = run_go_affected_raw(&project.path, &["graph", "--cycles", "--strict"])?;

  assert_eq!(output.status.code(), Some(3));
  Ok(())
}

#[test]
fn test_affected_terminates_on_cycle() -> Result<()> {
  let project = cyclic_project()?;

  let output = run_go_affected(&project.path, &["affected", "--format", "names", "b/b.go"])?;

  assert_eq!(stdout(&output), "app\n");
  Ok(())
}
