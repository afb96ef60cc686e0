//! Integration tests for `go-affected packages`

use crate::helpers::{TestProject, go_source, run_go_affected, stdout};
use anyhow::Result;

#[test]
fn test_packages_lists_import_paths() -> Result<()> {
  let project = TestProject::services()?;
  project.write_file("testdata/fixture.go", &go_source("fixture", &[]))?;

  let output = run_go_affected(&project.path, &["packages", "--format", "names"])?;

  assert_eq!(stdout(&output), "svc/cmd/api\nsvc/cmd/cron\nsvc/cmd/worker\nsvc/lib\n");
  Ok(())
}

#[test]
fn test_packages_root_package_uses_module_path() -> Result<()> {
  let project = TestProject::new("example.com/tool")?;
  project.write_file("main.go", &go_source("main", &["example.com/tool/internal/util"]))?;
  project.add_package("internal/util", "util", &[])?;

  let output = run_go_affected(&project.path, &["packages", "--format", "json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["module_path"], "example.com/tool");
  let root_pkg = &json["root"]["children"][0];
  assert_eq!(root_pkg["import_path"], "example.com/tool");
  assert_eq!(root_pkg["name"], "main");
  assert_eq!(root_pkg["children"][0]["import_path"], "example.com/tool/internal/util");
  Ok(())
}

#[test]
fn test_packages_respects_config_ignore_dirs() -> Result<()> {
  let project = TestProject::services()?;
  project.write_file("affected.toml", "[scan]\nignore_dirs = [\"testdata\", \"cmd\"]\n")?;

  let output = run_go_affected(&project.path, &["packages", "--format", "names"])?;

  assert_eq!(stdout(&output), "svc/lib\n");
  Ok(())
}
