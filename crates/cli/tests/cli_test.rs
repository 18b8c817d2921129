use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn runner() -> Command {
    Command::cargo_bin("pyinstaller-runner").unwrap()
}

fn project(manifest: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pyproject.toml"), manifest).unwrap();
    dir
}

const MANIFEST: &str = r#"
[project]
name = "app"
version = "1.0.0"

[tool.poetry-pyinstaller-plugin.targets]
cli = { source = "app/main.py", type = "onefile", bundle = true }
gui = "app/gui.py"
"#;

#[test]
fn test_show_prints_version() {
    runner()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pyinstaller-runner "));
}

#[test]
fn test_build_without_targets_succeeds() {
    let dir = project("[project]\nname = \"app\"\nversion = \"1.0.0\"\n");
    runner()
        .args(["build", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "No targets definition found, nothing to build with pyinstaller.",
        ));
    assert!(!dir.path().join(".venv").exists());
}

#[test]
fn test_build_dry_run_prints_commands() {
    let dir = project(MANIFEST);
    runner()
        .args(["build", "--dry-run", "--platform", "linux_x86_64", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--onefile --name cli"))
        .stdout(predicate::str::contains("--onedir --name gui"))
        .stdout(predicate::str::contains("pyinstaller/linux_x86_64"));
    assert!(!dir.path().join(".venv").exists());
}

#[test]
fn test_build_rejects_invalid_target() {
    let dir = project(
        "[project]\nversion = \"1.0.0\"\n[tool.poetry-pyinstaller-plugin.targets]\nbad = { source = \"x.py\", type = \"exe\" }\n",
    );
    runner()
        .args(["build", "--dry-run", "--project"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unsupported distribution type for target 'bad', 'exe' not in ['onefile', 'onedir'].",
        ));
}

#[test]
fn test_missing_manifest() {
    let dir = TempDir::new().unwrap();
    runner()
        .args(["targets", "--project"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No pyproject.toml found"));
}

#[test]
fn test_targets_json() {
    let dir = project(MANIFEST);
    let output = runner()
        .args(["targets", "--json", "--platform", "win_amd64", "--project"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let targets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(targets[0]["prog"], "cli");
    assert_eq!(targets[0]["type"], "onefile");
    assert_eq!(targets[0]["bundle"], true);
    assert_eq!(targets[1]["prog"], "gui");
    assert_eq!(targets[1]["skipped"], false);
}

#[test]
fn test_targets_command_follows_verbosity() {
    let dir = project(MANIFEST);
    let quiet = runner()
        .args(["targets", "--json", "--project"])
        .arg(dir.path())
        .output()
        .unwrap();
    let debug = runner()
        .args(["-vv", "targets", "--json", "--project"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(quiet.status.success() && debug.status.success());

    let quiet: serde_json::Value = serde_json::from_slice(&quiet.stdout).unwrap();
    let debug: serde_json::Value = serde_json::from_slice(&debug.stdout).unwrap();
    let last = |v: &serde_json::Value| v[0]["command"].as_array().unwrap().last().cloned();
    assert_eq!(last(&quiet), Some(serde_json::json!("--log-level=WARN")));
    assert_eq!(last(&debug), Some(serde_json::json!("--log-level=DEBUG")));
    assert!(
        debug[0]["command"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("--debug=all"))
    );
}

#[test]
fn test_targets_listing() {
    let dir = project(MANIFEST);
    runner()
        .args(["targets", "--platform", "linux_x86_64", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("🎯 cli"))
        .stdout(predicate::str::contains("Type: onefile, bundled"))
        .stdout(predicate::str::contains("• name: gui"));
}
