//! CLI apply integration tests
//!
//! These tests drive the built `kubitect` binary against configuration
//! files written to a temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn config_yaml(version: &str, workers: &[&str]) -> String {
    let mut yaml = String::from(
        r#"
hosts:
  - name: localhost
    default: true
    mainResourcePoolPath: /var/lib/kubitect
cluster:
  name: local
  network:
    mode: nat
    cidr: 192.168.113.0/24
  nodes:
    master:
      instances:
        - id: "1"
          ip: 192.168.113.10
    worker:
      instances:
"#,
    );
    for (i, id) in workers.iter().enumerate() {
        yaml.push_str(&format!(
            "        - id: {}\n          ip: 192.168.113.{}\n",
            id,
            20 + i
        ));
    }
    yaml.push_str(&format!(
        "kubernetes:\n  version: {}\n  kubespray:\n    version: v2.21.0\n",
        version
    ));
    yaml
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn kubitect(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kubitect"))
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_cli_apply_upgrade_succeeds() {
    // Scenario: version bump applied as an upgrade
    // When: `kubitect apply --applied old.yaml --config new.yaml --action upgrade`
    // Then: the diff is shown and the upgrade is approved

    let dir = TempDir::new().unwrap();
    write(&dir, "old.yaml", &config_yaml("v1.24.0", &["w1"]));
    write(&dir, "new.yaml", &config_yaml("v1.25.0", &["w1"]));

    let output = kubitect(
        &dir,
        &[
            "apply", "--applied", "old.yaml", "--config", "new.yaml", "--action", "upgrade",
            "--auto-approve", "--no-color",
        ],
    );

    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        stderr(&output)
    );
    let out = stdout(&output);
    assert!(out.contains("Following changes have been detected:"));
    assert!(out.contains("v1.24.0"));
    assert!(out.contains("approved for upgrade"));
}

#[test]
fn test_cli_apply_create_with_version_change_fails() {
    // Scenario: version bump applied with the default create action
    // Then: the command fails and explains which path is blocked

    let dir = TempDir::new().unwrap();
    write(&dir, "old.yaml", &config_yaml("v1.24.0", &["w1"]));
    write(&dir, "new.yaml", &config_yaml("v1.25.0", &["w1"]));

    let output = kubitect(
        &dir,
        &["apply", "--applied", "old.yaml", "--config", "new.yaml", "--no-color"],
    );

    assert!(!output.status.success(), "CLI command should fail");
    let err = stderr(&output);
    assert!(err.contains("Error: Configuration file contains errors."));
    assert!(err.contains("kubernetes.version"));
    assert!(err.contains("--action upgrade"));
}

#[test]
fn test_cli_apply_identical_configs_reports_no_changes() {
    let dir = TempDir::new().unwrap();
    let yaml = config_yaml("v1.24.0", &["w1"]);
    write(&dir, "old.yaml", &yaml);
    write(&dir, "new.yaml", &yaml);

    let output = kubitect(
        &dir,
        &["apply", "--applied", "old.yaml", "--config", "new.yaml"],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No changes detected."));
}

#[test]
fn test_cli_apply_scale_lists_removed_nodes() {
    let dir = TempDir::new().unwrap();
    write(&dir, "old.yaml", &config_yaml("v1.24.0", &["w1", "w2"]));
    write(&dir, "new.yaml", &config_yaml("v1.24.0", &["w1"]));

    let output = kubitect(
        &dir,
        &[
            "apply", "--applied", "old.yaml", "--config", "new.yaml", "--action", "scale",
            "--auto-approve",
        ],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("The following nodes will get removed:"));
    assert!(out.contains("- local-worker-w2"));
    assert!(out.contains("1 removed"));
}

#[test]
fn test_cli_apply_without_applied_config_creates() {
    let dir = TempDir::new().unwrap();
    write(&dir, "new.yaml", &config_yaml("v1.25.0", &["w1"]));

    let output = kubitect(&dir, &["apply", "--config", "new.yaml", "--auto-approve"]);

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("approved for creation"));
}

#[test]
fn test_cli_rejects_unknown_action() {
    let dir = TempDir::new().unwrap();
    write(&dir, "new.yaml", &config_yaml("v1.25.0", &["w1"]));

    let output = kubitect(&dir, &["apply", "--config", "new.yaml", "--action", "destroy"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("destroy"));
}

#[test]
fn test_cli_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    let output = kubitect(&dir, &["plan", "--config", "missing.yaml"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.yaml"));
}

#[test]
fn test_cli_plan_json_lists_events() {
    let dir = TempDir::new().unwrap();
    write(&dir, "old.yaml", &config_yaml("v1.24.0", &["w1"]));
    write(&dir, "new.yaml", &config_yaml("v1.24.0", &["w1", "w2"]));

    let output = kubitect(
        &dir,
        &[
            "plan", "--applied", "old.yaml", "--config", "new.yaml", "--action", "scale",
            "--format", "json",
        ],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["action"], "scale");
    assert_eq!(json["events"].as_array().unwrap().len(), 1);
    assert!(json["changes"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["path"]
            .as_str()
            .unwrap()
            .starts_with("cluster.nodes.worker.instances.w2")));
}
