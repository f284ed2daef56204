//! Integration tests for repin
//!
//! These tests drive the real binary. Components pinned to a floating tag
//! ("latest") are frozen and never contact a registry, so every ledger used
//! here is made of frozen components and the tests run without network
//! access.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn repin() -> Command {
    Command::cargo_bin("repin").expect("binary builds")
}

const FROZEN_LEDGER: &str = "\
app:
  component-type: docker-image
  current-version: latest
  docker-repo: acme
widget:
  component-type: pypi
  current-version: latest
";

mod cli_surface {
    use super::*;

    #[test]
    fn test_help() {
        repin()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("check"))
            .stdout(predicate::str::contains("update"))
            .stdout(predicate::str::contains("summary"));
    }

    #[test]
    fn test_version() {
        repin()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("repin"));
    }

    #[test]
    fn test_missing_subcommand_fails() {
        repin().assert().failure();
    }
}

mod check_command {
    use super::*;

    #[test]
    fn test_check_missing_ledger_is_empty() {
        let dir = create_test_dir();
        repin()
            .current_dir(dir.path())
            .args(["check"])
            .assert()
            .success()
            .stdout(predicate::str::contains("0 component(s) can be updated"));
    }

    #[test]
    fn test_check_frozen_components_up_to_date() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        repin()
            .current_dir(dir.path())
            .args(["-q", "check"])
            .assert()
            .success()
            .stdout(predicate::str::contains("0 component(s) can be updated"));
    }

    #[test]
    fn test_check_unknown_component_type_fails() {
        let dir = create_test_dir();
        fs::write(
            dir.path().join("components.yaml"),
            "chart:\n  component-type: helm-chart\n  current-version: 1.0.0\n",
        )
        .unwrap();

        repin()
            .current_dir(dir.path())
            .args(["check"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown component type"));
    }

    #[test]
    fn test_check_malformed_ledger_fails() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), "not: [valid").unwrap();

        repin()
            .current_dir(dir.path())
            .args(["check"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to parse ledger file"));
    }

    #[test]
    fn test_check_explicit_config_path() {
        let dir = create_test_dir();
        let path = dir.path().join("pins.yaml");
        fs::write(&path, FROZEN_LEDGER).unwrap();

        repin()
            .args(["-q", "-c"])
            .arg(&path)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("0 component(s) can be updated"));
    }
}

mod summary_command {
    use super::*;

    #[test]
    fn test_summary_lines_sorted() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        let output = repin()
            .current_dir(dir.path())
            .args(["-q", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains("app - current: latest next: latest"))
            .stdout(predicate::str::contains(
                "widget - current: latest next: latest",
            ))
            .get_output()
            .stdout
            .clone();

        let stdout = String::from_utf8_lossy(&output);
        let app = stdout.find("app - current").unwrap();
        let widget = stdout.find("widget - current").unwrap();
        assert!(app < widget);
    }
}

mod update_command {
    use super::*;

    #[test]
    fn test_update_frozen_ledger_no_commit() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        repin()
            .current_dir(dir.path())
            .args(["-q", "update", "--no-commit"])
            .assert()
            .success()
            .stdout(predicate::str::contains("0 file(s) updated"));

        // the ledger is re-saved with informational next-version fields
        let saved = fs::read_to_string(dir.path().join("components.yaml")).unwrap();
        assert!(saved.contains("next-version: latest"));
    }

    #[test]
    fn test_update_dry_run_writes_nothing() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        repin()
            .current_dir(dir.path())
            .args(["-q", "update", "-n", "--no-commit"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(dry-run)"));

        let saved = fs::read_to_string(dir.path().join("components.yaml")).unwrap();
        assert_eq!(saved, FROZEN_LEDGER);
    }

    #[test]
    fn test_update_runs_test_command() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        repin()
            .current_dir(dir.path())
            .args([
                "-q",
                "update",
                "--no-commit",
                "--test-command",
                "true",
            ])
            .assert()
            .success();
    }

    #[test]
    fn test_update_failing_test_command_aborts() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        repin()
            .current_dir(dir.path())
            .args([
                "-q",
                "update",
                "--no-commit",
                "--test-command",
                "false",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("test command 'false' failed"));
    }

    #[test]
    fn test_update_no_test_skips_test_command() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        repin()
            .current_dir(dir.path())
            .args([
                "-q",
                "update",
                "--no-commit",
                "--no-test",
                "--test-command",
                "false",
            ])
            .assert()
            .success();
    }

    #[test]
    fn test_update_print_yaml() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        repin()
            .current_dir(dir.path())
            .args(["-q", "update", "--no-commit", "-n", "--print-yaml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("component-type: docker-image"))
            .stdout(predicate::str::contains("docker-repo: acme"));
    }

    #[test]
    fn test_update_commit_outside_repo_fails() {
        let dir = create_test_dir();
        fs::write(dir.path().join("components.yaml"), FROZEN_LEDGER).unwrap();

        // git_commit defaults to on; a ledger outside any repository is fatal
        repin()
            .current_dir(dir.path())
            .args(["-q", "update"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("git"));
    }
}
