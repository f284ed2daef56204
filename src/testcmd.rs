//! External verification-command runner
//!
//! Runs the configured test command in a working directory and reports its
//! exit status. The command string is whitespace-split into program and
//! arguments; no shell is injected (wrap in `sh -c '...'` explicitly when
//! shell syntax is needed).

use std::path::Path;
use std::process::Command;

use crate::error::TestError;

/// Run `command` in `working_dir`, returning its exit code.
///
/// A missing exit code (killed by signal) is reported as -1.
pub fn run(command: &str, working_dir: &Path) -> Result<i32, TestError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or(TestError::EmptyCommand)?;

    let status = Command::new(program)
        .args(parts)
        .current_dir(working_dir)
        .status()
        .map_err(|e| TestError::SpawnError {
            command: command.to_string(),
            message: e.to_string(),
        })?;

    Ok(status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_successful_command() {
        let dir = TempDir::new().unwrap();
        assert_eq!(run("true", dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_failing_command() {
        let dir = TempDir::new().unwrap();
        assert_ne!(run("false", dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_command_with_arguments() {
        let dir = TempDir::new().unwrap();
        assert_eq!(run("ls -a", dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_runs_in_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        assert_eq!(run("ls marker", dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_empty_command() {
        let dir = TempDir::new().unwrap();
        let err = run("   ", dir.path()).unwrap_err();
        assert!(matches!(err, TestError::EmptyCommand));
    }

    #[test]
    fn test_unknown_program() {
        let dir = TempDir::new().unwrap();
        let err = run("definitely-not-a-real-program", dir.path()).unwrap_err();
        assert!(matches!(err, TestError::SpawnError { .. }));
    }
}
