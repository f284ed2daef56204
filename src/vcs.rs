//! Version-control collaborator wrapping the `git` binary
//!
//! The core needs three operations: the list of files the working tree
//! reports as changed, staging a path, and committing with a message. All
//! run blocking in a fixed working directory; a non-zero git exit is fatal
//! and carries stderr.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::VcsError;

/// A working tree the update pipeline commits into
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    dir: PathBuf,
}

impl GitWorkspace {
    /// Wrap the working tree rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The working tree directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files the working tree reports as modified (`git diff --name-only`)
    pub fn changed_files(&self) -> Result<Vec<String>, VcsError> {
        let stdout = self.run(&["diff", "--name-only"])?;
        Ok(stdout.lines().map(str::to_string).collect())
    }

    /// Stage one path (`git add <path>`)
    pub fn stage(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["add", path]).map(|_| ())
    }

    /// Commit staged changes (`git commit --message=<message>`)
    pub fn commit(&self, message: &str) -> Result<(), VcsError> {
        let arg = format!("--message={}", message);
        self.run(&["commit", &arg]).map(|_| ())
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| VcsError::CommandFailed {
                command: args.join(" "),
                dir: self.dir.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command: args.join(" "),
                dir: self.dir.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
