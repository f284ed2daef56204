//! The component ledger and its update pipeline
//!
//! A ledger is the ordered collection of tracked components plus run-wide
//! settings (verification command, commit toggle) and the status journal.
//! Load order doubles as iteration and commit order. `update_all` drives
//! each component through the full six-step sequence before the next one
//! begins:
//!
//! 1. rewrite pinned files (when a newer version exists)
//! 2. journal FILES_UPDATED
//! 3. run the verification command, journal TEST_RUN
//! 4. promote next to current (skipped in dry-run)
//! 5. persist the ledger, journal CONFIG_SAVED
//! 6. commit the ledger file and the component's files, journal
//!    COMMITTED_CHANGES
//!
//! Any fatal error aborts the run; components before the failure stay
//! committed, components after it stay untouched. There is no rollback.

pub mod journal;
pub mod persist;

pub use journal::{StatusJournal, Step};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::component::Component;
use crate::error::{AppError, ConfigError, TestError};
use crate::registry::VersionFetcher;
use crate::testcmd;
use crate::vcs::GitWorkspace;

/// The persisted collection of tracked components plus run settings
#[derive(Debug, Default)]
pub struct Ledger {
    components: Vec<Component>,
    config_file: Option<PathBuf>,
    /// Verification command run after each component's file rewrite
    pub test_command: Option<String>,
    /// Working directory for the verification command; defaults to the
    /// ledger file's directory
    pub test_dir: Option<PathBuf>,
    /// Whether step 6 commits each component to version control
    pub git_commit: bool,
    /// Audit trail of completed lifecycle steps
    pub journal: StatusJournal,
}

impl Ledger {
    /// Create an empty ledger with no backing file
    pub fn new() -> Self {
        Self {
            git_commit: true,
            ..Self::default()
        }
    }

    /// Create a ledger backed by a file (which may not exist yet)
    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: Some(path.into()),
            ..Self::new()
        }
    }

    /// The backing file, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Directory the ledger file lives in; falls back to the current
    /// directory for a file name without a parent.
    pub fn config_dir(&self) -> PathBuf {
        self.config_file
            .as_deref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Components in ledger order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Append a component, returning its index
    pub fn add(&mut self, component: Component) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    /// Replace the component list from the backing file.
    ///
    /// A missing file loads as an empty ledger; a malformed file or an
    /// unknown component type is fatal.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        self.components.clear();

        let Some(path) = self.config_file.clone() else {
            return Ok(());
        };
        if !path.is_file() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        for (name, persisted) in persist::parse_document(&path, &content)? {
            let component = persisted.into_component(&name)?;
            self.add(component);
        }
        Ok(())
    }

    /// Persist the ledger. An explicit destination overrides the backing
    /// file; dry-run suppresses the write entirely.
    pub fn save(&self, destination: Option<&Path>, dry_run: bool) -> Result<(), ConfigError> {
        if dry_run {
            return Ok(());
        }
        let Some(path) = destination.or(self.config_file.as_deref()) else {
            return Ok(());
        };

        let document = persist::render_document(&self.components)?;
        std::fs::write(path, document).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The persisted document as a string (for `--print-yaml`)
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        persist::render_document(&self.components)
    }

    /// Run `check()` on every component in order. One failure is fatal to
    /// the whole run.
    pub fn check_all(
        &mut self,
        fetcher: &dyn VersionFetcher,
    ) -> Result<Vec<(String, bool)>, AppError> {
        let mut results = Vec::with_capacity(self.components.len());
        for component in &mut self.components {
            let newer = component.check(fetcher)?;
            results.push((component.name.clone(), newer));
        }
        Ok(results)
    }

    /// Number of components with a newer version available
    pub fn count_updatable(&mut self, fetcher: &dyn VersionFetcher) -> Result<usize, AppError> {
        Ok(self
            .check_all(fetcher)?
            .iter()
            .filter(|(_, newer)| *newer)
            .count())
    }

    /// Drive every component through the six-step update sequence, in
    /// ledger order, using the next versions found by a prior `check_all`.
    /// Returns the total number of files touched.
    pub fn update_all(&mut self, base_dir: &Path, dry_run: bool) -> Result<usize, AppError> {
        let mut counter = 0;

        for index in 0..self.components.len() {
            let name = self.components[index].name.clone();

            if self.components[index].newer_version_exists() {
                counter += self.components[index].update_files(base_dir, dry_run)?;
            }
            self.journal.record(&name, Step::FilesUpdated);

            if let Some(command) = self.test_command.clone() {
                self.run_tests(&command, &name)?;
                self.journal.record(&name, Step::TestRun);
            }

            if !dry_run {
                self.components[index].promote();
            }
            self.save(None, dry_run)?;
            self.journal.record(&name, Step::ConfigSaved);

            if self.git_commit {
                self.commit_changes(index, dry_run)?;
                self.journal.record(&name, Step::CommittedChanges);
            }
        }

        Ok(counter)
    }

    /// One line per component, "name - current: X next: Y", sorted by the
    /// plain rendered line; the next tag is green when an update is
    /// available, yellow when up to date.
    pub fn summarize(&self) -> Vec<String> {
        let mut lines: Vec<(String, String)> = self
            .components
            .iter()
            .map(|c| {
                let plain = format!(
                    "{} - current: {} next: {}",
                    c.name, c.current_version_tag, c.next_version_tag
                );
                let styled_next = if c.newer_version_exists() {
                    c.next_version_tag.green().to_string()
                } else {
                    c.next_version_tag.yellow().to_string()
                };
                let styled = format!(
                    "{} - current: {} next: {}",
                    c.name, c.current_version_tag, styled_next
                );
                (plain, styled)
            })
            .collect();

        lines.sort_by(|a, b| a.0.cmp(&b.0));
        lines.into_iter().map(|(_, styled)| styled).collect()
    }

    /// Step 3: run the verification command in the configured directory
    fn run_tests(&self, command: &str, component: &str) -> Result<(), AppError> {
        let dir = self
            .test_dir
            .clone()
            .unwrap_or_else(|| self.config_dir());

        let code = testcmd::run(command, &dir)?;
        if code != 0 {
            return Err(TestError::Failed {
                component: component.to_string(),
                command: command.to_string(),
                code,
            }
            .into());
        }
        Ok(())
    }

    /// Step 6: verify the component's files are really modified, then stage
    /// the ledger file plus those files and commit with the component name.
    fn commit_changes(&self, index: usize, dry_run: bool) -> Result<(), AppError> {
        let component = &self.components[index];
        let git = GitWorkspace::new(self.config_dir());

        let changed: HashSet<String> = git.changed_files()?.into_iter().collect();
        let missing: Vec<String> = component
            .files
            .iter()
            .filter(|f| !changed.contains(*f))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(crate::error::VcsError::MissingChanges {
                component: component.name.clone(),
                files: missing,
            }
            .into());
        }

        if !dry_run {
            if let Some(ledger_name) = self
                .config_file
                .as_deref()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str())
            {
                git.stage(ledger_name)?;
            }
            for file in &component.files {
                git.stage(file)?;
            }
            git.commit(&component.name)?;
        }
        Ok(())
    }
}
