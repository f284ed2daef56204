//! Tracked components and their update behavior
//!
//! A component is one tracked unit of software — a Docker Hub image or a
//! PyPI package — with a current pinned version and zero or more files that
//! embed that version. This module provides:
//! - The closed `ComponentKind` variant set and the factory over the
//!   persisted type discriminator
//! - Candidate selection: filter pattern (full match), exclusion list,
//!   maximum by version order
//! - The exactly-once file-rewrite contract

use std::path::Path;

use regex::Regex;

use crate::error::{AppError, ConfigError, UpdateError};
use crate::registry::VersionFetcher;
use crate::version::ComparableVersion;

/// Tags that mean "always current"; components pinned to one of these are
/// frozen and never report a newer version.
pub const FLOATING_TAGS: &[&str] = &["latest"];

/// Default filter pattern: admit any candidate tag
pub const FILTER_DEFAULT: &str = ".*";

/// Default Docker Hub namespace (official images)
pub const DOCKER_REPO_DEFAULT: &str = "library";

/// The closed set of component variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// A container image on Docker Hub; pinned as `name:tag`
    DockerImage,
    /// A package on PyPI; pinned as `name==version`
    Pypi,
}

impl ComponentKind {
    /// The persisted type discriminator for this variant
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::DockerImage => "docker-image",
            ComponentKind::Pypi => "pypi",
        }
    }

    /// Parse a persisted type discriminator
    pub fn parse(component: &str, kind: &str) -> Result<Self, ConfigError> {
        match kind {
            "docker-image" => Ok(ComponentKind::DockerImage),
            "pypi" => Ok(ComponentKind::Pypi),
            other => Err(ConfigError::unknown_component_type(component, other)),
        }
    }
}

/// A tracked component
#[derive(Debug, Clone)]
pub struct Component {
    /// Variant discriminator
    pub kind: ComponentKind,
    /// Unique name within a ledger; also the image/package name
    pub name: String,
    /// Docker Hub namespace; only meaningful for the image variant
    pub repository: String,
    /// Pinned version tag as persisted
    pub current_version_tag: String,
    /// Parsed form of the pinned tag
    pub current_version: ComparableVersion,
    /// Best version found by the last check; equals current until a check
    /// finds something newer
    pub next_version: ComparableVersion,
    /// Rendered tag form of `next_version` (prefix applied)
    pub next_version_tag: String,
    /// Prepended when rendering a parsed version back to a tag
    pub prefix: Option<String>,
    /// Raw filter pattern (persisted form)
    pub filter: String,
    /// Compiled, fully anchored filter
    filter_re: Regex,
    /// Relative paths of files embedding the rendered tag
    pub files: Vec<String>,
    /// Tag strings never selected as the next version
    pub exclude_versions: Vec<String>,
}

/// Constructs the correct variant from a persisted type tag.
///
/// `repository` only applies to the image variant; `None` falls back to the
/// Docker Hub official-image namespace.
pub fn create(
    kind: &str,
    name: &str,
    current_version_tag: &str,
    repository: Option<&str>,
) -> Result<Component, ConfigError> {
    let kind = ComponentKind::parse(name, kind)?;
    Ok(Component::new(kind, name, current_version_tag, repository))
}

impl Component {
    /// Create a component with default selection policy
    pub fn new(
        kind: ComponentKind,
        name: &str,
        current_version_tag: &str,
        repository: Option<&str>,
    ) -> Self {
        let current_version = ComparableVersion::parse(current_version_tag);
        Self {
            kind,
            name: name.to_string(),
            repository: repository.unwrap_or(DOCKER_REPO_DEFAULT).to_string(),
            current_version_tag: current_version_tag.to_string(),
            current_version: current_version.clone(),
            next_version: current_version,
            next_version_tag: current_version_tag.to_string(),
            prefix: None,
            filter: FILTER_DEFAULT.to_string(),
            filter_re: anchored(FILTER_DEFAULT).expect("default filter compiles"),
            files: Vec::new(),
            exclude_versions: Vec::new(),
        }
    }

    /// Replace the filter pattern, recompiling the anchored form
    pub fn set_filter(&mut self, pattern: &str) -> Result<(), ConfigError> {
        self.filter_re = anchored(pattern)
            .map_err(|e| ConfigError::invalid_filter(&self.name, pattern, e.to_string()))?;
        self.filter = pattern.to_string();
        Ok(())
    }

    /// A frozen component is pinned to a floating tag and exempt from checks
    pub fn is_frozen(&self) -> bool {
        FLOATING_TAGS.contains(&self.current_version_tag.as_str())
    }

    /// Whether the last check found a strictly newer version. Always false
    /// for frozen components.
    pub fn newer_version_exists(&self) -> bool {
        !self.is_frozen() && self.next_version > self.current_version
    }

    /// Check the registry for a newer version.
    ///
    /// Frozen components short-circuit to `false` without fetching. For the
    /// rest: fetch candidates, keep tags fully matching the filter and not
    /// excluded, parse, and take the maximum as `next_version`. An empty
    /// surviving set is a fatal configuration error.
    pub fn check(&mut self, fetcher: &dyn VersionFetcher) -> Result<bool, AppError> {
        if self.is_frozen() {
            return Ok(false);
        }

        let tags = fetcher.fetch_versions(self)?;
        let best = tags
            .iter()
            .filter(|tag| self.admits(tag))
            .map(|tag| ComparableVersion::parse(tag))
            .max()
            .ok_or_else(|| ConfigError::no_eligible_versions(&self.name, tags.len()))?;

        self.next_version_tag =
            format!("{}{}", self.prefix.as_deref().unwrap_or(""), best);
        self.next_version = best;

        Ok(self.newer_version_exists())
    }

    /// Candidate admission: full filter match and not excluded
    fn admits(&self, tag: &str) -> bool {
        self.filter_re.is_match(tag) && !self.exclude_versions.iter().any(|x| x == tag)
    }

    /// Variant-specific textual form of a version tag as embedded in files
    pub fn rendered_tag(&self, version_tag: &str) -> String {
        match self.kind {
            ComponentKind::DockerImage => format!("{}:{}", self.name, version_tag),
            ComponentKind::Pypi => format!("{}=={}", self.name, version_tag),
        }
    }

    /// Count occurrences of the rendered current tag in `text`
    pub fn count_occurrences(&self, text: &str) -> usize {
        text.matches(&self.rendered_tag(&self.current_version_tag))
            .count()
    }

    /// Replace the rendered current tag with the rendered next tag
    pub fn apply_update(&self, text: &str) -> String {
        text.replace(
            &self.rendered_tag(&self.current_version_tag),
            &self.rendered_tag(&self.next_version_tag),
        )
    }

    /// Rewrite every target file under `base_dir`, returning the number of
    /// files processed.
    ///
    /// More than one occurrence of the rendered current tag in a file is an
    /// ambiguity error; a replacement that leaves the content unchanged is a
    /// no-op error. Both are checked in dry-run too; dry-run only suppresses
    /// the write.
    pub fn update_files(&self, base_dir: &Path, dry_run: bool) -> Result<usize, AppError> {
        let mut counter = 0;

        for file_name in &self.files {
            let path = base_dir.join(file_name);
            let orig_content = std::fs::read_to_string(&path).map_err(|e| {
                UpdateError::ReadError {
                    path: path.clone(),
                    source: e,
                }
            })?;

            let occurrences = self.count_occurrences(&orig_content);
            if occurrences > 1 {
                return Err(UpdateError::AmbiguousTag {
                    component: self.name.clone(),
                    tag: self.rendered_tag(&self.current_version_tag),
                    path,
                    count: occurrences,
                }
                .into());
            }

            let new_content = self.apply_update(&orig_content);
            if new_content == orig_content {
                return Err(UpdateError::TagNotFound {
                    component: self.name.clone(),
                    path,
                    current: self.rendered_tag(&self.current_version_tag),
                    next: self.rendered_tag(&self.next_version_tag),
                }
                .into());
            }

            if !dry_run {
                std::fs::write(&path, new_content).map_err(|e| UpdateError::WriteError {
                    path: path.clone(),
                    source: e,
                })?;
            }
            counter += 1;
        }

        Ok(counter)
    }

    /// Adopt the checked next version as current (step 4 of the pipeline)
    pub fn promote(&mut self) {
        self.current_version = self.next_version.clone();
        self.current_version_tag = self.next_version_tag.clone();
    }
}

/// Compile a pattern anchored for full-string matching
fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}
