//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: ledger definition and selection-policy problems
//! - UpdateError: file-rewrite safety violations
//! - RegistryError: registry/package-index communication failures
//! - TestError: verification command failures
//! - VcsError: version-control collaborator failures
//!
//! Every variant is fatal; the core has no retry or partial-recovery mode.
//! Dry-run changes what is written, never what is checked, so a dry-run can
//! surface any of these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Ledger configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// File rewrite related errors
    #[error(transparent)]
    Update(#[from] UpdateError),

    /// Registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Verification command related errors
    #[error(transparent)]
    Test(#[from] TestError),

    /// Version control related errors
    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Errors in the ledger definition or a component's selection policy
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Persisted component-type discriminator is not a known variant
    #[error("unknown component type '{kind}' for component '{component}'")]
    UnknownComponentType { component: String, kind: String },

    /// Filter pattern does not compile
    #[error("invalid filter pattern '{pattern}' for component '{component}': {message}")]
    InvalidFilter {
        component: String,
        pattern: String,
        message: String,
    },

    /// Filtering and exclusion left no candidate to pick a maximum from
    #[error(
        "no eligible versions for component '{component}': \
         none of the {fetched} fetched tag(s) survived the filter and exclusion list"
    )]
    NoEligibleVersions { component: String, fetched: usize },

    /// Failed to read the ledger file
    #[error("failed to read ledger file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the ledger file
    #[error("failed to write ledger file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error in the ledger file
    #[error("failed to parse ledger file {path}: {message}")]
    YamlParseError { path: PathBuf, message: String },

    /// YAML serialization error while saving the ledger
    #[error("failed to serialize ledger: {message}")]
    SerializeError { message: String },
}

/// Errors raised by the exactly-once file-rewrite contract
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The rendered current tag occurs more than once in a target file
    #[error(
        "ambiguous target for component '{component}': '{tag}' occurs {count} times in {path}, \
         cannot safely determine which occurrence is the pinned version"
    )]
    AmbiguousTag {
        component: String,
        tag: String,
        path: PathBuf,
        count: usize,
    },

    /// Replacement produced content identical to the original
    #[error(
        "no replacement done for component '{component}' in {path}: \
         current tag '{current}' not found (next would be '{next}')"
    )]
    TagNotFound {
        component: String,
        path: PathBuf,
        current: String,
        next: String,
    },

    /// Failed to read a target file
    #[error("failed to read target file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a target file
    #[error("failed to write target file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Network request failed
    #[error("failed to fetch '{component}' from {registry}: {message}")]
    NetworkError {
        component: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{component}': {message}")]
    InvalidResponse {
        component: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{component}' from {registry}")]
    Timeout { component: String, registry: String },

    /// Authentication error
    #[error("authentication failed for {registry}: {message}")]
    AuthenticationError { registry: String, message: String },
}

/// Errors from the external verification command
#[derive(Error, Debug)]
pub enum TestError {
    /// The command could not be started
    #[error("failed to run test command '{command}': {message}")]
    SpawnError { command: String, message: String },

    /// The command exited non-zero
    #[error("test command '{command}' failed for component '{component}' (exit code {code})")]
    Failed {
        component: String,
        command: String,
        code: i32,
    },

    /// The configured command string is empty
    #[error("test command is empty")]
    EmptyCommand,
}

/// Errors from the version-control collaborator
#[derive(Error, Debug)]
pub enum VcsError {
    /// A git invocation failed
    #[error("git {command} failed in {dir}: {stderr}")]
    CommandFailed {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// The update claimed to touch files git does not see as modified
    #[error(
        "consistency error for component '{component}': \
         file(s) {files:?} are not among the files git reports as changed"
    )]
    MissingChanges {
        component: String,
        files: Vec<String>,
    },
}

impl ConfigError {
    /// Creates a new UnknownComponentType error
    pub fn unknown_component_type(
        component: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        ConfigError::UnknownComponentType {
            component: component.into(),
            kind: kind.into(),
        }
    }

    /// Creates a new InvalidFilter error
    pub fn invalid_filter(
        component: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidFilter {
            component: component.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a new NoEligibleVersions error
    pub fn no_eligible_versions(component: impl Into<String>, fetched: usize) -> Self {
        ConfigError::NoEligibleVersions {
            component: component.into(),
            fetched,
        }
    }

    /// Creates a new YamlParseError
    pub fn yaml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::YamlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new NetworkError
    pub fn network_error(
        component: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            component: component.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(component: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            component: component.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        component: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            component: component.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }
}
