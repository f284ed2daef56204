//! repin - pinned component version updater library
//!
//! This library provides the core functionality for tracking the latest
//! published version of named components and updating the files that pin
//! them:
//! - Docker Hub container images (pinned as `name:tag`)
//! - PyPI packages (pinned as `name==version`)

pub mod cli;
pub mod component;
pub mod error;
pub mod ledger;
pub mod progress;
pub mod registry;
pub mod testcmd;
pub mod vcs;
pub mod version;
