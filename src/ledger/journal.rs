//! Per-component status journal
//!
//! Append-only audit trail of which lifecycle steps completed during an
//! update run. The update algorithm never reads it back; it exists so an
//! operator can see how far a component got before a fatal error.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Lifecycle steps in the order a successful update visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    FilesUpdated,
    TestRun,
    ConfigSaved,
    CommittedChanges,
}

impl Step {
    /// Journal label for this step
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::FilesUpdated => "FILES_UPDATED",
            Step::TestRun => "TEST_RUN",
            Step::ConfigSaved => "CONFIG_SAVED",
            Step::CommittedChanges => "COMMITTED_CHANGES",
        }
    }
}

/// Mapping from component name to completed steps with timestamps
#[derive(Debug, Clone, Default)]
pub struct StatusJournal {
    entries: BTreeMap<String, BTreeMap<Step, DateTime<Utc>>>,
}

impl StatusJournal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed step for a component (overwrites on repeat)
    pub fn record(&mut self, component: &str, step: Step) {
        self.entries
            .entry(component.to_string())
            .or_default()
            .insert(step, Utc::now());
    }

    /// Completed steps for a component, in lifecycle order
    pub fn steps_for(&self, component: &str) -> Vec<Step> {
        self.entries
            .get(component)
            .map(|steps| steps.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Timestamp of a recorded step, if present
    pub fn recorded_at(&self, component: &str, step: Step) -> Option<DateTime<Utc>> {
        self.entries.get(component).and_then(|s| s.get(&step)).copied()
    }

    /// Whether anything has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate components and their recorded steps
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&String, &BTreeMap<Step, DateTime<Utc>>)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_labels() {
        assert_eq!(Step::FilesUpdated.as_str(), "FILES_UPDATED");
        assert_eq!(Step::TestRun.as_str(), "TEST_RUN");
        assert_eq!(Step::ConfigSaved.as_str(), "CONFIG_SAVED");
        assert_eq!(Step::CommittedChanges.as_str(), "COMMITTED_CHANGES");
    }

    #[test]
    fn test_step_ordering_matches_lifecycle() {
        assert!(Step::FilesUpdated < Step::TestRun);
        assert!(Step::TestRun < Step::ConfigSaved);
        assert!(Step::ConfigSaved < Step::CommittedChanges);
    }

    #[test]
    fn test_record_keyed_by_component_name() {
        let mut journal = StatusJournal::new();
        journal.record("widget", Step::FilesUpdated);
        journal.record("app", Step::FilesUpdated);
        journal.record("widget", Step::ConfigSaved);

        assert_eq!(
            journal.steps_for("widget"),
            vec![Step::FilesUpdated, Step::ConfigSaved]
        );
        assert_eq!(journal.steps_for("app"), vec![Step::FilesUpdated]);
        assert!(journal.steps_for("unknown").is_empty());
    }

    #[test]
    fn test_record_overwrites_timestamp() {
        let mut journal = StatusJournal::new();
        journal.record("widget", Step::TestRun);
        let first = journal.recorded_at("widget", Step::TestRun).unwrap();
        journal.record("widget", Step::TestRun);
        let second = journal.recorded_at("widget", Step::TestRun).unwrap();
        assert!(second >= first);
        assert_eq!(journal.steps_for("widget").len(), 1);
    }

    #[test]
    fn test_empty_journal() {
        let journal = StatusJournal::new();
        assert!(journal.is_empty());
        assert!(journal.recorded_at("widget", Step::FilesUpdated).is_none());
    }
}
