//! Append-Only Interaction Log
//!
//! An ordered record of every message exchanged between agent roles during a
//! run. Append order is causal order: a source always logs before the
//! target's state changes are applied.

use crate::agents::AgentRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a message was sent. Optional metadata on a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Control is handed to another role with a request.
    Delegate,
    /// A delegated request finished and its result is reported back.
    Complete,
    /// Informational, no control transfer.
    Inform,
    /// Something went wrong.
    Error,
}

/// One immutable message in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Strictly increasing within the log's lifetime.
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub source: AgentRole,
    pub target: AgentRole,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    /// Confidence in `[0, 1]`, when the sending role reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Append-only, totally ordered message record.
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    entries: Vec<LogEntry>,
    next_id: u64,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new entry with `id = previous max + 1` and the current wall
    /// clock. The entry is immutable thereafter.
    pub fn append(
        &mut self,
        source: AgentRole,
        target: AgentRole,
        message: impl Into<String>,
        intent: Option<Intent>,
        confidence: Option<f32>,
    ) -> &LogEntry {
        self.next_id += 1;
        self.entries.push(LogEntry {
            id: self.next_id,
            timestamp: Utc::now(),
            source,
            target,
            message: message.into(),
            intent,
            confidence,
        });
        self.entries.last().expect("entry was just pushed")
    }

    /// Empties the log. Only the controller's reset path calls this; ids
    /// restart from 1 so two runs of the same topic produce identical logs.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }

    /// The full ordered sequence. Filtering for display is the consumer's
    /// concern.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut log = InteractionLog::new();
        log.append(
            AgentRole::User,
            AgentRole::Orchestrator,
            "first",
            None,
            None,
        );
        log.append(
            AgentRole::Orchestrator,
            AgentRole::Curriculum,
            "second",
            Some(Intent::Delegate),
            None,
        );
        log.append(
            AgentRole::Curriculum,
            AgentRole::Orchestrator,
            "third",
            Some(Intent::Complete),
            None,
        );

        let ids: Vec<u64> = log.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut log = InteractionLog::new();
        for i in 0..10 {
            log.append(
                AgentRole::System,
                AgentRole::User,
                format!("entry {i}"),
                None,
                None,
            );
        }
        for pair in log.entries().windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn clear_restarts_the_id_sequence() {
        let mut log = InteractionLog::new();
        log.append(AgentRole::User, AgentRole::Orchestrator, "old", None, None);
        log.clear();
        assert!(log.is_empty());

        let entry = log.append(AgentRole::User, AgentRole::Orchestrator, "new", None, None);
        assert_eq!(entry.id, 1);
    }

    #[test]
    fn optional_metadata_is_omitted_from_json() {
        let mut log = InteractionLog::new();
        log.append(AgentRole::User, AgentRole::Orchestrator, "hi", None, None);
        let json = serde_json::to_string(&log.entries()[0]).unwrap();
        assert!(!json.contains("intent"));
        assert!(!json.contains("confidence"));
    }
}
