//! Agent Roles and the Live Status Board
//!
//! Every logical role in the orchestra is a fixed enum variant, and the
//! status board is an exhaustive array keyed by that enum. This keeps the
//! set of roles statically accounted for instead of growing a string-keyed
//! map at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named logical role in the pipeline. A role is a responsibility, not a
/// separate process or thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    Orchestrator,
    Curriculum,
    Content,
    Assessment,
    Feedback,
    Tutoring,
    Progress,
    System,
    User,
}

impl AgentRole {
    /// Every known role, in display order.
    pub const ALL: [AgentRole; 9] = [
        AgentRole::Orchestrator,
        AgentRole::Curriculum,
        AgentRole::Content,
        AgentRole::Assessment,
        AgentRole::Feedback,
        AgentRole::Tutoring,
        AgentRole::Progress,
        AgentRole::System,
        AgentRole::User,
    ];

    /// The human-readable name shown on agent cards and in the log.
    pub fn display_name(self) -> &'static str {
        match self {
            AgentRole::Orchestrator => "Central Orchestrator",
            AgentRole::Curriculum => "Curriculum Agent",
            AgentRole::Content => "Content Agent",
            AgentRole::Assessment => "Assessment Agent",
            AgentRole::Feedback => "Feedback Agent",
            AgentRole::Tutoring => "Tutoring Agent",
            AgentRole::Progress => "Progress Tracking Agent",
            AgentRole::System => "System",
            AgentRole::User => "User",
        }
    }

    /// A one-line description of what the role is responsible for.
    pub fn role_description(self) -> &'static str {
        match self {
            AgentRole::Orchestrator => "Coordinates agents to achieve learning goals.",
            AgentRole::Curriculum => "Designs and structures the learning path.",
            AgentRole::Content => "Generates and sources learning materials.",
            AgentRole::Assessment => "Creates quizzes to evaluate understanding.",
            AgentRole::Feedback => "Provides constructive feedback on performance.",
            AgentRole::Tutoring => "Offers on-demand help and clarifies concepts.",
            AgentRole::Progress => "Monitors and visualizes learning progress.",
            AgentRole::System => "Reports infrastructure-level events.",
            AgentRole::User => "The learner driving the session.",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The current status of one agent role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub role: AgentRole,
    /// Free-text status shown on the agent's card. `None` means the role has
    /// not reported anything since the last reset.
    pub status_text: Option<String>,
    /// Whether control currently sits with this role. At most one entry has
    /// this flag set.
    pub is_current: bool,
}

impl AgentStatus {
    fn idle(role: AgentRole) -> Self {
        Self {
            role,
            status_text: None,
            is_current: false,
        }
    }
}

/// Exhaustive status mapping for all known roles.
///
/// Entries are never removed, only overwritten; history lives in the
/// [`InteractionLog`](crate::log::InteractionLog) instead.
#[derive(Debug, Clone)]
pub struct AgentStatusRegistry {
    entries: [AgentStatus; AgentRole::ALL.len()],
}

impl AgentStatusRegistry {
    pub fn new() -> Self {
        Self {
            entries: AgentRole::ALL.map(AgentStatus::idle),
        }
    }

    /// Overwrites the status text for `role`. With `make_current`, the
    /// current-flag moves to `role` and is cleared everywhere else.
    pub fn set_status(&mut self, role: AgentRole, text: impl Into<String>, make_current: bool) {
        if make_current {
            for entry in &mut self.entries {
                entry.is_current = false;
            }
        }
        let entry = &mut self.entries[role.index()];
        entry.status_text = Some(text.into());
        if make_current {
            entry.is_current = true;
        }
    }

    pub fn get(&self, role: AgentRole) -> &AgentStatus {
        &self.entries[role.index()]
    }

    /// The role currently holding control, if any.
    pub fn current(&self) -> Option<AgentRole> {
        self.entries
            .iter()
            .find(|entry| entry.is_current)
            .map(|entry| entry.role)
    }

    /// The full board, in display order.
    pub fn statuses(&self) -> &[AgentStatus] {
        &self.entries
    }

    /// Returns every entry to its idle state. Called only when a new run
    /// begins.
    pub fn reset(&mut self) {
        self.entries = AgentRole::ALL.map(AgentStatus::idle);
    }
}

impl Default for AgentStatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}
