//! Pipeline Stage Enumeration
//!
//! One position per step of the generation chain. The derived ordering
//! follows the main chain (`Idle` through `Feedback`); `Failed` sorts last
//! and is special-cased wherever ordering alone would mislead (notably the
//! tab gate).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Curriculum,
    Content,
    Assessment,
    Ready,
    Feedback,
    Failed,
}

impl Stage {
    /// Whether the main chain has settled for the current run. `Ready` is the
    /// terminal success state of the chain; `Feedback` and `Failed` are the
    /// two states reachable beyond it.
    pub fn is_settled(self) -> bool {
        matches!(self, Stage::Ready | Stage::Feedback | Stage::Failed)
    }

    /// Whether the assessment has been generated and graded results may be
    /// requested.
    pub fn accepts_answers(self) -> bool {
        matches!(self, Stage::Ready | Stage::Feedback)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Curriculum => "curriculum",
            Stage::Content => "content",
            Stage::Assessment => "assessment",
            Stage::Ready => "ready",
            Stage::Feedback => "feedback",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}
