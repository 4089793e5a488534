//! Orchestration core for the learning orchestra.
//!
//! A learning journey is one run of a dependency-ordered generation chain:
//! curriculum, module content, assessment, and (on demand) graded feedback
//! and tutoring. The [`controller::PipelineController`] drives the chain
//! against an injected [`generator::ContentGenerator`] collaborator and owns
//! the interaction log, the agent status board, and the tab gate consumers
//! read through snapshots.

pub mod agents;
pub mod controller;
pub mod error;
pub mod generator;
pub mod log;
pub mod package;
pub mod stage;
pub mod tabs;

pub use agents::{AgentRole, AgentStatus, AgentStatusRegistry};
pub use controller::{PipelineController, Snapshot};
pub use error::PipelineError;
pub use generator::{ContentGenerator, GeneratorError, LlmContentGenerator, MockContentGenerator};
pub use log::{Intent, InteractionLog, LogEntry};
pub use package::{
    Assessment, ContentSet, Curriculum, Feedback, Module, Question, QuestionFeedback, UserAnswers,
};
pub use stage::Stage;
pub use tabs::{Tab, unlocked_tabs};
