//! Pipeline Controller
//!
//! Drives the curriculum → content → assessment generation chain in
//! dependency order, keeps the interaction log and agent status board
//! current, and computes the tab gate for consumers. One logical run is live
//! at a time; starting a new run supersedes the previous one and any of its
//! late results are discarded by run-id check.

use crate::agents::{AgentRole, AgentStatus, AgentStatusRegistry};
use crate::error::PipelineError;
use crate::generator::ContentGenerator;
use crate::log::{Intent, InteractionLog, LogEntry};
use crate::package::{Assessment, ContentSet, Curriculum, Feedback, UserAnswers};
use crate::stage::Stage;
use crate::tabs::{Tab, unlocked_tabs};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A read-only view of the controller at one instant. Consumers never mutate
/// pipeline state through a snapshot; all mutation goes through controller
/// commands.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub stage: Stage,
    pub is_busy: bool,
    pub topic: Option<String>,
    pub agent_statuses: Vec<AgentStatus>,
    pub log: Vec<LogEntry>,
    pub curriculum: Option<Curriculum>,
    pub content: Option<ContentSet>,
    /// Redacted until feedback has been computed: no correct-answer metadata
    /// crosses the read path before grading.
    pub assessment: Option<Assessment>,
    pub feedback: Option<Feedback>,
    pub enabled_tabs: BTreeSet<Tab>,
}

/// Everything owned by the controller for the lifetime of a run.
struct PipelineState {
    run_id: u64,
    busy: bool,
    stage: Stage,
    topic: Option<String>,
    registry: AgentStatusRegistry,
    log: InteractionLog,
    curriculum: Option<Curriculum>,
    content: Option<ContentSet>,
    assessment: Option<Assessment>,
    feedback: Option<Feedback>,
}

impl PipelineState {
    fn new() -> Self {
        let mut registry = AgentStatusRegistry::new();
        registry.set_status(AgentRole::Orchestrator, "Idle", true);
        Self {
            run_id: 0,
            busy: false,
            stage: Stage::Idle,
            topic: None,
            registry,
            log: InteractionLog::new(),
            curriculum: None,
            content: None,
            assessment: None,
            feedback: None,
        }
    }

    /// Clears every per-run artifact. Only `start` calls this.
    fn reset_for(&mut self, topic: &str) {
        self.busy = true;
        self.stage = Stage::Idle;
        self.topic = Some(topic.to_string());
        self.registry.reset();
        self.log.clear();
        self.curriculum = None;
        self.content = None;
        self.assessment = None;
        self.feedback = None;
    }

    fn snapshot(&self) -> Snapshot {
        let assessment = match (&self.assessment, &self.feedback) {
            (Some(assessment), Some(_)) => Some(assessment.clone()),
            (Some(assessment), None) => Some(assessment.redacted()),
            (None, _) => None,
        };
        Snapshot {
            stage: self.stage,
            is_busy: self.busy,
            topic: self.topic.clone(),
            agent_statuses: self.registry.statuses().to_vec(),
            log: self.log.entries().to_vec(),
            curriculum: self.curriculum.clone(),
            content: self.content.clone(),
            assessment,
            feedback: self.feedback.clone(),
            enabled_tabs: unlocked_tabs(self.stage),
        }
    }
}

/// The orchestration core. Construct one per journey surface and share it
/// behind an [`Arc`].
///
/// The generator collaborator is injected; the controller holds no ambient
/// client or key state. All state lives behind a single async mutex and is
/// only touched between awaits by the task driving the current command, so
/// the log's append order matches the causal order of the pipeline.
pub struct PipelineController {
    generator: Arc<dyn ContentGenerator>,
    state: Mutex<PipelineState>,
}

impl PipelineController {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            state: Mutex::new(PipelineState::new()),
        }
    }

    /// Begins a new learning journey, superseding any run still in flight.
    ///
    /// Resets all per-run state, then drives curriculum, content, and
    /// assessment generation to completion. Settles in `Ready` on success or
    /// `Failed` on the first stage error; never stops silently in between.
    /// If a newer `start` supersedes this one mid-chain, the chain stops
    /// without touching the newer run's state and the current snapshot is
    /// returned.
    pub async fn start(&self, topic: &str) -> Result<Snapshot, PipelineError> {
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return Err(PipelineError::Validation(
                "topic must not be empty".to_string(),
            ));
        }

        let run = {
            let mut state = self.state.lock().await;
            state.run_id += 1;
            let run = state.run_id;
            state.reset_for(&topic);
            state.log.append(
                AgentRole::User,
                AgentRole::Orchestrator,
                format!("Received learning request: \"{topic}\""),
                Some(Intent::Inform),
                None,
            );
            state
                .registry
                .set_status(AgentRole::Orchestrator, "Planning learning path...", true);
            state.stage = Stage::Curriculum;
            state.log.append(
                AgentRole::Orchestrator,
                AgentRole::Curriculum,
                "Please generate a curriculum for the topic.",
                Some(Intent::Delegate),
                None,
            );
            state
                .registry
                .set_status(AgentRole::Curriculum, "Generating curriculum...", true);
            run
        };
        info!(run, %topic, "starting learning journey");

        // Stage: curriculum.
        let curriculum = match self.generator.generate_curriculum(&topic).await {
            Ok(curriculum) => curriculum,
            Err(err) => return self.fail(run, err.into()).await,
        };
        if let Err(message) = curriculum.validate() {
            return self.fail(run, PipelineError::Validation(message)).await;
        }
        {
            let mut state = self.state.lock().await;
            if state.run_id != run {
                debug!(run, "discarding curriculum result for superseded run");
                return Ok(state.snapshot());
            }
            state.log.append(
                AgentRole::Curriculum,
                AgentRole::Orchestrator,
                format!(
                    "Curriculum generated with {} modules.",
                    curriculum.modules.len()
                ),
                Some(Intent::Complete),
                None,
            );
            state.registry.set_status(AgentRole::Curriculum, "Done", false);
            state
                .registry
                .set_status(AgentRole::Orchestrator, "Reviewing curriculum...", true);
            state.curriculum = Some(curriculum.clone());
            state.stage = Stage::Content;
            state.log.append(
                AgentRole::Orchestrator,
                AgentRole::Content,
                "Curriculum approved. Please generate content for all modules.",
                Some(Intent::Delegate),
                None,
            );
            state
                .registry
                .set_status(AgentRole::Content, "Generating module content...", true);
        }

        // Stage: content. All-or-nothing: a partial set never reaches state.
        let content = match self.generator.generate_content(&curriculum).await {
            Ok(content) => content,
            Err(err) => return self.fail(run, err.into()).await,
        };
        if let Err(message) = content.validate_against(&curriculum) {
            return self.fail(run, PipelineError::Validation(message)).await;
        }
        {
            let mut state = self.state.lock().await;
            if state.run_id != run {
                debug!(run, "discarding content result for superseded run");
                return Ok(state.snapshot());
            }
            state.log.append(
                AgentRole::Content,
                AgentRole::Orchestrator,
                format!("Content for all {} modules has been created.", content.len()),
                Some(Intent::Complete),
                None,
            );
            state.registry.set_status(AgentRole::Content, "Done", false);
            state.content = Some(content);
            state.stage = Stage::Assessment;
            state.log.append(
                AgentRole::Orchestrator,
                AgentRole::Assessment,
                "Content generation complete. Please create an assessment.",
                Some(Intent::Delegate),
                None,
            );
            state
                .registry
                .set_status(AgentRole::Assessment, "Creating assessment quiz...", true);
        }

        // Stage: assessment.
        let assessment = match self.generator.generate_assessment(&curriculum).await {
            Ok(assessment) => assessment,
            Err(err) => return self.fail(run, err.into()).await,
        };
        if let Err(message) = assessment.validate() {
            return self.fail(run, PipelineError::Validation(message)).await;
        }
        let mut state = self.state.lock().await;
        if state.run_id != run {
            debug!(run, "discarding assessment result for superseded run");
            return Ok(state.snapshot());
        }
        state.log.append(
            AgentRole::Assessment,
            AgentRole::Orchestrator,
            "Assessment created successfully.",
            Some(Intent::Complete),
            None,
        );
        state.registry.set_status(AgentRole::Assessment, "Done", false);
        state.assessment = Some(assessment);
        state.stage = Stage::Ready;
        state.log.append(
            AgentRole::Orchestrator,
            AgentRole::User,
            "Your personalized learning package is ready!",
            Some(Intent::Inform),
            None,
        );
        state.registry.set_status(AgentRole::Orchestrator, "Idle", true);
        state.busy = false;
        info!(run, "learning package ready");
        Ok(state.snapshot())
    }

    /// Grades a complete set of answers against the current assessment.
    ///
    /// Requires the chain to have settled in `Ready` (resubmission from
    /// `Feedback` is allowed). Incomplete answers are rejected without any
    /// state change; a second command while one is in flight is rejected
    /// with [`PipelineError::Busy`].
    pub async fn submit_assessment(
        &self,
        answers: &UserAnswers,
    ) -> Result<Snapshot, PipelineError> {
        let (run, assessment) = {
            let mut state = self.state.lock().await;
            if state.busy {
                return Err(PipelineError::Busy);
            }
            if !state.stage.accepts_answers() {
                return Err(PipelineError::Validation(
                    "no completed assessment to grade".to_string(),
                ));
            }
            let assessment = state
                .assessment
                .clone()
                .ok_or_else(|| PipelineError::Validation("assessment missing".to_string()))?;
            let expected = assessment.questions.len();
            let missing = assessment.unanswered(answers);
            if !missing.is_empty() {
                return Err(PipelineError::IncompleteAnswers {
                    answered: expected - missing.len(),
                    expected,
                });
            }
            state.busy = true;
            state.log.append(
                AgentRole::User,
                AgentRole::Feedback,
                format!("Submitted answers for \"{}\".", assessment.title),
                Some(Intent::Delegate),
                None,
            );
            state
                .registry
                .set_status(AgentRole::Feedback, "Evaluating answers...", true);
            (state.run_id, assessment)
        };

        let feedback = match self.generator.get_feedback(&assessment, answers).await {
            Ok(feedback) => feedback,
            Err(err) => return self.fail(run, err.into()).await,
        };
        if let Err(message) = feedback.validate_against(&assessment) {
            return self.fail(run, PipelineError::Validation(message)).await;
        }

        let mut state = self.state.lock().await;
        if state.run_id != run {
            debug!(run, "discarding feedback result for superseded run");
            return Ok(state.snapshot());
        }
        state.log.append(
            AgentRole::Feedback,
            AgentRole::User,
            format!("Feedback ready: scored {:.0}%.", feedback.overall_score),
            Some(Intent::Complete),
            Some((feedback.overall_score / 100.0).clamp(0.0, 1.0)),
        );
        state.registry.set_status(AgentRole::Feedback, "Done", false);
        state.registry.set_status(AgentRole::Orchestrator, "Idle", true);
        state.feedback = Some(feedback);
        state.stage = Stage::Feedback;
        state.busy = false;
        Ok(state.snapshot())
    }

    /// Answers a learner question grounded in the collected module content.
    ///
    /// Tutoring is not a stage of the main chain: neither success nor
    /// failure here moves `Stage`. A failure is logged and returned to the
    /// caller, and the pipeline stays where it was.
    pub async fn ask_tutor(
        &self,
        question: &str,
        module: Option<&str>,
    ) -> Result<String, PipelineError> {
        let question = question.trim().to_string();
        if question.is_empty() {
            return Err(PipelineError::Validation(
                "question must not be empty".to_string(),
            ));
        }

        let (run, context) = {
            let mut state = self.state.lock().await;
            if state.busy {
                return Err(PipelineError::Busy);
            }
            let content = state.content.as_ref().ok_or_else(|| {
                PipelineError::Validation("no module content is available yet".to_string())
            })?;
            let context = match module {
                Some(title) => content
                    .get(title)
                    .ok_or_else(|| PipelineError::Validation(format!("unknown module: \"{title}\"")))?
                    .to_string(),
                None => {
                    let mut all = String::new();
                    for (title, body) in content.iter() {
                        all.push_str(&format!("## {title}\n\n{body}\n\n"));
                    }
                    all
                }
            };
            state.busy = true;
            state.log.append(
                AgentRole::User,
                AgentRole::Tutoring,
                format!("Asked: \"{question}\""),
                Some(Intent::Delegate),
                None,
            );
            state
                .registry
                .set_status(AgentRole::Tutoring, "Answering question...", true);
            (state.run_id, context)
        };

        match self.generator.get_tutor_response(&question, &context).await {
            Ok(reply) => {
                let mut state = self.state.lock().await;
                if state.run_id == run {
                    state.log.append(
                        AgentRole::Tutoring,
                        AgentRole::User,
                        "Answered the question.",
                        Some(Intent::Complete),
                        None,
                    );
                    state.registry.set_status(AgentRole::Tutoring, "Done", false);
                    state.registry.set_status(AgentRole::Orchestrator, "Idle", true);
                    state.busy = false;
                }
                Ok(reply)
            }
            Err(err) => {
                let mut state = self.state.lock().await;
                if state.run_id == run {
                    warn!(%err, "tutoring request failed");
                    state.log.append(
                        AgentRole::System,
                        AgentRole::User,
                        format!("Tutoring request failed: {err}"),
                        Some(Intent::Error),
                        None,
                    );
                    state.registry.set_status(AgentRole::Tutoring, "Error", false);
                    state.registry.set_status(AgentRole::Orchestrator, "Idle", true);
                    state.busy = false;
                }
                Err(err.into())
            }
        }
    }

    /// A point-in-time view of the whole pipeline. Pure read.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot()
    }

    /// Moves the current run to `Failed` and halts the chain. Skipped
    /// entirely when the failing chain has already been superseded.
    async fn fail(&self, run: u64, err: PipelineError) -> Result<Snapshot, PipelineError> {
        let mut state = self.state.lock().await;
        if state.run_id != run {
            debug!(run, "discarding failure from superseded run");
            return Ok(state.snapshot());
        }
        warn!(run, %err, "pipeline stage failed");
        state.stage = Stage::Failed;
        state.busy = false;
        state.log.append(
            AgentRole::System,
            AgentRole::User,
            format!("An error occurred while generating the learning package: {err}"),
            Some(Intent::Error),
            None,
        );
        state.registry.set_status(AgentRole::Orchestrator, "Error", true);
        Err(err)
    }
}
