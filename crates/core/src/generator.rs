//! Content Generation Collaborator
//!
//! This module defines the contract the pipeline controller consumes for
//! every generative step, an implementation backed by any OpenAI-compatible
//! chat API, and a deterministic mock for development and tests.
//!
//! The abstraction keeps the controller free of provider concerns: prompt
//! construction, structured-output schemas, per-module fan-out, timeouts and
//! backoff all belong to the implementations behind this trait.

use crate::package::{
    Assessment, ContentSet, Curriculum, Feedback, Module, Question, QuestionFeedback, UserAnswers,
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a generation call can fail.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The request itself failed (network, service, quota).
    #[error("backend request failed: {0}")]
    Backend(String),
    /// The service answered, but not with a usable payload.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<OpenAIError> for GeneratorError {
    fn from(err: OpenAIError) -> Self {
        GeneratorError::Backend(err.to_string())
    }
}

/// Defines the contract for any service that can generate learning material.
///
/// One method per generation step of the pipeline. Implementations must be
/// safe to call concurrently; the controller may issue a superseding run
/// while an older call is still in flight.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Breaks a learning topic down into a titled, ordered curriculum.
    async fn generate_curriculum(&self, topic: &str) -> Result<Curriculum, GeneratorError>;

    /// Produces markdown content for every module of the curriculum. The
    /// returned set must be keyed by the exact module titles; partial
    /// results are not acceptable.
    async fn generate_content(&self, curriculum: &Curriculum)
    -> Result<ContentSet, GeneratorError>;

    /// Creates a multiple-choice quiz covering the curriculum.
    async fn generate_assessment(
        &self,
        curriculum: &Curriculum,
    ) -> Result<Assessment, GeneratorError>;

    /// Grades a full set of answers against an assessment.
    async fn get_feedback(
        &self,
        assessment: &Assessment,
        answers: &UserAnswers,
    ) -> Result<Feedback, GeneratorError>;

    /// Answers a free-form question grounded in the given course content.
    async fn get_tutor_response(
        &self,
        question: &str,
        context: &str,
    ) -> Result<String, GeneratorError>;
}

/// Wire shape for a single module's generated content.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct ModuleContentPayload {
    /// Detailed learning content for the module in Markdown format.
    markdown_content: String,
}

const TUTOR_INSTRUCTIONS: &str =
    "You are a helpful and friendly AI tutor for a personalized learning platform.";

/// A [`ContentGenerator`] backed by any OpenAI-compatible chat API.
///
/// Structured steps constrain the model with a JSON schema derived from the
/// target type, then parse the completion text back into that type. The
/// per-module content fan-out happens here, sequentially, so a failed module
/// fails the whole call and no partial set ever escapes.
pub struct LlmContentGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmContentGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration (key, base URL) for the provider.
    /// * `model` - Model identifier to use for generation (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// One structured chat completion: schema-constrained request, parsed
    /// response.
    async fn structured<T: DeserializeOwned + JsonSchema>(
        &self,
        schema_name: &str,
        instructions: &str,
        prompt: String,
    ) -> Result<T, GeneratorError> {
        let schema = serde_json::to_value(schemars::schema_for!(T))
            .map_err(|e| GeneratorError::Malformed(format!("schema serialization: {e}")))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: schema_name.to_string(),
                    schema: Some(schema),
                    strict: Some(false),
                },
            })
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(instructions)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or_else(|| GeneratorError::Malformed("no content in completion".to_string()))?;

        debug!(schema = schema_name, bytes = content.len(), "parsed structured completion");
        serde_json::from_str(content)
            .map_err(|e| GeneratorError::Malformed(format!("{schema_name}: {e}")))
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate_curriculum(&self, topic: &str) -> Result<Curriculum, GeneratorError> {
        self.structured(
            "curriculum",
            "You are a curriculum designer for a personalized learning platform.",
            format!(
                "Generate a detailed curriculum for the topic: \"{topic}\". The curriculum \
                 should have a clear title and a list of modules, where each module has a \
                 title and a short description. Use between 3 and 7 modules."
            ),
        )
        .await
    }

    async fn generate_content(
        &self,
        curriculum: &Curriculum,
    ) -> Result<ContentSet, GeneratorError> {
        let mut content = ContentSet::new();
        for module in &curriculum.modules {
            let payload: ModuleContentPayload = self
                .structured(
                    "module_content",
                    "You are a teaching-content author for a personalized learning platform.",
                    format!(
                        "Generate detailed educational content in Markdown format for the \
                         module titled \"{}\" with the description \"{}\". The overall course \
                         is \"{}\". The content should be well-structured and easy to \
                         understand, with headings, lists, and code blocks where appropriate.",
                        module.title, module.description, curriculum.title
                    ),
                )
                .await?;
            content.insert(&module.title, payload.markdown_content);
        }
        Ok(content)
    }

    async fn generate_assessment(
        &self,
        curriculum: &Curriculum,
    ) -> Result<Assessment, GeneratorError> {
        let curriculum_json = serde_json::to_string(curriculum)
            .map_err(|e| GeneratorError::Malformed(e.to_string()))?;
        self.structured(
            "assessment",
            "You are an assessment author for a personalized learning platform.",
            format!(
                "Based on the following curriculum, create a multiple-choice quiz with 5 \
                 questions to assess understanding. Each question should have 4 options and \
                 mark the index of the correct option. Curriculum: {curriculum_json}"
            ),
        )
        .await
    }

    async fn get_feedback(
        &self,
        assessment: &Assessment,
        answers: &UserAnswers,
    ) -> Result<Feedback, GeneratorError> {
        let assessment_json = serde_json::to_string(assessment)
            .map_err(|e| GeneratorError::Malformed(e.to_string()))?;
        let answers_json = serde_json::to_string(answers)
            .map_err(|e| GeneratorError::Malformed(e.to_string()))?;
        self.structured(
            "feedback",
            "You are a supportive grader for a personalized learning platform.",
            format!(
                "Grade the learner's answers against this quiz. For every question report \
                 whether the chosen option was correct, the text of the correct option, a \
                 short explanation, and a study suggestion when the answer was wrong. Also \
                 report an overall score from 0 to 100. Quiz: {assessment_json} Answers by \
                 question index: {answers_json}"
            ),
        )
        .await
    }

    async fn get_tutor_response(
        &self,
        question: &str,
        context: &str,
    ) -> Result<String, GeneratorError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(TUTOR_INSTRUCTIONS)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(format!(
                        "Based on the provided course content, answer the user's question. If \
                         the question is outside the scope of the content, politely say so.\n\n\
                         --- COURSE CONTENT ---\n{context}\n--- END OF COURSE CONTENT ---\n\n\
                         USER QUESTION: {question}"
                    ))
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GeneratorError::Malformed("no content in completion".to_string()))
    }
}

/// A mock [`ContentGenerator`] for development and integration testing.
///
/// Provides predictable, deterministic output, which is useful for driving
/// the pipeline without external dependencies or API costs.
pub struct MockContentGenerator;

#[async_trait]
impl ContentGenerator for MockContentGenerator {
    /// Generates a standard 4-module curriculum for any given topic.
    async fn generate_curriculum(&self, topic: &str) -> Result<Curriculum, GeneratorError> {
        let modules = [
            (
                format!("Introduction to {topic}"),
                "Why the subject matters and where it is used.",
            ),
            (
                "Core Concepts".to_string(),
                "The ideas everything else builds on.",
            ),
            (
                "Practical Applications".to_string(),
                "Applying the concepts to real problems.",
            ),
            (
                "Advanced Topics".to_string(),
                "Where to go once the basics are solid.",
            ),
        ];
        Ok(Curriculum {
            title: format!("{topic}: A Guided Course"),
            modules: modules
                .into_iter()
                .map(|(title, description)| Module {
                    title,
                    description: description.to_string(),
                })
                .collect(),
        })
    }

    async fn generate_content(
        &self,
        curriculum: &Curriculum,
    ) -> Result<ContentSet, GeneratorError> {
        let mut content = ContentSet::new();
        for module in &curriculum.modules {
            content.insert(
                &module.title,
                format!(
                    "# {}\n\n{}\n\n## Key points\n\n- The essentials of this module.\n- How it \
                     connects to the rest of \"{}\".\n",
                    module.title, module.description, curriculum.title
                ),
            );
        }
        Ok(content)
    }

    async fn generate_assessment(
        &self,
        curriculum: &Curriculum,
    ) -> Result<Assessment, GeneratorError> {
        if curriculum.modules.is_empty() {
            return Err(GeneratorError::Malformed(
                "curriculum has no modules".to_string(),
            ));
        }
        let questions = (0..5)
            .map(|index| {
                let module = &curriculum.modules[index % curriculum.modules.len()];
                Question {
                    question: format!("Which statement best summarizes \"{}\"?", module.title),
                    options: vec![
                        module.description.clone(),
                        "An unrelated historical anecdote.".to_string(),
                        "A hardware installation procedure.".to_string(),
                        "A licensing agreement.".to_string(),
                    ],
                    correct_index: Some(0),
                }
            })
            .collect();
        Ok(Assessment {
            title: format!("Checkpoint: {}", curriculum.title),
            questions,
        })
    }

    /// Grades locally against the `correct_index` metadata it produced.
    async fn get_feedback(
        &self,
        assessment: &Assessment,
        answers: &UserAnswers,
    ) -> Result<Feedback, GeneratorError> {
        let mut per_question = Vec::with_capacity(assessment.questions.len());
        let mut correct_count = 0usize;
        for (index, question) in assessment.questions.iter().enumerate() {
            let correct = question.correct_index.unwrap_or(0);
            let correct_answer = question
                .options
                .get(correct)
                .cloned()
                .unwrap_or_default();
            let is_correct = answers
                .get(&index)
                .is_some_and(|chosen| *chosen == correct_answer);
            if is_correct {
                correct_count += 1;
            }
            per_question.push(QuestionFeedback {
                is_correct,
                correct_answer,
                explanation: format!("See the module behind question {}.", index + 1),
                suggestion: (!is_correct)
                    .then(|| "Revisit the module summary before retrying.".to_string()),
            });
        }
        let overall_score = if assessment.questions.is_empty() {
            0.0
        } else {
            correct_count as f32 / assessment.questions.len() as f32 * 100.0
        };
        Ok(Feedback {
            overall_score,
            per_question,
        })
    }

    async fn get_tutor_response(
        &self,
        question: &str,
        _context: &str,
    ) -> Result<String, GeneratorError> {
        Ok(format!(
            "Good question! \"{question}\" is covered by the course material; start with the \
             module summaries and work outward from there."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_content_covers_every_module() {
        let generator = MockContentGenerator;
        let curriculum = generator.generate_curriculum("Rust").await.unwrap();
        assert_eq!(curriculum.modules.len(), 4);
        assert!(curriculum.modules[0].title.contains("Rust"));

        let content = generator.generate_content(&curriculum).await.unwrap();
        assert!(content.validate_against(&curriculum).is_ok());
        let titles: Vec<&str> = curriculum.module_titles().collect();
        assert_eq!(content.module_titles(), titles);
    }

    #[tokio::test]
    async fn mock_assessment_is_well_formed() {
        let generator = MockContentGenerator;
        let curriculum = generator.generate_curriculum("Graph Theory").await.unwrap();
        let assessment = generator.generate_assessment(&curriculum).await.unwrap();
        assert!(assessment.validate().is_ok());
        assert_eq!(assessment.questions.len(), 5);
    }

    #[tokio::test]
    async fn mock_feedback_grades_against_correct_index() {
        let generator = MockContentGenerator;
        let curriculum = generator.generate_curriculum("Chemistry").await.unwrap();
        let assessment = generator.generate_assessment(&curriculum).await.unwrap();

        // Answer the first three correctly, the last two wrong.
        let mut answers = UserAnswers::new();
        for (index, question) in assessment.questions.iter().enumerate() {
            let choice = if index < 3 {
                question.options[question.correct_index.unwrap()].clone()
            } else {
                question.options[1].clone()
            };
            answers.insert(index, choice);
        }

        let feedback = generator.get_feedback(&assessment, &answers).await.unwrap();
        assert!(feedback.validate_against(&assessment).is_ok());
        assert_eq!(feedback.overall_score, 60.0);
        assert!(feedback.per_question[0].is_correct);
        assert!(!feedback.per_question[4].is_correct);
        assert!(feedback.per_question[4].suggestion.is_some());
        assert!(feedback.per_question[0].suggestion.is_none());
    }
}
