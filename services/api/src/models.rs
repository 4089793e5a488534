//! API Models
//!
//! Request and response payloads for the journey endpoints, annotated for
//! OpenAPI documentation with `utoipa`. The snapshot itself is serialized
//! straight from `orchestra-core`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct StartJourneyPayload {
    /// The learning goal, free text.
    #[schema(example = "Quantum Computing")]
    pub topic: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitAnswersPayload {
    /// Question index to the chosen option text; must cover every question.
    #[schema(value_type = Object, example = json!({"0": "A", "1": "B"}))]
    pub answers: BTreeMap<usize, String>,
}

#[derive(Deserialize, ToSchema)]
pub struct TutorQuestionPayload {
    #[schema(example = "What is superposition?")]
    pub question: String,
    /// Restrict the context to one module; omitted means the whole course.
    #[schema(example = "Core Concepts")]
    pub module: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TutorReply {
    pub reply: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
