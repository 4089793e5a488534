//! Axum Handlers for the Journey API
//!
//! This module contains the logic for handling HTTP requests against the
//! pipeline controller. It uses `utoipa` doc comments to generate OpenAPI
//! documentation.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orchestra_core::{PipelineError, Snapshot, UserAnswers};
use tracing::error;

use crate::{
    models::{
        ErrorResponse, StartJourneyPayload, SubmitAnswersPayload, TutorQuestionPayload, TutorReply,
    },
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    UnprocessableEntity(String),
    Conflict(String),
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::BadGateway(message) => {
                error!("Generation backend failure: {message}");
                (StatusCode::BAD_GATEWAY, message)
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(_) => ApiError::BadRequest(err.to_string()),
            PipelineError::IncompleteAnswers { .. } => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            PipelineError::Busy => {
                ApiError::Conflict("The orchestrator is already processing a request.".to_string())
            }
            PipelineError::Backend(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}

/// Start a new learning journey for a topic.
///
/// Supersedes any journey still in flight and drives the full generation
/// chain before responding with the settled snapshot.
#[utoipa::path(
    post,
    path = "/journey",
    request_body = StartJourneyPayload,
    responses(
        (status = 201, description = "Journey generated; snapshot returned", body = Object),
        (status = 400, description = "Empty topic or malformed generator payload", body = ErrorResponse),
        (status = 502, description = "Generation backend failure", body = ErrorResponse)
    )
)]
pub async fn start_journey(
    State(state): State<AppState>,
    Json(payload): Json<StartJourneyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.controller.start(&payload.topic).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// Read the current pipeline snapshot.
#[utoipa::path(
    get,
    path = "/journey",
    responses(
        (status = 200, description = "Current snapshot", body = Object)
    )
)]
pub async fn get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.controller.snapshot().await)
}

/// Submit a full set of assessment answers for grading.
#[utoipa::path(
    post,
    path = "/journey/assessment",
    request_body = SubmitAnswersPayload,
    responses(
        (status = 200, description = "Feedback computed; snapshot returned", body = Object),
        (status = 400, description = "No completed assessment to grade", body = ErrorResponse),
        (status = 409, description = "Another command is still being processed", body = ErrorResponse),
        (status = 422, description = "Not every question was answered", body = ErrorResponse),
        (status = 502, description = "Generation backend failure", body = ErrorResponse)
    )
)]
pub async fn submit_assessment(
    State(state): State<AppState>,
    Json(payload): Json<SubmitAnswersPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let answers: UserAnswers = payload.answers;
    let snapshot = state.controller.submit_assessment(&answers).await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// Ask the tutor a question about the generated course content.
#[utoipa::path(
    post,
    path = "/journey/tutor",
    request_body = TutorQuestionPayload,
    responses(
        (status = 200, description = "Tutor reply", body = TutorReply),
        (status = 400, description = "No content yet, or unknown module", body = ErrorResponse),
        (status = 409, description = "Another command is still being processed", body = ErrorResponse),
        (status = 502, description = "Generation backend failure", body = ErrorResponse)
    )
)]
pub async fn ask_tutor(
    State(state): State<AppState>,
    Json(payload): Json<TutorQuestionPayload>,
) -> Result<Json<TutorReply>, ApiError> {
    let reply = state
        .controller
        .ask_tutor(&payload.question, payload.module.as_deref())
        .await?;
    Ok(Json(TutorReply { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_http_statuses() {
        let cases = [
            (
                PipelineError::Validation("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::IncompleteAnswers {
                    answered: 1,
                    expected: 5,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (PipelineError::Busy, StatusCode::CONFLICT),
            (
                PipelineError::Backend("down".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
