//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the journey API and the OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ErrorResponse, StartJourneyPayload, SubmitAnswersPayload, TutorQuestionPayload, TutorReply,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::start_journey,
        handlers::get_snapshot,
        handlers::submit_assessment,
        handlers::ask_tutor,
    ),
    components(
        schemas(
            StartJourneyPayload,
            SubmitAnswersPayload,
            TutorQuestionPayload,
            TutorReply,
            ErrorResponse
        )
    ),
    tags(
        (name = "Orchestra API", description = "Learning-journey orchestration for the agent ensemble")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route(
            "/journey",
            get(handlers::get_snapshot).post(handlers::start_journey),
        )
        .route("/journey/assessment", post(handlers::submit_assessment))
        .route("/journey/tutor", post(handlers::ask_tutor))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
