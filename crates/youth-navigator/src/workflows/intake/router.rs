use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{FactValue, Facts};
use super::extraction::ExtractionResponse;
use super::repository::SessionRepository;
use super::service::{IntakeService, IntakeServiceError};
use super::session::{AnswerOutcome, IntakeSession, SessionId, SessionView};
use crate::error::AppError;

/// Router builder exposing the intake session and classification endpoints.
pub fn intake_router<R>(service: Arc<IntakeService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/intake/sessions", post(start_handler::<R>))
        .route(
            "/api/v1/intake/sessions/:session_id",
            get(session_handler::<R>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/answers",
            post(answer_handler::<R>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/edit",
            post(edit_handler::<R>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/extraction",
            post(extraction_handler::<R>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/resources",
            get(resources_handler::<R>),
        )
        .route("/api/v1/eligibility/classify", post(classify_handler::<R>))
        .route(
            "/api/v1/resources/:resource_id/barriers",
            post(barriers_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    skip: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EditRequest {
    question_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    #[serde(default)]
    facts: Facts,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BarrierRequest {
    #[serde(default)]
    answers: BTreeMap<String, FactValue>,
    #[serde(default)]
    facts: Facts,
}

#[derive(Debug, Serialize)]
struct StepView {
    outcome: AnswerOutcome,
    session: SessionView,
}

fn failure(error: IntakeServiceError) -> Response {
    AppError::from(error).into_response()
}

fn step_response<R>(
    service: &IntakeService<R>,
    result: Result<(AnswerOutcome, IntakeSession), IntakeServiceError>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match result {
        Ok((outcome, session)) => {
            let view = StepView {
                outcome,
                session: session.view(service.flow()),
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn start_handler<R>(State(service): State<Arc<IntakeService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    match service.start() {
        Ok(session) => (StatusCode::CREATED, Json(session.view(service.flow()))).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn session_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, Json(session.view(service.flow()))).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn answer_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    let result = if request.skip {
        service.skip(&id)
    } else {
        service.answer(&id, request.answer.as_deref().unwrap_or_default())
    };
    step_response(&service, result)
}

pub(crate) async fn edit_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Path(session_id): Path<String>,
    Json(request): Json<EditRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.edit(&SessionId(session_id), &request.question_id) {
        Ok(session) => (StatusCode::OK, Json(session.view(service.flow()))).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn extraction_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Path(session_id): Path<String>,
    Json(response): Json<ExtractionResponse>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let result = service.apply_extraction(&SessionId(session_id), &response);
    step_response(&service, result)
}

pub(crate) async fn resources_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.classification(&SessionId(session_id)) {
        Ok(classification) => (StatusCode::OK, Json(classification)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn classify_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Json(request): Json<ClassifyRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let classification = service.classify_facts(&request.facts);
    (StatusCode::OK, Json(classification)).into_response()
}

pub(crate) async fn barriers_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Path(resource_id): Path<String>,
    Json(request): Json<BarrierRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.barrier_help(&resource_id, &request.answers, &request.facts) {
        Ok(help) => (StatusCode::OK, Json(help)).into_response(),
        Err(error) => failure(error),
    }
}
