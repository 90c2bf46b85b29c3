use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{FactValue, Facts};
use super::extraction::ExtractionResponse;
use super::flow::QuestionFlow;
use super::repository::{RepositoryError, SessionRepository};
use super::session::{AnswerOutcome, IntakeSession, SessionError, SessionId};
use crate::workflows::matching::{
    classify, identify_barriers, BarrierResolver, Classification, Resource, ResourceCatalog,
};

/// Service composing the question flow, resource catalog, and session storage.
pub struct IntakeService<R> {
    flow: Arc<QuestionFlow>,
    catalog: Arc<ResourceCatalog>,
    resolver: Arc<BarrierResolver>,
    repository: Arc<R>,
    session_ttl: Duration,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("intake-{id:06}"))
}

/// Barriers revealed for one resource and the programs that could help.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarrierHelp<'a> {
    pub resource_id: String,
    pub barriers: Vec<String>,
    pub helpers: Vec<&'a Resource>,
}

impl<R> IntakeService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        flow: QuestionFlow,
        catalog: ResourceCatalog,
        session_ttl: Duration,
    ) -> Self {
        Self::with_resolver(
            repository,
            flow,
            catalog,
            BarrierResolver::standard(),
            session_ttl,
        )
    }

    pub fn with_resolver(
        repository: Arc<R>,
        flow: QuestionFlow,
        catalog: ResourceCatalog,
        resolver: BarrierResolver,
        session_ttl: Duration,
    ) -> Self {
        Self {
            flow: Arc::new(flow),
            catalog: Arc::new(catalog),
            resolver: Arc::new(resolver),
            repository,
            session_ttl,
        }
    }

    pub fn flow(&self) -> &QuestionFlow {
        &self.flow
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Open a new session positioned on the first question.
    pub fn start(&self) -> Result<IntakeSession, IntakeServiceError> {
        let session = IntakeSession::begin(next_session_id(), &self.flow, Utc::now());
        let stored = self.repository.insert(session)?;
        info!(session = %stored.id, "started intake session");
        Ok(stored)
    }

    /// Fetch a live session. Expired sessions are reported, not returned.
    pub fn get(&self, id: &SessionId) -> Result<IntakeSession, IntakeServiceError> {
        let session = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if session.is_expired(Utc::now(), self.session_ttl) {
            info!(session = %id, "intake session expired");
            self.repository.remove(id)?;
            return Err(IntakeServiceError::Expired(id.clone()));
        }
        Ok(session)
    }

    pub fn answer(
        &self,
        id: &SessionId,
        raw: &str,
    ) -> Result<(AnswerOutcome, IntakeSession), IntakeServiceError> {
        let mut session = self.get(id)?;
        let outcome = session.answer(&self.flow, raw, Utc::now())?;
        self.repository.update(session.clone())?;
        debug!(session = %id, ?outcome, "recorded answer");
        Ok((outcome, session))
    }

    pub fn skip(&self, id: &SessionId) -> Result<(AnswerOutcome, IntakeSession), IntakeServiceError> {
        let mut session = self.get(id)?;
        let outcome = session.skip(&self.flow, Utc::now())?;
        self.repository.update(session.clone())?;
        debug!(session = %id, ?outcome, "skipped question");
        Ok((outcome, session))
    }

    pub fn edit(
        &self,
        id: &SessionId,
        question_id: &str,
    ) -> Result<IntakeSession, IntakeServiceError> {
        let mut session = self.get(id)?;
        session.edit(&self.flow, question_id, Utc::now())?;
        self.repository.update(session.clone())?;
        Ok(session)
    }

    pub fn apply_extraction(
        &self,
        id: &SessionId,
        response: &ExtractionResponse,
    ) -> Result<(AnswerOutcome, IntakeSession), IntakeServiceError> {
        let mut session = self.get(id)?;
        let outcome = session.apply_extraction(&self.flow, response, Utc::now());
        self.repository.update(session.clone())?;
        debug!(
            session = %id,
            urgency = ?response.urgency_level,
            fields = response.extracted_data.len(),
            "applied extracted facts"
        );
        Ok((outcome, session))
    }

    /// Classify the catalog against a session's current facts.
    pub fn classification(
        &self,
        id: &SessionId,
    ) -> Result<Classification<'_>, IntakeServiceError> {
        let session = self.get(id)?;
        Ok(self.classify_facts(session.facts()))
    }

    /// Stateless classification for callers that keep their own fact set.
    pub fn classify_facts(&self, facts: &Facts) -> Classification<'_> {
        classify(self.catalog.resources(), facts)
    }

    pub fn barrier_help(
        &self,
        resource_id: &str,
        answers: &BTreeMap<String, FactValue>,
        facts: &Facts,
    ) -> Result<BarrierHelp<'_>, IntakeServiceError> {
        let resource = self
            .catalog
            .get(resource_id)
            .ok_or_else(|| IntakeServiceError::UnknownResource(resource_id.to_string()))?;

        let barriers = identify_barriers(resource, answers);
        let helpers = self
            .resolver
            .find_helpers_for(&self.catalog, &barriers, resource_id, facts);

        Ok(BarrierHelp {
            resource_id: resource_id.to_string(),
            barriers,
            helpers,
        })
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("session {0} has expired")]
    Expired(SessionId),
    #[error("unknown resource `{0}`")]
    UnknownResource(String),
}

impl IntakeServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeServiceError::Session(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IntakeServiceError::Repository(RepositoryError::NotFound)
            | IntakeServiceError::UnknownResource(_) => StatusCode::NOT_FOUND,
            IntakeServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            IntakeServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            IntakeServiceError::Expired(_) => StatusCode::GONE,
        }
    }
}
