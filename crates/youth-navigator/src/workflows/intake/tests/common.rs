use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::intake::domain::{Condition, Question, QuestionKind};
use crate::workflows::intake::repository::{RepositoryError, SessionRepository};
use crate::workflows::intake::session::{IntakeSession, SessionId};
use crate::workflows::intake::{intake_router, IntakeService, QuestionFlow};
use crate::workflows::matching::ResourceCatalog;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Small flow exercising both condition lists and a dependency chain.
pub(super) fn branching_flow() -> QuestionFlow {
    QuestionFlow::new(vec![
        Question::new("situation", "situation", QuestionKind::Multiple, "What's going on?")
            .skippable(),
        Question::new("age", "age", QuestionKind::Number, "How old are you?").required(),
        Question::new(
            "housingDuration",
            "housingDuration",
            QuestionKind::Multiple,
            "How long have you needed housing?",
        )
        .skippable()
        .show_if(Condition::equals("situation", "Need shelter/housing")),
        Question::new("inSchool", "inSchool", QuestionKind::YesNo, "In school?")
            .skippable()
            .show_if(Condition::less_than("age", 25)),
        Question::new("schoolType", "schoolType", QuestionKind::Text, "What school?")
            .skippable()
            .show_if(Condition::equals("inSchool", true)),
        Question::new("hasId", "hasId", QuestionKind::YesNo, "Do you have ID?")
            .skippable()
            .skip_if(Condition::equals("crisisLevel", true)),
    ])
}

pub(super) fn build_service() -> (IntakeService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = IntakeService::new(
        repository.clone(),
        QuestionFlow::standard(),
        ResourceCatalog::standard(),
        Duration::days(7),
    );
    (service, repository)
}

pub(super) fn intake_router_with_service(
    service: IntakeService<MemoryRepository>,
) -> axum::Router {
    intake_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, IntakeSession>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, session: IntakeSession) -> Result<IntakeSession, RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: IntakeSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        guard.remove(id);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _session: IntakeSession) -> Result<IntakeSession, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _session: IntakeSession) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
