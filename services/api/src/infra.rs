use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;
use youth_navigator::workflows::intake::{
    IntakeSession, RepositoryError, SessionId, SessionRepository,
};
use youth_navigator::workflows::matching::{CatalogError, ResourceCatalog};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, IntakeSession>>>,
}

impl InMemorySessionRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, IntakeSession>>, RepositoryError>
    {
        self.sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: IntakeSession) -> Result<IntakeSession, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: IntakeSession) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&session.id) {
            guard.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        guard.remove(id);
        Ok(())
    }
}

/// Loads the catalog from `path` when given, otherwise the built-in one.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<ResourceCatalog, CatalogError> {
    match path {
        Some(path) => ResourceCatalog::from_json_path(path),
        None => {
            let catalog = ResourceCatalog::standard();
            info!(resources = catalog.len(), "using built-in resource catalog");
            Ok(catalog)
        }
    }
}
