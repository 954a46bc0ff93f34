use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::matching::{CompetencyMatcher, JobDetails, MajorMatcher};
use crate::store::{BackendStatus, CareerStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CareerStore>,
    /// Competency and major lists, injected explicitly rather than substituted on failure.
    pub catalog: Arc<Catalog>,
    /// Result of the startup connectivity check. Pages show a demo banner when offline.
    pub backend_status: BackendStatus,
    pub config: Config,
    pub competency: CompetencyMatcher,
    pub majors: MajorMatcher,
    pub jobs: JobDetails,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CareerStore>,
        catalog: Catalog,
        backend_status: BackendStatus,
        config: Config,
    ) -> Self {
        Self {
            competency: CompetencyMatcher::new(store.clone()),
            majors: MajorMatcher::new(store.clone()),
            jobs: JobDetails::new(store.clone()),
            store,
            catalog: Arc::new(catalog),
            backend_status,
            config,
        }
    }
}
