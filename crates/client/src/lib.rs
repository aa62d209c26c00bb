//! `academia-client`
//!
//! **Responsibility:** the portal's client core.
//!
//! This crate provides:
//! - The persisted session (`SessionStore`) and its only writer (`AuthSession`)
//! - Route guarding at navigation time (`Navigator`)
//! - The HTTP seam (`Transport`, `HttpTransport`)
//! - Per-resource services over the REST API
//!
//! The API is the authority for every record; the client validates what it can
//! before sending and classifies what comes back.

pub mod auth_session;
pub mod config;
pub mod error;
pub mod navigation;
pub mod services;
pub mod session_store;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use auth_session::AuthSession;
pub use config::ClientConfig;
pub use error::ClientError;
pub use navigation::{NavigationOutcome, Navigator};
pub use services::{
    Api, CourseService, DashboardService, EnrollmentService, GradeService, PlanningService, ProfileService,
    ReportDocument, ReportService, StudentDashboard, StudentService, TrainerDashboard, TrainerService,
};
pub use session_store::{FileStore, KeyValueStore, MemoryStore, SessionStore, UnavailableStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport, TransportError};

/// Everything a front end needs, wired to one transport and one session.
#[derive(Debug, Clone)]
pub struct AcademiaClient {
    session: Arc<AuthSession>,
    navigator: Navigator,
    api: Api,
}

impl AcademiaClient {
    /// HTTP transport against `config.api_base_url`, session persisted under
    /// `config.session_dir` (memory-only when unset).
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let store = SessionStore::for_dir(config.session_dir.as_deref());
        let transport = HttpTransport::new(config, store.clone())?;
        tracing::info!(api = %config.api_base_url, persistent = config.session_dir.is_some(), "client configured");
        Ok(Self::with_transport(Arc::new(transport), store))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, store: SessionStore) -> Self {
        let session = Arc::new(AuthSession::new(transport.clone(), store));
        Self {
            navigator: Navigator::new(session.clone()),
            api: Api::new(transport),
            session,
        }
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn courses(&self) -> CourseService {
        CourseService::new(self.api.clone())
    }

    pub fn enrollments(&self) -> EnrollmentService {
        EnrollmentService::new(self.api.clone())
    }

    pub fn grades(&self) -> GradeService {
        GradeService::new(self.api.clone())
    }

    pub fn students(&self) -> StudentService {
        StudentService::new(self.api.clone())
    }

    pub fn trainers(&self) -> TrainerService {
        TrainerService::new(self.api.clone())
    }

    pub fn planning(&self) -> PlanningService {
        PlanningService::new(self.api.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.api.clone())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.api.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.api.clone())
    }
}
