//! Thin per-resource wrappers over the REST API.
//!
//! Services hold no state beyond the transport handle: every call fetches a
//! fresh snapshot, and every failure surfaces as a [`ClientError`] to the
//! caller. Nothing is retried here.

pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod grades;
pub mod planning;
pub mod profile;
pub mod reports;
pub mod students;
pub mod trainers;

use std::sync::Arc;

use academia_core::{DomainError, Entity};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub use courses::CourseService;
pub use dashboard::{DashboardService, StudentDashboard, TrainerDashboard};
pub use enrollments::EnrollmentService;
pub use grades::GradeService;
pub use planning::PlanningService;
pub use profile::ProfileService;
pub use reports::{ReportDocument, ReportService};
pub use students::StudentService;
pub use trainers::TrainerService;

/// Shared request plumbing for the services.
#[derive(Clone)]
pub struct Api {
    transport: Arc<dyn Transport>,
}

impl Api {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send and return the raw response, successful or not.
    pub(crate) async fn exchange(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let method = request.method;
        let path = request.path.clone();
        self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "transport failure");
            ClientError::from(e)
        })
    }

    /// Send and require a 2xx, classifying anything else.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let response = self.exchange(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ClientError::from_response(&response))
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: impl Into<String>) -> Result<T, ClientError> {
        self.execute(ApiRequest::get(path)).await?.decode()
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T, ClientError> {
        self.execute(ApiRequest::post(path).json(body)?).await?.decode()
    }

    /// POST a draft and return the stored record.
    ///
    /// The draft must not carry an id, and the reply must: the server is the
    /// only source of identifiers.
    pub(crate) async fn create<E>(&self, path: impl Into<String>, draft: &E) -> Result<E, ClientError>
    where
        E: Entity + Serialize + DeserializeOwned,
    {
        if draft.is_persisted() {
            return Err(DomainError::invariant("a new record cannot carry an id").into());
        }
        let created: E = self.post(path, draft).await?;
        if !created.is_persisted() {
            return Err(ClientError::MalformedResponse("created record has no id".into()));
        }
        Ok(created)
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T, ClientError> {
        self.execute(ApiRequest::put(path).json(body)?).await?.decode()
    }

    pub(crate) async fn delete(&self, path: impl Into<String>) -> Result<(), ClientError> {
        self.execute(ApiRequest::delete(path)).await.map(|_| ())
    }
}

impl core::fmt::Debug for Api {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Api").finish_non_exhaustive()
    }
}
