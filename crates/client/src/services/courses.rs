use academia_academics::{Course, courses_taught_by};
use academia_auth::{Identity, Role};
use academia_core::{CourseId, TrainerId};

use super::Api;
use crate::error::ClientError;

const COURSES: &str = "/api/courses";

#[derive(Debug, Clone)]
pub struct CourseService {
    api: Api,
}

impl CourseService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list_all(&self) -> Result<Vec<Course>, ClientError> {
        self.api.get(COURSES).await
    }

    pub async fn get(&self, id: CourseId) -> Result<Course, ClientError> {
        self.api.get(format!("{COURSES}/{id}")).await
    }

    pub async fn list_by_trainer(&self, trainer: TrainerId) -> Result<Vec<Course>, ClientError> {
        let courses = self.api.get(format!("{COURSES}/trainer/{trainer}")).await?;
        Ok(courses_taught_by(courses, trainer))
    }

    /// Courses visible to `identity`: a trainer sees only the courses assigned
    /// to them, everyone else sees the full catalogue.
    pub async fn course_list_for(&self, identity: &Identity) -> Result<Vec<Course>, ClientError> {
        match (identity.role(), identity.trainer_ref()) {
            (Role::Trainer, Some(trainer)) => self.list_by_trainer(trainer).await,
            (Role::Trainer, None) => Err(ClientError::MissingReference("trainerId")),
            _ => self.list_all().await,
        }
    }

    pub async fn create(&self, course: &Course) -> Result<Course, ClientError> {
        course.validate()?;
        self.api.create(COURSES, course).await
    }

    pub async fn update(&self, id: CourseId, course: &Course) -> Result<Course, ClientError> {
        course.validate()?;
        self.api.put(format!("{COURSES}/{id}"), course).await
    }

    pub async fn delete(&self, id: CourseId) -> Result<(), ClientError> {
        self.api.delete(format!("{COURSES}/{id}")).await
    }
}
