use academia_academics::{Matricule, Student};
use academia_core::{DomainError, StudentId};

use super::Api;
use crate::error::ClientError;

const STUDENTS: &str = "/api/students";

/// Student records. Edits and deletions are addressed by matricule.
#[derive(Debug, Clone)]
pub struct StudentService {
    api: Api,
}

impl StudentService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Student>, ClientError> {
        self.api.get(STUDENTS).await
    }

    pub async fn get(&self, id: StudentId) -> Result<Student, ClientError> {
        self.api.get(format!("{STUDENTS}/{id}")).await
    }

    pub async fn create(&self, student: &Student) -> Result<Student, ClientError> {
        student.validate()?;
        let created: Student = self.api.create(STUDENTS, student).await?;
        tracing::info!(matricule = %created.matricule, "student created");
        Ok(created)
    }

    /// Update the student known by `matricule`. The matricule itself cannot change.
    pub async fn update(&self, matricule: &Matricule, student: &Student) -> Result<Student, ClientError> {
        if &student.matricule != matricule {
            return Err(DomainError::invariant(format!(
                "matricule is immutable ({matricule} cannot become {})",
                student.matricule
            ))
            .into());
        }
        student.validate()?;
        self.api.put(student_path(matricule), student).await
    }

    pub async fn delete(&self, matricule: &Matricule) -> Result<(), ClientError> {
        self.api.delete(student_path(matricule)).await
    }
}

/// `/api/students/{matricule}` with the matricule percent-encoded as one segment.
fn student_path(matricule: &Matricule) -> String {
    format!("{STUDENTS}/{}", urlencoding::encode(matricule.as_str()))
}
