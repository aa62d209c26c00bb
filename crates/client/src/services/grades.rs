use academia_academics::{Grade, GradeRequest};
use academia_core::{CourseId, StudentId};

use super::Api;
use crate::error::ClientError;

const GRADES: &str = "/api/grades";

#[derive(Debug, Clone)]
pub struct GradeService {
    api: Api,
}

impl GradeService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Record a grade on the 0-20 scale.
    ///
    /// Values outside the scale (or non-finite) fail with
    /// [`ClientError::OutOfRange`] and no request is made.
    pub async fn assign_grade(&self, student: StudentId, course: CourseId, value: f64) -> Result<Grade, ClientError> {
        let request = GradeRequest::new(student, course, value)?;
        let grade = self.api.post(GRADES, &request).await?;
        tracing::info!(student = %student, course = %course, value, "grade recorded");
        Ok(grade)
    }

    pub async fn for_student(&self, student: StudentId) -> Result<Vec<Grade>, ClientError> {
        self.api.get(format!("{GRADES}/student/{student}")).await
    }
}
