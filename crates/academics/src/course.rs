use serde::{Deserialize, Serialize};

use academia_core::{CourseId, DomainError, Entity, SpecialtyId, TrainerId};

use crate::error::AcademicError;

/// A course offering.
///
/// `code` is the human-readable unique key (e.g. `"NET-101"`). A course may be
/// unassigned; see [`Course::assignment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CourseId>,
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<TrainerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_id: Option<SpecialtyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_name: Option<String>,
}

/// Whether a course has a trainer, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseAssignment {
    Assigned(TrainerId),
    Unassigned,
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> Option<&CourseId> {
        self.id.as_ref()
    }
}

impl Course {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            title: title.into(),
            description: None,
            trainer_id: None,
            trainer_name: None,
            specialty_id: None,
            specialty_name: None,
        }
    }

    pub fn assigned_to(mut self, trainer: TrainerId) -> Self {
        self.trainer_id = Some(trainer);
        self
    }

    pub fn assignment(&self) -> CourseAssignment {
        match self.trainer_id {
            Some(trainer) => CourseAssignment::Assigned(trainer),
            None => CourseAssignment::Unassigned,
        }
    }

    pub fn is_taught_by(&self, trainer: TrainerId) -> bool {
        self.trainer_id == Some(trainer)
    }

    /// Code and title are required before a create/update is sent.
    pub fn validate(&self) -> Result<(), AcademicError> {
        if self.code.trim().is_empty() {
            return Err(DomainError::validation("course code is required").into());
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("course title is required").into());
        }
        Ok(())
    }
}

/// Courses whose trainer is `trainer`, in source order. Unassigned courses are
/// never included.
pub fn courses_taught_by(courses: Vec<Course>, trainer: TrainerId) -> Vec<Course> {
    courses.into_iter().filter(|c| c.is_taught_by(trainer)).collect()
}
