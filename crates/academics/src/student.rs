use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use academia_core::{DomainError, Entity, GroupId, StudentId};

use crate::error::AcademicError;

/// A student's registration number: the immutable business key.
///
/// Edit and delete URLs address students by matricule, so it is never
/// regenerated once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Matricule(String);

impl Matricule {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into().trim().to_string();
        if raw.is_empty() {
            return Err(DomainError::validation("matricule must not be blank"));
        }
        if raw.contains('/') || raw.contains(char::is_whitespace) || raw.chars().all(|c| c == '.') {
            return Err(DomainError::validation(format!("matricule '{raw}' is not URL-safe")));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Matricule {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Matricule> for String {
    fn from(value: Matricule) -> Self {
        value.0
    }
}

impl core::fmt::Display for Matricule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StudentId>,
    pub matricule: Matricule,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> Option<&StudentId> {
        self.id.as_ref()
    }
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn validate(&self) -> Result<(), AcademicError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(DomainError::validation("first and last name are required").into());
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation(format!("invalid email '{}'", self.email)).into());
        }
        Ok(())
    }
}
