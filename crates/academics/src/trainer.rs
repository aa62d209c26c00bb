use serde::{Deserialize, Serialize};

use academia_core::{DomainError, Entity, TrainerId};

use crate::error::AcademicError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TrainerId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    pub email: String,
}

impl Entity for Trainer {
    type Id = TrainerId;

    fn id(&self) -> Option<&TrainerId> {
        self.id.as_ref()
    }
}

impl Trainer {
    pub fn validate(&self) -> Result<(), AcademicError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("trainer name is required").into());
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation(format!("invalid email '{}'", self.email)).into());
        }
        Ok(())
    }
}
