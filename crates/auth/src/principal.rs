use serde::{Deserialize, Serialize};
use thiserror::Error;

use academia_core::{StudentId, TrainerId, UserId};

use crate::credentials::UserPayload;
use crate::roles::{Role, UnknownRole};

/// Role together with the domain record the account is linked to.
///
/// Modelled as an enum so "a trainer without a trainer record" cannot be built.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum RoleLink {
    Admin,
    Trainer(TrainerId),
    Student(StudentId),
}

/// The authenticated user as the client knows it.
///
/// # Invariants
/// - `Trainer` identities always carry a trainer reference, `Student`
///   identities always carry a student reference.
/// - `Admin` identities carry neither.
/// - The display name is never blank.
///
/// Identities are created from a login response, persisted as the same JSON
/// shape the API returns, and validated again when rehydrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserPayload", into = "UserPayload")]
pub struct Identity {
    user_id: Option<UserId>,
    display_name: String,
    link: RoleLink,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("display name must not be blank")]
    BlankDisplayName,

    #[error("TRAINER identity is missing its trainer reference")]
    MissingTrainerRef,

    #[error("STUDENT identity is missing its student reference")]
    MissingStudentRef,
}

impl Identity {
    pub fn admin(display_name: impl Into<String>) -> Result<Self, IdentityError> {
        Self::build(None, display_name.into(), RoleLink::Admin)
    }

    pub fn trainer(display_name: impl Into<String>, trainer: TrainerId) -> Result<Self, IdentityError> {
        Self::build(None, display_name.into(), RoleLink::Trainer(trainer))
    }

    pub fn student(display_name: impl Into<String>, student: StudentId) -> Result<Self, IdentityError> {
        Self::build(None, display_name.into(), RoleLink::Student(student))
    }

    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    fn build(user_id: Option<UserId>, display_name: String, link: RoleLink) -> Result<Self, IdentityError> {
        let display_name = display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(IdentityError::BlankDisplayName);
        }
        Ok(Self {
            user_id,
            display_name,
            link,
        })
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        match self.link {
            RoleLink::Admin => Role::Admin,
            RoleLink::Trainer(_) => Role::Trainer,
            RoleLink::Student(_) => Role::Student,
        }
    }

    pub fn trainer_ref(&self) -> Option<TrainerId> {
        match self.link {
            RoleLink::Trainer(id) => Some(id),
            _ => None,
        }
    }

    pub fn student_ref(&self) -> Option<StudentId> {
        match self.link {
            RoleLink::Student(id) => Some(id),
            _ => None,
        }
    }
}

impl TryFrom<UserPayload> for Identity {
    type Error = IdentityError;

    /// Boundary validation for identities coming from the API or from storage.
    ///
    /// References that do not belong to the role are dropped; a reference the
    /// role requires but the payload lacks is rejected.
    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let role: Role = payload.role.parse()?;
        let link = match role {
            Role::Admin => RoleLink::Admin,
            Role::Trainer => RoleLink::Trainer(payload.trainer_id.ok_or(IdentityError::MissingTrainerRef)?),
            Role::Student => RoleLink::Student(payload.student_id.ok_or(IdentityError::MissingStudentRef)?),
        };
        Self::build(payload.id, payload.username, link)
    }
}

impl From<Identity> for UserPayload {
    fn from(identity: Identity) -> Self {
        UserPayload {
            id: identity.user_id,
            username: identity.display_name.clone(),
            role: identity.role().as_str().to_string(),
            trainer_id: identity.trainer_ref(),
            student_id: identity.student_ref(),
        }
    }
}
