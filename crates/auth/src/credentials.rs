//! Wire payloads for the authentication endpoints.
//!
//! These mirror what `POST /api/auth/login` and `POST /api/auth/register`
//! accept and return. Loosely-typed fields (the role string) are validated when
//! converted into domain types, never inside serde.

use serde::{Deserialize, Serialize};

use academia_core::{DomainError, StudentId, TrainerId, UserId};

use crate::roles::Role;

/// Opaque bearer token issued by the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// Tokens are credentials; keep them out of logs and panic messages.
impl core::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Login body. The server accepts either an email or a username, so both
/// fields carry the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email_or_username: impl Into<String>, password: impl Into<String>) -> Self {
        let login = email_or_username.into().trim().to_string();
        Self {
            email: login.clone(),
            username: login,
            password: password.into(),
        }
    }
}

/// User record as returned by the login endpoint (and as persisted locally).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub username: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<TrainerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: BearerToken,
    pub user: UserPayload,
}

/// Registration response: `{success?, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Full profile submitted to the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Minimum password length accepted by the registration endpoint.
pub const MIN_PASSWORD_LEN: usize = 6;

impl RegistrationProfile {
    /// Advisory client-side checks; the server remains the authority.
    ///
    /// Returns the offending field names so a form can highlight them.
    pub fn validate(&self) -> Result<(), (DomainError, Vec<&'static str>)> {
        let mut fields = Vec::new();
        if self.first_name.trim().is_empty() {
            fields.push("firstName");
        }
        if self.last_name.trim().is_empty() {
            fields.push("lastName");
        }
        if !looks_like_email(&self.email) {
            fields.push("email");
        }
        if self.username.trim().is_empty() {
            fields.push("username");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            fields.push("password");
        }

        if fields.is_empty() {
            Ok(())
        } else {
            let msg = format!("invalid registration fields: {}", fields.join(", "));
            Err((DomainError::validation(msg), fields))
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}
