//! The authenticated session: login, logout, registration and the observable
//! current identity.
//!
//! `AuthSession` is the only writer of the persisted session. Its identity
//! stream replays the latest value to every new subscriber, so a view that
//! subscribes late still sees who is logged in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use academia_auth::{Capability, Identity, LoginRequest, LoginResponse, RegisterResponse, RegistrationProfile, Role};
use academia_events::{EventBus, ReplayBus, Subscription};

use crate::error::{ClientError, ErrorBody};
use crate::session_store::SessionStore;
use crate::transport::{ApiRequest, Transport};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const CHECK_EMAIL_PATH: &str = "/api/auth/check-email";
const LOGOUT_PATH: &str = "/logout";

/// Upper bound on the server logout call; the local clear never waits longer.
pub const LOGOUT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct AuthSession {
    transport: Arc<dyn Transport>,
    store: SessionStore,
    identity: ReplayBus<Option<Identity>>,
    // Bumped by every logout; a login that observes a different value at
    // commit time started before that logout and is discarded.
    epoch: AtomicU64,
    commit: Mutex<()>,
}

impl AuthSession {
    /// Build a session, rehydrating the identity from `store` if one was persisted.
    pub fn new(transport: Arc<dyn Transport>, store: SessionStore) -> Self {
        let restored = store.load();
        match &restored {
            Some(identity) => tracing::info!(role = %identity.role(), "restored persisted session"),
            None => tracing::debug!("no persisted session"),
        }

        Self {
            transport,
            store,
            identity: ReplayBus::new(restored),
            epoch: AtomicU64::new(0),
            commit: Mutex::new(()),
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.current()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_identity().is_some()
    }

    /// Whether the current user may be offered `capability`. `false` when logged out.
    pub fn can(&self, capability: Capability) -> bool {
        self.current_identity().is_some_and(|identity| identity.role().can(capability))
    }

    /// Latest identity first, then every change.
    pub fn subscribe(&self) -> Subscription<Option<Identity>> {
        self.identity.subscribe()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Authenticate and, on success, persist and broadcast the new identity.
    ///
    /// On any failure the current identity and the persisted session are left
    /// untouched.
    pub async fn login(&self, login: &str, password: &str) -> Result<Role, ClientError> {
        let started = self.epoch.load(Ordering::SeqCst);

        let request = ApiRequest::post(LOGIN_PATH)
            .anonymous()
            .json(&LoginRequest::new(login, password))?;
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, "login request failed");
            ClientError::from(e)
        })?;

        if !response.is_success() {
            let err = match response.status {
                400 | 401 | 403 => ClientError::InvalidCredentials,
                _ => ClientError::from_response(&response),
            };
            tracing::info!(status = response.status, "login rejected");
            return Err(err);
        }

        let LoginResponse { token, user } = response.decode()?;
        if token.is_blank() {
            return Err(ClientError::MalformedResponse("login response carried an empty token".into()));
        }
        let identity = Identity::try_from(user).map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        let role = identity.role();

        {
            let _guard = self.commit.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if self.epoch.load(Ordering::SeqCst) != started {
                tracing::info!(role = %role, "discarding login that resolved after a logout");
                return Err(ClientError::LoginSuperseded);
            }
            self.store.save(&identity, &token);
            self.publish(Some(identity));
        }

        tracing::info!(role = %role, "login succeeded");
        Ok(role)
    }

    /// Notify the server (best effort), then clear the local session.
    ///
    /// The local clear happens whatever the server does.
    pub async fn logout(&self) {
        let notify = self.transport.send(ApiRequest::post(LOGOUT_PATH));
        match tokio::time::timeout(LOGOUT_NOTIFY_TIMEOUT, notify).await {
            Ok(Ok(response)) if response.is_success() => tracing::debug!("server acknowledged logout"),
            Ok(Ok(response)) => tracing::warn!(status = response.status, "server rejected logout"),
            Ok(Err(e)) => tracing::warn!(error = %e, "logout notification failed"),
            Err(_) => tracing::warn!(timeout = ?LOGOUT_NOTIFY_TIMEOUT, "logout notification timed out"),
        }

        let _guard = self.commit.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.store.clear();
        self.publish(None);
        tracing::info!("logged out");
    }

    /// Submit a registration. Returns the server's confirmation message.
    ///
    /// Does not log anyone in.
    pub async fn register(&self, profile: &RegistrationProfile) -> Result<String, ClientError> {
        profile.validate().map_err(|(e, fields)| ClientError::ValidationFailed {
            message: e.to_string(),
            fields: fields.into_iter().map(str::to_string).collect(),
        })?;

        let request = ApiRequest::post(REGISTER_PATH).anonymous().json(profile)?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(match response.status {
                400 | 409 | 422 => {
                    let body = ErrorBody::parse(&response);
                    ClientError::ValidationFailed {
                        message: body.message_or("registration rejected"),
                        fields: body.fields,
                    }
                }
                _ => ClientError::from_response(&response),
            });
        }

        let message = match response.decode::<RegisterResponse>() {
            Ok(RegisterResponse { message: Some(message), .. }) => message,
            _ => {
                let text = response.text();
                if text.trim().is_empty() { "registered".to_string() } else { text }
            }
        };
        tracing::info!(role = %profile.role, "registration accepted");
        Ok(message)
    }

    /// `true` when an account already uses `email`.
    pub async fn check_email(&self, email: &str) -> Result<bool, ClientError> {
        let request = ApiRequest::get(CHECK_EMAIL_PATH).anonymous().query("email", email.trim());
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ClientError::from_response(&response));
        }
        response.decode()
    }

    fn publish(&self, identity: Option<Identity>) {
        if let Err(e) = self.identity.publish(identity) {
            tracing::error!(error = ?e, "failed to broadcast identity change");
        }
    }
}

impl core::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthSession")
            .field("identity", &self.current_identity())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use academia_core::{StudentId, TrainerId, UserId};
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::{ApiResponse, Method, TransportError};

    fn login_ok(role: &str, extra: serde_json::Value) -> ApiResponse {
        let mut user = json!({"id": 1, "username": "sara", "role": role});
        if let (Some(user), Some(extra)) = (user.as_object_mut(), extra.as_object()) {
            user.extend(extra.clone());
        }
        ApiResponse::json_body(200, &json!({"token": "tok-1", "user": user}))
    }

    fn session(transport: &Arc<ScriptedTransport>) -> AuthSession {
        AuthSession::new(transport.clone(), SessionStore::in_memory())
    }

    #[tokio::test]
    async fn login_publishes_identity_to_existing_subscribers_and_persists_it() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Post, LOGIN_PATH, login_ok("STUDENT", json!({"studentId": 5})));
        let session = session(&transport);
        let sub = session.subscribe();
        assert_eq!(sub.try_recv().unwrap(), None);

        let role = session.login("sara@school.edu", "secret").await.unwrap();

        assert_eq!(role, Role::Student);
        let expected = Identity::student("sara", StudentId::new(5)).unwrap().with_user_id(UserId::new(1));
        assert_eq!(sub.try_recv().unwrap(), Some(expected.clone()));
        assert_eq!(session.store().load(), Some(expected));
        assert_eq!(session.store().load_token().unwrap().as_str(), "tok-1");
        assert!(session.can(Capability::ViewOwnGrades));
        assert!(!session.can(Capability::AssignGrades));

        let sent = transport.requests();
        assert!(!sent[0].authenticated);
        assert_eq!(sent[0].body.as_ref().unwrap()["username"], "sara@school.edu");
        assert_eq!(sent[0].body.as_ref().unwrap()["email"], "sara@school.edu");
    }

    #[tokio::test]
    async fn failed_login_leaves_previous_session_untouched() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Post, LOGIN_PATH, login_ok("TRAINER", json!({"trainerId": 7})));
        transport.reply(Method::Post, LOGIN_PATH, ApiResponse::json_body(401, &json!({"error": "Bad credentials"})));
        let session = session(&transport);

        session.login("tom", "right").await.unwrap();
        let before = session.current_identity();
        let sub = session.subscribe();
        sub.drain();

        let err = session.login("tom", "wrong").await.unwrap_err();

        assert_eq!(err, ClientError::InvalidCredentials);
        assert_eq!(session.current_identity(), before);
        assert_eq!(session.store().load(), before);
        assert!(sub.try_recv().is_err(), "no emission on failure");
    }

    #[tokio::test]
    async fn trainer_login_without_trainer_ref_is_malformed() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Post, LOGIN_PATH, login_ok("TRAINER", json!({})));
        let session = session(&transport);

        let err = session.login("tom", "pw").await.unwrap_err();

        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert_eq!(session.current_identity(), None);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_retryable_transport_failure() {
        let transport = ScriptedTransport::new();
        transport.fail(Method::Post, LOGIN_PATH, TransportError::new("connection refused"));
        let session = session(&transport);

        let err = session.login("tom", "pw").await.unwrap_err();

        assert!(matches!(err, ClientError::TransportFailure(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn logout_clears_even_when_server_call_fails() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Post, LOGIN_PATH, login_ok("ADMIN", json!({})));
        transport.fail(Method::Post, LOGOUT_PATH, TransportError::new("connection reset"));
        let session = session(&transport);
        session.login("root", "pw").await.unwrap();
        let sub = session.subscribe();
        sub.drain();

        session.logout().await;

        assert_eq!(sub.try_recv().unwrap(), None);
        assert_eq!(session.current_identity(), None);
        assert!(!session.can(Capability::ManageCourses));
        assert_eq!(session.store().load(), None);
        assert_eq!(session.store().load_token(), None);
        assert!(transport.requests().last().unwrap().authenticated);
    }

    #[tokio::test]
    async fn session_rehydrates_from_store_at_startup() {
        let store = SessionStore::in_memory();
        let identity = Identity::trainer("tom", TrainerId::new(7)).unwrap();
        store.save(&identity, &academia_auth::BearerToken::new("tok"));

        let session = AuthSession::new(ScriptedTransport::new(), store);

        assert_eq!(session.current_identity(), Some(identity.clone()));
        assert_eq!(session.subscribe().try_recv().unwrap(), Some(identity));
    }

    #[tokio::test]
    async fn login_works_without_a_persistence_medium() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Post, LOGIN_PATH, login_ok("ADMIN", json!({})));
        let session = AuthSession::new(transport.clone(), SessionStore::unavailable());

        assert_eq!(session.login("root", "pw").await.unwrap(), Role::Admin);
        assert_eq!(session.current_identity().unwrap().role(), Role::Admin);
        assert_eq!(session.store().load(), None);
    }

    #[tokio::test]
    async fn login_resolving_after_logout_is_discarded() {
        let transport = ScriptedTransport::new();
        let gate = transport.gate(Method::Post, LOGIN_PATH);
        let session = Arc::new(session(&transport));

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.login("sara", "pw").await }
        });
        transport.wait_for_requests(1).await;

        session.logout().await;
        let _ = gate.send(Ok(login_ok("STUDENT", json!({"studentId": 5}))));

        assert_eq!(pending.await.unwrap(), Err(ClientError::LoginSuperseded));
        assert_eq!(session.current_identity(), None);
        assert_eq!(session.store().load(), None);
    }

    #[tokio::test]
    async fn concurrent_logins_resolve_last_write_wins() {
        let transport = ScriptedTransport::new();
        let first = transport.gate(Method::Post, LOGIN_PATH);
        let second = transport.gate(Method::Post, LOGIN_PATH);
        let session = Arc::new(session(&transport));

        let a = tokio::spawn({
            let session = session.clone();
            async move { session.login("tom", "pw").await }
        });
        transport.wait_for_requests(1).await;
        let b = tokio::spawn({
            let session = session.clone();
            async move { session.login("sara", "pw").await }
        });
        transport.wait_for_requests(2).await;

        let _ = second.send(Ok(login_ok("STUDENT", json!({"studentId": 5}))));
        assert_eq!(b.await.unwrap(), Ok(Role::Student));
        let _ = first.send(Ok(login_ok("TRAINER", json!({"trainerId": 7}))));
        assert_eq!(a.await.unwrap(), Ok(Role::Trainer));

        assert_eq!(session.current_identity().unwrap().role(), Role::Trainer);
    }

    #[tokio::test]
    async fn registration_is_validated_before_dispatch() {
        let transport = ScriptedTransport::new();
        let session = session(&transport);
        let profile = RegistrationProfile {
            first_name: "Sara".into(),
            last_name: String::new(),
            email: "not-an-email".into(),
            username: "sara".into(),
            password: "secret1".into(),
            role: Role::Student,
        };

        let err = session.register(&profile).await.unwrap_err();

        match err {
            ClientError::ValidationFailed { fields, .. } => {
                assert_eq!(fields, vec!["lastName".to_string(), "email".to_string()])
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_surfaces_server_message() {
        let transport = ScriptedTransport::new();
        transport.reply(
            Method::Post,
            REGISTER_PATH,
            ApiResponse::json_body(400, &json!({"message": "Username is already taken!"})),
        );
        let session = session(&transport);
        let profile = RegistrationProfile {
            first_name: "Sara".into(),
            last_name: "Benali".into(),
            email: "sara@school.edu".into(),
            username: "sara".into(),
            password: "secret1".into(),
            role: Role::Student,
        };

        let err = session.register(&profile).await.unwrap_err();

        assert_eq!(err.server_message(), Some("Username is already taken!"));
        assert_eq!(session.current_identity(), None);
    }

    #[tokio::test]
    async fn check_email_sends_query_anonymously() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Get, CHECK_EMAIL_PATH, ApiResponse::json_body(200, &json!(true)));
        let session = session(&transport);

        assert!(session.check_email(" sara@school.edu ").await.unwrap());

        let sent = &transport.requests()[0];
        assert!(!sent.authenticated);
        assert_eq!(sent.query, vec![("email".to_string(), "sara@school.edu".to_string())]);
    }
}
