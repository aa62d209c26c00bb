//! Route guarding at navigation time.

use std::sync::Arc;

use academia_auth::{DenialKind, Decision, LOGIN_ROUTE, Role, RouteAccess, RouteTable, decide, normalize_path};

use crate::auth_session::AuthSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The destination may be shown.
    Render(String),
    /// Go to `to` instead. `reason` is `None` when the path names no known area.
    Redirect { to: &'static str, reason: Option<DenialKind> },
}

impl NavigationOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, NavigationOutcome::Render(_))
    }
}

/// Decides every navigation against the identity current at that moment.
#[derive(Debug, Clone)]
pub struct Navigator {
    session: Arc<AuthSession>,
    routes: RouteTable,
}

impl Navigator {
    pub fn new(session: Arc<AuthSession>) -> Self {
        Self::with_routes(session, RouteTable::portal())
    }

    pub fn with_routes(session: Arc<AuthSession>, routes: RouteTable) -> Self {
        Self { session, routes }
    }

    /// Decide `path` in its canonical form; a `Render` carries that form, never
    /// the raw input.
    pub fn navigate(&self, path: &str) -> NavigationOutcome {
        let path = normalize_path(path);
        let policy = match self.routes.resolve(&path) {
            Some(RouteAccess::Public) => return NavigationOutcome::Render(path),
            Some(RouteAccess::Guarded(policy)) => policy,
            None => {
                return NavigationOutcome::Redirect {
                    to: LOGIN_ROUTE,
                    reason: None,
                };
            }
        };

        let identity = self.session.current_identity();
        match decide(policy, identity.as_ref()) {
            Decision::Allow => NavigationOutcome::Render(path),
            Decision::Deny(kind) => {
                tracing::debug!(path = %path, reason = ?kind, "navigation denied");
                NavigationOutcome::Redirect {
                    to: LOGIN_ROUTE,
                    reason: Some(kind),
                }
            }
        }
    }

    /// Landing route after a successful login.
    pub fn home_for(role: Role) -> &'static str {
        role.home_route()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::session_store::SessionStore;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;

    fn navigator_for(role: Option<(&str, serde_json::Value)>) -> (Navigator, Arc<AuthSession>, Arc<ScriptedTransport>) {
        let transport = ScriptedTransport::new();
        if let Some((role, mut user)) = role {
            user["username"] = json!("someone");
            user["role"] = json!(role);
            transport.reply_json(Method::Post, "/api/auth/login", 200, json!({"token": "t", "user": user}));
        }
        let session = Arc::new(AuthSession::new(transport.clone(), SessionStore::in_memory()));
        (Navigator::new(session.clone()), session, transport)
    }

    fn denied(reason: DenialKind) -> NavigationOutcome {
        NavigationOutcome::Redirect {
            to: LOGIN_ROUTE,
            reason: Some(reason),
        }
    }

    #[test]
    fn anonymous_users_are_sent_to_login() {
        let (nav, _, _) = navigator_for(None);
        assert_eq!(nav.navigate("/student/dashboard"), denied(DenialKind::Anonymous));
        assert!(nav.navigate("/auth/login").is_render());
        assert!(nav.navigate("/auth/register").is_render());
    }

    #[test]
    fn root_and_unknown_paths_redirect_to_login() {
        let (nav, _, _) = navigator_for(None);
        let to_login = NavigationOutcome::Redirect {
            to: LOGIN_ROUTE,
            reason: None,
        };
        assert_eq!(nav.navigate("/"), to_login);
        assert_eq!(nav.navigate("/nowhere"), to_login);
    }

    #[tokio::test]
    async fn dot_segments_cannot_climb_out_of_a_public_area() {
        let (nav, session, _) = navigator_for(Some(("STUDENT", json!({"studentId": 3}))));
        assert_eq!(nav.navigate("/auth/../admin/dashboard"), denied(DenialKind::Anonymous));
        assert_eq!(nav.navigate("/auth/%2e%2e/student"), denied(DenialKind::Anonymous));

        session.login("s", "pw").await.unwrap();

        assert_eq!(
            nav.navigate("/auth/../admin/dashboard"),
            denied(DenialKind::RoleNotPermitted(Role::Student))
        );
        assert_eq!(
            nav.navigate("/auth/./../student/./grades"),
            NavigationOutcome::Render("/student/grades".into())
        );
    }

    #[tokio::test]
    async fn student_is_confined_to_student_area() {
        let (nav, session, _) = navigator_for(Some(("STUDENT", json!({"studentId": 3}))));
        let role = session.login("s", "pw").await.unwrap();

        assert_eq!(Navigator::home_for(role), "/student");
        assert_eq!(nav.navigate("/student/dashboard"), NavigationOutcome::Render("/student/dashboard".into()));
        assert_eq!(nav.navigate("/admin/courses"), denied(DenialKind::RoleNotPermitted(Role::Student)));
        assert_eq!(nav.navigate("/trainer/grades"), denied(DenialKind::RoleNotPermitted(Role::Student)));
    }

    #[tokio::test]
    async fn admin_enters_every_area() {
        let (nav, session, _) = navigator_for(Some(("ADMIN", json!({}))));
        session.login("root", "pw").await.unwrap();

        for path in ["/admin/dashboard", "/trainer/grades", "/student/dashboard"] {
            assert!(nav.navigate(path).is_render(), "{path}");
        }
    }

    #[tokio::test]
    async fn decisions_follow_the_latest_identity() {
        let (nav, session, _) = navigator_for(Some(("TRAINER", json!({"trainerId": 7}))));
        session.login("tom", "pw").await.unwrap();
        assert!(nav.navigate("/trainer/dashboard").is_render());

        session.logout().await;

        assert_eq!(nav.navigate("/trainer/dashboard"), denied(DenialKind::Anonymous));
    }
}
