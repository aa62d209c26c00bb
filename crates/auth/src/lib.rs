//! `academia-auth` — identity and route authorization (pure, no IO).
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows what
//! an authenticated identity looks like and whether that identity may enter a
//! route, nothing about how the identity was obtained.

pub mod authorize;
pub mod credentials;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod routes;

pub use authorize::{AuthzError, Decision, DenialKind, RoutePolicy, authorize, decide};
pub use credentials::{
    BearerToken, LoginRequest, LoginResponse, MIN_PASSWORD_LEN, RegisterResponse, RegistrationProfile,
    UserPayload,
};
pub use permissions::{Capability, capabilities_for};
pub use principal::{Identity, IdentityError};
pub use roles::{Role, UnknownRole};
pub use routes::{LOGIN_ROUTE, RouteAccess, RouteTable, normalize_path};
