//! Auth bootstrap handlers and supporting modules.
//!
//! This module bridges a platform-level identity (established in front of
//! this service) and an application-level session for managed-software
//! clients.
//!
//! ## Classification Order
//!
//! Admin membership is checked before support membership and the first
//! match wins, so a principal present in both groups gets the admin level
//! and an admin match never queries the support group. A classification
//! failure never reaches the session service.
//!
//! ## Failure Shape
//!
//! All failures (no identity, unauthorized principal, token issuance
//! failure) surface as the same `403` so unauthenticated callers cannot
//! probe group membership.

pub(crate) mod identity;
pub(crate) mod registry;
pub(crate) mod session;
mod state;
mod types;
pub(crate) mod user_auth;

pub use identity::{HeaderIdentityProvider, Identity, IdentityProvider};
pub use registry::{GroupRegistry, RemoteGroups, RoleRegistry};
pub use session::{PgSessionStore, SessionService, AUTH_TOKEN_COOKIE};
pub use state::{AuthConfig, AuthState};
pub use types::PrivilegeLevel;
pub use user_auth::{user_auth, NotAuthenticated};
