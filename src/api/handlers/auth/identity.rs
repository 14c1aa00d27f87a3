//! Platform identity resolution.
//!
//! The platform in front of this service (reverse proxy, SSO gateway)
//! authenticates the browser session and forwards the user email in a
//! trusted header. Resolution has no side effects; anything short of a
//! usable value resolves to "no identity".

use axum::http::HeaderMap;

/// Identity descriptor returned by the platform identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    email: String,
}

impl Identity {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Source of the currently authenticated platform identity.
pub trait IdentityProvider: Send + Sync {
    /// Current platform identity for this request, if any.
    fn current_identity(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Identity provider reading a trusted reverse-proxy header.
#[derive(Clone, Debug)]
pub struct HeaderIdentityProvider {
    header: String,
}

impl HeaderIdentityProvider {
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl IdentityProvider for HeaderIdentityProvider {
    fn current_identity(&self, headers: &HeaderMap) -> Option<Identity> {
        headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Identity::new)
    }
}
