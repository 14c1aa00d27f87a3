//! Auth state and configuration.

use std::sync::Arc;

use super::{identity::IdentityProvider, registry::RoleRegistry, session::SessionService};

const DEFAULT_SESSION_TTL_SECONDS: i64 = 6 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    identity_header: String,
    session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(identity_header: String) -> Self {
        Self {
            identity_header,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn identity_header(&self) -> &str {
        &self.identity_header
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }
}

/// Collaborators of the bootstrap flow, injected at construction time so
/// tests can substitute fakes without touching global state.
pub struct AuthState {
    config: AuthConfig,
    identity: Arc<dyn IdentityProvider>,
    registry: Arc<dyn RoleRegistry>,
    sessions: Arc<dyn SessionService>,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        identity: Arc<dyn IdentityProvider>,
        registry: Arc<dyn RoleRegistry>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            config,
            identity,
            registry,
            sessions,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub(super) fn registry(&self) -> &dyn RoleRegistry {
        self.registry.as_ref()
    }

    pub(super) fn sessions(&self) -> &dyn SessionService {
        self.sessions.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthConfig, DEFAULT_SESSION_TTL_SECONDS};

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("x-authenticated-user".to_string());

        assert_eq!(config.identity_header(), "x-authenticated-user");
        assert_eq!(config.session_ttl_seconds(), DEFAULT_SESSION_TTL_SECONDS);

        let config = config.with_session_ttl_seconds(600);
        assert_eq!(config.session_ttl_seconds(), 600);
    }
}
