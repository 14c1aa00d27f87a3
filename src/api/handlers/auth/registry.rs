//! ACL group membership checks.
//!
//! Groups are layered: statically configured members extended by rows in
//! the `acl_group_members` table. Support membership can additionally be
//! resolved against a remote group service. Lookup failures degrade to
//! "not a member"; membership data must never grant access by accident.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info_span, warn, Instrument};

use crate::APP_USER_AGENT;

pub const ADMIN_GROUP: &str = "admins";
pub const SUPPORT_GROUP: &str = "support_users";

/// Admin and support membership lookups for a principal.
#[async_trait]
pub trait RoleRegistry: Send + Sync {
    async fn is_admin(&self, email: &str) -> bool;
    async fn is_support(&self, email: &str) -> bool;
}

/// Client for the remote group system used for support membership.
#[derive(Clone, Debug)]
pub struct RemoteGroups {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl RemoteGroups {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: String, token: SecretString) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(5))
            .build()
            .context("Error creating group service client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn is_member(&self, group: &str, email: &str) -> bool {
        let mut map = HashMap::new();
        map.insert("group", group);
        map.insert("email", email);

        // check membership against the group system endpoint /membership
        match self
            .client
            .post(format!("{}/membership", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .json(&map)
            .send()
            .await
        {
            Ok(response) => match response.status() {
                StatusCode::OK | StatusCode::ACCEPTED => true,
                StatusCode::NOT_FOUND => false,
                status => {
                    warn!("Group membership lookup failed: {}", status);
                    false
                }
            },
            Err(e) => {
                error!("Error querying group service: {:?}", e);
                false
            }
        }
    }
}

/// Layered group registry: static members, then stored members, then the
/// remote group system (support only).
pub struct GroupRegistry {
    admins: Vec<String>,
    support_users: Vec<String>,
    pool: Option<PgPool>,
    remote: Option<RemoteGroups>,
}

impl GroupRegistry {
    #[must_use]
    pub fn new(admins: Vec<String>, support_users: Vec<String>) -> Self {
        Self {
            admins: normalize_members(admins),
            support_users: normalize_members(support_users),
            pool: None,
            remote: None,
        }
    }

    #[must_use]
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: RemoteGroups) -> Self {
        self.remote = Some(remote);
        self
    }

    async fn stored_member(&self, group: &str, email: &str) -> bool {
        let Some(pool) = &self.pool else {
            return false;
        };

        let query = "SELECT 1 FROM acl_group_members WHERE group_name = $1 AND email = $2";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        match sqlx::query(query)
            .bind(group)
            .bind(email)
            .fetch_optional(pool)
            .instrument(span)
            .await
        {
            Ok(row) => row.is_some(),
            Err(err) => {
                // Treated as "not a member"; membership lookups never fail open.
                warn!("Failed to query group {}: {}", group, err);
                false
            }
        }
    }
}

#[async_trait]
impl RoleRegistry for GroupRegistry {
    async fn is_admin(&self, email: &str) -> bool {
        let email = email.to_lowercase();

        if self.admins.iter().any(|member| *member == email) {
            return true;
        }

        if self.stored_member(ADMIN_GROUP, &email).await {
            return true;
        }

        // Neither the static list nor the stored group produced an admin.
        if self.admins.is_empty() {
            warn!("No admins defined! Configure members of the '{ADMIN_GROUP}' group.");
        }

        false
    }

    async fn is_support(&self, email: &str) -> bool {
        let email = email.to_lowercase();

        if self.support_users.iter().any(|member| *member == email) {
            return true;
        }

        if self.stored_member(SUPPORT_GROUP, &email).await {
            return true;
        }

        if let Some(remote) = &self.remote {
            return remote.is_member(SUPPORT_GROUP, &email).await;
        }

        false
    }
}

fn normalize_members(members: Vec<String>) -> Vec<String> {
    members
        .into_iter()
        .map(|member| member.trim().to_lowercase())
        .filter(|member| !member.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{GroupRegistry, RemoteGroups, RoleRegistry};
    use anyhow::Result;
    use secrecy::SecretString;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
    use sqlx::PgPool;
    use std::time::Duration;

    fn unreachable_pool() -> PgPool {
        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("invalid")
            .database("invalid")
            .ssl_mode(PgSslMode::Disable);
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(options)
    }

    #[tokio::test]
    async fn static_admin_membership() {
        let registry = GroupRegistry::new(vec!["alice@example.com".to_string()], vec![]);
        assert!(registry.is_admin("alice@example.com").await);
        assert!(!registry.is_admin("bob@example.com").await);
    }

    #[tokio::test]
    async fn membership_is_case_insensitive() {
        let registry = GroupRegistry::new(
            vec!["Alice@Example.COM".to_string()],
            vec!["bob@example.com".to_string()],
        );
        assert!(registry.is_admin("alice@example.com").await);
        assert!(registry.is_support("Bob@Example.com").await);
    }

    #[tokio::test]
    async fn empty_registry_denies() {
        let registry = GroupRegistry::new(vec![], vec![]);
        assert!(!registry.is_admin("alice@example.com").await);
        assert!(!registry.is_support("alice@example.com").await);
    }

    #[tokio::test]
    async fn stored_member_false_on_db_failure() {
        let registry = GroupRegistry::new(vec![], vec![]).with_pool(unreachable_pool());
        assert!(!registry.is_admin("alice@example.com").await);
        assert!(!registry.is_support("alice@example.com").await);
    }

    #[tokio::test]
    async fn static_member_wins_without_db_roundtrip() {
        // The static list short-circuits before the (unreachable) pool is hit.
        let registry = GroupRegistry::new(vec!["alice@example.com".to_string()], vec![])
            .with_pool(unreachable_pool());
        assert!(registry.is_admin("alice@example.com").await);
    }

    #[test]
    fn remote_groups_trims_trailing_slash() -> Result<()> {
        let remote = RemoteGroups::new(
            "https://groups.tld/".to_string(),
            SecretString::from("token".to_string()),
        )?;
        assert_eq!(remote.base_url, "https://groups.tld");
        Ok(())
    }
}
