//! Session token issuance and validation.
//!
//! Tokens are opaque ULIDs scoped to one principal at one privilege level.
//! The store answers two questions: mint a token (which may fail, a
//! terminal condition for the request) and decide whether a presented
//! token still maps to a live, unexpired session.

use async_trait::async_trait;
use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};
use sqlx::PgPool;
use tracing::{error, info_span, Instrument};
use ulid::Ulid;

use super::types::PrivilegeLevel;

/// Cookie carrying the session token; shared with the clients that later
/// present it.
pub const AUTH_TOKEN_COOKIE: &str = "AUTH_TOKEN";

/// External session service minting and validating session tokens.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Mint a token for one principal at one level. `None` means issuance
    /// failed; the caller treats that as terminal, not retryable.
    async fn create_token(&self, principal: &str, level: PrivilegeLevel) -> Option<String>;

    /// True if the presented token maps to a live session.
    async fn validate(&self, token: &str) -> bool;
}

/// Postgres-backed session store.
pub struct PgSessionStore {
    pool: PgPool,
    ttl_seconds: i64,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool, ttl_seconds: i64) -> Self {
        Self { pool, ttl_seconds }
    }
}

#[async_trait]
impl SessionService for PgSessionStore {
    async fn create_token(&self, principal: &str, level: PrivilegeLevel) -> Option<String> {
        let token = Ulid::new().to_string();

        let query = "INSERT INTO auth_sessions (token, principal, level, expires_at) \
                     VALUES ($1, $2, $3, now() + make_interval(secs => $4::double precision))";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        match sqlx::query(query)
            .bind(&token)
            .bind(principal)
            .bind(level.as_i16())
            .bind(self.ttl_seconds)
            .execute(&self.pool)
            .instrument(span)
            .await
        {
            Ok(_) => Some(token),
            Err(err) => {
                error!("Failed to persist session token: {}", err);
                None
            }
        }
    }

    async fn validate(&self, token: &str) -> bool {
        // Anything that does not even parse as a ULID never reaches the store.
        if Ulid::from_string(token).is_err() {
            return false;
        }

        let query = "SELECT 1 FROM auth_sessions WHERE token = $1 AND expires_at > now()";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        match sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
        {
            Ok(row) => row.is_some(),
            Err(err) => {
                error!("Failed to validate session token: {}", err);
                false
            }
        }
    }
}

/// Build the `Set-Cookie` value handed back to the caller.
pub(super) fn auth_cookie(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{AUTH_TOKEN_COOKIE}={token}; secure; httponly;"))
}

/// Extract a previously issued session token from the request cookies.
pub(super) fn extract_auth_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == AUTH_TOKEN_COOKIE {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{auth_cookie, extract_auth_token, PgSessionStore, SessionService, AUTH_TOKEN_COOKIE};
    use crate::api::handlers::auth::PrivilegeLevel;
    use axum::http::{HeaderMap, HeaderValue};
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

    #[test]
    fn auth_cookie_format() {
        let cookie = auth_cookie("tok-123");
        assert_eq!(
            cookie.ok().as_ref().and_then(|v| v.to_str().ok()),
            Some("AUTH_TOKEN=tok-123; secure; httponly;")
        );
    }

    #[test]
    fn extract_auth_token_finds_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; AUTH_TOKEN=tok-123; lang=en"),
        );
        assert_eq!(extract_auth_token(&headers), Some("tok-123".to_string()));
    }

    #[test]
    fn extract_auth_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark"),
        );
        assert_eq!(extract_auth_token(&headers), None);
        assert_eq!(extract_auth_token(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_name_is_stable() {
        // Clients key their storage on this literal.
        assert_eq!(AUTH_TOKEN_COOKIE, "AUTH_TOKEN");
    }

    #[tokio::test]
    async fn validate_rejects_malformed_token_without_db() {
        // The unreachable pool would error loudly if the query ran.
        let store = PgSessionStore::new(unreachable_pool(), 60);
        assert!(!store.validate("not-a-ulid").await);
    }

    #[tokio::test]
    async fn create_token_fails_without_db() {
        let store = PgSessionStore::new(unreachable_pool(), 60);
        let token = store
            .create_token("alice@example.com", PrivilegeLevel::Admin)
            .await;
        assert_eq!(token, None);
    }

    #[tokio::test]
    async fn validate_fails_without_db() {
        let store = PgSessionStore::new(unreachable_pool(), 60);
        let token = ulid::Ulid::new().to_string();
        assert!(!store.validate(&token).await);
    }
}
