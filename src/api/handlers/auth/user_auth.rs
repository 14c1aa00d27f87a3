//! User auth bootstrap endpoint.
//!
//! Flow Overview: a platform-authenticated user hits `GET /uauth`. If the
//! request already carries a valid session cookie the flow ends there.
//! Otherwise the platform identity is resolved, classified against the
//! admin and support groups in that order, and a session token is minted
//! at the matching level and handed back through a secure cookie.
//!
//! Every unmet condition is a terminal, typed `NotAuthenticated` failure.
//! The three causes (no identity, not authorized, issuance failure) are
//! collapsed into one uniform response so group membership is never
//! leaked to an unauthenticated caller.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{
    session::{auth_cookie, extract_auth_token, AUTH_TOKEN_COOKIE},
    state::AuthState,
    types::PrivilegeLevel,
};

/// Terminal result of one bootstrap invocation.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Outcome {
    /// The request already carried a valid session; nothing was issued.
    AlreadyAuthenticated,
    /// A fresh token was minted for the caller.
    Issued { token: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum DenyReason {
    NoIdentity,
    NotAuthorized,
    TokenIssuance,
}

/// Typed authentication failure raised by the bootstrap flow.
#[derive(Debug)]
pub struct NotAuthenticated {
    reason: DenyReason,
}

impl NotAuthenticated {
    const fn new(reason: DenyReason) -> Self {
        Self { reason }
    }

    pub(super) const fn reason(&self) -> DenyReason {
        self.reason
    }
}

impl fmt::Display for NotAuthenticated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not authenticated")
    }
}

impl std::error::Error for NotAuthenticated {}

#[utoipa::path(
    get,
    path = "/uauth",
    responses(
        (status = 200, description = "Session established; a fresh token is delivered via Set-Cookie unless the request was already authenticated"),
        (status = 403, description = "Not authenticated")
    ),
    tag = "sesamo"
)]
pub async fn user_auth(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AuthState>>,
) -> Response {
    match authorize(&headers, &state).await {
        Ok(Outcome::AlreadyAuthenticated) => StatusCode::OK.into_response(),
        Ok(Outcome::Issued { token }) => match auth_cookie(&token) {
            Ok(cookie) => {
                let mut response_headers = HeaderMap::new();
                response_headers.insert(SET_COOKIE, cookie);
                // The body names the cookie so callers know where to look
                // for the token; it never carries the token itself.
                (StatusCode::OK, response_headers, AUTH_TOKEN_COOKIE).into_response()
            }
            Err(err) => {
                error!("Failed to build session cookie: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Err(err) => {
            // Reason stays in the logs; the response is uniform on purpose.
            warn!(reason = ?err.reason(), "User auth rejected");
            (StatusCode::FORBIDDEN, "Not authenticated").into_response()
        }
    }
}

/// Run the bootstrap decision flow for one request.
///
/// Steps are strictly ordered and fail fast: short-circuit, identity,
/// classification (admin before support), token issuance. Classification
/// failures never reach the session service.
pub(super) async fn authorize(
    headers: &HeaderMap,
    state: &AuthState,
) -> Result<Outcome, NotAuthenticated> {
    if let Some(token) = extract_auth_token(headers) {
        if state.sessions().validate(&token).await {
            return Ok(Outcome::AlreadyAuthenticated);
        }
    }

    let identity = state
        .identity()
        .current_identity(headers)
        .ok_or(NotAuthenticated::new(DenyReason::NoIdentity))?;

    // Principals are opaque; the only unusable value is an empty one.
    let principal = identity.email();
    if principal.is_empty() {
        return Err(NotAuthenticated::new(DenyReason::NoIdentity));
    }

    let level = if state.registry().is_admin(principal).await {
        PrivilegeLevel::Admin
    } else if state.registry().is_support(principal).await {
        PrivilegeLevel::Base
    } else {
        return Err(NotAuthenticated::new(DenyReason::NotAuthorized));
    };

    let Some(token) = state.sessions().create_token(principal, level).await else {
        return Err(NotAuthenticated::new(DenyReason::TokenIssuance));
    };

    info!(level = %level, "Issued session token");

    Ok(Outcome::Issued { token })
}
