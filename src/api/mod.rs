use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Method, Request},
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod handlers;

use handlers::auth::{
    AuthConfig, AuthState, GroupRegistry, HeaderIdentityProvider, PgSessionStore, RemoteGroups,
};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health::health, handlers::auth::user_auth::user_auth),
    tags((name = "sesamo", description = "Session bootstrap for platform-authenticated users"))
)]
struct ApiDoc;

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    dsn: String,
    globals: &GlobalArgs,
    config: AuthConfig,
    admins: Vec<String>,
    support_users: Vec<String>,
) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let mut registry = GroupRegistry::new(admins, support_users).with_pool(pool.clone());
    if let Some(url) = &globals.group_service_url {
        let remote = RemoteGroups::new(url.clone(), globals.group_service_token.clone())?;
        registry = registry.with_remote(remote);
    }

    let identity = HeaderIdentityProvider::new(config.identity_header());
    let sessions = PgSessionStore::new(pool.clone(), config.session_ttl_seconds());

    let auth_state = Arc::new(AuthState::new(
        config,
        Arc::new(identity),
        Arc::new(registry),
        Arc::new(sessions),
    ));

    let cors = CorsLayer::new().allow_methods([Method::GET]).allow_origin(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/uauth", get(handlers::auth::user_auth))
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(auth_state)),
        );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
