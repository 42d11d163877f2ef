//! Axum-based HTTP gateway for the account API.
//!
//! - `GET  /api/users`        — list accounts (bearer token required)
//! - `GET  /api/users/{id}`   — fetch one account (bearer token required)
//! - `POST /api/auth/login`   — exchange email + password for a token
//! - `POST /api/auth/signup`  — register a new account
//! - `GET  /health`           — liveness + counters
//!
//! Everything else is served from the configured client directory.

pub mod envelope;

use crate::auth::{AuthError, AuthService};
use crate::config::{Config, GatewayConfig};
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use envelope::{ApiError, ApiResult, Envelope, ResponseData};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}

/// Build the router: API routes, static fallback, and the HTTP hardening layers.
pub fn build_router(state: AppState, gateway: &GatewayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/users", get(handle_list_accounts))
        .route("/api/users/{id}", get(handle_get_account))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/signup", post(handle_signup))
        .with_state(state)
        .fallback_service(ServeDir::new(&gateway.client_dir))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(gateway.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ))
        .layer(middleware::map_response(envelope_layer_rejections))
}

/// Rewrites the plain-text 408/413 answers of the tower layers into envelopes.
async fn envelope_layer_rejections(resp: Response) -> Response {
    let is_json = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return resp;
    }
    match resp.status() {
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout.into_response(),
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        _ => resp,
    }
}

/// Bind and serve until Ctrl+C.
pub async fn run_gateway(config: Config) -> Result<()> {
    let gateway = &config.gateway;
    let addr: SocketAddr = format!("{}:{}", gateway.host, gateway.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    if !gateway.client_dir.is_dir() {
        tracing::warn!(
            "Client directory {} does not exist; static requests will 404",
            gateway.client_dir.display()
        );
    }

    let state = AppState::new(AuthService::default());
    let app = build_router(state, gateway);

    tracing::info!("Listening on http://{local_addr}");
    println!("  GET  /api/users          — list accounts (Authorization required)");
    println!("  GET  /api/users/{{id}}     — fetch one account (Authorization required)");
    println!("  POST /api/auth/login     — {{\"email\", \"password\"}} -> token");
    println!("  POST /api/auth/signup    — {{\"email\", \"password\", ...}} -> account");
    println!("  GET  /health             — health check");
    println!("  GET  /*                  — static files from {}", gateway.client_dir.display());
    println!("  Press Ctrl+C to stop.\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// AXUM HANDLERS
// ══════════════════════════════════════════════════════════════════════════════

/// Login/signup body: `email` and `password`, plus any other fields.
///
/// Field names match case-insensitively; an exact-case key wins over a folded one.
#[derive(Debug)]
struct CredentialBody {
    email: String,
    password: String,
    /// Everything else; becomes the account's `OtherData` on signup.
    rest: Map<String, Value>,
}

impl CredentialBody {
    fn decode(body: Result<Bytes, BytesRejection>) -> Result<Self, ApiError> {
        let body = body?;
        let mut fields: Map<String, Value> = serde_json::from_slice(&body)
            .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;
        let email = take_string_field(&mut fields, "email")?;
        let password = take_string_field(&mut fields, "password")?;
        Ok(Self {
            email,
            password,
            rest: fields,
        })
    }
}

fn take_string_field(fields: &mut Map<String, Value>, name: &str) -> Result<String, ApiError> {
    let key = fields
        .keys()
        .find(|k| k.as_str() == name)
        .or_else(|| fields.keys().find(|k| k.eq_ignore_ascii_case(name)))
        .cloned()
        .ok_or_else(|| ApiError::MalformedRequest(format!("missing field `{name}`")))?;

    match fields.remove(&key) {
        Some(Value::String(value)) => Ok(value),
        other => Err(ApiError::MalformedRequest(format!(
            "invalid type for `{name}`: expected a string, found {}",
            other.unwrap_or(Value::Null)
        ))),
    }
}

/// Credential part of `Authorization: <scheme> <credential>`. The scheme is not checked.
fn extract_credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(' ').nth(1))
}

/// Gate for the read endpoints. Returns the caller's account id.
fn require_session(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let credential = extract_credential(headers).ok_or(AuthError::Unauthenticated)?;
    Ok(state.auth.authenticate(credential)?)
}

/// GET /health — always public
async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "accounts": state.auth.directory().len(),
        "sessions": state.auth.sessions().len(),
    }))
}

/// GET /api/users
async fn handle_list_accounts(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    require_session(&state, &headers)?;
    Ok(Envelope::ok(ResponseData::Users {
        users: state.auth.directory().list_all(),
    }))
}

/// GET /api/users/{id}
async fn handle_get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    require_session(&state, &headers)?;
    let user = state
        .auth
        .directory()
        .find_by_id(&id)
        .ok_or(AuthError::NotFound)?;
    Ok(Envelope::ok(ResponseData::User { user }))
}

/// POST /api/auth/login
async fn handle_login(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult {
    let body = CredentialBody::decode(body)?;
    let token = state.auth.login(&body.email, &body.password)?;
    Ok(Envelope::ok(ResponseData::Token { token }))
}

/// POST /api/auth/signup
async fn handle_signup(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult {
    let body = CredentialBody::decode(body)?;
    let account = state
        .auth
        .signup(&body.email, &body.password, Value::Object(body.rest))?;
    Ok(Envelope::ok(ResponseData::Account(account)))
}
