use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{ConnectInfo, State},
    http::{Extensions, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, info, instrument, warn};

use crate::{
    config::Config,
    errors::Error,
    relay::RefreshRelay,
    signal::shutdown_signal,
    telemetry::refresh::RefreshTrigger,
    types::{
        ConfigFlags, ErrorDetail, HealthResponse, RefreshFailed, RefreshResult, RefreshSucceeded,
        RootResponse,
    },
};

pub const SERVICE_NAME: &str = "Withings Token Guardian MCP";
pub const GUARDIAN_SECRET_HEADER: &str = "x-guardian-secret";
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    relay: RefreshRelay,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, Error> {
        let relay = RefreshRelay::new(&config)?;
        Ok(Self::with_relay(config, relay))
    }

    pub fn with_relay(config: Config, relay: RefreshRelay) -> Self {
        AppState {
            config: Arc::new(config),
            relay,
        }
    }
}

/// Build the axum router for the relay's HTTP surface.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook/refresh-needed", post(refresh_needed))
        .route("/refresh", post(manual_refresh))
        .with_state(state)
}

/// Binds `0.0.0.0:{port}` and serves until SIGINT or SIGTERM.
pub async fn serve(config: Config) -> Result<(), Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config)?;
    info!(
        addr = %addr,
        upstream = %state.relay.refresh_url(),
        "token guardian listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("token guardian stopped");
    Ok(())
}

fn now() -> String {
    jiff::Timestamp::now().to_string()
}

fn client_addr(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// With no shared secret configured every caller is let through.
fn caller_authorized(config: &Config, headers: &HeaderMap, header: &str) -> bool {
    if !config.secret_required() {
        return true;
    }
    headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|presented| presented == config.shared_secret)
}

fn unauthorized(detail: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorDetail { detail })).into_response()
}

async fn run_relay(relay: &RefreshRelay, trigger: RefreshTrigger) -> Result<RefreshResult, String> {
    let relay = relay.clone();
    run_guarded(async move { RefreshResult::from(relay.refresh(trigger).await) }).await
}

/// Runs `fut` on its own task so a panic inside it is reported to the
/// caller instead of tearing down the connection.
async fn run_guarded<F>(fut: F) -> Result<RefreshResult, String>
where
    F: Future<Output = RefreshResult> + Send + 'static,
{
    tokio::spawn(fut).await.map_err(|e| e.to_string())
}

fn refreshed(result: RefreshResult) -> Response {
    (
        StatusCode::OK,
        Json(RefreshSucceeded {
            success: true,
            message: "Token refreshed successfully",
            expires_at: result.expires_at,
            timestamp: now(),
        }),
    )
        .into_response()
}

fn failed(message: &'static str, error: String, timestamp: Option<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(RefreshFailed {
            success: false,
            message,
            error,
            timestamp,
        }),
    )
        .into_response()
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        service: SERVICE_NAME,
        status: "online",
        timestamp: now(),
        withings_mcp_url: state.config.upstream_base_url.clone(),
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "healthy",
        config: ConfigFlags {
            withings_mcp_configured: !config.upstream_base_url.is_empty(),
            admin_token_configured: !config.admin_token.is_empty(),
            guardian_secret_configured: !config.shared_secret.is_empty(),
            railway_token_configured: !config.railway_token.is_empty(),
        },
        timestamp: now(),
    })
}

/// Called by the upstream service when it starts seeing 401s from Withings.
#[instrument(name = "guardian.webhook", skip_all)]
async fn refresh_needed(
    State(state): State<AppState>,
    extensions: Extensions,
    headers: HeaderMap,
) -> Response {
    if !caller_authorized(&state.config, &headers, GUARDIAN_SECRET_HEADER) {
        warn!(client = %client_addr(&extensions), "unauthorized refresh attempt");
        return unauthorized("Invalid guardian secret");
    }

    info!("token refresh webhook triggered");
    webhook_response(run_relay(&state.relay, RefreshTrigger::Webhook).await)
}

fn webhook_response(outcome: Result<RefreshResult, String>) -> Response {
    match outcome {
        Ok(result) if result.success => {
            info!("token refresh successful");
            refreshed(result)
        }
        Ok(result) => {
            let error = result.error.unwrap_or_default();
            error!(error = %error, "token refresh failed");
            failed("Token refresh failed", error, Some(now()))
        }
        Err(cause) => {
            error!(error = %cause, "token refresh aborted");
            failed("Token refresh exception", cause, Some(now()))
        }
    }
}

/// Manual trigger. Callers present the guardian secret as `X-Admin-Token`.
#[instrument(name = "guardian.manual", skip_all)]
async fn manual_refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !caller_authorized(&state.config, &headers, ADMIN_TOKEN_HEADER) {
        warn!("unauthorized manual refresh attempt");
        return unauthorized("Invalid admin token");
    }

    info!("manual token refresh triggered");
    manual_response(run_relay(&state.relay, RefreshTrigger::Manual).await)
}

fn manual_response(outcome: Result<RefreshResult, String>) -> Response {
    match outcome {
        Ok(result) if result.success => refreshed(result),
        Ok(result) => failed("Token refresh failed", result.error.unwrap_or_default(), None),
        Err(cause) => {
            error!(error = %cause, "manual token refresh aborted");
            failed("Exception during refresh", cause, None)
        }
    }
}
