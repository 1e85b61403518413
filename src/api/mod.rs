// HTTP API routes (accounts, bot control, clan requests, stats).

pub mod ws;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::accounts;
use crate::bot_manager::BotManager;
use crate::clan::ClanRequests;
use crate::db::Database;
use crate::error::PanelError;
use crate::events::Notifier;
use crate::metrics;

// ── Request types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterAccountRequest {
    #[serde(default)]
    pub token: String,
    pub clan_id: Option<String>,
}

#[derive(Deserialize)]
pub struct BotControlRequest {
    #[serde(default)]
    pub account_id: String,
}

#[derive(Deserialize)]
pub struct ClanRequestBody {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub clan_id: String,
}

#[derive(Deserialize)]
pub struct ClanRequestFilter {
    pub account_id: Option<String>,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub bots: Arc<BotManager>,
    pub clans: Arc<ClanRequests>,
    pub notifier: Notifier,
}

// ── Error helper ──────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

fn internal_error(e: sqlx::Error) -> impl IntoResponse {
    tracing::error!("Database error: {e}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn panel_error(e: PanelError) -> Response {
    let message = e.to_string();
    let status = match e {
        PanelError::TransientIo(inner) => return internal_error(inner).into_response(),
        PanelError::InvalidInput(_) | PanelError::NotRunning(_) => StatusCode::BAD_REQUEST,
        PanelError::NotFound(_) => StatusCode::NOT_FOUND,
        PanelError::AlreadyRunning(_) => StatusCode::CONFLICT,
    };
    json_error(status, &message).into_response()
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(
    db: Arc<Database>,
    bots: Arc<BotManager>,
    clans: Arc<ClanRequests>,
    notifier: Notifier,
) -> Router {
    let state = AppState {
        db,
        bots,
        clans,
        notifier,
    };

    Router::new()
        .route("/health", get(health_check))
        // Accounts
        .route("/api/accounts", get(list_accounts).post(register_account))
        .route(
            "/api/accounts/{id}",
            get(get_account).delete(delete_account),
        )
        .route("/api/accounts/{id}/rewards", get(list_rewards))
        // Bot control
        .route("/api/bot/start", post(start_bot))
        .route("/api/bot/stop", post(stop_bot))
        // Clan requests
        .route("/api/clan/request", post(submit_clan_request))
        .route("/api/clan/requests", get(list_clan_requests))
        // Stats
        .route("/api/stats", get(get_stats))
        .route("/metrics", get(get_metrics))
        // WebSocket
        .route("/ws", get(ws::ws_events))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "glory-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// ── Account handlers ──────────────────────────────────────────────────

async fn list_accounts(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.list_accounts().await {
        Ok(accounts) => (StatusCode::OK, Json(json!(accounts))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

async fn register_account(
    State(state): State<AppState>,
    Json(req): Json<RegisterAccountRequest>,
) -> impl IntoResponse {
    match accounts::register_account(&state.db, &req.token, req.clan_id.as_deref()).await {
        Ok(account) => (
            StatusCode::CREATED,
            Json(json!({
                "status": "success",
                "account_id": account.id,
                "account": account,
            })),
        )
            .into_response(),
        Err(e) => panel_error(e),
    }
}

async fn get_account(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.db.get_account(&id).await {
        Ok(Some(account)) => (StatusCode::OK, Json(json!(account))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Account not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match accounts::delete_account(&state.bots, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => panel_error(e),
    }
}

async fn list_rewards(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.db.get_account(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "Account not found").into_response(),
        Err(e) => return internal_error(e).into_response(),
    }

    match state.db.list_reward_events(&id).await {
        Ok(events) => (StatusCode::OK, Json(json!(events))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ── Bot control handlers ──────────────────────────────────────────────

async fn start_bot(
    State(state): State<AppState>,
    Json(req): Json<BotControlRequest>,
) -> impl IntoResponse {
    if req.account_id.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "account_id is required").into_response();
    }

    match state.bots.start(&req.account_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "running",
                "account_id": req.account_id,
                "message": "Bot started. Connect to /ws for live updates."
            })),
        )
            .into_response(),
        Err(e) => panel_error(e),
    }
}

async fn stop_bot(
    State(state): State<AppState>,
    Json(req): Json<BotControlRequest>,
) -> impl IntoResponse {
    if req.account_id.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "account_id is required").into_response();
    }

    match state.bots.stop(&req.account_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "stopped", "account_id": req.account_id })),
        )
            .into_response(),
        Err(e) => panel_error(e),
    }
}

// ── Clan handlers ─────────────────────────────────────────────────────

async fn submit_clan_request(
    State(state): State<AppState>,
    Json(req): Json<ClanRequestBody>,
) -> impl IntoResponse {
    if req.account_id.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "account_id is required").into_response();
    }

    match state.clans.submit(&req.account_id, &req.clan_id).await {
        Ok(request_id) => (
            StatusCode::ACCEPTED,
            Json(json!({
                "status": "pending",
                "request_id": request_id,
                "message": "Clan request sent",
            })),
        )
            .into_response(),
        Err(e) => panel_error(e),
    }
}

async fn list_clan_requests(
    State(state): State<AppState>,
    Query(filter): Query<ClanRequestFilter>,
) -> impl IntoResponse {
    match state
        .db
        .list_clan_requests(filter.account_id.as_deref())
        .await
    {
        Ok(requests) => (StatusCode::OK, Json(json!(requests))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ── Stats handlers ────────────────────────────────────────────────────

async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.stats().await {
        Ok(stats) => (StatusCode::OK, Json(json!(stats))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

async fn get_metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
        .into_response()
}
