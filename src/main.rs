use std::sync::Arc;

use tower_http::cors::CorsLayer;

use glory_backend::api;
use glory_backend::bot_manager::BotManager;
use glory_backend::clan::ClanRequests;
use glory_backend::config::Config;
use glory_backend::db::Database;
use glory_backend::events::Notifier;
use glory_backend::metrics;
use glory_backend::policy::{RandomDecision, RandomReward};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load();

    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    // No loop survives a restart; clear flags left over from the last run.
    match db.reset_running_bots().await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Reset {n} stale running bots to stopped"),
        Err(e) => tracing::error!("Failed to reset bot status: {e}"),
    }

    metrics::register_metrics();

    let notifier = Notifier::new();
    let bots = Arc::new(BotManager::new(
        db.clone(),
        notifier.clone(),
        Arc::new(RandomReward::new(config.reward_min, config.reward_max)),
        config.timing,
    ));
    let clans = Arc::new(ClanRequests::new(
        db.clone(),
        notifier.clone(),
        Arc::new(RandomDecision),
        config.timing.clan_resolve_delay,
    ));

    // Requests accepted before a restart still get their decision.
    if let Err(e) = clans.resume_pending().await {
        tracing::error!("Failed to reschedule pending clan requests: {e}");
    }

    let app = api::router(db, bots.clone(), clans.clone(), notifier).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to port {}: {e}", config.port));

    tracing::info!("Glory panel backend listening on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    bots.shutdown().await;
    clans.drain().await;
    tracing::info!("Glory panel backend stopped");
}
