// Prometheus metrics definitions for the glory panel.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Accounts with a registered reward loop.
    pub static ref BOTS_RUNNING: IntGauge =
        IntGauge::new("glory_bots_running", "Accounts with a running bot loop").unwrap();

    /// Clan requests waiting for resolution.
    pub static ref CLAN_REQUESTS_PENDING: IntGauge =
        IntGauge::new("glory_clan_requests_pending", "Clan requests awaiting resolution").unwrap();

    /// Live WebSocket connections.
    pub static ref CONNECTED_WEBSOCKETS: IntGauge =
        IntGauge::new("glory_connected_websockets", "Live WebSocket connections").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Successful reward ticks across all bots.
    pub static ref REWARD_TICKS_TOTAL: IntCounter =
        IntCounter::new("glory_reward_ticks_total", "Successful reward ticks").unwrap();

    /// Glory credited across all accounts.
    pub static ref GLORY_AWARDED_TOTAL: IntCounter =
        IntCounter::new("glory_awarded_total", "Glory credited to accounts").unwrap();

    /// Reward ticks that failed and were retried.
    pub static ref BOT_TICK_ERRORS_TOTAL: IntCounter =
        IntCounter::new("glory_bot_tick_errors_total", "Reward ticks that failed").unwrap();

    /// Clan requests submitted.
    pub static ref CLAN_REQUESTS_SUBMITTED_TOTAL: IntCounter = IntCounter::new(
        "glory_clan_requests_submitted_total",
        "Clan requests submitted",
    )
    .unwrap();

    /// Clan requests resolved, by outcome.
    pub static ref CLAN_REQUESTS_RESOLVED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("glory_clan_requests_resolved_total", "Clan requests resolved"),
        &["status"],
    )
    .unwrap();

    /// Total WebSocket messages sent to clients.
    pub static ref WEBSOCKET_MESSAGES_SENT_TOTAL: IntCounter = IntCounter::new(
        "glory_websocket_messages_sent_total",
        "Total WebSocket messages sent",
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(BOTS_RUNNING.clone()),
        Box::new(CLAN_REQUESTS_PENDING.clone()),
        Box::new(CONNECTED_WEBSOCKETS.clone()),
        Box::new(REWARD_TICKS_TOTAL.clone()),
        Box::new(GLORY_AWARDED_TOTAL.clone()),
        Box::new(BOT_TICK_ERRORS_TOTAL.clone()),
        Box::new(CLAN_REQUESTS_SUBMITTED_TOTAL.clone()),
        Box::new(CLAN_REQUESTS_RESOLVED_TOTAL.clone()),
        Box::new(WEBSOCKET_MESSAGES_SENT_TOTAL.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("Metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
