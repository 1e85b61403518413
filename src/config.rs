// Application configuration, loaded from environment variables and CLI flags.

use std::time::Duration;

use crate::policy::RandomReward;

/// Timing of the background loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    /// Wait between two successful reward ticks.
    pub tick_interval: Duration,
    /// Wait before retrying a tick that failed.
    pub error_backoff: Duration,
    /// Delay before a submitted clan request is resolved.
    pub clan_resolve_delay: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(300),
            error_backoff: Duration::from_secs(60),
            clan_resolve_delay: Duration::from_secs(5),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite connection string).
    pub database_url: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub timing: LoopTiming,
    /// Inclusive bounds of the placeholder reward roll.
    pub reward_min: u32,
    pub reward_max: u32,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:glory.db?mode=rwc`)
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `TICK_INTERVAL_SECS` - seconds between reward ticks (default: 300)
    /// - `ERROR_BACKOFF_SECS` - seconds to wait after a failed tick (default: 60)
    /// - `CLAN_RESOLVE_DELAY_SECS` - seconds before a clan request resolves (default: 5)
    /// - `REWARD_MIN` / `REWARD_MAX` - reward roll bounds (default: 50 / 200)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:glory.db?mode=rwc".to_string());

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(&args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| env_parse("PORT"))
            .unwrap_or(5000);

        let defaults = LoopTiming::default();
        let timing = LoopTiming {
            tick_interval: env_secs("TICK_INTERVAL_SECS").unwrap_or(defaults.tick_interval),
            error_backoff: env_secs("ERROR_BACKOFF_SECS").unwrap_or(defaults.error_backoff),
            clan_resolve_delay: env_secs("CLAN_RESOLVE_DELAY_SECS")
                .unwrap_or(defaults.clan_resolve_delay),
        };

        Config {
            database_url,
            port,
            timing,
            reward_min: env_parse("REWARD_MIN").unwrap_or(RandomReward::DEFAULT_MIN),
            reward_max: env_parse("REWARD_MAX").unwrap_or(RandomReward::DEFAULT_MAX),
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_secs(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_secs)
}
