pub mod accounts;
pub mod api;
pub mod bot_manager;
pub mod clan;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod identity;
pub mod metrics;
pub mod policy;
