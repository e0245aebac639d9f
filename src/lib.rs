pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod exit;
pub mod fallback;
pub mod platform;
pub mod provider;
pub mod telemetry;
pub mod ui;
