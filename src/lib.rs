pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod session;
pub mod theme;
pub mod tui;
