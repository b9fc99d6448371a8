//! EMSA Monitor CLI Library
//!
//! Terminal dashboard for the EMSA container monitoring service. Provides
//! the interactive ratatui interface plus one-shot subcommands for auth and
//! report export.

pub mod app;
pub mod auth_cmd;
pub mod config;
pub mod config_cmd;
pub mod export_cmd;
pub mod tui;
pub mod ui;
