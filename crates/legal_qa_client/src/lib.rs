//! Legal Q&A chat client library: config, typed HTTP API client, UI
//! controller and view model, and terminal rendering.
//! Used by the `legal-qa` binary.

pub mod client;
pub mod commands;
pub mod config;
pub mod controller;
pub mod format;
pub mod messages;
pub mod preferences;
pub mod render;
pub mod view;

pub use client::{ApiClient, ApiError};
pub use config::{default_config_path, Config, ConfigError, ServerSection, UiSection};
pub use controller::{Controller, ControllerOptions, Key, SendOutcome, UiState};
pub use preferences::{PreferenceStore, Theme};
pub use view::View;
