//! Shared utilities for glosario.
//!
//! - `settings`: JSON settings with environment overrides
//! - `runtime`: Tokio runtime helper for the synchronous CLI

mod runtime;
mod settings;

pub use runtime::run_async;
pub use settings::{
    CurationSettings, SettingsError, APP_DIR, ENV_DB_PATH, ENV_MIN_TOKEN_LENGTH, SETTINGS_FILE,
};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
