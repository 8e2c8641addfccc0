//! Runtime configuration.
//!
//! Everything has a default matching the public Behind the Name service; the
//! environment (optionally via a `.env` file) can override the database path
//! and the endpoint, and supplies the API key.

use std::{env, path::PathBuf, time::Duration};

use crate::{
    DEFAULT_ENDPOINT, NamegateError, RateWindow, RequestOrchestratorOptions, Strictness,
};

/// Database file used when none is configured.
pub const DEFAULT_DATABASE: &str = "name_generator.db";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Environment variable overriding [`NamegateOptions::database_path`].
pub const DATABASE_VAR: &str = "NAMEGATE_DB";

/// Environment variable overriding [`NamegateOptions::endpoint`].
pub const ENDPOINT_VAR: &str = "NAMEGATE_ENDPOINT";

/// Top-level configuration.
#[derive(Clone, Debug)]
pub struct NamegateOptions {
    /// SQLite file holding the call ledger.
    pub database_path: PathBuf,
    /// URL of the random-name endpoint.
    pub endpoint: String,
    /// Upper bound on one external call.
    pub dispatch_timeout: Duration,
    /// Windows enforced before every call.
    pub windows: Vec<RateWindow>,
    /// Coupling between admission and recording.
    pub strictness: Strictness,
}

impl Default for NamegateOptions {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            dispatch_timeout: Duration::from_secs(12),
            windows: RateWindow::defaults(),
            strictness: Strictness::default(),
        }
    }
}

impl NamegateOptions {
    /// Defaults, with overrides from the process environment.
    ///
    /// Loads `.env` from the working directory first if there is one.
    pub fn from_env() -> Self {
        load_dotenv();

        let mut options = Self::default();

        if let Some(path) = non_empty_var(DATABASE_VAR) {
            options.database_path = PathBuf::from(path);
        }

        if let Some(endpoint) = non_empty_var(ENDPOINT_VAR) {
            options.endpoint = endpoint;
        }

        options
    }

    /// The subset the orchestrator needs.
    pub fn orchestrator_options(&self) -> RequestOrchestratorOptions {
        RequestOrchestratorOptions {
            windows: self.windows.clone(),
            dispatch_timeout: self.dispatch_timeout,
            strictness: self.strictness,
        }
    }
}

/// Pick the API key: an explicit one wins, then `API_KEY` from the
/// environment or `.env`.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String, NamegateError> {
    if let Some(key) = explicit.filter(|key| !key.trim().is_empty()) {
        return Ok(key);
    }

    load_dotenv();

    non_empty_var(API_KEY_VAR).ok_or(NamegateError::MissingApiKey)
}

fn load_dotenv() {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
