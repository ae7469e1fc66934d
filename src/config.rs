use std::env;

/// Application-level constants
pub const APP_NAME: &str = "Trialine";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The open SoA connectathon record server.
pub const DEFAULT_BASE_URL: &str = "https://api.logicahealth.org/soaconnectathon30/open";

/// Per-request timeout for record fetches.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The record server base URL, honoring the `TRIALINE_BASE_URL` override.
pub fn base_url() -> String {
    env::var("TRIALINE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "trialine=info".to_string()
}
