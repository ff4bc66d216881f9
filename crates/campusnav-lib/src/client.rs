use std::env;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Error, Result};

/// Environment variable overriding the collaborator request timeout.
pub const HTTP_TIMEOUT_ENV: &str = "CAMPUSNAV_HTTP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Blocking HTTP client shared by the outdoor-directions and weather clients.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(request_timeout())
        .user_agent(user_agent())
        .build()
        .map_err(Error::Http)
}

/// Request timeout from [`HTTP_TIMEOUT_ENV`], falling back to ten seconds.
pub fn request_timeout() -> Duration {
    let secs = env::var(HTTP_TIMEOUT_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn user_agent() -> String {
    format!(
        "campusnav-lib/{version} ({repo})",
        version = env!("CARGO_PKG_VERSION"),
        repo = "https://github.com/campusnav/campusnav-rs"
    )
}
