use std::time::Duration;

use fund_common::Secret;
use log::*;

pub const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct MidtransConfig {
    /// Snap host, without a trailing slash. The production host is `https://app.midtrans.com`.
    pub base_url: String,
    pub server_key: Secret<String>,
    /// Only the frontend needs this, for embedded Snap checkouts.
    pub client_key: String,
    pub timeout: Duration,
}

impl Default for MidtransConfig {
    fn default() -> Self {
        Self {
            base_url: SANDBOX_BASE_URL.to_string(),
            server_key: Secret::default(),
            client_key: String::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl MidtransConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("CF_MIDTRANS_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| {
                warn!("CF_MIDTRANS_BASE_URL not set, using the sandbox at {SANDBOX_BASE_URL}");
                SANDBOX_BASE_URL.to_string()
            });
        let server_key = Secret::new(std::env::var("CF_MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            warn!("CF_MIDTRANS_SERVER_KEY not set, using (probably useless) default");
            "SB-Mid-server-00000000000000".to_string()
        }));
        let client_key = std::env::var("CF_MIDTRANS_CLIENT_KEY").unwrap_or_else(|_| {
            warn!("CF_MIDTRANS_CLIENT_KEY not set, using (probably useless) default");
            "SB-Mid-client-00000000000000".to_string()
        });
        let timeout = std::env::var("CF_GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("CF_GATEWAY_TIMEOUT_SECS is not a valid number of seconds: {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self { base_url, server_key, client_key, timeout }
    }
}
