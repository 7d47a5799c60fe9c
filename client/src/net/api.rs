//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error since these endpoints are
//! only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs instead of panics so a missing backend
//! config degrades to a signed-out app without crashing hydration.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::IdentityConfig;

#[cfg(any(test, feature = "hydrate"))]
const IDENTITY_CONFIG_ENDPOINT: &str = "/api/config/identity";

#[cfg(any(test, feature = "hydrate"))]
fn config_request_failed_message(status: u16) -> String {
    format!("identity config request failed: {status}")
}

/// Fetch the identity backend configuration from `/api/config/identity`.
///
/// # Errors
///
/// Returns an error string if the HTTP request fails, the server has no
/// configuration (non-OK status), or the body does not parse.
pub async fn fetch_identity_config() -> Result<IdentityConfig, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(IDENTITY_CONFIG_ENDPOINT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(config_request_failed_message(resp.status()));
        }
        resp.json::<IdentityConfig>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}
