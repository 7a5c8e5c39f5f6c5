//! Shared HTTP client construction policy.
//!
//! Both the search client and the image downloader build their
//! [`reqwest::Client`] here so they agree on user-agent, compression and
//! proxy handling. Only the timeouts differ.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use thiserror::Error;
use tracing::warn;

use crate::user_agent;

/// Search API connect timeout (10 seconds).
pub const SEARCH_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Search API read timeout (30 seconds).
pub const SEARCH_READ_TIMEOUT_SECS: u64 = 30;

/// Image download connect timeout (30 seconds).
pub const IMAGE_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Image download read timeout (5 minutes for large files).
pub const IMAGE_READ_TIMEOUT_SECS: u64 = 300;

/// Connect/read timeouts for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect_secs: u64,
    pub read_secs: u64,
}

impl HttpTimeouts {
    /// Defaults for search API requests.
    #[must_use]
    pub const fn search() -> Self {
        Self {
            connect_secs: SEARCH_CONNECT_TIMEOUT_SECS,
            read_secs: SEARCH_READ_TIMEOUT_SECS,
        }
    }

    /// Defaults for image downloads.
    #[must_use]
    pub const fn image() -> Self {
        Self {
            connect_secs: IMAGE_CONNECT_TIMEOUT_SECS,
            read_secs: IMAGE_READ_TIMEOUT_SECS,
        }
    }
}

/// The HTTP client could not be constructed.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("HTTP client construction failed: {0}")]
    Build(#[source] reqwest::Error),

    #[error("HTTP client construction panicked while loading proxy settings")]
    Panicked,
}

/// Builds a client using the shared policy.
///
/// # Errors
///
/// Returns [`ClientBuildError`] when the builder rejects the configuration.
pub fn build_client(timeouts: HttpTimeouts) -> Result<Client, ClientBuildError> {
    match try_build_client(timeouts, false) {
        Ok(client) => Ok(client),
        Err(ClientBuildError::Panicked) => {
            // Some sandboxed macOS environments panic when querying system
            // proxy settings; env proxies still apply on the fallback path.
            warn!("HTTP client builder panicked loading system proxy settings; using env-proxy fallback");
            try_build_client(timeouts, true)
        }
        Err(error) => Err(error),
    }
}

fn try_build_client(
    timeouts: HttpTimeouts,
    disable_system_proxy_lookup: bool,
) -> Result<Client, ClientBuildError> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(timeouts);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(ClientBuildError::Build)
    }))
    .map_err(|_| ClientBuildError::Panicked)?
}

fn base_builder(timeouts: HttpTimeouts) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.read_secs))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
