//! Shared HTTP plumbing for provider clients: one GET, classified failures.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::ProviderId;
use crate::error::ProviderError;

pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("matchfeed/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Append `segments` to a configured base URL and add query parameters. Each
/// segment is percent-encoded on its own, so a `/`, `?` or `#` inside a caller
/// supplied id cannot change the upstream path or query.
pub fn endpoint_url(
    provider: ProviderId,
    base_url: &str,
    segments: &[&str],
    params: &[(&str, String)],
) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base_url).map_err(|e| ProviderError::Transient {
        provider,
        reason: format!("invalid base url: {}", e),
    })?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::Transient {
            provider,
            reason: "base url cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

/// GET `url` and decode the body as JSON.
///
/// 401/403 map to `PlanRestricted`; any other non-2xx, a timeout or a connection
/// error map to `Transient`; an undecodable body maps to `MalformedPayload`.
pub async fn get_json(
    http: &Client,
    provider: ProviderId,
    url: Url,
) -> Result<serde_json::Value, ProviderError> {
    // Credentials travel in the query string, so only the path is logged.
    debug!("{} GET {}", provider, url.path());

    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;

    if let Some(err) = classify_status(provider, resp.status()) {
        return Err(err);
    }

    let text = resp.text().await.map_err(|e| transport_error(provider, e))?;
    serde_json::from_str(&text).map_err(|e| ProviderError::MalformedPayload {
        provider,
        reason: format!("invalid JSON: {}", e),
    })
}

pub fn classify_status(provider: ProviderId, status: StatusCode) -> Option<ProviderError> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::PlanRestricted {
            provider,
            status: status.as_u16(),
        },
        _ => ProviderError::Transient {
            provider,
            reason: format!("HTTP {}", status),
        },
    })
}

fn transport_error(provider: ProviderId, err: reqwest::Error) -> ProviderError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {}", err.without_url())
    } else {
        err.without_url().to_string()
    };
    ProviderError::Transient { provider, reason }
}
