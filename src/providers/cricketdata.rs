use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::http::{build_http_client, endpoint_url, get_json};
use super::{ProviderClient, ProviderId, ProviderPayload};
use crate::aggregator::MatchFilters;
use crate::db::models::Sport;
use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api.cricapi.com/v1";

/// Secondary, cricket-only provider backed by the CricketData.org (cricapi) v1 API.
/// Auth is an `apikey` query parameter; the free tier allows ~100 hits/day.
pub struct CricketData {
    http: Client,
    api_key: String,
    /// Base URL for overriding in tests
    base_url: String,
}

impl CricketData {
    pub fn new(api_key: &str, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        Ok(CricketData {
            http: build_http_client(timeout)?,
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
        })
    }

    async fn fetch(
        &self,
        sport: Sport,
        path: &str,
        extra: &[(&str, String)],
    ) -> Result<ProviderPayload, ProviderError> {
        if sport != Sport::Cricket {
            return Err(ProviderError::Unsupported {
                provider: self.id(),
                sport,
            });
        }

        let mut params = vec![("apikey", self.api_key.clone())];
        params.extend(extra.iter().cloned());
        let url = endpoint_url(self.id(), &self.base_url, &[path], &params)?;
        let body = get_json(&self.http, self.id(), url).await?;

        // cricapi reports quota and key problems as HTTP 200 with `status: failure`.
        if body["status"].as_str() == Some("failure") {
            let reason = body["reason"].as_str().unwrap_or("unspecified failure");
            debug!("cricketdata rejected {}: {}", path, reason);
            return Err(classify_failure(reason));
        }

        Ok(ProviderPayload {
            provider: self.id(),
            sport,
            body,
        })
    }
}

fn classify_failure(reason: &str) -> ProviderError {
    let lower = reason.to_lowercase();
    if lower.contains("plan") || lower.contains("subscription") || lower.contains("not allowed") {
        ProviderError::PlanRestricted {
            provider: ProviderId::CricketData,
            status: 200,
        }
    } else {
        ProviderError::Transient {
            provider: ProviderId::CricketData,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl ProviderClient for CricketData {
    fn id(&self) -> ProviderId {
        ProviderId::CricketData
    }

    // cricapi has no league/date parameters on these lists; only `offset`.

    async fn get_live(
        &self,
        sport: Sport,
        _filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError> {
        self.fetch(sport, "currentMatches", &[("offset", "0".to_string())])
            .await
    }

    async fn get_upcoming(
        &self,
        sport: Sport,
        _filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError> {
        self.fetch(sport, "matches", &[("offset", "0".to_string())]).await
    }

    async fn get_completed(
        &self,
        sport: Sport,
        _filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError> {
        self.fetch(sport, "matches", &[("offset", "0".to_string())]).await
    }

    async fn get_detail(
        &self,
        sport: Sport,
        match_id: &str,
    ) -> Result<ProviderPayload, ProviderError> {
        self.fetch(sport, "match_info", &[("id", match_id.to_string())])
            .await
    }

    async fn get_commentary(
        &self,
        sport: Sport,
        match_id: &str,
    ) -> Result<ProviderPayload, ProviderError> {
        self.fetch(sport, "match_bbb", &[("id", match_id.to_string())])
            .await
    }

    async fn health_check(&self, sport: Sport) -> bool {
        self.fetch(sport, "currentMatches", &[("offset", "0".to_string())])
            .await
            .is_ok()
    }
}
