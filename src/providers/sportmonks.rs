use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use reqwest::Client;
use std::time::Duration;

use super::http::{build_http_client, endpoint_url, get_json};
use super::{ProviderClient, ProviderId, ProviderPayload};
use crate::aggregator::MatchFilters;
use crate::db::models::Sport;
use crate::error::ProviderError;

pub const DEFAULT_CRICKET_URL: &str = "https://api.sportmonks.com/v3/cricket";
pub const DEFAULT_FOOTBALL_URL: &str = "https://api.sportmonks.com/v3/football";

/// Related entities the normalizer needs on every fixture.
const INCLUDES: &str = "participants;scores;venue;league;state";

/// Days ahead/behind used when the caller gives no date window.
const UPCOMING_WINDOW_DAYS: i64 = 14;
const RESULTS_WINDOW_DAYS: i64 = 7;

/// Primary provider for both sports (SportMonks v3-style API).
/// Auth is an `api_token` query parameter.
pub struct SportMonks {
    http: Client,
    api_token: String,
    cricket_url: String,
    football_url: String,
}

impl SportMonks {
    pub fn new(
        api_token: &str,
        cricket_url: Option<&str>,
        football_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(SportMonks {
            http: build_http_client(timeout)?,
            api_token: api_token.to_string(),
            cricket_url: cricket_url.unwrap_or(DEFAULT_CRICKET_URL).to_string(),
            football_url: football_url.unwrap_or(DEFAULT_FOOTBALL_URL).to_string(),
        })
    }

    fn base_url(&self, sport: Sport) -> &str {
        match sport {
            Sport::Cricket => &self.cricket_url,
            Sport::Football => &self.football_url,
        }
    }

    async fn fetch(
        &self,
        sport: Sport,
        segments: &[&str],
        includes: &str,
        extra: Vec<(&str, String)>,
    ) -> Result<ProviderPayload, ProviderError> {
        let mut params = vec![("api_token", self.api_token.clone())];
        if !includes.is_empty() {
            params.push(("include", includes.to_string()));
        }
        params.extend(extra);
        let url = endpoint_url(self.id(), self.base_url(sport), segments, &params)?;
        let body = get_json(&self.http, self.id(), url).await?;
        Ok(ProviderPayload {
            provider: self.id(),
            sport,
            body,
        })
    }
}

/// Translate caller filters into SportMonks query parameters.
fn filter_params(filters: &MatchFilters) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    for (key, value) in filters.upstream() {
        if key == "league" {
            params.push(("filters", format!("fixtureLeagues:{}", value)));
        }
    }
    params
}

/// `(from, to)` for `fixtures/between/{from}/{to}`, defaulting to a window around today.
fn date_window(filters: &MatchFilters, back_days: i64, ahead_days: i64) -> (String, String) {
    let today = Utc::now().date_naive();
    let date = |key: &str, fallback: NaiveDate| {
        filters
            .get(key)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or(fallback)
    };
    let from = date("date_from", today - ChronoDuration::days(back_days));
    let to = date("date_to", today + ChronoDuration::days(ahead_days));
    (from.format("%Y-%m-%d").to_string(), to.format("%Y-%m-%d").to_string())
}

#[async_trait]
impl ProviderClient for SportMonks {
    fn id(&self) -> ProviderId {
        ProviderId::SportMonks
    }

    async fn get_live(
        &self,
        sport: Sport,
        filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError> {
        self.fetch(sport, &["livescores", "inplay"], INCLUDES, filter_params(filters))
            .await
    }

    async fn get_upcoming(
        &self,
        sport: Sport,
        filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError> {
        let (from, to) = date_window(filters, 0, UPCOMING_WINDOW_DAYS);
        let segments = ["fixtures", "between", from.as_str(), to.as_str()];
        self.fetch(sport, &segments, INCLUDES, filter_params(filters))
            .await
    }

    async fn get_completed(
        &self,
        sport: Sport,
        filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError> {
        let (from, to) = date_window(filters, RESULTS_WINDOW_DAYS, 0);
        let segments = ["fixtures", "between", from.as_str(), to.as_str()];
        self.fetch(sport, &segments, INCLUDES, filter_params(filters))
            .await
    }

    async fn get_detail(
        &self,
        sport: Sport,
        match_id: &str,
    ) -> Result<ProviderPayload, ProviderError> {
        self.fetch(sport, &["fixtures", match_id], INCLUDES, Vec::new())
            .await
    }

    async fn get_commentary(
        &self,
        sport: Sport,
        match_id: &str,
    ) -> Result<ProviderPayload, ProviderError> {
        let includes = format!("{};comments", INCLUDES);
        self.fetch(sport, &["fixtures", match_id], &includes, Vec::new())
            .await
    }

    async fn health_check(&self, sport: Sport) -> bool {
        self.fetch(sport, &["livescores"], "", vec![("per_page", "1".to_string())])
            .await
            .is_ok()
    }
}
