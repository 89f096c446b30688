use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

use crate::db::models::{MatchStatus, Sport};
use crate::error::QueryError;

pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const MAX_PAGE_LIMIT: usize = 100;

/// Filter keys a request may carry; anything else is dropped.
const FILTER_KEYS: &[&str] = &["league", "date_from", "date_to", "page", "limit"];

/// Filter keys consumed locally and never forwarded upstream.
const LOCAL_KEYS: &[&str] = &["page", "limit"];

/// Logical match views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Live,
    Upcoming,
    Completed,
    Detail,
    Commentary,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Endpoint::Live => "live",
            Endpoint::Upcoming => "upcoming",
            Endpoint::Completed => "completed",
            Endpoint::Detail => "detail",
            Endpoint::Commentary => "commentary",
        }
    }

    pub fn from_list_segment(segment: &str) -> Option<Self> {
        match segment {
            "live" => Some(Endpoint::Live),
            "upcoming" | "fixtures" => Some(Endpoint::Upcoming),
            "completed" | "results" => Some(Endpoint::Completed),
            _ => None,
        }
    }

    pub const fn is_list(self) -> bool {
        matches!(self, Endpoint::Live | Endpoint::Upcoming | Endpoint::Completed)
    }

    /// Every view except live carries pagination metadata.
    pub const fn is_paginated(self) -> bool {
        !matches!(self, Endpoint::Live)
    }

    /// Which normalized statuses a view keeps.
    pub fn admits(self, status: MatchStatus) -> bool {
        match self {
            Endpoint::Live => status == MatchStatus::Live,
            Endpoint::Upcoming => status == MatchStatus::Upcoming,
            Endpoint::Completed => {
                matches!(status, MatchStatus::Completed | MatchStatus::Cancelled)
            }
            Endpoint::Detail | Endpoint::Commentary => true,
        }
    }

    /// Status keys read from the durable snapshot for a list view; the same set
    /// `admits` keeps on the provider path. Empty for single-match views.
    pub const fn snapshot_statuses(self) -> &'static [MatchStatus] {
        match self {
            Endpoint::Live => &[MatchStatus::Live],
            Endpoint::Upcoming => &[MatchStatus::Upcoming],
            Endpoint::Completed => &[MatchStatus::Completed, MatchStatus::Cancelled],
            Endpoint::Detail | Endpoint::Commentary => &[],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized filter set. Keys are lowercased, values trimmed; unknown keys and
/// empty values are dropped. The `BTreeMap` keeps iteration order stable for cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilters(BTreeMap<String, String>);

impl MatchFilters {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = MatchFilters::default();
        for (k, v) in pairs {
            filters.insert(k.as_ref(), v.as_ref());
        }
        filters
    }

    fn insert(&mut self, key: &str, value: &str) {
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() || !FILTER_KEYS.contains(&key.as_str()) {
            return;
        }
        self.0.insert(key, value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Filters a provider client may translate into native query parameters.
    pub fn upstream(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(k, _)| !LOCAL_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn page(&self) -> usize {
        self.get("page")
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn limit(&self) -> usize {
        self.get("limit")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    /// Upstream filters, form-encoded so a value can never pose as another filter.
    fn canonical(&self) -> String {
        let mut encoded = form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.upstream() {
            encoded.append_pair(k, v);
        }
        encoded.finish()
    }
}

/// One logical request: `(sport, endpoint, filters)` plus the match id for detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    sport: Sport,
    endpoint: Endpoint,
    match_id: Option<String>,
    filters: MatchFilters,
}

impl MatchQuery {
    pub fn list(sport: Sport, endpoint: Endpoint, filters: MatchFilters) -> Result<Self, QueryError> {
        if !endpoint.is_list() {
            return Err(QueryError::NotAList(endpoint));
        }
        Ok(MatchQuery {
            sport,
            endpoint,
            match_id: None,
            filters,
        })
    }

    pub fn detail(sport: Sport, match_id: &str) -> Result<Self, QueryError> {
        Self::single(sport, Endpoint::Detail, match_id)
    }

    pub fn commentary(sport: Sport, match_id: &str) -> Result<Self, QueryError> {
        Self::single(sport, Endpoint::Commentary, match_id)
    }

    fn single(sport: Sport, endpoint: Endpoint, match_id: &str) -> Result<Self, QueryError> {
        let match_id = match_id.trim();
        if match_id.is_empty() {
            return Err(QueryError::MissingMatchId(endpoint));
        }
        Ok(MatchQuery {
            sport,
            endpoint,
            match_id: Some(match_id.to_string()),
            filters: MatchFilters::default(),
        })
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn match_id(&self) -> Option<&str> {
        self.match_id.as_deref()
    }

    pub fn filters(&self) -> &MatchFilters {
        &self.filters
    }

    /// Deterministic cache key, e.g. `matches:cricket:upcoming:-:league=5`.
    ///
    /// Pagination is applied after the cache read, so `page`/`limit` are not part of
    /// the key and every page of a view shares one upstream resolution.
    pub fn cache_key(&self) -> String {
        format!(
            "matches:{}:{}:{}:{}",
            self.sport,
            self.endpoint,
            self.match_id.as_deref().unwrap_or("-"),
            self.filters.canonical()
        )
    }
}
