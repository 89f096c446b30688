//! Provider payload → [`CanonicalMatch`] mapping.
//!
//! One pure function per (provider, sport) pair. Optional fields fall back to
//! documented defaults; only a record without a match id or without any team
//! fails the whole payload.

pub mod cricketdata;
pub mod sportmonks;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::db::models::{
    CanonicalMatch, CommentaryEntry, MatchFormat, MatchStatus, ScoreSnapshot, Sport, TeamRef,
    Teams, Venue,
};
use crate::error::NormalizeError;
use crate::providers::{ProviderId, ProviderPayload};

pub const UNKNOWN_SERIES: &str = "Unknown Series";

/// Dispatch a payload to the mapping for its (provider, sport) pair.
pub fn normalize(payload: &ProviderPayload) -> Result<Vec<CanonicalMatch>, NormalizeError> {
    match (payload.provider, payload.sport) {
        (ProviderId::SportMonks, sport) => sportmonks::normalize(sport, &payload.body),
        (ProviderId::CricketData, Sport::Cricket) => cricketdata::normalize_cricket(&payload.body),
        (provider, sport) => Err(NormalizeError::NoMapping { provider, sport }),
    }
}

/// Provider-independent intermediate record.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    pub match_id: String,
    pub sport: Sport,
    pub status: MatchStatus,
    pub format: Option<MatchFormat>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub venue: Venue,
    pub start_time: DateTime<Utc>,
    pub score: Option<ScoreSnapshot>,
    pub series: String,
    pub result_note: Option<String>,
    pub commentary: Vec<CommentaryEntry>,
}

impl Draft {
    /// The only place a score is attached: live → current, completed → final.
    /// A live or completed match with no parsable score rows gets a zero score.
    pub fn finish(self, provider: ProviderId) -> CanonicalMatch {
        let (current_score, final_score) = match self.status {
            MatchStatus::Live => (Some(self.score.unwrap_or_default()), None),
            MatchStatus::Completed => (None, Some(self.score.unwrap_or_default())),
            MatchStatus::Upcoming | MatchStatus::Cancelled => (None, None),
        };
        CanonicalMatch {
            match_id: self.match_id,
            sport: self.sport,
            status: self.status,
            format: self.format,
            teams: Teams {
                home: self.home,
                away: self.away,
            },
            venue: self.venue,
            start_time: self.start_time,
            current_score,
            final_score,
            series: self.series,
            source_provider: provider.to_string(),
            result_note: self.result_note,
            commentary: self.commentary,
        }
    }
}

// ── JSON helpers ─────────────────────────────────────────────────────────────

/// The `data` member as a list of records. A single object (detail views) becomes
/// a one-element list; `[]` is a valid empty result.
pub(crate) fn records(body: &Value) -> Result<Vec<&Value>, NormalizeError> {
    match &body["data"] {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(_) => Ok(vec![&body["data"]]),
        _ => Err(NormalizeError::MissingData("data")),
    }
}

/// String field that some providers send as a number (ids, scores).
pub(crate) fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn integer(v: &Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_f64().map(|f| f as i64))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

pub(crate) fn decimal(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS` (taken as UTC), or a
/// unix timestamp in seconds.
pub(crate) fn timestamp(v: &Value) -> Option<DateTime<Utc>> {
    if let Some(secs) = v.as_i64() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    let s = v.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Cricket format from a provider's free-text type field.
pub(crate) fn match_format(raw: &str) -> Option<MatchFormat> {
    match raw.trim().to_lowercase().as_str() {
        "test" | "test/5day" => Some(MatchFormat::Test),
        "odi" => Some(MatchFormat::Odi),
        "t20i" => Some(MatchFormat::T20i),
        "t20" => Some(MatchFormat::T20),
        "4day" | "first-class" | "first class" => Some(MatchFormat::FirstClass),
        "list a" | "list-a" => Some(MatchFormat::ListA),
        _ => None,
    }
}
