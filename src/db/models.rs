use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Sports served by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Cricket,
    Football,
}

impl Sport {
    pub const ALL: [Sport; 2] = [Sport::Cricket, Sport::Football];

    pub const fn as_str(self) -> &'static str {
        match self {
            Sport::Cricket => "cricket",
            Sport::Football => "football",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cricket" => Ok(Sport::Cricket),
            "football" | "soccer" => Ok(Sport::Football),
            other => Err(QueryError::UnknownSport(other.to_string())),
        }
    }
}

/// Canonical match state. Always derived from a provider mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cricket match formats. Football matches carry no format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchFormat {
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "odi")]
    Odi,
    #[serde(rename = "t20i")]
    T20i,
    #[serde(rename = "t20")]
    T20,
    #[serde(rename = "first-class")]
    FirstClass,
    #[serde(rename = "list-a")]
    ListA,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: Option<String>,
    pub name: String,
    pub short_name: Option<String>,
    pub flag_or_logo: Option<String>,
}

impl TeamRef {
    /// Placeholder for a side the provider has not announced yet.
    pub fn to_be_confirmed() -> Self {
        TeamRef {
            id: None,
            name: "TBC".to_string(),
            short_name: None,
            flag_or_logo: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    pub home: TeamRef,
    pub away: TeamRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Default for Venue {
    fn default() -> Self {
        Venue {
            name: "Unknown Venue".to_string(),
            city: None,
            country: None,
        }
    }
}

/// Home/away scoreline. `home`/`away` hold goals (football) or runs (cricket).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub home: i64,
    pub away: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_wickets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_wickets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_overs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_overs: Option<f64>,
}

/// One line of ball-by-ball or minute-by-minute commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryEntry {
    pub sequence: u32,
    /// Over.ball for cricket, match minute for football
    pub period: String,
    pub text: String,
    /// Wicket/boundary or goal
    pub key_event: bool,
}

/// The normalized, provider-agnostic match record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMatch {
    /// Provider-native id; only unique together with `source_provider`
    pub match_id: String,
    pub sport: Sport,
    pub status: MatchStatus,
    pub format: Option<MatchFormat>,
    pub teams: Teams,
    pub venue: Venue,
    pub start_time: DateTime<Utc>,
    /// Set only while `status == Live`
    pub current_score: Option<ScoreSnapshot>,
    /// Set only once `status == Completed`
    pub final_score: Option<ScoreSnapshot>,
    pub series: String,
    pub source_provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commentary: Vec<CommentaryEntry>,
}
