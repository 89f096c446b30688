use serde_json::Value;
use tracing::debug;

use super::{decimal, integer, match_format, records, text, timestamp, Draft, UNKNOWN_SERIES};
use crate::db::models::{
    CanonicalMatch, CommentaryEntry, MatchStatus, ScoreSnapshot, Sport, TeamRef, Venue,
};
use crate::error::NormalizeError;
use crate::providers::ProviderId;

/// SportMonks `state_id` → canonical status. Codes not listed read as upcoming.
pub const STATE_TABLE: &[(i64, MatchStatus)] = &[
    (1, MatchStatus::Upcoming),   // NS
    (2, MatchStatus::Live),       // INPLAY_1ST_HALF / 1st innings
    (3, MatchStatus::Live),       // HT / innings break
    (4, MatchStatus::Live),       // BREAK
    (5, MatchStatus::Completed),  // FT
    (6, MatchStatus::Live),       // INPLAY_ET
    (7, MatchStatus::Completed),  // AET
    (8, MatchStatus::Completed),  // FT_PEN
    (9, MatchStatus::Live),       // INPLAY_PENALTIES
    (10, MatchStatus::Upcoming),  // POSTPONED
    (11, MatchStatus::Live),      // SUSPENDED
    (12, MatchStatus::Cancelled), // CANCELLED
    (13, MatchStatus::Upcoming),  // TBA
    (14, MatchStatus::Completed), // WO
    (15, MatchStatus::Cancelled), // ABANDONED
    (16, MatchStatus::Upcoming),  // DELAYED
    (17, MatchStatus::Completed), // AWARDED
    (18, MatchStatus::Live),      // INTERRUPTED
    (19, MatchStatus::Live),      // AWAITING_UPDATES
    (20, MatchStatus::Cancelled), // DELETED
    (21, MatchStatus::Live),      // EXTRA_TIME_BREAK
    (22, MatchStatus::Live),      // INPLAY_2ND_HALF
    (25, MatchStatus::Live),      // PEN_BREAK
];

pub fn status_from_state(state_id: Option<i64>) -> MatchStatus {
    state_id
        .and_then(|id| STATE_TABLE.iter().find(|(code, _)| *code == id))
        .map(|(_, status)| *status)
        .unwrap_or(MatchStatus::Upcoming)
}

/// Shared v3 fixture mapping; cricket additionally reads `type` and innings detail.
pub fn normalize(sport: Sport, body: &Value) -> Result<Vec<CanonicalMatch>, NormalizeError> {
    records(body)?
        .into_iter()
        .enumerate()
        .map(|(index, fixture)| fixture_to_draft(sport, index, fixture))
        .map(|draft| draft.map(|d| d.finish(ProviderId::SportMonks)))
        .collect()
}

fn fixture_to_draft(sport: Sport, index: usize, fx: &Value) -> Result<Draft, NormalizeError> {
    let match_id = text(&fx["id"]).ok_or(NormalizeError::MissingMatchId { index })?;

    let (home, away) = participants(fx).ok_or_else(|| NormalizeError::MissingTeams {
        match_id: match_id.clone(),
    })?;

    let state_id = integer(&fx["state_id"]).or_else(|| integer(&fx["state"]["id"]));
    let status = status_from_state(state_id);
    if state_id.is_none() {
        debug!("sportmonks fixture {} has no state_id, treating as upcoming", match_id);
    }

    let format = match sport {
        Sport::Cricket => fx["type"].as_str().and_then(match_format),
        Sport::Football => None,
    };

    let start_time = timestamp(&fx["starting_at"])
        .or_else(|| timestamp(&fx["starting_at_timestamp"]))
        .unwrap_or_default();

    let series = fx["league"]["name"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_SERIES.to_string());

    let score = scoreline(fx, &home, &away);
    let result_note = text(&fx["result_info"]).or_else(|| text(&fx["note"]));

    Ok(Draft {
        match_id,
        sport,
        status,
        format,
        venue: venue(&fx["venue"]),
        home: home.team,
        away: away.team,
        start_time,
        score,
        series,
        result_note,
        commentary: comments(&fx["comments"]),
    })
}

struct Side {
    team: TeamRef,
    /// Index in the `participants` array, for positional score matching
    position: usize,
}

/// Home/away from `meta.location`, falling back to array order. A single
/// participant is kept and the other side becomes "TBC".
fn participants(fx: &Value) -> Option<(Side, Side)> {
    let list = fx["participants"].as_array()?;
    let teams: Vec<(usize, &Value)> = list
        .iter()
        .enumerate()
        .filter(|(_, p)| text(&p["name"]).is_some() || text(&p["id"]).is_some())
        .collect();
    if teams.is_empty() {
        return None;
    }

    let by_location = |loc: &str| {
        teams
            .iter()
            .find(|(_, p)| p["meta"]["location"].as_str() == Some(loc))
            .copied()
    };
    let home = by_location("home").or_else(|| teams.first().copied());
    let away = by_location("away").or_else(|| {
        teams
            .iter()
            .find(|(i, _)| Some(*i) != home.map(|(h, _)| h))
            .copied()
    });

    let side = |entry: Option<(usize, &Value)>, fallback_position: usize| match entry {
        Some((position, p)) => Side {
            team: team_ref(p),
            position,
        },
        None => Side {
            team: TeamRef::to_be_confirmed(),
            position: fallback_position,
        },
    };
    Some((side(home, 0), side(away, 1)))
}

fn team_ref(p: &Value) -> TeamRef {
    TeamRef {
        id: text(&p["id"]),
        name: text(&p["name"]).unwrap_or_else(|| "TBC".to_string()),
        short_name: text(&p["short_code"]).or_else(|| text(&p["code"])),
        flag_or_logo: text(&p["image_path"]),
    }
}

fn venue(v: &Value) -> Venue {
    match text(&v["name"]) {
        Some(name) => Venue {
            name,
            city: text(&v["city_name"]).or_else(|| text(&v["city"])),
            country: text(&v["country"]["name"]).or_else(|| text(&v["country_name"])),
        },
        None => Venue::default(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Which {
    Home,
    Away,
}

/// Build the scoreline from `scores`. When `CURRENT` rows exist only those count;
/// each row is attributed by participant id, then `participant`/`location`
/// label, then array position. Later rows (later innings) overwrite earlier ones.
fn scoreline(fx: &Value, home: &Side, away: &Side) -> Option<ScoreSnapshot> {
    let rows = fx["scores"].as_array()?;
    if rows.is_empty() {
        return None;
    }
    let has_current = rows
        .iter()
        .any(|r| r["description"].as_str() == Some("CURRENT"));
    let rows: Vec<&Value> = rows
        .iter()
        .filter(|r| !has_current || r["description"].as_str() == Some("CURRENT"))
        .collect();

    let mut snapshot = ScoreSnapshot::default();
    let mut seen = false;
    for (i, row) in rows.iter().enumerate() {
        let Some(which) = attribute(row, i, home, away) else {
            continue;
        };
        let inner = &row["score"];
        let Some(value) = integer(inner)
            .or_else(|| integer(&inner["goals"]))
            .or_else(|| integer(&inner["runs"]))
            .or_else(|| integer(&row["runs"]))
        else {
            continue;
        };
        let wickets = integer(&inner["wickets"])
            .or_else(|| integer(&row["wickets"]))
            .map(|w| w.max(0) as u32);
        let overs = decimal(&inner["overs"]).or_else(|| decimal(&row["overs"]));

        seen = true;
        match which {
            Which::Home => {
                snapshot.home = value;
                snapshot.home_wickets = wickets;
                snapshot.home_overs = overs;
            }
            Which::Away => {
                snapshot.away = value;
                snapshot.away_wickets = wickets;
                snapshot.away_overs = overs;
            }
        }
    }
    seen.then_some(snapshot)
}

fn attribute(row: &Value, index: usize, home: &Side, away: &Side) -> Option<Which> {
    if let Some(pid) = text(&row["participant_id"]) {
        if home.team.id.as_deref() == Some(pid.as_str()) {
            return Some(Which::Home);
        }
        if away.team.id.as_deref() == Some(pid.as_str()) {
            return Some(Which::Away);
        }
    }
    let label = row["score"]["participant"]
        .as_str()
        .or_else(|| row["location"].as_str());
    match label {
        Some("home") => return Some(Which::Home),
        Some("away") => return Some(Which::Away),
        _ => {}
    }
    if index == home.position {
        Some(Which::Home)
    } else if index == away.position {
        Some(Which::Away)
    } else {
        None
    }
}

fn comments(v: &Value) -> Vec<CommentaryEntry> {
    let Some(rows) = v.as_array() else {
        return Vec::new();
    };
    let mut entries: Vec<CommentaryEntry> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let body = text(&c["comment"])?;
            let minute = integer(&c["minute"]);
            let extra = integer(&c["extra_minute"]).filter(|e| *e > 0);
            let period = match (minute, extra) {
                (Some(m), Some(e)) => format!("{}+{}'", m, e),
                (Some(m), None) => format!("{}'", m),
                _ => String::new(),
            };
            Some(CommentaryEntry {
                sequence: integer(&c["order"]).map(|o| o.max(0) as u32).unwrap_or(i as u32),
                period,
                text: body,
                key_event: c["is_goal"].as_bool().unwrap_or(false)
                    || c["is_important"].as_bool().unwrap_or(false),
            })
        })
        .collect();
    entries.sort_by_key(|e| e.sequence);
    entries
}
