use serde_json::Value;

use super::{decimal, integer, match_format, records, text, timestamp, Draft, UNKNOWN_SERIES};
use crate::db::models::{
    CanonicalMatch, CommentaryEntry, MatchStatus, ScoreSnapshot, Sport, TeamRef, Venue,
};
use crate::error::NormalizeError;
use crate::providers::ProviderId;

/// `(matchStarted, matchEnded)` → canonical status.
pub fn status_from_flags(started: bool, ended: bool) -> MatchStatus {
    match (started, ended) {
        (_, true) => MatchStatus::Completed,
        (true, false) => MatchStatus::Live,
        (false, false) => MatchStatus::Upcoming,
    }
}

pub fn normalize_cricket(body: &Value) -> Result<Vec<CanonicalMatch>, NormalizeError> {
    records(body)?
        .into_iter()
        .enumerate()
        .map(|(index, m)| match_to_draft(index, m).map(|d| d.finish(ProviderId::CricketData)))
        .collect()
}

fn match_to_draft(index: usize, m: &Value) -> Result<Draft, NormalizeError> {
    let match_id = text(&m["id"]).ok_or(NormalizeError::MissingMatchId { index })?;

    let names: Vec<String> = m["teams"]
        .as_array()
        .map(|teams| teams.iter().filter_map(text).collect())
        .unwrap_or_default();
    if names.is_empty() {
        return Err(NormalizeError::MissingTeams { match_id });
    }
    let home = team_ref(m, names.first());
    let away = team_ref(m, names.get(1));

    let status = status_from_flags(
        m["matchStarted"].as_bool().unwrap_or(false),
        m["matchEnded"].as_bool().unwrap_or(false),
    );

    let start_time = timestamp(&m["dateTimeGMT"])
        .or_else(|| timestamp(&m["date"]))
        .unwrap_or_default();

    let series = text(&m["series"])
        .or_else(|| text(&m["series_id"]))
        .unwrap_or_else(|| UNKNOWN_SERIES.to_string());

    let score = scoreline(&m["score"], &home.name, &away.name);

    Ok(Draft {
        match_id,
        sport: Sport::Cricket,
        status,
        format: m["matchType"].as_str().and_then(match_format),
        venue: venue(&m["venue"]),
        home,
        away,
        start_time,
        score,
        series,
        result_note: text(&m["status"]),
        commentary: ball_by_ball(&m["bbb"]),
    })
}

/// Team from the `teams` name list, enriched from `teamInfo` when present.
fn team_ref(m: &Value, name: Option<&String>) -> TeamRef {
    let Some(name) = name else {
        return TeamRef::to_be_confirmed();
    };
    let info = m["teamInfo"].as_array().and_then(|infos| {
        infos
            .iter()
            .find(|i| i["name"].as_str().map(|n| n.eq_ignore_ascii_case(name)) == Some(true))
    });
    TeamRef {
        id: None,
        name: name.clone(),
        short_name: info.and_then(|i| text(&i["shortname"])),
        flag_or_logo: info.and_then(|i| text(&i["img"])),
    }
}

/// `"Wankhede Stadium, Mumbai"` → name + city.
fn venue(v: &Value) -> Venue {
    let Some(raw) = text(v) else {
        return Venue::default();
    };
    match raw.rsplit_once(',') {
        Some((name, city)) if !name.trim().is_empty() => Venue {
            name: name.trim().to_string(),
            city: Some(city.trim().to_string()).filter(|c| !c.is_empty()),
            country: None,
        },
        _ => Venue {
            name: raw,
            city: None,
            country: None,
        },
    }
}

/// Innings rows look like `{r, w, o, inning: "India Inning 1"}`. Rows are matched to
/// a side by the inning label's team prefix, else by position; a later innings
/// replaces an earlier one.
fn scoreline(v: &Value, home: &str, away: &str) -> Option<ScoreSnapshot> {
    let rows = v.as_array()?;
    let mut snapshot = ScoreSnapshot::default();
    let mut seen = false;
    for (i, row) in rows.iter().enumerate() {
        let Some(runs) = integer(&row["r"]) else {
            continue;
        };
        let inning = row["inning"].as_str().unwrap_or("").to_lowercase();
        let is_home = if inning.starts_with(&home.to_lowercase()) {
            true
        } else if inning.starts_with(&away.to_lowercase()) {
            false
        } else {
            i % 2 == 0
        };
        let wickets = integer(&row["w"]).map(|w| w.max(0) as u32);
        let overs = decimal(&row["o"]);
        seen = true;
        if is_home {
            snapshot.home = runs;
            snapshot.home_wickets = wickets;
            snapshot.home_overs = overs;
        } else {
            snapshot.away = runs;
            snapshot.away_wickets = wickets;
            snapshot.away_overs = overs;
        }
    }
    seen.then_some(snapshot)
}

fn ball_by_ball(v: &Value) -> Vec<CommentaryEntry> {
    let Some(balls) = v.as_array() else {
        return Vec::new();
    };
    let mut entries: Vec<CommentaryEntry> = balls
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let over = integer(&b["over"]).unwrap_or(0);
            let ball = integer(&b["ball"]).unwrap_or(0);
            let bowler = text(&b["bowler"]["name"]).unwrap_or_else(|| "Bowler".to_string());
            let batsman = text(&b["batsman"]["name"]).unwrap_or_else(|| "batsman".to_string());
            let runs = integer(&b["runs"]).unwrap_or(0);
            let dismissal = text(&b["dismissal"]);
            let outcome = match &dismissal {
                Some(how) => format!("OUT ({})", how),
                None if runs == 1 => "1 run".to_string(),
                None => format!("{} runs", runs),
            };
            CommentaryEntry {
                sequence: integer(&b["n"]).map(|n| n.max(0) as u32).unwrap_or(i as u32),
                period: format!("{}.{}", over, ball),
                text: format!("{} to {}, {}", bowler, batsman, outcome),
                key_event: dismissal.is_some() || runs >= 4,
            }
        })
        .collect();
    entries.sort_by_key(|e| e.sequence);
    entries
}
