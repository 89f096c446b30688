use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod models;
use models::*;

/// Upper bound on rows served from one snapshot read.
const SNAPSHOT_READ_LIMIT: i64 = 200;

/// Last-resort source of match records when every upstream provider fails.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn read_snapshot(&self, sport: Sport, status: MatchStatus) -> Result<Vec<CanonicalMatch>>;

    async fn read_match(&self, sport: Sport, match_id: &str) -> Result<Option<CanonicalMatch>>;

    /// Upsert records; returns how many rows were written.
    async fn write_snapshot(&self, matches: &[CanonicalMatch]) -> Result<usize>;
}

/// Thread-safe SQLite connection pool (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        self.lock().execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ── Snapshots ─────────────────────────────────────────────────────────────

    /// Insert or refresh one match record
    pub fn upsert_match(&self, m: &CanonicalMatch) -> Result<()> {
        let payload = serde_json::to_string(m)?;
        self.lock().execute(
            "INSERT INTO match_snapshots (
                sport, source_provider, match_id, status, start_time, payload, updated_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7)
             ON CONFLICT(sport, source_provider, match_id) DO UPDATE SET
                status=excluded.status,
                start_time=excluded.start_time,
                payload=excluded.payload,
                updated_at=excluded.updated_at",
            params![
                m.sport.as_str(),
                m.source_provider,
                m.match_id,
                m.status.as_str(),
                m.start_time,
                payload,
                Utc::now(),
            ],
        )?;
        Ok(())
    }

    /// Stored matches for `(sport, status)`; upcoming soonest first, others newest first
    pub fn list_matches(&self, sport: Sport, status: MatchStatus, limit: i64) -> Result<Vec<CanonicalMatch>> {
        let sql = match status {
            MatchStatus::Upcoming => {
                "SELECT payload FROM match_snapshots
                 WHERE sport=?1 AND status=?2 ORDER BY start_time ASC LIMIT ?3"
            }
            _ => {
                "SELECT payload FROM match_snapshots
                 WHERE sport=?1 AND status=?2 ORDER BY start_time DESC LIMIT ?3"
            }
        };
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let payloads = stmt
            .query_map(params![sport.as_str(), status.as_str(), limit], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        payloads
            .iter()
            .map(|p| serde_json::from_str(p).context("Corrupt snapshot payload"))
            .collect()
    }

    /// Most recently refreshed record with this id, from any provider
    pub fn get_match(&self, sport: Sport, match_id: &str) -> Result<Option<CanonicalMatch>> {
        let payload: Option<String> = self
            .lock()
            .query_row(
                "SELECT payload FROM match_snapshots
                 WHERE sport=?1 AND match_id=?2 ORDER BY updated_at DESC LIMIT 1",
                params![sport.as_str(), match_id],
                |row| row.get(0),
            )
            .optional()?;
        payload
            .map(|p| serde_json::from_str(&p).context("Corrupt snapshot payload"))
            .transpose()
    }

    pub fn count_matches(&self) -> Result<i64> {
        let count = self
            .lock()
            .query_row("SELECT COUNT(*) FROM match_snapshots", [], |r| r.get(0))?;
        Ok(count)
    }
}

#[async_trait]
impl SnapshotStore for Database {
    async fn read_snapshot(&self, sport: Sport, status: MatchStatus) -> Result<Vec<CanonicalMatch>> {
        self.list_matches(sport, status, SNAPSHOT_READ_LIMIT)
    }

    async fn read_match(&self, sport: Sport, match_id: &str) -> Result<Option<CanonicalMatch>> {
        self.get_match(sport, match_id)
    }

    async fn write_snapshot(&self, matches: &[CanonicalMatch]) -> Result<usize> {
        for m in matches {
            self.upsert_match(m)?;
        }
        Ok(matches.len())
    }
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS match_snapshots (
    sport           TEXT    NOT NULL,
    source_provider TEXT    NOT NULL,
    match_id        TEXT    NOT NULL,
    status          TEXT    NOT NULL,
    start_time      TEXT    NOT NULL,
    payload         TEXT    NOT NULL,
    updated_at      TEXT    NOT NULL,
    PRIMARY KEY (sport, source_provider, match_id)
);

CREATE INDEX IF NOT EXISTS idx_snapshots_sport_status ON match_snapshots(sport, status);
CREATE INDEX IF NOT EXISTS idx_snapshots_match ON match_snapshots(sport, match_id);
"#;
