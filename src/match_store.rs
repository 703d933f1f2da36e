use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::match_record::{MatchInfo, MatchRecord, parse_match_json};
use crate::match_source::{MatchSource, file_stem};

pub const UNKNOWN_TOURNAMENT: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub db_path: PathBuf,
    pub files_total: usize,
    pub batches_committed: usize,
    pub matches_upserted: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct StoredMatch {
    match_id: String,
    tournament: String,
    year: Option<i32>,
    venue: String,
    teams: Vec<String>,
    json_data: String,
}

impl StoredMatch {
    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let doc = parse_match_json(&raw).with_context(|| format!("parse {}", path.display()))?;
        Ok(Self {
            match_id: file_stem(path),
            tournament: tournament_name(&doc.info),
            year: match_year(&doc.info),
            venue: doc.info.venue.clone(),
            teams: doc.info.teams.clone(),
            json_data: raw,
        })
    }
}

pub fn tournament_name(info: &MatchInfo) -> String {
    info.event
        .as_ref()
        .and_then(|e| e.name.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_TOURNAMENT)
        .to_string()
}

/// Year of the first match date, falling back to the leading year of the
/// season ("2023/24" -> 2023).
pub fn match_year(info: &MatchInfo) -> Option<i32> {
    info.dates
        .first()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .map(|d| d.year())
        .or_else(|| {
            info.season
                .as_deref()
                .and_then(|s| s.get(..4))
                .and_then(|y| y.parse::<i32>().ok())
        })
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            match_id TEXT NOT NULL UNIQUE,
            tournament TEXT NOT NULL,
            year INTEGER NULL,
            venue TEXT NOT NULL,
            teams_json TEXT NOT NULL,
            json_data TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_tournament ON matches(tournament);
        CREATE INDEX IF NOT EXISTS idx_matches_year ON matches(year);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            files_total INTEGER NOT NULL,
            matches_upserted INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Store match files in batches of `batch_size`, one transaction per
/// batch. Unreadable or unparseable files are reported and skipped.
pub fn ingest_files(
    conn: &mut Connection,
    db_path: PathBuf,
    paths: &[PathBuf],
    batch_size: usize,
) -> Result<IngestSummary> {
    if paths.is_empty() {
        return Err(anyhow!("no match files passed to ingest"));
    }
    let batch_size = batch_size.max(1);

    let started_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO ingest_runs(started_at, finished_at, files_total, matches_upserted, errors_json)
         VALUES (?1, NULL, ?2, 0, '[]')",
        params![started_at, paths.len() as i64],
    )
    .context("insert ingest run")?;
    let run_id = conn.last_insert_rowid();

    let mut batches_committed = 0usize;
    let mut matches_upserted = 0usize;
    let mut errors: Vec<String> = Vec::new();

    for (batch_idx, batch) in paths.chunks(batch_size).enumerate() {
        let tx = conn.transaction().context("begin ingest transaction")?;
        for path in batch {
            match StoredMatch::from_file(path) {
                Ok(row) => {
                    upsert_match(&tx, &row)?;
                    matches_upserted += 1;
                }
                Err(err) => errors.push(format!("{err:#}")),
            }
        }
        tx.commit().context("commit ingest transaction")?;
        batches_committed += 1;
        log::info!(
            "ingested batch {} ({} of {} files)",
            batch_idx + 1,
            (batch_idx * batch_size + batch.len()).min(paths.len()),
            paths.len()
        );
    }

    let finished_at = Utc::now().to_rfc3339();
    let errors_json = serde_json::to_string(&errors).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "UPDATE ingest_runs
         SET finished_at = ?1, matches_upserted = ?2, errors_json = ?3
         WHERE run_id = ?4",
        params![finished_at, matches_upserted as i64, errors_json, run_id],
    )
    .context("update ingest run")?;

    Ok(IngestSummary {
        db_path,
        files_total: paths.len(),
        batches_committed,
        matches_upserted,
        errors,
    })
}

fn upsert_match(tx: &rusqlite::Transaction<'_>, m: &StoredMatch) -> Result<()> {
    let teams_json = serde_json::to_string(&m.teams).context("serialize teams")?;
    tx.execute(
        r#"
        INSERT INTO matches (match_id, tournament, year, venue, teams_json, json_data, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(match_id) DO UPDATE SET
            tournament = excluded.tournament,
            year = excluded.year,
            venue = excluded.venue,
            teams_json = excluded.teams_json,
            json_data = excluded.json_data,
            updated_at = excluded.updated_at
        "#,
        params![
            m.match_id,
            m.tournament,
            m.year,
            m.venue,
            teams_json,
            m.json_data,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("upsert match")?;
    Ok(())
}

pub fn list_tournaments(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT tournament FROM matches ORDER BY tournament ASC")
        .context("prepare tournaments query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query tournaments")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode tournament row")?);
    }
    Ok(out)
}

/// Most recent first.
pub fn list_years(conn: &Connection, tournament: &str) -> Result<Vec<i32>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT year FROM matches
             WHERE tournament = ?1 AND year IS NOT NULL
             ORDER BY year DESC",
        )
        .context("prepare years query")?;
    let rows = stmt
        .query_map(params![tournament], |row| row.get::<_, i32>(0))
        .context("query years")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode year row")?);
    }
    Ok(out)
}

const RECORD_COLUMNS: &str = "id, match_id, venue, teams_json, json_data";

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MatchRecord> {
    let venue: String = row.get(2)?;
    let teams_json: String = row.get(3)?;
    Ok(MatchRecord {
        id: row.get::<_, i64>(0)? as u64,
        match_id: row.get(1)?,
        venue: Some(venue).filter(|v| !v.is_empty()),
        teams: serde_json::from_str::<Vec<String>>(&teams_json).ok(),
        json_data: Some(row.get(4)?),
    })
}

pub fn load_matches(conn: &Connection, tournament: &str, year: i32) -> Result<Vec<MatchRecord>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM matches WHERE tournament = ?1 AND year = ?2 ORDER BY id ASC"
    );
    let mut stmt = conn.prepare(&sql).context("prepare load matches query")?;
    let rows = stmt
        .query_map(params![tournament, year], record_from_row)
        .context("query load matches")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode match row")?);
    }
    Ok(out)
}

pub fn load_all_matches(conn: &Connection, tournament: &str) -> Result<Vec<MatchRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM matches WHERE tournament = ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql).context("prepare load all matches query")?;
    let rows = stmt
        .query_map(params![tournament], record_from_row)
        .context("query load all matches")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode match row")?);
    }
    Ok(out)
}

pub fn load_match(conn: &Connection, id: u64) -> Result<Option<MatchRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM matches WHERE id = ?1");
    conn.query_row(&sql, params![id as i64], record_from_row)
        .optional()
        .context("query match")
}

/// Matches of one tournament (optionally one year) from a store file.
#[derive(Debug, Clone)]
pub struct StoreSource {
    pub db_path: PathBuf,
    pub tournament: String,
    pub year: Option<i32>,
}

impl MatchSource for StoreSource {
    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        let conn = open_db(&self.db_path)?;
        match self.year {
            Some(year) => load_matches(&conn, &self.tournament, year),
            None => load_all_matches(&conn, &self.tournament),
        }
    }
}
