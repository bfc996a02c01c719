// SQLite persistence layer: the working roster, saved roster snapshots,
// trade report history, the watchlist, and the live projection catalog.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::roster::PlayerEntry;

/// Metadata for a saved roster snapshot. Player data is loaded separately
/// via `load_saved_roster`.
#[derive(Debug, Clone)]
pub struct SavedRosterMeta {
    pub id: i64,
    pub name: String,
    /// Listed on the trade marketplace for others to trade against.
    pub is_public: bool,
    pub listed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One persisted trade simulation.
#[derive(Debug, Clone)]
pub struct TradeReportRow {
    pub id: i64,
    pub other_roster: String,
    pub give: Vec<String>,
    pub receive: Vec<String>,
    pub before_strength: f64,
    pub after_strength: f64,
    pub delta: f64,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}

/// A tracked player on the watchlist.
#[derive(Debug, Clone)]
pub struct WatchlistRow {
    pub id: i64,
    pub player_name: String,
    pub position: String,
    pub team: String,
    pub note: String,
}

/// A projection catalog row scoped to one season/week.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub player_id: Option<String>,
    pub full_name: String,
    pub position: String,
    pub team: String,
    pub season: i64,
    pub week: i64,
    pub projection_points: f64,
    pub source: String,
}

/// A catalog lookup hit: the stored projection and its freshness stamp.
#[derive(Debug, Clone, Copy)]
pub struct CatalogHit {
    pub projection: f64,
    pub updated_at: DateTime<Utc>,
}

/// SQLite-backed persistence. All access goes through a single connection
/// behind a mutex; the engine itself never touches the database.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS players (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL,
                position   TEXT NOT NULL,
                team       TEXT NOT NULL DEFAULT '',
                player_id  TEXT,
                projection REAL NOT NULL DEFAULT 0,
                is_starter INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS saved_rosters (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                name         TEXT NOT NULL,
                players_json TEXT NOT NULL,
                is_public    INTEGER NOT NULL DEFAULT 0,
                listed_at    TEXT,
                created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS trade_reports (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                other_roster    TEXT NOT NULL,
                give_json       TEXT NOT NULL,
                receive_json    TEXT NOT NULL,
                before_strength REAL NOT NULL,
                after_strength  REAL NOT NULL,
                delta           REAL NOT NULL,
                rationale       TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS watchlist (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                player_name TEXT NOT NULL,
                position    TEXT NOT NULL DEFAULT '',
                team        TEXT NOT NULL DEFAULT '',
                note        TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                UNIQUE(player_name)
            );

            CREATE TABLE IF NOT EXISTS player_catalog (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id         TEXT,
                full_name         TEXT NOT NULL,
                position          TEXT NOT NULL,
                team              TEXT NOT NULL DEFAULT '',
                season            INTEGER NOT NULL,
                week              INTEGER NOT NULL,
                projection_points REAL NOT NULL DEFAULT 0,
                updated_at        TEXT NOT NULL,
                source            TEXT NOT NULL DEFAULT 'mock',
                UNIQUE(full_name, team, position, season, week)
            );

            CREATE INDEX IF NOT EXISTS idx_catalog_player_id
                ON player_catalog(player_id, season, week);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // -----------------------------------------------------------------------
    // Working roster
    // -----------------------------------------------------------------------

    /// Append one player to the working roster.
    pub fn add_player(&self, player: &PlayerEntry) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO players (name, position, team, player_id, projection, is_starter)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                player.name,
                player.position.display_str(),
                player.team,
                player.player_id,
                player.projection,
                player.is_starter,
            ],
        )
        .context("failed to insert player")?;
        Ok(())
    }

    /// Replace the entire working roster in one transaction.
    pub fn replace_roster(&self, players: &[PlayerEntry]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM players", [])
            .context("failed to clear roster")?;
        for player in players {
            tx.execute(
                "INSERT INTO players (name, position, team, player_id, projection, is_starter)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    player.name,
                    player.position.display_str(),
                    player.team,
                    player.player_id,
                    player.projection,
                    player.is_starter,
                ],
            )
            .context("failed to insert player")?;
        }
        tx.commit().context("failed to commit roster replacement")
    }

    /// Load the working roster in insertion order.
    pub fn load_roster(&self) -> Result<Vec<PlayerEntry>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT name, position, team, player_id, projection, is_starter
                 FROM players ORDER BY id",
            )
            .context("failed to prepare roster query")?;

        let players = stmt
            .query_map([], |row| {
                let position: String = row.get(1)?;
                let team: String = row.get(2)?;
                let mut entry = PlayerEntry::new(
                    &row.get::<_, String>(0)?,
                    &position,
                    &team,
                    row.get(4)?,
                    row.get(5)?,
                );
                entry.player_id = row.get(3)?;
                Ok(entry)
            })
            .context("failed to query roster")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map roster rows")?;

        Ok(players)
    }

    /// Flip a player's starter flag by name. Returns false when no row
    /// matched.
    pub fn set_starter(&self, name: &str, is_starter: bool) -> Result<bool> {
        let conn = self.conn();
        let changed = conn
            .execute(
                "UPDATE players SET is_starter = ?1 WHERE name = ?2 COLLATE NOCASE",
                params![is_starter, name],
            )
            .context("failed to update starter flag")?;
        Ok(changed > 0)
    }

    /// Remove every player from the working roster.
    pub fn clear_roster(&self) -> Result<()> {
        self.conn()
            .execute("DELETE FROM players", [])
            .context("failed to clear roster")?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Saved rosters
    // -----------------------------------------------------------------------

    /// Snapshot a roster under `name`. Returns the new snapshot ID.
    pub fn save_roster(&self, name: &str, players: &[PlayerEntry]) -> Result<i64> {
        let players_json =
            serde_json::to_string(players).context("failed to serialize roster players")?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO saved_rosters (name, players_json) VALUES (?1, ?2)",
            params![name, players_json],
        )
        .context("failed to save roster")?;
        Ok(conn.last_insert_rowid())
    }

    /// All saved roster snapshots, newest first.
    pub fn list_saved_rosters(&self) -> Result<Vec<SavedRosterMeta>> {
        self.query_saved_rosters("SELECT id, name, is_public, listed_at, created_at
             FROM saved_rosters ORDER BY id DESC")
    }

    /// Snapshots listed on the trade marketplace, newest listing first.
    pub fn list_public_rosters(&self) -> Result<Vec<SavedRosterMeta>> {
        self.query_saved_rosters(
            "SELECT id, name, is_public, listed_at, created_at
             FROM saved_rosters WHERE is_public = 1 ORDER BY listed_at DESC",
        )
    }

    fn query_saved_rosters(&self, sql: &str) -> Result<Vec<SavedRosterMeta>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(sql)
            .context("failed to prepare saved roster query")?;
        let rows = stmt
            .query_map([], |row| {
                let listed_at: Option<String> = row.get(3)?;
                let created_at: String = row.get(4)?;
                Ok(SavedRosterMeta {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    is_public: row.get(2)?,
                    listed_at: listed_at.and_then(|s| parse_timestamp(&s)),
                    created_at: parse_timestamp(&created_at).unwrap_or_else(Utc::now),
                })
            })
            .context("failed to query saved rosters")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map saved roster rows")?;
        Ok(rows)
    }

    /// Load the players of one saved snapshot. None when the ID is unknown.
    pub fn load_saved_roster(&self, id: i64) -> Result<Option<Vec<PlayerEntry>>> {
        let conn = self.conn();
        let json: Option<String> = conn
            .query_row(
                "SELECT players_json FROM saved_rosters WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query saved roster")?;
        match json {
            Some(json) => {
                let players = serde_json::from_str(&json)
                    .context("failed to deserialize saved roster players")?;
                Ok(Some(players))
            }
            None => Ok(None),
        }
    }

    /// List or unlist a snapshot on the trade marketplace. Returns false
    /// when the ID is unknown.
    pub fn set_roster_listed(&self, id: i64, listed: bool) -> Result<bool> {
        let conn = self.conn();
        let listed_at = listed.then(|| Utc::now().to_rfc3339());
        let changed = conn
            .execute(
                "UPDATE saved_rosters SET is_public = ?1, listed_at = ?2 WHERE id = ?3",
                params![listed, listed_at, id],
            )
            .context("failed to update roster listing")?;
        Ok(changed > 0)
    }

    // -----------------------------------------------------------------------
    // Trade reports
    // -----------------------------------------------------------------------

    /// Persist one trade simulation. Give/receive name lists are stored as
    /// JSON arrays.
    pub fn insert_trade_report(
        &self,
        other_roster: &str,
        give: &[String],
        receive: &[String],
        before_strength: f64,
        after_strength: f64,
        delta: f64,
        rationale: &str,
    ) -> Result<i64> {
        let give_json = serde_json::to_string(give).context("failed to serialize give names")?;
        let receive_json =
            serde_json::to_string(receive).context("failed to serialize receive names")?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO trade_reports
                (other_roster, give_json, receive_json, before_strength, after_strength, delta, rationale)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                other_roster,
                give_json,
                receive_json,
                before_strength,
                after_strength,
                delta,
                rationale,
            ],
        )
        .context("failed to insert trade report")?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent trade reports, newest first.
    pub fn recent_trade_reports(&self, limit: usize) -> Result<Vec<TradeReportRow>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, other_roster, give_json, receive_json,
                        before_strength, after_strength, delta, rationale, created_at
                 FROM trade_reports ORDER BY id DESC LIMIT ?1",
            )
            .context("failed to prepare trade report query")?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let give_json: String = row.get(2)?;
                let receive_json: String = row.get(3)?;
                let created_at: String = row.get(8)?;
                Ok(TradeReportRow {
                    id: row.get(0)?,
                    other_roster: row.get(1)?,
                    give: serde_json::from_str(&give_json).unwrap_or_default(),
                    receive: serde_json::from_str(&receive_json).unwrap_or_default(),
                    before_strength: row.get(4)?,
                    after_strength: row.get(5)?,
                    delta: row.get(6)?,
                    rationale: row.get(7)?,
                    created_at: parse_timestamp(&created_at).unwrap_or_else(Utc::now),
                })
            })
            .context("failed to query trade reports")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map trade report rows")?;
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Watchlist
    // -----------------------------------------------------------------------

    /// Track a player. Re-adding an existing name updates its details.
    pub fn watchlist_add(&self, name: &str, position: &str, team: &str, note: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO watchlist (player_name, position, team, note)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(player_name) DO UPDATE SET
                position = excluded.position,
                team = excluded.team,
                note = excluded.note",
            params![name, position, team, note],
        )
        .context("failed to add watchlist entry")?;
        Ok(())
    }

    /// All watched players in insertion order.
    pub fn watchlist(&self) -> Result<Vec<WatchlistRow>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, player_name, position, team, note FROM watchlist ORDER BY id",
            )
            .context("failed to prepare watchlist query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(WatchlistRow {
                    id: row.get(0)?,
                    player_name: row.get(1)?,
                    position: row.get(2)?,
                    team: row.get(3)?,
                    note: row.get(4)?,
                })
            })
            .context("failed to query watchlist")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map watchlist rows")?;
        Ok(rows)
    }

    /// Stop tracking a player. Returns false when the name was not tracked.
    pub fn watchlist_remove(&self, name: &str) -> Result<bool> {
        let changed = self
            .conn()
            .execute(
                "DELETE FROM watchlist WHERE player_name = ?1 COLLATE NOCASE",
                params![name],
            )
            .context("failed to remove watchlist entry")?;
        Ok(changed > 0)
    }

    // -----------------------------------------------------------------------
    // Projection catalog
    // -----------------------------------------------------------------------

    /// Insert or refresh one catalog row, stamping it with the current time.
    pub fn upsert_catalog_row(&self, row: &CatalogRow) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO player_catalog
                (player_id, full_name, position, team, season, week, projection_points, updated_at, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(full_name, team, position, season, week) DO UPDATE SET
                player_id = excluded.player_id,
                projection_points = excluded.projection_points,
                updated_at = excluded.updated_at,
                source = excluded.source",
            params![
                row.player_id,
                row.full_name,
                row.position,
                row.team,
                row.season,
                row.week,
                row.projection_points,
                Utc::now().to_rfc3339(),
                row.source,
            ],
        )
        .context("failed to upsert catalog row")?;
        Ok(())
    }

    /// Look up a catalog projection for one season/week. A stable player ID
    /// match wins; otherwise fall back to name + team + position. The most
    /// recently updated row is returned.
    pub fn catalog_projection(
        &self,
        player_id: Option<&str>,
        name: &str,
        team: &str,
        position: &str,
        season: i64,
        week: i64,
    ) -> Result<Option<CatalogHit>> {
        let conn = self.conn();

        if let Some(player_id) = player_id {
            let hit = conn
                .query_row(
                    "SELECT projection_points, updated_at FROM player_catalog
                     WHERE player_id = ?1 AND season = ?2 AND week = ?3
                     ORDER BY updated_at DESC LIMIT 1",
                    params![player_id, season, week],
                    map_catalog_hit,
                )
                .optional()
                .context("failed to query catalog by player_id")?;
            if let Some(hit) = hit {
                return Ok(Some(hit));
            }
        }

        conn.query_row(
            "SELECT projection_points, updated_at FROM player_catalog
             WHERE full_name = ?1 COLLATE NOCASE AND team = ?2 AND position = ?3
               AND season = ?4 AND week = ?5
             ORDER BY updated_at DESC LIMIT 1",
            params![name, team.to_uppercase(), position.to_uppercase(), season, week],
            map_catalog_hit,
        )
        .optional()
        .context("failed to query catalog by name")
    }
}

fn map_catalog_hit(row: &rusqlite::Row<'_>) -> rusqlite::Result<CatalogHit> {
    let updated_at: String = row.get(1)?;
    Ok(CatalogHit {
        projection: row.get(0)?,
        updated_at: parse_timestamp(&updated_at).unwrap_or_else(Utc::now),
    })
}

/// Parse either an RFC 3339 stamp (ours) or SQLite's strftime default.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
