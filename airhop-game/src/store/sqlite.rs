//! SQLite-backed store.
//!
//! The connection runs in autocommit mode: each statement below is its own
//! transaction and is durable once the call returns.
use std::path::Path;

use rusqlite::{Connection, Row, params};

use super::{AirportRecord, GameStore, NewPlayer, PlayerRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS airport (
    ident         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    latitude_deg  REAL NOT NULL,
    longitude_deg REAL NOT NULL,
    type          TEXT
);
CREATE TABLE IF NOT EXISTS game (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    screen_name  TEXT    NOT NULL UNIQUE,
    location     TEXT    NOT NULL,
    round_points INTEGER NOT NULL,
    player_time  INTEGER NOT NULL,
    player_speed INTEGER NOT NULL,
    player_range REAL    NOT NULL
);
CREATE TABLE IF NOT EXISTS visited (
    visited_airport_id TEXT NOT NULL,
    player_visited_id  TEXT NOT NULL,
    PRIMARY KEY (visited_airport_id, player_visited_id)
);
";

const SELECT_PLAYER: &str = "SELECT screen_name, location, round_points, player_time, player_speed, player_range
     FROM game
     WHERE screen_name = ?1";

const INSERT_PLAYER: &str = "INSERT INTO game (round_points, player_time, player_speed, player_range, screen_name, location)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const SELECT_AIRPORT: &str = "SELECT ident, name, latitude_deg, longitude_deg, type
     FROM airport
     WHERE airport.ident = ?1";

const UPDATE_PLAYER: &str = "UPDATE game
     SET round_points = ?1, player_time = ?2, player_speed = ?3, player_range = ?4, location = ?5
     WHERE screen_name = ?6";

const COUNT_VISITS: &str = "SELECT COUNT(*) FROM visited
     WHERE visited_airport_id = ?1 AND player_visited_id = ?2";

const INSERT_VISIT: &str =
    "INSERT INTO visited (visited_airport_id, player_visited_id) VALUES (?1, ?2)";

const UPSERT_AIRPORT: &str = "INSERT INTO airport (ident, name, latitude_deg, longitude_deg, type)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(ident) DO UPDATE SET
         name = excluded.name,
         latitude_deg = excluded.latitude_deg,
         longitude_deg = excluded.longitude_deg,
         type = excluded.type";

#[derive(Debug)]
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the tables exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot be
    /// created.
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let path = path.as_ref();
        log::debug!("opening sqlite store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Fresh private database that disappears with the store.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, creating any missing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn from_connection(connection: Connection) -> rusqlite::Result<Self> {
        connection.execute_batch(SCHEMA)?;
        Ok(Self { connection })
    }

    /// Insert an airport or refresh the existing row with the same ident.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    pub fn upsert_airport(&self, airport: &AirportRecord) -> rusqlite::Result<()> {
        self.connection.execute(
            UPSERT_AIRPORT,
            params![
                airport.ident,
                airport.name,
                airport.latitude,
                airport.longitude,
                airport.kind
            ],
        )?;
        Ok(())
    }
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerRecord> {
    Ok(PlayerRecord {
        name: row.get("screen_name")?,
        location: row.get("location")?,
        points: row.get("round_points")?,
        time: row.get("player_time")?,
        speed: row.get("player_speed")?,
        range: row.get("player_range")?,
    })
}

fn airport_from_row(row: &Row<'_>) -> rusqlite::Result<AirportRecord> {
    Ok(AirportRecord {
        ident: row.get("ident")?,
        name: row.get("name")?,
        latitude: row.get("latitude_deg")?,
        longitude: row.get("longitude_deg")?,
        kind: row.get("type")?,
    })
}

impl GameStore for SqliteStore {
    type Error = rusqlite::Error;

    fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, Self::Error> {
        let mut stmt = self.connection.prepare_cached(SELECT_PLAYER)?;
        let rows = stmt.query_map(params![name], player_from_row)?;
        rows.collect()
    }

    fn insert_player(&self, player: &NewPlayer) -> Result<(), Self::Error> {
        self.connection.execute(
            INSERT_PLAYER,
            params![
                player.points,
                player.time,
                player.speed,
                player.range,
                player.name,
                player.location
            ],
        )?;
        Ok(())
    }

    fn find_airports(&self, ident: &str) -> Result<Vec<AirportRecord>, Self::Error> {
        let mut stmt = self.connection.prepare_cached(SELECT_AIRPORT)?;
        let rows = stmt.query_map(params![ident], airport_from_row)?;
        rows.collect()
    }

    fn update_player(&self, player: &PlayerRecord) -> Result<usize, Self::Error> {
        self.connection.execute(
            UPDATE_PLAYER,
            params![
                player.points,
                player.time,
                player.speed,
                player.range,
                player.location,
                player.name
            ],
        )
    }

    fn count_visits(&self, airport: &str, player: &str) -> Result<u64, Self::Error> {
        let count: i64 = self
            .connection
            .query_row(COUNT_VISITS, params![airport, player], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn insert_visit(&self, airport: &str, player: &str) -> Result<(), Self::Error> {
        self.connection
            .execute(INSERT_VISIT, params![airport, player])?;
        Ok(())
    }
}
