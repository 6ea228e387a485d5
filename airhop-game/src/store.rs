//! Typed repository boundary between game objects and persistent storage.
//!
//! Every operation takes its inputs as bound values; implementations never
//! splice caller data into query text.
use serde::{Deserialize, Serialize};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// A persisted player row as read from the `game` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub location: String,
    pub points: i64,
    pub time: i64,
    pub speed: i64,
    pub range: f64,
}

/// Values written when a screen name is seen for the first time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub location: String,
    pub points: i64,
    pub time: i64,
    pub speed: i64,
    pub range: f64,
}

impl NewPlayer {
    /// Starting row for `name` using the tuned defaults.
    #[must_use]
    pub fn with_defaults(name: impl Into<String>) -> Self {
        use crate::constants::{
            HOME_AIRPORT, STARTING_POINTS, STARTING_RANGE, STARTING_SPEED, STARTING_TIME_MINUTES,
        };
        Self {
            name: name.into(),
            location: HOME_AIRPORT.to_string(),
            points: STARTING_POINTS,
            time: STARTING_TIME_MINUTES,
            speed: STARTING_SPEED,
            range: STARTING_RANGE,
        }
    }
}

impl From<NewPlayer> for PlayerRecord {
    fn from(player: NewPlayer) -> Self {
        Self {
            name: player.name,
            location: player.location,
            points: player.points,
            time: player.time,
            speed: player.speed,
            range: player.range,
        }
    }
}

/// A persisted airport row as read from the `airport` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub ident: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Storage operations consumed by players and airports.
///
/// Implementations must make each write durable before returning.
pub trait GameStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All player rows whose screen name equals `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, Self::Error>;

    /// Insert a fresh player row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written, including a duplicate
    /// screen name.
    fn insert_player(&self, player: &NewPlayer) -> Result<(), Self::Error>;

    /// All airport rows whose identifier equals `ident`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_airports(&self, ident: &str) -> Result<Vec<AirportRecord>, Self::Error>;

    /// Overwrite the mutable fields of the player keyed by `player.name`,
    /// returning how many rows were touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be written.
    fn update_player(&self, player: &PlayerRecord) -> Result<usize, Self::Error>;

    /// Number of visit rows for the (airport, player) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn count_visits(&self, airport: &str, player: &str) -> Result<u64, Self::Error>;

    /// Record that `player` has reached `airport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    fn insert_visit(&self, airport: &str, player: &str) -> Result<(), Self::Error>;
}

impl<S: GameStore + ?Sized> GameStore for &S {
    type Error = S::Error;

    fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, Self::Error> {
        (**self).find_players(name)
    }

    fn insert_player(&self, player: &NewPlayer) -> Result<(), Self::Error> {
        (**self).insert_player(player)
    }

    fn find_airports(&self, ident: &str) -> Result<Vec<AirportRecord>, Self::Error> {
        (**self).find_airports(ident)
    }

    fn update_player(&self, player: &PlayerRecord) -> Result<usize, Self::Error> {
        (**self).update_player(player)
    }

    fn count_visits(&self, airport: &str, player: &str) -> Result<u64, Self::Error> {
        (**self).count_visits(airport, player)
    }

    fn insert_visit(&self, airport: &str, player: &str) -> Result<(), Self::Error> {
        (**self).insert_visit(airport, player)
    }
}
