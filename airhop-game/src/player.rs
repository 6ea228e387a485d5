//! The player's persistent and in-memory game state.
use serde::{Deserialize, Serialize};

use crate::airport::Airport;
use crate::constants::{ENTITY_COORDINATES, ENTITY_PLAYER};
use crate::error::{GameError, GameResult, exactly_one};
use crate::geo::{Coordinates, great_circle_distance};
use crate::store::{GameStore, NewPlayer, PlayerRecord};

/// A participant identified by screen name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Ident of the airport currently occupied.
    pub location: String,
    pub points: i64,
    /// Minutes left in the round.
    pub time: i64,
    pub speed: i64,
    /// Distance left before refuelling; may go negative after a long hop.
    pub range: f64,
    /// Coordinates of `location`.
    pub latitude: f64,
    pub longitude: f64,
    /// Whether the row existed before this session.
    pub returning: bool,
}

impl Player {
    /// Load the player called `name`, creating the row with starting
    /// defaults when the name is new, then resolve the coordinates of the
    /// player's airport.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Ambiguous`] if the name (or the player's
    /// location) matches several rows, [`GameError::NotFound`] if the
    /// location has no airport row, or [`GameError::Store`] if any store call
    /// fails.
    pub fn load<S: GameStore>(store: &S, name: &str) -> GameResult<Self> {
        let mut rows = store.find_players(name).map_err(GameError::store)?;
        let (record, returning) = match rows.len() {
            1 => (rows.remove(0), true),
            0 => {
                let fresh = NewPlayer::with_defaults(name);
                store.insert_player(&fresh).map_err(GameError::store)?;
                log::info!("created player {name} at {}", fresh.location);
                let rows = store.find_players(name).map_err(GameError::store)?;
                (exactly_one(rows, ENTITY_PLAYER, name)?, false)
            }
            count => return Err(GameError::ambiguous(ENTITY_PLAYER, name, count)),
        };
        if returning {
            log::debug!("returning player {name} at {}", record.location);
        }

        let airports = store
            .find_airports(&record.location)
            .map_err(GameError::store)?;
        let home = exactly_one(airports, ENTITY_COORDINATES, &record.location)?;

        Ok(Self {
            name: record.name,
            location: record.location,
            points: record.points,
            time: record.time,
            speed: record.speed,
            range: record.range,
            latitude: home.latitude,
            longitude: home.longitude,
            returning,
        })
    }

    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Distance from the current position to `destination`.
    #[must_use]
    pub fn distance_to(&self, destination: &Airport) -> f64 {
        great_circle_distance(self.coordinates(), destination.coordinates())
    }

    /// Fly to `destination`, spending range, and return the distance flown.
    ///
    /// Range has no floor. Points, time and speed are left for the caller.
    pub fn travel(&mut self, destination: &Airport) -> f64 {
        let distance = self.distance_to(destination);
        self.range -= distance;
        self.location.clone_from(&destination.ident);
        self.latitude = destination.latitude;
        self.longitude = destination.longitude;
        log::debug!(
            "{} travelled {distance:.1} to {}, range now {:.1}",
            self.name,
            self.location,
            self.range
        );
        distance
    }

    /// The mutable fields as a storage row.
    #[must_use]
    pub fn record(&self) -> PlayerRecord {
        PlayerRecord {
            name: self.name.clone(),
            location: self.location.clone(),
            points: self.points,
            time: self.time,
            speed: self.speed,
            range: self.range,
        }
    }

    /// Overwrite the stored row with the current state. Last writer wins.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if no row carries this name, or
    /// [`GameError::Store`] if the update fails.
    pub fn save<S: GameStore>(&self, store: &S) -> GameResult<()> {
        let touched = store
            .update_player(&self.record())
            .map_err(GameError::store)?;
        if touched == 0 {
            return Err(GameError::not_found(ENTITY_PLAYER, self.name.as_str()));
        }
        log::info!(
            "saved {}: {} pts, {} min, range {:.1} at {}",
            self.name,
            self.points,
            self.time,
            self.range,
            self.location
        );
        Ok(())
    }
}
