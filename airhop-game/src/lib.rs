//! Airhop Game Engine
//!
//! Core game logic for the Airhop flight geography game: players hop between
//! airports, spending range and time, and every airport they reach is
//! remembered per player. Storage sits behind the [`GameStore`] trait so the
//! same logic runs against SQLite or an in-memory store.

pub mod airport;
pub mod constants;
pub mod data;
pub mod error;
pub mod geo;
pub mod numbers;
pub mod player;
pub mod store;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use airport::Airport;
pub use data::{AirportCatalog, AirportPayload, FallbackAirport};
pub use error::{GameError, GameResult};
pub use geo::{Coordinates, great_circle_distance};
pub use player::Player;
pub use store::{AirportRecord, GameStore, MemoryStore, NewPlayer, PlayerRecord};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;

use constants::{FIELD_SPEED, VISIT_POINTS};
use numbers::flight_minutes;

/// Outcome of a single hop, suitable for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightReport {
    pub player: String,
    pub from: String,
    pub to: String,
    pub distance: f64,
    pub minutes: i64,
    pub newly_visited: bool,
    pub points: i64,
    pub range_left: f64,
    pub time_left: i64,
}

/// Main game engine binding game rules to a store handle
pub struct GameEngine<S>
where
    S: GameStore,
{
    store: S,
}

impl<S> GameEngine<S>
where
    S: GameStore,
{
    /// Create a new game engine over the provided store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load or create the player called `name`
    ///
    /// # Errors
    ///
    /// See [`Player::load`].
    pub fn player(&self, name: &str) -> GameResult<Player> {
        Player::load(&self.store, name)
    }

    /// Load a destination, using `fallback` when the store lacks it
    ///
    /// # Errors
    ///
    /// See [`Airport::load`].
    pub fn airport(&self, ident: &str, fallback: Option<&AirportPayload>) -> GameResult<Airport> {
        Airport::load(&self.store, ident, false, fallback)
    }

    /// Load an airport with its visited flag resolved for `player`
    ///
    /// # Errors
    ///
    /// See [`Airport::load`] and [`Airport::check_visited`].
    pub fn airport_for(&self, player: &Player, ident: &str) -> GameResult<Airport> {
        let mut airport = Airport::load(&self.store, ident, false, None)?;
        airport.check_visited(&self.store, player)?;
        Ok(airport)
    }

    /// Fly `player` to `ident`: travel, charge flight time, award points for
    /// a first visit, save, then record the visit.
    ///
    /// Only airports the store knows are valid destinations, so a saved
    /// location can always be resolved again by [`Player::load`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundOver`] when no time is left,
    /// [`GameError::InvalidField`] when the player cannot move,
    /// [`GameError::NotFound`] when the store has no row for `ident`, and
    /// any error from talking to the store. `player` is only updated once
    /// the flight has been saved.
    pub fn fly(&self, player: &mut Player, ident: &str) -> GameResult<FlightReport> {
        if player.time <= 0 {
            return Err(GameError::RoundOver {
                name: player.name.clone(),
            });
        }
        let mut destination = self.airport(ident, None)?;
        let minutes = flight_minutes(player.distance_to(&destination), player.speed).ok_or_else(
            || GameError::InvalidField {
                field: FIELD_SPEED,
                value: player.speed.to_string(),
            },
        )?;

        let mut flown = player.clone();
        let from = flown.location.clone();
        let distance = flown.travel(&destination);
        flown.time -= minutes;

        let newly_visited = !destination.check_visited(&self.store, &flown)?;
        if newly_visited {
            flown.points += VISIT_POINTS;
        }
        flown.save(&self.store)?;
        destination.update_visited(&self.store, &flown)?;
        *player = flown;

        log::info!(
            "{} flew {from} -> {} ({distance:.1}, {minutes} min)",
            player.name,
            destination.ident
        );

        Ok(FlightReport {
            player: player.name.clone(),
            from,
            to: destination.ident,
            distance,
            minutes,
            newly_visited,
            points: player.points,
            range_left: player.range,
            time_left: player.time,
        })
    }

    /// Persist `player` without flying
    ///
    /// # Errors
    ///
    /// See [`Player::save`].
    pub fn save(&self, player: &Player) -> GameResult<()> {
        player.save(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_store() -> MemoryStore {
        MemoryStore::with_airports([
            AirportRecord {
                ident: "EFHK".into(),
                name: "Helsinki Vantaa Airport".into(),
                latitude: 60.3172,
                longitude: 24.9633,
                kind: Some("large_airport".into()),
            },
            AirportRecord {
                ident: "EFTU".into(),
                name: "Turku Airport".into(),
                latitude: 60.5141,
                longitude: 22.2628,
                kind: Some("medium_airport".into()),
            },
        ])
    }

    #[test]
    fn engine_flies_and_persists() {
        let store = fixture_store();
        let engine = GameEngine::new(store.clone());
        let mut player = engine.player("Ada").unwrap();

        let report = engine.fly(&mut player, "EFTU").unwrap();
        assert_eq!(report.from, "EFHK");
        assert_eq!(report.to, "EFTU");
        assert!(report.newly_visited);
        assert_eq!(report.points, VISIT_POINTS);
        assert_eq!(report.minutes, flight_minutes(report.distance, 60).unwrap());
        assert_eq!(report.time_left, 10_080 - report.minutes);

        let reloaded = engine.player("Ada").unwrap();
        assert_eq!(reloaded.record(), player.record());
        assert_eq!(store.visit_rows().len(), 1);
    }

    #[test]
    fn repeat_visit_earns_nothing() {
        let engine = GameEngine::new(fixture_store());
        let mut player = engine.player("Ada").unwrap();
        engine.fly(&mut player, "EFTU").unwrap();
        engine.fly(&mut player, "EFHK").unwrap();
        let third = engine.fly(&mut player, "EFTU").unwrap();
        assert!(!third.newly_visited);
        assert_eq!(third.points, 2 * VISIT_POINTS);
    }

    #[test]
    fn airport_for_resolves_visited_flag() {
        let engine = GameEngine::new(fixture_store());
        let mut player = engine.player("Ada").unwrap();
        assert!(!engine.airport_for(&player, "EFTU").unwrap().visited);
        engine.fly(&mut player, "EFTU").unwrap();
        assert!(engine.airport_for(&player, "EFTU").unwrap().visited);
    }

    #[test]
    fn exhausted_round_refuses_to_fly() {
        let engine = GameEngine::new(fixture_store());
        let mut player = engine.player("Ada").unwrap();
        player.time = 0;
        assert!(matches!(
            engine.fly(&mut player, "EFTU"),
            Err(GameError::RoundOver { .. })
        ));
        assert_eq!(player.location, "EFHK");
    }

    #[test]
    fn grounded_player_stays_put() {
        let engine = GameEngine::new(fixture_store());
        let mut player = engine.player("Ada").unwrap();
        player.speed = 0;
        assert!(matches!(
            engine.fly(&mut player, "EFTU"),
            Err(GameError::InvalidField { field: "speed", .. })
        ));
        assert_eq!(player.location, "EFHK");
    }

    #[test]
    fn unknown_destination_leaves_player_untouched() {
        let engine = GameEngine::new(fixture_store());
        let mut player = engine.player("Ada").unwrap();
        let before = player.clone();
        assert!(engine.fly(&mut player, "ZZZZ").is_err());
        assert_eq!(player, before);
    }

    #[test]
    fn failed_save_keeps_player_and_visit_unchanged() {
        use std::cell::Cell;

        struct SaveFails {
            inner: MemoryStore,
            failing: Cell<bool>,
        }

        impl GameStore for SaveFails {
            type Error = <MemoryStore as GameStore>::Error;

            fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, Self::Error> {
                self.inner.find_players(name)
            }
            fn insert_player(&self, player: &NewPlayer) -> Result<(), Self::Error> {
                self.inner.insert_player(player)
            }
            fn find_airports(&self, ident: &str) -> Result<Vec<AirportRecord>, Self::Error> {
                self.inner.find_airports(ident)
            }
            fn update_player(&self, player: &PlayerRecord) -> Result<usize, Self::Error> {
                if self.failing.get() {
                    return Err(store::memory::MemoryStoreError::Offline);
                }
                self.inner.update_player(player)
            }
            fn count_visits(&self, airport: &str, player: &str) -> Result<u64, Self::Error> {
                self.inner.count_visits(airport, player)
            }
            fn insert_visit(&self, airport: &str, player: &str) -> Result<(), Self::Error> {
                self.inner.insert_visit(airport, player)
            }
        }

        let store = SaveFails {
            inner: fixture_store(),
            failing: Cell::new(false),
        };
        let engine = GameEngine::new(&store);
        let mut player = engine.player("Ada").unwrap();
        let before = player.clone();

        store.failing.set(true);
        let err = engine.fly(&mut player, "EFTU").unwrap_err();
        assert!(err.is_store());
        assert_eq!(player, before);
        assert!(store.inner.visit_rows().is_empty());

        store.failing.set(false);
        let retry = engine.fly(&mut player, "EFTU").unwrap();
        assert!(retry.newly_visited);
        assert_eq!(retry.points, VISIT_POINTS);
        assert_eq!(engine.player("Ada").unwrap().points, VISIT_POINTS);
        assert_eq!(store.inner.visit_rows().len(), 1);
    }

    #[test]
    fn unlisted_destination_is_refused_even_with_payload() {
        let engine = GameEngine::new(fixture_store());
        let payload = AirportPayload::from_json(
            r#"{"name": "Lake Strip", "latitude": "61.0", "longitude": 25.0}"#,
        )
        .unwrap();
        assert!(engine.airport("FI-0042", Some(&payload)).is_ok());

        let mut player = engine.player("Ada").unwrap();
        let before = player.clone();
        assert!(matches!(
            engine.fly(&mut player, "FI-0042"),
            Err(GameError::NotFound { entity: "airport", .. })
        ));
        assert_eq!(player, before);
        assert_eq!(engine.player("Ada").unwrap().location, "EFHK");
        assert!(engine.fly(&mut player, "EFTU").is_ok());
    }

    #[test]
    fn engine_accepts_borrowed_store() {
        let store = fixture_store();
        let engine = GameEngine::new(&store);
        engine.player("Ada").unwrap();
        assert_eq!(store.player_count(), 1);
    }
}
