//! Airports as destinations, plus per-player visit tracking.
use serde::{Deserialize, Serialize};

use crate::constants::ENTITY_AIRPORT;
use crate::data::AirportPayload;
use crate::error::{GameError, GameResult};
use crate::geo::Coordinates;
use crate::player::Player;
use crate::store::{AirportRecord, GameStore};

/// A point of interest the player can fly to.
///
/// `visited` is a snapshot of the visit relation for whichever player last
/// asked; it is only valid until the relation changes again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub ident: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Only known for airports loaded from the store.
    pub kind: Option<String>,
    pub visited: bool,
}

impl Airport {
    /// Load `ident` from the store, falling back to client data when the
    /// store has never heard of it.
    ///
    /// # Errors
    ///
    /// Fails with [`GameError::Ambiguous`] when the ident matches several
    /// rows, [`GameError::NotFound`] when it matches none and no fallback was
    /// given, payload errors from [`AirportPayload::coerce`], or
    /// [`GameError::Store`] if the lookup itself fails.
    pub fn load<S: GameStore>(
        store: &S,
        ident: &str,
        visited: bool,
        fallback: Option<&AirportPayload>,
    ) -> GameResult<Self> {
        let mut rows = store.find_airports(ident).map_err(GameError::store)?;
        log::debug!("airport lookup {ident}: {} row(s)", rows.len());
        match rows.len() {
            1 => {
                let record = rows.remove(0);
                Ok(Self::from_record(record, visited))
            }
            0 => {
                let payload =
                    fallback.ok_or_else(|| GameError::not_found(ENTITY_AIRPORT, ident))?;
                let data = payload.coerce()?;
                log::warn!("airport {ident} not in store, using client-supplied data");
                Ok(Self {
                    ident: ident.to_string(),
                    name: data.name,
                    latitude: data.latitude,
                    longitude: data.longitude,
                    kind: None,
                    visited,
                })
            }
            count => Err(GameError::ambiguous(ENTITY_AIRPORT, ident, count)),
        }
    }

    #[must_use]
    pub fn from_record(record: AirportRecord, visited: bool) -> Self {
        Self {
            ident: record.ident,
            name: record.name,
            latitude: record.latitude,
            longitude: record.longitude,
            kind: record.kind,
            visited,
        }
    }

    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Record a visit by `player` unless one already exists.
    ///
    /// Returns `true` only when this call inserted the pair.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Store`] if the count or insert fails; `visited`
    /// is left untouched in that case.
    pub fn update_visited<S: GameStore>(&mut self, store: &S, player: &Player) -> GameResult<bool> {
        let count = store
            .count_visits(&self.ident, &player.name)
            .map_err(GameError::store)?;
        if count > 0 {
            self.visited = true;
            return Ok(false);
        }
        store
            .insert_visit(&self.ident, &player.name)
            .map_err(GameError::store)?;
        log::info!("{} visited {} for the first time", player.name, self.ident);
        self.visited = true;
        Ok(true)
    }

    /// Refresh and return whether `player` has been here.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Store`] if the count fails.
    pub fn check_visited<S: GameStore>(&mut self, store: &S, player: &Player) -> GameResult<bool> {
        let count = store
            .count_visits(&self.ident, &player.name)
            .map_err(GameError::store)?;
        self.visited = count > 0;
        Ok(self.visited)
    }
}
