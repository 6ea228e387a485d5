//! In-process store used by tests and throwaway sessions.
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use thiserror::Error;

use super::{AirportRecord, GameStore, NewPlayer, PlayerRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("screen name `{0}` already exists")]
    DuplicatePlayer(String),
    #[error("memory store is offline")]
    Offline,
}

#[derive(Debug, Default)]
struct Tables {
    players: Vec<PlayerRecord>,
    airports: Vec<AirportRecord>,
    visits: BTreeSet<(String, String)>,
    offline: bool,
}

/// Shared-handle store backed by plain collections.
///
/// Clones share the same tables, so a test can keep one handle for
/// inspection while the game holds another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Rc<RefCell<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `airports`.
    #[must_use]
    pub fn with_airports(airports: impl IntoIterator<Item = AirportRecord>) -> Self {
        let store = Self::new();
        for airport in airports {
            store.add_airport(airport);
        }
        store
    }

    /// Insert or replace an airport keyed by ident.
    pub fn add_airport(&self, airport: AirportRecord) {
        let mut tables = self.tables.borrow_mut();
        if let Some(existing) = tables.airports.iter_mut().find(|a| a.ident == airport.ident) {
            *existing = airport;
        } else {
            tables.airports.push(airport);
        }
    }

    /// Append a player row without the screen-name uniqueness check.
    ///
    /// Only useful to reproduce data written before the constraint existed.
    pub fn insert_raw_player(&self, record: PlayerRecord) {
        self.tables.borrow_mut().players.push(record);
    }

    /// Simulate the backing store dropping away (or coming back).
    pub fn set_offline(&self, offline: bool) {
        self.tables.borrow_mut().offline = offline;
    }

    /// Every (airport, player) visit pair, sorted.
    #[must_use]
    pub fn visit_rows(&self) -> Vec<(String, String)> {
        self.tables.borrow().visits.iter().cloned().collect()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.tables.borrow().players.len()
    }

    fn online(&self) -> Result<(), MemoryStoreError> {
        if self.tables.borrow().offline {
            Err(MemoryStoreError::Offline)
        } else {
            Ok(())
        }
    }
}

impl GameStore for MemoryStore {
    type Error = MemoryStoreError;

    fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, Self::Error> {
        self.online()?;
        Ok(self
            .tables
            .borrow()
            .players
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect())
    }

    fn insert_player(&self, player: &NewPlayer) -> Result<(), Self::Error> {
        self.online()?;
        let mut tables = self.tables.borrow_mut();
        if tables.players.iter().any(|p| p.name == player.name) {
            return Err(MemoryStoreError::DuplicatePlayer(player.name.clone()));
        }
        tables.players.push(player.clone().into());
        Ok(())
    }

    fn find_airports(&self, ident: &str) -> Result<Vec<AirportRecord>, Self::Error> {
        self.online()?;
        Ok(self
            .tables
            .borrow()
            .airports
            .iter()
            .filter(|a| a.ident == ident)
            .cloned()
            .collect())
    }

    fn update_player(&self, player: &PlayerRecord) -> Result<usize, Self::Error> {
        self.online()?;
        let mut tables = self.tables.borrow_mut();
        let mut touched = 0;
        for row in tables.players.iter_mut().filter(|p| p.name == player.name) {
            row.location.clone_from(&player.location);
            row.points = player.points;
            row.time = player.time;
            row.speed = player.speed;
            row.range = player.range;
            touched += 1;
        }
        Ok(touched)
    }

    fn count_visits(&self, airport: &str, player: &str) -> Result<u64, Self::Error> {
        self.online()?;
        let key = (airport.to_string(), player.to_string());
        Ok(u64::from(self.tables.borrow().visits.contains(&key)))
    }

    fn insert_visit(&self, airport: &str, player: &str) -> Result<(), Self::Error> {
        self.online()?;
        self.tables
            .borrow_mut()
            .visits
            .insert((airport.to_string(), player.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(ident: &str, name: &str) -> AirportRecord {
        AirportRecord {
            ident: ident.to_string(),
            name: name.to_string(),
            latitude: 1.0,
            longitude: 2.0,
            kind: None,
        }
    }

    #[test]
    fn clones_share_tables() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.insert_player(&NewPlayer::with_defaults("Ada")).unwrap();
        assert_eq!(store.find_players("Ada").unwrap().len(), 1);
    }

    #[test]
    fn duplicate_screen_name_is_rejected() {
        let store = MemoryStore::new();
        store.insert_player(&NewPlayer::with_defaults("Ada")).unwrap();
        assert_eq!(
            store.insert_player(&NewPlayer::with_defaults("Ada")),
            Err(MemoryStoreError::DuplicatePlayer("Ada".into()))
        );
        assert_eq!(store.player_count(), 1);
    }

    #[test]
    fn add_airport_replaces_by_ident() {
        let store = MemoryStore::with_airports([airport("EFHK", "Old")]);
        store.add_airport(airport("EFHK", "New"));
        let rows = store.find_airports("EFHK").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "New");
    }

    #[test]
    fn update_reports_rows_touched() {
        let store = MemoryStore::new();
        let mut record: PlayerRecord = NewPlayer::with_defaults("Ada").into();
        assert_eq!(store.update_player(&record).unwrap(), 0);
        store.insert_player(&NewPlayer::with_defaults("Ada")).unwrap();
        record.points = 42;
        assert_eq!(store.update_player(&record).unwrap(), 1);
        assert_eq!(store.find_players("Ada").unwrap()[0].points, 42);
    }

    #[test]
    fn visit_pairs_are_unique() {
        let store = MemoryStore::new();
        store.insert_visit("EFAH", "Ada").unwrap();
        store.insert_visit("EFAH", "Ada").unwrap();
        assert_eq!(store.count_visits("EFAH", "Ada").unwrap(), 1);
        assert_eq!(store.count_visits("EFAH", "Bob").unwrap(), 0);
        assert_eq!(store.visit_rows().len(), 1);
    }

    #[test]
    fn offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert_eq!(store.find_players("Ada"), Err(MemoryStoreError::Offline));
        assert_eq!(store.count_visits("EFAH", "Ada"), Err(MemoryStoreError::Offline));
        store.set_offline(false);
        assert!(store.find_players("Ada").unwrap().is_empty());
    }
}
