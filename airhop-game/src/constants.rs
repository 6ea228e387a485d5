//! Centralized starting values and tuning constants for Airhop game logic.
//!
//! New players are created from these values, and the driver's flight
//! accounting reads them. Keeping them together means a balance change is a
//! reviewed code change rather than a database edit.

// Starting state ------------------------------------------------------------
/// Airport every new player starts from.
pub const HOME_AIRPORT: &str = "EFHK";
pub const STARTING_POINTS: i64 = 0;
/// One week, in minutes.
pub const STARTING_TIME_MINUTES: i64 = 10_080;
pub const STARTING_SPEED: i64 = 60;
pub const STARTING_RANGE: f64 = 100.0;

// Geography -----------------------------------------------------------------
/// Mean earth radius used by the great-circle distance, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

// Flight accounting ---------------------------------------------------------
pub const MINUTES_PER_HOUR: f64 = 60.0;
/// Score awarded the first time a player reaches an airport.
pub const VISIT_POINTS: i64 = 100;

// Entity labels used in error reporting -------------------------------------
pub(crate) const ENTITY_PLAYER: &str = "player";
pub(crate) const ENTITY_AIRPORT: &str = "airport";
pub(crate) const ENTITY_COORDINATES: &str = "coordinates";

// Fallback payload keys -----------------------------------------------------
pub(crate) const FIELD_NAME: &str = "name";
pub(crate) const FIELD_LATITUDE: &str = "latitude";
pub(crate) const FIELD_LONGITUDE: &str = "longitude";
pub(crate) const FIELD_SPEED: &str = "speed";
