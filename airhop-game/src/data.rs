use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{FIELD_LATITUDE, FIELD_LONGITUDE, FIELD_NAME};
use crate::error::{GameError, GameResult};
use crate::store::AirportRecord;

/// Container for airport rows used to seed a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AirportCatalog {
    pub airports: Vec<AirportRecord>,
}

impl AirportCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            airports: Vec::new(),
        }
    }

    /// Load a catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid airport rows.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a catalog from a JSON file on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading airport catalog {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing airport catalog {}", path.display()))
    }

    #[must_use]
    pub fn find(&self, ident: &str) -> Option<&AirportRecord> {
        self.airports.iter().find(|airport| airport.ident == ident)
    }
}

/// Client-supplied airport data used when the store has no row for an ident.
///
/// Keys are `name`, `latitude` and `longitude`; coordinates may arrive as
/// JSON numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirportPayload(pub Map<String, Value>);

/// Values extracted from an [`AirportPayload`].
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackAirport {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AirportPayload {
    /// Parse a payload from a JSON object literal
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Coerce the payload into airport fields.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MissingField`] when a key is absent and
    /// [`GameError::InvalidField`] when a coordinate is not numeric.
    pub fn coerce(&self) -> GameResult<FallbackAirport> {
        let name = match self.field(FIELD_NAME)? {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        };
        Ok(FallbackAirport {
            name,
            latitude: self.float(FIELD_LATITUDE)?,
            longitude: self.float(FIELD_LONGITUDE)?,
        })
    }

    fn field(&self, key: &'static str) -> GameResult<&Value> {
        self.0
            .get(key)
            .filter(|value| !value.is_null())
            .ok_or(GameError::MissingField { field: key })
    }

    fn float(&self, key: &'static str) -> GameResult<f64> {
        let value = self.field(key)?;
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|v| v.is_finite())
            .ok_or_else(|| GameError::InvalidField {
                field: key,
                value: value.to_string(),
            })
    }
}

impl From<Map<String, Value>> for AirportPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "airports": [
                {
                    "ident": "EFHK",
                    "name": "Helsinki Vantaa Airport",
                    "latitude": 60.3172,
                    "longitude": 24.963301,
                    "type": "large_airport"
                },
                {
                    "ident": "EFAH",
                    "name": "Ahmosuo Airport",
                    "latitude": 64.895302,
                    "longitude": 25.752199
                }
            ]
        }"#;

        let catalog = AirportCatalog::from_json(json).unwrap();
        assert_eq!(catalog.airports.len(), 2);
        assert_eq!(
            catalog.find("EFHK").and_then(|a| a.kind.as_deref()),
            Some("large_airport")
        );
        assert!(catalog.find("EFAH").unwrap().kind.is_none());
        assert!(catalog.find("KJFK").is_none());
    }

    #[test]
    fn payload_coerces_numbers_and_strings() {
        let payload = AirportPayload::from_json(
            r#"{"name": "Client Strip", "latitude": "60.5", "longitude": 24}"#,
        )
        .unwrap();
        let fallback = payload.coerce().unwrap();
        assert_eq!(fallback.name, "Client Strip");
        assert!((fallback.latitude - 60.5).abs() < f64::EPSILON);
        assert!((fallback.longitude - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn payload_missing_key_is_reported() {
        let payload = AirportPayload::from_json(r#"{"name": "Nowhere", "latitude": 1}"#).unwrap();
        assert!(matches!(
            payload.coerce(),
            Err(GameError::MissingField { field: "longitude" })
        ));
    }

    #[test]
    fn payload_rejects_non_numeric_coordinates() {
        let payload = AirportPayload::from_json(
            r#"{"name": "Nowhere", "latitude": "north-ish", "longitude": 1}"#,
        )
        .unwrap();
        assert!(matches!(
            payload.coerce(),
            Err(GameError::InvalidField { field: "latitude", .. })
        ));
    }

    #[test]
    fn catalog_file_errors_carry_path() {
        let missing = Path::new("/definitely/not/here/airports.json");
        let err = AirportCatalog::from_path(missing).unwrap_err();
        assert!(format!("{err:#}").contains("airports.json"));
    }
}
