//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Place name used when a coordinate cannot be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A resolved place name at whatever granularities the provider reported.
///
/// `default` always holds the most specific available value (city before town
/// before state before country). A lookup that resolved nothing carries only
/// `default` set to [`UNKNOWN_LOCATION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub default: String,
}

impl PlaceName {
    /// The fallback place name for unresolvable coordinates.
    pub fn unknown() -> Self {
        Self {
            city: None,
            town: None,
            state: None,
            country: None,
            default: UNKNOWN_LOCATION.to_string(),
        }
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default)
    }
}

/// A cache value. Older cache files stored a bare display string; those load
/// as `Legacy` and count as a miss, so the record gets re-resolved and
/// upgraded on the next reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachedPlace {
    Structured(PlaceName),
    Legacy(String),
}

/// Provider-call failures. Every variant collapses to "not found" / default
/// place name at the resolver boundary; none of them reach callers of the
/// public lookup operations.
#[derive(Debug)]
pub enum GeocodeError {
    /// No API key configured — the call is skipped entirely.
    MissingKey,
    Network(String),
    InvalidResponse(String),
    /// The provider answered but had nothing usable: an explicit error field,
    /// an empty result set, or the no-match sentinel coordinate.
    NoMatch,
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey => write!(f, "no API key configured"),
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "invalid API response: {}", msg),
            Self::NoMatch => write!(f, "no match"),
        }
    }
}

impl std::error::Error for GeocodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_place() {
        let place = PlaceName::unknown();
        assert_eq!(place.default, "Unknown Location");
        assert!(place.city.is_none());
        assert!(place.country.is_none());
    }

    #[test]
    fn test_cached_place_legacy_string() {
        // Old cache files held the place as a bare string.
        let value: CachedPlace = serde_json::from_str(r#""Portland""#).unwrap();
        assert_eq!(value, CachedPlace::Legacy("Portland".to_string()));
    }

    #[test]
    fn test_cached_place_structured() {
        let value: CachedPlace =
            serde_json::from_str(r#"{"city": "Portland", "default": "Portland"}"#).unwrap();
        match value {
            CachedPlace::Structured(place) => {
                assert_eq!(place.city.as_deref(), Some("Portland"));
                assert_eq!(place.default, "Portland");
            }
            CachedPlace::Legacy(_) => panic!("expected a structured place"),
        }
    }

    #[test]
    fn test_place_name_skips_absent_fields() {
        let json = serde_json::to_string(&PlaceName::unknown()).unwrap();
        assert_eq!(json, r#"{"default":"Unknown Location"}"#);
    }
}
