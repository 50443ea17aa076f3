//! MapQuest geocoding client: forward and reverse lookups over blocking HTTP.

use super::types::{Coordinates, GeocodeError};
use crate::config::Settings;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://www.mapquestapi.com";
const FORWARD_PATH: &str = "/geocoding/v1/address";
const REVERSE_PATH: &str = "/nominatim/v1/reverse.php";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Forward queries that match nothing come back as a successful response
// pointing at the geographic center of the US. Must be treated as "no match",
// never as a real location.
const NO_MATCH_LAT: f64 = 39.78373;
const NO_MATCH_LNG: f64 = -100.445882;

/// Seam between the resolver and the network. Tests substitute a scripted
/// implementation to observe which lookups reach the provider.
pub trait GeocodeProvider {
    /// Forward geocode: the candidate locations of the best result for a
    /// free-text query, in provider order.
    fn forward(&self, name: &str) -> Result<Vec<Candidate>, GeocodeError>;

    /// Reverse geocode: the address granularities at a coordinate.
    fn reverse(&self, lat: f64, lon: f64) -> Result<Address, GeocodeError>;
}

// ─── Response shapes ────────────────────────────────────────────

/// Raw forward-geocoding response.
#[derive(Debug, Deserialize)]
pub struct ForwardResponse {
    #[serde(default)]
    results: Vec<ForwardResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ForwardResult {
    #[serde(default)]
    locations: Vec<Candidate>,
}

/// One candidate location within a forward result.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(rename = "latLng")]
    pub lat_lng: Option<LatLng>,
    #[serde(rename = "geocodeQuality")]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Candidate {
    /// The candidate's coordinates, if the provider sent both components.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self.lat_lng {
            Some(LatLng {
                lat: Some(lat),
                lng: Some(lng),
            }) => Some(Coordinates {
                latitude: lat,
                longitude: lng,
            }),
            _ => None,
        }
    }
}

/// Raw reverse-geocoding response.
#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Address granularities reported by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// ─── Normalization ──────────────────────────────────────────────

fn normalize_forward(response: ForwardResponse) -> Result<Vec<Candidate>, GeocodeError> {
    if response.error.is_some() {
        return Err(GeocodeError::NoMatch);
    }

    // Only the first result's candidates matter; later results are
    // alternative interpretations of the query.
    let candidates = response
        .results
        .into_iter()
        .next()
        .map(|r| r.locations)
        .unwrap_or_default();

    match candidates.first().map(Candidate::coordinates) {
        None => return Err(GeocodeError::NoMatch),
        Some(Some(coords)) if coords.latitude == NO_MATCH_LAT && coords.longitude == NO_MATCH_LNG => {
            return Err(GeocodeError::NoMatch);
        }
        Some(_) => {}
    }

    Ok(candidates)
}

fn normalize_reverse(response: ReverseResponse) -> Result<Address, GeocodeError> {
    if response.error.is_some() {
        return Err(GeocodeError::NoMatch);
    }
    response.address.ok_or(GeocodeError::NoMatch)
}

// ─── MapQuest client ────────────────────────────────────────────

/// Blocking MapQuest client. Without an API key every call reports
/// [`GeocodeError::MissingKey`] and the resolver falls back to its defaults.
pub struct MapQuest {
    api_key: Option<String>,
    prefer_english: bool,
}

impl MapQuest {
    pub fn new(settings: &Settings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            prefer_english: settings.prefer_english,
        }
    }

    fn dispatch(&self, path: &str, query: &str) -> Result<ureq::Response, GeocodeError> {
        let key = self.api_key.as_deref().ok_or(GeocodeError::MissingKey)?;
        let url = format!(
            "{}{}?key={}&format=json&{}",
            BASE_URL,
            path,
            urlencod(key),
            query
        );

        let mut request = ureq::get(&url).timeout(REQUEST_TIMEOUT);
        if self.prefer_english {
            request = request.set("Accept-Language", "en-EN,en;q=0.8");
        }

        request
            .call()
            .map_err(|e| GeocodeError::Network(e.to_string()))
    }
}

impl GeocodeProvider for MapQuest {
    fn forward(&self, name: &str) -> Result<Vec<Candidate>, GeocodeError> {
        let response = self.dispatch(FORWARD_PATH, &format!("location={}", urlencod(name)))?;
        let parsed: ForwardResponse = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
        normalize_forward(parsed)
    }

    fn reverse(&self, lat: f64, lon: f64) -> Result<Address, GeocodeError> {
        let response = self.dispatch(REVERSE_PATH, &format!("lat={}&lon={}", lat, lon))?;
        let parsed: ReverseResponse = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
        normalize_reverse(parsed)
    }
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencod(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            '=' => "%3D".to_string(),
            '+' => "%2B".to_string(),
            ',' => "%2C".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => format!("%{:02X}", c as u32),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(json: &str) -> Result<Vec<Candidate>, GeocodeError> {
        normalize_forward(serde_json::from_str(json).unwrap())
    }

    fn reverse(json: &str) -> Result<Address, GeocodeError> {
        normalize_reverse(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_forward_candidates_in_order() {
        let candidates = forward(
            r#"{"results": [{"locations": [
                {"latLng": {"lat": 1.0, "lng": 1.0}, "geocodeQuality": "APPROXIMATE"},
                {"latLng": {"lat": 2.0, "lng": 2.0}, "geocodeQuality": "CITY"}
            ]}]}"#,
        )
        .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].coordinates().unwrap().latitude, 1.0);
        assert_eq!(candidates[1].quality.as_deref(), Some("CITY"));
    }

    #[test]
    fn test_forward_rejects_error_field() {
        let result = forward(r#"{"error": "invalid key"}"#);
        assert!(matches!(result, Err(GeocodeError::NoMatch)));
    }

    #[test]
    fn test_forward_rejects_no_match_sentinel() {
        // The sentinel must win even when the rest of the response looks fine.
        let result = forward(
            r#"{"results": [{"locations": [
                {"latLng": {"lat": 39.78373, "lng": -100.445882}, "geocodeQuality": "CITY"}
            ]}]}"#,
        );
        assert!(matches!(result, Err(GeocodeError::NoMatch)));
    }

    #[test]
    fn test_forward_near_sentinel_is_accepted() {
        let candidates = forward(
            r#"{"results": [{"locations": [
                {"latLng": {"lat": 39.78374, "lng": -100.445882}}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_forward_rejects_empty_results() {
        assert!(matches!(forward(r#"{"results": []}"#), Err(GeocodeError::NoMatch)));
        assert!(matches!(forward(r#"{}"#), Err(GeocodeError::NoMatch)));
        assert!(matches!(
            forward(r#"{"results": [{"locations": []}]}"#),
            Err(GeocodeError::NoMatch)
        ));
    }

    #[test]
    fn test_forward_keeps_candidate_without_coordinates() {
        // A coordinate-less first candidate is not the sentinel; the resolver
        // decides what to do with it.
        let candidates = forward(
            r#"{"results": [{"locations": [
                {"geocodeQuality": "STREET"},
                {"latLng": {"lat": 5.0, "lng": 6.0}, "geocodeQuality": "CITY"}
            ]}]}"#,
        )
        .unwrap();
        assert!(candidates[0].coordinates().is_none());
        assert!(candidates[1].coordinates().is_some());
    }

    #[test]
    fn test_reverse_address() {
        let address = reverse(
            r#"{"address": {"city": "Springfield", "state": "IL", "country": "US"}}"#,
        )
        .unwrap();
        assert_eq!(address.city.as_deref(), Some("Springfield"));
        assert_eq!(address.town, None);
        assert_eq!(address.state.as_deref(), Some("IL"));
        assert_eq!(address.country.as_deref(), Some("US"));
    }

    #[test]
    fn test_reverse_rejects_missing_address() {
        assert!(matches!(reverse(r#"{}"#), Err(GeocodeError::NoMatch)));
        assert!(matches!(
            reverse(r#"{"error": "no key"}"#),
            Err(GeocodeError::NoMatch)
        ));
    }

    #[test]
    fn test_urlencod() {
        assert_eq!(urlencod("Sunnyvale, CA"), "Sunnyvale%2C%20CA");
        assert_eq!(urlencod("a&b=c+d"), "a%26b%3Dc%2Bd");
        assert_eq!(urlencod("plain-text_1.0~"), "plain-text_1.0~");
    }
}
