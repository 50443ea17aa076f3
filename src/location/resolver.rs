//! Cache-first resolution: place name → coordinates and coordinates → place name.
//!
//! Forward flow:  cache scan → provider → candidate pick (city quality wins)
//! Reverse flow:  radius cache match → provider → priority fold → cache write

use super::cache::PlaceCache;
use super::provider::{Address, Candidate, GeocodeProvider, MapQuest};
use super::types::{CachedPlace, Coordinates, GeocodeError, PlaceName};
use crate::config::Settings;
use log::{debug, warn};

/// Radius within which a cached place answers a reverse lookup.
pub const CACHE_MATCH_RADIUS_KM: f64 = 10.0;

/// The resolver, generic over the provider so tests can script it.
pub struct Resolver<P = MapQuest> {
    provider: P,
    cache: PlaceCache,
}

impl Resolver<MapQuest> {
    /// Resolver backed by MapQuest and the default on-disk cache.
    pub fn new(settings: &Settings) -> Self {
        Self {
            provider: MapQuest::new(settings),
            cache: PlaceCache::load(),
        }
    }

    /// Resolver backed by MapQuest and a specific cache.
    pub fn with_cache(settings: &Settings, cache: PlaceCache) -> Self {
        Self {
            provider: MapQuest::new(settings),
            cache,
        }
    }
}

impl<P: GeocodeProvider> Resolver<P> {
    /// Resolver over an arbitrary provider (for testing).
    pub fn with_parts(provider: P, cache: PlaceCache) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &PlaceCache {
        &self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve a place name to coordinates.
    ///
    /// Cached names answer without a network call. Provider results are NOT
    /// written back to the cache; only reverse lookups populate it.
    pub fn coordinates_by_name(&self, name: &str) -> Option<Coordinates> {
        if let Some(coords) = self.cache.coordinates_for(name) {
            return Some(coords);
        }

        let candidates = match self.provider.forward(name) {
            Ok(candidates) => candidates,
            Err(e) => {
                log_unavailable(&format!("forward geocode of '{}'", name), &e);
                return None;
            }
        };

        pick_candidate(&candidates)
    }

    /// Resolve coordinates to a place name. Never fails: missing inputs and
    /// unresolvable coordinates yield the "Unknown Location" default.
    pub fn place_name(&mut self, lat: Option<f64>, lon: Option<f64>) -> PlaceName {
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return PlaceName::unknown();
        };

        // Structured entries within the radius answer directly. Legacy string
        // entries force a re-resolve so the record gets upgraded.
        if let Some(CachedPlace::Structured(place)) =
            self.cache.place_for(lat, lon, CACHE_MATCH_RADIUS_KM)
        {
            return place.clone();
        }

        let address = match self.provider.reverse(lat, lon) {
            Ok(address) => address,
            Err(e) => {
                log_unavailable(&format!("reverse geocode of ({}, {})", lat, lon), &e);
                return PlaceName::unknown();
            }
        };

        match place_from_address(&address) {
            Some(place) => {
                self.cache.add(lat, lon, place.clone());
                if let Err(e) = self.cache.flush() {
                    warn!("could not persist place cache: {}", e);
                }
                place
            }
            None => PlaceName::unknown(),
        }
    }
}

// Running without an API key is a supported configuration, not a fault.
fn log_unavailable(what: &str, error: &GeocodeError) {
    match error {
        GeocodeError::MissingKey | GeocodeError::NoMatch => {
            debug!("{} unavailable: {}", what, error)
        }
        _ => warn!("{} unavailable: {}", what, error),
    }
}

/// The first candidate is the default pick; the first city-quality candidate
/// with usable coordinates overrides it.
fn pick_candidate(candidates: &[Candidate]) -> Option<Coordinates> {
    let city = candidates
        .iter()
        .find(|c| is_city_quality(c) && c.coordinates().is_some())
        .and_then(Candidate::coordinates);

    city.or_else(|| candidates.first().and_then(Candidate::coordinates))
}

fn is_city_quality(candidate: &Candidate) -> bool {
    candidate
        .quality
        .as_deref()
        .is_some_and(|q| q.eq_ignore_ascii_case("city"))
}

/// Fold address granularities in priority order; the first present field
/// becomes the default value. `None` when every field is absent.
fn place_from_address(address: &Address) -> Option<PlaceName> {
    let default = [
        &address.city,
        &address.town,
        &address.state,
        &address.country,
    ]
    .into_iter()
    .find_map(|field| field.clone())?;

    Some(PlaceName {
        city: address.city.clone(),
        town: address.town.clone(),
        state: address.state.clone(),
        country: address.country.clone(),
        default,
    })
}
