//! Geocoding subsystem: place name ↔ coordinate resolution with a
//! persistent cache-first lookup path.

pub mod cache;
pub mod provider;
pub mod resolver;
pub mod types;

pub use cache::PlaceCache;
pub use provider::{GeocodeProvider, MapQuest};
pub use resolver::{Resolver, CACHE_MATCH_RADIUS_KM};
pub use types::{CachedPlace, Coordinates, GeocodeError, PlaceName, UNKNOWN_LOCATION};
