//! File-backed place cache at ~/.geostash/cache.json.
//!
//! A JSON array of coordinate records. Forward lookups scan the stored place
//! names; reverse lookups take the nearest record within a radius. Records
//! never expire, and writes only hit disk on an explicit [`PlaceCache::flush`].

use super::types::{CachedPlace, Coordinates, PlaceName};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Serialize, Deserialize, Clone)]
struct CacheRecord {
    lat: f64,
    lon: f64,
    place: CachedPlace,
    // Absent in files written before this field existed.
    #[serde(default)]
    cached_at: i64,
}

/// The persistent place cache.
pub struct PlaceCache {
    path: PathBuf,
    records: Vec<CacheRecord>,
}

impl PlaceCache {
    /// Load the cache from the default location (~/.geostash/cache.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load the cache from a specific path (for testing and `--cache`).
    pub fn load_from(path: PathBuf) -> Self {
        let records = Self::read_file(&path).unwrap_or_default();
        Self { path, records }
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geostash")
            .join("cache.json")
    }

    fn read_file(path: &PathBuf) -> Option<Vec<CacheRecord>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Coordinates of a record whose place matches `name`, case-insensitively.
    /// Any granularity value, the default value, and legacy bare strings all
    /// count as a match.
    pub fn coordinates_for(&self, name: &str) -> Option<Coordinates> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| place_matches(&r.place, &needle))
            .map(|r| Coordinates {
                latitude: r.lat,
                longitude: r.lon,
            })
    }

    /// The nearest cached place within `radius_km` of the given point.
    pub fn place_for(&self, lat: f64, lon: f64, radius_km: f64) -> Option<&CachedPlace> {
        let mut best: Option<(&CacheRecord, f64)> = None;
        for record in &self.records {
            let distance = haversine_km(lat, lon, record.lat, record.lon);
            if distance <= radius_km && best.map_or(true, |(_, d)| distance < d) {
                best = Some((record, distance));
            }
        }
        best.map(|(record, _)| &record.place)
    }

    /// Upsert a resolved place at the given coordinates. A record at the
    /// exact same coordinates is replaced; this is how legacy string records
    /// get upgraded to structured ones.
    pub fn add(&mut self, lat: f64, lon: f64, place: PlaceName) {
        let record = CacheRecord {
            lat,
            lon,
            place: CachedPlace::Structured(place),
            cached_at: chrono::Utc::now().timestamp_millis(),
        };
        match self
            .records
            .iter_mut()
            .find(|r| r.lat == lat && r.lon == lon)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Write the cache to disk, creating the parent directory on demand.
    pub fn flush(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, json)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn place_matches(place: &CachedPlace, needle: &str) -> bool {
    match place {
        CachedPlace::Structured(p) => {
            p.default.to_lowercase() == needle
                || [&p.city, &p.town, &p.state, &p.country]
                    .iter()
                    .any(|field| field.as_deref().is_some_and(|v| v.to_lowercase() == needle))
        }
        CachedPlace::Legacy(s) => s.to_lowercase() == needle,
    }
}

/// Great-circle distance between two points, in kilometres.
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
