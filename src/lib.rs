//! geostash — cache-first geocoding.
//!
//! Resolves place names to coordinates and coordinates to place names via the
//! MapQuest geocoding API, consulting a persistent local cache before every
//! network call. Successful reverse lookups are written back to the cache;
//! forward lookups only read it.

pub mod config;
pub mod dms;
pub mod location;
pub mod server;
