use clap::Parser;
use geostash::config::Settings;
use geostash::dms::{dms_string, Axis};
use geostash::location::{PlaceCache, Resolver};
use std::path::PathBuf;

/// geostash — cache-first geocoding from the command line.
///
/// Looks up coordinates for a place name, or a place name for coordinates,
/// checking the local cache before calling the MapQuest API. The API key is
/// read from $MAPQUEST_API_KEY or ~/.geostash/config.json.
///
/// Examples:
///   geostash "Sunnyvale, CA"
///   geostash --name "Portland"
///   geostash --lat 37.368 --lon -122.03
///   geostash --serve --port 8080
#[derive(Parser)]
#[command(name = "geostash", version, about, long_about = None)]
struct Cli {
    /// Place name to forward-geocode (positional).
    #[arg(index = 1)]
    name_positional: Option<String>,

    /// Place name to forward-geocode (named).
    #[arg(long)]
    name: Option<String>,

    /// Latitude for reverse geocoding (-90 to 90).
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude for reverse geocoding (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Run the HTTP API server instead of a one-shot lookup.
    #[arg(long)]
    serve: bool,

    /// Server bind host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server bind port.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Cache file override (default: ~/.geostash/cache.json).
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Config file override (default: ~/.geostash/config.json).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let cache = match &cli.cache {
        Some(path) => PlaceCache::load_from(path.clone()),
        None => PlaceCache::load(),
    };

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(geostash::server::start(
            &settings, cache, &cli.host, cli.port,
        ));
        return;
    }

    let mut resolver = Resolver::with_cache(&settings, cache);

    // ── Reverse lookup ──────────────────────────────────────────

    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            eprintln!("Error: Invalid coordinates. Lat: -90..90, Lon: -180..180");
            std::process::exit(1);
        }

        let place = resolver.place_name(Some(lat), Some(lon));
        eprintln!(
            "  \u{1F4CD} {} ({}, {})",
            place.default,
            dms_string(lat, Axis::Latitude),
            dms_string(lon, Axis::Longitude),
        );
        println!("{}", serde_json::to_string_pretty(&place).unwrap());
        return;
    }

    // ── Forward lookup ──────────────────────────────────────────

    if let Some(name) = cli.name.as_deref().or(cli.name_positional.as_deref()) {
        match resolver.coordinates_by_name(name) {
            Some(coords) => {
                eprintln!(
                    "  \u{1F4CD} {} \u{2014} {}, {}",
                    name,
                    dms_string(coords.latitude, Axis::Latitude),
                    dms_string(coords.longitude, Axis::Longitude),
                );
                println!("{}", serde_json::to_string_pretty(&coords).unwrap());
            }
            None => {
                eprintln!("Error: No coordinates found for '{}'", name);
                std::process::exit(1);
            }
        }
        return;
    }

    // ── Nothing provided ────────────────────────────────────────

    eprintln!("Error: No lookup specified.");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  geostash \"Sunnyvale, CA\"");
    eprintln!("  geostash --name Portland");
    eprintln!("  geostash --lat 37.368 --lon -122.03");
    eprintln!("  geostash --serve --port 8080");
    std::process::exit(1);
}
