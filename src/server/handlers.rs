use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{Coordinates, PlaceName};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/forward ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForwardQuery {
    pub name: Option<String>,
}

pub async fn forward(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForwardQuery>,
) -> Result<Json<Coordinates>, ApiError> {
    let start = Instant::now();

    let name = params.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'name' parameter"));
    }

    let coords = {
        let resolver = state.resolver.lock().unwrap();
        resolver.coordinates_by_name(&name)
    };

    match coords {
        Some(coords) => {
            info!(
                "GET /api/forward name={} -> ({}, {}) ({:.1}ms)",
                name,
                coords.latitude,
                coords.longitude,
                start.elapsed().as_secs_f64() * 1000.0,
            );
            Ok(Json(coords))
        }
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("No coordinates found for '{}'", name),
        )),
    }
}

// ─── GET /api/reverse ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReverseQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub async fn reverse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseQuery>,
) -> Result<Json<PlaceName>, ApiError> {
    let start = Instant::now();

    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Provide 'lat' and 'lon' parameters",
        ));
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lon: -180..180",
        ));
    }

    let place = {
        let mut resolver = state.resolver.lock().unwrap();
        resolver.place_name(Some(lat), Some(lon))
    };

    info!(
        "GET /api/reverse lat={} lon={} -> {} ({:.1}ms)",
        lat,
        lon,
        place.default,
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(place))
}
