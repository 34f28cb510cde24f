use axum::Json;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::geo::haversine_km;
use crate::models::api::{DistanceRequest, DistanceResponse};

fn require_numeric(value: Option<f64>, name: &str) -> ApiResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ApiError::Validation(format!(
            "All coordinates (lat1, lon1, lat2, lon2) are required; {} is missing or invalid",
            name
        ))),
    }
}

/// Great-circle distance between two coordinate pairs.
pub async fn get_distance(
    Json(payload): Json<DistanceRequest>,
) -> ApiResult<Json<DistanceResponse>> {
    let lat1 = require_numeric(payload.lat1, "lat1")?;
    let lon1 = require_numeric(payload.lon1, "lon1")?;
    let lat2 = require_numeric(payload.lat2, "lat2")?;
    let lon2 = require_numeric(payload.lon2, "lon2")?;

    let distance = haversine_km(lat1, lon1, lat2, lon2);

    Ok(Json(DistanceResponse { distance }))
}
