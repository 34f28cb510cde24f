use axum::{extract::State, http::HeaderMap, Json};
use sqlx::PgPool;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::authenticate;
use crate::db::read_ops;
use crate::domain::ranking::{effective_max_distance, rank_sellers, RankedSellers};
use crate::domain::suggestion::external_search_url;
use crate::models::api::{
    ClosestSellerDto, FindClosestSellersRequest, FindClosestSellersResponse, SellerDistanceDto,
};

fn validate_coordinate(value: Option<f64>, name: &str, min: f64, max: f64) -> ApiResult<f64> {
    match value {
        Some(v) if v.is_finite() && (min..=max).contains(&v) => Ok(v),
        _ => Err(ApiError::Validation(format!(
            "Missing or invalid {}",
            name
        ))),
    }
}

/// Tiered closest-seller search.
///
/// 1. Validate the buyer position.
/// 2. Query candidate sellers (optionally filtered by offered product name).
/// 3. Partition by the distance threshold and sort each tier.
/// 4. Answer from the in-range tier, the beyond-range tier, or report no
///    match; the two fallback tiers carry an external search suggestion.
#[tracing::instrument(skip(pool, headers, payload))]
pub async fn find_closest_sellers(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Json(payload): Json<FindClosestSellersRequest>,
) -> ApiResult<Json<FindClosestSellersResponse>> {
    authenticate(&headers)?;

    let buyer_lat = validate_coordinate(payload.buyer_lat, "buyerLat", -90.0, 90.0)?;
    let buyer_lon = validate_coordinate(payload.buyer_lon, "buyerLon", -180.0, 180.0)?;

    let product_name = payload
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let max_distance_km = effective_max_distance(payload.max_distance_km);

    let candidates = read_ops::find_sellers_offering(&pool, product_name).await?;
    let ranked = rank_sellers(buyer_lat, buyer_lon, candidates, max_distance_km);

    let suggestion = product_name.map(external_search_url);

    let response = match ranked {
        RankedSellers::WithinRange { all } => {
            info!(matches = all.len(), "Sellers found within range");

            let note = match product_name {
                Some(name) => format!(
                    "There are {} sellers offering \"{}\" within {} km.",
                    all.len(),
                    name,
                    max_distance_km
                ),
                None => format!("There are {} sellers within {} km.", all.len(), max_distance_km),
            };

            FindClosestSellersResponse {
                message: "Closest seller found within range.".to_string(),
                closest_seller: all.first().map(ClosestSellerDto::from_ranked),
                all_sellers_within_range: Some(
                    all.iter().map(SellerDistanceDto::from_ranked).collect(),
                ),
                all_sellers_beyond_range: None,
                note: Some(note),
                blinkit_suggestion: None,
            }
        }
        RankedSellers::BeyondRange { all } => {
            info!(matches = all.len(), "No sellers within range; answering from beyond-range tier");

            FindClosestSellersResponse {
                message: format!(
                    "No sellers found within {} km. Closest seller found beyond range.",
                    max_distance_km
                ),
                closest_seller: all.first().map(ClosestSellerDto::from_ranked),
                all_sellers_within_range: None,
                all_sellers_beyond_range: Some(
                    all.iter().map(SellerDistanceDto::from_ranked).collect(),
                ),
                note: None,
                blinkit_suggestion: suggestion,
            }
        }
        RankedSellers::NoMatch => {
            info!("No candidate sellers found");

            let message = match product_name {
                Some(name) => format!("No sellers found offering \"{}\" in our database.", name),
                None => "No sellers found in our database.".to_string(),
            };

            FindClosestSellersResponse {
                message,
                closest_seller: None,
                all_sellers_within_range: None,
                all_sellers_beyond_range: None,
                note: None,
                blinkit_suggestion: suggestion,
            }
        }
    };

    Ok(Json(response))
}
