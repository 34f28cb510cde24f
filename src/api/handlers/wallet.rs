use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use sqlx::PgPool;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::authenticate;
use crate::db::{read_ops, write_ops};
use crate::domain::wallet::{discount_for_points, CURRENCY_PER_POINT};
use crate::models::api::{ApplyCreditPointsRequest, ApplyCreditPointsResponse, CreditWalletResponse};

/// Current wallet state for a buyer.
#[tracing::instrument(skip(pool, headers), fields(buyer_id = buyer_id))]
pub async fn get_credit_wallet(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(buyer_id): Path<i64>,
) -> ApiResult<Json<CreditWalletResponse>> {
    authenticate(&headers)?;

    let (wallet, eco_points) = read_ops::load_wallet(&pool, buyer_id).await?;

    Ok(Json(CreditWalletResponse {
        credit_wallet: wallet,
        eco_points,
        point_value: CURRENCY_PER_POINT,
    }))
}

/// Redeem credit points against a payment. Rejects non-positive requests and
/// anything exceeding the current balance; the wallet is untouched on
/// failure.
#[tracing::instrument(skip(pool, headers, payload), fields(buyer_id = buyer_id))]
pub async fn apply_credit_points(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(buyer_id): Path<i64>,
    Json(payload): Json<ApplyCreditPointsRequest>,
) -> ApiResult<Json<ApplyCreditPointsResponse>> {
    authenticate(&headers)?;

    let points_to_use = match payload.points_to_use {
        Some(points) if points > 0 => points,
        _ => {
            return Err(ApiError::Validation(
                "Valid number of points required".to_string(),
            ))
        }
    };

    let wallet = write_ops::redeem_wallet_points(&pool, buyer_id, points_to_use).await?;
    let discount_amount = discount_for_points(points_to_use);

    info!(
        buyer_id = buyer_id,
        points_used = points_to_use,
        discount_amount = discount_amount,
        "Credit points applied"
    );

    Ok(Json(ApplyCreditPointsResponse {
        message: "Credit points applied successfully".to_string(),
        credit_wallet: wallet,
        points_used: points_to_use,
        discount_amount,
    }))
}
