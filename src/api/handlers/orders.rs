use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::auth::authenticate;
use crate::db::{read_ops, write_ops};
use crate::domain::orders::{EcoAward, OrderStatus};
use crate::domain::wallet::eco_points_for_items;
use crate::models::api::{
    OrderDto, OrderItemDto, OrderStatusResponse, PlaceOrderRequest, PlaceOrderResponse,
    UpdateOrderStatusRequest,
};

/// Place an order and, as a best-effort second step, credit eco points for
/// its eco-friendly contents. The order response never fails on a wallet
/// problem; the award outcome is reported alongside it.
#[tracing::instrument(skip(pool, headers, payload))]
pub async fn place_order(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Json(payload): Json<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<PlaceOrderResponse>)> {
    authenticate(&headers)?;

    // Validate required fields before touching the store.
    let (Some(products), Some(seller_id), Some(buyer_id), Some(total_amount), Some(shipping_address)) = (
        payload.products,
        payload.seller_id,
        payload.buyer_id,
        payload.total_amount,
        payload.shipping_address,
    ) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    if products.is_empty() {
        return Err(ApiError::Validation(
            "Order must contain at least one product".to_string(),
        ));
    }
    if products.iter().any(|item| item.quantity < 1) {
        return Err(ApiError::Validation(
            "Product quantities must be at least 1".to_string(),
        ));
    }
    if shipping_address.trim().is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    let items = serde_json::to_value(&products)?;
    let order = write_ops::insert_order(
        &pool,
        buyer_id,
        seller_id,
        items,
        total_amount,
        shipping_address.trim(),
    )
    .await?;

    // Secondary step: any failure is logged and absorbed, never propagated.
    let award = credit_eco_points(&pool, buyer_id, &products).await;
    if let EcoAward::Failed { reason } = &award {
        error!(order_id = order.id, reason = %reason, "Eco point crediting failed; order stands");
    }

    info!(
        order_id = order.id,
        points_awarded = award.points_awarded(),
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully".to_string(),
            order: OrderDto::from_record(&order),
            credit_wallet: award.wallet(),
            eco_friendly_points_awarded: award.points_awarded(),
        }),
    ))
}

/// Resolve the order's line items against their product rows and credit any
/// earned points. Returns a typed outcome rather than an error so the caller
/// can report it without unwinding the order.
async fn credit_eco_points(pool: &PgPool, buyer_id: i64, items: &[OrderItemDto]) -> EcoAward {
    let ids: Vec<i64> = items.iter().map(|item| item.product_id).collect();

    let products = match read_ops::load_products_by_ids(pool, &ids).await {
        Ok(products) => products,
        Err(e) => {
            return EcoAward::Failed {
                reason: format!("product lookup failed: {}", e),
            }
        }
    };

    let by_id: HashMap<i64, _> = products.iter().map(|p| (p.id, p)).collect();
    let resolved = items.iter().filter_map(|item| {
        by_id
            .get(&item.product_id)
            .map(|product| (item.quantity, *product))
    });

    let points = eco_points_for_items(resolved);
    if points == 0 {
        return EcoAward::NoEligibleItems;
    }

    match write_ops::award_wallet_points(pool, buyer_id, points).await {
        Ok(wallet) => EcoAward::Awarded { points, wallet },
        Err(e) => EcoAward::Failed {
            reason: format!("wallet award failed: {}", e),
        },
    }
}

/// Cancel an order. Allowed from Pending only.
#[tracing::instrument(skip(pool, headers), fields(order_id = order_id))]
pub async fn cancel_order(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
) -> ApiResult<Json<OrderStatusResponse>> {
    authenticate(&headers)?;

    let order = read_ops::load_order(&pool, order_id).await?;
    let status = OrderStatus::parse(&order.status)
        .ok_or_else(|| ApiError::Internal(format!("Unknown order status: {}", order.status)))?;

    if !status.can_transition(OrderStatus::Cancelled) {
        return Err(ApiError::InvalidTransition(
            "Only pending orders can be cancelled".to_string(),
        ));
    }

    let updated = write_ops::update_order_status(&pool, order_id, status, OrderStatus::Cancelled)
        .await
        .map_err(|e| match e {
            crate::db::DatabaseError::InvalidData(msg) => ApiError::InvalidTransition(msg),
            other => other.into(),
        })?;

    info!(order_id = order_id, "Order cancelled");

    Ok(Json(OrderStatusResponse {
        message: "Order cancelled successfully".to_string(),
        order: OrderDto::from_record(&updated),
    }))
}

/// Move an order along its lifecycle (seller side). The transition table is
/// the same one cancel-order consults.
#[tracing::instrument(skip(pool, headers, payload), fields(order_id = order_id))]
pub async fn update_order_status(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Json<OrderStatusResponse>> {
    authenticate(&headers)?;

    let order = read_ops::load_order(&pool, order_id).await?;
    let status = OrderStatus::parse(&order.status)
        .ok_or_else(|| ApiError::Internal(format!("Unknown order status: {}", order.status)))?;

    if !status.can_transition(payload.status) {
        return Err(ApiError::InvalidTransition(format!(
            "Cannot move order from {} to {}",
            status.as_str(),
            payload.status.as_str()
        )));
    }

    let updated = write_ops::update_order_status(&pool, order_id, status, payload.status)
        .await
        .map_err(|e| match e {
            crate::db::DatabaseError::InvalidData(msg) => ApiError::InvalidTransition(msg),
            other => other.into(),
        })?;

    info!(
        order_id = order_id,
        status = payload.status.as_str(),
        "Order status updated"
    );

    Ok(Json(OrderStatusResponse {
        message: "Order status updated successfully".to_string(),
        order: OrderDto::from_record(&updated),
    }))
}
