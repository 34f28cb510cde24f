use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use sqlx::PgPool;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::authenticate;
use crate::db::{read_ops, write_ops};
use crate::media::ImageStore;
use crate::models::api::{
    AddProductRequest, EditProductRequest, MessageResponse, ProductDto, ProductResponse,
    SellerProductsResponse, SellerProductsSplit,
};

/// Add a product for a seller. An inline base64 image, when present, is
/// pushed to the image store first and the returned URL is persisted with the
/// product.
#[tracing::instrument(skip(pool, headers, payload), fields(seller_id = payload.seller_id, name = %payload.name))]
pub async fn add_product(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Json(payload): Json<AddProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    authenticate(&headers)?;

    if payload.name.trim().is_empty() || payload.category.trim().is_empty() || payload.unit.trim().is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }
    if payload.quantity < 0 {
        return Err(ApiError::Validation("Quantity cannot be negative".to_string()));
    }
    if payload.units_per_pack < 1 {
        return Err(ApiError::Validation(
            "unitsPerPack must be at least 1".to_string(),
        ));
    }

    // 404 before any write when the owning seller is absent.
    read_ops::load_seller(&pool, payload.seller_id).await?;

    let image_url = match &payload.image_base64 {
        Some(encoded) => {
            let bytes = general_purpose::STANDARD
                .decode(encoded)
                .map_err(|_| ApiError::Validation("Invalid base64 image payload".to_string()))?;
            let mime = payload.image_mime.as_deref().unwrap_or("image/jpeg");
            Some(ImageStore::from_env()?.upload(bytes, mime).await?)
        }
        None => None,
    };

    let product = write_ops::insert_product(
        &pool,
        payload.seller_id,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.category.trim(),
        payload.price,
        payload.unit.trim(),
        payload.quantity,
        payload.eco_friendly,
        payload.units_per_pack,
        image_url.as_deref(),
    )
    .await?;

    // Keep the seller's offered-name list in step for discovery.
    write_ops::add_seller_product_name(&pool, payload.seller_id, payload.name.trim()).await?;

    info!(product_id = product.id, "Product added");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product added successfully".to_string(),
            product: ProductDto::from_record(&product),
        }),
    ))
}

/// Partial product edit: only supplied fields change.
#[tracing::instrument(skip(pool, headers, payload), fields(product_id = product_id))]
pub async fn edit_product(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
    Json(payload): Json<EditProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    authenticate(&headers)?;

    let previous = read_ops::load_product(&pool, product_id).await?;

    let updated = write_ops::update_product(
        &pool,
        product_id,
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.price,
        payload.category.as_deref(),
    )
    .await?;

    // A rename must be reflected in the seller's offered-name list.
    if let Some(new_name) = payload.name.as_deref() {
        if new_name != previous.name {
            write_ops::remove_seller_product_name(&pool, previous.seller_id, &previous.name).await?;
            write_ops::add_seller_product_name(&pool, previous.seller_id, new_name).await?;
        }
    }

    info!(product_id = product_id, "Product updated");

    Ok(Json(ProductResponse {
        message: "Product updated successfully".to_string(),
        product: ProductDto::from_record(&updated),
    }))
}

/// Delete a product and drop its name from the seller's offered-name list.
#[tracing::instrument(skip(pool, headers), fields(product_id = product_id))]
pub async fn delete_product(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    authenticate(&headers)?;

    let product = read_ops::load_product(&pool, product_id).await?;

    write_ops::remove_seller_product_name(&pool, product.seller_id, &product.name).await?;
    write_ops::delete_product(&pool, product_id).await?;

    info!(product_id = product_id, "Product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

/// A seller's catalog, split into available and out-of-stock by quantity.
#[tracing::instrument(skip(pool), fields(seller_id = seller_id))]
pub async fn get_seller_products(
    State(pool): State<PgPool>,
    Path(seller_id): Path<i64>,
) -> ApiResult<Json<SellerProductsResponse>> {
    read_ops::load_seller(&pool, seller_id).await?;

    let products = read_ops::load_seller_products(&pool, seller_id).await?;

    let (available, out_of_stock): (Vec<_>, Vec<_>) =
        products.iter().partition(|product| product.quantity > 0);

    Ok(Json(SellerProductsResponse {
        message: "Products retrieved successfully".to_string(),
        products: SellerProductsSplit {
            available: available.iter().map(|p| ProductDto::from_record(p)).collect(),
            out_of_stock: out_of_stock.iter().map(|p| ProductDto::from_record(p)).collect(),
        },
    }))
}
