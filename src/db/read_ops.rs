use sqlx::PgPool;
use tracing::debug;

use crate::db::errors::{DatabaseError, Result};
use crate::models::records::{BuyerRecord, CreditWallet, OrderRecord, ProductRecord, SellerRecord};

const SELLER_COLUMNS: &str = "id, name, owner_name, phone, email, address, longitude, latitude, \
     product_names, fssai_number, shop_photo, created_at, updated_at";

const BUYER_COLUMNS: &str = "id, name, phone, email, address, longitude, latitude, \
     wallet_points, wallet_total_earned, wallet_total_used, eco_points, created_at, updated_at";

/// Load a buyer by id.
#[tracing::instrument(skip(pool), fields(buyer_id = buyer_id))]
pub async fn load_buyer(pool: &PgPool, buyer_id: i64) -> Result<BuyerRecord> {
    let buyer = sqlx::query_as::<_, BuyerRecord>(&format!(
        "SELECT {} FROM buyers WHERE id = $1",
        BUYER_COLUMNS
    ))
    .bind(buyer_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    buyer.ok_or_else(|| DatabaseError::NotFound(format!("Buyer not found: {}", buyer_id)))
}

/// Buyer login credentials: (id, name, phone, email, password hash).
pub async fn load_buyer_credentials(
    pool: &PgPool,
    phone: &str,
) -> Result<Option<(i64, String, String, Option<String>, String)>> {
    let row = sqlx::query_as(
        "SELECT id, name, phone, email, password FROM buyers WHERE phone = $1",
    )
    .bind(phone)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(row)
}

/// Load a seller by id.
#[tracing::instrument(skip(pool), fields(seller_id = seller_id))]
pub async fn load_seller(pool: &PgPool, seller_id: i64) -> Result<SellerRecord> {
    let seller = sqlx::query_as::<_, SellerRecord>(&format!(
        "SELECT {} FROM sellers WHERE id = $1",
        SELLER_COLUMNS
    ))
    .bind(seller_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    seller.ok_or_else(|| DatabaseError::NotFound(format!("Seller not found: {}", seller_id)))
}

/// Seller login credentials: (id, password hash) plus the full record for the
/// login response.
pub async fn load_seller_by_phone(pool: &PgPool, phone: &str) -> Result<Option<(SellerRecord, String)>> {
    let row = sqlx::query_as::<_, SellerRecord>(&format!(
        "SELECT {} FROM sellers WHERE phone = $1",
        SELLER_COLUMNS
    ))
    .bind(phone)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    let Some(record) = row else {
        return Ok(None);
    };

    let password: String = sqlx::query_scalar("SELECT password FROM sellers WHERE id = $1")
        .bind(record.id)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::QueryError)?;

    Ok(Some((record, password)))
}

/// Candidate sellers for the closest-seller search. With a product name the
/// offered-name list is filtered case-insensitively on a substring match;
/// without one every seller is a candidate. Ordered by id so distance ties
/// break deterministically on query order.
#[tracing::instrument(skip(pool), fields(product_name = product_name.unwrap_or("")))]
pub async fn find_sellers_offering(
    pool: &PgPool,
    product_name: Option<&str>,
) -> Result<Vec<SellerRecord>> {
    let sellers = match product_name {
        Some(name) if !name.is_empty() => {
            let pattern = format!("%{}%", name);
            sqlx::query_as::<_, SellerRecord>(&format!(
                r#"
                SELECT {}
                FROM sellers
                WHERE EXISTS (
                    SELECT 1 FROM unnest(product_names) AS pn WHERE pn ILIKE $1
                )
                ORDER BY id
                "#,
                SELLER_COLUMNS
            ))
            .bind(pattern)
            .fetch_all(pool)
            .await
        }
        _ => {
            sqlx::query_as::<_, SellerRecord>(&format!(
                "SELECT {} FROM sellers ORDER BY id",
                SELLER_COLUMNS
            ))
            .fetch_all(pool)
            .await
        }
    }
    .map_err(DatabaseError::QueryError)?;

    debug!("Found {} candidate sellers", sellers.len());
    Ok(sellers)
}

/// Load a product by id.
pub async fn load_product(pool: &PgPool, product_id: i64) -> Result<ProductRecord> {
    let product = sqlx::query_as::<_, ProductRecord>(
        "SELECT * FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    product.ok_or_else(|| DatabaseError::NotFound(format!("Product not found: {}", product_id)))
}

/// Load the product rows referenced by an order's line items. Missing ids are
/// simply absent from the result; the caller decides whether that matters.
pub async fn load_products_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<ProductRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let products = sqlx::query_as::<_, ProductRecord>(
        "SELECT * FROM products WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(products)
}

/// All products belonging to a seller, newest first.
#[tracing::instrument(skip(pool), fields(seller_id = seller_id))]
pub async fn load_seller_products(pool: &PgPool, seller_id: i64) -> Result<Vec<ProductRecord>> {
    let products = sqlx::query_as::<_, ProductRecord>(
        "SELECT * FROM products WHERE seller_id = $1 ORDER BY created_at DESC",
    )
    .bind(seller_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(products)
}

/// Load an order by id.
#[tracing::instrument(skip(pool), fields(order_id = order_id))]
pub async fn load_order(pool: &PgPool, order_id: i64) -> Result<OrderRecord> {
    let order = sqlx::query_as::<_, OrderRecord>(
        "SELECT * FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    order.ok_or_else(|| DatabaseError::NotFound(format!("Order not found: {}", order_id)))
}

/// Wallet projection for a buyer: the embedded counters plus the legacy
/// eco_points total.
pub async fn load_wallet(pool: &PgPool, buyer_id: i64) -> Result<(CreditWallet, i64)> {
    let row: Option<(i64, i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT wallet_points, wallet_total_earned, wallet_total_used, eco_points
        FROM buyers
        WHERE id = $1
        "#,
    )
    .bind(buyer_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    let (points, total_earned, total_used, eco_points) =
        row.ok_or_else(|| DatabaseError::NotFound(format!("Buyer not found: {}", buyer_id)))?;

    Ok((
        CreditWallet {
            points,
            total_earned,
            total_used,
        },
        eco_points,
    ))
}
