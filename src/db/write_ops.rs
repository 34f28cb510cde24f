use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::db::read_ops;
use crate::domain::orders::OrderStatus;
use crate::models::records::{CreditWallet, OrderRecord, ProductRecord};

/// Insert a buyer with a zeroed wallet. Returns the new id.
#[tracing::instrument(skip_all, fields(phone = %phone))]
pub async fn insert_buyer(
    pool: &PgPool,
    name: &str,
    phone: &str,
    email: Option<&str>,
    password_hash: &str,
    address: Option<Value>,
    longitude: f64,
    latitude: f64,
) -> Result<i64> {
    let buyer_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO buyers (name, phone, email, password, address, longitude, latitude)
        VALUES ($1, $2, LOWER($3), $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(phone)
    .bind(email)
    .bind(password_hash)
    .bind(address)
    .bind(longitude)
    .bind(latitude)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!(buyer_id = buyer_id, "Registered buyer");
    Ok(buyer_id)
}

/// Insert a seller. Returns the new id.
#[tracing::instrument(skip_all, fields(phone = %phone))]
#[allow(clippy::too_many_arguments)]
pub async fn insert_seller(
    pool: &PgPool,
    name: &str,
    owner_name: &str,
    phone: &str,
    email: Option<&str>,
    password_hash: &str,
    address: Option<Value>,
    longitude: f64,
    latitude: f64,
    product_names: &[String],
    fssai_number: &str,
) -> Result<i64> {
    let seller_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO sellers
            (name, owner_name, phone, email, password, address, longitude, latitude,
             product_names, fssai_number)
        VALUES ($1, $2, $3, LOWER($4), $5, $6, $7, $8, $9, $10)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(owner_name)
    .bind(phone)
    .bind(email)
    .bind(password_hash)
    .bind(address)
    .bind(longitude)
    .bind(latitude)
    .bind(product_names)
    .bind(fssai_number)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!(seller_id = seller_id, "Registered seller");
    Ok(seller_id)
}

/// Insert a product row.
#[tracing::instrument(skip_all, fields(seller_id = seller_id, name = %name))]
#[allow(clippy::too_many_arguments)]
pub async fn insert_product(
    pool: &PgPool,
    seller_id: i64,
    name: &str,
    description: Option<&str>,
    category: &str,
    price: Decimal,
    unit: &str,
    quantity: i64,
    eco_friendly: bool,
    units_per_pack: i64,
    image: Option<&str>,
) -> Result<ProductRecord> {
    let product = sqlx::query_as::<_, ProductRecord>(
        r#"
        INSERT INTO products
            (seller_id, name, description, category, price, unit, quantity,
             eco_friendly, units_per_pack, image)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(seller_id)
    .bind(name)
    .bind(description)
    .bind(category)
    .bind(price)
    .bind(unit)
    .bind(quantity)
    .bind(eco_friendly)
    .bind(units_per_pack)
    .bind(image)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!(product_id = product.id, "Inserted product");
    Ok(product)
}

/// Partial product update; absent fields keep their current values.
pub async fn update_product(
    pool: &PgPool,
    product_id: i64,
    name: Option<&str>,
    description: Option<&str>,
    price: Option<Decimal>,
    category: Option<&str>,
) -> Result<ProductRecord> {
    let product = sqlx::query_as::<_, ProductRecord>(
        r#"
        UPDATE products
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            category = COALESCE($5, category)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(category)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    product.ok_or_else(|| DatabaseError::NotFound(format!("Product not found: {}", product_id)))
}

/// Delete a product row.
pub async fn delete_product(pool: &PgPool, product_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(pool)
        .await
        .map_err(DatabaseError::QueryError)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!(
            "Product not found: {}",
            product_id
        )));
    }

    info!(product_id = product_id, "Deleted product");
    Ok(())
}

/// Add a product name to the seller's offered-name list used by discovery,
/// unless it is already present.
pub async fn add_seller_product_name(pool: &PgPool, seller_id: i64, name: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE sellers
        SET product_names = array_append(product_names, $2), updated_at = NOW()
        WHERE id = $1 AND NOT (product_names @> ARRAY[$2])
        "#,
    )
    .bind(seller_id)
    .bind(name)
    .execute(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(())
}

/// Remove a product name from the seller's offered-name list.
pub async fn remove_seller_product_name(pool: &PgPool, seller_id: i64, name: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE sellers
        SET product_names = array_remove(product_names, $2), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(seller_id)
    .bind(name)
    .execute(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(())
}

/// Persist a new order with status Pending.
#[tracing::instrument(skip_all, fields(buyer_id = buyer_id, seller_id = seller_id))]
pub async fn insert_order(
    pool: &PgPool,
    buyer_id: i64,
    seller_id: i64,
    items: Value,
    total_price: Decimal,
    shipping_address: &str,
) -> Result<OrderRecord> {
    let order = sqlx::query_as::<_, OrderRecord>(
        r#"
        INSERT INTO orders (buyer_id, seller_id, items, total_price, shipping_address, status)
        VALUES ($1, $2, $3, $4, $5, 'Pending')
        RETURNING *
        "#,
    )
    .bind(buyer_id)
    .bind(seller_id)
    .bind(items)
    .bind(total_price)
    .bind(shipping_address)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!(order_id = order.id, "Persisted order");
    Ok(order)
}

/// Write a new order status. Transition legality is checked by the caller
/// against the loaded order; the guard here only keeps a stale write from
/// clobbering a row whose status moved on in the meantime.
pub async fn update_order_status(
    pool: &PgPool,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<OrderRecord> {
    let order = sqlx::query_as::<_, OrderRecord>(
        r#"
        UPDATE orders
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING *
        "#,
    )
    .bind(order_id)
    .bind(from.as_str())
    .bind(to.as_str())
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    order.ok_or_else(|| {
        DatabaseError::InvalidData(format!(
            "Order {} is no longer in status {}",
            order_id,
            from.as_str()
        ))
    })
}

/// Atomically credit points to a buyer's wallet: points and total_earned move
/// together in one statement, so the earned/used invariant holds under
/// concurrent awards. The legacy eco_points counter moves in step.
#[tracing::instrument(skip(pool), fields(buyer_id = buyer_id, points = points))]
pub async fn award_wallet_points(
    pool: &PgPool,
    buyer_id: i64,
    points: i64,
) -> Result<CreditWallet> {
    debug!("Crediting wallet");

    let row: Option<(i64, i64, i64)> = sqlx::query_as(
        r#"
        UPDATE buyers
        SET wallet_points = wallet_points + $2,
            wallet_total_earned = wallet_total_earned + $2,
            eco_points = eco_points + $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING wallet_points, wallet_total_earned, wallet_total_used
        "#,
    )
    .bind(buyer_id)
    .bind(points)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    let (points_now, total_earned, total_used) =
        row.ok_or_else(|| DatabaseError::NotFound(format!("Buyer not found: {}", buyer_id)))?;

    info!(balance = points_now, "Awarded credit points");
    Ok(CreditWallet {
        points: points_now,
        total_earned,
        total_used,
    })
}

/// Atomically redeem points from a buyer's wallet. The balance guard lives in
/// the WHERE clause, so two racing redemptions cannot drive the balance
/// negative; the loser observes no matching row and gets InsufficientPoints.
#[tracing::instrument(skip(pool), fields(buyer_id = buyer_id, points_to_use = points_to_use))]
pub async fn redeem_wallet_points(
    pool: &PgPool,
    buyer_id: i64,
    points_to_use: i64,
) -> Result<CreditWallet> {
    let row: Option<(i64, i64, i64)> = sqlx::query_as(
        r#"
        UPDATE buyers
        SET wallet_points = wallet_points - $2,
            wallet_total_used = wallet_total_used + $2,
            updated_at = NOW()
        WHERE id = $1 AND wallet_points >= $2
        RETURNING wallet_points, wallet_total_earned, wallet_total_used
        "#,
    )
    .bind(buyer_id)
    .bind(points_to_use)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    match row {
        Some((points, total_earned, total_used)) => {
            info!(balance = points, "Redeemed credit points");
            Ok(CreditWallet {
                points,
                total_earned,
                total_used,
            })
        }
        None => {
            // Distinguish a missing buyer from a balance shortfall.
            let (wallet, _) = read_ops::load_wallet(pool, buyer_id).await?;
            Err(DatabaseError::InsufficientPoints {
                requested: points_to_use,
                available: wallet.points,
            })
        }
    }
}
