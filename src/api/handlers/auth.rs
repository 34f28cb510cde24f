use axum::{extract::State, http::StatusCode, Json};
use sqlx::PgPool;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::{hash_password, issue_token, verify_password};
use crate::db::{read_ops, write_ops};
use crate::models::api::{AuthResponse, LoginRequest, RegisterBuyerRequest, RegisterSellerRequest, UserSummary};

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> ApiResult<()> {
    if phone.len() < 10 {
        return Err(ApiError::Validation(
            "Phone number must be at least 10 digits".to_string(),
        ));
    }
    Ok(())
}

fn validate_required(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Map a unique-constraint violation from registration to a Conflict; other
/// db failures pass through unchanged.
fn map_registration_error(err: crate::db::DatabaseError) -> ApiError {
    if err.is_unique_violation() {
        ApiError::Conflict("Phone number, email or FSSAI number already exists".to_string())
    } else {
        err.into()
    }
}

#[tracing::instrument(skip(pool, payload), fields(phone = %payload.phone))]
pub async fn register_buyer(
    State(pool): State<PgPool>,
    Json(payload): Json<RegisterBuyerRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validate_required(&payload.name, "name")?;
    validate_required(&payload.phone, "phone")?;
    validate_phone(&payload.phone)?;
    validate_password(&payload.password)?;

    if !payload.location.is_valid() {
        return Err(ApiError::Validation(
            "Location coordinates must be [longitude, latitude] within valid ranges".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let email = payload.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let address = payload
        .address
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;

    let buyer_id = write_ops::insert_buyer(
        &pool,
        payload.name.trim(),
        payload.phone.trim(),
        email,
        &password_hash,
        address,
        payload.location.longitude(),
        payload.location.latitude(),
    )
    .await
    .map_err(map_registration_error)?;

    let token = issue_token(buyer_id, "buyer")?;

    info!(buyer_id = buyer_id, "Buyer registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Buyer registered successfully".to_string(),
            token,
            role: "buyer".to_string(),
            user: UserSummary::from_buyer(buyer_id, payload.name.trim(), payload.phone.trim(), email),
        }),
    ))
}

#[tracing::instrument(skip(pool, payload), fields(phone = %payload.phone))]
pub async fn register_seller(
    State(pool): State<PgPool>,
    Json(payload): Json<RegisterSellerRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validate_required(&payload.name, "name")?;
    validate_required(&payload.owner_name, "ownerName")?;
    validate_required(&payload.phone, "phone")?;
    validate_required(&payload.fssai_number, "fssaiNumber")?;
    validate_phone(&payload.phone)?;
    validate_password(&payload.password)?;

    if !payload.location.is_valid() {
        return Err(ApiError::Validation(
            "Location coordinates must be [longitude, latitude] within valid ranges".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let email = payload.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let address = payload
        .address
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;

    let seller_id = write_ops::insert_seller(
        &pool,
        payload.name.trim(),
        payload.owner_name.trim(),
        payload.phone.trim(),
        email,
        &password_hash,
        address,
        payload.location.longitude(),
        payload.location.latitude(),
        &payload.products,
        payload.fssai_number.trim(),
    )
    .await
    .map_err(map_registration_error)?;

    let token = issue_token(seller_id, "seller")?;

    info!(seller_id = seller_id, "Seller registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Seller registered successfully".to_string(),
            token,
            role: "seller".to_string(),
            user: UserSummary {
                id: seller_id,
                name: payload.name.trim().to_string(),
                phone: payload.phone.trim().to_string(),
                email: email.map(str::to_string),
                owner_name: Some(payload.owner_name.trim().to_string()),
                products: Some(payload.products.clone()),
            },
        }),
    ))
}

#[tracing::instrument(skip(pool, payload), fields(phone = %payload.phone))]
pub async fn login_buyer(
    State(pool): State<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    validate_required(&payload.phone, "phone")?;
    validate_required(&payload.password, "password")?;

    let credentials = read_ops::load_buyer_credentials(&pool, payload.phone.trim()).await?;

    let Some((id, name, phone, email, password_hash)) = credentials else {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    if !verify_password(&payload.password, &password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(id, "buyer")?;

    info!(buyer_id = id, "Buyer logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        role: "buyer".to_string(),
        user: UserSummary::from_buyer(id, &name, &phone, email.as_deref()),
    }))
}

#[tracing::instrument(skip(pool, payload), fields(phone = %payload.phone))]
pub async fn login_seller(
    State(pool): State<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    validate_required(&payload.phone, "phone")?;
    validate_required(&payload.password, "password")?;

    let row = read_ops::load_seller_by_phone(&pool, payload.phone.trim()).await?;

    let Some((record, password_hash)) = row else {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    if !verify_password(&payload.password, &password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(record.id, "seller")?;

    info!(seller_id = record.id, "Seller logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        role: "seller".to_string(),
        user: UserSummary::from_seller(&record),
    }))
}
