use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use crate::api::error::ApiError;

/// Token lifetime, matching the issued `expiresIn: 7d` of the auth flow.
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub role: String,
    pub exp: i64,
}

fn jwt_secret() -> Result<String, ApiError> {
    env::var("JWT_SECRET")
        .map(|s| s.trim_matches('"').to_string())
        .map_err(|_| ApiError::Internal("JWT_SECRET environment variable not set".to_string()))
}

/// Issue a signed, time-limited credential for an identity id and role.
pub fn issue_token(id: i64, role: &str) -> Result<String, ApiError> {
    let claims = Claims {
        id,
        role: role.to_string(),
        exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret()?.as_ref()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
}

/// Validate a token and return its claims.
pub fn validate_token(token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret()?.as_ref()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        ApiError::Unauthorized(format!("Invalid token: {}", e))
    })?;

    Ok(token_data.claims)
}

/// Extract a JWT from an Authorization header. Expected format:
/// "Bearer <token>".
pub fn extract_bearer(auth_header: Option<&str>) -> Result<&str, ApiError> {
    let auth_value = auth_header
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_value.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format, expected 'Bearer <token>'".to_string(),
        )
    })
}

/// Authenticate a request from its headers. Protected handlers call this
/// before touching the store.
pub fn authenticate(headers: &HeaderMap) -> Result<Claims, ApiError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok());
    let token = extract_bearer(auth_header)?;
    validate_token(token)
}
