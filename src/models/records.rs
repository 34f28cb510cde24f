use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// buyers table. The credit wallet is embedded as three counter columns.
#[derive(Debug, Clone, FromRow)]
pub struct BuyerRecord {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<Value>,
    pub longitude: f64,
    pub latitude: f64,
    pub wallet_points: i64,
    pub wallet_total_earned: i64,
    pub wallet_total_used: i64,
    pub eco_points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BuyerRecord {
    pub fn wallet(&self) -> CreditWallet {
        CreditWallet {
            points: self.wallet_points,
            total_earned: self.wallet_total_earned,
            total_used: self.wallet_total_used,
        }
    }
}

/// Embedded per-buyer point balance. Invariant: points = total_earned -
/// total_used and points >= 0, enforced by the guarded wallet updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CreditWallet {
    pub points: i64,
    #[serde(rename = "totalEarned")]
    pub total_earned: i64,
    #[serde(rename = "totalUsed")]
    pub total_used: i64,
}

/// sellers table.
#[derive(Debug, Clone, FromRow)]
pub struct SellerRecord {
    pub id: i64,
    pub name: String,
    pub owner_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<Value>,
    pub longitude: f64,
    pub latitude: f64,
    pub product_names: Vec<String>,
    pub fssai_number: String,
    pub shop_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// products table. `eco_friendly` and `units_per_pack` are the authoritative
/// inputs to credit-point accrual.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRecord {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub unit: String,
    pub quantity: i64,
    pub eco_friendly: bool,
    pub units_per_pack: i64,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// orders table. Line items are stored as a jsonb array of
/// `{product_id, quantity, unit}` objects.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub items: Value,
    pub total_price: Decimal,
    pub shipping_address: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
