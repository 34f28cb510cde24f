use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::geo::round_km;
use crate::domain::orders::{OrderStatus, Unit};
use crate::domain::ranking::RankedSeller;
use crate::models::records::{CreditWallet, OrderRecord, ProductRecord, SellerRecord};

/// GeoJSON-style point as carried on the wire: coordinates are
/// `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDto {
    #[serde(rename = "type", default = "default_point_type")]
    pub point_type: String,
    pub coordinates: [f64; 2],
}

fn default_point_type() -> String {
    "Point".to_string()
}

impl LocationDto {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            point_type: default_point_type(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// WGS84 range check: latitude in [-90, 90], longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        let (lon, lat) = (self.longitude(), self.latitude());
        lon.is_finite() && lat.is_finite() && (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterBuyerRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password: String,
    pub address: Option<AddressDto>,
    pub location: LocationDto,
}

#[derive(Debug, Deserialize)]
pub struct RegisterSellerRequest {
    pub name: String,
    #[serde(rename = "ownerName")]
    pub owner_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub password: String,
    pub address: Option<AddressDto>,
    pub location: LocationDto,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(rename = "fssaiNumber")]
    pub fssai_number: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "ownerName", skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub role: String,
    pub user: UserSummary,
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Coordinates arrive as optional so that missing or non-numeric fields map
/// to a 400 instead of a body-rejection, per the endpoint contract.
#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub lat1: Option<f64>,
    pub lon1: Option<f64>,
    pub lat2: Option<f64>,
    pub lon2: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub distance: f64,
}

// ---------------------------------------------------------------------------
// Seller discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FindClosestSellersRequest {
    #[serde(rename = "buyerLat")]
    pub buyer_lat: Option<f64>,
    #[serde(rename = "buyerLon")]
    pub buyer_lon: Option<f64>,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
    #[serde(rename = "MAX_DISTANCE_KM")]
    pub max_distance_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ClosestSellerDto {
    pub name: String,
    pub location: LocationDto,
    pub products: Vec<String>,
    pub distance_km: f64,
}

#[derive(Debug, Serialize)]
pub struct SellerDistanceDto {
    pub name: String,
    pub distance_km: f64,
}

impl ClosestSellerDto {
    pub fn from_ranked(ranked: &RankedSeller) -> Self {
        Self {
            name: ranked.seller.name.clone(),
            location: LocationDto::new(ranked.seller.longitude, ranked.seller.latitude),
            products: ranked.seller.product_names.clone(),
            distance_km: round_km(ranked.distance_km),
        }
    }
}

impl SellerDistanceDto {
    pub fn from_ranked(ranked: &RankedSeller) -> Self {
        Self {
            name: ranked.seller.name.clone(),
            distance_km: round_km(ranked.distance_km),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FindClosestSellersResponse {
    pub message: String,
    #[serde(rename = "closestSeller", skip_serializing_if = "Option::is_none")]
    pub closest_seller: Option<ClosestSellerDto>,
    #[serde(
        rename = "allSellersWithinRange",
        skip_serializing_if = "Option::is_none"
    )]
    pub all_sellers_within_range: Option<Vec<SellerDistanceDto>>,
    #[serde(
        rename = "allSellersBeyondRange",
        skip_serializing_if = "Option::is_none"
    )]
    pub all_sellers_beyond_range: Option<Vec<SellerDistanceDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "blinkitSuggestion", skip_serializing_if = "Option::is_none")]
    pub blinkit_suggestion: Option<String>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDto {
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub quantity: i64,
    pub unit: Unit,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub products: Option<Vec<OrderItemDto>>,
    #[serde(rename = "sellerId")]
    pub seller_id: Option<i64>,
    #[serde(rename = "buyerId")]
    pub buyer_id: Option<i64>,
    #[serde(rename = "totalAmount")]
    pub total_amount: Option<Decimal>,
    #[serde(rename = "shippingAddress")]
    pub shipping_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderDto {
    pub id: i64,
    #[serde(rename = "buyerId")]
    pub buyer_id: i64,
    #[serde(rename = "sellerId")]
    pub seller_id: i64,
    pub products: Vec<OrderItemDto>,
    #[serde(rename = "totalPrice")]
    pub total_price: Decimal,
    #[serde(rename = "shippingAddress")]
    pub shipping_address: String,
    pub status: OrderStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl OrderDto {
    pub fn from_record(record: &OrderRecord) -> Self {
        let products: Vec<OrderItemDto> =
            serde_json::from_value(record.items.clone()).unwrap_or_default();
        Self {
            id: record.id,
            buyer_id: record.buyer_id,
            seller_id: record.seller_id,
            products,
            total_price: record.total_price,
            shipping_address: record.shipping_address.clone(),
            status: OrderStatus::parse(&record.status).unwrap_or(OrderStatus::Pending),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order: OrderDto,
    #[serde(rename = "creditWallet")]
    pub credit_wallet: Option<CreditWallet>,
    #[serde(rename = "ecoFriendlyPointsAwarded")]
    pub eco_friendly_points_awarded: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub message: String,
    pub order: OrderDto,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// ---------------------------------------------------------------------------
// Credit wallet
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CreditWalletResponse {
    #[serde(rename = "creditWallet")]
    pub credit_wallet: CreditWallet,
    #[serde(rename = "ecoPoints")]
    pub eco_points: i64,
    #[serde(rename = "pointValue")]
    pub point_value: i64,
}

#[derive(Debug, Deserialize)]
pub struct ApplyCreditPointsRequest {
    #[serde(rename = "pointsToUse")]
    pub points_to_use: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ApplyCreditPointsResponse {
    pub message: String,
    #[serde(rename = "creditWallet")]
    pub credit_wallet: CreditWallet,
    #[serde(rename = "pointsUsed")]
    pub points_used: i64,
    #[serde(rename = "discountAmount")]
    pub discount_amount: i64,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    #[serde(rename = "sellerId")]
    pub seller_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub unit: String,
    pub quantity: i64,
    #[serde(rename = "ecoFriendly", default)]
    pub eco_friendly: bool,
    #[serde(rename = "unitsPerPack", default = "default_units_per_pack")]
    pub units_per_pack: i64,
    /// Optional inline image payload, uploaded to the image store before the
    /// product row is written.
    #[serde(rename = "imageBase64")]
    pub image_base64: Option<String>,
    #[serde(rename = "imageMime")]
    pub image_mime: Option<String>,
}

fn default_units_per_pack() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct EditProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: i64,
    #[serde(rename = "sellerId")]
    pub seller_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub unit: String,
    pub quantity: i64,
    #[serde(rename = "ecoFriendly")]
    pub eco_friendly: bool,
    #[serde(rename = "unitsPerPack")]
    pub units_per_pack: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductDto {
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            id: record.id,
            seller_id: record.seller_id,
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            price: record.price,
            unit: record.unit.clone(),
            quantity: record.quantity,
            eco_friendly: record.eco_friendly,
            units_per_pack: record.units_per_pack,
            image: record.image.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: ProductDto,
}

#[derive(Debug, Serialize)]
pub struct SellerProductsSplit {
    pub available: Vec<ProductDto>,
    #[serde(rename = "outOfStock")]
    pub out_of_stock: Vec<ProductDto>,
}

#[derive(Debug, Serialize)]
pub struct SellerProductsResponse {
    pub message: String,
    pub products: SellerProductsSplit,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl UserSummary {
    pub fn from_buyer(id: i64, name: &str, phone: &str, email: Option<&str>) -> Self {
        Self {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.map(str::to_string),
            owner_name: None,
            products: None,
        }
    }

    pub fn from_seller(record: &SellerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            owner_name: Some(record.owner_name.clone()),
            products: Some(record.product_names.clone()),
        }
    }
}
