pub mod api;
pub mod auth;
pub mod db;
pub mod domain;
pub mod media;
pub mod models;

// Re-export commonly used types
pub use domain::geo::haversine_km;
pub use domain::orders::{EcoAward, OrderStatus, Unit};
pub use domain::ranking::{
    effective_max_distance, rank_sellers, RankedSeller, RankedSellers, DEFAULT_MAX_DISTANCE_KM,
};
pub use domain::suggestion::external_search_url;
pub use domain::wallet::{
    discount_for_points, eco_points_for_items, CURRENCY_PER_POINT, ECO_UNITS_PER_POINT,
};
pub use models::records::{BuyerRecord, CreditWallet, OrderRecord, ProductRecord, SellerRecord};

pub use db::{get_pool, init_pool, DatabaseError};
