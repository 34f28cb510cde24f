use crate::domain::geo::haversine_km;
use crate::models::records::SellerRecord;

/// Radius used when the request omits a maximum distance or supplies a
/// non-positive one.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 35.0;

/// A candidate seller paired with its haversine distance from the buyer.
/// The distance keeps raw precision; rounding happens at the response layer.
#[derive(Debug, Clone)]
pub struct RankedSeller {
    pub seller: SellerRecord,
    pub distance_km: f64,
}

/// Outcome of the tiered closest-seller search.
#[derive(Debug)]
pub enum RankedSellers {
    /// At least one candidate within range: nearest first plus the full
    /// sorted in-range list.
    WithinRange { all: Vec<RankedSeller> },
    /// No candidate within range but some beyond it: nearest first plus the
    /// full sorted beyond-range list. Callers attach the external search
    /// fallback.
    BeyondRange { all: Vec<RankedSeller> },
    /// No candidate sellers at all.
    NoMatch,
}

impl RankedSellers {
    pub fn closest(&self) -> Option<&RankedSeller> {
        match self {
            Self::WithinRange { all } | Self::BeyondRange { all } => all.first(),
            Self::NoMatch => None,
        }
    }
}

/// Resolve an effective radius: `None` or anything <= 0 falls back to the
/// default.
pub fn effective_max_distance(requested: Option<f64>) -> f64 {
    match requested {
        Some(km) if km > 0.0 => km,
        _ => DEFAULT_MAX_DISTANCE_KM,
    }
}

/// Partition candidates by distance from the buyer, sort each partition
/// ascending, and pick the tier to answer from.
///
/// Sorting is stable: equidistant sellers keep their query order.
pub fn rank_sellers(
    buyer_lat: f64,
    buyer_lon: f64,
    sellers: Vec<SellerRecord>,
    max_distance_km: f64,
) -> RankedSellers {
    let mut within_range = Vec::new();
    let mut beyond_range = Vec::new();

    for seller in sellers {
        let distance_km = haversine_km(buyer_lat, buyer_lon, seller.latitude, seller.longitude);
        let ranked = RankedSeller {
            seller,
            distance_km,
        };
        if distance_km <= max_distance_km {
            within_range.push(ranked);
        } else {
            beyond_range.push(ranked);
        }
    }

    within_range.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    beyond_range.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    if !within_range.is_empty() {
        RankedSellers::WithinRange { all: within_range }
    } else if !beyond_range.is_empty() {
        RankedSellers::BeyondRange { all: beyond_range }
    } else {
        RankedSellers::NoMatch
    }
}

/// Case-insensitive substring match of a requested product name against a
/// seller's offered-name list. An empty request matches every seller. This is
/// the in-memory mirror of the candidate SQL filter, used by tests and by
/// callers that already hold seller rows.
pub fn offers_product(seller: &SellerRecord, product_name: &str) -> bool {
    if product_name.is_empty() {
        return true;
    }
    let needle = product_name.to_lowercase();
    seller
        .product_names
        .iter()
        .any(|name| name.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn seller_at(id: i64, latitude: f64, longitude: f64) -> SellerRecord {
        SellerRecord {
            id,
            name: format!("Stall {}", id),
            owner_name: "Owner".to_string(),
            phone: format!("98765000{:02}", id),
            email: None,
            address: None,
            longitude,
            latitude,
            product_names: vec!["Tomatoes".to_string(), "Eco-Friendly Bags".to_string()],
            fssai_number: format!("FSSAI{}", id),
            shop_photo: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // Buyer at the origin of a local grid; one degree of latitude is ~111 km,
    // so offsets below put sellers at roughly 5, 40 and 12 km.
    const BUYER_LAT: f64 = 28.0;
    const BUYER_LON: f64 = 77.0;

    fn sample_sellers() -> Vec<SellerRecord> {
        vec![
            seller_at(1, BUYER_LAT + 0.045, BUYER_LON), // ~5 km
            seller_at(2, BUYER_LAT + 0.36, BUYER_LON),  // ~40 km
            seller_at(3, BUYER_LAT + 0.108, BUYER_LON), // ~12 km
        ]
    }

    #[test]
    fn test_partition_and_sort_within_range() {
        let result = rank_sellers(BUYER_LAT, BUYER_LON, sample_sellers(), 35.0);
        match result {
            RankedSellers::WithinRange { all } => {
                assert_eq!(all.len(), 2);
                assert_eq!(all[0].seller.id, 1);
                assert_eq!(all[1].seller.id, 3);
                assert!((all[0].distance_km - 5.0).abs() < 0.5);
                assert!((all[1].distance_km - 12.0).abs() < 0.5);
            }
            other => panic!("expected WithinRange, got {:?}", other),
        }
    }

    #[test]
    fn test_beyond_range_tier_when_nothing_in_range() {
        let result = rank_sellers(BUYER_LAT, BUYER_LON, sample_sellers(), 2.0);
        match result {
            RankedSellers::BeyondRange { all } => {
                assert_eq!(all.len(), 3);
                assert_eq!(all[0].seller.id, 1);
                assert_eq!(all[1].seller.id, 3);
                assert_eq!(all[2].seller.id, 2);
            }
            other => panic!("expected BeyondRange, got {:?}", other),
        }
    }

    #[test]
    fn test_no_candidates() {
        let result = rank_sellers(BUYER_LAT, BUYER_LON, Vec::new(), 35.0);
        assert!(matches!(result, RankedSellers::NoMatch));
        assert!(result.closest().is_none());
    }

    #[test]
    fn test_closest_picks_head_of_active_tier() {
        let result = rank_sellers(BUYER_LAT, BUYER_LON, sample_sellers(), 35.0);
        assert_eq!(result.closest().unwrap().seller.id, 1);
    }

    #[test]
    fn test_equidistant_sellers_keep_query_order() {
        let sellers = vec![
            seller_at(7, BUYER_LAT + 0.045, BUYER_LON),
            seller_at(8, BUYER_LAT + 0.045, BUYER_LON),
        ];
        let result = rank_sellers(BUYER_LAT, BUYER_LON, sellers, 35.0);
        match result {
            RankedSellers::WithinRange { all } => {
                assert_eq!(all[0].seller.id, 7);
                assert_eq!(all[1].seller.id, 8);
            }
            other => panic!("expected WithinRange, got {:?}", other),
        }
    }

    #[test]
    fn test_effective_max_distance_defaults() {
        assert_eq!(effective_max_distance(None), DEFAULT_MAX_DISTANCE_KM);
        assert_eq!(effective_max_distance(Some(0.0)), DEFAULT_MAX_DISTANCE_KM);
        assert_eq!(effective_max_distance(Some(-3.0)), DEFAULT_MAX_DISTANCE_KM);
        assert_eq!(effective_max_distance(Some(12.0)), 12.0);
    }

    #[test]
    fn test_offers_product_case_insensitive_substring() {
        let seller = seller_at(1, BUYER_LAT, BUYER_LON);
        assert!(offers_product(&seller, "eco-friendly bags"));
        assert!(offers_product(&seller, "TOMATO"));
        assert!(offers_product(&seller, ""));
        assert!(!offers_product(&seller, "spinach"));
    }
}
