use chrono::Utc;
use localmart_api::{
    external_search_url, rank_sellers, RankedSellers, SellerRecord, DEFAULT_MAX_DISTANCE_KM,
};

// Buyer position for the scenarios below; latitude offsets of 0.045, 0.36
// and 0.108 degrees put sellers at roughly 5, 40 and 12 km.
const BUYER_LAT: f64 = 28.6;
const BUYER_LON: f64 = 77.2;

fn seller(id: i64, name: &str, lat_offset: f64, products: Vec<&str>) -> SellerRecord {
    SellerRecord {
        id,
        name: name.to_string(),
        owner_name: "Owner".to_string(),
        phone: format!("99{:08}", id),
        email: None,
        address: None,
        longitude: BUYER_LON,
        latitude: BUYER_LAT + lat_offset,
        product_names: products.into_iter().map(str::to_string).collect(),
        fssai_number: format!("10012{:06}", id),
        shop_photo: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn scenario_sellers() -> Vec<SellerRecord> {
    vec![
        seller(1, "Fresh Corner", 0.045, vec!["Tomatoes", "Eco-Friendly Bags"]),
        seller(2, "Far Farm", 0.36, vec!["Tomatoes"]),
        seller(3, "Mid Mart", 0.108, vec!["Tomatoes", "Spinach"]),
    ]
}

#[test]
fn test_within_range_partition_is_sorted_and_beyond_is_separate() {
    let result = rank_sellers(BUYER_LAT, BUYER_LON, scenario_sellers(), 35.0);

    match result {
        RankedSellers::WithinRange { all } => {
            // Sellers at ~5 and ~12 km are in range, ~40 km is not.
            let names: Vec<&str> = all.iter().map(|r| r.seller.name.as_str()).collect();
            assert_eq!(names, vec!["Fresh Corner", "Mid Mart"]);
            assert!(all[0].distance_km < all[1].distance_km);
            assert!(all.iter().all(|r| r.distance_km <= 35.0));
        }
        other => panic!("expected WithinRange, got {:?}", other),
    }
}

#[test]
fn test_primary_result_is_nearest_in_range_seller() {
    let result = rank_sellers(BUYER_LAT, BUYER_LON, scenario_sellers(), 35.0);
    let closest = result.closest().expect("should have a closest seller");
    assert_eq!(closest.seller.name, "Fresh Corner");
    assert!((closest.distance_km - 5.0).abs() < 0.5);
}

#[test]
fn test_beyond_range_fallback_when_radius_too_small() {
    let result = rank_sellers(BUYER_LAT, BUYER_LON, scenario_sellers(), 1.0);

    match result {
        RankedSellers::BeyondRange { all } => {
            assert_eq!(all.len(), 3);
            assert_eq!(all[0].seller.name, "Fresh Corner");
            assert_eq!(all[2].seller.name, "Far Farm");
        }
        other => panic!("expected BeyondRange, got {:?}", other),
    }
}

#[test]
fn test_no_candidates_yields_not_found() {
    let result = rank_sellers(BUYER_LAT, BUYER_LON, Vec::new(), DEFAULT_MAX_DISTANCE_KM);
    assert!(matches!(result, RankedSellers::NoMatch));
}

#[test]
fn test_fallback_search_url_is_deterministic() {
    let first = external_search_url("eco friendly bags");
    let second = external_search_url("eco friendly bags");
    assert_eq!(first, second);
    assert_eq!(
        first,
        "https://www.blinkit.com/search?query=eco+friendly+bags"
    );
}
