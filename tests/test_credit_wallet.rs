use chrono::Utc;
use localmart_api::{
    discount_for_points, eco_points_for_items, CreditWallet, ProductRecord, CURRENCY_PER_POINT,
};
use rust_decimal_macros::dec;

fn eco_bags_pack_of_50() -> ProductRecord {
    ProductRecord {
        id: 7,
        seller_id: 1,
        name: "Eco-Friendly Bags (Pack of 50)".to_string(),
        description: None,
        category: "Household".to_string(),
        price: dec!(120),
        unit: "packs".to_string(),
        quantity: 25,
        eco_friendly: true,
        units_per_pack: 50,
        image: None,
        created_at: Utc::now(),
    }
}

fn tomatoes() -> ProductRecord {
    ProductRecord {
        id: 1,
        seller_id: 1,
        name: "Tomatoes".to_string(),
        description: None,
        category: "Vegetables".to_string(),
        price: dec!(40),
        unit: "kg".to_string(),
        quantity: 100,
        eco_friendly: false,
        units_per_pack: 1,
        image: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_two_packs_earn_one_point_one_pack_earns_none() {
    let bags = eco_bags_pack_of_50();
    // 2 packs x 50 bags = 100 eco units -> 1 point
    assert_eq!(eco_points_for_items([(2, &bags)]), 1);
    // 1 pack x 50 bags = 50 eco units -> floor(0.5) = 0 points
    assert_eq!(eco_points_for_items([(1, &bags)]), 0);
}

#[test]
fn test_only_eco_friendly_items_count() {
    let bags = eco_bags_pack_of_50();
    let veg = tomatoes();
    // A kilogram mountain of tomatoes earns nothing on its own.
    assert_eq!(eco_points_for_items([(1000, &veg)]), 0);
    assert_eq!(eco_points_for_items([(1000, &veg), (2, &bags)]), 1);
}

#[test]
fn test_point_value_conversion() {
    assert_eq!(CURRENCY_PER_POINT, 10);
    assert_eq!(discount_for_points(5), 50);
}

#[test]
fn test_wallet_invariant_holds_over_arithmetic() {
    // The persisted counters move in lockstep; this mirrors the guarded SQL
    // updates at the model level.
    let mut wallet = CreditWallet {
        points: 0,
        total_earned: 0,
        total_used: 0,
    };

    for (earn, use_) in [(3, 0), (0, 2), (5, 0), (0, 6)] {
        wallet.points += earn;
        wallet.total_earned += earn;
        if use_ <= wallet.points {
            wallet.points -= use_;
            wallet.total_used += use_;
        }
        assert_eq!(wallet.points, wallet.total_earned - wallet.total_used);
        assert!(wallet.points >= 0);
    }

    assert_eq!(wallet.total_earned, 8);
    assert_eq!(wallet.total_used, 8);
    assert_eq!(wallet.points, 0);
}
