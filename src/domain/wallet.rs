use crate::models::records::ProductRecord;

/// One credit point per 100 eco-friendly units purchased.
pub const ECO_UNITS_PER_POINT: i64 = 100;

/// Fixed redemption rate: one point is worth 10 currency units.
pub const CURRENCY_PER_POINT: i64 = 10;

/// Credit points earned by an order's line items, resolved against their
/// product rows.
///
/// Each eco-friendly line item contributes `quantity * units_per_pack`
/// countable units (a pack of 50 bags bought twice is 100 units). Points are
/// the floor of the unit total over [`ECO_UNITS_PER_POINT`]; the fractional
/// remainder is dropped and does not carry over to later orders.
pub fn eco_points_for_items<'a, I>(items: I) -> i64
where
    I: IntoIterator<Item = (i64, &'a ProductRecord)>,
{
    let mut total_units: i64 = 0;

    for (quantity, product) in items {
        if product.eco_friendly {
            total_units += quantity * product.units_per_pack;
        }
    }

    total_units / ECO_UNITS_PER_POINT
}

/// Discount amount for a redeemed point count.
pub fn discount_for_points(points: i64) -> i64 {
    points * CURRENCY_PER_POINT
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(eco_friendly: bool, units_per_pack: i64) -> ProductRecord {
        ProductRecord {
            id: 1,
            seller_id: 1,
            name: "Eco-Friendly Bags (Pack of 50)".to_string(),
            description: None,
            category: "Household".to_string(),
            price: dec!(99),
            unit: "packs".to_string(),
            quantity: 10,
            eco_friendly,
            units_per_pack,
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_two_packs_of_fifty_earn_one_point() {
        let bags = product(true, 50);
        assert_eq!(eco_points_for_items([(2, &bags)]), 1);
    }

    #[test]
    fn test_one_pack_of_fifty_earns_nothing() {
        let bags = product(true, 50);
        assert_eq!(eco_points_for_items([(1, &bags)]), 0);
    }

    #[test]
    fn test_non_eco_items_do_not_accrue() {
        let tomatoes = product(false, 1);
        let bags = product(true, 50);
        assert_eq!(eco_points_for_items([(500, &tomatoes), (2, &bags)]), 1);
    }

    #[test]
    fn test_units_accumulate_across_items() {
        let bags = product(true, 50);
        let plates = product(true, 25);
        // 1x50 + 2x25 = 100 units
        assert_eq!(eco_points_for_items([(1, &bags), (2, &plates)]), 1);
    }

    #[test]
    fn test_remainder_is_dropped() {
        let bags = product(true, 50);
        // 7 packs = 350 units -> 3 points, 50 units lost
        assert_eq!(eco_points_for_items([(7, &bags)]), 3);
    }

    #[test]
    fn test_empty_order_earns_nothing() {
        assert_eq!(eco_points_for_items([]), 0);
    }

    #[test]
    fn test_discount_rate() {
        assert_eq!(discount_for_points(0), 0);
        assert_eq!(discount_for_points(3), 30);
    }
}
