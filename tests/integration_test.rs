#[cfg(test)]
mod tests {
    use chrono::Utc;
    use localmart_api::db::{read_ops, write_ops, DatabaseError};
    use localmart_api::domain::orders::OrderStatus;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    async fn setup_test_pool() -> sqlx::PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| {
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests")
        });

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to create test pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn unique_phone() -> String {
        format!("9{:09}", Utc::now().timestamp_micros() % 1_000_000_000)
    }

    async fn insert_test_buyer(pool: &sqlx::PgPool) -> i64 {
        write_ops::insert_buyer(
            pool,
            "Test Buyer",
            &unique_phone(),
            None,
            "pbkdf2_sha256$1000$salt$hash",
            None,
            77.2,
            28.6,
        )
        .await
        .expect("insert buyer")
    }

    async fn insert_test_seller(pool: &sqlx::PgPool) -> i64 {
        let fssai = format!("1{:013}", Utc::now().timestamp_micros());
        write_ops::insert_seller(
            pool,
            "Test Stall",
            "Test Owner",
            &unique_phone(),
            None,
            "pbkdf2_sha256$1000$salt$hash",
            None,
            77.2,
            28.6,
            &["Tomatoes".to_string()],
            &fssai,
        )
        .await
        .expect("insert seller")
    }

    #[tokio::test]
    #[ignore] // Requires database connection
    async fn test_wallet_invariant_across_award_and_redeem() {
        let pool = setup_test_pool().await;
        let buyer_id = insert_test_buyer(&pool).await;

        let wallet = write_ops::award_wallet_points(&pool, buyer_id, 5)
            .await
            .unwrap();
        assert_eq!(wallet.points, 5);
        assert_eq!(wallet.total_earned, 5);
        assert_eq!(wallet.total_used, 0);

        let wallet = write_ops::redeem_wallet_points(&pool, buyer_id, 2)
            .await
            .unwrap();
        assert_eq!(wallet.points, 3);
        assert_eq!(wallet.total_earned, 5);
        assert_eq!(wallet.total_used, 2);
        assert_eq!(wallet.points, wallet.total_earned - wallet.total_used);
    }

    #[tokio::test]
    #[ignore] // Requires database connection
    async fn test_redeem_beyond_balance_fails_and_wallet_is_unchanged() {
        let pool = setup_test_pool().await;
        let buyer_id = insert_test_buyer(&pool).await;

        write_ops::award_wallet_points(&pool, buyer_id, 3)
            .await
            .unwrap();

        let err = write_ops::redeem_wallet_points(&pool, buyer_id, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::InsufficientPoints {
                requested: 10,
                available: 3
            }
        ));

        let (wallet, _) = read_ops::load_wallet(&pool, buyer_id).await.unwrap();
        assert_eq!(wallet.points, 3);
        assert_eq!(wallet.total_used, 0);
    }

    #[tokio::test]
    #[ignore] // Requires database connection
    async fn test_award_to_missing_buyer_is_not_found() {
        let pool = setup_test_pool().await;

        // This is the failure the order-placement path absorbs into a
        // zero-points response.
        let err = write_ops::award_wallet_points(&pool, -1, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    #[ignore] // Requires database connection
    async fn test_order_persists_even_when_buyer_reference_is_dangling() {
        let pool = setup_test_pool().await;
        let seller_id = insert_test_seller(&pool).await;

        // Weak relation: the order row lands even though no such buyer
        // exists; only the secondary eco-crediting step can notice.
        let order = write_ops::insert_order(
            &pool,
            -42,
            seller_id,
            json!([{"productId": 7, "quantity": 2, "unit": "packs"}]),
            dec!(240),
            "12 Market Road",
        )
        .await
        .unwrap();
        assert_eq!(order.status, "Pending");

        let err = write_ops::award_wallet_points(&pool, -42, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    #[ignore] // Requires database connection
    async fn test_order_cancel_transition_guard() {
        let pool = setup_test_pool().await;
        let buyer_id = insert_test_buyer(&pool).await;
        let seller_id = insert_test_seller(&pool).await;

        let order = write_ops::insert_order(
            &pool,
            buyer_id,
            seller_id,
            json!([{"productId": 1, "quantity": 2, "unit": "packs"}]),
            dec!(240),
            "12 Market Road",
        )
        .await
        .unwrap();
        assert_eq!(order.status, "Pending");

        let cancelled = write_ops::update_order_status(
            &pool,
            order.id,
            OrderStatus::Pending,
            OrderStatus::Cancelled,
        )
        .await
        .unwrap();
        assert_eq!(cancelled.status, "Cancelled");

        // A second transition out of Pending must fail: the row moved on.
        let err = write_ops::update_order_status(
            &pool,
            order.id,
            OrderStatus::Pending,
            OrderStatus::Processing,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidData(_)));

        let reloaded = read_ops::load_order(&pool, order.id).await.unwrap();
        assert_eq!(reloaded.status, "Cancelled");
    }
}
