use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::handlers::{auth, catalog, discovery, map, orders, wallet};

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_target(false)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,tower=warn")),
        )
        .init();
}

pub async fn create_connection_pool() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    info!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await?;

    info!("Database connection pool created successfully");

    Ok(pool)
}

/// Wire up the full route table over a connection pool.
pub fn build_router(pool: PgPool) -> Router {
    Router::new()
        // Auth
        .route("/api/auth/buyer/register", post(auth::register_buyer))
        .route("/api/auth/buyer/login", post(auth::login_buyer))
        .route("/api/auth/seller/register", post(auth::register_seller))
        .route("/api/auth/seller/login", post(auth::login_seller))
        // Map utilities
        .route("/api/map/get-distance", post(map::get_distance))
        // Buyer: discovery, orders, wallet
        .route(
            "/api/buyer/find-closest-sellers",
            post(discovery::find_closest_sellers),
        )
        .route("/api/buyer/place-order", post(orders::place_order))
        .route("/api/buyer/cancel-order/{orderId}", put(orders::cancel_order))
        .route(
            "/api/buyer/credit-wallet/{buyerId}",
            get(wallet::get_credit_wallet),
        )
        .route(
            "/api/buyer/apply-credit-points/{buyerId}",
            post(wallet::apply_credit_points),
        )
        // Seller catalog
        .route("/api/seller/add-product", post(catalog::add_product))
        .route(
            "/api/seller/edit-product/{productId}",
            put(catalog::edit_product),
        )
        .route(
            "/api/seller/delete-product/{productId}",
            delete(catalog::delete_product),
        )
        .route(
            "/api/seller/seller-products/{sellerId}",
            get(catalog::get_seller_products),
        )
        .route(
            "/api/seller/update-order-status/{orderId}",
            put(orders::update_order_status),
        )
        // Health check endpoint
        .route("/health", get(health_check))
        .with_state(pool)
        .layer(TraceLayer::new_for_http())
}

pub async fn create_app() -> Result<Router, Box<dyn std::error::Error>> {
    let pool = create_connection_pool().await?;

    // Apply schema migrations at startup.
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(build_router(pool))
}

async fn health_check(State(pool): State<PgPool>) -> &'static str {
    match crate::db::connection::health_check(&pool).await {
        Ok(()) => "OK",
        Err(_) => "DEGRADED",
    }
}

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting localmart API server");

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        info!("Shutting down gracefully...");
    };

    let app = create_app().await?;

    let port = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
