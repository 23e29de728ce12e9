//! Travelcart service entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use http::header::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use travelcart::adapters::discount::{DiscountServiceConfig, RemoteDiscountValidator};
use travelcart::adapters::http::{booking_routes, BookingAppState};
use travelcart::adapters::orders::{OrderServiceConfig, RemoteOrderGateway};
use travelcart::application::SessionConfig;
use travelcart::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let mut discount_config = DiscountServiceConfig::new(&config.services.discount_base_url)
        .with_timeout(Duration::from_secs(config.services.discount_timeout_secs));
    if let Some(token) = &config.services.discount_api_token {
        discount_config = discount_config.with_token(token.clone());
    }
    let discount_validator = Arc::new(RemoteDiscountValidator::new(discount_config));

    let mut order_config = OrderServiceConfig::new(&config.services.order_base_url)
        .with_timeout(Duration::from_secs(config.services.order_timeout_secs));
    if let Some(token) = &config.services.order_api_token {
        order_config = order_config.with_token(token.clone());
    }
    let order_gateway = Arc::new(RemoteOrderGateway::new(order_config));

    let session_config = SessionConfig {
        debounce_window: Duration::from_millis(config.booking.debounce_ms),
        request_timeout: Duration::from_secs(config.services.discount_timeout_secs),
    };
    let state = BookingAppState::new(discount_validator, order_gateway, session_config);

    let app = booking_routes()
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "travelcart listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
