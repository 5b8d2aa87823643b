use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryListingBackend, ListingState};
use crate::routes::listing_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use listing_hub::config::AppConfig;
use listing_hub::error::AppError;
use listing_hub::listings::{InMemoryCurrencyPreferences, InventorySnapshot, ListingAggregator};
use listing_hub::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let inventory = InventorySnapshot::from_dir(&config.listings.data_dir)?;
    info!(
        data_dir = %config.listings.data_dir.display(),
        properties = inventory.properties.len(),
        marketplace = inventory.marketplace.len(),
        unit_types = inventory.unit_types.len(),
        "inventory export loaded"
    );

    let backend = Arc::new(InMemoryListingBackend::new(inventory));
    let listing_state = ListingState {
        aggregator: Arc::new(ListingAggregator::from_backend(backend)),
        preferences: Arc::new(InMemoryCurrencyPreferences::new(
            config.listings.display_currency,
        )),
        settings: config.listings.clone(),
    };

    let app = listing_router(listing_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "listing hub ready");

    axum::serve(listener, app).await?;
    Ok(())
}
