mod config;
mod controller;
mod handler;
mod view;

use common::config::DisplayConfig;
use config::ApiConfig;
use connectors::{
    coinapi::CoinApiConnector, fixture::FixtureConnector, CoinApiConfig, FixtureConfig,
    QuoteSource,
};
use controller::ViewController;
use std::net::SocketAddr;
use std::sync::Arc;
use store::{FileStorage, PreferenceStore, StoreConfig};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting pricechart API");

    let api_config = ApiConfig::from_env();
    let display = DisplayConfig::default();

    let quotes: Arc<dyn QuoteSource> = if api_config.test_mode {
        let fixture = FixtureConfig::from_env();
        info!("Test mode: serving price history from {}", fixture.path.display());
        Arc::new(FixtureConnector::new(&fixture))
    } else {
        let coinapi = CoinApiConfig::from_env()
            .map_err(|e| format!("Failed to load CoinAPI configuration: {}", e))?;
        Arc::new(CoinApiConnector::new(&coinapi)?)
    };

    let store_config = StoreConfig::from_env();
    info!("Persisting preferences in {}", store_config.path.display());
    let storage = Arc::new(FileStorage::new(&store_config.path));
    let preferences = Arc::new(PreferenceStore::new(storage, &store_config, display.clone()));

    let controller = Arc::new(ViewController::new(quotes, preferences, display));

    // Load the chart for the restored selection before accepting requests
    let initial = controller.init().await;
    info!("Initial chart load finished: {:?}", initial);

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let app = handler::routes(controller)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", api_config.host, api_config.port).parse()?;
    info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
