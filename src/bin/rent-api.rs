//! HTTP front end for the rent estimator.

use rust_rent_estimator::circuit_breaker::create_external_api_circuit_breaker;
use rust_rent_estimator::config::Config;
use rust_rent_estimator::diagnostics::TracingDiagnostics;
use rust_rent_estimator::external_api::ExternalPredictionClient;
use rust_rent_estimator::handlers::{self, AppState};
use rust_rent_estimator::model::{load_trained_model, PriceModel};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the HTTP front end.
///
/// Initializes logging, loads configuration and the trained model (once, for
/// every request), sets up the external API client and serves the router.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rust_rent_estimator=debug,rent_api=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let model: Option<Arc<dyn PriceModel>> =
        match load_trained_model(&config.model_path, &TracingDiagnostics) {
            Some(model) => Some(Arc::new(model) as Arc<dyn PriceModel>),
            None => {
                tracing::warn!("Serving with the fallback formula only");
                None
            }
        };

    let external_client = match &config.external_api_url {
        Some(url) => match ExternalPredictionClient::new(url.clone(), config.external_api_timeout) {
            Ok(client) => {
                tracing::info!("✓ External prediction client initialized: {}", url);
                Some(client)
            }
            Err(e) => {
                tracing::error!("Failed to initialize external prediction client: {}", e);
                None
            }
        },
        None => None,
    };

    let app_state = Arc::new(AppState {
        model,
        external_client,
        external_breaker: create_external_api_circuit_breaker(),
    });

    let app = handlers::router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
