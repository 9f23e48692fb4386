use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_offer_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use discount_offers::config::{AppConfig, ConfiguredStore};
use discount_offers::error::AppError;
use discount_offers::offers::{OfferService, OfferStore};
use discount_offers::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let addr = config.server.socket_addr()?;
    info!(environment = ?config.environment, storage = ?config.storage, "opening offer store");

    match config.storage.open()? {
        ConfiguredStore::Sqlite(store) => serve(Arc::new(store), addr).await,
        ConfiguredStore::Memory(store) => serve(Arc::new(store), addr).await,
    }
}

async fn serve<S>(store: Arc<S>, addr: SocketAddr) -> Result<(), AppError>
where
    S: OfferStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let offer_service = Arc::new(OfferService::new(store));

    let app = with_offer_routes(offer_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(%addr, "discount offer service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
