// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::confidence::ConfidenceThreshold;
use crate::application::monitor::{Monitor, MonitorRegistry};
use crate::application::poller::Poller;
use crate::application::reducers::body_assembly::{BODY_ASSEMBLY_MONITOR, BodyAssemblyReducer};
use crate::application::reducers::press_image::PressImageReducer;
use crate::application::reducers::press_vibration::PressVibrationReducer;
use crate::application::reducers::welding_image::WeldingImageReducer;
use crate::application::summary_service::SummaryService;
use crate::infrastructure::config::load_monitor_config;
use crate::infrastructure::http_source::{
    BODY_BATCH_PATH, HttpSnapshotSource, PRESS_IMAGE_PATH, PRESS_VIBRATION_PATH,
    WELDING_IMAGE_PATH,
};
use crate::infrastructure::summary_client::HttpSummaryRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("factory_monitor=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_monitor_config()?;
    let client = reqwest::Client::new();
    let timeout = config.request_timeout();
    let api_base = config.api_base.as_str();
    let body_confidence = ConfidenceThreshold::new(config.body_confidence)?;

    // One poller per data source (application layer)
    let press_image = Poller::new(
        "press-image",
        HttpSnapshotSource::new(client.clone(), api_base, PRESS_IMAGE_PATH),
        PressImageReducer::new(),
        timeout,
    );
    let press_vibration = Poller::new(
        "press-vibration",
        HttpSnapshotSource::new(client.clone(), api_base, PRESS_VIBRATION_PATH),
        PressVibrationReducer::new(config.history_capacity, config.demo_jitter),
        timeout,
    );
    let body_assembly = Poller::new(
        BODY_ASSEMBLY_MONITOR,
        HttpSnapshotSource::new(client.clone(), api_base, BODY_BATCH_PATH)
            .with_confidence(body_confidence.clone()),
        BodyAssemblyReducer::new(api_base, config.result_log_capacity),
        timeout,
    );
    let welding_image = Poller::new(
        "welding-image",
        HttpSnapshotSource::new(client.clone(), api_base, WELDING_IMAGE_PATH),
        WeldingImageReducer::new(api_base, config.result_log_capacity),
        timeout,
    );

    press_image.start(config.intervals.press_image());
    press_vibration.start(config.intervals.press_vibration());
    body_assembly.start(config.intervals.body_assembly());
    welding_image.start(config.intervals.welding_image());

    let monitors = MonitorRegistry::new(vec![
        Arc::new(press_image) as Arc<dyn Monitor>,
        Arc::new(press_vibration),
        Arc::new(body_assembly),
        Arc::new(welding_image),
    ]);

    let summary_service = SummaryService::new(Arc::new(HttpSummaryRepository::new(
        client,
        &config.summary_base,
    )));

    // Create application state
    let state = Arc::new(AppState {
        monitors: monitors.clone(),
        summary_service,
        body_confidence,
    });

    // Start server
    let router = build_router(state);
    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("Starting factory-monitor on {}, polling {}", addr, config.api_base);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down, stopping pollers");
            monitors.stop_all();
        })
        .await?;

    Ok(())
}
