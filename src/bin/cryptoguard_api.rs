//! CryptoGuard API Server
//!
//! REST API for Ethereum address risk scoring and heuristic analysis
//!
//! Usage:
//!   cargo run --bin cryptoguard_api
//!
//! Environment:
//!   CRYPTOGUARD_PORT      - Server port (default: 8080)
//!   CRYPTOGUARD_HOST      - Server host (default: 0.0.0.0)
//!   CRYPTOGUARD_MODEL_DIR - Model artifact directory (default: models)
//!   RUST_LOG              - Log level (default: info)

use cryptoguard::api::{create_router, spawn_rate_limiter_cleanup, AppState};
use cryptoguard::utils::constants::{APP_NAME, APP_VERSION};
use cryptoguard::{ModelBundle, ModelConfig, RiskScorer, ServerConfig, TelemetryCollector};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    print_banner();

    // Load model artifacts (never fails, degrades to stub)
    let model_config = ModelConfig::from_env();
    let bundle = Arc::new(ModelBundle::load(&model_config));
    if bundle.is_fallback() {
        warn!("🩹 Stub classifier active; scores are served with fallback flag set");
    }

    let scorer = Arc::new(RiskScorer::new(bundle));

    // Initialize telemetry
    let telemetry = Arc::new(TelemetryCollector::new());
    let telemetry_for_shutdown = telemetry.clone();

    // Create app state
    let state = Arc::new(AppState::new(scorer, telemetry));

    // Start background cleanup task for rate limiter
    spawn_rate_limiter_cleanup();
    info!("🧹 Background cleanup task started");

    // Create router
    let app = create_router(state);

    let server_config = ServerConfig::from_env();
    let addr: SocketAddr = server_config.bind_addr().parse()?;

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("📖 API Documentation: http://{}/v1/health", addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/score              - Score a single address");
    info!("  POST /v1/score/batch        - Score up to 10 addresses");
    info!("  POST /v1/analyze/heuristic  - Rule-based heuristic analysis");
    info!("  GET  /v1/model/info         - Model metadata");
    info!("  GET  /v1/stats              - Scoring statistics");
    info!("  GET  /v1/health             - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");
    info!("");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("");
    info!("🛑 Shutdown signal received, cleaning up...");

    // Export final telemetry
    info!("📊 Exporting final telemetry...");
    let stats = telemetry_for_shutdown.get_stats();
    info!("   Total scored: {}", stats.total_scored);
    info!("   Total detections: {}", stats.total_detections);
    info!("   High-risk verdicts: {}", stats.high_risk_detected);
    println!("{}", stats.session_summary());

    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   ✅ Stats exported to: {}", path.display()),
        Err(e) => warn!("   ⚠️ Failed to export stats: {}", e),
    }

    info!("👋 CryptoGuard API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════════════════╗
    ║                                                              ║
    ║        C R Y P T O G U A R D                                 ║
    ║                                                              ║
    ║        Address Risk Scoring API  v0.1.0                      ║
    ║        Deterministic demo pipeline - synthetic features      ║
    ║                                                              ║
    ╚══════════════════════════════════════════════════════════════╝
    "#
    );
}
