//! API Request Handlers

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::types::*;
use crate::core::heuristics::{HeuristicEngine, KNOWN_RISK_REGISTRY};
use crate::core::scoring::RiskScorer;
use crate::models::types::RiskAssessment;
use crate::utils::cache::ScoreCache;
use crate::utils::constants::{APP_VERSION, FEATURE_NAMES};
use crate::utils::telemetry::{DetectionKind, TelemetryCollector, TelemetryEvent};

/// Shared application state
pub struct AppState {
    pub scorer: Arc<RiskScorer>,
    pub heuristics: Arc<HeuristicEngine>,
    pub telemetry: Arc<TelemetryCollector>,
    pub cache: Arc<ScoreCache>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(scorer: Arc<RiskScorer>, telemetry: Arc<TelemetryCollector>) -> Self {
        let cache = Arc::new(ScoreCache::new());

        // Background task: cleanup expired cache entries every 60 seconds
        let cache_clone = cache.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                cache_clone.cleanup_expired();
            }
        });

        Self {
            scorer,
            heuristics: Arc::new(HeuristicEngine::new()),
            telemetry,
            cache,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let info = state.scorer.model_info();
    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        model_version: info.version,
        fallback_model_active: info.is_fallback,
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Model Info
// ============================================

pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ModelInfoData>> {
    let start = Instant::now();

    let data = ModelInfoData {
        metadata: state.scorer.model_info(),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Address Scoring
// ============================================

pub async fn score_address(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ApiResponse<ScoreData>>, (StatusCode, Json<ApiResponse<()>>)> {
    let start = Instant::now();

    if req.address.trim().is_empty() {
        return Err(bad_request("address cannot be empty", start));
    }

    // ============================================
    // CACHE-FIRST: Check cache before scoring
    // ============================================
    if let Some(cached) = state.cache.get(&req.address) {
        info!("⚡ Returning cached assessment for {}", req.address);
        return Ok(Json(ApiResponse::success(
            ScoreData::new(cached, true),
            start.elapsed().as_secs_f64() * 1000.0,
        )));
    }

    let assessment = state.scorer.score(&req.address);
    record_assessment(&state.telemetry, &assessment, start.elapsed().as_millis() as u64);

    // Only successful assessments are worth caching
    if assessment.success {
        state.cache.set(&req.address, assessment.clone());
    }

    Ok(Json(ApiResponse::success(
        ScoreData::new(assessment, false),
        start.elapsed().as_secs_f64() * 1000.0,
    )))
}

// ============================================
// Batch Scoring
// ============================================

pub async fn batch_score(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchScoreRequest>,
) -> Result<Json<ApiResponse<BatchScoreData>>, (StatusCode, Json<ApiResponse<()>>)> {
    let start = Instant::now();

    if req.addresses.is_empty() {
        return Err(bad_request("addresses array cannot be empty", start));
    }

    let assessments = state.scorer.score_batch(&req.addresses);

    let total_high_risk = assessments
        .iter()
        .filter(|a| a.success && a.risk_score >= 75.0)
        .count();

    for assessment in &assessments {
        let item_latency = assessment.processing_time_ms.unwrap_or(0.0) as u64;
        record_assessment(&state.telemetry, assessment, item_latency);
    }

    let data = BatchScoreData {
        total_requested: req.addresses.len(),
        total_processed: assessments.len(),
        total_high_risk,
        results: assessments
            .into_iter()
            .map(|a| ScoreData::new(a, false))
            .collect(),
        processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    Ok(Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    )))
}

// ============================================
// Heuristic Analysis
// ============================================

pub async fn analyze_heuristic(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HeuristicAnalysisRequest>,
) -> Result<Json<ApiResponse<crate::core::heuristics::HeuristicReport>>, (StatusCode, Json<ApiResponse<()>>)>
{
    let start = Instant::now();

    if req.address.trim().is_empty() {
        return Err(bad_request("address cannot be empty", start));
    }

    let report = state
        .heuristics
        .analyze(&req.address, req.transaction_context.as_ref());

    let latency = start.elapsed().as_millis() as u64;
    if KNOWN_RISK_REGISTRY.lookup(&req.address).is_some() {
        state.telemetry.record_detection(TelemetryEvent::new(
            DetectionKind::KnownRiskMatch,
            report.assessment.risk_score,
            latency,
            "registry hit".to_string(),
        ));
    } else if report.assessment.risk_score >= 75.0 {
        state.telemetry.record_detection(TelemetryEvent::new(
            DetectionKind::HeuristicHighRisk,
            report.assessment.risk_score,
            latency,
            "heuristic analysis".to_string(),
        ));
    } else {
        state.telemetry.record_scoring(latency);
    }

    Ok(Json(ApiResponse::success(
        report,
        start.elapsed().as_secs_f64() * 1000.0,
    )))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.telemetry.get_stats();
    let cache_stats = state.cache.stats();

    info!(
        "📊 Cache Stats: {} entries, {:.1}% hit rate ({} hits / {} misses)",
        cache_stats.entries, cache_stats.hit_rate, cache_stats.hits, cache_stats.misses
    );

    let data = StatsData {
        total_scored: stats.total_scored,
        total_detections: stats.total_detections,
        high_risk_detected: stats.high_risk_detected,
        fallback_served: stats.fallback_served,
        avg_latency_ms: stats.avg_latency_ms,
        cache: cache_stats,
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Helper Functions
// ============================================

fn bad_request(message: &str, start: Instant) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(
            ApiError::bad_request(message),
            start.elapsed().as_secs_f64() * 1000.0,
        )),
    )
}

/// Classify an assessment into the right telemetry bucket
fn record_assessment(telemetry: &TelemetryCollector, assessment: &RiskAssessment, latency_ms: u64) {
    if !assessment.success {
        telemetry.record_detection(TelemetryEvent::new(
            DetectionKind::InferenceFault,
            assessment.risk_score,
            latency_ms,
            "inference fault".to_string(),
        ));
    } else if assessment
        .risk_factors
        .iter()
        .any(|f| f == "Invalid Ethereum address")
    {
        telemetry.record_detection(TelemetryEvent::new(
            DetectionKind::InvalidAddress,
            assessment.risk_score,
            latency_ms,
            "invalid input".to_string(),
        ));
    } else if assessment.risk_score >= 75.0 {
        telemetry.record_detection(TelemetryEvent::new(
            DetectionKind::ModelHighRisk,
            assessment.risk_score,
            latency_ms,
            "model path".to_string(),
        ));
    } else if assessment.is_fallback_model {
        telemetry.record_detection(TelemetryEvent::new(
            DetectionKind::FallbackServed,
            assessment.risk_score,
            latency_ms,
            "stub classifier".to_string(),
        ));
    } else {
        telemetry.record_scoring(latency_ms);
    }
}
