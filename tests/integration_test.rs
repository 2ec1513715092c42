//! Integration tests for CryptoGuard

use std::sync::Arc;

use axum::extract::{Json, State};
use cryptoguard::api::{
    handlers, AppState, BatchScoreRequest, HeuristicAnalysisRequest, ScoreRequest,
};
use cryptoguard::{
    DisplayBand, FeatureSynthesizer, HeuristicBand, HeuristicEngine, ModelBundle, ModelConfig,
    Regime, RiskLevel, RiskScorer, TelemetryCollector,
};

const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const HIGH_REGIME_ADDRESS: &str = "0x0000000000000000000000000000000000000004";
const PHISHING_WALLET: &str = "0x8576acc5c05d6ce88f4e49bf65bdf0c62f91353c";

fn scorer_with_artifacts() -> RiskScorer {
    // Repo-shipped artifacts; cargo test runs from the crate root
    let config = ModelConfig::with_dir("models");
    RiskScorer::new(Arc::new(ModelBundle::load(&config)))
}

fn scorer_with_stub() -> RiskScorer {
    let config = ModelConfig::with_dir("/nonexistent/model/dir");
    RiskScorer::new(Arc::new(ModelBundle::load(&config)))
}

// ============================================
// Feature Synthesis
// ============================================

#[test]
fn test_feature_synthesis_is_reproducible() {
    let synth = FeatureSynthesizer::new();
    let first = synth.synthesize(VITALIK);
    let second = synth.synthesize(VITALIK);

    assert_eq!(first.len(), 41);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a, b, "feature {} differed between runs", a.0);
    }
}

#[test]
fn test_feature_synthesis_ignores_address_case() {
    let synth = FeatureSynthesizer::new();
    let mixed = synth.synthesize(VITALIK);
    let lower = synth.synthesize(&VITALIK.to_lowercase());

    for (a, b) in mixed.iter().zip(lower.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_regime_split() {
    let synth = FeatureSynthesizer::new();
    assert_eq!(synth.regime(HIGH_REGIME_ADDRESS), Regime::HighRisk);
    assert_eq!(synth.regime(VITALIK), Regime::Normal);

    // High-regime addresses show the bursty profile
    let features = synth.synthesize(HIGH_REGIME_ADDRESS);
    let sent = features.get("Sent_tnx").expect("Sent_tnx present");
    assert!(sent > 100.0, "expected bursty Sent_tnx, got {}", sent);
}

// ============================================
// Model Path
// ============================================

#[test]
fn test_shipped_artifacts_load_for_real() {
    let scorer = scorer_with_artifacts();
    assert!(!scorer.is_fallback(), "shipped artifacts should load");

    let info = scorer.model_info();
    assert_eq!(info.version, "model_v2025");
    assert_eq!(info.feature_count, 41);
    assert!(!info.is_fallback);
}

#[test]
fn test_end_to_end_normal_address() {
    let scorer = scorer_with_artifacts();
    let result = scorer.score(VITALIK);

    assert!(result.success);
    assert!(!result.is_fallback_model);
    assert!(
        result.risk_score < 55.0,
        "normal-regime address scored {}",
        result.risk_score
    );
    assert!(result.confidence >= 0.10 && result.confidence <= 0.95);
    assert!(!result.risk_factors.is_empty());

    // Reproducible across calls
    let again = scorer.score(VITALIK);
    assert_eq!(result.risk_score, again.risk_score);
    assert_eq!(result.risk_factors, again.risk_factors);
}

#[test]
fn test_high_regime_address_scores_higher() {
    let scorer = scorer_with_artifacts();
    let high = scorer.score(HIGH_REGIME_ADDRESS);
    let normal = scorer.score(VITALIK);

    assert!(high.success);
    assert!(
        high.risk_score > normal.risk_score,
        "high regime {} should exceed normal {}",
        high.risk_score,
        normal.risk_score
    );
    assert!(high.risk_score > 55.0);
}

#[test]
fn test_invalid_address_gets_maximum_risk() {
    let scorer = scorer_with_artifacts();
    let result = scorer.score("not-an-address");

    assert!(result.success);
    assert_eq!(result.risk_score, 100.0);
    assert_eq!(result.risk_level, "high");
    assert_eq!(result.confidence, 0.95);
    assert_eq!(result.risk_factors, vec!["Invalid Ethereum address"]);
}

#[test]
fn test_missing_artifacts_never_panic() {
    let scorer = scorer_with_stub();
    let result = scorer.score(VITALIK);

    assert!(result.success);
    assert!(result.is_fallback_model);
    assert!(result.risk_score >= 0.0 && result.risk_score <= 100.0);
}

#[test]
fn test_batch_truncates_to_ten_and_keeps_order() {
    let scorer = scorer_with_artifacts();
    let addresses: Vec<String> = (0..15u32).map(|i| format!("0x{:040x}", i)).collect();

    let results = scorer.score_batch(&addresses);
    assert_eq!(results.len(), 10);
    for (result, address) in results.iter().zip(addresses.iter()) {
        assert_eq!(result.address.as_deref(), Some(address.as_str()));
    }
}

// ============================================
// Banding Schemes
// ============================================

#[test]
fn test_five_band_model_levels() {
    assert_eq!(RiskLevel::from_score(85.0).as_str(), "high");
    assert_eq!(RiskLevel::from_score(80.0).as_str(), "high");
    assert_eq!(RiskLevel::from_score(79.9).as_str(), "medium-high");
    assert_eq!(RiskLevel::from_score(60.0).as_str(), "medium-high");
    assert_eq!(RiskLevel::from_score(40.0).as_str(), "medium");
    assert_eq!(RiskLevel::from_score(20.0).as_str(), "low");
    assert_eq!(RiskLevel::from_score(19.9).as_str(), "minimal");
}

#[test]
fn test_heuristic_and_display_bands_use_their_own_thresholds() {
    // 52 is medium for the heuristic engine but low for the dashboard
    assert_eq!(HeuristicBand::from_score(52.0), HeuristicBand::Medium);
    assert_eq!(DisplayBand::from_score(52.0), DisplayBand::Low);

    // 56 flips the dashboard band but not the heuristic one
    assert_eq!(HeuristicBand::from_score(56.0), HeuristicBand::Medium);
    assert_eq!(DisplayBand::from_score(56.0), DisplayBand::Medium);
}

// ============================================
// Heuristic Engine
// ============================================

#[test]
fn test_known_phishing_wallet_dominates_heuristics() {
    let engine = HeuristicEngine::new();
    let report = engine.analyze(PHISHING_WALLET, None);

    assert!(report.assessment.risk_score >= 70.0);
    assert!(report
        .assessment
        .risk_factors
        .iter()
        .any(|f| f == "Known phishing wallet"));
    assert!(!report.assessment.recommended_actions.is_empty());
}

#[test]
fn test_heuristic_engine_is_deterministic() {
    let engine = HeuristicEngine::new();
    let first = engine.analyze(VITALIK, None);
    let second = engine.analyze(VITALIK, None);

    assert_eq!(first.assessment.risk_score, second.assessment.risk_score);
    assert_eq!(first.assessment.risk_factors, second.assessment.risk_factors);
}

#[test]
fn test_heuristic_weights_sum_below_one() {
    let engine = HeuristicEngine::new();
    let weights = engine.weights();

    // reputation_score is declared but no analyzer applies it
    assert!((weights.applied_total() - 0.90).abs() < 1e-9);
    assert_eq!(weights.reputation_score, 0.10);
}

// ============================================
// API Handlers
// ============================================

fn test_state() -> Arc<AppState> {
    let scorer = Arc::new(scorer_with_artifacts());
    let telemetry = Arc::new(TelemetryCollector::new());
    Arc::new(AppState::new(scorer, telemetry))
}

#[tokio::test]
async fn test_health_endpoint_reports_model() {
    let state = test_state();
    let response = handlers::health_check(State(state)).await;

    let body = response.0;
    assert!(body.success);
    let data = body.data.expect("health data");
    assert_eq!(data.status, "healthy");
    assert_eq!(data.model_version, "model_v2025");
    assert!(!data.fallback_model_active);
}

#[tokio::test]
async fn test_score_endpoint_rejects_empty_address() {
    let state = test_state();
    let result = handlers::score_address(
        State(state),
        Json(ScoreRequest {
            address: "  ".to_string(),
        }),
    )
    .await;

    let (status, _) = result.err().expect("empty address should be rejected");
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_score_endpoint_serves_cached_result() {
    let state = test_state();

    let first = handlers::score_address(
        State(state.clone()),
        Json(ScoreRequest {
            address: VITALIK.to_string(),
        }),
    )
    .await
    .expect("first call succeeds");
    assert!(!first.0.data.expect("score data").cached);

    let second = handlers::score_address(
        State(state),
        Json(ScoreRequest {
            address: VITALIK.to_string(),
        }),
    )
    .await
    .expect("second call succeeds");
    assert!(second.0.data.expect("score data").cached);
}

#[tokio::test]
async fn test_batch_endpoint_rejects_empty_list() {
    let state = test_state();
    let result = handlers::batch_score(
        State(state),
        Json(BatchScoreRequest { addresses: vec![] }),
    )
    .await;

    let (status, _) = result.err().expect("empty batch should be rejected");
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_endpoint_truncates_silently() {
    let state = test_state();
    let addresses: Vec<String> = (0..15u32).map(|i| format!("0x{:040x}", i)).collect();

    let response = handlers::batch_score(
        State(state),
        Json(BatchScoreRequest { addresses }),
    )
    .await
    .expect("batch succeeds");

    let data = response.0.data.expect("batch data");
    assert_eq!(data.total_requested, 15);
    assert_eq!(data.total_processed, 10);
    assert_eq!(data.results.len(), 10);
}

#[tokio::test]
async fn test_heuristic_endpoint_returns_breakdown() {
    let state = test_state();
    let response = handlers::analyze_heuristic(
        State(state),
        Json(HeuristicAnalysisRequest {
            address: PHISHING_WALLET.to_string(),
            transaction_context: Some(serde_json::json!({"value_eth": 1.0})),
        }),
    )
    .await
    .expect("analysis succeeds");

    let report = response.0.data.expect("heuristic report");
    assert!(report.assessment.risk_score >= 70.0);
    assert!(report.detailed_analysis.get("transactions").is_some());
    assert_eq!(report.detailed_analysis["context"]["value_eth"], 1.0);
}

#[tokio::test]
async fn test_stats_endpoint_counts_scorings() {
    let state = test_state();

    handlers::score_address(
        State(state.clone()),
        Json(ScoreRequest {
            address: VITALIK.to_string(),
        }),
    )
    .await
    .expect("score succeeds");

    let response = handlers::get_stats(State(state)).await;
    let data = response.0.data.expect("stats data");
    assert_eq!(data.total_scored, 1);
    assert_eq!(data.api_version, env!("CARGO_PKG_VERSION"));
}
