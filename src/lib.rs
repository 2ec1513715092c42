//! CryptoGuard Library
//!
//! Demonstration risk-scoring pipeline for Ethereum addresses:
//! - Deterministic feature synthesis (41 declared features per address)
//! - Linear classifier with a never-fail fallback chain
//! - Independent heuristic risk engine over a known-risk registry
//! - REST API with caching, rate limiting, and telemetry
//!
//! Every score is synthetic and reproducible; no chain data is fetched.

pub mod api;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::api::{create_router, AppState};
pub use crate::core::features::{seed_for, FeatureSynthesizer, Regime};
pub use crate::core::heuristics::{HeuristicEngine, HeuristicReport, KNOWN_RISK_REGISTRY};
pub use crate::core::model::{LinearClassifier, LoadResult, ModelBundle, Prediction};
pub use crate::core::scoring::RiskScorer;
pub use crate::models::config::{ModelConfig, ServerConfig};
pub use crate::models::errors::{AppError, AppResult, ErrorCode};
pub use crate::models::types::{
    DisplayBand, FeatureVector, HeuristicBand, ModelMetadata, RiskAssessment, RiskLevel,
};
pub use crate::utils::cache::{CacheStats, ScoreCache};
pub use crate::utils::telemetry::{DetectionKind, TelemetryCollector, TelemetryEvent, TelemetryStats};
