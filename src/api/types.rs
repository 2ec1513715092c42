//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::types::{DisplayBand, ModelMetadata, RiskAssessment};
use crate::utils::cache::CacheStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: "Invalid or missing API key".to_string(),
            details: None,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: "RATE_LIMITED".to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

// ============================================
// Address Scoring
// ============================================

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreData {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    /// Dashboard display band (75/55/30 thresholds), with its color
    pub display_level: String,
    pub display_color: String,
    pub cached: bool,
}

impl ScoreData {
    pub fn new(assessment: RiskAssessment, cached: bool) -> Self {
        let band = DisplayBand::from_score(assessment.risk_score);
        Self {
            assessment,
            display_level: band.as_str().to_string(),
            display_color: band.color_code().to_string(),
            cached,
        }
    }
}

// ============================================
// Batch Scoring
// ============================================

#[derive(Debug, Deserialize)]
pub struct BatchScoreRequest {
    pub addresses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchScoreData {
    pub total_requested: usize,
    pub total_processed: usize,
    pub total_high_risk: usize,
    pub results: Vec<ScoreData>,
    pub processing_time_ms: f64,
}

// ============================================
// Heuristic Analysis
// ============================================

#[derive(Debug, Deserialize)]
pub struct HeuristicAnalysisRequest {
    pub address: String,
    /// Optional transaction context echoed into the breakdown
    #[serde(default)]
    pub transaction_context: Option<serde_json::Value>,
}

// ============================================
// Model Info
// ============================================

#[derive(Debug, Serialize)]
pub struct ModelInfoData {
    #[serde(flatten)]
    pub metadata: ModelMetadata,
    pub feature_names: Vec<String>,
}

// ============================================
// Stats / Telemetry
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub total_scored: u64,
    pub total_detections: u64,
    pub high_risk_detected: u64,
    pub fallback_served: u64,
    pub avg_latency_ms: f64,
    pub cache: CacheStats,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub model_version: String,
    pub fallback_model_active: bool,
    pub uptime_seconds: u64,
}
