//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so production logs stay
//! searchable. Codes follow the pattern CATEGORY_SPECIFIC_ERROR:
//! - MODEL_xxx: model artifact loading / inference errors
//! - FEAT_xxx:  feature synthesis / frame errors
//! - ADDR_xxx:  address validation errors
//! - API_xxx:   API errors
//! - CFG_xxx:   configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Model Errors
    // ============================================
    /// Classifier artifact missing from the model directory
    ModelArtifactMissing,
    /// Classifier artifact present but unreadable
    ModelParseFailed,
    /// Metadata document missing or unreadable
    ModelMetadataMissing,
    /// Inference produced no usable probability
    ModelInferenceFailed,

    // ============================================
    // Feature Errors
    // ============================================
    /// Feature frame contained a non-finite value
    FeatureNonFinite,
    /// Feature frame could not be assembled in declared order
    FeatureFrameInvalid,

    // ============================================
    // Address Errors
    // ============================================
    /// Input is not a well-formed Ethereum address
    AddressInvalid,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Unauthorized (invalid API key)
    ApiUnauthorized,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic
    // ============================================
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelArtifactMissing => "MODEL_ARTIFACT_MISSING",
            Self::ModelParseFailed => "MODEL_PARSE_FAILED",
            Self::ModelMetadataMissing => "MODEL_METADATA_MISSING",
            Self::ModelInferenceFailed => "MODEL_INFERENCE_FAILED",

            Self::FeatureNonFinite => "FEAT_NON_FINITE",
            Self::FeatureFrameInvalid => "FEAT_FRAME_INVALID",

            Self::AddressInvalid => "ADDR_INVALID",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::AddressInvalid | Self::ConfigInvalidValue => 400,
            Self::ApiUnauthorized => 401,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }

    /// Whether the condition is recovered locally by a fallback rather
    /// than surfaced as a failed call
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ModelArtifactMissing
                | Self::ModelParseFailed
                | Self::ModelMetadataMissing
                | Self::ModelInferenceFailed
                | Self::FeatureNonFinite
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn model_missing(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelArtifactMissing, msg)
    }

    pub fn model_parse_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelParseFailed, msg)
    }

    pub fn inference_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelInferenceFailed, msg)
    }

    pub fn non_finite_feature(name: &str, value: f64) -> Self {
        Self::new(
            ErrorCode::FeatureNonFinite,
            format!("Feature '{}' has non-finite value {}", name, value),
        )
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AddressInvalid, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ModelParseFailed, "JSON parse error", err)
    }
}
