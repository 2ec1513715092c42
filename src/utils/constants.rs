//! Constants Module - Single Source of Truth
//!
//! All constants, file names, and declared feature names used across the
//! application are defined here. No hardcoded values in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "CryptoGuard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// ENVIRONMENT VARIABLES
// ============================================

pub const ENV_MODEL_DIR: &str = "CRYPTOGUARD_MODEL_DIR";
pub const ENV_HOST: &str = "CRYPTOGUARD_HOST";
pub const ENV_PORT: &str = "CRYPTOGUARD_PORT";

pub const DEFAULT_MODEL_DIR: &str = "models";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// ============================================
// MODEL ARTIFACT LAYOUT
// ============================================

/// Version marker file inside the model directory
pub const MODEL_VERSION_FILE: &str = "model_version.txt";

/// Serialized classifier artifact
pub const CLASSIFIER_FILE: &str = "classifier.json";

/// Serialized feature-name list
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Version used when the marker file is absent
pub const DEFAULT_MODEL_VERSION: &str = "model_v2025";

/// Provenance string reported in model metadata
pub const DATASET_SOURCE: &str = "Ethereum Fraud Detection Dataset from Kaggle";

// ============================================
// SCORING CONSTANTS
// ============================================

/// Number of declared model features
pub const FEATURE_COUNT: usize = 41;

/// Batch scoring silently truncates past this many addresses
pub const MAX_BATCH_SIZE: usize = 10;

/// Share of addresses placed in the high-risk synthetic regime
pub const HIGH_RISK_REGIME_PERCENT: u32 = 15;

/// Confidence bounds for model-derived results (never exactly 0 or 1)
pub const CONFIDENCE_FLOOR: f64 = 0.10;
pub const CONFIDENCE_CEIL: f64 = 0.95;

/// Neutral values reported when inference degrades to the fallback shape
pub const FALLBACK_RISK_SCORE: f64 = 50.0;
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Base score added on a known-bad-registry hit in the heuristic engine
pub const KNOWN_RISK_BASE_SCORE: f64 = 70.0;

// ============================================
// CACHE CONSTANTS
// ============================================

/// Default TTL for cached assessments (seconds)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// ============================================
// DECLARED FEATURE NAMES
// ============================================

/// The 41 declared feature names, in classifier input order.
/// Names match the Kaggle dataset columns the model was trained on,
/// including the dataset's duplicated `ERC20 Uniq Sent Addr.1` column.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Avg min between sent tnx",
    "Avg min between received tnx",
    "Time Diff between first and last (Mins)",
    "Sent_tnx",
    "Received_tnx",
    "Number of Created Contracts",
    "Unique Received From Addresses",
    "Unique Sent To Addresses",
    "Min Value Received",
    "Max Value Received",
    "Avg Value Received",
    "Min Val Sent",
    "Max Val Sent",
    "Avg Val Sent",
    "Min Value Sent To Contract",
    "Max Value Sent To Contract",
    "Avg Value Sent To Contract",
    "Total Transactions (Including Tnx to Create Contract)",
    "Total Ether Sent",
    "Total Ether Received",
    "Total Ether Sent Contracts",
    "Total Ether Balance",
    "Total ERC20 Tnxs",
    "ERC20 Total Ether Received",
    "ERC20 Total Ether Sent",
    "ERC20 Total Ether Sent Contract",
    "ERC20 Uniq Sent Addr",
    "ERC20 Uniq Rec Addr",
    "ERC20 Uniq Sent Addr.1",
    "ERC20 Uniq Rec Contract Addr",
    "ERC20 Avg Time Between Sent Tnx",
    "ERC20 Avg Time Between Rec Tnx",
    "ERC20 Avg Time Between Contract Tnx",
    "ERC20 Min Val Rec",
    "ERC20 Max Val Rec",
    "ERC20 Avg Val Rec",
    "ERC20 Min Val Sent",
    "ERC20 Max Val Sent",
    "ERC20 Avg Val Sent",
    "ERC20 Uniq Sent Token Name",
    "ERC20 Uniq Rec Token Name",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_feature_names_count_and_uniqueness() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        let unique: HashSet<_> = FEATURE_NAMES.iter().collect();
        assert_eq!(unique.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_confidence_bounds_sane() {
        assert!(CONFIDENCE_FLOOR > 0.0);
        assert!(CONFIDENCE_CEIL < 1.0);
        assert!(CONFIDENCE_FLOOR < CONFIDENCE_CEIL);
    }
}
