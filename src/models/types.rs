//! Type definitions for CryptoGuard
//! All core data structures for address risk assessment

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk level classification for the model-backed scoring path (5 bands)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    /// Nothing noteworthy in the feature profile
    Minimal,
    /// Minor concerns
    Low,
    /// Proceed with caution
    Medium,
    /// Several fraud indicators present
    MediumHigh,
    /// Strong match with known fraud patterns
    High,
}

impl RiskLevel {
    /// Band a 0-100 risk score. Pure and total: same score, same level.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::High
        } else if score >= 60.0 {
            RiskLevel::MediumHigh
        } else if score >= 40.0 {
            RiskLevel::Medium
        } else if score >= 20.0 {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "minimal",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::MediumHigh => "medium-high",
            RiskLevel::High => "high",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "✅",
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::MediumHigh => "🟠",
            RiskLevel::High => "🔴",
        }
    }
}

/// Coarser 4-band level used by the heuristic engine (thresholds 75/50/25).
/// Kept separate from [`RiskLevel`]: the two banding schemes are display
/// contracts of different consumers and are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicBand {
    Minimal,
    Low,
    Medium,
    High,
}

impl HeuristicBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            HeuristicBand::High
        } else if score >= 50.0 {
            HeuristicBand::Medium
        } else if score >= 25.0 {
            HeuristicBand::Low
        } else {
            HeuristicBand::Minimal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeuristicBand::High => "🔴 HIGH RISK",
            HeuristicBand::Medium => "🟠 MEDIUM RISK",
            HeuristicBand::Low => "🟡 LOW RISK",
            HeuristicBand::Minimal => "🟢 MINIMAL RISK",
        }
    }

    /// Fixed, non-overlapping action list per band.
    pub fn recommended_actions(&self) -> &'static [&'static str] {
        match self {
            HeuristicBand::High => &[
                "Immediately revoke any token approvals",
                "Do not interact with this address",
                "Report to wallet security team",
                "Consider moving funds to new wallet",
            ],
            HeuristicBand::Medium => &[
                "Exercise extreme caution",
                "Verify transaction details carefully",
                "Limit interaction amounts",
                "Monitor for suspicious activity",
            ],
            HeuristicBand::Low => &[
                "Proceed with caution",
                "Double-check addresses",
                "Use small test transactions first",
            ],
            HeuristicBand::Minimal => &["Standard security practices recommended"],
        }
    }
}

/// 4-band variant used by dashboard displays (thresholds 75/55/30).
/// Not interchangeable with [`HeuristicBand`]; the thresholds differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayBand {
    VeryLow,
    Low,
    Medium,
    High,
}

impl DisplayBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            DisplayBand::High
        } else if score >= 55.0 {
            DisplayBand::Medium
        } else if score >= 30.0 {
            DisplayBand::Low
        } else {
            DisplayBand::VeryLow
        }
    }

    /// Color code for UI rendering
    pub fn color_code(&self) -> &'static str {
        match self {
            DisplayBand::VeryLow => "#22c55e",
            DisplayBand::Low => "#eab308",
            DisplayBand::Medium => "#f97316",
            DisplayBand::High => "#ef4444",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayBand::VeryLow => "very-low",
            DisplayBand::Low => "low",
            DisplayBand::Medium => "medium",
            DisplayBand::High => "high",
        }
    }
}

/// Ordered 41-dimensional feature vector consumed by the classifier.
///
/// Entries preserve the declared feature order; lookups are by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push((name.into(), value));
    }

    /// Lookup by feature name. Linear scan; the vector is small and ordered.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

/// Performance numbers for a single sub-model (from training metadata)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubModelPerformance {
    pub auc: f64,
    pub accuracy: f64,
}

/// Model identity and training provenance.
/// Loaded once at startup, immutable thereafter; reconstructing the
/// model bundle is the only way to refresh it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: String,
    pub model_type: String,
    pub feature_count: usize,
    pub training_date: String,
    /// Per-sub-model performance map, e.g. `{"lgb": {auc, accuracy}}`
    pub performance: HashMap<String, SubModelPerformance>,
    /// Declared per-sub-model ensemble weights
    pub model_weights: HashMap<String, f64>,
    pub dataset_source: String,
    /// True when the active classifier is a non-trained stand-in
    pub is_fallback: bool,
}

/// The universal scoring result. Every operation (model path, heuristic
/// path, invalid input, degraded fallback) returns this exact shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Whether the result came from a functioning scorer (model or
    /// heuristics) rather than a degraded default
    pub success: bool,
    /// Always present, always within [0, 100]
    pub risk_score: f64,
    /// Band string; 5-band for the model path, 4-band label for heuristics
    pub risk_level: String,
    /// In [0.1, 0.95] for model-derived results, fixed 0.5 for fallback
    pub confidence: f64,
    /// Ranked, human-readable explanations (rule-declaration order)
    pub risk_factors: Vec<String>,
    pub interpretation: String,
    pub model_type: String,
    pub model_version: String,
    /// RFC3339 timestamp of the assessment
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
    /// Echoed input address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub is_fallback_model: bool,
    /// Heuristic path only; empty for the model path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_actions: Vec<String>,
}

impl RiskAssessment {
    /// Clamp helper so the score invariant holds no matter the producer.
    pub fn clamp_score(score: f64) -> f64 {
        score.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_banding() {
        assert_eq!(RiskLevel::from_score(95.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(79.9), RiskLevel::MediumHigh);
        assert_eq!(RiskLevel::from_score(60.0), RiskLevel::MediumHigh);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(20.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(19.9), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Minimal);
    }

    #[test]
    fn test_band_schemes_are_not_interchangeable() {
        // 50 <= score < 55: the heuristic scheme already says medium,
        // the dashboard scheme still says low
        assert_eq!(HeuristicBand::from_score(52.0), HeuristicBand::Medium);
        assert_eq!(DisplayBand::from_score(52.0), DisplayBand::Low);
        // 25 <= score < 30 diverges the other way
        assert_eq!(HeuristicBand::from_score(27.0), HeuristicBand::Low);
        assert_eq!(DisplayBand::from_score(27.0), DisplayBand::VeryLow);
    }

    #[test]
    fn test_recommended_actions_non_overlapping() {
        let high = HeuristicBand::High.recommended_actions();
        let minimal = HeuristicBand::Minimal.recommended_actions();
        assert!(high.iter().all(|a| !minimal.contains(a)));
        assert_eq!(minimal.len(), 1);
    }

    #[test]
    fn test_feature_vector_order_and_lookup() {
        let mut v = FeatureVector::with_capacity(2);
        v.push("Sent_tnx", 12.0);
        v.push("Received_tnx", 3.0);
        assert_eq!(v.get("Sent_tnx"), Some(12.0));
        assert_eq!(v.get("missing"), None);
        let names: Vec<&str> = v.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Sent_tnx", "Received_tnx"]);
    }

    #[test]
    fn test_score_clamping() {
        assert_eq!(RiskAssessment::clamp_score(120.0), 100.0);
        assert_eq!(RiskAssessment::clamp_score(-5.0), 0.0);
        assert_eq!(RiskAssessment::clamp_score(55.5), 55.5);
    }
}
