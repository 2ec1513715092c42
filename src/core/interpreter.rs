//! Prediction Interpreter Module
//!
//! Turns a raw fraud probability plus the feature vector behind it into
//! human-readable output: a banded risk level, a list of concrete risk
//! factors, and a one-line interpretation. Factor rules fire in a fixed
//! order so the factor list is as deterministic as the features are.

use crate::models::types::{FeatureVector, RiskLevel};

/// Probability above which a factorless score still gets flagged
const COMPLEX_PATTERN_THRESHOLD: f64 = 0.7;

/// Interpreted prediction, ready for the response envelope
#[derive(Debug, Clone)]
pub struct Interpretation {
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub interpretation: String,
}

/// Explain a prediction in terms of the features that drove it.
pub fn explain(features: &FeatureVector, probability: f64) -> Interpretation {
    let score = probability * 100.0;
    let risk_level = RiskLevel::from_score(score);
    let mut factors = Vec::new();

    if let Some(avg_sent_interval) = features.get("Avg min between sent tnx") {
        if avg_sent_interval < 1.0 {
            factors.push(
                "High-frequency sending: average interval between sent transactions under 1 minute"
                    .to_string(),
            );
        }
    }

    if let Some(unique_senders) = features.get("Unique Received From Addresses") {
        if unique_senders > 100.0 {
            factors.push(format!(
                "Interacts with a large number of counterparties ({} unique senders)",
                unique_senders.round() as u64
            ));
        }
    }

    if let Some(sent_tnx) = features.get("Sent_tnx") {
        if sent_tnx > 200.0 {
            factors.push(format!(
                "Unusually high sent-transaction count ({} transactions)",
                sent_tnx.round() as u64
            ));
        }
    }

    if let Some(contracts) = features.get("Number of Created Contracts") {
        if contracts > 5.0 {
            factors.push(format!(
                "Frequent smart contract creation ({} contracts)",
                contracts.round() as u64
            ));
        }
    }

    if let Some(token_names) = features.get("ERC20 Uniq Sent Token Name") {
        if token_names > 20.0 {
            factors.push(format!(
                "Activity across many ERC-20 tokens ({} distinct tokens sent)",
                token_names.round() as u64
            ));
        }
    }

    // A confident model with little feature-level evidence still warrants a flag
    if probability > COMPLEX_PATTERN_THRESHOLD && factors.len() < 2 {
        factors.push("Complex fraud pattern detected".to_string());
    }

    if factors.is_empty() {
        factors.push("Normal transaction pattern".to_string());
    }

    let interpretation = interpretation_text(score, &factors);

    Interpretation {
        risk_level,
        risk_factors: factors,
        interpretation,
    }
}

fn interpretation_text(score: f64, factors: &[String]) -> String {
    let count = factors.len();
    if score >= 80.0 {
        format!(
            "High fraud risk: {} risk factor(s) identified. Interaction is strongly discouraged.",
            count
        )
    } else if score >= 60.0 {
        format!(
            "Elevated fraud risk: {} risk factor(s) identified. Careful verification recommended.",
            count
        )
    } else if score >= 40.0 {
        format!(
            "Moderate fraud risk: {} risk factor(s) identified. Proceed with caution.",
            count
        )
    } else {
        "Low fraud risk: transaction pattern looks typical.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::FEATURE_NAMES;

    fn vector_with(overrides: &[(&str, f64)]) -> FeatureVector {
        let mut features = FeatureVector::with_capacity(FEATURE_NAMES.len());
        for name in FEATURE_NAMES.iter() {
            let value = overrides
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| *v)
                .unwrap_or(1.5);
            features.push(name.to_string(), value);
        }
        features
    }

    #[test]
    fn test_quiet_vector_yields_normal_pattern() {
        let features = vector_with(&[]);
        let result = explain(&features, 0.15);

        assert_eq!(result.risk_factors, vec!["Normal transaction pattern"]);
        assert_eq!(result.risk_level, RiskLevel::Minimal);

        // Score 20.0 sits exactly on the low-band boundary
        assert_eq!(explain(&features, 0.2).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_high_frequency_sending_factor() {
        let features = vector_with(&[("Avg min between sent tnx", 0.4)]);
        let result = explain(&features, 0.3);

        assert!(result
            .risk_factors
            .iter()
            .any(|f| f.contains("High-frequency sending")));
    }

    #[test]
    fn test_counterparty_factor_includes_count() {
        let features = vector_with(&[("Unique Received From Addresses", 250.0)]);
        let result = explain(&features, 0.3);

        assert!(result.risk_factors.iter().any(|f| f.contains("250 unique senders")));
    }

    #[test]
    fn test_confident_model_with_no_evidence_flags_complex_pattern() {
        let features = vector_with(&[]);
        let result = explain(&features, 0.85);

        assert!(result
            .risk_factors
            .iter()
            .any(|f| f == "Complex fraud pattern detected"));
    }

    #[test]
    fn test_complex_pattern_not_added_when_evidence_is_rich() {
        let features = vector_with(&[
            ("Avg min between sent tnx", 0.2),
            ("Sent_tnx", 350.0),
            ("Number of Created Contracts", 9.0),
        ]);
        let result = explain(&features, 0.9);

        assert!(result.risk_factors.len() >= 2);
        assert!(!result
            .risk_factors
            .iter()
            .any(|f| f == "Complex fraud pattern detected"));
    }

    #[test]
    fn test_interpretation_text_matches_band() {
        let features = vector_with(&[]);

        let high = explain(&features, 0.9);
        assert!(high.interpretation.starts_with("High fraud risk"));

        let low = explain(&features, 0.1);
        assert!(low.interpretation.starts_with("Low fraud risk"));
    }

    #[test]
    fn test_factor_order_is_stable() {
        let features = vector_with(&[
            ("Avg min between sent tnx", 0.2),
            ("Unique Received From Addresses", 150.0),
            ("Sent_tnx", 300.0),
        ]);
        let result = explain(&features, 0.5);

        assert!(result.risk_factors[0].contains("High-frequency sending"));
        assert!(result.risk_factors[1].contains("unique senders"));
        assert!(result.risk_factors[2].contains("sent-transaction count"));
    }
}
