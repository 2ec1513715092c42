//! Scoring Facade Module
//!
//! Single entry point for model-path scoring. Wires the feature
//! synthesizer, the model adapter, and the interpreter together and
//! guarantees one result shape no matter what happens underneath:
//! invalid input, a degraded classifier, and inference faults all come
//! back as a well-formed assessment, never a panic or a hole.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::core::features::FeatureSynthesizer;
use crate::core::heuristics::is_valid_address;
use crate::core::interpreter;
use crate::core::model::ModelBundle;
use crate::models::types::RiskAssessment;
use crate::utils::constants::{
    CONFIDENCE_CEIL, CONFIDENCE_FLOOR, FALLBACK_CONFIDENCE, FALLBACK_RISK_SCORE, MAX_BATCH_SIZE,
};

/// Facade over synthesis, inference, and interpretation
pub struct RiskScorer {
    bundle: Arc<ModelBundle>,
    synthesizer: FeatureSynthesizer,
}

impl RiskScorer {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self {
            bundle,
            synthesizer: FeatureSynthesizer::new(),
        }
    }

    /// Score one address. Always returns a complete assessment.
    pub fn score(&self, address: &str) -> RiskAssessment {
        let started = Instant::now();

        if !is_valid_address(address) {
            warn!("🚫 Invalid address rejected: {}", address);
            return self.invalid_address_assessment(address, started);
        }

        let features = self.synthesizer.synthesize(address);

        match self.bundle.try_predict(&features) {
            Ok(prediction) => {
                let probability = prediction.probability();
                let explained = interpreter::explain(&features, probability);
                let risk_score = probability * 100.0;

                info!(
                    "📊 Scored {}: {:.1} ({})",
                    address,
                    risk_score,
                    explained.risk_level.as_str()
                );

                RiskAssessment {
                    success: true,
                    risk_score,
                    risk_level: explained.risk_level.as_str().to_string(),
                    confidence: probability.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEIL),
                    risk_factors: explained.risk_factors,
                    interpretation: explained.interpretation,
                    model_type: self.model_type().to_string(),
                    model_version: self.bundle.version().to_string(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    processing_time_ms: Some(elapsed_ms(started)),
                    address: Some(address.to_string()),
                    is_fallback_model: prediction.is_fallback(),
                    recommended_actions: vec![],
                }
            }
            Err(e) => {
                warn!("💥 Inference fault for {}: {}", address, e);

                RiskAssessment {
                    success: false,
                    risk_score: FALLBACK_RISK_SCORE,
                    risk_level: "medium".to_string(),
                    confidence: FALLBACK_CONFIDENCE,
                    risk_factors: vec!["Model inference failed".to_string()],
                    interpretation: format!("Scoring degraded: {}", e),
                    model_type: self.model_type().to_string(),
                    model_version: self.bundle.version().to_string(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    processing_time_ms: Some(elapsed_ms(started)),
                    address: Some(address.to_string()),
                    is_fallback_model: self.bundle.is_fallback(),
                    recommended_actions: vec![],
                }
            }
        }
    }

    /// Score a batch, preserving input order. Anything past the batch
    /// limit is silently dropped.
    pub fn score_batch(&self, addresses: &[String]) -> Vec<RiskAssessment> {
        if addresses.len() > MAX_BATCH_SIZE {
            warn!(
                "✂️ Batch truncated: {} requested, scoring first {}",
                addresses.len(),
                MAX_BATCH_SIZE
            );
        }

        addresses
            .iter()
            .take(MAX_BATCH_SIZE)
            .map(|address| self.score(address))
            .collect()
    }

    /// Metadata snapshot for the info endpoint
    pub fn model_info(&self) -> crate::models::types::ModelMetadata {
        self.bundle.info()
    }

    /// Whether the stub classifier is active
    pub fn is_fallback(&self) -> bool {
        self.bundle.is_fallback()
    }

    fn model_type(&self) -> &'static str {
        if self.bundle.is_fallback() {
            "linear_sigmoid_stub"
        } else {
            "linear_sigmoid"
        }
    }

    fn invalid_address_assessment(&self, address: &str, started: Instant) -> RiskAssessment {
        RiskAssessment {
            success: true,
            risk_score: 100.0,
            risk_level: "high".to_string(),
            confidence: CONFIDENCE_CEIL,
            risk_factors: vec!["Invalid Ethereum address".to_string()],
            interpretation: "The supplied string is not a valid Ethereum address.".to_string(),
            model_type: self.model_type().to_string(),
            model_version: self.bundle.version().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            processing_time_ms: Some(elapsed_ms(started)),
            address: Some(address.to_string()),
            is_fallback_model: self.bundle.is_fallback(),
            recommended_actions: vec![],
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ModelConfig;

    fn scorer_with_stub() -> RiskScorer {
        let config = ModelConfig::with_dir("/nonexistent/model/dir");
        RiskScorer::new(Arc::new(ModelBundle::load(&config)))
    }

    #[test]
    fn test_invalid_address_assessment_shape() {
        let scorer = scorer_with_stub();
        let result = scorer.score("not-an-address");

        assert!(result.success);
        assert_eq!(result.risk_score, 100.0);
        assert_eq!(result.risk_level, "high");
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.risk_factors, vec!["Invalid Ethereum address"]);
    }

    #[test]
    fn test_valid_address_scores_in_bounds() {
        let scorer = scorer_with_stub();
        let result = scorer.score("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");

        assert!(result.success);
        assert!(result.risk_score >= 0.0 && result.risk_score <= 100.0);
        assert!(result.confidence >= 0.10 && result.confidence <= 0.95);
        assert!(result.is_fallback_model);
        assert!(!result.risk_factors.is_empty());
    }

    #[test]
    fn test_scoring_is_reproducible() {
        let scorer = scorer_with_stub();
        let a = scorer.score("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let b = scorer.score("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");

        assert_eq!(a.risk_score, b.risk_score);
        assert_eq!(a.risk_factors, b.risk_factors);
    }

    #[test]
    fn test_batch_truncates_and_preserves_order() {
        let scorer = scorer_with_stub();
        let addresses: Vec<String> = (0..15u32).map(|i| format!("0x{:040x}", i)).collect();

        let results = scorer.score_batch(&addresses);
        assert_eq!(results.len(), MAX_BATCH_SIZE);
        for (result, address) in results.iter().zip(addresses.iter()) {
            assert_eq!(result.address.as_deref(), Some(address.as_str()));
        }
    }

    #[test]
    fn test_empty_batch_is_empty() {
        let scorer = scorer_with_stub();
        assert!(scorer.score_batch(&[]).is_empty());
    }
}
