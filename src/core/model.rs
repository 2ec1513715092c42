//! Model Adapter Module
//!
//! Loads the serialized classifier from disk and exposes a prediction
//! interface over it. Loading never fails: whatever artifact is missing
//! or malformed, the adapter degrades to a deterministic stub classifier
//! and records the degradation once, at load time. Callers branch on the
//! recorded load outcome instead of catching errors mid-inference.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use tracing::{info, warn};

use crate::models::config::ModelConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{FeatureVector, ModelMetadata, SubModelPerformance};
use crate::utils::constants::{
    CLASSIFIER_FILE, DATASET_SOURCE, DEFAULT_MODEL_VERSION, FEATURE_COUNT, FEATURE_NAMES,
    FEATURE_NAMES_FILE, MODEL_VERSION_FILE,
};

/// Seed for the stub classifier weights, fixed so every process
/// degrades to the same fallback behavior
const STUB_WEIGHT_SEED: u64 = 42;

/// Linear classifier with a sigmoid link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearClassifier {
    /// Deterministic stub: Gaussian noise weights scaled well below the
    /// feature magnitudes, zero bias. Predictions hover around 0.5
    /// regardless of input.
    pub fn stub() -> Self {
        let mut rng = StdRng::seed_from_u64(STUB_WEIGHT_SEED);
        let noise = Normal::new(0.0, 1e-7);
        let weights = match noise {
            Ok(dist) => (0..FEATURE_COUNT).map(|_| dist.sample(&mut rng)).collect(),
            Err(_) => vec![0.0; FEATURE_COUNT],
        };

        Self { weights, bias: 0.0 }
    }

    /// Probability of the positive (fraud) class for an ordered input row
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let z: f64 = self.bias
            + row
                .iter()
                .zip(self.weights.iter())
                .map(|(x, w)| w * x)
                .sum::<f64>();

        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// How the classifier came to be in memory, decided once at load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResult {
    /// Real artifact parsed from disk
    Loaded,
    /// Degraded to the deterministic stub
    Stub,
}

/// Raw classifier output before interpretation
#[derive(Debug, Clone)]
pub struct RawPrediction {
    pub probability: f64,
    pub raw_label: u8,
}

/// Prediction outcome, tagged by classifier provenance
#[derive(Debug, Clone)]
pub enum Prediction {
    /// From the real loaded classifier
    Model(RawPrediction),
    /// From the stub classifier, with the reason it was active
    Fallback {
        prediction: RawPrediction,
        reason: String,
    },
}

impl Prediction {
    pub fn probability(&self) -> f64 {
        match self {
            Prediction::Model(p) => p.probability,
            Prediction::Fallback { prediction, .. } => prediction.probability,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Prediction::Fallback { .. })
    }
}

/// On-disk metadata sidecar shape
#[derive(Debug, Clone, Deserialize)]
struct MetadataFile {
    version: String,
    #[serde(default)]
    training_time: String,
    #[serde(default)]
    performance: HashMap<String, SubModelPerformance>,
    #[serde(default)]
    model_weights: HashMap<String, f64>,
}

/// Loaded classifier plus everything needed to describe it
pub struct ModelBundle {
    classifier: LinearClassifier,
    version: String,
    feature_names: Vec<String>,
    training_date: String,
    performance: HashMap<String, SubModelPerformance>,
    model_weights: HashMap<String, f64>,
    load_result: LoadResult,
    fallback_reason: Option<String>,
    metadata_fallback: bool,
}

/// Default metadata block reported when the sidecar is missing
fn default_metadata() -> (String, HashMap<String, SubModelPerformance>, HashMap<String, f64>) {
    let mut performance = HashMap::new();
    performance.insert(
        "lgb".to_string(),
        SubModelPerformance {
            auc: 0.85,
            accuracy: 0.82,
        },
    );
    let mut model_weights = HashMap::new();
    model_weights.insert("lgb".to_string(), 1.0);

    ("2025-01-12 08:30:00".to_string(), performance, model_weights)
}

impl ModelBundle {
    /// Load every artifact from the configured directory.
    ///
    /// Never fails. Each missing or unparsable artifact is logged once
    /// and replaced: the stub classifier for the model itself, declared
    /// defaults for version, names, and metadata.
    pub fn load(config: &ModelConfig) -> Self {
        let dir = &config.model_dir;

        let version = match fs::read_to_string(dir.join(MODEL_VERSION_FILE)) {
            Ok(raw) => raw.trim().to_string(),
            Err(e) => {
                warn!("⚠️ Version marker unreadable ({}), using default", e);
                DEFAULT_MODEL_VERSION.to_string()
            }
        };

        let (classifier, load_result, fallback_reason) =
            match Self::load_classifier(&dir.join(CLASSIFIER_FILE)) {
                Ok(classifier) => (classifier, LoadResult::Loaded, None),
                Err(e) => {
                    warn!("⚠️ Classifier unavailable ({}), degrading to stub", e);
                    (
                        LinearClassifier::stub(),
                        LoadResult::Stub,
                        Some(e.to_string()),
                    )
                }
            };

        let feature_names = match fs::read_to_string(dir.join(FEATURE_NAMES_FILE))
            .map_err(AppError::from)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).map_err(AppError::from))
        {
            Ok(names) if names.len() == FEATURE_COUNT => names,
            Ok(names) => {
                warn!(
                    "⚠️ Feature name list has {} entries, expected {}; using declared names",
                    names.len(),
                    FEATURE_COUNT
                );
                FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
            }
            Err(e) => {
                warn!("⚠️ Feature names unreadable ({}), using declared names", e);
                FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
            }
        };

        let metadata_path = dir.join(format!("metadata_{}.json", version));
        let (training_date, performance, model_weights, metadata_fallback) =
            match fs::read_to_string(&metadata_path)
                .map_err(AppError::from)
                .and_then(|raw| serde_json::from_str::<MetadataFile>(&raw).map_err(AppError::from))
            {
                Ok(meta) => {
                    if meta.version != version {
                        warn!(
                            "⚠️ Metadata version {} does not match marker {}",
                            meta.version, version
                        );
                    }
                    (meta.training_time, meta.performance, meta.model_weights, false)
                }
                Err(e) => {
                    warn!("⚠️ Metadata sidecar unreadable ({}), synthesizing defaults", e);
                    let (training_date, performance, model_weights) = default_metadata();
                    (training_date, performance, model_weights, true)
                }
            };

        match load_result {
            LoadResult::Loaded => {
                info!("🤖 Model loaded: version={} features={}", version, feature_names.len())
            }
            LoadResult::Stub => {
                info!("🩹 Stub classifier active: version={}", version)
            }
        }

        Self {
            classifier,
            version,
            feature_names,
            training_date,
            performance,
            model_weights,
            load_result,
            fallback_reason,
            metadata_fallback,
        }
    }

    fn load_classifier(path: &std::path::Path) -> AppResult<LinearClassifier> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::model_missing(format!("{}: {}", path.display(), e)))?;
        let classifier: LinearClassifier = serde_json::from_str(&raw)?;

        if classifier.weights.len() != FEATURE_COUNT {
            return Err(AppError::model_parse_failed(format!(
                "classifier has {} weights, expected {}",
                classifier.weights.len(),
                FEATURE_COUNT
            )));
        }
        if !classifier.bias.is_finite() || classifier.weights.iter().any(|w| !w.is_finite()) {
            return Err(AppError::model_parse_failed(
                "classifier contains non-finite parameters",
            ));
        }

        Ok(classifier)
    }

    /// Whether the stub classifier is serving predictions
    pub fn is_fallback(&self) -> bool {
        self.load_result == LoadResult::Stub
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Run inference over a feature vector.
    ///
    /// The input row is assembled by declared feature name: missing
    /// names default to 0.0 and unrecognized extras are ignored, so
    /// name order and weight order cannot silently diverge. The only
    /// runtime failure is a non-finite input value; a degraded
    /// classifier is not an error here, it is a tagged success.
    pub fn try_predict(&self, features: &FeatureVector) -> AppResult<Prediction> {
        if let Some((name, value)) = features.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AppError::non_finite_feature(name, value));
        }

        let row: Vec<f64> = self
            .feature_names
            .iter()
            .map(|name| features.get(name).unwrap_or(0.0))
            .collect();

        let probability = self.classifier.predict_proba(&row);
        let raw = RawPrediction {
            probability,
            raw_label: if probability >= 0.5 { 1 } else { 0 },
        };

        match self.load_result {
            LoadResult::Loaded => Ok(Prediction::Model(raw)),
            LoadResult::Stub => Ok(Prediction::Fallback {
                prediction: raw,
                reason: self
                    .fallback_reason
                    .clone()
                    .unwrap_or_else(|| "stub classifier active".to_string()),
            }),
        }
    }

    /// Metadata snapshot for the model-info endpoint.
    ///
    /// `is_fallback` covers every degraded artifact: a stub classifier
    /// or a synthesized metadata block both set it, so a deployment
    /// missing only the sidecar is never reported as fully trusted.
    pub fn info(&self) -> ModelMetadata {
        ModelMetadata {
            version: self.version.clone(),
            model_type: if self.is_fallback() {
                "linear_sigmoid_stub".to_string()
            } else {
                "linear_sigmoid".to_string()
            },
            feature_count: self.feature_names.len(),
            training_date: self.training_date.clone(),
            performance: self.performance.clone(),
            model_weights: self.model_weights.clone(),
            dataset_source: DATASET_SOURCE.to_string(),
            is_fallback: self.is_fallback() || self.metadata_fallback,
        }
    }
}
