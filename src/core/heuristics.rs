//! Heuristic Risk Engine Module
//!
//! Rule-based risk analysis, fully independent of the classifier path.
//! Four weighted sub-analyses (transaction velocity, behavior pattern,
//! contract interaction, association risk) run over deterministically
//! simulated activity metrics, on top of a curated known-risk registry.
//!
//! All simulated metrics come from a single RNG seeded from the address,
//! so repeated analyses of the same address always agree.

use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::info;

use crate::core::features::seed_for;
use crate::models::types::{HeuristicBand, RiskAssessment};
use crate::utils::constants::KNOWN_RISK_BASE_SCORE;

/// Curated entry for a known-bad address
#[derive(Debug, Clone, Serialize)]
pub struct KnownRiskEntry {
    pub category: &'static str,
    pub severity: &'static str,
    pub description: &'static str,
}

/// Static registry of known-bad addresses and behavioral red flags
pub struct KnownRiskRegistry {
    pub scam_addresses: HashMap<&'static str, KnownRiskEntry>,
    pub suspicious_contracts: HashMap<&'static str, &'static str>,
    pub behavioral_red_flags: Vec<&'static str>,
}

impl KnownRiskRegistry {
    /// Lookup is case-insensitive; registry keys are stored lowercase
    pub fn lookup(&self, address: &str) -> Option<&KnownRiskEntry> {
        self.scam_addresses.get(address.to_lowercase().as_str())
    }
}

lazy_static! {
    pub static ref KNOWN_RISK_REGISTRY: KnownRiskRegistry = {
        let mut scam_addresses = HashMap::new();
        scam_addresses.insert(
            "0x8576acc5c05d6ce88f4e49bf65bdf0c62f91353c",
            KnownRiskEntry {
                category: "phishing",
                severity: "high",
                description: "Known phishing wallet",
            },
        );
        scam_addresses.insert(
            "0x901bb9583b24d97e995513c6778dc6888ab6870e",
            KnownRiskEntry {
                category: "scam",
                severity: "high",
                description: "Fake token sale",
            },
        );

        let mut suspicious_contracts = HashMap::new();
        suspicious_contracts.insert(
            "0x1d505c58d4c31c68f4de3d5c6bb9c3bd6b7e2a2a",
            "Malicious smart contract",
        );

        KnownRiskRegistry {
            scam_addresses,
            suspicious_contracts,
            behavioral_red_flags: vec![
                "rapid_token_minting",
                "high_frequency_arbitrage",
                "micro_transaction_spam",
                "address_poisoning",
            ],
        }
    };
}

/// Sub-analysis weights. `reputation_score` is declared for parity with
/// the published scoring scheme but no reputation analyzer is wired in,
/// so only 0.90 of the nominal weight mass is ever applied.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HeuristicWeights {
    pub transaction_velocity: f64,
    pub behavior_pattern: f64,
    pub contract_interaction: f64,
    pub association_risk: f64,
    pub reputation_score: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            transaction_velocity: 0.25,
            behavior_pattern: 0.20,
            contract_interaction: 0.15,
            association_risk: 0.30,
            reputation_score: 0.10,
        }
    }
}

impl HeuristicWeights {
    /// Weight mass actually applied by the engine
    pub fn applied_total(&self) -> f64 {
        self.transaction_velocity
            + self.behavior_pattern
            + self.contract_interaction
            + self.association_risk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum SubRiskLevel {
    High,
    Medium,
    Low,
}

/// Outcome of one sub-analysis
#[derive(Debug, Clone, Serialize)]
struct SubAnalysis {
    risk_level: SubRiskLevel,
    score: f64,
    factors: Vec<String>,
    metrics: serde_json::Value,
}

impl SubAnalysis {
    fn contributes(&self) -> bool {
        self.risk_level != SubRiskLevel::Low
    }
}

fn banded(score: f64, high: f64, medium: f64) -> SubRiskLevel {
    if score >= high {
        SubRiskLevel::High
    } else if score >= medium {
        SubRiskLevel::Medium
    } else {
        SubRiskLevel::Low
    }
}

/// Full heuristic analysis result: the standard assessment shape plus
/// the per-analyzer breakdown the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct HeuristicReport {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub detailed_analysis: serde_json::Value,
}

/// Rule-based engine over the known-risk registry and simulated metrics
#[derive(Debug, Clone, Default)]
pub struct HeuristicEngine {
    weights: HeuristicWeights,
}

impl HeuristicEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> HeuristicWeights {
        self.weights
    }

    /// Analyze one address. The optional transaction context is echoed
    /// into the detailed breakdown for the caller; scoring itself runs
    /// entirely off the registry and the seeded metrics.
    pub fn analyze(&self, address: &str, tx_context: Option<&serde_json::Value>) -> HeuristicReport {
        info!("🔍 Heuristic analysis: {}", address);

        if !is_valid_address(address) {
            return self.report(
                address,
                100.0,
                vec!["Invalid Ethereum address".to_string()],
                json!({}),
            );
        }

        let mut rng = StdRng::seed_from_u64(seed_for(address) as u64);
        let mut factors = Vec::new();
        let mut score = 0.0;
        let mut detailed = serde_json::Map::new();

        // Known-risk registry check comes first and dominates the score
        if let Some(entry) = KNOWN_RISK_REGISTRY.lookup(address) {
            factors.push(entry.description.to_string());
            score += KNOWN_RISK_BASE_SCORE;
            detailed.insert(
                "known_risks".to_string(),
                serde_json::to_value(entry).unwrap_or_default(),
            );
        }

        let transactions = self.analyze_transaction_patterns(&mut rng);
        if transactions.contributes() {
            factors.extend(transactions.factors.iter().cloned());
            score += transactions.score * self.weights.transaction_velocity;
        }

        let behavior = self.analyze_behavior_patterns(&mut rng);
        if behavior.contributes() {
            factors.extend(behavior.factors.iter().cloned());
            score += behavior.score * self.weights.behavior_pattern;
        }

        let contracts = self.analyze_contract_interactions(&mut rng);
        if contracts.contributes() {
            factors.extend(contracts.factors.iter().cloned());
            score += contracts.score * self.weights.contract_interaction;
        }

        let associations = self.analyze_association_risk(&mut rng);
        if associations.contributes() {
            factors.extend(associations.factors.iter().cloned());
            score += associations.score * self.weights.association_risk;
        }

        detailed.insert(
            "transactions".to_string(),
            serde_json::to_value(&transactions).unwrap_or_default(),
        );
        detailed.insert(
            "behavior".to_string(),
            serde_json::to_value(&behavior).unwrap_or_default(),
        );
        detailed.insert(
            "contracts".to_string(),
            serde_json::to_value(&contracts).unwrap_or_default(),
        );
        detailed.insert(
            "associations".to_string(),
            serde_json::to_value(&associations).unwrap_or_default(),
        );
        if let Some(context) = tx_context {
            detailed.insert("context".to_string(), context.clone());
        }

        self.report(
            address,
            RiskAssessment::clamp_score(score),
            factors,
            serde_json::Value::Object(detailed),
        )
    }

    fn report(
        &self,
        address: &str,
        score: f64,
        factors: Vec<String>,
        detailed_analysis: serde_json::Value,
    ) -> HeuristicReport {
        let band = HeuristicBand::from_score(score);
        let known_hit = KNOWN_RISK_REGISTRY.lookup(address).is_some();

        // Confidence grows with how many analyzers fired; a registry hit
        // is authoritative on its own
        let confidence = if known_hit || score >= 100.0 {
            0.9
        } else {
            (0.5 + score / 250.0).min(0.9)
        };

        let assessment = RiskAssessment {
            success: true,
            risk_score: score,
            risk_level: band.label().to_string(),
            confidence,
            risk_factors: factors,
            interpretation: format!(
                "Heuristic analysis scored this address {:.1}/100 across weighted analyzers.",
                score
            ),
            model_type: "heuristic".to_string(),
            model_version: "heuristic_v1".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            processing_time_ms: None,
            address: Some(address.to_string()),
            is_fallback_model: false,
            recommended_actions: band
                .recommended_actions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        HeuristicReport {
            assessment,
            detailed_analysis,
        }
    }

    fn analyze_transaction_patterns(&self, rng: &mut StdRng) -> SubAnalysis {
        let tx_count_24h: u32 = rng.gen_range(0..200);
        let night_activity_ratio: f64 = rng.gen();
        let micro_tx_count: u32 = rng.gen_range(0..20);
        let avg_tx_value: f64 = rng.gen_range(0.001..10.0);

        let mut factors = Vec::new();
        let mut score = 0.0;

        if tx_count_24h > 100 {
            factors.push(format!(
                "High transaction frequency: {} transactions in 24h",
                tx_count_24h
            ));
            score += 40.0;
        }
        if night_activity_ratio > 0.7 {
            factors.push("Unusual activity pattern: high nighttime transactions".to_string());
            score += 20.0;
        }
        if micro_tx_count > 10 {
            factors.push("Multiple micro-transactions detected (possible testing)".to_string());
            score += 15.0;
        }

        SubAnalysis {
            risk_level: banded(score, 40.0, 20.0),
            score,
            factors,
            metrics: json!({
                "tx_count_24h": tx_count_24h,
                "night_activity_ratio": night_activity_ratio,
                "micro_tx_count": micro_tx_count,
                "avg_tx_value": avg_tx_value,
            }),
        }
    }

    fn analyze_behavior_patterns(&self, rng: &mut StdRng) -> SubAnalysis {
        let fund_rotation_ratio: f64 = rng.gen();
        let new_address_interactions: u32 = rng.gen_range(0..30);
        let mixer_usage_suspected = rng.gen::<f64>() > 0.7;

        let mut factors = Vec::new();
        let mut score = 0.0;

        if fund_rotation_ratio > 0.8 {
            factors.push("Rapid fund rotation detected".to_string());
            score += 25.0;
        }
        if new_address_interactions > 15 {
            factors.push("Frequent interactions with newly created addresses".to_string());
            score += 20.0;
        }
        if mixer_usage_suspected {
            factors.push("Possible mixer/tumbler usage pattern".to_string());
            score += 30.0;
        }

        SubAnalysis {
            risk_level: banded(score, 30.0, 15.0),
            score,
            factors,
            metrics: json!({
                "fund_rotation_ratio": fund_rotation_ratio,
                "new_address_interactions": new_address_interactions,
                "mixer_usage_suspected": mixer_usage_suspected,
            }),
        }
    }

    fn analyze_contract_interactions(&self, rng: &mut StdRng) -> SubAnalysis {
        let known_risky_interactions: u32 = rng.gen_range(0..3);
        let suspicious_method_calls: Vec<&str> = if rng.gen::<f64>() > 0.8 {
            vec!["unlimited_approval", "hidden_transfer"]
        } else {
            vec![]
        };
        let new_contracts_deployed: u32 = rng.gen_range(0..10);

        let mut factors = Vec::new();
        let mut score = 0.0;

        if known_risky_interactions > 0 {
            factors.push(format!(
                "Interacted with {} known risky contracts",
                known_risky_interactions
            ));
            score += 50.0;
        }
        if !suspicious_method_calls.is_empty() {
            factors.extend(
                suspicious_method_calls
                    .iter()
                    .map(|method| format!("Suspicious method: {}", method)),
            );
            score += 30.0;
        }
        if new_contracts_deployed > 5 {
            factors.push("Multiple new contracts deployed (possible scam factory)".to_string());
            score += 25.0;
        }

        SubAnalysis {
            risk_level: banded(score, 40.0, 20.0),
            score,
            factors,
            metrics: json!({
                "known_risky_interactions": known_risky_interactions,
                "suspicious_method_calls": suspicious_method_calls,
                "new_contracts_deployed": new_contracts_deployed,
            }),
        }
    }

    fn analyze_association_risk(&self, rng: &mut StdRng) -> SubAnalysis {
        let direct_high_risk: u32 = rng.gen_range(0..5);
        let secondary_risk: u32 = rng.gen_range(0..20);
        let risk_cluster_member = rng.gen::<f64>() > 0.9;

        let mut factors = Vec::new();
        let mut score = 0.0;

        if direct_high_risk > 0 {
            factors.push(format!(
                "Direct association with {} high-risk addresses",
                direct_high_risk
            ));
            score += 40.0;
        }
        if secondary_risk > 10 {
            factors.push("Multiple secondary associations with risky addresses".to_string());
            score += 25.0;
        }
        if risk_cluster_member {
            factors.push("Member of known risk cluster".to_string());
            score += 35.0;
        }

        SubAnalysis {
            risk_level: banded(score, 40.0, 20.0),
            score,
            factors,
            metrics: json!({
                "direct_high_risk_associations": direct_high_risk,
                "secondary_risk_associations": secondary_risk,
                "risk_cluster_member": risk_cluster_member,
            }),
        }
    }
}

/// Strict hex-format validation via the primitive address type
pub fn is_valid_address(address: &str) -> bool {
    alloy_primitives::Address::from_str(address).is_ok()
}
