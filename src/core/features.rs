//! Feature Synthesis Module
//!
//! Deterministic per-address feature generation. Every address maps to a
//! stable 41-dimensional feature vector: the address digest seeds an RNG,
//! and each feature is drawn from a declared distribution in a fixed order.
//! Same address in, same vector out, process after process.
//!
//! Addresses are split into two statistical regimes (a small high-risk
//! slice and a normal remainder) so the downstream classifier has real
//! signal to separate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal, Poisson};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::types::FeatureVector;
use crate::utils::constants::{FEATURE_COUNT, FEATURE_NAMES, HIGH_RISK_REGIME_PERCENT};

/// Statistical regime an address falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    HighRisk,
    Normal,
}

/// One declared feature distribution.
///
/// `Exp` draws exponential with the given mean, then applies an additive
/// offset and a lower bound. `Poisson` shifts by a constant. `Uniform`
/// and `Gaussian` are what they say; `Gaussian` is clipped at zero.
#[derive(Debug, Clone, Copy)]
enum Draw {
    Exp { mean: f64, add: f64, floor: f64 },
    Poisson { lambda: f64, add: f64 },
    Uniform { lo: f64, hi: f64 },
    Gaussian { mean: f64, std: f64 },
}

impl Draw {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        match *self {
            Draw::Exp { mean, add, floor } => {
                // Exp is parameterized by rate, not mean
                let value = Exp::new(1.0 / mean)
                    .map(|d| d.sample(rng))
                    .unwrap_or(mean);
                (value + add).max(floor)
            }
            Draw::Poisson { lambda, add } => {
                let value: f64 = Poisson::new(lambda)
                    .map(|d| d.sample(rng))
                    .unwrap_or(lambda);
                value + add
            }
            Draw::Uniform { lo, hi } => rng.gen_range(lo..hi),
            Draw::Gaussian { mean, std } => {
                let value = Normal::new(mean, std)
                    .map(|d| d.sample(rng))
                    .unwrap_or(mean);
                value.max(0.0)
            }
        }
    }
}

const fn exp(mean: f64, add: f64) -> Draw {
    Draw::Exp { mean, add, floor: 0.0 }
}

const fn exp_floor(mean: f64, floor: f64) -> Draw {
    Draw::Exp { mean, add: 0.0, floor }
}

const fn pois(lambda: f64, add: f64) -> Draw {
    Draw::Poisson { lambda, add }
}

/// Distribution table for the high-risk regime, in declared feature order.
/// Short intervals, heavy counterparty fan-out, bursty ERC-20 activity.
const HIGH_RISK_DRAWS: [Draw; FEATURE_COUNT] = [
    exp_floor(0.5, 0.1),                  // Avg min between sent tnx
    exp_floor(2.0, 0.5),                  // Avg min between received tnx
    Draw::Uniform { lo: 100.0, hi: 5000.0 }, // Time Diff between first and last (Mins)
    pois(150.0, 50.0),                    // Sent_tnx
    pois(30.0, 10.0),                     // Received_tnx
    pois(3.0, 2.0),                       // Number of Created Contracts
    pois(80.0, 20.0),                     // Unique Received From Addresses
    pois(100.0, 30.0),                    // Unique Sent To Addresses
    exp_floor(0.05, 0.001),               // Min Value Received
    exp(3.0, 1.0),                        // Max Value Received
    exp(0.8, 0.2),                        // Avg Value Received
    exp_floor(0.03, 0.001),               // Min Val Sent
    exp(8.0, 2.0),                        // Max Val Sent
    exp(1.5, 0.5),                        // Avg Val Sent
    exp_floor(0.1, 0.001),                // Min Value Sent To Contract
    exp(2.0, 0.5),                        // Max Value Sent To Contract
    exp(0.5, 0.1),                        // Avg Value Sent To Contract
    pois(180.0, 20.0),                    // Total Transactions (Including Tnx to Create Contract)
    exp(40.0, 10.0),                      // Total Ether Sent
    exp(15.0, 5.0),                       // Total Ether Received
    exp(4.0, 1.0),                        // Total Ether Sent Contracts
    Draw::Gaussian { mean: 3.0, std: 2.0 }, // Total Ether Balance
    pois(200.0, 50.0),                    // Total ERC20 Tnxs
    exp(12.0, 3.0),                       // ERC20 Total Ether Received
    exp(20.0, 5.0),                       // ERC20 Total Ether Sent
    exp(2.0, 0.5),                        // ERC20 Total Ether Sent Contract
    pois(80.0, 20.0),                     // ERC20 Uniq Sent Addr
    pois(50.0, 10.0),                     // ERC20 Uniq Rec Addr
    pois(80.0, 20.0),                     // ERC20 Uniq Sent Addr.1
    pois(8.0, 2.0),                       // ERC20 Uniq Rec Contract Addr
    exp_floor(1.0, 0.5),                  // ERC20 Avg Time Between Sent Tnx
    exp_floor(2.0, 1.0),                  // ERC20 Avg Time Between Rec Tnx
    exp_floor(1.5, 1.0),                  // ERC20 Avg Time Between Contract Tnx
    exp_floor(0.03, 0.001),               // ERC20 Min Val Rec
    exp(1.5, 0.5),                        // ERC20 Max Val Rec
    exp(0.2, 0.1),                        // ERC20 Avg Val Rec
    exp_floor(0.02, 0.001),               // ERC20 Min Val Sent
    exp(2.0, 0.5),                        // ERC20 Max Val Sent
    exp(0.3, 0.1),                        // ERC20 Avg Val Sent
    pois(15.0, 5.0),                      // ERC20 Uniq Sent Token Name
    pois(10.0, 3.0),                      // ERC20 Uniq Rec Token Name
];

/// Distribution table for the normal regime, same ordering.
const NORMAL_DRAWS: [Draw; FEATURE_COUNT] = [
    exp(15.0, 5.0),                       // Avg min between sent tnx
    exp(20.0, 5.0),                       // Avg min between received tnx
    Draw::Uniform { lo: 10000.0, hi: 100000.0 }, // Time Diff between first and last (Mins)
    pois(40.0, 5.0),                      // Sent_tnx
    pois(35.0, 5.0),                      // Received_tnx
    pois(1.0, 0.0),                       // Number of Created Contracts
    pois(25.0, 5.0),                      // Unique Received From Addresses
    pois(20.0, 5.0),                      // Unique Sent To Addresses
    exp_floor(0.3, 0.001),                // Min Value Received
    exp(1.5, 0.5),                        // Max Value Received
    exp(0.6, 0.2),                        // Avg Value Received
    exp_floor(0.2, 0.001),                // Min Val Sent
    exp(1.2, 0.3),                        // Max Val Sent
    exp(0.5, 0.1),                        // Avg Val Sent
    exp_floor(0.05, 0.001),               // Min Value Sent To Contract
    exp(0.3, 0.1),                        // Max Value Sent To Contract
    exp(0.1, 0.05),                       // Avg Value Sent To Contract
    pois(80.0, 10.0),                     // Total Transactions (Including Tnx to Create Contract)
    exp(12.0, 3.0),                       // Total Ether Sent
    exp(10.0, 2.0),                       // Total Ether Received
    exp(0.3, 0.1),                        // Total Ether Sent Contracts
    Draw::Gaussian { mean: 1.5, std: 1.0 }, // Total Ether Balance
    pois(60.0, 10.0),                     // Total ERC20 Tnxs
    exp(4.0, 1.0),                        // ERC20 Total Ether Received
    exp(3.0, 1.0),                        // ERC20 Total Ether Sent
    exp(0.2, 0.1),                        // ERC20 Total Ether Sent Contract
    pois(15.0, 5.0),                      // ERC20 Uniq Sent Addr
    pois(12.0, 3.0),                      // ERC20 Uniq Rec Addr
    pois(15.0, 5.0),                      // ERC20 Uniq Sent Addr.1
    pois(1.0, 0.0),                       // ERC20 Uniq Rec Contract Addr
    exp(25.0, 5.0),                       // ERC20 Avg Time Between Sent Tnx
    exp(30.0, 5.0),                       // ERC20 Avg Time Between Rec Tnx
    exp(35.0, 5.0),                       // ERC20 Avg Time Between Contract Tnx
    exp_floor(0.08, 0.001),               // ERC20 Min Val Rec
    exp(0.6, 0.2),                        // ERC20 Max Val Rec
    exp(0.15, 0.05),                      // ERC20 Avg Val Rec
    exp_floor(0.06, 0.001),               // ERC20 Min Val Sent
    exp(0.5, 0.1),                        // ERC20 Max Val Sent
    exp(0.12, 0.03),                      // ERC20 Avg Val Sent
    pois(4.0, 1.0),                       // ERC20 Uniq Sent Token Name
    pois(3.0, 1.0),                       // ERC20 Uniq Rec Token Name
];

/// Derive the deterministic seed for an address.
///
/// SHA-256 over the lowercased address string, first four digest bytes
/// read big-endian. Case variants of the same address share a seed.
pub fn seed_for(address: &str) -> u32 {
    let digest = Sha256::digest(address.to_lowercase().as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Which regime a seed lands in
pub fn regime_for(seed: u32) -> Regime {
    if seed % 100 < HIGH_RISK_REGIME_PERCENT {
        Regime::HighRisk
    } else {
        Regime::Normal
    }
}

/// Deterministic feature synthesizer.
///
/// Stateless: every call re-derives the seed from the address, so
/// synthesis is safe to share across threads and across processes.
#[derive(Debug, Clone, Default)]
pub struct FeatureSynthesizer;

impl FeatureSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Synthesize the full feature vector for an address.
    ///
    /// Draws happen in declared feature order from a single seeded RNG,
    /// so the sequence (and therefore every value) is reproducible.
    pub fn synthesize(&self, address: &str) -> FeatureVector {
        let seed = seed_for(address);
        let regime = regime_for(seed);
        let mut rng = StdRng::seed_from_u64(seed as u64);

        debug!(
            "🧬 Synthesizing features: seed={} regime={:?}",
            seed, regime
        );

        let draws: &[Draw; FEATURE_COUNT] = match regime {
            Regime::HighRisk => &HIGH_RISK_DRAWS,
            Regime::Normal => &NORMAL_DRAWS,
        };

        let mut features = FeatureVector::with_capacity(FEATURE_COUNT);
        for (name, draw) in FEATURE_NAMES.iter().zip(draws.iter()) {
            features.push(name.to_string(), draw.sample(&mut rng));
        }

        features
    }

    /// Regime lookup without synthesizing the vector
    pub fn regime(&self, address: &str) -> Regime {
        regime_for(seed_for(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_seed_is_case_insensitive() {
        let lower = seed_for(&VITALIK.to_lowercase());
        let mixed = seed_for(VITALIK);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let synth = FeatureSynthesizer::new();
        let first = synth.synthesize(VITALIK);
        let second = synth.synthesize(VITALIK);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.0, b.0);
            assert_eq!(a.1, b.1, "feature {} drifted between calls", a.0);
        }
    }

    #[test]
    fn test_vector_is_complete_and_finite() {
        let synth = FeatureSynthesizer::new();
        let features = synth.synthesize("0x1234567890123456789012345678901234567890");

        assert_eq!(features.len(), FEATURE_COUNT);
        for (name, value) in features.iter() {
            assert!(value.is_finite(), "feature {} is not finite", name);
            assert!(value >= 0.0, "feature {} is negative", name);
        }
    }

    #[test]
    fn test_feature_names_follow_declared_order() {
        let synth = FeatureSynthesizer::new();
        let features = synth.synthesize(VITALIK);

        for (entry, expected) in features.iter().zip(FEATURE_NAMES.iter()) {
            assert_eq!(entry.0, *expected);
        }
    }

    #[test]
    fn test_regimes_differ_in_activity_level() {
        let synth = FeatureSynthesizer::new();

        // Seeds place these two addresses in opposite regimes
        let high = "0x0000000000000000000000000000000000000004";
        assert_eq!(synth.regime(high), Regime::HighRisk);
        assert_eq!(synth.regime(VITALIK), Regime::Normal);

        let high_features = synth.synthesize(high);
        let normal_features = synth.synthesize(VITALIK);

        let high_sent = high_features.get("Sent_tnx").unwrap();
        let normal_sent = normal_features.get("Sent_tnx").unwrap();

        // Poisson(150)+50 vs Poisson(40)+5 practically never cross
        assert!(high_sent > 100.0, "high-regime Sent_tnx too low: {}", high_sent);
        assert!(normal_sent < 100.0, "normal-regime Sent_tnx too high: {}", normal_sent);
    }

    #[test]
    fn test_different_addresses_produce_different_vectors() {
        let synth = FeatureSynthesizer::new();
        let a = synth.synthesize("0x1111111111111111111111111111111111111111");
        let b = synth.synthesize("0x2222222222222222222222222222222222222222");

        let differing = a
            .iter()
            .zip(b.iter())
            .filter(|(x, y)| x.1 != y.1)
            .count();
        assert!(differing > 0);
    }
}
