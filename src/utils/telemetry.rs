//! Telemetry Module for CryptoGuard
//!
//! Collects anonymous statistics about scored addresses for:
//! - Operational monitoring (latency, fallback rate)
//! - Detection reporting (high-risk hits by origin)
//!
//! Privacy-first: no addresses stored, only counts and latencies

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Telemetry event types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DetectionKind {
    ModelHighRisk,
    HeuristicHighRisk,
    KnownRiskMatch,
    InvalidAddress,
    InferenceFault,
    FallbackServed,
}

impl DetectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionKind::ModelHighRisk => "model_high_risk",
            DetectionKind::HeuristicHighRisk => "heuristic_high_risk",
            DetectionKind::KnownRiskMatch => "known_risk_match",
            DetectionKind::InvalidAddress => "invalid_address",
            DetectionKind::InferenceFault => "inference_fault",
            DetectionKind::FallbackServed => "fallback_served",
        }
    }
}

/// Single telemetry event (anonymized)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Unix timestamp
    pub timestamp: u64,
    /// Kind of detection recorded
    pub kind: DetectionKind,
    /// Risk score at detection time (rounded to whole points)
    pub risk_score: f64,
    /// Scoring latency in milliseconds
    pub latency_ms: u64,
    /// Additional context (no PII)
    pub context: String,
}

impl TelemetryEvent {
    pub fn new(kind: DetectionKind, risk_score: f64, latency_ms: u64, context: String) -> Self {
        Self {
            timestamp: current_timestamp(),
            kind,
            risk_score: risk_score.round(),
            latency_ms,
            context,
        }
    }
}

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    /// Total addresses scored
    pub total_scored: u64,
    /// Total detections recorded
    pub total_detections: u64,
    /// Detections by kind
    pub detections_by_kind: HashMap<String, u64>,
    /// Average scoring latency (ms)
    pub avg_latency_ms: f64,
    /// High-risk verdicts (highlight metric)
    pub high_risk_detected: u64,
    /// Responses served by the fallback model
    pub fallback_served: u64,
    /// Period start timestamp
    pub period_start: u64,
    /// Period end timestamp
    pub period_end: u64,
}

impl TelemetryStats {
    /// Export as JSON for API
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Session summary printed at shutdown
    pub fn session_summary(&self) -> String {
        let period_secs = self.period_end.saturating_sub(self.period_start);

        format!(
            r#"
╔══════════════════════════════════════════════════════════════════╗
║           🛡️ CRYPTOGUARD - SESSION REPORT                        ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║   📊 Session length: {} seconds                                  ║
║                                                                  ║
║   🔍 Addresses Scored:         {:>10}                           ║
║   🚨 Detections Recorded:      {:>10}                           ║
║   🔴 High-Risk Verdicts:       {:>10}                           ║
║   🩹 Fallback Responses:       {:>10}                           ║
║                                                                  ║
║   ⚡ Avg Scoring Latency:      {:>10.2}ms                        ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#,
            period_secs,
            self.total_scored,
            self.total_detections,
            self.high_risk_detected,
            self.fallback_served,
            self.avg_latency_ms,
        )
    }
}

/// Main telemetry collector
pub struct TelemetryCollector {
    /// Event buffer (in-memory)
    events: Arc<RwLock<Vec<TelemetryEvent>>>,
    /// Atomic counters for fast updates
    total_scored: AtomicU64,
    total_detections: AtomicU64,
    high_risk_detected: AtomicU64,
    fallback_served: AtomicU64,
    total_latency_ms: AtomicU64,
    /// Detection counters by kind
    detection_counts: Arc<RwLock<HashMap<DetectionKind, u64>>>,
    /// Session start time
    session_start: u64,
    /// Export directory
    export_dir: PathBuf,
    /// Max events in memory before flush
    max_buffer_size: usize,
}

impl TelemetryCollector {
    /// Create new collector with default settings
    pub fn new() -> Self {
        Self::with_config(PathBuf::from("./telemetry"), 1000)
    }

    /// Create collector with custom config
    pub fn with_config(export_dir: PathBuf, max_buffer_size: usize) -> Self {
        // Ensure export directory exists
        let _ = fs::create_dir_all(&export_dir);

        Self {
            events: Arc::new(RwLock::new(Vec::with_capacity(max_buffer_size))),
            total_scored: AtomicU64::new(0),
            total_detections: AtomicU64::new(0),
            high_risk_detected: AtomicU64::new(0),
            fallback_served: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            detection_counts: Arc::new(RwLock::new(HashMap::new())),
            session_start: current_timestamp(),
            export_dir,
            max_buffer_size,
        }
    }

    /// Record a scored address with no detection
    pub fn record_scoring(&self, latency_ms: u64) {
        self.total_scored.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
    }

    /// Record a detection event
    pub fn record_detection(&self, event: TelemetryEvent) {
        // Update atomic counters
        self.total_scored.fetch_add(1, Ordering::Relaxed);
        self.total_detections.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(event.latency_ms, Ordering::Relaxed);

        // High-risk verdicts and fallback responses tracked separately
        match event.kind {
            DetectionKind::ModelHighRisk
            | DetectionKind::HeuristicHighRisk
            | DetectionKind::KnownRiskMatch => {
                self.high_risk_detected.fetch_add(1, Ordering::Relaxed);
            }
            DetectionKind::FallbackServed => {
                self.fallback_served.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }

        // Update detection kind counter
        if let Ok(mut counts) = self.detection_counts.write() {
            *counts.entry(event.kind.clone()).or_insert(0) += 1;
        }

        // Buffer event
        if let Ok(mut events) = self.events.write() {
            events.push(event);

            // Auto-flush if buffer full
            if events.len() >= self.max_buffer_size {
                let events_to_flush = std::mem::take(&mut *events);
                drop(events); // Release lock before I/O
                let _ = self.flush_events(&events_to_flush);
            }
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let total_scored = self.total_scored.load(Ordering::Relaxed);
        let total_detections = self.total_detections.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);
        let high_risk = self.high_risk_detected.load(Ordering::Relaxed);
        let fallback = self.fallback_served.load(Ordering::Relaxed);

        let avg_latency = if total_scored > 0 {
            total_latency as f64 / total_scored as f64
        } else {
            0.0
        };

        let detections_by_kind = self
            .detection_counts
            .read()
            .map(|counts| {
                counts
                    .iter()
                    .map(|(k, v)| (k.as_str().to_string(), *v))
                    .collect()
            })
            .unwrap_or_default();

        TelemetryStats {
            total_scored,
            total_detections,
            detections_by_kind,
            avg_latency_ms: avg_latency,
            high_risk_detected: high_risk,
            fallback_served: fallback,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Export current stats to JSON file
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        let stats = self.get_stats();
        let filename = format!("stats_{}.json", current_timestamp());
        let path = self.export_dir.join(filename);

        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    /// Flush buffered events to disk
    fn flush_events(&self, events: &[TelemetryEvent]) -> Result<(), std::io::Error> {
        if events.is_empty() {
            return Ok(());
        }

        let filename = format!("events_{}.jsonl", current_timestamp());
        let path = self.export_dir.join(filename);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        for event in events {
            if let Ok(json) = serde_json::to_string(event) {
                writeln!(file, "{}", json)?;
            }
        }

        Ok(())
    }

    /// Reset counters (for new reporting period)
    #[allow(dead_code)]
    pub fn reset(&self) {
        self.total_scored.store(0, Ordering::Relaxed);
        self.total_detections.store(0, Ordering::Relaxed);
        self.high_risk_detected.store(0, Ordering::Relaxed);
        self.fallback_served.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);

        if let Ok(mut counts) = self.detection_counts.write() {
            counts.clear();
        }

        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_event_creation() {
        let event = TelemetryEvent::new(
            DetectionKind::KnownRiskMatch,
            87.3,
            25,
            "registry hit".to_string(),
        );

        assert_eq!(event.kind, DetectionKind::KnownRiskMatch);
        assert_eq!(event.risk_score, 87.0); // Rounded
        assert_eq!(event.latency_ms, 25);
    }

    #[test]
    fn test_collector_basic() {
        let collector = TelemetryCollector::new();

        // Record some scorings
        collector.record_scoring(10);
        collector.record_scoring(20);

        // Record a detection
        let event = TelemetryEvent::new(DetectionKind::ModelHighRisk, 92.0, 15, "Test".to_string());
        collector.record_detection(event);

        let stats = collector.get_stats();
        assert_eq!(stats.total_scored, 3);
        assert_eq!(stats.total_detections, 1);
        assert_eq!(stats.high_risk_detected, 1);
    }

    #[test]
    fn test_fallback_counter() {
        let collector = TelemetryCollector::new();

        let event =
            TelemetryEvent::new(DetectionKind::FallbackServed, 50.0, 5, "stub model".to_string());
        collector.record_detection(event);

        let stats = collector.get_stats();
        assert_eq!(stats.fallback_served, 1);
        assert_eq!(stats.high_risk_detected, 0);
    }

    #[test]
    fn test_stats_json_export() {
        let stats = TelemetryStats {
            total_scored: 1000,
            total_detections: 50,
            high_risk_detected: 25,
            avg_latency_ms: 23.5,
            ..Default::default()
        };

        let json = stats.to_json();
        assert!(json.contains("1000"));
        assert!(json.contains("high_risk_detected"));
    }

    #[test]
    fn test_session_summary() {
        let stats = TelemetryStats {
            total_scored: 50000,
            total_detections: 500,
            high_risk_detected: 150,
            avg_latency_ms: 18.5,
            period_start: 1704067200,
            period_end: 1704672000,
            ..Default::default()
        };

        let report = stats.session_summary();
        assert!(report.contains("50000"));
        assert!(report.contains("150"));
    }
}
