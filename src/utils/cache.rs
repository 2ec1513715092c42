//! High-Performance In-Memory Cache Module
//!
//! Thread-safe caching layer for risk assessment results.
//! Uses DashMap for concurrent access without lock contention.
//!
//! Features:
//! - TTL-based expiration (5 minutes default)
//! - Address normalization (lowercase)
//! - Cache HIT/MISS logging
//! - Thread-safe via DashMap

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::types::RiskAssessment;
use crate::utils::constants::DEFAULT_CACHE_TTL_SECS;

/// Cache entry with timestamp for TTL validation
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Cached assessment
    pub result: RiskAssessment,
    /// Time the entry was created
    pub created_at: Instant,
    /// TTL in seconds
    pub ttl_secs: u64,
}

impl CacheEntry {
    /// New entry with the default TTL
    pub fn new(result: RiskAssessment) -> Self {
        Self {
            result,
            created_at: Instant::now(),
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }

    /// Check whether this entry has expired
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > Duration::from_secs(self.ttl_secs)
    }

    /// Seconds remaining before expiry
    pub fn remaining_ttl(&self) -> u64 {
        let elapsed = self.created_at.elapsed().as_secs();
        self.ttl_secs.saturating_sub(elapsed)
    }
}

/// Shared assessment cache backed by DashMap.
/// Thread-safe without explicit locking.
#[derive(Clone)]
pub struct ScoreCache {
    /// Internal storage: lowercase address -> CacheEntry
    store: Arc<DashMap<String, CacheEntry>>,
    /// TTL in seconds
    ttl_secs: u64,
    /// Counters for statistics
    hits: Arc<std::sync::atomic::AtomicU64>,
    misses: Arc<std::sync::atomic::AtomicU64>,
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreCache {
    /// New cache with the default TTL (5 minutes)
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL_SECS)
    }

    /// New cache with a custom TTL
    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl_secs,
            hits: Arc::new(std::sync::atomic::AtomicU64::new(0)),
            misses: Arc::new(std::sync::atomic::AtomicU64::new(0)),
        }
    }

    /// Normalize an address to lowercase
    #[inline]
    fn normalize_address(address: &str) -> String {
        address.to_lowercase()
    }

    /// Get from cache with TTL validation.
    /// Returns Some(result) on a live HIT, None on MISS or expiry.
    pub fn get(&self, address: &str) -> Option<RiskAssessment> {
        let key = Self::normalize_address(address);

        if let Some(entry) = self.store.get(&key) {
            if entry.is_expired() {
                // Entry expired, remove and report a miss
                drop(entry); // Release read lock
                self.store.remove(&key);
                self.misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                debug!("📭 CACHE MISS (expired): {}", key);
                None
            } else {
                // Cache HIT!
                self.hits.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                let remaining = entry.remaining_ttl();
                info!("✅ CACHE HIT: {} (TTL: {}s remaining)", key, remaining);
                Some(entry.result.clone())
            }
        } else {
            // Cache MISS
            self.misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            debug!("📭 CACHE MISS: {}", key);
            None
        }
    }

    /// Insert into the cache with the configured TTL.
    /// Only successful assessments should be stored by callers.
    pub fn set(&self, address: &str, result: RiskAssessment) {
        let key = Self::normalize_address(address);
        let entry = CacheEntry {
            result,
            created_at: Instant::now(),
            ttl_secs: self.ttl_secs,
        };

        self.store.insert(key.clone(), entry);
        info!("💾 CACHE SET: {} (TTL: {}s)", key, self.ttl_secs);
    }

    /// Remove an entry from the cache
    #[allow(dead_code)]
    pub fn invalidate(&self, address: &str) {
        let key = Self::normalize_address(address);
        self.store.remove(&key);
        debug!("🗑️ CACHE INVALIDATE: {}", key);
    }

    /// Drop every expired entry, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired());
        let removed = before - self.store.len();
        if removed > 0 {
            info!("🧹 CACHE CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    /// Cache statistics snapshot
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(std::sync::atomic::Ordering::Relaxed);
        let misses = self.misses.load(std::sync::atomic::Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl_secs,
        }
    }

    /// Clear the whole cache
    #[allow(dead_code)]
    pub fn clear(&self) {
        self.store.clear();
        info!("🗑️ CACHE CLEARED");
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}
