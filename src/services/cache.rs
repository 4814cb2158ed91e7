use crate::core::ranker::merge_score;
use crate::models::{CompatibilityScore, RecommendationSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Outcome of a `put`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Stored,
    /// The set was computed from a profile older than the adopter's current one
    StaleWriteDiscarded { attempted: u64, current: u64 },
}

/// Outcome of a single-pet lookup
#[derive(Debug, Clone)]
pub enum ScoreLookup {
    Hit(CompatibilityScore),
    /// The adopter has a set, but it holds no score for this pet
    PetMissing(Arc<RecommendationSet>),
    Absent,
}

/// Per-adopter recommendation cache with versioned writes
///
/// Sets live in a moka cache and may be evicted by capacity or TTL. The
/// version counters live beside it and are never evicted, so a stale
/// in-flight write stays stale even after its adopter's set was dropped.
///
/// Writers for one adopter serialize on that adopter's version mutex; readers
/// go straight to moka and only ever see whole sets.
pub struct RecommendationCache {
    sets: moka::future::Cache<String, Arc<RecommendationSet>>,
    /// One slot per adopter ever seen, kept for the life of the process.
    /// Grows with the number of distinct adopters; dropping a slot would let
    /// an evicted adopter's version restart at 0.
    versions: RwLock<HashMap<String, Arc<Mutex<u64>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RecommendationCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let sets = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            sets,
            versions: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    async fn version_slot(&self, adopter_id: &str) -> Arc<Mutex<u64>> {
        if let Some(slot) = self.versions.read().await.get(adopter_id) {
            return Arc::clone(slot);
        }

        let mut versions = self.versions.write().await;
        Arc::clone(
            versions
                .entry(adopter_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(0))),
        )
    }

    /// Latest profile version accepted for this adopter (0 if never seen)
    pub async fn current_version(&self, adopter_id: &str) -> u64 {
        match self.versions.read().await.get(adopter_id) {
            Some(slot) => *slot.lock().await,
            None => 0,
        }
    }

    pub async fn get(&self, adopter_id: &str) -> Option<Arc<RecommendationSet>> {
        match self.sets.get(adopter_id).await {
            Some(set) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Recommendation cache hit: {}", adopter_id);
                Some(set)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Recommendation cache miss: {}", adopter_id);
                None
            }
        }
    }

    pub async fn lookup_score(&self, adopter_id: &str, pet_id: &str) -> ScoreLookup {
        let set = match self.get(adopter_id).await {
            Some(set) => set,
            None => return ScoreLookup::Absent,
        };

        match set.find(pet_id) {
            Some(score) => ScoreLookup::Hit(score.clone()),
            None => {
                tracing::trace!("No score for pet {} in set for {}", pet_id, adopter_id);
                ScoreLookup::PetMissing(set)
            }
        }
    }

    /// Store a set, replacing the adopter's previous one in a single step
    ///
    /// Discarded if the set's profile version is older than the newest
    /// version this adopter has been invalidated to.
    pub async fn put(&self, set: Arc<RecommendationSet>) -> PutOutcome {
        let slot = self.version_slot(&set.adopter_id).await;
        let mut current = slot.lock().await;

        let attempted = set.version();
        if attempted < *current {
            tracing::debug!(
                "Discarding stale recommendation set for {} (v{} < v{})",
                set.adopter_id,
                attempted,
                *current
            );
            return PutOutcome::StaleWriteDiscarded {
                attempted,
                current: *current,
            };
        }

        *current = attempted;
        self.sets.insert(set.adopter_id.clone(), set).await;
        PutOutcome::Stored
    }

    /// Drop the adopter's set and advance their version
    ///
    /// Returns the new version. Once this returns no read can observe the
    /// dropped set, and no write computed from an older profile will land.
    pub async fn invalidate(&self, adopter_id: &str) -> u64 {
        let slot = self.version_slot(adopter_id).await;
        let mut current = slot.lock().await;

        *current += 1;
        self.sets.invalidate(adopter_id).await;

        tracing::debug!("Invalidated recommendations for {} (now v{})", adopter_id, *current);
        *current
    }

    /// Add an on-demand score to the adopter's cached set
    ///
    /// Returns the score the set now holds for that pet, which is the one
    /// already there if another lookup merged it first. `None` when the set
    /// is gone or was computed from a different profile version.
    pub async fn merge_score(
        &self,
        adopter_id: &str,
        score: CompatibilityScore,
    ) -> Option<CompatibilityScore> {
        let slot = self.version_slot(adopter_id).await;
        let current = slot.lock().await;

        if score.profile_version != *current {
            return None;
        }

        let set = match self.sets.get(adopter_id).await {
            Some(set) if set.version() == score.profile_version => set,
            _ => return None,
        };

        if let Some(existing) = set.find(&score.pet_id) {
            return Some(existing.clone());
        }

        let merged = merge_score(&set, score.clone());
        self.sets.insert(adopter_id.to_string(), Arc::new(merged)).await;
        Some(score)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            entries: self.sets.entry_count(),
            hit_count: hits,
            miss_count: misses,
            hit_rate: if lookups > 0 {
                hits as f64 / lookups as f64
            } else {
                0.0
            },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}
