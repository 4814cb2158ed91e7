use crate::core::{filters::is_eligible, normalize_adopter, normalize_pets, Ranker, ValidationError};
use crate::models::{
    AdopterProfile, CompatibilityScore, PetAttributes, QuestionnaireAnswers, RawPetListing,
    RecommendationSet,
};
use crate::services::cache::{CacheStats, PutOutcome, RecommendationCache, ScoreLookup};
use crate::services::listings::ListingSource;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidAnswers(#[from] ValidationError),

    #[error("Ranking worker failed: {0}")]
    WorkerError(#[from] tokio::task::JoinError),
}

/// Entry points the rest of the application calls
///
/// Cloning is cheap; every clone shares the same cache and listings.
#[derive(Clone)]
pub struct MatchingEngine {
    ranker: Arc<Ranker>,
    cache: Arc<RecommendationCache>,
    listings: Arc<dyn ListingSource>,
}

impl MatchingEngine {
    pub fn new(
        ranker: Ranker,
        cache: Arc<RecommendationCache>,
        listings: Arc<dyn ListingSource>,
    ) -> Self {
        Self {
            ranker: Arc::new(ranker),
            cache,
            listings,
        }
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Normalize raw answers and listings, then submit
    pub async fn submit_answers(
        &self,
        answers: &QuestionnaireAnswers,
        listings: &[RawPetListing],
    ) -> Result<Arc<RecommendationSet>, EngineError> {
        let profile = normalize_adopter(answers)?;
        let pets = normalize_pets(listings);
        self.submit(profile, pets).await
    }

    /// Replace the adopter's recommendations with a fresh ranking
    ///
    /// The previous set stops being served before ranking starts. If another
    /// submission for the same adopter overtakes this one, its result stays
    /// cached; this call returns that newer set when it is already stored, and
    /// otherwise its own ranking uncached.
    pub async fn submit(
        &self,
        profile: AdopterProfile,
        pets: Vec<PetAttributes>,
    ) -> Result<Arc<RecommendationSet>, EngineError> {
        let version = self.cache.invalidate(&profile.adopter_id).await;
        let profile = profile.with_version(version);

        self.listings.record_many(&pets).await;

        let ranker = Arc::clone(&self.ranker);
        let set = tokio::task::spawn_blocking(move || ranker.rank(&profile, &pets)).await?;
        let set = Arc::new(set);

        match self.cache.put(Arc::clone(&set)).await {
            PutOutcome::Stored => {
                tracing::info!(
                    "Stored recommendations for {} (v{}): {} matching, {} not matching",
                    set.adopter_id,
                    version,
                    set.matching.len(),
                    set.not_matching.len()
                );
                Ok(set)
            }
            PutOutcome::StaleWriteDiscarded { attempted, current } => {
                tracing::debug!(
                    "Discarded recommendations for {} (v{} < v{})",
                    set.adopter_id,
                    attempted,
                    current
                );
                match self.cache.get(&set.adopter_id).await {
                    Some(newer) if newer.version() > attempted => Ok(newer),
                    _ => Ok(set),
                }
            }
        }
    }

    pub async fn recommendations(&self, adopter_id: &str) -> Option<Arc<RecommendationSet>> {
        self.cache.get(adopter_id).await
    }

    /// One pet's score for an adopter
    ///
    /// Pets missing from the cached set are scored against the profile that
    /// set was computed from and merged into it. Returns `None` when the
    /// adopter has no set, the pet is unknown or not available, or the
    /// adopter resubmitted while the pet was being scored.
    pub async fn get_score(&self, adopter_id: &str, pet_id: &str) -> Option<CompatibilityScore> {
        let set = match self.cache.lookup_score(adopter_id, pet_id).await {
            ScoreLookup::Hit(score) => return Some(score),
            ScoreLookup::Absent => return None,
            ScoreLookup::PetMissing(set) => set,
        };

        let pet = self.listings.listing(pet_id).await?;
        if !is_eligible(&pet) {
            tracing::debug!("Pet {} is not available, not scoring for {}", pet_id, adopter_id);
            return None;
        }

        let score = self.ranker.score_pet(&set.profile, &pet, Utc::now());
        match self.cache.merge_score(adopter_id, score).await {
            Some(stored) => {
                tracing::debug!(
                    "Scored pet {} on demand for {}: {}",
                    pet_id,
                    adopter_id,
                    stored.overall_score
                );
                Some(stored)
            }
            None => {
                tracing::debug!("Discarded on-demand score for {}: profile changed", adopter_id);
                None
            }
        }
    }

    /// Stop serving the adopter's recommendations; returns the new version
    pub async fn invalidate(&self, adopter_id: &str) -> u64 {
        self.cache.invalidate(adopter_id).await
    }

    pub async fn record_listings(&self, pets: &[PetAttributes]) {
        self.listings.record_many(pets).await;
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
