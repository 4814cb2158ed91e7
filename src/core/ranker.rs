use crate::core::{
    dimensions::score_dimensions,
    explainer::{explain, MAX_REASONS, UNREADABLE_LISTING},
    filters::eligible_candidates,
    scoring::aggregate,
};
use crate::models::{AdopterProfile, CompatibilityScore, PetAttributes, RecommendationSet, ScoringPolicy};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Candidate count from which scoring fans out across the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Ranks candidate pets for an adopter
///
/// # Pipeline Stages
/// 1. Eligibility filter (available pets, first listing per id)
/// 2. Dimension scoring
/// 3. Aggregation with hard-mismatch override
/// 4. Explanation
/// 5. Total ordering and matching / not-matching partition
#[derive(Debug, Clone)]
pub struct Ranker {
    policy: ScoringPolicy,
    parallel_threshold: usize,
}

impl Ranker {
    pub fn new(policy: ScoringPolicy, parallel_threshold: usize) -> Self {
        Self {
            policy,
            parallel_threshold: parallel_threshold.max(1),
        }
    }

    pub fn with_default_policy() -> Self {
        Self::new(ScoringPolicy::default(), DEFAULT_PARALLEL_THRESHOLD)
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Rank pets, stamping the results with the current time
    pub fn rank(&self, profile: &AdopterProfile, pets: &[PetAttributes]) -> RecommendationSet {
        self.rank_at(profile, pets, Utc::now())
    }

    /// Rank pets with an explicit timestamp
    ///
    /// For fixed inputs the result is identical on every call, whether or not
    /// scoring ran in parallel.
    pub fn rank_at(
        &self,
        profile: &AdopterProfile,
        pets: &[PetAttributes],
        computed_at: DateTime<Utc>,
    ) -> RecommendationSet {
        let candidates = eligible_candidates(pets);

        let mut scores: Vec<CompatibilityScore> = if candidates.len() >= self.parallel_threshold {
            candidates
                .par_iter()
                .map(|pet| self.score_pet(profile, pet, computed_at))
                .collect()
        } else {
            candidates
                .iter()
                .map(|pet| self.score_pet(profile, pet, computed_at))
                .collect()
        };

        scores.sort_by(ranking_order);

        let (matching, not_matching): (Vec<_>, Vec<_>) =
            scores.into_iter().partition(CompatibilityScore::is_matching);

        tracing::debug!(
            "Ranked {} candidates for adopter {} (v{}): {} matching, {} not matching",
            candidates.len(),
            profile.adopter_id,
            profile.version,
            matching.len(),
            not_matching.len()
        );

        RecommendationSet {
            adopter_id: profile.adopter_id.clone(),
            profile: profile.clone(),
            matching,
            not_matching,
            computed_at,
        }
    }

    /// Score a single pet through the same stages used by `rank`
    pub fn score_pet(
        &self,
        profile: &AdopterProfile,
        pet: &PetAttributes,
        computed_at: DateTime<Utc>,
    ) -> CompatibilityScore {
        let results = score_dimensions(profile, pet, &self.policy);
        let (overall_score, label) = aggregate(&results, &self.policy.thresholds);

        let mut reasons = explain(&results, label);
        if pet.has_unreadable_data() {
            reasons.truncate(MAX_REASONS - 1);
            reasons.push(UNREADABLE_LISTING.to_string());
        }

        CompatibilityScore {
            adopter_id: profile.adopter_id.clone(),
            pet_id: pet.pet_id.clone(),
            overall_score,
            label,
            reasons,
            computed_at,
            profile_version: profile.version,
            listed_at: pet.listed_at,
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

/// Score descending, then newer listings first, then pet id
pub fn ranking_order(a: &CompatibilityScore, b: &CompatibilityScore) -> Ordering {
    b.overall_score
        .cmp(&a.overall_score)
        .then_with(|| b.listed_at.cmp(&a.listed_at))
        .then_with(|| a.pet_id.cmp(&b.pet_id))
}

/// Copy of `set` with `score` placed in its bucket at its ranked position
///
/// A score for a pet already present replaces the old one.
pub fn merge_score(set: &RecommendationSet, score: CompatibilityScore) -> RecommendationSet {
    let mut merged = set.clone();
    merged.matching.retain(|s| s.pet_id != score.pet_id);
    merged.not_matching.retain(|s| s.pet_id != score.pet_id);

    let bucket = if score.is_matching() {
        &mut merged.matching
    } else {
        &mut merged.not_matching
    };
    let position = bucket
        .binary_search_by(|other| ranking_order(other, &score))
        .unwrap_or_else(|insert_at| insert_at);
    bucket.insert(position, score);

    merged
}
