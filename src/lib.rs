//! Pet Match - adopter to pet compatibility matching and ranking
//!
//! Turns an adopter questionnaire into per-pet compatibility scores with
//! reasons, ranks the candidates, and keeps each adopter's ranked set in a
//! versioned cache so single-pet lookups never mix old and new answers.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize_adopter, normalize_pet, Ranker, ValidationError};
pub use crate::models::{
    AdopterProfile, CompatibilityScore, Label, PetAttributes, RecommendationSet, ScoringPolicy,
};
pub use crate::services::{EngineError, ListingRegistry, MatchingEngine, RecommendationCache};
