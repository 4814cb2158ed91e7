// Service exports
pub mod cache;
pub mod engine;
pub mod listings;

pub use cache::{CacheStats, PutOutcome, RecommendationCache, ScoreLookup};
pub use engine::{EngineError, MatchingEngine};
pub use listings::{ListingRegistry, ListingSource};
