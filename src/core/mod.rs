// Core engine exports
pub mod dimensions;
pub mod explainer;
pub mod filters;
pub mod normalizer;
pub mod ranker;
pub mod scoring;

pub use dimensions::score_dimensions;
pub use explainer::explain;
pub use filters::{eligible_candidates, is_eligible};
pub use normalizer::{normalize_adopter, normalize_pet, normalize_pets, PetDataError, ValidationError};
pub use ranker::{merge_score, ranking_order, Ranker};
pub use scoring::aggregate;
