// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AdopterProfile, AdoptionStatus, CareLevel, CompatibilityScore, Dimension, DimensionResult,
    EnergyLevel, ExperienceLevel, KidsAtHome, KidsCompatibility, Label, LabelThresholds,
    LivingSpace, OrdinalSteps, PetAttributes, PetSize, RecommendationSet, ScoringPolicy,
    ScoringWeights, Species, Verdict,
};
pub use requests::{
    KidsAnswer, QuestionnaireAnswers, RawPetListing, SubmitQuestionnaireRequest,
    UpsertListingsRequest,
};
pub use responses::{ErrorResponse, HealthResponse, InvalidateResponse, UpsertListingsResponse};
