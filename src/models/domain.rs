use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much room the adopter's home offers, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LivingSpace {
    Apartment,
    HouseNoYard,
    HouseWithYard,
}

impl LivingSpace {
    pub fn rank(self) -> u8 {
        match self {
            LivingSpace::Apartment => 0,
            LivingSpace::HouseNoYard => 1,
            LivingSpace::HouseWithYard => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    pub fn rank(self) -> u8 {
        match self {
            EnergyLevel::Low => 0,
            EnergyLevel::Medium => 1,
            EnergyLevel::High => 2,
        }
    }
}

/// Handling experience, either what the adopter has or what the pet needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    #[serde(rename = "none")]
    Novice,
    #[serde(rename = "some")]
    Familiar,
    Experienced,
}

impl ExperienceLevel {
    pub fn rank(self) -> u8 {
        match self {
            ExperienceLevel::Novice => 0,
            ExperienceLevel::Familiar => 1,
            ExperienceLevel::Experienced => 2,
        }
    }
}

/// Children in the adopter's household, ordered by how much tolerance they demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KidsAtHome {
    #[serde(rename = "none")]
    NoKids,
    Older,
    Young,
}

impl KidsAtHome {
    pub fn rank(self) -> u8 {
        match self {
            KidsAtHome::NoKids => 0,
            KidsAtHome::Older => 1,
            KidsAtHome::Young => 2,
        }
    }
}

/// Which households a pet can live with, ordered by tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KidsCompatibility {
    AdultsOnly,
    OlderKids,
    AllAges,
}

impl KidsCompatibility {
    pub fn rank(self) -> u8 {
        match self {
            KidsCompatibility::AdultsOnly => 0,
            KidsCompatibility::OlderKids => 1,
            KidsCompatibility::AllAges => 2,
        }
    }
}

/// Special-care level: adopter capacity or pet needs. `Routine` is "none" on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CareLevel {
    #[serde(rename = "none")]
    Routine,
    Limited,
    Full,
}

impl CareLevel {
    pub fn rank(self) -> u8 {
        match self {
            CareLevel::Routine => 0,
            CareLevel::Limited => 1,
            CareLevel::Full => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Species {
    Dog,
    Cat,
    Rabbit,
    Bird,
    SmallMammal,
    Reptile,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdoptionStatus {
    Available,
    Pending,
    Adopted,
    OnHold,
    Unknown,
}

/// Canonical adopter questionnaire, immutable per submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdopterProfile {
    pub adopter_id: String,
    /// Assigned by the recommendation cache when the questionnaire is (re)submitted
    #[serde(default)]
    pub version: u64,
    pub living_space: LivingSpace,
    pub energy_tolerance: EnergyLevel,
    pub experience_level: ExperienceLevel,
    pub kids_at_home: KidsAtHome,
    pub special_care_capacity: CareLevel,
    #[serde(default)]
    pub species_preference: Option<Species>,
    #[serde(default)]
    pub size_preference: Option<PetSize>,
}

impl AdopterProfile {
    pub fn with_version(self, version: u64) -> Self {
        Self { version, ..self }
    }
}

/// Read-only snapshot of a pet listing. `None` means the shelter did not say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetAttributes {
    pub pet_id: String,
    #[serde(default)]
    pub species: Option<Species>,
    #[serde(default)]
    pub size: Option<PetSize>,
    #[serde(default)]
    pub ideal_living_space: Option<LivingSpace>,
    #[serde(default)]
    pub energy_level: Option<EnergyLevel>,
    #[serde(default)]
    pub experience_needed: Option<ExperienceLevel>,
    #[serde(default)]
    pub kids_compatibility: Option<KidsCompatibility>,
    #[serde(default)]
    pub special_care_needs: Option<CareLevel>,
    pub adoption_status: AdoptionStatus,
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
    /// Fields whose shelter values could not be understood
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable_fields: Vec<String>,
}

impl PetAttributes {
    /// A listing with nothing but an id and a status
    pub fn bare(pet_id: impl Into<String>, adoption_status: AdoptionStatus) -> Self {
        Self {
            pet_id: pet_id.into(),
            species: None,
            size: None,
            ideal_living_space: None,
            energy_level: None,
            experience_needed: None,
            kids_compatibility: None,
            special_care_needs: None,
            adoption_status,
            listed_at: None,
            unreadable_fields: Vec::new(),
        }
    }

    pub fn has_unreadable_data(&self) -> bool {
        !self.unreadable_fields.is_empty()
    }

    /// Whether the shelter listed any attribute a dimension compares against
    pub fn has_scoring_data(&self) -> bool {
        self.species.is_some()
            || self.size.is_some()
            || self.ideal_living_space.is_some()
            || self.energy_level.is_some()
            || self.experience_needed.is_some()
            || self.kids_compatibility.is_some()
            || self.special_care_needs.is_some()
    }
}

/// Comparison dimensions, in the canonical order used for every tie-break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    LivingSpace,
    Energy,
    Experience,
    Kids,
    SpecialCare,
    Species,
    Size,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::LivingSpace,
        Dimension::Energy,
        Dimension::Experience,
        Dimension::Kids,
        Dimension::SpecialCare,
        Dimension::Species,
        Dimension::Size,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::LivingSpace => "living-space",
            Dimension::Energy => "energy",
            Dimension::Experience => "experience",
            Dimension::Kids => "kids",
            Dimension::SpecialCare => "special-care",
            Dimension::Species => "species",
            Dimension::Size => "size",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Match,
    Partial,
    Mismatch,
    Unknown,
}

/// One dimension's comparison, consumed immediately by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionResult {
    pub dimension: Dimension,
    pub sub_score: u8,
    pub verdict: Verdict,
    pub weight: f64,
    /// A mismatch on a hard dimension disqualifies the pet outright
    pub hard: bool,
}

impl DimensionResult {
    pub fn is_hard_mismatch(&self) -> bool {
        self.hard && self.verdict == Verdict::Mismatch
    }

    pub fn is_informative(&self) -> bool {
        self.verdict != Verdict::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Suitable,
    Conditional,
    NotSuitable,
}

/// Scored compatibility between one adopter and one pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityScore {
    pub adopter_id: String,
    pub pet_id: String,
    pub overall_score: u8,
    pub label: Label,
    pub reasons: Vec<String>,
    pub computed_at: DateTime<Utc>,
    /// Version of the adopter profile the score was computed from
    pub profile_version: u64,
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
}

impl CompatibilityScore {
    pub fn is_matching(&self) -> bool {
        self.overall_score > 0
    }
}

/// Ranked results for one adopter, replaced wholesale on retake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub adopter_id: String,
    pub profile: AdopterProfile,
    pub matching: Vec<CompatibilityScore>,
    pub not_matching: Vec<CompatibilityScore>,
    pub computed_at: DateTime<Utc>,
}

impl RecommendationSet {
    pub fn empty(profile: AdopterProfile, computed_at: DateTime<Utc>) -> Self {
        Self {
            adopter_id: profile.adopter_id.clone(),
            profile,
            matching: Vec::new(),
            not_matching: Vec::new(),
            computed_at,
        }
    }

    pub fn version(&self) -> u64 {
        self.profile.version
    }

    /// Matching pets first, then the excluded ones
    pub fn all(&self) -> impl Iterator<Item = &CompatibilityScore> {
        self.matching.iter().chain(self.not_matching.iter())
    }

    pub fn find(&self, pet_id: &str) -> Option<&CompatibilityScore> {
        self.all().find(|score| score.pet_id == pet_id)
    }

    pub fn len(&self) -> usize {
        self.matching.len() + self.not_matching.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scoring weights, used as ratios of their sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub living_space: f64,
    pub energy: f64,
    pub experience: f64,
    pub kids: f64,
    pub special_care: f64,
    pub species: f64,
    pub size: f64,
}

impl ScoringWeights {
    pub fn weight_for(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::LivingSpace => self.living_space,
            Dimension::Energy => self.energy,
            Dimension::Experience => self.experience,
            Dimension::Kids => self.kids,
            Dimension::SpecialCare => self.special_care,
            Dimension::Species => self.species,
            Dimension::Size => self.size,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            living_space: 0.30,
            energy: 0.20,
            experience: 0.20,
            kids: 0.15,
            special_care: 0.15,
            species: 0.10,
            size: 0.10,
        }
    }
}

/// Score cut-offs for the SUITABLE and CONDITIONAL labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelThresholds {
    pub suitable: u8,
    pub conditional: u8,
}

impl LabelThresholds {
    pub fn label_for(&self, overall_score: u8) -> Label {
        if overall_score >= self.suitable {
            Label::Suitable
        } else if overall_score >= self.conditional {
            Label::Conditional
        } else {
            Label::NotSuitable
        }
    }
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            suitable: 70,
            conditional: 40,
        }
    }
}

/// Sub-scores by ordinal distance between adopter and pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalSteps {
    pub exact: u8,
    pub one_step: u8,
    pub two_steps: u8,
}

impl Default for OrdinalSteps {
    fn default() -> Self {
        Self {
            exact: 100,
            one_step: 60,
            two_steps: 20,
        }
    }
}

/// Everything the scorers and aggregator need besides the inputs themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub weights: ScoringWeights,
    pub thresholds: LabelThresholds,
    pub steps: OrdinalSteps,
    /// Sub-score given when the shelter did not provide a value
    pub unknown_score: u8,
    pub hard_dimensions: Vec<Dimension>,
}

impl ScoringPolicy {
    pub fn is_hard(&self, dimension: Dimension) -> bool {
        self.hard_dimensions.contains(&dimension)
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: LabelThresholds::default(),
            steps: OrdinalSteps::default(),
            unknown_score: 60,
            hard_dimensions: vec![
                Dimension::LivingSpace,
                Dimension::Kids,
                Dimension::SpecialCare,
                Dimension::Species,
                Dimension::Size,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_thresholds() {
        let thresholds = LabelThresholds::default();
        assert_eq!(thresholds.label_for(100), Label::Suitable);
        assert_eq!(thresholds.label_for(70), Label::Suitable);
        assert_eq!(thresholds.label_for(69), Label::Conditional);
        assert_eq!(thresholds.label_for(40), Label::Conditional);
        assert_eq!(thresholds.label_for(39), Label::NotSuitable);
        assert_eq!(thresholds.label_for(0), Label::NotSuitable);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&LivingSpace::HouseWithYard).unwrap(),
            "\"house-with-yard\""
        );
        assert_eq!(
            serde_json::to_string(&Label::NotSuitable).unwrap(),
            "\"NOT_SUITABLE\""
        );
        assert_eq!(serde_json::to_string(&Verdict::Mismatch).unwrap(), "\"mismatch\"");
        assert_eq!(serde_json::to_string(&CareLevel::Routine).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&ExperienceLevel::Familiar).unwrap(), "\"some\"");
    }

    #[test]
    fn test_dimension_canonical_order() {
        let mut shuffled = vec![Dimension::Size, Dimension::Kids, Dimension::LivingSpace];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Dimension::LivingSpace, Dimension::Kids, Dimension::Size]
        );
    }
}
