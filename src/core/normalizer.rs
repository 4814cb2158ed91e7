use crate::models::{
    AdopterProfile, AdoptionStatus, CareLevel, EnergyLevel, ExperienceLevel, KidsAnswer,
    KidsAtHome, KidsCompatibility, LivingSpace, PetAttributes, PetSize, QuestionnaireAnswers,
    RawPetListing, Species,
};
use serde_json::Value;
use thiserror::Error;

/// A required questionnaire answer is absent or not one of its allowed values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} has unsupported value '{value}' (expected one of: {expected})")]
    Invalid {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field } | ValidationError::Invalid { field, .. } => *field,
        }
    }
}

/// A listing that cannot be keyed at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetDataError {
    #[error("pet listing has no id")]
    MissingId,
}

const LIVING_SPACE_VALUES: &str = "apartment, house-no-yard, house-with-yard";
const ENERGY_VALUES: &str = "low, medium, high";
const EXPERIENCE_VALUES: &str = "none, some, experienced";
const KIDS_VALUES: &str = "none, older, young";
const CARE_VALUES: &str = "none, limited, full";
const SPECIES_VALUES: &str = "dog, cat, rabbit, bird, small-mammal, reptile, other";
const SIZE_VALUES: &str = "small, medium, large";

/// Trim, lowercase and hyphenate a free-form answer
pub fn canonical_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn parse_living_space(token: &str) -> Option<LivingSpace> {
    match canonical_token(token).as_str() {
        "apartment" | "flat" | "condo" => Some(LivingSpace::Apartment),
        "house-no-yard" | "house-without-yard" | "house" => Some(LivingSpace::HouseNoYard),
        "house-with-yard" | "yard" | "house-yard" => Some(LivingSpace::HouseWithYard),
        _ => None,
    }
}

pub fn parse_energy(token: &str) -> Option<EnergyLevel> {
    match canonical_token(token).as_str() {
        "low" | "calm" => Some(EnergyLevel::Low),
        "medium" | "moderate" => Some(EnergyLevel::Medium),
        "high" | "active" => Some(EnergyLevel::High),
        _ => None,
    }
}

pub fn parse_experience(token: &str) -> Option<ExperienceLevel> {
    match canonical_token(token).as_str() {
        "none" | "beginner" | "first-time" => Some(ExperienceLevel::Novice),
        "some" | "intermediate" => Some(ExperienceLevel::Familiar),
        "experienced" | "expert" | "experienced-only" => Some(ExperienceLevel::Experienced),
        _ => None,
    }
}

pub fn parse_kids_at_home(token: &str) -> Option<KidsAtHome> {
    match canonical_token(token).as_str() {
        "none" | "no" | "false" => Some(KidsAtHome::NoKids),
        "older" | "older-kids" => Some(KidsAtHome::Older),
        "young" | "young-kids" | "yes" | "true" => Some(KidsAtHome::Young),
        _ => None,
    }
}

pub fn parse_kids_compatibility(token: &str) -> Option<KidsCompatibility> {
    match canonical_token(token).as_str() {
        "adults-only" | "no-kids" | "none" => Some(KidsCompatibility::AdultsOnly),
        "older-kids" | "older" => Some(KidsCompatibility::OlderKids),
        "all-ages" | "good-with-kids" | "yes" => Some(KidsCompatibility::AllAges),
        _ => None,
    }
}

pub fn parse_care(token: &str) -> Option<CareLevel> {
    match canonical_token(token).as_str() {
        "none" | "no" => Some(CareLevel::Routine),
        "limited" | "some" | "moderate" => Some(CareLevel::Limited),
        "full" | "high" => Some(CareLevel::Full),
        _ => None,
    }
}

pub fn parse_species(token: &str) -> Option<Species> {
    match canonical_token(token).as_str() {
        "dog" | "dogs" | "puppy" => Some(Species::Dog),
        "cat" | "cats" | "kitten" => Some(Species::Cat),
        "rabbit" | "bunny" => Some(Species::Rabbit),
        "bird" => Some(Species::Bird),
        "small-mammal" | "small-animal" | "hamster" | "guinea-pig" => Some(Species::SmallMammal),
        "reptile" => Some(Species::Reptile),
        "other" => Some(Species::Other),
        _ => None,
    }
}

pub fn parse_size(token: &str) -> Option<PetSize> {
    match canonical_token(token).as_str() {
        "small" => Some(PetSize::Small),
        "medium" => Some(PetSize::Medium),
        "large" | "big" => Some(PetSize::Large),
        _ => None,
    }
}

pub fn parse_status(token: &str) -> Option<AdoptionStatus> {
    match canonical_token(token).as_str() {
        "available" => Some(AdoptionStatus::Available),
        "pending" => Some(AdoptionStatus::Pending),
        "adopted" => Some(AdoptionStatus::Adopted),
        "on-hold" | "hold" => Some(AdoptionStatus::OnHold),
        _ => None,
    }
}

fn required<T>(
    field: &'static str,
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    expected: &'static str,
) -> Result<T, ValidationError> {
    let raw = match value {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(ValidationError::Missing { field }),
    };

    parse(raw).ok_or_else(|| ValidationError::Invalid {
        field,
        value: raw.to_string(),
        expected,
    })
}

fn preference<T>(
    field: &'static str,
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    expected: &'static str,
) -> Result<Option<T>, ValidationError> {
    let raw = match value {
        Some(raw) => raw,
        None => return Ok(None),
    };

    match canonical_token(raw).as_str() {
        "" | "any" | "no-preference" => Ok(None),
        _ => parse(raw).map(Some).ok_or_else(|| ValidationError::Invalid {
            field,
            value: raw.to_string(),
            expected,
        }),
    }
}

fn kids_at_home(answer: Option<&KidsAnswer>) -> Result<KidsAtHome, ValidationError> {
    match answer {
        Some(KidsAnswer::Flag(true)) => Ok(KidsAtHome::Young),
        Some(KidsAnswer::Flag(false)) => Ok(KidsAtHome::NoKids),
        Some(KidsAnswer::Text(text)) => {
            required("kidsAtHome", Some(text.as_str()), parse_kids_at_home, KIDS_VALUES)
        }
        None => Err(ValidationError::Missing {
            field: "kidsAtHome",
        }),
    }
}

/// Map raw questionnaire answers into a canonical profile
///
/// Fields are checked in questionnaire order and the first failure is
/// returned. The profile version is left at 0; the cache assigns it.
pub fn normalize_adopter(raw: &QuestionnaireAnswers) -> Result<AdopterProfile, ValidationError> {
    let adopter_id = match raw.adopter_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ValidationError::Missing { field: "adopterId" }),
    };

    Ok(AdopterProfile {
        adopter_id,
        version: 0,
        living_space: required(
            "livingSpace",
            raw.living_space.as_deref(),
            parse_living_space,
            LIVING_SPACE_VALUES,
        )?,
        energy_tolerance: required(
            "energyTolerance",
            raw.energy_tolerance.as_deref(),
            parse_energy,
            ENERGY_VALUES,
        )?,
        experience_level: required(
            "experienceLevel",
            raw.experience_level.as_deref(),
            parse_experience,
            EXPERIENCE_VALUES,
        )?,
        kids_at_home: kids_at_home(raw.kids_at_home.as_ref())?,
        special_care_capacity: required(
            "specialCareCapacity",
            raw.special_care_capacity.as_deref(),
            parse_care,
            CARE_VALUES,
        )?,
        species_preference: preference(
            "speciesPreference",
            raw.species_preference.as_deref(),
            parse_species,
            SPECIES_VALUES,
        )?,
        size_preference: preference(
            "sizePreference",
            raw.size_preference.as_deref(),
            parse_size,
            SIZE_VALUES,
        )?,
    })
}

/// Parse one optional listing field, remembering values we could not read
///
/// Null and blank text count as not listed. Any other non-text JSON value is
/// unreadable.
fn lenient<T>(
    field: &'static str,
    value: Option<&Value>,
    parse: fn(&str) -> Option<T>,
    unreadable: &mut Vec<String>,
) -> Option<T> {
    let parsed = match value? {
        Value::Null => return None,
        Value::String(raw) if raw.trim().is_empty() => return None,
        Value::String(raw) => parse(raw),
        _ => None,
    };
    if parsed.is_none() {
        unreadable.push(field.to_string());
    }
    parsed
}

/// Map a raw listing into comparable attributes
///
/// Missing fields become unknown. If any field holds a value we do not
/// recognise, every scoring attribute is blanked so the pet is compared on
/// nothing rather than on half-trusted data; status and listing date survive.
pub fn normalize_pet(raw: &RawPetListing) -> Result<PetAttributes, PetDataError> {
    let pet_id = raw.pet_id.trim();
    if pet_id.is_empty() {
        return Err(PetDataError::MissingId);
    }

    let mut unreadable = Vec::new();
    let species = lenient("species", raw.species.as_ref(), parse_species, &mut unreadable);
    let size = lenient("size", raw.size.as_ref(), parse_size, &mut unreadable);
    let ideal_living_space = lenient(
        "idealLivingSpace",
        raw.ideal_living_space.as_ref(),
        parse_living_space,
        &mut unreadable,
    );
    let energy_level = lenient(
        "energyLevel",
        raw.energy_level.as_ref(),
        parse_energy,
        &mut unreadable,
    );
    let experience_needed = lenient(
        "experienceNeeded",
        raw.experience_needed.as_ref(),
        parse_experience,
        &mut unreadable,
    );
    let kids_compatibility = lenient(
        "kidsCompatibility",
        raw.kids_compatibility.as_ref(),
        parse_kids_compatibility,
        &mut unreadable,
    );
    let special_care_needs = lenient(
        "specialCareNeeds",
        raw.special_care_needs.as_ref(),
        parse_care,
        &mut unreadable,
    );
    let adoption_status = lenient(
        "adoptionStatus",
        raw.adoption_status.as_ref(),
        parse_status,
        &mut unreadable,
    )
    .unwrap_or(AdoptionStatus::Unknown);

    let mut pet = PetAttributes::bare(pet_id, adoption_status);
    pet.listed_at = raw.listed_at;

    if unreadable.is_empty() {
        pet.species = species;
        pet.size = size;
        pet.ideal_living_space = ideal_living_space;
        pet.energy_level = energy_level;
        pet.experience_needed = experience_needed;
        pet.kids_compatibility = kids_compatibility;
        pet.special_care_needs = special_care_needs;
    } else {
        tracing::warn!(
            "Listing {} has unreadable fields {:?}, scoring it without shelter data",
            pet_id,
            unreadable
        );
        pet.unreadable_fields = unreadable;
    }

    Ok(pet)
}

/// Normalize a batch of listings, dropping only those without an id
pub fn normalize_pets(raws: &[RawPetListing]) -> Vec<PetAttributes> {
    raws.iter()
        .filter_map(|raw| match normalize_pet(raw) {
            Ok(pet) => Some(pet),
            Err(e) => {
                tracing::warn!("Skipping listing: {}", e);
                None
            }
        })
        .collect()
}
