use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

/// Raw questionnaire answers as the adopter submitted them
///
/// Every field is optional on the wire so the normalizer, not serde, decides
/// which missing answers are fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireAnswers {
    #[validate(length(max = 128))]
    #[serde(default, alias = "adopter_id")]
    pub adopter_id: Option<String>,
    #[serde(default)]
    pub living_space: Option<String>,
    #[serde(default)]
    pub energy_tolerance: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default, alias = "hasYoungKids")]
    pub kids_at_home: Option<KidsAnswer>,
    #[serde(default)]
    pub special_care_capacity: Option<String>,
    #[serde(default)]
    pub species_preference: Option<String>,
    #[serde(default)]
    pub size_preference: Option<String>,
}

/// The kids question was a yes/no toggle in older questionnaires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KidsAnswer {
    Flag(bool),
    Text(String),
}

/// Pet listing as supplied by the listings collaborator
///
/// Attribute fields keep whatever JSON the shelter sent so a wrongly typed
/// value reaches the normalizer as unreadable data instead of failing the
/// whole request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPetListing {
    #[serde(default, alias = "pet_id", deserialize_with = "listing_id")]
    pub pet_id: String,
    #[serde(default)]
    pub species: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub ideal_living_space: Option<Value>,
    #[serde(default)]
    pub energy_level: Option<Value>,
    #[serde(default)]
    pub experience_needed: Option<Value>,
    #[serde(default)]
    pub kids_compatibility: Option<Value>,
    #[serde(default)]
    pub special_care_needs: Option<Value>,
    #[serde(default)]
    pub adoption_status: Option<Value>,
    #[serde(default, deserialize_with = "listing_timestamp")]
    pub listed_at: Option<DateTime<Utc>>,
}

/// Numeric ids are accepted as their decimal text; anything else reads as missing
fn listing_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    })
}

/// A listing date that is not RFC 3339 text is treated as absent
fn listing_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        _ => None,
    })
}

/// Request to (re)compute recommendations after a questionnaire submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitQuestionnaireRequest {
    #[validate(nested)]
    pub answers: QuestionnaireAnswers,
    #[validate(length(max = 10000))]
    #[serde(default)]
    pub pets: Vec<RawPetListing>,
}

/// Batch of listing snapshots pushed by the listings collaborator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertListingsRequest {
    #[validate(length(min = 1, max = 10000))]
    pub pets: Vec<RawPetListing>,
}
