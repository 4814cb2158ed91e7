use crate::models::{
    AdopterProfile, CareLevel, Dimension, DimensionResult, EnergyLevel, ExperienceLevel,
    KidsAtHome, KidsCompatibility, LivingSpace, PetAttributes, PetSize, ScoringPolicy, Species,
    Verdict,
};

/// Build a result, or skip the dimension when its weight disables it
#[inline]
fn result(
    dimension: Dimension,
    sub_score: u8,
    verdict: Verdict,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    let weight = policy.weights.weight_for(dimension);
    if weight <= 0.0 {
        return None;
    }

    Some(DimensionResult {
        dimension,
        sub_score,
        verdict,
        weight,
        hard: policy.is_hard(dimension),
    })
}

#[inline]
fn unknown(dimension: Dimension, policy: &ScoringPolicy) -> Option<DimensionResult> {
    result(dimension, policy.unknown_score, Verdict::Unknown, policy)
}

/// Symmetric ordinal distance: 100 / 60 / 20 by default
#[inline]
fn by_distance(dimension: Dimension, distance: u8, policy: &ScoringPolicy) -> Option<DimensionResult> {
    let (sub_score, verdict) = match distance {
        0 => (policy.steps.exact, Verdict::Match),
        1 => (policy.steps.one_step, Verdict::Partial),
        _ => (policy.steps.two_steps, Verdict::Mismatch),
    };
    result(dimension, sub_score, verdict, policy)
}

/// One-sided shortfall: meeting or exceeding the need is a full match, and a
/// two-step shortfall is a definitional incompatibility
#[inline]
fn by_shortfall(
    dimension: Dimension,
    offered: u8,
    needed: u8,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    let (sub_score, verdict) = match needed.saturating_sub(offered) {
        0 => (policy.steps.exact, Verdict::Match),
        1 => (policy.steps.one_step, Verdict::Partial),
        _ => (0, Verdict::Mismatch),
    };
    result(dimension, sub_score, verdict, policy)
}

pub fn score_living_space(
    home: LivingSpace,
    needed: Option<LivingSpace>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    match needed {
        Some(needed) => by_shortfall(Dimension::LivingSpace, home.rank(), needed.rank(), policy),
        None => unknown(Dimension::LivingSpace, policy),
    }
}

pub fn score_energy(
    tolerance: EnergyLevel,
    pet_energy: Option<EnergyLevel>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    match pet_energy {
        Some(pet_energy) => by_distance(
            Dimension::Energy,
            tolerance.rank().abs_diff(pet_energy.rank()),
            policy,
        ),
        None => unknown(Dimension::Energy, policy),
    }
}

pub fn score_experience(
    adopter: ExperienceLevel,
    needed: Option<ExperienceLevel>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    match needed {
        Some(needed) => by_shortfall(Dimension::Experience, adopter.rank(), needed.rank(), policy),
        None => unknown(Dimension::Experience, policy),
    }
}

/// Any shortfall in tolerance for the household's children is disqualifying
pub fn score_kids(
    household: KidsAtHome,
    compatibility: Option<KidsCompatibility>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    match compatibility {
        Some(compatibility) if compatibility.rank() >= household.rank() => {
            result(Dimension::Kids, policy.steps.exact, Verdict::Match, policy)
        }
        Some(_) => result(Dimension::Kids, 0, Verdict::Mismatch, policy),
        None => unknown(Dimension::Kids, policy),
    }
}

pub fn score_special_care(
    capacity: CareLevel,
    needs: Option<CareLevel>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    match needs {
        Some(needs) => by_shortfall(Dimension::SpecialCare, capacity.rank(), needs.rank(), policy),
        None => unknown(Dimension::SpecialCare, policy),
    }
}

/// Categorical preference filter; skipped entirely when no preference was given
fn score_preference<T: PartialEq>(
    dimension: Dimension,
    preferred: Option<T>,
    actual: Option<T>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    let preferred = preferred?;
    match actual {
        Some(actual) if actual == preferred => {
            result(dimension, policy.steps.exact, Verdict::Match, policy)
        }
        Some(_) => result(dimension, 0, Verdict::Mismatch, policy),
        None => unknown(dimension, policy),
    }
}

pub fn score_species(
    preferred: Option<Species>,
    actual: Option<Species>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    score_preference(Dimension::Species, preferred, actual, policy)
}

pub fn score_size(
    preferred: Option<PetSize>,
    actual: Option<PetSize>,
    policy: &ScoringPolicy,
) -> Option<DimensionResult> {
    score_preference(Dimension::Size, preferred, actual, policy)
}

/// Run every dimension scorer, in canonical order, dropping skipped dimensions
///
/// A listing that carries no shelter data at all, compared against an
/// adopter without preferences, has nothing to compare and skips every
/// dimension. Unreadable listings and partially filled ones still score
/// their gaps as unknown.
pub fn score_dimensions(
    profile: &AdopterProfile,
    pet: &PetAttributes,
    policy: &ScoringPolicy,
) -> Vec<DimensionResult> {
    let has_preferences = profile.species_preference.is_some() || profile.size_preference.is_some();
    if !pet.has_scoring_data() && !pet.has_unreadable_data() && !has_preferences {
        return Vec::new();
    }

    [
        score_living_space(profile.living_space, pet.ideal_living_space, policy),
        score_energy(profile.energy_tolerance, pet.energy_level, policy),
        score_experience(profile.experience_level, pet.experience_needed, policy),
        score_kids(profile.kids_at_home, pet.kids_compatibility, policy),
        score_special_care(profile.special_care_capacity, pet.special_care_needs, policy),
        score_species(profile.species_preference, pet.species, policy),
        score_size(profile.size_preference, pet.size, policy),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdoptionStatus;

    fn policy() -> ScoringPolicy {
        ScoringPolicy::default()
    }

    #[test]
    fn test_living_space_shortfall() {
        let p = policy();

        let exact = score_living_space(LivingSpace::HouseNoYard, Some(LivingSpace::HouseNoYard), &p).unwrap();
        assert_eq!((exact.sub_score, exact.verdict), (100, Verdict::Match));

        let surplus = score_living_space(LivingSpace::HouseWithYard, Some(LivingSpace::Apartment), &p).unwrap();
        assert_eq!((surplus.sub_score, surplus.verdict), (100, Verdict::Match));

        let one_short = score_living_space(LivingSpace::Apartment, Some(LivingSpace::HouseNoYard), &p).unwrap();
        assert_eq!((one_short.sub_score, one_short.verdict), (60, Verdict::Partial));

        let two_short = score_living_space(LivingSpace::Apartment, Some(LivingSpace::HouseWithYard), &p).unwrap();
        assert_eq!((two_short.sub_score, two_short.verdict), (0, Verdict::Mismatch));
        assert!(two_short.is_hard_mismatch());
    }

    #[test]
    fn test_energy_distance_is_symmetric() {
        let p = policy();

        let low_high = score_energy(EnergyLevel::Low, Some(EnergyLevel::High), &p).unwrap();
        let high_low = score_energy(EnergyLevel::High, Some(EnergyLevel::Low), &p).unwrap();
        assert_eq!(low_high.sub_score, 20);
        assert_eq!(low_high, high_low);
        assert!(!low_high.is_hard_mismatch());

        let one_off = score_energy(EnergyLevel::Medium, Some(EnergyLevel::High), &p).unwrap();
        assert_eq!((one_off.sub_score, one_off.verdict), (60, Verdict::Partial));
    }

    #[test]
    fn test_experience_incompatibility() {
        let p = policy();

        let result = score_experience(ExperienceLevel::Novice, Some(ExperienceLevel::Experienced), &p).unwrap();
        assert_eq!((result.sub_score, result.verdict), (0, Verdict::Mismatch));
        assert!(!result.hard);

        let covered = score_experience(ExperienceLevel::Experienced, Some(ExperienceLevel::Novice), &p).unwrap();
        assert_eq!(covered.sub_score, 100);
    }

    #[test]
    fn test_kids_compatibility() {
        let p = policy();

        let young_with_older_only = score_kids(KidsAtHome::Young, Some(KidsCompatibility::OlderKids), &p).unwrap();
        assert!(young_with_older_only.is_hard_mismatch());
        assert_eq!(young_with_older_only.sub_score, 0);

        let no_kids = score_kids(KidsAtHome::NoKids, Some(KidsCompatibility::AdultsOnly), &p).unwrap();
        assert_eq!((no_kids.sub_score, no_kids.verdict), (100, Verdict::Match));

        let all_ages = score_kids(KidsAtHome::Young, Some(KidsCompatibility::AllAges), &p).unwrap();
        assert_eq!(all_ages.verdict, Verdict::Match);
    }

    #[test]
    fn test_special_care_incompatibility() {
        let p = policy();

        let result = score_special_care(CareLevel::Routine, Some(CareLevel::Full), &p).unwrap();
        assert!(result.is_hard_mismatch());

        let stretched = score_special_care(CareLevel::Limited, Some(CareLevel::Full), &p).unwrap();
        assert_eq!((stretched.sub_score, stretched.verdict), (60, Verdict::Partial));
    }

    #[test]
    fn test_unknown_pet_value() {
        let p = policy();

        let result = score_kids(KidsAtHome::Young, None, &p).unwrap();
        assert_eq!(result.sub_score, 60);
        assert_eq!(result.verdict, Verdict::Unknown);
        assert!(!result.is_hard_mismatch());
        assert!(!result.is_informative());
    }

    #[test]
    fn test_preference_skipped_without_preference() {
        let p = policy();

        assert!(score_species(None, Some(Species::Dog), &p).is_none());
        assert!(score_size(None, None, &p).is_none());
    }

    #[test]
    fn test_preference_hard_filter() {
        let p = policy();

        let mismatch = score_species(Some(Species::Cat), Some(Species::Dog), &p).unwrap();
        assert_eq!((mismatch.sub_score, mismatch.verdict), (0, Verdict::Mismatch));
        assert!(mismatch.is_hard_mismatch());

        let matched = score_size(Some(PetSize::Small), Some(PetSize::Small), &p).unwrap();
        assert_eq!(matched.verdict, Verdict::Match);

        let unknown = score_size(Some(PetSize::Small), None, &p).unwrap();
        assert_eq!(unknown.verdict, Verdict::Unknown);
    }

    #[test]
    fn test_zero_weight_disables_dimension() {
        let mut p = policy();
        p.weights.energy = 0.0;

        assert!(score_energy(EnergyLevel::Low, Some(EnergyLevel::High), &p).is_none());
    }

    fn profile() -> AdopterProfile {
        AdopterProfile {
            adopter_id: "adopter".to_string(),
            version: 1,
            living_space: LivingSpace::Apartment,
            energy_tolerance: EnergyLevel::Medium,
            experience_level: ExperienceLevel::Familiar,
            kids_at_home: KidsAtHome::NoKids,
            special_care_capacity: CareLevel::Limited,
            species_preference: None,
            size_preference: None,
        }
    }

    #[test]
    fn test_empty_listing_without_preferences_skips_everything() {
        let empty = PetAttributes::bare("empty", AdoptionStatus::Available);
        assert!(score_dimensions(&profile(), &empty, &policy()).is_empty());
    }

    #[test]
    fn test_empty_listing_with_preference_is_unknown() {
        let mut adopter = profile();
        adopter.species_preference = Some(Species::Dog);
        let empty = PetAttributes::bare("empty", AdoptionStatus::Available);

        let results = score_dimensions(&adopter, &empty, &policy());
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| r.verdict == Verdict::Unknown));
    }

    #[test]
    fn test_partial_and_unreadable_listings_keep_unknowns() {
        let mut partial = PetAttributes::bare("partial", AdoptionStatus::Available);
        partial.energy_level = Some(EnergyLevel::Medium);
        let results = score_dimensions(&profile(), &partial, &policy());
        assert_eq!(results.len(), 5);
        assert_eq!(results.iter().filter(|r| r.verdict == Verdict::Unknown).count(), 4);

        let mut garbled = PetAttributes::bare("garbled", AdoptionStatus::Available);
        garbled.unreadable_fields = vec!["energyLevel".to_string()];
        let results = score_dimensions(&profile(), &garbled, &policy());
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.verdict == Verdict::Unknown));
    }
}
