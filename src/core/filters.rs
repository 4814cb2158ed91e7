use crate::models::{AdoptionStatus, PetAttributes};
use std::collections::HashSet;

/// Only pets currently up for adoption are ranked
#[inline]
pub fn is_eligible(pet: &PetAttributes) -> bool {
    pet.adoption_status == AdoptionStatus::Available
}

/// Eligible candidates in input order, keeping the first listing per pet id
pub fn eligible_candidates(pets: &[PetAttributes]) -> Vec<&PetAttributes> {
    let mut seen = HashSet::with_capacity(pets.len());

    pets.iter()
        .filter(|pet| is_eligible(pet))
        .filter(|pet| {
            let first = seen.insert(pet.pet_id.as_str());
            if !first {
                tracing::debug!("Dropping duplicate listing for pet {}", pet.pet_id);
            }
            first
        })
        .collect()
}
