//! Listing snapshots pushed in by the shelter listings side.
//!
//! The engine never reaches out to storage. Whatever listings arrive with a
//! questionnaire submission or through the listings endpoint are recorded
//! here so a single pet can later be scored on demand.

use crate::models::PetAttributes;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where the engine looks up a pet it has not scored yet
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn listing(&self, pet_id: &str) -> Option<PetAttributes>;

    /// Remember the latest snapshot of each listing
    async fn record_many(&self, pets: &[PetAttributes]);
}

/// In-memory listing snapshots keyed by pet id
pub struct ListingRegistry {
    listings: Arc<RwLock<HashMap<String, PetAttributes>>>,
}

impl ListingRegistry {
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn upsert(&self, pet: PetAttributes) {
        let mut listings = self.listings.write().await;
        listings.insert(pet.pet_id.clone(), pet);
    }

    /// Later snapshots of the same pet replace earlier ones
    pub async fn upsert_many(&self, pets: &[PetAttributes]) {
        let mut listings = self.listings.write().await;
        for pet in pets {
            listings.insert(pet.pet_id.clone(), pet.clone());
        }
    }

    pub async fn remove(&self, pet_id: &str) -> Option<PetAttributes> {
        let mut listings = self.listings.write().await;
        listings.remove(pet_id)
    }

    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ListingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingSource for ListingRegistry {
    async fn listing(&self, pet_id: &str) -> Option<PetAttributes> {
        let listings = self.listings.read().await;
        listings.get(pet_id).cloned()
    }

    async fn record_many(&self, pets: &[PetAttributes]) {
        self.upsert_many(pets).await;
        tracing::trace!("Recorded {} listing snapshots", pets.len());
    }
}
