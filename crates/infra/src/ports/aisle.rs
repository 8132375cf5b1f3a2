use async_trait::async_trait;

use shoplist_core::{AisleId, LocationId};
use shoplist_locations::Aisle;

use super::StoreResult;

/// Aisle rows.
#[async_trait]
pub trait AislePort: Send + Sync {
    async fn get(&self, id: AisleId) -> StoreResult<Option<Aisle>>;

    async fn get_all(&self) -> StoreResult<Vec<Aisle>>;

    async fn get_for_location(&self, location_id: LocationId) -> StoreResult<Vec<Aisle>>;

    /// Every default aisle, one per location.
    async fn get_defaults(&self) -> StoreResult<Vec<Aisle>>;

    async fn get_default_for(&self, location_id: LocationId) -> StoreResult<Option<Aisle>>;

    /// Insert a row; an unset id is replaced with a fresh one.
    async fn add(&self, aisle: Aisle) -> StoreResult<AisleId>;

    async fn update(&self, aisle: Aisle) -> StoreResult<()>;

    async fn update_many(&self, aisles: Vec<Aisle>) -> StoreResult<()>;

    /// Delete the aisle row only. Memberships are not touched.
    async fn remove(&self, aisle: &Aisle) -> StoreResult<()>;
}
