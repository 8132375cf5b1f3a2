use async_trait::async_trait;

use shoplist_core::LocationId;
use shoplist_locations::{Location, LocationWithAisles};

use super::StoreResult;

/// Location rows, plus the nested read used by cascade operations.
#[async_trait]
pub trait LocationPort: Send + Sync {
    async fn get(&self, id: LocationId) -> StoreResult<Option<Location>>;

    /// Lookup by trimmed, case-insensitive name.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Location>>;

    async fn get_all(&self) -> StoreResult<Vec<Location>>;

    /// The home location, if first-run seeding has happened.
    async fn get_home(&self) -> StoreResult<Option<Location>>;

    /// Insert a row; an unset id is replaced with a fresh one.
    async fn add(&self, location: Location) -> StoreResult<LocationId>;

    async fn update(&self, location: Location) -> StoreResult<()>;

    /// Delete the location row only. Aisles are not touched.
    async fn remove(&self, location: &Location) -> StoreResult<()>;

    /// The location with its aisles (ordered by rank) and each aisle's
    /// memberships (ordered by rank) joined with their products.
    async fn get_with_aisles(&self, id: LocationId) -> StoreResult<Option<LocationWithAisles>>;
}
