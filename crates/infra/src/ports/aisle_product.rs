use async_trait::async_trait;

use shoplist_core::{AisleId, AisleProductId, ProductId};
use shoplist_locations::AisleProduct;

use super::StoreResult;

/// Aisle membership rows.
#[async_trait]
pub trait AisleProductPort: Send + Sync {
    async fn get(&self, id: AisleProductId) -> StoreResult<Option<AisleProduct>>;

    async fn get_all(&self) -> StoreResult<Vec<AisleProduct>>;

    /// Memberships of one aisle, ordered by rank.
    async fn get_for_aisle(&self, aisle_id: AisleId) -> StoreResult<Vec<AisleProduct>>;

    /// Every aisle a product currently sits in.
    async fn get_for_product(&self, product_id: ProductId) -> StoreResult<Vec<AisleProduct>>;

    /// Insert a row; an unset id is replaced with a fresh one.
    async fn add(&self, membership: AisleProduct) -> StoreResult<AisleProductId>;

    /// Batch insert, ids returned in input order.
    async fn add_many(&self, memberships: Vec<AisleProduct>) -> StoreResult<Vec<AisleProductId>>;

    async fn update(&self, membership: AisleProduct) -> StoreResult<()>;

    async fn update_many(&self, memberships: Vec<AisleProduct>) -> StoreResult<()>;

    /// Delete the given rows; ids that are already gone are ignored.
    async fn remove_many(&self, memberships: &[AisleProduct]) -> StoreResult<()>;
}
