use async_trait::async_trait;

use shoplist_core::ProductId;
use shoplist_products::Product;

use super::StoreResult;

/// Product rows. Rows are never hard-deleted.
#[async_trait]
pub trait ProductPort: Send + Sync {
    /// Any row, soft-deleted or not.
    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Active product by trimmed, case-insensitive name.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>>;

    /// Soft-deleted product by trimmed, case-insensitive name.
    async fn get_deleted_by_name(&self, name: &str) -> StoreResult<Option<Product>>;

    async fn get_all_active(&self) -> StoreResult<Vec<Product>>;

    async fn get_all_including_deleted(&self) -> StoreResult<Vec<Product>>;

    /// Insert a row; an unset id is replaced with a fresh one.
    async fn add(&self, product: Product) -> StoreResult<ProductId>;

    async fn add_many(&self, products: Vec<Product>) -> StoreResult<Vec<ProductId>>;

    async fn update(&self, product: Product) -> StoreResult<()>;

    async fn update_many(&self, products: Vec<Product>) -> StoreResult<()>;

    /// Mark the row deleted. Memberships are the caller's business.
    async fn soft_delete(&self, id: ProductId) -> StoreResult<()>;

    /// Clear the deleted mark.
    async fn restore(&self, id: ProductId) -> StoreResult<()>;
}
