//! Product identity, name uniqueness and the soft-delete lifecycle.

use std::sync::Arc;

use shoplist_core::{Entity, NameScope, ProductId, ShoppingError, ShoppingResult};
use shoplist_infra::ProductPort;
use shoplist_products::Product;

use crate::ledger::AisleProductLedger;

pub struct ProductCatalog {
    products: Arc<dyn ProductPort>,
    ledger: Arc<AisleProductLedger>,
}

impl ProductCatalog {
    pub fn new(products: Arc<dyn ProductPort>, ledger: Arc<AisleProductLedger>) -> Self {
        Self { products, ledger }
    }

    /// Whether no other active product shares the candidate's name.
    pub async fn is_name_unique(&self, candidate: &Product) -> ShoppingResult<bool> {
        Ok(match self.products.get_by_name(&candidate.name).await? {
            Some(existing) => existing.id == candidate.id,
            None => true,
        })
    }

    pub async fn add(&self, product: Product) -> ShoppingResult<ProductId> {
        ensure_named(&product.name)?;

        if !self.is_name_unique(&product).await? {
            return Err(ShoppingError::duplicate_name(NameScope::Product, product.name));
        }
        if !product.is_new() && self.products.get(product.id).await?.is_some() {
            return Err(ShoppingError::duplicate_entity(format!("product {} already exists", product.id)));
        }

        let name = product.name.clone();
        let id = self.products.add(product).await?;
        tracing::info!(product_id = %id, %name, "product added");
        Ok(id)
    }

    /// Overwrite a product's attributes. The deleted flag is kept as stored;
    /// use [`ProductCatalog::remove`] and [`ProductCatalog::restore`] for that.
    pub async fn update(&self, mut product: Product) -> ShoppingResult<()> {
        ensure_named(&product.name)?;

        let stored = self.require(product.id).await?;
        if !self.is_name_unique(&product).await? {
            return Err(ShoppingError::duplicate_name(NameScope::Product, product.name));
        }

        product.is_deleted = stored.is_deleted;
        let id = product.id;
        self.products.update(product).await?;
        tracing::debug!(product_id = %id, "product updated");
        Ok(())
    }

    /// Set the in-stock flag. Returns the updated product, `None` when unknown
    /// or deleted.
    pub async fn update_status(&self, id: ProductId, in_stock: bool) -> ShoppingResult<Option<Product>> {
        self.modify(id, |p| p.in_stock = in_stock).await
    }

    /// Set the needed quantity. Returns the updated product, `None` when unknown
    /// or deleted.
    pub async fn update_qty_needed(&self, id: ProductId, qty: u32) -> ShoppingResult<Option<Product>> {
        self.modify(id, |p| p.qty_needed = qty).await
    }

    /// Add a product with the source's attributes under `new_name` and put it
    /// at the end of every aisle the source is in.
    pub async fn copy(&self, source: &Product, new_name: &str) -> ShoppingResult<ProductId> {
        let id = self.add(source.copied_as(new_name)).await?;

        let placements = self.ledger.get_for_product(source.id).await?;
        for placement in &placements {
            self.ledger.append(placement.aisle_id, id).await?;
        }

        tracing::info!(source_id = %source.id, product_id = %id, aisles = placements.len(), "product copied");
        Ok(id)
    }

    /// Take a product off every list and mark it deleted. The row stays.
    ///
    /// Removing an unknown or already deleted product does nothing.
    pub async fn remove(&self, product: &Product) -> ShoppingResult<()> {
        let Some(stored) = self.products.get(product.id).await? else {
            return Ok(());
        };

        self.ledger.remove_for_product(stored.id).await?;
        if stored.is_active() {
            self.products.soft_delete(stored.id).await?;
            tracing::info!(product_id = %stored.id, name = %stored.name, "product deleted");
        }
        Ok(())
    }

    /// Bring a soft-deleted product back. Its name must still be free.
    pub async fn restore(&self, id: ProductId) -> ShoppingResult<()> {
        let stored = self.require(id).await?;
        if stored.is_active() {
            return Ok(());
        }
        if !self.is_name_unique(&stored).await? {
            return Err(ShoppingError::duplicate_name(NameScope::Product, stored.name));
        }

        self.products.restore(id).await?;
        tracing::info!(product_id = %id, name = %stored.name, "product restored");
        Ok(())
    }

    /// Active product by id.
    pub async fn get(&self, id: ProductId) -> ShoppingResult<Option<Product>> {
        Ok(self.products.get(id).await?.filter(Product::is_active))
    }

    pub async fn get_including_deleted(&self, id: ProductId) -> ShoppingResult<Option<Product>> {
        Ok(self.products.get(id).await?)
    }

    pub async fn get_by_name(&self, name: &str) -> ShoppingResult<Option<Product>> {
        Ok(self.products.get_by_name(name).await?)
    }

    pub async fn get_deleted_by_name(&self, name: &str) -> ShoppingResult<Option<Product>> {
        Ok(self.products.get_deleted_by_name(name).await?)
    }

    pub async fn get_all(&self) -> ShoppingResult<Vec<Product>> {
        Ok(self.products.get_all_active().await?)
    }

    pub async fn get_all_including_deleted(&self) -> ShoppingResult<Vec<Product>> {
        Ok(self.products.get_all_including_deleted().await?)
    }

    async fn modify<F>(&self, id: ProductId, change: F) -> ShoppingResult<Option<Product>>
    where
        F: FnOnce(&mut Product),
    {
        let Some(mut product) = self.get(id).await? else {
            return Ok(None);
        };
        change(&mut product);
        self.products.update(product.clone()).await?;
        tracing::debug!(product_id = %id, "product modified");
        Ok(Some(product))
    }

    async fn require(&self, id: ProductId) -> ShoppingResult<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| ShoppingError::invalid_product(format!("product {id} does not exist")))
    }
}

fn ensure_named(name: &str) -> ShoppingResult<()> {
    if name.trim().is_empty() {
        return Err(ShoppingError::validation("product name must not be blank"));
    }
    Ok(())
}
