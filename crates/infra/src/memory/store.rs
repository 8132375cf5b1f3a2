use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use shoplist_core::{AisleId, AisleProductId, Entity, LocationId, NameKey, ProductId};
use shoplist_locations::{
    Aisle, AisleEntry, AisleProduct, AisleWithProducts, Location, LocationKind, LocationWithAisles,
};
use shoplist_products::Product;

use super::table::Table;
use crate::ports::{AislePort, AisleProductPort, LocationPort, ProductPort, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    locations: Table<Location>,
    aisles: Table<Aisle>,
    aisle_products: Table<AisleProduct>,
    products: Table<Product>,
}

/// In-memory implementation of all four repository ports.
///
/// Intended for tests/dev and single-process apps. Guards are never held
/// across an `.await`: every port method does its work synchronously under the
/// lock and returns.
#[derive(Debug, Default)]
pub struct InMemoryShoppingStore {
    tables: RwLock<Tables>,
}

impl InMemoryShoppingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))
    }
}

fn by_rank<T, F>(rows: &mut [T], rank: F)
where
    F: Fn(&T) -> i32,
{
    rows.sort_by_key(|r| rank(r));
}

#[async_trait]
impl LocationPort for InMemoryShoppingStore {
    async fn get(&self, id: LocationId) -> StoreResult<Option<Location>> {
        Ok(self.read()?.locations.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Location>> {
        let key = NameKey::new(name);
        Ok(self
            .read()?
            .locations
            .iter()
            .find(|l| l.name_key() == key)
            .cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<Location>> {
        Ok(self.read()?.locations.filtered(|_| true))
    }

    async fn get_home(&self) -> StoreResult<Option<Location>> {
        Ok(self
            .read()?
            .locations
            .iter()
            .find(|l| l.kind == LocationKind::Home)
            .cloned())
    }

    async fn add(&self, location: Location) -> StoreResult<LocationId> {
        self.write()?.locations.insert(location)
    }

    async fn update(&self, location: Location) -> StoreResult<()> {
        self.write()?.locations.replace(location)
    }

    async fn remove(&self, location: &Location) -> StoreResult<()> {
        self.write()?.locations.delete(&location.id);
        Ok(())
    }

    async fn get_with_aisles(&self, id: LocationId) -> StoreResult<Option<LocationWithAisles>> {
        let tables = self.read()?;
        let Some(location) = tables.locations.get(&id).cloned() else {
            return Ok(None);
        };

        let mut aisles = tables.aisles.filtered(|a| a.location_id == id);
        by_rank(&mut aisles, |a| a.rank);

        let aisles = aisles
            .into_iter()
            .map(|aisle| {
                let mut memberships = tables.aisle_products.filtered(|ap| ap.aisle_id == aisle.id);
                by_rank(&mut memberships, |ap| ap.rank);
                let products = memberships
                    .into_iter()
                    .filter_map(|membership| {
                        let product = tables.products.get(&membership.product_id)?.clone();
                        Some(AisleEntry { membership, product })
                    })
                    .collect();
                AisleWithProducts { aisle, products }
            })
            .collect();

        Ok(Some(LocationWithAisles { location, aisles }))
    }
}

#[async_trait]
impl AislePort for InMemoryShoppingStore {
    async fn get(&self, id: AisleId) -> StoreResult<Option<Aisle>> {
        Ok(self.read()?.aisles.get(&id).cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<Aisle>> {
        Ok(self.read()?.aisles.filtered(|_| true))
    }

    async fn get_for_location(&self, location_id: LocationId) -> StoreResult<Vec<Aisle>> {
        let mut aisles = self.read()?.aisles.filtered(|a| a.location_id == location_id);
        by_rank(&mut aisles, |a| a.rank);
        Ok(aisles)
    }

    async fn get_defaults(&self) -> StoreResult<Vec<Aisle>> {
        Ok(self.read()?.aisles.filtered(|a| a.is_default))
    }

    async fn get_default_for(&self, location_id: LocationId) -> StoreResult<Option<Aisle>> {
        Ok(self
            .read()?
            .aisles
            .iter()
            .find(|a| a.is_default && a.location_id == location_id)
            .cloned())
    }

    async fn add(&self, aisle: Aisle) -> StoreResult<AisleId> {
        self.write()?.aisles.insert(aisle)
    }

    async fn update(&self, aisle: Aisle) -> StoreResult<()> {
        self.write()?.aisles.replace(aisle)
    }

    async fn update_many(&self, aisles: Vec<Aisle>) -> StoreResult<()> {
        let mut tables = self.write()?;
        if let Some(missing) = aisles.iter().find(|a| !tables.aisles.contains(&a.id)) {
            return Err(StoreError::NotFound(missing.id.to_string()));
        }
        for aisle in aisles {
            tables.aisles.replace(aisle)?;
        }
        Ok(())
    }

    async fn remove(&self, aisle: &Aisle) -> StoreResult<()> {
        self.write()?.aisles.delete(&aisle.id);
        Ok(())
    }
}

#[async_trait]
impl AisleProductPort for InMemoryShoppingStore {
    async fn get(&self, id: AisleProductId) -> StoreResult<Option<AisleProduct>> {
        Ok(self.read()?.aisle_products.get(&id).cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<AisleProduct>> {
        Ok(self.read()?.aisle_products.filtered(|_| true))
    }

    async fn get_for_aisle(&self, aisle_id: AisleId) -> StoreResult<Vec<AisleProduct>> {
        let mut rows = self.read()?.aisle_products.filtered(|ap| ap.aisle_id == aisle_id);
        by_rank(&mut rows, |ap| ap.rank);
        Ok(rows)
    }

    async fn get_for_product(&self, product_id: ProductId) -> StoreResult<Vec<AisleProduct>> {
        Ok(self
            .read()?
            .aisle_products
            .filtered(|ap| ap.product_id == product_id))
    }

    async fn add(&self, membership: AisleProduct) -> StoreResult<AisleProductId> {
        self.write()?.aisle_products.insert(membership)
    }

    async fn add_many(&self, memberships: Vec<AisleProduct>) -> StoreResult<Vec<AisleProductId>> {
        let mut tables = self.write()?;
        // Reject the whole batch up front so a collision leaves nothing behind.
        if let Some(dup) = memberships
            .iter()
            .find(|ap| !ap.is_new() && tables.aisle_products.contains(&ap.id))
        {
            return Err(StoreError::Conflict(dup.id.to_string()));
        }
        memberships
            .into_iter()
            .map(|ap| tables.aisle_products.insert(ap))
            .collect()
    }

    async fn update(&self, membership: AisleProduct) -> StoreResult<()> {
        self.write()?.aisle_products.replace(membership)
    }

    async fn update_many(&self, memberships: Vec<AisleProduct>) -> StoreResult<()> {
        let mut tables = self.write()?;
        if let Some(missing) = memberships
            .iter()
            .find(|ap| !tables.aisle_products.contains(&ap.id))
        {
            return Err(StoreError::NotFound(missing.id.to_string()));
        }
        for membership in memberships {
            tables.aisle_products.replace(membership)?;
        }
        Ok(())
    }

    async fn remove_many(&self, memberships: &[AisleProduct]) -> StoreResult<()> {
        let mut tables = self.write()?;
        for membership in memberships {
            tables.aisle_products.delete(&membership.id);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductPort for InMemoryShoppingStore {
    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let key = NameKey::new(name);
        Ok(self
            .read()?
            .products
            .iter()
            .find(|p| p.is_active() && p.name_key() == key)
            .cloned())
    }

    async fn get_deleted_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let key = NameKey::new(name);
        Ok(self
            .read()?
            .products
            .iter()
            .find(|p| p.is_deleted && p.name_key() == key)
            .cloned())
    }

    async fn get_all_active(&self) -> StoreResult<Vec<Product>> {
        Ok(self.read()?.products.filtered(|p| p.is_active()))
    }

    async fn get_all_including_deleted(&self) -> StoreResult<Vec<Product>> {
        Ok(self.read()?.products.filtered(|_| true))
    }

    async fn add(&self, product: Product) -> StoreResult<ProductId> {
        self.write()?.products.insert(product)
    }

    async fn add_many(&self, products: Vec<Product>) -> StoreResult<Vec<ProductId>> {
        let mut tables = self.write()?;
        products
            .into_iter()
            .map(|p| tables.products.insert(p))
            .collect()
    }

    async fn update(&self, product: Product) -> StoreResult<()> {
        self.write()?.products.replace(product)
    }

    async fn update_many(&self, products: Vec<Product>) -> StoreResult<()> {
        let mut tables = self.write()?;
        for product in products {
            tables.products.replace(product)?;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: ProductId) -> StoreResult<()> {
        set_deleted(&mut self.write()?.products, id, true)
    }

    async fn restore(&self, id: ProductId) -> StoreResult<()> {
        set_deleted(&mut self.write()?.products, id, false)
    }
}

fn set_deleted(products: &mut Table<Product>, id: ProductId, deleted: bool) -> StoreResult<()> {
    let product = products
        .get_mut(&id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    product.is_deleted = deleted;
    Ok(())
}
