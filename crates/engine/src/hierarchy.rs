//! Location lifecycle and the flows that span the whole hierarchy.
//!
//! Composite operations here are a sequence of port calls with no rollback. If
//! a step fails, the steps before it stay committed and the error is returned
//! as is.

use std::sync::Arc;

use shoplist_core::{AisleId, Entity, LocationId, NameKey, NameScope, ProductId, ShoppingError, ShoppingResult};
use shoplist_infra::{EngineConfig, LocationPort};
use shoplist_locations::{Aisle, AisleProduct, Location, LocationKind, LocationWithAisles};
use shoplist_products::Product;

use crate::aisle_store::AisleStore;
use crate::catalog::ProductCatalog;
use crate::ledger::AisleProductLedger;
use crate::rank;

pub struct LocationHierarchy {
    locations: Arc<dyn LocationPort>,
    aisles: Arc<AisleStore>,
    catalog: Arc<ProductCatalog>,
    ledger: Arc<AisleProductLedger>,
    config: EngineConfig,
}

impl LocationHierarchy {
    pub fn new(
        locations: Arc<dyn LocationPort>,
        aisles: Arc<AisleStore>,
        catalog: Arc<ProductCatalog>,
        ledger: Arc<AisleProductLedger>,
        config: EngineConfig,
    ) -> Self {
        Self {
            locations,
            aisles,
            catalog,
            ledger,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether no other location has the candidate's name.
    pub async fn is_name_unique(&self, candidate: &Location) -> ShoppingResult<bool> {
        Ok(match self.locations.get_by_name(&candidate.name).await? {
            Some(existing) => existing.id == candidate.id,
            None => true,
        })
    }

    /// Create a location with its default aisle.
    ///
    /// The default aisle of a location that pre-populates receives every
    /// active product, alphabetically, in one batch.
    pub async fn add_location(&self, location: Location) -> ShoppingResult<LocationId> {
        ensure_named(&location.name)?;

        if !location.is_new() && self.locations.get(location.id).await?.is_some() {
            return Err(ShoppingError::duplicate_entity(format!("location {} already exists", location.id)));
        }
        if !self.is_name_unique(&location).await? {
            return Err(ShoppingError::duplicate_name(NameScope::Location, location.name));
        }
        if location.kind == LocationKind::Home && self.locations.get_home().await?.is_some() {
            return Err(ShoppingError::duplicate_entity("a home location already exists"));
        }

        let id = self.locations.add(location.clone()).await?;

        let default_name = if location.is_shop() {
            location.name.clone()
        } else {
            self.config.default_aisle_name.clone()
        };
        let default_aisle = self
            .aisles
            .add(Aisle::default_for(default_name, id, self.config.default_aisle_rank))
            .await?;

        let mut seeded = 0;
        if location.prepopulates_default_aisle() {
            let mut products = self.catalog.get_all().await?;
            products.sort_by_cached_key(|p| p.name.to_lowercase());
            let memberships: Vec<AisleProduct> = products
                .iter()
                .zip(1..)
                .map(|(p, rank)| AisleProduct::new(default_aisle, p.id, rank))
                .collect();
            seeded = memberships.len();
            self.ledger.add_many(memberships).await?;
        }

        tracing::info!(location_id = %id, name = %location.name, kind = ?location.kind, seeded, "location added");
        Ok(id)
    }

    /// Rename a location or change its display settings. The kind is fixed.
    pub async fn update_location(&self, location: Location) -> ShoppingResult<()> {
        ensure_named(&location.name)?;

        let stored = self
            .locations
            .get(location.id)
            .await?
            .ok_or_else(|| ShoppingError::invalid_location(format!("location {} does not exist", location.id)))?;
        if stored.kind != location.kind {
            return Err(ShoppingError::validation("the kind of a location cannot change"));
        }
        if !self.is_name_unique(&location).await? {
            return Err(ShoppingError::duplicate_name(NameScope::Location, location.name));
        }

        let id = location.id;
        self.locations.update(location).await?;
        tracing::debug!(location_id = %id, "location updated");
        Ok(())
    }

    /// Duplicate a location's layout under `new_name`.
    ///
    /// Aisles and memberships are copied; products are shared, never copied.
    pub async fn copy_location(&self, source: &Location, new_name: &str) -> ShoppingResult<LocationId> {
        ensure_named(new_name)?;

        let tree = self
            .locations
            .get_with_aisles(source.id)
            .await?
            .ok_or_else(|| ShoppingError::invalid_location(format!("location {} does not exist", source.id)))?;
        if self.locations.get_by_name(new_name).await?.is_some() {
            return Err(ShoppingError::duplicate_name(NameScope::Location, new_name));
        }
        if tree.location.kind == LocationKind::Home {
            return Err(ShoppingError::duplicate_entity("the home location cannot be copied"));
        }

        let copy = Location {
            id: LocationId::default(),
            name: new_name.to_string(),
            ..tree.location.clone()
        };
        let id = self.locations.add(copy).await?;

        let mut memberships = 0;
        for source_aisle in &tree.aisles {
            let aisle = Aisle {
                id: AisleId::default(),
                location_id: id,
                ..source_aisle.aisle.clone()
            };
            let aisle_id = self.aisles.add(aisle).await?;

            let rows: Vec<AisleProduct> = source_aisle
                .memberships()
                .map(|m| AisleProduct::new(aisle_id, m.product_id, m.rank))
                .collect();
            memberships += rows.len();
            self.ledger.add_many(rows).await?;
        }

        tracing::info!(
            source_id = %source.id,
            location_id = %id,
            aisles = tree.aisles.len(),
            memberships,
            "location copied"
        );
        Ok(id)
    }

    /// Remove a location and every aisle in it. Products are left alone.
    ///
    /// Unknown locations are ignored; the home location cannot be removed.
    pub async fn remove_location(&self, location: &Location) -> ShoppingResult<()> {
        let Some(stored) = self.locations.get(location.id).await? else {
            return Ok(());
        };
        if stored.kind == LocationKind::Home {
            return Err(ShoppingError::validation("the home location cannot be removed"));
        }

        let (defaults, regular): (Vec<Aisle>, Vec<Aisle>) = self
            .aisles
            .get_for_location(stored.id)
            .await?
            .into_iter()
            .partition(|a| a.is_default);

        for aisle in &regular {
            self.aisles.remove(aisle).await?;
        }
        for aisle in &defaults {
            self.aisles.remove_default_aisle(aisle).await?;
        }
        self.locations.remove(&stored).await?;

        tracing::info!(location_id = %stored.id, name = %stored.name, aisles = regular.len() + defaults.len(), "location removed");
        Ok(())
    }

    pub async fn sort_by_name(&self, location_id: LocationId) -> ShoppingResult<()> {
        self.ledger.sort_by_name(location_id).await
    }

    /// Put a product on the shopping lists.
    ///
    /// A deleted product with the same name is brought back with the given
    /// attributes instead of creating a new row. The product goes to the end
    /// of `target_aisle`, or, without a target, to the end of the default
    /// aisle of every location that pre-populates. A product filed under a
    /// shop aisle is also filed under the home aisle of the same name.
    pub async fn add_product(&self, product: Product, target_aisle: Option<&Aisle>) -> ShoppingResult<ProductId> {
        let target = match target_aisle {
            Some(aisle) => Some(
                self.aisles
                    .get(aisle.id)
                    .await?
                    .ok_or_else(|| ShoppingError::invalid_aisle(format!("aisle {} does not exist", aisle.id)))?,
            ),
            None => None,
        };

        let id = self.revive_or_add(product).await?;

        match target {
            Some(aisle) => {
                self.ledger.append(aisle.id, id).await?;
                if self.config.mirror_shop_aisles_to_home {
                    self.mirror_to_home(&aisle, id).await?;
                }
            }
            None => {
                for default in self.aisles.get_all_defaults().await? {
                    let prepopulates = self
                        .locations
                        .get(default.location_id)
                        .await?
                        .is_some_and(|l| l.prepopulates_default_aisle());
                    if prepopulates {
                        self.ledger.append(default.id, id).await?;
                    }
                }
            }
        }

        tracing::info!(product_id = %id, target_aisle = ?target_aisle.map(|a| a.id), "product placed");
        Ok(id)
    }

    /// Set a product's in-stock flag. Returns `None` for an unknown or deleted
    /// product.
    ///
    /// A product coming into stock is also filed under the home aisle named
    /// like each shop aisle it sits in, unless it is already there. Needs
    /// `mirror_shop_aisles_to_home`.
    pub async fn update_product_status(&self, id: ProductId, in_stock: bool) -> ShoppingResult<Option<Product>> {
        let Some(product) = self.catalog.update_status(id, in_stock).await? else {
            return Ok(None);
        };

        if in_stock && self.config.mirror_shop_aisles_to_home {
            for placement in self.ledger.get_for_product(id).await? {
                if let Some(aisle) = self.aisles.get(placement.aisle_id).await? {
                    self.mirror_to_home(&aisle, id).await?;
                }
            }
        }

        tracing::info!(product_id = %id, in_stock, "product status updated");
        Ok(Some(product))
    }

    /// First-run seeding: the home location and its default aisle.
    pub async fn ensure_home(&self) -> ShoppingResult<LocationId> {
        if let Some(home) = self.locations.get_home().await? {
            return Ok(home.id);
        }
        tracing::info!(name = %self.config.home_name, "seeding home location");
        self.add_location(Location::home(self.config.home_name.clone())).await
    }

    pub async fn get_location(&self, id: LocationId) -> ShoppingResult<Option<Location>> {
        Ok(self.locations.get(id).await?)
    }

    pub async fn get_home(&self) -> ShoppingResult<Option<Location>> {
        Ok(self.locations.get_home().await?)
    }

    pub async fn get_all_locations(&self) -> ShoppingResult<Vec<Location>> {
        Ok(self.locations.get_all().await?)
    }

    /// Shops in name order.
    pub async fn get_shops(&self) -> ShoppingResult<Vec<Location>> {
        let mut shops: Vec<Location> = self
            .locations
            .get_all()
            .await?
            .into_iter()
            .filter(Location::is_shop)
            .collect();
        shops.sort_by_cached_key(Location::name_key);
        Ok(shops)
    }

    pub async fn get_pinned_shops(&self) -> ShoppingResult<Vec<Location>> {
        let mut shops = self.get_shops().await?;
        shops.retain(|s| s.pinned);
        Ok(shops)
    }

    /// The full list of a location: aisles and products, both in rank order.
    pub async fn get_shopping_list(&self, location_id: LocationId) -> ShoppingResult<Option<LocationWithAisles>> {
        Ok(self.locations.get_with_aisles(location_id).await?)
    }

    async fn revive_or_add(&self, product: Product) -> ShoppingResult<ProductId> {
        let Some(deleted) = self.catalog.get_deleted_by_name(&product.name).await? else {
            return self.catalog.add(product).await;
        };
        if self.catalog.get_by_name(&product.name).await?.is_some() {
            return Err(ShoppingError::duplicate_name(NameScope::Product, product.name));
        }

        let id = deleted.id;
        self.catalog.restore(id).await?;
        self.catalog.update(product.with_id(id)).await?;
        tracing::debug!(product_id = %id, "deleted product revived");
        Ok(id)
    }

    /// File `product_id` under the home aisle named like `shop_aisle`, creating
    /// that aisle after home's last regular aisle when home has none. No-op
    /// unless the aisle belongs to a shop, or when the product is already
    /// filed there.
    async fn mirror_to_home(&self, shop_aisle: &Aisle, product_id: ProductId) -> ShoppingResult<()> {
        let in_shop = self
            .locations
            .get(shop_aisle.location_id)
            .await?
            .is_some_and(|l| l.is_shop());
        if !in_shop {
            return Ok(());
        }
        let Some(home) = self.locations.get_home().await? else {
            return Ok(());
        };

        let key = shop_aisle.name_key();
        let home_aisles = self.aisles.get_for_location(home.id).await?;
        let home_aisle = match home_aisles.iter().find(|a| a.name_key() == key) {
            Some(aisle) => aisle.id,
            None => {
                let last_regular = rank::max_rank(home_aisles.iter().filter(|a| !a.is_default));
                let rank = rank::offset(last_regular, 1)?;
                self.aisles
                    .add(Aisle::new(shop_aisle.name.clone(), home.id, rank))
                    .await?
            }
        };

        let linked = self
            .ledger
            .get_for_aisle(home_aisle)
            .await?
            .iter()
            .any(|m| m.product_id == product_id);
        if linked {
            return Ok(());
        }

        self.ledger.append(home_aisle, product_id).await?;
        tracing::debug!(%product_id, aisle = %shop_aisle.name, "product mirrored to home");
        Ok(())
    }
}

fn ensure_named(name: &str) -> ShoppingResult<()> {
    if NameKey::new(name).is_blank() {
        return Err(ShoppingError::validation("location name must not be blank"));
    }
    Ok(())
}
