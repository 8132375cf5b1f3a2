//! Repository decorator that announces committed writes on an event bus.
//!
//! Ordering invariant: a change is published only after the wrapped write
//! succeeded. If publication then fails the write stays committed and the
//! caller gets [`StoreError::Publish`].

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use shoplist_core::{AisleId, AisleProductId, Entity, LocationId, ProductId};
use shoplist_events::{ChangeKind, EntityKind, EventBus, StoreChange};
use shoplist_locations::{Aisle, AisleProduct, Location, LocationWithAisles};
use shoplist_products::Product;

use crate::ports::{AislePort, AisleProductPort, LocationPort, ProductPort, StoreError, StoreResult};

pub struct PublishingStore<S, B> {
    store: S,
    bus: B,
}

impl<S, B> PublishingStore<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self { store, bus }
    }

    pub fn into_parts(self) -> (S, B) {
        (self.store, self.bus)
    }
}

impl<S, B> PublishingStore<S, B>
where
    B: EventBus<StoreChange>,
{
    fn notify<T>(&self, entity: EntityKind, kind: ChangeKind, id: impl Into<Uuid>, row: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(row)
            .map_err(|e| StoreError::Storage(format!("change payload serialization failed: {e}")))?;
        self.bus
            .publish(StoreChange::new(entity, kind, id, payload))
            .map_err(|e| StoreError::Publish(e.to_string()))
    }

    fn notify_id(&self, entity: EntityKind, kind: ChangeKind, id: impl Into<Uuid> + Copy) -> StoreResult<()> {
        let uuid: Uuid = id.into();
        self.notify(entity, kind, uuid, &serde_json::json!({ "id": uuid }))
    }
}

#[async_trait]
impl<S, B> LocationPort for PublishingStore<S, B>
where
    S: LocationPort,
    B: EventBus<StoreChange>,
{
    async fn get(&self, id: LocationId) -> StoreResult<Option<Location>> {
        self.store.get(id).await
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Location>> {
        self.store.get_by_name(name).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Location>> {
        self.store.get_all().await
    }

    async fn get_home(&self) -> StoreResult<Option<Location>> {
        self.store.get_home().await
    }

    async fn add(&self, mut location: Location) -> StoreResult<LocationId> {
        let id = self.store.add(location.clone()).await?;
        location.set_id(id);
        self.notify(EntityKind::Location, ChangeKind::Added, id, &location)?;
        Ok(id)
    }

    async fn update(&self, location: Location) -> StoreResult<()> {
        self.store.update(location.clone()).await?;
        self.notify(EntityKind::Location, ChangeKind::Updated, location.id, &location)
    }

    async fn remove(&self, location: &Location) -> StoreResult<()> {
        self.store.remove(location).await?;
        self.notify(EntityKind::Location, ChangeKind::Removed, location.id, location)
    }

    async fn get_with_aisles(&self, id: LocationId) -> StoreResult<Option<LocationWithAisles>> {
        self.store.get_with_aisles(id).await
    }
}

#[async_trait]
impl<S, B> AislePort for PublishingStore<S, B>
where
    S: AislePort,
    B: EventBus<StoreChange>,
{
    async fn get(&self, id: AisleId) -> StoreResult<Option<Aisle>> {
        self.store.get(id).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Aisle>> {
        self.store.get_all().await
    }

    async fn get_for_location(&self, location_id: LocationId) -> StoreResult<Vec<Aisle>> {
        self.store.get_for_location(location_id).await
    }

    async fn get_defaults(&self) -> StoreResult<Vec<Aisle>> {
        self.store.get_defaults().await
    }

    async fn get_default_for(&self, location_id: LocationId) -> StoreResult<Option<Aisle>> {
        self.store.get_default_for(location_id).await
    }

    async fn add(&self, mut aisle: Aisle) -> StoreResult<AisleId> {
        let id = self.store.add(aisle.clone()).await?;
        aisle.set_id(id);
        self.notify(EntityKind::Aisle, ChangeKind::Added, id, &aisle)?;
        Ok(id)
    }

    async fn update(&self, aisle: Aisle) -> StoreResult<()> {
        self.store.update(aisle.clone()).await?;
        self.notify(EntityKind::Aisle, ChangeKind::Updated, aisle.id, &aisle)
    }

    async fn update_many(&self, aisles: Vec<Aisle>) -> StoreResult<()> {
        self.store.update_many(aisles.clone()).await?;
        for aisle in &aisles {
            self.notify(EntityKind::Aisle, ChangeKind::Updated, aisle.id, aisle)?;
        }
        Ok(())
    }

    async fn remove(&self, aisle: &Aisle) -> StoreResult<()> {
        self.store.remove(aisle).await?;
        self.notify(EntityKind::Aisle, ChangeKind::Removed, aisle.id, aisle)
    }
}

#[async_trait]
impl<S, B> AisleProductPort for PublishingStore<S, B>
where
    S: AisleProductPort,
    B: EventBus<StoreChange>,
{
    async fn get(&self, id: AisleProductId) -> StoreResult<Option<AisleProduct>> {
        self.store.get(id).await
    }

    async fn get_all(&self) -> StoreResult<Vec<AisleProduct>> {
        self.store.get_all().await
    }

    async fn get_for_aisle(&self, aisle_id: AisleId) -> StoreResult<Vec<AisleProduct>> {
        self.store.get_for_aisle(aisle_id).await
    }

    async fn get_for_product(&self, product_id: ProductId) -> StoreResult<Vec<AisleProduct>> {
        self.store.get_for_product(product_id).await
    }

    async fn add(&self, mut membership: AisleProduct) -> StoreResult<AisleProductId> {
        let id = self.store.add(membership.clone()).await?;
        membership.set_id(id);
        self.notify(EntityKind::AisleProduct, ChangeKind::Added, id, &membership)?;
        Ok(id)
    }

    async fn add_many(&self, memberships: Vec<AisleProduct>) -> StoreResult<Vec<AisleProductId>> {
        let ids = self.store.add_many(memberships.clone()).await?;
        for (mut membership, id) in memberships.into_iter().zip(ids.iter().copied()) {
            membership.set_id(id);
            self.notify(EntityKind::AisleProduct, ChangeKind::Added, id, &membership)?;
        }
        Ok(ids)
    }

    async fn update(&self, membership: AisleProduct) -> StoreResult<()> {
        self.store.update(membership.clone()).await?;
        self.notify(EntityKind::AisleProduct, ChangeKind::Updated, membership.id, &membership)
    }

    async fn update_many(&self, memberships: Vec<AisleProduct>) -> StoreResult<()> {
        self.store.update_many(memberships.clone()).await?;
        for membership in &memberships {
            self.notify(EntityKind::AisleProduct, ChangeKind::Updated, membership.id, membership)?;
        }
        Ok(())
    }

    async fn remove_many(&self, memberships: &[AisleProduct]) -> StoreResult<()> {
        self.store.remove_many(memberships).await?;
        for membership in memberships {
            self.notify(EntityKind::AisleProduct, ChangeKind::Removed, membership.id, membership)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<S, B> ProductPort for PublishingStore<S, B>
where
    S: ProductPort,
    B: EventBus<StoreChange>,
{
    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        self.store.get(id).await
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        self.store.get_by_name(name).await
    }

    async fn get_deleted_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        self.store.get_deleted_by_name(name).await
    }

    async fn get_all_active(&self) -> StoreResult<Vec<Product>> {
        self.store.get_all_active().await
    }

    async fn get_all_including_deleted(&self) -> StoreResult<Vec<Product>> {
        self.store.get_all_including_deleted().await
    }

    async fn add(&self, mut product: Product) -> StoreResult<ProductId> {
        let id = self.store.add(product.clone()).await?;
        product.set_id(id);
        self.notify(EntityKind::Product, ChangeKind::Added, id, &product)?;
        Ok(id)
    }

    async fn add_many(&self, products: Vec<Product>) -> StoreResult<Vec<ProductId>> {
        let ids = self.store.add_many(products.clone()).await?;
        for (mut product, id) in products.into_iter().zip(ids.iter().copied()) {
            product.set_id(id);
            self.notify(EntityKind::Product, ChangeKind::Added, id, &product)?;
        }
        Ok(ids)
    }

    async fn update(&self, product: Product) -> StoreResult<()> {
        self.store.update(product.clone()).await?;
        self.notify(EntityKind::Product, ChangeKind::Updated, product.id, &product)
    }

    async fn update_many(&self, products: Vec<Product>) -> StoreResult<()> {
        self.store.update_many(products.clone()).await?;
        for product in &products {
            self.notify(EntityKind::Product, ChangeKind::Updated, product.id, product)?;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: ProductId) -> StoreResult<()> {
        self.store.soft_delete(id).await?;
        self.notify_id(EntityKind::Product, ChangeKind::SoftDeleted, id)
    }

    async fn restore(&self, id: ProductId) -> StoreResult<()> {
        self.store.restore(id).await?;
        self.notify_id(EntityKind::Product, ChangeKind::Restored, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use shoplist_events::InMemoryEventBus;

    use crate::memory::InMemoryShoppingStore;

    fn publishing() -> (
        PublishingStore<InMemoryShoppingStore, Arc<InMemoryEventBus<StoreChange>>>,
        Arc<InMemoryEventBus<StoreChange>>,
    ) {
        let bus = Arc::new(InMemoryEventBus::new());
        (PublishingStore::new(InMemoryShoppingStore::new(), bus.clone()), bus)
    }

    #[tokio::test]
    async fn successful_writes_are_published_with_assigned_id() {
        let (store, bus) = publishing();
        let sub = bus.subscribe();

        let id = ProductPort::add(&store, Product::new("Milk")).await.unwrap();
        store.soft_delete(id).await.unwrap();

        let changes = sub.drain();
        assert_eq!(changes.len(), 2);
        assert!(changes[0].is(EntityKind::Product, ChangeKind::Added));
        assert_eq!(changes[0].id(), Uuid::from(id));
        assert_eq!(changes[0].payload()["name"], "Milk");
        assert!(changes[1].is(EntityKind::Product, ChangeKind::SoftDeleted));
    }

    #[tokio::test]
    async fn failed_writes_publish_nothing() {
        let (store, bus) = publishing();
        let sub = bus.subscribe();

        let err = AislePort::update(&store, Aisle::new("Dairy", LocationId::new(), 1).with_id(AisleId::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(sub.drain().is_empty());
    }

    #[tokio::test]
    async fn batch_insert_publishes_one_change_per_row() {
        let (store, bus) = publishing();
        let sub = bus.subscribe();
        let aisle = AisleId::new();

        let ids = AisleProductPort::add_many(
            &store,
            vec![
                AisleProduct::new(aisle, ProductId::new(), 1),
                AisleProduct::new(aisle, ProductId::new(), 2),
            ],
        )
        .await
        .unwrap();

        let published: Vec<Uuid> = sub.drain().iter().map(|c| c.id()).collect();
        let expected: Vec<Uuid> = ids.into_iter().map(Uuid::from).collect();
        assert_eq!(published, expected);
    }
}
