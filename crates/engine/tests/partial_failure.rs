use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use shoplist_core::{AisleId, LocationId, ShoppingError};
use shoplist_engine::{Ports, ShoppingEngine};
use shoplist_infra::{AislePort, EngineConfig, InMemoryShoppingStore, StoreError, StoreResult};
use shoplist_locations::{Aisle, Location};

/// Aisle port whose inserts fail while `broken` is set.
struct FlakyAisles {
    inner: Arc<InMemoryShoppingStore>,
    broken: AtomicBool,
}

#[async_trait]
impl AislePort for FlakyAisles {
    async fn get(&self, id: AisleId) -> StoreResult<Option<Aisle>> {
        AislePort::get(&*self.inner, id).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Aisle>> {
        AislePort::get_all(&*self.inner).await
    }

    async fn get_for_location(&self, location_id: LocationId) -> StoreResult<Vec<Aisle>> {
        self.inner.get_for_location(location_id).await
    }

    async fn get_defaults(&self) -> StoreResult<Vec<Aisle>> {
        self.inner.get_defaults().await
    }

    async fn get_default_for(&self, location_id: LocationId) -> StoreResult<Option<Aisle>> {
        self.inner.get_default_for(location_id).await
    }

    async fn add(&self, aisle: Aisle) -> StoreResult<AisleId> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("disk full".to_string()));
        }
        AislePort::add(&*self.inner, aisle).await
    }

    async fn update(&self, aisle: Aisle) -> StoreResult<()> {
        AislePort::update(&*self.inner, aisle).await
    }

    async fn update_many(&self, aisles: Vec<Aisle>) -> StoreResult<()> {
        AislePort::update_many(&*self.inner, aisles).await
    }

    async fn remove(&self, aisle: &Aisle) -> StoreResult<()> {
        AislePort::remove(&*self.inner, aisle).await
    }
}

fn engine() -> (ShoppingEngine, Arc<FlakyAisles>) {
    shoplist_observability::init_for_tests();
    let store = InMemoryShoppingStore::arc();
    let aisles = Arc::new(FlakyAisles {
        inner: store.clone(),
        broken: AtomicBool::new(false),
    });
    let ports = Ports {
        aisles: aisles.clone(),
        ..Ports::from_store(store)
    };
    (ShoppingEngine::assemble(ports, EngineConfig::default()), aisles)
}

#[tokio::test]
async fn failed_default_aisle_leaves_location_committed() {
    let (engine, aisles) = engine();
    aisles.broken.store(true, Ordering::SeqCst);

    let err = engine.hierarchy().add_location(Location::shop("Market")).await.unwrap_err();
    assert_eq!(err, ShoppingError::Generic("storage error: disk full".to_string()));
    assert!(!err.is_validation());

    let shops = engine.hierarchy().get_shops().await.unwrap();
    assert_eq!(shops.len(), 1);
    assert!(engine.aisles().get_default_for(shops[0].id).await.unwrap().is_none());
}

#[tokio::test]
async fn copy_stops_at_the_failing_aisle() {
    let (engine, aisles) = engine();
    let source = engine.hierarchy().add_location(Location::shop("Market")).await.unwrap();
    engine.aisles().add(Aisle::new("Dairy", source, 1)).await.unwrap();
    let source = engine.hierarchy().get_location(source).await.unwrap().unwrap();

    aisles.broken.store(true, Ordering::SeqCst);
    let err = engine.hierarchy().copy_location(&source, "Market Copy").await.unwrap_err();
    assert!(matches!(err, ShoppingError::Generic(ref msg) if msg.contains("disk full")));

    let copy = engine.hierarchy().get_shops().await.unwrap().into_iter().find(|l| l.name == "Market Copy");
    let copy = copy.unwrap();
    assert!(engine.aisles().get_for_location(copy.id).await.unwrap().is_empty());

    // Source untouched.
    assert_eq!(engine.aisles().get_for_location(source.id).await.unwrap().len(), 2);
}
