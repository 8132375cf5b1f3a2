//! Composition root.

use std::sync::Arc;

use shoplist_infra::{AislePort, AisleProductPort, EngineConfig, InMemoryShoppingStore, LocationPort, ProductPort};

use crate::{AisleProductLedger, AisleStore, LocationHierarchy, ProductCatalog};

/// The four repository ports the engine runs on.
#[derive(Clone)]
pub struct Ports {
    pub locations: Arc<dyn LocationPort>,
    pub aisles: Arc<dyn AislePort>,
    pub aisle_products: Arc<dyn AisleProductPort>,
    pub products: Arc<dyn ProductPort>,
}

impl Ports {
    /// Back every port with one adapter value.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: LocationPort + AislePort + AisleProductPort + ProductPort + 'static,
    {
        Self {
            locations: store.clone(),
            aisles: store.clone(),
            aisle_products: store.clone(),
            products: store,
        }
    }
}

/// All engine components, wired over one set of ports.
#[derive(Clone)]
pub struct ShoppingEngine {
    ledger: Arc<AisleProductLedger>,
    aisles: Arc<AisleStore>,
    catalog: Arc<ProductCatalog>,
    hierarchy: Arc<LocationHierarchy>,
}

impl ShoppingEngine {
    pub fn assemble(ports: Ports, config: EngineConfig) -> Self {
        let ledger = Arc::new(AisleProductLedger::new(
            ports.aisle_products,
            ports.aisles.clone(),
            ports.locations.clone(),
            ports.products.clone(),
            config.shift_window,
        ));
        let aisles = Arc::new(AisleStore::new(ports.aisles, ports.locations.clone(), ledger.clone()));
        let catalog = Arc::new(ProductCatalog::new(ports.products, ledger.clone()));
        let hierarchy = Arc::new(LocationHierarchy::new(
            ports.locations,
            aisles.clone(),
            catalog.clone(),
            ledger.clone(),
            config,
        ));

        tracing::debug!("shopping engine assembled");
        Self {
            ledger,
            aisles,
            catalog,
            hierarchy,
        }
    }

    /// Engine over a fresh in-memory store.
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::assemble(Ports::from_store(InMemoryShoppingStore::arc()), config)
    }

    pub fn ledger(&self) -> &AisleProductLedger {
        &self.ledger
    }

    pub fn aisles(&self) -> &AisleStore {
        &self.aisles
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn hierarchy(&self) -> &LocationHierarchy {
        &self.hierarchy
    }
}
