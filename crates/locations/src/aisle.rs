use serde::{Deserialize, Serialize};

use shoplist_core::{AisleId, AisleProductId, Entity, LocationId, NameKey, ProductId};
use shoplist_products::Product;

/// A section of a location's shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aisle {
    pub id: AisleId,
    pub name: String,
    pub location_id: LocationId,
    pub rank: i32,
    /// The catch-all aisle for products not assigned anywhere else.
    pub is_default: bool,
    pub expanded: bool,
}

impl Aisle {
    pub fn new(name: impl Into<String>, location_id: LocationId, rank: i32) -> Self {
        Self {
            id: AisleId::default(),
            name: name.into(),
            location_id,
            rank,
            is_default: false,
            expanded: true,
        }
    }

    /// The catch-all aisle of `location_id`.
    pub fn default_for(name: impl Into<String>, location_id: LocationId, rank: i32) -> Self {
        Self {
            is_default: true,
            ..Self::new(name, location_id, rank)
        }
    }

    pub fn with_id(mut self, id: AisleId) -> Self {
        self.id = id;
        self
    }

    pub fn name_key(&self) -> NameKey {
        NameKey::new(&self.name)
    }
}

impl Entity for Aisle {
    type Id = AisleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

/// Membership row: `product_id` sits in `aisle_id` at `rank`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AisleProduct {
    pub id: AisleProductId,
    pub aisle_id: AisleId,
    pub product_id: ProductId,
    pub rank: i32,
}

impl AisleProduct {
    pub fn new(aisle_id: AisleId, product_id: ProductId, rank: i32) -> Self {
        Self {
            id: AisleProductId::default(),
            aisle_id,
            product_id,
            rank,
        }
    }

    pub fn with_id(mut self, id: AisleProductId) -> Self {
        self.id = id;
        self
    }
}

impl Entity for AisleProduct {
    type Id = AisleProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

/// A membership row joined with the product it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AisleEntry {
    pub membership: AisleProduct,
    pub product: Product,
}

/// An aisle together with its memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AisleWithProducts {
    pub aisle: Aisle,
    pub products: Vec<AisleEntry>,
}

impl AisleWithProducts {
    pub fn memberships(&self) -> impl Iterator<Item = &AisleProduct> {
        self.products.iter().map(|e| &e.membership)
    }
}
