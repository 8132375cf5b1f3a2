use serde::{Deserialize, Serialize};

use shoplist_core::{Entity, LocationId, NameKey};

use crate::aisle::AisleWithProducts;

/// What kind of place a location is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Home,
    Shop,
}

/// Which products a shopping list shows by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    InStock,
    Needed,
    All,
}

/// A place with its own aisle layout: the single home, or a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub kind: LocationKind,
    pub name: String,
    pub default_filter: FilterType,
    pub pinned: bool,
    pub show_default_aisle: bool,
}

impl Location {
    pub fn home(name: impl Into<String>) -> Self {
        Self {
            id: LocationId::default(),
            kind: LocationKind::Home,
            name: name.into(),
            default_filter: FilterType::Needed,
            pinned: false,
            show_default_aisle: true,
        }
    }

    pub fn shop(name: impl Into<String>) -> Self {
        Self {
            id: LocationId::default(),
            kind: LocationKind::Shop,
            name: name.into(),
            default_filter: FilterType::Needed,
            pinned: false,
            show_default_aisle: true,
        }
    }

    pub fn with_id(mut self, id: LocationId) -> Self {
        self.id = id;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn showing_default_aisle(mut self, show: bool) -> Self {
        self.show_default_aisle = show;
        self
    }

    pub fn name_key(&self) -> NameKey {
        NameKey::new(&self.name)
    }

    pub fn is_shop(&self) -> bool {
        self.kind == LocationKind::Shop
    }

    /// Whether the default aisle of a new location of this shape is seeded
    /// with every active product.
    pub fn prepopulates_default_aisle(&self) -> bool {
        !self.is_shop() || self.show_default_aisle
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

/// A location together with its aisles and their memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationWithAisles {
    pub location: Location,
    pub aisles: Vec<AisleWithProducts>,
}

impl LocationWithAisles {
    pub fn default_aisle(&self) -> Option<&AisleWithProducts> {
        self.aisles.iter().find(|a| a.aisle.is_default)
    }

    pub fn membership_count(&self) -> usize {
        self.aisles.iter().map(|a| a.products.len()).sum()
    }
}
