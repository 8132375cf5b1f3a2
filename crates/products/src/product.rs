use serde::{Deserialize, Serialize};

use shoplist_core::{Entity, NameKey, ProductId};

/// A thing the user buys.
///
/// Products are soft-deleted: `is_deleted` hides them from active listings but
/// the row survives so purchase history keeps pointing at something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub in_stock: bool,
    pub qty_needed: u32,
    /// Price in the smallest currency unit (e.g. cents).
    pub price: u64,
    pub is_deleted: bool,
}

impl Product {
    /// A new, unsaved product that is not in stock.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProductId::default(),
            name: name.into(),
            in_stock: false,
            qty_needed: 0,
            price: 0,
            is_deleted: false,
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = id;
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn with_qty_needed(mut self, qty: u32) -> Self {
        self.qty_needed = qty;
        self
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    pub fn name_key(&self) -> NameKey {
        NameKey::new(&self.name)
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Same attributes under a new name and no id (copy source).
    pub fn copied_as(&self, name: impl Into<String>) -> Self {
        Self {
            id: ProductId::default(),
            name: name.into(),
            is_deleted: false,
            ..self.clone()
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}
