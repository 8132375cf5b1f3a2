use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Which table a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Location,
    Aisle,
    AisleProduct,
    Product,
}

/// What happened to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
    SoftDeleted,
    Restored,
}

/// Notification that one committed repository write changed one row.
///
/// `payload` is the JSON form of the row as written (or as it was, for
/// removals), so subscribers can refresh without a round trip when they want.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreChange {
    entity: EntityKind,
    kind: ChangeKind,
    id: Uuid,
    payload: JsonValue,
    occurred_at: DateTime<Utc>,
}

impl StoreChange {
    pub fn new(entity: EntityKind, kind: ChangeKind, id: impl Into<Uuid>, payload: JsonValue) -> Self {
        Self {
            entity,
            kind,
            id: id.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn is(&self, entity: EntityKind, kind: ChangeKind) -> bool {
        self.entity == entity && self.kind == kind
    }
}
