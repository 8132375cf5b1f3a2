//! Aisles of a location and the default-aisle rule.

use std::sync::Arc;

use shoplist_core::{AisleId, Entity, LocationId, NameScope, ShoppingError, ShoppingResult};
use shoplist_infra::{AislePort, LocationPort};
use shoplist_locations::Aisle;

use crate::ledger::AisleProductLedger;
use crate::rank::{self, Ranked};

pub struct AisleStore {
    aisles: Arc<dyn AislePort>,
    locations: Arc<dyn LocationPort>,
    ledger: Arc<AisleProductLedger>,
}

impl AisleStore {
    pub fn new(aisles: Arc<dyn AislePort>, locations: Arc<dyn LocationPort>, ledger: Arc<AisleProductLedger>) -> Self {
        Self {
            aisles,
            locations,
            ledger,
        }
    }

    /// Whether no other aisle of `candidate.location_id` has the same name.
    pub async fn is_name_unique(&self, candidate: &Aisle) -> ShoppingResult<bool> {
        let key = candidate.name_key();
        let siblings = self.aisles.get_for_location(candidate.location_id).await?;
        Ok(!siblings.iter().any(|a| a.id != candidate.id && a.name_key() == key))
    }

    /// Insert an aisle. A rank already held in the location is freed first by
    /// shifting the occupants.
    pub async fn add(&self, aisle: Aisle) -> ShoppingResult<AisleId> {
        ensure_named(&aisle)?;

        if self.locations.get(aisle.location_id).await?.is_none() {
            return Err(ShoppingError::invalid_location(format!(
                "location {} does not exist",
                aisle.location_id
            )));
        }
        if !aisle.is_new() && self.aisles.get(aisle.id).await?.is_some() {
            return Err(ShoppingError::duplicate_entity(format!("aisle {} already exists", aisle.id)));
        }
        if !self.is_name_unique(&aisle).await? {
            return Err(ShoppingError::duplicate_name(NameScope::Aisle, aisle.name));
        }
        if aisle.is_default && self.aisles.get_default_for(aisle.location_id).await?.is_some() {
            return Err(ShoppingError::duplicate_entity(format!(
                "location {} already has a default aisle",
                aisle.location_id
            )));
        }

        let siblings = self.aisles.get_for_location(aisle.location_id).await?;
        if siblings.iter().any(|a| a.rank == aisle.rank) {
            let shifted = rank::make_room(siblings, aisle.rank, self.ledger.shift_window())?;
            tracing::debug!(
                location_id = %aisle.location_id,
                rank = aisle.rank,
                shifted = shifted.len(),
                "making room for aisle"
            );
            self.aisles.update_many(shifted).await?;
        }

        let name = aisle.name.clone();
        let id = self.aisles.add(aisle).await?;
        tracing::info!(aisle_id = %id, %name, "aisle added");
        Ok(id)
    }

    /// Rename, re-rank or collapse an aisle.
    ///
    /// An aisle never changes location and never gains or loses default status.
    pub async fn update(&self, aisle: Aisle) -> ShoppingResult<()> {
        ensure_named(&aisle)?;

        let stored = self.require(aisle.id).await?;
        if stored.location_id != aisle.location_id {
            return Err(ShoppingError::validation("an aisle cannot move to another location"));
        }
        if stored.is_default != aisle.is_default {
            return Err(ShoppingError::validation("the default flag of an aisle cannot change"));
        }
        if !self.is_name_unique(&aisle).await? {
            return Err(ShoppingError::duplicate_name(NameScope::Aisle, aisle.name));
        }

        let id = aisle.id;
        self.aisles.update(aisle).await?;
        tracing::debug!(aisle_id = %id, "aisle updated");
        Ok(())
    }

    /// Move an aisle to `new_rank` within its location.
    pub async fn update_rank(&self, aisle: &Aisle, new_rank: i32) -> ShoppingResult<()> {
        let mut stored = self.require(aisle.id).await?;
        let siblings: Vec<Aisle> = self
            .aisles
            .get_for_location(stored.location_id)
            .await?
            .into_iter()
            .filter(|a| a.id != stored.id)
            .collect();

        let shifted = rank::make_room(siblings, new_rank, self.ledger.shift_window())?;
        if !shifted.is_empty() {
            self.aisles.update_many(shifted).await?;
        }

        stored.set_rank(new_rank);
        self.aisles.update(stored).await?;
        tracing::debug!(aisle_id = %aisle.id, new_rank, "aisle moved");
        Ok(())
    }

    /// Delete a regular aisle.
    ///
    /// Its products move to the end of the location's default aisle; without a
    /// default aisle they are simply unassigned. Unknown aisles are ignored.
    pub async fn remove(&self, aisle: &Aisle) -> ShoppingResult<()> {
        if aisle.is_default {
            return Err(ShoppingError::DeleteDefaultAisle);
        }
        let Some(stored) = self.aisles.get(aisle.id).await? else {
            return Ok(());
        };
        if stored.is_default {
            return Err(ShoppingError::DeleteDefaultAisle);
        }

        match self.aisles.get_default_for(stored.location_id).await? {
            Some(default) => {
                self.ledger.move_all(stored.id, default.id).await?;
            }
            None => self.ledger.remove_all_for(stored.id).await?,
        }

        self.aisles.remove(&stored).await?;
        tracing::info!(aisle_id = %stored.id, name = %stored.name, "aisle removed");
        Ok(())
    }

    /// Delete the default aisle. Its products are unassigned, not deleted.
    pub async fn remove_default_aisle(&self, aisle: &Aisle) -> ShoppingResult<()> {
        self.ledger.remove_all_for(aisle.id).await?;
        self.aisles.remove(aisle).await?;
        tracing::info!(aisle_id = %aisle.id, location_id = %aisle.location_id, "default aisle removed");
        Ok(())
    }

    pub async fn get(&self, id: AisleId) -> ShoppingResult<Option<Aisle>> {
        Ok(self.aisles.get(id).await?)
    }

    pub async fn get_for_location(&self, location_id: LocationId) -> ShoppingResult<Vec<Aisle>> {
        Ok(self.aisles.get_for_location(location_id).await?)
    }

    pub async fn get_default_for(&self, location_id: LocationId) -> ShoppingResult<Option<Aisle>> {
        Ok(self.aisles.get_default_for(location_id).await?)
    }

    pub async fn get_all_defaults(&self) -> ShoppingResult<Vec<Aisle>> {
        Ok(self.aisles.get_defaults().await?)
    }

    async fn require(&self, id: AisleId) -> ShoppingResult<Aisle> {
        self.aisles
            .get(id)
            .await?
            .ok_or_else(|| ShoppingError::invalid_aisle(format!("aisle {id} does not exist")))
    }
}

fn ensure_named(aisle: &Aisle) -> ShoppingResult<()> {
    if aisle.name_key().is_blank() {
        return Err(ShoppingError::validation("aisle name must not be blank"));
    }
    Ok(())
}
