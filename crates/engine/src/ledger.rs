//! Aisle membership and rank ordering.
//!
//! The ledger is the leaf component: every other component that needs to place
//! a product in an aisle, move it or clear an aisle goes through here.

use std::collections::HashSet;
use std::sync::Arc;

use shoplist_core::{AisleId, AisleProductId, Entity, LocationId, ProductId, ShoppingError, ShoppingResult};
use shoplist_infra::{AislePort, AisleProductPort, LocationPort, ProductPort, ShiftWindow};
use shoplist_locations::{Aisle, AisleProduct};

use crate::rank::{self, Ranked};

pub struct AisleProductLedger {
    memberships: Arc<dyn AisleProductPort>,
    aisles: Arc<dyn AislePort>,
    locations: Arc<dyn LocationPort>,
    products: Arc<dyn ProductPort>,
    shift_window: ShiftWindow,
}

impl AisleProductLedger {
    pub fn new(
        memberships: Arc<dyn AisleProductPort>,
        aisles: Arc<dyn AislePort>,
        locations: Arc<dyn LocationPort>,
        products: Arc<dyn ProductPort>,
        shift_window: ShiftWindow,
    ) -> Self {
        Self {
            memberships,
            aisles,
            locations,
            products,
            shift_window,
        }
    }

    pub fn shift_window(&self) -> ShiftWindow {
        self.shift_window
    }

    /// Highest rank in the aisle, 0 when it is empty.
    pub async fn get_max_rank(&self, aisle_id: AisleId) -> ShoppingResult<i32> {
        let members = self.memberships.get_for_aisle(aisle_id).await?;
        Ok(rank::max_rank(&members))
    }

    pub async fn get(&self, id: AisleProductId) -> ShoppingResult<Option<AisleProduct>> {
        Ok(self.memberships.get(id).await?)
    }

    /// Memberships of one aisle in rank order.
    pub async fn get_for_aisle(&self, aisle_id: AisleId) -> ShoppingResult<Vec<AisleProduct>> {
        Ok(self.memberships.get_for_aisle(aisle_id).await?)
    }

    pub async fn get_for_product(&self, product_id: ProductId) -> ShoppingResult<Vec<AisleProduct>> {
        Ok(self.memberships.get_for_product(product_id).await?)
    }

    /// Insert one membership row.
    ///
    /// When another member of the aisle already holds the requested rank, the
    /// occupants are shifted out of the way first, using the configured window.
    pub async fn add(&self, membership: AisleProduct) -> ShoppingResult<AisleProductId> {
        self.check_references(std::slice::from_ref(&membership)).await?;
        if self.exists(&membership).await? {
            return Err(ShoppingError::duplicate_entity(format!(
                "membership {} already exists",
                membership.id
            )));
        }

        let siblings = self.memberships.get_for_aisle(membership.aisle_id).await?;
        if siblings.iter().any(|m| m.rank == membership.rank) {
            let shifted = rank::make_room(siblings, membership.rank, self.shift_window)?;
            tracing::debug!(
                aisle_id = %membership.aisle_id,
                rank = membership.rank,
                shifted = shifted.len(),
                "making room for membership"
            );
            self.memberships.update_many(shifted).await?;
        }

        let id = self.memberships.add(membership).await?;
        tracing::debug!(membership_id = %id, "membership added");
        Ok(id)
    }

    /// Batch insert, ids returned in input order.
    pub async fn add_many(&self, memberships: Vec<AisleProduct>) -> ShoppingResult<Vec<AisleProductId>> {
        if memberships.is_empty() {
            return Ok(Vec::new());
        }
        self.check_references(&memberships).await?;
        let count = memberships.len();
        let ids = self.memberships.add_many(memberships).await?;
        tracing::debug!(count, "memberships added");
        Ok(ids)
    }

    /// Append `product_id` to the end of `aisle_id`.
    pub async fn append(&self, aisle_id: AisleId, product_id: ProductId) -> ShoppingResult<AisleProductId> {
        let members = self.memberships.get_for_aisle(aisle_id).await?;
        let rank = rank::next_rank(&members)?;
        self.add(AisleProduct::new(aisle_id, product_id, rank)).await
    }

    /// Upsert: a row with an unset or unknown id is inserted, anything else is
    /// updated in place.
    pub async fn update(&self, membership: AisleProduct) -> ShoppingResult<AisleProductId> {
        if self.exists(&membership).await? {
            let id = membership.id;
            self.memberships.update(membership).await?;
            Ok(id)
        } else {
            self.add(membership).await
        }
    }

    /// Batch upsert. Inserts and updates go out as one batch each.
    pub async fn update_many(&self, memberships: Vec<AisleProduct>) -> ShoppingResult<()> {
        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        for membership in memberships {
            if self.exists(&membership).await? {
                updates.push(membership);
            } else {
                inserts.push(membership);
            }
        }

        if !updates.is_empty() {
            self.memberships.update_many(updates).await?;
        }
        self.add_many(inserts).await?;
        Ok(())
    }

    /// Move one membership to `new_rank`, shifting siblings out of the way.
    ///
    /// The moved row ends up with exactly `new_rank` in `membership.aisle_id`,
    /// which may differ from the aisle it currently sits in.
    pub async fn update_rank(&self, mut membership: AisleProduct, new_rank: i32) -> ShoppingResult<()> {
        let siblings: Vec<AisleProduct> = self
            .memberships
            .get_for_aisle(membership.aisle_id)
            .await?
            .into_iter()
            .filter(|m| membership.is_new() || m.id != membership.id)
            .collect();

        let shifted = rank::make_room(siblings, new_rank, self.shift_window)?;
        tracing::debug!(
            aisle_id = %membership.aisle_id,
            new_rank,
            shifted = shifted.len(),
            "moving membership"
        );
        if !shifted.is_empty() {
            self.memberships.update_many(shifted).await?;
        }

        membership.set_rank(new_rank);
        self.update(membership).await?;
        Ok(())
    }

    /// Move every member of `from` to the end of `to`, keeping their order.
    pub async fn move_all(&self, from: AisleId, to: AisleId) -> ShoppingResult<usize> {
        let members = self.memberships.get_for_aisle(from).await?;
        if members.is_empty() {
            return Ok(0);
        }

        let base = self.get_max_rank(to).await?;
        let moved = members
            .into_iter()
            .zip(1..)
            .map(|(mut m, offset)| {
                m.aisle_id = to;
                m.rank = rank::offset(base, offset)?;
                Ok(m)
            })
            .collect::<ShoppingResult<Vec<AisleProduct>>>()?;
        let count = moved.len();
        self.memberships.update_many(moved).await?;
        tracing::debug!(%from, %to, count, "memberships re-homed");
        Ok(count)
    }

    /// Delete every membership of the aisle. Products are untouched.
    pub async fn remove_all_for(&self, aisle_id: AisleId) -> ShoppingResult<()> {
        let members = self.memberships.get_for_aisle(aisle_id).await?;
        if !members.is_empty() {
            self.memberships.remove_many(&members).await?;
            tracing::debug!(%aisle_id, count = members.len(), "aisle cleared");
        }
        Ok(())
    }

    /// Delete every membership of the product, in every location.
    pub async fn remove_for_product(&self, product_id: ProductId) -> ShoppingResult<()> {
        let members = self.memberships.get_for_product(product_id).await?;
        if !members.is_empty() {
            self.memberships.remove_many(&members).await?;
            tracing::debug!(%product_id, count = members.len(), "product unassigned");
        }
        Ok(())
    }

    /// Alphabetical re-sort of a whole location.
    ///
    /// Members of each aisle get dense ranks by lowercase product name, then
    /// the aisles themselves get dense ranks with the default aisle last.
    /// Only rows whose rank changes are written.
    pub async fn sort_by_name(&self, location_id: LocationId) -> ShoppingResult<()> {
        let Some(tree) = self.locations.get_with_aisles(location_id).await? else {
            return Ok(());
        };

        let mut aisles: Vec<Aisle> = Vec::with_capacity(tree.aisles.len());
        for aisle in tree.aisles {
            let mut entries = aisle.products;
            entries.sort_by_cached_key(|e| e.product.name.to_lowercase());
            let changed = rank::renumber(entries.into_iter().map(|e| e.membership).collect());
            if !changed.is_empty() {
                self.memberships.update_many(changed).await?;
            }
            aisles.push(aisle.aisle);
        }

        aisles.sort_by_cached_key(|a| (a.is_default, a.name.to_lowercase()));
        let changed = rank::renumber(aisles);
        if !changed.is_empty() {
            self.aisles.update_many(changed).await?;
        }

        tracing::info!(%location_id, "location sorted by name");
        Ok(())
    }

    async fn exists(&self, membership: &AisleProduct) -> ShoppingResult<bool> {
        if membership.is_new() {
            return Ok(false);
        }
        Ok(self.memberships.get(membership.id).await?.is_some())
    }

    /// Every referenced aisle must exist and every referenced product must be
    /// active.
    async fn check_references(&self, memberships: &[AisleProduct]) -> ShoppingResult<()> {
        let aisle_ids: HashSet<AisleId> = memberships.iter().map(|m| m.aisle_id).collect();
        for aisle_id in aisle_ids {
            if self.aisles.get(aisle_id).await?.is_none() {
                return Err(ShoppingError::invalid_aisle(format!("aisle {aisle_id} does not exist")));
            }
        }

        let product_ids: HashSet<ProductId> = memberships.iter().map(|m| m.product_id).collect();
        for product_id in product_ids {
            match self.products.get(product_id).await? {
                Some(p) if p.is_active() => {}
                _ => {
                    return Err(ShoppingError::invalid_product(format!(
                        "product {product_id} does not exist"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use shoplist_infra::InMemoryShoppingStore;
    use shoplist_locations::Location;
    use shoplist_products::Product;

    struct Fixture {
        store: Arc<InMemoryShoppingStore>,
        ledger: AisleProductLedger,
        aisle: AisleId,
    }

    async fn fixture(window: ShiftWindow) -> Fixture {
        let store = InMemoryShoppingStore::arc();
        let ledger = AisleProductLedger::new(store.clone(), store.clone(), store.clone(), store.clone(), window);
        let location = LocationPort::add(&*store, Location::shop("Corner")).await.unwrap();
        let aisle = AislePort::add(&*store, Aisle::new("Dairy", location, 1)).await.unwrap();
        Fixture { store, ledger, aisle }
    }

    async fn product(store: &InMemoryShoppingStore, name: &str) -> ProductId {
        ProductPort::add(store, Product::new(name)).await.unwrap()
    }

    async fn ranks(ledger: &AisleProductLedger, aisle: AisleId) -> Vec<(ProductId, i32)> {
        ledger
            .get_for_aisle(aisle)
            .await
            .unwrap()
            .into_iter()
            .map(|m| (m.product_id, m.rank))
            .collect()
    }

    #[tokio::test]
    async fn max_rank_is_zero_for_empty_aisle() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        assert_eq!(f.ledger.get_max_rank(f.aisle).await.unwrap(), 0);

        let milk = product(&f.store, "Milk").await;
        f.ledger.add(AisleProduct::new(f.aisle, milk, 7)).await.unwrap();
        assert_eq!(f.ledger.get_max_rank(f.aisle).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn add_rejects_unknown_aisle_and_deleted_product() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        let milk = product(&f.store, "Milk").await;

        let err = f.ledger.add(AisleProduct::new(AisleId::new(), milk, 1)).await.unwrap_err();
        assert!(matches!(err, ShoppingError::InvalidAisle(_)));

        f.store.soft_delete(milk).await.unwrap();
        let err = f.ledger.add(AisleProduct::new(f.aisle, milk, 1)).await.unwrap_err();
        assert!(matches!(err, ShoppingError::InvalidProduct(_)));
        assert!(f.ledger.get_for_aisle(f.aisle).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inserts_at_a_taken_rank_keep_ranks_distinct() {
        for window in [ShiftWindow::AllSuccessors, ShiftWindow::Collisions] {
            let f = fixture(window).await;
            let a = product(&f.store, "A").await;
            let b = product(&f.store, "B").await;
            let c = product(&f.store, "C").await;

            f.ledger.add(AisleProduct::new(f.aisle, a, 1)).await.unwrap();
            f.ledger.add(AisleProduct::new(f.aisle, b, 1)).await.unwrap();
            f.ledger.add(AisleProduct::new(f.aisle, c, 1)).await.unwrap();

            assert_eq!(
                ranks(&f.ledger, f.aisle).await,
                vec![(c, 1), (b, 2), (a, 3)],
                "window {window:?}"
            );
        }
    }

    #[tokio::test]
    async fn add_of_existing_row_is_duplicate_and_shifts_nothing() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        let milk = product(&f.store, "Milk").await;
        let id = f.ledger.add(AisleProduct::new(f.aisle, milk, 1)).await.unwrap();

        let again = f.ledger.get(id).await.unwrap().unwrap();
        let err = f.ledger.add(again).await.unwrap_err();
        assert!(matches!(err, ShoppingError::DuplicateEntity(_)));
        assert_eq!(ranks(&f.ledger, f.aisle).await, vec![(milk, 1)]);
    }

    #[tokio::test]
    async fn append_after_i32_max_is_refused() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        let a = product(&f.store, "A").await;
        let b = product(&f.store, "B").await;
        f.ledger.add(AisleProduct::new(f.aisle, a, i32::MAX)).await.unwrap();

        let err = f.ledger.append(f.aisle, b).await.unwrap_err();
        assert!(matches!(err, ShoppingError::Validation(_)));
        assert_eq!(ranks(&f.ledger, f.aisle).await, vec![(a, i32::MAX)]);
    }

    #[tokio::test]
    async fn update_inserts_unknown_rows() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        let milk = product(&f.store, "Milk").await;

        let stray = AisleProduct::new(f.aisle, milk, 3).with_id(AisleProductId::new());
        let id = f.ledger.update(stray.clone()).await.unwrap();
        assert_eq!(id, stray.id);

        let mut moved = f.ledger.get(id).await.unwrap().unwrap();
        moved.rank = 9;
        f.ledger.update(moved).await.unwrap();
        assert_eq!(ranks(&f.ledger, f.aisle).await, vec![(milk, 9)]);
    }

    #[tokio::test]
    async fn rank_move_shifts_successors() {
        for window in [ShiftWindow::AllSuccessors, ShiftWindow::Collisions] {
            let f = fixture(window).await;
            let a = product(&f.store, "A").await;
            let b = product(&f.store, "B").await;
            let c = product(&f.store, "C").await;
            f.ledger
                .add_many(vec![
                    AisleProduct::new(f.aisle, a, 10),
                    AisleProduct::new(f.aisle, b, 20),
                    AisleProduct::new(f.aisle, c, 30),
                ])
                .await
                .unwrap();

            let third = f.ledger.get_for_product(c).await.unwrap().remove(0);
            f.ledger.update_rank(third, 20).await.unwrap();

            let by_product = ranks(&f.ledger, f.aisle).await;
            let rank_of = |p: ProductId| by_product.iter().find(|(id, _)| *id == p).map(|(_, r)| *r);
            assert_eq!(
                [rank_of(a), rank_of(c), rank_of(b)],
                [Some(10), Some(20), Some(21)],
                "window {window:?}"
            );
        }
    }

    #[tokio::test]
    async fn move_all_appends_in_order() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        let location = AislePort::get(&*f.store, f.aisle).await.unwrap().unwrap().location_id;
        let other = AislePort::add(&*f.store, Aisle::new("Bakery", location, 2)).await.unwrap();

        let a = product(&f.store, "A").await;
        let b = product(&f.store, "B").await;
        let c = product(&f.store, "C").await;
        f.ledger.add(AisleProduct::new(other, a, 4)).await.unwrap();
        f.ledger.add(AisleProduct::new(f.aisle, c, 2)).await.unwrap();
        f.ledger.add(AisleProduct::new(f.aisle, b, 1)).await.unwrap();

        assert_eq!(f.ledger.move_all(f.aisle, other).await.unwrap(), 2);
        assert!(f.ledger.get_for_aisle(f.aisle).await.unwrap().is_empty());
        assert_eq!(ranks(&f.ledger, other).await, vec![(a, 4), (b, 5), (c, 6)]);
    }

    #[tokio::test]
    async fn remove_for_product_leaves_other_members() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        let a = product(&f.store, "A").await;
        let b = product(&f.store, "B").await;
        f.ledger.append(f.aisle, a).await.unwrap();
        f.ledger.append(f.aisle, b).await.unwrap();

        f.ledger.remove_for_product(a).await.unwrap();
        assert_eq!(ranks(&f.ledger, f.aisle).await, vec![(b, 2)]);

        f.ledger.remove_all_for(f.aisle).await.unwrap();
        assert!(f.ledger.get_for_aisle(f.aisle).await.unwrap().is_empty());
        assert!(ProductPort::get(&*f.store, b).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sort_by_name_of_unknown_location_is_noop() {
        let f = fixture(ShiftWindow::AllSuccessors).await;
        f.ledger.sort_by_name(LocationId::new()).await.unwrap();
    }
}
