use std::collections::BTreeSet;

use proptest::prelude::*;

use shoplist_core::{AisleId, ProductId};
use shoplist_engine::ShoppingEngine;
use shoplist_infra::{EngineConfig, ShiftWindow};
use shoplist_locations::{Aisle, AisleProduct, Location};
use shoplist_products::Product;

fn engine(window: ShiftWindow) -> ShoppingEngine {
    shoplist_observability::init_for_tests();
    ShoppingEngine::in_memory(EngineConfig {
        shift_window: window,
        ..EngineConfig::default()
    })
}

/// A shop with one aisle holding one product per rank, in the given order.
async fn aisle_with(engine: &ShoppingEngine, ranks: &[i32]) -> (AisleId, Vec<ProductId>) {
    let shop = engine
        .hierarchy()
        .add_location(Location::shop("Market").showing_default_aisle(false))
        .await
        .unwrap();
    let aisle = engine.aisles().add(Aisle::new("Dairy", shop, 1)).await.unwrap();

    let mut products = Vec::new();
    let mut rows = Vec::new();
    for (i, rank) in ranks.iter().enumerate() {
        let id = engine.catalog().add(Product::new(format!("p{i}"))).await.unwrap();
        rows.push(AisleProduct::new(aisle, id, *rank));
        products.push(id);
    }
    engine.ledger().add_many(rows).await.unwrap();
    (aisle, products)
}

async fn rank_of(engine: &ShoppingEngine, aisle: AisleId, product: ProductId) -> i32 {
    engine
        .ledger()
        .get_for_aisle(aisle)
        .await
        .unwrap()
        .into_iter()
        .find(|m| m.product_id == product)
        .map(|m| m.rank)
        .unwrap()
}

async fn membership(engine: &ShoppingEngine, aisle: AisleId, product: ProductId) -> AisleProduct {
    engine
        .ledger()
        .get_for_aisle(aisle)
        .await
        .unwrap()
        .into_iter()
        .find(|m| m.product_id == product)
        .unwrap()
}

#[tokio::test]
async fn moving_third_onto_second_rank_under_both_windows() {
    for window in [ShiftWindow::AllSuccessors, ShiftWindow::Collisions] {
        let engine = engine(window);
        let (aisle, p) = aisle_with(&engine, &[10, 20, 30]).await;

        let third = membership(&engine, aisle, p[2]).await;
        engine.ledger().update_rank(third, 20).await.unwrap();

        assert_eq!(rank_of(&engine, aisle, p[0]).await, 10);
        assert_eq!(rank_of(&engine, aisle, p[2]).await, 20);
        assert!(rank_of(&engine, aisle, p[1]).await > 20, "{window:?}");

        let order: Vec<ProductId> = engine
            .ledger()
            .get_for_aisle(aisle)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.product_id)
            .collect();
        assert_eq!(order, vec![p[0], p[2], p[1]]);
    }
}

#[tokio::test]
async fn windows_differ_after_the_first_gap() {
    let ranks = [1, 2, 3, 10];

    let engine_all = engine(ShiftWindow::AllSuccessors);
    let (aisle, p) = aisle_with(&engine_all, &ranks).await;
    let first = membership(&engine_all, aisle, p[0]).await;
    engine_all.ledger().update_rank(first, 2).await.unwrap();
    assert_eq!(rank_of(&engine_all, aisle, p[3]).await, 11);

    let engine_gap = engine(ShiftWindow::Collisions);
    let (aisle, p) = aisle_with(&engine_gap, &ranks).await;
    let first = membership(&engine_gap, aisle, p[0]).await;
    engine_gap.ledger().update_rank(first, 2).await.unwrap();
    assert_eq!(rank_of(&engine_gap, aisle, p[1]).await, 3);
    assert_eq!(rank_of(&engine_gap, aisle, p[2]).await, 4);
    assert_eq!(rank_of(&engine_gap, aisle, p[3]).await, 10);
}

#[tokio::test]
async fn appended_members_follow_the_current_maximum() {
    let engine = engine(ShiftWindow::AllSuccessors);
    let (aisle, _) = aisle_with(&engine, &[4, 17]).await;
    assert_eq!(engine.ledger().get_max_rank(aisle).await.unwrap(), 17);

    let late = engine.catalog().add(Product::new("late")).await.unwrap();
    engine.ledger().append(aisle, late).await.unwrap();
    assert_eq!(rank_of(&engine, aisle, late).await, 18);
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn moves_keep_ranks_distinct_and_others_in_order(
        ranks in prop::collection::btree_set(-50i32..150, 2..12),
        pick in any::<prop::sample::Index>(),
        target in -60i32..160,
        collisions in any::<bool>(),
    ) {
        let window = if collisions { ShiftWindow::Collisions } else { ShiftWindow::AllSuccessors };
        let ranks: Vec<i32> = ranks.into_iter().collect();
        let moved = pick.index(ranks.len());

        let (after, products) = runtime().block_on(async {
            let engine = engine(window);
            let (aisle, products) = aisle_with(&engine, &ranks).await;
            let m = membership(&engine, aisle, products[moved]).await;
            engine.ledger().update_rank(m, target).await.unwrap();
            (engine.ledger().get_for_aisle(aisle).await.unwrap(), products)
        });

        let distinct: BTreeSet<i32> = after.iter().map(|m| m.rank).collect();
        prop_assert_eq!(distinct.len(), after.len());

        let moved_row = after.iter().find(|m| m.product_id == products[moved]).unwrap();
        prop_assert_eq!(moved_row.rank, target);

        let others: Vec<ProductId> = after
            .iter()
            .map(|m| m.product_id)
            .filter(|id| *id != products[moved])
            .collect();
        let expected: Vec<ProductId> = products
            .iter()
            .copied()
            .filter(|id| *id != products[moved])
            .collect();
        prop_assert_eq!(others, expected);
    }

    #[test]
    fn sorting_is_idempotent(names in prop::collection::btree_set("[a-zA-Z]{1,8}", 1..10)) {
        let (once, twice) = runtime().block_on(async {
            let engine = engine(ShiftWindow::AllSuccessors);
            let home = engine.hierarchy().ensure_home().await.unwrap();
            let mut seen = BTreeSet::new();
            for name in &names {
                if seen.insert(name.to_lowercase()) {
                    engine.hierarchy().add_product(Product::new(name.clone()), None).await.unwrap();
                }
            }
            engine.hierarchy().sort_by_name(home).await.unwrap();
            let once = engine.hierarchy().get_shopping_list(home).await.unwrap();
            engine.hierarchy().sort_by_name(home).await.unwrap();
            let twice = engine.hierarchy().get_shopping_list(home).await.unwrap();
            (once, twice)
        });

        prop_assert_eq!(&once, &twice);
        let list = once.unwrap();
        let ranks: Vec<i32> = list.aisles[0].memberships().map(|m| m.rank).collect();
        let dense: Vec<i32> = (1..=ranks.len() as i32).collect();
        prop_assert_eq!(ranks, dense);
    }
}
