//! Rank arithmetic shared by aisles (within a location) and memberships
//! (within an aisle).
//!
//! Everything here is pure: callers load siblings, let these functions decide
//! which ranks change, and persist only the rows returned.

use shoplist_core::{ShoppingError, ShoppingResult};
use shoplist_infra::ShiftWindow;
use shoplist_locations::{Aisle, AisleProduct};

/// Something ordered among its siblings by an integer rank.
pub trait Ranked {
    fn rank(&self) -> i32;
    fn set_rank(&mut self, rank: i32);
}

impl Ranked for Aisle {
    fn rank(&self) -> i32 {
        self.rank
    }

    fn set_rank(&mut self, rank: i32) {
        self.rank = rank;
    }
}

impl Ranked for AisleProduct {
    fn rank(&self) -> i32 {
        self.rank
    }

    fn set_rank(&mut self, rank: i32) {
        self.rank = rank;
    }
}

/// `rank + by`, or a validation error when that leaves the `i32` range.
pub fn offset(rank: i32, by: i32) -> ShoppingResult<i32> {
    rank.checked_add(by)
        .ok_or_else(|| ShoppingError::validation(format!("rank {rank} cannot be moved by {by}")))
}

/// Shift `siblings` so that `target` is free for the item being moved.
///
/// `siblings` must not contain the moved item. Returns the siblings whose rank
/// changed, with their new rank applied. Untouched siblings keep their
/// relative order under both windows. Fails without side effects when a
/// shifted rank would overflow.
pub fn make_room<T>(siblings: Vec<T>, target: i32, window: ShiftWindow) -> ShoppingResult<Vec<T>>
where
    T: Ranked,
{
    match window {
        ShiftWindow::AllSuccessors => siblings
            .into_iter()
            .filter(|s| s.rank() >= target)
            .map(|mut s| {
                s.set_rank(offset(s.rank(), 1)?);
                Ok(s)
            })
            .collect(),
        ShiftWindow::Collisions => {
            let mut successors: Vec<T> = siblings.into_iter().filter(|s| s.rank() >= target).collect();
            successors.sort_by_key(|s| s.rank());

            // Push each successor just past its predecessor until a gap absorbs
            // the shift.
            let mut occupied = target;
            let mut changed = Vec::new();
            for mut s in successors {
                if s.rank() > occupied {
                    break;
                }
                s.set_rank(offset(occupied, 1)?);
                occupied = s.rank();
                changed.push(s);
            }
            Ok(changed)
        }
    }
}

/// Assign dense ranks `1..=N` in slice order, returning the items whose rank
/// actually changed.
pub fn renumber<T>(items: Vec<T>) -> Vec<T>
where
    T: Ranked,
{
    items
        .into_iter()
        .zip(1..)
        .filter_map(|(mut item, rank)| {
            if item.rank() == rank {
                None
            } else {
                item.set_rank(rank);
                Some(item)
            }
        })
        .collect()
}

/// One past the highest rank, or 1 for an empty list.
pub fn next_rank<'a, T>(items: impl IntoIterator<Item = &'a T>) -> ShoppingResult<i32>
where
    T: Ranked + 'a,
{
    offset(max_rank(items), 1)
}

/// Highest rank, or 0 for an empty list.
pub fn max_rank<'a, T>(items: impl IntoIterator<Item = &'a T>) -> i32
where
    T: Ranked + 'a,
{
    items.into_iter().map(Ranked::rank).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        name: &'static str,
        rank: i32,
    }

    impl Ranked for Item {
        fn rank(&self) -> i32 {
            self.rank
        }

        fn set_rank(&mut self, rank: i32) {
            self.rank = rank;
        }
    }

    fn items(ranks: &[(&'static str, i32)]) -> Vec<Item> {
        ranks.iter().map(|&(name, rank)| Item { name, rank }).collect()
    }

    fn ranks_of(changed: &[Item]) -> Vec<(&'static str, i32)> {
        changed.iter().map(|i| (i.name, i.rank)).collect()
    }

    #[test]
    fn all_successors_shifts_everything_at_or_after_target() {
        let changed = make_room(items(&[("a", 1), ("b", 2), ("c", 5)]), 2, ShiftWindow::AllSuccessors).unwrap();
        assert_eq!(ranks_of(&changed), vec![("b", 3), ("c", 6)]);
    }

    #[test]
    fn collisions_stops_at_first_gap() {
        let changed = make_room(
            items(&[("a", 1), ("b", 2), ("c", 3), ("d", 7)]),
            2,
            ShiftWindow::Collisions,
        )
        .unwrap();
        assert_eq!(ranks_of(&changed), vec![("b", 3), ("c", 4)]);
    }

    #[test]
    fn free_target_changes_nothing_under_collisions() {
        let changed = make_room(items(&[("a", 10), ("b", 30)]), 20, ShiftWindow::Collisions).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn renumber_reports_only_moved_items() {
        let changed = renumber(items(&[("a", 1), ("b", 5), ("c", 3)]));
        assert_eq!(ranks_of(&changed), vec![("b", 2)]);
    }

    #[test]
    fn max_rank_of_empty_is_zero() {
        let empty: Vec<Item> = Vec::new();
        assert_eq!(max_rank(&empty), 0);
        assert_eq!(next_rank(&empty).unwrap(), 1);
        assert_eq!(next_rank(&items(&[("a", 4), ("b", 9)])).unwrap(), 10);
    }

    #[test]
    fn shifting_past_i32_max_is_refused() {
        for window in [ShiftWindow::AllSuccessors, ShiftWindow::Collisions] {
            let err = make_room(items(&[("a", i32::MAX - 1), ("b", i32::MAX)]), i32::MAX - 1, window).unwrap_err();
            assert!(matches!(err, ShoppingError::Validation(_)), "{window:?}");
        }
        assert!(matches!(next_rank(&items(&[("a", i32::MAX)])), Err(ShoppingError::Validation(_))));
        assert_eq!(offset(i32::MAX - 1, 1).unwrap(), i32::MAX);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        proptest! {
            /// After a move every rank is distinct and the siblings keep their
            /// relative order.
            #[test]
            fn move_keeps_ranks_distinct_and_ordered(
                ranks in prop::collection::btree_set(0i32..200, 1..20),
                pick in any::<prop::sample::Index>(),
                target in 0i32..220,
                collisions in any::<bool>(),
            ) {
                let window = if collisions { ShiftWindow::Collisions } else { ShiftWindow::AllSuccessors };
                let moved = pick.index(ranks.len());

                // Names index the original rank-ordered position.
                const NAMES: [&str; 20] = [
                    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
                    "10", "11", "12", "13", "14", "15", "16", "17", "18", "19",
                ];
                let siblings: Vec<Item> = ranks
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != moved)
                    .map(|(i, &rank)| Item { name: NAMES[i], rank })
                    .collect();

                let mut after = siblings.clone();
                for c in make_room(siblings, target, window).unwrap() {
                    if let Some(slot) = after.iter_mut().find(|s| s.name == c.name) {
                        slot.rank = c.rank;
                    }
                }

                prop_assert!(after.windows(2).all(|w| w[0].rank < w[1].rank));

                let mut all: Vec<i32> = after.iter().map(|s| s.rank).collect();
                all.push(target);
                let distinct: BTreeSet<i32> = all.iter().copied().collect();
                prop_assert_eq!(distinct.len(), all.len());
            }
        }
    }
}
