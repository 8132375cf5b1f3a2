use shoplist_core::{Entity, Identifier};

use crate::ports::{StoreError, StoreResult};

/// Insertion-ordered rows keyed by entity id.
///
/// Linear scans throughout; this backs tests and small single-user lists.
#[derive(Debug, Clone)]
pub(crate) struct Table<E> {
    rows: Vec<E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<E> Table<E>
where
    E: Entity + Clone,
{
    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: &E::Id) -> Option<&mut E> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.iter()
    }

    pub fn filtered<F>(&self, pred: F) -> Vec<E>
    where
        F: Fn(&E) -> bool,
    {
        self.rows.iter().filter(|r| pred(r)).cloned().collect()
    }

    /// Insert `row`, assigning a fresh id when it has none.
    pub fn insert(&mut self, mut row: E) -> StoreResult<E::Id> {
        if row.is_new() {
            row.set_id(E::Id::generate());
        } else if self.contains(row.id()) {
            return Err(StoreError::Conflict(format!("{:?}", row.id())));
        }
        let id = *row.id();
        self.rows.push(row);
        Ok(id)
    }

    pub fn replace(&mut self, row: E) -> StoreResult<()> {
        match self.get_mut(row.id()) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("{:?}", row.id()))),
        }
    }

    /// Remove the row, returning whether it existed.
    pub fn delete(&mut self, id: &E::Id) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id() != id);
        self.rows.len() != before
    }
}
