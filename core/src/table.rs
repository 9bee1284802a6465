//! Keyed, insertion-ordered row storage shared by the food catalog and the
//! user profile store.
//!
//! Rows live in slots; removing a row empties its slot so every other row
//! keeps its position. The key index maps straight to a slot, giving O(1)
//! keyed lookup.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{NutritionError, Result};

/// A row that carries its own unique key.
pub trait Keyed {
    type Key: Clone + Eq + Hash + AsRef<str>;

    fn key(&self) -> &Self::Key;
    fn set_key(&mut self, key: Self::Key);
}

#[derive(Debug, Clone)]
pub struct Table<R: Keyed> {
    kind: &'static str,
    slots: Vec<Option<R>>,
    index: HashMap<R::Key, usize>,
    dirty: bool,
}

impl<R: Keyed> Table<R> {
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            index: HashMap::new(),
            dirty: false,
        }
    }

    /// Builds a clean table from persisted rows. Duplicate keys are rejected.
    pub fn from_rows(kind: &'static str, rows: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut table = Self::new(kind);
        for row in rows {
            table.insert(row)?;
        }
        table.dirty = false;
        Ok(table)
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&R>
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + AsRef<str> + ?Sized,
    {
        self.index
            .get(key)
            .and_then(|&slot| self.slots[slot].as_ref())
            .ok_or_else(|| NutritionError::not_found(self.kind, key.as_ref()))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub fn insert(&mut self, row: R) -> Result<&R> {
        if self.index.contains_key(row.key()) {
            return Err(NutritionError::already_exists(
                self.kind,
                row.key().as_ref(),
            ));
        }
        let slot = self.slots.len();
        self.index.insert(row.key().clone(), slot);
        self.slots.push(Some(row));
        self.dirty = true;
        Ok(self.slots[slot].as_ref().expect("slot was just filled"))
    }

    /// Mutates a row in place. `edit` must leave the key untouched; use
    /// [`Table::rekey`] to change it.
    pub fn update<Q, F>(&mut self, key: &Q, edit: F) -> Result<&R>
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + AsRef<str> + ?Sized,
        F: FnOnce(&mut R),
    {
        let slot = self.slot_of(key)?;
        let row = self.slots[slot].as_mut().expect("indexed slot is occupied");
        edit(row);
        debug_assert!(
            self.index.get::<R::Key>(row.key()) == Some(&slot),
            "Table::update must not change the row key"
        );
        self.dirty = true;
        Ok(&*row)
    }

    /// Moves a row to a new key. The target key is checked before the source
    /// key, and a failed call leaves the table untouched.
    pub fn rekey<Q>(&mut self, old: &Q, new: R::Key) -> Result<&R>
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + AsRef<str> + ?Sized,
    {
        if self.index.contains_key::<R::Key>(&new) {
            return Err(NutritionError::already_exists(self.kind, new.as_ref()));
        }
        let slot = self.slot_of(old)?;
        self.index.remove(old);
        self.index.insert(new.clone(), slot);
        let row = self.slots[slot].as_mut().expect("indexed slot is occupied");
        row.set_key(new);
        self.dirty = true;
        Ok(&*row)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Result<R>
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + AsRef<str> + ?Sized,
    {
        let slot = self.slot_of(key)?;
        self.index.remove(key);
        self.dirty = true;
        Ok(self.slots[slot].take().expect("indexed slot is occupied"))
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.slots.iter().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn slot_of<Q>(&self, key: &Q) -> Result<usize>
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + AsRef<str> + ?Sized,
    {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| NutritionError::not_found(self.kind, key.as_ref()))
    }
}

impl<R: Keyed + Clone> Table<R> {
    /// Snapshot of every row, in insertion order, for persisting.
    #[must_use]
    pub fn to_rows(&self) -> Vec<R> {
        self.iter().cloned().collect()
    }
}
