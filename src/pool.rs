//! Ordered storage for pooled objects

use crate::item::{ItemId, PooledItem};
use crate::pooler::Prototype;

use std::time::Duration;

/// Container holding every object a pooler has created
///
/// Objects are kept in insertion order and are never removed while the
/// pool lives; deactivation is the only form of release. Looking up an
/// inactive object is a linear scan.
pub struct Pool<T> {
    name: String,
    items: Vec<PooledItem<T>>,
}

impl<T> Pool<T> {
    /// Create an empty pool
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construct `size` inactive objects from the prototype
    ///
    /// Does nothing when no prototype is given.
    pub fn fill(&mut self, size: usize, prototype: Option<&Prototype<T>>, time_to_live: Duration) {
        let Some(prototype) = prototype else {
            return;
        };

        self.items.reserve(size);
        for _ in 0..size {
            self.append(prototype.create(), prototype.name(), time_to_live);
        }
    }

    /// Add one inactive object at the end of the pool
    ///
    /// The object is named after the prototype and its ordinal, which is the
    /// pool length at the time of the append.
    pub fn append(&mut self, value: T, prototype_name: &str, time_to_live: Duration) -> ItemId {
        let id = ItemId(self.items.len());
        let name = format!("{}-{}", prototype_name, id.0);
        self.items.push(PooledItem::new(value, id, name, time_to_live));
        id
    }

    /// First inactive object in insertion order
    pub fn first_inactive(&self) -> Option<ItemId> {
        self.items
            .iter()
            .find(|item| !item.is_active())
            .map(PooledItem::id)
    }

    pub fn get(&self, id: ItemId) -> Option<&PooledItem<T>> {
        self.items.get(id.0)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut PooledItem<T>> {
        self.items.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PooledItem<T>> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PooledItem<T>> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_active()).count()
    }

    pub fn inactive_count(&self) -> usize {
        self.len() - self.active_count()
    }

    /// Advance every running countdown, returning how many objects expired
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        self.items
            .iter_mut()
            .filter(|item| item.is_active())
            .map(|item| item.advance(elapsed))
            .filter(|expired| *expired)
            .count()
    }
}
