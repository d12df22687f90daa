//! Ordered Set
//!
//! Insertion-ordered sequence without duplicates. Membership is answered by
//! an auxiliary hash index so `contains` stays O(1) for large child lists.

use std::collections::HashSet;
use std::hash::Hash;

/// Ordered set (duplicates forbidden, insertion order preserved)
#[derive(Debug, Clone)]
pub struct OrderedSet<T: Eq + Hash + Clone> {
    items: Vec<T>,
    index: HashSet<T>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashSet::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// O(1) membership test
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.index.contains(item)
    }

    /// Append unless already present. Returns whether the item was added.
    pub fn append(&mut self, item: T) -> bool {
        if !self.index.insert(item.clone()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Prepend unless already present.
    pub fn prepend(&mut self, item: T) -> bool {
        self.insert(0, item)
    }

    /// Insert before `index` unless already present. An index past the end appends.
    pub fn insert(&mut self, index: usize, item: T) -> bool {
        if !self.index.insert(item.clone()) {
            return false;
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        true
    }

    /// Replace the first instance of either `old` or `new` with `new` and
    /// drop any other instance of both. No-op when neither is present.
    pub fn replace(&mut self, old: &T, new: T) -> bool {
        let Some(position) = self.items.iter().position(|item| item == old || *item == new) else {
            return false;
        };
        self.items[position] = new.clone();
        let mut seen_replacement = false;
        self.items.retain(|item| {
            if *item == new {
                let keep = !seen_replacement;
                seen_replacement = true;
                keep
            } else {
                item != old
            }
        });
        self.index.remove(old);
        self.index.insert(new);
        true
    }

    /// Remove an item. Returns whether it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        if !self.index.remove(item) {
            return false;
        }
        if let Some(position) = self.items.iter().position(|existing| existing == item) {
            self.items.remove(position);
        }
        true
    }

    /// Remove every item matching `predicate`, returning the removed items in order
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            if predicate(item) {
                removed.push(item.clone());
                false
            } else {
                true
            }
        });
        for item in &removed {
            self.index.remove(item);
        }
        removed
    }

    /// Position of an item (O(n))
    pub fn index_of(&self, item: &T) -> Option<usize> {
        if !self.contains(item) {
            return None;
        }
        self.items.iter().position(|existing| existing == item)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq + Hash + Clone> Eq for OrderedSet<T> {}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.append(item);
        }
        set
    }
}

impl<T: Eq + Hash + Clone> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Eq + Hash + Clone> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
