use crate::backend::types::{MediaItem, MediaKind};
use indexmap::IndexMap;

/// The active, ordered list of media items keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    items: IndexMap<String, MediaItem>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = MediaItem>) {
        self.items.clear();
        for item in items {
            self.items.insert(item.id().to_string(), item);
        }
    }
    /// Puts `items` in front of the current ones, keeping their order.
    pub fn prepend(&mut self, items: impl IntoIterator<Item = MediaItem>) {
        let mut merged = IndexMap::new();
        for item in items {
            merged.insert(item.id().to_string(), item);
        }
        for (id, item) in self.items.drain(..) {
            merged.entry(id).or_insert(item);
        }
        self.items = merged;
    }
    /// Replaces an item in place, or appends it if it is new.
    pub fn upsert(&mut self, item: MediaItem) {
        self.items.insert(item.id().to_string(), item);
    }
    pub fn remove(&mut self, id: &str) -> Option<MediaItem> {
        self.items.shift_remove(id)
    }
    pub fn get(&self, id: &str) -> Option<&MediaItem> {
        self.items.get(id)
    }
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }
    pub fn get_index(&self, index: usize) -> Option<&MediaItem> {
        self.items.get_index(index).map(|(_, item)| item)
    }
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.get_index_of(id)
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &MediaItem> {
        self.items.values()
    }
    pub fn count(&self, kind: MediaKind) -> usize {
        self.iter().filter(|item| item.kind() == kind).count()
    }
}

impl FromIterator<MediaItem> for Collection {
    fn from_iter<T: IntoIterator<Item = MediaItem>>(iter: T) -> Self {
        let mut collection = Self::new();
        collection.replace_all(iter);
        collection
    }
}
