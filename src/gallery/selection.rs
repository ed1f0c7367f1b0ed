use super::collection::Collection;
use crate::backend::types::MediaItem;
use std::collections::HashSet;

/// Identifiers the user has marked for a batch action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds `id` if absent and removes it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }
    pub fn clear(&mut self) {
        self.ids.clear();
    }
    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
    pub fn len(&self) -> usize {
        self.ids.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
    /// Selected items that are still in `collection`.
    pub fn resolve<'a>(&self, collection: &'a Collection) -> Vec<&'a MediaItem> {
        self.iter().filter_map(|id| collection.get(id)).collect()
    }
    /// Deselects every identifier in `other`, leaving the rest selected.
    pub fn subtract(&mut self, other: &SelectionSet) {
        self.ids.retain(|id| !other.is_selected(id));
    }
    /// Forgets identifiers that are no longer in `collection`.
    pub fn retain_present(&mut self, collection: &Collection) {
        self.ids.retain(|id| collection.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::testing::images;

    #[test]
    fn toggle_membership() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(!selection.is_selected("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn even_toggles_restore_the_set() {
        let mut selection = SelectionSet::new();
        selection.toggle("x");
        selection.toggle("y");
        for id in ["x", "z", "y"] {
            for n in [2, 4, 6] {
                let before = selection.clone();
                for _ in 0..n {
                    selection.toggle(id);
                }
                assert_eq!(selection, before);
            }
        }
    }

    #[test]
    fn stale_ids_are_ignored() {
        let collection = images(&["a", "b", "c"]).into_iter().collect::<Collection>();
        let mut selection = SelectionSet::new();
        for id in ["a", "gone", "c"] {
            selection.toggle(id);
        }
        let mut resolved = selection
            .resolve(&collection)
            .into_iter()
            .map(MediaItem::id)
            .collect::<Vec<_>>();
        resolved.sort();
        assert_eq!(resolved, vec!["a", "c"]);
        assert_eq!(selection.len(), 3);
        selection.retain_present(&collection);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        selection.toggle("b");
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.iter().count(), 0);
    }

    #[test]
    fn subtract_keeps_other_ids() {
        let mut selection = SelectionSet::new();
        for id in ["a", "b", "c"] {
            selection.toggle(id);
        }
        let mut done = SelectionSet::new();
        done.toggle("a");
        done.toggle("c");
        done.toggle("z");
        selection.subtract(&done);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["b"]);
    }
}
