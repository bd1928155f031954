//! Row selection state.

use std::collections::HashSet;
use std::hash::Hash;

/// Selection mode for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// One row at a time (radio-button style).
    #[default]
    Single,
    /// Any number of rows (checkbox style).
    Multi,
}

/// Tracks selected rows by their keys.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    pub mode: SelectionMode,
    selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Selection<K> {
    /// Create single-selection state.
    pub fn single() -> Self {
        Self {
            mode: SelectionMode::Single,
            selected: HashSet::new(),
        }
    }

    /// Create multi-selection state.
    pub fn multi() -> Self {
        Self {
            mode: SelectionMode::Multi,
            selected: HashSet::new(),
        }
    }

    /// Toggle a key.
    ///
    /// Single mode replaces the whole set with `{key}`, even when `key` is
    /// already the sole selected item; re-selecting does not deselect.
    /// Multi mode adds or removes the key.
    pub fn toggle(&mut self, key: K) {
        match self.mode {
            SelectionMode::Single => {
                self.selected.clear();
                self.selected.insert(key);
            }
            SelectionMode::Multi => {
                if !self.selected.remove(&key) {
                    self.selected.insert(key);
                }
            }
        }
    }

    /// Whether a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Insert a key directly (multi-mode bulk operations).
    pub fn insert(&mut self, key: K) {
        self.selected.insert(key);
    }

    /// Remove a key directly.
    pub fn remove(&mut self, key: &K) {
        self.selected.remove(key);
    }

    /// Drop every selected key not accepted by the predicate.
    pub fn retain(&mut self, keep: impl Fn(&K) -> bool) {
        self.selected.retain(|k| keep(k));
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterate over selected keys.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mode_replaces_instead_of_deselecting() {
        let mut sel: Selection<String> = Selection::single();
        sel.toggle("a".to_string());
        sel.toggle("a".to_string());
        assert!(sel.is_selected(&"a".to_string()));
        sel.toggle("b".to_string());
        assert!(!sel.is_selected(&"a".to_string()));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn multi_mode_adds_and_removes() {
        let mut sel: Selection<String> = Selection::multi();
        sel.toggle("a".to_string());
        sel.toggle("b".to_string());
        sel.toggle("a".to_string());
        assert!(!sel.is_selected(&"a".to_string()));
        assert!(sel.is_selected(&"b".to_string()));
    }
}
