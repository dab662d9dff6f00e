//! Task Selection
//!
//! Ids checked for bulk actions.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: BTreeSet<u64>,
}

impl Selection {
    pub fn set(&mut self, id: u64, selected: bool) {
        if selected {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ascending ids
    pub fn ids(&self) -> Vec<u64> {
        self.ids.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Bulk action finished: a success empties the selection, a failure
    /// keeps it so the user can retry. Returns whether it was cleared.
    pub fn settle<T, E>(&mut self, outcome: &Result<T, E>) -> bool {
        if outcome.is_ok() {
            self.clear();
        }
        outcome.is_ok()
    }

    /// Every visible task is selected (and there is at least one)
    pub fn covers(&self, visible: &[u64]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    /// Select-all button: deselect everything when all visible tasks are
    /// already selected, otherwise select exactly the visible tasks.
    pub fn toggle_all(&mut self, visible: &[u64]) {
        if self.covers(visible) {
            self.ids.clear();
        } else {
            self.ids = visible.iter().copied().collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_unset() {
        let mut selection = Selection::default();
        selection.set(3, true);
        selection.set(1, true);
        selection.set(3, false);
        assert_eq!(selection.ids(), vec![1]);
    }

    #[test]
    fn test_toggle_all() {
        let mut selection = Selection::default();
        selection.set(9, true);

        selection.toggle_all(&[1, 2, 3]);
        assert_eq!(selection.ids(), vec![1, 2, 3]);

        selection.toggle_all(&[1, 2, 3]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_settle_clears_only_on_success() {
        let mut selection = Selection::default();
        selection.set(1, true);
        selection.set(2, true);

        assert!(!selection.settle(&Err::<(), _>("500")));
        assert_eq!(selection.ids(), vec![1, 2]);

        assert!(selection.settle(&Ok::<_, ()>(2)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_covers_empty_list() {
        assert!(!Selection::default().covers(&[]));
    }
}
