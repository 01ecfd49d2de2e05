//! Per-page visual editing state.
//!
//! [`VisualPageState`] is the authoritative client-side record of what the
//! thumbnail grid shows: cumulative rotation, deletion and selection per
//! 0-based page index. Indices are stable only until a reorder; a reorder
//! must remap all three structures through the same old-to-new map in one
//! pass, otherwise rotation and deletion drift apart.

use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualPageState {
    /// index -> degrees, one of 90/180/270. An index rotated back to 0 is
    /// removed so the "rotated" marker clears.
    rotations: BTreeMap<usize, u16>,
    deleted: BTreeSet<usize>,
    selected: BTreeSet<usize>,
}

impl VisualPageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add 90 degrees to the page's cumulative rotation and return the new
    /// value. Four applications return to 0.
    pub fn rotate(&mut self, index: usize) -> u16 {
        let next = (self.rotation(index) + 90) % 360;
        if next == 0 {
            self.rotations.remove(&index);
        } else {
            self.rotations.insert(index, next);
        }
        next
    }

    /// Current cumulative rotation for a page, 0 when untouched.
    pub fn rotation(&self, index: usize) -> u16 {
        self.rotations.get(&index).copied().unwrap_or(0)
    }

    /// Flip deletion for a page and return the new state. Marking a page
    /// deleted revokes its selection.
    pub fn toggle_delete(&mut self, index: usize) -> bool {
        if self.deleted.remove(&index) {
            false
        } else {
            self.deleted.insert(index);
            self.selected.remove(&index);
            true
        }
    }

    /// Flip selection for a page and return the new state. Deleted pages
    /// cannot be selected; the call is a no-op for them.
    pub fn toggle_select(&mut self, index: usize) -> bool {
        if self.deleted.contains(&index) {
            return false;
        }
        if self.selected.remove(&index) {
            false
        } else {
            self.selected.insert(index);
            true
        }
    }

    pub fn is_deleted(&self, index: usize) -> bool {
        self.deleted.contains(&index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn deleted_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.deleted.iter().copied()
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Remap every index through `old_to_new` after a reorder.
    ///
    /// All three structures are rebuilt from the same map before any of
    /// them is replaced. An index absent from the map belongs to a page
    /// that no longer exists and is dropped, which is the defensive
    /// equivalent of treating it as deleted.
    pub fn reindex(&mut self, old_to_new: &HashMap<usize, usize>) {
        let rotations = self
            .rotations
            .iter()
            .filter_map(|(&old, &deg)| old_to_new.get(&old).map(|&new| (new, deg)))
            .collect();
        let deleted = self
            .deleted
            .iter()
            .filter_map(|old| old_to_new.get(old).copied())
            .collect();
        let selected = self
            .selected
            .iter()
            .filter_map(|old| old_to_new.get(old).copied())
            .collect();

        self.rotations = rotations;
        self.deleted = deleted;
        self.selected = selected;
    }

    /// All surviving pages in current order, each with its rotation. This
    /// is the effective rotate/delete specification a submit sends to the
    /// server.
    pub fn active_pages(&self, total_pages: usize) -> Vec<(usize, u16)> {
        (0..total_pages)
            .filter(|index| !self.deleted.contains(index))
            .map(|index| (index, self.rotation(index)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rotation_cycles_back_to_zero_after_four_applications() {
        let mut state = VisualPageState::new();
        assert_eq!(state.rotate(2), 90);
        assert_eq!(state.rotate(2), 180);
        assert_eq!(state.rotate(2), 270);
        assert_eq!(state.rotate(2), 0);
        // marker cleared, state is back to pristine
        assert_eq!(state, VisualPageState::new());
    }

    #[test]
    fn deleting_a_selected_page_revokes_selection() {
        let mut state = VisualPageState::new();
        assert!(state.toggle_select(1));
        assert!(state.toggle_delete(1));
        assert!(state.is_deleted(1));
        assert!(!state.is_selected(1));
    }

    #[test]
    fn selecting_a_deleted_page_is_a_noop() {
        let mut state = VisualPageState::new();
        state.toggle_delete(3);
        assert!(!state.toggle_select(3));
        assert!(!state.is_selected(3));

        // undeleting makes it selectable again
        state.toggle_delete(3);
        assert!(state.toggle_select(3));
    }

    #[test]
    fn reindex_remaps_all_structures_in_one_pass() {
        let mut state = VisualPageState::new();
        state.rotate(0); // 0 -> 90
        state.rotate(2);
        state.rotate(2); // 2 -> 180
        state.toggle_delete(1);

        let map = HashMap::from([(0, 2), (1, 0), (2, 1)]);
        state.reindex(&map);

        assert_eq!(state.rotation(2), 90);
        assert_eq!(state.rotation(1), 180);
        assert_eq!(state.rotation(0), 0);
        assert!(state.is_deleted(0));
        assert!(!state.is_deleted(1));
    }

    #[test]
    fn reindex_drops_indices_missing_from_the_map() {
        let mut state = VisualPageState::new();
        state.rotate(0);
        state.toggle_select(1);
        state.toggle_delete(2);

        // page 0 was removed; only 1 and 2 survive, shifted down
        let map = HashMap::from([(1, 0), (2, 1)]);
        state.reindex(&map);

        assert_eq!(state.rotation(0), 0);
        assert!(state.is_selected(0));
        assert!(state.is_deleted(1));
        assert_eq!(state.active_pages(2), vec![(0, 0)]);
    }

    #[test]
    fn active_pages_pairs_survivors_with_rotation() {
        let mut state = VisualPageState::new();
        state.rotate(0);
        state.toggle_delete(1);

        assert_eq!(state.active_pages(3), vec![(0, 90), (2, 0)]);
    }
}
