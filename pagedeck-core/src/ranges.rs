//! Editable lists of 1-based page ranges.
//!
//! [`RangeList`] backs the range-builder UI used by split: an ordered,
//! user-reorderable list of inclusive `(from, to)` pairs that always keeps
//! `from <= to` and stays clamped to the current document length. The
//! structure is the source of truth for the builder; any view over it is
//! derived, never the other way around.

use serde::{Deserialize, Serialize};

/// One inclusive page range, 1-based on both ends.
///
/// This is also the structured wire format: a split request may carry a
/// JSON array like `[{"from":1,"to":3},{"from":10,"to":12}]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub from: u32,
    pub to: u32,
}

impl PageRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// 0-based indices of this range clipped to `[0, total_pages)`.
    ///
    /// A range entirely out of bounds, or an inverted range arriving from
    /// the wire, yields an empty vector rather than an error.
    pub fn indices(&self, total_pages: usize) -> Vec<usize> {
        if self.from == 0 || self.to < self.from || total_pages == 0 {
            return Vec::new();
        }
        let lo = self.from as usize - 1;
        if lo >= total_pages {
            return Vec::new();
        }
        let hi = (self.to as usize - 1).min(total_pages - 1);
        (lo..=hi).collect()
    }
}

/// Which bound of a range an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    From,
    To,
}

/// Direction for [`RangeList::move_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered, editable list of page ranges.
///
/// The list is never empty while active; entry order determines output
/// grouping and is user-reorderable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeList {
    entries: Vec<PageRange>,
    total_pages: u32,
}

impl RangeList {
    /// New list with a single `1..1` entry.
    pub fn new(total_pages: u32) -> Self {
        Self {
            entries: vec![PageRange::new(1, 1)],
            total_pages,
        }
    }

    pub fn entries(&self) -> &[PageRange] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        // invariant: at least one entry exists at all times
        false
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Append a new range starting right after the last one, collapsed to a
    /// single page and clamped to the document length.
    pub fn add(&mut self) {
        let from = self
            .entries
            .last()
            .map(|r| r.to.saturating_add(1))
            .unwrap_or(1)
            .clamp(1, self.page_cap());
        self.entries.push(PageRange::new(from, from));
    }

    /// Remove the entry at `index`. Refused (returns false) when it would
    /// leave the list empty or the index is out of range.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.entries.len() <= 1 || index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        true
    }

    /// Update one bound of an entry. The value is clamped to
    /// `[1, total_pages]` and the opposite bound is pulled along to keep
    /// `from <= to`.
    pub fn update(&mut self, index: usize, field: RangeField, value: u32) -> bool {
        let cap = self.page_cap();
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        let value = value.clamp(1, cap);
        match field {
            RangeField::From => {
                entry.from = value;
                if entry.to < value {
                    entry.to = value;
                }
            }
            RangeField::To => {
                entry.to = value;
                if entry.from > value {
                    entry.from = value;
                }
            }
        }
        true
    }

    /// Swap the entry at `index` with its neighbor. No-op at the list
    /// boundaries.
    pub fn move_entry(&mut self, index: usize, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Up if index > 0 && index < self.entries.len() => {
                self.entries.swap(index - 1, index);
                true
            }
            MoveDirection::Down if index + 1 < self.entries.len() => {
                self.entries.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Re-derive the document length (e.g. after files were added or
    /// removed) and re-clamp every entry. Entries are never dropped.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages;
        let cap = self.page_cap();
        for entry in &mut self.entries {
            entry.from = entry.from.clamp(1, cap);
            entry.to = entry.to.clamp(entry.from, cap);
        }
    }

    fn page_cap(&self) -> u32 {
        self.total_pages.max(1)
    }
}
