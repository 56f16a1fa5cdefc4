// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tri-state selection for lazy-loaded many-to-many tables.
//!
//! The candidate rows of a lazy table are paged on the server, so the client
//! never holds the full list. Instead of a plain id list the save payload
//! carries three pieces of state:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `selected_ids` | Ids checked since the record was loaded |
//! | `unselected_ids` | Ids unchecked since the record was loaded |
//! | `are_all_selected` | `Some(true)` after "select all", `Some(false)` after "unselect all", `None` otherwise |
//!
//! An id is never in both lists: checking an id removes it from
//! `unselected_ids` and unchecking removes it from `selected_ids`.
//!
//! # Example
//!
//! ```rust
//! use entity_scaffold_core::SelectionSet;
//!
//! let mut set = SelectionSet::<i64>::default();
//! set.select(1);
//! set.select(2);
//! set.unselect(1);
//!
//! assert_eq!(set.selected_ids(), &[2]);
//! assert_eq!(set.unselected_ids(), &[1]);
//! assert!(set.is_selected(2, false));
//! ```

use serde::{Deserialize, Serialize};

use crate::TableFilter;

/// Selection state of one lazy-table relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionSet<Id> {
    selected_ids:     Vec<Id>,
    unselected_ids:   Vec<Id>,
    are_all_selected: Option<bool>,
    table_filter:     Option<TableFilter<Id>>
}

impl<Id> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            selected_ids:     Vec::new(),
            unselected_ids:   Vec::new(),
            are_all_selected: None,
            table_filter:     None
        }
    }
}

impl<Id: PartialEq> SelectionSet<Id> {
    /// Mark an id as selected.
    pub fn select(&mut self, id: Id) {
        self.unselected_ids.retain(|u| *u != id);
        if !self.selected_ids.contains(&id) {
            self.selected_ids.push(id);
        }
    }

    /// Mark an id as unselected.
    pub fn unselect(&mut self, id: Id) {
        self.selected_ids.retain(|s| *s != id);
        if !self.unselected_ids.contains(&id) {
            self.unselected_ids.push(id);
        }
    }

    /// Select every row matching `filter`, discarding individual choices.
    pub fn select_all(&mut self, filter: TableFilter<Id>) {
        self.selected_ids.clear();
        self.unselected_ids.clear();
        self.are_all_selected = Some(true);
        self.table_filter = Some(filter);
    }

    /// Unselect every row matching `filter`, discarding individual choices.
    pub fn unselect_all(&mut self, filter: TableFilter<Id>) {
        self.selected_ids.clear();
        self.unselected_ids.clear();
        self.are_all_selected = Some(false);
        self.table_filter = Some(filter);
    }

    /// Effective state of `id`, given whether it was linked when loaded.
    ///
    /// Individual choices override a bulk selection, which overrides the
    /// stored link.
    #[must_use]
    pub fn is_selected(&self, id: Id, initially_selected: bool) -> bool {
        if self.selected_ids.contains(&id) {
            return true;
        }
        if self.unselected_ids.contains(&id) {
            return false;
        }
        self.are_all_selected.unwrap_or(initially_selected)
    }

    /// Ids checked since load.
    #[must_use]
    pub fn selected_ids(&self) -> &[Id] {
        &self.selected_ids
    }

    /// Ids unchecked since load.
    #[must_use]
    pub fn unselected_ids(&self) -> &[Id] {
        &self.unselected_ids
    }

    /// Bulk selection flag.
    #[must_use]
    pub const fn are_all_selected(&self) -> Option<bool> {
        self.are_all_selected
    }

    /// Filter that was active during the last bulk selection.
    #[must_use]
    pub const fn table_filter(&self) -> Option<&TableFilter<Id>> {
        self.table_filter.as_ref()
    }

    /// Whether the set records no change at all.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.selected_ids.is_empty()
            && self.unselected_ids.is_empty()
            && self.are_all_selected.is_none()
    }
}
