// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core types for entity-scaffold generated controllers.
//!
//! Generated `*_base_controller.generated.rs` files reference these types in
//! handler signatures. Business services implement the matching methods and
//! return them.
//!
//! # Overview
//!
//! - [`TableFilter`] — Paged, sorted, filtered table query sent by the client
//! - [`TableResponse`] — One page of rows plus the total row count
//! - [`Namebook`] — Id plus display name, used by dropdowns and selections
//! - [`LookupQuery`] — Autocomplete/dropdown query parameters
//! - [`SelectionSet`] — Tri-state selection for lazy-loaded many-to-many tables
//! - [`prelude`] — Convenient re-exports
//!
//! # Usage
//!
//! ```rust,ignore
//! use entity_scaffold_core::prelude::*;
//!
//! impl SalesBusinessService {
//!     pub async fn get_order_table_data(
//!         &self,
//!         filter: TableFilter<i64>,
//!         authorize: bool
//!     ) -> Result<TableResponse<OrderDto>, AppError> {
//!         // ...
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod prelude;
pub mod selection;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use selection::SelectionSet;

/// Content type of spreadsheet exports returned by `export_*` handlers.
pub const EXCEL_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Sort direction for table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,

    /// Descending order (Z-A, 9-0, newest first).
    Desc
}

impl SortDirection {
    /// Convert the client-side sort order (`1` / `-1`) to a direction.
    ///
    /// Anything other than a negative number sorts ascending.
    #[must_use]
    pub const fn from_order(order: i32) -> Self {
        if order < 0 { Self::Desc } else { Self::Asc }
    }

    /// Convert to SQL keyword.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC"
        }
    }
}

/// Sort instruction for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortMeta {
    /// Column field name.
    pub field: String,

    /// Sort direction.
    pub order: SortDirection
}

/// Filter applied to one column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnFilter {
    /// Raw filter value as typed by the user.
    pub value:      Option<String>,
    /// Match mode (`contains`, `equals`, `dateIs`, ...).
    pub match_mode: Option<String>,
    /// Operator combining multiple filters on one column (`and` / `or`).
    pub operator:   Option<String>
}

/// Table query sent by generated table and lazy-table endpoints.
///
/// `owner_id` is set when the table lists the candidates of a many-to-many
/// relation and the owning record already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableFilter<Id> {
    /// Index of the first row to return.
    pub first:          i64,
    /// Number of rows to return.
    pub rows:           i64,
    /// Sort instructions, applied in order.
    pub multi_sort_meta: Vec<SortMeta>,
    /// Filters keyed by column field name.
    pub filters:        BTreeMap<String, Vec<ColumnFilter>>,
    /// Id of the owning record, if any.
    pub owner_id:       Option<Id>
}

impl<Id> Default for TableFilter<Id> {
    fn default() -> Self {
        Self {
            first:           0,
            rows:            10,
            multi_sort_meta: Vec::new(),
            filters:         BTreeMap::new(),
            owner_id:        None
        }
    }
}

impl<Id> TableFilter<Id> {
    /// Create a filter for one page of rows.
    ///
    /// # Example
    ///
    /// ```rust
    /// use entity_scaffold_core::TableFilter;
    ///
    /// let filter = TableFilter::<i64>::page(2, 25);
    /// assert_eq!(filter.first, 50);
    /// assert_eq!(filter.rows, 25);
    /// ```
    #[must_use]
    pub fn page(page: i64, per_page: i64) -> Self {
        Self {
            first: page * per_page,
            rows: per_page,
            ..Self::default()
        }
    }

    /// Whether any column filter carries a value.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        self.filters
            .values()
            .flatten()
            .any(|f| f.value.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

/// One page of table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse<T> {
    /// Rows of the requested page.
    pub data:          Vec<T>,
    /// Row count before paging.
    pub total_records: i64
}

impl<T> TableResponse<T> {
    /// Create a response from a page of rows and the total count.
    #[must_use]
    pub const fn new(data: Vec<T>, total_records: i64) -> Self {
        Self {
            data,
            total_records
        }
    }
}

/// Id plus display name of a referenced record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namebook<Id> {
    /// Record id.
    pub id:           Id,
    /// Human readable label.
    pub display_name: String
}

impl<Id> Namebook<Id> {
    /// Create a namebook entry.
    pub fn new(id: Id, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into()
        }
    }
}

/// Query parameters of autocomplete and dropdown lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupQuery<Id> {
    /// Maximum number of options to return.
    pub limit:    Option<i64>,
    /// Text typed by the user.
    pub query:    Option<String>,
    /// Id of the record that owns the lookup, if it exists already.
    pub owner_id: Option<Id>
}

impl<Id> Default for LookupQuery<Id> {
    fn default() -> Self {
        Self {
            limit:    None,
            query:    None,
            owner_id: None
        }
    }
}

impl<Id> LookupQuery<Id> {
    /// Default autocomplete page size.
    pub const DEFAULT_LIMIT: i64 = 20;

    /// Requested limit, or [`Self::DEFAULT_LIMIT`].
    #[must_use]
    pub fn limit_or_default(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

/// Result of the "select all" lazy-table endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LazyLoadSelectedIdsResult<Id> {
    /// Ids already linked to the owning record.
    pub selected_ids:  Vec<Id>,
    /// Total number of candidate rows.
    pub total_records: i64
}
