// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use entity_scaffold_core::prelude::*;
//! ```

pub use crate::{
    ColumnFilter, EXCEL_CONTENT_TYPE, LazyLoadSelectedIdsResult, LookupQuery, Namebook,
    SelectionSet, SortDirection, SortMeta, TableFilter, TableResponse
};
