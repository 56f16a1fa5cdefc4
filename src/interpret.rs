// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute interpretation.
//!
//! Turns raw [`AttributeDef`] lists into typed facts. Names compare loosely
//! (case and `_`/`-` ignored), unknown names are skipped and a missing
//! attribute simply leaves its fact at the default.
//!
//! # Recognized markers
//!
//! | Marker | Aliases | Scope | Fact |
//! |--------|---------|-------|------|
//! | `UIOrderedOneToMany` | | property | `ordered_one_to_many` |
//! | `UIDoNotGenerate` | `DoNotGenerate` | both | `do_not_generate` |
//! | `UIControlType` | `ControlType` | property | `control_type` |
//! | `UIControlWidth` | `ControlWidth` | property | `control_width` |
//! | `SimpleManyToManyTableLazyLoad` | `LazyTable` | property | `lazy_table` |
//! | `GenerateCommaSeparatedDisplayName` | | property | `comma_separated_display_name` |
//! | `UIAdditionalPermissionCodeForInsert` | | entity | `extra_insert_permissions` |
//! | `UIAdditionalPermissionCodeForUpdate` | | entity | `extra_update_permissions` |
//! | `DoNotAuthorize` | | entity | `do_not_authorize` |
//! | `BlobName` | `Blob` | property | `blob` |
//! | `Required` | | property | `required` |
//! | `WithMany` | | property | `with_many` |
//! | `Precision` | `DecimalScale` | property | `decimal_scale` |
//! | `UITableColumn` | `TableColumn` | property | `table_columns` |
//! | `DisplayName` | | property | `display_name` |
//! | `Controller` | | entity | `controller` |
//! | `M2M` | `ManyToManyJoin` | entity | `join_only` |
//! | `ReadOnly` | | entity | `read_only` |

use crate::{
    config::Conventions,
    model::{AttributeDef, EntityDef, PropertyDef},
    naming::loose_key
};

/// Recognized attribute markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Ordered one-to-many collection edited inline.
    OrderedOneToMany,
    /// Exclude from generation.
    DoNotGenerate,
    /// Explicit control kind.
    ControlType,
    /// Explicit layout width.
    ControlWidth,
    /// Many-to-many relation rendered as a paged table.
    LazyTable,
    /// Column displays a comma separated list of names.
    CommaSeparatedDisplayName,
    /// Extra permission required to insert.
    AdditionalInsertPermission,
    /// Extra permission required to update.
    AdditionalUpdatePermission,
    /// Endpoints are not authorization-gated.
    DoNotAuthorize,
    /// Property stores a blob name.
    Blob,
    /// Property must be set.
    Required,
    /// Back-reference to the owning collection.
    WithMany,
    /// Numeric precision, `"p,s"` or `"s"`.
    Precision,
    /// Column of a lazy table.
    TableColumn,
    /// Property is the display name of its entity.
    DisplayName,
    /// Explicit controller group.
    Controller,
    /// Join-only many-to-many entity.
    JoinOnly,
    /// Entity is read-only.
    ReadOnly
}

impl Marker {
    const ALL: [Self; 18] = [
        Self::OrderedOneToMany,
        Self::DoNotGenerate,
        Self::ControlType,
        Self::ControlWidth,
        Self::LazyTable,
        Self::CommaSeparatedDisplayName,
        Self::AdditionalInsertPermission,
        Self::AdditionalUpdatePermission,
        Self::DoNotAuthorize,
        Self::Blob,
        Self::Required,
        Self::WithMany,
        Self::Precision,
        Self::TableColumn,
        Self::DisplayName,
        Self::Controller,
        Self::JoinOnly,
        Self::ReadOnly
    ];

    /// Canonical spelling.
    #[must_use]
    pub const fn canonical(&self) -> &'static str {
        self.names()[0]
    }

    /// Accepted spellings, canonical first.
    #[must_use]
    pub const fn names(&self) -> &'static [&'static str] {
        match self {
            Self::OrderedOneToMany => &["UIOrderedOneToMany"],
            Self::DoNotGenerate => &["UIDoNotGenerate", "DoNotGenerate"],
            Self::ControlType => &["UIControlType", "ControlType"],
            Self::ControlWidth => &["UIControlWidth", "ControlWidth"],
            Self::LazyTable => &["SimpleManyToManyTableLazyLoad", "LazyTable"],
            Self::CommaSeparatedDisplayName => &["GenerateCommaSeparatedDisplayName"],
            Self::AdditionalInsertPermission => &["UIAdditionalPermissionCodeForInsert"],
            Self::AdditionalUpdatePermission => &["UIAdditionalPermissionCodeForUpdate"],
            Self::DoNotAuthorize => &["DoNotAuthorize"],
            Self::Blob => &["BlobName", "Blob"],
            Self::Required => &["Required"],
            Self::WithMany => &["WithMany"],
            Self::Precision => &["Precision", "DecimalScale"],
            Self::TableColumn => &["UITableColumn", "TableColumn"],
            Self::DisplayName => &["DisplayName"],
            Self::Controller => &["Controller"],
            Self::JoinOnly => &["M2M", "ManyToManyJoin"],
            Self::ReadOnly => &["ReadOnly"]
        }
    }

    /// Look up a marker by any accepted spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let key = loose_key(name);
        Self::ALL
            .into_iter()
            .find(|marker| marker.names().iter().any(|n| loose_key(n) == key))
    }
}

/// Typed facts about a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFacts {
    /// `UIOrderedOneToMany`.
    pub ordered_one_to_many:          bool,
    /// `UIDoNotGenerate`.
    pub do_not_generate:              bool,
    /// Raw `UIControlType` value.
    pub control_type:                 Option<String>,
    /// `UIControlWidth` value.
    pub control_width:                Option<String>,
    /// `SimpleManyToManyTableLazyLoad`.
    pub lazy_table:                   bool,
    /// `GenerateCommaSeparatedDisplayName`.
    pub comma_separated_display_name: bool,
    /// `BlobName`.
    pub blob:                         bool,
    /// `Required`.
    pub required:                     bool,
    /// `WithMany` value: the owner's collection property name.
    pub with_many:                    Option<String>,
    /// Scale taken from `Precision`.
    pub decimal_scale:                Option<u32>,
    /// `UITableColumn` values in declaration order.
    pub table_columns:                Vec<String>,
    /// `DisplayName`.
    pub display_name:                 bool
}

impl PropertyFacts {
    /// Interpret a property's attributes.
    #[must_use]
    pub fn of(property: &PropertyDef) -> Self {
        Self::from_attributes(&property.attributes)
    }

    /// Interpret a raw attribute list.
    #[must_use]
    pub fn from_attributes(attributes: &[AttributeDef]) -> Self {
        let mut facts = Self::default();
        for attribute in attributes {
            let Some(marker) = Marker::from_name(&attribute.name) else {
                continue;
            };
            let value = attribute.value.as_deref().map(unquote);
            match marker {
                Marker::OrderedOneToMany => facts.ordered_one_to_many = true,
                Marker::DoNotGenerate => facts.do_not_generate = true,
                Marker::ControlType => facts.control_type = value.map(str::to_string),
                Marker::ControlWidth => facts.control_width = value.map(str::to_string),
                Marker::LazyTable => facts.lazy_table = true,
                Marker::CommaSeparatedDisplayName => facts.comma_separated_display_name = true,
                Marker::Blob => facts.blob = true,
                Marker::Required => facts.required = true,
                Marker::WithMany => facts.with_many = value.map(str::to_string),
                Marker::Precision => facts.decimal_scale = value.and_then(parse_scale),
                Marker::TableColumn => facts.table_columns.extend(value.map(str::to_string)),
                Marker::DisplayName => facts.display_name = true,
                _ => {}
            }
        }
        facts
    }
}

/// Typed facts about an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFacts {
    /// `UIDoNotGenerate` on the entity.
    pub do_not_generate_ui:       bool,
    /// `DoNotAuthorize`.
    pub do_not_authorize:         bool,
    /// `M2M`: join-only many-to-many entity.
    pub join_only:                bool,
    /// `ReadOnly` marker or read-only base type.
    pub read_only:                bool,
    /// `Controller` value.
    pub controller:               Option<String>,
    /// `UIAdditionalPermissionCodeForInsert` values.
    pub extra_insert_permissions: Vec<String>,
    /// `UIAdditionalPermissionCodeForUpdate` values.
    pub extra_update_permissions: Vec<String>
}

impl EntityFacts {
    /// Interpret an entity's attributes and base type.
    #[must_use]
    pub fn of(entity: &EntityDef, conventions: &Conventions) -> Self {
        let mut facts = Self::default();
        for attribute in &entity.attributes {
            let Some(marker) = Marker::from_name(&attribute.name) else {
                continue;
            };
            let value = attribute.value.as_deref().map(unquote);
            match marker {
                Marker::DoNotGenerate => facts.do_not_generate_ui = true,
                Marker::DoNotAuthorize => facts.do_not_authorize = true,
                Marker::JoinOnly => facts.join_only = true,
                Marker::ReadOnly => facts.read_only = true,
                Marker::Controller => facts.controller = value.map(str::to_string),
                Marker::AdditionalInsertPermission => {
                    facts.extra_insert_permissions.extend(value.map(str::to_string));
                }
                Marker::AdditionalUpdatePermission => {
                    facts.extra_update_permissions.extend(value.map(str::to_string));
                }
                _ => {}
            }
        }
        if let Some(base) = entity.base_name()
            && base.starts_with(conventions.read_only_base.as_str())
        {
            facts.read_only = true;
        }
        facts
    }

    /// Whether endpoints and UI checks are authorization-gated.
    #[must_use]
    pub const fn authorize(&self) -> bool {
        !self.do_not_authorize
    }
}

/// Strip surrounding quotes left by some hosts.
fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Scale part of a precision value: `"18,4"` yields 4, `"2"` yields 2.
fn parse_scale(value: &str) -> Option<u32> {
    value.rsplit(',').next()?.trim().parse().ok()
}
