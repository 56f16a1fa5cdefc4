// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Relationship and control-kind classification.
//!
//! Every property maps to exactly one [`RelationshipKind`] and exactly one
//! [`ControlKind`]. [`ControlKind::Unresolved`] is an explicit answer, not a
//! missing one: it renders as `TODO` so gaps show up in the generated file.
//!
//! # Control kind, first match wins
//!
//! | # | Rule | Result |
//! |---|------|--------|
//! | 1 | `UIControlType` value | parsed kind, `Unresolved` if unknown |
//! | 2 | `BlobName` marker | `File` |
//! | 3 | declared type references an entity | `Autocomplete` |
//! | 4 | `SimpleManyToManyTableLazyLoad` marker | `Table` |
//! | 5 | text / bool / date / decimal / integer | `TextBox` / `CheckBox` / `Calendar` / `Decimal` / `Integer` |
//! | 6 | anything else | `Unresolved` |
//!
//! # Relationship kind, first match wins
//!
//! `UIOrderedOneToMany` > `UIControlType = MultiSelect` >
//! `UIControlType = MultiAutocomplete` > `SimpleManyToManyTableLazyLoad` >
//! entity reference > none.
//!
//! Markers that lose are kept in [`Classification::conflicts`] and surface as
//! a `conflicting-relationship-markers` warning.
//!
//! A bare capitalised type only counts as an entity reference when the graph
//! does not list it as a value type; [`Classifier::classify_in`] applies that
//! check, [`Classifier::classify`] reads the spelling alone.
//!
//! # Presentation facts
//!
//! The same [`Classification`] carries the decimal scale, layout width, form
//! control name and table filter kind, so the form and the table-column paths
//! read one result instead of re-deriving it.

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::{
    error::{Diagnostic, DiagnosticCode},
    graph::EntityGraph,
    interpret::PropertyFacts,
    model::{DeclaredType, Primitive, PropertyDef},
    naming::{camel, loose_key}
};

/// How a property references other entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationshipKind {
    /// No relation.
    None,
    /// Single reference to another entity.
    ManyToOne,
    /// Ordered child collection edited inline.
    OneToManyOrdered,
    /// Many-to-many edited with a multi-select.
    ManyToManyMultiSelect,
    /// Many-to-many edited with a multi-autocomplete.
    ManyToManyMultiAutocomplete,
    /// Many-to-many edited in a paged table.
    ManyToManyLazyTable
}

impl RelationshipKind {
    /// Whether the relation links many targets through a selection.
    #[must_use]
    pub const fn is_many_to_many(&self) -> bool {
        matches!(
            self,
            Self::ManyToManyMultiSelect | Self::ManyToManyMultiAutocomplete | Self::ManyToManyLazyTable
        )
    }

    /// Whether the relation is edited with a multi-select style control.
    #[must_use]
    pub const fn is_multi_control(&self) -> bool {
        matches!(self, Self::ManyToManyMultiSelect | Self::ManyToManyMultiAutocomplete)
    }

    /// Whether the relation legitimately has a collection type.
    #[must_use]
    pub const fn carries_collection(&self) -> bool {
        matches!(self, Self::OneToManyOrdered) || self.is_many_to_many()
    }
}

/// UI widget representing a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlKind {
    /// Single line text.
    TextBox,
    /// Multi line text.
    TextArea,
    /// Rich text editor.
    Editor,
    /// Whole number.
    Integer,
    /// Fractional number.
    Decimal,
    /// Date/time picker.
    Calendar,
    /// Checkbox.
    CheckBox,
    /// Color picker.
    ColorPick,
    /// Dropdown of referenced entities.
    Dropdown,
    /// Autocomplete over referenced entities.
    Autocomplete,
    /// Multi-select over referenced entities.
    MultiSelect,
    /// Multi-autocomplete over referenced entities.
    MultiAutocomplete,
    /// File upload.
    File,
    /// Paged table.
    Table,
    /// Password input.
    Password,
    /// Read-only text.
    TextBlock,
    /// No rule applied; rendered as `TODO`.
    Unresolved
}

impl ControlKind {
    const NAMED: [Self; 16] = [
        Self::TextBox,
        Self::TextArea,
        Self::Editor,
        Self::Integer,
        Self::Decimal,
        Self::Calendar,
        Self::CheckBox,
        Self::ColorPick,
        Self::Dropdown,
        Self::Autocomplete,
        Self::MultiSelect,
        Self::MultiAutocomplete,
        Self::File,
        Self::Table,
        Self::Password,
        Self::TextBlock
    ];

    /// Parse an override value; unknown spellings yield `Unresolved`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let key = loose_key(value);
        Self::NAMED
            .into_iter()
            .find(|kind| loose_key(kind.name()) == key)
            .unwrap_or(Self::Unresolved)
    }

    /// Variant name, `TODO` for unresolved.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TextBox => "TextBox",
            Self::TextArea => "TextArea",
            Self::Editor => "Editor",
            Self::Integer => "Integer",
            Self::Decimal => "Decimal",
            Self::Calendar => "Calendar",
            Self::CheckBox => "CheckBox",
            Self::ColorPick => "ColorPick",
            Self::Dropdown => "Dropdown",
            Self::Autocomplete => "Autocomplete",
            Self::MultiSelect => "MultiSelect",
            Self::MultiAutocomplete => "MultiAutocomplete",
            Self::File => "File",
            Self::Table => "Table",
            Self::Password => "Password",
            Self::TextBlock => "TextBlock",
            Self::Unresolved => "TODO"
        }
    }

    /// Whether the control lists options loaded from the server.
    #[must_use]
    pub const fn has_options(&self) -> bool {
        matches!(
            self,
            Self::Autocomplete | Self::Dropdown | Self::MultiAutocomplete | Self::MultiSelect
        )
    }

    /// Whether options are searched as the user types.
    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        matches!(self, Self::Autocomplete | Self::MultiAutocomplete)
    }

    /// Whether the control spans the full row by default.
    #[must_use]
    pub const fn is_full_width(&self) -> bool {
        matches!(
            self,
            Self::File
                | Self::TextArea
                | Self::MultiSelect
                | Self::MultiAutocomplete
                | Self::Table
                | Self::Editor
        )
    }
}

/// Filter offered by a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Free text.
    Text,
    /// Yes/no.
    Boolean,
    /// Date comparison.
    Date,
    /// Number comparison.
    Numeric,
    /// Pick from a list.
    MultiSelect
}

impl FilterKind {
    /// Filter type name understood by the table widget.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::MultiSelect => "multiselect"
        }
    }

    /// Whether the column offers match-mode selection.
    #[must_use]
    pub const fn shows_match_modes(&self) -> bool {
        matches!(self, Self::Date | Self::Numeric)
    }
}

/// Layout width of a full-row control.
pub const FULL_WIDTH: &str = "col-12";

/// Layout width of a half-row control.
pub const HALF_WIDTH: &str = "col-12 md:col-6";

/// Classification result of one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Relationship kind.
    pub relationship:      RelationshipKind,
    /// Control kind.
    pub control:           ControlKind,
    /// Relationship kinds whose markers lost to `relationship`.
    pub conflicts:         Vec<RelationshipKind>,
    /// Referenced entity: the reference itself or the collection element.
    pub target:            Option<String>,
    /// Fraction digits of decimal controls.
    pub decimal_scale:     Option<u32>,
    /// Layout width classes.
    pub width:             String,
    /// Name of the bound form control.
    pub form_control_name: String,
    /// Table filter kind when shown as a column.
    pub filter:            Option<FilterKind>,
    /// Interpreted attribute facts.
    pub facts:             PropertyFacts,
    /// Analyzed declared type.
    pub declared:          DeclaredType
}

impl Classification {
    /// Warnings produced by this classification.
    #[must_use]
    pub fn diagnostics(&self, property: &PropertyDef) -> Vec<Diagnostic> {
        if self.conflicts.is_empty() {
            return Vec::new();
        }
        let losing = self
            .conflicts
            .iter()
            .map(|kind| format!("{kind:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            Diagnostic::warning(
                DiagnosticCode::ConflictingRelationshipMarkers,
                property.entity_name.clone(),
                format!("{:?} wins over {losing}", self.relationship)
            )
            .with_property(property.name.clone()),
        ]
    }
}

/// Pure classification function with its configurable default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    default_decimal_scale: u32
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Classifier {
    /// Create a classifier with the given default decimal scale.
    #[must_use]
    pub const fn new(default_decimal_scale: u32) -> Self {
        Self {
            default_decimal_scale
        }
    }

    /// Classify a property from its spelling alone.
    #[must_use]
    pub fn classify(&self, property: &PropertyDef) -> Classification {
        self.classify_declared(property, property.declared_type())
    }

    /// Classify a property against a graph: value types such as reflected
    /// enums are not relations.
    #[must_use]
    pub fn classify_in(&self, property: &PropertyDef, graph: &EntityGraph) -> Classification {
        let declared = property.declared_type();
        let value = declared.reference().is_some_and(|name| graph.is_value_type(name));
        let declared = if value { declared.into_value() } else { declared };
        self.classify_declared(property, declared)
    }

    fn classify_declared(&self, property: &PropertyDef, declared: DeclaredType) -> Classification {
        let facts = PropertyFacts::of(property);

        let mut candidates = relationship_candidates(&facts, &declared);
        let relationship = if candidates.is_empty() {
            RelationshipKind::None
        } else {
            candidates.remove(0)
        };
        let conflicts: Vec<RelationshipKind> = candidates
            .into_iter()
            .filter(|kind| *kind != RelationshipKind::ManyToOne)
            .collect();

        let control = control_kind(&facts, &declared);
        let target = declared
            .reference()
            .or_else(|| declared.element())
            .map(str::to_string);
        let decimal_scale = (control == ControlKind::Decimal)
            .then(|| facts.decimal_scale.unwrap_or(self.default_decimal_scale));
        let width = facts.control_width.clone().unwrap_or_else(|| {
            if control.is_full_width() {
                FULL_WIDTH.to_string()
            } else {
                HALF_WIDTH.to_string()
            }
        });
        let form_control_name = form_control_name(&property.name, relationship);
        let filter = filter_kind(control, &facts, &declared);

        tracing::trace!(
            entity = %property.entity_name,
            property = %property.name,
            ?relationship,
            ?control,
            "classified property"
        );

        Classification {
            relationship,
            control,
            conflicts,
            target,
            decimal_scale,
            width,
            form_control_name,
            filter,
            facts,
            declared
        }
    }
}

/// Relationship kinds supported by the facts, in precedence order.
fn relationship_candidates(facts: &PropertyFacts, declared: &DeclaredType) -> Vec<RelationshipKind> {
    let mut kinds = Vec::new();
    if facts.ordered_one_to_many {
        kinds.push(RelationshipKind::OneToManyOrdered);
    }
    match facts.control_type.as_deref().map(ControlKind::parse) {
        Some(ControlKind::MultiSelect) => kinds.push(RelationshipKind::ManyToManyMultiSelect),
        Some(ControlKind::MultiAutocomplete) => {
            kinds.push(RelationshipKind::ManyToManyMultiAutocomplete);
        }
        _ => {}
    }
    if facts.lazy_table {
        kinds.push(RelationshipKind::ManyToManyLazyTable);
    }
    if declared.reference().is_some() {
        kinds.push(RelationshipKind::ManyToOne);
    }
    kinds
}

fn control_kind(facts: &PropertyFacts, declared: &DeclaredType) -> ControlKind {
    if let Some(value) = facts.control_type.as_deref() {
        return ControlKind::parse(value);
    }
    if facts.blob {
        return ControlKind::File;
    }
    if declared.reference().is_some() {
        return ControlKind::Autocomplete;
    }
    if facts.lazy_table {
        return ControlKind::Table;
    }
    match declared.primitive() {
        Some(Primitive::Text) => ControlKind::TextBox,
        Some(Primitive::Boolean) => ControlKind::CheckBox,
        Some(Primitive::DateTime) => ControlKind::Calendar,
        Some(Primitive::Decimal) => ControlKind::Decimal,
        Some(Primitive::Integer) => ControlKind::Integer,
        None => ControlKind::Unresolved
    }
}

fn filter_kind(control: ControlKind, facts: &PropertyFacts, declared: &DeclaredType) -> Option<FilterKind> {
    if control == ControlKind::Dropdown || facts.comma_separated_display_name {
        return Some(FilterKind::MultiSelect);
    }
    if declared.reference().is_some() {
        return Some(FilterKind::Text);
    }
    match declared.primitive()? {
        Primitive::Text => Some(FilterKind::Text),
        Primitive::Boolean => Some(FilterKind::Boolean),
        Primitive::DateTime => Some(FilterKind::Date),
        Primitive::Decimal | Primitive::Integer => Some(FilterKind::Numeric)
    }
}

/// Many-to-one relations bind to the referenced id.
fn form_control_name(name: &str, relationship: RelationshipKind) -> String {
    let base = camel(name);
    if relationship == RelationshipKind::ManyToOne && !base.ends_with("Id") {
        format!("{base}Id")
    } else {
        base
    }
}
