// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Property ordering and grouping.
//!
//! Decides which properties become form blocks, in which order, and how
//! ordered one-to-many relations nest their child entity's blocks.
//!
//! # Exclusion
//!
//! - Technical fields: `Id`, `Version`, `CreatedAt`, `ModifiedAt`
//! - Properties marked `UIDoNotGenerate`
//! - Collections, unless the relation is ordered one-to-many, multi-select,
//!   multi-autocomplete or lazy table (inside nested blocks every
//!   collection is excluded)
//!
//! # Ordering
//!
//! A stable sort on [`Bucket`]; declaration order survives inside a bucket.
//!
//! | Bucket | Properties |
//! |--------|------------|
//! | 0 | blob / file |
//! | 1 | everything else |
//! | 2 | text areas |
//! | 3 | rich editors |
//! | 4 | ordered one-to-many |
//! | 5 | lazy-table many-to-many |
//!
//! # Grouping
//!
//! ```text
//! Order
//! ├── Control(customer)            bucket 1
//! ├── Control(status)              bucket 1
//! └── Nested(items → OrderItem)    bucket 4
//!     ├── Control(product)
//!     └── Control(quantity)        (OrderItem.order back-reference dropped)
//! ```
//!
//! Properties of a hand-written `{Entity}DTO` class are appended to the
//! entity's own before ordering.
//!
//! # Targets
//!
//! Every relation, nested children included, is resolved against the graph.
//! A relation whose target is missing produces no block and a
//! `missing-relation-target` warning.


use crate::{
    classify::{Classification, Classifier, ControlKind, RelationshipKind},
    error::{Diagnostic, DiagnosticCode},
    graph::EntityGraph,
    interpret::PropertyFacts,
    model::{EntityDef, PropertyDef},
    naming::loose_eq
};

/// Technical fields never shown in forms.
pub const TECHNICAL_FIELDS: [&str; 4] = ["Id", "Version", "CreatedAt", "ModifiedAt"];

/// Sort bucket of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Blob / file properties.
    Blob,
    /// Everything else.
    Default,
    /// Text areas.
    TextArea,
    /// Rich editors.
    Editor,
    /// Ordered one-to-many collections.
    OrderedOneToMany,
    /// Lazy-table many-to-many collections.
    LazyTable
}

impl Bucket {
    /// Bucket of a classified property.
    #[must_use]
    pub fn of(classification: &Classification) -> Self {
        if classification.facts.blob || classification.control == ControlKind::File {
            Self::Blob
        } else if classification.control == ControlKind::TextArea {
            Self::TextArea
        } else if classification.control == ControlKind::Editor {
            Self::Editor
        } else if classification.relationship == RelationshipKind::OneToManyOrdered {
            Self::OrderedOneToMany
        } else if classification.relationship == RelationshipKind::ManyToManyLazyTable {
            Self::LazyTable
        } else {
            Self::Default
        }
    }
}

/// Where a property list is being laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The entity's own form.
    TopLevel,
    /// Child blocks of an ordered one-to-many relation.
    Nested
}

/// Whether a property is one of the technical fields.
#[must_use]
pub fn is_technical_field(name: &str) -> bool {
    TECHNICAL_FIELDS.iter().any(|field| loose_eq(field, name))
}

/// Whether a classified property takes part in generated blocks.
#[must_use]
pub fn is_eligible(property: &PropertyDef, classification: &Classification, scope: Scope) -> bool {
    if is_technical_field(&property.name) || classification.facts.do_not_generate {
        return false;
    }
    if !classification.declared.is_collection() {
        return true;
    }
    scope == Scope::TopLevel && classification.relationship.carries_collection()
}

/// A property with its classification and bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLayout<'g> {
    /// Laid out property.
    pub property:       &'g PropertyDef,
    /// Its classification.
    pub classification: Classification,
    /// Its sort bucket.
    pub bucket:         Bucket,
    /// Resolved relation target, filled in by [`LayoutEngine`].
    pub target:         Option<&'g EntityDef>
}

/// One form block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutBlock<'g> {
    /// A single control.
    Control(PropertyLayout<'g>),
    /// An ordered one-to-many relation with the child entity's blocks.
    Nested {
        /// The collection property.
        owner:  PropertyLayout<'g>,
        /// Resolved child entity.
        target: &'g EntityDef,
        /// Child blocks, all controls.
        blocks: Vec<LayoutBlock<'g>>
    }
}

impl<'g> LayoutBlock<'g> {
    /// Property layout heading this block.
    #[must_use]
    pub const fn head(&self) -> &PropertyLayout<'g> {
        match self {
            Self::Control(layout) => layout,
            Self::Nested {
                owner, ..
            } => owner
        }
    }
}

/// Ordered blocks of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLayout<'g> {
    /// Laid out entity.
    pub entity:      &'g EntityDef,
    /// Top-level blocks in order.
    pub blocks:      Vec<LayoutBlock<'g>>,
    /// Problems found while laying out.
    pub diagnostics: Vec<Diagnostic>
}

impl<'g> EntityLayout<'g> {
    /// Top-level property layouts in block order.
    pub fn heads(&self) -> impl Iterator<Item = &PropertyLayout<'g>> {
        self.blocks.iter().map(LayoutBlock::head)
    }

    /// Every property layout, nested children after their owner.
    #[must_use]
    pub fn all(&self) -> Vec<(&'g EntityDef, &PropertyLayout<'g>)> {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                LayoutBlock::Control(layout) => out.push((self.entity, layout)),
                LayoutBlock::Nested {
                    owner,
                    target,
                    blocks
                } => {
                    out.push((self.entity, owner));
                    out.extend(blocks.iter().map(|child| (*target, child.head())));
                }
            }
        }
        out
    }
}

/// Classify, filter and stably sort a property list.
#[must_use]
pub fn order_properties<'g>(
    properties: impl IntoIterator<Item = &'g PropertyDef>,
    classifier: &Classifier,
    scope: Scope
) -> Vec<PropertyLayout<'g>> {
    order_by(properties, |property| classifier.classify(property), scope)
}

fn order_by<'g>(
    properties: impl IntoIterator<Item = &'g PropertyDef>,
    classify: impl Fn(&PropertyDef) -> Classification,
    scope: Scope
) -> Vec<PropertyLayout<'g>> {
    let mut layouts: Vec<PropertyLayout<'g>> = properties
        .into_iter()
        .filter_map(|property| {
            let classification = classify(property);
            is_eligible(property, &classification, scope).then(|| PropertyLayout {
                property,
                bucket: Bucket::of(&classification),
                classification,
                target: None
            })
        })
        .collect();
    layouts.sort_by_key(|layout| layout.bucket);
    layouts
}

/// Lays out entities against a graph.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'g> {
    graph:      &'g EntityGraph,
    classifier: Classifier
}

impl<'g> LayoutEngine<'g> {
    /// Create an engine.
    #[must_use]
    pub const fn new(graph: &'g EntityGraph, classifier: Classifier) -> Self {
        Self {
            graph,
            classifier
        }
    }

    /// The classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Entity properties followed by its DTO class properties.
    fn layout_input(&self, entity: &'g EntityDef) -> Vec<&'g PropertyDef> {
        let dto = self.graph.dto_for(entity).map(|dto| dto.properties.as_slice()).unwrap_or_default();
        entity.properties.iter().chain(dto).collect()
    }

    fn ordered(&self, properties: impl IntoIterator<Item = &'g PropertyDef>, scope: Scope) -> Vec<PropertyLayout<'g>> {
        order_by(properties, |property| self.classifier.classify_in(property, self.graph), scope)
    }

    /// Resolve the target of a relation; plain controls pass through.
    fn resolve(&self, mut layout: PropertyLayout<'g>, diagnostics: &mut Vec<Diagnostic>) -> Option<PropertyLayout<'g>> {
        if layout.classification.relationship == RelationshipKind::None {
            return Some(layout);
        }
        match self.graph.resolve_target(layout.property) {
            Ok(target) => {
                layout.target = Some(target);
                Some(layout)
            }
            Err(err) => {
                tracing::warn!(
                    entity = %layout.property.entity_name,
                    property = %layout.property.name,
                    %err,
                    "skipping relation block"
                );
                diagnostics.push(Diagnostic::from_error(&layout.property.entity_name, &err));
                None
            }
        }
    }

    /// Lay out an entity.
    #[must_use]
    pub fn layout(&self, entity: &'g EntityDef) -> EntityLayout<'g> {
        let mut diagnostics = Vec::new();
        let mut blocks = Vec::new();

        for layout in self.ordered(self.layout_input(entity), Scope::TopLevel) {
            diagnostics.extend(layout.classification.diagnostics(layout.property));
            let Some(layout) = self.resolve(layout, &mut diagnostics) else {
                continue;
            };

            let Some(target) = layout
                .target
                .filter(|_| layout.classification.relationship == RelationshipKind::OneToManyOrdered)
            else {
                diagnostics.extend(unresolved_control(&layout));
                blocks.push(LayoutBlock::Control(layout));
                continue;
            };

            let children = self
                .layout_input(target)
                .into_iter()
                .filter(|child| !is_back_reference(child, entity, layout.property));
            let mut nested = Vec::new();
            for child in self.ordered(children, Scope::Nested) {
                diagnostics.extend(child.classification.diagnostics(child.property));
                if let Some(child) = self.resolve(child, &mut diagnostics) {
                    diagnostics.extend(unresolved_control(&child));
                    nested.push(LayoutBlock::Control(child));
                }
            }
            blocks.push(LayoutBlock::Nested {
                owner: layout,
                target,
                blocks: nested
            });
        }

        EntityLayout {
            entity,
            blocks,
            diagnostics
        }
    }
}

/// Note for controls that render as `TODO`.
fn unresolved_control(layout: &PropertyLayout<'_>) -> Option<Diagnostic> {
    (layout.classification.control == ControlKind::Unresolved).then(|| {
        Diagnostic::note(
            DiagnosticCode::UnresolvedControl,
            layout.property.entity_name.clone(),
            format!("no control for type `{}`", layout.property.ty)
        )
        .with_property(layout.property.name.clone())
    })
}

/// Whether a child property points back at the owning collection.
fn is_back_reference(child: &PropertyDef, owner: &EntityDef, collection: &PropertyDef) -> bool {
    let facts = PropertyFacts::of(child);
    if let Some(with_many) = facts.with_many.as_deref() {
        return loose_eq(with_many, &collection.name);
    }
    child.declared_type().reference() == Some(owner.name.as_str())
}
