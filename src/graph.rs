// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Cross-module entity graph.
//!
//! The graph is the union of the classes declared in the module being
//! generated and the classes of every referenced module, keyed by name.
//! Relation targets are always looked up here, never in the current-module
//! subset, so a relation to an entity from another crate still resolves.
//!
//! ```text
//! current:    [Order, OrderItem, SalesService]
//! referenced: [Customer, Order (stale), Tag]
//!                 │
//!                 ▼  merge: current first, first name wins
//! graph:      [Order, OrderItem, SalesService, Customer, Tag]
//! ```
//!
//! Value types (enums and other non-class names) ride along so the
//! classifier can tell `status: Status` from `customer: Customer`.
//!
//! The graph is built once per pass and only read afterwards.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    config::Conventions,
    error::{Result, ScaffoldError},
    interpret::EntityFacts,
    model::{ClassRole, DeclaredType, EntityDef, PropertyDef}
};

/// Immutable union of current and referenced classes.
#[derive(Debug, Clone)]
pub struct EntityGraph {
    classes:     Vec<EntityDef>,
    index:       BTreeMap<String, usize>,
    current_len: usize,
    value_types: BTreeSet<String>,
    conventions: Conventions
}

impl EntityGraph {
    /// Merge current-module and referenced-module classes.
    ///
    /// Current classes keep declaration order and come first. A referenced
    /// class whose name is already present is dropped.
    #[must_use]
    pub fn merge(current: Vec<EntityDef>, referenced: Vec<EntityDef>, conventions: Conventions) -> Self {
        let mut graph = Self {
            classes: Vec::with_capacity(current.len() + referenced.len()),
            index: BTreeMap::new(),
            current_len: 0,
            value_types: BTreeSet::new(),
            conventions
        };
        for class in current {
            graph.insert(class);
        }
        graph.current_len = graph.classes.len();
        for class in referenced {
            graph.insert(class);
        }
        graph
    }

    /// Register names that are values, never relation targets.
    #[must_use]
    pub fn with_value_types<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.value_types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether `name` is a value type. A class of the same name wins.
    #[must_use]
    pub fn is_value_type(&self, name: &str) -> bool {
        self.value_types.contains(name) && !self.index.contains_key(name)
    }

    fn insert(&mut self, class: EntityDef) {
        if self.index.contains_key(&class.name) {
            tracing::debug!(class = %class.name, namespace = %class.namespace, "duplicate class name, keeping first");
            return;
        }
        self.index.insert(class.name.clone(), self.classes.len());
        self.classes.push(class);
    }

    /// Naming conventions the graph was built with.
    #[must_use]
    pub const fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the graph holds no class.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All classes, current module first.
    #[must_use]
    pub fn classes(&self) -> &[EntityDef] {
        &self.classes
    }

    /// Classes of the current module, in declaration order.
    #[must_use]
    pub fn current(&self) -> &[EntityDef] {
        &self.classes[..self.current_len]
    }

    /// Look up a class by exact name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&EntityDef> {
        self.index.get(name).map(|&i| &self.classes[i])
    }

    /// Classes with the entity role.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.with_role(ClassRole::Entity)
    }

    /// Classes with the service role.
    pub fn services(&self) -> impl Iterator<Item = &EntityDef> {
        self.with_role(ClassRole::Service)
    }

    fn with_role(&self, role: ClassRole) -> impl Iterator<Item = &EntityDef> {
        self.classes
            .iter()
            .filter(move |class| class.role(&self.conventions) == role)
    }

    /// Interpreted entity-level facts.
    #[must_use]
    pub fn facts(&self, entity: &EntityDef) -> EntityFacts {
        EntityFacts::of(entity, &self.conventions)
    }

    /// Hand-written DTO class extending `entity` (`{Entity}DTO` or
    /// `{Entity}Dto` in a DTO module).
    #[must_use]
    pub fn dto_for(&self, entity: &EntityDef) -> Option<&EntityDef> {
        [format!("{}DTO", entity.name), format!("{}Dto", entity.name)]
            .iter()
            .filter_map(|name| self.resolve(name))
            .find(|class| class.role(&self.conventions) == ClassRole::Dto)
    }

    /// Resolve the entity a relation property points at.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::MissingRelationTarget`] when the declared
    /// type names no class in the graph. Callers skip the relation.
    pub fn resolve_target(&self, property: &PropertyDef) -> Result<&EntityDef> {
        let declared = property.declared_type();
        let target = declared
            .reference()
            .or_else(|| declared.element())
            .unwrap_or_else(|| declared.spelling());
        self.resolve(target)
            .ok_or_else(|| ScaffoldError::MissingRelationTarget {
                entity:   property.entity_name.clone(),
                property: property.name.clone(),
                target:   target.to_string()
            })
    }

    /// Id type of an entity.
    ///
    /// The first generic argument of the base type, following base classes
    /// that are themselves in the graph, else the configured default.
    #[must_use]
    pub fn id_type(&self, entity: &EntityDef) -> String {
        let mut visited = BTreeSet::new();
        let mut current = entity;
        loop {
            if let Some(argument) = current.base_generic_argument() {
                return argument;
            }
            let Some(base) = current.base_name() else {
                break;
            };
            if !visited.insert(base.clone()) {
                break;
            }
            match self.resolve(&base) {
                Some(parent) => current = parent,
                None => break
            }
        }
        self.conventions.default_id_type.clone()
    }
}

/// Element class name of a collection spelling.
///
/// `Vec<OrderItem>` and `List<OrderItem>` yield `OrderItem`; non-collections
/// yield `None`.
#[must_use]
pub fn element_type_name(spelling: &str) -> Option<String> {
    DeclaredType::parse(spelling).element().map(str::to_string)
}
