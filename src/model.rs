// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Metadata model.
//!
//! Plain data describing the classes handed over by the host: entities,
//! services and hand-written DTO classes all share [`EntityDef`]. Values are
//! built once per pass, moved into the [`EntityGraph`](crate::graph::EntityGraph)
//! and only read afterwards.
//!
//! # Structure
//!
//! ```text
//! EntityDef
//! ├── name, namespace, base_type
//! ├── attributes: Vec<AttributeDef>
//! └── properties: Vec<PropertyDef>
//!     ├── name, ty, entity_name
//!     └── attributes: Vec<AttributeDef>
//! ```
//!
//! Namespaces accept both `::` and `.` separators, so metadata reflected from
//! Rust modules and from dotted namespaces behaves the same.

pub mod types;

use crate::{config::Conventions, naming::loose_eq};

pub use types::{DeclaredType, Primitive, TypeShape};

/// Raw attribute: a name and an optional string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDef {
    /// Attribute name as written.
    pub name:  String,
    /// Attribute argument, if any.
    pub value: Option<String>
}

impl AttributeDef {
    /// Marker attribute without value.
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name:  name.into(),
            value: None
        }
    }

    /// Attribute with a value.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name:  name.into(),
            value: Some(value.into())
        }
    }

    /// Whether this attribute has the given name, ignoring case and `_`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        loose_eq(&self.name, name)
    }
}

/// A property of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    /// Property name as declared.
    pub name:        String,
    /// Declared type spelling, e.g. `Vec<OrderItem>` or `Option<Customer>`.
    pub ty:          String,
    /// Name of the class declaring the property.
    pub entity_name: String,
    /// Attributes attached to the property.
    pub attributes:  Vec<AttributeDef>
}

impl PropertyDef {
    /// Create a property without attributes.
    ///
    /// The owning entity name is filled in by [`EntityDef::with_property`].
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name:        name.into(),
            ty:          ty.into(),
            entity_name: String::new(),
            attributes:  Vec::new()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a marker attribute.
    #[must_use]
    pub fn marked(self, name: &str) -> Self {
        self.with_attribute(AttributeDef::marker(name))
    }

    /// Analyze the declared type spelling.
    #[must_use]
    pub fn declared_type(&self) -> DeclaredType {
        DeclaredType::parse(&self.ty)
    }

    /// Whether the declared type is a collection.
    #[must_use]
    pub fn is_enumerable(&self) -> bool {
        self.declared_type().is_collection()
    }
}

/// Role of a class, derived from the last segment of its namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassRole {
    /// Data-model class.
    Entity,
    /// Business service class.
    Service,
    /// Hand-written DTO class extending an entity's DTO.
    Dto,
    /// Anything else.
    Other
}

/// A class: entity, service or DTO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDef {
    /// Class name, unique within its namespace.
    pub name:       String,
    /// Module path, `::` or `.` separated.
    pub namespace:  String,
    /// Base type spelling, e.g. `BusinessObject<i64>`.
    pub base_type:  Option<String>,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDef>,
    /// Class-level attributes.
    pub attributes: Vec<AttributeDef>
}

impl EntityDef {
    /// Create a class without base type, properties or attributes.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name:       name.into(),
            namespace:  namespace.into(),
            base_type:  None,
            properties: Vec::new(),
            attributes: Vec::new()
        }
    }

    /// Set the base type.
    #[must_use]
    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Append a property, taking ownership of its `entity_name`.
    #[must_use]
    pub fn with_property(mut self, mut property: PropertyDef) -> Self {
        property.entity_name = self.name.clone();
        self.properties.push(property);
        self
    }

    /// Add a class-level attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Find a property by name, ignoring case and `_`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| loose_eq(&p.name, name))
    }

    /// Namespace segments with separators normalized.
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace
            .split(['.', ':'])
            .filter(|segment| !segment.is_empty())
    }

    /// Namespace with `::` separators.
    #[must_use]
    pub fn module_path(&self) -> String {
        self.namespace_segments().collect::<Vec<_>>().join("::")
    }

    /// Role derived from the last namespace segment.
    #[must_use]
    pub fn role(&self, conventions: &Conventions) -> ClassRole {
        let Some(last) = self.namespace_segments().last() else {
            return ClassRole::Other;
        };
        if loose_eq(last, &conventions.entity_module) {
            ClassRole::Entity
        } else if loose_eq(last, &conventions.service_module) {
            ClassRole::Service
        } else if loose_eq(last, &conventions.dto_module) {
            ClassRole::Dto
        } else {
            ClassRole::Other
        }
    }

    /// Namespace segments before the role segment (the project part).
    #[must_use]
    pub fn project_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.namespace_segments().collect();
        segments.pop();
        segments
    }

    /// Base type name without generic arguments or path.
    #[must_use]
    pub fn base_name(&self) -> Option<String> {
        self.base_type
            .as_deref()
            .map(|base| DeclaredType::parse(base).head_name().to_string())
    }

    /// First generic argument of the base type, e.g. `i64` in
    /// `BusinessObject<i64>`.
    #[must_use]
    pub fn base_generic_argument(&self) -> Option<String> {
        self.base_type.as_deref().and_then(types::first_generic_argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entity() -> EntityDef {
        EntityDef::new("Order", "shop::sales::entities")
            .with_base("BusinessObject<i64>")
            .with_property(PropertyDef::new("Id", "i64"))
            .with_property(PropertyDef::new("customer", "Customer").marked("Required"))
            .with_property(PropertyDef::new("Items", "Vec<OrderItem>"))
    }

    #[test]
    fn with_property_sets_owner() {
        let entity = create_test_entity();
        assert!(entity.properties.iter().all(|p| p.entity_name == "Order"));
    }

    #[test]
    fn property_lookup_is_loose() {
        let entity = create_test_entity();
        assert_eq!(entity.property("Customer").map(|p| p.ty.as_str()), Some("Customer"));
        assert_eq!(entity.property("items").map(|p| p.ty.as_str()), Some("Vec<OrderItem>"));
        assert!(entity.property("Total").is_none());
    }

    #[test]
    fn namespace_separators_are_normalized() {
        let dotted = EntityDef::new("Order", "Shop.Sales.Entities");
        assert_eq!(dotted.module_path(), "Shop::Sales::Entities");
        assert_eq!(dotted.project_segments(), vec!["Shop", "Sales"]);
        assert_eq!(dotted.role(&Conventions::default()), ClassRole::Entity);
    }

    #[test]
    fn role_from_last_segment() {
        let conventions = Conventions::default();
        assert_eq!(
            EntityDef::new("SalesService", "shop::sales::services").role(&conventions),
            ClassRole::Service
        );
        assert_eq!(
            EntityDef::new("OrderDTO", "shop::sales::dto").role(&conventions),
            ClassRole::Dto
        );
        assert_eq!(EntityDef::new("X", "").role(&conventions), ClassRole::Other);
    }

    #[test]
    fn base_type_parts() {
        let entity = create_test_entity();
        assert_eq!(entity.base_name().as_deref(), Some("BusinessObject"));
        assert_eq!(entity.base_generic_argument().as_deref(), Some("i64"));

        let plain = EntityDef::new("Tag", "shop::entities").with_base("ReadonlyObject");
        assert_eq!(plain.base_generic_argument(), None);
    }

    #[test]
    fn attribute_names_compare_loosely() {
        let attr = AttributeDef::marker("ui_ordered_one_to_many");
        assert!(attr.is("UIOrderedOneToMany"));
        assert!(!attr.is("UIDoNotGenerate"));
    }
}
