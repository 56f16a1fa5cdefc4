// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rust source to metadata.
//!
//! Every struct with named fields in a module source becomes an
//! [`EntityDef`] whose namespace is the module path (inline `mod` blocks
//! extend it). Attributes become raw [`AttributeDef`]s for the interpreter:
//!
//! | Source | Result |
//! |--------|--------|
//! | `#[required]` | marker `required` |
//! | `#[ui_control_type = "Dropdown"]` | `ui_control_type` = `Dropdown` |
//! | `#[precision(18, 4)]` | `precision` = `18,4` |
//! | `#[scaffold(base = "BusinessObject<i64>")]` | base type |
//! | `#[scaffold(controller = "Billing")]` | `Controller` = `Billing` |
//!
//! Language attributes (`doc`, `derive`, `serde`, lints, ...) are ignored.
//!
//! Enums are not classes. Their names are kept as value types so a field
//! such as `status: Status` is not read as a reference to an entity.

use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use quote::ToTokens;
use syn::{Attribute, Expr, Ident, Item, Lit, Meta};

use crate::{
    error::Result,
    model::{AttributeDef, EntityDef, PropertyDef, types::compact_spelling}
};

/// Attributes that never carry metadata.
const IGNORED_ATTRIBUTES: &[&str] = &[
    "doc",
    "derive",
    "cfg",
    "cfg_attr",
    "allow",
    "warn",
    "deny",
    "expect",
    "must_use",
    "serde",
    "repr",
    "non_exhaustive",
    "scaffold"
];

/// Source of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    /// Module path, `::` separated, e.g. `shop::sales::entities`.
    pub module_path: String,
    /// Rust source text.
    pub source:      String
}

impl ModuleSource {
    /// Create a module source.
    pub fn new(module_path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            source:      source.into()
        }
    }

    /// Parse the module into class definitions and value type names.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Reflect`](crate::error::ScaffoldError::Reflect)
    /// when the source does not parse and
    /// [`ScaffoldError::Attribute`](crate::error::ScaffoldError::Attribute)
    /// when a `scaffold` attribute is malformed.
    pub fn reflect(&self) -> Result<Reflection> {
        let file = syn::parse_file(&self.source)?;
        reflect_items(&self.module_path, &file.items)
    }
}

/// What a set of module sources declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reflection {
    /// Structs with named fields, in source order.
    pub classes:     Vec<EntityDef>,
    /// Names of declared enums.
    pub value_types: Vec<String>
}

impl Reflection {
    fn append(&mut self, other: Self) {
        self.classes.extend(other.classes);
        self.value_types.extend(other.value_types);
    }
}

/// Parse several module sources, keeping source order.
///
/// # Errors
///
/// Fails on the first module that fails to parse.
pub fn reflect_modules(modules: &[ModuleSource]) -> Result<Reflection> {
    let mut reflection = Reflection::default();
    for module in modules {
        reflection.append(module.reflect()?);
    }
    Ok(reflection)
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct FieldInput {
    ident: Option<Ident>,
    ty:    syn::Type,
    attrs: Vec<Attribute>
}

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(scaffold), supports(struct_named), forward_attrs)]
struct StructInput {
    ident:      Ident,
    data:       Data<Ignored, FieldInput>,
    attrs:      Vec<Attribute>,
    #[darling(default)]
    base:       Option<String>,
    #[darling(default)]
    controller: Option<String>
}

/// Class definitions of a list of items under a module path.
///
/// # Errors
///
/// Returns [`ScaffoldError::Attribute`](crate::error::ScaffoldError::Attribute)
/// when a `scaffold` attribute is malformed.
pub fn reflect_items(module_path: &str, items: &[Item]) -> Result<Reflection> {
    let mut reflection = Reflection::default();
    for item in items {
        match item {
            Item::Struct(item) if matches!(item.fields, syn::Fields::Named(_)) => {
                let input = StructInput::from_derive_input(&syn::DeriveInput::from(item.clone()))?;
                reflection.classes.push(class(module_path, input));
            }
            Item::Enum(item) => reflection.value_types.push(item.ident.to_string()),
            Item::Mod(module) => {
                if let Some((_, nested)) = &module.content {
                    let path = format!("{module_path}::{}", module.ident);
                    reflection.append(reflect_items(&path, nested)?);
                }
            }
            _ => {}
        }
    }
    Ok(reflection)
}

fn class(module_path: &str, input: StructInput) -> EntityDef {
    let mut entity = EntityDef::new(input.ident.to_string(), module_path);
    if let Some(base) = input.base {
        entity = entity.with_base(base);
    }
    for attribute in input.attrs.iter().filter_map(attribute_def) {
        entity = entity.with_attribute(attribute);
    }
    if let Some(controller) = input.controller {
        entity = entity.with_attribute(AttributeDef::with_value("Controller", controller));
    }
    let fields = input.data.take_struct().map(|fields| fields.fields).unwrap_or_default();
    for field in fields {
        let Some(ident) = field.ident else {
            continue;
        };
        let ty = compact_spelling(&field.ty.to_token_stream().to_string());
        let mut property = PropertyDef::new(ident.to_string(), ty);
        for attribute in field.attrs.iter().filter_map(attribute_def) {
            property = property.with_attribute(attribute);
        }
        entity = entity.with_property(property);
    }
    tracing::trace!(entity = %entity.name, module = module_path, "reflected");
    entity
}

/// Raw attribute of a Rust attribute, `None` for language attributes.
fn attribute_def(attr: &Attribute) -> Option<AttributeDef> {
    let name = attr.path().segments.last()?.ident.to_string();
    if IGNORED_ATTRIBUTES.contains(&name.as_str()) {
        return None;
    }
    let attribute = match &attr.meta {
        Meta::Path(_) => AttributeDef::marker(name),
        Meta::NameValue(nv) => AttributeDef::with_value(name, expr_value(&nv.value)),
        Meta::List(list) => {
            let value = match syn::parse2::<Lit>(list.tokens.clone()) {
                Ok(lit) => lit_value(&lit),
                Err(_) => compact_spelling(&list.tokens.to_string())
            };
            AttributeDef::with_value(name, value)
        }
    };
    Some(attribute)
}

fn expr_value(expr: &Expr) -> String {
    match expr {
        Expr::Lit(lit) => lit_value(&lit.lit),
        other => compact_spelling(&other.to_token_stream().to_string())
    }
}

fn lit_value(lit: &Lit) -> String {
    match lit {
        Lit::Str(s) => s.value(),
        other => other.to_token_stream().to_string()
    }
}
