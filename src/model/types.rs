// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declared type analysis.
//!
//! Reduces a type spelling to the shape the classifier cares about:
//!
//! | Spelling | Shape |
//! |----------|-------|
//! | `String`, `&str` | `Primitive(Text)` |
//! | `bool` | `Primitive(Boolean)` |
//! | `DateTime<Utc>`, `NaiveDate`, `OffsetDateTime` | `Primitive(DateTime)` |
//! | `f64`, `Decimal` | `Primitive(Decimal)` |
//! | `i32`, `u8`, `i64` | `Primitive(Integer)` |
//! | `Vec<Tag>`, `HashSet<Tag>`, `[Tag]` | `Collection { element: "Tag" }` |
//! | `Customer`, `crate::entities::Customer` | `Reference("Customer")` |
//! | `Uuid`, `serde_json::Value`, ... | `Other(..)` |
//!
//! `Option<T>`, `Box<T>`, `Arc<T>` and `Rc<T>` are transparent; `Option`
//! additionally marks the type optional.
//!
//! Spellings that are not valid Rust (`int?`, `OrderItem[]`) fall back to a
//! textual reading so metadata from dotted-namespace hosts still classifies.

use syn::{GenericArgument, PathArguments, Type};

/// Primitive families recognized by the control switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Text.
    Text,
    /// Boolean.
    Boolean,
    /// Date, time or timestamp.
    DateTime,
    /// Decimal or floating point number.
    Decimal,
    /// Integer of any width.
    Integer
}

/// Shape of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// Scalar primitive.
    Primitive(Primitive),
    /// Generic container or slice; `element` is the element type name.
    Collection {
        /// Element type name without path.
        element: String
    },
    /// Single reference to another class, by name.
    Reference(String),
    /// Anything else, kept as spelled.
    Other(String)
}

/// Analyzed declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    spelling: String,
    optional: bool,
    shape:    TypeShape
}

const TEXT: &[&str] = &["String", "str", "string", "char"];
const BOOLEAN: &[&str] = &["bool", "Boolean"];
const DATE_TIME: &[&str] = &[
    "DateTime",
    "NaiveDate",
    "NaiveDateTime",
    "NaiveTime",
    "OffsetDateTime",
    "PrimitiveDateTime",
    "Date",
    "Timestamp",
    "SystemTime",
    "DateTimeOffset",
    "DateOnly"
];
const DECIMAL: &[&str] = &["f32", "f64", "Decimal", "BigDecimal", "decimal", "float", "double"];
const INTEGER: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "int",
    "long", "short", "byte"
];
const CONTAINERS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "IndexSet",
    "HashMap",
    "BTreeMap",
    "IndexMap",
    "List",
    "IList",
    "ICollection",
    "IEnumerable",
    "IReadOnlyList",
    "IReadOnlyCollection"
];
const TRANSPARENT: &[&str] = &["Box", "Arc", "Rc"];
const OPTIONAL: &[&str] = &["Option", "Nullable"];
const NON_ENTITY: &[&str] = &[
    "Uuid", "Ulid", "Guid", "Value", "JsonValue", "Json", "Bytes", "Duration", "IpAddr", "Url",
    "PathBuf", "Self"
];

impl Primitive {
    fn from_name(name: &str) -> Option<Self> {
        if TEXT.contains(&name) {
            Some(Self::Text)
        } else if BOOLEAN.contains(&name) {
            Some(Self::Boolean)
        } else if DATE_TIME.contains(&name) {
            Some(Self::DateTime)
        } else if DECIMAL.contains(&name) {
            Some(Self::Decimal)
        } else if INTEGER.contains(&name) {
            Some(Self::Integer)
        } else {
            None
        }
    }
}

impl DeclaredType {
    /// Analyze a type spelling.
    #[must_use]
    pub fn parse(spelling: &str) -> Self {
        let spelling = spelling.trim();
        let (optional, shape) = match syn::parse_str::<Type>(spelling) {
            Ok(ty) => analyze(&ty),
            Err(_) => analyze_text(spelling)
        };
        Self {
            spelling: spelling.to_string(),
            optional,
            shape
        }
    }

    /// Spelling as declared.
    #[must_use]
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Whether the type is wrapped in `Option`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Analyzed shape.
    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Whether the type is a collection.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.shape, TypeShape::Collection { .. })
    }

    /// Primitive family, if any.
    #[must_use]
    pub const fn primitive(&self) -> Option<Primitive> {
        match self.shape {
            TypeShape::Primitive(p) => Some(p),
            _ => None
        }
    }

    /// Referenced class name for single references.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Reference(name) => Some(name),
            _ => None
        }
    }

    /// Element type name for collections.
    #[must_use]
    pub fn element(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Collection {
                element
            } => Some(element),
            _ => None
        }
    }

    /// The same type read as an opaque value: a reference becomes
    /// [`TypeShape::Other`].
    #[must_use]
    pub fn into_value(mut self) -> Self {
        if matches!(self.shape, TypeShape::Reference(_)) {
            self.shape = TypeShape::Other(self.spelling.clone());
        }
        self
    }

    /// Outermost type name without path or generics.
    #[must_use]
    pub fn head_name(&self) -> &str {
        let head = self.spelling.split('<').next().unwrap_or_default();
        head.rsplit([':', '.']).next().unwrap_or(head).trim()
    }
}

/// Analyze a parsed type into `(optional, shape)`.
fn analyze(ty: &Type) -> (bool, TypeShape) {
    match ty {
        Type::Reference(reference) => analyze(&reference.elem),
        Type::Paren(paren) => analyze(&paren.elem),
        Type::Group(group) => analyze(&group.elem),
        Type::Slice(slice) => (false, collection_of(&slice.elem)),
        Type::Array(array) => (false, collection_of(&array.elem)),
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(segment) = type_path.path.segments.last() else {
                return (false, TypeShape::Other(spell(ty)));
            };
            let name = segment.ident.to_string();

            if OPTIONAL.contains(&name.as_str()) {
                return match single_type_argument(&segment.arguments) {
                    Some(inner) => (true, analyze(inner).1),
                    None => (true, TypeShape::Other(spell(ty)))
                };
            }
            if TRANSPARENT.contains(&name.as_str())
                && let Some(inner) = single_type_argument(&segment.arguments)
            {
                return analyze(inner);
            }
            if CONTAINERS.contains(&name.as_str())
                && let Some(element) = last_type_argument(&segment.arguments)
            {
                return (false, collection_of(element));
            }
            if let Some(primitive) = Primitive::from_name(&name) {
                return (false, TypeShape::Primitive(primitive));
            }
            if segment.arguments.is_empty() && is_entity_like(&name) {
                return (false, TypeShape::Reference(name));
            }
            (false, TypeShape::Other(spell(ty)))
        }
        _ => (false, TypeShape::Other(spell(ty)))
    }
}

/// Fallback for spellings that are not valid Rust types.
fn analyze_text(spelling: &str) -> (bool, TypeShape) {
    if let Some(inner) = spelling.strip_suffix('?') {
        let (_, shape) = DeclaredType::parse(inner).into_parts();
        return (true, shape);
    }
    if let Some(inner) = spelling.strip_suffix("[]") {
        let element = DeclaredType::parse(inner);
        return (false, TypeShape::Collection {
            element: element_name(&element)
        });
    }
    (false, TypeShape::Other(spelling.to_string()))
}

impl DeclaredType {
    fn into_parts(self) -> (bool, TypeShape) {
        (self.optional, self.shape)
    }
}

fn collection_of(element: &Type) -> TypeShape {
    let (_, shape) = analyze(element);
    let element = match shape {
        TypeShape::Reference(name) => name,
        _ => last_ident(element).unwrap_or_else(|| spell(element))
    };
    TypeShape::Collection {
        element
    }
}

fn element_name(declared: &DeclaredType) -> String {
    match declared.shape() {
        TypeShape::Reference(name) => name.clone(),
        _ => declared.head_name().to_string()
    }
}

fn is_entity_like(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase) && !NON_ENTITY.contains(&name)
}

fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    if let PathArguments::AngleBracketed(args) = arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

fn last_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().rev().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None
    })
}

fn last_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        Type::Reference(reference) => last_ident(&reference.elem),
        _ => None
    }
}

fn spell(ty: &Type) -> String {
    compact_spelling(&quote::quote!(#ty).to_string())
}

/// First generic argument of a type spelling, compacted.
///
/// `BusinessObject<i64>` yields `i64`; `ReadonlyObject` yields `None`.
#[must_use]
pub fn first_generic_argument(spelling: &str) -> Option<String> {
    let ty = syn::parse_str::<Type>(spelling).ok()?;
    let Type::Path(type_path) = &ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    single_type_argument(&segment.arguments).map(spell)
}

/// Remove token-stream spacing from a type spelling.
///
/// A space survives only between two identifier characters, so
/// `Vec < Option < Customer > >` becomes `Vec<Option<Customer>>` and
/// `& 'a str` becomes `&'a str`.
#[must_use]
pub fn compact_spelling(spelling: &str) -> String {
    let chars: Vec<char> = spelling.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let before = out.chars().last();
            let after = chars[i + 1..].iter().find(|ch| **ch != ' ');
            let ident = |ch: char| ch.is_alphanumeric() || ch == '_';
            if before.is_some_and(ident) && after.is_some_and(|ch| ident(*ch)) {
                out.push(' ');
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(spelling: &str) -> TypeShape {
        DeclaredType::parse(spelling).shape().clone()
    }

    #[test]
    fn primitives() {
        assert_eq!(shape("String"), TypeShape::Primitive(Primitive::Text));
        assert_eq!(shape("&'static str"), TypeShape::Primitive(Primitive::Text));
        assert_eq!(shape("bool"), TypeShape::Primitive(Primitive::Boolean));
        assert_eq!(shape("chrono::DateTime<Utc>"), TypeShape::Primitive(Primitive::DateTime));
        assert_eq!(shape("NaiveDate"), TypeShape::Primitive(Primitive::DateTime));
        assert_eq!(shape("rust_decimal::Decimal"), TypeShape::Primitive(Primitive::Decimal));
        assert_eq!(shape("f64"), TypeShape::Primitive(Primitive::Decimal));
        assert_eq!(shape("i32"), TypeShape::Primitive(Primitive::Integer));
        assert_eq!(shape("u8"), TypeShape::Primitive(Primitive::Integer));
    }

    #[test]
    fn option_is_transparent_and_marks_optional() {
        let declared = DeclaredType::parse("Option<i64>");
        assert!(declared.is_optional());
        assert_eq!(declared.primitive(), Some(Primitive::Integer));

        let declared = DeclaredType::parse("Option<Box<Customer>>");
        assert_eq!(declared.reference(), Some("Customer"));
    }

    #[test]
    fn collections_yield_element_name() {
        assert_eq!(DeclaredType::parse("Vec<OrderItem>").element(), Some("OrderItem"));
        assert_eq!(
            DeclaredType::parse("std::collections::HashSet<crate::entities::Tag>").element(),
            Some("Tag")
        );
        assert_eq!(DeclaredType::parse("List<Product>").element(), Some("Product"));
        assert_eq!(DeclaredType::parse("[Tag]").element(), Some("Tag"));
        assert_eq!(DeclaredType::parse("Vec<i32>").element(), Some("i32"));
        assert!(DeclaredType::parse("Option<Vec<Tag>>").is_collection());
    }

    #[test]
    fn references() {
        assert_eq!(shape("Customer"), TypeShape::Reference("Customer".to_string()));
        assert_eq!(
            shape("crate::entities::Customer"),
            TypeShape::Reference("Customer".to_string())
        );
    }

    #[test]
    fn non_entities_stay_other() {
        assert_eq!(shape("Uuid"), TypeShape::Other("Uuid".to_string()));
        assert_eq!(shape("serde_json::Value"), TypeShape::Other("serde_json::Value".to_string()));
        assert_eq!(shape("Cow<'a, str>"), TypeShape::Other("Cow<'a,str>".to_string()));
    }

    #[test]
    fn dotted_host_spellings() {
        let declared = DeclaredType::parse("int?");
        assert!(declared.is_optional());
        assert_eq!(declared.primitive(), Some(Primitive::Integer));
        assert_eq!(DeclaredType::parse("OrderItem[]").element(), Some("OrderItem"));
        assert_eq!(shape("DateTime"), TypeShape::Primitive(Primitive::DateTime));
    }

    #[test]
    fn head_name_strips_path_and_generics() {
        assert_eq!(DeclaredType::parse("base::BusinessObject<i64>").head_name(), "BusinessObject");
        assert_eq!(DeclaredType::parse("ReadonlyObject").head_name(), "ReadonlyObject");
    }

    #[test]
    fn generic_argument_of_base() {
        assert_eq!(first_generic_argument("BusinessObject<i64>").as_deref(), Some("i64"));
        assert_eq!(
            first_generic_argument("BusinessObject<uuid::Uuid>").as_deref(),
            Some("uuid::Uuid")
        );
        assert_eq!(first_generic_argument("BusinessObject"), None);
    }

    #[test]
    fn compact_spelling_keeps_word_spaces() {
        assert_eq!(compact_spelling("Vec < Option < Customer > >"), "Vec<Option<Customer>>");
        assert_eq!(compact_spelling("& 'a str"), "&'a str");
        assert_eq!(compact_spelling("dyn Fn () -> u8"), "dyn Fn()->u8");
    }
}
