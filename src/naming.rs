// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Casing conventions shared by every artifact.
//!
//! | Use | Case | `order_item` becomes |
//! |-----|------|----------------------|
//! | Types, endpoint names | Pascal | `OrderItem` |
//! | Fields, form controls | camel | `orderItem` |
//! | File names, selectors, routes | kebab | `order-item` |
//! | Rust functions and files | snake | `order_item` |
//!
//! Other generators and hand-written code import these names, so the
//! conventions must not drift.

use convert_case::{Case, Casing};

/// `OrderItem`.
#[must_use]
pub fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// `orderItem`.
#[must_use]
pub fn camel(name: &str) -> String {
    name.to_case(Case::Camel)
}

/// `order-item`.
#[must_use]
pub fn kebab(name: &str) -> String {
    name.to_case(Case::Kebab)
}

/// `order_item`.
#[must_use]
pub fn snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Case- and separator-insensitive comparison key.
///
/// `UIOrderedOneToMany`, `ui_ordered_one_to_many` and `ui-ordered-one-to-many`
/// share the key `uiorderedonetomany`.
#[must_use]
pub fn loose_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether two names are equal under [`loose_key`].
#[must_use]
pub fn loose_eq(a: &str, b: &str) -> bool {
    loose_key(a) == loose_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cases_from_snake() {
        assert_eq!(pascal("order_item"), "OrderItem");
        assert_eq!(camel("order_item"), "orderItem");
        assert_eq!(kebab("order_item"), "order-item");
        assert_eq!(snake("OrderItem"), "order_item");
    }

    #[test]
    fn cases_from_pascal() {
        assert_eq!(camel("CustomerId"), "customerId");
        assert_eq!(kebab("PurchaseOrder"), "purchase-order");
        assert_eq!(pascal("Customer"), "Customer");
    }

    #[test]
    fn loose_key_ignores_case_and_separators() {
        assert_eq!(loose_key("UIOrderedOneToMany"), "uiorderedonetomany");
        assert!(loose_eq("ui_ordered_one_to_many", "UIOrderedOneToMany"));
        assert!(loose_eq("created-at", "CreatedAt"));
        assert!(!loose_eq("Blob", "BlobName"));
    }
}
