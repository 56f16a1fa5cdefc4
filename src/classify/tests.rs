// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use proptest::prelude::*;

use super::*;
use crate::model::AttributeDef;

fn classify(property: PropertyDef) -> Classification {
    Classifier::default().classify(&property)
}

fn with_control(name: &str, ty: &str, control: &str) -> PropertyDef {
    PropertyDef::new(name, ty).with_attribute(AttributeDef::with_value("UIControlType", control))
}

#[test]
fn primitive_switch() {
    assert_eq!(classify(PropertyDef::new("Name", "String")).control, ControlKind::TextBox);
    assert_eq!(classify(PropertyDef::new("Active", "bool")).control, ControlKind::CheckBox);
    assert_eq!(
        classify(PropertyDef::new("ShippedAt", "Option<DateTime<Utc>>")).control,
        ControlKind::Calendar
    );
    assert_eq!(classify(PropertyDef::new("Total", "Decimal")).control, ControlKind::Decimal);
    assert_eq!(classify(PropertyDef::new("Status", "i32")).control, ControlKind::Integer);
}

#[test]
fn unknown_type_is_unresolved() {
    let c = classify(PropertyDef::new("Location", "geo::Point<f64>"));
    assert_eq!(c.control, ControlKind::Unresolved);
    assert_eq!(c.control.name(), "TODO");
    assert_eq!(c.relationship, RelationshipKind::None);
}

#[test]
fn reference_is_many_to_one_autocomplete() {
    let c = classify(PropertyDef::new("Customer", "Customer").marked("Required"));
    assert_eq!(c.relationship, RelationshipKind::ManyToOne);
    assert_eq!(c.control, ControlKind::Autocomplete);
    assert_eq!(c.target.as_deref(), Some("Customer"));
    assert_eq!(c.form_control_name, "customerId");
    assert_eq!(c.width, HALF_WIDTH);
    assert_eq!(c.filter, Some(FilterKind::Text));
}

#[test]
fn value_type_in_graph_is_not_a_relation() {
    let g = EntityGraph::merge(Vec::new(), Vec::new(), crate::config::Conventions::default()).with_value_types(["Status"]);
    let c = Classifier::default().classify_in(&PropertyDef::new("Status", "Status"), &g);
    assert_eq!(c.relationship, RelationshipKind::None);
    assert_eq!(c.control, ControlKind::Unresolved);
    assert_eq!(c.target, None);
    assert_eq!(c.form_control_name, "status");
    assert_eq!(c.filter, None);

    let dropdown = Classifier::default().classify_in(&with_control("Status", "Option<Status>", "Dropdown"), &g);
    assert_eq!(dropdown.relationship, RelationshipKind::None);
    assert_eq!(dropdown.control, ControlKind::Dropdown);

    let customer = Classifier::default().classify_in(&PropertyDef::new("Customer", "Customer"), &g);
    assert_eq!(customer.relationship, RelationshipKind::ManyToOne);
}

#[test]
fn form_control_name_does_not_double_id_suffix() {
    let c = classify(PropertyDef::new("CustomerId", "Customer"));
    assert_eq!(c.form_control_name, "customerId");
}

#[test]
fn blob_beats_reference_and_primitive() {
    let c = classify(PropertyDef::new("Logo", "String").marked("BlobName"));
    assert_eq!(c.control, ControlKind::File);
    assert_eq!(c.width, FULL_WIDTH);
}

#[test]
fn override_beats_every_inferred_rule() {
    let c = classify(with_control("Customer", "Customer", "Dropdown"));
    assert_eq!(c.control, ControlKind::Dropdown);
    assert_eq!(c.relationship, RelationshipKind::ManyToOne);
    assert_eq!(c.filter, Some(FilterKind::MultiSelect));

    let c = classify(with_control("Logo", "String", "TextArea").marked("BlobName"));
    assert_eq!(c.control, ControlKind::TextArea);
}

#[test]
fn unparsable_override_degrades_to_unresolved() {
    let c = classify(with_control("Name", "String", "Slider"));
    assert_eq!(c.control, ControlKind::Unresolved);
}

#[test]
fn override_names_parse_loosely() {
    assert_eq!(ControlKind::parse("multi_autocomplete"), ControlKind::MultiAutocomplete);
    assert_eq!(ControlKind::parse("colorpick"), ControlKind::ColorPick);
    assert_eq!(ControlKind::parse("TODO"), ControlKind::Unresolved);
}

#[test]
fn lazy_table_relation() {
    let c = classify(PropertyDef::new("Products", "Vec<Product>").marked("SimpleManyToManyTableLazyLoad"));
    assert_eq!(c.relationship, RelationshipKind::ManyToManyLazyTable);
    assert_eq!(c.control, ControlKind::Table);
    assert_eq!(c.target.as_deref(), Some("Product"));
    assert_eq!(c.width, FULL_WIDTH);
}

#[test]
fn multi_controls_set_relationship() {
    let c = classify(with_control("Tags", "Vec<Tag>", "MultiSelect"));
    assert_eq!(c.relationship, RelationshipKind::ManyToManyMultiSelect);
    assert_eq!(c.control, ControlKind::MultiSelect);

    let c = classify(with_control("Tags", "Vec<Tag>", "MultiAutocomplete"));
    assert_eq!(c.relationship, RelationshipKind::ManyToManyMultiAutocomplete);
    assert!(c.relationship.is_multi_control());
}

#[test]
fn ordered_one_to_many() {
    let c = classify(PropertyDef::new("Items", "Vec<OrderItem>").marked("UIOrderedOneToMany"));
    assert_eq!(c.relationship, RelationshipKind::OneToManyOrdered);
    assert_eq!(c.target.as_deref(), Some("OrderItem"));
    assert!(c.conflicts.is_empty());
}

#[test]
fn conflicting_markers_keep_precedence_and_report() {
    let property = with_control("Tags", "Vec<Tag>", "MultiSelect")
        .marked("UIOrderedOneToMany")
        .marked("SimpleManyToManyTableLazyLoad");
    let property = owned_by("Post", property);
    let c = Classifier::default().classify(&property);
    assert_eq!(c.relationship, RelationshipKind::OneToManyOrdered);
    assert_eq!(c.conflicts, vec![
        RelationshipKind::ManyToManyMultiSelect,
        RelationshipKind::ManyToManyLazyTable
    ]);

    let diagnostics = c.diagnostics(&property);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::ConflictingRelationshipMarkers);
    assert_eq!(diagnostics[0].entity, "Post");
    assert_eq!(diagnostics[0].property.as_deref(), Some("Tags"));
}

#[test]
fn single_marker_produces_no_diagnostic() {
    let property = PropertyDef::new("Customer", "Customer");
    assert!(classify(property.clone()).diagnostics(&property).is_empty());
}

#[test]
fn decimal_scale_from_precision_or_default() {
    let c = classify(PropertyDef::new("Price", "Decimal").with_attribute(AttributeDef::with_value("Precision", "18,4")));
    assert_eq!(c.decimal_scale, Some(4));

    let c = Classifier::new(3).classify(&PropertyDef::new("Weight", "f64"));
    assert_eq!(c.decimal_scale, Some(3));

    assert_eq!(classify(PropertyDef::new("Qty", "i32")).decimal_scale, None);
}

#[test]
fn explicit_width_wins() {
    let c = classify(PropertyDef::new("Note", "String").with_attribute(AttributeDef::with_value("UIControlWidth", "col-4")));
    assert_eq!(c.width, "col-4");
}

#[test]
fn filter_kinds() {
    assert_eq!(classify(PropertyDef::new("Name", "String")).filter, Some(FilterKind::Text));
    assert_eq!(classify(PropertyDef::new("Active", "bool")).filter, Some(FilterKind::Boolean));
    assert_eq!(classify(PropertyDef::new("At", "NaiveDate")).filter, Some(FilterKind::Date));
    assert_eq!(classify(PropertyDef::new("Qty", "u16")).filter, Some(FilterKind::Numeric));
    assert_eq!(
        classify(PropertyDef::new("TagNames", "String").marked("GenerateCommaSeparatedDisplayName")).filter,
        Some(FilterKind::MultiSelect)
    );
    assert_eq!(classify(PropertyDef::new("Blob", "Vec<u8>")).filter, None);
    assert!(FilterKind::Date.shows_match_modes());
    assert!(!FilterKind::Text.shows_match_modes());
}

fn owned_by(entity: &str, mut property: PropertyDef) -> PropertyDef {
    property.entity_name = entity.to_string();
    property
}

fn declared_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "String",
        "bool",
        "i64",
        "Decimal",
        "Customer",
        "Vec<Tag>",
        "Option<Customer>",
        "Uuid",
        "NaiveDateTime"
    ])
}

fn marker() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "BlobName",
        "UIOrderedOneToMany",
        "SimpleManyToManyTableLazyLoad",
        "Required",
        "GenerateCommaSeparatedDisplayName"
    ])
}

fn named_control() -> impl Strategy<Value = ControlKind> {
    prop::sample::select(ControlKind::NAMED.to_vec())
}

proptest! {
    #[test]
    fn explicit_override_always_wins(
        ty in declared_type(),
        markers in prop::collection::vec(marker(), 0..4),
        control in named_control()
    ) {
        let mut property = with_control("Field", ty, control.name());
        for m in markers {
            property = property.marked(m);
        }
        prop_assert_eq!(classify(property).control, control);
    }

    #[test]
    fn references_without_override_are_autocomplete(name in "[A-Z][a-z]{2,8}") {
        prop_assume!(DeclaredType::parse(&name).reference().is_some());
        let c = classify(PropertyDef::new("Ref", name.as_str()));
        prop_assert_eq!(c.control, ControlKind::Autocomplete);
        prop_assert_eq!(c.relationship, RelationshipKind::ManyToOne);
    }
}
