// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end generation passes driven from Rust sources.

use entity_scaffold::{
    ArtifactKind, DiagnosticCode, EntityDef, Generator, ModuleSource, PassOutput, PropertyDef, Snapshot
};
use proptest::prelude::*;

const SALES_ENTITIES: &str = r#"
#[scaffold(base = "BusinessObject<i64>")]
pub struct Order {
    pub id: i64,
    #[required]
    pub customer: Customer,
    #[ui_ordered_one_to_many]
    #[required]
    pub items: Vec<OrderItem>,
    #[simple_many_to_many_table_lazy_load]
    #[ui_table_column = "Email"]
    pub watchers: Vec<User>,
    pub status: i32,
}

#[scaffold(base = "BusinessObject<i64>")]
pub struct OrderItem {
    #[with_many = "items"]
    pub order: Order,
    pub quantity: i32,
}

#[scaffold(base = "ReadonlyObject<i32>")]
pub struct Customer {
    pub name: String,
}
"#;

const SALES_SERVICES: &str = r#"
#[scaffold(base = "SalesBusinessServiceGenerated<Pool>")]
pub struct SalesBusinessService {
    pub pool: Pool,
}
"#;

const SECURITY_ENTITIES: &str = r#"
#[scaffold(base = "BusinessObject<uuid::Uuid>")]
pub struct User {
    pub email: String,
}
"#;

fn create_test_snapshot() -> Snapshot {
    Snapshot::from_sources(
        "/project",
        &[
            ModuleSource::new("shop::sales::entities", SALES_ENTITIES),
            ModuleSource::new("shop::sales::services", SALES_SERVICES),
        ],
        &[ModuleSource::new("shop::security::entities", SECURITY_ENTITIES)]
    )
    .unwrap()
}

fn run(snapshot: Snapshot) -> PassOutput {
    Generator::default().run(snapshot).unwrap()
}

fn contents<'a>(output: &'a PassOutput, file_name: &str) -> &'a str {
    &output
        .artifact(file_name)
        .unwrap_or_else(|| panic!("missing artifact {file_name}"))
        .contents
}

#[test]
fn order_scenario_produces_component_and_controller() {
    let output = run(create_test_snapshot());
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let ui: Vec<_> = output
        .of_kind(ArtifactKind::Ui)
        .filter_map(|a| a.path.file_name()?.to_str())
        .collect();
    assert_eq!(ui, vec!["order-base-details.generated.ts", "order-item-base-details.generated.ts"]);

    let order = contents(&output, "order-base-details.generated.ts");
    assert!(order.contains("export class OrderBaseDetailsComponent {"));
    assert!(order.contains("getOrderedItemsForOrder(this.modelId)"));
    assert!(order.contains("control('customerId', orderFormGroup)"));
    assert!(order.contains("@Input() showWatchersForOrder: boolean = true;"));
    assert!(order.contains("../../entities/security-entities.generated"));

    let api = contents(&output, "sales_base_controller.generated.rs");
    for handler in [
        "get_order_table_data",
        "get_customer_autocomplete_list_for_order",
        "get_ordered_items_for_order",
        "get_watchers_table_data_for_order",
        "lazy_load_selected_watchers_ids_for_order",
        "save_order",
        "delete_order"
    ] {
        assert!(api.contains(&format!("pub async fn {handler}(")), "missing {handler}");
    }
    assert!(api.contains("shop::sales::services::SalesBusinessService"));
    assert!(api.contains("entity_scaffold_core::LazyLoadSelectedIdsResult<uuid::Uuid>"));
}

#[test]
fn read_only_entity_keeps_read_endpoints_only() {
    let output = run(create_test_snapshot());
    let api = contents(&output, "sales_base_controller.generated.rs");
    assert!(api.contains("pub async fn get_customer_list("));
    assert!(api.contains("pub async fn get_customer("));
    assert!(!api.contains("pub async fn save_customer("));
    assert!(!api.contains("pub async fn delete_customer("));
    assert!(output.artifact("customer-base-details.generated.ts").is_none());
}

#[test]
fn group_without_service_is_silent() {
    let output = run(create_test_snapshot());
    assert_eq!(output.of_kind(ArtifactKind::Api).count(), 1);
    assert!(output.artifact("security_base_controller.generated.rs").is_none());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn missing_referenced_module_degrades_to_diagnostics() {
    let snapshot = Snapshot::from_sources(
        "/project",
        &[
            ModuleSource::new("shop::sales::entities", SALES_ENTITIES),
            ModuleSource::new("shop::sales::services", SALES_SERVICES),
        ],
        &[]
    )
    .unwrap();
    let output = run(snapshot);

    assert!(
        output
            .diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::MissingRelationTarget)
    );
    assert!(output.diagnostics.iter().any(|d| d.property.as_deref() == Some("watchers")));
    let api = contents(&output, "sales_base_controller.generated.rs");
    assert!(!api.contains("watchers"));
    let order = contents(&output, "order-base-details.generated.ts");
    assert!(!order.contains("showWatchersForOrder"));
}

#[test]
fn malformed_source_is_fatal() {
    let err = Snapshot::from_sources("/p", &[ModuleSource::new("x::entities", "pub struct {")], &[]).unwrap_err();
    assert!(err.to_string().starts_with("failed to parse source"));
}

#[test]
fn passes_are_idempotent() {
    assert_eq!(run(create_test_snapshot()), run(create_test_snapshot()));
}

fn any_property() -> impl Strategy<Value = PropertyDef> {
    let kinds = prop::sample::select(vec![
        ("String", None),
        ("i32", None),
        ("Decimal", None),
        ("bool", None),
        ("String", Some("BlobName")),
        ("Customer", None),
        ("Vec<Customer>", Some("UIOrderedOneToMany")),
        ("Vec<Customer>", Some("SimpleManyToManyTableLazyLoad")),
        ("Vec<Unknown>", Some("UIOrderedOneToMany"))
    ]);
    (kinds, "[a-z]{3,8}").prop_map(|((ty, marker), name)| {
        let property = PropertyDef::new(format!("f_{name}"), ty);
        match marker {
            Some(marker) => property.marked(marker),
            None => property
        }
    })
}

proptest! {
    #[test]
    fn generated_snapshots_render_identically(properties in prop::collection::vec(any_property(), 0..10)) {
        let mut subject = EntityDef::new("Subject", "app::core::entities");
        for property in properties {
            subject = subject.with_property(property);
        }
        let snapshot = Snapshot::new("/p").with_current([
            subject,
            EntityDef::new("Customer", "app::core::entities").with_property(PropertyDef::new("Name", "String")),
            EntityDef::new("CoreService", "app::core::services").with_base("CoreBusinessServiceGenerated"),
        ]);

        let first = run(snapshot.clone());
        let second = run(snapshot);
        prop_assert_eq!(first.of_kind(ArtifactKind::Ui).count(), 2);
        prop_assert_eq!(first.of_kind(ArtifactKind::Api).count(), 1);
        prop_assert_eq!(first, second);
    }
}
