// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::*;
use crate::{
    config::Conventions,
    error::DiagnosticCode,
    model::{AttributeDef, PropertyDef}
};

fn create_test_order() -> EntityDef {
    EntityDef::new("Order", "shop::sales::entities")
        .with_base("BusinessObject<i64>")
        .with_property(PropertyDef::new("Id", "i64"))
        .with_property(PropertyDef::new("CustomerId", "Customer").marked("Required"))
        .with_property(PropertyDef::new("Items", "Vec<OrderItem>").marked("UIOrderedOneToMany").marked("Required"))
        .with_property(PropertyDef::new("Status", "i32"))
}

fn create_test_order_item() -> EntityDef {
    EntityDef::new("OrderItem", "shop::sales::entities")
        .with_property(PropertyDef::new("Id", "i64"))
        .with_property(PropertyDef::new("Order", "Order").with_attribute(AttributeDef::with_value("WithMany", "Items")))
        .with_property(PropertyDef::new("Product", "Product"))
        .with_property(PropertyDef::new("Quantity", "i32"))
}

fn create_test_post() -> EntityDef {
    EntityDef::new("Post", "blog::content::entities")
        .with_attribute(AttributeDef::with_value("UIAdditionalPermissionCodeForInsert", "WritePosts"))
        .with_property(PropertyDef::new("Title", "String"))
        .with_property(PropertyDef::new("Cover", "String").marked("BlobName"))
        .with_property(PropertyDef::new("Accent", "String").with_attribute(AttributeDef::with_value("UIControlType", "ColorPick")))
        .with_property(PropertyDef::new("Tags", "Vec<Tag>").with_attribute(AttributeDef::with_value("UIControlType", "MultiSelect")))
        .with_property(
            PropertyDef::new("Authors", "Vec<User>").with_attribute(AttributeDef::with_value("UIControlType", "MultiAutocomplete"))
        )
        .with_property(
            PropertyDef::new("Readers", "Vec<User>")
                .marked("SimpleManyToManyTableLazyLoad")
                .with_attribute(AttributeDef::with_value("UITableColumn", "Email"))
                .with_attribute(AttributeDef::with_value("UITableColumn", "CreatedAt"))
                .with_attribute(AttributeDef::with_value("UITableColumn", "RoleDisplayName"))
        )
}

fn create_test_user() -> EntityDef {
    EntityDef::new("User", "blog::security::entities")
        .with_property(PropertyDef::new("Email", "String"))
        .with_property(PropertyDef::new("CreatedAt", "DateTime<Utc>"))
        .with_property(PropertyDef::new("Role", "Role").with_attribute(AttributeDef::with_value("UIControlType", "Dropdown")))
}

fn create_test_lookups() -> Vec<EntityDef> {
    vec![
        EntityDef::new("Customer", "shop::crm::entities").with_property(PropertyDef::new("Name", "String")),
        EntityDef::new("Product", "shop::catalog::entities").with_property(PropertyDef::new("Name", "String")),
        EntityDef::new("Tag", "blog::content::entities").with_property(PropertyDef::new("Name", "String")),
    ]
}

fn graph(current: Vec<EntityDef>, mut referenced: Vec<EntityDef>) -> EntityGraph {
    referenced.extend(create_test_lookups());
    EntityGraph::merge(current, referenced, Conventions::default())
}

fn assemble(g: &EntityGraph, name: &str) -> (UiArtifact, Vec<Diagnostic>) {
    let assembler = UiAssembler::new(g, &UiConfig::default());
    assembler.assemble(g.resolve(name).unwrap())
}

#[test]
fn order_names_and_blocks() {
    let g = graph(vec![create_test_order(), create_test_order_item()], vec![]);
    let (artifact, diagnostics) = assemble(&g, "Order");

    assert!(diagnostics.is_empty());
    assert_eq!(artifact.file_name, "order-base-details.generated.ts");
    assert_eq!(artifact.selector, "order-base-details");
    assert_eq!(artifact.class_name, "OrderBaseDetailsComponent");

    let blocks: Vec<&str> = artifact.blocks.iter().map(UiBlock::property).collect();
    assert_eq!(blocks, vec!["CustomerId", "Status", "Items"]);
    assert_eq!(artifact.show_flags, vec![
        "showCustomerIdForOrder",
        "showStatusForOrder",
        "showItemsForOrder"
    ]);

    let UiBlock::Nested(items) = &artifact.blocks[2] else {
        panic!("expected nested block");
    };
    assert_eq!(items.relation.target.name, "OrderItem");
    assert!(items.relation.required);
    let children: Vec<(&str, &str)> = items
        .blocks
        .iter()
        .map(|b| (b.property.as_str(), b.form_group.as_str()))
        .collect();
    assert_eq!(children, vec![("Product", "orderItemFormGroup"), ("Quantity", "orderItemFormGroup")]);
    assert!(items.blocks.iter().all(|b| b.show_flag.is_none()));
}

#[test]
fn order_fetch_init_and_save() {
    let g = graph(vec![create_test_order(), create_test_order_item()], vec![]);
    let (artifact, _) = assemble(&g, "Order");

    assert_eq!(artifact.fetches, vec![
        Fetch {
            key:        "order".to_string(),
            api_method: "getOrder".to_string()
        },
        Fetch {
            key:        "itemsForOrder".to_string(),
            api_method: "getOrderedItemsForOrder".to_string()
        },
    ]);
    assert_eq!(artifact.init_existing, vec![InitStep::FormArray {
        method: "initItemsFormArray".to_string(),
        source: Some("itemsForOrder".to_string())
    }]);
    assert_eq!(artifact.init_new, vec![InitStep::FormArray {
        method: "initItemsFormArray".to_string(),
        source: None
    }]);
    assert_eq!(artifact.save_payload, vec![
        SaveStep::Record {
            target:     "orderDTO".to_string(),
            form_group: "orderFormGroup".to_string()
        },
        SaveStep::FormArray {
            target: "itemsDTO".to_string(),
            array:  "itemsFormArray".to_string()
        },
    ]);
}

#[test]
fn nested_options_belong_to_child_entity() {
    let g = graph(vec![create_test_order(), create_test_order_item()], vec![]);
    let (artifact, _) = assemble(&g, "Order");

    let options: Vec<&str> = artifact
        .fields
        .iter()
        .filter(|f| f.ty.as_deref() == Some("PrimengOption[]"))
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(options, vec!["customerIdOptionsForOrder", "productOptionsForOrderItem"]);

    let searches: Vec<&str> = artifact.searches.iter().map(|s| s.api_method.as_str()).collect();
    assert_eq!(searches, vec![
        "getCustomerIdAutocompleteListForOrder",
        "getProductAutocompleteListForOrderItem"
    ]);
}

#[test]
fn toggles_cover_every_writable_block() {
    let g = graph(vec![create_test_order(), create_test_order_item()], vec![]);
    let (artifact, _) = assemble(&g, "Order");
    assert_eq!(artifact.toggles, vec![
        Toggle::FormGroupControl {
            form_group: "orderFormGroup".to_string(),
            control:    "customerId".to_string()
        },
        Toggle::FormGroupControl {
            form_group: "orderFormGroup".to_string(),
            control:    "status".to_string()
        },
        Toggle::FormArray {
            array: "itemsFormArray".to_string()
        },
    ]);
}

#[test]
fn permission_checks_put_extras_first() {
    let g = graph(vec![create_test_post()], vec![create_test_user()]);
    let (artifact, _) = assemble(&g, "Post");
    let checks: Vec<(&str, RecordState)> = artifact
        .permission
        .checks
        .iter()
        .map(|c| (c.code.as_str(), c.record))
        .collect();
    assert_eq!(checks, vec![
        ("WritePosts", RecordState::New),
        ("InsertPost", RecordState::New),
        ("UpdatePost", RecordState::Existing)
    ]);
}

#[test]
fn multi_controls_fetch_and_save_selected_ids() {
    let g = graph(vec![create_test_post()], vec![create_test_user()]);
    let (artifact, _) = assemble(&g, "Post");

    let keys: Vec<&str> = artifact.fetches.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["post", "tagsForPost", "authorsForPost"]);
    assert!(artifact.init_existing.contains(&InitStep::SelectedIds {
        control: "selectedTagsForPost".to_string(),
        source:  "tagsForPost".to_string()
    }));
    assert!(artifact.init_existing.contains(&InitStep::SelectedOptions {
        control: "selectedAuthorsForPost".to_string(),
        source:  "authorsForPost".to_string()
    }));
    assert!(artifact.save_payload.contains(&SaveStep::SelectedIds {
        target:  "selectedAuthorsIds".to_string(),
        control: "selectedAuthorsForPost".to_string(),
        options: true
    }));
    assert!(artifact.toggles.contains(&Toggle::Control {
        control: "selectedTagsForPost".to_string()
    }));
    assert_eq!(artifact.option_loads, vec![OptionLoad {
        api_method: "getTagsDropdownListForPost".to_string(),
        options:    "tagsOptionsForPost".to_string()
    }]);
}

#[test]
fn lazy_table_state_and_columns() {
    let g = graph(vec![create_test_post()], vec![create_test_user()]);
    let (artifact, diagnostics) = assemble(&g, "Post");
    assert!(diagnostics.is_empty());

    let table = &artifact.lazy_tables[0];
    assert_eq!(table.target, "User");
    let columns: Vec<(&str, Option<FilterKind>, bool)> = table
        .columns
        .iter()
        .map(|c| (c.field.as_str(), c.filter, c.show_match_modes))
        .collect();
    assert_eq!(columns, vec![
        ("email", Some(FilterKind::Text), false),
        ("createdAt", Some(FilterKind::Date), true),
        ("roleDisplayName", Some(FilterKind::MultiSelect), false)
    ]);
    assert_eq!(table.columns[2].filter_field.as_deref(), Some("roleId"));
    assert_eq!(table.columns[2].values_api.as_deref(), Some("getRoleDropdownListForUser"));

    let names: Vec<&str> = artifact.fields.iter().map(|f| f.name.as_str()).collect();
    for expected in [
        "readersTableColsForPost",
        "newlySelectedReadersIdsForPost",
        "unselectedReadersIdsForPost",
        "areAllReadersSelectedForPost",
        "lastReadersLazyLoadTableFilterForPost"
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    assert!(matches!(artifact.save_payload.last(), Some(SaveStep::LazySelection(t)) if t.property == "Readers"));
    assert_eq!(artifact.blocks.last().map(UiBlock::property), Some("Readers"));
}

#[test]
fn missing_user_target_skips_user_relations() {
    let g = graph(vec![create_test_post()], vec![]);
    let (artifact, diagnostics) = assemble(&g, "Post");
    assert!(artifact.lazy_tables.is_empty());
    assert!(!artifact.show_flags.contains(&"showReadersForPost".to_string()));
    assert!(!artifact.show_flags.contains(&"showAuthorsForPost".to_string()));
    let keys: Vec<&str> = artifact.fetches.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["post", "tagsForPost"]);

    let properties: Vec<Option<&str>> = diagnostics.iter().map(|d| d.property.as_deref()).collect();
    assert_eq!(properties, vec![Some("Authors"), Some("Readers")]);
    assert!(diagnostics.iter().all(|d| d.code == DiagnosticCode::MissingRelationTarget));
}

#[test]
fn missing_many_to_one_target_skips_control() {
    let g = EntityGraph::merge(vec![create_test_order(), create_test_order_item()], Vec::new(), Conventions::default());
    let (artifact, diagnostics) = assemble(&g, "Order");

    let blocks: Vec<&str> = artifact.blocks.iter().map(UiBlock::property).collect();
    assert_eq!(blocks, vec!["Status", "Items"]);
    assert!(!artifact.show_flags.contains(&"showCustomerIdForOrder".to_string()));
    assert!(artifact.searches.is_empty());
    assert!(artifact.fields.iter().all(|f| f.ty.as_deref() != Some("PrimengOption[]")));
    assert!(!artifact.toggles.contains(&Toggle::FormGroupControl {
        form_group: "orderFormGroup".to_string(),
        control:    "customerId".to_string()
    }));

    let missing: Vec<(&str, Option<&str>)> = diagnostics
        .iter()
        .map(|d| (d.entity.as_str(), d.property.as_deref()))
        .collect();
    assert_eq!(missing, vec![("Order", Some("CustomerId")), ("OrderItem", Some("Product"))]);
    assert!(diagnostics.iter().all(|d| d.code == DiagnosticCode::MissingRelationTarget));
}

#[test]
fn uploads_and_color_hooks() {
    let g = graph(vec![create_test_post()], vec![create_test_user()]);
    let (artifact, _) = assemble(&g, "Post");
    assert_eq!(artifact.uploads, vec![UploadMethod {
        method:     "uploadCoverForPost".to_string(),
        api_method: "uploadCoverForPost".to_string(),
        form_group: "postFormGroup".to_string(),
        control:    "cover".to_string()
    }]);
    assert_eq!(artifact.custom_on_change, vec!["accent"]);
    assert_eq!(artifact.blocks[0].property(), "Cover");
}

#[test]
fn imports_group_by_project() {
    let g = graph(vec![create_test_post()], vec![create_test_user()]);
    let (artifact, _) = assemble(&g, "Post");
    assert_eq!(artifact.imports, vec![
        ImportGroup {
            module: "../../entities/content-entities.generated".to_string(),
            names:  vec!["Post".to_string(), "PostSaveBody".to_string()]
        },
        ImportGroup {
            module: "../../entities/security-entities.generated".to_string(),
            names:  vec!["User".to_string(), "UserSaveBody".to_string()]
        },
    ]);
}

#[test]
fn eligibility_excludes_marked_read_only_and_join_entities() {
    let hidden = EntityDef::new("Secret", "x::entities").with_attribute(AttributeDef::marker("UIDoNotGenerate"));
    let country = EntityDef::new("Country", "x::entities").with_base("ReadonlyObject<i32>");
    let join = EntityDef::new("PostTag", "x::entities").with_attribute(AttributeDef::marker("M2M"));
    let service = EntityDef::new("XService", "x::services");
    let g = graph(vec![create_test_order(), hidden, country, join, service], vec![create_test_user()]);
    let assembler = UiAssembler::new(&g, &UiConfig::default());
    let eligible: Vec<&str> = assembler.eligible().map(|e| e.name.as_str()).collect();
    assert_eq!(eligible, vec!["Order"]);
}

#[test]
fn rendered_component_surfaces_names() {
    let g = graph(vec![create_test_order(), create_test_order_item()], vec![]);
    let (artifact, _) = assemble(&g, "Order");
    let text = render::render(&artifact).unwrap();

    assert!(text.contains("selector: 'order-base-details'"));
    assert!(text.contains("export class OrderBaseDetailsComponent {"));
    assert!(text.contains("itemsForOrder: this.apiService.getOrderedItemsForOrder(this.modelId),"));
    assert!(text.contains(".subscribe(({ order, itemsForOrder }) => {"));
    assert!(text.contains("this.initItemsFormArray(itemsForOrder);"));
    assert!(text.contains("this.initItemsFormArray([]);"));
    assert!(text.contains("saveBody.itemsDTO = this.itemsFormArray.getRawValue();"));
    assert!(text.contains("currentUserPermissionCodes.includes('InsertOrder') && this.modelId <= 0"));
    assert!(text.contains("this.baseFormService.disableAllFormControls(this.itemsFormArray);"));
    assert!(text.contains("<spider-autocomplete [control]=\"control('customerId', orderFormGroup)\""));
    assert!(text.contains("<spider-number [control]=\"control('quantity', orderItemFormGroup)\"></spider-number>"));
    assert!(text.contains("isFormArrayEmpty(this.itemsFormArray)"));
    assert!(text.contains("@Input() showStatusForOrder: boolean = true;"));
}

#[test]
fn rendered_component_keeps_unresolved_visible() {
    let place = EntityDef::new("Place", "geo::entities").with_property(PropertyDef::new("Location", "geo::Point<f64>"));
    let g = graph(vec![place], vec![]);
    let (artifact, diagnostics) = assemble(&g, "Place");
    let text = render::render(&artifact).unwrap();
    assert!(text.contains("<TODO [control]=\"control('location', placeFormGroup)\"></TODO>"));
    assert_eq!(diagnostics[0].code, DiagnosticCode::UnresolvedControl);
}

#[test]
fn rendering_is_idempotent() {
    let g = graph(vec![create_test_post()], vec![create_test_user()]);
    let (first, _) = assemble(&g, "Post");
    let (second, _) = assemble(&g, "Post");
    assert_eq!(first, second);
    assert_eq!(render::render(&first).unwrap(), render::render(&second).unwrap());
}
