// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! UI artifact assembler.
//!
//! Turns an [`EntityLayout`] into a [`UiArtifact`]: a structured description
//! of one base-details form component. Nothing here produces markup; the
//! [`render`] module feeds the artifact to a template.
//!
//! # Eligibility
//!
//! Entities of the current module with the entity role, except those marked
//! `UIDoNotGenerate`, read-only entities and join-only (many-to-many)
//! entities.
//!
//! # Artifact sections
//!
//! | Section | Contents |
//! |---------|----------|
//! | `show_flags` | `show{Property}For{Entity}` visibility inputs, one per top-level block |
//! | `fields` | client state: option lists, selection controls, form arrays, lazy-table tri-state |
//! | `fetches` | named requests aggregated into one parallel fetch for existing records |
//! | `init_existing` / `init_new` | population steps after the fetch / for a new record |
//! | `save_payload` | assignments merged into the save body |
//! | `permission` | checks OR'd into the allowed-to-save flag |
//! | `toggles` | controls enabled or disabled by the allowed-to-save flag |
//! | `blocks` | ordered form blocks |
//!
//! # Naming
//!
//! ```text
//! Order.items (ordered one-to-many of OrderItem)
//! ├── field   itemsFormArray, itemsModel, itemsCrudMenu, ...
//! ├── fetch   itemsForOrder: getOrderedItemsForOrder
//! ├── init    initItemsFormArray(itemsForOrder) / initItemsFormArray([])
//! ├── save    itemsDTO <- itemsFormArray
//! └── toggle  all controls of itemsFormArray
//! ```

pub mod render;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    classify::{Classifier, ControlKind, FULL_WIDTH, FilterKind, RelationshipKind},
    config::UiConfig,
    error::Diagnostic,
    graph::EntityGraph,
    layout::{EntityLayout, LayoutBlock, LayoutEngine, PropertyLayout},
    model::{ClassRole, EntityDef},
    naming::{camel, kebab, pascal}
};

/// Name forms of an entity used across the component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityNames {
    /// PascalCase name.
    pub name:  String,
    /// camelCase name.
    pub camel: String,
    /// kebab-case name.
    pub kebab: String
}

impl EntityNames {
    fn of(name: &str) -> Self {
        Self {
            name:  pascal(name),
            camel: camel(name),
            kebab: kebab(name)
        }
    }
}

/// One class member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    /// Member name.
    pub name:        String,
    /// Declared type, if any.
    pub ty:          Option<String>,
    /// Initializer expression, if any.
    pub initializer: Option<String>
}

impl FieldDecl {
    fn untyped(name: String) -> Self {
        Self {
            name,
            ty: None,
            initializer: None
        }
    }

    fn typed(name: String, ty: impl Into<String>) -> Self {
        Self {
            name,
            ty: Some(ty.into()),
            initializer: None
        }
    }

    fn init(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }
}

/// One member of the aggregated parallel fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fetch {
    /// Result key, also the local name after the fetch.
    pub key:        String,
    /// API client method called with the record id.
    pub api_method: String
}

/// Population step run after the fetch or for a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitStep {
    /// Build a form array from fetched rows, or from nothing.
    FormArray {
        /// Init method name.
        method: String,
        /// Fetch key holding the rows; `None` for a new record.
        source: Option<String>
    },
    /// Set a multi-select control to the fetched ids.
    SelectedIds {
        /// Selection control field.
        control: String,
        /// Fetch key holding the namebooks.
        source:  String
    },
    /// Set a multi-autocomplete control to options built from the fetch.
    SelectedOptions {
        /// Selection control field.
        control: String,
        /// Fetch key holding the namebooks.
        source:  String
    }
}

/// Assignment merged into the save body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaveStep {
    /// Scalar record payload from the entity form group.
    Record {
        /// Save-body member.
        target:     String,
        /// Form group field.
        form_group: String
    },
    /// Raw rows of an ordered collection.
    FormArray {
        /// Save-body member.
        target: String,
        /// Form array field.
        array:  String
    },
    /// Selected ids of a multi-select or multi-autocomplete.
    SelectedIds {
        /// Save-body member.
        target:  String,
        /// Selection control field.
        control: String,
        /// Whether the control holds options rather than ids.
        options: bool
    },
    /// Tri-state selection of a lazy table.
    LazySelection(LazyTable)
}

/// Record state a permission check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    /// Record not saved yet.
    New,
    /// Record loaded by id.
    Existing
}

/// One permission code and the record state it grants saving for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionCheck {
    /// Permission code.
    pub code:   String,
    /// Record state the code applies to.
    pub record: RecordState
}

/// Allowed-to-save computation.
///
/// The flag is the OR of every check and the externally supplied predicate,
/// recomputed whenever the permission codes or the predicate change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRule {
    /// Checks in evaluation order.
    pub checks: Vec<PermissionCheck>
}

/// Control switched by the allowed-to-save flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Toggle {
    /// A standalone selection control.
    Control {
        /// Control field.
        control: String
    },
    /// Every control of a form array.
    FormArray {
        /// Form array field.
        array: String
    },
    /// One control of the entity form group.
    FormGroupControl {
        /// Form group field.
        form_group: String,
        /// Control name.
        control:    String
    }
}

/// Ordered one-to-many relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedRelation {
    /// PascalCase property name.
    pub property:       String,
    /// camelCase property name.
    pub property_camel: String,
    /// Child entity.
    pub target:         EntityNames,
    /// Whether at least one row is required.
    pub required:       bool
}

/// Column of a lazy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    /// Translation key of the header.
    pub translation_key:  String,
    /// camelCase field.
    pub field:            String,
    /// Filter kind, if the column is filterable.
    pub filter:           Option<FilterKind>,
    /// Whether match modes are offered.
    pub show_match_modes: bool,
    /// Filter field for dropdown columns.
    pub filter_field:     Option<String>,
    /// API method providing filter values for list-filtered columns.
    pub values_api:       Option<String>
}

/// Lazy-table many-to-many relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LazyTable {
    /// PascalCase property name.
    pub property:       String,
    /// camelCase property name.
    pub property_camel: String,
    /// Owning entity name.
    pub entity:         String,
    /// Target entity name.
    pub target:         String,
    /// Columns in declaration order.
    pub columns:        Vec<TableColumn>
}

/// Method loading option lists up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionLoad {
    /// API client method.
    pub api_method: String,
    /// Option list field.
    pub options:    String
}

/// Method searching options as the user types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMethod {
    /// Method name.
    pub method:     String,
    /// API client method.
    pub api_method: String,
    /// Option list field.
    pub options:    String
}

/// Method uploading a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadMethod {
    /// Method name.
    pub method:     String,
    /// API client method.
    pub api_method: String,
    /// Form group holding the file name control.
    pub form_group: String,
    /// Control receiving the stored file name.
    pub control:    String
}

/// A single control block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlBlock {
    /// PascalCase property name, also the label key.
    pub property:       String,
    /// camelCase property name.
    pub property_camel: String,
    /// Control kind.
    pub control:        ControlKind,
    /// Layout width classes.
    pub width:          String,
    /// Visibility input, absent inside nested blocks.
    pub show_flag:      Option<String>,
    /// Form group the control belongs to.
    pub form_group:     String,
    /// Form control name inside the group.
    pub form_control:   String,
    /// Standalone selection control, for multi controls.
    pub selection:      Option<String>,
    /// Option list field.
    pub options:        Option<String>,
    /// Search method.
    pub search:         Option<String>,
    /// Upload method.
    pub upload:         Option<String>,
    /// Fraction digits of decimal controls.
    pub decimal_scale:  Option<u32>,
    /// Lazy table bound to the control.
    pub table:          Option<LazyTable>
}

/// An ordered one-to-many block with its child controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedBlock {
    /// The relation.
    pub relation:  OrderedRelation,
    /// Visibility input.
    pub show_flag: String,
    /// Layout width classes.
    pub width:     String,
    /// Child controls.
    pub blocks:    Vec<ControlBlock>
}

/// One form block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiBlock {
    /// A single control.
    Control(ControlBlock),
    /// An ordered one-to-many relation.
    Nested(NestedBlock)
}

impl UiBlock {
    /// PascalCase name of the property heading the block.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::Control(block) => &block.property,
            Self::Nested(block) => &block.relation.property
        }
    }
}

/// Names imported from one generated entities module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportGroup {
    /// Module specifier.
    pub module: String,
    /// Imported names, sorted.
    pub names:  Vec<String>
}

/// Structured description of one base-details component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiArtifact {
    /// Output file name.
    pub file_name:        String,
    /// Component selector.
    pub selector:         String,
    /// Component class name.
    pub class_name:       String,
    /// The entity.
    pub entity:           EntityNames,
    /// Entity imports grouped by module.
    pub imports:          Vec<ImportGroup>,
    /// Visibility inputs.
    pub show_flags:       Vec<String>,
    /// Client state declarations.
    pub fields:           Vec<FieldDecl>,
    /// Option lists loaded on init.
    pub option_loads:     Vec<OptionLoad>,
    /// Aggregated fetch, main record first.
    pub fetches:          Vec<Fetch>,
    /// Steps after the fetch of an existing record.
    pub init_existing:    Vec<InitStep>,
    /// Steps for a new record.
    pub init_new:         Vec<InitStep>,
    /// Save-body assembly.
    pub save_payload:     Vec<SaveStep>,
    /// Allowed-to-save computation.
    pub permission:       PermissionRule,
    /// Controls switched by the allowed-to-save flag.
    pub toggles:          Vec<Toggle>,
    /// Ordered one-to-many relations.
    pub ordered:          Vec<OrderedRelation>,
    /// Lazy tables.
    pub lazy_tables:      Vec<LazyTable>,
    /// Autocomplete search methods.
    pub searches:         Vec<SearchMethod>,
    /// Upload methods.
    pub uploads:          Vec<UploadMethod>,
    /// Controls with custom change handling.
    pub custom_on_change: Vec<String>,
    /// Form blocks in order.
    pub blocks:           Vec<UiBlock>
}

/// Builds [`UiArtifact`]s from a graph.
#[derive(Debug, Clone, Copy)]
pub struct UiAssembler<'g> {
    graph:  &'g EntityGraph,
    layout: LayoutEngine<'g>
}

impl<'g> UiAssembler<'g> {
    /// Create an assembler.
    #[must_use]
    pub fn new(graph: &'g EntityGraph, config: &UiConfig) -> Self {
        Self {
            graph,
            layout: LayoutEngine::new(graph, Classifier::new(config.default_decimal_scale))
        }
    }

    /// Whether an entity gets a component.
    #[must_use]
    pub fn is_eligible(&self, entity: &EntityDef) -> bool {
        if entity.role(self.graph.conventions()) != ClassRole::Entity {
            return false;
        }
        let facts = self.graph.facts(entity);
        !(facts.do_not_generate_ui || facts.read_only || facts.join_only)
    }

    /// Eligible entities of the current module, in declaration order.
    pub fn eligible(&self) -> impl Iterator<Item = &'g EntityDef> + '_ {
        self.graph.current().iter().filter(|entity| {
            let eligible = self.is_eligible(entity);
            if !eligible {
                tracing::debug!(entity = %entity.name, "entity not UI-eligible");
            }
            eligible
        })
    }

    /// Assemble the component of one entity.
    #[must_use]
    pub fn assemble(&self, entity: &'g EntityDef) -> (UiArtifact, Vec<Diagnostic>) {
        let layout = self.layout.layout(entity);
        let mut builder = Builder::new(self.graph, &layout);
        for block in &layout.blocks {
            match block {
                LayoutBlock::Control(property) => builder.top_control(property),
                LayoutBlock::Nested {
                    owner,
                    target,
                    blocks
                } => builder.ordered(owner, target, blocks)
            }
        }
        (builder.finish(), layout.diagnostics)
    }
}

/// Accumulates artifact sections while walking the layout.
struct Builder<'a> {
    graph:            &'a EntityGraph,
    entity:           &'a EntityDef,
    names:            EntityNames,
    imports:          BTreeMap<String, BTreeSet<String>>,
    show_flags:       Vec<String>,
    ordered_fields:   Vec<FieldDecl>,
    option_fields:    Vec<FieldDecl>,
    selection_fields: Vec<FieldDecl>,
    table_fields:     Vec<FieldDecl>,
    option_loads:     Vec<OptionLoad>,
    fetches:          Vec<Fetch>,
    init_existing:    Vec<InitStep>,
    init_new:         Vec<InitStep>,
    save_payload:     Vec<SaveStep>,
    toggles:          Vec<Toggle>,
    ordered:          Vec<OrderedRelation>,
    lazy_tables:      Vec<LazyTable>,
    searches:         Vec<SearchMethod>,
    uploads:          Vec<UploadMethod>,
    custom_on_change: Vec<String>,
    blocks:           Vec<UiBlock>
}

impl<'a> Builder<'a> {
    fn new(graph: &'a EntityGraph, layout: &EntityLayout<'a>) -> Self {
        let entity = layout.entity;
        let names = EntityNames::of(&entity.name);
        let mut builder = Self {
            graph,
            entity,
            fetches: vec![Fetch {
                key:        names.camel.clone(),
                api_method: format!("get{}", names.name)
            }],
            save_payload: vec![SaveStep::Record {
                target:     format!("{}DTO", names.camel),
                form_group: format!("{}FormGroup", names.camel)
            }],
            names,
            imports: BTreeMap::new(),
            show_flags: Vec::new(),
            ordered_fields: Vec::new(),
            option_fields: Vec::new(),
            selection_fields: Vec::new(),
            table_fields: Vec::new(),
            option_loads: Vec::new(),
            init_existing: Vec::new(),
            init_new: Vec::new(),
            toggles: Vec::new(),
            ordered: Vec::new(),
            lazy_tables: Vec::new(),
            searches: Vec::new(),
            uploads: Vec::new(),
            custom_on_change: Vec::new(),
            blocks: Vec::new()
        };
        builder.import(entity);
        builder
    }

    /// Import `{Entity}` and `{Entity}SaveBody` from the entity's generated
    /// module.
    fn import(&mut self, entity: &EntityDef) {
        let project = entity.project_segments().last().copied().unwrap_or("shared");
        let module = format!("../../entities/{}-entities.generated", kebab(project));
        let name = pascal(&entity.name);
        let names = self.imports.entry(module).or_default();
        names.insert(format!("{name}SaveBody"));
        names.insert(name);
    }

    fn top_control(&mut self, layout: &PropertyLayout<'_>) {
        let property = pascal(&layout.property.name);
        let property_camel = camel(&layout.property.name);
        let entity = self.names.name.clone();
        let relationship = layout.classification.relationship;

        let mut selection = None;
        let mut table = None;
        match relationship {
            RelationshipKind::ManyToManyMultiSelect | RelationshipKind::ManyToManyMultiAutocomplete => {
                let options = relationship == RelationshipKind::ManyToManyMultiAutocomplete;
                let control = format!("selected{property}For{entity}");
                let source = format!("{property_camel}For{entity}");
                let value_type = if options { "PrimengOption[]" } else { "number[]" };
                self.selection_fields.push(
                    FieldDecl::untyped(control.clone())
                        .init(format!("new SpiderFormControl<{value_type}>(null, {{updateOn: 'change'}})"))
                );
                self.fetches.push(Fetch {
                    key:        source.clone(),
                    api_method: format!("get{property}NamebookListFor{entity}")
                });
                self.init_existing.push(if options {
                    InitStep::SelectedOptions {
                        control: control.clone(),
                        source
                    }
                } else {
                    InitStep::SelectedIds {
                        control: control.clone(),
                        source
                    }
                });
                self.save_payload.push(SaveStep::SelectedIds {
                    target: format!("selected{property}Ids"),
                    control: control.clone(),
                    options
                });
                self.toggles.push(Toggle::Control {
                    control: control.clone()
                });
                selection = Some(control);
            }
            RelationshipKind::ManyToManyLazyTable => {
                let Some(lazy) = self.lazy_table(layout, &property, &property_camel) else {
                    return;
                };
                self.table_fields.extend(lazy_table_fields(&lazy));
                self.save_payload.push(SaveStep::LazySelection(lazy.clone()));
                self.lazy_tables.push(lazy.clone());
                table = Some(lazy);
            }
            _ => self.toggles.push(Toggle::FormGroupControl {
                form_group: format!("{}FormGroup", self.names.camel),
                control:    layout.classification.form_control_name.clone()
            })
        }

        let show_flag = format!("show{property}For{entity}");
        self.show_flags.push(show_flag.clone());

        let owner = self.names.clone();
        let mut block = self.control_block(layout, &owner);
        block.show_flag = Some(show_flag);
        block.selection = selection;
        block.table = table;
        self.blocks.push(UiBlock::Control(block));
    }

    fn ordered(&mut self, owner: &PropertyLayout<'_>, target: &EntityDef, children: &[LayoutBlock<'_>]) {
        let property = pascal(&owner.property.name);
        let p = camel(&owner.property.name);
        let entity = self.names.name.clone();
        let relation = OrderedRelation {
            property:       property.clone(),
            property_camel: p.clone(),
            target:         EntityNames::of(&target.name),
            required:       owner.classification.facts.required
        };
        let t = &relation.target;

        self.ordered_fields.extend([
            FieldDecl::typed(format!("{p}Model"), &t.name).init(format!("new {}()", t.name)),
            FieldDecl::typed(format!("{p}SaveBodyName"), "string")
                .init(format!("nameof<{}SaveBody>('{}DTO')", t.name, t.camel)),
            FieldDecl::typed(format!("{p}TranslationKey"), "string").init(format!("new {}().typeName", t.name)),
            FieldDecl::typed(format!("{p}FormArray"), format!("SpiderFormArray<{}>", t.name)),
            FieldDecl::typed(format!("{p}LastIndexClicked"), "LastMenuIconIndexClicked")
                .init("new LastMenuIconIndexClicked()"),
            FieldDecl::typed(format!("{p}CrudMenu"), "MenuItem[]").init("[]")
        ]);

        let source = format!("{p}For{entity}");
        let method = format!("init{property}FormArray");
        self.fetches.push(Fetch {
            key:        source.clone(),
            api_method: format!("getOrdered{property}For{entity}")
        });
        self.init_existing.push(InitStep::FormArray {
            method: method.clone(),
            source: Some(source)
        });
        self.init_new.push(InitStep::FormArray {
            method,
            source: None
        });
        self.save_payload.push(SaveStep::FormArray {
            target: format!("{p}DTO"),
            array:  format!("{p}FormArray")
        });
        self.toggles.push(Toggle::FormArray {
            array: format!("{p}FormArray")
        });
        self.import(target);

        let show_flag = format!("show{property}For{entity}");
        self.show_flags.push(show_flag.clone());

        let target_names = relation.target.clone();
        let blocks = children
            .iter()
            .map(|child| self.control_block(child.head(), &target_names))
            .collect();

        self.ordered.push(relation.clone());
        self.blocks.push(UiBlock::Nested(NestedBlock {
            relation,
            show_flag,
            width: FULL_WIDTH.to_string(),
            blocks
        }));
    }

    /// Control block of a property owned by `owner`, registering the
    /// option, search and upload members it needs.
    fn control_block(&mut self, layout: &PropertyLayout<'_>, owner: &EntityNames) -> ControlBlock {
        let property = pascal(&layout.property.name);
        let property_camel = camel(&layout.property.name);
        let control = layout.classification.control;
        let form_group = format!("{}FormGroup", owner.camel);

        let options = control.has_options().then(|| {
            let field = format!("{property_camel}OptionsFor{}", owner.name);
            self.option_fields
                .push(FieldDecl::typed(field.clone(), "PrimengOption[]"));
            if matches!(control, ControlKind::Dropdown | ControlKind::MultiSelect) {
                self.option_loads.push(OptionLoad {
                    api_method: format!("get{property}DropdownListFor{}", owner.name),
                    options:    field.clone()
                });
            }
            field
        });

        let search = (control.is_searchable() && options.is_some()).then(|| {
            let method = format!("search{property}For{}", owner.name);
            self.searches.push(SearchMethod {
                method:     method.clone(),
                api_method: format!("get{property}AutocompleteListFor{}", owner.name),
                options:    options.clone().unwrap_or_default()
            });
            method
        });

        let upload = (control == ControlKind::File).then(|| {
            let method = format!("upload{property}For{}", owner.name);
            self.uploads.push(UploadMethod {
                method:     method.clone(),
                api_method: format!("upload{property}For{}", owner.name),
                form_group: form_group.clone(),
                control:    property_camel.clone()
            });
            method
        });

        if control == ControlKind::ColorPick && owner.name == self.names.name {
            self.custom_on_change.push(property_camel.clone());
        }

        ControlBlock {
            property,
            property_camel,
            control,
            width: layout.classification.width.clone(),
            show_flag: None,
            form_group,
            form_control: layout.classification.form_control_name.clone(),
            selection: None,
            options,
            search,
            upload,
            decimal_scale: layout.classification.decimal_scale,
            table: None
        }
    }

    /// Lazy-table state of a relation whose target the layout resolved.
    fn lazy_table(&mut self, layout: &PropertyLayout<'_>, property: &str, property_camel: &str) -> Option<LazyTable> {
        let target = layout.target?;
        self.import(target);

        let columns = layout
            .classification
            .facts
            .table_columns
            .iter()
            .map(|field| table_column(self.graph, target, field))
            .collect();

        Some(LazyTable {
            property: property.to_string(),
            property_camel: property_camel.to_string(),
            entity: self.names.name.clone(),
            target: pascal(&target.name),
            columns
        })
    }

    fn finish(self) -> UiArtifact {
        let mut fields = vec![
            FieldDecl::typed(format!("{}SaveBodyName", self.names.camel), "string").init(format!(
                "nameof<{}SaveBody>('{}DTO')",
                self.names.name, self.names.camel
            )),
        ];
        fields.extend(self.ordered_fields);
        fields.extend(self.option_fields);
        fields.extend(self.selection_fields);
        fields.extend(self.table_fields);

        let extras = self.graph.facts(self.entity);
        let mut checks: Vec<PermissionCheck> = extras
            .extra_insert_permissions
            .into_iter()
            .map(|code| PermissionCheck {
                code,
                record: RecordState::New
            })
            .chain(extras.extra_update_permissions.into_iter().map(|code| PermissionCheck {
                code,
                record: RecordState::Existing
            }))
            .collect();
        checks.push(PermissionCheck {
            code:   format!("Insert{}", self.names.name),
            record: RecordState::New
        });
        checks.push(PermissionCheck {
            code:   format!("Update{}", self.names.name),
            record: RecordState::Existing
        });

        UiArtifact {
            file_name: format!("{}-base-details.generated.ts", self.names.kebab),
            selector: format!("{}-base-details", self.names.kebab),
            class_name: format!("{}BaseDetailsComponent", self.names.name),
            imports: self
                .imports
                .into_iter()
                .map(|(module, names)| ImportGroup {
                    module,
                    names: names.into_iter().collect()
                })
                .collect(),
            entity: self.names,
            show_flags: self.show_flags,
            fields,
            option_loads: self.option_loads,
            fetches: self.fetches,
            init_existing: self.init_existing,
            init_new: self.init_new,
            save_payload: self.save_payload,
            permission: PermissionRule {
                checks
            },
            toggles: self.toggles,
            ordered: self.ordered,
            lazy_tables: self.lazy_tables,
            searches: self.searches,
            uploads: self.uploads,
            custom_on_change: self.custom_on_change,
            blocks: self.blocks
        }
    }
}

/// Client state of one lazy table.
fn lazy_table_fields(lazy: &LazyTable) -> [FieldDecl; 7] {
    let (p, pc, e) = (&lazy.property, &lazy.property_camel, &lazy.entity);
    [
        FieldDecl::typed(format!("{pc}TableColsFor{e}"), format!("Column<{}>[]", lazy.target)),
        FieldDecl::untyped(format!("get{p}TableDataObservableMethodFor{e}"))
            .init(format!("this.apiService.get{p}TableDataFor{e}")),
        FieldDecl::untyped(format!("export{p}TableDataToExcelObservableMethodFor{e}"))
            .init(format!("this.apiService.export{p}TableDataToExcelFor{e}")),
        FieldDecl::typed(format!("newlySelected{p}IdsFor{e}"), "number[]").init("[]"),
        FieldDecl::typed(format!("unselected{p}IdsFor{e}"), "number[]").init("[]"),
        FieldDecl::typed(format!("areAll{p}SelectedFor{e}"), "boolean").init("null"),
        FieldDecl::typed(format!("last{p}LazyLoadTableFilterFor{e}"), "TableFilter")
    ]
}

/// Column descriptor for a `UITableColumn` field of a lazy-table target.
///
/// The field is looked up on the target entity with `DisplayName` and
/// `CommaSeparated` suffixes stripped, then verbatim on the target's DTO
/// class. Unknown fields produce an unfiltered column.
fn table_column(graph: &EntityGraph, target: &EntityDef, field: &str) -> TableColumn {
    let stripped = field.replace("DisplayName", "").replace("CommaSeparated", "");
    let property = target
        .property(&stripped)
        .or_else(|| graph.dto_for(target).and_then(|dto| dto.property(field)));
    let classification = property.map(|p| Classifier::default().classify_in(p, graph));

    let filter = classification.as_ref().and_then(|c| c.filter);
    let dropdown = classification.as_ref().is_some_and(|c| c.control == ControlKind::Dropdown);
    let listed = dropdown || classification.as_ref().is_some_and(|c| c.facts.comma_separated_display_name);
    let values_api = property
        .filter(|_| listed)
        .map(|p| format!("get{}DropdownListFor{}", pascal(&p.name), pascal(&target.name)));

    TableColumn {
        translation_key: pascal(field),
        field: camel(field),
        filter,
        show_match_modes: filter.is_some_and(|f| f.shows_match_modes()),
        filter_field: property
            .filter(|_| dropdown)
            .map(|p| format!("{}Id", camel(&p.name))),
        values_api
    }
}
