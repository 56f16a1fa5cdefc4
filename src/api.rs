// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! API artifact assembler.
//!
//! Entities are grouped by controller name; every group with exactly one
//! business service becomes one [`ControllerArtifact`] listing the endpoints
//! of its entities. [`render`] turns an artifact into a formatted Rust source
//! file of axum handlers plus a router factory.
//!
//! # Endpoints per entity
//!
//! | Endpoint | Method | Condition |
//! |----------|--------|-----------|
//! | `get_{e}_table_data` | POST | always |
//! | `export_{e}_table_data_to_excel` | POST | always |
//! | `get_{e}_list` | GET | always |
//! | `get_{e}` | GET | always |
//! | `get_{p}_autocomplete_list_for_{e}` | GET | many-to-one, Autocomplete control |
//! | `get_{p}_dropdown_list_for_{e}` | GET | many-to-one, Dropdown control |
//! | `get_ordered_{p}_for_{e}` | GET | ordered one-to-many |
//! | `get_{p}_namebook_list_for_{e}` | GET | multi-select or multi-autocomplete |
//! | `get_{p}_table_data_for_{e}` | POST | lazy table |
//! | `export_{p}_table_data_to_excel_for_{e}` | POST | lazy table |
//! | `lazy_load_selected_{p}_ids_for_{e}` | POST | lazy table |
//! | `save_{e}` | PUT | not read-only |
//! | `upload_{p}_for_{e}` | POST | blob property |
//! | `delete_{e}` | DELETE | not read-only |
//!
//! Join-only entities get no endpoints. A group without a business service
//! is skipped silently; a group with several is skipped with an
//! `ambiguous-business-service` diagnostic.

pub mod handlers;
pub mod router;

use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::quote;

use crate::{
    classify::{Classifier, ControlKind, RelationshipKind},
    config::ApiConfig,
    error::{Diagnostic, Result, ScaffoldError},
    graph::EntityGraph,
    model::{EntityDef, PropertyDef},
    naming::{kebab, loose_eq, pascal, snake}
};

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete
}

impl HttpMethod {
    /// Lowercase name, matching `axum::routing` and `utoipa::path`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete"
        }
    }
}

/// Relation an endpoint serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Property on the owning entity.
    pub property:       String,
    /// Target entity name.
    pub target:         String,
    /// Id type of the target.
    pub target_id_type: String
}

/// What an endpoint does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointKind {
    /// Paged table query.
    TableData,
    /// Table export as a spreadsheet.
    ExportTableData,
    /// Unfiltered list.
    List,
    /// Single record by id.
    GetById,
    /// Autocomplete lookup for a many-to-one property.
    Autocomplete(Relation),
    /// Dropdown lookup for a many-to-one property.
    Dropdown(Relation),
    /// Ordered child collection of a record.
    OrderedCollection(Relation),
    /// Selected namebooks of a many-to-many relation.
    SelectedNamebooks(Relation),
    /// Paged table of a lazy many-to-many relation.
    LazyTableData(Relation),
    /// Export of a lazy many-to-many table.
    LazyTableExport(Relation),
    /// Selected ids of a lazy many-to-many table.
    LazyLoadSelectedIds(Relation),
    /// Insert or update from a save body.
    Save,
    /// Blob upload for a property.
    UploadBlob {
        /// Blob property.
        property: String
    },
    /// Delete by id.
    Delete
}

impl EndpointKind {
    /// HTTP method serving this endpoint.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::List
            | Self::GetById
            | Self::Autocomplete(_)
            | Self::Dropdown(_)
            | Self::OrderedCollection(_)
            | Self::SelectedNamebooks(_) => HttpMethod::Get,
            Self::TableData
            | Self::ExportTableData
            | Self::LazyTableData(_)
            | Self::LazyTableExport(_)
            | Self::LazyLoadSelectedIds(_)
            | Self::UploadBlob {
                ..
            } => HttpMethod::Post,
            Self::Save => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete
        }
    }

    /// Whether the route ends with an `{id}` path segment.
    #[must_use]
    pub const fn takes_id(&self) -> bool {
        matches!(
            self,
            Self::GetById | Self::OrderedCollection(_) | Self::SelectedNamebooks(_) | Self::Delete
        )
    }

    /// Relation served, if any.
    #[must_use]
    pub const fn relation(&self) -> Option<&Relation> {
        match self {
            Self::Autocomplete(r)
            | Self::Dropdown(r)
            | Self::OrderedCollection(r)
            | Self::SelectedNamebooks(r)
            | Self::LazyTableData(r)
            | Self::LazyTableExport(r)
            | Self::LazyLoadSelectedIds(r) => Some(r),
            _ => None
        }
    }

    /// Snake-case handler name for an entity.
    #[must_use]
    pub fn handler_name(&self, entity: &str) -> String {
        let e = snake(entity);
        match self {
            Self::TableData => format!("get_{e}_table_data"),
            Self::ExportTableData => format!("export_{e}_table_data_to_excel"),
            Self::List => format!("get_{e}_list"),
            Self::GetById => format!("get_{e}"),
            Self::Autocomplete(r) => format!("get_{}_autocomplete_list_for_{e}", snake(&r.property)),
            Self::Dropdown(r) => format!("get_{}_dropdown_list_for_{e}", snake(&r.property)),
            Self::OrderedCollection(r) => format!("get_ordered_{}_for_{e}", snake(&r.property)),
            Self::SelectedNamebooks(r) => format!("get_{}_namebook_list_for_{e}", snake(&r.property)),
            Self::LazyTableData(r) => format!("get_{}_table_data_for_{e}", snake(&r.property)),
            Self::LazyTableExport(r) => {
                format!("export_{}_table_data_to_excel_for_{e}", snake(&r.property))
            }
            Self::LazyLoadSelectedIds(r) => {
                format!("lazy_load_selected_{}_ids_for_{e}", snake(&r.property))
            }
            Self::Save => format!("save_{e}"),
            Self::UploadBlob {
                property
            } => format!("upload_{}_for_{e}", snake(property)),
            Self::Delete => format!("delete_{e}")
        }
    }
}

/// One endpoint of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// What the endpoint does.
    pub kind:    EndpointKind,
    /// Handler function name, also the business service method name.
    pub handler: String,
    /// Route path.
    pub path:    String
}

impl Endpoint {
    fn new(controller: &str, entity: &str, kind: EndpointKind) -> Self {
        let handler = kind.handler_name(entity);
        let mut path = format!("/{}/{}", kebab(controller), kebab(&handler));
        if kind.takes_id() {
            path.push_str("/{id}");
        }
        Self {
            kind,
            handler,
            path
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.kind.method()
    }
}

/// Endpoints of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEndpoints {
    /// Entity name.
    pub entity:    String,
    /// Id type of the entity.
    pub id_type:   String,
    /// Handlers require the auth guard.
    pub authorize: bool,
    /// Save and delete were suppressed.
    pub read_only: bool,
    /// Endpoints in emission order.
    pub endpoints: Vec<Endpoint>
}

impl EntityEndpoints {
    /// Find an endpoint by handler name.
    #[must_use]
    pub fn endpoint(&self, handler: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.handler == handler)
    }
}

/// Structured API artifact for one controller group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerArtifact {
    /// Controller group name.
    pub controller: String,
    /// Output file name.
    pub file_name:  String,
    /// Business service path, `::` separated.
    pub service:    String,
    /// Entities in graph order.
    pub entities:   Vec<EntityEndpoints>
}

impl ControllerArtifact {
    /// Endpoints of an entity.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityEndpoints> {
        self.entities.iter().find(|e| e.entity == name)
    }
}

/// Builds controller artifacts from an entity graph.
#[derive(Debug)]
pub struct ApiAssembler<'g> {
    graph:      &'g EntityGraph,
    classifier: Classifier
}

impl<'g> ApiAssembler<'g> {
    /// Create an assembler over a graph.
    #[must_use]
    pub fn new(graph: &'g EntityGraph) -> Self {
        Self {
            graph,
            classifier: Classifier::default()
        }
    }

    /// Controller name of an entity: the `Controller` attribute, else the
    /// PascalCased namespace segment before the entity module.
    #[must_use]
    pub fn controller_name(&self, entity: &EntityDef) -> String {
        if let Some(controller) = self.graph.facts(entity).controller {
            return controller;
        }
        entity
            .project_segments()
            .last()
            .map_or_else(|| entity.name.clone(), |segment| pascal(segment))
    }

    /// Entities grouped by controller name, sorted by name.
    #[must_use]
    pub fn groups(&self) -> BTreeMap<String, Vec<&'g EntityDef>> {
        let mut groups: BTreeMap<String, Vec<&'g EntityDef>> = BTreeMap::new();
        for entity in self.graph.entities() {
            groups.entry(self.controller_name(entity)).or_default().push(entity);
        }
        groups
    }

    /// The single business service of a group.
    ///
    /// Candidates live in the service module of the group's first entity's
    /// project and have a base type containing the business-service marker
    /// but not the excluded marker.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::AmbiguousBusinessService`] when several
    /// classes qualify.
    pub fn business_service(&self, controller: &str, entities: &[&EntityDef]) -> Result<Option<&'g EntityDef>> {
        let Some(first) = entities.first() else {
            return Ok(None);
        };
        let project = first.project_segments();
        let conventions = self.graph.conventions();
        let candidates: Vec<&'g EntityDef> = self
            .graph
            .services()
            .filter(|service| {
                let segments = service.project_segments();
                segments.len() == project.len() && segments.iter().zip(&project).all(|(a, b)| loose_eq(a, b))
            })
            .filter(|service| {
                service.base_type.as_deref().is_some_and(|base| {
                    base.contains(conventions.business_service_marker.as_str())
                        && !base.contains(conventions.business_service_excluded_marker.as_str())
                })
            })
            .collect();
        match candidates.as_slice() {
            [] => Ok(None),
            [service] => Ok(Some(*service)),
            _ => Err(ScaffoldError::AmbiguousBusinessService {
                controller: controller.to_string(),
                candidates: candidates.iter().map(|c| c.name.clone()).collect()
            })
        }
    }

    /// Assemble every controller group.
    #[must_use]
    pub fn assemble_all(&self) -> (Vec<ControllerArtifact>, Vec<Diagnostic>) {
        let mut artifacts = Vec::new();
        let mut diagnostics = Vec::new();
        for (controller, entities) in self.groups() {
            let service = match self.business_service(&controller, &entities) {
                Ok(Some(service)) => service,
                Ok(None) => {
                    tracing::debug!(%controller, "no business service, controller skipped");
                    continue;
                }
                Err(err) => {
                    tracing::warn!(%controller, error = %err, "controller skipped");
                    diagnostics.push(Diagnostic::from_error(controller.as_str(), &err));
                    continue;
                }
            };
            let (artifact, found) = self.assemble(&controller, service, &entities);
            diagnostics.extend(found);
            artifacts.push(artifact);
        }
        (artifacts, diagnostics)
    }

    /// Assemble one controller group with its business service.
    #[must_use]
    pub fn assemble(
        &self,
        controller: &str,
        service: &EntityDef,
        entities: &[&EntityDef]
    ) -> (ControllerArtifact, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let entities = entities
            .iter()
            .filter(|entity| {
                let join_only = self.graph.facts(entity).join_only;
                if join_only {
                    tracing::debug!(entity = %entity.name, "join-only entity has no endpoints");
                }
                !join_only
            })
            .map(|entity| self.endpoints(controller, entity, &mut diagnostics))
            .collect();
        let artifact = ControllerArtifact {
            controller: controller.to_string(),
            file_name: format!("{}_base_controller.generated.rs", snake(controller)),
            service: format!("{}::{}", service.module_path(), service.name),
            entities
        };
        (artifact, diagnostics)
    }

    fn endpoints(&self, controller: &str, entity: &EntityDef, diagnostics: &mut Vec<Diagnostic>) -> EntityEndpoints {
        let facts = self.graph.facts(entity);
        let mut kinds = vec![
            EndpointKind::TableData,
            EndpointKind::ExportTableData,
            EndpointKind::List,
            EndpointKind::GetById,
        ];

        let classified: Vec<_> = entity
            .properties
            .iter()
            .map(|p| (p, self.classifier.classify_in(p, self.graph)))
            .collect();

        for (property, c) in &classified {
            if c.relationship != RelationshipKind::ManyToOne {
                continue;
            }
            let wrap: fn(Relation) -> EndpointKind = match c.control {
                ControlKind::Autocomplete => EndpointKind::Autocomplete,
                ControlKind::Dropdown => EndpointKind::Dropdown,
                _ => continue
            };
            if let Some(relation) = self.relation(property, diagnostics) {
                kinds.push(wrap(relation));
            }
        }

        for (property, c) in &classified {
            if c.relationship == RelationshipKind::OneToManyOrdered
                && let Some(relation) = self.relation(property, diagnostics)
            {
                kinds.push(EndpointKind::OrderedCollection(relation));
            }
        }

        for (property, c) in &classified {
            if !c.relationship.is_many_to_many() {
                continue;
            }
            let Some(relation) = self.relation(property, diagnostics) else {
                continue;
            };
            if c.relationship.is_multi_control() {
                kinds.push(EndpointKind::SelectedNamebooks(relation));
            } else {
                kinds.push(EndpointKind::LazyTableData(relation.clone()));
                kinds.push(EndpointKind::LazyTableExport(relation.clone()));
                kinds.push(EndpointKind::LazyLoadSelectedIds(relation));
            }
        }

        if !facts.read_only {
            kinds.push(EndpointKind::Save);
        }
        for (property, c) in &classified {
            if c.facts.blob {
                kinds.push(EndpointKind::UploadBlob {
                    property: property.name.clone()
                });
            }
        }
        if !facts.read_only {
            kinds.push(EndpointKind::Delete);
        }

        EntityEndpoints {
            entity:    entity.name.clone(),
            id_type:   self.graph.id_type(entity),
            authorize: facts.authorize(),
            read_only: facts.read_only,
            endpoints: kinds
                .into_iter()
                .map(|kind| Endpoint::new(controller, &entity.name, kind))
                .collect()
        }
    }

    fn relation(&self, property: &PropertyDef, diagnostics: &mut Vec<Diagnostic>) -> Option<Relation> {
        match self.graph.resolve_target(property) {
            Ok(target) => Some(Relation {
                property:       property.name.clone(),
                target:         target.name.clone(),
                target_id_type: self.graph.id_type(target)
            }),
            Err(err) => {
                tracing::warn!(error = %err, "relation endpoint skipped");
                diagnostics.push(Diagnostic::from_error(property.entity_name.as_str(), &err));
                None
            }
        }
    }
}

/// Token stream of a controller file: handlers followed by the router.
///
/// # Errors
///
/// Returns [`ScaffoldError::InvalidPath`] or
/// [`ScaffoldError::InvalidTypeSpelling`] when a configured path or a
/// declared id type does not parse.
pub fn tokens(artifact: &ControllerArtifact, config: &ApiConfig) -> Result<TokenStream> {
    let ctx = handlers::Context::new(artifact, config)?;
    let doc = format!(
        " Base controller for the `{}` group.\n\n Generated file, do not edit.",
        artifact.controller
    );
    let mut handler_tokens = Vec::new();
    for entity in &artifact.entities {
        handler_tokens.push(handlers::generate(&ctx, entity)?);
    }
    let router = router::generate(&ctx, artifact);
    Ok(quote! {
        #![doc = #doc]
        #(#handler_tokens)*
        #router
    })
}

/// Render a controller artifact as formatted Rust source.
///
/// # Errors
///
/// Propagates [`tokens`] errors and returns [`ScaffoldError::Reflect`] if
/// the generated tokens fail to parse as a file.
pub fn render(artifact: &ControllerArtifact, config: &ApiConfig) -> Result<String> {
    let file: syn::File = syn::parse2(tokens(artifact, config)?)?;
    Ok(prettyplease::unparse(&file))
}
