// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Handler generation.
//!
//! Every endpoint becomes one axum handler that extracts its inputs, calls
//! the business service method of the same name and maps failures to
//! `masterror::AppError::internal`. The last service argument is always the
//! `authorize` flag of the entity.
//!
//! | Endpoint | Extractor | Response body |
//! |----------|-----------|---------------|
//! | table data | `Json<TableFilter<Id>>` | `TableResponse<{E}Dto>` |
//! | export | `Json<TableFilter<Id>>` | spreadsheet bytes |
//! | list | none | `Vec<{E}Dto>` |
//! | get by id | `Path<Id>` | `{E}Dto`, 404 when absent |
//! | autocomplete, dropdown | `Query<LookupQuery<Id>>` | `Vec<Namebook<TargetId>>` |
//! | ordered collection | `Path<Id>` | `Vec<{Target}Dto>` |
//! | selected namebooks | `Path<Id>` | `Vec<Namebook<TargetId>>` |
//! | lazy table data | `Json<TableFilter<Id>>` | `TableResponse<{Target}Dto>` |
//! | lazy selected ids | `Json<TableFilter<Id>>` | `LazyLoadSelectedIdsResult<TargetId>` |
//! | save | `Json<{E}SaveBody>` | `{E}SaveBody` |
//! | upload | `Multipart` | stored blob name |
//! | delete | `Path<Id>` | `204 No Content` |

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use super::{ControllerArtifact, Endpoint, EndpointKind, EntityEndpoints};
use crate::{
    config::ApiConfig,
    error::{Result, ScaffoldError}
};

/// Paths and types shared by every handler of a controller.
#[derive(Debug, Clone)]
pub struct Context {
    /// Business service type.
    pub service:    syn::Path,
    /// Auth guard extractor type.
    pub auth_guard: syn::Type,
    /// Module holding DTO and save body types.
    pub dto_path:   syn::Path,
    /// Runtime support crate.
    pub core:       syn::Path,
    /// OpenAPI tag.
    pub tag:        String
}

impl Context {
    /// Parse the configured paths for a controller.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidPath`] when a path does not parse.
    pub fn new(artifact: &ControllerArtifact, config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            service:    parse_path(&artifact.service)?,
            auth_guard: syn::parse_str(&config.auth_guard).map_err(|_| ScaffoldError::InvalidPath {
                path: config.auth_guard.clone()
            })?,
            dto_path:   parse_path(&config.dto_path)?,
            core:       parse_path(&config.core_path)?,
            tag:        artifact.controller.clone()
        })
    }

    fn dto(&self, entity: &str) -> TokenStream {
        let dto_path = &self.dto_path;
        let ident = format_ident!("{}Dto", entity);
        quote! { #dto_path::#ident }
    }
}

fn parse_path(path: &str) -> Result<syn::Path> {
    syn::parse_str(path).map_err(|_| ScaffoldError::InvalidPath {
        path: path.to_string()
    })
}

fn parse_type(spelling: &str) -> Result<syn::Type> {
    syn::parse_str(spelling).map_err(|_| ScaffoldError::InvalidTypeSpelling {
        spelling: spelling.to_string()
    })
}

/// Generate every handler of an entity.
///
/// # Errors
///
/// Returns [`ScaffoldError::InvalidTypeSpelling`] when an id type does not
/// parse.
pub fn generate(ctx: &Context, entity: &EntityEndpoints) -> Result<TokenStream> {
    let mut handlers = Vec::with_capacity(entity.endpoints.len());
    for endpoint in &entity.endpoints {
        handlers.push(generate_handler(ctx, entity, endpoint)?);
    }
    Ok(quote! { #(#handlers)* })
}

/// Per-kind pieces of a handler.
struct Shape {
    summary: String,
    input:   TokenStream,
    args:    Vec<TokenStream>,
    output:  TokenStream,
    finish:  TokenStream,
    status:  u16
}

fn json_finish() -> TokenStream {
    quote! { Ok(axum::response::Json(value)) }
}

fn filter_input(core: &syn::Path, id_type: &syn::Type) -> TokenStream {
    quote! { axum::Json(filter): axum::Json<#core::TableFilter<#id_type>> }
}

fn path_input(id_type: &syn::Type) -> TokenStream {
    quote! { axum::extract::Path(id): axum::extract::Path<#id_type> }
}

fn export_finish(core: &syn::Path, file: &str) -> TokenStream {
    let disposition = format!("attachment; filename=\"{file}.xlsx\"");
    quote! {
        Ok((
            [
                (axum::http::header::CONTENT_TYPE, #core::EXCEL_CONTENT_TYPE),
                (axum::http::header::CONTENT_DISPOSITION, #disposition)
            ],
            value
        ))
    }
}

fn shape(ctx: &Context, entity: &EntityEndpoints, kind: &EndpointKind) -> Result<Shape> {
    let core = &ctx.core;
    let name = &entity.entity;
    let id_type = parse_type(&entity.id_type)?;
    let dto = ctx.dto(name);
    let target_id = kind
        .relation()
        .map(|r| parse_type(&r.target_id_type))
        .transpose()?;

    let shape = match kind {
        EndpointKind::TableData => Shape {
            summary: format!("Page of {name} rows."),
            input:   filter_input(core, &id_type),
            args:    vec![quote! { filter }],
            output:  quote! { axum::response::Json<#core::TableResponse<#dto>> },
            finish:  json_finish(),
            status:  200
        },
        EndpointKind::ExportTableData => Shape {
            summary: format!("Export {name} rows to a spreadsheet."),
            input:   filter_input(core, &id_type),
            args:    vec![quote! { filter }],
            output:  quote! { impl axum::response::IntoResponse },
            finish:  export_finish(core, name),
            status:  200
        },
        EndpointKind::List => Shape {
            summary: format!("All {name} records."),
            input:   TokenStream::new(),
            args:    Vec::new(),
            output:  quote! { axum::response::Json<Vec<#dto>> },
            finish:  json_finish(),
            status:  200
        },
        EndpointKind::GetById => {
            let not_found = format!("{name} not found");
            Shape {
                summary: format!("Get {name} by id."),
                input:   path_input(&id_type),
                args:    vec![quote! { id }],
                output:  quote! { axum::response::Json<#dto> },
                finish:  quote! {
                    let value = value.ok_or_else(|| masterror::AppError::not_found(#not_found))?;
                    Ok(axum::response::Json(value))
                },
                status:  200
            }
        }
        EndpointKind::Autocomplete(r) => Shape {
            summary: format!("Autocomplete options of `{}` for {name}.", r.property),
            input:   quote! {
                axum::extract::Query(query): axum::extract::Query<#core::LookupQuery<#id_type>>
            },
            args:    vec![
                quote! { query.limit_or_default() },
                quote! { query.query },
                quote! { query.owner_id },
            ],
            output:  quote! { axum::response::Json<Vec<#core::Namebook<#target_id>>> },
            finish:  json_finish(),
            status:  200
        },
        EndpointKind::Dropdown(r) => Shape {
            summary: format!("Dropdown options of `{}` for {name}.", r.property),
            input:   quote! {
                axum::extract::Query(query): axum::extract::Query<#core::LookupQuery<#id_type>>
            },
            args:    vec![quote! { query.owner_id }],
            output:  quote! { axum::response::Json<Vec<#core::Namebook<#target_id>>> },
            finish:  json_finish(),
            status:  200
        },
        EndpointKind::OrderedCollection(r) => {
            let target_dto = ctx.dto(&r.target);
            Shape {
                summary: format!("Ordered `{}` of a {name}.", r.property),
                input:   path_input(&id_type),
                args:    vec![quote! { id }],
                output:  quote! { axum::response::Json<Vec<#target_dto>> },
                finish:  json_finish(),
                status:  200
            }
        }
        EndpointKind::SelectedNamebooks(r) => Shape {
            summary: format!("Selected `{}` of a {name}.", r.property),
            input:   path_input(&id_type),
            args:    vec![quote! { id }],
            output:  quote! { axum::response::Json<Vec<#core::Namebook<#target_id>>> },
            finish:  json_finish(),
            status:  200
        },
        EndpointKind::LazyTableData(r) => {
            let target_dto = ctx.dto(&r.target);
            Shape {
                summary: format!("Page of `{}` rows for a {name}.", r.property),
                input:   filter_input(core, &id_type),
                args:    vec![quote! { filter }],
                output:  quote! { axum::response::Json<#core::TableResponse<#target_dto>> },
                finish:  json_finish(),
                status:  200
            }
        }
        EndpointKind::LazyTableExport(r) => Shape {
            summary: format!("Export `{}` rows of a {name} to a spreadsheet.", r.property),
            input:   filter_input(core, &id_type),
            args:    vec![quote! { filter }],
            output:  quote! { impl axum::response::IntoResponse },
            finish:  export_finish(core, &r.target),
            status:  200
        },
        EndpointKind::LazyLoadSelectedIds(r) => Shape {
            summary: format!("Selected `{}` ids of a {name} under a table filter.", r.property),
            input:   filter_input(core, &id_type),
            args:    vec![quote! { filter }],
            output:  quote! { axum::response::Json<#core::LazyLoadSelectedIdsResult<#target_id>> },
            finish:  json_finish(),
            status:  200
        },
        EndpointKind::Save => {
            let dto_path = &ctx.dto_path;
            let save_body = format_ident!("{}SaveBody", name);
            Shape {
                summary: format!("Insert or update a {name}."),
                input:   quote! { axum::Json(body): axum::Json<#dto_path::#save_body> },
                args:    vec![quote! { body }],
                output:  quote! { axum::response::Json<#dto_path::#save_body> },
                finish:  json_finish(),
                status:  200
            }
        }
        EndpointKind::UploadBlob {
            property
        } => Shape {
            summary: format!("Upload the `{property}` blob of a {name}."),
            input:   quote! { multipart: axum::extract::Multipart },
            args:    vec![quote! { multipart }],
            output:  quote! { axum::response::Json<String> },
            finish:  json_finish(),
            status:  200
        },
        EndpointKind::Delete => Shape {
            summary: format!("Delete a {name}."),
            input:   path_input(&id_type),
            args:    vec![quote! { id }],
            output:  quote! { axum::http::StatusCode },
            finish:  quote! { Ok(axum::http::StatusCode::NO_CONTENT) },
            status:  204
        }
    };
    Ok(shape)
}

fn generate_handler(ctx: &Context, entity: &EntityEndpoints, endpoint: &Endpoint) -> Result<TokenStream> {
    let shape = shape(ctx, entity, &endpoint.kind)?;
    let service = &ctx.service;
    let guard_type = &ctx.auth_guard;
    let tag = &ctx.tag;
    let path = &endpoint.path;
    let authorize = entity.authorize;
    let handler_name = format_ident!("{}", endpoint.handler);
    let method = format_ident!("{}", endpoint.method().as_str());

    let guard = if authorize {
        quote! { _guard: #guard_type, }
    } else {
        TokenStream::new()
    };
    let input = &shape.input;
    let args = &shape.args;
    let output = &shape.output;
    let finish = &shape.finish;
    let call = quote! {
        service
            .#handler_name(#(#args,)* #authorize)
            .await
            .map_err(|e| masterror::AppError::internal(e.to_string()))?
    };
    let body = if matches!(endpoint.kind, EndpointKind::Delete) {
        quote! { #call; #finish }
    } else {
        quote! { let value = #call; #finish }
    };

    let params = if endpoint.kind.takes_id() {
        let id_type = parse_type(&entity.id_type)?;
        let id_desc = format!("{} identifier", entity.entity);
        quote! { params(("id" = #id_type, Path, description = #id_desc)), }
    } else {
        TokenStream::new()
    };

    let success = Literal::u16_unsuffixed(shape.status);
    let success_desc = shape.summary.trim_end_matches('.').to_string();
    let unauthorized = if authorize {
        quote! { (status = 401, description = "Authentication required"), }
    } else {
        TokenStream::new()
    };

    let doc = format!(
        "{}\n\n\
         # Responses\n\n\
         - `{}` - Success\n\
         {}\
         - `500 Internal Server Error` - Business service error",
        shape.summary,
        shape.status,
        if authorize {
            "- `401 Unauthorized` - Authentication required\n"
        } else {
            ""
        }
    );

    Ok(quote! {
        #[doc = #doc]
        #[utoipa::path(
            #method,
            path = #path,
            tag = #tag,
            #params
            responses(
                (status = #success, description = #success_desc),
                #unauthorized
                (status = 500, description = "Internal server error")
            )
        )]
        pub async fn #handler_name(
            axum::extract::State(service): axum::extract::State<std::sync::Arc<#service>>,
            #guard
            #input
        ) -> masterror::AppResult<#output> {
            #body
        }
    })
}
