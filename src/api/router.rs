// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Router factory generation.
//!
//! One function per controller group mounts every handler under
//! `/{controller-kebab}`:
//!
//! ```rust,ignore
//! pub fn sales_router() -> axum::Router<std::sync::Arc<SalesBusinessService>> {
//!     axum::Router::new()
//!         .route("/sales/get-order-table-data", axum::routing::post(get_order_table_data))
//!         .route("/sales/get-order/{id}", axum::routing::get(get_order))
//! }
//! ```
//!
//! Handlers sharing a path are chained on a single `route` call.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{ControllerArtifact, handlers::Context};
use crate::naming::snake;

/// Generate the router factory of a controller.
pub fn generate(ctx: &Context, artifact: &ControllerArtifact) -> TokenStream {
    let service = &ctx.service;
    let router_fn = format_ident!("{}_router", snake(&artifact.controller));

    let mut paths: Vec<(&str, Vec<TokenStream>)> = Vec::new();
    for endpoint in artifact.entities.iter().flat_map(|e| &e.endpoints) {
        let method = format_ident!("{}", endpoint.method().as_str());
        let handler = format_ident!("{}", endpoint.handler);
        let call = quote! { #method(#handler) };
        match paths.iter_mut().find(|(path, _)| *path == endpoint.path) {
            Some((_, calls)) => calls.push(call),
            None => paths.push((endpoint.path.as_str(), vec![call]))
        }
    }

    let routes = paths.iter().filter_map(|(path, calls)| {
        let (first, rest) = calls.split_first()?;
        Some(quote! {
            .route(#path, axum::routing::#first #(.#rest)*)
        })
    });

    let doc = format!(
        "Create axum router for the `{}` controller.\n\n\
         # Usage\n\n\
         ```rust,ignore\n\
         let service = Arc::new(service);\n\
         let app = Router::new()\n    \
             .merge({}())\n    \
             .with_state(service);\n\
         ```",
        artifact.controller, router_fn
    );

    quote! {
        #[doc = #doc]
        pub fn #router_fn() -> axum::Router<std::sync::Arc<#service>> {
            axum::Router::new()
                #(#routes)*
        }
    }
}
