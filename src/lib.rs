// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! # Quick Navigation
//!
//! | Stage | Module | Entry point |
//! |-------|--------|-------------|
//! | Rust source to metadata | [`reflect`] | [`ModuleSource::reflect`] |
//! | Attribute interpretation | [`interpret`] | [`PropertyFacts`], [`EntityFacts`] |
//! | Classification | [`classify`] | [`Classifier::classify`] |
//! | Cross-module lookup | [`graph`] | [`EntityGraph::merge`] |
//! | Ordering and nesting | [`layout`] | [`LayoutEngine::layout`] |
//! | Form components | [`ui`] | [`UiAssembler::assemble`] |
//! | Controllers | [`api`] | [`ApiAssembler::assemble_all`] |
//! | Whole pass | [`pass`] | [`Generator::run`] |
//!
//! # Architecture
//!
//! ```text
//! entity-scaffold/
//! ├── model      — EntityDef, PropertyDef, AttributeDef, DeclaredType
//! ├── interpret  — Marker, PropertyFacts, EntityFacts
//! ├── classify   — RelationshipKind, ControlKind, FilterKind
//! ├── graph      — EntityGraph (current module shadows referenced)
//! ├── layout     — Bucket ordering, nested blocks
//! ├── ui         — UiArtifact + minijinja template
//! ├── api        — ControllerArtifact + axum handler tokens
//! ├── reflect    — syn + darling front-end
//! ├── pass       — Snapshot → PassOutput
//! ├── naming     — casing contract
//! ├── config     — ScaffoldConfig (TOML)
//! └── error      — ScaffoldError, Diagnostic
//! ```

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod graph;
pub mod interpret;
pub mod layout;
pub mod model;
pub mod naming;
pub mod pass;
pub mod reflect;
pub mod ui;

pub use api::{ApiAssembler, ControllerArtifact, Endpoint, EndpointKind};
pub use classify::{Classification, Classifier, ControlKind, FilterKind, RelationshipKind};
pub use config::{ApiConfig, Conventions, ScaffoldConfig, UiConfig};
pub use error::{Diagnostic, DiagnosticCode, Result, ScaffoldError, Severity};
pub use graph::EntityGraph;
pub use interpret::{EntityFacts, PropertyFacts};
pub use layout::{EntityLayout, LayoutBlock, LayoutEngine};
pub use model::{AttributeDef, EntityDef, PropertyDef};
pub use pass::{Artifact, ArtifactKind, Generator, PassOutput, Snapshot};
pub use reflect::{ModuleSource, Reflection};
pub use ui::{UiArtifact, UiAssembler};
