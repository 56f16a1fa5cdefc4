// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Errors and diagnostics.
//!
//! Two channels exist:
//!
//! | Channel | Type | Effect |
//! |---------|------|--------|
//! | Fatal | [`ScaffoldError`] | Returned through `Result`, aborts the current step |
//! | Non-fatal | [`Diagnostic`] | Collected into the pass output, generation continues |
//!
//! Missing relation targets start life as
//! [`ScaffoldError::MissingRelationTarget`] at the resolver boundary. Callers
//! that can skip the relation convert them with [`Diagnostic::from_error`].

use std::{fmt, path::PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

/// Fatal errors.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Relationship target not found in the entity graph.
    #[error("entity `{entity}`: property `{property}` references unknown entity `{target}`")]
    MissingRelationTarget {
        /// Owning entity.
        entity:   String,
        /// Property carrying the relation.
        property: String,
        /// Name that failed to resolve.
        target:   String
    },

    /// Rust source could not be parsed.
    #[error("failed to parse source: {0}")]
    Reflect(#[from] syn::Error),

    /// Scaffold attributes on a struct are malformed.
    #[error("invalid scaffold attribute: {0}")]
    Attribute(#[from] darling::Error),

    /// A declared type spelling is not a valid Rust type.
    #[error("`{spelling}` is not a valid type")]
    InvalidTypeSpelling {
        /// Offending spelling.
        spelling: String
    },

    /// A configured or derived module path is not a valid Rust path.
    #[error("`{path}` is not a valid path")]
    InvalidPath {
        /// Offending path.
        path: String
    },

    /// Template rendering failed.
    #[error("template rendering failed: {0}")]
    Render(#[from] minijinja::Error),

    /// Configuration file is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// File system access failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path:   PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error
    },

    /// More than one class qualifies as business service of a controller.
    #[error("controller `{controller}` has several business services: {}", .candidates.join(", "))]
    AmbiguousBusinessService {
        /// Controller group name.
        controller: String,
        /// Qualifying service classes.
        candidates: Vec<String>
    }
}

impl ScaffoldError {
    /// Create an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source
        }
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note.
    Note,
    /// Something was skipped or guessed.
    Warning,
    /// An artifact could not be produced.
    Error
}

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    /// Relation target missing from the entity graph.
    MissingRelationTarget,
    /// Property carries several relationship markers.
    ConflictingRelationshipMarkers,
    /// No control kind could be derived for a property.
    UnresolvedControl,
    /// Several business services qualify for one controller.
    AmbiguousBusinessService,
    /// An artifact failed to render.
    RenderFailed
}

impl DiagnosticCode {
    /// Kebab-case code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRelationTarget => "missing-relation-target",
            Self::ConflictingRelationshipMarkers => "conflicting-relationship-markers",
            Self::UnresolvedControl => "unresolved-control",
            Self::AmbiguousBusinessService => "ambiguous-business-service",
            Self::RenderFailed => "render-failed"
        }
    }
}

/// Non-fatal problem found during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Stable code.
    pub code:     DiagnosticCode,
    /// Entity or controller the problem belongs to.
    pub entity:   String,
    /// Property, when the problem is property-scoped.
    pub property: Option<String>,
    /// Human readable description.
    pub message:  String
}

impl Diagnostic {
    /// Create a warning.
    pub fn warning(code: DiagnosticCode, entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            entity: entity.into(),
            property: None,
            message: message.into()
        }
    }

    /// Create a note.
    pub fn note(code: DiagnosticCode, entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            ..Self::warning(code, entity, message)
        }
    }

    /// Create an error-level diagnostic.
    pub fn error(code: DiagnosticCode, entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(code, entity, message)
        }
    }

    /// Attach the property the diagnostic is about.
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Convert a fatal error into a diagnostic for the given scope.
    pub fn from_error(entity: impl Into<String>, error: &ScaffoldError) -> Self {
        match error {
            ScaffoldError::MissingRelationTarget {
                entity,
                property,
                ..
            } => Self::warning(DiagnosticCode::MissingRelationTarget, entity.clone(), error.to_string())
                .with_property(property.clone()),
            ScaffoldError::AmbiguousBusinessService {
                controller, ..
            } => Self::warning(
                DiagnosticCode::AmbiguousBusinessService,
                controller.clone(),
                error.to_string()
            ),
            _ => Self::error(DiagnosticCode::RenderFailed, entity, error.to_string())
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error"
        };
        match &self.property {
            Some(property) => write!(
                f,
                "{severity}[{}] {}.{property}: {}",
                self.code.as_str(),
                self.entity,
                self.message
            ),
            None => write!(f, "{severity}[{}] {}: {}", self.code.as_str(), self.entity, self.message)
        }
    }
}
