// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Template layer of the UI assembler.
//!
//! The [`UiArtifact`] is serialized straight into a minijinja template; the
//! only logic living here is the control-kind to widget-tag table exposed as
//! the `control_tag` filter.
//!
//! | Control kind | Tag |
//! |--------------|-----|
//! | `Integer`, `Decimal` | `spider-number` |
//! | `Table` | `spider-data-table` |
//! | `Unresolved` | `TODO` |
//! | any other | `spider-{lowercased kind}` |

use minijinja::{AutoEscape, Environment};

use super::UiArtifact;
use crate::{classify::ControlKind, error::Result};

const TEMPLATE_NAME: &str = "base_details.ts";
const TEMPLATE: &str = include_str!("../../templates/base_details.ts.jinja");

/// Widget tag of a control kind.
#[must_use]
pub fn control_tag(kind: ControlKind) -> &'static str {
    match kind {
        ControlKind::TextBox => "spider-textbox",
        ControlKind::TextArea => "spider-textarea",
        ControlKind::Editor => "spider-editor",
        ControlKind::Integer | ControlKind::Decimal => "spider-number",
        ControlKind::Calendar => "spider-calendar",
        ControlKind::CheckBox => "spider-checkbox",
        ControlKind::ColorPick => "spider-colorpick",
        ControlKind::Dropdown => "spider-dropdown",
        ControlKind::Autocomplete => "spider-autocomplete",
        ControlKind::MultiSelect => "spider-multiselect",
        ControlKind::MultiAutocomplete => "spider-multiautocomplete",
        ControlKind::File => "spider-file",
        ControlKind::Table => "spider-data-table",
        ControlKind::Password => "spider-password",
        ControlKind::TextBlock => "spider-textblock",
        ControlKind::Unresolved => "TODO"
    }
}

/// Filter form of [`control_tag`] over the serialized kind name.
fn control_tag_filter(kind: &str) -> String {
    control_tag(ControlKind::parse(kind)).to_string()
}

/// Template environment with the base-details template registered.
///
/// # Errors
///
/// Returns [`ScaffoldError::Render`](crate::error::ScaffoldError::Render)
/// if the template fails to compile.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("control_tag", control_tag_filter);
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    Ok(env)
}

/// Render a component artifact with a prepared environment.
///
/// # Errors
///
/// Returns [`ScaffoldError::Render`](crate::error::ScaffoldError::Render)
/// when rendering fails.
pub fn render_with(env: &Environment<'_>, artifact: &UiArtifact) -> Result<String> {
    Ok(env.get_template(TEMPLATE_NAME)?.render(artifact)?)
}

/// Render a component artifact.
///
/// # Errors
///
/// Returns [`ScaffoldError::Render`](crate::error::ScaffoldError::Render)
/// when the template fails to compile or render.
pub fn render(artifact: &UiArtifact) -> Result<String> {
    render_with(&environment()?, artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_controls_share_a_tag() {
        assert_eq!(control_tag(ControlKind::Integer), "spider-number");
        assert_eq!(control_tag(ControlKind::Decimal), "spider-number");
    }

    #[test]
    fn unresolved_renders_todo() {
        assert_eq!(control_tag(ControlKind::Unresolved), "TODO");
        assert_eq!(control_tag_filter("Unresolved"), "TODO");
        assert_eq!(control_tag_filter("Slider"), "TODO");
    }

    #[test]
    fn filter_reads_serialized_names() {
        assert_eq!(control_tag_filter("MultiAutocomplete"), "spider-multiautocomplete");
        assert_eq!(control_tag_filter("Table"), "spider-data-table");
    }

    #[test]
    fn template_compiles() {
        assert!(environment().is_ok());
    }
}
