//! Property rewriter for CSS rule bodies.
//!
//! Patterns are line-anchored and require `:` (after optional blanks)
//! right after the full property name, so `--white` never matches
//! `--white05` and `border` never matches `border-right`.

use crate::document::{Document, Span};
use crate::edit::Edit;
use crate::errors::StructureError;
use crate::locator::{compile, CssBlock};
use std::sync::OnceLock;

/// Indentation used for appended property lines.
pub const CANONICAL_INDENT: &str = "    ";

/// Which kind of declaration a [`PropertyEdit`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `--name: value;` custom property. Rewritten in place only; a custom
    /// property the block does not define is skipped.
    Custom,
    /// `name: value;` declaration. Appended when missing.
    Plain,
}

/// Desired value of one property. Values are opaque strings; any
/// `!important` is part of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEdit {
    pub name: String,
    pub value: String,
}

impl PropertyEdit {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Planned changes to one rule body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePlan {
    pub edits: Vec<Edit>,
    /// Property names whose value actually changes (or that get appended).
    pub changed: Vec<String>,
}

impl RewritePlan {
    pub fn is_noop(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Plan rewrites of `properties` inside `block`.
///
/// Each entry rewrites the value of its first matching line, keeping the
/// indentation, name, separator and trailing semicolon. Missing
/// [`PropertyKind::Plain`] entries are appended as one
/// `CANONICAL_INDENT name: value;` line each at the end of the body.
pub fn plan_rewrite(
    doc: &Document,
    block: &CssBlock,
    kind: PropertyKind,
    properties: &[PropertyEdit],
) -> Result<RewritePlan, StructureError> {
    let interior = doc.slice(block.interior);
    let mut edits = Vec::new();
    let mut changed = Vec::new();
    let mut appended = String::new();

    for property in properties {
        if changed.contains(&property.name) {
            continue;
        }

        match find_value(interior, kind, &property.name)? {
            Some(value_span) => {
                let current = &interior[value_span.range()];
                if current == property.value {
                    continue;
                }
                edits.push(Edit::replace(
                    doc,
                    block.interior.offset(value_span),
                    property.value.clone(),
                ));
                changed.push(property.name.clone());
            }
            None if kind == PropertyKind::Plain => {
                appended.push_str(&format!(
                    "{CANONICAL_INDENT}{}: {};{}",
                    property.name,
                    property.value,
                    doc.newline()
                ));
                changed.push(property.name.clone());
            }
            None => log::debug!("custom property --{} not defined; skipped", property.name),
        }
    }

    if !appended.is_empty() {
        if !interior.is_empty() && !interior.ends_with('\n') {
            appended.insert_str(0, doc.newline());
        }
        edits.push(Edit::insert(block.interior.end, appended));
    }

    Ok(RewritePlan { edits, changed })
}

/// Span of the value portion of the first declaration of `name`,
/// relative to `interior`.
fn find_value(
    interior: &str,
    kind: PropertyKind,
    name: &str,
) -> Result<Option<Span>, StructureError> {
    let pattern = match kind {
        // ^\s*--name\s*:\s*<value>;?
        PropertyKind::Custom => format!(
            r"(?m)^[ \t]*--{}[ \t]*:[ \t]*([^;\r\n]*)",
            regex::escape(name)
        ),
        // ^\s*name\s*:\s*<value>;
        PropertyKind::Plain => format!(
            r"(?m)^[ \t]*{}[ \t]*:[ \t]*([^;\r\n]*);",
            regex::escape(name)
        ),
    };
    let re = compile(&pattern)?;
    Ok(re
        .captures(interior)
        .and_then(|caps| caps.get(1))
        .map(|value| Span::new(value.start(), value.end())))
}

/// Plan normalizing the first `background: rgb(...);` line of `block` to
/// `background: <value>;`.
///
/// Only `rgb(...)` backgrounds qualify; one level of nested parentheses is
/// allowed so an already normalized `rgb(var(--x))` line is recognized.
pub fn plan_background(doc: &Document, block: &CssBlock, value: &str) -> Option<Edit> {
    static BACKGROUND: OnceLock<Option<regex::Regex>> = OnceLock::new();
    let re = BACKGROUND
        .get_or_init(|| {
            regex::Regex::new(
                r"(?m)^[ \t]*background[ \t]*:[ \t]*(rgb\((?:[^()\r\n]|\([^()\r\n]*\))*\))[ \t]*;",
            )
            .ok()
        })
        .as_ref()?;

    let interior = doc.slice(block.interior);
    let current = re.captures(interior)?.get(1)?;
    if current.as_str() == value {
        return None;
    }
    let span = block
        .interior
        .offset(Span::new(current.start(), current.end()));
    Some(Edit::replace(doc, span, value))
}
