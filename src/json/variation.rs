//! Raw-text upsert of a theme variation object.
//!
//! `theme.json` is edited as text, never parsed and re-serialized, so every
//! byte outside the variation member survives untouched. The member itself
//! is written in a fixed canonical layout so re-runs are byte-identical.

use crate::document::{Document, Patched, Span};
use crate::edit::Edit;
use crate::errors::StructureError;
use crate::locator::{json_object, JsonObject};
use crate::palette::{Palette, COLOR_NAMES};
use serde_json::Value;

/// Indentation of entries relative to the variation key.
const ENTRY_INDENT: &str = "    ";

/// One `"--name": ["value", "scope"]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationEntry {
    pub variable: String,
    pub value: String,
    pub scope: String,
}

/// Named, ordered mapping of CSS variable to `[value, scope]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationObject {
    pub name: String,
    pub entries: Vec<VariationEntry>,
}

impl VariationObject {
    /// All palette colors, compact-formatted, in [`COLOR_NAMES`] order.
    pub fn from_palette(palette: &Palette) -> Self {
        let entries = COLOR_NAMES
            .iter()
            .filter_map(|name| {
                palette.color(name).map(|value| VariationEntry {
                    variable: format!("--{name}"),
                    value: crate::palette::CommaStyle::Compact.apply(value),
                    scope: palette.scope.clone(),
                })
            })
            .collect();
        Self {
            name: palette.name.clone(),
            entries,
        }
    }

    /// Canonical text of the member, each line prefixed with `indent`,
    /// without a trailing comma or line break.
    pub fn render(&self, indent: &str, newline: &str) -> String {
        let mut lines = Vec::with_capacity(self.entries.len() + 2);
        lines.push(format!("{indent}{}: {{", quote(&self.name)));
        for (idx, entry) in self.entries.iter().enumerate() {
            let separator = if idx + 1 < self.entries.len() { "," } else { "" };
            lines.push(format!(
                "{indent}{ENTRY_INDENT}{}: [{}, {}]{separator}",
                quote(&entry.variable),
                quote(&entry.value),
                quote(&entry.scope),
            ));
        }
        lines.push(format!("{indent}}}"));
        lines.join(newline)
    }
}

fn quote(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// Insert or replace `variation` inside the `root_key` object of `doc`.
///
/// * `root_key` (the `"Variation"` patch) must exist.
/// * An existing member named like the variation is replaced in place,
///   wherever on its line the key sits; whatever follows its closing brace
///   (comma or not) is left alone.
/// * Otherwise the member is inserted right after the `anchor` sibling,
///   indented like it, adding the comma the new neighbour needs.
pub fn upsert_variation(
    doc: &Document,
    root_key: &str,
    anchor: &str,
    variation: &VariationObject,
) -> Result<Patched, StructureError> {
    let whole = Span::new(0, doc.len());
    let root = json_object(doc, root_key, whole)?
        .ok_or_else(|| StructureError::missing(format!("\"{root_key}\" key")))?;
    let scope = root.interior();
    let nl = doc.newline();

    let edit = match json_object(doc, &variation.name, scope)? {
        Some(existing) => {
            let indent = existing.indent(doc);
            let rendered = variation.render(indent, nl);
            let (span, rendered) = if existing.is_inline(doc) {
                // Keep whatever precedes the key on its line.
                let span = Span::new(existing.key_start, existing.close + 1);
                (span, rendered[indent.len()..].to_string())
            } else {
                (Span::new(existing.line_start, existing.close + 1), rendered)
            };
            if doc.slice(span) == rendered {
                return Ok(Patched::unchanged(doc));
            }
            Edit::replace(doc, span, rendered)
        }
        None => {
            let sibling = json_object(doc, anchor, scope)?
                .ok_or_else(|| StructureError::missing(format!("\"{anchor}\" variation")))?;
            insert_after(doc, &sibling, variation)
        }
    };

    let patched = edit.apply(doc)?;
    ensure_valid(patched.document.as_str()).map_err(|message| StructureError::InvalidJson {
        message: format!("after inserting \"{}\": {message}", variation.name),
    })?;
    Ok(patched)
}

fn insert_after(doc: &Document, sibling: &JsonObject, variation: &VariationObject) -> Edit {
    let text = doc.as_str();
    let nl = doc.newline();
    let rendered = variation.render(sibling.indent(doc), nl);

    let after_brace = sibling.close + 1;
    let comma = after_brace
        + text[after_brace..]
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();

    if text[comma..].starts_with(',') {
        // Followed by another member: slot in on the next line.
        let after_comma = comma + 1;
        if text[after_comma..].starts_with(nl) {
            Edit::insert(after_comma + nl.len(), format!("{rendered},{nl}"))
        } else {
            Edit::insert(after_comma, format!("{nl}{rendered},"))
        }
    } else {
        // Last member: it needs a comma now.
        Edit::insert(after_brace, format!(",{nl}{rendered}"))
    }
}

/// Check that `text` parses as JSON, returning the parser message if not.
pub fn ensure_valid(text: &str) -> Result<(), String> {
    serde_json::from_str::<Value>(text)
        .map(|_| ())
        .map_err(|err| err.to_string())
}
