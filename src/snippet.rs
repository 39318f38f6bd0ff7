//! Sentinel-guarded insertion of a fixed stylesheet snippet.

use crate::document::{line_start, Document, Patched, Span};
use crate::edit::Edit;
use crate::errors::StructureError;
use crate::palette::{CommaStyle, Palette, SNIPPET_COLOR_NAMES};

/// Comment that opens the skin's built-in "Metro White" reference block.
pub const METRO_WHITE_MARKER: &str = "/* Metro White:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Present anywhere in the document means the snippet is already applied.
    pub sentinel: String,
    /// The snippet goes directly above the line holding this text.
    pub marker: String,
    /// `\n`-separated snippet text, ending in a line break.
    pub text: String,
}

impl Snippet {
    /// Reference comment listing the palette's headline colors.
    pub fn from_palette(palette: &Palette) -> Self {
        let sentinel = palette.sentinel();
        let mut text = format!("/* {sentinel}:\n\n");
        for name in SNIPPET_COLOR_NAMES {
            if let Some(value) = palette.color(name) {
                text.push_str(&format!("--{name}: {};\n", CommaStyle::Spaced.apply(value)));
            }
        }
        text.push_str("\n*/\n");

        Self {
            sentinel,
            marker: METRO_WHITE_MARKER.to_string(),
            text,
        }
    }
}

/// Insert `snippet` into `doc` unless its sentinel is already there.
///
/// With the marker present the snippet plus one line break goes in front of
/// the marker's line. Otherwise trailing whitespace is trimmed and the
/// snippet is appended after exactly one blank line. An empty or
/// whitespace-only document has nothing to separate from, so it is replaced
/// by the snippet alone with no leading blank lines.
pub fn insert_snippet(doc: &Document, snippet: &Snippet) -> Result<Patched, StructureError> {
    let text = doc.as_str();
    if text.contains(&snippet.sentinel) {
        return Ok(Patched::unchanged(doc));
    }

    let nl = doc.newline();
    let body = doc.line_ending().convert(&snippet.text);

    let edit = match text.find(&snippet.marker) {
        Some(idx) => Edit::insert(line_start(text, idx), format!("{body}{nl}")),
        None => {
            let trimmed = text.trim_end().len();
            let tail = Span::new(trimmed, text.len());
            let separator = if trimmed == 0 {
                String::new()
            } else {
                format!("{nl}{nl}")
            };
            Edit::replace(doc, tail, format!("{separator}{body}{nl}"))
        }
    };

    Ok(edit.apply(doc)?)
}
