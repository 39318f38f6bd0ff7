//! Block locator: finds delimited regions in CSS and JSON text.
//!
//! Both locators match the *first* occurrence of their header only and
//! report absence as `None`. Whether absence is fatal is the caller's call.

use crate::document::{line_start, Document, Span};
use crate::errors::StructureError;
use regex::Regex;

/// A located CSS rule such as `:root { ... }` or `.friendlist { ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssBlock {
    /// From the start of the header line through the opening `{`.
    pub header: Span,
    /// Bytes strictly between `{` and the closing line.
    ///
    /// When the closing `}` sits alone on its line (leading whitespace
    /// allowed) the interior ends at the start of that line, so appended
    /// lines land above the brace. Otherwise it ends right before `}`.
    pub interior: Span,
    /// Byte offset of the closing `}`.
    pub close: usize,
}

/// A located JSON member whose value is an object: `"Key": { ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonObject {
    /// Start of the line holding the key.
    pub line_start: usize,
    /// Byte offset of the opening quote of the key.
    pub key_start: usize,
    /// Byte offset of the opening `{`.
    pub open: usize,
    /// Byte offset of the matching `}`.
    pub close: usize,
}

impl JsonObject {
    /// Bytes strictly between the braces.
    pub fn interior(&self) -> Span {
        Span::new(self.open + 1, self.close)
    }

    /// From the key's opening quote through the closing brace.
    pub fn member(&self) -> Span {
        Span::new(self.key_start, self.close + 1)
    }

    /// Leading whitespace of the key's line.
    pub fn indent<'a>(&self, doc: &'a Document) -> &'a str {
        let line = doc.slice(Span::new(self.line_start, self.key_start));
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    /// The key follows other content on its line, e.g. `}, "Key": {`.
    pub fn is_inline(&self, doc: &Document) -> bool {
        self.indent(doc).len() < self.key_start - self.line_start
    }
}

/// Locate the first rule whose line-anchored header is `selector {`.
///
/// The header must start its line (after optional indentation). Braces are
/// balanced with a depth counter; `/* ... */` comments are skipped. A rule
/// that is never closed counts as absent.
pub fn css_block(doc: &Document, selector: &str) -> Result<Option<CssBlock>, StructureError> {
    let pattern = format!(r"(?m)^[ \t]*{}\s*\{{", regex::escape(selector));
    let header_re = compile(&pattern)?;
    let text = doc.as_str();

    let Some(header) = header_re.find(text) else {
        return Ok(None);
    };
    let open = header.end() - 1;

    let Some(close) = matching_css_brace(text, open) else {
        log::debug!("css rule `{selector}` is never closed");
        return Ok(None);
    };

    let close_line = line_start(text, close);
    let interior_end = if close_line > open && text[close_line..close].trim().is_empty() {
        close_line
    } else {
        close
    };

    Ok(Some(CssBlock {
        header: Span::new(header.start(), header.end()),
        interior: Span::new(open + 1, interior_end),
        close,
    }))
}

/// Locate the first `"key": {` member whose key lies within `within`.
///
/// Keys are matched as whole string literals anywhere on a line; string
/// values (`"default": "key"`) never match. Returns `Err` when the key
/// holds something other than an object, or the object is never closed.
pub fn json_object(
    doc: &Document,
    key: &str,
    within: Span,
) -> Result<Option<JsonObject>, StructureError> {
    let text = doc.as_str();
    let bytes = text.as_bytes();
    let wanted = serde_json::Value::String(key.to_string()).to_string();

    let mut i = within.start;
    while i < within.end {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }
        let Some(end) = json_string_end(bytes, i) else {
            return Ok(None);
        };
        let colon = skip_blanks(bytes, end + 1);
        if &text[i..=end] == wanted && bytes.get(colon) == Some(&b':') {
            let open = skip_blanks(bytes, colon + 1);
            if bytes.get(open) != Some(&b'{') {
                return Err(StructureError::missing(format!("object value for \"{key}\"")));
            }
            let close = matching_json_brace(text, open)
                .ok_or_else(|| StructureError::unterminated(format!("\"{key}\" object")))?;
            return Ok(Some(JsonObject {
                line_start: line_start(text, i),
                key_start: i,
                open,
                close,
            }));
        }
        i = end + 1;
    }
    Ok(None)
}

/// Index of the quote closing the string literal opened at `open`.
fn json_string_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut escaped = false;
    for (i, &byte) in bytes.iter().enumerate().skip(open + 1) {
        match byte {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn skip_blanks(bytes: &[u8], from: usize) -> usize {
    from + bytes[from.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count()
}

/// Depth counter over a CSS rule body: +1 per `{`, -1 per `}`.
///
/// Braces inside comments and `"..."`/`'...'` strings do not count.
fn matching_css_brace(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                // Comment: jump past the terminator, or give up if it never ends.
                i = text[i + 2..].find("*/").map(|end| i + 2 + end + 2)?;
                continue;
            }
            quote @ (b'"' | b'\'') => {
                i = css_string_end(bytes, i, quote)? + 1;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the `quote` closing the CSS string opened at `open`. A string
/// may not span lines unless the break is escaped.
fn css_string_end(bytes: &[u8], open: usize, quote: u8) -> Option<usize> {
    let mut escaped = false;
    for (i, &byte) in bytes.iter().enumerate().skip(open + 1) {
        match byte {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'\n' => return None,
            _ if byte == quote => return Some(i),
            _ => {}
        }
    }
    None
}

/// Depth counter over a JSON value: braces inside string literals are ignored.
fn matching_json_brace(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &byte) in bytes.iter().enumerate().skip(open) {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, StructureError> {
    Regex::new(pattern).map_err(|err| StructureError::missing(format!("valid pattern ({err})")))
}
