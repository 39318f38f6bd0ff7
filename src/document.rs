use std::fmt;
use std::ops::Range;

/// Line-ending style of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the style from the first line break in `text`.
    ///
    /// Text without any line break is treated as `\n`.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Rewrite `\n`-separated text into this line-ending style.
    pub fn convert(self, text: &str) -> String {
        match self {
            LineEnding::Lf => text.to_string(),
            LineEnding::CrLf => text.replace("\r\n", "\n").replace('\n', "\r\n"),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Lf => write!(f, "LF"),
            LineEnding::CrLf => write!(f, "CRLF"),
        }
    }
}

/// Half-open byte range `[start, end)` into a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted span [{start}, {end})");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Shift a span found inside `self` (relative offsets) to absolute offsets.
    pub fn offset(&self, inner: Span) -> Span {
        Span::new(self.start + inner.start, self.start + inner.end)
    }
}

/// Full contents of one file plus its detected line-ending style.
///
/// Documents are never mutated in place: patchers hand back a new
/// `Document` through [`Patched`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    line_ending: LineEnding,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_ending = LineEnding::detect(&text);
        Self { text, line_ending }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn newline(&self) -> &'static str {
        self.line_ending.as_str()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.range()]
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Keep the detected style of the original when the text changes.
    pub(crate) fn with_text(&self, text: String) -> Self {
        Self {
            text,
            line_ending: self.line_ending,
        }
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Document::new(text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Document::new(text)
    }
}

/// Output of a patcher: the resulting document and whether it differs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Patched carries the new document; dropping it discards the change"]
pub struct Patched {
    pub document: Document,
    pub changed: bool,
}

impl Patched {
    pub fn unchanged(document: &Document) -> Self {
        Self {
            document: document.clone(),
            changed: false,
        }
    }

    pub fn changed(document: Document) -> Self {
        Self {
            document,
            changed: true,
        }
    }
}

/// Start of the line containing `pos`.
pub(crate) fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |idx| idx + 1)
}
