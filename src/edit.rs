use crate::document::{Document, Patched, Span};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The fundamental edit primitive: byte-span replacement with verification.
///
/// Every patcher in this crate locates a span and compiles its change down to
/// one or more `Edit`s. Intelligence lives in span acquisition, not application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until applied to a document"]
pub struct Edit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
    /// Verification of what we expect to find before applying
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (faster for large spans)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => xxh3_64(text.as_bytes()) == *expected_hash,
        }
    }

    /// Create verification from text, using hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("before-text verification failed at byte {byte_start}")]
    BeforeTextMismatch {
        byte_start: usize,
        byte_end: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range: [{byte_start}, {byte_end}) in document of length {doc_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        doc_len: usize,
    },

    #[error("byte range [{byte_start}, {byte_end}) splits a UTF-8 character")]
    NotCharBoundary { byte_start: usize, byte_end: usize },

    #[error("overlapping edits at [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    Overlap {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult should be checked for applied/already-applied"]
pub enum EditResult {
    /// Edit was applied
    Applied { bytes_changed: usize },
    /// Edit was already applied (current text matches new_text)
    AlreadyApplied,
}

impl Edit {
    /// Create a new edit with automatic verification generation.
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl AsRef<str>,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(expected_before.as_ref()),
        }
    }

    /// Replace the text currently at `span` in `doc`.
    pub fn replace(doc: &Document, span: Span, new_text: impl Into<String>) -> Self {
        Self::new(span.start, span.end, new_text, doc.slice(span))
    }

    /// Insert text at `at` without removing anything.
    pub fn insert(at: usize, new_text: impl Into<String>) -> Self {
        Self::new(at, at, new_text, "")
    }

    pub fn span(&self) -> Span {
        Span::new(self.byte_start, self.byte_end)
    }

    /// Validate the edit against the current contents.
    ///
    /// Returns the current text at [byte_start, byte_end) if validation succeeds.
    fn validate<'a>(&self, content: &'a str) -> Result<&'a str, EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                doc_len: content.len(),
            });
        }

        let current = content
            .get(self.byte_start..self.byte_end)
            .ok_or(EditError::NotCharBoundary {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
            })?;

        // Check if already applied (idempotency)
        if current == self.new_text {
            return Ok(current);
        }

        if !self.expected_before.matches(current) {
            return Err(EditError::BeforeTextMismatch {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                expected: format!("{:?}", self.expected_before),
                found: current.to_string(),
            });
        }

        Ok(current)
    }

    /// Apply this edit to a document, producing a new one.
    pub fn apply_to(&self, doc: &Document) -> Result<(Document, EditResult), EditError> {
        let content = doc.as_str();
        let current = self.validate(content)?;

        if current == self.new_text {
            return Ok((doc.clone(), EditResult::AlreadyApplied));
        }

        let mut new_content = String::with_capacity(
            content.len() + self.new_text.len() - (self.byte_end - self.byte_start),
        );
        new_content.push_str(&content[..self.byte_start]);
        new_content.push_str(&self.new_text);
        new_content.push_str(&content[self.byte_end..]);

        Ok((
            doc.with_text(new_content),
            EditResult::Applied {
                bytes_changed: self.new_text.len(),
            },
        ))
    }

    /// Apply this edit alone, reporting whether the document changed.
    pub fn apply(&self, doc: &Document) -> Result<Patched, EditError> {
        match self.apply_to(doc)? {
            (document, EditResult::Applied { .. }) => Ok(Patched::changed(document)),
            (_, EditResult::AlreadyApplied) => Ok(Patched::unchanged(doc)),
        }
    }

    /// Apply several non-overlapping edits to one document.
    ///
    /// Edits are sorted by byte_start descending and applied bottom-to-top
    /// to avoid offset invalidation. All edits are validated against the
    /// original content before any is applied.
    pub fn apply_batch(doc: &Document, mut edits: Vec<Edit>) -> Result<Patched, EditError> {
        if edits.is_empty() {
            return Ok(Patched::unchanged(doc));
        }

        edits.sort_by(|a, b| b.byte_start.cmp(&a.byte_start));

        for edit in &edits {
            edit.validate(doc.as_str())?;
        }

        // For non-overlapping regions: earlier edit's end <= later edit's start
        for window in edits.windows(2) {
            let (later, earlier) = (&window[0], &window[1]);
            if earlier.byte_end > later.byte_start {
                return Err(EditError::Overlap {
                    first_start: earlier.byte_start,
                    first_end: earlier.byte_end,
                    second_start: later.byte_start,
                    second_end: later.byte_end,
                });
            }
        }

        let mut content = doc.as_str().to_string();
        let mut changed = false;
        for edit in &edits {
            if content[edit.byte_start..edit.byte_end] == edit.new_text {
                continue;
            }
            content.replace_range(edit.byte_start..edit.byte_end, &edit.new_text);
            changed = true;
        }

        if changed {
            Ok(Patched::changed(doc.with_text(content)))
        } else {
            Ok(Patched::unchanged(doc))
        }
    }
}
