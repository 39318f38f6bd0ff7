//! Patch run over a skin directory.
//!
//! This module ties the patchers together:
//! - Verifies every mandatory target file exists before touching anything
//! - Runs each file through its fixed patch pipeline in memory
//! - Persists a file only when its content changed, after an optional backup
//! - Reports a per-file verdict for preview or summary output
//!
//! Files are processed one at a time. A fatal error on a later file leaves
//! earlier files already written.

use crate::css::{self, PropertyEdit};
use crate::document::Document;
use crate::errors::{PatchError, StructureError};
use crate::json::{self, VariationObject};
use crate::palette::{CommaStyle, ConfigError, Palette};
use crate::persist::{atomic_write, backup_file, BACKUP_DIR_NAME};
use crate::snippet::{insert_snippet, Snippet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the theme patch holding all color variations.
pub const VARIATION_KEY: &str = "Variation";

/// Value the `webkit.css` body background is pointed at.
pub const BODY_BACKGROUND: &str = "rgb(var(--clientBG))";

/// Variable the palette comment is anchored to.
pub const COMMENT_ANCHOR: &str = "focus";

/// What a target file is and which pipeline it goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    LibraryRoot,
    Friends,
    Notifications,
    Webkit,
    Theme,
    Custom,
}

impl TargetKind {
    fn comma_style(self) -> Option<CommaStyle> {
        match self {
            TargetKind::LibraryRoot | TargetKind::Webkit => Some(CommaStyle::Compact),
            TargetKind::Friends | TargetKind::Notifications => Some(CommaStyle::Spaced),
            TargetKind::Theme | TargetKind::Custom => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub file_name: &'static str,
    pub required: bool,
    pub kind: TargetKind,
}

/// Every file the patcher knows about, in processing order.
pub const TARGETS: [Target; 6] = [
    Target {
        file_name: "libraryroot.custom.css",
        required: true,
        kind: TargetKind::LibraryRoot,
    },
    Target {
        file_name: "friends.custom.css",
        required: true,
        kind: TargetKind::Friends,
    },
    Target {
        file_name: "notifications.custom.css",
        required: true,
        kind: TargetKind::Notifications,
    },
    Target {
        file_name: "webkit.css",
        required: true,
        kind: TargetKind::Webkit,
    },
    Target {
        file_name: "theme.json",
        required: true,
        kind: TargetKind::Theme,
    },
    Target {
        file_name: "custom.css",
        required: false,
        kind: TargetKind::Custom,
    },
];

fn friends_borders(open_side: &str) -> Vec<PropertyEdit> {
    vec![
        PropertyEdit::new("box-sizing", "border-box !important"),
        PropertyEdit::new("border", "1px solid rgb(var(--frameBorder)) !important"),
        PropertyEdit::new(format!("border-{open_side}"), "none !important"),
    ]
}

/// Options of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute and report, never write.
    pub dry_run: bool,
    /// Copy each file into the backup directory before overwriting it.
    pub backup: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Content differs from the original (written unless dry run)
    Changed,
    /// Already patched
    Unchanged,
    /// Optional file absent
    Skipped,
}

/// Verdict for one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub original: String,
    pub patched: String,
    /// Root variables whose value changed (CSS targets only).
    pub changed_variables: Vec<String>,
    pub backup: Option<PathBuf>,
}

impl FileReport {
    pub fn before_len(&self) -> usize {
        self.original.len()
    }

    pub fn after_len(&self) -> usize {
        self.patched.len()
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            FileStatus::Changed => write!(
                f,
                "{}: {} -> {} bytes",
                self.path.display(),
                self.before_len(),
                self.after_len()
            ),
            FileStatus::Unchanged => write!(f, "{}: already patched", self.path.display()),
            FileStatus::Skipped => write!(f, "{}: not present, skipped", self.path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RunReport should be checked for changed files"]
pub struct RunReport {
    pub dry_run: bool,
    pub backup_dir: Option<PathBuf>,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn changed_any(&self) -> bool {
        self.files.iter().any(|f| f.status == FileStatus::Changed)
    }

    pub fn changed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Changed)
    }
}

/// Result of running one document through its pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub document: Document,
    pub changed_variables: Vec<String>,
}

/// Applies one palette to a skin directory.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    root: PathBuf,
    palette: Palette,
    variation: VariationObject,
    snippet: Snippet,
}

impl Orchestrator {
    /// The palette is validated here so every later step can rely on it.
    pub fn new(root: impl Into<PathBuf>, palette: Palette) -> Result<Self, PatchError> {
        palette
            .validate()
            .map_err(|source| ConfigError::invalid(&palette, None, source))?;
        Ok(Self {
            root: root.into(),
            variation: VariationObject::from_palette(&palette),
            snippet: Snippet::from_palette(&palette),
            palette,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR_NAME)
    }

    /// Fail with [`PatchError::MissingFile`] for the first absent mandatory file.
    pub fn check_files(&self) -> Result<(), PatchError> {
        for target in TARGETS.iter().filter(|t| t.required) {
            let path = self.root.join(target.file_name);
            if !path.is_file() {
                return Err(PatchError::MissingFile { path });
            }
        }
        Ok(())
    }

    /// Run `doc` through the pipeline of `kind`. Pure: no I/O.
    pub fn patch_document(
        &self,
        kind: TargetKind,
        doc: &Document,
    ) -> Result<PipelineOutput, StructureError> {
        if let Some(style) = kind.comma_style() {
            return self.patch_stylesheet(kind, style, doc);
        }

        let document = match kind {
            TargetKind::Theme => {
                json::ensure_valid(doc.as_str())
                    .map_err(|message| StructureError::InvalidJson { message })?;
                json::upsert_variation(
                    doc,
                    VARIATION_KEY,
                    &self.palette.anchor,
                    &self.variation,
                )?
                .document
            }
            _ => insert_snippet(doc, &self.snippet)?.document,
        };

        Ok(PipelineOutput {
            document,
            changed_variables: Vec::new(),
        })
    }

    fn patch_stylesheet(
        &self,
        kind: TargetKind,
        style: CommaStyle,
        doc: &Document,
    ) -> Result<PipelineOutput, StructureError> {
        let values: Vec<PropertyEdit> = self
            .palette
            .root_values(style, kind == TargetKind::LibraryRoot)
            .into_iter()
            .map(|(name, value)| PropertyEdit::new(name, value))
            .collect();

        let (patched, changed_variables) = css::patch_root_variables(doc, &values)?;
        log::debug!("root variables changed: {changed_variables:?}");

        let mut document =
            css::ensure_root_comment(&patched.document, COMMENT_ANCHOR, &self.palette.comment)?
                .document;

        match kind {
            TargetKind::Webkit => {
                document = css::normalize_body_background(&document, BODY_BACKGROUND)?.document;
            }
            TargetKind::Friends => {
                for (selector, open_side) in [(".friendlist", "right"), (".chatDialogs", "left")] {
                    document = css::ensure_selector_properties(
                        &document,
                        selector,
                        &friends_borders(open_side),
                    )?
                    .document;
                }
            }
            _ => {}
        }

        Ok(PipelineOutput {
            document,
            changed_variables,
        })
    }

    /// Patch every target file.
    ///
    /// Mandatory files are checked up front, so a missing one aborts before
    /// any write. Later structural errors abort the run at that file.
    pub fn run(&self, options: RunOptions) -> Result<RunReport, PatchError> {
        self.check_files()?;

        let backup_dir = self.backup_dir();
        let mut files = Vec::with_capacity(TARGETS.len());

        for target in &TARGETS {
            let path = self.root.join(target.file_name);
            if !target.required && !path.is_file() {
                log::debug!("optional {} absent", target.file_name);
                files.push(FileReport {
                    path,
                    status: FileStatus::Skipped,
                    original: String::new(),
                    patched: String::new(),
                    changed_variables: Vec::new(),
                    backup: None,
                });
                continue;
            }

            let original = fs::read_to_string(&path).map_err(|e| PatchError::io(&path, e))?;
            let output = self
                .patch_document(target.kind, &Document::new(original.as_str()))
                .map_err(|err| PatchError::structure(&path, err))?;
            let patched = output.document.into_string();

            let status = if patched == original {
                FileStatus::Unchanged
            } else {
                FileStatus::Changed
            };

            let mut backup = None;
            if status == FileStatus::Changed && !options.dry_run {
                if options.backup {
                    backup = Some(backup_file(&path, &backup_dir)?);
                }
                atomic_write(&path, patched.as_bytes())?;
                log::info!("wrote {}", path.display());
            }

            files.push(FileReport {
                path,
                status,
                original,
                patched,
                changed_variables: output.changed_variables,
                backup,
            });
        }

        Ok(RunReport {
            dry_run: options.dry_run,
            backup_dir: (options.backup && !options.dry_run).then_some(backup_dir),
            files,
        })
    }
}
