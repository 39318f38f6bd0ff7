use crate::edit::EditError;
use crate::palette::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// A required structural element that a pure patcher could not find.
///
/// Patchers do not know which file they operate on; the orchestrator lifts
/// this into [`PatchError::MissingStructure`] with the path attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("could not find {what}")]
    Missing { what: String },

    #[error("unterminated {what}")]
    Unterminated { what: String },

    #[error("invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl StructureError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        StructureError::Missing { what: what.into() }
    }

    pub(crate) fn unterminated(what: impl Into<String>) -> Self {
        StructureError::Unterminated { what: what.into() }
    }
}

/// Fatal errors of a patch run.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("missing expected file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("{}: {what}", file.display())]
    MissingStructure { file: PathBuf, what: String },

    #[error("{}: malformed input: {message}", file.display())]
    MalformedInput { file: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: edit error: {source}", file.display())]
    Edit {
        file: PathBuf,
        #[source]
        source: EditError,
    },

    #[error(transparent)]
    Palette(#[from] ConfigError),
}

impl PatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a file path to a patcher-level structure error.
    pub(crate) fn structure(file: impl Into<PathBuf>, err: StructureError) -> Self {
        let file = file.into();
        match err {
            StructureError::Edit(source) => PatchError::Edit { file, source },
            StructureError::InvalidJson { message } => PatchError::MalformedInput { file, message },
            other => PatchError::MissingStructure {
                file,
                what: other.to_string(),
            },
        }
    }
}
