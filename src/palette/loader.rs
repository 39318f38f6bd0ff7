//! Palette files in the layout of `palettes/tsukimi.toml`.

use crate::palette::schema::{Palette, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a palette could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read palette file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("palette{} is not valid TOML: {source}", origin(.path))]
    Syntax {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("palette '{name}'{} is unusable:\n{source}", origin(.path))]
    Invalid {
        /// Variation name the palette declares.
        name: String,
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    /// Validation failure of `palette`, read from `path` when it came from a file.
    pub fn invalid(palette: &Palette, path: Option<&Path>, source: ValidationError) -> Self {
        ConfigError::Invalid {
            name: palette.name.clone(),
            path: path.map(Path::to_path_buf),
            source,
        }
    }
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" ({})", path.display()))
        .unwrap_or_default()
}

/// Parse and validate a palette given as TOML text.
pub fn load_from_str(input: &str) -> Result<Palette, ConfigError> {
    parse(input, None)
}

/// Read, parse and validate a palette file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Palette, ConfigError> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let palette = parse(&input, Some(path))?;
    log::debug!("palette '{}' loaded from {}", palette.name, path.display());
    Ok(palette)
}

fn parse(input: &str, path: Option<&Path>) -> Result<Palette, ConfigError> {
    let palette: Palette = toml_edit::de::from_str(input).map_err(|source| ConfigError::Syntax {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    palette
        .validate()
        .map_err(|source| ConfigError::invalid(&palette, path, source))?;
    Ok(palette)
}
