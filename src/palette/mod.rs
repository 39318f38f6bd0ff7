//! Color palette for one theme variation.
//!
//! A [`Palette`] is an immutable value handed to the orchestrator; the
//! built-in one is [`Palette::tsukimi`], and alternatives load from TOML.

pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError};
pub use schema::{
    CommaStyle, Palette, ValidationError, ValidationIssue, COLOR_NAMES, GAMELIST_OVERLAY,
    SNIPPET_COLOR_NAMES,
};
