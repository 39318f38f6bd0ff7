//! Tsukimi Patcher: installs the Tsukimi color variation into a MetroSteam skin
//!
//! The patcher rewrites a fixed set of skin files in place: CSS custom
//! property values inside `:root`, a few plain declarations in named rules,
//! a `theme.json` variation object, and a reference snippet in `custom.css`.
//!
//! # Architecture
//!
//! All edit operations compile down to a single primitive: [`Edit`], which
//! represents a verified byte-span replacement on an immutable [`Document`].
//! Intelligence lives in span acquisition ([`locator`], the anchored patterns
//! in [`css`] and [`json`]), not in the application logic.
//!
//! # Guarantees
//!
//! - Every patcher detects its own prior application; re-running is a no-op
//! - Bytes outside the targeted block, line or snippet are never touched
//! - `theme.json` is edited as raw text and re-validated as JSON
//! - Atomic file writes (tempfile + fsync + rename), optional backups
//!
//! # Example
//!
//! ```no_run
//! use tsukimi_patcher::{Orchestrator, Palette, RunOptions};
//!
//! let orchestrator = Orchestrator::new("/path/to/MetroSteam", Palette::tsukimi())?;
//! let report = orchestrator.run(RunOptions { dry_run: true, backup: false })?;
//! for file in report.changed_files() {
//!     println!("{file}");
//! }
//! # Ok::<(), tsukimi_patcher::PatchError>(())
//! ```

pub mod css;
pub mod document;
pub mod edit;
pub mod errors;
pub mod json;
pub mod locator;
pub mod orchestrator;
pub mod palette;
pub mod persist;
pub mod snippet;

// Re-exports
pub use document::{Document, LineEnding, Patched, Span};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use errors::{PatchError, StructureError};
pub use orchestrator::{
    FileReport, FileStatus, Orchestrator, RunOptions, RunReport, Target, TargetKind, TARGETS,
};
pub use palette::{load_from_path, load_from_str, CommaStyle, ConfigError, Palette};
