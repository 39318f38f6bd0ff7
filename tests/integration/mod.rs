//! Integration tests over a fixture MetroSteam skin directory.

mod properties;
mod scenarios;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SKIN_FILES: [&str; 6] = [
    "libraryroot.custom.css",
    "friends.custom.css",
    "notifications.custom.css",
    "webkit.css",
    "theme.json",
    "custom.css",
];

/// Copy the fixture skin into a fresh temporary directory.
pub fn setup_skin() -> TempDir {
    let dir = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/skin");
    for name in SKIN_FILES {
        fs::copy(fixtures.join(name), dir.path().join(name)).unwrap();
    }
    dir
}

pub fn load_expected(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.expected"));
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to load fixture {}: {err}", path.display()))
}

pub fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}
