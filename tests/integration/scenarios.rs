use super::{load_expected, read, setup_skin, SKIN_FILES};
use std::fs;
use tsukimi_patcher::json::ensure_valid;
use tsukimi_patcher::locator::json_object;
use tsukimi_patcher::persist::BACKUP_DIR_NAME;
use tsukimi_patcher::{
    Document, FileStatus, Orchestrator, Palette, PatchError, RunOptions, Span,
};

fn run(dir: &tempfile::TempDir, options: RunOptions) -> tsukimi_patcher::RunReport {
    Orchestrator::new(dir.path(), Palette::tsukimi())
        .unwrap()
        .run(options)
        .unwrap()
}

fn no_backup() -> RunOptions {
    RunOptions {
        dry_run: false,
        backup: false,
    }
}

fn midnight_member(text: &str) -> String {
    let doc = Document::new(text);
    let obj = json_object(&doc, "Midnight", Span::new(0, doc.len()))
        .unwrap()
        .unwrap();
    doc.slice(obj.member()).to_string()
}

#[test]
fn full_run_matches_expected_fixtures() {
    let skin = setup_skin();
    let report = run(&skin, no_backup());

    assert_eq!(report.files.len(), SKIN_FILES.len());
    assert!(report
        .files
        .iter()
        .all(|f| f.status == FileStatus::Changed));

    for name in [
        "notifications.custom.css",
        "webkit.css",
        "friends.custom.css",
        "custom.css",
    ] {
        assert_eq!(read(&skin, name), load_expected(name), "{name} differs");
    }
}

#[test]
fn library_root_keeps_unrelated_variables() {
    let skin = setup_skin();
    let _ = run(&skin, no_backup());

    let library = read(&skin, "libraryroot.custom.css");
    assert!(library.starts_with("/* Metro by Rose: library overrides */\n:root {\n    /* Tsukimi-inspired palette */\n    --focus: 205,177,149;\n"));
    assert!(library.contains("    --white05onbgGameList: 15,16,21;\n"));
    assert!(library.contains("    --white05: 240,235,229,0.05;\n"));
    assert!(library.contains("    --white: 240,235,229;\n"));
    assert!(library.contains("    --radius: 4px;\n"));
    assert!(library.ends_with("._3EfPQ8DLUtUzHxTs_dX4fG {\n    background: rgb(var(--bgGameList));\n}\n"));
}

#[test]
fn theme_gets_variation_after_midnight() {
    let skin = setup_skin();
    let original = read(&skin, "theme.json");
    let _ = run(&skin, no_backup());

    let theme = read(&skin, "theme.json");
    ensure_valid(&theme).unwrap();
    assert_eq!(midnight_member(&theme), midnight_member(&original));
    assert!(theme.contains(
        "                    \"--clientBG\": [\"30,32,36\", \"all\"]\n                },\n                \"Tsukimi\": {\n                    \"--focus\": [\"205,177,149\", \"all\"],\n"
    ));
    assert!(theme.contains(
        "                    \"--white\": [\"240,235,229\", \"all\"]\n                },\n                \"Metro White\": {\n"
    ));

    // Everything after the inserted member is untouched.
    let tail = &original[original.find("                \"Metro White\"").unwrap()..];
    assert!(theme.ends_with(tail));

    let value: serde_json::Value = serde_json::from_str(&theme).unwrap();
    let entries = value["patches"]["Variation"]["values"]["Tsukimi"]
        .as_object()
        .unwrap();
    assert_eq!(entries.len(), 24);
}

#[test]
fn rerun_dry_run_reports_nothing_to_do() {
    let skin = setup_skin();
    let _ = run(&skin, no_backup());
    let patched: Vec<String> = SKIN_FILES.iter().map(|name| read(&skin, name)).collect();

    let report = run(
        &skin,
        RunOptions {
            dry_run: true,
            backup: true,
        },
    );
    assert!(!report.changed_any());
    assert!(report
        .files
        .iter()
        .all(|f| f.status == FileStatus::Unchanged));

    let again = run(&skin, RunOptions::default());
    assert!(!again.changed_any());
    assert!(!skin.path().join(BACKUP_DIR_NAME).exists());

    for (name, before) in SKIN_FILES.iter().zip(patched) {
        assert_eq!(read(&skin, name), before, "{name} changed on re-run");
    }
}

#[test]
fn dry_run_stages_without_writing() {
    let skin = setup_skin();
    let originals: Vec<String> = SKIN_FILES.iter().map(|name| read(&skin, name)).collect();

    let report = run(
        &skin,
        RunOptions {
            dry_run: true,
            backup: true,
        },
    );
    assert!(report.changed_any());
    assert_eq!(report.changed_files().count(), 6);
    assert_eq!(report.backup_dir, None);

    for (name, before) in SKIN_FILES.iter().zip(&originals) {
        assert_eq!(&read(&skin, name), before);
    }

    let notifications = report
        .files
        .iter()
        .find(|f| f.path.ends_with("notifications.custom.css"))
        .unwrap();
    assert_eq!(notifications.patched, load_expected("notifications.custom.css"));
    assert_eq!(notifications.before_len(), originals[2].len());
    assert_eq!(
        notifications.changed_variables,
        vec!["focus", "clientBG", "white"]
    );
    assert!(!skin.path().join(BACKUP_DIR_NAME).exists());
}

#[test]
fn backups_hold_originals() {
    let skin = setup_skin();
    let original_theme = read(&skin, "theme.json");
    let report = run(&skin, RunOptions::default());

    let backup_dir = skin.path().join(BACKUP_DIR_NAME);
    assert_eq!(report.backup_dir.as_deref(), Some(backup_dir.as_path()));

    let backups: Vec<_> = fs::read_dir(&backup_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(backups.len(), 6);

    let theme_report = report
        .files
        .iter()
        .find(|f| f.path.ends_with("theme.json"))
        .unwrap();
    let theme_backup = theme_report.backup.as_ref().unwrap();
    let name = theme_backup.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("theme.json."));
    assert!(name.ends_with(".bak"));
    // theme.json.YYYYMMDD-HHMMSS.bak
    assert_eq!(name.len(), "theme.json.".len() + 15 + ".bak".len());
    assert_eq!(fs::read_to_string(theme_backup).unwrap(), original_theme);
}

#[test]
fn optional_custom_css_may_be_absent() {
    let skin = setup_skin();
    fs::remove_file(skin.path().join("custom.css")).unwrap();

    let report = run(&skin, no_backup());
    let custom = report.files.last().unwrap();
    assert_eq!(custom.status, FileStatus::Skipped);
    assert!(!skin.path().join("custom.css").exists());
}

#[test]
fn snippet_appended_when_marker_absent() {
    let skin = setup_skin();
    fs::write(
        skin.path().join("custom.css"),
        "/* Personal tweaks go here. */\n.a { color: red; }\n\n\n",
    )
    .unwrap();

    let _ = run(&skin, no_backup());
    let custom = read(&skin, "custom.css");
    assert!(custom.starts_with(
        "/* Personal tweaks go here. */\n.a { color: red; }\n\n/* Tsukimi (dark):\n\n--focus: 205, 177, 149;\n"
    ));
    assert!(custom.ends_with("--white45: 240, 235, 229, 0.45;\n\n*/\n\n"));
}

#[test]
fn missing_mandatory_file_aborts_before_writes() {
    let skin = setup_skin();
    fs::remove_file(skin.path().join("theme.json")).unwrap();
    let library_before = read(&skin, "libraryroot.custom.css");

    let err = Orchestrator::new(skin.path(), Palette::tsukimi())
        .unwrap()
        .run(RunOptions::default())
        .unwrap_err();

    match err {
        PatchError::MissingFile { path } => assert!(path.ends_with("theme.json")),
        other => panic!("expected MissingFile, got {other}"),
    }
    assert_eq!(read(&skin, "libraryroot.custom.css"), library_before);
    assert!(!skin.path().join(BACKUP_DIR_NAME).exists());
}

#[test]
fn missing_variation_keeps_earlier_writes() {
    let skin = setup_skin();
    let theme = "{\n    \"name\": \"Metro by Rose\",\n    \"patches\": {}\n}\n";
    fs::write(skin.path().join("theme.json"), theme).unwrap();

    let err = Orchestrator::new(skin.path(), Palette::tsukimi())
        .unwrap()
        .run(no_backup())
        .unwrap_err();

    match &err {
        PatchError::MissingStructure { file, what } => {
            assert!(file.ends_with("theme.json"));
            assert!(what.contains("\"Variation\""));
        }
        other => panic!("expected MissingStructure, got {other}"),
    }
    // CSS files come first in processing order and stay written.
    assert_eq!(
        read(&skin, "webkit.css"),
        load_expected("webkit.css")
    );
    assert_eq!(read(&skin, "theme.json"), theme);
    assert!(!read(&skin, "custom.css").contains("Tsukimi (dark)"));
}

#[test]
fn malformed_theme_json_is_fatal() {
    let skin = setup_skin();
    fs::write(
        skin.path().join("theme.json"),
        "{\n    \"patches\": {\n        \"Variation\": {\n            \"values\": {\n                \"Midnight\": {},\n            }\n        }\n    }\n}\n",
    )
    .unwrap();

    let err = Orchestrator::new(skin.path(), Palette::tsukimi())
        .unwrap()
        .run(no_backup())
        .unwrap_err();
    assert!(matches!(err, PatchError::MalformedInput { .. }));
}

#[test]
fn stylesheet_without_root_is_fatal() {
    let skin = setup_skin();
    fs::write(
        skin.path().join("notifications.custom.css"),
        ".toast {\n    color: white;\n}\n",
    )
    .unwrap();

    let err = Orchestrator::new(skin.path(), Palette::tsukimi())
        .unwrap()
        .run(no_backup())
        .unwrap_err();
    match err {
        PatchError::MissingStructure { file, what } => {
            assert!(file.ends_with("notifications.custom.css"));
            assert_eq!(what, "could not find :root block");
        }
        other => panic!("expected MissingStructure, got {other}"),
    }
}

#[test]
fn crlf_skin_stays_crlf_and_idempotent() {
    let skin = setup_skin();
    for name in SKIN_FILES {
        let path = skin.path().join(name);
        let text = fs::read_to_string(&path).unwrap().replace('\n', "\r\n");
        fs::write(&path, text).unwrap();
    }

    let first = run(&skin, no_backup());
    assert_eq!(first.changed_files().count(), 6);
    for name in SKIN_FILES {
        let text = read(&skin, name);
        assert!(
            !text.replace("\r\n", "").contains('\n'),
            "{name} gained a bare LF"
        );
    }
    assert_eq!(
        read(&skin, "webkit.css"),
        load_expected("webkit.css").replace('\n', "\r\n")
    );
    ensure_valid(&read(&skin, "theme.json")).unwrap();

    let second = run(&skin, no_backup());
    assert!(!second.changed_any());
}

#[test]
fn alternate_palette_replaces_installed_variation() {
    let skin = setup_skin();
    let _ = run(&skin, no_backup());

    let mut palette = Palette::tsukimi();
    palette.colors.insert("focus".to_string(), "1,2,3".to_string());
    let report = Orchestrator::new(skin.path(), palette)
        .unwrap()
        .run(no_backup())
        .unwrap();

    // The snippet sentinel is already present, so custom.css stays as is.
    let custom = report
        .files
        .iter()
        .find(|f| f.path.ends_with("custom.css"))
        .unwrap();
    assert_eq!(custom.status, FileStatus::Unchanged);

    let theme = read(&skin, "theme.json");
    assert!(theme.contains("\"--focus\": [\"1,2,3\", \"all\"],"));
    assert_eq!(theme.matches("\"Tsukimi\"").count(), 1);
    assert!(read(&skin, "notifications.custom.css").contains("--focus: 1, 2, 3;"));
}
