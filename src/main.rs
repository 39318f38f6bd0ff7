use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use tsukimi_patcher::{
    load_from_path, FileReport, FileStatus, Orchestrator, Palette, RunOptions, RunReport,
};

#[derive(Parser)]
#[command(name = "tsukimi-patcher")]
#[command(
    about = "Patch MetroSteam (Metro by Rose) colors to a Tsukimi-inspired palette",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to the MetroSteam skin folder
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Show what would change, without writing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Do not create backups (default: copies in ./_tsukimi_patch_backups/)
    #[arg(long)]
    no_backup: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,

    /// Palette TOML to apply instead of the built-in Tsukimi palette
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Log every patch step (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let dir = resolve_dir(&cli.dir)?;
    let palette = match &cli.palette {
        Some(path) => load_from_path(path)?,
        None => Palette::tsukimi(),
    };

    println!("Skin: {}", dir.display());
    println!("Palette: {}", palette.name);
    println!();

    let orchestrator = Orchestrator::new(&dir, palette)?;
    let options = RunOptions {
        dry_run: cli.dry_run,
        backup: !cli.no_backup,
    };

    let report = match orchestrator.run(options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{} {}", "✗".red(), err);
            std::process::exit(1);
        }
    };

    for file in &report.files {
        print_file(file, report.dry_run);
        if cli.diff && file.status == FileStatus::Changed {
            display_diff(&file.path, &file.original, &file.patched);
        }
    }
    println!();

    print_summary(&report);
    Ok(())
}

/// Expand a leading `~` and canonicalize.
fn resolve_dir(dir: &Path) -> Result<PathBuf> {
    let expanded = match dir.strip_prefix("~") {
        Ok(rest) => home::home_dir()
            .context("cannot expand `~`: home directory unknown")?
            .join(rest),
        Err(_) => dir.to_path_buf(),
    };

    expanded
        .canonicalize()
        .with_context(|| format!("skin folder not found: {}", expanded.display()))
}

fn file_label(file: &FileReport) -> String {
    file.path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.path.display().to_string())
}

fn print_file(file: &FileReport, dry_run: bool) {
    let name = file_label(file);
    match file.status {
        FileStatus::Changed => {
            let verb = if dry_run { "Would patch" } else { "Patched" };
            println!(
                "{} {}: {} ({} -> {} bytes)",
                "✓".green(),
                name,
                verb,
                file.before_len(),
                file.after_len()
            );
            if !file.changed_variables.is_empty() {
                println!(
                    "  {}",
                    format!("variables: {}", file.changed_variables.join(", ")).dimmed()
                );
            }
            if let Some(backup) = &file.backup {
                println!("  {}", format!("backup: {}", backup.display()).dimmed());
            }
        }
        FileStatus::Unchanged => println!("{} {}: Already patched", "⊙".yellow(), name),
        FileStatus::Skipped => println!("{} {}: Not present, skipped", "⊘".cyan(), name),
    }
}

fn print_summary(report: &RunReport) {
    if !report.changed_any() {
        println!("{}", "No changes needed (already patched).".green());
        return;
    }

    if report.dry_run {
        println!("{}", "Would patch the following files:".bold());
        for file in report.changed_files() {
            println!("- {}", file.path.display());
            println!("  bytes: {} -> {}", file.before_len(), file.after_len());
        }
        return;
    }

    match &report.backup_dir {
        Some(dir) => println!("{} {}", "Patched. Backups saved to:".bold(), dir.display()),
        None => println!("{}", "Patched (no backups).".bold()),
    }
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", sign);
    }
    println!();
}
