use crate::errors::PatchError;
use chrono::{DateTime, Local};
use filetime::FileTime;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Subdirectory of the skin folder that receives backup copies.
pub const BACKUP_DIR_NAME: &str = "_tsukimi_patch_backups";

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the file is left as it was.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), PatchError> {
    let parent = path.parent().ok_or_else(|| {
        PatchError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path has no parent directory",
            ),
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| PatchError::io(path, e))?;
    temp.write_all(content)
        .map_err(|e| PatchError::io(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| PatchError::io(path, e))?;
    temp.persist(path)
        .map_err(|e| PatchError::io(path, e.error))?;

    Ok(())
}

/// `<name>.<YYYYMMDD-HHMMSS>.bak`
pub fn backup_file_name(file_name: &str, at: DateTime<Local>) -> String {
    format!("{}.{}.bak", file_name, at.format("%Y%m%d-%H%M%S"))
}

/// Copy `path` into `backup_dir`, keeping its modification time.
///
/// The directory is created on first use. Returns the backup path.
pub fn backup_file(path: &Path, backup_dir: &Path) -> Result<PathBuf, PatchError> {
    fs::create_dir_all(backup_dir).map_err(|e| PatchError::io(backup_dir, e))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let backup_path = backup_dir.join(backup_file_name(&file_name, Local::now()));

    fs::copy(path, &backup_path).map_err(|e| PatchError::io(&backup_path, e))?;

    let metadata = fs::metadata(path).map_err(|e| PatchError::io(path, e))?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(&backup_path, mtime).map_err(|e| PatchError::io(&backup_path, e))?;

    log::info!("backed up {} to {}", path.display(), backup_path.display());
    Ok(backup_path)
}
