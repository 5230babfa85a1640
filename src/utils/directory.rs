use crate::models::error::{BackupError, Result};
use crate::utils::path::resolve_path;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
const DIRECTORY_MODE: u32 = 0o755;

/// Resolves the configured backup directory and makes sure it exists and is writable.
pub fn prepare_backup_directory(raw: &str) -> Result<PathBuf> {
    if raw.trim().is_empty() {
        return Err(BackupError::InvalidConfig(
            "Backup directory path is empty".to_string(),
        ));
    }

    let path = resolve_path(raw);
    info!("Backup directory: {}", path.display());

    ensure_directory(&path)?;
    ensure_writable(&path)?;
    Ok(path)
}

/// Creates `path` and its parents if missing, the leaf with mode 0755.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(BackupError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        debug!("Backup directory already exists: {}", path.display());
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|cause| BackupError::DirectoryCreate {
        path: path.to_path_buf(),
        cause,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(DIRECTORY_MODE)).map_err(
            |cause| BackupError::DirectoryCreate {
                path: path.to_path_buf(),
                cause,
            },
        )?;
    }

    info!("Created backup directory: {}", path.display());
    Ok(())
}

/// Check if a directory is writable by creating a temporary file in it
pub fn ensure_writable(path: &Path) -> Result<()> {
    tempfile::Builder::new()
        .prefix(".write-probe-")
        .tempfile_in(path)
        .map(drop)
        .map_err(|cause| BackupError::DirectoryNotWritable {
            path: path.to_path_buf(),
            cause,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directory_with_parents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b").join("backups");

        let prepared = prepare_backup_directory(target.to_str().unwrap()).unwrap();

        assert_eq!(prepared, target);
        assert!(target.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_created_directory_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("backups");
        ensure_directory(&target).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_existing_directory_is_left_alone() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("old_backup.kdbx"), b"x").unwrap();

        prepare_backup_directory(temp.path().to_str().unwrap()).unwrap();

        assert!(temp.path().join("old_backup.kdbx").exists());
        // the write probe must not leave anything behind
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_rejects_empty_path() {
        match prepare_backup_directory("") {
            Err(BackupError::InvalidConfig(_)) => {}
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_file_in_place_of_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("backups");
        fs::write(&file, b"not a dir").unwrap();

        match prepare_backup_directory(file.to_str().unwrap()) {
            Err(BackupError::NotADirectory { .. }) => {}
            other => panic!("Expected NotADirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("blocker");
        fs::write(&file, b"x").unwrap();

        match prepare_backup_directory(file.join("backups").to_str().unwrap()) {
            Err(BackupError::DirectoryCreate { .. }) => {}
            other => panic!("Expected DirectoryCreate error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("readonly");
        fs::create_dir(&target).unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o555)).unwrap();

        // root ignores directory permissions
        let probe = fs::write(target.join("probe"), b"x");
        if probe.is_ok() {
            fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = ensure_writable(&target);
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(BackupError::DirectoryNotWritable { .. }) => {}
            other => panic!("Expected DirectoryNotWritable error, got {:?}", other),
        }
    }
}
