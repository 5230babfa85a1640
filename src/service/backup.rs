use crate::models::backup_name::{format_modified, logical_name, source_extension, BackupName};
use crate::models::backup_report::{BackupReport, EntryOutcome};
use crate::models::config::Config;
use crate::models::error::{BackupError, Result};
use crate::models::hash_algorithm::HashAlgorithm;
use crate::service::hash::{hash_file, HashingReader};
use crate::utils::path::{is_skipped_entry, resolve_path};
use crate::utils::progress::format_bytes;
use indicatif::ProgressBar;
use log::{debug, error, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
const BACKUP_FILE_MODE: u32 = 0o600;

/// Backs up every usable entry of `sources` into `backup_dir`.
///
/// Failed entries are recorded and do not stop the remaining ones.
pub fn backup_files(
    sources: &[String],
    backup_dir: &Path,
    config: &Config,
    progress: Option<&ProgressBar>,
) -> BackupReport {
    let mut report = BackupReport::default();

    for entry in sources {
        if is_skipped_entry(entry) {
            debug!("Skipping blank or comment entry: '{}'", entry);
            report.skipped += 1;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            continue;
        }

        if let Some(pb) = progress {
            pb.set_message(entry.clone());
        }
        info!("Processing {}", entry);

        let outcome = match backup_entry(entry, backup_dir, config) {
            Ok(outcome) => outcome,
            Err(error) => EntryOutcome::Failed { error },
        };

        match &outcome {
            EntryOutcome::Copied { destination, bytes } => info!(
                "Backed up {} to {} ({})",
                entry,
                destination.display(),
                format_bytes(*bytes)
            ),
            EntryOutcome::AlreadyBackedUp { destination } => info!(
                "Already backed up: {} exists",
                destination.display()
            ),
            EntryOutcome::Failed { error } => error!("Backup of {} failed: {}", entry, error),
        }

        report.record(entry, outcome);
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    report
}

/// Backs up a single configured entry.
pub fn backup_entry(entry: &str, backup_dir: &Path, config: &Config) -> Result<EntryOutcome> {
    let source = resolve_path(entry);
    let metadata = validate_source(&source)?;

    let name = backup_name_for(&source, &metadata, config)?;
    let destination = backup_dir.join(name.to_string());
    debug!("Backup name for {}: {}", source.display(), name);

    if destination.exists() {
        return Ok(EntryOutcome::AlreadyBackedUp { destination });
    }

    match copy_atomically(
        &source,
        &destination,
        backup_dir,
        config.hash_algorithm,
        &name.hash,
    )? {
        Some(bytes) => Ok(EntryOutcome::Copied { destination, bytes }),
        None => Ok(EntryOutcome::AlreadyBackedUp { destination }),
    }
}

/// Derives the backup file name of `source`.
pub fn backup_name_for(
    source: &Path,
    metadata: &fs::Metadata,
    config: &Config,
) -> Result<BackupName> {
    let logical_name = logical_name(source, &config.name_prefix).ok_or_else(|| {
        BackupError::EmptyLogicalName {
            path: source.to_path_buf(),
        }
    })?;

    let modified = metadata
        .modified()
        .map_err(|cause| BackupError::ModificationTime {
            path: source.to_path_buf(),
            cause,
        })?;

    let hash = hash_file(source, config.hash_algorithm)?;
    debug!(
        "{} hash of {}: {}",
        config.hash_algorithm.name(),
        source.display(),
        hash
    );

    Ok(BackupName {
        timestamp: format_modified(modified),
        prefix: config.name_prefix.clone(),
        logical_name,
        hash,
        extension: source_extension(source),
    })
}

/// The source must be an existing, readable regular file.
fn validate_source(source: &Path) -> Result<fs::Metadata> {
    let metadata = fs::metadata(source).map_err(|cause| match cause.kind() {
        io::ErrorKind::NotFound => BackupError::SourceMissing {
            path: source.to_path_buf(),
        },
        _ => BackupError::SourceUnreadable {
            path: source.to_path_buf(),
            cause,
        },
    })?;

    if !metadata.is_file() {
        return Err(BackupError::SourceNotFile {
            path: source.to_path_buf(),
        });
    }

    fs::File::open(source).map_err(|cause| BackupError::SourceUnreadable {
        path: source.to_path_buf(),
        cause,
    })?;

    Ok(metadata)
}

/// Copies into a temp file next to `destination` and moves it into place.
///
/// The copied bytes are hashed on the way and must match `expected_hash`,
/// the hash in the destination name. Returns `None` if `destination`
/// appeared while copying. The final name never holds a partial or
/// mismatching copy.
fn copy_atomically(
    source: &Path,
    destination: &Path,
    backup_dir: &Path,
    algorithm: HashAlgorithm,
    expected_hash: &str,
) -> Result<Option<u64>> {
    let copy_error = |cause: io::Error| BackupError::FileCopy {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        cause,
    };

    let file = fs::File::open(source).map_err(copy_error)?;
    let mut reader = HashingReader::new(file, algorithm);
    let mut temp = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(backup_dir)
        .map_err(copy_error)?;

    let bytes = io::copy(&mut reader, temp.as_file_mut()).map_err(copy_error)?;
    temp.as_file().sync_all().map_err(copy_error)?;

    let copied_hash = reader.finish();
    if copied_hash != expected_hash {
        return Err(BackupError::SourceChanged {
            path: source.to_path_buf(),
            expected: expected_hash.to_string(),
            actual: copied_hash,
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(BACKUP_FILE_MODE))
            .map_err(copy_error)?;
    }

    match temp.persist_noclobber(destination) {
        Ok(_) => Ok(Some(bytes)),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(copy_error(e.error)),
    }
}

/// Paths of all finished backups in `backup_dir`, sorted by name.
pub fn list_backups(backup_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut backups = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if entry.file_type()?.is_file() && !name.to_string_lossy().starts_with('.') {
            backups.push(entry.path());
        }
    }
    backups.sort();
    Ok(backups)
}
