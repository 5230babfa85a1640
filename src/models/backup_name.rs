use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;
use std::time::SystemTime;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// File name of one backup: `{timestamp}_{prefix}-{logical_name}_{hash}.{extension}`.
///
/// The same content, modification time and logical name always produce the
/// same name, which is what makes an existing file proof of a finished backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupName {
    pub timestamp: String,
    pub prefix: String,
    pub logical_name: String,
    pub hash: String,
    pub extension: Option<String>,
}

impl fmt::Display for BackupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}-{}_{}",
            self.timestamp, self.prefix, self.logical_name, self.hash
        )?;
        if let Some(ext) = &self.extension {
            write!(f, ".{}", ext)?;
        }
        Ok(())
    }
}

/// Base name without extension, minus a leading `{prefix}-`.
///
/// Returns `None` when nothing is left to name the backup with.
pub fn logical_name(path: &Path, prefix: &str) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let dashed = format!("{}-", prefix);
    let name = stem.strip_prefix(dashed.as_str()).unwrap_or(stem.as_ref());
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Lowercased extension of the source file, if it has one.
pub fn source_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_modified(modified: SystemTime) -> String {
    format_timestamp(&DateTime::<Local>::from(modified))
}
