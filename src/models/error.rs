use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Failed to read config file '{path}': {cause}")]
    ConfigRead { path: PathBuf, cause: io::Error },

    #[error("Failed to parse config file '{path}': {cause}")]
    ConfigParse {
        path: PathBuf,
        cause: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to create backup directory '{path}': {cause}\nSuggestion: check that the parent directory exists and that you may write to it")]
    DirectoryCreate { path: PathBuf, cause: io::Error },

    #[error("Backup path '{path}' exists but is not a directory\nSuggestion: point BACKUP_DIR or backup_dir at a directory")]
    NotADirectory { path: PathBuf },

    #[error("Backup directory '{path}' is not writable: {cause}\nSuggestion: fix the directory permissions or choose another path with BACKUP_DIR")]
    DirectoryNotWritable { path: PathBuf, cause: io::Error },

    #[error("Source file does not exist: '{path}'")]
    SourceMissing { path: PathBuf },

    #[error("Source is not a regular file: '{path}'")]
    SourceNotFile { path: PathBuf },

    #[error("Source file is not readable '{path}': {cause}")]
    SourceUnreadable { path: PathBuf, cause: io::Error },

    #[error("Could not derive a backup name from '{path}'")]
    EmptyLogicalName { path: PathBuf },

    #[error("Failed to read modification time of '{path}': {cause}")]
    ModificationTime { path: PathBuf, cause: io::Error },

    #[error("Failed to hash file '{path}': {cause}")]
    Hash { path: PathBuf, cause: io::Error },

    #[error("Hash of '{path}' is malformed: '{hash}'")]
    MalformedHash { path: PathBuf, hash: String },

    #[error("Source '{path}' changed while it was backed up (hash {expected}, copied {actual})")]
    SourceChanged {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Failed to copy file from '{from}' to '{to}': {cause}")]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        cause: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
