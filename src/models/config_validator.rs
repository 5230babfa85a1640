use crate::models::config::Config;
use crate::models::error::{BackupError, Result};
use crate::utils::path::is_skipped_entry;
use log::{info, warn};

/// Validates the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    info!("Validating configuration...");

    validate_sources(&config.sources)?;
    validate_backup_dir(&config.backup_dir)?;
    validate_name_prefix(&config.name_prefix)?;

    info!("Configuration validation passed");
    Ok(())
}

/// Validate the list of source database files
fn validate_sources(sources: &[String]) -> Result<()> {
    if sources.is_empty() {
        return Err(BackupError::InvalidConfig(
            "At least one entry in sources must be configured".to_string(),
        ));
    }

    let usable = sources.iter().filter(|s| !is_skipped_entry(s)).count();
    if usable == 0 {
        return Err(BackupError::InvalidConfig(format!(
            "All {} entries in sources are blank or commented out",
            sources.len()
        )));
    }

    let skipped = sources.len() - usable;
    if skipped > 0 {
        info!(
            "{} of {} source entries are blank or comments and will be skipped",
            skipped,
            sources.len()
        );
    }

    for (idx, source) in sources.iter().enumerate() {
        if source != source.trim() && !is_skipped_entry(source) {
            warn!(
                "Source #{} has leading or trailing whitespace, which is kept as part of the path: '{}'",
                idx + 1,
                source
            );
        }
    }

    Ok(())
}

/// Validate the backup directory setting
fn validate_backup_dir(backup_dir: &str) -> Result<()> {
    if backup_dir.trim().is_empty() {
        return Err(BackupError::InvalidConfig(
            "backup_dir must not be empty\nSuggestion: remove the setting to use 'backups' or set BACKUP_DIR".to_string(),
        ));
    }
    Ok(())
}

/// The prefix ends up inside backup file names
fn validate_name_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(BackupError::InvalidConfig(
            "name_prefix must not be empty".to_string(),
        ));
    }
    if prefix.contains('/') || prefix.contains('\\') {
        return Err(BackupError::InvalidConfig(format!(
            "name_prefix must not contain path separators: '{}'",
            prefix
        )));
    }
    Ok(())
}
