use crate::models::error::BackupError;
use std::path::PathBuf;

/// What happened to one processed source entry.
#[derive(Debug)]
pub enum EntryOutcome {
    Copied { destination: PathBuf, bytes: u64 },
    AlreadyBackedUp { destination: PathBuf },
    Failed { error: BackupError },
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, EntryOutcome::Failed { .. })
    }
}

#[derive(Debug)]
pub struct EntryReport {
    pub entry: String,
    pub outcome: EntryOutcome,
}

/// Result of one run over the configured sources, in configured order.
#[derive(Debug, Default)]
pub struct BackupReport {
    pub entries: Vec<EntryReport>,
    pub skipped: usize,
}

impl BackupReport {
    pub fn record(&mut self, entry: &str, outcome: EntryOutcome) {
        self.entries.push(EntryReport {
            entry: entry.to_string(),
            outcome,
        });
    }

    pub fn processed(&self) -> usize {
        self.entries.len()
    }

    pub fn successful(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.successful()
    }

    pub fn copied(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Copied { .. }))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &BackupError)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            EntryOutcome::Failed { error } => Some((e.entry.as_str(), error)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = BackupReport::default();
        report.record(
            "/a.kdbx",
            EntryOutcome::Copied {
                destination: PathBuf::from("/b/a"),
                bytes: 3,
            },
        );
        report.record(
            "/c.kdbx",
            EntryOutcome::AlreadyBackedUp {
                destination: PathBuf::from("/b/c"),
            },
        );
        report.record(
            "/missing.kdbx",
            EntryOutcome::Failed {
                error: BackupError::SourceMissing {
                    path: PathBuf::from("/missing.kdbx"),
                },
            },
        );

        assert_eq!(report.processed(), 3);
        assert_eq!(report.successful(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.copied(), 1);
        assert!(!report.is_success());

        let failures: Vec<_> = report.failures().map(|(entry, _)| entry).collect();
        assert_eq!(failures, vec!["/missing.kdbx"]);
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = BackupReport::default();
        assert_eq!(report.processed(), 0);
        assert!(report.is_success());
    }
}
