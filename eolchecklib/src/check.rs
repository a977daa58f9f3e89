//! Check a set of sources against a line ending policy.
//!
//! Every source is scanned on its own. A source that cannot be opened or
//! read is reported as an error for that file and the run continues with the
//! next one.

use serde::{Deserialize, Serialize};

use crate::eol::EolStats;
use crate::policy::{EolPolicy, Verdict};
use crate::scanner::{scan_source, EolScanner};
use crate::source::EolSource;

/// Options for a check run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Per-extension rules
    pub policy: EolPolicy,
    /// Scanner used for every source
    pub scanner: EolScanner,
}

impl CheckOptions {
    /// Create new default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line ending policy
    pub fn policy(mut self, policy: EolPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the read size used while scanning
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.scanner = self.scanner.with_chunk_size(chunk_size);
        self
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The file was scanned
    Classified { stats: EolStats, verdict: Verdict },
    /// The file could not be opened or read
    Error { message: String },
}

/// Result for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub name: String,
    pub hash: String,
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Whether this file counts as an error for the run
    pub fn is_error(&self) -> bool {
        match &self.outcome {
            FileOutcome::Classified { verdict, .. } => verdict.is_bad(),
            FileOutcome::Error { .. } => true,
        }
    }

    /// Line ending counts, if the file was scanned
    pub fn stats(&self) -> Option<&EolStats> {
        match &self.outcome {
            FileOutcome::Classified { stats, .. } => Some(stats),
            FileOutcome::Error { .. } => None,
        }
    }
}

/// Result of checking a set of sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// One report per source, in input order
    pub files: Vec<FileReport>,
    /// Files that were rejected or could not be read
    pub error_count: u64,
}

impl CheckReport {
    /// True if no file was rejected
    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }
}

/// Scan and judge every source in order.
pub fn check_sources<S: EolSource>(sources: &[S], options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::default();

    for source in sources {
        let outcome = match scan_source(&options.scanner, source) {
            Ok(stats) => {
                let verdict = options.policy.verdict(source.name(), &stats);
                tracing::debug!(file = source.name(), %stats, ?verdict, "classified");
                FileOutcome::Classified { stats, verdict }
            }
            Err(e) => {
                tracing::warn!(file = source.name(), error = %e, "could not classify");
                FileOutcome::Error {
                    message: e.to_string(),
                }
            }
        };

        let file = FileReport {
            name: source.name().to_string(),
            hash: source.hash().to_string(),
            outcome,
        };
        if file.is_error() {
            report.error_count += 1;
        }
        report.files.push(file);
    }

    report
}
