//! # eolchecklib
//!
//! Line ending classification for the files in a git change set, so a commit
//! can be rejected when a file mixes line endings or breaks a per-extension
//! rule.
//!
//! ## Overview
//!
//! - **Tokenizing**: [`split_eol`] cuts a byte window into terminators
//!   (`CR`, `LF`, `CRLF`), NUL bytes, and plain runs
//! - **Counting**: [`count_eols`] folds a window into an [`EolStats`]
//! - **Streaming**: [`EolScanner`] reads a source in fixed-size chunks and
//!   never splits a `CRLF` that straddles two reads
//! - **Change sets**: [`parse_change_records`] reads the raw record format of
//!   `git diff-index`, and [`GitRepo`] turns a staged change set or a commit
//!   into [`EolSource`]s
//! - **Policy**: [`EolPolicy`] pins extensions to CRLF or LF, and
//!   [`check_sources`] produces a [`CheckReport`]
//!
//! A file containing a NUL byte is binary and is never rejected. A file
//! without any terminator satisfies every rule.
//!
//! ## Example
//!
//! ```rust
//! use eolchecklib::{check_sources, CheckOptions, EolPolicy, MemorySource};
//!
//! let sources = vec![
//!     MemorySource::new("build.bat", "1", b"@echo off\r\nexit\r\n".to_vec()),
//!     MemorySource::new("notes.txt", "2", b"one\r\ntwo\n".to_vec()),
//! ];
//!
//! let policy = EolPolicy::new().crlf_extensions("bat,cmd");
//! let report = check_sources(&sources, &CheckOptions::new().policy(policy));
//!
//! assert_eq!(report.error_count, 1);
//! assert_eq!(report.files[1].stats().unwrap().to_string(), "CRLF LF");
//! ```

pub mod check;
pub mod eol;
pub mod error;
pub mod git;
pub mod policy;
pub mod record;
pub mod scanner;
pub mod source;

pub use check::{check_sources, CheckOptions, CheckReport, FileOutcome, FileReport};
pub use eol::{count_eols, split_eol, tokens, EolStats, Token};
pub use error::{EolcheckError, FormatError, FormatErrorKind};
pub use git::{BlobSource, GitRepo, EMPTY_TREE};
pub use policy::{extension_of, EolPolicy, Verdict};
pub use record::{parse_change_records, ChangeRecord, ChangeStatus, RecordFormat};
pub use scanner::{scan_source, EolScanner, DEFAULT_CHUNK_SIZE};
pub use source::{EolSource, MemorySource};

/// Result type for eolchecklib operations
pub type Result<T> = std::result::Result<T, EolcheckError>;
