//! Parser for the raw change records printed by `git diff-index`.
//!
//! Each record looks like
//!
//! ```text
//! :100644 100644 <src-hash> <dst-hash> M<TAB>path<LF>
//! :100644 100644 <src-hash> <dst-hash> R086<TAB>old<TAB>new<LF>
//! ```
//!
//! With `-z` both the TAB and the LF become NUL. Mode and hash fields are
//! always separated by a single space. Copy and rename records carry a
//! similarity score directly after the status letter and two paths.
//!
//! Parsing is positional and stops at the first violation, reporting the
//! byte offset and what was expected there.

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, FormatErrorKind};

/// Status letter of a change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// `M`: contents or mode changed
    Modified,
    /// `C`: copy of another file
    Copied,
    /// `R`: renamed from another path
    Renamed,
    /// `A`: newly added
    Added,
    /// `D`: deleted
    Deleted,
    /// `T`: type changed (file, symlink, submodule)
    TypeChanged,
    /// `U`: unmerged
    Unmerged,
    /// `X`: unknown change type
    Unknown,
    /// `B`: pairing broken
    Broken,
}

impl ChangeStatus {
    /// Parse a status letter
    pub fn from_byte(b: u8) -> Option<Self> {
        let status = match b {
            b'M' => ChangeStatus::Modified,
            b'C' => ChangeStatus::Copied,
            b'R' => ChangeStatus::Renamed,
            b'A' => ChangeStatus::Added,
            b'D' => ChangeStatus::Deleted,
            b'T' => ChangeStatus::TypeChanged,
            b'U' => ChangeStatus::Unmerged,
            b'X' => ChangeStatus::Unknown,
            b'B' => ChangeStatus::Broken,
            _ => return None,
        };
        Some(status)
    }

    /// The status letter as printed by git
    pub fn as_byte(self) -> u8 {
        match self {
            ChangeStatus::Modified => b'M',
            ChangeStatus::Copied => b'C',
            ChangeStatus::Renamed => b'R',
            ChangeStatus::Added => b'A',
            ChangeStatus::Deleted => b'D',
            ChangeStatus::TypeChanged => b'T',
            ChangeStatus::Unmerged => b'U',
            ChangeStatus::Unknown => b'X',
            ChangeStatus::Broken => b'B',
        }
    }

    /// Copy and rename records name a source and a destination path
    pub fn has_two_paths(self) -> bool {
        matches!(self, ChangeStatus::Copied | ChangeStatus::Renamed)
    }

    /// Whether the destination side carries new content worth classifying
    pub fn is_content_change(self) -> bool {
        matches!(
            self,
            ChangeStatus::Modified
                | ChangeStatus::Copied
                | ChangeStatus::Renamed
                | ChangeStatus::Added
        )
    }
}

/// One changed file from a raw diff report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub src_mode: String,
    pub dst_mode: String,
    pub src_hash: String,
    pub dst_hash: String,
    pub status: ChangeStatus,
    /// Similarity percentage, only printed for copies and renames
    pub score: Option<u32>,
    pub src_path: String,
    /// Destination path, only present for copies and renames
    pub dst_path: Option<String>,
}

impl ChangeRecord {
    /// The path the change ends up at: the destination if there is one,
    /// the source otherwise.
    pub fn path(&self) -> &str {
        self.dst_path.as_deref().unwrap_or(&self.src_path)
    }
}

/// Delimiter convention of the diff report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordFormat {
    /// Paths separated by TAB, records terminated by LF
    #[default]
    Text,
    /// Paths and records terminated by NUL (`-z`)
    Nul,
}

impl RecordFormat {
    /// Separator between the status/score field and paths
    pub fn field_separator(self) -> u8 {
        match self {
            RecordFormat::Text => b'\t',
            RecordFormat::Nul => 0,
        }
    }

    /// Terminator after the last path of a record
    pub fn record_separator(self) -> u8 {
        match self {
            RecordFormat::Text => b'\n',
            RecordFormat::Nul => 0,
        }
    }
}

/// Parse every record in `input`.
///
/// An empty input yields no records. Input that ends in the middle of a
/// record is an error; no partial list is returned.
pub fn parse_change_records(
    input: &[u8],
    format: RecordFormat,
) -> Result<Vec<ChangeRecord>, FormatError> {
    let mut parser = RecordParser::new(input, format);
    let mut records = Vec::new();
    while !parser.is_done() {
        records.push(parser.record()?);
    }
    Ok(records)
}

/// Cursor over a diff report.
struct RecordParser<'a> {
    input: &'a [u8],
    pos: usize,
    field_sep: u8,
    record_sep: u8,
}

impl<'a> RecordParser<'a> {
    fn new(input: &'a [u8], format: RecordFormat) -> Self {
        Self {
            input,
            pos: 0,
            field_sep: format.field_separator(),
            record_sep: format.record_separator(),
        }
    }

    fn is_done(&self) -> bool {
        self.pos == self.input.len()
    }

    fn error(&self, kind: FormatErrorKind) -> FormatError {
        FormatError::new(self.pos, kind)
    }

    fn record(&mut self) -> Result<ChangeRecord, FormatError> {
        self.expect(b':')?;
        let src_mode = self.word(b' ')?;
        let dst_mode = self.word(b' ')?;
        let src_hash = self.word(b' ')?;
        let dst_hash = self.word(b' ')?;
        let status = self.status()?;
        let score = self.score()?;

        let (src_path, dst_path) = if status.has_two_paths() {
            let src = self.word(self.field_sep)?;
            let dst = self.word(self.record_sep)?;
            (src, Some(dst))
        } else {
            (self.word(self.record_sep)?, None)
        };

        Ok(ChangeRecord {
            src_mode,
            dst_mode,
            src_hash,
            dst_hash,
            status,
            score,
            src_path,
            dst_path,
        })
    }

    /// Consume `expected` or fail without moving.
    fn expect(&mut self, expected: u8) -> Result<(), FormatError> {
        match self.input.get(self.pos) {
            Some(&b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error(FormatErrorKind::Missing(expected))),
            None => Err(self.error(FormatErrorKind::UnexpectedEof(expected))),
        }
    }

    fn status(&mut self) -> Result<ChangeStatus, FormatError> {
        let Some(&b) = self.input.get(self.pos) else {
            return Err(self.error(FormatErrorKind::MissingStatus));
        };
        let status =
            ChangeStatus::from_byte(b).ok_or_else(|| self.error(FormatErrorKind::UnknownStatus(b)))?;
        self.pos += 1;
        Ok(status)
    }

    /// Optional similarity digits between the status letter and the field
    /// separator.
    fn score(&mut self) -> Result<Option<u32>, FormatError> {
        let start = self.pos;
        let digits = self.word(self.field_sep)?;
        if digits.is_empty() {
            return Ok(None);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::new(start, FormatErrorKind::InvalidScore(digits)));
        }
        digits
            .parse()
            .map(Some)
            .map_err(|_| FormatError::new(start, FormatErrorKind::InvalidScore(digits)))
    }

    /// Bytes up to (not including) `sep`; consumes the separator.
    ///
    /// The search never crosses the record separator, so a record that lacks
    /// a field separator fails instead of reading into the next record.
    fn word(&mut self, sep: u8) -> Result<String, FormatError> {
        let rest = &self.input[self.pos..];
        let Some(len) = rest.iter().position(|&b| b == sep || b == self.record_sep) else {
            self.pos = self.input.len();
            return Err(self.error(FormatErrorKind::UnexpectedEof(sep)));
        };
        if rest[len] != sep {
            self.pos += len;
            return Err(self.error(FormatErrorKind::Missing(sep)));
        }
        let word = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += len + 1;
        Ok(word)
    }
}
