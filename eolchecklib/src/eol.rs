//! Byte-level line ending classification.
//!
//! A window of bytes is split into [`Token`]s: one line terminator, one NUL
//! byte, or a maximal run of bytes that are neither. Folding the tokens of a
//! window gives an [`EolStats`].
//!
//! The functions here see a single window only. A CR that ends a window is
//! counted as a bare CR even if the next window starts with LF; the
//! [`EolScanner`](crate::scanner::EolScanner) keeps such a CR back until it
//! knows what follows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const NUL: u8 = 0;

/// Split `window` into its first token and the remaining bytes.
///
/// The token is either a single terminator (`\r`, `\n`, `\r\n`), a single NUL
/// byte, or the longest run of bytes containing none of those. An empty
/// window yields an empty token and an empty rest.
pub fn split_eol(window: &[u8]) -> (&[u8], &[u8]) {
    match window {
        [] => (window, window),
        [LF | NUL, ..] => window.split_at(1),
        [CR, LF, ..] => window.split_at(2),
        [CR, ..] => window.split_at(1),
        _ => {
            let end = window
                .iter()
                .position(|&b| b == CR || b == LF || b == NUL)
                .unwrap_or(window.len());
            window.split_at(end)
        }
    }
}

/// One token produced by [`split_eol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A bare carriage return
    Cr,
    /// A carriage return followed by a line feed
    CrLf,
    /// A bare line feed
    Lf,
    /// A single NUL byte
    Nul,
    /// A run of bytes containing no CR, LF, or NUL
    Text(&'a [u8]),
}

impl<'a> Token<'a> {
    /// Classify a token slice returned by [`split_eol`].
    pub fn classify(part: &'a [u8]) -> Self {
        match part {
            [CR, LF] => Token::CrLf,
            [CR] => Token::Cr,
            [LF] => Token::Lf,
            [NUL] => Token::Nul,
            _ => Token::Text(part),
        }
    }

    /// The bytes this token covers.
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Token::Cr => b"\r",
            Token::CrLf => b"\r\n",
            Token::Lf => b"\n",
            Token::Nul => b"\0",
            Token::Text(bytes) => bytes,
        }
    }
}

/// Iterator over the tokens of a window.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a [u8],
}

/// Iterate over the tokens of `window`, in order.
pub fn tokens(window: &[u8]) -> Tokens<'_> {
    Tokens { rest: window }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let (part, rest) = split_eol(self.rest);
        self.rest = rest;
        Some(Token::classify(part))
    }
}

/// Line ending counts for one file (or one window of it).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EolStats {
    /// Bare carriage returns
    pub cr: u64,
    /// Carriage return + line feed pairs
    pub crlf: u64,
    /// Bare line feeds
    pub lf: u64,
    /// NUL bytes
    pub nul: u64,
}

impl EolStats {
    /// Create a new EolStats with all zeros
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the content contains a NUL byte.
    pub fn is_binary(&self) -> bool {
        self.nul != 0
    }

    /// True if more than one kind of terminator occurs.
    pub fn is_mixed(&self) -> bool {
        [self.cr, self.crlf, self.lf]
            .iter()
            .filter(|&&n| n != 0)
            .count()
            > 1
    }

    /// True if no terminator other than CR occurs.
    ///
    /// Content without any terminator is pure CR, pure CRLF and pure LF at
    /// the same time.
    pub fn is_cr(&self) -> bool {
        self.crlf == 0 && self.lf == 0
    }

    /// True if no terminator other than CRLF occurs.
    pub fn is_crlf(&self) -> bool {
        self.cr == 0 && self.lf == 0
    }

    /// True if no terminator other than LF occurs.
    pub fn is_lf(&self) -> bool {
        self.cr == 0 && self.crlf == 0
    }

    /// Fold one token into the counts.
    pub fn record(&mut self, token: Token<'_>) {
        match token {
            Token::Cr => self.cr += 1,
            Token::CrLf => self.crlf += 1,
            Token::Lf => self.lf += 1,
            Token::Nul => self.nul += 1,
            Token::Text(_) => {}
        }
    }
}

/// Count the terminators and NUL bytes in a single window.
pub fn count_eols(window: &[u8]) -> EolStats {
    let mut stats = EolStats::new();
    for token in tokens(window) {
        stats.record(token);
    }
    stats
}

impl Add for EolStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            cr: self.cr + other.cr,
            crlf: self.crlf + other.crlf,
            lf: self.lf + other.lf,
            nul: self.nul + other.nul,
        }
    }
}

impl AddAssign for EolStats {
    fn add_assign(&mut self, other: Self) {
        self.cr += other.cr;
        self.crlf += other.crlf;
        self.lf += other.lf;
        self.nul += other.nul;
    }
}

impl fmt::Display for EolStats {
    /// `binary` if any NUL was seen, otherwise the terminator kinds present,
    /// space separated, in the order CR, CRLF, LF.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_binary() {
            return f.write_str("binary");
        }
        let kinds: Vec<&str> = [(self.cr, "CR"), (self.crlf, "CRLF"), (self.lf, "LF")]
            .into_iter()
            .filter(|(n, _)| *n != 0)
            .map(|(_, name)| name)
            .collect();
        f.write_str(&kinds.join(" "))
    }
}
