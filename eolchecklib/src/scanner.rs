//! Streaming line ending scanner.
//!
//! Reads a source in fixed-size chunks and folds each chunk into an
//! [`EolStats`] without holding more than one chunk in memory. A CR that ends
//! a chunk is carried over to the next read so a CRLF pair split across two
//! reads is still counted as one CRLF.

use std::io::{ErrorKind, Read};

use crate::eol::{count_eols, EolStats};
use crate::error::EolcheckError;
use crate::source::EolSource;
use crate::Result;

/// Default read size (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Classifies byte streams chunk by chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EolScanner {
    chunk_size: usize,
}

impl Default for EolScanner {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl EolScanner {
    /// Create a scanner with the default chunk size
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bytes requested per read (at least 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The number of bytes requested per read
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Scan `reader` to the end and return its line ending counts.
    ///
    /// Any read error other than `Interrupted` aborts the scan; the counts
    /// gathered so far are dropped.
    pub fn scan<R: Read>(&self, mut reader: R) -> std::io::Result<EolStats> {
        // One extra byte so a carried CR never leaves an empty read window.
        let mut buf = vec![0u8; self.chunk_size + 1];
        let mut stats = EolStats::new();
        let mut keep = 0;

        loop {
            let n = match reader.read(&mut buf[keep..keep + self.chunk_size]) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                // End of input: a carried CR can no longer be half of a pair.
                stats += count_eols(&buf[..keep]);
                return Ok(stats);
            }

            let filled = keep + n;
            let ready = if buf[filled - 1] == b'\r' {
                filled - 1
            } else {
                filled
            };

            let chunk = count_eols(&buf[..ready]);
            tracing::trace!(bytes = ready, ?chunk, "scanned chunk");
            stats += chunk;

            buf.copy_within(ready..filled, 0);
            keep = filled - ready;
        }
    }
}

/// Open `source`, scan it with `scanner`, and release the stream.
pub fn scan_source(scanner: &EolScanner, source: &dyn EolSource) -> Result<EolStats> {
    let reader = source.open()?;
    scanner.scan(reader).map_err(|e| EolcheckError::Read {
        name: source.name().to_string(),
        source: e,
    })
}
