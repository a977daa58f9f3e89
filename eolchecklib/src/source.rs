//! Named byte sources: the files a check is run over.
//!
//! A source has a display name, a content hash, and can be opened any number
//! of times for a fresh reader. The reader is released when it is dropped,
//! which happens on every exit path of a scan.

use std::io::{Cursor, Read};

use crate::Result;

/// A named, hashed piece of content that can be read from the start.
pub trait EolSource {
    /// Display name (usually a repository-relative path)
    fn name(&self) -> &str;

    /// Content hash identifying the bytes behind this source
    fn hash(&self) -> &str;

    /// Open a fresh reader over the content
    fn open(&self) -> Result<Box<dyn Read + '_>>;
}

/// A source whose content is already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    name: String,
    hash: String,
    content: Vec<u8>,
}

impl MemorySource {
    /// Create a new in-memory source
    pub fn new(name: impl Into<String>, hash: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
            content,
        }
    }

    /// The bytes this source serves
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl EolSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn hash(&self) -> &str {
        &self.hash
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.content.as_slice())))
    }
}

impl<S: EolSource + ?Sized> EolSource for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn hash(&self) -> &str {
        (**self).hash()
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        (**self).open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_identity() {
        let source = MemorySource::new("src/main.c", "deadbeef", b"int x;\n".to_vec());
        assert_eq!(source.name(), "src/main.c");
        assert_eq!(source.hash(), "deadbeef");
        assert_eq!(source.content(), b"int x;\n");
    }

    #[test]
    fn test_memory_source_opens_fresh_readers() {
        let source = MemorySource::new("a.txt", "0", b"abc".to_vec());

        let mut first = String::new();
        source.open().unwrap().read_to_string(&mut first).unwrap();
        let mut second = String::new();
        source.open().unwrap().read_to_string(&mut second).unwrap();

        assert_eq!(first, "abc");
        assert_eq!(second, "abc");
    }
}
