//! The generic pluggable storage contract.

use std::io::{self, Read};

use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// An upload payload: a content stream with a known total size.
///
/// The declared size governs the upload strategy (single-shot vs chunked)
/// and how many bytes are read from the stream. The stream is owned and
/// closed on drop, on every exit path.
pub struct Content {
    reader: Box<dyn Read + Send>,
    size: u64,
}

impl Content {
    /// Wrap an owned byte buffer.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let size = bytes.len() as u64;
        Self {
            reader: Box::new(io::Cursor::new(bytes)),
            size,
        }
    }

    /// Wrap an arbitrary reader with a declared total size in bytes.
    #[must_use]
    pub fn from_reader(reader: impl Read + Send + 'static, size: u64) -> Self {
        Self {
            reader: Box::new(reader),
            size,
        }
    }

    /// Total size of the content in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read up to `limit` bytes from the stream.
    pub(crate) fn read_chunk(&mut self, limit: u64) -> io::Result<Vec<u8>> {
        let mut chunk = Vec::new();
        self.reader.by_ref().take(limit).read_to_end(&mut chunk)?;
        Ok(chunk)
    }
}

/// Generic storage interface a web application plugs file backends into.
///
/// `name` arguments are backend-relative; each implementation resolves them
/// against its own root. Listing is shallow: `listdir` reports immediate
/// children only.
pub trait Storage {
    /// Read handle type returned by [`Storage::open`].
    type File: Read;

    /// Open the object at `name` for reading.
    ///
    /// `mode` is accepted for interface compatibility; backends may ignore
    /// it and always provide default read semantics.
    fn open(&self, name: &str, mode: &str) -> Result<Self::File, StorageError>;

    /// Save `content` under `name`, returning the name the object was
    /// actually saved as.
    fn save(&self, name: &str, content: Content) -> Result<String, StorageError>;

    /// Delete the object at `name`.
    fn delete(&self, name: &str) -> Result<(), StorageError>;

    /// Whether an object exists at `name`.
    fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// List the immediate children of `path` as `(directories, files)`.
    fn listdir(&self, path: &str) -> Result<(Vec<String>, Vec<String>), StorageError>;

    /// Size in bytes of the object at `name`.
    fn size(&self, name: &str) -> Result<u64, StorageError>;

    /// Server-reported modification time of the object at `name`.
    fn modified_time(&self, name: &str) -> Result<DateTime<Utc>, StorageError>;

    /// Client-reported modification time of the object at `name`.
    fn accessed_time(&self, name: &str) -> Result<DateTime<Utc>, StorageError>;

    /// A temporary, time-limited direct-download URL for `name`.
    fn url(&self, name: &str) -> Result<String, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_from_bytes_knows_its_size() {
        let mut content = Content::from_bytes(vec![7u8; 10]);
        assert_eq!(content.size(), 10);
        let chunk = content.read_chunk(4).expect("readable");
        assert_eq!(chunk, vec![7u8; 4]);
        let rest = content.read_chunk(100).expect("readable");
        assert_eq!(rest.len(), 6);
    }

    #[test]
    fn test_content_from_reader_uses_declared_size() {
        let content = Content::from_reader(io::Cursor::new(vec![0u8; 3]), 3);
        assert_eq!(content.size(), 3);
    }

    #[test]
    fn test_read_chunk_on_exhausted_stream_is_empty() {
        let mut content = Content::from_bytes(Vec::new());
        assert!(content.read_chunk(4).expect("readable").is_empty());
    }
}
