//! Lazy read handle over a remote object.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use dbx_client::FilesApi;
use tempfile::SpooledTempFile;
use tracing::debug;

use crate::error::StorageError;

/// Bytes held in memory before the buffer spills to disk.
const SPOOL_THRESHOLD: usize = 4 * 1024 * 1024;

/// Read handle for a remote object.
///
/// The object's bytes are downloaded on first read into a spooled temporary
/// buffer, rewound, and reused for the lifetime of the handle; no
/// re-download occurs. Download errors (including object-not-found)
/// propagate to the caller of the read.
pub struct RemoteFile<C> {
    path: String,
    client: Arc<C>,
    buffer: Option<SpooledTempFile>,
}

impl<C: FilesApi> RemoteFile<C> {
    pub(crate) fn new(path: String, client: Arc<C>) -> Self {
        Self {
            path,
            client,
            buffer: None,
        }
    }

    /// Resolved absolute path of the remote object.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Materialize the buffer, downloading the object on first access.
    ///
    /// Moving the spool through the slot preserves its read position.
    fn buffer(&mut self) -> Result<&mut SpooledTempFile, StorageError> {
        let spool = match self.buffer.take() {
            Some(spool) => spool,
            None => {
                debug!(path = %self.path, "downloading remote object");
                let mut body = self.client.download(&self.path)?;
                let mut spool = SpooledTempFile::new(SPOOL_THRESHOLD);
                io::copy(&mut body, &mut spool)?;
                spool.rewind()?;
                spool
            }
        };
        Ok(self.buffer.insert(spool))
    }
}

impl<C: FilesApi> Read for RemoteFile<C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buffer().map_err(io::Error::other)?.read(buf)
    }
}

impl<C: FilesApi> Seek for RemoteFile<C> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buffer().map_err(io::Error::other)?.seek(pos)
    }
}
