//! Dropbox backend for a generic pluggable storage interface.
//!
//! [`DropboxStorage`] translates the [`Storage`] contract (open, save,
//! delete, exists, listdir, size, timestamps, URL generation) into calls
//! against the remote Dropbox file API. All object names are resolved under
//! a configured root path with traversal-safe join semantics, and payloads
//! larger than 4 MiB are transmitted through a chunked upload session.
//!
//! The adapter is a thin translation shim: synchronous, single-attempt,
//! with no caching and no retry policy. Whatever the remote API reports is
//! surfaced to the caller, with one exception: `exists` maps a not-found
//! answer to `false` instead of an error.
//!
//! # Example
//!
//! ```no_run
//! use dbx_storage::{Content, DropboxStorage, Storage, StorageConfig};
//!
//! # fn main() -> Result<(), dbx_storage::StorageError> {
//! let storage = DropboxStorage::new(
//!     StorageConfig::new("oauth2-token").with_root_path("/app-data/"),
//! )?;
//! storage.save("reports/q1.csv", Content::from_bytes("a,b,c\n"))?;
//! assert!(storage.exists("reports/q1.csv")?);
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod contract;
mod error;
mod file;
mod path;

pub use backend::{CHUNK_SIZE, DropboxStorage};
pub use config::{StorageConfig, TeamStorageConfig};
pub use contract::{Content, Storage};
pub use error::StorageError;
pub use file::RemoteFile;
