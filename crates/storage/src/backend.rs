//! Dropbox adapter for the generic storage contract.

use std::fmt;
use std::io;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dbx_client::{CommitInfo, FilesApi, HttpClient, Metadata, UploadCursor};
use tracing::{debug, info};

use crate::config::{StorageConfig, TeamStorageConfig};
use crate::contract::{Content, Storage};
use crate::error::StorageError;
use crate::file::RemoteFile;
use crate::path::resolve_path;

/// Boundary between single-shot and session-based uploads: 4 MiB.
pub const CHUNK_SIZE: u64 = 4 * 1024 * 1024;

/// Timestamp format the remote API reports, e.g.
/// `Mon, 01 Jan 2024 12:00:00 +0000`.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Storage backend over a remote Dropbox folder.
///
/// Every operation resolves its name under the configured root path and
/// issues one or more blocking API calls. The backend holds no mutable
/// state after construction and no cache; concurrent use is as safe as the
/// underlying client.
pub struct DropboxStorage<C = HttpClient> {
    client: Arc<C>,
    root_path: String,
}

impl<C> fmt::Debug for DropboxStorage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The client carries credentials in its headers; keep it out of
        // debug output.
        f.debug_struct("DropboxStorage")
            .field("root_path", &self.root_path)
            .finish_non_exhaustive()
    }
}

impl DropboxStorage<HttpClient> {
    /// Build a backend from personal-account settings.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the access token is
    /// missing or the client cannot be constructed from it.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let token = config.access_token.ok_or_else(|| {
            StorageError::configuration("access token is required (set DROPBOX_ACCESS_TOKEN)")
        })?;
        let client =
            HttpClient::new(&token).map_err(|e| StorageError::configuration(e.to_string()))?;
        Ok(Self::with_client(client, config.root_path))
    }

    /// Build a backend for a team account.
    ///
    /// Authenticates with the team token, scopes all paths to the team
    /// namespace, and impersonates the configured admin. Every operation
    /// behaves exactly as on a personal backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the access token, team
    /// namespace, or team admin is missing.
    pub fn team(config: TeamStorageConfig) -> Result<Self, StorageError> {
        let token = config.access_token.ok_or_else(|| {
            StorageError::configuration("access token is required (set DROPBOX_ACCESS_TOKEN)")
        })?;
        let namespace = config.team_namespace.ok_or_else(|| {
            StorageError::configuration("team namespace is required (set DROPBOX_TEAM_NAMESPACE)")
        })?;
        let admin = config.team_admin.ok_or_else(|| {
            StorageError::configuration("team admin is required (set DROPBOX_TEAM_ADMIN)")
        })?;
        let client = HttpClient::team(&token, &namespace, &admin)
            .map_err(|e| StorageError::configuration(e.to_string()))?;
        Ok(Self::with_client(client, config.root_path))
    }
}

impl<C: FilesApi> DropboxStorage<C> {
    /// Build a backend over an already-constructed API client.
    #[must_use]
    pub fn with_client(client: C, root_path: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            root_path: root_path.into(),
        }
    }

    /// The configured root path.
    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    fn resolve(&self, name: &str) -> Result<String, StorageError> {
        resolve_path(&self.root_path, name)
    }

    fn metadata(&self, name: &str) -> Result<Metadata, StorageError> {
        Ok(self.client.get_metadata(&self.resolve(name)?)?)
    }

    /// Transmit `content` through an upload session.
    ///
    /// The first chunk opens the session; the cursor's offset tracks bytes
    /// read from the source. The final chunk - the one leaving no more than
    /// one chunk size unread, including an exact multiple of the chunk size
    /// - finishes the session and commits the destination atomically.
    fn chunked_upload(&self, content: &mut Content, dest_path: &str) -> Result<(), StorageError> {
        let total = content.size();
        info!(path = dest_path, total, "starting chunked upload");

        let first = content.read_chunk(CHUNK_SIZE)?;
        let session = self.client.upload_session_start(&first)?;
        let mut cursor = UploadCursor {
            session_id: session.session_id,
            offset: first.len() as u64,
        };
        let commit = CommitInfo {
            path: dest_path.to_string(),
        };

        while cursor.offset < total {
            let remaining = total - cursor.offset;
            let chunk = content.read_chunk(CHUNK_SIZE)?;
            if chunk.is_empty() {
                // A stream shorter than its declared size would otherwise
                // re-send the final call forever at a stuck offset.
                let err = io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "content stream ended at {} of {total} declared bytes",
                        cursor.offset
                    ),
                );
                return Err(err.into());
            }
            if remaining <= CHUNK_SIZE {
                self.client.upload_session_finish(&chunk, &cursor, &commit)?;
            } else {
                self.client.upload_session_append(&chunk, &cursor)?;
            }
            cursor.offset += chunk.len() as u64;
            debug!(session = %cursor.session_id, offset = cursor.offset, "chunk transmitted");
        }
        Ok(())
    }
}

impl<C: FilesApi> Storage for DropboxStorage<C> {
    type File = RemoteFile<C>;

    fn open(&self, name: &str, mode: &str) -> Result<Self::File, StorageError> {
        debug!(name, mode, "opening remote object");
        Ok(RemoteFile::new(
            self.resolve(name)?,
            Arc::clone(&self.client),
        ))
    }

    fn save(&self, name: &str, mut content: Content) -> Result<String, StorageError> {
        let dest_path = self.resolve(name)?;
        if content.size() <= CHUNK_SIZE {
            let data = content.read_chunk(content.size())?;
            self.client.upload(&dest_path, &data)?;
        } else {
            self.chunked_upload(&mut content, &dest_path)?;
        }
        Ok(name.to_string())
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        Ok(self.client.delete(&self.resolve(name)?)?)
    }

    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.client.get_metadata(&self.resolve(name)?) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn listdir(&self, path: &str) -> Result<(Vec<String>, Vec<String>), StorageError> {
        let full_path = self.resolve(path)?;
        let metadata = self.client.get_metadata(&full_path)?;

        let mut directories = Vec::new();
        let mut files = Vec::new();
        for entry in metadata.contents {
            let child = entry
                .path
                .strip_prefix(full_path.as_str())
                .unwrap_or(entry.path.as_str());
            let child = child.strip_prefix('/').unwrap_or(child).to_string();
            if entry.is_dir {
                directories.push(child);
            } else {
                files.push(child);
            }
        }
        Ok((directories, files))
    }

    fn size(&self, name: &str) -> Result<u64, StorageError> {
        Ok(self.metadata(name)?.bytes)
    }

    fn modified_time(&self, name: &str) -> Result<DateTime<Utc>, StorageError> {
        let metadata = self.metadata(name)?;
        parse_timestamp(metadata.modified.as_deref(), "modified", &metadata.path)
    }

    fn accessed_time(&self, name: &str) -> Result<DateTime<Utc>, StorageError> {
        let metadata = self.metadata(name)?;
        parse_timestamp(
            metadata.client_mtime.as_deref(),
            "client_mtime",
            &metadata.path,
        )
    }

    fn url(&self, name: &str) -> Result<String, StorageError> {
        Ok(self.client.get_temporary_link(&self.resolve(name)?)?.link)
    }
}

/// Parse a server-reported timestamp in the fixed [`DATE_FORMAT`].
///
/// A missing field is a boundary error, not a default.
fn parse_timestamp(
    value: Option<&str>,
    field: &'static str,
    path: &str,
) -> Result<DateTime<Utc>, StorageError> {
    let raw = value.ok_or_else(|| StorageError::MissingMetadata {
        path: path.to_string(),
        field,
    })?;
    Ok(DateTime::parse_from_str(raw, DATE_FORMAT)?.with_timezone(&Utc))
}
