//! Wire types for the Dropbox file API.

use serde::{Deserialize, Serialize};

/// Metadata for a file or folder as reported by the remote API.
///
/// Timestamp fields are carried as raw strings in the server's fixed
/// format (`Mon, 01 Jan 2024 12:00:00 +0000`); parsing is the consumer's
/// responsibility so that malformed data fails at the point of use.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Absolute path of the entry.
    pub path: String,
    /// Size in bytes. Zero for folders.
    #[serde(default)]
    pub bytes: u64,
    /// Whether the entry is a folder.
    #[serde(default)]
    pub is_dir: bool,
    /// Server-reported modification timestamp. Absent for folders.
    #[serde(default)]
    pub modified: Option<String>,
    /// Client-reported modification timestamp. Absent for folders.
    #[serde(default)]
    pub client_mtime: Option<String>,
    /// Immediate children when the entry is a folder.
    #[serde(default)]
    pub contents: Vec<Metadata>,
}

/// A temporary, time-limited direct-download link.
#[derive(Debug, Clone, Deserialize)]
pub struct TemporaryLink {
    /// The direct-download URL.
    pub link: String,
}

/// Handle for an in-progress chunked upload, assigned by the remote API.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSession {
    /// Session identifier.
    pub session_id: String,
}

/// Position within an upload session.
///
/// The offset must always equal the number of bytes already transmitted;
/// the remote API rejects appends at any other position.
#[derive(Debug, Clone, Serialize)]
pub struct UploadCursor {
    /// Session identifier from [`UploadSession`].
    pub session_id: String,
    /// Bytes transmitted so far.
    pub offset: u64,
}

/// Destination descriptor for finishing an upload session.
///
/// Committing creates the object at `path`, overwriting any existing one,
/// in a single atomic step.
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    /// Absolute destination path.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_deserializes_folder_with_contents() {
        let json = r#"{
            "path": "/a",
            "is_dir": true,
            "contents": [
                {"path": "/a/b.txt", "bytes": 12, "is_dir": false,
                 "modified": "Mon, 01 Jan 2024 12:00:00 +0000",
                 "client_mtime": "Mon, 01 Jan 2024 11:59:00 +0000"},
                {"path": "/a/c", "is_dir": true}
            ]
        }"#;

        let metadata: Metadata = serde_json::from_str(json).expect("valid metadata");
        assert!(metadata.is_dir);
        assert_eq!(metadata.bytes, 0);
        assert!(metadata.modified.is_none());
        assert_eq!(metadata.contents.len(), 2);
        assert_eq!(metadata.contents[0].path, "/a/b.txt");
        assert_eq!(metadata.contents[0].bytes, 12);
        assert!(metadata.contents[1].is_dir);
    }

    #[test]
    fn test_cursor_serializes_for_api_arg() {
        let cursor = UploadCursor {
            session_id: "sid-1".to_string(),
            offset: 4_194_304,
        };
        let value = serde_json::to_value(&cursor).expect("serializable");
        assert_eq!(value["session_id"], "sid-1");
        assert_eq!(value["offset"], 4_194_304);
    }
}
