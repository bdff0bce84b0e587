//! Blocking client for the Dropbox file API.

use std::io::Read;

use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{CommitInfo, Metadata, TemporaryLink, UploadCursor, UploadSession};

const API_BASE: &str = "https://api.dropboxapi.com/2";
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

/// The remote file API surface a storage backend consumes.
///
/// Every call is synchronous and single-attempt: no retries, no backoff.
/// Errors are returned exactly as the API reported them.
pub trait FilesApi: Send + Sync {
    /// Fetch metadata for a file or folder, including immediate children
    /// for folders.
    fn get_metadata(&self, path: &str) -> Result<Metadata, ApiError>;

    /// Stream the full content of a file.
    fn download(&self, path: &str) -> Result<Box<dyn Read + Send>, ApiError>;

    /// Upload a payload small enough for a single call, overwriting any
    /// existing object at `path`.
    fn upload(&self, path: &str, data: &[u8]) -> Result<Metadata, ApiError>;

    /// Start a chunked upload session with the first chunk.
    fn upload_session_start(&self, data: &[u8]) -> Result<UploadSession, ApiError>;

    /// Append a chunk to an open session at the cursor's offset.
    fn upload_session_append(&self, data: &[u8], cursor: &UploadCursor) -> Result<(), ApiError>;

    /// Write the final chunk and atomically commit the session to its
    /// destination, closing it.
    fn upload_session_finish(
        &self,
        data: &[u8],
        cursor: &UploadCursor,
        commit: &CommitInfo,
    ) -> Result<Metadata, ApiError>;

    /// Request a temporary, time-limited direct-download link.
    fn get_temporary_link(&self, path: &str) -> Result<TemporaryLink, ApiError>;

    /// Delete a file or folder.
    fn delete(&self, path: &str) -> Result<(), ApiError>;
}

/// Blocking HTTP implementation of [`FilesApi`].
///
/// Credentials are baked into the client as default headers at construction
/// and treated as immutable afterwards. The client is safe to share across
/// threads.
pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    /// Build a client authenticated with a personal access token.
    pub fn new(access_token: &str) -> Result<Self, ApiError> {
        Self::build(access_token, None)
    }

    /// Build a team client scoped to a namespace, acting as a team admin.
    ///
    /// Team tokens cannot touch folders directly: calls must select a user
    /// and a path root. This sets the namespace path-root header and
    /// impersonates `team_admin` (a member id, sent with the `dbmid:`
    /// prefix) so every subsequent call acts as that user inside the team
    /// folder.
    pub fn team(
        access_token: &str,
        team_namespace: &str,
        team_admin: &str,
    ) -> Result<Self, ApiError> {
        Self::build(access_token, Some((team_namespace, team_admin)))
    }

    fn build(access_token: &str, team: Option<(&str, &str)>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {access_token}"))?);

        if let Some((namespace, admin)) = team {
            let path_root =
                json!({".tag": "namespace_id", "namespace_id": namespace}).to_string();
            headers.insert("Dropbox-API-Path-Root", header_value(&path_root)?);
            headers.insert(
                "Dropbox-API-Select-Admin",
                header_value(&format!("dbmid:{admin}"))?,
            );
        }

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http })
    }

    /// POST to an RPC endpoint with a JSON body and decode a JSON response.
    fn rpc<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        debug!(endpoint, path, "rpc call");
        let response = self
            .http
            .post(format!("{API_BASE}{endpoint}"))
            .json(body)
            .send()?;
        decode_json(check_status(response, path)?)
    }

    /// POST to a content endpoint: JSON argument in the `Dropbox-API-Arg`
    /// header, raw bytes in the body.
    fn content(
        &self,
        endpoint: &str,
        arg: &serde_json::Value,
        data: Vec<u8>,
        path: &str,
    ) -> Result<Response, ApiError> {
        debug!(endpoint, path, bytes = data.len(), "content call");
        let response = self
            .http
            .post(format!("{CONTENT_BASE}{endpoint}"))
            .header("Dropbox-API-Arg", header_value(&arg.to_string())?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()?;
        check_status(response, path)
    }
}

impl FilesApi for HttpClient {
    fn get_metadata(&self, path: &str) -> Result<Metadata, ApiError> {
        self.rpc(
            "/files/get_metadata",
            path,
            &json!({"path": path, "include_contents": true}),
        )
    }

    fn download(&self, path: &str) -> Result<Box<dyn Read + Send>, ApiError> {
        let response = self.content("/files/download", &json!({"path": path}), Vec::new(), path)?;
        Ok(Box::new(response))
    }

    fn upload(&self, path: &str, data: &[u8]) -> Result<Metadata, ApiError> {
        let arg = json!({"path": path, "mode": "overwrite"});
        let response = self.content("/files/upload", &arg, data.to_vec(), path)?;
        decode_json(response)
    }

    fn upload_session_start(&self, data: &[u8]) -> Result<UploadSession, ApiError> {
        let response = self.content("/files/upload_session/start", &json!({}), data.to_vec(), "")?;
        decode_json(response)
    }

    fn upload_session_append(&self, data: &[u8], cursor: &UploadCursor) -> Result<(), ApiError> {
        let arg = json!({"cursor": cursor});
        self.content("/files/upload_session/append_v2", &arg, data.to_vec(), "")?;
        Ok(())
    }

    fn upload_session_finish(
        &self,
        data: &[u8],
        cursor: &UploadCursor,
        commit: &CommitInfo,
    ) -> Result<Metadata, ApiError> {
        let arg = json!({
            "cursor": cursor,
            "commit": {"path": commit.path, "mode": "overwrite"},
        });
        let response = self.content(
            "/files/upload_session/finish",
            &arg,
            data.to_vec(),
            &commit.path,
        )?;
        decode_json(response)
    }

    fn get_temporary_link(&self, path: &str) -> Result<TemporaryLink, ApiError> {
        self.rpc("/files/get_temporary_link", path, &json!({"path": path}))
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.rpc("/files/delete_v2", path, &json!({"path": path}))?;
        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|e| ApiError::Configuration(e.to_string()))
}

/// Turn a non-success response into the matching [`ApiError`].
fn check_status(response: Response, path: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::from_response(
        status.as_u16(),
        error_summary(&body),
        path,
    ))
}

fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_summary: String,
}

/// Extract the API's `error_summary` from an error body, falling back to
/// the raw body for non-JSON responses.
fn error_summary(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error_summary.is_empty() => parsed.error_summary,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_summary_from_json_body() {
        let body = r#"{"error_summary": "path/not_found/..", "error": {".tag": "path"}}"#;
        assert_eq!(error_summary(body), "path/not_found/..");
    }

    #[test]
    fn test_error_summary_falls_back_to_raw_body() {
        assert_eq!(error_summary("  Bad gateway\n"), "Bad gateway");
        assert_eq!(error_summary(r#"{"other": 1}"#), r#"{"other": 1}"#);
    }

    #[test]
    fn test_team_headers_are_valid() {
        // Construction fails fast on credentials that cannot form headers.
        assert!(HttpClient::team("token", "12345", "AAAA").is_ok());
        assert!(HttpClient::new("bad\ntoken").is_err());
    }
}
