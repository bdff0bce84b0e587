//! Dropbox API error types.

use thiserror::Error;

/// Errors from the remote file API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested path does not exist.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: String,
    },

    /// The API rejected the call.
    #[error("api error (status {status}): {summary}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// The API's `error_summary`, or the raw body when none was given.
        summary: String,
    },

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client could not be constructed from the given credentials.
    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Whether this error means the requested path does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Classify an HTTP error response.
    ///
    /// The API signals a missing path either as a plain 404 or as a 409
    /// whose `error_summary` starts with a `path/not_found` or
    /// `path_lookup/not_found` tag.
    pub(crate) fn from_response(status: u16, summary: String, path: &str) -> Self {
        let not_found_summary = summary.starts_with("path/not_found")
            || summary.starts_with("path_lookup/not_found");
        if status == 404 || (status == 409 && not_found_summary) {
            Self::NotFound {
                path: path.to_string(),
            }
        } else {
            Self::Api { status, summary }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(404, "", true)]
    #[case(409, "path/not_found/..", true)]
    #[case(409, "path_lookup/not_found/.", true)]
    #[case(409, "path/conflict/file/..", false)]
    #[case(401, "invalid_access_token/...", false)]
    #[case(429, "too_many_requests/..", false)]
    #[case(500, "", false)]
    fn test_not_found_classification(
        #[case] status: u16,
        #[case] summary: &str,
        #[case] expect_not_found: bool,
    ) {
        let err = ApiError::from_response(status, summary.to_string(), "/a/b.txt");
        assert_eq!(err.is_not_found(), expect_not_found);
    }

    #[test]
    fn test_not_found_carries_path() {
        let err = ApiError::from_response(409, "path/not_found/".to_string(), "/missing.txt");
        assert_eq!(err.to_string(), "path not found: /missing.txt");
    }

    #[test]
    fn test_api_error_carries_status_and_summary() {
        let err = ApiError::from_response(401, "invalid_access_token/".to_string(), "/x");
        assert_eq!(
            err.to_string(),
            "api error (status 401): invalid_access_token/"
        );
    }
}
