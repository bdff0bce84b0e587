//! Typed, blocking HTTP bindings for the Dropbox file API.
//!
//! This crate covers exactly the surface a storage backend needs:
//! metadata fetch, content download, single-shot upload, session-based
//! chunked upload, delete, and temporary-link generation. The surface is
//! expressed as the [`FilesApi`] trait so consumers can substitute a mock;
//! [`HttpClient`] is the production implementation.
//!
//! Team accounts are supported through [`HttpClient::team`], which scopes
//! every call to a team namespace and impersonates a team admin. The
//! resulting client behaves identically to a personal one, so callers never
//! need to distinguish the two.

mod client;
mod error;
mod types;

pub use client::{FilesApi, HttpClient};
pub use error::ApiError;
pub use types::{CommitInfo, Metadata, TemporaryLink, UploadCursor, UploadSession};
