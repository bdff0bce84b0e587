//! Storage configuration types.
//!
//! Settings are explicit structs resolved once at load time. [`load`]
//! variants read `DROPBOX_`-prefixed environment variables; every field can
//! also be set or overridden through the builder methods, which take
//! precedence over the environment.
//!
//! [`load`]: StorageConfig::load

use serde::Deserialize;

/// Settings for a personal-account storage backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// OAuth2 access token. Required; backend construction fails without it.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Root path under which all object names are resolved.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl StorageConfig {
    /// Create a config with the given access token and the default root.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            root_path: default_root_path(),
        }
    }

    /// Load from the environment: `DROPBOX_ACCESS_TOKEN`,
    /// `DROPBOX_ROOT_PATH` (default `/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the environment source cannot be read.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("DROPBOX"))
            .build()?
            .try_deserialize()
    }

    /// Override the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the root path.
    #[must_use]
    pub fn with_root_path(mut self, root: impl Into<String>) -> Self {
        self.root_path = root.into();
        self
    }
}

/// Settings for a team-scoped storage backend.
///
/// In addition to the base settings this requires the team folder's
/// namespace id and the member id of a team admin to impersonate.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamStorageConfig {
    /// Team-level OAuth2 access token. Required.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Root path under which all object names are resolved.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Namespace id of the team folder. Required.
    #[serde(default)]
    pub team_namespace: Option<String>,
    /// Member id of the team admin to impersonate. Required.
    #[serde(default)]
    pub team_admin: Option<String>,
}

impl TeamStorageConfig {
    /// Create a config with the given credentials and the default root.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        team_namespace: impl Into<String>,
        team_admin: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            root_path: default_root_path(),
            team_namespace: Some(team_namespace.into()),
            team_admin: Some(team_admin.into()),
        }
    }

    /// Load from the environment: `DROPBOX_ACCESS_TOKEN`,
    /// `DROPBOX_ROOT_PATH`, `DROPBOX_TEAM_NAMESPACE`, `DROPBOX_TEAM_ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment source cannot be read.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("DROPBOX"))
            .build()?
            .try_deserialize()
    }

    /// Override the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the root path.
    #[must_use]
    pub fn with_root_path(mut self, root: impl Into<String>) -> Self {
        self.root_path = root.into();
        self
    }

    /// Override the team namespace id.
    #[must_use]
    pub fn with_team_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.team_namespace = Some(namespace.into());
        self
    }

    /// Override the team admin member id.
    #[must_use]
    pub fn with_team_admin(mut self, admin: impl Into<String>) -> Self {
        self.team_admin = Some(admin.into());
        self
    }
}

fn default_root_path() -> String {
    "/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::new("token");
        assert_eq!(config.access_token.as_deref(), Some("token"));
        assert_eq!(config.root_path, "/");
    }

    #[test]
    fn test_builder_overrides() {
        let config = StorageConfig::new("token")
            .with_root_path("/app/")
            .with_access_token("other");
        assert_eq!(config.access_token.as_deref(), Some("other"));
        assert_eq!(config.root_path, "/app/");
    }

    #[test]
    fn test_load_from_env() {
        temp_env::with_vars(
            [
                ("DROPBOX_ACCESS_TOKEN", Some("env-token")),
                ("DROPBOX_ROOT_PATH", Some("/env/")),
                ("DROPBOX_TEAM_NAMESPACE", Some("12345")),
                ("DROPBOX_TEAM_ADMIN", Some("AAAA1234")),
            ],
            || {
                let config = TeamStorageConfig::load().expect("should load");
                assert_eq!(config.access_token.as_deref(), Some("env-token"));
                assert_eq!(config.root_path, "/env/");
                assert_eq!(config.team_namespace.as_deref(), Some("12345"));
                assert_eq!(config.team_admin.as_deref(), Some("AAAA1234"));
            },
        );
    }

    #[test]
    fn test_load_with_empty_env() {
        temp_env::with_vars(
            [
                ("DROPBOX_ACCESS_TOKEN", None::<&str>),
                ("DROPBOX_ROOT_PATH", None),
            ],
            || {
                let config = StorageConfig::load().expect("should load");
                assert!(config.access_token.is_none());
                assert_eq!(config.root_path, "/");
            },
        );
    }

    #[test]
    fn test_env_then_builder_precedence() {
        temp_env::with_vars([("DROPBOX_ACCESS_TOKEN", Some("env-token"))], || {
            let config = StorageConfig::load()
                .expect("should load")
                .with_access_token("explicit");
            assert_eq!(config.access_token.as_deref(), Some("explicit"));
        });
    }
}
