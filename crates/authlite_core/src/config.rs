//! Identity service client configuration.
//!
//! # Responsibility
//! - Hold the fixed endpoint and project identifier for the identity service.
//! - Validate them once via [`ClientConfig::setup`], producing the immutable
//!   [`AuthClient`] that gateways are built from.
//!
//! # Invariants
//! - An `AuthClient` always carries an absolute `http(s)` endpoint without a
//!   trailing slash and a non-empty project id.
//! - Configuration is passed explicitly; nothing here is process-global.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_PROJECT_ID: &str = "6694f179000fe9302ee5";

pub const ENDPOINT_ENV: &str = "AUTHLITE_ENDPOINT";
pub const PROJECT_ID_ENV: &str = "AUTHLITE_PROJECT_ID";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidEndpoint(String),
    EmptyProjectId,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEndpoint(value) => {
                write!(f, "endpoint must be an absolute http(s) URL, got `{value}`")
            }
            Self::EmptyProjectId => write!(f, "project id cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Unvalidated identity service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub project_id: String,
    /// Per-request timeout; `None` disables it.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `AUTHLITE_ENDPOINT` / `AUTHLITE_PROJECT_ID`
    /// when those are set and non-blank.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(endpoint) = non_blank_env(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Some(project_id) = non_blank_env(PROJECT_ID_ENV) {
            config.project_id = project_id;
        }
        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// One-time setup: validates and freezes the configuration.
    pub fn setup(self) -> Result<AuthClient, ConfigError> {
        let endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        let has_scheme = ["https://", "http://"]
            .iter()
            .any(|scheme| endpoint.len() > scheme.len() && endpoint.starts_with(scheme));
        if !has_scheme {
            return Err(ConfigError::InvalidEndpoint(self.endpoint));
        }

        let project_id = self.project_id.trim().to_string();
        if project_id.is_empty() {
            return Err(ConfigError::EmptyProjectId);
        }

        Ok(AuthClient {
            endpoint,
            project_id,
            timeout: self.timeout,
        })
    }
}

/// Validated, immutable identity service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClient {
    endpoint: String,
    project_id: String,
    timeout: Option<Duration>,
}

impl AuthClient {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Joins `path` (with leading slash) onto the endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
