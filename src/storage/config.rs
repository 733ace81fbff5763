use crate::constants;
use crate::errors::{Result, StorageError};
use std::fmt;

/// Configuration for the S3-compatible connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub endpoint_url: String,
    pub region: String,
    /// Name of the environment variable holding the access key ID
    pub access_key_var: String,
    /// Name of the environment variable holding the secret access key
    pub secret_key_var: String,
    pub force_path_style: bool,
    /// Total attempts per request, 1 disables retries
    pub max_attempts: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint_url: constants::ENDPOINT_URL.to_string(),
            region: constants::ENDPOINT_REGION.to_string(),
            access_key_var: constants::AWS_ACCESS_KEY_ID_ENV_KEY.to_string(),
            secret_key_var: constants::AWS_SECRET_ACCESS_KEY_ENV_KEY.to_string(),
            force_path_style: false,
            max_attempts: 1,
        }
    }
}

impl StorageConfig {
    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Reject values the SDK would only fail on at request time
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint_url.starts_with("https://") || self.endpoint_url.starts_with("http://"))
        {
            return Err(StorageError::Configuration(format!(
                "Endpoint URL must start with http:// or https://, got '{}'",
                self.endpoint_url
            )));
        }
        if self.region.trim().is_empty() {
            return Err(StorageError::Configuration(
                "Region must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Access key pair read from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl StaticCredentials {
    /// Read both variables named by `config` through `lookup`.
    ///
    /// The access key ID is checked first, so when both are missing the error names
    /// the access key variable.
    pub fn from_lookup<F>(config: &StorageConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id =
            lookup(&config.access_key_var).ok_or_else(|| StorageError::MissingCredential {
                var: config.access_key_var.clone(),
            })?;
        let secret_access_key =
            lookup(&config.secret_key_var).ok_or_else(|| StorageError::MissingCredential {
                var: config.secret_key_var.clone(),
            })?;

        Ok(Self {
            access_key_id,
            secret_access_key,
        })
    }

    pub fn from_env(config: &StorageConfig) -> Result<Self> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field(
                "access_key_id",
                &format!(
                    "{}****",
                    self.access_key_id.chars().take(4).collect::<String>()
                ),
            )
            .field("secret_access_key", &"****")
            .finish()
    }
}
