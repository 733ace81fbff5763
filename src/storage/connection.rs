use crate::errors::{Result, StorageError};
use crate::storage::config::{StaticCredentials, StorageConfig};
use aws_config::retry::RetryConfig;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use once_cell::sync::OnceCell;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

static SHARED_HANDLES: OnceCell<Arc<ConnectionHandles>> = OnceCell::new();

/// Client handle plus the runtime that drives it, built from one set of credentials
pub struct ConnectionHandles {
    client: Client,
    runtime: tokio::runtime::Runtime,
    endpoint_url: String,
}

impl ConnectionHandles {
    /// Build a fresh pair from the credential variables named in `config`
    pub fn connect(config: &StorageConfig) -> Result<Self> {
        Self::connect_with(config, |name| std::env::var(name).ok())
    }

    /// Like [`ConnectionHandles::connect`], with the variable lookup supplied by the caller
    pub fn connect_with<F>(config: &StorageConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = StaticCredentials::from_lookup(config, lookup)?;
        Self::from_credentials(config, &credentials)
    }

    pub fn from_credentials(config: &StorageConfig, credentials: &StaticCredentials) -> Result<Self> {
        Self::from_credentials_with(config, credentials, |builder| builder)
    }

    /// Like [`ConnectionHandles::from_credentials`], letting `customize` adjust the SDK
    /// config (HTTP client, timeouts) before the client is built
    pub fn from_credentials_with<F>(
        config: &StorageConfig,
        credentials: &StaticCredentials,
        customize: F,
    ) -> Result<Self>
    where
        F: FnOnce(aws_sdk_s3::config::Builder) -> aws_sdk_s3::config::Builder,
    {
        config.validate()?;

        // Reused for every request made through these handles
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| StorageError::Configuration(format!("Failed to create runtime: {e}")))?;

        debug!(
            endpoint = %config.endpoint_url,
            region = %config.region,
            path_style = config.force_path_style,
            credentials = ?credentials,
            "Creating S3-compatible client"
        );

        let s3_config = runtime.block_on(async {
            let sdk_credentials = Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None, // No session token
                None, // No expiry
                "PipelineStaticCredentials",
            );

            let builder = aws_sdk_s3::Config::builder()
                .region(Region::new(config.region.clone()))
                .endpoint_url(config.endpoint_url.clone())
                .credentials_provider(sdk_credentials)
                .force_path_style(config.force_path_style)
                .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts.max(1)))
                .behavior_version(BehaviorVersion::latest());
            customize(builder).build()
        });

        Ok(Self {
            client: Client::from_conf(s3_config),
            runtime,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Run an SDK future to completion on the handles' runtime.
    ///
    /// Must not be called from inside another tokio runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Process-wide access to one shared [`ConnectionHandles`]
pub struct ConnectionProvider;

impl ConnectionProvider {
    /// Return the shared handles, building them on first use.
    ///
    /// Later calls return the same `Arc` without touching the environment. A failed
    /// first attempt leaves the cell empty, so the next call tries again.
    pub fn shared(config: &StorageConfig) -> Result<Arc<ConnectionHandles>> {
        SHARED_HANDLES
            .get_or_try_init(|| {
                info!(endpoint = %config.endpoint_url, "Connecting to object storage");
                ConnectionHandles::connect(config).map(Arc::new)
            })
            .map(Arc::clone)
    }

    pub fn is_initialized() -> bool {
        SHARED_HANDLES.get().is_some()
    }
}
