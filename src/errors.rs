use thiserror::Error;

/// Boxed cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable {var} is not set.")]
    MissingCredential { var: String },

    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Prefix '{prefix}' in bucket '{bucket}' matched {count} objects, expected exactly one")]
    AmbiguousMatch {
        bucket: String,
        prefix: String,
        count: usize,
    },

    #[error("{op} failed: {detail}")]
    Transport {
        op: &'static str,
        detail: String,
        #[source]
        source: BoxError,
    },

    #[error("Object body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Model deserialization error: {0}")]
    Deserialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Unsupported read mode: decode={decode}, make_readable={make_readable} (a readable stream requires decoded text)"
    )]
    UnsupportedReadMode { decode: bool, make_readable: bool },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Wrap a lower-level failure raised while running `op`
    pub fn transport<E>(op: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StorageError::Transport {
            op,
            detail: err.to_string(),
            source: Box::new(err),
        }
    }

    pub fn not_found(bucket: &str, key: &str) -> Self {
        StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    /// True for the 404-equivalent case
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_message_names_the_variable() {
        let err = StorageError::MissingCredential {
            var: "AWS_SECRET_ACCESS_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Environment variable AWS_SECRET_ACCESS_KEY is not set."
        );
    }

    #[test]
    fn transport_keeps_the_cause() {
        let err = StorageError::transport(
            "ListObjectsV2",
            std::io::Error::other("connection reset"),
        );
        assert_eq!(err.to_string(), "ListObjectsV2 failed: connection reset");
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_not_found());
    }
}
