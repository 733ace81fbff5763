use crate::errors::{Result, StorageError};
use crate::interfaces::ObjectBackend;
use crate::storage::backend::S3Backend;
use crate::storage::bucket::BucketHandle;
use crate::storage::config::StorageConfig;
use crate::storage::connection::{ConnectionHandles, ConnectionProvider};
use crate::storage::models::{ObjectBody, ObjectMatch, ObjectRef, ReadMode};
use crate::table::CsvOptions;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Bucket and object operations used by the pipeline stages
pub struct ObjectStore<B: ObjectBackend = S3Backend> {
    pub(crate) backend: B,
    pub(crate) csv_options: CsvOptions,
}

impl ObjectStore<S3Backend> {
    /// Store over the process-wide connection built from the default configuration
    pub fn from_env() -> Result<Self> {
        Self::shared(&StorageConfig::default())
    }

    /// Store over the process-wide connection, creating it from `config` on first use
    pub fn shared(config: &StorageConfig) -> Result<Self> {
        let handles = ConnectionProvider::shared(config)?;
        Ok(Self::from_handles(handles))
    }

    /// Store over caller-owned handles
    pub fn from_handles(handles: Arc<ConnectionHandles>) -> Self {
        Self::new(S3Backend::new(handles))
    }
}

impl<B: ObjectBackend> ObjectStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            csv_options: CsvOptions::default(),
        }
    }

    /// Replace the options used when parsing CSV objects
    pub fn with_csv_options(mut self, csv_options: CsvOptions) -> Self {
        self.csv_options = csv_options;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn csv_options(&self) -> &CsvOptions {
        &self.csv_options
    }

    /// Whether any object key in `bucket` starts with `prefix`
    pub fn key_exists(&self, bucket: &str, prefix: &str) -> Result<bool> {
        debug!(bucket, prefix, "Checking key path");
        let objects = self.get_bucket(bucket).objects(prefix)?;
        Ok(!objects.is_empty())
    }

    /// Handle scoped to `bucket_name`; existence is not checked
    pub fn get_bucket(&self, bucket_name: &str) -> BucketHandle<'_, B> {
        debug!(bucket = bucket_name, "Getting bucket handle");
        BucketHandle::new(&self.backend, bucket_name)
    }

    /// Objects whose key starts with `filename`
    pub fn get_object(&self, filename: &str, bucket: &str) -> Result<ObjectMatch> {
        debug!(bucket, filename, "Getting file object");
        let objects = self.get_bucket(bucket).objects(filename)?;
        Ok(ObjectMatch::from_listing(objects))
    }

    pub fn read_object(&self, object: &ObjectRef, mode: ReadMode) -> Result<ObjectBody> {
        let bytes = self.backend.get_object(&object.bucket, &object.key)?;
        match mode {
            ReadMode::Raw => Ok(ObjectBody::Bytes(bytes)),
            ReadMode::Text => Ok(ObjectBody::Text(String::from_utf8(bytes)?)),
            ReadMode::Readable => Ok(ObjectBody::Readable(Cursor::new(String::from_utf8(
                bytes,
            )?))),
        }
    }

    /// [`ObjectStore::read_object`] driven by the `decode` / `make_readable` flag pair.
    ///
    /// The flags are checked before any request is made.
    pub fn read_object_with_flags(
        &self,
        object: &ObjectRef,
        decode: bool,
        make_readable: bool,
    ) -> Result<ObjectBody> {
        let mode = ReadMode::from_flags(decode, make_readable)?;
        self.read_object(object, mode)
    }

    /// Create a zero-byte `name/` marker unless `name` or the marker already exists
    pub fn create_folder(&self, name: &str, bucket: &str) -> Result<()> {
        debug!(bucket, name, "Entered create_folder");

        match self.backend.head_object(bucket, name) {
            Ok(_) => return Ok(()),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let marker = format!("{name}/");
        match self.backend.head_object(bucket, &marker) {
            Ok(_) => {
                debug!(bucket, marker = %marker, "Folder marker already present");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.backend.put_object(bucket, &marker, Vec::new())?;
                info!(bucket, marker = %marker, "Created folder");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Upload a local file to `to_key`, deleting the local copy afterwards when `remove` is set.
    ///
    /// The local file is only removed once the upload succeeded.
    pub fn upload_file(
        &self,
        from_path: &Path,
        to_key: &str,
        bucket: &str,
        remove: bool,
    ) -> Result<()> {
        debug!(bucket, to_key, from = %from_path.display(), remove, "Entered upload_file");

        if !from_path.is_file() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Local file does not exist: {}", from_path.display()),
            )));
        }

        self.backend.upload_path(bucket, to_key, from_path)?;

        if remove {
            std::fs::remove_file(from_path)?;
            debug!(path = %from_path.display(), "Removed local file after upload");
        }
        Ok(())
    }
}
