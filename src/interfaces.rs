use crate::errors::Result;
use crate::storage::models::ObjectRef;
use mockall::automock;
use std::path::Path;

/// Low-level object storage calls that `ObjectStore` is layered on, split out to facilitate testing
#[automock]
pub trait ObjectBackend {
    /// List every object in `bucket` whose key starts with `prefix`
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectRef>>;
    /// Fetch object metadata; a missing key is `StorageError::NotFound`
    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectRef>;
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
    fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
    /// Upload the file at `path` without loading it into memory first
    fn upload_path(&self, bucket: &str, key: &str, path: &Path) -> Result<()>;
}
