use crate::errors::{Result, StorageError};
use crate::interfaces::ObjectBackend;
use crate::storage::models::ObjectRef;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory [`ObjectBackend`] for exercising `ObjectStore` without a network.
///
/// Keys are kept sorted per bucket, so listings come back in the same order S3 uses.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    puts: Mutex<Vec<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<(String, String), Vec<u8>>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_put(&self, bucket: &str, key: &str) {
        self.puts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{bucket}/{key}"));
    }

    /// Seed an object directly
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.objects()
            .insert((bucket.to_string(), key.to_string()), body.into());
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn body(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Every `bucket/key` written through the backend, in call order
    pub fn put_log(&self) -> Vec<String> {
        self.puts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ObjectBackend for MemoryBackend {
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectRef>> {
        Ok(self
            .objects()
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((b, k), body)| ObjectRef::new(b.clone(), k.clone()).with_size(body.len() as i64))
            .collect())
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectRef> {
        self.body(bucket, key)
            .map(|body| ObjectRef::new(bucket, key).with_size(body.len() as i64))
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.body(bucket, key)
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.record_put(bucket, key);
        self.insert(bucket, key, body);
        Ok(())
    }

    fn upload_path(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let body = std::fs::read(path)?;
        self.put_object(bucket, key, body)
    }
}
