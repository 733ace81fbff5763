use crate::errors::Result;
use crate::interfaces::ObjectBackend;
use crate::storage::models::ObjectRef;

/// A bucket name bound to a backend. Creating one performs no request, so a
/// missing bucket only surfaces on the first call that uses it.
pub struct BucketHandle<'a, B: ObjectBackend> {
    backend: &'a B,
    name: String,
}

impl<'a, B: ObjectBackend> BucketHandle<'a, B> {
    pub(crate) fn new(backend: &'a B, name: &str) -> Self {
        Self {
            backend,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objects whose key starts with `prefix`; an empty prefix lists the whole bucket
    pub fn objects(&self, prefix: &str) -> Result<Vec<ObjectRef>> {
        self.backend.list_objects(&self.name, prefix)
    }

    /// Reference an object in this bucket without fetching anything
    pub fn object(&self, key: &str) -> ObjectRef {
        ObjectRef::new(self.name.clone(), key)
    }
}
