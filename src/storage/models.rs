use crate::errors::{Result, StorageError};
use chrono::{DateTime, Utc};
use std::io::Cursor;

/// A named object inside a named bucket; nothing is fetched until it is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
    pub size: Option<i64>,
    pub e_tag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size: None,
            e_tag: None,
            last_modified: None,
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// Result of looking objects up by key prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectMatch {
    None,
    One(ObjectRef),
    Many(Vec<ObjectRef>),
}

impl ObjectMatch {
    pub fn from_listing(mut objects: Vec<ObjectRef>) -> Self {
        match objects.len() {
            0 => ObjectMatch::None,
            1 => ObjectMatch::One(objects.remove(0)),
            _ => ObjectMatch::Many(objects),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ObjectMatch::None => 0,
            ObjectMatch::One(_) => 1,
            ObjectMatch::Many(objects) => objects.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ObjectMatch::None)
    }

    /// Require exactly one match for `prefix`
    pub fn into_single(self, bucket: &str, prefix: &str) -> Result<ObjectRef> {
        match self {
            ObjectMatch::One(object) => Ok(object),
            ObjectMatch::None => Err(StorageError::not_found(bucket, prefix)),
            ObjectMatch::Many(objects) => Err(StorageError::AmbiguousMatch {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                count: objects.len(),
            }),
        }
    }

    pub fn into_vec(self) -> Vec<ObjectRef> {
        match self {
            ObjectMatch::None => Vec::new(),
            ObjectMatch::One(object) => vec![object],
            ObjectMatch::Many(objects) => objects,
        }
    }
}

/// How an object body is handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Raw bytes
    Raw,
    /// UTF-8 decoded text
    #[default]
    Text,
    /// Decoded text behind a seekable in-memory reader
    Readable,
}

impl ReadMode {
    /// Map the `decode` / `make_readable` flag pair onto a mode.
    ///
    /// A readable stream over undecoded bytes has no defined meaning and is rejected.
    pub fn from_flags(decode: bool, make_readable: bool) -> Result<Self> {
        match (decode, make_readable) {
            (true, false) => Ok(ReadMode::Text),
            (true, true) => Ok(ReadMode::Readable),
            (false, false) => Ok(ReadMode::Raw),
            (false, true) => Err(StorageError::UnsupportedReadMode {
                decode,
                make_readable,
            }),
        }
    }
}

/// An object body as returned by a read
#[derive(Debug, PartialEq)]
pub enum ObjectBody {
    Bytes(Vec<u8>),
    Text(String),
    Readable(Cursor<String>),
}

impl ObjectBody {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ObjectBody::Bytes(bytes) => bytes,
            ObjectBody::Text(text) => text.into_bytes(),
            ObjectBody::Readable(cursor) => cursor.into_inner().into_bytes(),
        }
    }

    /// Text content, or `None` for an undecoded body
    pub fn into_text(self) -> Option<String> {
        match self {
            ObjectBody::Bytes(_) => None,
            ObjectBody::Text(text) => Some(text),
            ObjectBody::Readable(cursor) => Some(cursor.into_inner()),
        }
    }

    /// Readable text stream over the body, decoding raw bytes as UTF-8
    pub fn into_reader(self) -> Result<Cursor<String>> {
        match self {
            ObjectBody::Bytes(bytes) => Ok(Cursor::new(String::from_utf8(bytes)?)),
            ObjectBody::Text(text) => Ok(Cursor::new(text)),
            ObjectBody::Readable(cursor) => Ok(cursor),
        }
    }
}
