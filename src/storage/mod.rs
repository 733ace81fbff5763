pub mod backend;
pub mod bucket;
pub mod config;
pub mod connection;
pub mod csv_ops;
pub mod model;
pub mod models;
pub mod object_store;

// Re-export types for convenient access from other modules
pub use backend::S3Backend;
pub use bucket::BucketHandle;
pub use config::{StaticCredentials, StorageConfig};
pub use connection::{ConnectionHandles, ConnectionProvider};
pub use model::{decode_model, encode_model, model_key};
pub use models::{ObjectBody, ObjectMatch, ObjectRef, ReadMode};
pub use object_store::ObjectStore;
