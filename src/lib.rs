pub mod args;
pub mod constants;
pub mod errors;
pub mod interfaces;
pub mod start;
pub mod storage;
pub mod table;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod utils {
    pub mod log_utils;
}

pub use args::Args;
pub use errors::{Result, StorageError};
pub use start::run_app;
pub use storage::{
    BucketHandle, ConnectionHandles, ConnectionProvider, ObjectBody, ObjectMatch, ObjectRef,
    ObjectStore, ReadMode, S3Backend, StorageConfig,
};
pub use table::{Cell, CsvOptions, Table};
