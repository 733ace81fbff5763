use crate::errors::Result;
use crate::interfaces::ObjectBackend;
use crate::storage::models::{ObjectRef, ReadMode};
use crate::storage::object_store::ObjectStore;
use crate::table::Table;
use std::path::Path;
use tracing::debug;

impl<B: ObjectBackend> ObjectStore<B> {
    /// Write `table` as CSV to `local_path`, upload it to `bucket_key`, then delete the local file
    pub fn upload_dataframe_as_csv(
        &self,
        table: &Table,
        local_path: &Path,
        bucket_key: &str,
        bucket: &str,
    ) -> Result<()> {
        debug!(
            bucket,
            bucket_key,
            rows = table.num_rows(),
            "Entered upload_dataframe_as_csv"
        );
        table.to_csv_path(local_path)?;
        self.upload_file(local_path, bucket_key, bucket, true)
    }

    /// Parse an object's text as CSV using the store's [`crate::table::CsvOptions`]
    pub fn dataframe_from_object(&self, object: &ObjectRef) -> Result<Table> {
        debug!(object = %object.uri(), "Entered dataframe_from_object");
        let content = self.read_object(object, ReadMode::Readable)?.into_reader()?;
        Table::from_csv_reader(content, &self.csv_options)
    }

    /// Read the single object matching `filename` as a table
    pub fn read_csv(&self, filename: &str, bucket: &str) -> Result<Table> {
        debug!(bucket, filename, "Entered read_csv");
        let object = self.get_object(filename, bucket)?.into_single(bucket, filename)?;
        self.dataframe_from_object(&object)
    }
}
