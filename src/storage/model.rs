//! Versioned model artifacts.
//!
//! Models are stored as a JSON envelope so any `serde` model type round-trips and the
//! payload can be inspected or produced outside Rust:
//!
//! ```json
//! {"format":"pipeline-model","version":1,"model":{...}}
//! ```

use crate::errors::{Result, StorageError};
use crate::interfaces::ObjectBackend;
use crate::storage::models::ReadMode;
use crate::storage::object_store::ObjectStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const MODEL_FORMAT: &str = "pipeline-model";
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    format: &'a str,
    version: u32,
    model: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    format: String,
    version: u32,
}

#[derive(Deserialize)]
struct EnvelopeIn<T> {
    model: T,
}

/// Key a model is stored under: `dir/name`, or `name` when no directory is given
pub fn model_key(name: &str, dir: Option<&str>) -> String {
    match dir {
        Some(dir) if !dir.is_empty() => format!("{}/{}", dir.trim_end_matches('/'), name),
        _ => name.to_string(),
    }
}

pub fn encode_model<T: Serialize>(model: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&EnvelopeOut {
        format: MODEL_FORMAT,
        version: MODEL_FORMAT_VERSION,
        model,
    })?)
}

pub fn decode_model<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let header: EnvelopeHeader = serde_json::from_slice(bytes)
        .map_err(|e| StorageError::Deserialization(format!("not a model artifact: {e}")))?;

    if header.format != MODEL_FORMAT {
        return Err(StorageError::Deserialization(format!(
            "unexpected artifact format '{}'",
            header.format
        )));
    }
    if header.version != MODEL_FORMAT_VERSION {
        return Err(StorageError::Deserialization(format!(
            "unsupported artifact version {} (expected {})",
            header.version, MODEL_FORMAT_VERSION
        )));
    }

    let envelope: EnvelopeIn<T> = serde_json::from_slice(bytes)
        .map_err(|e| StorageError::Deserialization(format!("model payload: {e}")))?;
    Ok(envelope.model)
}

impl<B: ObjectBackend> ObjectStore<B> {
    /// Load the model stored at `dir/name` (or `name`).
    ///
    /// Exactly one object must match the key; zero is `NotFound`, more is `AmbiguousMatch`.
    pub fn load_model<T: DeserializeOwned>(
        &self,
        name: &str,
        bucket: &str,
        dir: Option<&str>,
    ) -> Result<T> {
        let key = model_key(name, dir);
        debug!(bucket, key = %key, "Entered load_model");

        let object = self.get_object(&key, bucket)?.into_single(bucket, &key)?;
        let bytes = self.read_object(&object, ReadMode::Raw)?.into_bytes();
        let model = decode_model(&bytes)?;

        info!(bucket, key = %key, "Production model loaded from bucket");
        Ok(model)
    }

    /// Store `model` where [`ObjectStore::load_model`] reads it from
    pub fn save_model<T: Serialize>(
        &self,
        model: &T,
        name: &str,
        bucket: &str,
        dir: Option<&str>,
    ) -> Result<()> {
        let key = model_key(name, dir);
        let bytes = encode_model(model)?;
        self.backend.put_object(bucket, &key, bytes)?;
        info!(bucket, key = %key, "Model pushed to bucket");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Forest {
        n_estimators: u32,
        criterion: String,
        weights: Vec<f64>,
    }

    #[test]
    fn model_key_joins_directory() {
        assert_eq!(model_key("model.pkl", None), "model.pkl");
        assert_eq!(model_key("model.pkl", Some("")), "model.pkl");
        assert_eq!(
            model_key("model.pkl", Some("model-registry")),
            "model-registry/model.pkl"
        );
        assert_eq!(
            model_key("model.pkl", Some("model-registry/")),
            "model-registry/model.pkl"
        );
    }

    #[test]
    fn envelope_round_trip() {
        let model = Forest {
            n_estimators: 100,
            criterion: "entropy".to_string(),
            weights: vec![0.25, 0.75],
        };
        let bytes = encode_model(&model).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with(r#"{"format":"pipeline-model","version":1,"#));
        assert_eq!(decode_model::<Forest>(&bytes).unwrap(), model);
    }

    #[test]
    fn pickle_bytes_are_rejected() {
        // protocol 4 pickle header
        let err = decode_model::<Forest>(&[0x80, 0x04, 0x95, 0x10, 0x00]).unwrap_err();
        assert!(matches!(err, StorageError::Deserialization(_)));
    }

    #[test]
    fn newer_version_is_rejected() {
        let bytes = br#"{"format":"pipeline-model","version":2,"model":{}}"#;
        let err = decode_model::<Forest>(bytes).unwrap_err();
        assert!(err.to_string().contains("unsupported artifact version 2"));
    }

    #[test]
    fn wrong_payload_shape_is_a_deserialization_error() {
        let bytes = br#"{"format":"pipeline-model","version":1,"model":{"n_estimators":"many"}}"#;
        assert!(matches!(
            decode_model::<Forest>(bytes),
            Err(StorageError::Deserialization(_))
        ));
    }
}
