//! Pipeline layout, hyperparameters and storage settings shared by the pipeline stages.
//!
//! These values are consumed by the pipeline stages as-is; the storage layer only reads
//! the endpoint and credential variable names.

use chrono::Datelike;

// ------------------ MongoDB ------------------

pub const DATABASE_NAME: &str = "Proj1";
pub const COLLECTION_NAME: &str = "Proj1-Data";
pub const MONGODB_URL_KEY: &str = "MONGODB_URL";

// ------------------ Pipeline ------------------

pub const PIPELINE_NAME: &str = "";
pub const ARTIFACT_DIR: &str = "artifact";

// ------------------ Dataset ------------------

pub const FILE_NAME: &str = "data.csv";
pub const TRAIN_FILE_NAME: &str = "train.csv";
pub const TEST_FILE_NAME: &str = "test.csv";
pub const SCHEMA_FILE_PATH: &str = "config/schema.yaml";

// ------------------ Data ingestion ------------------

pub const DATA_INGESTION_DIR_NAME: &str = "data_ingestion";
pub const DATA_INGESTION_COLLECTION_NAME: &str = "Proj1-Data";
pub const DATA_INGESTION_FEATURE_STORE_DIR: &str = "feature_store";
pub const DATA_INGESTION_TRAIN_TEST_SPLIT_RATIO: f64 = 0.25;
pub const DATA_INGESTION_INGESTED_DIR: &str = "ingested";

// ------------------ Data validation ------------------

pub const DATA_VALIDATION_DIR_NAME: &str = "DataValidation";
pub const DATA_VALIDATION_REPORT_FILE_NAME: &str = "report.yaml";

// ------------------ Model ------------------

pub const TARGET_COLUMN: &str = "Response";
pub const PREPROCESSING_OBJ_FILE_NAME: &str = "preprocessing.pkl";
pub const MODEL_FILE_NAME: &str = "model.pkl";

// ------------------ Data transformation ------------------

pub const DATA_TRANSFORMATION_DIR_NAME: &str = "data_transformation";
pub const DATA_TRANSFORMATION_TRANSFORMED_OBJ_DIR: &str = "transformed_obj";
pub const DATA_TRANSFORMATION_TRANSFORMED_DATA_DIR: &str = "transformed_data";

// ------------------ Model trainer ------------------

pub const MODEL_TRAINER_DIR_NAME: &str = "model_trainer";
pub const MODEL_TRAINER_TRAINED_MODEL_DIR: &str = "trained_model";
pub const MODEL_TRAINER_TRAINED_MODEL_NAME: &str = "model.pkl";
pub const MODEL_TRAINER_EXPECTED_SCORE: f64 = 0.6;
pub const MODEL_TRAINER_MODEL_CONFIG_FILE_PATH: &str = "config/model.yaml";
pub const MODEL_TRAINER_N_ESTIMATORS: u32 = 100;
pub const MODEL_TRAINER_MIN_SAMPLES_SPLIT: u32 = 7;
pub const MODEL_TRAINER_MIN_SAMPLES_LEAF: u32 = 6;
pub const MIN_SAMPLES_SPLIT_MAX_DEPTH: u32 = 10;
pub const MIN_SAMPLES_SPLIT_CRITERION: &str = "entropy";
pub const MIN_SAMPLES_SPLIT_RANDOM_STATE: u64 = 101;

// ------------------ Backblaze ------------------

pub const AWS_ACCESS_KEY_ID_ENV_KEY: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY_ENV_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENDPOINT_URL: &str = "https://s3.us-east-005.backblazeb2.com";
pub const ENDPOINT_REGION: &str = "us-east-005";

// ------------------ Model evaluation ------------------

pub const MODEL_EVALUATION_CHANGED_THRESHOLD_SCORE: f64 = 0.02;
pub const MODEL_BUCKET_NAME: &str = "Wanted-SG-Bucket";
pub const MODEL_PUSHER_S3_KEY: &str = "model-registry";

// ------------------ App ------------------

pub const APP_HOST: &str = "0.0.0.0";
pub const APP_PORT: u16 = 5000;

/// Token that marks a missing value in CSV artifacts
pub const CSV_NA_VALUE: &str = "na";

/// Year the pipeline is running in, used for vehicle-age style features
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
