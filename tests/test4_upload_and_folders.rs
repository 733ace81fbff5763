use mockall::predicate as testing;
use pipeline_storage::interfaces::MockObjectBackend;
use pipeline_storage::testing::MemoryBackend;
use pipeline_storage::{ObjectStore, StorageError};
use std::fs;
use tempfile::TempDir;

const BUCKET: &str = "Wanted-SG-Bucket";

#[test]
fn test_create_folder_twice_creates_marker_once() {
    let store = ObjectStore::new(MemoryBackend::new());

    store.create_folder("model-registry", BUCKET).unwrap();
    assert_eq!(store.backend().keys(BUCKET), ["model-registry/"]);
    assert_eq!(
        store.backend().body(BUCKET, "model-registry/"),
        Some(Vec::new())
    );

    store.create_folder("model-registry", BUCKET).unwrap();
    assert_eq!(
        store.backend().put_log(),
        [format!("{BUCKET}/model-registry/")]
    );
}

#[test]
fn test_create_folder_probes_then_puts_marker() {
    let mut backend = MockObjectBackend::new();
    let mut seq = mockall::Sequence::new();
    backend
        .expect_head_object()
        .with(testing::eq(BUCKET), testing::eq("reports"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|b, k| Err(StorageError::not_found(b, k)));
    backend
        .expect_head_object()
        .with(testing::eq(BUCKET), testing::eq("reports/"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|b, k| Err(StorageError::not_found(b, k)));
    backend
        .expect_put_object()
        .withf(|bucket, key, body| bucket == BUCKET && key == "reports/" && body.is_empty())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));

    ObjectStore::new(backend)
        .create_folder("reports", BUCKET)
        .unwrap();
}

#[test]
fn test_upload_file_removes_local_copy_after_success() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("model.json");
    fs::write(&path, b"{\"weights\":[1,2,3]}").unwrap();
    let store = ObjectStore::new(MemoryBackend::new());

    store
        .upload_file(&path, "model-registry/model.json", BUCKET, true)
        .unwrap();

    assert!(!path.exists());
    assert_eq!(
        store.backend().body(BUCKET, "model-registry/model.json"),
        Some(b"{\"weights\":[1,2,3]}".to_vec())
    );
}

#[test]
fn test_upload_file_keeps_local_copy_when_asked() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("report.yaml");
    fs::write(&path, "drift: false\n").unwrap();
    let store = ObjectStore::new(MemoryBackend::new());

    store
        .upload_file(&path, "DataValidation/report.yaml", BUCKET, false)
        .unwrap();

    assert!(path.exists());
    assert!(store.backend().contains(BUCKET, "DataValidation/report.yaml"));
}

#[test]
fn test_upload_failure_leaves_local_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("train.csv");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    let mut backend = MockObjectBackend::new();
    backend
        .expect_upload_path()
        .times(1)
        .returning(|_, _, _| {
            Err(StorageError::transport(
                "PutObject",
                std::io::Error::other("503 Slow Down"),
            ))
        });
    let store = ObjectStore::new(backend);

    let err = store
        .upload_file(&path, "train.csv", BUCKET, true)
        .unwrap_err();
    assert!(matches!(err, StorageError::Transport { op: "PutObject", .. }));
    assert!(path.exists());
}

#[test]
fn test_upload_missing_local_file_makes_no_request() {
    let tmp = TempDir::new().unwrap();
    let mut backend = MockObjectBackend::new();
    backend.expect_upload_path().never();
    let store = ObjectStore::new(backend);

    let err = store
        .upload_file(&tmp.path().join("absent.csv"), "absent.csv", BUCKET, true)
        .unwrap_err();
    assert!(matches!(err, StorageError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}
