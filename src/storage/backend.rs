use crate::errors::{Result, StorageError};
use crate::interfaces::ObjectBackend;
use crate::storage::connection::ConnectionHandles;
use crate::storage::models::ObjectRef;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// [`ObjectBackend`] over an S3-compatible endpoint
#[derive(Clone)]
pub struct S3Backend {
    handles: Arc<ConnectionHandles>,
}

impl S3Backend {
    pub fn new(handles: Arc<ConnectionHandles>) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &Arc<ConnectionHandles> {
        &self.handles
    }
}

fn sdk_error<E, R>(op: &'static str, err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    StorageError::Transport {
        op,
        detail: DisplayErrorContext(&err).to_string(),
        source: Box::new(err),
    }
}

fn to_chrono(value: &DateTime) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

impl ObjectBackend for S3Backend {
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectRef>> {
        debug!(bucket, prefix, "Listing objects");

        self.handles.block_on(async {
            let mut objects = Vec::new();
            let mut continuation_token = None;

            loop {
                let mut request = self
                    .handles
                    .client()
                    .list_objects_v2()
                    .bucket(bucket)
                    .prefix(prefix);
                if let Some(token) = continuation_token {
                    request = request.continuation_token(token);
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| sdk_error("ListObjectsV2", e))?;

                if let Some(contents) = response.contents {
                    for object in contents {
                        let Some(key) = object.key else { continue };
                        objects.push(ObjectRef {
                            bucket: bucket.to_string(),
                            key,
                            size: object.size,
                            e_tag: object.e_tag,
                            last_modified: object.last_modified.as_ref().and_then(to_chrono),
                        });
                    }
                }

                continuation_token = response.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            }

            debug!(bucket, prefix, count = objects.len(), "Listed objects");
            Ok(objects)
        })
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectRef> {
        self.handles.block_on(async {
            let response = self
                .handles
                .client()
                .head_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await;

            match response {
                Ok(head) => Ok(ObjectRef {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    size: head.content_length(),
                    e_tag: head.e_tag().map(str::to_string),
                    last_modified: head.last_modified().and_then(to_chrono),
                }),
                Err(e) => {
                    let not_found = e.as_service_error().is_some_and(|se| se.is_not_found())
                        || e.raw_response().map(|r| r.status().as_u16()) == Some(404);
                    if not_found {
                        Err(StorageError::not_found(bucket, key))
                    } else {
                        Err(sdk_error("HeadObject", e))
                    }
                }
            }
        })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        debug!(bucket, key, "Downloading object");

        self.handles.block_on(async {
            let response = self
                .handles
                .client()
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                        StorageError::not_found(bucket, key)
                    } else {
                        sdk_error("GetObject", e)
                    }
                })?;

            let bytes = response
                .body
                .collect()
                .await
                .map_err(|e| StorageError::transport("GetObject body", e))?;

            let content = bytes.to_vec();
            debug!(bucket, key, bytes = content.len(), "Downloaded object");
            Ok(content)
        })
    }

    fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        debug!(bucket, key, bytes = body.len(), "Putting object");

        self.handles.block_on(async {
            self.handles
                .client()
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(ByteStream::from(body))
                .send()
                .await
                .map_err(|e| sdk_error("PutObject", e))?;
            Ok(())
        })
    }

    fn upload_path(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        debug!(bucket, key, path = %path.display(), "Uploading file");

        self.handles.block_on(async {
            // Streams from disk instead of reading the whole file
            let body = ByteStream::from_path(path)
                .await
                .map_err(|e| StorageError::transport("Read upload source", e))?;

            self.handles
                .client()
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(body)
                .send()
                .await
                .map_err(|e| sdk_error("PutObject", e))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::{StaticCredentials, StorageConfig};
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;

    const ENDPOINT: &str = "http://localhost:9000";
    const BUCKET: &str = "pipeline-bucket";

    fn replay_backend(events: Vec<ReplayEvent>) -> (S3Backend, StaticReplayClient) {
        let http_client = StaticReplayClient::new(events);
        let config = StorageConfig::default()
            .with_endpoint(ENDPOINT)
            .with_region("us-east-1")
            .with_path_style(true);
        let credentials = StaticCredentials {
            access_key_id: "0051234abcd".to_string(),
            secret_access_key: "K005secret".to_string(),
        };
        let replay = http_client.clone();
        let handles = ConnectionHandles::from_credentials_with(&config, &credentials, move |b| {
            b.http_client(replay)
        })
        .unwrap();
        (S3Backend::new(Arc::new(handles)), http_client)
    }

    fn event(uri: &str, status: u16, body: &str) -> ReplayEvent {
        ReplayEvent::new(
            http::Request::builder()
                .uri(format!("{ENDPOINT}/{BUCKET}{uri}"))
                .body(SdkBody::empty())
                .unwrap(),
            http::Response::builder()
                .status(status)
                .header("content-type", "application/xml")
                .body(SdkBody::from(body.to_string()))
                .unwrap(),
        )
    }

    fn list_page(keys: &[&str], next_token: Option<&str>) -> String {
        let contents: String = keys
            .iter()
            .map(|k| {
                format!(
                    "<Contents><Key>{k}</Key><Size>12</Size><ETag>&quot;abc&quot;</ETag>\
                     <LastModified>2024-05-01T10:00:00.000Z</LastModified></Contents>"
                )
            })
            .collect();
        let token = next_token
            .map(|t| format!("<NextContinuationToken>{t}</NextContinuationToken>"))
            .unwrap_or_default();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
             <Name>{BUCKET}</Name><Prefix>artifact/</Prefix><KeyCount>{}</KeyCount>\
             <MaxKeys>1000</MaxKeys><IsTruncated>{}</IsTruncated>{contents}{token}\
             </ListBucketResult>",
            keys.len(),
            next_token.is_some()
        )
    }

    #[test]
    fn head_object_404_is_not_found() {
        let (backend, _) = replay_backend(vec![event("/model-registry", 404, "")]);

        let err = backend.head_object(BUCKET, "model-registry").unwrap_err();
        assert!(
            matches!(err, StorageError::NotFound { ref bucket, ref key } if bucket == BUCKET && key == "model-registry")
        );
    }

    #[test]
    fn head_object_403_stays_transport() {
        let (backend, _) = replay_backend(vec![event("/model-registry", 403, "")]);

        let err = backend.head_object(BUCKET, "model-registry").unwrap_err();
        assert!(matches!(err, StorageError::Transport { op: "HeadObject", .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn get_object_no_such_key_is_not_found() {
        let body = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                    <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message>\
                    <Key>train.csv</Key></Error>";
        let (backend, _) = replay_backend(vec![event("/train.csv", 404, body)]);

        let err = backend.get_object(BUCKET, "train.csv").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn get_object_returns_body_bytes() {
        let (backend, _) = replay_backend(vec![event("/train.csv", 200, "a,b\n1,2\n")]);

        let bytes = backend.get_object(BUCKET, "train.csv").unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[test]
    fn list_objects_follows_continuation_token() {
        let (backend, http_client) = replay_backend(vec![
            event(
                "?list-type=2&prefix=artifact%2F",
                200,
                &list_page(&["artifact/train.csv", "artifact/test.csv"], Some("page-2")),
            ),
            event(
                "?continuation-token=page-2&list-type=2&prefix=artifact%2F",
                200,
                &list_page(&["artifact/schema.yaml"], None),
            ),
        ]);

        let objects = backend.list_objects(BUCKET, "artifact/").unwrap();
        let keys: Vec<&str> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(
            keys,
            ["artifact/train.csv", "artifact/test.csv", "artifact/schema.yaml"]
        );
        assert_eq!(objects[0].size, Some(12));
        assert_eq!(objects[0].e_tag.as_deref(), Some("\"abc\""));
        assert!(objects[0].last_modified.is_some());

        let uris: Vec<String> = http_client
            .actual_requests()
            .map(|r| r.uri().to_string())
            .collect();
        assert_eq!(uris.len(), 2);
        assert!(!uris[0].contains("continuation-token"));
        assert!(uris[1].contains("continuation-token=page-2"));
    }
}
