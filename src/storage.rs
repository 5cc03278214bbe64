use futures::TryStreamExt;
use log::{info, warn};
use object_store::{ObjectStore, PutPayload, aws::AmazonS3Builder, memory::InMemory, path::Path};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

/// Suffix appended to every trainer name to form its object key
pub const DOCUMENT_SUFFIX: &str = ".json";

/// Status code reported for a successful write
const PUT_STATUS: u16 = 200;
/// Status code reported for a delete, S3 answers 204 whether or not the key existed
const DELETE_STATUS: u16 = 204;

/// Failures of the object store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Object '{0}' not found")]
    NotFound(String),
    #[error("Object store unavailable: {0}")]
    Unavailable(#[source] object_store::Error),
    #[error("Object '{0}' is not valid UTF-8")]
    InvalidText(String),
}

impl StoreError {
    fn from_store(key: &str, error: object_store::Error) -> Self {
        match error {
            object_store::Error::NotFound { .. } => StoreError::NotFound(key.to_string()),
            other => StoreError::Unavailable(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Describes an object found while listing the bucket
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The key as it was passed to `put`, not the escaped form the provider keeps
    pub key: String,
    pub size: usize,
    pub last_modified: String,
    pub e_tag: Option<String>,
}

/// Outcome of a put, returned to the client as-is
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WriteResult {
    pub status_code: u16,
    pub e_tag: Option<String>,
    pub version: Option<String>,
}

/// Outcome of a delete, returned to the client as-is
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DeleteResult {
    pub status_code: u16,
}

/// Handle to the bucket holding the trainer documents
#[derive(Clone)]
pub struct StoreGateway {
    inner: Arc<dyn ObjectStore>,
}

impl StoreGateway {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// A gateway over a fresh process-local store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Builds the gateway for the configured backend,
    /// S3 credentials are taken from the usual `AWS_*` variables
    pub fn from_config(cfg: &StorageConfig) -> anyhow::Result<Self> {
        match cfg.backend {
            StorageBackend::Memory => {
                warn!("Using in-memory storage, trainers will not survive a restart");
                Ok(Self::in_memory())
            }
            StorageBackend::S3 => {
                let bucket = cfg
                    .bucket_name
                    .as_deref()
                    .ok_or(anyhow::anyhow!("No bucket name"))?;
                let s3 = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(&cfg.region)
                    .build()?;
                info!("Using s3 bucket '{}' in {}", bucket, cfg.region);
                Ok(Self::new(Arc::new(s3)))
            }
        }
    }

    /// Lists every object in the bucket, in the order the provider returns them
    pub async fn list(&self) -> StoreResult<Vec<StoredObject>> {
        let metas: Vec<_> = self
            .inner
            .list(None)
            .try_collect()
            .await
            .map_err(StoreError::Unavailable)?;

        Ok(metas
            .into_iter()
            .map(|meta| StoredObject {
                key: percent_decode_str(meta.location.as_ref())
                    .decode_utf8_lossy()
                    .into_owned(),
                size: meta.size,
                last_modified: meta.last_modified.to_rfc3339(),
                e_tag: meta.e_tag,
            })
            .collect())
    }

    /// Whether an object with exactly this key shows up in the listing
    pub async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.list().await?.iter().any(|object| object.key == key))
    }

    /// Reads the whole object body
    pub async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let result = self
            .inner
            .get(&Path::from(key))
            .await
            .map_err(|e| StoreError::from_store(key, e))?;
        let bytes = result
            .bytes()
            .await
            .map_err(|e| StoreError::from_store(key, e))?;
        Ok(bytes.to_vec())
    }

    /// Reads the whole object body as UTF-8 text
    pub async fn get_text(&self, key: &str) -> StoreResult<String> {
        String::from_utf8(self.get(key).await?).map_err(|_| StoreError::InvalidText(key.to_string()))
    }

    /// Writes `body` at `key`, replacing whatever was there
    pub async fn put(&self, key: &str, body: Vec<u8>) -> StoreResult<WriteResult> {
        let result = self
            .inner
            .put(&Path::from(key), PutPayload::from(body))
            .await
            .map_err(StoreError::Unavailable)?;
        Ok(WriteResult {
            status_code: PUT_STATUS,
            e_tag: result.e_tag,
            version: result.version,
        })
    }

    /// Removes the object at `key`, a missing key is not an error
    pub async fn delete(&self, key: &str) -> StoreResult<DeleteResult> {
        match self.inner.delete(&Path::from(key)).await {
            Ok(()) => {}
            Err(object_store::Error::NotFound { .. }) => {
                info!("Delete of missing object '{}'", key);
            }
            Err(e) => return Err(StoreError::Unavailable(e)),
        }
        Ok(DeleteResult {
            status_code: DELETE_STATUS,
        })
    }
}
