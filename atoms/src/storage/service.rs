use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use super::model::ObjectRef;
use crate::error::{GalleryError, Result};

/// Object storage holding originals and thumbnails.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Byte length of a stored object. Fails if the object is missing.
    async fn object_size(&self, object: &ObjectRef) -> Result<u64>;

    async fn get_object(&self, object: &ObjectRef) -> Result<Vec<u8>>;

    async fn put_object(&self, object: &ObjectRef, body: Vec<u8>, content_type: &str)
        -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn object_size(&self, object: &ObjectRef) -> Result<u64> {
        let head = self
            .client
            .head_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| {
                GalleryError::Storage(format!(
                    "head_object failed for {}: {}",
                    object,
                    DisplayErrorContext(e)
                ))
            })?;

        let length = head.content_length().ok_or_else(|| {
            GalleryError::Storage(format!("no content length for {}", object))
        })?;
        u64::try_from(length)
            .map_err(|_| GalleryError::Storage(format!("negative content length for {}", object)))
    }

    async fn get_object(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        let result = self
            .client
            .get_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| {
                GalleryError::Storage(format!(
                    "get_object failed for {}: {}",
                    object,
                    DisplayErrorContext(e)
                ))
            })?;

        let bytes = result
            .body
            .collect()
            .await
            .map_err(|e| GalleryError::Storage(format!("failed to read {}: {}", object, e)))?
            .into_bytes();

        Ok(bytes.to_vec())
    }

    async fn put_object(
        &self,
        object: &ObjectRef,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                GalleryError::Storage(format!(
                    "put_object failed for {}: {}",
                    object,
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }
}
