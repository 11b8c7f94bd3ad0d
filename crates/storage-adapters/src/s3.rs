//! S3 implementation of the media delegate.
//!
//! Objects are keyed `videos/<uuid>`; the key doubles as the deletion handle.
//! Any SDK failure surfaces as `Upstream` so a failed delete aborts the
//! caller's operation instead of orphaning the object.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::StoredMedia;
use domains::ports::MediaDelegate;

pub struct S3MediaDelegate {
    client: Client,
    bucket: String,
    /// Public base URL the bucket is served under (CDN or virtual-hosted style).
    public_base_url: String,
}

impl S3MediaDelegate {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MediaDelegate for S3MediaDelegate {
    async fn store(&self, data: Bytes, content_type: Mime) -> Result<StoredMedia> {
        let key = format!("videos/{}", Uuid::new_v4());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type.as_ref())
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format!("media upload failed: {e}")))?;
        tracing::debug!(%key, "media object stored");
        Ok(StoredMedia {
            url: format!("{}/{key}", self.public_base_url),
            handle: key,
        })
    }

    async fn delete(&self, handle: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(handle)
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format!("media delete failed: {e}")))?;
        tracing::debug!(key = %handle, "media object deleted");
        Ok(())
    }
}
