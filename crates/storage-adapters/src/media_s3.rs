//! # S3 Media Store
//!
//! Object-storage implementation of `MediaStorage` for deployments that
//! serve uploads from a bucket/CDN instead of local disk.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use domains::error::{AppError, Result};
use domains::traits::MediaStorage;
use mime::Mime;
use tracing::debug;

pub struct S3MediaStore {
    client: Client,
    bucket: String,
    /// Public base URL of the bucket or the CDN in front of it.
    public_base_url: String,
}

impl S3MediaStore {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a store from the ambient AWS environment configuration.
    pub async fn from_env(bucket: String, public_base_url: String) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config), bucket, public_base_url)
    }
}

#[async_trait]
impl MediaStorage for S3MediaStore {
    async fn store(&self, data: Bytes, key: &str, content_type: &Mime) -> Result<String> {
        let len = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type.as_ref())
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| AppError::Internal(format!("s3 put_object: {err}")))?;

        debug!(key, bytes = len, bucket = %self.bucket, "stored upload in s3");
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
