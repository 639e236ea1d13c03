//! # Local Media Store
//!
//! Filesystem implementation of `MediaStorage`. Files land in
//! content-hash-sharded directories so one directory never accumulates
//! the whole upload history, and the returned URL is the public prefix
//! plus the sharded relative path.

use async_trait::async_trait;
use bytes::Bytes;
use domains::error::{AppError, Result};
use domains::traits::MediaStorage;
use mime::Mime;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/uploads")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Shard prefix ("ab/cd") from the content hash.
    fn shard(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let hash = hex::encode(hasher.finalize());
        format!("{}/{}", &hash[0..2], &hash[2..4])
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStore {
    async fn store(&self, data: Bytes, key: &str, content_type: &Mime) -> Result<String> {
        let shard = Self::shard(&data);
        let mut target = self.root_path.clone();
        target.push(&shard);

        fs::create_dir_all(&target)
            .await
            .map_err(|err| AppError::Internal(format!("media store mkdir: {err}")))?;

        target.push(key);
        fs::write(&target, &data)
            .await
            .map_err(|err| AppError::Internal(format!("media store write: {err}")))?;

        debug!(key, content_type = %content_type, bytes = data.len(), "stored upload");
        Ok(format!("{}/{}/{}", self.url_prefix, shard, key))
    }
}
