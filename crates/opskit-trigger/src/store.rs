//! Object stores the trigger can look objects up in.
//!
//! `FsObjectStore` maps `bucket/key` onto `root/bucket/key` on the local
//! filesystem; `MemoryObjectStore` holds metadata in a map.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// Content type reported when nothing better is known.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata returned by a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub content_type: String,
    pub size: u64,
}

/// Read access to object metadata.
pub trait ObjectStore: Send + Sync {
    fn head_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectMetadata, StoreError>> + Send;

    /// Content type of `bucket/key`.
    fn content_type(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<String, StoreError>> + Send {
        async move { Ok(self.head_object(bucket, key).await?.content_type) }
    }
}

/// Filesystem-backed store: one directory per bucket under `root`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `bucket/key` to a path, refusing anything that would leave
    /// the bucket directory.
    fn object_path(&self, bucket: &str, key: &str) -> Result<(PathBuf, PathBuf), StoreError> {
        if !is_single_component(bucket) {
            return Err(StoreError::NoSuchBucket(bucket.to_string()));
        }
        let bucket_dir = self.root.join(bucket);

        let key_path = Path::new(key);
        let mut path = bucket_dir.clone();
        let mut any = false;
        for component in key_path.components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    any = true;
                }
                Component::CurDir => {}
                _ => return Err(StoreError::InvalidKey(key.to_string())),
            }
        }
        if !any {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok((bucket_dir, path))
    }
}

impl ObjectStore for FsObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError> {
        let (bucket_dir, path) = self.object_path(bucket, key)?;

        match tokio::fs::metadata(&bucket_dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(StoreError::NoSuchBucket(bucket.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NoSuchBucket(bucket.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(no_such_key(bucket, key)),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(no_such_key(bucket, key)),
            Err(e) => return Err(e.into()),
        };

        debug!(?path, size = meta.len(), "object found");
        Ok(ObjectMetadata {
            content_type: content_type_for(&path).to_string(),
            size: meta.len(),
        })
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    buckets: HashMap<String, HashMap<String, ObjectMetadata>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_bucket(&mut self, bucket: &str) {
        self.buckets.entry(bucket.to_string()).or_default();
    }

    pub fn insert(&mut self, bucket: &str, key: &str, metadata: ObjectMetadata) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), metadata);
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError> {
        let objects = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(bucket.to_string()))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| no_such_key(bucket, key))
    }
}

/// Guess a content type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("json") => "application/json",
        Some("txt" | "log") => "text/plain",
        Some("csv") => "text/csv",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("xml") => "application/xml",
        Some("yaml" | "yml") => "application/yaml",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("wasm") => "application/wasm",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

fn no_such_key(bucket: &str, key: &str) -> StoreError {
    StoreError::NoSuchKey {
        bucket: bucket.to_string(),
        key: key.to_string(),
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
