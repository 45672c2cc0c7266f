//! Module for the event announcing a new source file and the retrieval of that file.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::Error;


/// Object-created notification as delivered by the storage service.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    #[serde(rename = "Records", default)]
    records: Vec<EventRecord>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct EventRecord {
    s3: StorageEntity,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct StorageEntity {
    bucket: BucketRef,
    object: ObjectRef,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct BucketRef {
    name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct ObjectRef {
    key: String,
}

/// Bucket and key of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl TriggerEvent {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw).map_err(|e| Error::Event(e.to_string()))
    }

    /// Location of the source file. Only the first record of the event is considered.
    pub fn source_location(&self) -> Result<ObjectLocation, Error> {
        let record = self
            .records
            .first()
            .ok_or_else(|| Error::Event("event carries no records".to_string()))?;

        Ok(ObjectLocation {
            bucket: record.s3.bucket.name.clone(),
            key: record.s3.object.key.clone(),
        })
    }
}

/// Read access to stored objects.
pub trait ObjectStore {
    /// Returns the object's content decoded as UTF-8.
    fn fetch(&self, location: &ObjectLocation) -> Result<String, Error>;
}

/// [`ObjectStore`] backed by a local directory: buckets are its subdirectories.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &ObjectLocation) -> Result<PathBuf, Error> {
        for part in [&location.bucket, &location.key] {
            let escapes = Path::new(part)
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if part.is_empty() || escapes {
                return Err(Error::Storage(format!("invalid object path segment: {part:?}")));
            }
        }
        Ok(self.root.join(&location.bucket).join(&location.key))
    }
}

impl ObjectStore for FsObjectStore {
    fn fetch(&self, location: &ObjectLocation) -> Result<String, Error> {
        let path = self.resolve(location)?;
        info!(bucket = %location.bucket, key = %location.key, "Fetching source file");

        std::fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("{}: {e}", path.display())))
    }
}
