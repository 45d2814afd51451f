use chrono::{DateTime, Utc};
use vp_pipeline_core::contract::StorageObjectRef;

/// One entry from a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

pub trait ObjectReplicator {
    fn copy_object(
        &self,
        source: &StorageObjectRef,
        destination_bucket: &str,
    ) -> Result<(), String>;
}

pub trait CoverageStore {
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>, String>;
}
