use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use vp_pipeline_core::contract::object_created_refs;

use crate::adapters::object_store::ObjectReplicator;
use crate::handlers::HandlerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationConfig {
    pub archive_bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicationSummary {
    pub status: String,
    pub objects_replicated: usize,
    pub archive_bucket: String,
}

/// Copies every object named by an object-created event into the archive
/// bucket under the identical key. Copy failures propagate; the platform
/// marks the invocation failed.
pub fn handle_object_created(
    event: Value,
    config: &ReplicationConfig,
    replicator: &dyn ObjectReplicator,
) -> Result<ReplicationSummary, HandlerError> {
    let refs = object_created_refs(event).map_err(|error| {
        HandlerError::new(format!("Malformed object-created event: {error}"))
    })?;

    log_replication_info(
        "replication_started",
        json!({
            "objects": refs.len(),
            "archive_bucket": config.archive_bucket.clone(),
        }),
    );

    for source in &refs {
        replicator
            .copy_object(source, &config.archive_bucket)
            .map_err(|error| {
                HandlerError::new(format!("Failed to replicate '{}': {error}", source.key))
            })?;

        log_replication_info(
            "object_replicated",
            json!({
                "source_bucket": source.bucket.clone(),
                "key": source.key.clone(),
                "archive_bucket": config.archive_bucket.clone(),
            }),
        );
    }

    Ok(ReplicationSummary {
        status: "ok".to_string(),
        objects_replicated: refs.len(),
        archive_bucket: config.archive_bucket.clone(),
    })
}

fn log_replication_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "replication_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use vp_pipeline_core::contract::StorageObjectRef;

    use super::*;

    struct CapturingReplicator {
        copies: Mutex<Vec<(StorageObjectRef, String)>>,
    }

    impl CapturingReplicator {
        fn new() -> Self {
            Self {
                copies: Mutex::new(Vec::new()),
            }
        }

        fn copies(&self) -> Vec<(StorageObjectRef, String)> {
            self.copies.lock().expect("poisoned mutex").clone()
        }
    }

    impl ObjectReplicator for CapturingReplicator {
        fn copy_object(
            &self,
            source: &StorageObjectRef,
            destination_bucket: &str,
        ) -> Result<(), String> {
            self.copies
                .lock()
                .expect("poisoned mutex")
                .push((source.clone(), destination_bucket.to_string()));
            Ok(())
        }
    }

    struct FailingReplicator;

    impl ObjectReplicator for FailingReplicator {
        fn copy_object(
            &self,
            _source: &StorageObjectRef,
            _destination_bucket: &str,
        ) -> Result<(), String> {
            Err("copy refused".to_string())
        }
    }

    fn config() -> ReplicationConfig {
        ReplicationConfig {
            archive_bucket: "lw-enram-archive".to_string(),
        }
    }

    fn created_event(key: &str) -> Value {
        json!({
            "Records": [
                {"s3": {"bucket": {"name": "lw-enram"}, "object": {"key": key}}}
            ]
        })
    }

    #[test]
    fn copies_object_to_archive_under_same_key() {
        let replicator = CapturingReplicator::new();
        let summary =
            handle_object_created(created_event("se/ang/2023/vp.h5"), &config(), &replicator)
                .expect("replication should succeed");

        assert_eq!(summary.status, "ok");
        assert_eq!(summary.objects_replicated, 1);

        let copies = replicator.copies();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].0.bucket, "lw-enram");
        assert_eq!(copies[0].0.key, "se/ang/2023/vp.h5");
        assert_eq!(copies[0].1, "lw-enram-archive");
    }

    #[test]
    fn replicating_same_key_twice_issues_identical_copies() {
        let replicator = CapturingReplicator::new();
        handle_object_created(created_event("coverage.csv"), &config(), &replicator)
            .expect("first replication should succeed");
        handle_object_created(created_event("coverage.csv"), &config(), &replicator)
            .expect("second replication should succeed");

        let copies = replicator.copies();
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0], copies[1]);
    }

    #[test]
    fn rejects_malformed_event_without_copying() {
        let replicator = CapturingReplicator::new();
        let error = handle_object_created(json!({"Records": []}), &config(), &replicator)
            .expect_err("event should fail");

        assert!(error.message.starts_with("Malformed object-created event"));
        assert!(replicator.copies().is_empty());
    }

    #[test]
    fn copy_failure_propagates() {
        let error = handle_object_created(
            created_event("se/ang/2023/vp.h5"),
            &config(),
            &FailingReplicator,
        )
        .expect_err("replication should fail");

        assert_eq!(
            error.message,
            "Failed to replicate 'se/ang/2023/vp.h5': copy refused"
        );
    }
}
