use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An object in the storage service, as named by a trigger event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageObjectRef {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Extracts the object references named by an object-created trigger payload.
///
/// Accepts the S3 notification shape (`Records[].s3.bucket.name` /
/// `Records[].s3.object.key`) as well as a flat `{bucket, key}` object for
/// local and manual invocations. An event with no records, or with a blank
/// bucket or key, is rejected before any storage call is made.
pub fn object_created_refs(event: Value) -> Result<Vec<StorageObjectRef>, ValidationError> {
    let Some(object) = event.as_object() else {
        return Err(ValidationError::new("Event payload must be a JSON object"));
    };

    if let Some(records) = object.get("Records") {
        let Some(records) = records.as_array() else {
            return Err(ValidationError::new("Records must be an array"));
        };
        if records.is_empty() {
            return Err(ValidationError::new(
                "Event contains no object-created records",
            ));
        }
        return records.iter().map(record_object_ref).collect();
    }

    match (
        string_field(object.get("bucket")),
        string_field(object.get("key")),
    ) {
        (Some(bucket), Some(key)) => Ok(vec![StorageObjectRef { bucket, key }]),
        _ => Err(ValidationError::new(
            "Event must carry non-empty bucket and key fields",
        )),
    }
}

fn record_object_ref(record: &Value) -> Result<StorageObjectRef, ValidationError> {
    match (
        string_field(record.pointer("/s3/bucket/name")),
        string_field(record.pointer("/s3/object/key")),
    ) {
        (Some(bucket), Some(key)) => Ok(StorageObjectRef { bucket, key }),
        _ => Err(ValidationError::new(
            "Record must carry non-empty s3.bucket.name and s3.object.key",
        )),
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_refs_from_notification_records() {
        let event = json!({
            "Records": [
                {"s3": {"bucket": {"name": "lw-enram"}, "object": {"key": "se/ang/2023/vp.h5"}}},
                {"s3": {"bucket": {"name": "lw-enram"}, "object": {"key": "coverage.csv"}}}
            ]
        });

        let refs = object_created_refs(event).expect("event should parse");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].bucket, "lw-enram");
        assert_eq!(refs[0].key, "se/ang/2023/vp.h5");
        assert_eq!(refs[1].key, "coverage.csv");
    }

    #[test]
    fn accepts_flat_bucket_and_key_payload() {
        let refs = object_created_refs(json!({"bucket": "lw-enram", "key": "coverage.csv"}))
            .expect("event should parse");
        assert_eq!(
            refs,
            vec![StorageObjectRef {
                bucket: "lw-enram".to_string(),
                key: "coverage.csv".to_string(),
            }]
        );
    }

    #[test]
    fn rejects_event_without_records() {
        let error = object_created_refs(json!({"Records": []})).expect_err("event should fail");
        assert_eq!(error.message(), "Event contains no object-created records");
    }

    #[test]
    fn rejects_record_with_blank_key() {
        let event = json!({
            "Records": [
                {"s3": {"bucket": {"name": "lw-enram"}, "object": {"key": "  "}}}
            ]
        });

        let error = object_created_refs(event).expect_err("event should fail");
        assert_eq!(
            error.message(),
            "Record must carry non-empty s3.bucket.name and s3.object.key"
        );
    }

    #[test]
    fn rejects_non_object_payload() {
        let error = object_created_refs(json!("not an event")).expect_err("event should fail");
        assert_eq!(error.message(), "Event payload must be a JSON object");
    }
}
