use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use vp_pipeline_core::freshness::{evaluate_freshness, stale_alert, FreshnessStatus};

use crate::adapters::notify::AlertPublisher;
use crate::adapters::object_store::CoverageStore;
use crate::handlers::HandlerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessConfig {
    pub bucket: String,
    pub coverage_prefix: String,
    pub buffer_days: u32,
    pub topic_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FreshnessOutcome {
    pub status: String,
    pub coverage_key: String,
    pub last_modified_date: String,
}

/// Checks the coverage file's last-modified calendar date against the
/// staleness buffer and publishes an alert when it is too old.
///
/// A listing with no match under the prefix is a defined error rather than a
/// silent skip; listing and publish failures propagate unhandled.
pub fn handle_scheduled_check(
    config: &FreshnessConfig,
    today: NaiveDate,
    store: &dyn CoverageStore,
    publisher: &dyn AlertPublisher,
) -> Result<FreshnessOutcome, HandlerError> {
    let listing = store
        .list_objects(&config.bucket, &config.coverage_prefix)
        .map_err(|error| {
            HandlerError::new(format!("Failed to list coverage objects: {error}"))
        })?;

    let Some(coverage) = listing.first() else {
        return Err(HandlerError::new(format!(
            "No coverage object matched prefix '{}' in bucket '{}'",
            config.coverage_prefix, config.bucket
        )));
    };

    let last_modified_date = coverage.last_modified.date_naive();
    log_freshness_info(
        "coverage_inspected",
        json!({
            "bucket": config.bucket.clone(),
            "key": coverage.key.clone(),
            "last_modified_date": last_modified_date.to_string(),
            "buffer_days": config.buffer_days,
        }),
    );

    match evaluate_freshness(last_modified_date, today, config.buffer_days) {
        FreshnessStatus::Stale => {
            let alert = stale_alert(config.buffer_days);
            publisher
                .publish(&config.topic_arn, &alert)
                .map_err(|error| {
                    HandlerError::new(format!("Failed to publish staleness alert: {error}"))
                })?;

            log_freshness_info(
                "alert_published",
                json!({
                    "topic_arn": config.topic_arn.clone(),
                    "subject": alert.subject.clone(),
                    "last_modified_date": last_modified_date.to_string(),
                }),
            );

            Ok(FreshnessOutcome {
                status: "alert_published".to_string(),
                coverage_key: coverage.key.clone(),
                last_modified_date: last_modified_date.to_string(),
            })
        }
        FreshnessStatus::Fresh => {
            log_freshness_info(
                "coverage_up_to_date",
                json!({
                    "key": coverage.key.clone(),
                    "last_modified_date": last_modified_date.to_string(),
                }),
            );

            Ok(FreshnessOutcome {
                status: "up_to_date".to_string(),
                coverage_key: coverage.key.clone(),
                last_modified_date: last_modified_date.to_string(),
            })
        }
    }
}

fn log_freshness_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "freshness_monitor",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
