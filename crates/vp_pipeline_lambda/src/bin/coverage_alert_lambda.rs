use chrono::{DateTime, Utc};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use vp_pipeline_core::freshness::{AlertMessage, DEFAULT_BUFFER_DAYS};
use vp_pipeline_lambda::adapters::notify::AlertPublisher;
use vp_pipeline_lambda::adapters::object_store::{CoverageStore, ObjectSummary};
use vp_pipeline_lambda::handlers::freshness::{
    handle_scheduled_check, FreshnessConfig, FreshnessOutcome,
};

struct S3CoverageStore {
    s3_client: aws_sdk_s3::Client,
}

impl CoverageStore for S3CoverageStore {
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>, String> {
        let bucket = bucket.to_string();
        let prefix = prefix.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .list_objects_v2()
                    .bucket(bucket)
                    .prefix(prefix)
                    .send()
                    .await
                    .map_err(|error| format!("failed to list coverage objects: {error}"))?;

                let mut summaries = Vec::new();
                for object in response.contents() {
                    let (Some(key), Some(last_modified)) =
                        (object.key(), object.last_modified())
                    else {
                        continue;
                    };
                    let last_modified = DateTime::<Utc>::from_timestamp(
                        last_modified.secs(),
                        last_modified.subsec_nanos(),
                    )
                    .ok_or_else(|| {
                        format!("object '{key}' carries an unrepresentable last-modified time")
                    })?;
                    summaries.push(ObjectSummary {
                        key: key.to_string(),
                        last_modified,
                    });
                }
                Ok(summaries)
            })
        })
    }
}

struct SnsAlertPublisher {
    sns_client: aws_sdk_sns::Client,
}

impl AlertPublisher for SnsAlertPublisher {
    fn publish(&self, topic_arn: &str, alert: &AlertMessage) -> Result<(), String> {
        let topic_arn = topic_arn.to_string();
        let subject = alert.subject.clone();
        let message = alert.body.clone();
        let client = self.sns_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .publish()
                    .topic_arn(topic_arn)
                    .subject(subject)
                    .message(message)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to publish alert to sns: {error}"))
            })
        })
    }
}

async fn handle_request(_event: LambdaEvent<Value>) -> Result<FreshnessOutcome, Error> {
    let bucket = std::env::var("COVERAGE_BUCKET")
        .map_err(|_| Error::from("COVERAGE_BUCKET must be configured"))?;
    let topic_arn = std::env::var("ALERT_TOPIC_ARN")
        .map_err(|_| Error::from("ALERT_TOPIC_ARN must be configured"))?;
    let coverage_prefix =
        std::env::var("COVERAGE_PREFIX").unwrap_or_else(|_| "coverage.csv".to_string());
    let buffer_days = match std::env::var("STALENESS_BUFFER_DAYS") {
        Ok(value) => value
            .parse::<u32>()
            .map_err(|_| Error::from("STALENESS_BUFFER_DAYS must be a non-negative integer"))?,
        Err(_) => DEFAULT_BUFFER_DAYS,
    };

    let config = FreshnessConfig {
        bucket,
        coverage_prefix,
        buffer_days,
        topic_arn,
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3CoverageStore {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };
    let publisher = SnsAlertPublisher {
        sns_client: aws_sdk_sns::Client::new(&aws_config),
    };

    handle_scheduled_check(&config, Utc::now().date_naive(), &store, &publisher)
        .map_err(|error| Error::from(error.message))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
