use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use vp_pipeline_core::contract::StorageObjectRef;
use vp_pipeline_lambda::adapters::object_store::ObjectReplicator;
use vp_pipeline_lambda::handlers::replicate::{
    handle_object_created, ReplicationConfig, ReplicationSummary,
};

struct S3ObjectReplicator {
    s3_client: aws_sdk_s3::Client,
}

impl ObjectReplicator for S3ObjectReplicator {
    fn copy_object(
        &self,
        source: &StorageObjectRef,
        destination_bucket: &str,
    ) -> Result<(), String> {
        let copy_source = format!("{}/{}", source.bucket, source.key);
        let destination_key = source.key.clone();
        let bucket = destination_bucket.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .copy_object()
                    .copy_source(copy_source)
                    .bucket(bucket)
                    .key(destination_key)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to copy object to archive: {error}"))
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ReplicationSummary, Error> {
    let archive_bucket = std::env::var("ARCHIVE_BUCKET")
        .map_err(|_| Error::from("ARCHIVE_BUCKET must be configured"))?;
    let config = ReplicationConfig { archive_bucket };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let replicator = S3ObjectReplicator {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };

    handle_object_created(event.payload, &config, &replicator)
        .map_err(|error| Error::from(error.message))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
