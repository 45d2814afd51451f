use vp_pipeline_core::freshness::AlertMessage;

pub trait AlertPublisher {
    fn publish(&self, topic_arn: &str, alert: &AlertMessage) -> Result<(), String>;
}
