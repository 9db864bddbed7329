//! File to Kafka E2E test
//!
//! Test flow:
//! 1. Create a uniquely named topic
//! 2. Publish a small file through `ScheduledPublisher` + `KafkaPublisher`
//! 3. Consume the topic from the beginning and compare payloads with the file lines

use line_publisher::{
    KafkaPublisher, LineSource, ProducerConfig, ScheduledPublisher, Serialization, StopReason,
};
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

/// Kafka broker address for testing
const KAFKA_BROKER: &str = "kafka:9092";

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

async fn consume_payloads(topic: &str, expected: usize) -> anyhow::Result<Vec<String>> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", KAFKA_BROKER)
        .set("group.id", format!("line-publisher-test-{}", unique_suffix()))
        .set("auto.offset.reset", "earliest")
        .set("enable.auto.commit", "false")
        .create()?;
    consumer.subscribe(&[topic])?;

    let mut payloads = Vec::new();
    while payloads.len() < expected {
        let message = tokio::time::timeout(Duration::from_secs(30), consumer.recv()).await??;
        let payload = message
            .payload_view::<str>()
            .transpose()?
            .unwrap_or_default()
            .to_string();
        payloads.push(payload);
    }
    Ok(payloads)
}

#[tokio::test]
#[ignore = "requires a Kafka broker at kafka:9092"]
async fn test_file_lines_arrive_on_topic_in_order() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("line_publisher=debug,line_publisher_kafka_producer=debug")
        .try_init()
        .ok();

    let topic = format!("line-publisher-test-{}", unique_suffix());
    let lines = vec!["1,alice,30", "2,bob,25", "", "4,\"diana\",28"];

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("data.csv");
    std::fs::write(&path, format!("{}\n", lines.join("\n")))?;

    let broker = Arc::new(KafkaPublisher::new(&ProducerConfig {
        brokers: KAFKA_BROKER.to_string(),
        serialization: Serialization::String,
        message_timeout_ms: 10_000,
    })?);
    broker.create_topic_if_not_exists(&topic, 1).await?;

    let source = LineSource::open(&path).await?;
    let publisher =
        ScheduledPublisher::new(topic.clone(), Duration::from_millis(50), source, broker);
    publisher.start()?;
    let completion = publisher.join().await?;

    assert_eq!(completion.reason, StopReason::EndOfInput);
    assert_eq!(completion.stats.published, lines.len() as u64);
    assert_eq!(completion.stats.publish_failures, 0);

    let payloads = consume_payloads(&topic, lines.len()).await?;
    assert_eq!(payloads, lines);

    Ok(())
}
