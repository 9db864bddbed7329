//! Command-line interface for line-publisher
//!
//! # Usage Examples
//!
//! ```bash
//! # Publish one line per second to the "weibo" topic
//! line-publisher --file data_hz.csv --topic weibo
//!
//! # Faster schedule, create the topic first, JSON-quoted payloads
//! line-publisher --file data_hz.csv --topic weibo --period 100ms \
//!   --brokers kafka:9092 --create-topic --serialization json
//!
//! # Keep going past unreadable lines, but give up after 5 in a row
//! line-publisher --file data_hz.csv --topic weibo \
//!   --on-read-error skip --max-consecutive-read-errors 5
//! ```
//!
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=line_publisher=debug`.

use anyhow::Context;
use clap::Parser;
use line_publisher::{Config, KafkaPublisher, LineSource, ScheduledPublisher};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::parse();

    tracing::info!(
        "Publishing {} to {} on {}",
        config.file.display(),
        config.topic,
        config.brokers
    );

    // Broker client handle, shared with the scheduler
    let broker = Arc::new(
        KafkaPublisher::new(&config.producer_config())
            .context("Failed to create Kafka publisher")?,
    );
    if config.create_topic {
        broker
            .create_topic_if_not_exists(&config.topic, config.partitions)
            .await
            .with_context(|| format!("Failed to create topic '{}'", config.topic))?;
    }

    // Open errors are fatal: nothing is scheduled for a file we cannot read
    let source = LineSource::open(&config.file)
        .await
        .with_context(|| format!("Failed to open {}", config.file.display()))?;

    let publisher = ScheduledPublisher::new(config.topic.clone(), config.period, source, broker)
        .with_read_failure_policy(config.read_failure_policy());
    publisher.start().context("Failed to start publisher")?;

    let completion = tokio::select! {
        completion = publisher.join() => completion?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, stopping publisher");
            publisher.stop();
            publisher.join().await?
        }
    };

    tracing::info!(
        "Publish summary: {}",
        serde_json::to_string(&completion).context("Failed to serialize summary")?
    );

    Ok(())
}
