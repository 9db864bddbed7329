//! line-publisher Library
//!
//! Publishes the lines of a single local file to a Kafka topic, one line per tick,
//! and stops once the file is exhausted.
//!
//! # Components
//!
//! - `line_publisher_file` - `LineSource`, a file read one line per call
//! - `line_publisher_kafka_producer` - the `Publisher` trait and its Kafka implementation
//! - [`schedule`] - `ScheduledPublisher`, the read-schedule-publish-terminate loop
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use line_publisher::{KafkaPublisher, LineSource, ProducerConfig, ScheduledPublisher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let broker = Arc::new(KafkaPublisher::new(&ProducerConfig::default())?);
//!     let source = LineSource::open("/data/events.csv").await?;
//!
//!     let publisher = ScheduledPublisher::new("events", Duration::from_secs(1), source, broker);
//!     publisher.start()?;
//!     let completion = publisher.join().await?;
//!     println!("{} lines published", completion.stats.published);
//!     Ok(())
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! line-publisher --file /data/events.csv --topic events --period 500ms \
//!   --brokers localhost:9092
//! ```

pub mod config;
pub mod schedule;
pub mod stats;
pub mod testing;

pub use config::Config;
pub use schedule::{
    Completion, ReadFailurePolicy, ScheduleError, ScheduleState, ScheduledPublisher, StopReason,
};
pub use stats::PublishStats;

// Re-export the component crates for convenience
pub use line_publisher_file::{FileError, LineReader, LineSource, ReadOutcome};
pub use line_publisher_kafka_producer::{
    KafkaPublisher, ProducerConfig, ProducerError, PublishError, Publisher, Serialization,
};
