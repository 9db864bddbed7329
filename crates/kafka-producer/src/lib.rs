//! Kafka publishing client for `line-publisher`
//!
//! This crate provides the broker client handle the scheduler publishes through.
//!
//! ## Features
//!
//! - **`Publisher` trait**: "publish a string payload to a named topic", the only
//!   operation the scheduler needs from a broker
//! - **`KafkaPublisher`**: rdkafka `FutureProducer` implementation, constructed from
//!   `{brokers, serialization, message timeout}`
//! - **Topic management**: create the target topic if it does not exist yet
//!
//! ## Usage
//!
//! ```rust,no_run
//! use line_publisher_kafka_producer::{KafkaPublisher, ProducerConfig, Publisher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let publisher = KafkaPublisher::new(&ProducerConfig::default())?;
//!     publisher.create_topic_if_not_exists("weibo", 1).await?;
//!     publisher.publish("weibo", "hello").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod producer;

pub use error::{ProducerError, PublishError};
pub use producer::{KafkaPublisher, ProducerConfig};

/// Payload encoding applied to each line before it is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Serialization {
    /// The line's UTF-8 bytes, unchanged
    #[default]
    #[value(name = "string")]
    String,
    /// The line as a JSON string literal
    #[value(name = "json")]
    Json,
}

impl Serialization {
    /// Encode a line into the bytes that go on the wire
    pub fn encode(&self, payload: &str) -> Result<Vec<u8>, PublishError> {
        match self {
            Serialization::String => Ok(payload.as_bytes().to_vec()),
            Serialization::Json => serde_json::to_vec(payload)
                .map_err(|e| PublishError::Serialization(e.to_string())),
        }
    }
}

/// Publishes string payloads to named topics.
///
/// Implementations must be safe to share between publishers in the same process;
/// the scheduler holds its handle in an `Arc` and adds no locking of its own.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `payload` to `topic`, resolving once the broker client reports the outcome.
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;
}
