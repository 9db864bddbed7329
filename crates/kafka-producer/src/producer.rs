use crate::error::{ProducerError, PublishError};
use crate::{Publisher, Serialization};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::Duration;

/// Configuration for the Kafka producer
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Kafka brokers (comma-separated list)
    pub brokers: String,
    /// How each line is encoded into the message payload
    pub serialization: Serialization,
    /// Upper bound on local delivery of a single message, in milliseconds
    ///
    /// This is the only deadline on a publish call; while it is pending the
    /// current tick is blocked.
    pub message_timeout_ms: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            serialization: Serialization::String,
            message_timeout_ms: 5000,
        }
    }
}

impl ProducerConfig {
    fn validate(&self) -> Result<(), ProducerError> {
        if self.brokers.trim().is_empty() {
            return Err(ProducerError::InvalidConfig(
                "brokers must not be empty".to_string(),
            ));
        }
        if self.message_timeout_ms == 0 {
            return Err(ProducerError::InvalidConfig(
                "message_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Kafka implementation of [`Publisher`]
pub struct KafkaPublisher {
    producer: FutureProducer,
    config: ProducerConfig,
}

impl KafkaPublisher {
    /// Create a new Kafka publisher
    ///
    /// No connection is made here; librdkafka connects lazily on the first send.
    pub fn new(config: &ProducerConfig) -> Result<Self, ProducerError> {
        config.validate()?;

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .create()
            .map_err(ProducerError::Client)?;

        tracing::debug!(
            "Created Kafka producer for {} ({:?} payloads)",
            config.brokers,
            config.serialization
        );

        Ok(Self {
            producer,
            config: config.clone(),
        })
    }

    /// Create Kafka topic if it doesn't exist
    pub async fn create_topic_if_not_exists(
        &self,
        topic: &str,
        partitions: i32,
    ) -> Result<(), ProducerError> {
        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.config.brokers)
            .create()
            .map_err(ProducerError::Client)?;

        let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| ProducerError::TopicCreation(format!("Failed to create topics: {e}")))?;

        for result in results {
            match result {
                Ok(topic_name) => {
                    tracing::info!("Topic '{topic_name}' created successfully");
                }
                Err((topic_name, err)) => {
                    if err.to_string().contains("already exists") {
                        tracing::info!("Topic '{topic_name}' already exists");
                    } else {
                        return Err(ProducerError::TopicCreation(format!(
                            "Failed to create topic '{topic_name}': {err}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Get the config
    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        let bytes = self.config.serialization.encode(payload)?;
        let record = FutureRecord::<(), Vec<u8>>::to(topic).payload(&bytes);

        let (partition, offset) = self
            .producer
            .send(record, Duration::from_millis(self.config.message_timeout_ms))
            .await
            .map_err(|(err, _)| err)?;

        tracing::trace!("Delivered to {topic}[{partition}]@{offset}");
        Ok(())
    }
}
