use thiserror::Error;

/// Errors from a single publish call. These are never fatal to the schedule.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors while constructing the producer or administering topics.
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Failed to create Kafka client: {0}")]
    Client(#[source] rdkafka::error::KafkaError),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
