//! Command-line configuration for the `line-publisher` binary.
//!
//! The library types take plain constructor parameters; this module only maps
//! CLI flags (and their environment fallbacks) onto them.

mod duration;

pub use duration::parse_period;

use crate::schedule::ReadFailurePolicy;
use clap::{Parser, ValueEnum};
use line_publisher_kafka_producer::{ProducerConfig, Serialization};
use std::path::PathBuf;
use std::time::Duration;

/// Default tick period
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// What to do when a line cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReadErrorMode {
    /// Close the file and stop publishing
    #[value(name = "halt")]
    Halt,
    /// Log the failure and try the next line on the next tick
    #[value(name = "skip")]
    Skip,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "line-publisher")]
#[command(about = "Publish the lines of a file to a Kafka topic, one line per tick")]
#[command(long_about = None)]
pub struct Config {
    /// File to read lines from
    #[arg(long, env = "LINE_PUBLISHER_FILE")]
    pub file: PathBuf,

    /// Kafka topic to publish each line to
    #[arg(long, env = "LINE_PUBLISHER_TOPIC")]
    pub topic: String,

    /// Time between ticks; one line is published per tick
    /// Format: milliseconds, or with units like "500ms", "2s", "1m"
    #[arg(long, default_value = "1000ms", value_parser = parse_period)]
    pub period: Duration,

    /// Kafka brokers (comma-separated, e.g., "localhost:9092")
    #[arg(long, env = "KAFKA_BROKERS", default_value = "localhost:9092")]
    pub brokers: String,

    /// Payload encoding for each line
    #[arg(long, value_enum, default_value_t = Serialization::String)]
    pub serialization: Serialization,

    /// Behavior when a line cannot be read
    #[arg(long, value_enum, default_value_t = ReadErrorMode::Halt)]
    pub on_read_error: ReadErrorMode,

    /// With --on-read-error=skip, halt after this many read errors in a row (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_consecutive_read_errors: Option<u32>,

    /// Local delivery timeout for each message, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub message_timeout_ms: u64,

    /// Create the topic before publishing if it does not exist
    #[arg(long)]
    pub create_topic: bool,

    /// Partition count used with --create-topic
    #[arg(long, default_value_t = 1)]
    pub partitions: i32,
}

impl Config {
    /// Producer settings for the broker client handle
    pub fn producer_config(&self) -> ProducerConfig {
        ProducerConfig {
            brokers: self.brokers.clone(),
            serialization: self.serialization,
            message_timeout_ms: self.message_timeout_ms,
        }
    }

    /// Read failure policy for the scheduler
    pub fn read_failure_policy(&self) -> ReadFailurePolicy {
        match self.on_read_error {
            ReadErrorMode::Halt => ReadFailurePolicy::Halt,
            ReadErrorMode::Skip => ReadFailurePolicy::Skip {
                max_consecutive: self.max_consecutive_read_errors,
            },
        }
    }
}
