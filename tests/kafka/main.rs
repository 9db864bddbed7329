//! Kafka E2E tests
//!
//! Tests for publishing a file to a real Kafka broker. These need a broker reachable
//! at `kafka:9092` and are ignored by default:
//!
//! ```bash
//! cargo test --test kafka -- --ignored
//! ```

mod file_to_kafka;
