//! Scheduled publisher tests
//!
//! These tests drive `ScheduledPublisher` against an in-memory recording publisher,
//! so no broker is needed:
//! - `lifecycle` uses a scripted source to pin down tick, stop and failure semantics
//! - `file_to_topic` uses real files on disk through `LineSource`

mod file_to_topic;
