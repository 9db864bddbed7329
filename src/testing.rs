//! Test doubles for exercising a [`ScheduledPublisher`](crate::ScheduledPublisher)
//! without a broker.
//!
//! - [`RecordingPublisher`] records every publish call with its start and end instants,
//!   optionally sleeping to simulate a slow broker and failing selected payloads.
//! - [`ScriptedSource`] replays a fixed list of lines and read failures, then reports
//!   end-of-input, and counts how many times it was read and closed.

use line_publisher_file::{FileError, LineReader, ReadOutcome};
use line_publisher_kafka_producer::{PublishError, Publisher};
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One recorded publish call
#[derive(Debug, Clone)]
pub struct PublishCall {
    pub topic: String,
    pub payload: String,
    pub started: Instant,
    pub finished: Instant,
    pub succeeded: bool,
}

/// In-memory [`Publisher`] that records calls
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    calls: Mutex<Vec<PublishCall>>,
    delay: Option<Duration>,
    failing_payloads: HashSet<String>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every publish call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every publish of this payload
    pub fn failing_on(mut self, payload: impl Into<String>) -> Self {
        self.failing_payloads.insert(payload.into());
        self
    }

    /// All calls so far, in call order
    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// `(topic, payload)` of every call, in call order
    pub fn published(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .map(|call| (call.topic, call.payload))
            .collect()
    }
}

#[async_trait::async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        let started = Instant::now();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let succeeded = !self.failing_payloads.contains(payload);

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(PublishCall {
                topic: topic.to_string(),
                payload: payload.to_string(),
                started,
                finished: Instant::now(),
                succeeded,
            });

        if succeeded {
            Ok(())
        } else {
            Err(PublishError::Serialization(format!(
                "refusing payload '{payload}'"
            )))
        }
    }
}

/// One scripted read result
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Line(String),
    Fail,
}

/// [`LineReader`] that replays a script, then reports end-of-input forever
#[derive(Debug)]
pub struct ScriptedSource {
    steps: VecDeque<ScriptStep>,
    fail_when_exhausted: bool,
    open: bool,
    reads: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            fail_when_exhausted: false,
            open: true,
            reads: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source that yields these lines and nothing else
    pub fn lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| ScriptStep::Line(l.into())))
    }

    /// A source whose every read fails
    pub fn always_failing() -> Self {
        let mut source = Self::new(std::iter::empty());
        source.fail_when_exhausted = true;
        source
    }

    /// Counter of `read_next` calls, readable after the source is moved
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }

    /// Counter of `close` calls (including no-op repeats), readable after the source is moved
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }

    fn failure() -> FileError {
        FileError::ReadFailure {
            path: PathBuf::from("scripted"),
            line: 0,
            source: std::io::Error::other("scripted read failure"),
        }
    }
}

#[async_trait::async_trait]
impl LineReader for ScriptedSource {
    async fn read_next(&mut self) -> line_publisher_file::Result<ReadOutcome> {
        if !self.open {
            return Err(FileError::Closed {
                path: PathBuf::from("scripted"),
            });
        }
        self.reads.fetch_add(1, Ordering::SeqCst);

        match self.steps.pop_front() {
            Some(ScriptStep::Line(line)) => Ok(ReadOutcome::Line(line)),
            Some(ScriptStep::Fail) => Err(Self::failure()),
            None if self.fail_when_exhausted => Err(Self::failure()),
            None => Ok(ReadOutcome::EndOfInput),
        }
    }

    fn close(&mut self) -> bool {
        self.closes.fetch_add(1, Ordering::SeqCst);
        std::mem::replace(&mut self.open, false)
    }

    fn is_closed(&self) -> bool {
        !self.open
    }

    fn display_name(&self) -> String {
        "scripted".to_string()
    }
}
