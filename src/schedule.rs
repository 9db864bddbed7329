//! Scheduled publishing of a line source to a topic.
//!
//! A [`ScheduledPublisher`] owns a recurring tick. Each tick reads one line from its
//! [`LineReader`] and hands it to the shared [`Publisher`]; the tick that observes
//! end-of-input closes the source and ends the schedule.
//!
//! # Lifecycle
//!
//! ```text
//! Created ──start()──▶ Running ──end-of-input / halting read error / stop()──▶ Stopped
//!    │                                                                          ▲
//!    └────────────────────────────────stop()────────────────────────────────────┘
//! ```
//!
//! `Stopped` is terminal. All ticks run on one spawned task and each tick is awaited
//! to completion before the next one is scheduled, so ticks never overlap even when a
//! publish call takes longer than the period.

use crate::stats::{PublishStats, StatsRecorder};
use line_publisher_file::{LineReader, ReadOutcome};
use line_publisher_kafka_producer::Publisher;
use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const CREATED: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// Lifecycle state of a [`ScheduledPublisher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Created,
    Running,
    Stopped,
}

impl ScheduleState {
    fn from_u8(value: u8) -> Self {
        match value {
            CREATED => ScheduleState::Created,
            RUNNING => ScheduleState::Running,
            _ => ScheduleState::Stopped,
        }
    }
}

/// How a tick reacts when the source reports a read failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFailurePolicy {
    /// Close the source and stop the schedule on the first failure
    #[default]
    Halt,
    /// Log the failure and read again on the next tick
    ///
    /// With `max_consecutive` set, that many failures in a row halt the schedule,
    /// so a persistently broken file cannot keep it ticking forever. `Some(0)` halts on
    /// the first failure, like `Some(1)`.
    Skip { max_consecutive: Option<u32> },
}

/// Why a schedule reached `Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The source ran out of lines
    EndOfInput,
    /// A read failure halted the schedule under the configured policy
    ReadFailure,
    /// `stop()` was called
    Stopped,
}

/// Final outcome of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub reason: StopReason,
    pub stats: PublishStats,
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Publisher already started")]
    AlreadyStarted,

    #[error("Tick period must be greater than zero")]
    ZeroPeriod,

    #[error("Publisher was never started")]
    NotStarted,

    #[error("Publisher task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Publishes one line per tick from a source to a topic.
///
/// The broker client handle is shared (`Arc<P>`) and may be used by other publishers
/// in the same process; the source is owned and moved into the tick task on `start()`.
pub struct ScheduledPublisher<S, P: ?Sized> {
    topic: String,
    period: Duration,
    policy: ReadFailurePolicy,
    publisher: Arc<P>,
    source: Mutex<Option<S>>,
    state: Arc<AtomicU8>,
    reason: Arc<OnceLock<StopReason>>,
    stats: Arc<StatsRecorder>,
    cancel: CancellationToken,
    finished: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<S, P> ScheduledPublisher<S, P>
where
    S: LineReader + 'static,
    P: Publisher + ?Sized + 'static,
{
    /// Create a publisher in the `Created` state.
    ///
    /// Nothing is read or published until [`start`](Self::start).
    pub fn new(topic: impl Into<String>, period: Duration, source: S, publisher: Arc<P>) -> Self {
        Self {
            topic: topic.into(),
            period,
            policy: ReadFailurePolicy::default(),
            publisher,
            source: Mutex::new(Some(source)),
            state: Arc::new(AtomicU8::new(CREATED)),
            reason: Arc::new(OnceLock::new()),
            stats: Arc::new(StatsRecorder::default()),
            cancel: CancellationToken::new(),
            finished: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    /// Set the read failure policy (default: [`ReadFailurePolicy::Halt`])
    pub fn with_read_failure_policy(mut self, policy: ReadFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Start ticking. The first tick fires immediately.
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`ScheduleError::AlreadyStarted`] once the publisher has left `Created`,
    /// including after `stop()`.
    pub fn start(&self) -> Result<(), ScheduleError> {
        if self.period.is_zero() {
            return Err(ScheduleError::ZeroPeriod);
        }

        self.state
            .compare_exchange(CREATED, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ScheduleError::AlreadyStarted)?;

        let Some(source) = lock(&self.source).take() else {
            return Err(ScheduleError::AlreadyStarted);
        };

        let tick_loop = TickLoop {
            topic: self.topic.clone(),
            period: self.period,
            policy: self.policy,
            publisher: Arc::clone(&self.publisher),
            source,
            state: Arc::clone(&self.state),
            reason: Arc::clone(&self.reason),
            stats: Arc::clone(&self.stats),
            cancel: self.cancel.clone(),
            finished: self.finished.clone(),
        };

        *lock(&self.handle) = Some(tokio::spawn(tick_loop.run()));

        Ok(())
    }

    /// Stop the schedule. No tick starts after this call.
    ///
    /// A tick already in flight finishes its read and publish first. The source is
    /// closed on this path as well: by the tick task if the schedule was running, or
    /// right here if it was never started. Calling `stop()` again is a no-op.
    pub fn stop(&self) {
        self.cancel.cancel();

        match self
            .state
            .compare_exchange(CREATED, STOPPED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {
                let _ = self.reason.set(StopReason::Stopped);
                if let Some(mut source) = lock(&self.source).take() {
                    source.close();
                }
                self.finished.cancel();
                info!("Publisher for '{}' stopped before start", self.topic);
            }
            Err(RUNNING) => {
                info!("Stop requested for publisher on '{}'", self.topic);
            }
            Err(_) => {}
        }
    }

    /// Wait for the schedule to reach `Stopped` and return how it ended.
    ///
    /// Returns [`ScheduleError::NotStarted`] for a publisher that is still `Created`.
    pub async fn join(&self) -> Result<Completion, ScheduleError> {
        if self.state() == ScheduleState::Created {
            return Err(ScheduleError::NotStarted);
        }

        self.finished.cancelled().await;
        let handle = lock(&self.handle).take();
        if let Some(handle) = handle {
            handle.await?;
        }

        match self.reason.get() {
            Some(reason) => Ok(Completion {
                reason: *reason,
                stats: self.stats.snapshot(),
            }),
            None => Err(ScheduleError::NotStarted),
        }
    }

    /// Current lifecycle state.
    ///
    /// A running schedule stays `Running` after `stop()` until its tick task has
    /// finished any in-flight publish and closed the source.
    pub fn state(&self) -> ScheduleState {
        ScheduleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Current counters
    pub fn stats(&self) -> PublishStats {
        self.stats.snapshot()
    }

    /// Topic lines are published to
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Time between ticks
    pub fn period(&self) -> Duration {
        self.period
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// State owned by the spawned tick task
struct TickLoop<S, P: ?Sized> {
    topic: String,
    period: Duration,
    policy: ReadFailurePolicy,
    publisher: Arc<P>,
    source: S,
    state: Arc<AtomicU8>,
    reason: Arc<OnceLock<StopReason>>,
    stats: Arc<StatsRecorder>,
    cancel: CancellationToken,
    finished: CancellationToken,
}

impl<S, P> TickLoop<S, P>
where
    S: LineReader,
    P: Publisher + ?Sized,
{
    async fn run(mut self) {
        // Wakes joiners even if the task unwinds
        let _finished = self.finished.clone().drop_guard();

        info!(
            "Publishing {} to topic '{}' every {:?}",
            self.source.display_name(),
            self.topic,
            self.period
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut consecutive_read_failures = 0u32;

        let reason = loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break StopReason::Stopped,
                _ = ticker.tick() => {}
            }

            if let Some(reason) = self.tick(&mut consecutive_read_failures).await {
                break reason;
            }
        };

        self.source.close();
        let _ = self.reason.set(reason);
        self.cancel.cancel();
        self.state.store(STOPPED, Ordering::SeqCst);

        let stats = self.stats.snapshot();
        info!(
            "Publisher for '{}' stopped ({:?}): {} published, {} publish failures, {} read failures in {} ticks",
            self.topic,
            reason,
            stats.published,
            stats.publish_failures,
            stats.read_failures,
            stats.ticks
        );
    }

    /// One read, then one publish or a stop decision. Returns `Some` to end the schedule.
    async fn tick(&mut self, consecutive_read_failures: &mut u32) -> Option<StopReason> {
        let tick = self.stats.record_tick();

        match self.source.read_next().await {
            Ok(ReadOutcome::Line(line)) => {
                *consecutive_read_failures = 0;
                match self.publisher.publish(&self.topic, &line).await {
                    Ok(()) => {
                        let published = self.stats.record_published();
                        debug!("Tick {tick}: published line {published} to '{}'", self.topic);
                    }
                    Err(e) => {
                        self.stats.record_publish_failure();
                        warn!("Tick {tick}: failed to publish line to '{}': {e}", self.topic);
                    }
                }
                None
            }
            Ok(ReadOutcome::EndOfInput) => {
                info!(
                    "Tick {tick}: reached end of input for {}",
                    self.source.display_name()
                );
                Some(StopReason::EndOfInput)
            }
            Err(e) => {
                self.stats.record_read_failure();
                *consecutive_read_failures += 1;
                match self.policy {
                    ReadFailurePolicy::Halt => {
                        error!("Tick {tick}: read failed, halting: {e}");
                        Some(StopReason::ReadFailure)
                    }
                    ReadFailurePolicy::Skip {
                        max_consecutive: Some(max),
                    } if *consecutive_read_failures >= max => {
                        error!(
                            "Tick {tick}: read failed {consecutive_read_failures} times in a row, halting: {e}"
                        );
                        Some(StopReason::ReadFailure)
                    }
                    ReadFailurePolicy::Skip { .. } => {
                        warn!("Tick {tick}: read failed, skipping: {e}");
                        None
                    }
                }
            }
        }
    }
}
