//! Line-at-a-time file source for `line-publisher`
//!
//! This crate owns the file side of the publisher: a single local file opened once,
//! read one line per call, and closed exactly once.
//!
//! # Reading Model
//!
//! - `LineSource::open` opens the file and classifies failures (`NotFound`,
//!   `PermissionDenied`, anything else as `Open`)
//! - `read_next` yields one `ReadOutcome::Line` per line of text with the line
//!   terminator (`\n` or `\r\n`) stripped, then `ReadOutcome::EndOfInput`
//! - `close` releases the handle and is safe to call any number of times
//!
//! # Example
//!
//! ```ignore
//! use line_publisher_file::{LineReader, LineSource, ReadOutcome};
//!
//! let mut source = LineSource::open("/data/events.csv").await?;
//! while let ReadOutcome::Line(line) = source.read_next().await? {
//!     println!("{line}");
//! }
//! source.close();
//! ```

mod error;
mod local;

pub use error::{FileError, Result};
pub use local::LineSource;

/// Result of a single read from a line source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The next line, without its terminator
    Line(String),
    /// No further lines remain
    EndOfInput,
}

/// A source of text lines consumed one at a time.
///
/// The scheduler drives its source through this trait so that it does not care
/// whether lines come from a file on disk or from a scripted source in tests.
#[async_trait::async_trait]
pub trait LineReader: Send {
    /// Read the next line, or report that input is exhausted.
    ///
    /// Reading after `close` returns `FileError::Closed`.
    async fn read_next(&mut self) -> Result<ReadOutcome>;

    /// Release the underlying handle.
    ///
    /// Returns `true` only for the call that actually released it; later calls are no-ops.
    fn close(&mut self) -> bool;

    /// Whether `close` has already released the handle.
    fn is_closed(&self) -> bool;

    /// Name used in log messages.
    fn display_name(&self) -> String;
}
