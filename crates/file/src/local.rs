//! Local filesystem line source implementation

use crate::{FileError, LineReader, ReadOutcome, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Reads a local file one line per call
#[derive(Debug)]
pub struct LineSource {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    lines_read: u64,
    buf: Vec<u8>,
}

impl LineSource {
    /// Open a local file for line-by-line reading
    ///
    /// The file is opened exactly once; a `LineSource` is never reopened after `close`.
    ///
    /// # Example
    /// ```ignore
    /// let source = LineSource::open("data.csv").await?;
    /// ```
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) => return Err(FileError::from_open(path, e)),
        };

        tracing::debug!("Opened line source: {}", path.display());

        Ok(Self {
            path,
            reader: Some(BufReader::new(file)),
            lines_read: 0,
            buf: Vec::new(),
        })
    }

    /// Path this source was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines returned so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

#[async_trait::async_trait]
impl LineReader for LineSource {
    async fn read_next(&mut self) -> Result<ReadOutcome> {
        let reader = self.reader.as_mut().ok_or_else(|| FileError::Closed {
            path: self.path.clone(),
        })?;

        self.buf.clear();
        let read_failure =
            |path: &Path, line: u64, source: std::io::Error| FileError::ReadFailure {
                path: path.to_path_buf(),
                line,
                source,
            };

        let n = reader
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|e| read_failure(&self.path, self.lines_read + 1, e))?;
        if n == 0 {
            return Ok(ReadOutcome::EndOfInput);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        let line = String::from_utf8(std::mem::take(&mut self.buf)).map_err(|e| {
            read_failure(
                &self.path,
                self.lines_read + 1,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        self.lines_read += 1;
        Ok(ReadOutcome::Line(line))
    }

    fn close(&mut self) -> bool {
        match self.reader.take() {
            Some(_) => {
                tracing::debug!(
                    "Closed line source {} after {} lines",
                    self.path.display(),
                    self.lines_read
                );
                true
            }
            None => false,
        }
    }

    fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}
