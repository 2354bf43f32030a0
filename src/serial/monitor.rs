//! Serial log tailer
//!
//! Reads newline-delimited text from a byte source, one bounded read per
//! iteration, and prints every line with a wall-clock timestamp until the
//! stop flag is raised.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDateTime};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Second-resolution timestamp prefix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Message printed when the loop is interrupted
pub const FAREWELL: &str = "Interrupted – closing serial port.";

/// Splits a byte stream with read timeouts into lines
pub struct LineReader<R: Read> {
    inner: BufReader<R>,
    pending: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            pending: Vec::new(),
        }
    }

    /// Read until `\n` or until the read times out.
    ///
    /// Returns `None` when the timeout elapsed with no data. A timeout after
    /// some data returns that partial line.
    pub fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        match self.inner.read_until(b'\n', &mut self.pending) {
            Ok(_) => {}
            Err(e) if is_idle(&e) => {
                log::trace!("read timed out with {} bytes pending", self.pending.len());
            }
            Err(e) => return Err(Error::SerialRead(e)),
        }

        if self.pending.is_empty() {
            Ok(None)
        } else {
            Ok(Some(std::mem::take(&mut self.pending)))
        }
    }
}

/// Errors that only mean "nothing arrived this time". `Interrupted` never
/// reaches here: `read_until` retries it.
fn is_idle(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

/// Decode leniently (invalid UTF-8 becomes U+FFFD) and trim trailing
/// whitespace, including the line ending
pub fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

/// `[YYYY-MM-DD HH:MM:SS] line`
pub fn format_line(at: NaiveDateTime, line: &str) -> String {
    format!("[{}] {}", at.format(TIMESTAMP_FORMAT), line)
}

/// Statistics of a finished tail run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TailSummary {
    pub lines: usize,
    pub idle_reads: usize,
}

/// Print lines from `source` to `out` until `stop` is set.
///
/// `source` is owned by this call and dropped exactly once when it returns,
/// whether the loop was stopped or failed.
pub fn tail<R: Read, W: Write>(source: R, out: &mut W, stop: &AtomicBool) -> Result<TailSummary> {
    let mut reader = LineReader::new(source);
    let mut summary = TailSummary::default();

    while !stop.load(Ordering::SeqCst) {
        match reader.read_line()? {
            Some(bytes) => {
                let line = decode_line(&bytes);
                let stamped = format_line(Local::now().naive_local(), &line);
                writeln!(out, "{}", stamped).map_err(Error::Output)?;
                out.flush().map_err(Error::Output)?;
                summary.lines += 1;
            }
            None => summary.idle_reads += 1,
        }
    }

    writeln!(out, "\n{}", FAREWELL).map_err(Error::Output)?;
    log::debug!(
        "Tail stopped after {} lines ({} idle reads)",
        summary.lines,
        summary.idle_reads
    );

    Ok(summary)
}
