//! Debug output for POSIX hosts
//!
//! [`DebugLog`] writes through `core::fmt::Write`; [`FmtLineWriter`] bridges that
//! to any `std::io::Write`, buffering until a full line is available so
//! concurrent writers do not interleave mid-line.

use std::fmt;
use std::io::{self, Stderr, Write};

use lmic_hal_io::DebugLog;

/// Bytes buffered before a forced flush
pub const LINE_CAPACITY: usize = 128;

/// Line-buffered adaptor from `fmt::Write` to `io::Write`
pub struct FmtLineWriter<W: Write> {
    inner: W,
    line: heapless::String<LINE_CAPACITY>,
}

/// Line-buffered standard error
pub type StderrWriter = FmtLineWriter<Stderr>;

/// Debug logger printing to standard error
pub type HostDebugLog = DebugLog<StderrWriter>;

impl<W: Write> FmtLineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            line: heapless::String::new(),
        }
    }

    /// Write out whatever is buffered
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.line.is_empty() {
            self.inner.write_all(self.line.as_bytes())?;
            self.line.clear();
        }
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Bytes waiting for the end of the line
    pub fn pending(&self) -> &str {
        &self.line
    }

    fn push(&mut self, c: char) -> io::Result<()> {
        if self.line.push(c).is_err() {
            self.flush()?;
            // a single char always fits an empty buffer
            let _ = self.line.push(c);
        }
        if c == '\n' {
            self.flush()?;
        }
        Ok(())
    }
}

impl StderrWriter {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

/// Logger on standard error
pub fn stderr_log() -> HostDebugLog {
    DebugLog::new(StderrWriter::stderr())
}

impl<W: Write> fmt::Write for FmtLineWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.push(c).map_err(|err| {
                log::warn!("debug output failed: {}", err);
                fmt::Error
            })?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for FmtLineWriter<W> {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            log::warn!("debug output lost on drop: {}", err);
        }
    }
}
