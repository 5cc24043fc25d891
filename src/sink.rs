//! Destinations for readings leaving the capture loop.
//!
//! Submitting is fire-and-forget. A sink that cannot deliver a reading drops
//! it and lets the loop carry on with the next frame.

use crate::reading::Reading;
use log::debug;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Receiver of readings produced by the capture loop
pub trait ReadingSink {
    /// Hand over the reading computed at `now`. Must not block for long and
    /// must not fail.
    fn submit(&mut self, reading: &Reading, now: Instant);
}

impl<S: ReadingSink + ?Sized> ReadingSink for Box<S> {
    fn submit(&mut self, reading: &Reading, now: Instant) {
        (**self).submit(reading, now);
    }
}

/// Single-slot cell holding the most recent reading.
///
/// Clones share the slot, so one clone can live in the capture loop while
/// another is read from a different thread. Writers overwrite; there is no
/// backlog.
#[derive(Debug, Clone, Default)]
pub struct LatestReading {
    slot: Arc<Mutex<Reading>>,
}

impl LatestReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last submitted reading, or the no-signal reading if none yet
    pub fn get(&self) -> Reading {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, reading: Reading) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = reading;
    }
}

impl ReadingSink for LatestReading {
    fn submit(&mut self, reading: &Reading, _now: Instant) {
        self.set(*reading);
    }
}

/// Forwards at most one reading per `interval`, dropping the rest
#[derive(Debug)]
pub struct Throttled<S> {
    inner: S,
    interval: Duration,
    last_sent: Option<Instant>,
    dropped: u64,
}

impl<S: ReadingSink> Throttled<S> {
    pub const fn new(inner: S, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last_sent: None,
            dropped: 0,
        }
    }

    /// Readings skipped to respect the interval
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    pub const fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ReadingSink> ReadingSink for Throttled<S> {
    fn submit(&mut self, reading: &Reading, now: Instant) {
        let due = self
            .last_sent
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.inner.submit(reading, now);
            self.last_sent = Some(now);
        } else {
            self.dropped += 1;
        }
    }
}

/// Writes each reading as one line of JSON
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
    failures: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failures: 0,
        }
    }

    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Readings that could not be written
    pub const fn failures(&self) -> u64 {
        self.failures
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, reading: &Reading) -> crate::Result<()> {
        let line = reading.to_json()?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ReadingSink for JsonLinesSink<W> {
    fn submit(&mut self, reading: &Reading, _now: Instant) {
        match self.write_line(reading) {
            Ok(()) => self.written += 1,
            Err(e) => {
                self.failures += 1;
                debug!("Dropping reading: {e}");
            }
        }
    }
}
