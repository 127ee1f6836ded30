//! Blocking consumers of the sample buffer.
//!
//! A read suspends the calling thread until at least one sample is buffered,
//! then removes as many of the oldest samples as the caller asked for (never
//! more than are available) and projects each one onto a single axis. An
//! empty result means the stream has ended.
//!
//! The producer overwrites the oldest samples when readers fall behind, so a
//! slow reader observes gaps rather than stale data. This is deliberate: the
//! interrupt path must never wait for a reader.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::fifo::{Axis, Sample};
use crate::stream::SampleBuffer;

/// Bytes produced per sample by [`AxisStream`].
pub const BYTES_PER_VALUE: usize = 2;

/// Clonable handle that reads projected axis values from a [`SampleBuffer`].
#[derive(Clone)]
pub struct BlockingReader {
    buffer: Arc<SampleBuffer>,
}

impl BlockingReader {
    /// Creates a reader over `buffer`.
    pub fn new(buffer: Arc<SampleBuffer>) -> Self {
        Self { buffer }
    }

    /// Blocks until samples are available and returns up to `max` values of `axis`.
    ///
    /// This read cannot fail: it only touches the buffer, never the bus. An
    /// empty vector means end-of-stream. `max == 0` returns immediately
    /// without waiting.
    pub fn read(&self, axis: Axis, max: usize) -> Vec<i16> {
        if max == 0 {
            return Vec::new();
        }
        project(axis, self.buffer.wait_pop_up_to(max))
    }

    /// Like [`read`](Self::read), filling `dest` and returning the count written.
    pub fn read_into(&self, axis: Axis, dest: &mut [i16]) -> usize {
        if dest.is_empty() {
            return 0;
        }

        let samples = self.buffer.wait_pop_up_to(dest.len());
        for (slot, sample) in dest.iter_mut().zip(&samples) {
            *slot = sample.axis(axis);
        }
        samples.len()
    }

    /// [`read`](Self::read) bounded by `timeout`.
    ///
    /// Fails with [`io::ErrorKind::TimedOut`] when nothing arrives in time;
    /// the buffer is left untouched in that case.
    pub fn read_timeout(&self, axis: Axis, max: usize, timeout: Duration) -> io::Result<Vec<i16>> {
        if max == 0 {
            return Ok(Vec::new());
        }

        self.buffer
            .wait_pop_up_to_timeout(max, timeout)
            .map(|samples| project(axis, samples))
            .ok_or_else(|| io::Error::new(io::ErrorKind::TimedOut, "no samples before timeout"))
    }

    /// Returns a byte stream of `axis` values over the same buffer.
    pub fn stream(&self, axis: Axis) -> AxisStream {
        AxisStream {
            buffer: Arc::clone(&self.buffer),
            axis,
        }
    }
}

fn project(axis: Axis, samples: Vec<Sample>) -> Vec<i16> {
    samples.iter().map(|sample| sample.axis(axis)).collect()
}

/// [`io::Read`] view of one axis: each sample becomes two little-endian bytes.
///
/// `Ok(0)` signals end-of-stream. Buffers shorter than two bytes are rejected
/// since a value is never split across reads.
pub struct AxisStream {
    buffer: Arc<SampleBuffer>,
    axis: Axis,
}

impl AxisStream {
    /// Axis this stream projects.
    pub fn axis(&self) -> Axis {
        self.axis
    }
}

impl io::Read for AxisStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if buf.len() < BYTES_PER_VALUE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer too small for one axis value",
            ));
        }

        let samples = self.buffer.wait_pop_up_to(buf.len() / BYTES_PER_VALUE);
        for (chunk, sample) in buf.chunks_exact_mut(BYTES_PER_VALUE).zip(&samples) {
            chunk.copy_from_slice(&sample.axis(self.axis).to_le_bytes());
        }
        Ok(samples.len() * BYTES_PER_VALUE)
    }
}
