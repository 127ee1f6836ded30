//! Shared sample buffer between the interrupt drain and blocking readers.
//!
//! [`SampleBuffer`] wraps a [`SampleRing`] in a mutex held only for the
//! duration of one push or pop, paired with a condition variable for waiters.
//! Pushing never waits on readers: a full ring silently evicts its oldest
//! sample. Closing the buffer releases every waiter with end-of-stream.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::fifo::Sample;
use crate::ring::SampleRing;

/// Result of waiting for samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// At least one sample is buffered.
    Ready,
    /// The buffer was closed and holds no more samples.
    Closed,
    /// A bounded wait elapsed with the buffer still empty.
    TimedOut,
}

struct State {
    ring: SampleRing,
    closed: bool,
    evicted: u64,
}

impl State {
    fn status(&self) -> Option<WaitStatus> {
        if !self.ring.is_empty() {
            Some(WaitStatus::Ready)
        } else if self.closed {
            Some(WaitStatus::Closed)
        } else {
            None
        }
    }
}

/// Bounded, overwrite-on-full sample queue with blocking consumers.
pub struct SampleBuffer {
    state: Mutex<State>,
    available: Condvar,
}

impl SampleBuffer {
    /// Creates an empty, open buffer.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                ring: SampleRing::new(),
                closed: false,
                evicted: 0,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `sample`, evicting the oldest sample when full.
    ///
    /// Never blocks on consumers. Wakes waiters when the buffer goes from
    /// empty to non-empty. Samples pushed after [`close`](Self::close) are
    /// discarded.
    pub fn push(&self, sample: Sample) {
        let mut state = self.lock();
        if state.closed {
            log_trace!("adxl345: sample pushed after close, discarding");
            return;
        }

        let was_empty = state.ring.is_empty();
        if state.ring.push_overwrite(sample).is_some() {
            state.evicted += 1;
            log_trace!("adxl345: buffer full, oldest sample evicted");
        }
        drop(state);

        if was_empty {
            self.available.notify_all();
        }
    }

    /// Wakes every waiter so it re-examines the buffer.
    pub fn wake_all(&self) {
        self.available.notify_all();
    }

    /// Removes up to `max` of the oldest samples without blocking.
    pub fn pop_up_to(&self, max: usize) -> Vec<Sample> {
        self.lock().ring.drain_up_to(max).collect()
    }

    /// Blocks until a sample is buffered or the buffer is closed.
    pub fn wait_non_empty(&self) -> WaitStatus {
        let state = self
            .available
            .wait_while(self.lock(), |state| state.status().is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.status().unwrap_or(WaitStatus::Closed)
    }

    /// Like [`wait_non_empty`](Self::wait_non_empty), giving up after `timeout`.
    ///
    /// Timing out leaves the buffer untouched.
    pub fn wait_non_empty_timeout(&self, timeout: Duration) -> WaitStatus {
        let (state, _) = self
            .available
            .wait_timeout_while(self.lock(), timeout, |state| state.status().is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.status().unwrap_or(WaitStatus::TimedOut)
    }

    /// Waits for samples, then removes up to `max` of them under the same lock.
    ///
    /// Returns an empty vector only once the buffer is closed and drained.
    /// Concurrent callers are served first come, first served.
    pub fn wait_pop_up_to(&self, max: usize) -> Vec<Sample> {
        let mut state = self
            .available
            .wait_while(self.lock(), |state| state.status().is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.ring.drain_up_to(max).collect()
    }

    /// [`wait_pop_up_to`](Self::wait_pop_up_to) bounded by `timeout`.
    ///
    /// Returns `None` when the timeout elapses first.
    pub fn wait_pop_up_to_timeout(&self, max: usize, timeout: Duration) -> Option<Vec<Sample>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.status().is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            state = self
                .available
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        let samples = state.ring.drain_up_to(max).collect();
        Some(samples)
    }

    /// Ends the stream and releases every waiter.
    ///
    /// Samples already buffered remain readable; once they are gone readers
    /// see end-of-stream.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    /// Returns `true` once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    /// Returns `true` when no samples are buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    /// Total samples evicted by overwrite since creation.
    pub fn evicted(&self) -> u64 {
        self.lock().evicted
    }

    /// Copies the buffered samples, oldest first, without removing them.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().ring.iter().copied().collect()
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::CAPACITY;
    use std::sync::Arc;
    use std::thread;

    fn numbered(n: i16) -> Sample {
        Sample::new(n, n + 1, n + 2)
    }

    #[test]
    fn more_than_capacity_pushes_keep_the_latest_64() {
        let buffer = SampleBuffer::new();
        for n in 0..70 {
            buffer.push(numbered(n));
        }

        let kept: Vec<i16> = buffer.snapshot().iter().map(|s| s.x).collect();
        assert_eq!(kept, (6..70).collect::<Vec<_>>());
        assert_eq!(buffer.len(), CAPACITY);
        assert_eq!(buffer.evicted(), 6);
    }

    #[test]
    fn pop_up_to_more_than_available_empties_without_blocking() {
        let buffer = SampleBuffer::new();
        buffer.push(numbered(1));
        buffer.push(numbered(2));

        assert_eq!(buffer.pop_up_to(5), vec![numbered(1), numbered(2)]);
        assert!(buffer.is_empty());
        assert!(buffer.pop_up_to(5).is_empty());
    }

    #[test]
    fn waiter_wakes_on_first_push_and_sees_that_sample() {
        let buffer = Arc::new(SampleBuffer::new());
        let consumer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                assert_eq!(buffer.wait_non_empty(), WaitStatus::Ready);
                buffer.pop_up_to(1)
            })
        };

        thread::sleep(Duration::from_millis(20));
        buffer.push(numbered(42));

        assert_eq!(consumer.join().unwrap(), vec![numbered(42)]);
    }

    #[test]
    fn close_releases_blocked_waiters() {
        let buffer = Arc::new(SampleBuffer::new());
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || buffer.wait_pop_up_to(8))
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        buffer.close();

        for waiter in waiters {
            assert!(waiter.join().unwrap().is_empty());
        }
        assert_eq!(buffer.wait_non_empty(), WaitStatus::Closed);
    }

    #[test]
    fn buffered_samples_survive_close() {
        let buffer = SampleBuffer::new();
        buffer.push(numbered(1));
        buffer.close();
        buffer.push(numbered(2));

        assert_eq!(buffer.wait_non_empty(), WaitStatus::Ready);
        assert_eq!(buffer.wait_pop_up_to(4), vec![numbered(1)]);
        assert!(buffer.wait_pop_up_to(4).is_empty());
    }

    #[test]
    fn concurrent_readers_split_the_stream_without_duplicates() {
        const PUSHES: i16 = 20_000;
        let buffer = Arc::new(SampleBuffer::new());
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    loop {
                        let batch = buffer.wait_pop_up_to(7);
                        if batch.is_empty() {
                            break seen;
                        }
                        seen.extend(batch.iter().map(|s| s.x));
                    }
                })
            })
            .collect();

        for n in 0..PUSHES {
            buffer.push(numbered(n));
        }
        buffer.close();

        let mut delivered = Vec::new();
        for reader in readers {
            let seen = reader.join().unwrap();
            assert!(
                seen.windows(2).all(|pair| pair[0] < pair[1]),
                "reader observed samples out of order"
            );
            delivered.extend(seen);
        }

        let total = delivered.len();
        delivered.sort_unstable();
        delivered.dedup();
        assert_eq!(delivered.len(), total, "sample delivered twice");
        assert_eq!(total as u64 + buffer.evicted(), PUSHES as u64);
        assert!(buffer.is_empty());
    }

    #[test]
    fn timed_wait_leaves_buffer_untouched() {
        let buffer = SampleBuffer::new();
        assert_eq!(
            buffer.wait_non_empty_timeout(Duration::from_millis(10)),
            WaitStatus::TimedOut
        );
        assert_eq!(buffer.wait_pop_up_to_timeout(4, Duration::from_millis(10)), None);
        assert!(!buffer.is_closed());

        buffer.push(numbered(3));
        assert_eq!(
            buffer.wait_pop_up_to_timeout(4, Duration::from_millis(10)),
            Some(vec![numbered(3)])
        );
    }
}
